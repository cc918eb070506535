//! Helpers shared by the `weft` proc-macro crates.
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro crate")]
#![allow(clippy::std_instead_of_core, reason = "proc-macro crate")]

mod manifest;

pub use manifest::Manifest;
