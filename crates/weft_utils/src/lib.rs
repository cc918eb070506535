//! Containers shared by the `weft` crates.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod typeid_map;

pub mod hash;

pub use typeid_map::TypeIdMap;
