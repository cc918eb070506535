#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use weft_marshal as marshal;
pub use weft_utils as utils;
