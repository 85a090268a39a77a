#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use mopack_cfg as cfg;
pub use mopack_format as format;
pub use mopack_utils as utils;
pub use mopack_wire as wire;
