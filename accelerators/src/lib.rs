//! Spatial acceleration structures.

#[macro_use]
extern crate log;

mod bvh;

pub use bvh::*;
