//! Core

#[macro_use]
extern crate hexf;

// Re-export.
pub mod base;
pub mod geometry;
pub mod interaction;
pub mod material;
pub mod microfacet;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod spectrum;
pub mod texture;
