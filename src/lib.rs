//! Constructive Solid Geometry (CSG) on polygon meshes, built around Boolean
//! operations (*union*, *difference*, *intersection*, *xor*) on sets of polygons
//! stored in [BSP](mesh::bsp) trees.
//!
//! A solid is a [`Mesh`]: a closed, consistently wound polygon soup. Boolean
//! operations build transient BSP trees from the operands' polygon lists, clip
//! the trees against each other, and flatten the result back into a fresh
//! polygon soup. Operands are never mutated.
//!
//! # Features
//! - **f64** (default): use f64 as [`Real`](float_types::Real)
//! - **f32**: use f32 as Real, conflicts with f64
//! - **parallel**: use rayon for multithreaded per-polygon helpers

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use mesh::Mesh;
pub use mesh::vertex::Vertex;
pub use traits::CSG;
