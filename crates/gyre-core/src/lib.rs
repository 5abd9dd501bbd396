//! Value types for the Gyre checkpoint/restart layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! caller-owned state that the persistence layer transfers: scalar fields
//! over a structured mesh ([`Field2D`], [`Field3D`]), three-component
//! vector fields with a covariant/contravariant basis flag ([`Vector2D`],
//! [`Vector3D`]), and the [`Mesh`] that supplies per-domain extents and
//! the diagonal metric used for basis conversion.
//!
//! The persistence layer treats all of these as opaque: it queries
//! allocation state, allocates on demand, zero-fills, and converts bases,
//! but performs no other numerical work on field data.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod mesh;
pub mod vector;

pub use field::{Field2D, Field3D};
pub use mesh::{Mesh, Metric, Shape};
pub use vector::{Vector2D, Vector3D};
