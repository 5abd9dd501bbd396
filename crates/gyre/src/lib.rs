//! Gyre: checkpoint and restart persistence for time-stepped simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the gyre sub-crates. For most users, adding `gyre` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! use gyre::prelude::*;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("dump.gyrc");
//!
//! // The mesh sizes field transfers; the runtime carries the global
//! // enable flag and I/O time accumulator.
//! let mesh = Arc::new(Mesh::new(16, 16, 8));
//! let runtime = Arc::new(IoRuntime::new());
//! let mut dump = Datafile::new(Box::new(BinaryFormat::new()), mesh.clone(), runtime.clone());
//!
//! // Register variables once; the caller keeps ownership.
//! let iteration = Rc::new(RefCell::new(0));
//! let density = Rc::new(RefCell::new(Field3D::zeros(&mesh)));
//! dump.add_int("iteration", iteration.clone(), false)?;
//! dump.add_field_3d("density", density.clone(), true)?;
//!
//! // Each write or append pass moves every registered variable.
//! *iteration.borrow_mut() = 1;
//! dump.write(&path)?;
//! *iteration.borrow_mut() = 2;
//! dump.append(&path)?;
//!
//! // Restart: a fresh datafile reads the most recent records back.
//! let mut restart = Datafile::new(Box::new(BinaryFormat::new()), mesh, runtime);
//! let iteration_in = Rc::new(RefCell::new(0));
//! restart.add_int("iteration", iteration_in.clone(), false)?;
//! assert!(restart.read(&path)?.is_complete());
//! assert_eq!(*iteration_in.borrow(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gyre-core` | Mesh, metric, fields, and vectors |
//! | [`io`] | `gyre-io` | Datafile orchestrator, format drivers, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Mesh, metric, field, and vector value types (`gyre-core`).
///
/// Contains [`types::Mesh`], [`types::Metric`], the scalar fields
/// [`types::Field2D`]/[`types::Field3D`], and the vector fields
/// [`types::Vector2D`]/[`types::Vector3D`].
pub use gyre_core as types;

/// Checkpoint orchestration and format drivers (`gyre-io`).
///
/// The [`io::Datafile`] orchestrator, the [`io::DataFormat`] driver
/// trait, the reference [`io::BinaryFormat`] driver, and the error
/// types.
pub use gyre_io as io;

/// Common imports for typical gyre usage.
///
/// ```rust
/// use gyre::prelude::*;
/// ```
///
/// This imports the value types, the datafile orchestrator, the
/// reference binary driver, and the shared runtime context.
pub mod prelude {
    // Value types
    pub use gyre_core::{Field2D, Field3D, Mesh, Metric, Vector2D, Vector3D};

    // Orchestration
    pub use gyre_io::{BinaryFormat, DataFormat, Datafile, IoRuntime, ReadOutcome, RecordIndex};

    // Errors
    pub use gyre_io::{DatafileError, FormatError};
}
