//! Checkpoint and restart persistence for gyre simulations.
//!
//! The model: register every variable of interest once, with shared
//! caller-owned storage, then move all of them between memory and a file
//! in whole-file passes. [`Datafile`] orchestrates the passes over a
//! pluggable [`DataFormat`] driver; [`BinaryFormat`] is the reference
//! driver. Scalars persist as single values, fields as flat row-major
//! arrays, and vectors as three component fields whose names encode the
//! basis (`V_x`/`V_y`/`V_z` covariant, `Vx`/`Vy`/`Vz` contravariant).
//!
//! Variables registered as growing accumulate one record per write pass;
//! reads address the most recent record. Output can be globally disabled
//! through the shared [`IoRuntime`], which also accumulates the wall time
//! spent on I/O.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod binary;
mod components;
mod context;
mod datafile;
mod error;
mod factory;
mod format;
mod registry;
mod transfer;
mod wire;

pub use binary::BinaryFormat;
pub use components::component_names;
pub use context::IoRuntime;
pub use datafile::{Datafile, MissingVar, ReadOutcome};
pub use error::{DatafileError, FormatError};
pub use factory::create_format;
pub use format::{DataFormat, RecordIndex};
pub use registry::{VarKind, VarRegistry};

/// Magic bytes opening every binary checkpoint file.
pub const MAGIC: [u8; 4] = *b"GYRC";

/// Version byte written after the magic; readers reject anything newer.
pub const FORMAT_VERSION: u8 = 1;
