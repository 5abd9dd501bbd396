//! The [`DataFormat`] driver abstraction.
//!
//! A format driver owns one file handle at a time and knows how to encode
//! named variables on disk. The orchestrator drives it through this trait
//! and never sees the on-disk layout. Drivers are stateful: open a file,
//! perform typed transfers, close.

use std::path::Path;

use crate::error::FormatError;

/// Which record of a growing (time-series) variable to address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordIndex {
    /// The most recent record on read; a new record on write.
    #[default]
    Latest,
    /// A specific zero-based record.
    At(usize),
}

/// A pluggable file-format backend.
///
/// Static operations (`read_int`, `write_field`, ...) address a variable's
/// single overwritten slot; record operations (`read_int_record`,
/// `write_field_record`, ...) address its growing record series at the
/// position chosen by the last [`select_record`](DataFormat::select_record)
/// call. Field transfers carry the array shape (`[nx, ny]` or
/// `[nx, ny, nz]`) so the driver can validate against the stored layout.
pub trait DataFormat {
    /// Open an existing file for reading.
    fn open_read(&mut self, path: &Path) -> Result<(), FormatError>;

    /// Open a file for writing, optionally appending to existing records.
    fn open_write(&mut self, path: &Path, append: bool) -> Result<(), FormatError>;

    /// Whether a usable file handle is currently open.
    fn is_valid(&self) -> bool;

    /// Close the current handle, flushing any pending writes.
    fn close(&mut self) -> Result<(), FormatError>;

    /// Choose which record subsequent record operations address.
    fn select_record(&mut self, record: RecordIndex);

    /// Store real values in reduced precision from now on.
    ///
    /// Sticky for the driver's lifetime; applies to subsequent writes.
    fn set_low_precision(&mut self);

    /// Read a static integer.
    fn read_int(&mut self, name: &str) -> Result<i32, FormatError>;

    /// Read an integer from the selected record.
    fn read_int_record(&mut self, name: &str) -> Result<i32, FormatError>;

    /// Read a static real.
    fn read_real(&mut self, name: &str) -> Result<f64, FormatError>;

    /// Read a real from the selected record.
    fn read_real_record(&mut self, name: &str) -> Result<f64, FormatError>;

    /// Read a static field into `dest`, validating `shape`.
    fn read_field(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError>;

    /// Read a field from the selected record into `dest`, validating `shape`.
    fn read_field_record(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError>;

    /// Write a static integer.
    fn write_int(&mut self, name: &str, value: i32) -> Result<(), FormatError>;

    /// Write an integer at the selected record.
    fn write_int_record(&mut self, name: &str, value: i32) -> Result<(), FormatError>;

    /// Write a static real.
    fn write_real(&mut self, name: &str, value: f64) -> Result<(), FormatError>;

    /// Write a real at the selected record.
    fn write_real_record(&mut self, name: &str, value: f64) -> Result<(), FormatError>;

    /// Write a static field with the given shape.
    fn write_field(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError>;

    /// Write a field at the selected record with the given shape.
    fn write_field_record(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError>;
}
