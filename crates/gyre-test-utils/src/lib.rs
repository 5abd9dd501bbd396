//! Test utilities and mock types for gyre development.
//!
//! Provides a [`MockFormat`] driver that records every call through a
//! shared [`MockLog`] and serves pre-populated variables, plus small
//! mesh and field fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gyre_io::{DataFormat, FormatError, RecordIndex};

/// One field write observed by a [`MockFormat`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldWrite {
    pub name: String,
    pub data: Vec<f64>,
    pub shape: Vec<usize>,
    pub record: bool,
}

/// Everything a [`MockFormat`] has been asked to do, in order where it
/// matters. Shared with the test through `Rc<RefCell<_>>` so it stays
/// inspectable after the driver is boxed into a `Datafile`.
#[derive(Debug, Default)]
pub struct MockLog {
    pub open_read_calls: usize,
    pub open_write_calls: usize,
    pub append_flags: Vec<bool>,
    pub close_calls: usize,
    pub selected_records: Vec<RecordIndex>,
    pub low_precision_calls: usize,
    pub opened_paths: Vec<PathBuf>,
    /// Variable names in write order, across all kinds.
    pub write_order: Vec<String>,
    pub written_ints: HashMap<String, i32>,
    pub written_reals: HashMap<String, f64>,
    pub written_fields: Vec<FieldWrite>,
}

impl MockLog {
    /// The recorded data of the last write under `name`, if any.
    pub fn field(&self, name: &str) -> Option<&FieldWrite> {
        self.written_fields.iter().rev().find(|w| w.name == name)
    }
}

/// Mock implementation of [`DataFormat`].
///
/// Serves values pre-populated with the `provide_*` methods and records
/// every call in a shared [`MockLog`]. Static and record operations hit
/// the same backing maps; the mock validates open-state and read/write
/// direction but nothing format-specific.
pub struct MockFormat {
    log: Rc<RefCell<MockLog>>,
    ints: HashMap<String, i32>,
    reals: HashMap<String, f64>,
    fields: HashMap<String, Vec<f64>>,
    fail_open: bool,
    report_invalid: bool,
    open: bool,
    writable: bool,
}

impl MockFormat {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(MockLog::default())),
            ints: HashMap::new(),
            reals: HashMap::new(),
            fields: HashMap::new(),
            fail_open: false,
            report_invalid: false,
            open: false,
            writable: false,
        }
    }

    /// A handle to the call log, valid after the driver is boxed away.
    pub fn log(&self) -> Rc<RefCell<MockLog>> {
        Rc::clone(&self.log)
    }

    /// Pre-populate an integer for subsequent reads.
    pub fn provide_int(&mut self, name: impl Into<String>, value: i32) {
        self.ints.insert(name.into(), value);
    }

    /// Pre-populate a real for subsequent reads.
    pub fn provide_real(&mut self, name: impl Into<String>, value: f64) {
        self.reals.insert(name.into(), value);
    }

    /// Pre-populate a field for subsequent reads.
    pub fn provide_field(&mut self, name: impl Into<String>, data: Vec<f64>) {
        self.fields.insert(name.into(), data);
    }

    /// Make every subsequent open call fail with an I/O error.
    pub fn fail_open(&mut self) {
        self.fail_open = true;
    }

    /// Make the driver open successfully but report an invalid handle.
    pub fn report_invalid(&mut self) {
        self.report_invalid = true;
    }

    fn check_open(&self) -> Result<(), FormatError> {
        if self.open {
            Ok(())
        } else {
            Err(FormatError::NotOpen)
        }
    }

    fn check_writable(&self) -> Result<(), FormatError> {
        self.check_open()?;
        if self.writable {
            Ok(())
        } else {
            Err(FormatError::ReadOnly)
        }
    }

    fn open(&mut self, path: &Path, writable: bool) -> Result<(), FormatError> {
        if self.fail_open {
            return Err(FormatError::Io(std::io::Error::other("mock open failure")));
        }
        self.log.borrow_mut().opened_paths.push(path.to_path_buf());
        self.open = true;
        self.writable = writable;
        Ok(())
    }

    fn lookup_int(&self, name: &str) -> Result<i32, FormatError> {
        self.check_open()?;
        self.ints
            .get(name)
            .copied()
            .ok_or_else(|| FormatError::VariableNotFound {
                name: name.to_string(),
            })
    }

    fn lookup_real(&self, name: &str) -> Result<f64, FormatError> {
        self.check_open()?;
        self.reals
            .get(name)
            .copied()
            .ok_or_else(|| FormatError::VariableNotFound {
                name: name.to_string(),
            })
    }

    fn lookup_field(
        &self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        self.check_open()?;
        let data = self
            .fields
            .get(name)
            .ok_or_else(|| FormatError::VariableNotFound {
                name: name.to_string(),
            })?;
        let expected: usize = shape.iter().product();
        if data.len() != expected || dest.len() != expected {
            return Err(FormatError::ShapeMismatch {
                name: name.to_string(),
                expected: shape.to_vec(),
                found: vec![data.len()],
            });
        }
        dest.copy_from_slice(data);
        Ok(())
    }

    fn record_int(&mut self, name: &str, value: i32) -> Result<(), FormatError> {
        self.check_writable()?;
        let mut log = self.log.borrow_mut();
        log.write_order.push(name.to_string());
        log.written_ints.insert(name.to_string(), value);
        Ok(())
    }

    fn record_real(&mut self, name: &str, value: f64) -> Result<(), FormatError> {
        self.check_writable()?;
        let mut log = self.log.borrow_mut();
        log.write_order.push(name.to_string());
        log.written_reals.insert(name.to_string(), value);
        Ok(())
    }

    fn record_field(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
        record: bool,
    ) -> Result<(), FormatError> {
        self.check_writable()?;
        let mut log = self.log.borrow_mut();
        log.write_order.push(name.to_string());
        log.written_fields.push(FieldWrite {
            name: name.to_string(),
            data: data.to_vec(),
            shape: shape.to_vec(),
            record,
        });
        Ok(())
    }
}

impl Default for MockFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFormat for MockFormat {
    fn open_read(&mut self, path: &Path) -> Result<(), FormatError> {
        self.log.borrow_mut().open_read_calls += 1;
        self.open(path, false)
    }

    fn open_write(&mut self, path: &Path, append: bool) -> Result<(), FormatError> {
        {
            let mut log = self.log.borrow_mut();
            log.open_write_calls += 1;
            log.append_flags.push(append);
        }
        self.open(path, true)
    }

    fn is_valid(&self) -> bool {
        self.open && !self.report_invalid
    }

    fn close(&mut self) -> Result<(), FormatError> {
        self.log.borrow_mut().close_calls += 1;
        self.open = false;
        self.writable = false;
        Ok(())
    }

    fn select_record(&mut self, record: RecordIndex) {
        self.log.borrow_mut().selected_records.push(record);
    }

    fn set_low_precision(&mut self) {
        self.log.borrow_mut().low_precision_calls += 1;
    }

    fn read_int(&mut self, name: &str) -> Result<i32, FormatError> {
        self.lookup_int(name)
    }

    fn read_int_record(&mut self, name: &str) -> Result<i32, FormatError> {
        self.lookup_int(name)
    }

    fn read_real(&mut self, name: &str) -> Result<f64, FormatError> {
        self.lookup_real(name)
    }

    fn read_real_record(&mut self, name: &str) -> Result<f64, FormatError> {
        self.lookup_real(name)
    }

    fn read_field(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        self.lookup_field(name, dest, shape)
    }

    fn read_field_record(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        self.lookup_field(name, dest, shape)
    }

    fn write_int(&mut self, name: &str, value: i32) -> Result<(), FormatError> {
        self.record_int(name, value)
    }

    fn write_int_record(&mut self, name: &str, value: i32) -> Result<(), FormatError> {
        self.record_int(name, value)
    }

    fn write_real(&mut self, name: &str, value: f64) -> Result<(), FormatError> {
        self.record_real(name, value)
    }

    fn write_real_record(&mut self, name: &str, value: f64) -> Result<(), FormatError> {
        self.record_real(name, value)
    }

    fn write_field(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        self.record_field(name, data, shape, false)
    }

    fn write_field_record(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        self.record_field(name, data, shape, true)
    }
}
