//! The reference binary checkpoint driver.
//!
//! [`BinaryFormat`] stores named variables in a flat little-endian
//! container: magic, version, then a variable table where each entry is
//! either a static slot or a record series. The whole file is decoded on
//! open and encoded on close; append mode decodes the existing file and
//! extends its record lists. Low-precision mode truncates reals to `f32`
//! on disk.
//!
//! ```text
//! [MAGIC "GYRC"] [VERSION u8] [var count u32]
//! per variable:
//!   [name str] [tag u8] [ndims u8] [dims u32 ...]
//!   int static:    [i32]
//!   int records:   [count u32] [i32 ...]
//!   real static:   [prec u8] [values ...]
//!   real records:  [prec u8] [count u32] [values ...]
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use gyre_core::Shape;
use indexmap::IndexMap;

use crate::error::FormatError;
use crate::format::{DataFormat, RecordIndex};
use crate::wire::{
    read_f32_le, read_f64_le, read_i32_le, read_str, read_u32_le, read_u8, write_f32_le,
    write_f64_le, write_i32_le, write_str, write_u32_le, write_u8,
};
use crate::{FORMAT_VERSION, MAGIC};

const TAG_INT_STATIC: u8 = 0;
const TAG_INT_RECORDS: u8 = 1;
const TAG_REAL_STATIC: u8 = 2;
const TAG_REAL_RECORDS: u8 = 3;

const PREC_F64: u8 = 8;
const PREC_F32: u8 = 4;

/// Cap on capacity reserved from file-supplied counts. Counts in a
/// corrupt file can be arbitrarily large; growth past this cap only
/// happens as actual data decodes.
const MAX_PREALLOC: usize = 1 << 16;

/// Number of values in one slot of a variable with the given shape.
///
/// Scalars have an empty shape and occupy one value.
fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

#[derive(Clone, Debug, PartialEq)]
struct StoredVar {
    shape: Shape,
    values: Values,
}

#[derive(Clone, Debug, PartialEq)]
enum Values {
    IntStatic(i32),
    IntRecords(Vec<i32>),
    RealStatic(Vec<f64>),
    RealRecords(Vec<Vec<f64>>),
}

struct OpenFile {
    path: PathBuf,
    writable: bool,
    vars: IndexMap<String, StoredVar>,
}

/// Reference little-endian binary driver (magic `b"GYRC"`).
#[derive(Default)]
pub struct BinaryFormat {
    low_precision: bool,
    record: RecordIndex,
    open: Option<OpenFile>,
}

impl BinaryFormat {
    /// Create a driver with no file open, full precision.
    pub fn new() -> Self {
        Self {
            low_precision: false,
            record: RecordIndex::Latest,
            open: None,
        }
    }

    fn open_file(&self) -> Result<&OpenFile, FormatError> {
        self.open.as_ref().ok_or(FormatError::NotOpen)
    }

    fn open_file_mut(&mut self) -> Result<&mut OpenFile, FormatError> {
        match &mut self.open {
            Some(open) if open.writable => Ok(open),
            Some(_) => Err(FormatError::ReadOnly),
            None => Err(FormatError::NotOpen),
        }
    }

    fn lookup<'a>(
        vars: &'a IndexMap<String, StoredVar>,
        name: &str,
    ) -> Result<&'a StoredVar, FormatError> {
        vars.get(name).ok_or_else(|| FormatError::VariableNotFound {
            name: name.to_string(),
        })
    }

    fn check_shape(var: &StoredVar, name: &str, shape: &[usize]) -> Result<(), FormatError> {
        if var.shape.as_slice() != shape {
            return Err(FormatError::ShapeMismatch {
                name: name.to_string(),
                expected: shape.to_vec(),
                found: var.shape.to_vec(),
            });
        }
        Ok(())
    }

    /// Pick one record slot for reading.
    fn select<'a, T>(
        records: &'a [T],
        record: RecordIndex,
        name: &str,
    ) -> Result<&'a T, FormatError> {
        match record {
            RecordIndex::Latest => records.last().ok_or_else(|| FormatError::NoRecords {
                name: name.to_string(),
            }),
            RecordIndex::At(index) => {
                records.get(index).ok_or_else(|| FormatError::RecordOutOfRange {
                    name: name.to_string(),
                    index,
                    len: records.len(),
                })
            }
        }
    }

    /// Place one record slot for writing: `Latest` appends a new record.
    fn place<T>(
        records: &mut Vec<T>,
        record: RecordIndex,
        name: &str,
        value: T,
    ) -> Result<(), FormatError> {
        match record {
            RecordIndex::Latest => records.push(value),
            RecordIndex::At(index) if index < records.len() => records[index] = value,
            RecordIndex::At(index) if index == records.len() => records.push(value),
            RecordIndex::At(index) => {
                return Err(FormatError::RecordOutOfRange {
                    name: name.to_string(),
                    index,
                    len: records.len(),
                })
            }
        }
        Ok(())
    }
}

// ── Container encode/decode ─────────────────────────────────────

fn write_reals(w: &mut dyn Write, values: &[f64], low_precision: bool) -> Result<(), FormatError> {
    if low_precision {
        for &v in values {
            write_f32_le(w, v as f32)?;
        }
    } else {
        for &v in values {
            write_f64_le(w, v)?;
        }
    }
    Ok(())
}

fn read_reals(r: &mut dyn Read, count: usize, prec: u8) -> Result<Vec<f64>, FormatError> {
    let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
    match prec {
        PREC_F64 => {
            for _ in 0..count {
                values.push(read_f64_le(r)?);
            }
        }
        PREC_F32 => {
            for _ in 0..count {
                values.push(f64::from(read_f32_le(r)?));
            }
        }
        other => {
            return Err(FormatError::Malformed {
                detail: format!("unknown precision tag {other}"),
            })
        }
    }
    Ok(values)
}

fn encode(
    w: &mut dyn Write,
    vars: &IndexMap<String, StoredVar>,
    low_precision: bool,
) -> Result<(), FormatError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u32_le(w, vars.len() as u32)?;

    let prec = if low_precision { PREC_F32 } else { PREC_F64 };
    for (name, var) in vars {
        write_str(w, name)?;
        let tag = match &var.values {
            Values::IntStatic(_) => TAG_INT_STATIC,
            Values::IntRecords(_) => TAG_INT_RECORDS,
            Values::RealStatic(_) => TAG_REAL_STATIC,
            Values::RealRecords(_) => TAG_REAL_RECORDS,
        };
        write_u8(w, tag)?;
        write_u8(w, var.shape.len() as u8)?;
        for &dim in &var.shape {
            write_u32_le(w, dim as u32)?;
        }
        match &var.values {
            Values::IntStatic(v) => write_i32_le(w, *v)?,
            Values::IntRecords(records) => {
                write_u32_le(w, records.len() as u32)?;
                for &v in records {
                    write_i32_le(w, v)?;
                }
            }
            Values::RealStatic(values) => {
                write_u8(w, prec)?;
                write_reals(w, values, low_precision)?;
            }
            Values::RealRecords(records) => {
                write_u8(w, prec)?;
                write_u32_le(w, records.len() as u32)?;
                for record in records {
                    write_reals(w, record, low_precision)?;
                }
            }
        }
    }
    Ok(())
}

fn decode(r: &mut dyn Read) -> Result<IndexMap<String, StoredVar>, FormatError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(FormatError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion { found: version });
    }

    let count = read_u32_le(r)? as usize;
    let mut vars = IndexMap::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let name = read_str(r)?;
        let tag = read_u8(r)?;
        let ndims = read_u8(r)? as usize;
        if ndims > 3 {
            return Err(FormatError::Malformed {
                detail: format!("variable '{name}' has {ndims} dimensions"),
            });
        }
        let mut shape = Shape::new();
        for _ in 0..ndims {
            shape.push(read_u32_le(r)? as usize);
        }
        // Dimensions come from the file; the product must not be trusted.
        let slot_len = shape
            .iter()
            .try_fold(1usize, |len, &dim| len.checked_mul(dim))
            .ok_or_else(|| FormatError::Malformed {
                detail: format!("variable '{name}' shape {shape:?} overflows"),
            })?;

        let values = match tag {
            TAG_INT_STATIC => Values::IntStatic(read_i32_le(r)?),
            TAG_INT_RECORDS => {
                let records = read_u32_le(r)? as usize;
                let mut values = Vec::with_capacity(records.min(MAX_PREALLOC));
                for _ in 0..records {
                    values.push(read_i32_le(r)?);
                }
                Values::IntRecords(values)
            }
            TAG_REAL_STATIC => {
                let prec = read_u8(r)?;
                Values::RealStatic(read_reals(r, slot_len, prec)?)
            }
            TAG_REAL_RECORDS => {
                let prec = read_u8(r)?;
                let records = read_u32_le(r)? as usize;
                let mut slots = Vec::with_capacity(records.min(MAX_PREALLOC));
                for _ in 0..records {
                    slots.push(read_reals(r, slot_len, prec)?);
                }
                Values::RealRecords(slots)
            }
            other => {
                return Err(FormatError::Malformed {
                    detail: format!("unknown variable tag {other}"),
                })
            }
        };
        vars.insert(name, StoredVar { shape, values });
    }
    Ok(vars)
}

// ── DataFormat implementation ───────────────────────────────────

impl DataFormat for BinaryFormat {
    fn open_read(&mut self, path: &Path) -> Result<(), FormatError> {
        self.open = None;
        self.record = RecordIndex::Latest;
        let mut reader = BufReader::new(File::open(path)?);
        let vars = decode(&mut reader)?;
        self.open = Some(OpenFile {
            path: path.to_path_buf(),
            writable: false,
            vars,
        });
        Ok(())
    }

    fn open_write(&mut self, path: &Path, append: bool) -> Result<(), FormatError> {
        self.open = None;
        self.record = RecordIndex::Latest;
        let vars = if append && path.exists() {
            let mut reader = BufReader::new(File::open(path)?);
            decode(&mut reader)?
        } else {
            IndexMap::new()
        };
        self.open = Some(OpenFile {
            path: path.to_path_buf(),
            writable: true,
            vars,
        });
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.open.is_some()
    }

    fn close(&mut self) -> Result<(), FormatError> {
        let Some(open) = self.open.take() else {
            return Ok(());
        };
        if open.writable {
            let mut writer = BufWriter::new(File::create(&open.path)?);
            encode(&mut writer, &open.vars, self.low_precision)?;
            writer.flush()?;
        }
        Ok(())
    }

    fn select_record(&mut self, record: RecordIndex) {
        self.record = record;
    }

    fn set_low_precision(&mut self) {
        self.low_precision = true;
    }

    fn read_int(&mut self, name: &str) -> Result<i32, FormatError> {
        let open = self.open_file()?;
        match &Self::lookup(&open.vars, name)?.values {
            Values::IntStatic(v) => Ok(*v),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn read_int_record(&mut self, name: &str) -> Result<i32, FormatError> {
        let record = self.record;
        let open = self.open_file()?;
        match &Self::lookup(&open.vars, name)?.values {
            Values::IntRecords(records) => Self::select(records, record, name).copied(),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn read_real(&mut self, name: &str) -> Result<f64, FormatError> {
        let open = self.open_file()?;
        let var = Self::lookup(&open.vars, name)?;
        Self::check_shape(var, name, &[])?;
        match &var.values {
            Values::RealStatic(values) if values.len() == 1 => Ok(values[0]),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn read_real_record(&mut self, name: &str) -> Result<f64, FormatError> {
        let record = self.record;
        let open = self.open_file()?;
        let var = Self::lookup(&open.vars, name)?;
        Self::check_shape(var, name, &[])?;
        match &var.values {
            Values::RealRecords(records) => {
                let slot = Self::select(records, record, name)?;
                slot.first().copied().ok_or_else(|| FormatError::Malformed {
                    detail: format!("empty record slot for '{name}'"),
                })
            }
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn read_field(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        let open = self.open_file()?;
        let var = Self::lookup(&open.vars, name)?;
        Self::check_shape(var, name, shape)?;
        match &var.values {
            Values::RealStatic(values) if values.len() == dest.len() => {
                dest.copy_from_slice(values);
                Ok(())
            }
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn read_field_record(
        &mut self,
        name: &str,
        dest: &mut [f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        let record = self.record;
        let open = self.open_file()?;
        let var = Self::lookup(&open.vars, name)?;
        Self::check_shape(var, name, shape)?;
        match &var.values {
            Values::RealRecords(records) => {
                let slot = Self::select(records, record, name)?;
                if slot.len() != dest.len() {
                    return Err(FormatError::ShapeMismatch {
                        name: name.to_string(),
                        expected: shape.to_vec(),
                        found: vec![slot.len()],
                    });
                }
                dest.copy_from_slice(slot);
                Ok(())
            }
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn write_int(&mut self, name: &str, value: i32) -> Result<(), FormatError> {
        let open = self.open_file_mut()?;
        open.vars.insert(
            name.to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::IntStatic(value),
            },
        );
        Ok(())
    }

    fn write_int_record(&mut self, name: &str, value: i32) -> Result<(), FormatError> {
        let record = self.record;
        let open = self.open_file_mut()?;
        let var = open.vars.entry(name.to_string()).or_insert(StoredVar {
            shape: Shape::new(),
            values: Values::IntRecords(Vec::new()),
        });
        match &mut var.values {
            Values::IntRecords(records) => Self::place(records, record, name, value),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn write_real(&mut self, name: &str, value: f64) -> Result<(), FormatError> {
        let open = self.open_file_mut()?;
        open.vars.insert(
            name.to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::RealStatic(vec![value]),
            },
        );
        Ok(())
    }

    fn write_real_record(&mut self, name: &str, value: f64) -> Result<(), FormatError> {
        let record = self.record;
        let open = self.open_file_mut()?;
        let var = open.vars.entry(name.to_string()).or_insert(StoredVar {
            shape: Shape::new(),
            values: Values::RealRecords(Vec::new()),
        });
        match &mut var.values {
            Values::RealRecords(records) => Self::place(records, record, name, vec![value]),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }

    fn write_field(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        if data.len() != element_count(shape) {
            return Err(FormatError::ShapeMismatch {
                name: name.to_string(),
                expected: shape.to_vec(),
                found: vec![data.len()],
            });
        }
        let open = self.open_file_mut()?;
        open.vars.insert(
            name.to_string(),
            StoredVar {
                shape: Shape::from_slice(shape),
                values: Values::RealStatic(data.to_vec()),
            },
        );
        Ok(())
    }

    fn write_field_record(
        &mut self,
        name: &str,
        data: &[f64],
        shape: &[usize],
    ) -> Result<(), FormatError> {
        if data.len() != element_count(shape) {
            return Err(FormatError::ShapeMismatch {
                name: name.to_string(),
                expected: shape.to_vec(),
                found: vec![data.len()],
            });
        }
        let record = self.record;
        let open = self.open_file_mut()?;
        let var = open.vars.entry(name.to_string()).or_insert(StoredVar {
            shape: Shape::from_slice(shape),
            values: Values::RealRecords(Vec::new()),
        });
        Self::check_shape(var, name, shape)?;
        match &mut var.values {
            Values::RealRecords(records) => Self::place(records, record, name, data.to_vec()),
            _ => Err(FormatError::WrongType {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn sample_vars() -> IndexMap<String, StoredVar> {
        let mut vars = IndexMap::new();
        vars.insert(
            "iteration".to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::IntRecords(vec![1, 2, 3]),
            },
        );
        vars.insert(
            "version".to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::IntStatic(7),
            },
        );
        vars.insert(
            "time".to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::RealRecords(vec![vec![0.0], vec![0.25]]),
            },
        );
        vars.insert(
            "density".to_string(),
            StoredVar {
                shape: smallvec![2, 3],
                values: Values::RealStatic(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            },
        );
        vars
    }

    #[test]
    fn roundtrip_container() {
        let vars = sample_vars();
        let mut buf = Vec::new();
        encode(&mut buf, &vars, false).unwrap();
        let got = decode(&mut buf.as_slice()).unwrap();
        assert_eq!(got, vars);
    }

    #[test]
    fn roundtrip_container_low_precision() {
        let mut vars = IndexMap::new();
        vars.insert(
            "t".to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::RealStatic(vec![1.5]),
            },
        );
        let mut buf = Vec::new();
        encode(&mut buf, &vars, true).unwrap();
        let got = decode(&mut buf.as_slice()).unwrap();
        // 1.5 is exactly representable in f32, so it survives truncation.
        assert_eq!(got, vars);
    }

    #[test]
    fn low_precision_truncates_values() {
        let mut vars = IndexMap::new();
        let exact = 1.0 + f64::EPSILON;
        vars.insert(
            "t".to_string(),
            StoredVar {
                shape: Shape::new(),
                values: Values::RealStatic(vec![exact]),
            },
        );
        let mut buf = Vec::new();
        encode(&mut buf, &vars, true).unwrap();
        let got = decode(&mut buf.as_slice()).unwrap();
        let Values::RealStatic(values) = &got["t"].values else {
            panic!("wrong kind");
        };
        assert_eq!(values[0], f64::from(exact as f32));
        assert_ne!(values[0], exact);
    }

    #[test]
    fn bad_magic_rejected() {
        let data = b"XYRC\x01\x00\x00\x00\x00";
        assert!(matches!(
            decode(&mut data.as_slice()),
            Err(FormatError::InvalidMagic)
        ));
    }

    #[test]
    fn bad_version_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(99);
        assert!(matches!(
            decode(&mut buf.as_slice()),
            Err(FormatError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn unknown_tag_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        write_u8(&mut buf, FORMAT_VERSION).unwrap();
        write_u32_le(&mut buf, 1).unwrap();
        write_str(&mut buf, "x").unwrap();
        write_u8(&mut buf, 9).unwrap(); // bogus tag
        write_u8(&mut buf, 0).unwrap();
        assert!(matches!(
            decode(&mut buf.as_slice()),
            Err(FormatError::Malformed { .. })
        ));
    }

    #[test]
    fn overflowing_shape_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        write_u8(&mut buf, FORMAT_VERSION).unwrap();
        write_u32_le(&mut buf, 1).unwrap();
        write_str(&mut buf, "x").unwrap();
        write_u8(&mut buf, TAG_REAL_STATIC).unwrap();
        write_u8(&mut buf, 3).unwrap();
        for _ in 0..3 {
            write_u32_le(&mut buf, u32::MAX).unwrap();
        }
        assert!(matches!(
            decode(&mut buf.as_slice()),
            Err(FormatError::Malformed { .. })
        ));
    }

    #[test]
    fn huge_record_count_fails_without_exhausting_memory() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        write_u8(&mut buf, FORMAT_VERSION).unwrap();
        write_u32_le(&mut buf, 1).unwrap();
        write_str(&mut buf, "x").unwrap();
        write_u8(&mut buf, TAG_INT_RECORDS).unwrap();
        write_u8(&mut buf, 0).unwrap();
        // Claims u32::MAX records but carries none.
        write_u32_le(&mut buf, u32::MAX).unwrap();
        assert!(matches!(
            decode(&mut buf.as_slice()),
            Err(FormatError::Io(_))
        ));
    }

    #[test]
    fn operations_without_open_fail() {
        let mut fmt = BinaryFormat::new();
        assert!(!fmt.is_valid());
        assert!(matches!(fmt.read_int("x"), Err(FormatError::NotOpen)));
        assert!(matches!(fmt.write_int("x", 1), Err(FormatError::NotOpen)));
    }

    #[test]
    fn writes_rejected_on_read_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.gyrc");

        let mut fmt = BinaryFormat::new();
        fmt.open_write(&path, false).unwrap();
        fmt.write_int("n", 5).unwrap();
        fmt.close().unwrap();

        fmt.open_read(&path).unwrap();
        assert!(matches!(
            fmt.write_int("n", 6),
            Err(FormatError::ReadOnly)
        ));
        assert_eq!(fmt.read_int("n").unwrap(), 5);
        fmt.close().unwrap();
    }

    #[test]
    fn append_extends_record_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.gyrc");

        let mut fmt = BinaryFormat::new();
        for step in 0..3 {
            fmt.open_write(&path, true).unwrap();
            fmt.select_record(RecordIndex::Latest);
            fmt.write_int_record("iteration", step).unwrap();
            fmt.write_real_record("time", f64::from(step) * 0.5).unwrap();
            fmt.close().unwrap();
        }

        fmt.open_read(&path).unwrap();
        fmt.select_record(RecordIndex::Latest);
        assert_eq!(fmt.read_int_record("iteration").unwrap(), 2);
        assert_eq!(fmt.read_real_record("time").unwrap(), 1.0);
        fmt.select_record(RecordIndex::At(0));
        assert_eq!(fmt.read_int_record("iteration").unwrap(), 0);
        fmt.select_record(RecordIndex::At(5));
        assert!(matches!(
            fmt.read_int_record("iteration"),
            Err(FormatError::RecordOutOfRange { index: 5, len: 3, .. })
        ));
        fmt.close().unwrap();
    }

    #[test]
    fn overwrite_mode_discards_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.gyrc");

        let mut fmt = BinaryFormat::new();
        fmt.open_write(&path, false).unwrap();
        fmt.write_int("old", 1).unwrap();
        fmt.close().unwrap();

        fmt.open_write(&path, false).unwrap();
        fmt.write_int("new", 2).unwrap();
        fmt.close().unwrap();

        fmt.open_read(&path).unwrap();
        assert!(matches!(
            fmt.read_int("old"),
            Err(FormatError::VariableNotFound { .. })
        ));
        assert_eq!(fmt.read_int("new").unwrap(), 2);
        fmt.close().unwrap();
    }

    #[test]
    fn field_shape_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.gyrc");

        let mut fmt = BinaryFormat::new();
        fmt.open_write(&path, false).unwrap();
        fmt.write_field("density", &[1.0, 2.0, 3.0, 4.0], &[2, 2])
            .unwrap();
        assert!(matches!(
            fmt.write_field("broken", &[1.0], &[2, 2]),
            Err(FormatError::ShapeMismatch { .. })
        ));
        fmt.close().unwrap();

        fmt.open_read(&path).unwrap();
        let mut dest = [0.0; 4];
        fmt.read_field("density", &mut dest, &[2, 2]).unwrap();
        assert_eq!(dest, [1.0, 2.0, 3.0, 4.0]);
        let mut wrong = [0.0; 6];
        assert!(matches!(
            fmt.read_field("density", &mut wrong, &[3, 2]),
            Err(FormatError::ShapeMismatch { .. })
        ));
        fmt.close().unwrap();
    }

    #[test]
    fn static_read_of_record_series_is_wrong_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kind.gyrc");

        let mut fmt = BinaryFormat::new();
        fmt.open_write(&path, false).unwrap();
        fmt.write_int_record("iteration", 1).unwrap();
        fmt.close().unwrap();

        fmt.open_read(&path).unwrap();
        assert!(matches!(
            fmt.read_int("iteration"),
            Err(FormatError::WrongType { .. })
        ));
        fmt.close().unwrap();
    }
}
