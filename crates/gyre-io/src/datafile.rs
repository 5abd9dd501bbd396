//! The [`Datafile`] orchestrator.
//!
//! A `Datafile` pairs a registry of caller-owned variables with one format
//! driver and moves every registered variable between memory and one file
//! per call. Registration is incremental; `read`, `write` and `append` are
//! whole-file passes that open, transfer everything, and close.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use gyre_core::{Field2D, Field3D, Mesh, Vector2D, Vector3D};
use tracing::{debug, warn};

use crate::components::component_names;
use crate::context::IoRuntime;
use crate::error::DatafileError;
use crate::factory::create_format;
use crate::format::{DataFormat, RecordIndex};
use crate::registry::{Binding, VarKind, VarRegistry, VectorBinding};
use crate::transfer::{FieldVar, ScalarVar, VectorVar};

/// One variable that fell back to zero during a read pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingVar {
    /// The on-disk variable name that was not found (for vectors, the
    /// individual component name).
    pub name: String,
    /// The kind of the registered variable the fallback applied to.
    pub kind: VarKind,
}

/// The report of one read pass.
///
/// A read pass succeeds as soon as the file opens and validates; variables
/// absent from the file are zero-filled and listed here rather than failing
/// the pass.
#[derive(Clone, Debug, Default)]
pub struct ReadOutcome {
    /// Variables that were zero-filled because the file lacked them.
    pub missing: Vec<MissingVar>,
}

impl ReadOutcome {
    /// Whether every registered variable was found in the file.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Checkpoint/restart orchestrator over one format driver.
///
/// Variables are registered once with shared storage; each subsequent
/// pass transfers all of them. The registry holds `Rc<RefCell<_>>`
/// handles, so the caller keeps ownership and may mutate values between
/// calls. Holding a borrow across a call is a contract violation and
/// panics.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::sync::Arc;
///
/// use gyre_core::Mesh;
/// use gyre_io::{BinaryFormat, Datafile, IoRuntime};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("state.gyrc");
/// let mesh = Arc::new(Mesh::new(4, 4, 2));
/// let runtime = Arc::new(IoRuntime::new());
///
/// let mut out = Datafile::new(Box::new(BinaryFormat::new()), mesh.clone(), runtime.clone());
/// let iteration = Rc::new(RefCell::new(42));
/// out.add_int("iteration", iteration.clone(), false)?;
/// out.write(&path)?;
///
/// let mut checkpoint = Datafile::new(Box::new(BinaryFormat::new()), mesh, runtime);
/// let restored = Rc::new(RefCell::new(0));
/// checkpoint.add_int("iteration", restored.clone(), false)?;
/// let outcome = checkpoint.read(&path)?;
/// assert!(outcome.is_complete());
/// assert_eq!(*restored.borrow(), 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Datafile {
    format: Box<dyn DataFormat>,
    registry: VarRegistry,
    mesh: Arc<Mesh>,
    runtime: Arc<IoRuntime>,
    low_precision: bool,
    default_filename: Option<PathBuf>,
}

impl Datafile {
    /// Create a datafile over the given driver, mesh and shared runtime.
    pub fn new(format: Box<dyn DataFormat>, mesh: Arc<Mesh>, runtime: Arc<IoRuntime>) -> Self {
        Self {
            format,
            registry: VarRegistry::new(),
            mesh,
            runtime,
            low_precision: false,
            default_filename: None,
        }
    }

    /// Replace the format driver, discarding the previous one.
    ///
    /// The sticky low-precision mode is re-applied to the new driver.
    pub fn set_format(&mut self, format: Box<dyn DataFormat>) {
        self.format = format;
        if self.low_precision {
            self.format.set_low_precision();
        }
    }

    /// Replace the format driver by factory name.
    pub fn set_format_by_name(&mut self, name: &str) -> Result<(), DatafileError> {
        let format = create_format(name)?;
        self.set_format(format);
        Ok(())
    }

    /// Store real values in reduced precision from now on.
    ///
    /// Applies to the bound driver immediately and sticks across
    /// [`set_format`](Self::set_format) replacements.
    pub fn set_low_precision(&mut self) {
        self.low_precision = true;
        self.format.set_low_precision();
    }

    /// Configure the filename used by the `*_default` passes.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.default_filename = Some(path.into());
    }

    /// Drop the configured default filename.
    pub fn clear_filename(&mut self) {
        self.default_filename = None;
    }

    /// The shared runtime context this datafile reports into.
    pub fn runtime(&self) -> &Arc<IoRuntime> {
        &self.runtime
    }

    /// The variable registry.
    pub fn registry(&self) -> &VarRegistry {
        &self.registry
    }

    // ── Registration ─────────────────────────────────────────────────────

    /// Register a scalar integer.
    pub fn add_int(
        &mut self,
        name: &str,
        var: Rc<RefCell<i32>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_int(name, var, growing)
    }

    /// Register a scalar real.
    pub fn add_real(
        &mut self,
        name: &str,
        var: Rc<RefCell<f64>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_real(name, var, growing)
    }

    /// Register a 2D scalar field.
    pub fn add_field_2d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Field2D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_field_2d(name, var, growing)
    }

    /// Register a 3D scalar field.
    pub fn add_field_3d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Field3D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_field_3d(name, var, growing)
    }

    /// Register a 2D vector. The vector's current covariance flag decides
    /// its on-disk component names and write basis for good.
    pub fn add_vector_2d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Vector2D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_vector_2d(name, var, growing)
    }

    /// Register a 3D vector. The vector's current covariance flag decides
    /// its on-disk component names and write basis for good.
    pub fn add_vector_3d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Vector3D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.registry.add_vector_3d(name, var, growing)
    }

    // ── Whole-file passes ────────────────────────────────────────────────

    /// Read every registered variable from `path`.
    ///
    /// Variables missing from the file are zero-filled, reported through
    /// a warning event, and listed in the returned [`ReadOutcome`]; only
    /// open/validate/close failures produce an `Err`.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<ReadOutcome, DatafileError> {
        let path = path.as_ref();
        check_filename(path)?;

        let started = Instant::now();
        self.format
            .open_read(path)
            .map_err(|source| DatafileError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
        if !self.format.is_valid() {
            return Err(DatafileError::InvalidHandle {
                path: path.to_path_buf(),
            });
        }
        self.format.select_record(RecordIndex::Latest);

        let mut missing = Vec::new();
        let file = self.format.as_mut();
        for binding in &self.registry.ints {
            read_scalar(file, binding, &mut missing);
        }
        for binding in &self.registry.reals {
            read_scalar(file, binding, &mut missing);
        }
        for binding in &self.registry.fields_2d {
            read_field(file, &self.mesh, binding, &mut missing);
        }
        for binding in &self.registry.fields_3d {
            read_field(file, &self.mesh, binding, &mut missing);
        }
        for binding in &self.registry.vectors_2d {
            read_vector(file, &self.mesh, binding, &mut missing);
        }
        for binding in &self.registry.vectors_3d {
            read_vector(file, &self.mesh, binding, &mut missing);
        }

        self.format
            .close()
            .map_err(|source| DatafileError::CloseFailed {
                path: path.to_path_buf(),
                source,
            })?;

        self.runtime.record_elapsed(started.elapsed());
        debug!(path = %path.display(), missing = missing.len(), "read pass complete");
        Ok(ReadOutcome { missing })
    }

    /// Read from the configured default filename.
    pub fn read_default(&mut self) -> Result<ReadOutcome, DatafileError> {
        let path = self.default_path()?;
        self.read(path)
    }

    /// Write every registered variable to `path`, replacing the file.
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<(), DatafileError> {
        self.write_file(path.as_ref(), false)
    }

    /// Write every registered variable to `path`, extending existing
    /// record series instead of replacing them.
    pub fn append(&mut self, path: impl AsRef<Path>) -> Result<(), DatafileError> {
        self.write_file(path.as_ref(), true)
    }

    /// Write to the configured default filename.
    pub fn write_default(&mut self) -> Result<(), DatafileError> {
        let path = self.default_path()?;
        self.write_file(&path, false)
    }

    /// Append to the configured default filename.
    pub fn append_default(&mut self) -> Result<(), DatafileError> {
        let path = self.default_path()?;
        self.write_file(&path, true)
    }

    fn default_path(&self) -> Result<PathBuf, DatafileError> {
        self.default_filename
            .clone()
            .ok_or(DatafileError::NoFilename)
    }

    fn write_file(&mut self, path: &Path, append: bool) -> Result<(), DatafileError> {
        check_filename(path)?;
        if !self.runtime.is_enabled() {
            return Ok(());
        }

        let started = Instant::now();
        self.format
            .open_write(path, append)
            .map_err(|source| DatafileError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
        if !self.format.is_valid() {
            return Err(DatafileError::InvalidHandle {
                path: path.to_path_buf(),
            });
        }
        self.format.select_record(RecordIndex::Latest);

        let file = self.format.as_mut();
        for binding in &self.registry.ints {
            write_scalar(file, binding);
        }
        for binding in &self.registry.reals {
            write_scalar(file, binding);
        }
        for binding in &self.registry.fields_2d {
            write_field(file, &self.mesh, binding);
        }
        for binding in &self.registry.fields_3d {
            write_field(file, &self.mesh, binding);
        }
        for binding in &self.registry.vectors_2d {
            write_vector(file, &self.mesh, binding);
        }
        for binding in &self.registry.vectors_3d {
            write_vector(file, &self.mesh, binding);
        }

        self.format
            .close()
            .map_err(|source| DatafileError::CloseFailed {
                path: path.to_path_buf(),
                source,
            })?;

        self.runtime.record_elapsed(started.elapsed());
        debug!(path = %path.display(), append, "write pass complete");
        Ok(())
    }
}

fn check_filename(path: &Path) -> Result<(), DatafileError> {
    if path.as_os_str().is_empty() {
        return Err(DatafileError::EmptyFilename);
    }
    Ok(())
}

// ── Generic transfer helpers ─────────────────────────────────────────────
//
// One loop body per trait. The growing/static branch and the read-miss
// fallback live here and nowhere else.

fn read_scalar<T: ScalarVar>(
    file: &mut dyn DataFormat,
    binding: &Binding<T>,
    missing: &mut Vec<MissingVar>,
) {
    let result = if binding.growing {
        T::read_record(file, &binding.name)
    } else {
        T::read(file, &binding.name)
    };
    match result {
        Ok(value) => *binding.var.borrow_mut() = value,
        Err(e) => {
            warn!(name = %binding.name, kind = %T::KIND, error = %e, "variable not read, using zero");
            *binding.var.borrow_mut() = T::ZERO;
            missing.push(MissingVar {
                name: binding.name.clone(),
                kind: T::KIND,
            });
        }
    }
}

/// Reads one field variable under `name`, zero-filling on any driver error.
/// Shared between the field loop and the per-component vector path.
fn read_field_var<F: FieldVar>(
    file: &mut dyn DataFormat,
    mesh: &Mesh,
    name: &str,
    growing: bool,
    var: &mut F,
    missing: &mut Vec<MissingVar>,
) {
    let shape = F::shape(mesh);
    let dest = var.ensure_allocated(mesh);
    let result = if growing {
        file.read_field_record(name, dest, &shape)
    } else {
        file.read_field(name, dest, &shape)
    };
    if let Err(e) = result {
        warn!(name = %name, kind = %F::KIND, error = %e, "variable not read, using zeroes");
        var.set_zero();
        missing.push(MissingVar {
            name: name.to_string(),
            kind: F::KIND,
        });
    }
}

fn read_field<F: FieldVar>(
    file: &mut dyn DataFormat,
    mesh: &Mesh,
    binding: &Binding<F>,
    missing: &mut Vec<MissingVar>,
) {
    let mut var = binding.var.borrow_mut();
    read_field_var(file, mesh, &binding.name, binding.growing, &mut *var, missing);
}

fn read_vector<V: VectorVar>(
    file: &mut dyn DataFormat,
    mesh: &Mesh,
    binding: &VectorBinding<V>,
    missing: &mut Vec<MissingVar>,
) {
    let names = component_names(&binding.name, binding.covariant);
    let mut var = binding.var.borrow_mut();
    for (name, component) in names.iter().zip(var.components_mut()) {
        read_field_var(file, mesh, name, binding.growing, component, missing);
    }
    // The stored components are already in the registered basis; only the
    // flag needs restoring, no value conversion.
    var.set_covariant(binding.covariant);
}

fn write_scalar<T: ScalarVar>(file: &mut dyn DataFormat, binding: &Binding<T>) {
    let value = *binding.var.borrow();
    let result = if binding.growing {
        T::write_record(file, &binding.name, value)
    } else {
        T::write(file, &binding.name, value)
    };
    if let Err(e) = result {
        warn!(name = %binding.name, error = %e, "variable not written");
    }
}

/// Writes one field variable under `name`. Unallocated fields are skipped
/// without a warning; a checkpoint simply omits what was never computed.
fn write_field_var<F: FieldVar>(
    file: &mut dyn DataFormat,
    mesh: &Mesh,
    name: &str,
    growing: bool,
    var: &F,
) {
    let Some(data) = var.data() else {
        return;
    };
    let shape = F::shape(mesh);
    let result = if growing {
        file.write_field_record(name, data, &shape)
    } else {
        file.write_field(name, data, &shape)
    };
    if let Err(e) = result {
        warn!(name = %name, error = %e, "variable not written");
    }
}

fn write_field<F: FieldVar>(file: &mut dyn DataFormat, mesh: &Mesh, binding: &Binding<F>) {
    let var = binding.var.borrow();
    write_field_var(file, mesh, &binding.name, binding.growing, &*var);
}

fn write_vector<V: VectorVar>(file: &mut dyn DataFormat, mesh: &Mesh, binding: &VectorBinding<V>) {
    // Convert a snapshot to the registered basis; the caller's vector is
    // left exactly as registered.
    let snapshot = binding.var.borrow().converted_copy(binding.covariant, mesh);
    let names = component_names(&binding.name, binding.covariant);
    for (name, component) in names.iter().zip(snapshot.components()) {
        write_field_var(file, mesh, name, binding.growing, component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryFormat;

    fn make(mesh: Mesh) -> Datafile {
        Datafile::new(
            Box::new(BinaryFormat::new()),
            Arc::new(mesh),
            Arc::new(IoRuntime::new()),
        )
    }

    #[test]
    fn empty_filename_rejected_before_io() {
        let mut df = make(Mesh::new(2, 2, 2));
        assert!(matches!(df.write(""), Err(DatafileError::EmptyFilename)));
        assert!(matches!(df.read(""), Err(DatafileError::EmptyFilename)));
    }

    #[test]
    fn default_passes_need_a_filename() {
        let mut df = make(Mesh::new(2, 2, 2));
        assert!(matches!(df.write_default(), Err(DatafileError::NoFilename)));
        assert!(matches!(
            df.append_default(),
            Err(DatafileError::NoFilename)
        ));
        assert!(matches!(df.read_default(), Err(DatafileError::NoFilename)));
    }

    #[test]
    fn clear_filename_forgets_the_default() {
        let mut df = make(Mesh::new(2, 2, 2));
        df.set_filename("dump.gyrc");
        df.clear_filename();
        assert!(matches!(df.write_default(), Err(DatafileError::NoFilename)));
    }

    #[test]
    fn open_failure_reports_path() {
        let mut df = make(Mesh::new(2, 2, 2));
        let err = df.read("/nonexistent/state.gyrc").unwrap_err();
        match err {
            DatafileError::OpenFailed { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/state.gyrc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn registration_delegates_duplicate_check() {
        let mut df = make(Mesh::new(2, 2, 2));
        df.add_int("n", Rc::new(RefCell::new(0)), false).unwrap();
        assert!(matches!(
            df.add_real("n", Rc::new(RefCell::new(0.0)), true),
            Err(DatafileError::DuplicateName { .. })
        ));
        assert!(df.registry().contains("n"));
    }
}
