//! The variable registry: typed binding lists with cross-kind name
//! uniqueness.
//!
//! A binding associates a name with shared, caller-owned storage
//! (`Rc<RefCell<T>>`) and a growing flag; vector bindings additionally
//! capture the vector's covariance flag at registration time. Bindings
//! are only ever appended — the registry never removes or mutates them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use gyre_core::{Field2D, Field3D, Vector2D, Vector3D};
use indexmap::IndexSet;

use crate::error::DatafileError;

/// The six variable kinds a registry can hold, in transfer order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// Scalar integer.
    Int,
    /// Scalar real.
    Real,
    /// 2D scalar field.
    Field2D,
    /// 3D scalar field.
    Field3D,
    /// 2D vector field.
    Vector2D,
    /// 3D vector field.
    Vector3D,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "integer"),
            Self::Real => write!(f, "real"),
            Self::Field2D => write!(f, "2D field"),
            Self::Field3D => write!(f, "3D field"),
            Self::Vector2D => write!(f, "2D vector"),
            Self::Vector3D => write!(f, "3D vector"),
        }
    }
}

/// One registered scalar or field variable.
pub(crate) struct Binding<T> {
    pub(crate) name: String,
    pub(crate) var: Rc<RefCell<T>>,
    pub(crate) growing: bool,
}

/// One registered vector variable.
///
/// `covariant` is copied from the vector at registration and fixed for
/// the binding's lifetime; it selects both the on-disk component-name
/// suffix and the basis the components are converted to before writing.
pub(crate) struct VectorBinding<T> {
    pub(crate) name: String,
    pub(crate) var: Rc<RefCell<T>>,
    pub(crate) growing: bool,
    pub(crate) covariant: bool,
}

/// Typed binding lists for one datafile.
///
/// Names are unique across all six kinds; registering a name twice fails
/// with [`DatafileError::DuplicateName`] no matter which kinds are
/// involved. Insertion order within each kind is preserved and determines
/// write order.
#[derive(Default)]
pub struct VarRegistry {
    names: IndexSet<String>,
    pub(crate) ints: Vec<Binding<i32>>,
    pub(crate) reals: Vec<Binding<f64>>,
    pub(crate) fields_2d: Vec<Binding<Field2D>>,
    pub(crate) fields_3d: Vec<Binding<Field3D>>,
    pub(crate) vectors_2d: Vec<VectorBinding<Vector2D>>,
    pub(crate) vectors_3d: Vec<VectorBinding<Vector3D>>,
}

impl VarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a name is registered, under any kind.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Total number of registered variables across all kinds.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry holds no variables.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reserve a name, enforcing non-emptiness and cross-kind uniqueness.
    fn claim(&mut self, name: &str) -> Result<(), DatafileError> {
        if name.is_empty() {
            return Err(DatafileError::EmptyName);
        }
        if !self.names.insert(name.to_string()) {
            return Err(DatafileError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Register a scalar integer.
    pub fn add_int(
        &mut self,
        name: &str,
        var: Rc<RefCell<i32>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        self.ints.push(Binding {
            name: name.to_string(),
            var,
            growing,
        });
        Ok(())
    }

    /// Register a scalar real.
    pub fn add_real(
        &mut self,
        name: &str,
        var: Rc<RefCell<f64>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        self.reals.push(Binding {
            name: name.to_string(),
            var,
            growing,
        });
        Ok(())
    }

    /// Register a 2D scalar field.
    pub fn add_field_2d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Field2D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        self.fields_2d.push(Binding {
            name: name.to_string(),
            var,
            growing,
        });
        Ok(())
    }

    /// Register a 3D scalar field.
    pub fn add_field_3d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Field3D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        self.fields_3d.push(Binding {
            name: name.to_string(),
            var,
            growing,
        });
        Ok(())
    }

    /// Register a 2D vector, capturing its current covariance flag.
    pub fn add_vector_2d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Vector2D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        let covariant = var.borrow().covariant;
        self.vectors_2d.push(VectorBinding {
            name: name.to_string(),
            var,
            growing,
            covariant,
        });
        Ok(())
    }

    /// Register a 3D vector, capturing its current covariance flag.
    pub fn add_vector_3d(
        &mut self,
        name: &str,
        var: Rc<RefCell<Vector3D>>,
        growing: bool,
    ) -> Result<(), DatafileError> {
        self.claim(name)?;
        let covariant = var.borrow().covariant;
        self.vectors_3d.push(VectorBinding {
            name: name.to_string(),
            var,
            growing,
            covariant,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn int_var(v: i32) -> Rc<RefCell<i32>> {
        Rc::new(RefCell::new(v))
    }

    #[test]
    fn empty_registry() {
        let reg = VarRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(!reg.contains("anything"));
    }

    #[test]
    fn register_then_contains() {
        let mut reg = VarRegistry::new();
        reg.add_int("iteration", int_var(0), true).unwrap();
        assert!(reg.contains("iteration"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn empty_name_rejected() {
        let mut reg = VarRegistry::new();
        assert!(matches!(
            reg.add_real("", Rc::new(RefCell::new(0.0)), false),
            Err(DatafileError::EmptyName)
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_across_kinds_rejected() {
        let mut reg = VarRegistry::new();
        reg.add_int("n", int_var(0), false).unwrap();
        let err = reg
            .add_field_3d("n", Rc::new(RefCell::new(Field3D::new())), true)
            .unwrap_err();
        assert!(matches!(err, DatafileError::DuplicateName { name } if name == "n"));
        assert_eq!(reg.len(), 1);
        assert!(reg.fields_3d.is_empty());
    }

    #[test]
    fn covariance_captured_at_registration() {
        let mut reg = VarRegistry::new();
        let v = Rc::new(RefCell::new(Vector3D::new()));
        v.borrow_mut().covariant = true;
        reg.add_vector_3d("B", v.clone(), true).unwrap();
        // Later flips do not affect the binding.
        v.borrow_mut().covariant = false;
        assert!(reg.vectors_3d[0].covariant);
    }

    proptest! {
        /// Any second registration under an existing name fails, whatever
        /// the kind combination, and leaves exactly one binding behind.
        #[test]
        fn duplicates_rejected_in_any_kind_order(first in 0usize..6, second in 0usize..6) {
            let mut reg = VarRegistry::new();
            let add = |reg: &mut VarRegistry, kind: usize| match kind {
                0 => reg.add_int("x", Rc::new(RefCell::new(0)), false),
                1 => reg.add_real("x", Rc::new(RefCell::new(0.0)), true),
                2 => reg.add_field_2d("x", Rc::new(RefCell::new(Field2D::new())), false),
                3 => reg.add_field_3d("x", Rc::new(RefCell::new(Field3D::new())), true),
                4 => reg.add_vector_2d("x", Rc::new(RefCell::new(Vector2D::new())), false),
                _ => reg.add_vector_3d("x", Rc::new(RefCell::new(Vector3D::new())), true),
            };
            add(&mut reg, first).unwrap();
            let err = add(&mut reg, second).unwrap_err();
            let is_duplicate = matches!(&err, DatafileError::DuplicateName { .. });
            prop_assert!(is_duplicate, "unexpected error: {:?}", err);
            prop_assert_eq!(reg.len(), 1);
            let bindings = reg.ints.len()
                + reg.reals.len()
                + reg.fields_2d.len()
                + reg.fields_3d.len()
                + reg.vectors_2d.len()
                + reg.vectors_3d.len();
            prop_assert_eq!(bindings, 1);
        }
    }
}
