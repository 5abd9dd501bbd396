//! Closed trait sets unifying the six variable kinds for transfer.
//!
//! The orchestrator drives one generic loop per trait instead of one
//! hand-written loop per kind: [`ScalarVar`] covers `i32`/`f64`,
//! [`FieldVar`] covers `Field2D`/`Field3D`, and [`VectorVar`] covers
//! `Vector2D`/`Vector3D`. The growing/static branch and the read-miss
//! fallback therefore each exist in exactly one place.

use gyre_core::{Field2D, Field3D, Mesh, Shape, Vector2D, Vector3D};

use crate::error::FormatError;
use crate::format::DataFormat;
use crate::registry::VarKind;

/// A scalar value the driver can transfer directly.
pub(crate) trait ScalarVar: Copy {
    /// Kind label used in warnings and miss reports.
    const KIND: VarKind;
    /// The zero-fill value used when a read misses.
    const ZERO: Self;

    fn read(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError>;
    fn read_record(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError>;
    fn write(file: &mut dyn DataFormat, name: &str, value: Self) -> Result<(), FormatError>;
    fn write_record(file: &mut dyn DataFormat, name: &str, value: Self)
        -> Result<(), FormatError>;
}

impl ScalarVar for i32 {
    const KIND: VarKind = VarKind::Int;
    const ZERO: Self = 0;

    fn read(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError> {
        file.read_int(name)
    }

    fn read_record(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError> {
        file.read_int_record(name)
    }

    fn write(file: &mut dyn DataFormat, name: &str, value: Self) -> Result<(), FormatError> {
        file.write_int(name, value)
    }

    fn write_record(
        file: &mut dyn DataFormat,
        name: &str,
        value: Self,
    ) -> Result<(), FormatError> {
        file.write_int_record(name, value)
    }
}

impl ScalarVar for f64 {
    const KIND: VarKind = VarKind::Real;
    const ZERO: Self = 0.0;

    fn read(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError> {
        file.read_real(name)
    }

    fn read_record(file: &mut dyn DataFormat, name: &str) -> Result<Self, FormatError> {
        file.read_real_record(name)
    }

    fn write(file: &mut dyn DataFormat, name: &str, value: Self) -> Result<(), FormatError> {
        file.write_real(name, value)
    }

    fn write_record(
        file: &mut dyn DataFormat,
        name: &str,
        value: Self,
    ) -> Result<(), FormatError> {
        file.write_real_record(name, value)
    }
}

/// A scalar field the driver can transfer as a flat slice plus shape.
pub(crate) trait FieldVar: Clone {
    /// Kind label used in warnings and miss reports.
    const KIND: VarKind;

    /// The transfer shape of this field kind on the given mesh.
    fn shape(mesh: &Mesh) -> Shape;

    /// Allocate if needed and return the flat storage.
    fn ensure_allocated(&mut self, mesh: &Mesh) -> &mut [f64];

    /// Zero-fill (the read-miss fallback value).
    fn set_zero(&mut self);

    /// Flat storage, or `None` while unallocated.
    fn data(&self) -> Option<&[f64]>;
}

impl FieldVar for Field2D {
    const KIND: VarKind = VarKind::Field2D;

    fn shape(mesh: &Mesh) -> Shape {
        mesh.shape_2d()
    }

    fn ensure_allocated(&mut self, mesh: &Mesh) -> &mut [f64] {
        self.allocate(mesh);
        self.data_mut().unwrap_or_default()
    }

    fn set_zero(&mut self) {
        self.set_zero();
    }

    fn data(&self) -> Option<&[f64]> {
        self.data()
    }
}

impl FieldVar for Field3D {
    const KIND: VarKind = VarKind::Field3D;

    fn shape(mesh: &Mesh) -> Shape {
        mesh.shape_3d()
    }

    fn ensure_allocated(&mut self, mesh: &Mesh) -> &mut [f64] {
        self.allocate(mesh);
        self.data_mut().unwrap_or_default()
    }

    fn set_zero(&mut self) {
        self.set_zero();
    }

    fn data(&self) -> Option<&[f64]> {
        self.data()
    }
}

/// A three-component vector transferred via its scalar components.
pub(crate) trait VectorVar: Clone {
    /// The component field kind.
    type Component: FieldVar;

    /// The components in x, y, z order.
    fn components(&self) -> [&Self::Component; 3];

    /// The components in x, y, z order, mutably.
    fn components_mut(&mut self) -> [&mut Self::Component; 3];

    /// Set the covariance flag without converting values.
    fn set_covariant(&mut self, covariant: bool);

    /// A copy converted to the requested basis; the original is untouched.
    fn converted_copy(&self, covariant: bool, mesh: &Mesh) -> Self;
}

impl VectorVar for Vector2D {
    type Component = Field2D;

    fn components(&self) -> [&Field2D; 3] {
        [&self.x, &self.y, &self.z]
    }

    fn components_mut(&mut self) -> [&mut Field2D; 3] {
        [&mut self.x, &mut self.y, &mut self.z]
    }

    fn set_covariant(&mut self, covariant: bool) {
        self.covariant = covariant;
    }

    fn converted_copy(&self, covariant: bool, mesh: &Mesh) -> Self {
        let mut copy = self.clone();
        if covariant {
            copy.to_covariant(mesh);
        } else {
            copy.to_contravariant(mesh);
        }
        copy
    }
}

impl VectorVar for Vector3D {
    type Component = Field3D;

    fn components(&self) -> [&Field3D; 3] {
        [&self.x, &self.y, &self.z]
    }

    fn components_mut(&mut self) -> [&mut Field3D; 3] {
        [&mut self.x, &mut self.y, &mut self.z]
    }

    fn set_covariant(&mut self, covariant: bool) {
        self.covariant = covariant;
    }

    fn converted_copy(&self, covariant: bool, mesh: &Mesh) -> Self {
        let mut copy = self.clone();
        if covariant {
            copy.to_covariant(mesh);
        } else {
            copy.to_contravariant(mesh);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyre_core::Metric;

    #[test]
    fn field_shapes_follow_mesh() {
        let mesh = Mesh::new(5, 4, 3);
        assert_eq!(<Field2D as FieldVar>::shape(&mesh).as_slice(), &[5, 4]);
        assert_eq!(<Field3D as FieldVar>::shape(&mesh).as_slice(), &[5, 4, 3]);
    }

    #[test]
    fn ensure_allocated_provides_storage() {
        let mesh = Mesh::new(2, 3, 1);
        let mut f = Field2D::new();
        assert_eq!(FieldVar::ensure_allocated(&mut f, &mesh).len(), 6);
        assert!(f.is_allocated());
    }

    #[test]
    fn converted_copy_leaves_original_untouched() {
        let mesh = Mesh::with_metric(2, 2, 2, Metric::diagonal([3.0, 3.0, 3.0]));
        let mut v = Vector3D::zeros(&mesh);
        v.x.fill(1.0);
        let copy = v.converted_copy(true, &mesh);
        assert!(copy.covariant);
        assert_eq!(copy.x.data().and_then(|d| d.first().copied()), Some(3.0));
        assert!(!v.covariant);
        assert_eq!(v.x.data().and_then(|d| d.first().copied()), Some(1.0));
    }
}
