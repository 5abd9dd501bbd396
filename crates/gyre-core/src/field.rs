//! Optionally-allocated scalar fields over a [`Mesh`].
//!
//! A fresh field carries no storage. The checkpoint layer allocates on
//! demand before reading into a field, and skips unallocated fields when
//! writing. Data is a flat row-major `Vec<f64>`: `[i][j]` maps to
//! `i * ny + j` in 2D, `[i][j][k]` to `(i * ny + j) * nz + k` in 3D.

use crate::mesh::Mesh;

/// A 2D scalar field with deferred allocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field2D {
    nx: usize,
    ny: usize,
    data: Option<Vec<f64>>,
}

impl Field2D {
    /// Create an unallocated field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-initialized field sized for `mesh`.
    pub fn zeros(mesh: &Mesh) -> Self {
        Self {
            nx: mesh.nx,
            ny: mesh.ny,
            data: Some(vec![0.0; mesh.len_2d()]),
        }
    }

    /// Whether the field currently has storage.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Allocate zero-initialized storage sized for `mesh`.
    ///
    /// No-op if the field is already allocated; existing data is kept.
    pub fn allocate(&mut self, mesh: &Mesh) {
        if self.data.is_none() {
            self.nx = mesh.nx;
            self.ny = mesh.ny;
            self.data = Some(vec![0.0; mesh.len_2d()]);
        }
    }

    /// Set every cell to zero. No-op if unallocated.
    pub fn set_zero(&mut self) {
        self.fill(0.0);
    }

    /// Set every cell to `value`. No-op if unallocated.
    pub fn fill(&mut self, value: f64) {
        if let Some(data) = &mut self.data {
            data.fill(value);
        }
    }

    /// Multiply every cell by `factor`. No-op if unallocated.
    pub fn scale(&mut self, factor: f64) {
        if let Some(data) = &mut self.data {
            for v in data.iter_mut() {
                *v *= factor;
            }
        }
    }

    /// The field data as a flat slice, or `None` if unallocated.
    pub fn data(&self) -> Option<&[f64]> {
        self.data.as_deref()
    }

    /// The field data as a mutable flat slice, or `None` if unallocated.
    pub fn data_mut(&mut self) -> Option<&mut [f64]> {
        self.data.as_deref_mut()
    }

    /// Extent in the first dimension (zero while unallocated).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Extent in the second dimension (zero while unallocated).
    pub fn ny(&self) -> usize {
        self.ny
    }
}

/// A 3D scalar field with deferred allocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field3D {
    nx: usize,
    ny: usize,
    nz: usize,
    data: Option<Vec<f64>>,
}

impl Field3D {
    /// Create an unallocated field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-initialized field sized for `mesh`.
    pub fn zeros(mesh: &Mesh) -> Self {
        Self {
            nx: mesh.nx,
            ny: mesh.ny,
            nz: mesh.nz,
            data: Some(vec![0.0; mesh.len_3d()]),
        }
    }

    /// Whether the field currently has storage.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Allocate zero-initialized storage sized for `mesh`.
    ///
    /// No-op if the field is already allocated; existing data is kept.
    pub fn allocate(&mut self, mesh: &Mesh) {
        if self.data.is_none() {
            self.nx = mesh.nx;
            self.ny = mesh.ny;
            self.nz = mesh.nz;
            self.data = Some(vec![0.0; mesh.len_3d()]);
        }
    }

    /// Set every cell to zero. No-op if unallocated.
    pub fn set_zero(&mut self) {
        self.fill(0.0);
    }

    /// Set every cell to `value`. No-op if unallocated.
    pub fn fill(&mut self, value: f64) {
        if let Some(data) = &mut self.data {
            data.fill(value);
        }
    }

    /// Multiply every cell by `factor`. No-op if unallocated.
    pub fn scale(&mut self, factor: f64) {
        if let Some(data) = &mut self.data {
            for v in data.iter_mut() {
                *v *= factor;
            }
        }
    }

    /// The field data as a flat slice, or `None` if unallocated.
    pub fn data(&self) -> Option<&[f64]> {
        self.data.as_deref()
    }

    /// The field data as a mutable flat slice, or `None` if unallocated.
    pub fn data_mut(&mut self) -> Option<&mut [f64]> {
        self.data.as_deref_mut()
    }

    /// Extent in the first dimension (zero while unallocated).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Extent in the second dimension (zero while unallocated).
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Extent in the third dimension (zero while unallocated).
    pub fn nz(&self) -> usize {
        self.nz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> Mesh {
        Mesh::new(3, 4, 2)
    }

    #[test]
    fn new_field_is_unallocated() {
        let f = Field2D::new();
        assert!(!f.is_allocated());
        assert!(f.data().is_none());
        assert_eq!(f.nx(), 0);
    }

    #[test]
    fn allocate_sizes_from_mesh() {
        let mut f = Field2D::new();
        f.allocate(&mesh());
        assert!(f.is_allocated());
        assert_eq!(f.data().map(<[f64]>::len), Some(12));
        assert_eq!((f.nx(), f.ny()), (3, 4));
    }

    #[test]
    fn allocate_twice_keeps_data() {
        let mut f = Field2D::zeros(&mesh());
        f.fill(7.5);
        f.allocate(&mesh());
        assert!(f.data().is_some_and(|d| d.iter().all(|&v| v == 7.5)));
    }

    #[test]
    fn set_zero_clears_allocated_field() {
        let mut f = Field3D::zeros(&mesh());
        f.fill(-2.0);
        f.set_zero();
        assert!(f.data().is_some_and(|d| d.iter().all(|&v| v == 0.0)));
        assert_eq!(f.data().map(<[f64]>::len), Some(24));
    }

    #[test]
    fn set_zero_on_unallocated_is_noop() {
        let mut f = Field3D::new();
        f.set_zero();
        assert!(!f.is_allocated());
    }

    #[test]
    fn scale_multiplies_every_cell() {
        let mut f = Field2D::zeros(&mesh());
        f.fill(3.0);
        f.scale(-2.0);
        assert!(f.data().is_some_and(|d| d.iter().all(|&v| v == -6.0)));
    }

    #[test]
    fn zeros_matches_allocate_then_zero() {
        let mut a = Field3D::new();
        a.allocate(&mesh());
        let b = Field3D::zeros(&mesh());
        assert_eq!(a, b);
    }
}
