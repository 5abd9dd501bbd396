//! Three-component vector fields with a covariant/contravariant basis flag.
//!
//! A vector carries its current basis in the `covariant` flag; conversion
//! against a mesh's diagonal metric is a per-axis scale, not a relabeling.
//! Converting to the basis a vector is already in is a no-op.

use crate::field::{Field2D, Field3D};
use crate::mesh::Mesh;

/// A 2D vector field: three [`Field2D`] components plus a basis flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector2D {
    /// First component.
    pub x: Field2D,
    /// Second component.
    pub y: Field2D,
    /// Third component.
    pub z: Field2D,
    /// Whether the components are currently expressed in the covariant basis.
    pub covariant: bool,
}

impl Vector2D {
    /// Create an unallocated contravariant vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-initialized contravariant vector sized for `mesh`.
    pub fn zeros(mesh: &Mesh) -> Self {
        Self {
            x: Field2D::zeros(mesh),
            y: Field2D::zeros(mesh),
            z: Field2D::zeros(mesh),
            covariant: false,
        }
    }

    /// Allocate all three components. No-op for already-allocated components.
    pub fn allocate(&mut self, mesh: &Mesh) {
        self.x.allocate(mesh);
        self.y.allocate(mesh);
        self.z.allocate(mesh);
    }

    /// Lower the components into the covariant basis.
    ///
    /// No-op if already covariant. Each component is scaled by the
    /// corresponding covariant metric coefficient.
    pub fn to_covariant(&mut self, mesh: &Mesh) {
        if !self.covariant {
            self.x.scale(mesh.metric.g[0]);
            self.y.scale(mesh.metric.g[1]);
            self.z.scale(mesh.metric.g[2]);
            self.covariant = true;
        }
    }

    /// Raise the components into the contravariant basis.
    ///
    /// No-op if already contravariant.
    pub fn to_contravariant(&mut self, mesh: &Mesh) {
        if self.covariant {
            self.x.scale(mesh.metric.g_inv[0]);
            self.y.scale(mesh.metric.g_inv[1]);
            self.z.scale(mesh.metric.g_inv[2]);
            self.covariant = false;
        }
    }
}

/// A 3D vector field: three [`Field3D`] components plus a basis flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector3D {
    /// First component.
    pub x: Field3D,
    /// Second component.
    pub y: Field3D,
    /// Third component.
    pub z: Field3D,
    /// Whether the components are currently expressed in the covariant basis.
    pub covariant: bool,
}

impl Vector3D {
    /// Create an unallocated contravariant vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-initialized contravariant vector sized for `mesh`.
    pub fn zeros(mesh: &Mesh) -> Self {
        Self {
            x: Field3D::zeros(mesh),
            y: Field3D::zeros(mesh),
            z: Field3D::zeros(mesh),
            covariant: false,
        }
    }

    /// Allocate all three components. No-op for already-allocated components.
    pub fn allocate(&mut self, mesh: &Mesh) {
        self.x.allocate(mesh);
        self.y.allocate(mesh);
        self.z.allocate(mesh);
    }

    /// Lower the components into the covariant basis.
    ///
    /// No-op if already covariant.
    pub fn to_covariant(&mut self, mesh: &Mesh) {
        if !self.covariant {
            self.x.scale(mesh.metric.g[0]);
            self.y.scale(mesh.metric.g[1]);
            self.z.scale(mesh.metric.g[2]);
            self.covariant = true;
        }
    }

    /// Raise the components into the contravariant basis.
    ///
    /// No-op if already contravariant.
    pub fn to_contravariant(&mut self, mesh: &Mesh) {
        if self.covariant {
            self.x.scale(mesh.metric.g_inv[0]);
            self.y.scale(mesh.metric.g_inv[1]);
            self.z.scale(mesh.metric.g_inv[2]);
            self.covariant = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Metric;
    use proptest::prelude::*;

    fn metric_mesh() -> Mesh {
        Mesh::with_metric(2, 2, 2, Metric::diagonal([2.0, 4.0, 0.5]))
    }

    #[test]
    fn new_vector_is_contravariant() {
        assert!(!Vector3D::new().covariant);
        assert!(!Vector2D::new().covariant);
    }

    #[test]
    fn to_covariant_scales_by_metric() {
        let mesh = metric_mesh();
        let mut v = Vector3D::zeros(&mesh);
        v.x.fill(1.0);
        v.y.fill(1.0);
        v.z.fill(1.0);
        v.to_covariant(&mesh);
        assert!(v.covariant);
        assert_eq!(v.x.data().and_then(|d| d.first().copied()), Some(2.0));
        assert_eq!(v.y.data().and_then(|d| d.first().copied()), Some(4.0));
        assert_eq!(v.z.data().and_then(|d| d.first().copied()), Some(0.5));
    }

    #[test]
    fn conversion_to_current_basis_is_noop() {
        let mesh = metric_mesh();
        let mut v = Vector2D::zeros(&mesh);
        v.x.fill(3.0);
        let before = v.clone();
        v.to_contravariant(&mesh);
        assert_eq!(v, before);
    }

    #[test]
    fn conversion_on_unallocated_vector_only_flips_flag() {
        let mesh = metric_mesh();
        let mut v = Vector3D::new();
        v.to_covariant(&mesh);
        assert!(v.covariant);
        assert!(!v.x.is_allocated());
    }

    proptest! {
        #[test]
        fn lower_then_raise_roundtrips(
            vx in -1e6f64..1e6,
            vy in -1e6f64..1e6,
            vz in -1e6f64..1e6,
            g in prop::array::uniform3(0.25f64..4.0),
        ) {
            let mesh = Mesh::with_metric(2, 2, 2, Metric::diagonal(g));
            let mut v = Vector3D::zeros(&mesh);
            v.x.fill(vx);
            v.y.fill(vy);
            v.z.fill(vz);
            v.to_covariant(&mesh);
            v.to_contravariant(&mesh);
            let got = [
                v.x.data().map(|d| d[0]),
                v.y.data().map(|d| d[0]),
                v.z.data().map(|d| d[0]),
            ];
            for (got, want) in got.into_iter().zip([vx, vy, vz]) {
                let got = got.expect("allocated");
                prop_assert!((got - want).abs() <= 1e-9 * want.abs().max(1.0));
            }
        }
    }
}
