//! The [`Mesh`] extents/metric provider and the [`Shape`] alias.

use smallvec::{smallvec, SmallVec};

/// Array extents for a field transfer.
///
/// Uses `SmallVec<[usize; 3]>` so 2D and 3D shapes never hit the heap.
/// Scalars use an empty shape.
pub type Shape = SmallVec<[usize; 3]>;

/// Diagonal metric coefficients for covariant/contravariant conversion.
///
/// `g` holds the covariant diagonal components (`g_11, g_22, g_33`),
/// `g_inv` the contravariant ones (`g11, g22, g33`). Lowering a
/// contravariant component multiplies by `g[i]`; raising a covariant
/// component multiplies by `g_inv[i]`. Off-diagonal terms are not
/// modelled: the conversion is a per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric {
    /// Covariant diagonal components.
    pub g: [f64; 3],
    /// Contravariant diagonal components.
    pub g_inv: [f64; 3],
}

impl Metric {
    /// The identity metric: covariant and contravariant components coincide.
    pub fn identity() -> Self {
        Self {
            g: [1.0; 3],
            g_inv: [1.0; 3],
        }
    }

    /// Build a metric from covariant diagonal components.
    ///
    /// The contravariant components are the reciprocals. Components must
    /// be non-zero; a zero component would make the metric singular and
    /// is a caller error.
    pub fn diagonal(g: [f64; 3]) -> Self {
        Self {
            g,
            g_inv: [1.0 / g[0], 1.0 / g[1], 1.0 / g[2]],
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::identity()
    }
}

/// Per-domain grid extents and metric for one simulation domain.
///
/// The checkpoint layer performs no geometry computation of its own: it
/// sizes every 2D transfer as `nx * ny` and every 3D transfer as
/// `nx * ny * nz`, and delegates basis conversion to [`Metric`].
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Extent in the first dimension, including guard cells.
    pub nx: usize,
    /// Extent in the second dimension, including guard cells.
    pub ny: usize,
    /// Extent in the third dimension.
    pub nz: usize,
    /// Metric coefficients for vector basis conversion.
    pub metric: Metric,
}

impl Mesh {
    /// Create a mesh with the given extents and the identity metric.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            nx,
            ny,
            nz,
            metric: Metric::identity(),
        }
    }

    /// Create a mesh with the given extents and metric.
    pub fn with_metric(nx: usize, ny: usize, nz: usize, metric: Metric) -> Self {
        Self { nx, ny, nz, metric }
    }

    /// Shape of a 2D field on this mesh.
    pub fn shape_2d(&self) -> Shape {
        smallvec![self.nx, self.ny]
    }

    /// Shape of a 3D field on this mesh.
    pub fn shape_3d(&self) -> Shape {
        smallvec![self.nx, self.ny, self.nz]
    }

    /// Number of cells in a 2D field on this mesh.
    pub fn len_2d(&self) -> usize {
        self.nx * self.ny
    }

    /// Number of cells in a 3D field on this mesh.
    pub fn len_3d(&self) -> usize {
        self.nx * self.ny * self.nz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_metric_is_self_inverse() {
        let m = Metric::identity();
        assert_eq!(m.g, m.g_inv);
    }

    #[test]
    fn diagonal_metric_inverts_components() {
        let m = Metric::diagonal([2.0, 4.0, 8.0]);
        assert_eq!(m.g_inv, [0.5, 0.25, 0.125]);
    }

    #[test]
    fn shapes_match_extents() {
        let mesh = Mesh::new(4, 3, 2);
        assert_eq!(mesh.shape_2d().as_slice(), &[4, 3]);
        assert_eq!(mesh.shape_3d().as_slice(), &[4, 3, 2]);
        assert_eq!(mesh.len_2d(), 12);
        assert_eq!(mesh.len_3d(), 24);
    }
}
