//! Reusable mesh and field fixtures.

use std::sync::Arc;

use gyre_core::{Field2D, Field3D, Mesh, Metric};

/// A small 4x3x2 identity-metric mesh, shared the way production code
/// shares its mesh.
pub fn test_mesh() -> Arc<Mesh> {
    Arc::new(Mesh::new(4, 3, 2))
}

/// A small mesh with a diagonal metric, for basis-conversion tests.
pub fn metric_mesh(g: [f64; 3]) -> Arc<Mesh> {
    Arc::new(Mesh::with_metric(4, 3, 2, Metric::diagonal(g)))
}

/// An allocated 2D field whose value at `(x, y)` is `offset + x * 10 + y`.
///
/// Distinct values per cell make transposition and truncation bugs
/// visible in round-trip assertions.
pub fn patterned_field_2d(mesh: &Mesh, offset: f64) -> Field2D {
    let mut field = Field2D::zeros(mesh);
    if let Some(data) = field.data_mut() {
        for x in 0..mesh.nx {
            for y in 0..mesh.ny {
                data[x * mesh.ny + y] = offset + (x * 10 + y) as f64;
            }
        }
    }
    field
}

/// An allocated 3D field whose value at `(x, y, z)` is
/// `offset + x * 100 + y * 10 + z`.
pub fn patterned_field_3d(mesh: &Mesh, offset: f64) -> Field3D {
    let mut field = Field3D::zeros(mesh);
    if let Some(data) = field.data_mut() {
        for x in 0..mesh.nx {
            for y in 0..mesh.ny {
                for z in 0..mesh.nz {
                    data[(x * mesh.ny + y) * mesh.nz + z] = offset + (x * 100 + y * 10 + z) as f64;
                }
            }
        }
    }
    field
}
