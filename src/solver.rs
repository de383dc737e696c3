//! Static solution of the partitioned global system.
//!
//! The free-free block of the stiffness matrix is factorised with a dense LU
//! decomposition; reactions at restrained DOFs are recovered from the
//! restrained-free block.

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::assembly::GlobalSystem;
use crate::dof::DofPartition;
use crate::errors::{AnalysisError, Instability};

/// Numerical settings for the linear solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Smallest accepted LU pivot, relative to the largest entry of the
    /// free-free stiffness matrix. Smaller pivots are treated as singular.
    pub pivot_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1.0e-10,
        }
    }
}

/// Full-length displacement and reaction vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticSolution {
    /// Displacement of every DOF; zero at restrained DOFs.
    pub displacements: DVector<f64>,
    /// Reaction at every DOF; zero at free DOFs.
    pub reactions: DVector<f64>,
}

impl StaticSolution {
    /// Out-of-balance vector `K·U - F - R`, zero at equilibrium.
    #[must_use]
    pub fn residual(&self, system: &GlobalSystem) -> DVector<f64> {
        &system.stiffness * &self.displacements - &system.load - &self.reactions
    }
}

/// Copy the entries of `matrix` at the given rows and columns.
fn submatrix(matrix: &DMatrix<f64>, rows: &[usize], cols: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), cols.len(), |i, j| matrix[(rows[i], cols[j])])
}

/// Copy the entries of `vector` at the given indices.
fn subvector(vector: &DVector<f64>, indices: &[usize]) -> DVector<f64> {
    DVector::from_fn(indices.len(), |i, _| vector[indices[i]])
}

/// Scatter `values` into a zero vector of length `len` at `indices`.
fn scatter(len: usize, indices: &[usize], values: &DVector<f64>) -> DVector<f64> {
    let mut full = DVector::zeros(len);
    for (&index, &value) in indices.iter().zip(values.iter()) {
        full[index] = value;
    }
    full
}

/// Solve `K_ff · U_f = F_f` and back-compute reactions `R_r = K_rf · U_f - F_r`.
///
/// # Errors
///
/// Returns [`AnalysisError::StructuralInstability`] with
/// [`Instability::SingularStiffness`] when the free-free block is singular or
/// has a pivot below `options.pivot_tolerance` (relative).
pub fn solve_static(
    system: &GlobalSystem,
    partition: &DofPartition,
    options: &SolverOptions,
) -> Result<StaticSolution, AnalysisError> {
    let dofs = system.dof_count();
    let free = partition.free();
    let restrained = partition.restrained();
    debug!(
        "solving {} free and {} restrained DOFs",
        free.len(),
        restrained.len()
    );

    let k_ff = submatrix(&system.stiffness, &free, &free);
    let k_rf = submatrix(&system.stiffness, &restrained, &free);
    let f_f = subvector(&system.load, &free);
    let f_r = subvector(&system.load, &restrained);

    let u_f = if free.is_empty() {
        DVector::zeros(0)
    } else {
        let scale = k_ff.amax();
        let lu = k_ff.lu();
        let smallest_pivot = lu
            .u()
            .diagonal()
            .iter()
            .fold(f64::INFINITY, |acc, pivot| acc.min(pivot.abs()));
        debug!("smallest LU pivot {smallest_pivot:e} against matrix scale {scale:e}");
        if smallest_pivot.is_nan() || smallest_pivot <= options.pivot_tolerance * scale {
            return Err(AnalysisError::StructuralInstability(
                Instability::SingularStiffness,
            ));
        }
        lu.solve(&f_f).ok_or(AnalysisError::StructuralInstability(
            Instability::SingularStiffness,
        ))?
    };

    let r_r = &k_rf * &u_f - f_r;

    Ok(StaticSolution {
        displacements: scatter(dofs, &free, &u_f),
        reactions: scatter(dofs, &restrained, &r_r),
    })
}
