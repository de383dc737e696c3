//! Global stiffness matrix and load vector assembly.
//!
//! Member stiffness blocks and nodal loads are scattered into a dense
//! [`GlobalSystem`] by additive accumulation, so members sharing a node
//! superpose their contributions.

use std::collections::BTreeMap;

use log::debug;
use nalgebra::{DMatrix, DVector, Matrix4};

use crate::dof::{Axis, DofNumbering};
use crate::element::PreparedMember;
use crate::geometry::Force;
use crate::NodeId;

/// Assembled stiffness matrix and load vector of a whole structure.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSystem {
    /// Global stiffness matrix, `dofs x dofs`.
    pub stiffness: DMatrix<f64>,
    /// Global nodal load vector, `dofs` long.
    pub load: DVector<f64>,
}

impl GlobalSystem {
    /// Zero-initialised system with `dofs` degrees of freedom.
    #[must_use]
    pub fn zeros(dofs: usize) -> Self {
        Self {
            stiffness: DMatrix::zeros(dofs, dofs),
            load: DVector::zeros(dofs),
        }
    }

    /// Number of degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.load.len()
    }

    /// Add `value` to the stiffness entry at (`row`, `col`).
    pub fn accumulate_stiffness(&mut self, row: usize, col: usize, value: f64) {
        self.stiffness[(row, col)] += value;
    }

    /// Add `value` to the load entry at `dof`.
    pub fn accumulate_load(&mut self, dof: usize, value: f64) {
        self.load[dof] += value;
    }

    /// Add a 4x4 member stiffness block at the member's global DOFs.
    pub fn add_member(&mut self, dofs: &[usize; 4], stiffness: &Matrix4<f64>) {
        for (row_local, &row) in dofs.iter().enumerate() {
            for (col_local, &col) in dofs.iter().enumerate() {
                self.accumulate_stiffness(row, col, stiffness[(row_local, col_local)]);
            }
        }
    }

    /// Add a nodal force at the node's two DOFs.
    pub fn add_load(&mut self, dofs: [usize; 2], load: Force) {
        self.accumulate_load(dofs[0], load.x);
        self.accumulate_load(dofs[1], load.y);
    }

    /// Load vector entry of `node` along `axis`.
    #[must_use]
    pub fn load_at(&self, numbering: &DofNumbering, node: NodeId, axis: Axis) -> Option<f64> {
        numbering.dof(node, axis).map(|dof| self.load[dof])
    }

    /// Largest absolute difference between the matrix and its transpose.
    #[must_use]
    pub fn asymmetry(&self) -> f64 {
        (&self.stiffness - self.stiffness.transpose()).amax()
    }
}

/// Build the global system from prepared members and nodal loads.
///
/// Loads on nodes absent from `numbering` are skipped; model validation
/// rejects them before assembly.
#[must_use]
pub fn assemble(
    numbering: &DofNumbering,
    members: &[PreparedMember],
    loads: &BTreeMap<NodeId, Force>,
) -> GlobalSystem {
    let mut system = GlobalSystem::zeros(numbering.dof_count());
    for member in members {
        system.add_member(&member.dofs, &member.stiffness);
    }
    for (&node, &load) in loads {
        if let Some(dofs) = numbering.node_dofs(node) {
            system.add_load(dofs, load);
        }
    }
    debug!(
        "assembled {} members and {} loaded nodes into {} DOFs",
        members.len(),
        loads.len(),
        system.dof_count()
    );
    system
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::element::MemberProperties;
    use crate::geometry::{force, point, MemberGeometry, Point};

    fn member(id: u64, dofs: [usize; 4], start: Point, end: Point, e: f64) -> PreparedMember {
        let geometry = MemberGeometry::between(id, start, end).expect("valid member");
        PreparedMember::new(id, dofs, geometry, MemberProperties::new(e, 1.0))
    }

    fn triangle_members() -> Vec<PreparedMember> {
        // Nodes 1, 3, 20 at positions 0, 1, 2.
        let n1 = point(100.0, 0.0);
        let n3 = point(0.0, 0.0);
        let n20 = point(0.0, 100.0);
        vec![
            member(1, [0, 1, 4, 5], n1, n20, 20_000.0),
            member(2, [2, 3, 4, 5], n3, n20, 6_900.0),
            member(30, [2, 3, 0, 1], n3, n1, 6_900.0),
        ]
    }

    #[test]
    fn shared_nodes_superpose() {
        let numbering = DofNumbering::new([1, 3, 20]);
        let system = assemble(&numbering, &triangle_members(), &BTreeMap::new());
        // Node 3 X gets the horizontal bar only: EA/L = 6900 / 100.
        assert_relative_eq!(system.stiffness[(2, 2)], 69.0, epsilon = 1.0e-12);
        // Node 20 Y gets the vertical bar and the diagonal.
        let diagonal = 20_000.0 / (100.0 * 2.0_f64.sqrt()) * 0.5;
        assert_relative_eq!(system.stiffness[(5, 5)], 69.0 + diagonal, epsilon = 1.0e-9);
    }

    #[test]
    fn assembled_matrix_is_symmetric() {
        let numbering = DofNumbering::new([1, 3, 20]);
        let system = assemble(&numbering, &triangle_members(), &BTreeMap::new());
        assert!(system.asymmetry() < 1.0e-9);
    }

    #[test]
    fn member_order_does_not_change_the_result() {
        let numbering = DofNumbering::new([1, 3, 20]);
        let loads = BTreeMap::from([(1, force(0.0, -10.0))]);
        let forward = assemble(&numbering, &triangle_members(), &loads);
        let mut reversed_members = triangle_members();
        reversed_members.reverse();
        let reversed = assemble(&numbering, &reversed_members, &loads);
        assert_relative_eq!(forward.stiffness, reversed.stiffness, epsilon = 1.0e-9);
        assert_eq!(forward.load, reversed.load);
    }

    #[test]
    fn loads_accumulate_at_node_dofs() {
        let numbering = DofNumbering::new([1, 3, 20]);
        let loads = BTreeMap::from([(20, force(3.0, -4.0))]);
        let mut system = assemble(&numbering, &[], &loads);
        system.add_load([4, 5], force(1.0, 1.0));
        assert_eq!(system.load_at(&numbering, 20, Axis::X), Some(4.0));
        assert_eq!(system.load_at(&numbering, 20, Axis::Y), Some(-3.0));
        assert_eq!(system.load_at(&numbering, 1, Axis::X), Some(0.0));
        assert_eq!(system.load_at(&numbering, 2, Axis::X), None);
    }
}
