//! Degree-of-freedom numbering and the free/restrained classification.
//!
//! Every node owns two DOFs. The global index of a DOF is
//! `2 * position + axis`, where `position` is the node's place in the fixed
//! node ordering held by [`DofNumbering`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::NodeId;

/// Number of degrees of freedom carried by each node.
pub const DOFS_PER_NODE: usize = 2;

/// Global axis of a nodal degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Translation along global X.
    X,
    /// Translation along global Y.
    Y,
}

impl Axis {
    /// Both axes in DOF order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Offset of this axis within a node's pair of DOFs.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
        }
    }
}

/// Classification of a single degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Restraint {
    /// The DOF is unknown and solved for.
    Free,
    /// The DOF is held at zero and develops a reaction.
    Restrained,
}

impl TryFrom<i64> for Restraint {
    type Error = i64;

    /// Decode the input convention: `0` free, `1` restrained.
    fn try_from(flag: i64) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(Restraint::Free),
            1 => Ok(Restraint::Restrained),
            other => Err(other),
        }
    }
}

impl From<Restraint> for i64 {
    fn from(restraint: Restraint) -> Self {
        match restraint {
            Restraint::Free => 0,
            Restraint::Restrained => 1,
        }
    }
}

/// Support flags of a node as supplied by the input layer.
///
/// Each flag is `1` for a restrained axis and `0` for a free one. Other values
/// are accepted here and rejected during analysis with
/// [`AnalysisError::InvalidSupportCondition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Flag for the X translation.
    pub x: i64,
    /// Flag for the Y translation.
    pub y: i64,
}

impl Support {
    /// Both translations restrained.
    pub const PINNED: Support = Support { x: 1, y: 1 };
    /// Only the Y translation restrained; the node may slide along X.
    pub const ROLLER_X: Support = Support { x: 0, y: 1 };
    /// Only the X translation restrained; the node may slide along Y.
    pub const ROLLER_Y: Support = Support { x: 1, y: 0 };

    /// Build a support from typed restraints.
    #[must_use]
    pub fn new(x: Restraint, y: Restraint) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Raw flag for `axis`.
    #[must_use]
    pub const fn flag(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Fixed mapping from node identifiers to contiguous positions.
///
/// Built once per analysis; [`TrussModel`](crate::TrussModel) numbers its
/// nodes in ascending identifier order. All conversions between node space and
/// DOF space go through this structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DofNumbering {
    /// Node identifiers in position order.
    order: Vec<NodeId>,
    /// Position of each node identifier.
    positions: HashMap<NodeId, usize>,
}

impl DofNumbering {
    /// Number the nodes in iteration order of `nodes`.
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        let order: Vec<NodeId> = nodes.into_iter().collect();
        let positions = order
            .iter()
            .enumerate()
            .map(|(position, &node)| (node, position))
            .collect();
        Self { order, positions }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.order.len() * DOFS_PER_NODE
    }

    /// Node identifiers in position order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// Position of `node` in the ordering.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    /// Global index of the `axis` DOF of `node`.
    #[must_use]
    pub fn dof(&self, node: NodeId, axis: Axis) -> Option<usize> {
        self.position(node)
            .map(|position| position * DOFS_PER_NODE + axis.offset())
    }

    /// Both DOFs of `node`, X first.
    #[must_use]
    pub fn node_dofs(&self, node: NodeId) -> Option<[usize; 2]> {
        let base = self.position(node)? * DOFS_PER_NODE;
        Some([base, base + 1])
    }

    /// The four DOFs of a member running from `start` to `end`.
    #[must_use]
    pub fn member_dofs(&self, start: NodeId, end: NodeId) -> Option<[usize; 4]> {
        let [sx, sy] = self.node_dofs(start)?;
        let [ex, ey] = self.node_dofs(end)?;
        Some([sx, sy, ex, ey])
    }

    /// Node and axis owning the global DOF `dof`.
    #[must_use]
    pub fn owner(&self, dof: usize) -> Option<(NodeId, Axis)> {
        let node = *self.order.get(dof / DOFS_PER_NODE)?;
        let axis = Axis::ALL[dof % DOFS_PER_NODE];
        Some((node, axis))
    }
}

/// Free or restrained tag for every DOF of a numbering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DofPartition {
    /// One entry per global DOF.
    kinds: Vec<Restraint>,
}

impl DofPartition {
    /// Classify every DOF from the support map.
    ///
    /// Nodes without an entry are free along both axes. Entries for nodes
    /// outside `numbering` are ignored here; model validation reports them.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidSupportCondition`] for a flag other than
    /// `0` or `1`.
    pub fn classify(
        numbering: &DofNumbering,
        supports: &BTreeMap<NodeId, Support>,
    ) -> Result<Self, AnalysisError> {
        let mut kinds = Vec::with_capacity(numbering.dof_count());
        for &node in numbering.nodes() {
            for axis in Axis::ALL {
                let kind = match supports.get(&node) {
                    Some(support) => Restraint::try_from(support.flag(axis)).map_err(|value| {
                        AnalysisError::InvalidSupportCondition { node, axis, value }
                    })?,
                    None => Restraint::Free,
                };
                kinds.push(kind);
            }
        }
        Ok(Self { kinds })
    }

    /// Classification of `dof`.
    #[must_use]
    pub fn kind(&self, dof: usize) -> Option<Restraint> {
        self.kinds.get(dof).copied()
    }

    /// Total number of classified DOFs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the partition covers no DOFs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Free DOF indices in ascending order.
    #[must_use]
    pub fn free(&self) -> Vec<usize> {
        self.select(Restraint::Free)
    }

    /// Restrained DOF indices in ascending order.
    #[must_use]
    pub fn restrained(&self) -> Vec<usize> {
        self.select(Restraint::Restrained)
    }

    /// Indices tagged with `kind`.
    fn select(&self, kind: Restraint) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, tag)| **tag == kind)
            .map(|(dof, _)| dof)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_numbering() -> DofNumbering {
        DofNumbering::new([1, 3, 20])
    }

    #[test]
    fn numbering_follows_ordering_not_identifier_values() {
        let numbering = triangle_numbering();
        assert_eq!(numbering.node_count(), 3);
        assert_eq!(numbering.dof_count(), 6);
        assert_eq!(numbering.position(20), Some(2));
        assert_eq!(numbering.dof(3, Axis::X), Some(2));
        assert_eq!(numbering.dof(3, Axis::Y), Some(3));
        assert_eq!(numbering.member_dofs(20, 1), Some([4, 5, 0, 1]));
        assert_eq!(numbering.member_dofs(1, 2), None);
        assert_eq!(numbering.owner(5), Some((20, Axis::Y)));
        assert_eq!(numbering.owner(6), None);
    }

    #[test]
    fn partition_covers_every_dof_once() {
        let numbering = triangle_numbering();
        let supports = BTreeMap::from([(20, Support::ROLLER_Y), (3, Support::PINNED)]);
        let partition = DofPartition::classify(&numbering, &supports).expect("valid supports");

        assert_eq!(partition.free(), vec![0, 1, 5]);
        assert_eq!(partition.restrained(), vec![2, 3, 4]);

        let mut all: Vec<usize> = partition
            .free()
            .into_iter()
            .chain(partition.restrained())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..numbering.dof_count()).collect::<Vec<_>>());
    }

    #[test]
    fn nodes_without_support_are_free() {
        let partition =
            DofPartition::classify(&triangle_numbering(), &BTreeMap::new()).expect("no supports");
        assert_eq!(partition.len(), 6);
        assert!(partition.restrained().is_empty());
        assert_eq!(partition.kind(4), Some(Restraint::Free));
    }

    #[test]
    fn invalid_flag_names_node_and_axis() {
        let supports = BTreeMap::from([(3, Support { x: 1, y: 2 })]);
        let error = DofPartition::classify(&triangle_numbering(), &supports)
            .expect_err("flag 2 rejected");
        assert_eq!(
            error,
            AnalysisError::InvalidSupportCondition {
                node: 3,
                axis: Axis::Y,
                value: 2,
            }
        );
    }

    #[test]
    fn typed_support_round_trips_to_flags() {
        let support = Support::new(Restraint::Restrained, Restraint::Free);
        assert_eq!(support, Support::ROLLER_Y);
        assert_eq!(Restraint::try_from(support.flag(Axis::X)), Ok(Restraint::Restrained));
        assert_eq!(Restraint::try_from(-1), Err(-1));
    }
}
