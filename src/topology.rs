//! Connectivity checks on the member graph.
//!
//! A connected part of the structure without any restrained DOF can always
//! translate as a rigid body, so it is reported before the stiffness matrix
//! is factorised.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::dof::{DofNumbering, DofPartition, Restraint, DOFS_PER_NODE};
use crate::element::PreparedMember;
use crate::errors::Instability;
use crate::{ElementId, NodeId};

/// Undirected member graph; node weights are node ids, edge weights member ids.
///
/// Graph node indices coincide with positions in the [`DofNumbering`].
pub fn member_graph(numbering: &DofNumbering, members: &[PreparedMember]) -> UnGraph<NodeId, ElementId> {
    let mut graph = UnGraph::with_capacity(numbering.node_count(), members.len());
    for &node in numbering.nodes() {
        graph.add_node(node);
    }
    for member in members {
        let start = NodeIndex::new(member.dofs[0] / DOFS_PER_NODE);
        let end = NodeIndex::new(member.dofs[2] / DOFS_PER_NODE);
        graph.add_edge(start, end, member.id);
    }
    graph
}

/// Connected parts of the structure, each as ascending node ids.
#[must_use]
pub fn components(graph: &UnGraph<NodeId, ElementId>) -> Vec<Vec<NodeId>> {
    let mut parts: Vec<Vec<NodeId>> = kosaraju_scc(graph)
        .into_iter()
        .map(|component| {
            let mut nodes: Vec<NodeId> = component.into_iter().map(|index| graph[index]).collect();
            nodes.sort_unstable();
            nodes
        })
        .collect();
    parts.sort();
    parts
}

/// Find the first connected part that has no restrained DOF.
///
/// # Errors
///
/// Returns [`Instability::UnrestrainedComponent`] naming the nodes of that part.
pub fn check_restrained_components(
    numbering: &DofNumbering,
    members: &[PreparedMember],
    partition: &DofPartition,
) -> Result<(), Instability> {
    let graph = member_graph(numbering, members);
    for nodes in components(&graph) {
        let restrained = nodes.iter().any(|&node| {
            numbering.node_dofs(node).is_some_and(|dofs| {
                dofs.iter()
                    .any(|&dof| partition.kind(dof) == Some(Restraint::Restrained))
            })
        });
        if !restrained {
            return Err(Instability::UnrestrainedComponent { nodes });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::dof::Support;
    use crate::element::MemberProperties;
    use crate::geometry::{point, MemberGeometry};

    fn bar(id: ElementId, dofs: [usize; 4]) -> PreparedMember {
        let geometry = MemberGeometry::between(id, point(0.0, 0.0), point(1.0, 0.0)).unwrap();
        PreparedMember::new(id, dofs, geometry, MemberProperties::new(1.0, 1.0))
    }

    #[test]
    fn separate_parts_are_found() {
        let numbering = DofNumbering::new([1, 2, 3, 4, 5]);
        let members = [bar(10, [0, 1, 2, 3]), bar(11, [6, 7, 4, 5])];
        let graph = member_graph(&numbering, &members);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(components(&graph), vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn every_supported_part_passes() {
        let numbering = DofNumbering::new([1, 2, 3, 4]);
        let members = [bar(10, [0, 1, 2, 3]), bar(11, [4, 5, 6, 7])];
        let supports = BTreeMap::from([(1, Support::PINNED), (4, Support::ROLLER_Y)]);
        let partition = DofPartition::classify(&numbering, &supports).unwrap();
        assert_eq!(
            check_restrained_components(&numbering, &members, &partition),
            Ok(())
        );
    }

    #[test]
    fn floating_part_is_reported() {
        let numbering = DofNumbering::new([1, 2, 3, 4]);
        let members = [bar(10, [0, 1, 2, 3]), bar(11, [4, 5, 6, 7])];
        let supports = BTreeMap::from([(2, Support::PINNED)]);
        let partition = DofPartition::classify(&numbering, &supports).unwrap();
        assert_eq!(
            check_restrained_components(&numbering, &members, &partition),
            Err(Instability::UnrestrainedComponent { nodes: vec![3, 4] })
        );
    }
}
