//! Structural response returned by an analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::MemberResponse;
use crate::geometry::{Displacement, Force};
use crate::{ElementId, NodeId};

/// Nodal and member results of a linear static analysis.
///
/// Reactions are zero along free axes. Member quantities follow the
/// start-to-end orientation of each member, with tension positive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Displacement of every node.
    pub displacements: BTreeMap<NodeId, Displacement>,
    /// Support reaction of every node.
    pub reactions: BTreeMap<NodeId, Force>,
    /// Axial strain of every member.
    pub strains: BTreeMap<ElementId, f64>,
    /// Axial stress of every member.
    pub stresses: BTreeMap<ElementId, f64>,
    /// Axial force of every member.
    pub axial_forces: BTreeMap<ElementId, f64>,
}

impl AnalysisResults {
    /// Record the axial response of `member`.
    pub(crate) fn insert_member(&mut self, member: ElementId, response: MemberResponse) {
        self.strains.insert(member, response.strain);
        self.stresses.insert(member, response.stress);
        self.axial_forces.insert(member, response.axial_force);
    }

    /// Strain, stress and axial force of `member` together.
    #[must_use]
    pub fn member(&self, member: ElementId) -> Option<MemberResponse> {
        Some(MemberResponse {
            strain: *self.strains.get(&member)?,
            stress: *self.stresses.get(&member)?,
            axial_force: *self.axial_forces.get(&member)?,
        })
    }

    /// Node with the largest displacement magnitude.
    #[must_use]
    pub fn max_displacement(&self) -> Option<(NodeId, Displacement)> {
        self.displacements
            .iter()
            .max_by(|(_, a), (_, b)| a.magnitude().total_cmp(&b.magnitude()))
            .map(|(&node, &displacement)| (node, displacement))
    }

    /// Sum of all support reactions.
    #[must_use]
    pub fn reaction_sum(&self) -> Force {
        self.reactions
            .values()
            .fold(Force::default(), |acc, reaction| {
                Force::new(acc.x + reaction.x, acc.y + reaction.y)
            })
    }
}
