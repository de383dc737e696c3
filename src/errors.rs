//! Error types produced while editing or analysing trusses.

use thiserror::Error;

use crate::dof::Axis;
use crate::{ElementId, NodeId};

/// Error returned when a truss analysis fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the model refers to data it does not contain.
    #[error(transparent)]
    ReferentialIntegrity(#[from] ReferenceError),
    /// Returned when the supplied properties for a member are not physically meaningful.
    #[error("member {member} has invalid properties: {source}")]
    InvalidMemberProperties {
        /// Identifier of the offending member.
        member: ElementId,
        /// Description of the invalid property.
        #[source]
        source: MemberPropertyError,
    },
    /// Returned when a member spans zero distance.
    #[error("member {0} has zero length")]
    DegenerateGeometry(ElementId),
    /// Returned when a support flag is neither free (`0`) nor restrained (`1`).
    #[error("node {node} has support flag {value} along {axis}; expected 0 (free) or 1 (restrained)")]
    InvalidSupportCondition {
        /// Node carrying the support.
        node: NodeId,
        /// Axis of the offending flag.
        axis: Axis,
        /// Rejected flag value.
        value: i64,
    },
    /// Returned when the supports do not prevent rigid-body or mechanism motion.
    #[error("structure is unstable: {0}")]
    StructuralInstability(#[source] Instability),
}

/// Reference from one part of the model to data that does not exist.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// A member end names a node missing from the node map.
    #[error("member {element} references node {node}, which is not part of the model")]
    UnknownNode {
        /// Member holding the reference.
        element: ElementId,
        /// Missing node.
        node: NodeId,
    },
    /// A member has no elastic modulus entry.
    #[error("member {0} has no material assigned")]
    MissingMaterial(ElementId),
    /// A member has no cross-sectional area entry.
    #[error("member {0} has no section assigned")]
    MissingSection(ElementId),
    /// A load is applied to a node missing from the node map.
    #[error("load applied to node {0}, which is not part of the model")]
    UnknownLoadedNode(NodeId),
    /// A support is assigned to a node missing from the node map.
    #[error("support assigned to node {0}, which is not part of the model")]
    UnknownSupportedNode(NodeId),
}

/// Reason a structure was found to be kinematically unstable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Instability {
    /// A connected group of nodes has no restrained degree of freedom at all.
    #[error("nodes {nodes:?} form a part with no supports")]
    UnrestrainedComponent {
        /// Nodes of the unsupported part, in ascending order.
        nodes: Vec<NodeId>,
    },
    /// The free-free stiffness matrix has a zero or vanishing pivot.
    #[error("stiffness matrix is singular; check supports and connectivity")]
    SingularStiffness,
}

/// Error returned when member material properties are rejected.
///
/// The variants describe the reason the supplied value is rejected so callers can
/// present actionable feedback to users.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MemberPropertyError {
    /// Returned when the cross-sectional area is zero, negative or not finite.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Identifier of the affected member.
        member: ElementId,
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// Returned when the elastic modulus is zero, negative or not finite.
    #[error("elastic modulus must be positive (received {elastic_modulus})")]
    NonPositiveElasticModulus {
        /// Identifier of the affected member.
        member: ElementId,
        /// Rejected elastic modulus.
        elastic_modulus: f64,
    },
}

/// Error returned when editing a [`TrussModel`](crate::TrussModel).
///
/// # Examples
///
/// ```
/// use truss2d::{point, TrussEditError, TrussModel};
///
/// let mut model = TrussModel::new();
/// model.add_node(1, point(0.0, 0.0)).unwrap();
/// let error = model.add_member(1, 1, 2).expect_err("unknown node is rejected");
/// assert_eq!(error, TrussEditError::UnknownJoint(2));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the model.
    #[error("joint {0} does not exist in this truss")]
    UnknownJoint(NodeId),
    /// Returned when a member cannot be found in the model.
    #[error("member {0} does not exist in this truss")]
    UnknownMember(ElementId),
    /// Returned when a joint identifier is already taken.
    #[error("joint {0} already exists in this truss")]
    DuplicateJoint(NodeId),
    /// Returned when a member identifier is already taken.
    #[error("member {0} already exists in this truss")]
    DuplicateMember(ElementId),
    /// Returned when the supplied member properties are invalid.
    #[error("{0}")]
    InvalidMemberProperties(MemberPropertyError),
}

/// Check that a member's area and elastic modulus are usable.
pub(crate) fn check_member_properties(
    member: ElementId,
    area: f64,
    elastic_modulus: f64,
) -> Result<(), MemberPropertyError> {
    if !(area > 0.0 && area.is_finite()) {
        return Err(MemberPropertyError::NonPositiveArea { member, area });
    }
    if !(elastic_modulus > 0.0 && elastic_modulus.is_finite()) {
        return Err(MemberPropertyError::NonPositiveElasticModulus {
            member,
            elastic_modulus,
        });
    }
    Ok(())
}
