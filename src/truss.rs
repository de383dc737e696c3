//! Truss model container and the analysis pipeline.

use std::collections::BTreeMap;

use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assembly::{assemble, GlobalSystem};
use crate::dof::{DofNumbering, DofPartition, Support, DOFS_PER_NODE};
use crate::element::{MemberProperties, PreparedMember};
use crate::errors::{
    check_member_properties, AnalysisError, ReferenceError, TrussEditError,
};
use crate::geometry::{Displacement, Force, MemberGeometry, Point};
use crate::results::AnalysisResults;
use crate::solver::{solve_static, SolverOptions, StaticSolution};
use crate::topology::check_restrained_components;
use crate::{ElementId, NodeId};

/// Connectivity of a member. The local axis runs from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Start node.
    pub start: NodeId,
    /// End node.
    pub end: NodeId,
}

impl Member {
    /// Create a member from `start` to `end`.
    #[must_use]
    pub const fn new(start: NodeId, end: NodeId) -> Self {
        Self { start, end }
    }
}

/// Input description of a plane pin-jointed truss.
///
/// The six maps mirror the data an input layer supplies: node coordinates,
/// member connectivity, elastic modulus and area per member, nodal loads and
/// support flags. Nodes are numbered for analysis in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrussModel {
    /// Node coordinates.
    pub nodes: BTreeMap<NodeId, Point>,
    /// Member connectivity.
    pub elements: BTreeMap<ElementId, Member>,
    /// Elastic modulus per member.
    pub materials: BTreeMap<ElementId, f64>,
    /// Cross-sectional area per member.
    pub sections: BTreeMap<ElementId, f64>,
    /// Applied nodal loads; absent nodes are unloaded.
    #[serde(default)]
    pub loads: BTreeMap<NodeId, Force>,
    /// Support flags; absent nodes are free.
    #[serde(default)]
    pub supports: BTreeMap<NodeId, Support>,
}

/// Intermediate products of an analysis, exposed for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Node numbering used for every DOF index.
    pub numbering: DofNumbering,
    /// Assembled stiffness matrix and load vector.
    pub system: GlobalSystem,
    /// Free/restrained classification.
    pub partition: DofPartition,
    /// Full displacement and reaction vectors.
    pub solution: StaticSolution,
    /// Results keyed by node and member ids.
    pub results: AnalysisResults,
}

impl TrussModel {
    /// Create an empty model.
    ///
    /// # Examples
    /// ```
    /// use truss2d::TrussModel;
    ///
    /// let model = TrussModel::new();
    /// assert_eq!(model.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the payload does not describe a model.
    ///
    /// # Examples
    /// ```
    /// use truss2d::TrussModel;
    ///
    /// let model = TrussModel::from_json(r#"{
    ///     "nodes": {"1": {"x": 0.0, "y": 0.0}, "2": {"x": 1.0, "y": 0.0}},
    ///     "elements": {"1": {"start": 1, "end": 2}},
    ///     "materials": {"1": 200.0e9},
    ///     "sections": {"1": 0.01}
    /// }"#).unwrap();
    /// assert_eq!(model.member_count(), 1);
    /// assert!(model.supports.is_empty());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialise the model as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.elements.len()
    }

    /// Add a joint at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateJoint`] when `id` is already used.
    pub fn add_node(&mut self, id: NodeId, position: Point) -> Result<(), TrussEditError> {
        if self.nodes.contains_key(&id) {
            return Err(TrussEditError::DuplicateJoint(id));
        }
        self.nodes.insert(id, position);
        Ok(())
    }

    /// Connect two existing joints with a new member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateMember`] when `id` is already used and
    /// [`TrussEditError::UnknownJoint`] when either end is missing.
    pub fn add_member(
        &mut self,
        id: ElementId,
        start: NodeId,
        end: NodeId,
    ) -> Result<(), TrussEditError> {
        if self.elements.contains_key(&id) {
            return Err(TrussEditError::DuplicateMember(id));
        }
        for node in [start, end] {
            if !self.nodes.contains_key(&node) {
                return Err(TrussEditError::UnknownJoint(node));
            }
        }
        self.elements.insert(id, Member::new(start, end));
        Ok(())
    }

    /// Set the area and elastic modulus of a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss and
    /// [`TrussEditError::InvalidMemberProperties`] when either `area` or `elastic_modulus`
    /// is not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, TrussEditError, TrussModel};
    ///
    /// let mut model = TrussModel::new();
    /// model.add_node(1, point(0.0, 0.0)).unwrap();
    /// model.add_node(2, point(1.0, 0.0)).unwrap();
    /// model.add_member(1, 1, 2).unwrap();
    ///
    /// let error = model
    ///     .set_member_properties(1, 0.0, 200.0e9)
    ///     .expect_err("invalid area rejected");
    /// assert!(matches!(error, TrussEditError::InvalidMemberProperties(_)));
    /// ```
    pub fn set_member_properties(
        &mut self,
        member: ElementId,
        area: f64,
        elastic_modulus: f64,
    ) -> Result<(), TrussEditError> {
        if !self.elements.contains_key(&member) {
            return Err(TrussEditError::UnknownMember(member));
        }
        check_member_properties(member, area, elastic_modulus)
            .map_err(TrussEditError::InvalidMemberProperties)?;
        self.sections.insert(member, area);
        self.materials.insert(member, elastic_modulus);
        Ok(())
    }

    /// Set the support flags of a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(&mut self, joint: NodeId, support: Support) -> Result<(), TrussEditError> {
        if !self.nodes.contains_key(&joint) {
            return Err(TrussEditError::UnknownJoint(joint));
        }
        self.supports.insert(joint, support);
        Ok(())
    }

    /// Apply a point load to a joint, replacing any previous load.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_load(&mut self, joint: NodeId, load: Force) -> Result<(), TrussEditError> {
        if !self.nodes.contains_key(&joint) {
            return Err(TrussEditError::UnknownJoint(joint));
        }
        self.loads.insert(joint, load);
        Ok(())
    }

    /// Check every cross-reference and member property of the model.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ReferentialIntegrity`] for a dangling reference and
    /// [`AnalysisError::InvalidMemberProperties`] for a non-positive area or modulus.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (&element, member) in &self.elements {
            for node in [member.start, member.end] {
                if !self.nodes.contains_key(&node) {
                    return Err(ReferenceError::UnknownNode { element, node }.into());
                }
            }
            let elastic_modulus = *self
                .materials
                .get(&element)
                .ok_or(ReferenceError::MissingMaterial(element))?;
            let area = *self
                .sections
                .get(&element)
                .ok_or(ReferenceError::MissingSection(element))?;
            check_member_properties(element, area, elastic_modulus).map_err(|source| {
                AnalysisError::InvalidMemberProperties {
                    member: element,
                    source,
                }
            })?;
        }
        if let Some(&node) = self.loads.keys().find(|node| !self.nodes.contains_key(node)) {
            return Err(ReferenceError::UnknownLoadedNode(node).into());
        }
        if let Some(&node) = self
            .supports
            .keys()
            .find(|node| !self.nodes.contains_key(node))
        {
            return Err(ReferenceError::UnknownSupportedNode(node).into());
        }
        for element in self
            .materials
            .keys()
            .chain(self.sections.keys())
            .filter(|element| !self.elements.contains_key(element))
        {
            warn!("ignoring material or section data for unknown member {element}");
        }
        Ok(())
    }

    /// Build the fixed node numbering of this model.
    #[must_use]
    pub fn numbering(&self) -> DofNumbering {
        DofNumbering::new(self.nodes.keys().copied())
    }

    /// Geometry, DOFs and stiffness of every member, in member id order.
    ///
    /// Members are processed in parallel. Call after [`TrussModel::validate`].
    fn prepare_members(
        &self,
        numbering: &DofNumbering,
    ) -> Result<Vec<PreparedMember>, AnalysisError> {
        self.elements
            .par_iter()
            .map(|(&id, member)| -> Result<PreparedMember, AnalysisError> {
                let missing = |node| ReferenceError::UnknownNode { element: id, node };
                let start = *self.nodes.get(&member.start).ok_or(missing(member.start))?;
                let end = *self.nodes.get(&member.end).ok_or(missing(member.end))?;
                let dofs = numbering
                    .member_dofs(member.start, member.end)
                    .ok_or(missing(member.start))?;
                let properties = MemberProperties::new(
                    *self
                        .materials
                        .get(&id)
                        .ok_or(ReferenceError::MissingMaterial(id))?,
                    *self
                        .sections
                        .get(&id)
                        .ok_or(ReferenceError::MissingSection(id))?,
                );
                let geometry = MemberGeometry::between(id, start, end)?;
                let prepared = PreparedMember::new(id, dofs, geometry, properties);
                trace!("member {id}: {geometry:?}, stiffness {}", prepared.stiffness);
                Ok(prepared)
            })
            .collect()
    }

    /// Analyse the truss with default solver options.
    ///
    /// # Errors
    ///
    /// See [`TrussModel::analyse`].
    ///
    /// # Examples
    /// ```
    /// use truss2d::{force, point, Support, TrussModel};
    ///
    /// let mut model = TrussModel::new();
    /// model.add_node(1, point(0.0, 0.0))?;
    /// model.add_node(2, point(1.0, 0.0))?;
    /// model.add_member(1, 1, 2)?;
    /// model.set_member_properties(1, 0.01, 200.0e9)?;
    /// model.set_support(1, Support::PINNED)?;
    /// model.set_support(2, Support::ROLLER_X)?;
    /// model.set_load(2, force(-1_000.0, 0.0))?;
    ///
    /// let results = model.solve()?;
    /// assert!((results.axial_forces[&1] + 1_000.0).abs() < 1.0e-6);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn solve(&self) -> Result<AnalysisResults, AnalysisError> {
        self.solve_with(&SolverOptions::default())
    }

    /// Analyse the truss with explicit solver options.
    ///
    /// # Errors
    ///
    /// See [`TrussModel::analyse`].
    pub fn solve_with(&self, options: &SolverOptions) -> Result<AnalysisResults, AnalysisError> {
        self.analyse(options).map(|analysis| analysis.results)
    }

    /// Run the full pipeline and keep the intermediate products.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::ReferentialIntegrity`] or
    ///   [`AnalysisError::InvalidMemberProperties`] from validation, before any
    ///   matrix work;
    /// - [`AnalysisError::DegenerateGeometry`] for a zero-length member;
    /// - [`AnalysisError::InvalidSupportCondition`] for a flag other than 0 or 1;
    /// - [`AnalysisError::StructuralInstability`] when the structure is a mechanism
    ///   or insufficiently supported.
    pub fn analyse(&self, options: &SolverOptions) -> Result<Analysis, AnalysisError> {
        self.validate()?;

        let numbering = self.numbering();
        debug!(
            "analysing {} nodes ({} DOFs) and {} members",
            numbering.node_count(),
            numbering.dof_count(),
            self.elements.len()
        );

        let members = self.prepare_members(&numbering)?;
        let system = assemble(&numbering, &members, &self.loads);
        let partition = DofPartition::classify(&numbering, &self.supports)?;
        check_restrained_components(&numbering, &members, &partition)
            .map_err(AnalysisError::StructuralInstability)?;
        let solution = solve_static(&system, &partition, options)?;
        let results = collect_results(&numbering, &members, &solution);

        Ok(Analysis {
            numbering,
            system,
            partition,
            solution,
            results,
        })
    }
}

/// Convert full DOF vectors into results keyed by node and member ids.
fn collect_results(
    numbering: &DofNumbering,
    members: &[PreparedMember],
    solution: &StaticSolution,
) -> AnalysisResults {
    let mut results = AnalysisResults::default();
    let displacements = solution.displacements.as_slice();
    for (position, &node) in numbering.nodes().iter().enumerate() {
        let base = position * DOFS_PER_NODE;
        results.displacements.insert(
            node,
            Displacement::new(displacements[base], displacements[base + 1]),
        );
        results.reactions.insert(
            node,
            Force::new(solution.reactions[base], solution.reactions[base + 1]),
        );
    }
    for member in members {
        results.insert_member(member.id, member.recover(displacements));
    }
    results
}

/// Analyse `model` with default solver options.
///
/// # Errors
///
/// See [`TrussModel::analyse`].
pub fn solve(model: &TrussModel) -> Result<AnalysisResults, AnalysisError> {
    model.solve()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::dof::Axis;
    use crate::errors::{Instability, MemberPropertyError};
    use crate::geometry::{force, point};

    fn cantilever() -> TrussModel {
        let mut model = TrussModel::new();
        model.add_node(1, point(0.0, 0.0)).unwrap();
        model.add_node(2, point(1.0, 0.0)).unwrap();
        model.add_member(1, 1, 2).unwrap();
        model.set_member_properties(1, 0.01, 200.0e9).unwrap();
        model.set_support(1, Support::PINNED).unwrap();
        model.set_support(2, Support::ROLLER_X).unwrap();
        model.set_load(2, force(-1_000.0, 0.0)).unwrap();
        model
    }

    #[test]
    fn edit_methods_reject_unknown_and_duplicate_ids() {
        let mut model = TrussModel::new();
        model.add_node(1, point(0.0, 0.0)).unwrap();
        assert_eq!(
            model.add_node(1, point(1.0, 0.0)),
            Err(TrussEditError::DuplicateJoint(1))
        );
        assert_eq!(
            model.add_member(5, 1, 9),
            Err(TrussEditError::UnknownJoint(9))
        );
        assert_eq!(
            model.set_support(9, Support::PINNED),
            Err(TrussEditError::UnknownJoint(9))
        );
        assert_eq!(
            model.set_load(9, force(0.0, 1.0)),
            Err(TrussEditError::UnknownJoint(9))
        );
        assert_eq!(
            model.set_member_properties(5, 0.01, 200.0e9),
            Err(TrussEditError::UnknownMember(5))
        );

        model.add_node(2, point(1.0, 0.0)).unwrap();
        model.add_member(5, 1, 2).unwrap();
        assert_eq!(
            model.add_member(5, 2, 1),
            Err(TrussEditError::DuplicateMember(5))
        );
    }

    #[test]
    fn invalid_member_properties_are_rejected() {
        let mut model = cantilever();
        let modulus_error = model
            .set_member_properties(1, 0.01, -5.0)
            .expect_err("negative modulus rejected");
        assert!(matches!(
            modulus_error,
            TrussEditError::InvalidMemberProperties(
                MemberPropertyError::NonPositiveElasticModulus { .. }
            )
        ));

        model.sections.insert(1, 0.0);
        let error = model.solve().expect_err("zero area detected");
        assert!(matches!(
            error,
            AnalysisError::InvalidMemberProperties {
                member: 1,
                source: MemberPropertyError::NonPositiveArea { .. }
            }
        ));
    }

    #[test]
    fn analysis_requires_material_and_section() {
        let mut model = cantilever();
        model.materials.clear();
        assert_eq!(
            model.solve(),
            Err(ReferenceError::MissingMaterial(1).into())
        );

        let mut model = cantilever();
        model.sections.clear();
        assert_eq!(model.solve(), Err(ReferenceError::MissingSection(1).into()));
    }

    #[test]
    fn loads_and_supports_must_name_existing_nodes() {
        let mut model = cantilever();
        model.loads.insert(7, force(1.0, 0.0));
        assert_eq!(
            model.solve(),
            Err(ReferenceError::UnknownLoadedNode(7).into())
        );

        let mut model = cantilever();
        model.supports.insert(8, Support::PINNED);
        assert_eq!(
            model.solve(),
            Err(ReferenceError::UnknownSupportedNode(8).into())
        );
    }

    #[test]
    fn zero_length_member_is_rejected() {
        let mut model = cantilever();
        model.nodes.insert(2, point(0.0, 0.0));
        assert_eq!(model.solve(), Err(AnalysisError::DegenerateGeometry(1)));
    }

    #[test]
    fn invalid_support_flag_is_rejected() {
        let mut model = cantilever();
        model.supports.insert(2, Support { x: 3, y: 1 });
        assert_eq!(
            model.solve(),
            Err(AnalysisError::InvalidSupportCondition {
                node: 2,
                axis: Axis::X,
                value: 3,
            })
        );
    }

    #[test]
    fn cantilever_analysis_matches_expected_displacements() {
        let results = cantilever().solve().expect("analysis succeeds");

        let displacement = results.displacements[&2];
        let expected_displacement = -1_000.0 * 1.0 / (0.01 * 200.0e9);
        assert_relative_eq!(displacement.x, expected_displacement, epsilon = 1.0e-12);
        assert_relative_eq!(displacement.y, 0.0, epsilon = 1.0e-12);

        assert_relative_eq!(results.axial_forces[&1], -1_000.0, epsilon = 1.0e-6);
        assert_relative_eq!(results.stresses[&1], -100_000.0, epsilon = 1.0e-4);
        assert_relative_eq!(results.reactions[&1].x, 1_000.0, epsilon = 1.0e-6);
        assert_eq!(results.reactions[&2].x, 0.0);
    }

    #[test]
    fn unsupported_part_is_reported_before_the_solve() {
        let mut model = cantilever();
        model.add_node(3, point(5.0, 5.0)).unwrap();
        model.add_node(4, point(6.0, 5.0)).unwrap();
        model.add_member(2, 3, 4).unwrap();
        model.set_member_properties(2, 0.01, 200.0e9).unwrap();
        assert_eq!(
            model.solve(),
            Err(AnalysisError::StructuralInstability(
                Instability::UnrestrainedComponent { nodes: vec![3, 4] }
            ))
        );
    }

    #[test]
    fn analysis_exposes_a_balanced_system() {
        let analysis = cantilever()
            .analyse(&SolverOptions::default())
            .expect("analysis succeeds");
        assert_eq!(analysis.numbering.nodes(), &[1, 2]);
        assert_eq!(analysis.partition.free(), vec![2]);
        assert!(analysis.solution.residual(&analysis.system).amax() < 1.0e-6);
    }

    #[test]
    fn json_round_trip_preserves_the_model() {
        let model = cantilever();
        let json = model.to_json().expect("serialisable");
        assert_eq!(TrussModel::from_json(&json).expect("parsable"), model);
    }
}
