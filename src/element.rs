//! Two-node bar element: stiffness in global axes and axial response recovery.

use nalgebra::{Matrix2x4, Matrix4, RowVector2, Vector4};
use serde::{Deserialize, Serialize};

use crate::geometry::MemberGeometry;
use crate::ElementId;

/// Axial material and section data of a member.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberProperties {
    /// Elastic modulus of the material.
    pub elastic_modulus: f64,
    /// Cross-sectional area of the bar.
    pub area: f64,
}

impl MemberProperties {
    /// Create the property pair.
    #[must_use]
    pub const fn new(elastic_modulus: f64, area: f64) -> Self {
        Self {
            elastic_modulus,
            area,
        }
    }

    /// Axial stiffness `E * A / L` of a bar of the given length.
    #[must_use]
    pub fn axial_stiffness(&self, length: f64) -> f64 {
        self.elastic_modulus * self.area / length
    }
}

/// Axial response of one member. Tension is positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    /// Axial strain.
    pub strain: f64,
    /// Axial stress, `E * strain`.
    pub stress: f64,
    /// Axial force, `A * stress`.
    pub axial_force: f64,
}

/// Everything the assembler and the recovery step need about one member.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedMember {
    /// Member identifier.
    pub id: ElementId,
    /// Global DOFs in element order: start X, start Y, end X, end Y.
    pub dofs: [usize; 4],
    /// Length and orientation.
    pub geometry: MemberGeometry,
    /// Material and section.
    pub properties: MemberProperties,
    /// Stiffness in global axes.
    pub stiffness: Matrix4<f64>,
}

impl PreparedMember {
    /// Gather the member data and compute its global stiffness.
    #[must_use]
    pub fn new(
        id: ElementId,
        dofs: [usize; 4],
        geometry: MemberGeometry,
        properties: MemberProperties,
    ) -> Self {
        let stiffness = global_stiffness(&properties, &geometry);
        Self {
            id,
            dofs,
            geometry,
            properties,
            stiffness,
        }
    }

    /// Axial response for the full global displacement vector `displacements`.
    #[must_use]
    pub fn recover(&self, displacements: &[f64]) -> MemberResponse {
        let local = Vector4::from_fn(|i, _| displacements[self.dofs[i]]);
        recover(&self.properties, &self.geometry, &local)
    }
}

/// Stiffness matrix of a bar in global axes.
///
/// Rows and columns are ordered start X, start Y, end X, end Y.
///
/// # Examples
/// ```
/// use truss2d::element::{global_stiffness, MemberProperties};
/// use truss2d::{point, MemberGeometry};
///
/// let geometry = MemberGeometry::between(1, point(0.0, 0.0), point(2.0, 0.0)).unwrap();
/// let k = global_stiffness(&MemberProperties::new(200.0, 0.5), &geometry);
/// assert_eq!(k[(0, 0)], 50.0);
/// assert_eq!(k[(0, 2)], -50.0);
/// assert_eq!(k[(1, 1)], 0.0);
/// ```
#[must_use]
pub fn global_stiffness(properties: &MemberProperties, geometry: &MemberGeometry) -> Matrix4<f64> {
    let c = geometry.cos;
    let s = geometry.sin;
    let cc = c * c;
    let cs = c * s;
    let ss = s * s;

    properties.axial_stiffness(geometry.length)
        * Matrix4::from_row_slice(&[
            cc, cs, -cc, -cs, //
            cs, ss, -cs, -ss, //
            -cc, -cs, cc, cs, //
            -cs, -ss, cs, ss,
        ])
}

/// Rotation from the four global DOFs of a bar to its two local axial DOFs.
#[must_use]
pub fn transformation(geometry: &MemberGeometry) -> Matrix2x4<f64> {
    let c = geometry.cos;
    let s = geometry.sin;
    Matrix2x4::new(
        c, s, 0.0, 0.0, //
        0.0, 0.0, c, s,
    )
}

/// Strain, stress and axial force from the member's global displacements.
///
/// `displacements` holds start X, start Y, end X, end Y.
#[must_use]
pub fn recover(
    properties: &MemberProperties,
    geometry: &MemberGeometry,
    displacements: &Vector4<f64>,
) -> MemberResponse {
    let local = transformation(geometry) * displacements;
    let b = RowVector2::new(-1.0 / geometry.length, 1.0 / geometry.length);
    let strain = (b * local)[0];
    let stress = properties.elastic_modulus * strain;
    let axial_force = properties.area * stress;
    MemberResponse {
        strain,
        stress,
        axial_force,
    }
}
