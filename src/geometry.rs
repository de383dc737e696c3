//! Fundamental geometric types for plane truss modelling.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::ElementId;

/// Position in the global X-Y plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Plane force vector, used both for applied loads and support reactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Force component acting along the global X axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Translation of a node in the global X-Y plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Displacement component along the global X axis.
    pub x: f64,
    /// Displacement component along the global Y axis.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean magnitude of the translation.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.to_vector().norm()
    }
}

/// Length and orientation of a member relative to the global axes.
///
/// `cos` and `sin` are taken from the global X axis to the member's local axis,
/// which points from the start node to the end node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberGeometry {
    /// Distance between the two end nodes.
    pub length: f64,
    /// Direction cosine of the local axis.
    pub cos: f64,
    /// Direction sine of the local axis.
    pub sin: f64,
}

impl MemberGeometry {
    /// Compute the geometry of `element` running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DegenerateGeometry`] when both ends coincide.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, MemberGeometry};
    ///
    /// let geometry = MemberGeometry::between(7, point(0.0, 0.0), point(3.0, 4.0)).unwrap();
    /// assert_eq!(geometry.length, 5.0);
    /// assert_eq!(geometry.cos, 0.6);
    /// assert_eq!(geometry.sin, 0.8);
    /// ```
    pub fn between(element: ElementId, start: Point, end: Point) -> Result<Self, AnalysisError> {
        let delta = end.to_vector() - start.to_vector();
        let length = delta.norm();
        if length == 0.0 || !length.is_finite() {
            return Err(AnalysisError::DegenerateGeometry(element));
        }
        Ok(Self {
            length,
            cos: delta.x / length,
            sin: delta.y / length,
        })
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use truss2d::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use truss2d::force;
///
/// let load = force(0.0, -10.0);
/// assert_eq!(load.y, -10.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64) -> Force {
    Force::new(x, y)
}

/// Convenience helper for creating [`Displacement`] instances.
#[must_use]
pub const fn displacement(x: f64, y: f64) -> Displacement {
    Displacement::new(x, y)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn inclined_member_has_unit_direction() {
        let geometry =
            MemberGeometry::between(1, point(100.0, 0.0), point(0.0, 100.0)).expect("valid member");
        assert_relative_eq!(geometry.length, 100.0 * 2.0_f64.sqrt(), epsilon = 1.0e-12);
        assert_relative_eq!(geometry.cos, -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1.0e-12);
        assert_relative_eq!(geometry.sin, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1.0e-12);
        assert_relative_eq!(geometry.cos.powi(2) + geometry.sin.powi(2), 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn reversing_a_member_flips_its_direction() {
        let forward = MemberGeometry::between(1, point(0.0, 0.0), point(2.0, 1.0)).unwrap();
        let backward = MemberGeometry::between(1, point(2.0, 1.0), point(0.0, 0.0)).unwrap();
        assert_relative_eq!(forward.length, backward.length);
        assert_relative_eq!(forward.cos, -backward.cos);
        assert_relative_eq!(forward.sin, -backward.sin);
    }

    #[test]
    fn coincident_nodes_are_degenerate() {
        let error = MemberGeometry::between(42, point(1.5, -2.0), point(1.5, -2.0))
            .expect_err("zero length rejected");
        assert_eq!(error, AnalysisError::DegenerateGeometry(42));
    }

    #[test]
    fn point_from_vector() {
        let point = Point::from(Vector2::new(0.1, -0.2));
        assert_eq!(point, Point::new(0.1, -0.2));
    }

    #[test]
    fn displacement_magnitude() {
        assert_relative_eq!(displacement(3.0, -4.0).magnitude(), 5.0);
    }
}
