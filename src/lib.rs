#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod assembly;
pub mod dof;
pub mod element;
pub mod errors;
pub mod geometry;
pub mod results;
pub mod solver;
pub mod topology;
pub mod truss;

/// Identifier of a node. Ids need not be contiguous.
pub type NodeId = u64;

/// Identifier of a member. Ids need not be contiguous.
pub type ElementId = u64;

pub use dof::{Axis, Restraint, Support};
pub use element::MemberResponse;
pub use errors::{
    AnalysisError, Instability, MemberPropertyError, ReferenceError, TrussEditError,
};
pub use geometry::{displacement, force, point, Displacement, Force, MemberGeometry, Point};
pub use results::AnalysisResults;
pub use solver::SolverOptions;
pub use truss::{solve, Analysis, Member, TrussModel};
