use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use thiserror::Error;
use truss2d::{force, point, Support, TrussEditError, TrussModel};

/// Diameter of the circular bars in the demonstration triangle.
const DEMO_BAR_DIAMETER: f64 = 11.3;

/// Failure to obtain a model from disk.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The file could not be read.
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid model description.
    #[error("failed to parse model file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a JSON model from `path`.
pub fn load_model(path: &Path) -> Result<TrussModel, ModelLoadError> {
    let json = fs::read_to_string(path)?;
    Ok(TrussModel::from_json(&json)?)
}

/// Three-member triangle used when no model file is given.
///
/// Node 3 is pinned, node 20 slides vertically and node 1 carries a
/// downward load of 10.
pub fn demo_triangle() -> Result<TrussModel, TrussEditError> {
    let mut model = TrussModel::new();
    model.add_node(1, point(100.0, 0.0))?;
    model.add_node(20, point(0.0, 100.0))?;
    model.add_node(3, point(0.0, 0.0))?;

    model.add_member(1, 1, 20)?;
    model.add_member(2, 3, 20)?;
    model.add_member(30, 3, 1)?;

    let area = PI * DEMO_BAR_DIAMETER.powi(2) / 4.0;
    model.set_member_properties(1, area, 20_000.0)?;
    model.set_member_properties(2, area, 6_900.0)?;
    model.set_member_properties(30, area, 6_900.0)?;

    model.set_load(1, force(0.0, -10.0))?;
    model.set_support(20, Support::ROLLER_Y)?;
    model.set_support(3, Support::PINNED)?;

    Ok(model)
}
