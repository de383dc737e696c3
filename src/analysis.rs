use log::info;
use truss2d::{AnalysisError, AnalysisResults, Displacement, Force, NodeId, SolverOptions, TrussModel};

/// Results of a command line run together with the headline numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Number of nodes in the model.
    pub node_count: usize,
    /// Number of members in the model.
    pub member_count: usize,
    /// Node with the largest displacement, if any.
    pub max_displacement: Option<(NodeId, Displacement)>,
    /// Sum of all support reactions.
    pub reaction_sum: Force,
    /// Full analysis results.
    pub results: AnalysisResults,
}

/// Solve `model` and collect the summary printed by the binary.
pub fn run_analysis(
    model: &TrussModel,
    options: &SolverOptions,
) -> Result<AnalysisSummary, AnalysisError> {
    let results = model.solve_with(options)?;
    let summary = AnalysisSummary {
        node_count: model.joint_count(),
        member_count: model.member_count(),
        max_displacement: results.max_displacement(),
        reaction_sum: results.reaction_sum(),
        results,
    };
    info!(
        "solved {} nodes and {} members",
        summary.node_count, summary.member_count
    );
    Ok(summary)
}
