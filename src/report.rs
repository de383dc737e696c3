use std::fmt::Write;

use crate::analysis::AnalysisSummary;

/// Render a textual report of nodal and member results.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();
    let results = &summary.results;

    writeln!(
        &mut output,
        "Plane truss analysis ({} nodes, {} members)",
        summary.node_count, summary.member_count
    )
    .expect("writing to string cannot fail");

    output.push_str("\nNode displacements and reactions:\n");
    for (node, displacement) in &results.displacements {
        let reaction = results.reactions.get(node).copied().unwrap_or_default();
        writeln!(
            &mut output,
            "  node {node:>4}: ux = {:+.4e}, uy = {:+.4e}, rx = {:+.4e}, ry = {:+.4e}",
            displacement.x, displacement.y, reaction.x, reaction.y
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nMember response (tension positive):\n");
    for (member, force) in &results.axial_forces {
        let strain = results.strains.get(member).copied().unwrap_or_default();
        let stress = results.stresses.get(member).copied().unwrap_or_default();
        writeln!(
            &mut output,
            "  member {member:>4}: strain = {strain:+.4e}, stress = {stress:+.4e}, force = {force:+.4e}"
        )
        .expect("writing to string cannot fail");
    }

    if let Some((node, displacement)) = summary.max_displacement {
        writeln!(
            &mut output,
            "\nLargest displacement: {:.4e} at node {node}",
            displacement.magnitude()
        )
        .expect("writing to string cannot fail");
    }
    writeln!(
        &mut output,
        "Sum of reactions: ({:+.4e}, {:+.4e})",
        summary.reaction_sum.x, summary.reaction_sum.y
    )
    .expect("writing to string cannot fail");

    output
}
