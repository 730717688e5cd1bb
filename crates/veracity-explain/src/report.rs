//! Markdown rendering of explanations for auditors

use veracity_domain::DecisionExplanation;

/// Render an explanation as a markdown report
///
/// Lists the `top_features` largest feature contributions by magnitude.
pub fn render_report(explanation: &DecisionExplanation, top_features: usize) -> String {
    let mut lines = vec![
        format!("# Decision Explanation: {}", explanation.kind.label()),
        String::new(),
        format!("- **Decision ID:** {}", explanation.id),
        format!("- **Outcome:** {}", explanation.outcome),
        format!("- **Confidence:** {:.1}%", explanation.confidence * 100.0),
        format!("- **Created:** {}", explanation.created_at.to_rfc3339()),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        explanation.summary.clone(),
        String::new(),
        "## Reasoning Chain".to_string(),
        String::new(),
    ];

    if explanation.reasoning.is_empty() {
        lines.push("_No reasoning steps recorded._".to_string());
    }
    for step in &explanation.reasoning {
        let detail = if step.narrative.is_empty() {
            &step.description
        } else {
            &step.narrative
        };
        lines.push(format!(
            "{}. **{}** (`{}`): confidence {:.2} → {:.2} ({:+.2})",
            step.sequence,
            step.operation,
            step.algorithm,
            step.confidence_in,
            step.confidence_out,
            step.confidence_delta()
        ));
        if !detail.is_empty() {
            lines.push(format!("   {}", detail));
        }
    }

    lines.push(String::new());
    lines.push("## Key Features".to_string());
    lines.push(String::new());
    let top = explanation.top_features(top_features);
    if top.is_empty() {
        lines.push("_No feature contributions._".to_string());
    }
    for feature in top {
        lines.push(format!(
            "- {} **{}**: {:+.3} (value {:.3}, weight {:.2})",
            feature.direction.arrow(),
            feature.name,
            feature.contribution,
            feature.value,
            feature.weight
        ));
    }

    section(
        &mut lines,
        "Limitations",
        explanation.limitations.iter().map(|l| format!("- {}", l)),
    );
    section(
        &mut lines,
        "Uncertainty Factors",
        explanation.uncertainty_factors.iter().map(|u| {
            format!("- **{}** ({} impact): {}", u.factor, u.impact.as_str(), u.mitigation)
        }),
    );
    section(
        &mut lines,
        "Alternatives Considered",
        explanation.alternatives.iter().map(|a| {
            format!(
                "- {} ({:.1}%): rejected, {}",
                a.outcome,
                a.probability * 100.0,
                a.reason_rejected
            )
        }),
    );

    lines.join("\n")
}

fn section(lines: &mut Vec<String>, title: &str, entries: impl Iterator<Item = String>) {
    lines.push(String::new());
    lines.push(format!("## {}", title));
    lines.push(String::new());

    let before = lines.len();
    lines.extend(entries);
    if lines.len() == before {
        lines.push("_None._".to_string());
    }
}
