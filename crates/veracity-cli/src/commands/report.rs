//! Report command implementation.

use crate::cli::ReportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use veracity_domain::{DecisionExplanation, IntelligenceProduct};
use veracity_engine::EngineConfig;
use veracity_explain::render_report;

/// Load an explanation, either bare or embedded in an intelligence product.
pub fn load_explanation(path: &Path) -> Result<DecisionExplanation> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;

    if value.get("explanation").is_some() && value.get("chain").is_some() {
        let product: IntelligenceProduct = serde_json::from_value(value)?;
        return Ok(product.explanation);
    }
    if value.get("reasoning").is_none() {
        return Err(CliError::InvalidInput(format!(
            "{} is neither an explanation nor an intelligence product",
            path.display()
        )));
    }
    Ok(serde_json::from_value(value)?)
}

/// Execute the report command.
pub fn execute_report(args: ReportArgs, config: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let explanation = load_explanation(&args.file)?;
    let top = args.top.unwrap_or(config.explanation.report_top_features);
    let markdown = render_report(&explanation, top);

    println!("{}", formatter.report(&markdown, &explanation)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_domain::{DecisionKind, FeatureContribution};
    use veracity_explain::ExplanationSynthesizer;

    fn explanation() -> DecisionExplanation {
        ExplanationSynthesizer::default().build_explanation(
            DecisionKind::LinkPrediction,
            "courier linked to cell",
            0.64,
            Vec::new(),
            vec![FeatureContribution::new("co-location", 0.9, 0.7)],
            Vec::new(),
            Vec::new(),
        )
    }

    fn write_json<T: serde::Serialize>(value: &T) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(value).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_load_bare_explanation() {
        let expected = explanation();
        let file = write_json(&expected);

        assert_eq!(load_explanation(file.path()).unwrap(), expected);
    }

    #[test]
    fn test_load_explanation_from_product() {
        let expected = explanation();
        let product = IntelligenceProduct {
            id: veracity_domain::ArtifactId::new(),
            title: "link analysis".to_string(),
            classification: veracity_domain::Classification::Confidential,
            summary: expected.summary.clone(),
            confidence: expected.confidence,
            chain: Vec::new(),
            explanation: expected.clone(),
            sources: Vec::new(),
            created_at: expected.created_at,
            expires_at: None,
        };
        let file = write_json(&product);

        assert_eq!(load_explanation(file.path()).unwrap(), expected);
    }

    #[test]
    fn test_unrelated_json_is_rejected() {
        let file = write_json(&serde_json::json!({ "hello": "world" }));

        assert!(matches!(
            load_explanation(file.path()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
