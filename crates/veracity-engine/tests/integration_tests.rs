//! Integration tests for veracity-engine
//!
//! These tests drive the full provenance cycle: ingest, analyze, fuse,
//! prioritize, verify, export and report.

use std::io::Write;
use std::sync::{Arc, Mutex};
use veracity_domain::{
    AuditFilter, Classification, CredibilityGrade, DataSource, DecisionKind, FeatureContribution,
    NodeType, ReliabilityGrade, SourceCategory,
};
use veracity_engine::{
    AnalysisOutput, EngineConfig, EngineEvent, ExtractedEvidence, ProvenanceEngine,
};
use veracity_fusion::{FusionStrategy, SourceEvidence};
use veracity_ledger::AuditManifest;
use veracity_prioritize::{Criterion, PriorityItem};
use veracity_trust::{ChainVerifier, KeyedHashSigner, VerificationIssue};

const SECRET: &str = "integration-secret";

fn engine() -> ProvenanceEngine {
    let config = EngineConfig {
        signing_secret: Some(SECRET.to_string()),
        ..EngineConfig::default()
    };
    ProvenanceEngine::new(config).unwrap()
}

fn source(id: &str, reliability: ReliabilityGrade, credibility: CredibilityGrade) -> DataSource {
    DataSource::new(
        id,
        SourceCategory::Humint,
        Classification::Secret,
        reliability,
        credibility,
    )
}

#[test]
fn test_ingest_then_fuse_then_verify() {
    let mut engine = engine();
    let alpha = source("humint:alpha", ReliabilityGrade::A, CredibilityGrade::Confirmed);
    let foxtrot = source("humint:foxtrot", ReliabilityGrade::F, CredibilityGrade::CannotBeJudged);

    let first = engine
        .ingest_data(&alpha, "debrief 1", vec![ExtractedEvidence::new("meeting at dawn", 0.9)])
        .unwrap();
    let second = engine
        .ingest_data(&foxtrot, "walk-in", vec![ExtractedEvidence::new("meeting cancelled", 0.1)])
        .unwrap();

    let product = engine
        .fuse_intelligence(
            &[
                SourceEvidence::new(alpha, first.evidence),
                SourceEvidence::new(foxtrot, second.evidence),
            ],
            FusionStrategy::WeightedConsensus,
        )
        .unwrap();

    assert!((product.confidence - 0.901 / 1.01).abs() < 1e-12);
    assert_eq!(product.chain.len(), 3);

    let verification = engine.verify_chain_of_trust(&product.id).unwrap();
    assert!(verification.valid, "{}", verification.report);
    assert!(engine.verify_chain_of_trust(&first.batch_id).unwrap().valid);

    assert_eq!(engine.metrics().ingest_batches, 2);
    assert_eq!(engine.metrics().fusions, 1);
    assert_eq!(engine.metrics().verifications, 2);
}

#[test]
fn test_exported_product_chain_verifies_offline() {
    let mut engine = engine();
    let alpha = source("humint:alpha", ReliabilityGrade::B, CredibilityGrade::ProbablyTrue);
    let batch = engine
        .ingest_data(&alpha, "raw", vec![ExtractedEvidence::new("convoy moving", 0.7)])
        .unwrap();
    let product = engine
        .fuse_intelligence(&[SourceEvidence::new(alpha, batch.evidence)], FusionStrategy::Bayesian)
        .unwrap();

    let json = serde_json::to_string(&product).unwrap();
    let mut exported: veracity_domain::IntelligenceProduct = serde_json::from_str(&json).unwrap();

    let signer = KeyedHashSigner::new(SECRET);
    let verifier = ChainVerifier::new(&signer);
    assert!(verifier.verify_nodes(exported.id, &exported.chain).valid);

    exported.chain[1].operation = "WEIGHTED_CONSENSUS fusion".to_string();
    let tampered = verifier.verify_nodes(exported.id, &exported.chain);
    assert!(!tampered.valid);
    assert!(tampered
        .issues
        .contains(&VerificationIssue::SignatureMismatch { node_id: exported.chain[1].id }));

    let wrong = KeyedHashSigner::new("other-secret");
    assert!(!ChainVerifier::new(&wrong).verify_nodes(product.id, &product.chain).valid);
}

#[test]
fn test_analysis_report_renders_every_section() {
    let mut engine = engine();
    let delta = source("humint:delta", ReliabilityGrade::C, CredibilityGrade::PossiblyTrue);
    let batch = engine
        .ingest_data(
            &delta,
            "notes",
            vec![
                ExtractedEvidence::new("courier seen twice", 0.7),
                ExtractedEvidence::new("courier route unchanged", 0.3),
            ],
        )
        .unwrap();

    let analysis = engine
        .analyze_with_explanation(DecisionKind::RiskAssessment, &batch.evidence, |evidence| {
            AnalysisOutput::new(
                serde_json::json!({ "risk": "elevated", "items": evidence.len() }),
                vec![
                    FeatureContribution::new("sightings", 0.8, 1.0),
                    FeatureContribution::new("route change", -0.4, 0.5),
                ],
            )
        })
        .unwrap();

    assert_eq!(analysis.node.node_type, NodeType::Analyze);
    assert_eq!(analysis.result["items"], 2);

    let report = engine.generate_human_readable_report(&analysis.explanation);
    assert!(report.starts_with("# Decision Explanation: risk assessment"));
    assert!(report.contains(&analysis.explanation.id.to_string()));
    assert!(report.contains("## Reasoning Chain"));
    assert!(report.contains("1. **input validation**"));
    assert!(report.contains("3. **analysis execution**"));
    assert!(report.contains("**sightings**"));
    assert!(report.contains("## Limitations"));
    assert!(report.contains("## Uncertainty Factors"));
    assert!(report.contains("## Alternatives Considered"));
}

#[test]
fn test_prioritization_keeps_input_order_for_ties() {
    let mut engine = engine();
    let items = vec![
        PriorityItem::new("C", 0.6),
        PriorityItem::new("A", 0.8),
        PriorityItem::new("B", 0.8),
    ];
    let criteria = vec![Criterion::new("threat", 1.0, |score: &f64| *score)];

    let prioritization = engine.prioritize_with_justification(items, &criteria).unwrap();

    let order: Vec<&str> = prioritization.ranked.iter().map(|r| r.item.id.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert_eq!(prioritization.explanation.kind, DecisionKind::Prioritization);

    let trail = engine.get_audit_trail(&AuditFilter::default().action("prioritize"));
    assert_eq!(trail.len(), 1);
    assert_eq!(
        trail[0].decision.as_ref().map(|d| d.id),
        Some(prioritization.explanation.id)
    );
}

#[test]
fn test_audit_manifest_covers_every_operation() {
    let mut engine = engine();
    let alpha = source("humint:alpha", ReliabilityGrade::A, CredibilityGrade::Confirmed);

    let batch = engine
        .ingest_data(&alpha, "raw", vec![ExtractedEvidence::new("a", 0.6)])
        .unwrap();
    engine
        .analyze_with_explanation(DecisionKind::LinkPrediction, &batch.evidence, |_| {
            AnalysisOutput::new(true, Vec::new())
        })
        .unwrap();
    let product = engine
        .fuse_intelligence(&[SourceEvidence::new(alpha, batch.evidence.clone())], FusionStrategy::DempsterShafer)
        .unwrap();
    engine
        .prioritize_with_justification(vec![PriorityItem::new("x", ())], &[])
        .unwrap();
    engine.verify_chain_of_trust(&product.id).unwrap();

    let manifest = engine.export_audit_manifest().unwrap();
    let actions: Vec<&str> = manifest.records.iter().map(|r| r.action.as_str()).collect();
    assert_eq!(actions, vec!["ingest", "analyze", "fuse", "prioritize", "verify"]);
    assert!(manifest.records.iter().all(|r| r.actor == "veracity-engine"));
    assert!(engine.verify_audit_ledger().unwrap().is_empty());

    let json = serde_json::to_string(&manifest).unwrap();
    let reloaded: AuditManifest = serde_json::from_str(&json).unwrap();
    let verification = reloaded.verify(&KeyedHashSigner::new(SECRET)).unwrap();
    assert!(verification.valid, "{:?}", verification.issues);
    assert_eq!(verification.record_count, 5);
}

#[test]
fn test_manifest_survives_non_finite_features() {
    let mut engine = engine();
    let alpha = source("humint:alpha", ReliabilityGrade::B, CredibilityGrade::ProbablyTrue);
    let batch = engine
        .ingest_data(&alpha, "raw", vec![ExtractedEvidence::new("meeting observed", 0.7)])
        .unwrap();

    let analysis = engine
        .analyze_with_explanation(DecisionKind::AnomalyDetection, &batch.evidence, |_| {
            let mut skewed = FeatureContribution::new("skewed", 0.4, 0.5);
            skewed.weight = f64::NAN;
            AnalysisOutput::new(
                "anomalous",
                vec![FeatureContribution::new("corrupt", f64::NAN, 0.5), skewed],
            )
        })
        .unwrap();
    assert!(analysis.explanation.confidence.is_finite());
    assert!(analysis
        .explanation
        .features
        .iter()
        .all(|f| f.value.is_finite() && f.weight.is_finite() && f.contribution.is_finite()));

    let json = serde_json::to_string(&engine.export_audit_manifest().unwrap()).unwrap();
    let reloaded: AuditManifest = serde_json::from_str(&json).unwrap();
    let verification = reloaded.verify(&KeyedHashSigner::new(SECRET)).unwrap();
    assert!(verification.valid, "{:?}", verification.issues);
    assert_eq!(verification.record_count, 2);
}

#[test]
fn test_observer_receives_every_event_kind() {
    let mut engine = engine();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    engine.subscribe(move |event: &EngineEvent| sink.lock().unwrap().push(event.clone()));

    let alpha = source("humint:alpha", ReliabilityGrade::A, CredibilityGrade::Confirmed);
    let batch = engine
        .ingest_data(&alpha, "raw", vec![ExtractedEvidence::new("a", 0.6)])
        .unwrap();
    engine
        .analyze_with_explanation(DecisionKind::AnomalyDetection, &batch.evidence, |_| {
            AnalysisOutput::new(0.4, Vec::new())
        })
        .unwrap();
    let product = engine
        .fuse_intelligence(&[SourceEvidence::new(alpha, batch.evidence)], FusionStrategy::MajorityVote)
        .unwrap();
    engine
        .prioritize_with_justification::<()>(Vec::new(), &[])
        .unwrap();
    engine.verify_chain_of_trust(&product.id).unwrap();

    let events = events.lock().unwrap();
    let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "dataIngested",
            "analysisCompleted",
            "fusionCompleted",
            "prioritizationCompleted",
            "chainVerified"
        ]
    );
    assert_eq!(
        events[2],
        EngineEvent::FusionCompleted {
            product_id: product.id,
            strategy: FusionStrategy::MajorityVote,
            confidence: product.confidence,
        }
    );
}

#[test]
fn test_engine_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
actor_id = "cell-4"
signing_secret = "file-secret"
default_strategy = "BAYESIAN"
product_ttl_hours = 12

[explanation]
report_top_features = 2
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    let mut engine = ProvenanceEngine::new(config).unwrap();
    let alpha = source("humint:alpha", ReliabilityGrade::A, CredibilityGrade::Confirmed);
    let batch = engine
        .ingest_data(&alpha, "raw", vec![ExtractedEvidence::new("a", 0.6)])
        .unwrap();
    let product = engine
        .fuse_with_default_strategy(&[SourceEvidence::new(alpha, batch.evidence)])
        .unwrap();

    assert_eq!(product.chain[1].operation, "BAYESIAN fusion");
    assert_eq!(product.chain[0].component, "cell-4/fusion");
    assert_eq!(product.expires_at, Some(product.created_at + chrono::Duration::hours(12)));
    assert_eq!(engine.ledger().records()[0].actor, "cell-4");
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "product_ttl_hours = 0").unwrap();

    assert!(EngineConfig::from_file(file.path()).is_err());
}
