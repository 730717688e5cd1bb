//! Provenance engine facade over the trust, ledger, fusion and ranking layers

use crate::{EngineConfig, EngineError, EngineEvent, EngineMetrics, EngineObserver};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, warn};
use veracity_domain::scoring::{blend, clamp_unit, mean, weighted_mean, DEFAULT_CONFIDENCE};
use veracity_domain::{
    ArtifactId, AuditFilter, AuditRecord, ChainOfTrustNode, ChainStore, ContentHasher, DataSource,
    DecisionExplanation, DecisionKind, EvidenceItem, FeatureContribution, IntelligenceProduct,
    NodeType, ReasoningStep, Signer,
};
use veracity_explain::{render_report, ExplanationSynthesizer};
use veracity_fusion::{EvidenceFusionEngine, FusionStrategy, SourceEvidence};
use veracity_ledger::{AuditLedger, AuditManifest, LedgerIssue};
use veracity_prioritize::{Criterion, Prioritization, PrioritizationEngine, PriorityItem};
use veracity_trust::{
    hash_json, merkle_root, ChainOfTrustBuilder, ChainVerification, InMemoryChainStore,
    KeyedHashSigner, NodeSpec, Sha256Hasher,
};

/// Share of the feature-set confidence in an analysis' overall confidence
const FEATURE_SHARE: f64 = 0.6;

/// Longest outcome text derived from a serialized analysis result
const MAX_OUTCOME_CHARS: usize = 160;

/// One statement extracted from raw source data, before hashing
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEvidence {
    /// Statement text
    pub content: String,
    /// Extractor confidence in [0, 1]
    pub confidence: f64,
}

impl ExtractedEvidence {
    /// Create an extracted statement
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence,
        }
    }
}

/// Result of ingesting one batch of raw data
#[derive(Debug, Clone)]
pub struct Ingestion {
    /// Chain id of the batch
    pub batch_id: ArtifactId,
    /// Hashed evidence items, in extraction order
    pub evidence: Vec<EvidenceItem>,
    /// The ingest node
    pub node: ChainOfTrustNode,
}

/// What a caller-supplied analysis returns
#[derive(Debug, Clone)]
pub struct AnalysisOutput<R> {
    /// Analysis result, hashed into the analyze node
    pub result: R,
    /// Features the analysis scored
    pub features: Vec<FeatureContribution>,
}

impl<R> AnalysisOutput<R> {
    /// Pair a result with its features
    pub fn new(result: R, features: Vec<FeatureContribution>) -> Self {
        Self { result, features }
    }
}

/// An analysis result with its explanation and chain node
#[derive(Debug, Clone)]
pub struct Analysis<R> {
    /// The caller's result
    pub result: R,
    /// Three-step explanation
    pub explanation: DecisionExplanation,
    /// The analyze node, on the chain keyed by the explanation id
    pub node: ChainOfTrustNode,
}

/// Provenance engine
///
/// Owns the chain store, the audit ledger and the engines that produce
/// explained decisions. Every state-mutating operation appends an audit
/// record (unless disabled) and notifies observers afterwards.
///
/// Not internally synchronized: wrap in a mutex to share across threads.
///
/// # Examples
///
/// ```
/// use veracity_domain::{Classification, CredibilityGrade, DataSource, ReliabilityGrade, SourceCategory};
/// use veracity_engine::{EngineConfig, ExtractedEvidence, ProvenanceEngine};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EngineConfig {
///     signing_secret: Some("doc-secret".to_string()),
///     ..EngineConfig::default()
/// };
/// let mut engine = ProvenanceEngine::new(config)?;
///
/// let source = DataSource::new(
///     "osint:feed-3",
///     SourceCategory::Osint,
///     Classification::Unclassified,
///     ReliabilityGrade::C,
///     CredibilityGrade::PossiblyTrue,
/// );
/// let batch = engine.ingest_data(
///     &source,
///     "raw feed dump",
///     vec![ExtractedEvidence::new("vessel sighted at berth 4", 0.7)],
/// )?;
///
/// assert!(engine.verify_chain_of_trust(&batch.batch_id)?.valid);
/// assert_eq!(engine.export_audit_manifest()?.records.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ProvenanceEngine<S = KeyedHashSigner, C = InMemoryChainStore> {
    config: EngineConfig,
    hasher: Sha256Hasher,
    builder: ChainOfTrustBuilder<S, C>,
    ledger: AuditLedger,
    synthesizer: ExplanationSynthesizer,
    fusion: EvidenceFusionEngine,
    prioritizer: PrioritizationEngine,
    observers: Vec<Box<dyn EngineObserver>>,
    metrics: EngineMetrics,
}

impl ProvenanceEngine<KeyedHashSigner, InMemoryChainStore> {
    /// Create an engine with an in-memory chain store
    ///
    /// Validates `config` and resolves the signing secret from it.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let signer = KeyedHashSigner::new(config.resolve_secret()?);
        Ok(Self::with_parts(config, signer, InMemoryChainStore::new()))
    }
}

impl<S: Signer, C: ChainStore> ProvenanceEngine<S, C> {
    /// Create an engine from an explicit signer and chain store
    pub fn with_parts(config: EngineConfig, signer: S, store: C) -> Self {
        let synthesizer = ExplanationSynthesizer::new(config.explanation.clone());
        let fusion = EvidenceFusionEngine::new(synthesizer.clone())
            .with_component(format!("{}/fusion", config.actor_id))
            .with_ttl(config.product_ttl());
        let prioritizer = PrioritizationEngine::new(config.prioritization.clone(), synthesizer.clone());

        info!(
            "Provenance engine ready: actor {}, default strategy {}",
            config.actor_id, config.default_strategy
        );

        Self {
            config,
            hasher: Sha256Hasher,
            builder: ChainOfTrustBuilder::new(signer, store),
            ledger: AuditLedger::new(),
            synthesizer,
            fusion,
            prioritizer,
            observers: Vec::new(),
            metrics: EngineMetrics::new(),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Operation counters
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// The audit ledger
    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    /// Nodes of a chain, `None` for an unknown id
    pub fn chain(&self, chain_id: &ArtifactId) -> Option<&[ChainOfTrustNode]> {
        self.builder.chain(chain_id)
    }

    /// Register an observer for engine events
    pub fn subscribe(&mut self, observer: impl EngineObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Hash extracted evidence and record it on a new ingest chain
    ///
    /// The ingest node's input is the hash of `raw_data` and its output is
    /// the Merkle root of the evidence hashes.
    pub fn ingest_data(
        &mut self,
        source: &DataSource,
        raw_data: &str,
        extracted: Vec<ExtractedEvidence>,
    ) -> Result<Ingestion, EngineError> {
        let batch_id = ArtifactId::new();
        let evidence: Vec<EvidenceItem> = extracted
            .into_iter()
            .map(|e| {
                EvidenceItem::new(&self.hasher, &source.id, e.content, e.confidence)
                    .with_metadata("category", source.category.as_str())
                    .with_metadata("grade", source.grade_code())
                    .with_metadata("batch_id", batch_id.to_string())
            })
            .collect();
        let hashes: Vec<String> = evidence.iter().map(|e| e.content_hash.clone()).collect();

        let node = self.builder.append(
            batch_id,
            NodeSpec::new(
                NodeType::Ingest,
                format!("{}/ingest", self.config.actor_id),
                format!("ingest from {}", source.id),
                vec![self.hasher.hash(raw_data)],
                merkle_root(&self.hasher, &hashes),
            ),
        );

        info!(
            "Ingested {} evidence items from {} into batch {}",
            evidence.len(),
            source.id,
            batch_id
        );
        self.metrics.record_ingest(evidence.len());
        self.audit("ingest", batch_id.to_string(), None)?;
        self.emit(EngineEvent::DataIngested {
            batch_id,
            source_id: source.id.clone(),
            item_count: evidence.len(),
        });

        Ok(Ingestion {
            batch_id,
            evidence,
            node,
        })
    }

    /// Run `analysis` over `evidence` and explain the result
    ///
    /// Records three reasoning steps (input validation, feature extraction,
    /// analysis execution) and mints an analyze node whose inputs are the
    /// evidence hashes and whose output is the hash of the result. Overall
    /// confidence blends the feature-set confidence (60%) with the mean
    /// evidence confidence (40%).
    pub fn analyze_with_explanation<R, F>(
        &mut self,
        kind: DecisionKind,
        evidence: &[EvidenceItem],
        analysis: F,
    ) -> Result<Analysis<R>, EngineError>
    where
        R: Serialize,
        F: FnOnce(&[EvidenceItem]) -> AnalysisOutput<R>,
    {
        let evidence_ids: Vec<String> = evidence.iter().map(|e| e.id.to_string()).collect();
        let evidence_hashes: Vec<String> = evidence.iter().map(|e| e.content_hash.clone()).collect();
        let evidence_mean = mean(&evidence.iter().map(|e| e.confidence).collect::<Vec<_>>())
            .unwrap_or(DEFAULT_CONFIDENCE);

        // 1. Input validation
        let started = Instant::now();
        let sources: BTreeSet<&str> = evidence.iter().map(|e| e.source_id.as_str()).collect();
        let validation = ReasoningStep::new(1, "input validation", "distinct-source-count")
            .description(format!(
                "Validated {} evidence items from {} distinct sources",
                evidence.len(),
                sources.len()
            ))
            .io(evidence_ids.clone(), Vec::new())
            .parameter("evidence_count", evidence.len())
            .parameter("source_count", sources.len())
            .confidence(evidence_mean, evidence_mean)
            .duration(started.elapsed())
            .narrative(format!("Mean evidence confidence {:.3}", evidence_mean));

        // 2. Feature extraction
        let started = Instant::now();
        let AnalysisOutput { result, features } = analysis(evidence);
        let weighted: Vec<(f64, f64)> = features.iter().map(|f| (f.contribution, f.weight)).collect();
        let feature_confidence = weighted_mean(&weighted)
            .map(clamp_unit)
            .unwrap_or(DEFAULT_CONFIDENCE);
        let extraction = ReasoningStep::new(2, "feature extraction", "weighted-feature-mean")
            .description(format!("Scored {} features", features.len()))
            .io(evidence_ids, features.iter().map(|f| f.name.clone()).collect())
            .parameter("feature_count", features.len())
            .confidence(evidence_mean, feature_confidence)
            .duration(started.elapsed())
            .narrative(format!("Feature-set confidence {:.3}", feature_confidence));

        // 3. Analysis execution
        let started = Instant::now();
        let confidence = blend(feature_confidence, evidence_mean, FEATURE_SHARE);
        let output_hash = hash_json(&self.hasher, &result)?;
        let execution = ReasoningStep::new(3, "analysis execution", "feature-evidence-blend")
            .description("Combined feature and evidence confidence")
            .io(Vec::new(), vec![output_hash.clone()])
            .parameter("feature_share", FEATURE_SHARE)
            .confidence(feature_confidence, confidence)
            .duration(started.elapsed())
            .narrative(format!(
                "{:.0}% of {:.3} plus {:.0}% of {:.3} gives {:.3}",
                FEATURE_SHARE * 100.0,
                feature_confidence,
                (1.0 - FEATURE_SHARE) * 100.0,
                evidence_mean,
                confidence
            ));

        let (supporting, contrary): (Vec<EvidenceItem>, Vec<EvidenceItem>) = evidence
            .iter()
            .cloned()
            .partition(|e| e.confidence >= DEFAULT_CONFIDENCE);
        let explanation = self.synthesizer.build_explanation(
            kind,
            outcome_text(&serde_json::to_string(&result)?),
            confidence,
            vec![validation, extraction, execution],
            features,
            supporting,
            contrary,
        );

        let node = self.builder.append(
            explanation.id,
            NodeSpec::new(
                NodeType::Analyze,
                format!("{}/analysis", self.config.actor_id),
                format!("{} analysis", kind.label()),
                evidence_hashes,
                output_hash,
            ),
        );

        info!(
            "Completed {} analysis over {} evidence items: confidence {:.3}, explanation {}",
            kind.label(),
            evidence.len(),
            explanation.confidence,
            explanation.id
        );
        self.metrics.record_analysis();
        self.audit("analyze", explanation.id.to_string(), Some(explanation.clone()))?;
        self.emit(EngineEvent::AnalysisCompleted {
            explanation_id: explanation.id,
            kind,
            confidence: explanation.confidence,
        });

        Ok(Analysis {
            result,
            explanation,
            node,
        })
    }

    /// Rank `items` by `criteria` and explain the ranking
    pub fn prioritize_with_justification<T>(
        &mut self,
        items: Vec<PriorityItem<T>>,
        criteria: &[Criterion<T>],
    ) -> Result<Prioritization<T>, EngineError> {
        let prioritization = self.prioritizer.prioritize(items, criteria);
        let explanation_id = prioritization.explanation.id;

        self.metrics.record_prioritization();
        self.audit(
            "prioritize",
            explanation_id.to_string(),
            Some(prioritization.explanation.clone()),
        )?;
        self.emit(EngineEvent::PrioritizationCompleted {
            explanation_id,
            item_count: prioritization.ranked.len(),
        });

        Ok(prioritization)
    }

    /// Fuse evidence from `sources` into an intelligence product
    pub fn fuse_intelligence(
        &mut self,
        sources: &[SourceEvidence],
        strategy: FusionStrategy,
    ) -> Result<IntelligenceProduct, EngineError> {
        let product = self.fusion.fuse(&mut self.builder, sources, strategy)?;

        self.metrics.record_fusion();
        self.audit("fuse", product.id.to_string(), Some(product.explanation.clone()))?;
        self.emit(EngineEvent::FusionCompleted {
            product_id: product.id,
            strategy,
            confidence: product.confidence,
        });

        Ok(product)
    }

    /// Fuse with the configured default strategy
    pub fn fuse_with_default_strategy(
        &mut self,
        sources: &[SourceEvidence],
    ) -> Result<IntelligenceProduct, EngineError> {
        let strategy = self.config.default_strategy;
        self.fuse_intelligence(sources, strategy)
    }

    /// Replay a chain's signatures, linkage and attestations
    ///
    /// Integrity findings are reported in the result; only an unknown chain
    /// is an error.
    pub fn verify_chain_of_trust(
        &mut self,
        chain_id: &ArtifactId,
    ) -> Result<ChainVerification, EngineError> {
        let verification = self.builder.verify(chain_id)?;

        if !verification.valid {
            warn!(
                "Chain {} failed verification with {} issues",
                chain_id,
                verification.issues.len()
            );
        }
        self.metrics.record_verification(verification.valid);
        self.audit("verify", chain_id.to_string(), None)?;
        self.emit(EngineEvent::ChainVerified {
            chain_id: *chain_id,
            valid: verification.valid,
        });

        Ok(verification)
    }

    /// Audit records matching `filter`, in append order
    pub fn get_audit_trail(&self, filter: &AuditFilter) -> Vec<&AuditRecord> {
        self.ledger.query(filter)
    }

    /// Export every audit record with a signed Merkle root
    pub fn export_audit_manifest(&self) -> Result<AuditManifest, EngineError> {
        Ok(self.ledger.export_manifest(self.builder.signer())?)
    }

    /// Replay the in-memory ledger's linkage and chain hashes
    pub fn verify_audit_ledger(&self) -> Result<Vec<LedgerIssue>, EngineError> {
        Ok(self.ledger.verify_integrity()?)
    }

    /// Markdown report of an explanation
    pub fn generate_human_readable_report(&self, explanation: &DecisionExplanation) -> String {
        render_report(explanation, self.config.explanation.report_top_features)
    }

    fn audit(
        &mut self,
        action: &str,
        resource: String,
        decision: Option<DecisionExplanation>,
    ) -> Result<(), EngineError> {
        if !self.config.record_audit {
            return Ok(());
        }
        self.ledger
            .append(self.config.actor_id.as_str(), action, resource, decision)?;
        self.metrics.record_audit();
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        debug!("Emitting {} to {} observers", event.name(), self.observers.len());
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

/// Serialized result, cut to a readable length on a char boundary
fn outcome_text(serialized: &str) -> String {
    if serialized.chars().count() <= MAX_OUTCOME_CHARS {
        return serialized.to_string();
    }
    let mut cut: String = serialized.chars().take(MAX_OUTCOME_CHARS).collect();
    cut.push('…');
    cut
}
