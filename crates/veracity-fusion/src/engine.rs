//! Multi-source evidence fusion into intelligence products

use crate::{FusionError, FusionStrategy, Observation};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;
use veracity_domain::product::derived_classification;
use veracity_domain::scoring::{mean, normalize, DEFAULT_CONFIDENCE};
use veracity_domain::{
    ArtifactId, ChainStore, Classification, ContentHasher, DataSource, DecisionExplanation,
    DecisionKind, EvidenceItem, FeatureContribution, IntelligenceProduct, NodeType, ReasoningStep,
    Signer,
};
use veracity_explain::ExplanationSynthesizer;
use veracity_trust::{hash_json, ChainOfTrustBuilder, NodeSpec, Sha256Hasher};

/// A source together with the evidence it contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvidence {
    /// The source
    pub source: DataSource,
    /// Evidence extracted from it
    pub evidence: Vec<EvidenceItem>,
}

impl SourceEvidence {
    /// Pair a source with its evidence
    pub fn new(source: DataSource, evidence: Vec<EvidenceItem>) -> Self {
        Self { source, evidence }
    }
}

/// Fields of a product covered by its output-node hash
#[derive(Serialize)]
struct ProductBody<'a> {
    id: &'a ArtifactId,
    title: &'a str,
    classification: Classification,
    summary: &'a str,
    confidence: f64,
    explanation: &'a DecisionExplanation,
}

/// Weights sources, fuses their evidence and records each stage on a chain
#[derive(Debug, Clone)]
pub struct EvidenceFusionEngine<H = Sha256Hasher> {
    hasher: H,
    synthesizer: ExplanationSynthesizer,
    component: String,
    ttl: Option<Duration>,
}

impl EvidenceFusionEngine<Sha256Hasher> {
    /// Create an engine hashing with SHA-256
    pub fn new(synthesizer: ExplanationSynthesizer) -> Self {
        Self::with_hasher(Sha256Hasher, synthesizer)
    }
}

impl Default for EvidenceFusionEngine<Sha256Hasher> {
    fn default() -> Self {
        Self::new(ExplanationSynthesizer::default())
    }
}

impl<H: ContentHasher> EvidenceFusionEngine<H> {
    /// Create an engine with a custom hasher
    pub fn with_hasher(hasher: H, synthesizer: ExplanationSynthesizer) -> Self {
        Self {
            hasher,
            synthesizer,
            component: "evidence-fusion".to_string(),
            ttl: None,
        }
    }

    /// Component name stamped on chain nodes (default: "evidence-fusion")
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// Products expire this long after creation
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fuse evidence from `sources` into one intelligence product
    ///
    /// Appends a transform, a fuse and an output node to a new chain keyed
    /// by the product id. No sources yield a 0.5-confidence product.
    pub fn fuse<S: Signer, C: ChainStore>(
        &self,
        builder: &mut ChainOfTrustBuilder<S, C>,
        sources: &[SourceEvidence],
        strategy: FusionStrategy,
    ) -> Result<IntelligenceProduct, FusionError> {
        let product_id = ArtifactId::new();
        let evidence: Vec<(&DataSource, &EvidenceItem)> = sources
            .iter()
            .flat_map(|s| s.evidence.iter().map(move |e| (&s.source, e)))
            .collect();
        let evidence_hashes: Vec<String> =
            evidence.iter().map(|(_, e)| e.content_hash.clone()).collect();
        let input_mean = mean(&evidence.iter().map(|(_, e)| e.confidence).collect::<Vec<_>>())
            .unwrap_or(DEFAULT_CONFIDENCE);

        // 1. Source weighting
        let started = Instant::now();
        let weights: Vec<(&str, f64)> = sources
            .iter()
            .map(|s| (s.source.id.as_str(), s.source.weight()))
            .collect();
        let weights_hash = hash_json(&self.hasher, &weights)?;
        builder.append(
            product_id,
            NodeSpec::new(
                NodeType::Transform,
                &self.component,
                "source weighting",
                evidence_hashes.clone(),
                &weights_hash,
            ),
        );
        let weighting = ReasoningStep::new(1, "source weighting", "reliability-credibility-product")
            .description(format!("Weighted {} sources by admiralty grade", sources.len()))
            .io(
                sources.iter().map(|s| s.source.id.clone()).collect(),
                vec![weights_hash.clone()],
            )
            .confidence(input_mean, input_mean)
            .duration(started.elapsed())
            .narrative(
                sources
                    .iter()
                    .map(|s| format!("{} ({}) weighs {:.3}", s.source.id, s.source.grade_code(), s.source.weight()))
                    .collect::<Vec<_>>()
                    .join("; "),
            );

        // 2. Evidence fusion
        let started = Instant::now();
        let observations: Vec<Observation> = evidence
            .iter()
            .map(|(source, item)| Observation::new(item.confidence, source.weight()))
            .collect();
        let fused_confidence = strategy.fuse(&observations);
        let fused_item = EvidenceItem::new(
            &self.hasher,
            format!("fusion:{}", product_id),
            format!(
                "{} fusion of {} evidence items from {} sources: confidence {:.3}",
                strategy,
                evidence.len(),
                sources.len(),
                fused_confidence
            ),
            fused_confidence,
        )
        .with_metadata("strategy", strategy.as_str())
        .with_metadata("source_count", sources.len())
        .with_metadata("evidence_count", evidence.len());
        builder.append(
            product_id,
            NodeSpec::new(
                NodeType::Fuse,
                &self.component,
                format!("{} fusion", strategy),
                evidence_hashes,
                &fused_item.content_hash,
            ),
        );
        let fusion = ReasoningStep::new(2, "evidence fusion", strategy.as_str())
            .description(format!("Fused {} evidence items", evidence.len()))
            .io(
                evidence.iter().map(|(_, e)| e.id.to_string()).collect(),
                vec![fused_item.id.to_string()],
            )
            .parameter("strategy", strategy.as_str())
            .parameter("evidence_count", evidence.len())
            .confidence(input_mean, fused_confidence)
            .duration(started.elapsed())
            .narrative(format!(
                "Mean evidence confidence {:.3} fused to {:.3}",
                input_mean, fused_confidence
            ));

        // 3. Product materialization
        let started = Instant::now();
        let sources_owned: Vec<DataSource> = sources.iter().map(|s| s.source.clone()).collect();
        let classification = derived_classification(&sources_owned);
        let materialization = ReasoningStep::new(3, "product materialization", "max-classification")
            .description("Derived classification and assembled the product")
            .io(vec![fused_item.id.to_string()], vec![product_id.to_string()])
            .parameter("classification", classification.as_str())
            .confidence(fused_confidence, fused_confidence)
            .duration(started.elapsed())
            .narrative(format!("Classified {} from {} sources", classification.as_str(), sources.len()));

        let (supporting, contrary): (Vec<EvidenceItem>, Vec<EvidenceItem>) = evidence
            .iter()
            .map(|(_, e)| (*e).clone())
            .partition(|e| e.confidence >= DEFAULT_CONFIDENCE);
        let explanation = self.synthesizer.build_explanation(
            DecisionKind::Fusion,
            format!("fused confidence {:.3} from {} sources", fused_confidence, sources.len()),
            fused_confidence,
            vec![weighting, fusion, materialization],
            source_features(sources),
            supporting,
            contrary,
        );

        let title = format!("{} fusion of {} sources", strategy, sources.len());
        let summary = explanation.summary.clone();
        let output_hash = hash_json(
            &self.hasher,
            &ProductBody {
                id: &product_id,
                title: &title,
                classification,
                summary: &summary,
                confidence: fused_confidence,
                explanation: &explanation,
            },
        )?;
        builder.append(
            product_id,
            NodeSpec::new(
                NodeType::Output,
                &self.component,
                "product materialization",
                vec![fused_item.content_hash.clone()],
                output_hash,
            ),
        );

        let chain = builder
            .chain(&product_id)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        let created_at = Utc::now();

        info!(
            "Fused {} evidence items from {} sources with {}: confidence {:.3}, product {}",
            evidence.len(),
            sources.len(),
            strategy,
            fused_confidence,
            product_id
        );

        Ok(IntelligenceProduct {
            id: product_id,
            title,
            classification,
            summary,
            confidence: fused_confidence,
            chain,
            explanation,
            sources: sources_owned,
            created_at,
            expires_at: self.ttl.map(|ttl| created_at + ttl),
        })
    }
}

/// One feature per source; contribution is its share of the total weight
fn source_features(sources: &[SourceEvidence]) -> Vec<FeatureContribution> {
    let raw: Vec<f64> = sources.iter().map(|s| s.source.weight()).collect();
    let shares = normalize(&raw);

    sources
        .iter()
        .zip(raw.iter().zip(shares.iter()))
        .map(|(s, (weight, share))| {
            FeatureContribution::with_contribution(&s.source.id, *weight, *share, *share).explained(
                format!(
                    "{} source {} graded {} carries {:.1}% of the total weight",
                    s.source.category.as_str(),
                    s.source.id,
                    s.source.grade_code(),
                    share * 100.0
                ),
            )
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use veracity_domain::{CredibilityGrade, ReliabilityGrade, SourceCategory};
    use veracity_trust::{InMemoryChainStore, KeyedHashSigner};

    fn grade() -> impl Strategy<Value = (ReliabilityGrade, CredibilityGrade)> {
        (0usize..6, 1u8..=6).prop_map(|(r, c)| {
            let reliability = [
                ReliabilityGrade::A,
                ReliabilityGrade::B,
                ReliabilityGrade::C,
                ReliabilityGrade::D,
                ReliabilityGrade::E,
                ReliabilityGrade::F,
            ][r];
            let credibility = CredibilityGrade::from_number(c).unwrap_or(CredibilityGrade::CannotBeJudged);
            (reliability, credibility)
        })
    }

    proptest! {
        /// Weighted consensus stays within the evidence confidence range
        #[test]
        fn test_fused_confidence_within_evidence_range(
            inputs in prop::collection::vec((grade(), prop::collection::vec(0.0f64..=1.0, 1..4)), 1..6)
        ) {
            let sources: Vec<SourceEvidence> = inputs
                .iter()
                .enumerate()
                .map(|(i, ((reliability, credibility), confidences))| {
                    let id = format!("src{}", i);
                    let evidence = confidences
                        .iter()
                        .map(|c| EvidenceItem::new(&Sha256Hasher, &id, "report", *c))
                        .collect();
                    SourceEvidence::new(
                        DataSource::new(&id, SourceCategory::Osint, Classification::Unclassified, *reliability, *credibility),
                        evidence,
                    )
                })
                .collect();
            let all: Vec<f64> = inputs.iter().flat_map(|(_, c)| c.iter().copied()).collect();
            let lo = all.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let mut builder = ChainOfTrustBuilder::new(KeyedHashSigner::new("p"), InMemoryChainStore::new());
            let product = EvidenceFusionEngine::default()
                .fuse(&mut builder, &sources, FusionStrategy::WeightedConsensus)
                .unwrap();

            prop_assert!(product.confidence >= lo - 1e-9 && product.confidence <= hi + 1e-9);
        }
    }
}
