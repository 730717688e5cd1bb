//! Multi-criteria ranking logic

use crate::PrioritizationConfig;
use std::fmt;
use std::time::Instant;
use tracing::info;
use veracity_domain::scoring::{clamp_unit, mean, normalize, weighted_mean, DEFAULT_CONFIDENCE};
use veracity_domain::{
    DecisionExplanation, DecisionKind, EvidenceItem, FeatureContribution, ReasoningStep,
};
use veracity_explain::ExplanationSynthesizer;

/// An item to rank
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityItem<T> {
    /// Item identifier
    pub id: String,
    /// Payload handed to criterion evaluators
    pub data: T,
    /// Evidence backing the item
    pub evidence: Vec<EvidenceItem>,
}

impl<T> PriorityItem<T> {
    /// Create an item without evidence
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            evidence: Vec::new(),
        }
    }

    /// Attach backing evidence
    pub fn with_evidence(mut self, evidence: Vec<EvidenceItem>) -> Self {
        self.evidence = evidence;
        self
    }
}

type Evaluator<T> = Box<dyn Fn(&T) -> f64 + Send + Sync>;

/// A weighted scoring criterion
pub struct Criterion<T> {
    /// Criterion name
    pub name: String,
    /// Relative weight
    pub weight: f64,
    evaluator: Evaluator<T>,
}

impl<T> Criterion<T> {
    /// Create a criterion; the evaluator should return a score in [0, 1]
    ///
    /// A negative or non-finite weight is treated as 0.
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        evaluator: impl Fn(&T) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        Self {
            name: name.into(),
            weight,
            evaluator: Box::new(evaluator),
        }
    }

    /// Score `data`, clamped into [0, 1]
    pub fn evaluate(&self, data: &T) -> f64 {
        clamp_unit((self.evaluator)(data))
    }
}

impl<T> fmt::Debug for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// One criterion's score for one item
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    /// Criterion name
    pub criterion: String,
    /// Evaluator output in [0, 1]
    pub raw: f64,
    /// Criterion weight
    pub weight: f64,
    /// `raw × weight`
    pub weighted: f64,
}

/// A ranked item with its score breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem<T> {
    /// 1-based rank
    pub rank: usize,
    /// The item
    pub item: PriorityItem<T>,
    /// Composite score: Σ weighted / Σ weight
    pub score: f64,
    /// Per-criterion breakdown in criteria order
    pub criterion_scores: Vec<CriterionScore>,
    /// Text citing the strongest criteria
    pub justification: String,
}

/// Ranked items plus the explanation of the ranking
#[derive(Debug, Clone)]
pub struct Prioritization<T> {
    /// Items in descending score order
    pub ranked: Vec<RankedItem<T>>,
    /// Explanation of the ranking
    pub explanation: DecisionExplanation,
}

/// Ranks items by weighted criteria and justifies the ranking
///
/// A pure scoring pass: no chain-of-trust node is minted here.
#[derive(Debug, Clone, Default)]
pub struct PrioritizationEngine {
    config: PrioritizationConfig,
    synthesizer: ExplanationSynthesizer,
}

impl PrioritizationEngine {
    /// Create an engine
    pub fn new(config: PrioritizationConfig, synthesizer: ExplanationSynthesizer) -> Self {
        Self {
            config,
            synthesizer,
        }
    }

    /// Rank `items` by `criteria`
    ///
    /// Equal scores keep their input order. With no criteria every item
    /// scores 0.
    pub fn prioritize<T>(
        &self,
        items: Vec<PriorityItem<T>>,
        criteria: &[Criterion<T>],
    ) -> Prioritization<T> {
        let item_count = items.len();
        let item_ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();

        // 1. Criteria evaluation
        let started = Instant::now();
        let mut scored: Vec<(PriorityItem<T>, Vec<CriterionScore>, f64)> = items
            .into_iter()
            .map(|item| {
                let scores = Self::score(&item.data, criteria);
                let composite = Self::composite(&scores);
                (item, scores, composite)
            })
            .collect();
        let composites: Vec<f64> = scored.iter().map(|(_, _, c)| *c).collect();
        let mean_score = mean(&composites).unwrap_or(DEFAULT_CONFIDENCE);
        let evaluation = ReasoningStep::new(1, "criteria evaluation", "weighted-sum")
            .description(format!(
                "Evaluated {} criteria across {} items",
                criteria.len(),
                item_count
            ))
            .io(
                item_ids,
                criteria.iter().map(|c| c.name.clone()).collect(),
            )
            .parameter("criteria", criteria.len())
            .parameter("items", item_count)
            .confidence(DEFAULT_CONFIDENCE, mean_score)
            .duration(started.elapsed())
            .narrative(format!(
                "Each item's composite is its weighted criterion scores divided by the total weight; mean composite {:.3}",
                mean_score
            ));

        // 2. Rank ordering
        let started = Instant::now();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2));
        let ranked: Vec<RankedItem<T>> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (item, criterion_scores, score))| {
                let justification = self.justify(index + 1, score, &criterion_scores);
                RankedItem {
                    rank: index + 1,
                    item,
                    score,
                    criterion_scores,
                    justification,
                }
            })
            .collect();
        let confidence = ranked.first().map_or(DEFAULT_CONFIDENCE, |top| top.score);
        let ordering = ReasoningStep::new(2, "rank ordering", "stable-descending-sort")
            .description("Sorted items by composite score, ties kept in input order")
            .io(
                vec![],
                ranked.iter().map(|r| r.item.id.clone()).collect(),
            )
            .confidence(mean_score, confidence)
            .duration(started.elapsed())
            .narrative(match ranked.first() {
                Some(top) => format!("{} ranks first with {:.3}", top.item.id, top.score),
                None => "Nothing to rank".to_string(),
            });

        let features = self.features(&ranked, criteria);
        let (supporting, contrary) = ranked
            .first()
            .map(|top| split_evidence(&top.item.evidence))
            .unwrap_or_default();
        let outcome = match ranked.first() {
            Some(top) => format!("{} ranked highest of {} items", top.item.id, ranked.len()),
            None => "no items to prioritize".to_string(),
        };

        let explanation = self.synthesizer.build_explanation(
            DecisionKind::Prioritization,
            outcome,
            confidence,
            vec![evaluation, ordering],
            features,
            supporting,
            contrary,
        );

        info!(
            "Prioritized {} items across {} criteria (confidence {:.3})",
            ranked.len(),
            criteria.len(),
            explanation.confidence
        );

        Prioritization {
            ranked,
            explanation,
        }
    }

    fn score<T>(data: &T, criteria: &[Criterion<T>]) -> Vec<CriterionScore> {
        criteria
            .iter()
            .map(|criterion| {
                let raw = criterion.evaluate(data);
                CriterionScore {
                    criterion: criterion.name.clone(),
                    raw,
                    weight: criterion.weight,
                    weighted: raw * criterion.weight,
                }
            })
            .collect()
    }

    fn composite(scores: &[CriterionScore]) -> f64 {
        let pairs: Vec<(f64, f64)> = scores.iter().map(|s| (s.raw, s.weight)).collect();
        weighted_mean(&pairs).map_or(0.0, clamp_unit)
    }

    fn justify(&self, rank: usize, score: f64, scores: &[CriterionScore]) -> String {
        let mut strongest: Vec<&CriterionScore> = scores.iter().collect();
        strongest.sort_by(|a, b| b.weighted.total_cmp(&a.weighted));
        strongest.truncate(self.config.justification_criteria);

        let cited = if strongest.is_empty() {
            "no criteria evaluated".to_string()
        } else {
            strongest
                .iter()
                .map(|s| format!("{} ({:.3})", s.criterion, s.weighted))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("Ranked #{} with composite score {:.3}: {}", rank, score, cited)
    }

    /// Per-criterion mean scores, then per-item composites, capped
    fn features<T>(&self, ranked: &[RankedItem<T>], criteria: &[Criterion<T>]) -> Vec<FeatureContribution> {
        let weights = normalize(&criteria.iter().map(|c| c.weight).collect::<Vec<_>>());
        let mut features: Vec<FeatureContribution> = criteria
            .iter()
            .enumerate()
            .map(|(i, criterion)| {
                let raws: Vec<f64> = ranked.iter().map(|r| r.criterion_scores[i].raw).collect();
                let value = mean(&raws).unwrap_or(0.0);
                FeatureContribution::new(&criterion.name, value, weights[i])
            })
            .collect();

        let share = if ranked.is_empty() { 0.0 } else { 1.0 / ranked.len() as f64 };
        features.extend(
            ranked
                .iter()
                .map(|r| FeatureContribution::new(format!("item:{}", r.item.id), r.score, share)),
        );

        features.truncate(self.config.max_feature_contributions);
        features
    }
}

/// Split evidence at 0.5 confidence into supporting and contrary
fn split_evidence(evidence: &[EvidenceItem]) -> (Vec<EvidenceItem>, Vec<EvidenceItem>) {
    evidence
        .iter()
        .cloned()
        .partition(|e| e.confidence >= DEFAULT_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_trust::Sha256Hasher;

    fn engine() -> PrioritizationEngine {
        PrioritizationEngine::default()
    }

    fn identity() -> Vec<Criterion<f64>> {
        vec![Criterion::new("threat", 1.0, |score: &f64| *score)]
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let items = vec![
            PriorityItem::new("C", 0.6),
            PriorityItem::new("A", 0.8),
            PriorityItem::new("B", 0.8),
        ];
        let result = engine().prioritize(items, &identity());

        let order: Vec<&str> = result.ranked.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(result.ranked[0].rank, 1);
        assert_eq!(result.ranked[2].rank, 3);
    }

    #[test]
    fn test_composite_is_weighted_mean() {
        let criteria = vec![
            Criterion::new("severity", 3.0, |v: &(f64, f64)| v.0),
            Criterion::new("urgency", 1.0, |v: &(f64, f64)| v.1),
        ];
        let result = engine().prioritize(vec![PriorityItem::new("x", (0.8, 0.4))], &criteria);

        let ranked = &result.ranked[0];
        assert!((ranked.score - 0.7).abs() < 1e-12);
        assert!((ranked.criterion_scores[0].weighted - 2.4).abs() < 1e-12);
        assert!(ranked.justification.starts_with("Ranked #1 with composite score 0.700: severity (2.400), urgency (0.400)"));
    }

    #[test]
    fn test_evaluator_output_is_clamped() {
        let criteria = vec![Criterion::new("wild", 1.0, |_: &()| 7.5)];
        let result = engine().prioritize(vec![PriorityItem::new("x", ())], &criteria);
        assert_eq!(result.ranked[0].score, 1.0);
    }

    #[test]
    fn test_invalid_weights_count_as_zero() {
        let criteria = vec![
            Criterion::new("good", 1.0, |v: &f64| *v),
            Criterion::new("bad", f64::NAN, |_: &f64| 1.0),
            Criterion::new("negative", -2.0, |_: &f64| 1.0),
        ];
        assert_eq!(criteria[1].weight, 0.0);
        assert_eq!(criteria[2].weight, 0.0);

        let items = vec![PriorityItem::new("low", 0.2), PriorityItem::new("high", 0.9)];
        let result = engine().prioritize(items, &criteria);

        let order: Vec<&str> = result.ranked.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(order, vec!["high", "low"]);
        assert!((result.ranked[0].score - 0.9).abs() < 1e-12);
        assert!((result.ranked[1].score - 0.2).abs() < 1e-12);
        assert!(result.explanation.confidence.is_finite());
    }

    #[test]
    fn test_all_weights_invalid_score_zero() {
        let criteria = vec![Criterion::new("bad", f64::INFINITY, |v: &f64| *v)];
        let result = engine().prioritize(vec![PriorityItem::new("x", 0.7)], &criteria);
        assert_eq!(result.ranked[0].score, 0.0);
    }

    #[test]
    fn test_empty_criteria_score_zero() {
        let items = vec![PriorityItem::new("first", 0.9), PriorityItem::new("second", 0.1)];
        let result = engine().prioritize(items, &[]);

        assert!(result.ranked.iter().all(|r| r.score == 0.0));
        assert_eq!(result.ranked[0].item.id, "first");
        assert!(result.ranked[0].justification.ends_with("no criteria evaluated"));
        assert_eq!(result.explanation.confidence, 0.0);
    }

    #[test]
    fn test_empty_items_default_confidence() {
        let result = engine().prioritize(Vec::<PriorityItem<f64>>::new(), &identity());

        assert!(result.ranked.is_empty());
        assert_eq!(result.explanation.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(result.explanation.outcome, "no items to prioritize");
    }

    #[test]
    fn test_explanation_has_two_steps() {
        let items = vec![PriorityItem::new("a", 0.3), PriorityItem::new("b", 0.9)];
        let result = engine().prioritize(items, &identity());
        let explanation = &result.explanation;

        assert_eq!(explanation.kind, DecisionKind::Prioritization);
        assert_eq!(explanation.reasoning.len(), 2);
        assert_eq!(explanation.reasoning[0].operation, "criteria evaluation");
        assert_eq!(explanation.reasoning[1].operation, "rank ordering");
        assert_eq!(explanation.reasoning[1].outputs, vec!["b".to_string(), "a".to_string()]);
        assert!((explanation.confidence - 0.9).abs() < 1e-12);
        assert_eq!(explanation.outcome, "b ranked highest of 2 items");
    }

    #[test]
    fn test_feature_contributions_are_capped() {
        let criteria: Vec<Criterion<f64>> = (0..15)
            .map(|i| Criterion::new(format!("c{}", i), 1.0, |v: &f64| *v))
            .collect();
        let items = (0..10).map(|i| PriorityItem::new(format!("i{}", i), 0.5)).collect();
        let result = engine().prioritize(items, &criteria);

        assert_eq!(result.explanation.features.len(), 20);
        assert_eq!(result.explanation.features[0].name, "c0");
        assert_eq!(result.explanation.features[15].name, "item:i0");
    }

    #[test]
    fn test_top_item_evidence_is_split() {
        let evidence = vec![
            EvidenceItem::new(&Sha256Hasher, "s", "strong", 0.9),
            EvidenceItem::new(&Sha256Hasher, "s", "weak", 0.2),
            EvidenceItem::new(&Sha256Hasher, "s", "borderline", 0.5),
        ];
        let items = vec![
            PriorityItem::new("low", 0.1),
            PriorityItem::new("high", 0.9).with_evidence(evidence),
        ];
        let result = engine().prioritize(items, &identity());

        assert_eq!(result.explanation.supporting_evidence.len(), 2);
        assert_eq!(result.explanation.contrary_evidence.len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Output is sorted descending and ranks are 1..=n
        #[test]
        fn test_ranking_is_sorted(scores in prop::collection::vec(0.0f64..=1.0, 0..30)) {
            let items = scores
                .iter()
                .enumerate()
                .map(|(i, s)| PriorityItem::new(i.to_string(), *s))
                .collect();
            let criteria = vec![Criterion::new("identity", 2.0, |v: &f64| *v)];
            let result = PrioritizationEngine::default().prioritize(items, &criteria);

            prop_assert_eq!(result.ranked.len(), scores.len());
            for pair in result.ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            for (i, ranked) in result.ranked.iter().enumerate() {
                prop_assert_eq!(ranked.rank, i + 1);
            }
        }
    }
}
