//! Fusion strategies over weighted confidences

use serde::{Deserialize, Serialize};
use veracity_domain::scoring::{clamp_unit, mean, weighted_mean, DEFAULT_CONFIDENCE};

/// Bayesian pooling clamps confidences away from 0 and 1
const BAYES_CLAMP: (f64, f64) = (0.01, 0.99);

/// Below this, Dempster's normalization constant counts as total conflict
const CONFLICT_EPSILON: f64 = 1e-12;

/// One evidence confidence with the weight of its source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Evidence confidence in [0, 1]
    pub confidence: f64,
    /// Source weight in [0, 1]
    pub weight: f64,
}

impl Observation {
    /// Create an observation
    pub fn new(confidence: f64, weight: f64) -> Self {
        Self { confidence, weight }
    }
}

/// How weighted evidence confidences are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FusionStrategy {
    /// Σ(confidence × weight) / Σ(weight)
    #[default]
    WeightedConsensus,
    /// Weighted log-odds pooling from a 0.5 prior
    Bayesian,
    /// Dempster's rule on a binary frame, reported as pignistic probability
    DempsterShafer,
    /// Weighted vote at 0.5; the winning bloc's weighted mean
    MajorityVote,
}

impl FusionStrategy {
    /// Every strategy
    pub const ALL: [FusionStrategy; 4] = [
        FusionStrategy::WeightedConsensus,
        FusionStrategy::Bayesian,
        FusionStrategy::DempsterShafer,
        FusionStrategy::MajorityVote,
    ];

    /// Upper snake case tag, e.g. "DEMPSTER_SHAFER"
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionStrategy::WeightedConsensus => "WEIGHTED_CONSENSUS",
            FusionStrategy::Bayesian => "BAYESIAN",
            FusionStrategy::DempsterShafer => "DEMPSTER_SHAFER",
            FusionStrategy::MajorityVote => "MAJORITY_VOTE",
        }
    }

    /// Parse a tag, case-insensitively; dashes are accepted for underscores
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "WEIGHTED_CONSENSUS" => Some(FusionStrategy::WeightedConsensus),
            "BAYESIAN" => Some(FusionStrategy::Bayesian),
            "DEMPSTER_SHAFER" => Some(FusionStrategy::DempsterShafer),
            "MAJORITY_VOTE" => Some(FusionStrategy::MajorityVote),
            _ => None,
        }
    }

    /// Fuse observations into one confidence in [0, 1]
    ///
    /// No observations yield 0.5.
    pub fn fuse(&self, observations: &[Observation]) -> f64 {
        if observations.is_empty() {
            return DEFAULT_CONFIDENCE;
        }
        let fused = match self {
            FusionStrategy::WeightedConsensus => weighted_consensus(observations),
            FusionStrategy::Bayesian => bayesian(observations),
            FusionStrategy::DempsterShafer => dempster_shafer(observations),
            FusionStrategy::MajorityVote => majority_vote(observations),
        };
        clamp_unit(fused)
    }
}

impl std::fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FusionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown fusion strategy: {}", s))
    }
}

/// Weighted mean; the plain mean when every weight is zero
fn weighted_consensus(observations: &[Observation]) -> f64 {
    let pairs: Vec<(f64, f64)> = observations.iter().map(|o| (o.confidence, o.weight)).collect();
    weighted_mean(&pairs)
        .or_else(|| mean(&observations.iter().map(|o| o.confidence).collect::<Vec<_>>()))
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn bayesian(observations: &[Observation]) -> f64 {
    let log_odds: f64 = observations
        .iter()
        .map(|o| {
            let p = o.confidence.clamp(BAYES_CLAMP.0, BAYES_CLAMP.1);
            o.weight.max(0.0) * (p / (1.0 - p)).ln()
        })
        .sum();
    1.0 / (1.0 + (-log_odds).exp())
}

/// Masses on {hypothesis, negation, frame}
#[derive(Debug, Clone, Copy)]
struct Mass {
    yes: f64,
    no: f64,
    either: f64,
}

impl Mass {
    const VACUOUS: Mass = Mass {
        yes: 0.0,
        no: 0.0,
        either: 1.0,
    };

    fn of(observation: &Observation) -> Self {
        let w = clamp_unit(observation.weight);
        let c = clamp_unit(observation.confidence);
        Self {
            yes: w * c,
            no: w * (1.0 - c),
            either: 1.0 - w,
        }
    }

    /// Dempster's rule; `None` on total conflict
    fn combine(&self, other: &Mass) -> Option<Mass> {
        let conflict = self.yes * other.no + self.no * other.yes;
        let norm = 1.0 - conflict;
        if norm < CONFLICT_EPSILON {
            return None;
        }
        Some(Mass {
            yes: (self.yes * other.yes + self.yes * other.either + self.either * other.yes) / norm,
            no: (self.no * other.no + self.no * other.either + self.either * other.no) / norm,
            either: self.either * other.either / norm,
        })
    }

    fn pignistic(&self) -> f64 {
        self.yes + self.either / 2.0
    }
}

/// Falls back to weighted consensus when sources conflict totally
fn dempster_shafer(observations: &[Observation]) -> f64 {
    observations
        .iter()
        .try_fold(Mass::VACUOUS, |acc, o| acc.combine(&Mass::of(o)))
        .map_or_else(|| weighted_consensus(observations), |m| m.pignistic())
}

/// A tied vote falls back to weighted consensus
fn majority_vote(observations: &[Observation]) -> f64 {
    let (for_bloc, against_bloc): (Vec<Observation>, Vec<Observation>) = observations
        .iter()
        .partition(|o| o.confidence >= DEFAULT_CONFIDENCE);
    let for_weight: f64 = for_bloc.iter().map(|o| o.weight).sum();
    let against_weight: f64 = against_bloc.iter().map(|o| o.weight).sum();

    if (for_weight - against_weight).abs() < CONFLICT_EPSILON {
        weighted_consensus(observations)
    } else if for_weight > against_weight {
        weighted_consensus(&for_bloc)
    } else {
        weighted_consensus(&against_bloc)
    }
}
