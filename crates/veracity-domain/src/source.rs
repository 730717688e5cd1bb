//! Source module - intelligence sources and their ordinal ratings

use crate::scoring::{CREDIBILITY_WEIGHTS, RELIABILITY_WEIGHTS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intelligence discipline a source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceCategory {
    /// Human intelligence
    Humint,
    /// Signals intelligence
    Sigint,
    /// Open-source intelligence
    Osint,
    /// Geospatial intelligence
    Geoint,
    /// Measurement and signature intelligence
    Masint,
    /// Financial intelligence
    Finint,
    /// Technical intelligence
    Techint,
    /// Cyber intelligence
    Cybint,
}

impl SourceCategory {
    /// Get the category tag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Humint => "HUMINT",
            SourceCategory::Sigint => "SIGINT",
            SourceCategory::Osint => "OSINT",
            SourceCategory::Geoint => "GEOINT",
            SourceCategory::Masint => "MASINT",
            SourceCategory::Finint => "FININT",
            SourceCategory::Techint => "TECHINT",
            SourceCategory::Cybint => "CYBINT",
        }
    }

    /// Parse a category tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HUMINT" => Some(SourceCategory::Humint),
            "SIGINT" => Some(SourceCategory::Sigint),
            "OSINT" => Some(SourceCategory::Osint),
            "GEOINT" => Some(SourceCategory::Geoint),
            "MASINT" => Some(SourceCategory::Masint),
            "FININT" => Some(SourceCategory::Finint),
            "TECHINT" => Some(SourceCategory::Techint),
            "CYBINT" => Some(SourceCategory::Cybint),
            _ => None,
        }
    }
}

/// Classification level, ordered from least to most restrictive
///
/// The derived `Ord` follows declaration order, so `max()` over a set of
/// levels yields the classification a derived product must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Releasable without restriction
    Unclassified,
    /// Confidential
    Confidential,
    /// Secret
    Secret,
    /// Top secret
    TopSecret,
}

impl Classification {
    /// Get the classification marking as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Unclassified => "UNCLASSIFIED",
            Classification::Confidential => "CONFIDENTIAL",
            Classification::Secret => "SECRET",
            Classification::TopSecret => "TOP_SECRET",
        }
    }

    /// Parse a classification marking (case-insensitive, `-` or `_` separated)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "UNCLASSIFIED" => Some(Classification::Unclassified),
            "CONFIDENTIAL" => Some(Classification::Confidential),
            "SECRET" => Some(Classification::Secret),
            "TOP_SECRET" => Some(Classification::TopSecret),
            _ => None,
        }
    }
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid classification: {}", s))
    }
}

/// Admiralty reliability grade of a source (A best, F worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReliabilityGrade {
    /// Completely reliable
    A,
    /// Usually reliable
    B,
    /// Fairly reliable
    C,
    /// Not usually reliable
    D,
    /// Unreliable
    E,
    /// Reliability cannot be judged
    F,
}

impl ReliabilityGrade {
    /// Zero-based rank, A = 0
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Scalar weight from the reliability table
    pub fn weight(&self) -> f64 {
        RELIABILITY_WEIGHTS[self.rank()]
    }

    /// Get the grade letter
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityGrade::A => "A",
            ReliabilityGrade::B => "B",
            ReliabilityGrade::C => "C",
            ReliabilityGrade::D => "D",
            ReliabilityGrade::E => "E",
            ReliabilityGrade::F => "F",
        }
    }

    /// Parse a grade letter (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "A" => Some(ReliabilityGrade::A),
            "B" => Some(ReliabilityGrade::B),
            "C" => Some(ReliabilityGrade::C),
            "D" => Some(ReliabilityGrade::D),
            "E" => Some(ReliabilityGrade::E),
            "F" => Some(ReliabilityGrade::F),
            _ => None,
        }
    }
}

/// Admiralty credibility grade of the information (1 best, 6 worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CredibilityGrade {
    /// Confirmed by other sources
    #[serde(rename = "1")]
    Confirmed,
    /// Probably true
    #[serde(rename = "2")]
    ProbablyTrue,
    /// Possibly true
    #[serde(rename = "3")]
    PossiblyTrue,
    /// Doubtful
    #[serde(rename = "4")]
    Doubtful,
    /// Improbable
    #[serde(rename = "5")]
    Improbable,
    /// Truth cannot be judged
    #[serde(rename = "6")]
    CannotBeJudged,
}

impl CredibilityGrade {
    /// Numeric grade, 1 through 6
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    /// Scalar weight from the credibility table
    pub fn weight(&self) -> f64 {
        CREDIBILITY_WEIGHTS[*self as usize]
    }

    /// Build a grade from its number (1-6)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(CredibilityGrade::Confirmed),
            2 => Some(CredibilityGrade::ProbablyTrue),
            3 => Some(CredibilityGrade::PossiblyTrue),
            4 => Some(CredibilityGrade::Doubtful),
            5 => Some(CredibilityGrade::Improbable),
            6 => Some(CredibilityGrade::CannotBeJudged),
            _ => None,
        }
    }
}

/// An intelligence source. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Source identity (e.g., "osint:feed-17")
    pub id: String,

    /// Intelligence discipline
    pub category: SourceCategory,

    /// Classification of material from this source
    pub classification: Classification,

    /// Reliability of the source
    pub reliability: ReliabilityGrade,

    /// Credibility of the information it supplied
    pub credibility: CredibilityGrade,

    /// When the material was captured
    pub captured_at: DateTime<Utc>,
}

impl DataSource {
    /// Create a new data source captured now
    pub fn new(
        id: impl Into<String>,
        category: SourceCategory,
        classification: Classification,
        reliability: ReliabilityGrade,
        credibility: CredibilityGrade,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            classification,
            reliability,
            credibility,
            captured_at: Utc::now(),
        }
    }

    /// Override the capture timestamp
    pub fn captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = captured_at;
        self
    }

    /// Fusion weight: reliability weight × credibility weight
    pub fn weight(&self) -> f64 {
        self.reliability.weight() * self.credibility.weight()
    }

    /// Admiralty code such as "B2"
    pub fn grade_code(&self) -> String {
        format!("{}{}", self.reliability.as_str(), self.credibility.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_ordering() {
        assert!(Classification::Unclassified < Classification::Confidential);
        assert!(Classification::Confidential < Classification::Secret);
        assert!(Classification::Secret < Classification::TopSecret);

        let levels = [Classification::Secret, Classification::Unclassified, Classification::Confidential];
        assert_eq!(levels.iter().max(), Some(&Classification::Secret));
    }

    #[test]
    fn test_classification_parse() {
        assert_eq!(Classification::parse("top-secret"), Some(Classification::TopSecret));
        assert_eq!("secret".parse::<Classification>(), Ok(Classification::Secret));
        assert!("restricted".parse::<Classification>().is_err());
    }

    #[test]
    fn test_grade_weights_are_monotonic() {
        let reliability = [
            ReliabilityGrade::A,
            ReliabilityGrade::B,
            ReliabilityGrade::C,
            ReliabilityGrade::D,
            ReliabilityGrade::E,
            ReliabilityGrade::F,
        ];
        for pair in reliability.windows(2) {
            assert!(pair[0].weight() > pair[1].weight());
        }
        for n in 1..6 {
            let better = CredibilityGrade::from_number(n).unwrap();
            let worse = CredibilityGrade::from_number(n + 1).unwrap();
            assert!(better.weight() > worse.weight());
        }
    }

    #[test]
    fn test_source_weight_extremes() {
        let best = DataSource::new(
            "humint:alpha",
            SourceCategory::Humint,
            Classification::Secret,
            ReliabilityGrade::A,
            CredibilityGrade::Confirmed,
        );
        let worst = DataSource::new(
            "osint:rumor",
            SourceCategory::Osint,
            Classification::Unclassified,
            ReliabilityGrade::F,
            CredibilityGrade::CannotBeJudged,
        );

        assert_eq!(best.weight(), 1.0);
        assert!((worst.weight() - 0.01).abs() < 1e-12);
        assert_eq!(best.grade_code(), "A1");
        assert_eq!(worst.grade_code(), "F6");
    }

    #[test]
    fn test_credibility_serializes_as_number() {
        let json = serde_json::to_string(&CredibilityGrade::Doubtful).unwrap();
        assert_eq!(json, "\"4\"");
        assert_eq!(CredibilityGrade::Doubtful.number(), 4);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(SourceCategory::parse("sigint"), Some(SourceCategory::Sigint));
        assert_eq!(SourceCategory::Geoint.as_str(), "GEOINT");
        assert_eq!(SourceCategory::parse("astrology"), None);
    }
}
