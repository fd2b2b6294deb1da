//! Core data types for the clinic matcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dental practice, already normalized.
///
/// Every field carries a usable default so the matcher never has to reason
/// about absence: a clinic without services simply has an empty list, a
/// clinic without a name has an empty string. Loosely-typed records from a
/// data source go through [`RawClinic`](crate::source::RawClinic) first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clinic {
  /// Practice name. May be empty when the source did not provide one.
  pub name: String,
  /// Full postal address.
  pub address: String,
  pub phone: Option<String>,
  /// Website URL.
  pub link: Option<String>,
  pub postcode: Option<String>,
  /// Borough or neighbourhood, e.g. "Camden".
  pub area: Option<String>,
  /// Services offered. Compared case-insensitively; duplicates are allowed
  /// and never counted twice.
  pub services: Vec<String>,
  /// Languages spoken by staff. Same matching rules as `services`.
  pub languages: Vec<String>,
  pub nhs: bool,
  pub private: bool,
  pub emergency: bool,
  pub children: bool,
  pub wheelchair_access: bool,
  pub parking: bool,
  /// Review rating between 0.0 and 5.0.
  pub rating: Option<f64>,
  pub opening_hours: Option<String>,
  /// Provenance tag, display only.
  pub source: String,
}

impl Clinic {
  /// Creates a clinic with the given name and everything else defaulted.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  /// The rating used for ordering, with a missing rating counted as zero.
  pub fn rating_or_zero(&self) -> f64 {
    self.rating.unwrap_or(0.0)
  }

  /// Name shown to users when the record has none.
  pub fn display_name(&self) -> &str {
    if self.name.is_empty() {
      "Unknown Clinic"
    } else {
      &self.name
    }
  }
}

/// A clinic that survived filtering, together with its match score.
///
/// The clinic is borrowed from the list handed to the engine; results are
/// read-only views and are rebuilt from scratch on every search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicMatch<'a> {
  /// The matched clinic.
  pub clinic: &'a Clinic,
  /// Normalized match score, always within `0..=100`.
  pub score: u8,
  /// Human-readable reasons, in the order they were discovered.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub details: Vec<MatchDetail>,
  /// Requested services this clinic offers.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub matched_services: Vec<String>,
  /// Requested languages this clinic speaks.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub matched_languages: Vec<String>,
}

impl<'a> ClinicMatch<'a> {
  /// Creates a match with a given clinic and score and no details.
  pub fn new(clinic: &'a Clinic, score: u8) -> Self {
    Self {
      clinic,
      score: score.min(100),
      details: Vec::new(),
      matched_services: Vec::new(),
      matched_languages: Vec::new(),
    }
  }

  /// The match reasons rendered as display strings.
  pub fn detail_strings(&self) -> Vec<String> {
    self.details.iter().map(ToString::to_string).collect()
  }

  /// Badge bucket for the score: high from 70, medium from 40.
  pub fn score_class(&self) -> ScoreClass {
    ScoreClass::of(self.score)
  }
}

/// Why a clinic received points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchDetail {
  /// The search text occurs in the clinic name.
  NameMatches,
  /// The search text occurs in the address.
  AddressMatches,
  /// The search text occurs in one of the spoken languages.
  LanguageMatches,
  /// The search text occurs in one of the offered services.
  ServiceMatches,
  /// Some of the selected services are offered.
  ServicesMatched {
    matched: usize,
    requested: usize,
  },
  /// Some of the selected languages are spoken.
  LanguagesMatched {
    matched: usize,
    requested: usize,
  },
}

impl fmt::Display for MatchDetail {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MatchDetail::NameMatches => f.write_str("Name matches"),
      MatchDetail::AddressMatches => f.write_str("Address matches"),
      MatchDetail::LanguageMatches => f.write_str("Language matches"),
      MatchDetail::ServiceMatches => f.write_str("Service matches"),
      MatchDetail::ServicesMatched { matched, requested } => {
        write!(f, "{matched}/{requested} services matched")
      }
      MatchDetail::LanguagesMatched { matched, requested } => {
        write!(f, "{matched}/{requested} languages matched")
      }
    }
  }
}

/// Coarse bucket for rendering a score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreClass {
  High,
  Medium,
  Low,
}

impl ScoreClass {
  pub fn of(score: u8) -> Self {
    match score {
      70..=u8::MAX => ScoreClass::High,
      40..=69 => ScoreClass::Medium,
      _ => ScoreClass::Low,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_detail_display() {
    assert_eq!(MatchDetail::NameMatches.to_string(), "Name matches");
    assert_eq!(
      MatchDetail::ServicesMatched {
        matched: 2,
        requested: 3
      }
      .to_string(),
      "2/3 services matched"
    );
  }

  #[test]
  fn test_missing_fields_deserialize_to_defaults() {
    let clinic: Clinic = serde_json::from_str(r#"{"name": "Smile Studio"}"#).unwrap();
    assert_eq!(clinic.name, "Smile Studio");
    assert!(clinic.services.is_empty());
    assert!(clinic.rating.is_none());
    assert!(!clinic.nhs);
  }

  #[test]
  fn test_score_class_boundaries() {
    assert_eq!(ScoreClass::of(100), ScoreClass::High);
    assert_eq!(ScoreClass::of(70), ScoreClass::High);
    assert_eq!(ScoreClass::of(69), ScoreClass::Medium);
    assert_eq!(ScoreClass::of(40), ScoreClass::Medium);
    assert_eq!(ScoreClass::of(39), ScoreClass::Low);
  }

  #[test]
  fn test_display_name_fallback() {
    assert_eq!(Clinic::default().display_name(), "Unknown Clinic");
    assert_eq!(Clinic::named("Bupa").display_name(), "Bupa");
  }
}
