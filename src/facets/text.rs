//! A `Facet` implementation for free-text matching.

use crate::context::SearchContext;
use crate::facet::{Facet, FacetKind, FacetScore};
use crate::types::{Clinic, MatchDetail};
use serde::{Deserialize, Serialize};

/// Points awarded per field when the search text occurs in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextWeights {
  pub name: f64,
  pub address: f64,
  pub language: f64,
  pub service: f64,
}

impl Default for TextWeights {
  fn default() -> Self {
    Self {
      name: 12.0,
      address: 8.0,
      language: 5.0,
      service: 5.0,
    }
  }
}

impl TextWeights {
  /// Sum of all field weights, the most a clinic can earn from text.
  pub fn total(&self) -> f64 {
    self.name + self.address + self.language + self.service
  }
}

/// A facet that rewards clinics whose fields contain the search text.
///
/// Four independent, case-insensitive substring checks are made: the name,
/// the address, any language and any service. Each check that fires adds its
/// weight and a [`MatchDetail`]; they are not exclusive, so a clinic named
/// "Polish Smile" that also speaks Polish earns both the name and the
/// language points.
#[derive(Debug, Clone, Default)]
pub struct TextFacet {
  weights: TextWeights,
}

impl TextFacet {
  /// Creates a new `TextFacet` with the default 12/8/5/5 weights.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a text facet with custom field weights.
  pub fn with_weights(weights: TextWeights) -> Self {
    Self { weights }
  }

  pub fn weights(&self) -> &TextWeights {
    &self.weights
  }
}

impl Facet for TextFacet {
  fn kind(&self) -> FacetKind {
    FacetKind::Text
  }

  fn weight(&self) -> f64 {
    self.weights.total()
  }

  fn is_active(&self, context: &SearchContext<'_>) -> bool {
    context.text.is_some()
  }

  fn score(&self, clinic: &Clinic, context: &SearchContext<'_>) -> FacetScore {
    let text = match &context.text {
      Some(text) => text.as_str(),
      None => return FacetScore::none(),
    };

    let mut score = FacetScore::none();

    if contains_folded(&clinic.name, text) {
      score.award(self.weights.name, MatchDetail::NameMatches);
    }
    if contains_folded(&clinic.address, text) {
      score.award(self.weights.address, MatchDetail::AddressMatches);
    }
    if clinic.languages.iter().any(|l| contains_folded(l, text)) {
      score.award(self.weights.language, MatchDetail::LanguageMatches);
    }
    if clinic.services.iter().any(|s| contains_folded(s, text)) {
      score.award(self.weights.service, MatchDetail::ServiceMatches);
    }

    score
  }
}

/// Case-insensitive containment where `needle` is already lower-cased.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}
