//! A `Facet` implementation for selected services and languages.

use crate::context::{SearchContext, Selection};
use crate::facet::{Facet, FacetKind, FacetScore};
use crate::types::{Clinic, MatchDetail};

/// Which clinic list a [`SelectionFacet`] scores against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
  Services,
  Languages,
}

/// A facet that scores the share of requested values a clinic satisfies.
///
/// For `n` requested values of which the clinic matches `m`, the facet awards
/// `m / n * weight`. A requested value matches when any clinic entry equals
/// it or contains it, ignoring case. Duplicate requests are collapsed
/// beforehand by [`SearchContext`], and duplicate clinic entries cannot
/// count twice because matching is per requested value.
#[derive(Debug, Clone)]
pub struct SelectionFacet {
  target: Target,
  weight: f64,
}

impl SelectionFacet {
  /// The services facet, worth 40 points.
  pub fn services() -> Self {
    Self {
      target: Target::Services,
      weight: 40.0,
    }
  }

  /// The languages facet, worth 30 points.
  pub fn languages() -> Self {
    Self {
      target: Target::Languages,
      weight: 30.0,
    }
  }

  /// Overrides the facet weight.
  pub fn with_weight(mut self, weight: f64) -> Self {
    self.weight = weight;
    self
  }

  fn requested<'a>(&self, context: &'a SearchContext<'_>) -> &'a [Selection] {
    match self.target {
      Target::Services => &context.services,
      Target::Languages => &context.languages,
    }
  }

  fn offered<'a>(&self, clinic: &'a Clinic) -> &'a [String] {
    match self.target {
      Target::Services => &clinic.services,
      Target::Languages => &clinic.languages,
    }
  }
}

impl Facet for SelectionFacet {
  fn kind(&self) -> FacetKind {
    match self.target {
      Target::Services => FacetKind::Services,
      Target::Languages => FacetKind::Languages,
    }
  }

  fn weight(&self) -> f64 {
    self.weight
  }

  fn is_active(&self, context: &SearchContext<'_>) -> bool {
    !self.requested(context).is_empty()
  }

  fn score(&self, clinic: &Clinic, context: &SearchContext<'_>) -> FacetScore {
    let requested = self.requested(context);
    if requested.is_empty() {
      return FacetScore::none();
    }

    let offered: Vec<String> = self
      .offered(clinic)
      .iter()
      .map(|entry| entry.to_lowercase())
      .collect();

    let matched: Vec<String> = requested
      .iter()
      .filter(|want| offered.iter().any(|have| have.contains(&want.folded)))
      .map(|want| want.original.clone())
      .collect();

    let mut score = FacetScore::none();
    if matched.is_empty() {
      return score;
    }

    let ratio = matched.len() as f64 / requested.len() as f64;
    let detail = match self.target {
      Target::Services => MatchDetail::ServicesMatched {
        matched: matched.len(),
        requested: requested.len(),
      },
      Target::Languages => MatchDetail::LanguagesMatched {
        matched: matched.len(),
        requested: requested.len(),
      },
    };
    score.award(ratio * self.weight, detail);
    score.matched = matched;
    score
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::criteria::SearchCriteria;

  fn clinic() -> Clinic {
    Clinic {
      services: vec![
        "General Dentistry".to_string(),
        "Orthodontics".to_string(),
        "orthodontics".to_string(),
      ],
      languages: vec!["English".to_string(), "Polish".to_string()],
      ..Default::default()
    }
  }

  #[test]
  fn test_partial_service_ratio() {
    let criteria = SearchCriteria::builder()
      .services(["Orthodontics", "Dental Implants"])
      .build();
    let ctx = SearchContext::new(&criteria);
    let score = SelectionFacet::services().score(&clinic(), &ctx);
    assert_eq!(score.points, 20.0);
    assert_eq!(score.matched, vec!["Orthodontics".to_string()]);
    assert_eq!(
      score.details,
      vec![MatchDetail::ServicesMatched {
        matched: 1,
        requested: 2
      }]
    );
  }

  #[test]
  fn test_duplicate_entries_do_not_double_count() {
    let criteria = SearchCriteria::builder()
      .services(["ORTHODONTICS", "orthodontics"])
      .build();
    let ctx = SearchContext::new(&criteria);
    let score = SelectionFacet::services().score(&clinic(), &ctx);
    assert_eq!(score.points, 40.0);
    assert_eq!(score.matched.len(), 1);
  }

  #[test]
  fn test_substring_match_on_clinic_entry() {
    let criteria = SearchCriteria::builder().language("pol").build();
    let ctx = SearchContext::new(&criteria);
    let score = SelectionFacet::languages().score(&clinic(), &ctx);
    assert_eq!(score.points, 30.0);
    assert_eq!(score.matched, vec!["pol".to_string()]);
  }

  #[test]
  fn test_no_match_has_no_detail() {
    let criteria = SearchCriteria::builder().language("Welsh").build();
    let ctx = SearchContext::new(&criteria);
    let score = SelectionFacet::languages().score(&clinic(), &ctx);
    assert_eq!(score, FacetScore::none());
  }
}
