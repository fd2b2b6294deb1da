//! Hard filters applied before scoring.
//!
//! A [`FilterPipeline`] is compiled from [`SearchCriteria`] into a flat list of
//! [`Predicate`]s that are AND-combined: a clinic survives only if every
//! predicate accepts it. Unlike the scoring facets, a failed predicate
//! removes the clinic outright, whatever its score would have been.

use crate::criteria::{Feature, SearchCriteria};
use crate::facets::text::contains_folded;
use crate::types::Clinic;
use serde::{Deserialize, Serialize};

/// One hard filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
  /// The clinic must have the capability.
  Feature(Feature),
  /// The clinic must be rated at least this highly. Unrated clinics fail.
  MinRating(f64),
  /// Lower-cased text that must occur in the area or the address.
  Area(String),
  /// Upper-cased, trimmed text that must occur in the postcode or the
  /// address. Partial outward codes such as "NW6" are the common case.
  Postcode(String),
  /// Lower-cased text that must occur in the name, address, area, postcode,
  /// any language or any service.
  Text(String),
}

impl Predicate {
  /// Whether the clinic satisfies this predicate.
  pub fn matches(&self, clinic: &Clinic) -> bool {
    match self {
      Predicate::Feature(feature) => has_feature(clinic, *feature),
      Predicate::MinRating(min) => clinic.rating.is_some_and(|rating| rating >= *min),
      Predicate::Area(area) => {
        clinic
          .area
          .as_deref()
          .is_some_and(|a| contains_folded(a, area))
          || contains_folded(&clinic.address, area)
      }
      Predicate::Postcode(code) => {
        let postcode = clinic.postcode.as_deref().unwrap_or("").to_uppercase();
        postcode.starts_with(code.as_str())
          || postcode.contains(code.as_str())
          || clinic.address.to_uppercase().contains(code.as_str())
      }
      Predicate::Text(text) => {
        contains_folded(&clinic.name, text)
          || contains_folded(&clinic.address, text)
          || clinic.area.as_deref().is_some_and(|a| contains_folded(a, text))
          || clinic
            .postcode
            .as_deref()
            .is_some_and(|p| contains_folded(p, text))
          || clinic.languages.iter().any(|l| contains_folded(l, text))
          || clinic.services.iter().any(|s| contains_folded(s, text))
      }
    }
  }

  /// Relative evaluation cost, used to test cheap predicates first.
  fn cost(&self) -> u8 {
    match self {
      Predicate::Feature(_) | Predicate::MinRating(_) => 0,
      Predicate::Area(_) | Predicate::Postcode(_) => 1,
      Predicate::Text(_) => 2,
    }
  }
}

/// Whether the clinic has a given capability.
pub fn has_feature(clinic: &Clinic, feature: Feature) -> bool {
  match feature {
    Feature::Nhs => clinic.nhs,
    Feature::Private => clinic.private,
    Feature::Emergency => clinic.emergency,
    Feature::Children => clinic.children,
    Feature::Wheelchair => clinic.wheelchair_access,
    Feature::Parking => clinic.parking,
  }
}

/// An AND-combined set of predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPipeline {
  predicates: Vec<Predicate>,
}

impl FilterPipeline {
  /// Compiles the hard filters in `criteria`. Inactive filters (blank text,
  /// zero rating, unrequired features) produce no predicate.
  ///
  /// `min_score` is not a predicate here; it needs the score and is applied
  /// by the engine after scoring.
  pub fn from_criteria(criteria: &SearchCriteria) -> Self {
    let mut predicates: Vec<Predicate> = criteria
      .features
      .required()
      .into_iter()
      .map(Predicate::Feature)
      .collect();

    if criteria.min_rating > 0.0 {
      predicates.push(Predicate::MinRating(criteria.min_rating));
    }
    if let Some(area) = criteria.area() {
      predicates.push(Predicate::Area(area.to_lowercase()));
    }
    if let Some(postcode) = criteria.postcode() {
      predicates.push(Predicate::Postcode(postcode.to_uppercase()));
    }
    if let Some(text) = criteria.text() {
      predicates.push(Predicate::Text(text.to_lowercase()));
    }

    Self::new(predicates)
  }

  /// Creates a pipeline from explicit predicates.
  pub fn new(mut predicates: Vec<Predicate>) -> Self {
    predicates.sort_by_key(Predicate::cost);
    Self { predicates }
  }

  pub fn predicates(&self) -> &[Predicate] {
    &self.predicates
  }

  pub fn is_empty(&self) -> bool {
    self.predicates.is_empty()
  }

  /// Whether the clinic passes every predicate.
  pub fn matches(&self, clinic: &Clinic) -> bool {
    self.predicates.iter().all(|p| p.matches(clinic))
  }

  /// Returns the clinics that pass, in their original order.
  pub fn apply<'a>(&self, clinics: &'a [Clinic]) -> Vec<&'a Clinic> {
    clinics.iter().filter(|c| self.matches(c)).collect()
  }
}

/// Filters clinics by the hard filters in `criteria`, keeping input order.
pub fn filter<'a>(clinics: &'a [Clinic], criteria: &SearchCriteria) -> Vec<&'a Clinic> {
  FilterPipeline::from_criteria(criteria).apply(clinics)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kilburn() -> Clinic {
    Clinic {
      name: "Smile Dental Practice".to_string(),
      address: "156 Kilburn High Road, London NW6 4JD".to_string(),
      postcode: Some("NW6 4JD".to_string()),
      area: Some("Kilburn".to_string()),
      services: vec!["Root Canal".to_string()],
      languages: vec!["Portuguese".to_string()],
      nhs: true,
      rating: Some(4.6),
      ..Default::default()
    }
  }

  #[test]
  fn test_feature_filter_never_excludes_on_unset_flag() {
    let criteria = SearchCriteria::default();
    let clinic = Clinic::named("No Features");
    assert!(FilterPipeline::from_criteria(&criteria).matches(&clinic));

    let criteria = SearchCriteria::builder().require(Feature::Nhs).build();
    assert!(!FilterPipeline::from_criteria(&criteria).matches(&clinic));
    assert!(FilterPipeline::from_criteria(&criteria).matches(&kilburn()));
  }

  #[test]
  fn test_min_rating_excludes_unrated() {
    let pipeline = FilterPipeline::new(vec![Predicate::MinRating(4.0)]);
    assert!(pipeline.matches(&kilburn()));
    assert!(!pipeline.matches(&Clinic::named("Unrated")));
    let strict = FilterPipeline::new(vec![Predicate::MinRating(4.7)]);
    assert!(!strict.matches(&kilburn()));
  }

  #[test]
  fn test_partial_postcode() {
    let criteria = SearchCriteria::builder().postcode(" nw6 ").build();
    assert!(FilterPipeline::from_criteria(&criteria).matches(&kilburn()));
    let criteria = SearchCriteria::builder().postcode("NW1").build();
    assert!(!FilterPipeline::from_criteria(&criteria).matches(&kilburn()));
  }

  #[test]
  fn test_postcode_falls_back_to_address() {
    let clinic = Clinic {
      address: "2 Ealing Road, London W5 1AB".to_string(),
      ..Default::default()
    };
    let pipeline = FilterPipeline::new(vec![Predicate::Postcode("W5".to_string())]);
    assert!(pipeline.matches(&clinic));
  }

  #[test]
  fn test_area_matches_area_or_address() {
    let pipeline = FilterPipeline::new(vec![Predicate::Area("kilburn".to_string())]);
    assert!(pipeline.matches(&kilburn()));
    let pipeline = FilterPipeline::new(vec![Predicate::Area("high road".to_string())]);
    assert!(pipeline.matches(&kilburn()));
    let pipeline = FilterPipeline::new(vec![Predicate::Area("camden".to_string())]);
    assert!(!pipeline.matches(&kilburn()));
  }

  #[test]
  fn test_text_gate_covers_area_and_postcode() {
    for text in ["kilburn", "4jd", "portuguese", "root", "smile"] {
      let criteria = SearchCriteria::builder().text(text).build();
      assert!(
        FilterPipeline::from_criteria(&criteria).matches(&kilburn()),
        "text `{text}` should pass"
      );
    }
    let criteria = SearchCriteria::builder().text("implants").build();
    assert!(!FilterPipeline::from_criteria(&criteria).matches(&kilburn()));
  }

  #[test]
  fn test_cheap_predicates_first() {
    let pipeline = FilterPipeline::new(vec![
      Predicate::Text("a".to_string()),
      Predicate::Postcode("N".to_string()),
      Predicate::Feature(Feature::Parking),
    ]);
    assert!(matches!(pipeline.predicates()[0], Predicate::Feature(_)));
    assert!(matches!(pipeline.predicates()[2], Predicate::Text(_)));
  }

  #[test]
  fn test_filter_keeps_order_and_rating_boundary() {
    let clinics = vec![
      Clinic {
        rating: Some(4.5),
        ..Clinic::named("Exactly Four Five")
      },
      Clinic {
        rating: Some(4.4),
        ..Clinic::named("Just Below")
      },
      kilburn(),
      Clinic::named("Unrated"),
    ];

    let criteria = SearchCriteria::builder().min_rating(4.5).build();
    let names: Vec<&str> = filter(&clinics, &criteria).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Exactly Four Five", "Smile Dental Practice"]);

    assert_eq!(filter(&clinics, &SearchCriteria::default()).len(), 4);
    assert!(filter(&[], &criteria).is_empty());
  }
}
