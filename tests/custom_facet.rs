use dentalsearch::prelude::*;

/// Rewards well-rated clinics whenever the search asks for a minimum rating.
struct RatingFacet {
  weight: f64,
}

impl RatingFacet {
  fn new(weight: f64) -> Self {
    Self { weight }
  }
}

impl Facet for RatingFacet {
  fn kind(&self) -> FacetKind {
    FacetKind::Custom
  }

  fn weight(&self) -> f64 {
    self.weight
  }

  fn is_active(&self, context: &SearchContext<'_>) -> bool {
    context.criteria.min_rating > 0.0
  }

  fn score(&self, clinic: &Clinic, _context: &SearchContext<'_>) -> FacetScore {
    FacetScore {
      points: clinic.rating_or_zero() / 5.0 * self.weight,
      ..FacetScore::none()
    }
  }
}

fn clinics() -> Vec<Clinic> {
  vec![
    Clinic {
      rating: Some(4.0),
      languages: vec!["English".to_string()],
      ..Clinic::named("Four Stars")
    },
    Clinic {
      rating: Some(5.0),
      ..Clinic::named("Five Stars")
    },
    Clinic {
      rating: Some(2.0),
      ..Clinic::named("Two Stars")
    },
  ]
}

#[test]
fn test_custom_facet() {
  let clinics = clinics();
  let matcher = ClinicMatcher::builder()
    .with(Box::new(RatingFacet::new(20.0)))
    .build();

  let criteria = SearchCriteria::builder().min_rating(3.0).build();
  let page = matcher.search(&clinics, &criteria);

  assert_eq!(page.total, 2);
  assert_eq!(page.results[0].clinic.name, "Five Stars");
  assert_eq!(page.results[0].score, 100);
  assert_eq!(page.results[1].score, 80);
}

#[test]
fn test_custom_facet_alongside_standard_ones() {
  let clinics = clinics();
  let matcher = ClinicMatcher::builder()
    .standard_facets()
    .with(Box::new(RatingFacet::new(30.0)))
    .build();

  let criteria = SearchCriteria::builder()
    .language("English")
    .min_rating(1.0)
    .build();
  let page = matcher.search(&clinics, &criteria);

  // Languages 30 of 30 plus rating 24 of 30.
  assert_eq!(page.results[0].clinic.name, "Four Stars");
  assert_eq!(page.results[0].score, 90);
  assert_eq!(page.results[0].matched_languages, vec!["English"]);
  // Rating alone: 30 of 60.
  assert_eq!(page.results[1].clinic.name, "Five Stars");
  assert_eq!(page.results[1].score, 50);
}

#[test]
fn test_inactive_custom_facet_is_ignored() {
  let clinics = clinics();
  let matcher = ClinicMatcher::builder()
    .standard_facets()
    .with(Box::new(RatingFacet::new(30.0)))
    .build();

  let page = matcher.search(&clinics, &SearchCriteria::builder().text("stars").build());
  assert!(page.results.iter().all(|m| m.score == 40));
}
