//! Search parameters accepted by the matcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page size used when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Everything a caller can ask of a single search.
///
/// All fields are optional in spirit: the [`Default`] value matches every
/// clinic, sorts by match score and shows the first page. Text fields that
/// are blank after trimming are treated the same as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
  /// Free text matched against name, address, area, postcode, languages and
  /// services. Acts both as a hard filter and as a scoring facet.
  pub search_text: Option<String>,
  /// Substring of the clinic area or address.
  pub area_filter: Option<String>,
  /// Full or partial postcode, e.g. "NW6".
  pub postcode_filter: Option<String>,
  /// Services the user would like. Scored, never used to exclude.
  pub selected_services: Vec<String>,
  /// Languages the user would like. Scored, never used to exclude.
  pub selected_languages: Vec<String>,
  /// Capability flags that must be present on the clinic.
  pub features: FeatureFilters,
  /// Minimum rating; zero disables the check.
  pub min_rating: f64,
  /// Minimum match score in `0..=100`.
  pub min_score: u8,
  pub sort_by: SortBy,
  /// 1-indexed page number. Out-of-range values are clamped.
  pub page: usize,
  pub page_size: usize,
}

impl Default for SearchCriteria {
  fn default() -> Self {
    Self {
      search_text: None,
      area_filter: None,
      postcode_filter: None,
      selected_services: Vec::new(),
      selected_languages: Vec::new(),
      features: FeatureFilters::default(),
      min_rating: 0.0,
      min_score: 0,
      sort_by: SortBy::default(),
      page: 1,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl SearchCriteria {
  /// Creates a new `CriteriaBuilder`.
  pub fn builder() -> CriteriaBuilder {
    CriteriaBuilder::default()
  }

  /// The search text, trimmed, if any remains.
  pub fn text(&self) -> Option<&str> {
    non_blank(self.search_text.as_deref())
  }

  /// The area filter, trimmed, if any remains.
  pub fn area(&self) -> Option<&str> {
    non_blank(self.area_filter.as_deref())
  }

  /// The postcode filter, trimmed, if any remains.
  pub fn postcode(&self) -> Option<&str> {
    non_blank(self.postcode_filter.as_deref())
  }

  /// True when any filter or facet would narrow or rank the result set.
  pub fn has_active_filters(&self) -> bool {
    self.text().is_some()
      || self.area().is_some()
      || self.postcode().is_some()
      || !self.selected_services.is_empty()
      || !self.selected_languages.is_empty()
      || self.features.any()
      || self.min_score > 0
      || self.min_rating > 0.0
  }

  /// Resets every filter and facet while keeping the page size.
  pub fn clear(&mut self) {
    let page_size = self.page_size;
    *self = Self {
      page_size,
      ..Self::default()
    };
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Hard capability filters. `true` requires the capability, `false` imposes
/// no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFilters {
  pub nhs: bool,
  pub private: bool,
  pub emergency: bool,
  pub children: bool,
  pub wheelchair: bool,
  pub parking: bool,
}

impl FeatureFilters {
  /// Whether any capability is required.
  pub fn any(&self) -> bool {
    !self.required().is_empty()
  }

  /// The required capabilities, in a fixed order.
  pub fn required(&self) -> Vec<Feature> {
    let mut features = Vec::new();
    if self.nhs {
      features.push(Feature::Nhs);
    }
    if self.private {
      features.push(Feature::Private);
    }
    if self.emergency {
      features.push(Feature::Emergency);
    }
    if self.children {
      features.push(Feature::Children);
    }
    if self.wheelchair {
      features.push(Feature::Wheelchair);
    }
    if self.parking {
      features.push(Feature::Parking);
    }
    features
  }

  /// Marks a capability as required.
  pub fn require(&mut self, feature: Feature) {
    match feature {
      Feature::Nhs => self.nhs = true,
      Feature::Private => self.private = true,
      Feature::Emergency => self.emergency = true,
      Feature::Children => self.children = true,
      Feature::Wheelchair => self.wheelchair = true,
      Feature::Parking => self.parking = true,
    }
  }
}

/// A boolean clinic capability that can be required by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
  Nhs,
  Private,
  Emergency,
  Children,
  Wheelchair,
  Parking,
}

impl Feature {
  /// Short label used on result cards.
  pub fn label(&self) -> &'static str {
    match self {
      Feature::Nhs => "NHS",
      Feature::Private => "Private",
      Feature::Emergency => "Emergency",
      Feature::Children => "Children",
      Feature::Wheelchair => "Wheelchair",
      Feature::Parking => "Parking",
    }
  }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
  /// Match score, highest first.
  #[default]
  Match,
  /// Clinic name, A to Z.
  Name,
  /// Number of listed services, most first.
  Services,
  /// Rating, highest first. Unrated clinics count as zero.
  Rating,
}

impl SortBy {
  /// Parses a sort key, falling back to [`SortBy::Match`] for anything
  /// unrecognised.
  pub fn parse_or_default(value: &str) -> Self {
    value.parse().unwrap_or_default()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      SortBy::Match => "match",
      SortBy::Name => "name",
      SortBy::Services => "services",
      SortBy::Rating => "rating",
    }
  }
}

impl fmt::Display for SortBy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error returned when a sort key is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key `{0}`")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortBy {
  type Err = UnknownSortKey;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "match" | "score" => Ok(SortBy::Match),
      "name" => Ok(SortBy::Name),
      "services" => Ok(SortBy::Services),
      "rating" => Ok(SortBy::Rating),
      other => Err(UnknownSortKey(other.to_string())),
    }
  }
}

/// A builder for creating `SearchCriteria` instances.
#[derive(Debug, Default)]
pub struct CriteriaBuilder {
  criteria: SearchCriteria,
}

impl CriteriaBuilder {
  /// Sets the free-text query.
  pub fn text(mut self, text: impl Into<String>) -> Self {
    self.criteria.search_text = Some(text.into());
    self
  }

  /// Sets the area filter.
  pub fn area(mut self, area: impl Into<String>) -> Self {
    self.criteria.area_filter = Some(area.into());
    self
  }

  /// Sets the postcode filter.
  pub fn postcode(mut self, postcode: impl Into<String>) -> Self {
    self.criteria.postcode_filter = Some(postcode.into());
    self
  }

  /// Adds one selected service.
  pub fn service(mut self, service: impl Into<String>) -> Self {
    self.criteria.selected_services.push(service.into());
    self
  }

  /// Replaces the selected services.
  pub fn services<I, S>(mut self, services: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.criteria.selected_services = services.into_iter().map(Into::into).collect();
    self
  }

  /// Adds one selected language.
  pub fn language(mut self, language: impl Into<String>) -> Self {
    self.criteria.selected_languages.push(language.into());
    self
  }

  /// Replaces the selected languages.
  pub fn languages<I, S>(mut self, languages: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.criteria.selected_languages = languages.into_iter().map(Into::into).collect();
    self
  }

  /// Requires a clinic capability.
  pub fn require(mut self, feature: Feature) -> Self {
    self.criteria.features.require(feature);
    self
  }

  pub fn min_rating(mut self, rating: f64) -> Self {
    self.criteria.min_rating = rating;
    self
  }

  pub fn min_score(mut self, score: u8) -> Self {
    self.criteria.min_score = score;
    self
  }

  pub fn sort_by(mut self, sort_by: SortBy) -> Self {
    self.criteria.sort_by = sort_by;
    self
  }

  /// Sets the requested page (1-indexed).
  pub fn page(mut self, page: usize) -> Self {
    self.criteria.page = page;
    self
  }

  pub fn page_size(mut self, page_size: usize) -> Self {
    self.criteria.page_size = page_size;
    self
  }

  /// Builds the final `SearchCriteria`.
  pub fn build(self) -> SearchCriteria {
    self.criteria
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_blank_text_is_absent() {
    let criteria = SearchCriteria::builder().text("   ").area(" Camden ").build();
    assert_eq!(criteria.text(), None);
    assert_eq!(criteria.area(), Some("Camden"));
  }

  #[test]
  fn test_sort_parse_falls_back_to_match() {
    assert_eq!(SortBy::parse_or_default("rating"), SortBy::Rating);
    assert_eq!(SortBy::parse_or_default("Name"), SortBy::Name);
    assert_eq!(SortBy::parse_or_default("distance"), SortBy::Match);
    assert!("distance".parse::<SortBy>().is_err());
  }

  #[test]
  fn test_required_features_order() {
    let criteria = SearchCriteria::builder()
      .require(Feature::Parking)
      .require(Feature::Nhs)
      .build();
    assert_eq!(
      criteria.features.required(),
      vec![Feature::Nhs, Feature::Parking]
    );
  }

  #[test]
  fn test_clear_keeps_page_size() {
    let mut criteria = SearchCriteria::builder()
      .text("implants")
      .min_score(50)
      .page(3)
      .page_size(25)
      .build();
    assert!(criteria.has_active_filters());
    criteria.clear();
    assert!(!criteria.has_active_filters());
    assert_eq!(criteria.page, 1);
    assert_eq!(criteria.page_size, 25);
  }

  #[test]
  fn test_criteria_from_json() {
    let criteria: SearchCriteria =
      serde_json::from_str(r#"{"search_text": "Polish", "sort_by": "rating", "features": {"nhs": true}}"#)
        .unwrap();
    assert_eq!(criteria.text(), Some("Polish"));
    assert_eq!(criteria.sort_by, SortBy::Rating);
    assert!(criteria.features.nhs);
    assert_eq!(criteria.page, 1);
    assert_eq!(criteria.page_size, DEFAULT_PAGE_SIZE);
  }
}
