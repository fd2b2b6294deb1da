//! Per-search view of the criteria, prepared once before clinics are scored.

use crate::criteria::SearchCriteria;

/// A requested service or language, kept in its original spelling alongside
/// the lower-cased form used for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub original: String,
  pub folded: String,
}

impl Selection {
  pub fn new(original: impl Into<String>) -> Self {
    let original = original.into();
    let folded = original.trim().to_lowercase();
    Self { original, folded }
  }
}

/// Context passed to every [`Facet`](crate::facet::Facet) while scoring.
///
/// Lower-casing and de-duplication happen here, once per search, so facets
/// only ever compare pre-folded strings against each clinic.
#[derive(Debug, Clone)]
pub struct SearchContext<'c> {
  /// The criteria the context was built from.
  pub criteria: &'c SearchCriteria,
  /// Lower-cased search text, `None` when blank.
  pub text: Option<String>,
  /// Selected services with case-insensitive duplicates removed.
  pub services: Vec<Selection>,
  /// Selected languages with case-insensitive duplicates removed.
  pub languages: Vec<Selection>,
}

impl<'c> SearchContext<'c> {
  /// Creates a new `SearchContext` from the given criteria.
  pub fn new(criteria: &'c SearchCriteria) -> Self {
    Self {
      criteria,
      text: criteria.text().map(str::to_lowercase),
      services: dedup_selections(&criteria.selected_services),
      languages: dedup_selections(&criteria.selected_languages),
    }
  }
}

/// Folds and de-duplicates a selection list, keeping the first spelling seen
/// and dropping blank entries.
fn dedup_selections(values: &[String]) -> Vec<Selection> {
  let mut out: Vec<Selection> = Vec::with_capacity(values.len());
  for value in values {
    let selection = Selection::new(value.as_str());
    if selection.folded.is_empty() {
      continue;
    }
    if out.iter().any(|s| s.folded == selection.folded) {
      continue;
    }
    out.push(selection);
  }
  out
}
