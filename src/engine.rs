//! The matcher that runs filters, facets, sorting and pagination.

use crate::context::SearchContext;
use crate::criteria::{SearchCriteria, DEFAULT_PAGE_SIZE};
use crate::facet::{Facet, FacetKind};
use crate::facets::{SelectionFacet, TextFacet};
use crate::filter::FilterPipeline;
use crate::pagination::{self, PageLink};
use crate::sort::sort_matches;
use crate::types::{Clinic, ClinicMatch};
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Hard cap on results kept after sorting, before paging.
pub const DEFAULT_MAX_RESULTS: usize = 300;

/// The clinic matcher.
///
/// `ClinicMatcher` owns a set of [`Facet`]s and turns a clinic list plus
/// [`SearchCriteria`] into one page of scored, ordered results. It keeps no
/// state between calls: every search filters, scores and sorts the full
/// input again, so calling it twice with the same inputs gives the same
/// page, and it can be shared freely between threads.
///
/// Create one with [`ClinicMatcher::new`] for the standard text / services /
/// languages facets, or with [`ClinicMatcher::builder`] to choose facets and
/// limits.
///
/// # Examples
///
/// ```rust
/// use dentalsearch::prelude::*;
///
/// let clinics = vec![
///     Clinic {
///         services: vec!["Orthodontics".into()],
///         ..Clinic::named("MyDentist - Camden")
///     },
///     Clinic::named("Bupa Dental Care"),
/// ];
///
/// let matcher = ClinicMatcher::new();
/// let criteria = SearchCriteria::builder().service("Orthodontics").build();
/// let page = matcher.search(&clinics, &criteria);
///
/// assert_eq!(page.total, 2);
/// assert_eq!(page.results[0].clinic.name, "MyDentist - Camden");
/// assert_eq!(page.results[0].score, 100);
/// assert_eq!(page.results[1].score, 0);
/// ```
pub struct ClinicMatcher {
  /// The registered scoring facets.
  facets: Vec<Box<dyn Facet>>,
  /// How raw facet points are turned into a 0–100 score.
  normalization: ScoreNormalization,
  /// Results kept after sorting.
  max_results: usize,
  /// Page size used when the criteria ask for zero.
  default_page_size: usize,
}

impl Default for ClinicMatcher {
  fn default() -> Self {
    Self::new()
  }
}

impl ClinicMatcher {
  /// A matcher with the text (30), services (40) and languages (30) facets.
  pub fn new() -> Self {
    Self::builder().standard_facets().build()
  }

  /// Creates a new `ClinicMatcherBuilder`.
  pub fn builder() -> ClinicMatcherBuilder {
    ClinicMatcherBuilder::new()
  }

  pub fn max_results(&self) -> usize {
    self.max_results
  }

  pub fn normalization(&self) -> ScoreNormalization {
    self.normalization
  }

  /// Runs a full search and returns the requested page.
  ///
  /// ## Search Lifecycle
  ///
  /// 1. The criteria are folded once into a [`SearchContext`].
  /// 2. Hard filters drop clinics that fail any active predicate.
  /// 3. Every remaining clinic is scored by the active facets; those below
  ///    `min_score` are dropped.
  /// 4. The matches are stable-sorted by `sort_by`.
  /// 5. The list is cut to `max_results`; `limited` records whether the cut
  ///    could have removed anything.
  /// 6. The page is clamped into range and sliced out.
  pub fn search<'a>(&self, clinics: &'a [Clinic], criteria: &SearchCriteria) -> SearchPage<'a> {
    let mut matches = self.rank(clinics, criteria);
    let raw_count = matches.len();

    let limited = raw_count >= self.max_results;
    matches.truncate(self.max_results);
    let total = matches.len();

    let page_size = if criteria.page_size == 0 {
      self.default_page_size
    } else {
      criteria.page_size
    };
    let total_pages = pagination::total_pages(total, page_size);
    let page = pagination::clamp_page(criteria.page, total_pages);
    let range = pagination::page_range(page, page_size, total);

    let results: Vec<ClinicMatch<'a>> = matches.drain(range).collect();

    debug!(
      input = clinics.len(),
      matched = raw_count,
      total,
      limited,
      page,
      total_pages,
      sort_by = %criteria.sort_by,
      "clinic search complete"
    );

    SearchPage {
      results,
      total,
      page,
      page_size,
      total_pages,
      limited,
    }
  }

  /// Filters, scores and sorts without truncating or paging.
  pub fn rank<'a>(&self, clinics: &'a [Clinic], criteria: &SearchCriteria) -> Vec<ClinicMatch<'a>> {
    let context = SearchContext::new(criteria);
    let pipeline = FilterPipeline::from_criteria(criteria);
    let active = self.active_facets(&context);
    let max_attainable = self.max_attainable(&active);

    #[cfg(feature = "parallel")]
    let iter = clinics.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = clinics.iter();

    let mut matches: Vec<ClinicMatch<'a>> = iter
      .filter(|clinic| pipeline.matches(clinic))
      .map(|clinic| Self::score_with(clinic, &context, &active, max_attainable))
      .filter(|m| m.score >= criteria.min_score)
      .collect();

    sort_matches(&mut matches, criteria.sort_by);
    matches
  }

  /// Scores one clinic against the facets of `criteria`, ignoring filters.
  pub fn score<'a>(&self, clinic: &'a Clinic, criteria: &SearchCriteria) -> ClinicMatch<'a> {
    let context = SearchContext::new(criteria);
    let active = self.active_facets(&context);
    let max_attainable = self.max_attainable(&active);
    Self::score_with(clinic, &context, &active, max_attainable)
  }

  fn active_facets(&self, context: &SearchContext<'_>) -> Vec<&dyn Facet> {
    self
      .facets
      .iter()
      .map(|facet| facet.as_ref())
      .filter(|facet| facet.is_active(context))
      .collect()
  }

  /// The denominator for normalization, or `None` when nothing is active
  /// and every clinic scores 100.
  fn max_attainable(&self, active: &[&dyn Facet]) -> Option<f64> {
    if active.is_empty() {
      return None;
    }
    let max: f64 = match self.normalization {
      ScoreNormalization::ActiveFacets => active.iter().map(|f| f.weight()).sum(),
      ScoreNormalization::Fixed => self.facets.iter().map(|f| f.weight()).sum(),
    };
    (max > 0.0).then_some(max)
  }

  fn score_with<'a>(
    clinic: &'a Clinic,
    context: &SearchContext<'_>,
    active: &[&dyn Facet],
    max_attainable: Option<f64>,
  ) -> ClinicMatch<'a> {
    let Some(max) = max_attainable else {
      return ClinicMatch::new(clinic, 100);
    };

    let mut raw = 0.0;
    let mut m = ClinicMatch::new(clinic, 0);
    for facet in active {
      let outcome = facet.score(clinic, context);
      raw += outcome.points;
      m.details.extend(outcome.details);
      match facet.kind() {
        FacetKind::Services => m.matched_services.extend(outcome.matched),
        FacetKind::Languages => m.matched_languages.extend(outcome.matched),
        FacetKind::Text | FacetKind::Custom => {}
      }
    }

    m.score = normalize(raw, max);
    m
  }
}

/// `round(raw / max * 100)` clamped to `0..=100`.
fn normalize(raw: f64, max: f64) -> u8 {
  let pct = (raw / max * 100.0).round();
  if pct.is_nan() {
    return 0;
  }
  pct.clamp(0.0, 100.0) as u8
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<'a> {
  /// The matches on this page, in sort order.
  pub results: Vec<ClinicMatch<'a>>,
  /// Matches after filtering and scoring, capped at `max_results`.
  pub total: usize,
  /// The page actually returned, after clamping.
  pub page: usize,
  pub page_size: usize,
  /// Always at least one, even for an empty result set.
  pub total_pages: usize,
  /// Whether the raw match count reached the `max_results` cap.
  pub limited: bool,
}

impl<'a> SearchPage<'a> {
  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  /// The page-number strip for this page.
  pub fn page_links(&self) -> Vec<PageLink> {
    pagination::page_numbers(self.page, self.total_pages)
  }

  /// 1-indexed positions of the first and last result shown, e.g. `(51, 100)`
  /// for "Showing 51-100". `(0, 0)` when empty.
  pub fn showing(&self) -> (usize, usize) {
    if self.results.is_empty() {
      return (0, 0);
    }
    let start = (self.page - 1) * self.page_size + 1;
    (start, start + self.results.len() - 1)
  }

  pub fn has_next(&self) -> bool {
    self.page < self.total_pages
  }

  pub fn has_prev(&self) -> bool {
    self.page > 1
  }
}

/// A builder for creating `ClinicMatcher` instances.
#[derive(Default)]
pub struct ClinicMatcherBuilder {
  facets: Vec<Box<dyn Facet>>,
  normalization: Option<ScoreNormalization>,
  max_results: Option<usize>,
  default_page_size: Option<usize>,
}

impl ClinicMatcherBuilder {
  /// Creates a new, empty `ClinicMatcherBuilder`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a scoring facet.
  pub fn with(mut self, facet: Box<dyn Facet>) -> Self {
    self.facets.push(facet);
    self
  }

  /// Adds the text, services and languages facets.
  pub fn standard_facets(self) -> Self {
    self
      .with(Box::new(TextFacet::new()))
      .with(Box::new(SelectionFacet::services()))
      .with(Box::new(SelectionFacet::languages()))
  }

  /// Sets the score normalization. Defaults to
  /// [`ScoreNormalization::ActiveFacets`].
  pub fn normalization(mut self, method: ScoreNormalization) -> Self {
    self.normalization = Some(method);
    self
  }

  /// Sets the result cap. Values below one are raised to one.
  pub fn max_results(mut self, max_results: usize) -> Self {
    self.max_results = Some(max_results.max(1));
    self
  }

  /// Sets the page size used when criteria ask for a page size of zero.
  pub fn default_page_size(mut self, page_size: usize) -> Self {
    self.default_page_size = Some(page_size.max(1));
    self
  }

  /// Builds the `ClinicMatcher`.
  pub fn build(self) -> ClinicMatcher {
    ClinicMatcher {
      facets: self.facets,
      normalization: self.normalization.unwrap_or_default(),
      max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
      default_page_size: self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    }
  }
}

/// How raw facet points become a 0–100 score.
///
/// With no active facet at all, both methods give every clinic 100 so the
/// ranking falls through to the secondary sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNormalization {
  /// **Active facets**: divide by the summed weight of the facets the
  /// search actually uses. A text-only search is scored out of 30, a
  /// services-only search out of 40, so a clinic matching everything that
  /// was asked for reaches 100.
  #[default]
  ActiveFacets,

  /// **Fixed**: always divide by the summed weight of every registered
  /// facet (100 for the standard set), so scores are comparable across
  /// searches but a partial search can never reach 100.
  Fixed,
}
