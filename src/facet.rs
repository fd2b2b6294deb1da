//! The `Facet` trait, which defines one independent scoring dimension.

use crate::context::SearchContext;
use crate::types::{Clinic, MatchDetail};
use serde::{Deserialize, Serialize};

/// A scoring dimension plugged into the [`ClinicMatcher`](crate::engine::ClinicMatcher).
///
/// Each facet owns a share of the 100-point scale (its `weight`) and awards
/// up to that many raw points per clinic. The engine sums the raw points of
/// the active facets and normalizes the total, so a facet never has to know
/// about the others.
///
/// The `Send` and `Sync` bounds allow the engine to score clinics in
/// parallel when the `parallel` feature is enabled.
pub trait Facet: Send + Sync {
  /// Returns the `FacetKind` of this facet.
  ///
  /// The engine uses the kind to decide where matched names are reported
  /// (`matched_services` vs `matched_languages`).
  fn kind(&self) -> FacetKind;

  /// Maximum raw points this facet can award.
  fn weight(&self) -> f64;

  /// Whether the current search uses this facet at all. Inactive facets
  /// contribute nothing and, depending on the normalization, do not count
  /// towards the attainable maximum either.
  fn is_active(&self, context: &SearchContext<'_>) -> bool;

  /// Scores one clinic. Only called when [`Facet::is_active`] returned true.
  ///
  /// The returned points are expected to be within `0.0..=self.weight()`.
  fn score(&self, clinic: &Clinic, context: &SearchContext<'_>) -> FacetScore;
}

/// Outcome of scoring one clinic against one facet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetScore {
  /// Raw points awarded.
  pub points: f64,
  /// Reasons for the points, in discovery order.
  pub details: Vec<MatchDetail>,
  /// Requested values the clinic satisfied, in their requested spelling.
  pub matched: Vec<String>,
}

impl FacetScore {
  /// A score with no points, details or matches.
  pub fn none() -> Self {
    Self::default()
  }

  /// Adds points together with the reason for them.
  pub fn award(&mut self, points: f64, detail: MatchDetail) {
    self.points += points;
    self.details.push(detail);
  }
}

/// An enumeration of the different kinds of facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
  /// Free-text matching over name, address, languages and services.
  Text,
  /// Selected services.
  Services,
  /// Selected languages.
  Languages,
  /// A placeholder for custom, user-defined facets.
  Custom,
}
