//! Option lists for the selection pickers and dashboard statistics.

use crate::types::Clinic;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The distinct services and languages found in a clinic list, sorted
/// ascending. Used to populate the service and language pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCatalog {
  pub services: Vec<String>,
  pub languages: Vec<String>,
}

impl FacetCatalog {
  pub fn from_clinics(clinics: &[Clinic]) -> Self {
    let services: BTreeSet<&str> = clinics
      .iter()
      .flat_map(|c| c.services.iter().map(String::as_str))
      .collect();
    let languages: BTreeSet<&str> = clinics
      .iter()
      .flat_map(|c| c.languages.iter().map(String::as_str))
      .collect();
    Self {
      services: services.into_iter().map(str::to_string).collect(),
      languages: languages.into_iter().map(str::to_string).collect(),
    }
  }
}

/// Summary figures for a clinic list.
///
/// Service and language counts are clinic counts: a clinic that lists the
/// same service twice is counted once for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
  pub total_clinics: usize,
  /// Distinct services across all clinics.
  pub total_services: usize,
  /// Distinct languages across all clinics.
  pub total_languages: usize,
  /// Mean length of each clinic's service list, to one decimal place.
  pub avg_services_per_clinic: f64,
  pub nhs_clinics: usize,
  pub private_clinics: usize,
  pub emergency_clinics: usize,
  pub service_counts: BTreeMap<String, usize>,
  pub language_counts: BTreeMap<String, usize>,
}

impl Statistics {
  pub fn from_clinics(clinics: &[Clinic]) -> Self {
    let mut service_counts = BTreeMap::new();
    let mut language_counts = BTreeMap::new();
    let mut listed_services = 0usize;

    for clinic in clinics {
      listed_services += clinic.services.len();
      count_distinct(&mut service_counts, &clinic.services);
      count_distinct(&mut language_counts, &clinic.languages);
    }

    let avg_services_per_clinic = if clinics.is_empty() {
      0.0
    } else {
      (listed_services as f64 / clinics.len() as f64 * 10.0).round() / 10.0
    };

    Self {
      total_clinics: clinics.len(),
      total_services: service_counts.len(),
      total_languages: language_counts.len(),
      avg_services_per_clinic,
      nhs_clinics: clinics.iter().filter(|c| c.nhs).count(),
      private_clinics: clinics.iter().filter(|c| c.private).count(),
      emergency_clinics: clinics.iter().filter(|c| c.emergency).count(),
      service_counts,
      language_counts,
    }
  }

  /// The `n` most offered services, most common first, ties by name.
  pub fn top_services(&self, n: usize) -> Vec<(&str, usize)> {
    top(&self.service_counts, n)
  }

  /// The `n` most spoken languages, most common first, ties by name.
  pub fn top_languages(&self, n: usize) -> Vec<(&str, usize)> {
    top(&self.language_counts, n)
  }
}

fn count_distinct(counts: &mut BTreeMap<String, usize>, values: &[String]) {
  let seen: BTreeSet<&String> = values.iter().collect();
  for value in seen {
    *counts.entry(value.clone()).or_insert(0) += 1;
  }
}

fn top(counts: &BTreeMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
  let mut ranked: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
  // BTreeMap iteration is already name-ascending, so a stable sort on count
  // keeps ties alphabetical.
  ranked.sort_by(|a, b| b.1.cmp(&a.1));
  ranked.truncate(n);
  ranked
}
