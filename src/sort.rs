//! Result ordering.
//!
//! All orderings are stable: matches with equal keys keep the order they had
//! after filtering, which is the order of the input clinic list.

use crate::criteria::SortBy;
use crate::types::ClinicMatch;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compares two matches by the given key.
pub fn compare(a: &ClinicMatch<'_>, b: &ClinicMatch<'_>, sort_by: SortBy) -> Ordering {
  match sort_by {
    SortBy::Match => b.score.cmp(&a.score),
    SortBy::Name => collate(&a.clinic.name, &b.clinic.name),
    SortBy::Services => b.clinic.services.len().cmp(&a.clinic.services.len()),
    SortBy::Rating => b
      .clinic
      .rating_or_zero()
      .partial_cmp(&a.clinic.rating_or_zero())
      .unwrap_or(Ordering::Equal),
  }
}

/// Orders names the way a person reading a directory expects: accents and
/// case are ignored at first, and only break exact ties.
pub fn collate(a: &str, b: &str) -> Ordering {
  fold(a).cmp(fold(b)).then_with(|| a.cmp(b))
}

fn fold(name: &str) -> impl Iterator<Item = char> + '_ {
  name
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
}

/// Sorts the matches in place.
#[cfg(not(feature = "parallel"))]
pub fn sort_matches(matches: &mut [ClinicMatch<'_>], sort_by: SortBy) {
  matches.sort_by(|a, b| compare(a, b, sort_by));
}

/// Sorts the matches in place.
#[cfg(feature = "parallel")]
pub fn sort_matches(matches: &mut [ClinicMatch<'_>], sort_by: SortBy) {
  matches.par_sort_by(|a, b| compare(a, b, sort_by));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Clinic;

  #[test]
  fn test_collate_ignores_case_first() {
    assert_eq!(collate("apple", "Banana"), Ordering::Less);
    assert_eq!(collate("Zed", "alpha"), Ordering::Greater);
    assert_eq!(collate("", "A"), Ordering::Less);
    assert_ne!(collate("abc", "ABC"), Ordering::Equal);
  }

  #[test]
  fn test_accented_names_sort_with_their_base_letter() {
    let clinics: Vec<Clinic> = ["Zenith Dental", "Élite Dental", "Abbey Dental", "Ealing Smiles"]
      .iter()
      .map(|n| Clinic::named(*n))
      .collect();
    let mut matches: Vec<ClinicMatch<'_>> = clinics.iter().map(|c| ClinicMatch::new(c, 0)).collect();
    sort_matches(&mut matches, SortBy::Name);
    let names: Vec<&str> = matches.iter().map(|m| m.clinic.name.as_str()).collect();
    assert_eq!(names, vec!["Abbey Dental", "Ealing Smiles", "Élite Dental", "Zenith Dental"]);

    assert_eq!(collate("Çelik", "Cole"), Ordering::Less);
    assert_ne!(collate("Elite", "Élite"), Ordering::Equal);
  }

  #[test]
  fn test_rating_sort_treats_missing_as_zero() {
    let rated = Clinic {
      rating: Some(1.0),
      ..Clinic::named("Rated")
    };
    let unrated = Clinic::named("Unrated");
    let mut matches = vec![ClinicMatch::new(&unrated, 0), ClinicMatch::new(&rated, 0)];
    sort_matches(&mut matches, SortBy::Rating);
    assert_eq!(matches[0].clinic.name, "Rated");
  }

  #[test]
  fn test_ties_keep_input_order() {
    let clinics: Vec<Clinic> = ["c", "a", "b"].iter().map(|n| Clinic::named(*n)).collect();
    let mut matches: Vec<ClinicMatch<'_>> = clinics.iter().map(|c| ClinicMatch::new(c, 50)).collect();
    sort_matches(&mut matches, SortBy::Match);
    let names: Vec<&str> = matches.iter().map(|m| m.clinic.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
  }

  #[test]
  fn test_services_sort_descending() {
    let many = Clinic {
      services: vec!["A".into(), "B".into()],
      ..Clinic::named("Many")
    };
    let few = Clinic::named("Few");
    let mut matches = vec![ClinicMatch::new(&few, 0), ClinicMatch::new(&many, 0)];
    sort_matches(&mut matches, SortBy::Services);
    assert_eq!(matches[0].clinic.name, "Many");
  }
}
