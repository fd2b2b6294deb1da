//! Loosely-typed clinic records and their normalization into [`Clinic`].

use crate::types::Clinic;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::warn;

/// A clinic record as found in a data file or API response.
///
/// Every field is optional, and the alternative field names used by the
/// NHS and scraped datasets are accepted next to the canonical ones. When a
/// record carries both spellings the canonical one wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawClinic {
  pub name: Option<String>,
  #[serde(rename = "practiceName")]
  pub practice_name: Option<String>,

  pub address: Option<String>,
  #[serde(rename = "fullAddress")]
  pub full_address: Option<String>,

  pub phone: Option<String>,
  pub telephone: Option<String>,

  pub link: Option<String>,
  pub website: Option<String>,
  pub url: Option<String>,

  pub postcode: Option<String>,
  pub area: Option<String>,

  pub services: Option<Vec<String>>,
  #[serde(rename = "serviceTypes")]
  pub service_types: Option<Vec<String>>,
  pub languages: Option<Vec<String>>,

  pub nhs: Option<bool>,
  #[serde(rename = "acceptsNHS")]
  pub accepts_nhs: Option<bool>,
  pub private: Option<bool>,
  #[serde(rename = "acceptsPrivate")]
  pub accepts_private: Option<bool>,
  pub emergency: Option<bool>,
  pub children: Option<bool>,
  pub wheelchair_access: Option<bool>,
  #[serde(rename = "wheelchairAccess")]
  pub wheelchair_access_camel: Option<bool>,
  pub parking: Option<bool>,

  pub rating: Option<f64>,

  pub opening_hours: Option<String>,
  #[serde(rename = "openingHours")]
  pub opening_hours_camel: Option<String>,

  pub source: Option<String>,
}

impl From<RawClinic> for Clinic {
  fn from(raw: RawClinic) -> Self {
    let name = raw.name.or(raw.practice_name).unwrap_or_default();
    let address = raw.address.or(raw.full_address).unwrap_or_default();

    let postcode = non_blank(raw.postcode).or_else(|| extract_postcode(&address));

    let rating = raw.rating.filter(|r| (0.0..=5.0).contains(r));
    if rating.is_none() {
      if let Some(bad) = raw.rating {
        warn!(clinic = %name, rating = bad, "dropping out-of-range rating");
      }
    }

    Clinic {
      name,
      address,
      phone: non_blank(raw.phone.or(raw.telephone)),
      link: non_blank(raw.link.or(raw.website).or(raw.url)),
      postcode,
      area: non_blank(raw.area),
      services: raw.services.or(raw.service_types).unwrap_or_default(),
      languages: raw.languages.unwrap_or_default(),
      nhs: raw.nhs.or(raw.accepts_nhs).unwrap_or(false),
      private: raw.private.or(raw.accepts_private).unwrap_or(false),
      emergency: raw.emergency.unwrap_or(false),
      children: raw.children.unwrap_or(false),
      wheelchair_access: raw
        .wheelchair_access
        .or(raw.wheelchair_access_camel)
        .unwrap_or(false),
      parking: raw.parking.unwrap_or(false),
      rating,
      opening_hours: non_blank(raw.opening_hours.or(raw.opening_hours_camel)),
      source: raw.source.unwrap_or_default(),
    }
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

static POSTCODE: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"(?i)\b([A-Z]{1,2}\d[A-Z\d]?)\s?(\d[A-Z]{2})\b").ok());

/// Finds a UK postcode in free text, e.g. `"London W1C 1DH"` gives
/// `"W1C 1DH"`. The outward and inward codes may be separated by a space or
/// written together. The result is upper-cased with a single space.
pub fn extract_postcode(text: &str) -> Option<String> {
  let caps = POSTCODE.as_ref()?.captures(text)?;
  Some(format!("{} {}", &caps[1], &caps[2]).to_uppercase())
}
