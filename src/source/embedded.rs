use super::{ClinicSource, RawClinic};
use crate::error::Result;
use crate::types::Clinic;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const EMBEDDED_CLINICS: &str = include_str!("../../data/clinics.json");

/// A clinic list held as JSON text.
///
/// `EmbeddedSource::default()` serves the dataset bundled with the crate.
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
  json: Cow<'static, str>,
}

impl Default for EmbeddedSource {
  fn default() -> Self {
    Self {
      json: Cow::Borrowed(EMBEDDED_CLINICS),
    }
  }
}

impl EmbeddedSource {
  /// The bundled dataset.
  pub fn new() -> Self {
    Self::default()
  }

  /// A source over the given JSON array.
  pub fn from_json_str(json: impl Into<String>) -> Self {
    Self {
      json: Cow::Owned(json.into()),
    }
  }

  /// A source over a JSON file, read once up front.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let json = fs::read_to_string(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = json.len(), "read clinic file");
    Ok(Self::from_json_str(json))
  }
}

impl ClinicSource for EmbeddedSource {
  fn load(&self) -> Result<Vec<Clinic>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(&self.json)?;
    let total = records.len();

    let clinics: Vec<Clinic> = records
      .into_iter()
      .enumerate()
      .filter_map(|(index, value)| match serde_json::from_value::<RawClinic>(value) {
        Ok(raw) => Some(Clinic::from(raw)),
        Err(err) => {
          warn!(index, error = %err, "skipping malformed clinic record");
          None
        }
      })
      .collect();

    debug!(total, loaded = clinics.len(), "loaded clinics");
    Ok(clinics)
  }
}
