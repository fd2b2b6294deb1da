//! Where clinic lists come from.
//!
//! Every source hands back fully normalized [`Clinic`]s; raw records pass
//! through [`RawClinic`] on the way in, so the matcher never sees a missing
//! field or an alternative field name.
//!
//! # Available Sources
//!
//! - [`EmbeddedSource`]: the dataset compiled into the crate, or any JSON
//!   array of clinic records read from a string or a file.
//! - [`ApiClient`](crate::source::ApiClient): the remote clinic search API.
//!   Requires the `api` feature.

use crate::error::Result;
use crate::types::Clinic;

pub mod embedded;
pub mod raw;

#[cfg(feature = "api")]
pub mod api;

pub use embedded::EmbeddedSource;
pub use raw::{extract_postcode, RawClinic};

#[cfg(feature = "api")]
pub use api::{ApiClient, ApiQuery, ApiSearchResponse};

/// A synchronous provider of clinic records.
pub trait ClinicSource {
  /// Loads and normalizes every clinic the source holds.
  fn load(&self) -> Result<Vec<Clinic>>;
}
