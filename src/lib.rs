//! dentalsearch - Search, filter, score and paginate London dental clinics.
//!
//! A stateless [`ClinicMatcher`](engine::ClinicMatcher) takes a list of
//! normalized clinics and a [`SearchCriteria`](criteria::SearchCriteria),
//! applies hard filters, scores each survivor out of 100 with pluggable
//! facets, sorts, caps and returns one page of results. Around the core sit
//! record normalization and data sources, London zone lookup, catalog
//! statistics, a persistent error log and TOML configuration.

pub mod catalog;
pub mod config;
pub mod context;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod errorlog;
pub mod facet;
pub mod facets;
pub mod filter;
pub mod pagination;
pub mod sort;
pub mod source;
pub mod types;
pub mod zone;

pub use error::{ApiError, Error, Result};

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::catalog::{FacetCatalog, Statistics};
  pub use crate::config::Config;
  pub use crate::context::SearchContext;
  pub use crate::criteria::*;
  pub use crate::engine::*;
  pub use crate::error::{ApiError, Error};
  pub use crate::errorlog::{ErrorLog, Level, LogEntry};
  pub use crate::facet::*;
  pub use crate::filter::{filter, FilterPipeline, Predicate};
  pub use crate::pagination::{PageLink, Pager};
  pub use crate::source::{ClinicSource, EmbeddedSource, RawClinic};
  pub use crate::types::*;
  pub use crate::zone::{zone_for_postcode, zone_of, Zone};
}
