//! The built-in `Facet` implementations.
//!
//! # Available Facets
//!
//! - [`TextFacet`](crate::facets::TextFacet): free-text matching, 30 points.
//! - [`SelectionFacet::services`](crate::facets::SelectionFacet::services): selected services, 40 points.
//! - [`SelectionFacet::languages`](crate::facets::SelectionFacet::languages): selected languages, 30 points.
//!
//! # Example: Building a matcher from facets
//!
//! ```rust
//! use dentalsearch::prelude::*;
//! use dentalsearch::facets::{SelectionFacet, TextFacet};
//!
//! let matcher = ClinicMatcher::builder()
//!     .with(Box::new(TextFacet::new()))
//!     .with(Box::new(SelectionFacet::services()))
//!     .build();
//!
//! let clinics = vec![Clinic::named("Camden Dental")];
//! let page = matcher.search(&clinics, &SearchCriteria::builder().text("camden").build());
//! assert_eq!(page.total, 1);
//! ```

/// Implements free-text scoring over name, address, languages and services.
pub mod text;
/// Implements ratio scoring for selected services and languages.
pub mod selection;

pub use selection::SelectionFacet;
pub use text::{TextFacet, TextWeights};
