//! Bibcode generation from bibliographic metadata.
//!
//! A bibcode is a 19 character identifier for a scholarly publication, built
//! from its year, journal (the "bibstem"), volume, page and first author:
//!
//! ```text
//! 2020ApJ...900..123S
//! ```
//!
//! `bibcode_encoder` turns loosely structured records into bibcodes, following
//! the conventions different publishers use to fit their page numbers into the
//! fixed layout.
//!
//! # Key Features
//!
//! - **Fixed-width assembly**: every bibcode is checked to be exactly 19
//!   characters; anything else is an error, never a returned value.
//! - **Publisher policies**: IOP, APS, OUP, AIP and Springer journals each get
//!   their own page compression and qualifier rules, driven by a
//!   [`PublisherTable`] that can be loaded from JSON.
//! - **Article numbers**: six digit article numbers are folded into a letter
//!   plus four digits (`043511` → `d3511`).
//! - **Bibstem resolution**: records without a known bibstem are looked up by
//!   ISSN through a pluggable [`BibstemResolver`].
//!
//! # Basic Usage
//!
//! ```rust
//! use bibcode_encoder::{BibcodeEncoder, BibliographicRecord, EncoderConfig};
//! use bibcode_encoder::record::{Author, Pagination, Publication};
//!
//! let record = BibliographicRecord {
//!     authors: vec![Author::with_surname("Smith")],
//!     publication: Some(Publication {
//!         pub_year: Some("2020".to_string()),
//!         volume_num: Some("900".to_string()),
//!         ..Default::default()
//!     }),
//!     pagination: Some(Pagination {
//!         first_page: Some("123".to_string()),
//!         ..Default::default()
//!     }),
//! };
//!
//! let encoder = BibcodeEncoder::with_config(EncoderConfig::with_bibstem("ApJ"));
//! let bibcode = encoder.make_bibcode(&record, None).unwrap();
//! assert_eq!(bibcode.as_str(), "2020ApJ...900..123S");
//!
//! // A per-call bibstem wins over the configured one.
//! let letters = encoder.make_bibcode(&record, Some("ApJL")).unwrap();
//! assert_eq!(letters.as_str(), "2020ApJ...900L.123S");
//! ```
//!
//! # Error Handling
//!
//! Fields other than the year and bibstem never fail: a missing volume, page or
//! author just leaves dots in their slots. The year and bibstem are required.
//!
//! ```rust
//! use bibcode_encoder::{BibcodeEncoder, BibcodeError, BibliographicRecord};
//!
//! let result = BibcodeEncoder::new().make_bibcode(&BibliographicRecord::default(), Some("ApJ"));
//! match result {
//!     Err(BibcodeError::Incomplete { missing }) => {
//!         assert_eq!(missing, vec![BibcodeError::NoPubYear]);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! # Thread Safety
//!
//! [`BibcodeEncoder`] holds only immutable configuration and is `Send + Sync`.
//! The only blocking call is the ISSN lookup, made by the resolver.

use itertools::Itertools;
use thiserror::Error;

pub mod bibcode;
pub mod encoder;
pub mod extract;
pub mod pages;
pub mod publishers;
pub mod record;
mod regex;
pub mod resolve;
pub mod utils;

// Reexports
pub use bibcode::Bibcode;
pub use encoder::{BibcodeEncoder, EncoderConfig};
pub use publishers::{PublisherGroup, PublisherTable};
pub use record::BibliographicRecord;
pub use resolve::BibstemResolver;
pub use utils::Transliterator;

/// A specialized Result type for bibcode operations.
pub type Result<T> = std::result::Result<T, BibcodeError>;

/// Errors that can occur while building a bibcode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BibcodeError {
    #[error("no publication year")]
    NoPubYear,

    #[error("bibstem not found")]
    BibstemNotFound,

    #[error("no bibcode can be made: {}", .missing.iter().join(", "))]
    Incomplete { missing: Vec<BibcodeError> },

    #[error("malformed bibcode '{bibcode}': {length} characters")]
    MalformedLength { bibcode: String, length: usize },

    #[error("invalid bibcode: {0}")]
    InvalidBibcode(String),

    #[error("invalid publisher table: {0}")]
    InvalidPublisherTable(String),

    #[error("bibstem lookup failed: {0}")]
    Resolver(String),
}

impl From<serde_json::Error> for BibcodeError {
    fn from(err: serde_json::Error) -> Self {
        BibcodeError::InvalidPublisherTable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bibcode_error_display() {
        let error = BibcodeError::Incomplete {
            missing: vec![BibcodeError::NoPubYear, BibcodeError::BibstemNotFound],
        };
        assert_eq!(
            error.to_string(),
            "no bibcode can be made: no publication year, bibstem not found"
        );
    }

    #[test]
    fn test_malformed_length_display() {
        let error = BibcodeError::MalformedLength {
            bibcode: "2020ApJ".to_string(),
            length: 7,
        };
        assert_eq!(
            error.to_string(),
            "malformed bibcode '2020ApJ': 7 characters"
        );
    }
}
