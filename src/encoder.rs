//! Bibcode generation.
//!
//! [`BibcodeEncoder`] ties the pieces together: it extracts the fields of a
//! record, resolves the bibstem, applies the publisher's [`Policy`] and
//! assembles the result.
//!
//! ```
//! use bibcode_encoder::{BibcodeEncoder, BibliographicRecord, EncoderConfig};
//!
//! let record: BibliographicRecord = serde_json::from_str(r#"{
//!     "authors": [{"name": {"surname": "Smith"}}],
//!     "publication": {"pubYear": "2020", "volumeNum": "900"},
//!     "pagination": {"firstPage": "123"}
//! }"#).unwrap();
//!
//! let encoder = BibcodeEncoder::with_config(EncoderConfig {
//!     bibstem: Some("ApJ".to_string()),
//!     ..Default::default()
//! });
//! let bibcode = encoder.make_bibcode(&record, None).unwrap();
//! assert_eq!(bibcode, "2020ApJ...900..123S");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::bibcode::Bibcode;
use crate::extract;
use crate::pages::{CompressedPage, ordinal_to_letter};
use crate::publishers::{BIBSTEM_WIDTH, IssueRule, Policy, PublisherTable, VolumeRule};
use crate::record::BibliographicRecord;
use crate::resolve::{BibstemResolver, resolve_bibstem};
use crate::utils::{AsciiTransliterator, FILL, Transliterator, left_justify, right_justify};
use crate::{BibcodeError, Result};

const VOLUME_WIDTH: usize = 4;
const PAGE_WIDTH: usize = 5;
const MISSING_PAGE: &str = ".";

/// Settings fixed for the lifetime of an encoder.
///
/// Callers build this from wherever they keep configuration; the encoder reads
/// nothing from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Use this bibstem for every record instead of resolving ISSNs.
    pub bibstem: Option<String>,
    /// Token for the ISSN lookup service.
    pub api_token: Option<String>,
    /// Base URL of the ISSN lookup service.
    pub api_url: Option<String>,
    /// Timeout for a single lookup, in seconds.
    pub timeout_secs: Option<u64>,
}

impl EncoderConfig {
    /// Lookup timeout used when none is configured.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn with_bibstem(bibstem: &str) -> Self {
        Self {
            bibstem: Some(bibstem.to_string()),
            ..Self::default()
        }
    }
}

/// Builds bibcodes from [`BibliographicRecord`]s.
///
/// An encoder holds only immutable configuration and can be shared between
/// threads; encoding the same record twice gives the same bibcode.
pub struct BibcodeEncoder {
    config: EncoderConfig,
    publishers: PublisherTable,
    resolver: Option<Box<dyn BibstemResolver>>,
    transliterator: Box<dyn Transliterator>,
}

impl fmt::Debug for BibcodeEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BibcodeEncoder")
            .field("config", &self.config)
            .field("publishers", &self.publishers.len())
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for BibcodeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot contents after the publisher policy has run, before padding of the
/// qualifier and page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slots {
    bibstem: String,
    volume: String,
    qualifier: Option<String>,
    page: String,
}

impl BibcodeEncoder {
    /// Creates an encoder with no fixed bibstem, no resolver and the built-in
    /// publisher table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EncoderConfig::default(),
            publishers: PublisherTable::default(),
            resolver: None,
            transliterator: Box::new(AsciiTransliterator),
        }
    }

    /// Creates an encoder from `config`. No resolver is attached; with the `ads`
    /// feature, `from_config` builds one from the credentials.
    #[must_use]
    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Creates an encoder from `config`, attaching the ADS journals resolver
    /// when both `api_token` and `api_url` are set.
    ///
    /// # Errors
    ///
    /// Returns `BibcodeError::Resolver` if the resolver cannot be created.
    #[cfg(feature = "ads")]
    pub fn from_config(config: EncoderConfig) -> Result<Self> {
        use crate::resolve::AdsJournalsResolver;
        use std::time::Duration;

        let resolver = match (&config.api_token, &config.api_url) {
            (Some(token), Some(url)) => {
                let timeout = config
                    .timeout_secs
                    .unwrap_or(EncoderConfig::DEFAULT_TIMEOUT_SECS);
                Some(AdsJournalsResolver::new(
                    token,
                    url,
                    Duration::from_secs(timeout),
                )?)
            }
            _ => None,
        };

        let encoder = Self::with_config(config);
        Ok(match resolver {
            Some(resolver) => encoder.with_resolver(resolver),
            None => encoder,
        })
    }

    /// Replaces the publisher classification.
    #[must_use]
    pub fn with_publishers(mut self, publishers: PublisherTable) -> Self {
        self.publishers = publishers;
        self
    }

    /// Sets the ISSN lookup used when no bibstem is given.
    #[must_use]
    pub fn with_resolver<R: BibstemResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Replaces the transliteration of author initials.
    #[must_use]
    pub fn with_transliterator<T: Transliterator + 'static>(mut self, transliterator: T) -> Self {
        self.transliterator = Box::new(transliterator);
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn publishers(&self) -> &PublisherTable {
        &self.publishers
    }

    /// Builds the bibcode for `record`.
    ///
    /// The bibstem is, in order of preference: `bibstem`, the configured
    /// bibstem, or the first of the record's ISSNs the resolver knows.
    ///
    /// # Errors
    ///
    /// - `BibcodeError::Incomplete` if the year or the bibstem is missing; its
    ///   `missing` list holds `NoPubYear` and/or `BibstemNotFound`.
    /// - `BibcodeError::MalformedLength` if the fields do not assemble into
    ///   exactly 19 characters (an overlong year or volume, for example).
    /// - `BibcodeError::InvalidBibcode` if the result is not ASCII.
    pub fn make_bibcode(
        &self,
        record: &BibliographicRecord,
        bibstem: Option<&str>,
    ) -> Result<Bibcode> {
        let year = extract::pub_year(record);
        let bibstem = self.bibstem_for(record, bibstem);
        let volume = extract::volume(record).unwrap_or_default();
        let initial = extract::author_initial(record, self.transliterator.as_ref()).unwrap_or(FILL);

        let (year, bibstem) = match (year, bibstem) {
            (Ok(year), Ok(bibstem)) => (year, bibstem),
            (year, bibstem) => {
                let missing = [year.err(), bibstem.err()].into_iter().flatten().collect();
                return Err(BibcodeError::Incomplete { missing });
            }
        };

        let bibstem = left_justify(&bibstem, BIBSTEM_WIDTH);
        let volume = right_justify(&volume, VOLUME_WIDTH);
        let policy = self.publishers.policy_for(&bibstem);
        debug!(
            bibstem,
            group = ?self.publishers.group_of(&bibstem),
            "applying publisher policy"
        );

        let slots = apply_policy(policy, record, bibstem, volume);
        assemble(year, slots, initial)
    }

    fn bibstem_for(&self, record: &BibliographicRecord, bibstem: Option<&str>) -> Result<String> {
        let given = |bibstem: &&str| !bibstem.is_empty();
        let fixed = bibstem
            .filter(given)
            .or_else(|| self.config.bibstem.as_deref().filter(given));
        if let Some(bibstem) = fixed {
            return Ok(bibstem.to_string());
        }
        match &self.resolver {
            Some(resolver) => resolve_bibstem(resolver.as_ref(), record),
            None => {
                debug!("no bibstem given and no resolver configured");
                Err(BibcodeError::BibstemNotFound)
            }
        }
    }
}

/// Runs the publisher policy over the already padded bibstem and volume.
fn apply_policy(
    policy: &Policy,
    record: &BibliographicRecord,
    bibstem: String,
    mut volume: String,
) -> Slots {
    let raw_page = extract::raw_page(record);
    let raw_page = raw_page.as_deref().unwrap_or(MISSING_PAGE);
    let CompressedPage { page, letter } = match policy.pages.compress(raw_page) {
        Some(compressed) => compressed,
        None => {
            warn!(bibstem, page = raw_page, "page cannot be encoded, leaving it blank");
            CompressedPage {
                page: String::new(),
                letter: None,
            }
        }
    };

    if policy.volume == VolumeRule::Issue {
        if let Some(issue) = extract::issue(record) {
            volume = right_justify(&issue, VOLUME_WIDTH);
        }
    }

    let qualifier = match &policy.issue {
        IssueRule::Fixed(qualifier) => Some(qualifier.to_string()),
        IssueRule::IssueOrdinal => extract::issue(record)
            .filter(|issue| !issue.is_empty())
            .map(|issue| ordinal_to_letter(&issue)),
        IssueRule::PageLetter => letter.map(String::from),
    };

    let bibstem = match &policy.rename {
        Some(renamed) => left_justify(renamed, BIBSTEM_WIDTH),
        None => bibstem,
    };

    Slots {
        bibstem,
        volume,
        qualifier,
        page,
    }
}

/// Pads the qualifier and page and checks the total length.
fn assemble(year: &str, slots: Slots, initial: char) -> Result<Bibcode> {
    let Slots {
        bibstem,
        volume,
        qualifier,
        page,
    } = slots;
    let (qualifier, page) = match qualifier.filter(|q| !q.is_empty()) {
        Some(qualifier) => (qualifier, right_justify(&page, PAGE_WIDTH - 1)),
        None => (String::new(), right_justify(&page, PAGE_WIDTH)),
    };

    let assembled = format!("{year}{bibstem}{volume}{qualifier}{page}{initial}");
    Bibcode::new(assembled).inspect_err(|err| warn!(error = %err, "rejecting assembled bibcode"))
}
