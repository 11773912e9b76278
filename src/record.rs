//! Input records.
//!
//! The shapes here mirror the JSON produced by the ingest pipeline, so a record
//! can be deserialized straight from it:
//!
//! ```
//! use bibcode_encoder::BibliographicRecord;
//!
//! let record: BibliographicRecord = serde_json::from_str(r#"{
//!     "authors": [{"name": {"surname": "Smith"}}],
//!     "publication": {"pubYear": 2020, "volumeNum": "900"},
//!     "pagination": {"firstPage": "123"}
//! }"#).unwrap();
//!
//! assert_eq!(record.first_surname(), Some("Smith"));
//! ```
//!
//! Every field is optional. The encoder decides what a missing value means.

use serde::{Deserialize, Deserializer, Serialize};

/// A bibliographic record as handed to the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibliographicRecord {
    /// Authors in byline order. Only the first one is consulted.
    pub authors: Vec<Author>,
    /// Venue, year, volume and issue details.
    pub publication: Option<Publication>,
    /// Page information.
    pub pagination: Option<Pagination>,
}

impl BibliographicRecord {
    /// Surname of the first author, if there is one.
    pub fn first_surname(&self) -> Option<&str> {
        self.authors
            .first()
            .and_then(|author| author.name.as_ref())
            .and_then(|name| name.surname.as_deref())
    }
}

/// A single author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: Option<AuthorName>,
}

impl Author {
    /// Creates an author with only a surname set.
    pub fn with_surname(surname: &str) -> Self {
        Self {
            name: Some(AuthorName {
                surname: Some(surname.to_string()),
                given_name: None,
            }),
        }
    }
}

/// Name parts of an author. Surnames may carry accents or other non-ASCII text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorName {
    pub surname: Option<String>,
    #[serde(rename = "given-name", alias = "givenName")]
    pub given_name: Option<String>,
}

/// Publication venue details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    /// Publication year, kept as text.
    #[serde(deserialize_with = "deserialize_text")]
    pub pub_year: Option<String>,
    /// Volume; may be a `first-last` range.
    #[serde(deserialize_with = "deserialize_text")]
    pub volume_num: Option<String>,
    /// Issue number.
    #[serde(deserialize_with = "deserialize_text")]
    pub issue_num: Option<String>,
    /// ISSNs of the venue, in preference order.
    #[serde(rename = "ISSN")]
    pub issn: Vec<Issn>,
}

/// One ISSN entry. The string is either 8 bare characters or `NNNN-NNNN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issn {
    pub issn_string: Option<String>,
    /// Print or electronic, when known.
    pub issn_type: Option<String>,
}

impl Issn {
    pub fn new(issn: &str) -> Self {
        Self {
            issn_string: Some(issn.to_string()),
            issn_type: None,
        }
    }
}

/// Page information. Any of these may carry commas or embedded letters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    #[serde(rename = "firstPage")]
    pub first_page: Option<String>,
    #[serde(rename = "lastPage")]
    pub last_page: Option<String>,
    #[serde(rename = "electronicID")]
    pub electronic_id: Option<String>,
    #[serde(rename = "pageRange")]
    pub page_range: Option<String>,
}

/// Accepts a JSON string, an integer, or null for fields that upstream
/// sources emit inconsistently (`"2020"` vs `2020`).
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Str(s) => s,
        Text::Int(i) => i.to_string(),
        Text::Float(f) => f.to_string(),
    }))
}
