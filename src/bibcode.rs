//! The bibcode value type.
//!
//! A bibcode is 19 characters laid out as
//!
//! ```text
//! YYYYJJJJJVVVVMPPPPA
//! 2020ApJ...900..123S
//! ```
//!
//! year, bibstem, volume, qualifier + page, and first author initial, with
//! unused space filled by dots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BibcodeError;

/// Length of every bibcode.
pub const BIBCODE_LENGTH: usize = 19;

/// A bibcode of exactly [`BIBCODE_LENGTH`] ASCII characters.
///
/// ```
/// use bibcode_encoder::Bibcode;
///
/// let bibcode: Bibcode = "2020ApJ...900..123S".parse().unwrap();
/// assert_eq!(bibcode.year(), "2020");
/// assert_eq!(bibcode.bibstem(), "ApJ");
/// assert_eq!(bibcode.volume(), "900");
/// assert_eq!(bibcode.author_initial(), 'S');
/// assert!("2020ApJ".parse::<Bibcode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bibcode(String);

impl Bibcode {
    /// Wraps an assembled string, checking its length.
    ///
    /// # Errors
    ///
    /// Returns `BibcodeError::MalformedLength` if `bibcode` is not exactly 19
    /// characters, and `BibcodeError::InvalidBibcode` if it is not ASCII.
    pub fn new(bibcode: String) -> Result<Self, BibcodeError> {
        let length = bibcode.chars().count();
        if length != BIBCODE_LENGTH {
            return Err(BibcodeError::MalformedLength { bibcode, length });
        }
        if !bibcode.is_ascii() {
            return Err(BibcodeError::InvalidBibcode(format!(
                "'{bibcode}' contains non-ASCII characters"
            )));
        }
        Ok(Self(bibcode))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> &str {
        &self.0[0..4]
    }

    /// Bibstem without padding.
    pub fn bibstem(&self) -> &str {
        self.0[4..9].trim_end_matches('.')
    }

    /// Volume without padding.
    pub fn volume(&self) -> &str {
        self.0[9..13].trim_start_matches('.')
    }

    /// The five characters shared by the qualifier and the page.
    pub fn qualifier_and_page(&self) -> &str {
        &self.0[13..18]
    }

    pub fn author_initial(&self) -> char {
        char::from(self.0.as_bytes()[18])
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Bibcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Bibcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Bibcode {
    type Err = BibcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bibcode::new(s.trim().to_string()).map_err(|err| match err {
            BibcodeError::MalformedLength { bibcode, length } => BibcodeError::InvalidBibcode(
                format!("'{bibcode}' has {length} characters, expected {BIBCODE_LENGTH}"),
            ),
            other => other,
        })
    }
}

impl TryFrom<String> for Bibcode {
    type Error = BibcodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bibcode> for String {
    fn from(bibcode: Bibcode) -> Self {
        bibcode.0
    }
}

impl PartialEq<str> for Bibcode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Bibcode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("2020ApJ...900..123S", "2020", "ApJ", "900", "..123", 'S')]
    #[case("2021JCAP...05..012K", "2021", "JCAP", "05", "..012", 'K')]
    #[case("2019ApJ...871L..25A", "2019", "ApJ", "871", "L..25", 'A')]
    #[case("2018PhRvD..98d3511.", "2018", "PhRvD", "98", "d3511", '.')]
    fn test_slots(
        #[case] input: &str,
        #[case] year: &str,
        #[case] bibstem: &str,
        #[case] volume: &str,
        #[case] rest: &str,
        #[case] initial: char,
    ) {
        let bibcode: Bibcode = input.parse().unwrap();
        assert_eq!(bibcode.year(), year);
        assert_eq!(bibcode.bibstem(), bibstem);
        assert_eq!(bibcode.volume(), volume);
        assert_eq!(bibcode.qualifier_and_page(), rest);
        assert_eq!(bibcode.author_initial(), initial);
        assert_eq!(bibcode.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("2020ApJ...900..123")]
    #[case("2020ApJ...900..123SX")]
    #[case("2020ApJ...900..123É")]
    fn test_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Bibcode>(),
            Err(BibcodeError::InvalidBibcode(_))
        ));
    }

    #[test]
    fn test_new_reports_length() {
        let err = Bibcode::new("2020ApJ".to_string()).unwrap_err();
        assert!(matches!(
            err,
            BibcodeError::MalformedLength { length: 7, .. }
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let bibcode: Bibcode = "2020ApJ...900..123S".parse().unwrap();
        let json = serde_json::to_string(&bibcode).unwrap();
        assert_eq!(json, r#""2020ApJ...900..123S""#);
        let back: Bibcode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bibcode);
        assert!(serde_json::from_str::<Bibcode>(r#""short""#).is_err());
    }
}
