//! Field extractors.
//!
//! Each extractor reads one logical field from a [`BibliographicRecord`] and
//! knows nothing about publishers. Only the year is an error when missing; the
//! rest return `None` and the encoder fills the slot.

use crate::record::BibliographicRecord;
use crate::utils::Transliterator;
use crate::{BibcodeError, Result};

/// The publication year, as written in the record.
///
/// # Errors
///
/// Returns `BibcodeError::NoPubYear` if the year is missing or blank.
pub fn pub_year(record: &BibliographicRecord) -> Result<&str> {
    record
        .publication
        .as_ref()
        .and_then(|publication| publication.pub_year.as_deref())
        .filter(|year| !year.is_empty())
        .ok_or(BibcodeError::NoPubYear)
}

/// The volume, or the start of a `first-last` volume range.
pub fn volume(record: &BibliographicRecord) -> Option<String> {
    let volume = record.publication.as_ref()?.volume_num.as_deref()?;
    if volume.contains('-') {
        volume.trim().split('-').next().map(str::to_string)
    } else {
        Some(volume.to_string())
    }
}

/// The issue number, as written.
///
/// A blank issue is kept: it still replaces the volume for journals that
/// encode the issue there, but gives no qualifier.
pub fn issue(record: &BibliographicRecord) -> Option<String> {
    record.publication.as_ref()?.issue_num.clone()
}

/// First letter of the first author's surname, as uppercase ASCII.
///
/// `None` when there are no authors, the surname is blank, or its first
/// character has no ASCII rendering.
///
/// A character that transliterates to several letters (`Æ` to `AE`, `ﬁ` to
/// `FI`) contributes only the first one, so the author slot is always one
/// character wide and the record is still encoded.
pub fn author_initial(
    record: &BibliographicRecord,
    transliterator: &dyn Transliterator,
) -> Option<char> {
    let first = record.first_surname()?.trim().chars().next()?;
    let ascii = transliterator.to_ascii_upper(first.encode_utf8(&mut [0; 4]))?;
    ascii
        .chars()
        .next()
        .filter(char::is_ascii_graphic)
        .map(|c| c.to_ascii_uppercase())
}

/// The page to encode: first page, else electronic ID, else page range, with
/// thousands separators removed.
pub fn raw_page(record: &BibliographicRecord) -> Option<String> {
    let pagination = record.pagination.as_ref()?;
    [
        &pagination.first_page,
        &pagination.electronic_id,
        &pagination.page_range,
    ]
    .into_iter()
    .flatten()
    .find(|page| !page.is_empty())
    .map(|page| page.replace(',', ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Author, Pagination, Publication};
    use crate::utils::AsciiTransliterator;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn with_publication(publication: Publication) -> BibliographicRecord {
        BibliographicRecord {
            publication: Some(publication),
            ..Default::default()
        }
    }

    fn with_pagination(pagination: Pagination) -> BibliographicRecord {
        BibliographicRecord {
            pagination: Some(pagination),
            ..Default::default()
        }
    }

    fn with_surname(surname: &str) -> BibliographicRecord {
        BibliographicRecord {
            authors: vec![Author::with_surname(surname), Author::with_surname("Zed")],
            ..Default::default()
        }
    }

    #[test]
    fn test_pub_year() {
        let record = with_publication(Publication {
            pub_year: Some("2020".to_string()),
            ..Default::default()
        });
        assert_eq!(pub_year(&record).unwrap(), "2020");
    }

    #[rstest]
    #[case(BibliographicRecord::default())]
    #[case(with_publication(Publication::default()))]
    #[case(with_publication(Publication { pub_year: Some(String::new()), ..Default::default() }))]
    fn test_pub_year_missing(#[case] record: BibliographicRecord) {
        assert_eq!(pub_year(&record), Err(BibcodeError::NoPubYear));
    }

    #[rstest]
    #[case(Some("900"), Some("900"))]
    #[case(Some("12-15"), Some("12"))]
    #[case(Some(" 7-8 "), Some("7"))]
    #[case(Some(""), Some(""))]
    #[case(None, None)]
    fn test_volume(#[case] volume_num: Option<&str>, #[case] expected: Option<&str>) {
        let record = with_publication(Publication {
            volume_num: volume_num.map(str::to_string),
            ..Default::default()
        });
        assert_eq!(volume(&record).as_deref(), expected);
    }

    #[rstest]
    #[case(Some("5"), Some("5"))]
    #[case(Some(""), Some(""))]
    #[case(None, None)]
    fn test_issue(#[case] issue_num: Option<&str>, #[case] expected: Option<&str>) {
        let record = with_publication(Publication {
            issue_num: issue_num.map(str::to_string),
            ..Default::default()
        });
        assert_eq!(issue(&record).as_deref(), expected);
    }

    #[rstest]
    #[case("Smith", Some('S'))]
    #[case("  van der Berg", Some('V'))]
    #[case("Érdi", Some('E'))]
    #[case("Øberg", Some('O'))]
    #[case("Ødegaard", Some('O'))]
    #[case("Łukasz", Some('L'))]
    #[case("Æbelø", Some('A'))]
    #[case("Ðorđević", Some('D'))]
    #[case("-Smith", None)]
    #[case("", None)]
    #[case("   ", None)]
    fn test_author_initial(#[case] surname: &str, #[case] expected: Option<char>) {
        let record = with_surname(surname);
        assert_eq!(author_initial(&record, &AsciiTransliterator), expected);
    }

    #[test]
    fn test_author_initial_without_authors() {
        let record = BibliographicRecord::default();
        assert_eq!(author_initial(&record, &AsciiTransliterator), None);
    }

    #[test]
    fn test_author_initial_keeps_first_of_ligature() {
        let record = with_surname("ﬁnch");
        assert_eq!(author_initial(&record, &AsciiTransliterator), Some('F'));
    }

    #[rstest]
    #[case(Some("45"), Some("e001"), None, Some("45"))]
    #[case(None, Some("e001"), Some("1-10"), Some("e001"))]
    #[case(Some(""), None, Some("1-10"), Some("1-10"))]
    #[case(Some("1,024"), None, None, Some("1024"))]
    #[case(None, None, None, None)]
    fn test_raw_page(
        #[case] first_page: Option<&str>,
        #[case] electronic_id: Option<&str>,
        #[case] page_range: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let record = with_pagination(Pagination {
            first_page: first_page.map(str::to_string),
            electronic_id: electronic_id.map(str::to_string),
            page_range: page_range.map(str::to_string),
            last_page: None,
        });
        assert_eq!(raw_page(&record).as_deref(), expected);
    }

    #[test]
    fn test_raw_page_without_pagination() {
        assert_eq!(raw_page(&BibliographicRecord::default()), None);
    }
}
