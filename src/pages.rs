//! Page compression.
//!
//! A bibcode has four or five characters for the page. Publishers disagree on
//! how to squeeze their page numbers into that space, so two strategies exist:
//!
//! - [`PageStrategy::Normal`] keeps the last five digits.
//! - [`PageStrategy::Converted`] folds the leading two digits of a six digit
//!   article number into a single letter (`01` → `a`, `27` → `A`).
//!
//! Both start by pulling a classifying letter (Letter, Part, Supplement, ...)
//! out of the page, see [`strip_page_letter`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::{last_chars, right_justify};

/// Classifying letters, in the order they are tested, and whether the lowercase
/// form counts too. `A`, `C` and `E` are case-sensitive.
const PAGE_LETTERS: [(char, bool); 6] = [
    ('L', true),
    ('P', true),
    ('S', true),
    ('A', false),
    ('C', false),
    ('E', false),
];

/// Symbols for ordinals 1 through 52.
const ORDINAL_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A page squeezed for the page slot, plus the letter destined for the
/// qualifier slot, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPage {
    pub page: String,
    pub letter: Option<char>,
}

/// How a publisher's page numbers are compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStrategy {
    /// Keep the last five digits (four when a letter was found).
    #[default]
    Normal,
    /// Fold six digit article numbers into letter + four digits.
    Converted,
}

impl PageStrategy {
    /// Compresses a raw page. `None` means the page could not be encoded.
    pub fn compress(self, raw_page: &str) -> Option<CompressedPage> {
        match self {
            PageStrategy::Normal => Some(normal_page(raw_page)),
            PageStrategy::Converted => converted_page(raw_page),
        }
    }
}

/// Finds the first classifying letter present in `page` and removes every
/// occurrence of it.
///
/// Letters are tested in the order `L, P, S, A, C, E`. Only the first match is
/// stripped; `"L123P"` gives `("123P", Some('L'))`.
pub fn strip_page_letter(page: &str) -> (String, Option<char>) {
    for (letter, any_case) in PAGE_LETTERS {
        let lower = letter.to_ascii_lowercase();
        let matches = |c: char| c == letter || (any_case && c == lower);
        if page.contains(matches) {
            return (page.replace(matches, ""), Some(letter));
        }
    }
    (page.to_string(), None)
}

/// Maps an ordinal in `1..=52` onto `a..z` then `A..Z`.
pub fn ordinal_letter(ordinal: &str) -> Option<char> {
    let n: usize = ordinal.trim().parse().ok()?;
    n.checked_sub(1)
        .and_then(|idx| ORDINAL_ALPHABET.chars().nth(idx))
}

/// Like [`ordinal_letter`], but total: anything outside `1..=52`, or not a
/// number at all, comes back unchanged.
///
/// ```
/// use bibcode_encoder::pages::ordinal_to_letter;
///
/// assert_eq!(ordinal_to_letter("3"), "c");
/// assert_eq!(ordinal_to_letter("52"), "Z");
/// assert_eq!(ordinal_to_letter("53"), "53");
/// ```
pub fn ordinal_to_letter(ordinal: &str) -> String {
    match ordinal_letter(ordinal) {
        Some(letter) => letter.to_string(),
        None => ordinal.to_string(),
    }
}

/// Normal compression: last five characters of long pages, dot-padded to four
/// otherwise, and cut to four when a classifying letter was found.
pub fn normal_page(raw_page: &str) -> CompressedPage {
    let (page, letter) = strip_page_letter(raw_page);
    let page = if page.chars().count() >= 5 {
        last_chars(&page, 5).to_string()
    } else {
        right_justify(&page, 4)
    };
    let page = match letter {
        Some(_) => last_chars(&page, 4).to_string(),
        None => page,
    };
    CompressedPage { page, letter }
}

/// Converted compression for continuous article numbering.
///
/// Pages of six or more characters keep their last six; the first two of those
/// name a letter by ordinal and the remaining four are the page. A letter
/// already stripped from the page wins over the synthesized one.
///
/// Returns `None` when the two leading characters are not an ordinal in
/// `1..=52`. Nothing partial is returned in that case.
pub fn converted_page(raw_page: &str) -> Option<CompressedPage> {
    let (page, letter) = strip_page_letter(raw_page);
    if page.chars().count() < 6 {
        return Some(CompressedPage { page, letter });
    }

    let tail = last_chars(&page, 6);
    let split = tail.char_indices().nth(2).map_or(tail.len(), |(idx, _)| idx);
    let (prefix, rest) = tail.split_at(split);
    let Some(synthesized) = ordinal_letter(prefix) else {
        debug!(page = raw_page, prefix, "page prefix is not a letter ordinal");
        return None;
    };

    Some(CompressedPage {
        page: rest.to_string(),
        letter: letter.or(Some(synthesized)),
    })
}
