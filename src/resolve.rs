//! ISSN to bibstem resolution.
//!
//! Resolution is delegated to a [`BibstemResolver`]. Any closure of the right
//! shape is one:
//!
//! ```
//! use bibcode_encoder::resolve::BibstemResolver;
//!
//! let resolver = |issn: &str| -> bibcode_encoder::Result<Option<String>> {
//!     Ok((issn == "0004-637X").then(|| "ApJ".to_string()))
//! };
//! assert_eq!(resolver.resolve("0004-637X").unwrap().as_deref(), Some("ApJ"));
//! ```
//!
//! With the `ads` feature, [`AdsJournalsResolver`] queries the ADS journals
//! service.

use itertools::Itertools;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::record::BibliographicRecord;
use crate::regex::Regex;
use crate::{BibcodeError, Result};

static BARE_ISSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{3}[\dXx])$").unwrap());

/// Maps a hyphenated ISSN (`NNNN-NNNN`) to a bibstem.
///
/// `Ok(None)` means the ISSN is unknown. `Err` is reserved for failures of the
/// lookup itself (transport, malformed response).
pub trait BibstemResolver: Send + Sync {
    fn resolve(&self, issn: &str) -> Result<Option<String>>;
}

impl<F> BibstemResolver for F
where
    F: Fn(&str) -> Result<Option<String>> + Send + Sync,
{
    fn resolve(&self, issn: &str) -> Result<Option<String>> {
        self(issn)
    }
}

/// Inserts the hyphen into a bare eight character ISSN.
///
/// Only the ISSN shape, seven digits and a final digit or `X`, is hyphenated.
/// Anything else, including other eight character strings, is returned trimmed
/// but otherwise as given.
pub fn normalize_issn(issn: &str) -> String {
    let issn = issn.trim();
    match BARE_ISSN_REGEX.captures(issn) {
        Some(captures) => format!("{}-{}", &captures[1], &captures[2]),
        None => issn.to_string(),
    }
}

/// The record's ISSNs in order, normalized, without blanks or repeats.
pub fn record_issns(record: &BibliographicRecord) -> Vec<String> {
    record
        .publication
        .iter()
        .flat_map(|publication| &publication.issn)
        .filter_map(|issn| issn.issn_string.as_deref())
        .filter(|issn| !issn.trim().is_empty())
        .map(normalize_issn)
        .unique()
        .collect()
}

/// Tries each of the record's ISSNs in turn and returns the first bibstem found.
///
/// A resolver error ends the search.
///
/// # Errors
///
/// Returns `BibcodeError::BibstemNotFound` when the record has no ISSNs, none
/// of them resolve, or the resolver fails.
pub fn resolve_bibstem(
    resolver: &dyn BibstemResolver,
    record: &BibliographicRecord,
) -> Result<String> {
    for issn in record_issns(record) {
        match resolver.resolve(&issn) {
            Ok(Some(bibstem)) if !bibstem.is_empty() => {
                debug!(issn, bibstem, "resolved bibstem");
                return Ok(bibstem);
            }
            Ok(_) => debug!(issn, "no bibstem for ISSN"),
            Err(err) => {
                warn!(issn, error = %err, "bibstem lookup failed");
                return Err(BibcodeError::BibstemNotFound);
            }
        }
    }
    Err(BibcodeError::BibstemNotFound)
}

#[cfg(feature = "ads")]
pub use ads::AdsJournalsResolver;

#[cfg(feature = "ads")]
mod ads {
    use reqwest::StatusCode;
    use reqwest::blocking::Client;
    use serde::Deserialize;
    use std::time::Duration;

    use super::BibstemResolver;
    use crate::{BibcodeError, Result};

    #[derive(Debug, Deserialize)]
    struct IssnResponse {
        issn: Option<IssnSummary>,
    }

    #[derive(Debug, Deserialize)]
    struct IssnSummary {
        bibstem: Option<String>,
    }

    /// Looks ISSNs up with `GET {url}/journals/issn/{issn}` on the ADS API.
    #[derive(Debug, Clone)]
    pub struct AdsJournalsResolver {
        client: Client,
        token: String,
        url: String,
    }

    impl AdsJournalsResolver {
        /// Creates a resolver for the API at `url`, authenticating with `token`.
        ///
        /// # Errors
        ///
        /// Returns `BibcodeError::Resolver` if the HTTP client cannot be built.
        pub fn new(token: &str, url: &str, timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| BibcodeError::Resolver(e.to_string()))?;
            Ok(Self::with_client(client, token, url))
        }

        fn with_client(client: Client, token: &str, url: &str) -> Self {
            Self {
                client,
                token: token.to_string(),
                url: url.trim_end_matches('/').to_string(),
            }
        }
    }

    impl BibstemResolver for AdsJournalsResolver {
        fn resolve(&self, issn: &str) -> Result<Option<String>> {
            let response = self
                .client
                .get(format!("{}/journals/issn/{issn}", self.url))
                .bearer_auth(&self.token)
                .send()
                .map_err(|e| BibcodeError::Resolver(e.to_string()))?;

            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let response = response
                .error_for_status()
                .map_err(|e| BibcodeError::Resolver(e.to_string()))?;
            let body: IssnResponse = response
                .json()
                .map_err(|e| BibcodeError::Resolver(e.to_string()))?;

            Ok(body.issn.and_then(|summary| summary.bibstem))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use pretty_assertions::assert_eq;
        use rstest::*;
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;
        use std::thread::{self, JoinHandle};

        /// Answers a single request with `status` and `body`, returning the
        /// server URL and a handle yielding the request head.
        fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}/v1/", listener.local_addr().unwrap());
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let handle = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = String::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    head.push_str(&line);
                }
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
                head
            });
            (url, handle)
        }

        fn resolver(url: &str) -> AdsJournalsResolver {
            let client = Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap();
            AdsJournalsResolver::with_client(client, "secret", url)
        }

        #[rstest]
        #[case("200 OK", r#"{"issn": {"bibstem": "ApJ"}}"#, Some("ApJ"))]
        #[case("200 OK", r#"{"issn": {"bibstem": null}}"#, None)]
        #[case("200 OK", r#"{"issn": null}"#, None)]
        #[case("404 Not Found", r#"{"error": "no journal"}"#, None)]
        fn test_resolve(
            #[case] status: &str,
            #[case] body: &str,
            #[case] expected: Option<&str>,
        ) {
            let (url, server) = serve_once(status, body);
            let bibstem = resolver(&url).resolve("0004-637X").unwrap();
            assert_eq!(bibstem.as_deref(), expected);

            let head = server.join().unwrap();
            assert!(head.starts_with("GET /v1/journals/issn/0004-637X HTTP/1.1\r\n"));
            assert!(head.to_ascii_lowercase().contains("authorization: bearer secret\r\n"));
        }

        #[rstest]
        #[case("500 Internal Server Error", r#"{"error": "down"}"#)]
        #[case("401 Unauthorized", r#"{"error": "bad token"}"#)]
        #[case("200 OK", "not json")]
        fn test_resolve_failure(#[case] status: &str, #[case] body: &str) {
            let (url, server) = serve_once(status, body);
            let result = resolver(&url).resolve("0004-637X");
            assert!(matches!(result, Err(BibcodeError::Resolver(_))));
            server.join().unwrap();
        }

        #[test]
        fn test_new_trims_trailing_slash() {
            let timeout = Duration::from_secs(1);
            let resolver =
                AdsJournalsResolver::new("token", "https://api.example.org/v1/", timeout).unwrap();
            assert_eq!(resolver.url, "https://api.example.org/v1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Issn, Publication};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::sync::Mutex;

    fn record_with_issns(issns: &[&str]) -> BibliographicRecord {
        BibliographicRecord {
            publication: Some(Publication {
                issn: issns.iter().map(|issn| Issn::new(issn)).collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("0004637X", "0004-637X")]
    #[case("00046361", "0004-6361")]
    #[case(" 00358711 ", "0035-8711")]
    #[case("0004-637X", "0004-637X")]
    #[case("1234", "1234")]
    #[case("ABCDEFGH", "ABCDEFGH")]
    fn test_normalize_issn(#[case] issn: &str, #[case] expected: &str) {
        assert_eq!(normalize_issn(issn), expected);
    }

    #[test]
    fn test_record_issns_dedupes_and_skips_blanks() {
        let record = record_with_issns(&["00046361", "", "0004-6361", "1432-0746"]);
        assert_eq!(record_issns(&record), vec!["0004-6361", "1432-0746"]);
    }

    #[test]
    fn test_resolve_short_circuits_in_order() {
        let calls = Mutex::new(Vec::new());
        let resolver = |issn: &str| -> Result<Option<String>> {
            calls.lock().unwrap().push(issn.to_string());
            Ok(match issn {
                "1111-1111" => None,
                "2222-2222" => Some("MNRAS".to_string()),
                _ => Some("Wrong".to_string()),
            })
        };

        let record = record_with_issns(&["11111111", "2222-2222", "3333-3333"]);
        assert_eq!(resolve_bibstem(&resolver, &record).unwrap(), "MNRAS");
        assert_eq!(*calls.lock().unwrap(), vec!["1111-1111", "2222-2222"]);
    }

    #[test]
    fn test_resolve_error_is_unresolved() {
        let resolver = |issn: &str| -> Result<Option<String>> {
            match issn {
                "1111-1111" => Err(BibcodeError::Resolver("timeout".to_string())),
                _ => Ok(Some("ApJ".to_string())),
            }
        };
        let record = record_with_issns(&["1111-1111", "2222-2222"]);
        assert!(matches!(
            resolve_bibstem(&resolver, &record),
            Err(BibcodeError::BibstemNotFound)
        ));
    }

    #[test]
    fn test_resolve_without_issns() {
        let resolver = |_: &str| -> Result<Option<String>> { Ok(Some("ApJ".to_string())) };
        assert!(matches!(
            resolve_bibstem(&resolver, &BibliographicRecord::default()),
            Err(BibcodeError::BibstemNotFound)
        ));
    }
}
