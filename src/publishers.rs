//! Publisher classification and per-publisher encoding policies.
//!
//! Each bibstem belongs to at most one [`PublisherGroup`]. The group decides how
//! pages are compressed and where the issue qualifier comes from; individual
//! bibstems may override that with their own [`Policy`]. Unlisted bibstems get
//! the default policy.
//!
//! The classification is data. The built-in table is [`PublisherTable::default`];
//! a replacement can be loaded from JSON:
//!
//! ```
//! use bibcode_encoder::publishers::{PublisherGroup, PublisherTable};
//! use bibcode_encoder::pages::PageStrategy;
//!
//! let table = PublisherTable::from_json(r#"[
//!     {
//!         "group": "iop",
//!         "policy": {"pages": "converted"},
//!         "bibstems": ["ApJ", "ApJL"],
//!         "special": {"ApJL": {"pages": "converted", "rename": "ApJ", "issue": {"fixed": "L"}}}
//!     }
//! ]"#).unwrap();
//!
//! assert_eq!(table.group_of("ApJ.."), PublisherGroup::Iop);
//! assert_eq!(table.policy_for("ApJ..").pages, PageStrategy::Converted);
//! assert_eq!(table.group_of("A&A.."), PublisherGroup::Generic);
//! ```

mod data;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pages::PageStrategy;
use crate::utils::left_justify;
use crate::{BibcodeError, Result};

/// Width of the bibstem slot.
pub const BIBSTEM_WIDTH: usize = 5;

/// Families of publishers sharing a page-handling convention.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherGroup {
    /// IOP Publishing and the AAS journals it hosts.
    Iop,
    /// American Physical Society.
    Aps,
    /// Oxford University Press.
    Oup,
    /// AIP Publishing.
    Aip,
    /// Springer Nature.
    Springer,
    /// Anything not classified.
    #[default]
    Generic,
}

/// Where the single-character qualifier between volume and page comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueRule {
    /// A letter found in (or synthesized from) the page.
    #[default]
    PageLetter,
    /// The record's issue number mapped through the ordinal alphabet. Page
    /// letters are ignored.
    IssueOrdinal,
    /// Always this qualifier.
    Fixed(CompactString),
}

/// What fills the volume slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeRule {
    #[default]
    Volume,
    /// The issue number, when the record has one. The issue is then consumed and
    /// does not become a qualifier.
    Issue,
}

/// Everything that varies between publishers when building a bibcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub pages: PageStrategy,
    pub issue: IssueRule,
    pub volume: VolumeRule,
    /// Bibstem written into the bibcode instead of the resolved one.
    pub rename: Option<CompactString>,
}

impl Policy {
    pub fn new(pages: PageStrategy) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_issue(mut self, issue: IssueRule) -> Self {
        self.issue = issue;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: VolumeRule) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn with_rename(mut self, bibstem: &str) -> Self {
        self.rename = Some(CompactString::from(bibstem));
        self
    }
}

/// One publisher group: its default policy, its members, and per-bibstem
/// exceptions. This is the unit of the JSON table format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRules {
    pub group: PublisherGroup,
    #[serde(default)]
    pub policy: Policy,
    pub bibstems: Vec<CompactString>,
    #[serde(default)]
    pub special: HashMap<CompactString, Policy>,
}

/// Lookup from bibstem to group and policy.
#[derive(Debug, Clone)]
pub struct PublisherTable {
    index: HashMap<CompactString, (PublisherGroup, Policy)>,
    fallback: Policy,
}

impl PublisherTable {
    /// Builds a table from group rules.
    ///
    /// Bibstems are padded to five characters, so `"ApJ"` and `"ApJ.."` name the
    /// same journal.
    ///
    /// # Errors
    ///
    /// Returns `BibcodeError::InvalidPublisherTable` if a bibstem is longer than
    /// five characters or listed twice, if a special case names a bibstem not in
    /// its group, or if a policy renames to an overlong bibstem or fixes a
    /// qualifier that is not exactly one character.
    pub fn from_groups(groups: Vec<GroupRules>) -> Result<Self> {
        let mut index = HashMap::new();
        for rules in groups {
            check_policy(&rules.policy)?;
            let mut special: HashMap<CompactString, Policy> = HashMap::new();
            for (bibstem, policy) in rules.special {
                check_policy(&policy)?;
                special.insert(pad_bibstem(&bibstem)?, policy);
            }

            for bibstem in &rules.bibstems {
                let key = pad_bibstem(bibstem)?;
                let policy = special
                    .remove(&key)
                    .unwrap_or_else(|| rules.policy.clone());
                if index.insert(key.clone(), (rules.group, policy)).is_some() {
                    return Err(BibcodeError::InvalidPublisherTable(format!(
                        "bibstem '{key}' is classified more than once"
                    )));
                }
            }

            if let Some(orphan) = special.keys().next() {
                return Err(BibcodeError::InvalidPublisherTable(format!(
                    "special case '{orphan}' is not a member of group {:?}",
                    rules.group
                )));
            }
        }

        Ok(Self {
            index,
            fallback: Policy::default(),
        })
    }

    /// Parses a JSON array of [`GroupRules`].
    ///
    /// # Errors
    ///
    /// Returns `BibcodeError::InvalidPublisherTable` for malformed JSON or any
    /// of the conditions listed on [`PublisherTable::from_groups`].
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<GroupRules> = serde_json::from_str(json)?;
        Self::from_groups(groups)
    }

    /// The group a padded bibstem belongs to.
    pub fn group_of(&self, bibstem: &str) -> PublisherGroup {
        self.index
            .get(bibstem)
            .map_or(PublisherGroup::Generic, |(group, _)| *group)
    }

    /// The policy for a padded bibstem.
    pub fn policy_for(&self, bibstem: &str) -> &Policy {
        self.index
            .get(bibstem)
            .map_or(&self.fallback, |(_, policy)| policy)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for PublisherTable {
    fn default() -> Self {
        let mut index = HashMap::new();
        for rules in builtin_groups() {
            for bibstem in rules.bibstems {
                let policy = rules
                    .special
                    .get(&bibstem)
                    .cloned()
                    .unwrap_or_else(|| rules.policy.clone());
                index.insert(bibstem, (rules.group, policy));
            }
        }
        Self {
            index,
            fallback: Policy::default(),
        }
    }
}

/// The built-in classification as group rules.
pub fn builtin_groups() -> Vec<GroupRules> {
    let converted = Policy::new(PageStrategy::Converted);
    let mut groups = vec![
        GroupRules {
            group: PublisherGroup::Iop,
            policy: converted.clone(),
            bibstems: members(data::IOP_BIBSTEMS),
            special: HashMap::new(),
        },
        GroupRules {
            group: PublisherGroup::Aps,
            policy: converted.clone(),
            bibstems: members(data::APS_BIBSTEMS),
            special: HashMap::new(),
        },
        GroupRules {
            group: PublisherGroup::Oup,
            policy: converted.clone(),
            bibstems: members(data::OUP_BIBSTEMS),
            special: HashMap::new(),
        },
        GroupRules {
            group: PublisherGroup::Aip,
            policy: converted.clone().with_issue(IssueRule::IssueOrdinal),
            bibstems: members(data::AIP_BIBSTEMS),
            special: HashMap::new(),
        },
        GroupRules {
            group: PublisherGroup::Springer,
            policy: Policy::new(PageStrategy::Normal),
            bibstems: members(data::SPRINGER_BIBSTEMS),
            special: HashMap::new(),
        },
    ];

    for rules in &mut groups {
        for &bibstem in data::VOLUME_FROM_ISSUE {
            if rules.bibstems.iter().any(|b| b.as_str() == bibstem) {
                let policy = rules.policy.clone().with_volume(VolumeRule::Issue);
                rules.special.insert(bibstem.into(), policy);
            }
        }
        for &(bibstem, renamed, qualifier) in data::RENAMED {
            if rules.bibstems.iter().any(|b| b.as_str() == bibstem) {
                let policy = rules
                    .policy
                    .clone()
                    .with_rename(renamed)
                    .with_issue(IssueRule::Fixed(qualifier.into()));
                rules.special.insert(bibstem.into(), policy);
            }
        }
        for &bibstem in data::PAGE_LETTER_ONLY {
            if rules.bibstems.iter().any(|b| b.as_str() == bibstem) {
                let policy = rules.policy.clone().with_issue(IssueRule::PageLetter);
                rules.special.insert(bibstem.into(), policy);
            }
        }
    }

    groups
}

fn members(bibstems: &[&str]) -> Vec<CompactString> {
    bibstems.iter().map(|&b| CompactString::from(b)).collect()
}

/// Pads a bibstem to the slot width, rejecting ones that do not fit.
fn pad_bibstem(bibstem: &str) -> Result<CompactString> {
    let padded = left_justify(bibstem.trim(), BIBSTEM_WIDTH);
    if bibstem.trim().is_empty() || padded.chars().count() != BIBSTEM_WIDTH {
        return Err(BibcodeError::InvalidPublisherTable(format!(
            "bibstem '{bibstem}' does not fit in {BIBSTEM_WIDTH} characters"
        )));
    }
    Ok(CompactString::from(padded))
}

fn check_policy(policy: &Policy) -> Result<()> {
    if let Some(rename) = &policy.rename {
        pad_bibstem(rename)?;
    }
    if let IssueRule::Fixed(qualifier) = &policy.issue {
        if qualifier.chars().count() != 1 {
            return Err(BibcodeError::InvalidPublisherTable(format!(
                "fixed qualifier '{qualifier}' must be a single character"
            )));
        }
    }
    Ok(())
}
