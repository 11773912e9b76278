//! Built-in publisher classification.
//!
//! Bibstems are listed already padded to five characters, exactly as they
//! appear in a bibcode.

pub(crate) const IOP_BIBSTEMS: &[&str] = &[
    "ApJ..", "ApJL.", "ApJS.", "AJ...", "PASP.", "JCAP.", "PSJ..", "RNAAS", "RAA..", "CQGra",
    "JPhA.", "JPhB.", "JPhCS", "JPhD.", "JPhG.", "NJPh.", "PhyS.", "Nanot", "SuScT", "NucFu",
    "PPCF.", "JInst", "JSMTE", "Nonli", "InvPr", "EJPh.", "ERL..", "Metro", "MSMSE", "SMaS.",
    "CoTPh", "ChPhB", "ChPhL", "PhyU.", "LaPhL",
];

pub(crate) const APS_BIBSTEMS: &[&str] = &[
    "PhRvA", "PhRvB", "PhRvC", "PhRvD", "PhRvE", "PhRvF", "PhRvL", "PhRvM", "PhRvP", "PhRvR",
    "PhRvS", "PhRvX", "PRXQ.", "PRXE.", "RvMP.",
];

pub(crate) const OUP_BIBSTEMS: &[&str] = &[
    "MNRAS", "GeoJI", "PASJ.", "PTEP.", "PThPh", "PThPS", "A&G..",
];

pub(crate) const AIP_BIBSTEMS: &[&str] = &[
    "AIPC.", "JChPh", "JAP..", "ApPhL", "PhPl.", "JMP..", "RScI.", "Chaos", "PhFl.", "LTP..",
    "AIPA.", "JRSE.", "APLM.", "APLP.",
];

pub(crate) const SPRINGER_BIBSTEMS: &[&str] = &[
    "JHEP.", "EPJC.", "EPJA.", "EPJB.", "EPJD.", "EPJE.", "EPJP.", "EPJST", "Ap&SS", "SoPh.",
    "CeMDA", "SSRv.", "EM&P.", "A&ARv", "ExA..", "GReGr", "FoPh.", "IJTP.", "LMaPh", "CMaPh",
    "JSP..", "AstL.", "ARep.", "Ap...", "KPCB.", "SoSyR",
];

/// JCAP and JHEP bibcodes carry the monthly issue in the volume slot.
pub(crate) const VOLUME_FROM_ISSUE: &[&str] = &["JCAP.", "JHEP."];

/// ApJ Letters share the ApJ bibstem with an `L` qualifier.
pub(crate) const RENAMED: &[(&str, &str, &str)] = &[("ApJL.", "ApJ..", "L")];

/// AIP conference proceedings have no meaningful issue number.
pub(crate) const PAGE_LETTER_ONLY: &[&str] = &["AIPC."];
