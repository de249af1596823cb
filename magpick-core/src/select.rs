//! Candidate link selection.
//!
//! A record usually carries several candidate links for the same release.
//! The selector scans them once, left to right, against an ordered rule
//! table. Accept rules pick a candidate outright; rank rules only remember
//! the best candidate seen so far. The first rule that matches a candidate
//! decides what happens to it; later rules are not consulted for that
//! candidate.
//!
//! | # | Rule             | Matches                                 | Action                      |
//! |---|------------------|-----------------------------------------|-----------------------------|
//! | 1 | `sht-subtitle`   | `7sht.me` and ends with `-C`/`-c`       | accept                      |
//! | 2 | `subtitle-tag`   | `_CAVI`, or ends with `-C`/`-c`         | accept if at most 2 `%`     |
//! | 3 | `c-r-suffix`     | last char `C` or `R`                    | accept if at most 2 `%`     |
//! | 4 | `host-44x`       | `44x.me`                                | rank 4, always overwrite    |
//! | 5 | `host-thz`       | `Thz.la` or `tha.la`                    | rank 3 if current rank < 3  |
//! | 6 | `full-hd`        | `FHD` or `fhd`                          | rank 2 if current rank < 2  |
//! | 7 | `hd`             | `HD` or `hd`                            | rank 1 if current rank < 1  |
//!
//! Rank rules only run in [`SelectMode::Full`]. With no accept and no rank
//! hit, full mode falls back to the first candidate while subtitle-only
//! mode returns nothing.

use std::fmt;

/// Highest number of `%`-separated pieces an accept rule tolerates.
pub const MAX_PERCENT_PIECES: usize = 3;

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Full cascade with rank rules and first-candidate fallback.
    #[default]
    Full,
    /// Accept rules only; no fallback.
    SubtitleOnly,
}

impl SelectMode {
    pub fn from_subtitle_only(subtitle_only: bool) -> Self {
        if subtitle_only {
            SelectMode::SubtitleOnly
        } else {
            SelectMode::Full
        }
    }

    fn allows_fallback(self) -> bool {
        matches!(self, SelectMode::Full)
    }
}

impl fmt::Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectMode::Full => f.write_str("full"),
            SelectMode::SubtitleOnly => f.write_str("subtitle-only"),
        }
    }
}

// ── Rule table ──────────────────────────────────────────────────────────────

/// What a matching rule does with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Return the candidate immediately, provided it splits into at most
    /// `max_percent_pieces` pieces on `%` (when set).
    Accept { max_percent_pieces: Option<usize> },
    /// Remember the candidate as the best so far with this rank.
    Rank { rank: u8, update: RankUpdate },
}

/// How a rank rule treats the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankUpdate {
    /// Overwrite regardless of the current rank.
    Always,
    /// Overwrite only when the current rank is lower.
    IfBelow,
}

/// A named predicate → action pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub action: Action,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

/// The cascade, in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "sht-subtitle",
        matches: is_sht_subtitle,
        action: Action::Accept {
            max_percent_pieces: None,
        },
    },
    Rule {
        name: "subtitle-tag",
        matches: is_subtitle_tagged,
        action: Action::Accept {
            max_percent_pieces: Some(MAX_PERCENT_PIECES),
        },
    },
    Rule {
        name: "c-r-suffix",
        matches: has_c_or_r_suffix,
        action: Action::Accept {
            max_percent_pieces: Some(MAX_PERCENT_PIECES),
        },
    },
    Rule {
        name: "host-44x",
        matches: is_44x_host,
        action: Action::Rank {
            rank: 4,
            update: RankUpdate::Always,
        },
    },
    Rule {
        name: "host-thz",
        matches: is_thz_host,
        action: Action::Rank {
            rank: 3,
            update: RankUpdate::IfBelow,
        },
    },
    Rule {
        name: "full-hd",
        matches: is_full_hd,
        action: Action::Rank {
            rank: 2,
            update: RankUpdate::IfBelow,
        },
    },
    Rule {
        name: "hd",
        matches: is_hd,
        action: Action::Rank {
            rank: 1,
            update: RankUpdate::IfBelow,
        },
    },
];

fn has_c_tag(s: &str) -> bool {
    s.ends_with("-C") || s.ends_with("-c")
}

fn is_sht_subtitle(s: &str) -> bool {
    s.contains("7sht.me") && has_c_tag(s)
}

fn is_subtitle_tagged(s: &str) -> bool {
    s.contains("_CAVI") || has_c_tag(s)
}

fn has_c_or_r_suffix(s: &str) -> bool {
    s.ends_with('C') || s.ends_with('R')
}

fn is_44x_host(s: &str) -> bool {
    s.contains("44x.me")
}

fn is_thz_host(s: &str) -> bool {
    s.contains("Thz.la") || s.contains("tha.la")
}

fn is_full_hd(s: &str) -> bool {
    s.contains("FHD") || s.contains("fhd")
}

fn is_hd(s: &str) -> bool {
    s.contains("HD") || s.contains("hd")
}

/// Number of pieces `link` splits into on `%`.
pub fn percent_pieces(link: &str) -> usize {
    link.matches('%').count() + 1
}

// ── Selection ───────────────────────────────────────────────────────────────

/// Why a candidate was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// An accept rule short-circuited the scan.
    Accepted(&'static str),
    /// A rank rule held the best rank when the scan ended.
    Ranked { rule: &'static str, rank: u8 },
    /// Nothing matched; the first candidate was used.
    FirstCandidate,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Accepted(rule) => write!(f, "accepted by {}", rule),
            Reason::Ranked { rule, rank } => write!(f, "ranked {} by {}", rank, rule),
            Reason::FirstCandidate => f.write_str("first candidate"),
        }
    }
}

/// The chosen candidate and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Position in the input list.
    pub index: usize,
    pub link: &'a str,
    pub reason: Reason,
}

/// Run the cascade and report which rule decided the outcome.
///
/// Returns `None` for an empty list, and in subtitle-only mode when no
/// accept rule fires.
pub fn select_with_reason<S: AsRef<str>>(links: &[S], mode: SelectMode) -> Option<Selection<'_>> {
    let first = links.first()?;
    let mut best = Selection {
        index: 0,
        link: first.as_ref(),
        reason: Reason::FirstCandidate,
    };
    let mut best_rank = 0u8;

    for (index, link) in links.iter().enumerate() {
        let link = link.as_ref();
        let Some(rule) = RULES.iter().find(|rule| (rule.matches)(link)) else {
            continue;
        };

        match rule.action {
            Action::Accept { max_percent_pieces } => {
                if max_percent_pieces.is_none_or(|max| percent_pieces(link) <= max) {
                    return Some(Selection {
                        index,
                        link,
                        reason: Reason::Accepted(rule.name),
                    });
                }
            }
            Action::Rank { rank, update } => {
                if !mode.allows_fallback() {
                    continue;
                }
                if update == RankUpdate::Always || best_rank < rank {
                    best = Selection {
                        index,
                        link,
                        reason: Reason::Ranked {
                            rule: rule.name,
                            rank,
                        },
                    };
                    best_rank = rank;
                }
            }
        }
    }

    mode.allows_fallback().then_some(best)
}

/// Pick one link according to `mode`.
pub fn select<S: AsRef<str>>(links: &[S], mode: SelectMode) -> Option<&str> {
    select_with_reason(links, mode).map(|s| s.link)
}

/// Full-mode selection: always yields a link for a non-empty list.
pub fn select_best<S: AsRef<str>>(links: &[S]) -> Option<&str> {
    select(links, SelectMode::Full)
}

/// Subtitle-only selection: yields a link only when an accept rule fires.
pub fn select_subtitle<S: AsRef<str>>(links: &[S]) -> Option<&str> {
    select(links, SelectMode::SubtitleOnly)
}

#[cfg(test)]
#[path = "tests/select_tests.rs"]
mod tests;
