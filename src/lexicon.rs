//! Category lexicon and importance keyword sets.
//!
//! The lexicon is the classifier's entire rule table: each entry maps a
//! category name to a list of lowercase terms and a priority weight. It is
//! validated up front and injected; analysis never mutates it. Entry order
//! matters: when two categories score equally, the earlier entry wins.

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;
use crate::types::CATEGORY_OTHER;

/// Priority weights live on a 1..=10 scale, 10 being the most important.
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

// ── Category entry ──────────────────────────────────────────────────

/// One category: a name, its trigger terms, and a priority weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Unique category key, e.g. `Meeting_Ready_Lead`.
    pub name: String,
    /// Lowercase terms matched by substring containment.
    pub terms: Vec<String>,
    /// Weight 1..=10 applied per matched term.
    pub priority: u8,
}

impl CategoryEntry {
    pub fn new(name: impl Into<String>, terms: &[&str], priority: u8) -> Self {
        Self {
            name: name.into(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
            priority,
        }
    }

    /// How many of this entry's terms the (lowercased) text contains.
    ///
    /// Presence only: a term occurring five times counts once. Containment
    /// is plain substring search, so a term inside a longer word matches.
    pub fn match_count(&self, text: &str) -> usize {
        self.terms.iter().filter(|t| text.contains(t.as_str())).count()
    }
}

// ── Lexicon ─────────────────────────────────────────────────────────

/// Ordered, validated set of category entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    entries: Vec<CategoryEntry>,
}

impl Lexicon {
    /// Build a lexicon from entries, validating each.
    pub fn try_new(entries: Vec<CategoryEntry>) -> Result<Self, LexiconError> {
        let mut lexicon = Self::empty();
        for entry in entries {
            lexicon.add_entry(entry)?;
        }
        Ok(lexicon)
    }

    /// Create an empty lexicon (for tests and custom builds).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in lexicon: sales/meeting-oriented categories mirroring the
    /// keyword sets the scoring formula was tuned against.
    pub fn default_categories() -> Self {
        let entries = vec![
            CategoryEntry::new(
                "Meeting_Ready_Lead",
                &[
                    "meeting",
                    "schedule",
                    "call",
                    "discuss",
                    "appointment",
                    "availability",
                    "calendar",
                    "sync",
                    "connect",
                    "zoom",
                    "teams",
                    "meet",
                ],
                8,
            ),
            CategoryEntry::new(
                "Power",
                &[
                    "decision maker",
                    "ceo",
                    "chief",
                    "director",
                    "vp",
                    "vice president",
                    "head of",
                    "budget",
                    "authority",
                    "approve",
                    "leadership",
                ],
                9,
            ),
            CategoryEntry::new(
                "Interested",
                &[
                    "interested",
                    "tell me more",
                    "learn more",
                    "demo",
                    "pricing",
                    "consider",
                    "evaluation",
                    "trial",
                    "quote",
                    "proposal",
                ],
                7,
            ),
            CategoryEntry::new(
                "Obstacle",
                &[
                    "problem",
                    "issue",
                    "concern",
                    "challenge",
                    "difficult",
                    "obstacle",
                    "not working",
                    "error",
                    "bug",
                    "broken",
                    "failed",
                ],
                6,
            ),
            CategoryEntry::new(
                "Follow_Up",
                &[
                    "follow up",
                    "follow-up",
                    "following up",
                    "checking in",
                    "touching base",
                    "circling back",
                ],
                7,
            ),
            CategoryEntry::new(
                "Question",
                &[
                    "question",
                    "how do",
                    "can you",
                    "want to know",
                    "wondering",
                    "clarify",
                    "explain",
                    "what is",
                    "how is",
                    "help me understand",
                ],
                5,
            ),
            CategoryEntry::new(
                "Not_Interested",
                &[
                    "not interested",
                    "unsubscribe",
                    "remove",
                    "stop",
                    "no thanks",
                    "pass",
                    "decline",
                    "not now",
                    "not at this time",
                ],
                3,
            ),
            CategoryEntry::new(
                "OOO",
                &[
                    "out of office",
                    "vacation",
                    "holiday",
                    "leave",
                    "away",
                    "return on",
                    "back on",
                    "unavailable",
                    "absence",
                    "auto-reply",
                ],
                2,
            ),
            CategoryEntry::new(
                "Newsletter",
                &["newsletter", "weekly update", "monthly update", "bulletin"],
                2,
            ),
            CategoryEntry::new(
                "Spam",
                &[
                    "viagra",
                    "lottery",
                    "winner",
                    "inheritance",
                    "prince",
                    "bank transfer",
                    "urgent help",
                    "cryptocurrency",
                    "million dollars",
                ],
                1,
            ),
        ];

        Self::try_new(entries).expect("built-in lexicon is valid")
    }

    /// Add one entry, normalizing its terms.
    pub fn add_entry(&mut self, mut entry: CategoryEntry) -> Result<(), LexiconError> {
        if entry.name.trim().is_empty() {
            return Err(LexiconError::EmptyCategoryName);
        }
        if entry.name.eq_ignore_ascii_case(CATEGORY_OTHER) {
            return Err(LexiconError::ReservedCategoryName(entry.name));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&entry.priority) {
            return Err(LexiconError::PriorityOutOfRange {
                category: entry.name,
                priority: entry.priority,
            });
        }
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(LexiconError::DuplicateCategory(entry.name));
        }

        entry.terms = entry
            .terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if entry.terms.is_empty() {
            return Err(LexiconError::EmptyTermList(entry.name));
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Look up an entry by exact category name.
    pub fn entry(&self, name: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Category names in declaration order (used for delegate prompts).
    pub fn category_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::default_categories()
    }
}

// ── Importance keywords ─────────────────────────────────────────────

/// Keyword sets feeding the importance score, independent of categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceKeywords {
    /// Each match raises the score by 1.5.
    pub urgent: Vec<String>,
    /// Each match raises the score by 1.0.
    pub high_value: Vec<String>,
    /// Each match lowers the score by 1.0.
    pub low_priority: Vec<String>,
}

impl ImportanceKeywords {
    pub fn empty() -> Self {
        Self {
            urgent: Vec::new(),
            high_value: Vec::new(),
            low_priority: Vec::new(),
        }
    }
}

impl Default for ImportanceKeywords {
    fn default() -> Self {
        let lower = |terms: &[&str]| terms.iter().map(|t| t.to_lowercase()).collect();
        Self {
            urgent: lower(&[
                "urgent",
                "asap",
                "immediately",
                "emergency",
                "deadline",
                "critical",
                "important",
                "priority",
                "time-sensitive",
            ]),
            high_value: lower(&[
                "opportunity",
                "revenue",
                "partnership",
                "contract",
                "deal",
                "sign",
                "purchase",
                "decision",
                "agreement",
                "interested",
            ]),
            low_priority: lower(&[
                "newsletter",
                "subscription",
                "update",
                "notification",
                "fyi",
                "marketing",
                "announcement",
                "promotion",
                "offer",
            ]),
        }
    }
}
