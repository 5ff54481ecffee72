use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category a changed path is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    /// Added to version control
    New,
    /// Modified and staged (git) or modified (svn)
    Modified,
    /// Scheduled for deletion
    Removed,
    /// Renamed (git only)
    Moved,
    /// Not under version control
    Untracked,
    /// Versioned but gone from disk (svn only)
    Missing,
    /// Has unresolved conflicts (svn only)
    Conflicted,
    /// Deleted and re-added (svn only)
    Replaced,
    /// Versioned as one node kind, found as another (svn only)
    Obstructed,
    /// Modified in the working tree but not staged (git only)
    Changed,
}

impl ChangeCategory {
    /// All categories, in report order
    pub const ALL: [ChangeCategory; 10] = [
        ChangeCategory::New,
        ChangeCategory::Modified,
        ChangeCategory::Removed,
        ChangeCategory::Moved,
        ChangeCategory::Untracked,
        ChangeCategory::Missing,
        ChangeCategory::Conflicted,
        ChangeCategory::Replaced,
        ChangeCategory::Obstructed,
        ChangeCategory::Changed,
    ];

    /// Lowercase label used in rendered output
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::New => "new",
            ChangeCategory::Modified => "modified",
            ChangeCategory::Removed => "removed",
            ChangeCategory::Moved => "moved",
            ChangeCategory::Untracked => "untracked",
            ChangeCategory::Missing => "missing",
            ChangeCategory::Conflicted => "conflicted",
            ChangeCategory::Replaced => "replaced",
            ChangeCategory::Obstructed => "obstructed",
            ChangeCategory::Changed => "changed",
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single affected path
///
/// Serialized untagged: a path is a plain string and a move is a
/// `[old, new]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusEntry {
    /// A path relative to the status command's output
    Path(String),
    /// A rename, old path first
    Moved(String, String),
}

impl StatusEntry {
    /// Build a plain path entry
    pub fn path(path: impl Into<String>) -> Self {
        StatusEntry::Path(path.into())
    }

    /// Build a rename entry
    pub fn moved(from: impl Into<String>, to: impl Into<String>) -> Self {
        StatusEntry::Moved(from.into(), to.into())
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEntry::Path(path) => f.write_str(path),
            StatusEntry::Moved(from, to) => write!(f, "{} -> {}", from, to),
        }
    }
}

/// A status line whose flag matched no known category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrecognizedLine {
    pub flag: String,
    pub line: String,
}

/// Changed paths of a working copy, grouped by category
///
/// Built fresh by every status call. Lines with unknown flags are kept apart
/// from the categories so they can never be mistaken for a known change, but
/// they still make the report non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(flatten)]
    entries: BTreeMap<ChangeCategory, Vec<StatusEntry>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unrecognized: Vec<UnrecognizedLine>,
}

impl StatusReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a category, preserving output order
    pub fn push(&mut self, category: ChangeCategory, entry: StatusEntry) {
        self.entries.entry(category).or_default().push(entry);
    }

    /// Record a line that could not be classified
    pub fn push_unrecognized(&mut self, flag: impl Into<String>, line: impl Into<String>) {
        self.unrecognized.push(UnrecognizedLine {
            flag: flag.into(),
            line: line.into(),
        });
    }

    /// Entries filed under `category`, empty if none
    pub fn get(&self, category: ChangeCategory) -> &[StatusEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories with at least one entry, with their entries
    pub fn iter(&self) -> impl Iterator<Item = (ChangeCategory, &[StatusEntry])> {
        self.entries
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
    }

    pub fn unrecognized(&self) -> &[UnrecognizedLine] {
        &self.unrecognized
    }

    /// Total number of classified entries
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True when nothing changed and no line went unrecognized
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.unrecognized.is_empty()
    }
}
