//! Reply action classification.
//!
//! A reply that quotes a pending draft is reduced to one of four actions by
//! case-insensitive substring matching. Keyword sets are checked in a fixed
//! priority order (save, cancel, edit) and the first hit wins, so a reply such
//! as "save, no need to edit" is a save.

use serde::Serialize;
use std::fmt;

const SAVE_KEYWORDS: &[&str] = &["save", "simpan"];
const CANCEL_KEYWORDS: &[&str] = &["cancel", "batal"];
const EDIT_KEYWORDS: &[&str] = &["edit", "ubah"];

/// What the user wants done with a pending draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyAction {
    Save,
    Edit,
    Cancel,
    Unknown,
}

impl ReplyAction {
    /// Classifies reply text. Pure and total.
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let hits = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

        if hits(SAVE_KEYWORDS) {
            ReplyAction::Save
        } else if hits(CANCEL_KEYWORDS) {
            ReplyAction::Cancel
        } else if hits(EDIT_KEYWORDS) {
            ReplyAction::Edit
        } else {
            ReplyAction::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyAction::Save => "save",
            ReplyAction::Edit => "edit",
            ReplyAction::Cancel => "cancel",
            ReplyAction::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
