use std::fmt;

use serde::{Serialize, Serializer};

/// Priority tag on a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    P0,
    P1,
    P2,
    /// `#N` reference to a GitHub issue (JSON task lists only)
    Issue(u64),
}

impl Priority {
    /// Parse `P0`, `P1` or `P2`
    pub fn from_tag(s: &str) -> Option<Priority> {
        match s {
            "P0" => Some(Priority::P0),
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            _ => None,
        }
    }

    /// Sort rank; lower sorts first. Issue tags rank with untagged items.
    pub fn rank(self) -> u8 {
        match self {
            Priority::P0 => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::Issue(_) => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::P0 => f.write_str("P0"),
            Priority::P1 => f.write_str("P1"),
            Priority::P2 => f.write_str("P2"),
            Priority::Issue(n) => write!(f, "#{}", n),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One line of the daily todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub done: bool,
    /// `HH:MM` or `H:MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>, done: bool) -> Self {
        ChecklistItem {
            id: id.into(),
            text: text.into(),
            done,
            time: None,
            priority: None,
        }
    }
}
