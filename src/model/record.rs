use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow position of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Backlog,
    InProgress,
    Done,
}

impl Stage {
    /// Board column order
    pub const ALL: [Stage; 3] = [Stage::Backlog, Stage::InProgress, Stage::Done];

    /// The name used in JSON sources and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Backlog => "backlog",
            Stage::InProgress => "in_progress",
            Stage::Done => "done",
        }
    }

    /// Column heading for text output
    pub fn label(self) -> &'static str {
        match self {
            Stage::Backlog => "Backlog",
            Stage::InProgress => "In Progress",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Stage::Backlog),
            "in_progress" | "in-progress" => Ok(Stage::InProgress),
            "done" => Ok(Stage::Done),
            _ => Err(format!(
                "unknown stage '{}' (expected: backlog, in_progress, done)",
                s
            )),
        }
    }
}

/// What kind of work a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Idea,
    Research,
    Build,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Idea => "idea",
            Classification::Research => "research",
            Classification::Build => "build",
        }
    }

    /// Single-character marker used in compact views (calendar cells)
    pub fn marker(self) -> char {
        match self {
            Classification::Idea => '*',
            Classification::Research => '?',
            Classification::Build => '+',
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(Classification::Idea),
            "research" => Ok(Classification::Research),
            "build" => Ok(Classification::Build),
            _ => Err(format!(
                "unknown type '{}' (expected: idea, research, build)",
                s
            )),
        }
    }
}

/// Synthetic per-load identifier. Assigned in parse order; not stable
/// across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link to an entry in an external issue tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    pub issue: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

/// A single kanban card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: RecordId,
    /// Never empty
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub classification: Classification,
    pub stage: Stage,
    /// The date the record was logged
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub occurred_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<ExternalRef>,
}

impl TaskRecord {
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        classification: Classification,
        stage: Stage,
    ) -> Self {
        TaskRecord {
            id,
            title: title.into(),
            description: None,
            classification,
            stage,
            occurred_on: None,
            external_ref: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }
}

// Identity is per-load only, so equality ignores `id`.
impl PartialEq for TaskRecord {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.classification == other.classification
            && self.stage == other.stage
            && self.occurred_on == other.occurred_on
            && self.external_ref == other.external_ref
    }
}

impl Eq for TaskRecord {}
