//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record rendered by both status lists.
//! - Provide the textual forms used for element ids, headings and labels.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused for another project.
//! - Only `status` changes after creation, and only through the store's move
//!   operation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one project.
///
/// Travels as plain text on the drag transport.
pub type ProjectId = Uuid;

/// Which list a project is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Newly created, still being worked on.
    Active,
    /// Dropped onto the finished list.
    Finished,
}

impl ProjectStatus {
    /// Both statuses in list mount order.
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::Active, ProjectStatus::Finished];

    /// Stable lowercase form (`active|finished`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    /// Heading text rendered at the top of the list section.
    pub fn heading(self) -> String {
        format!("{} PROJECTS", self.as_str().to_ascii_uppercase())
    }

    /// Element id assigned to the list section, e.g. `active-projects`.
    pub fn section_element_id(self) -> String {
        format!("{}-projects", self.as_str())
    }

    /// Element id assigned to the inner `ul`, e.g. `active-projects-list`.
    pub fn list_element_id(self) -> String {
        format!("{}-projects-list", self.as_str())
    }

    /// Parses the lowercase textual form; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self, ParseStatusError> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported project status `{}`; expected active|finished",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

/// One submitted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// Team size. No lower bound is enforced unless configured.
    pub people: i64,
    pub status: ProjectStatus,
}

impl Project {
    /// Creates an active project with a freshly generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>, people: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, people)
    }

    /// Creates an active project with a caller-provided id.
    pub fn with_id(
        id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
        people: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            people,
            status: ProjectStatus::Active,
        }
    }

    /// Label shown under the title, e.g. `3 persons`.
    pub fn persons_label(&self) -> String {
        persons_label(self.people)
    }
}

/// Pluralized team-size label. Singular only for exactly one.
pub fn persons_label(count: i64) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{count} persons")
    }
}
