//! Core of the project board: a submit form and two drag-and-drop status lists
//! backed by one observable project store.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod state;
pub mod ui;
pub mod validation;

pub use config::{BoardConfig, ConfigError};
pub use error::{BoardError, BoardResult, FormField, ValidationError, ValidationReason};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{persons_label, Project, ProjectId, ProjectStatus};
pub use state::project_state::{ListenerId, MoveOutcome, ProjectState};
pub use ui::board::ProjectBoard;
pub use ui::dom::{ElementSpec, MemoryDom};
pub use ui::event::{DataTransfer, DomEvent, EventKind, DRAG_MIME_PLAIN_TEXT};
pub use ui::project_input::{InputRules, ProjectInput, INVALID_INPUT_ALERT};
pub use ui::project_item::ProjectItem;
pub use ui::project_list::{DropZoneState, ProjectList, DROPPABLE_CLASS};
pub use ui::surface::{ElementHandle, InsertPosition, RenderSurface, UiError, UiResult};
pub use validation::{check, validate, FieldValue, RuleViolation, Validatable};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
