//! Application wiring.
//!
//! # Responsibility
//! - Construct the one `ProjectState` for a running board and hand it to
//!   every component.
//! - Mount the form and both status lists in page order.
//!
//! # Invariants
//! - One board owns exactly one store; components never create their own.
//! - Any mount failure aborts bootstrap; a half-built board is never returned.

use super::project_input::{InputRules, ProjectInput};
use super::project_list::ProjectList;
use super::surface::RenderSurface;
use crate::config::BoardConfig;
use crate::error::BoardResult;
use crate::model::project::ProjectStatus;
use crate::state::project_state::ProjectState;
use log::info;
use std::rc::Rc;

pub struct ProjectBoard {
    state: ProjectState,
    input: ProjectInput,
    active: ProjectList,
    finished: ProjectList,
}

impl ProjectBoard {
    /// Mounts the board on `surface` with a fresh store.
    pub fn bootstrap(surface: Rc<dyn RenderSurface>, config: &BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        let state = ProjectState::new();
        let input = ProjectInput::new(surface.clone(), state.clone(), InputRules::from(config))?;
        let active = ProjectList::new(surface.clone(), state.clone(), ProjectStatus::Active)?;
        let finished = ProjectList::new(surface, state.clone(), ProjectStatus::Finished)?;

        info!(
            "event=board_bootstrap module=board status=ok max_people={} min_people={:?}",
            config.max_people, config.min_people
        );
        Ok(Self {
            state,
            input,
            active,
            finished,
        })
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn input(&self) -> &ProjectInput {
        &self.input
    }

    pub fn list(&self, status: ProjectStatus) -> &ProjectList {
        match status {
            ProjectStatus::Active => &self.active,
            ProjectStatus::Finished => &self.finished,
        }
    }

    pub fn list_mut(&mut self, status: ProjectStatus) -> &mut ProjectList {
        match status {
            ProjectStatus::Active => &mut self.active,
            ProjectStatus::Finished => &mut self.finished,
        }
    }
}
