//! Observable project store.
//!
//! # Responsibility
//! - Own the canonical, creation-ordered project sequence.
//! - Broadcast a full snapshot to every listener after each mutation.
//!
//! # Invariants
//! - Listeners run synchronously, in registration order, before the mutating
//!   call returns. No listener observes a mutation without its broadcast.
//! - Each listener receives its own copy of the sequence.
//! - Registration does not replay current state.
//! - A mutation made by a listener is broadcast after the current pass
//!   completes, never nested inside it. Every mutation gets its own pass.
//! - A move that finds no project, or finds it already in the target status,
//!   mutates nothing and broadcasts nothing.
//!
//! `ProjectState` is a cheap, cloneable handle to process-local shared mutable
//! state. It is single-threaded (`Rc`), matching the UI event loop that drives
//! it. The application constructs exactly one and hands clones to each
//! component.

use crate::model::project::{Project, ProjectId, ProjectStatus};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Callback invoked with a snapshot of all projects.
pub type Listener = Box<dyn FnMut(Vec<Project>)>;

type SharedListener = Rc<RefCell<Listener>>;

/// Handle returned by [`ProjectState::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Result of [`ProjectState::move_project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Status changed and listeners were notified.
    Moved,
    /// Project already had the target status.
    Unchanged,
    /// No project with that id.
    NotFound,
}

#[derive(Default)]
struct StateInner {
    projects: Vec<Project>,
    listeners: Vec<(ListenerId, SharedListener)>,
    next_listener_id: u64,
    pending_broadcasts: usize,
    broadcasting: bool,
}

/// Shared handle to the project store.
#[derive(Clone, Default)]
pub struct ProjectState {
    inner: Rc<RefCell<StateInner>>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for future broadcasts.
    pub fn add_listener(&self, listener: impl FnMut(Vec<Project>) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        let listener: Listener = Box::new(listener);
        inner.listeners.push((id, Rc::new(RefCell::new(listener))));
        debug!(
            "event=listener_added module=state status=ok listeners={}",
            inner.listeners.len()
        );
        id
    }

    /// Unregisters a listener. Returns `false` when it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Appends a new active project and broadcasts.
    ///
    /// Inputs are expected to be validated by the caller.
    pub fn add_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        people: i64,
    ) -> ProjectId {
        let project = Project::new(title, description, people);
        let id = project.id;
        self.inner.borrow_mut().projects.push(project);
        info!("event=project_added module=state status=ok project_id={id} people={people}");
        self.broadcast();
        id
    }

    /// Sets the status of one project, broadcasting only on change.
    pub fn move_project(&self, id: ProjectId, new_status: ProjectStatus) -> MoveOutcome {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            match inner.projects.iter_mut().find(|project| project.id == id) {
                None => MoveOutcome::NotFound,
                Some(project) if project.status == new_status => MoveOutcome::Unchanged,
                Some(project) => {
                    project.status = new_status;
                    MoveOutcome::Moved
                }
            }
        };

        match outcome {
            MoveOutcome::Moved => {
                info!(
                    "event=project_moved module=state status=ok project_id={id} to={new_status}"
                );
                self.broadcast();
            }
            MoveOutcome::Unchanged => {
                debug!("event=project_moved module=state status=unchanged project_id={id}");
            }
            MoveOutcome::NotFound => {
                debug!("event=project_moved module=state status=miss project_id={id}");
            }
        }
        outcome
    }

    /// Copy of the full sequence in creation order.
    pub fn projects(&self) -> Vec<Project> {
        self.inner.borrow().projects.clone()
    }

    pub fn projects_with_status(&self, status: ProjectStatus) -> Vec<Project> {
        self.inner
            .borrow()
            .projects
            .iter()
            .filter(|project| project.status == status)
            .cloned()
            .collect()
    }

    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.inner
            .borrow()
            .projects
            .iter()
            .find(|project| project.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().projects.is_empty()
    }

    fn broadcast(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.pending_broadcasts += 1;
            if inner.broadcasting {
                debug!(
                    "event=broadcast module=state status=queued pending={}",
                    inner.pending_broadcasts
                );
                return;
            }
            inner.broadcasting = true;
        }

        while let Some((snapshot, listeners)) = self.next_pass() {
            debug!(
                "event=broadcast module=state status=ok projects={} listeners={}",
                snapshot.len(),
                listeners.len()
            );
            for listener in listeners {
                let mut callback = listener.borrow_mut();
                (*callback)(snapshot.clone());
            }
        }
    }

    /// Claims one queued broadcast, or ends the drain when none is left.
    ///
    /// No store borrow outlives this call, so listeners may read, mutate or
    /// subscribe to the store.
    fn next_pass(&self) -> Option<(Vec<Project>, Vec<SharedListener>)> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending_broadcasts == 0 {
            inner.broadcasting = false;
            return None;
        }
        inner.pending_broadcasts -= 1;
        let listeners = inner
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect::<Vec<_>>();
        Some((inner.projects.clone(), listeners))
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveOutcome, ProjectState};
    use crate::model::project::{Project, ProjectStatus};
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    fn recording(state: &ProjectState) -> Rc<RefCell<Vec<Vec<Project>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.add_listener(move |projects| sink.borrow_mut().push(projects));
        seen
    }

    #[test]
    fn registration_does_not_replay_state() {
        let state = ProjectState::new();
        state.add_project("a", "", 1);
        let seen = recording(&state);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn add_project_broadcasts_in_registration_order() {
        let state = ProjectState::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            state.add_listener(move |_| order.borrow_mut().push(tag));
        }

        state.add_project("a", "", 2);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn listener_sees_mutation_already_applied() {
        let state = ProjectState::new();
        let probe = state.clone();
        let lens = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&lens);
        state.add_listener(move |projects| {
            sink.borrow_mut().push((projects.len(), probe.len()));
        });

        state.add_project("a", "", 1);
        state.add_project("b", "", 1);
        assert_eq!(*lens.borrow(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn move_reports_outcomes() {
        let state = ProjectState::new();
        let id = state.add_project("a", "", 1);
        let seen = recording(&state);

        assert_eq!(
            state.move_project(Uuid::new_v4(), ProjectStatus::Finished),
            MoveOutcome::NotFound
        );
        assert_eq!(
            state.move_project(id, ProjectStatus::Active),
            MoveOutcome::Unchanged
        );
        assert!(seen.borrow().is_empty());

        assert_eq!(
            state.move_project(id, ProjectStatus::Finished),
            MoveOutcome::Moved
        );
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let state = ProjectState::new();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let id = state.add_listener(move |_| *sink.borrow_mut() += 1);

        state.add_project("a", "", 1);
        assert!(state.remove_listener(id));
        assert!(!state.remove_listener(id));
        state.add_project("b", "", 1);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(state.listener_count(), 0);
    }

    #[test]
    fn listener_mutation_is_broadcast_after_the_current_pass() {
        let state = ProjectState::new();
        let writer = state.clone();
        state.add_listener(move |projects| {
            let first = &projects[0];
            if first.status == ProjectStatus::Active {
                writer.move_project(first.id, ProjectStatus::Finished);
            }
        });
        let seen = recording(&state);

        state.add_project("a", "", 1);

        let statuses = seen
            .borrow()
            .iter()
            .map(|projects| projects[0].status)
            .collect::<Vec<_>>();
        assert_eq!(statuses, vec![ProjectStatus::Active, ProjectStatus::Finished]);
        assert_eq!(state.projects()[0].status, ProjectStatus::Finished);
    }

    #[test]
    fn each_nested_mutation_gets_its_own_pass() {
        let state = ProjectState::new();
        let writer = state.clone();
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        state.add_listener(move |_| {
            if !*flag.borrow() {
                *flag.borrow_mut() = true;
                writer.add_project("b", "", 1);
                writer.add_project("c", "", 1);
            }
        });
        let seen = recording(&state);

        state.add_project("a", "", 1);

        let lens = seen.borrow().iter().map(Vec::len).collect::<Vec<_>>();
        assert_eq!(lens, vec![1, 3, 3]);

        state.add_project("d", "", 1);
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn listener_may_register_another_listener_during_broadcast() {
        let state = ProjectState::new();
        let registrar = state.clone();
        let registered = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&registered);
        state.add_listener(move |_| {
            if !*flag.borrow() {
                *flag.borrow_mut() = true;
                registrar.add_listener(|_| {});
            }
        });

        state.add_project("a", "", 1);
        assert_eq!(state.listener_count(), 2);
    }
}
