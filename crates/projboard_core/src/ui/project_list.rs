//! Status list: store subscriber and drop target.
//!
//! # Responsibility
//! - Re-render the projects of one status after every store broadcast.
//! - Accept dragged project ids and move them to this list's status.
//!
//! # Invariants
//! - Rendering is clear-and-rebuild; no incremental diffing.
//! - The drop handler only asks the store to move; the resulting broadcast
//!   does the re-render.
//! - Only drags whose first payload type is `text/plain` are accepted.
//! - The `droppable` marker is present exactly while in `DragOver`.

use super::component::{Component, ComponentBase, MountSpec};
use super::event::{EventKind, DRAG_MIME_PLAIN_TEXT};
use super::project_item::ProjectItem;
use super::surface::{ElementHandle, InsertPosition, RenderSurface, UiResult};
use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::state::project_state::{ListenerId, ProjectState};
use log::{debug, error};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use uuid::Uuid;

pub const TEMPLATE_ID: &str = "project-list";
pub const HOST_ID: &str = "app";

/// Class toggled on the list while a compatible drag hovers it.
pub const DROPPABLE_CLASS: &str = "droppable";

/// Drop-target state of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZoneState {
    Idle,
    DragOver,
}

/// Shared by the component and its event/store closures.
struct ListContext {
    surface: Rc<dyn RenderSurface>,
    status: ProjectStatus,
    list: ElementHandle,
    zone: Cell<DropZoneState>,
    rendered: RefCell<Vec<ProjectId>>,
}

impl ListContext {
    fn render_projects(&self, projects: Vec<Project>) -> UiResult<()> {
        let host_id = self.status.list_element_id();
        self.surface.clear_children(self.list)?;
        let mut rendered = Vec::new();
        for project in projects
            .into_iter()
            .filter(|project| project.status == self.status)
        {
            rendered.push(project.id);
            ProjectItem::new(self.surface.clone(), &host_id, project)?;
        }
        debug!(
            "event=list_rendered module=list status={} items={}",
            self.status,
            rendered.len()
        );
        *self.rendered.borrow_mut() = rendered;
        Ok(())
    }

    fn enter(&self) -> UiResult<()> {
        self.surface.add_class(self.list, DROPPABLE_CLASS)?;
        self.zone.set(DropZoneState::DragOver);
        Ok(())
    }

    fn leave(&self) -> UiResult<()> {
        self.surface.remove_class(self.list, DROPPABLE_CLASS)?;
        self.zone.set(DropZoneState::Idle);
        Ok(())
    }
}

/// One list per status, mounted at the end of `#app`.
pub struct ProjectList {
    base: ComponentBase,
    state: ProjectState,
    context: Rc<ListContext>,
    listener: Option<ListenerId>,
}

impl ProjectList {
    pub fn new(
        surface: Rc<dyn RenderSurface>,
        state: ProjectState,
        status: ProjectStatus,
    ) -> UiResult<Self> {
        let base = ComponentBase::mount(
            surface.clone(),
            &MountSpec::new(TEMPLATE_ID, HOST_ID, InsertPosition::End)
                .with_element_id(status.section_element_id()),
        )?;
        let list = base.require("ul")?;
        let mut component = Self {
            base,
            state,
            context: Rc::new(ListContext {
                surface,
                status,
                list,
                zone: Cell::new(DropZoneState::Idle),
                rendered: RefCell::new(Vec::new()),
            }),
            listener: None,
        };
        component.configure()?;
        component.render_content()?;
        Ok(component)
    }

    pub fn status(&self) -> ProjectStatus {
        self.context.status
    }

    /// The section element; the drop target.
    pub fn element(&self) -> ElementHandle {
        self.base.element()
    }

    /// The `ul` holding rendered items.
    pub fn list_element(&self) -> ElementHandle {
        self.context.list
    }

    /// Ids currently rendered, in store order.
    pub fn rendered_ids(&self) -> Vec<ProjectId> {
        self.context.rendered.borrow().clone()
    }

    pub fn drop_zone_state(&self) -> DropZoneState {
        self.context.zone.get()
    }

    pub fn is_drag_over(&self) -> bool {
        self.drop_zone_state() == DropZoneState::DragOver
    }

    /// Stops re-rendering on store broadcasts. Returns `false` if already
    /// detached.
    pub fn detach(&mut self) -> bool {
        match self.listener.take() {
            Some(id) => self.state.remove_listener(id),
            None => false,
        }
    }
}

impl Component for ProjectList {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> UiResult<()> {
        let surface = self.base.surface();
        let element = self.base.element();

        let context = Rc::clone(&self.context);
        surface.add_event_listener(
            element,
            EventKind::DragOver,
            Box::new(move |event| {
                if !event.carries_plain_text() {
                    return;
                }
                event.prevent_default();
                if let Err(err) = context.enter() {
                    error!("event=drag_over module=list status=error error={err}");
                }
            }),
        )?;

        let context = Rc::clone(&self.context);
        surface.add_event_listener(
            element,
            EventKind::DragLeave,
            Box::new(move |_| {
                if let Err(err) = context.leave() {
                    error!("event=drag_leave module=list status=error error={err}");
                }
            }),
        )?;

        let context = Rc::clone(&self.context);
        let state = self.state.clone();
        surface.add_event_listener(
            element,
            EventKind::Drop,
            Box::new(move |event| {
                let payload = event
                    .data_transfer
                    .as_ref()
                    .map(|transfer| transfer.get_data(DRAG_MIME_PLAIN_TEXT))
                    .unwrap_or_default();
                if let Err(err) = context.leave() {
                    error!("event=drop module=list status=error error={err}");
                }
                match Uuid::parse_str(payload.trim()) {
                    Ok(id) => {
                        state.move_project(id, context.status);
                    }
                    Err(_) => {
                        debug!(
                            "event=drop module=list status=miss reason=invalid_payload list={}",
                            context.status
                        );
                    }
                }
            }),
        )?;

        let context = Rc::clone(&self.context);
        self.listener = Some(self.state.add_listener(move |projects| {
            if let Err(err) = context.render_projects(projects) {
                error!(
                    "event=list_rendered module=list status=error list={} error={err}",
                    context.status
                );
            }
        }));
        Ok(())
    }

    fn render_content(&mut self) -> UiResult<()> {
        let surface = self.base.surface();
        surface.set_element_id(self.context.list, &self.context.status.list_element_id())?;
        surface.set_text(self.base.require("h2")?, &self.context.status.heading())
    }
}
