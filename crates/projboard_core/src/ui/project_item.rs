//! Draggable list entry for one project.

use super::component::{Component, ComponentBase, MountSpec};
use super::event::{EventKind, DRAG_MIME_PLAIN_TEXT};
use super::surface::{ElementHandle, InsertPosition, RenderSurface, UiResult};
use crate::model::project::Project;
use log::debug;
use std::rc::Rc;

pub const TEMPLATE_ID: &str = "single-project";

/// Rendered project entry. Writes its id as `text/plain` on drag start.
pub struct ProjectItem {
    base: ComponentBase,
    project: Project,
}

impl ProjectItem {
    /// Mounts at the end of the element with id `host_id`.
    pub fn new(surface: Rc<dyn RenderSurface>, host_id: &str, project: Project) -> UiResult<Self> {
        let base = ComponentBase::mount(
            surface,
            &MountSpec::new(TEMPLATE_ID, host_id, InsertPosition::End)
                .with_element_id(project.id.to_string()),
        )?;
        let mut item = Self { base, project };
        item.configure()?;
        item.render_content()?;
        Ok(item)
    }

    pub fn element(&self) -> ElementHandle {
        self.base.element()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

impl Component for ProjectItem {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn configure(&mut self) -> UiResult<()> {
        let surface = self.base.surface();
        let element = self.base.element();
        surface.set_attribute(element, "draggable", "true")?;

        let payload = self.project.id.to_string();
        surface.add_event_listener(
            element,
            EventKind::DragStart,
            Box::new(move |event| {
                let transfer = event.data_transfer.get_or_insert_with(Default::default);
                transfer.set_data(DRAG_MIME_PLAIN_TEXT, payload.as_str());
                transfer.set_effect_allowed("move");
            }),
        )?;

        let project_id = self.project.id;
        surface.add_event_listener(
            element,
            EventKind::DragEnd,
            Box::new(move |_| {
                debug!("event=drag_end module=item status=ok project_id={project_id}");
            }),
        )
    }

    fn render_content(&mut self) -> UiResult<()> {
        let surface = self.base.surface();
        surface.set_text(self.base.require("h2")?, &self.project.title)?;
        surface.set_text(self.base.require("h3")?, &self.project.persons_label())?;
        surface.set_text(self.base.require("p")?, &self.project.description)
    }
}
