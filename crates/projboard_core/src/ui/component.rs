//! Shared component lifecycle.
//!
//! # Responsibility
//! - Instantiate a template, optionally assign its id and attach it to a
//!   named host at the start or end of the host's children.
//! - Define the `configure` / `render_content` hooks every component has.
//!
//! # Invariants
//! - Mounting never runs the hooks; each concrete component calls them in
//!   its own fixed order from its constructor.
//! - A missing template, host or required descendant is a fatal `UiError`.

use super::surface::{ElementHandle, InsertPosition, RenderSurface, UiError, UiResult};
use std::rc::Rc;

/// Where and how a component is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub template_id: String,
    pub host_id: String,
    pub position: InsertPosition,
    pub element_id: Option<String>,
}

impl MountSpec {
    pub fn new(template_id: &str, host_id: &str, position: InsertPosition) -> Self {
        Self {
            template_id: template_id.to_string(),
            host_id: host_id.to_string(),
            position,
            element_id: None,
        }
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }
}

/// Mounted element plus the surface that owns it.
#[derive(Clone)]
pub struct ComponentBase {
    surface: Rc<dyn RenderSurface>,
    host: ElementHandle,
    element: ElementHandle,
}

impl ComponentBase {
    pub fn mount(surface: Rc<dyn RenderSurface>, spec: &MountSpec) -> UiResult<Self> {
        let host = surface
            .element_by_id(&spec.host_id)
            .ok_or_else(|| UiError::HostNotFound(spec.host_id.clone()))?;
        let element = surface.instantiate_template(&spec.template_id)?;
        if let Some(id) = &spec.element_id {
            surface.set_element_id(element, id)?;
        }
        surface.attach(host, element, spec.position)?;
        Ok(Self {
            surface,
            host,
            element,
        })
    }

    pub fn surface(&self) -> &Rc<dyn RenderSurface> {
        &self.surface
    }

    pub fn host(&self) -> ElementHandle {
        self.host
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Descendant matching `selector`, or `ElementNotFound`.
    pub fn require(&self, selector: &str) -> UiResult<ElementHandle> {
        self.surface
            .query_selector(self.element, selector)?
            .ok_or_else(|| UiError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

/// Lifecycle hooks implemented by each component.
pub trait Component {
    fn base(&self) -> &ComponentBase;

    /// Wires event listeners and store subscriptions.
    fn configure(&mut self) -> UiResult<()>;

    /// Fills static content.
    fn render_content(&mut self) -> UiResult<()>;
}
