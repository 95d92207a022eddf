//! Rendering surface contract consumed by components.
//!
//! # Responsibility
//! - Describe the capabilities components need from a markup host: template
//!   cloning, attachment, selector lookup, text/class/attribute mutation and
//!   event registration.
//! - Hand out opaque typed handles instead of concrete element types.
//!
//! # Invariants
//! - Handles are only meaningful for the surface that produced them.
//! - Methods take `&self`; implementations own their interior mutability so
//!   one surface can be shared by every component and event handler.

use super::event::{EventHandler, EventKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque element reference issued by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for ElementHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Where an element is attached relative to its host's existing children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before all existing children (`afterbegin`).
    Start,
    /// After all existing children (`beforeend`).
    End,
}

pub type UiResult<T> = Result<T, UiError>;

/// Broken page or deployment. Not recoverable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    TemplateNotFound(String),
    EmptyTemplate(String),
    HostNotFound(String),
    ElementNotFound { selector: String },
    InvalidSelector(String),
    UnknownElement(ElementHandle),
}

impl Display for UiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::EmptyTemplate(id) => write!(f, "template has no element content: {id}"),
            Self::HostNotFound(id) => write!(f, "host element not found: {id}"),
            Self::ElementNotFound { selector } => {
                write!(f, "no element matches selector `{selector}`")
            }
            Self::InvalidSelector(selector) => write!(f, "unsupported selector `{selector}`"),
            Self::UnknownElement(handle) => write!(f, "unknown element handle: {handle}"),
        }
    }
}

impl Error for UiError {}

/// Markup host used by every component.
pub trait RenderSurface {
    /// Deep-clones the first element of template `template_id`, detached.
    fn instantiate_template(&self, template_id: &str) -> UiResult<ElementHandle>;

    /// Finds an attached element by id.
    fn element_by_id(&self, id: &str) -> Option<ElementHandle>;

    fn attach(
        &self,
        host: ElementHandle,
        element: ElementHandle,
        position: InsertPosition,
    ) -> UiResult<()>;

    /// First descendant of `root` matching `selector` in document order.
    fn query_selector(&self, root: ElementHandle, selector: &str)
        -> UiResult<Option<ElementHandle>>;

    fn set_element_id(&self, element: ElementHandle, id: &str) -> UiResult<()>;
    fn element_id(&self, element: ElementHandle) -> UiResult<Option<String>>;

    fn set_text(&self, element: ElementHandle, text: &str) -> UiResult<()>;
    fn text(&self, element: ElementHandle) -> UiResult<String>;

    /// Current value of a form control.
    fn value(&self, element: ElementHandle) -> UiResult<String>;
    fn set_value(&self, element: ElementHandle, value: &str) -> UiResult<()>;

    fn set_attribute(&self, element: ElementHandle, name: &str, value: &str) -> UiResult<()>;
    fn attribute(&self, element: ElementHandle, name: &str) -> UiResult<Option<String>>;

    fn add_class(&self, element: ElementHandle, class: &str) -> UiResult<()>;
    fn remove_class(&self, element: ElementHandle, class: &str) -> UiResult<()>;
    fn has_class(&self, element: ElementHandle, class: &str) -> UiResult<bool>;

    /// Detaches every child of `element`.
    fn clear_children(&self, element: ElementHandle) -> UiResult<()>;
    fn children(&self, element: ElementHandle) -> UiResult<Vec<ElementHandle>>;

    fn add_event_listener(
        &self,
        element: ElementHandle,
        kind: EventKind,
        handler: EventHandler,
    ) -> UiResult<()>;

    /// Blocking user-facing notification.
    fn alert(&self, message: &str);
}
