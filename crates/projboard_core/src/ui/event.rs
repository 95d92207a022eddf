//! Event and drag payload types delivered by a rendering surface.

use super::surface::ElementHandle;

/// MIME key the drag protocol reads and writes.
pub const DRAG_MIME_PLAIN_TEXT: &str = "text/plain";

/// Event kinds the components listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Submit,
    DragStart,
    DragOver,
    DragLeave,
    Drop,
    DragEnd,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::DragStart => "dragstart",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }
}

/// Key-value payload attached to one drag gesture.
///
/// Keys keep insertion order so `types()[0]` is the first type written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    effect_allowed: Option<String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `data` under `format`, replacing any previous value in place.
    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        let data = data.into();
        match self.entries.iter_mut().find(|(key, _)| key == format) {
            Some((_, value)) => *value = data,
            None => self.entries.push((format.to_string(), data)),
        }
    }

    /// Reads the value for `format`; empty when absent.
    pub fn get_data(&self, format: &str) -> String {
        self.entries
            .iter()
            .find(|(key, _)| key == format)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    pub fn types(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn set_effect_allowed(&mut self, effect: impl Into<String>) {
        self.effect_allowed = Some(effect.into());
    }

    pub fn effect_allowed(&self) -> Option<&str> {
        self.effect_allowed.as_deref()
    }
}

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: ElementHandle,
    pub data_transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: ElementHandle) -> Self {
        Self {
            kind,
            target,
            data_transfer: None,
            default_prevented: false,
        }
    }

    pub fn with_data_transfer(mut self, data_transfer: DataTransfer) -> Self {
        self.data_transfer = Some(data_transfer);
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// True when the first payload type is plain text.
    pub fn carries_plain_text(&self) -> bool {
        self.data_transfer
            .as_ref()
            .and_then(|transfer| transfer.types().first().copied())
            == Some(DRAG_MIME_PLAIN_TEXT)
    }
}

/// Handler registered for one element and event kind.
pub type EventHandler = Box<dyn FnMut(&mut DomEvent)>;

#[cfg(test)]
mod tests {
    use super::{DataTransfer, DomEvent, EventKind, DRAG_MIME_PLAIN_TEXT};
    use crate::ui::surface::ElementHandle;

    #[test]
    fn set_data_replaces_in_place() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(DRAG_MIME_PLAIN_TEXT, "a");
        transfer.set_data("text/uri-list", "b");
        transfer.set_data(DRAG_MIME_PLAIN_TEXT, "c");

        assert_eq!(transfer.types(), vec![DRAG_MIME_PLAIN_TEXT, "text/uri-list"]);
        assert_eq!(transfer.get_data(DRAG_MIME_PLAIN_TEXT), "c");
        assert_eq!(transfer.get_data("missing"), "");
    }

    #[test]
    fn plain_text_must_be_first_type() {
        let mut transfer = DataTransfer::new();
        transfer.set_data("text/html", "<b>x</b>");
        transfer.set_data(DRAG_MIME_PLAIN_TEXT, "x");
        let event =
            DomEvent::new(EventKind::DragOver, ElementHandle::new(0)).with_data_transfer(transfer);
        assert!(!event.carries_plain_text());

        let bare = DomEvent::new(EventKind::DragOver, ElementHandle::new(0));
        assert!(!bare.carries_plain_text());
    }
}
