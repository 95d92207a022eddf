//! In-memory rendering surface.
//!
//! # Responsibility
//! - Implement [`RenderSurface`] over an arena of element nodes.
//! - Dispatch events with bubbling and simulate full drag gestures.
//! - Record alerts and render an outline of the attached tree.
//!
//! # Invariants
//! - Templates are detached; their content is never found by id lookup.
//! - Event handlers are invoked with no internal borrow held, so handlers may
//!   freely mutate the surface.
//! - Clearing children frees the removed subtree's nodes and drops their
//!   handlers. Stale handles resolve to `UnknownElement`; events aimed at
//!   them are discarded.

use super::event::{DataTransfer, DomEvent, EventHandler, EventKind};
use super::surface::{ElementHandle, InsertPosition, RenderSurface, UiError, UiResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

static SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([#.]?)([A-Za-z_][A-Za-z0-9_-]*)$").expect("valid selector regex"));

type SharedHandler = Rc<RefCell<EventHandler>>;

/// Declarative element description used for templates and static markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Id(String),
    Class(String),
    Tag(String),
}

fn parse_selector(selector: &str) -> UiResult<Selector> {
    let trimmed = selector.trim();
    let captures = SELECTOR_RE
        .captures(trimmed)
        .ok_or_else(|| UiError::InvalidSelector(selector.to_string()))?;
    let name = captures[2].to_string();
    Ok(match &captures[1] {
        "#" => Selector::Id(name),
        "." => Selector::Class(name),
        _ => Selector::Tag(name.to_ascii_lowercase()),
    })
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: String,
    children: Vec<ElementHandle>,
    parent: Option<ElementHandle>,
}

impl Node {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.classes.iter().any(|value| value == class),
            Selector::Tag(tag) => self.tag == *tag,
        }
    }
}

struct Tree {
    nodes: BTreeMap<usize, Node>,
    next_index: usize,
    body: ElementHandle,
    templates: BTreeMap<String, ElementHandle>,
}

impl Tree {
    fn new() -> Self {
        let body = Node {
            tag: "body".to_string(),
            ..Node::default()
        };
        Self {
            nodes: BTreeMap::from([(0, body)]),
            next_index: 1,
            body: ElementHandle::new(0),
            templates: BTreeMap::new(),
        }
    }

    fn insert(&mut self, node: Node) -> ElementHandle {
        let index = self.next_index;
        self.next_index += 1;
        self.nodes.insert(index, node);
        ElementHandle::new(index)
    }

    fn node(&self, handle: ElementHandle) -> UiResult<&Node> {
        self.nodes
            .get(&handle.index())
            .ok_or(UiError::UnknownElement(handle))
    }

    fn node_mut(&mut self, handle: ElementHandle) -> UiResult<&mut Node> {
        self.nodes
            .get_mut(&handle.index())
            .ok_or(UiError::UnknownElement(handle))
    }

    fn build(&mut self, spec: &ElementSpec, parent: Option<ElementHandle>) -> ElementHandle {
        let handle = self.insert(Node {
            tag: spec.tag.clone(),
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            attributes: spec.attributes.iter().cloned().collect(),
            text: spec.text.clone(),
            value: String::new(),
            children: Vec::new(),
            parent,
        });
        for child in &spec.children {
            let child_handle = self.build(child, Some(handle));
            if let Some(node) = self.nodes.get_mut(&handle.index()) {
                node.children.push(child_handle);
            }
        }
        handle
    }

    fn deep_clone(
        &mut self,
        source: ElementHandle,
        parent: Option<ElementHandle>,
    ) -> UiResult<ElementHandle> {
        let original = self.node(source)?.clone();
        let children = original.children.clone();
        let handle = self.insert(Node {
            children: Vec::new(),
            parent,
            ..original
        });
        for child in children {
            let child_handle = self.deep_clone(child, Some(handle))?;
            self.node_mut(handle)?.children.push(child_handle);
        }
        Ok(handle)
    }

    /// Pre-order descendants of `root`, excluding `root`.
    fn descendants(&self, root: ElementHandle) -> UiResult<Vec<ElementHandle>> {
        let mut out = Vec::new();
        let mut stack = self.node(root)?.children.iter().rev().copied().collect::<Vec<_>>();
        while let Some(handle) = stack.pop() {
            out.push(handle);
            stack.extend(self.node(handle)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    fn detach(&mut self, element: ElementHandle) -> UiResult<()> {
        if let Some(parent) = self.node(element)?.parent {
            self.node_mut(parent)?
                .children
                .retain(|child| *child != element);
        }
        self.node_mut(element)?.parent = None;
        Ok(())
    }

    /// `element` followed by its ancestors up to the root.
    fn path_to_root(&self, element: ElementHandle) -> UiResult<Vec<ElementHandle>> {
        let mut path = vec![element];
        let mut current = self.node(element)?.parent;
        while let Some(handle) = current {
            path.push(handle);
            current = self.node(handle)?.parent;
        }
        Ok(path)
    }

    fn write_outline(&self, handle: ElementHandle, depth: usize, out: &mut String) {
        let Ok(node) = self.node(handle) else {
            return;
        };
        let mut line = format!("{}{}", "  ".repeat(depth), node.tag);
        if let Some(id) = &node.id {
            let _ = write!(line, "#{id}");
        }
        for class in &node.classes {
            let _ = write!(line, ".{class}");
        }
        if !node.text.is_empty() {
            let _ = write!(line, " {:?}", node.text);
        }
        if !node.value.is_empty() {
            let _ = write!(line, " value={:?}", node.value);
        }
        out.push_str(&line);
        out.push('\n');
        for child in &node.children {
            self.write_outline(*child, depth + 1, out);
        }
    }
}

/// Arena-backed surface for tests and the terminal driver.
pub struct MemoryDom {
    tree: RefCell<Tree>,
    handlers: RefCell<BTreeMap<(ElementHandle, EventKind), Vec<SharedHandler>>>,
    alerts: RefCell<Vec<String>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document with only a body.
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            handlers: RefCell::new(BTreeMap::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }

    /// Document with the `#app` host and the three board templates.
    pub fn with_board_templates() -> Self {
        let dom = Self::new();
        dom.append_to_body(&ElementSpec::new("div").id("app"));
        dom.register_template(
            "project-input",
            &ElementSpec::new("form")
                .child(
                    ElementSpec::new("div")
                        .class("form-control")
                        .child(ElementSpec::new("label").attr("for", "title").text("Title"))
                        .child(ElementSpec::new("input").id("title").attr("type", "text")),
                )
                .child(
                    ElementSpec::new("div")
                        .class("form-control")
                        .child(
                            ElementSpec::new("label")
                                .attr("for", "description")
                                .text("Description"),
                        )
                        .child(
                            ElementSpec::new("textarea")
                                .id("description")
                                .attr("rows", "3"),
                        ),
                )
                .child(
                    ElementSpec::new("div")
                        .class("form-control")
                        .child(ElementSpec::new("label").attr("for", "people").text("People"))
                        .child(
                            ElementSpec::new("input")
                                .id("people")
                                .attr("type", "number")
                                .attr("step", "1"),
                        ),
                )
                .child(
                    ElementSpec::new("button")
                        .attr("type", "submit")
                        .text("ADD PROJECT"),
                ),
        );
        dom.register_template(
            "project-list",
            &ElementSpec::new("section")
                .class("projects")
                .child(ElementSpec::new("header").child(ElementSpec::new("h2")))
                .child(ElementSpec::new("ul")),
        );
        dom.register_template(
            "single-project",
            &ElementSpec::new("li")
                .child(ElementSpec::new("h2"))
                .child(ElementSpec::new("h3"))
                .child(ElementSpec::new("p")),
        );
        dom
    }

    /// Builds `spec` and appends it to the body.
    pub fn append_to_body(&self, spec: &ElementSpec) -> ElementHandle {
        let mut tree = self.tree.borrow_mut();
        let body = tree.body;
        let handle = tree.build(spec, Some(body));
        if let Some(node) = tree.nodes.get_mut(&body.index()) {
            node.children.push(handle);
        }
        handle
    }

    /// Registers (or replaces) a template whose content is `content`.
    pub fn register_template(&self, template_id: &str, content: &ElementSpec) {
        let mut tree = self.tree.borrow_mut();
        let template = tree.build(&ElementSpec::new("template").child(content.clone()), None);
        tree.templates.insert(template_id.to_string(), template);
    }

    /// Delivers `event` to its target and then to each ancestor.
    ///
    /// An event aimed at a freed element is dropped, as a detached node has no
    /// handlers left to run.
    pub fn dispatch(&self, event: &mut DomEvent) -> UiResult<()> {
        let path = match self.tree.borrow().path_to_root(event.target) {
            Ok(path) => path,
            Err(UiError::UnknownElement(target)) => {
                debug!(
                    "event=dispatch module=dom status=skipped kind={:?} target={target}",
                    event.kind
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        for element in path {
            let handlers = self
                .handlers
                .borrow()
                .get(&(element, event.kind))
                .cloned()
                .unwrap_or_default();
            for handler in handlers {
                let mut callback = handler.borrow_mut();
                (*callback)(event);
            }
        }
        Ok(())
    }

    /// Fires a submit event on `form`. Returns whether default was prevented.
    pub fn submit(&self, form: ElementHandle) -> UiResult<bool> {
        let mut event = DomEvent::new(EventKind::Submit, form);
        self.dispatch(&mut event)?;
        Ok(event.default_prevented())
    }

    /// Simulates dragging `source` over `target` and releasing it.
    ///
    /// Sequence: dragstart on source, dragover on target, then drop when the
    /// target accepted the drag (prevented default) or dragleave otherwise,
    /// then dragend on source. Returns whether the drop happened.
    pub fn drag_and_drop(&self, source: ElementHandle, target: ElementHandle) -> UiResult<bool> {
        let mut start =
            DomEvent::new(EventKind::DragStart, source).with_data_transfer(DataTransfer::new());
        self.dispatch(&mut start)?;
        let transfer = start.data_transfer.take().unwrap_or_default();

        let mut over =
            DomEvent::new(EventKind::DragOver, target).with_data_transfer(transfer.clone());
        self.dispatch(&mut over)?;
        let accepted = over.default_prevented();

        let finish = if accepted {
            EventKind::Drop
        } else {
            EventKind::DragLeave
        };
        let mut finish = DomEvent::new(finish, target).with_data_transfer(transfer.clone());
        self.dispatch(&mut finish)?;

        let mut end = DomEvent::new(EventKind::DragEnd, source).with_data_transfer(transfer);
        self.dispatch(&mut end)?;

        debug!(
            "event=drag_gesture module=dom status={} source={source} target={target}",
            if accepted { "dropped" } else { "rejected" }
        );
        Ok(accepted)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.borrow_mut())
    }

    /// Number of element nodes currently held, templates included.
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    /// Indented outline of the attached document.
    pub fn render_outline(&self) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        tree.write_outline(tree.body, 0, &mut out);
        out
    }
}

impl RenderSurface for MemoryDom {
    fn instantiate_template(&self, template_id: &str) -> UiResult<ElementHandle> {
        let mut tree = self.tree.borrow_mut();
        let template = *tree
            .templates
            .get(template_id)
            .ok_or_else(|| UiError::TemplateNotFound(template_id.to_string()))?;
        let first = tree
            .node(template)?
            .children
            .first()
            .copied()
            .ok_or_else(|| UiError::EmptyTemplate(template_id.to_string()))?;
        tree.deep_clone(first, None)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementHandle> {
        let tree = self.tree.borrow();
        let descendants = tree.descendants(tree.body).ok()?;
        descendants.into_iter().find(|handle| {
            tree.node(*handle)
                .map(|node| node.id.as_deref() == Some(id))
                .unwrap_or(false)
        })
    }

    fn attach(
        &self,
        host: ElementHandle,
        element: ElementHandle,
        position: InsertPosition,
    ) -> UiResult<()> {
        let mut tree = self.tree.borrow_mut();
        tree.node(host)?;
        tree.detach(element)?;
        let host_node = tree.node_mut(host)?;
        match position {
            InsertPosition::Start => host_node.children.insert(0, element),
            InsertPosition::End => host_node.children.push(element),
        }
        tree.node_mut(element)?.parent = Some(host);
        Ok(())
    }

    fn query_selector(
        &self,
        root: ElementHandle,
        selector: &str,
    ) -> UiResult<Option<ElementHandle>> {
        let selector = parse_selector(selector)?;
        let tree = self.tree.borrow();
        for handle in tree.descendants(root)? {
            if tree.node(handle)?.matches(&selector) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    fn set_element_id(&self, element: ElementHandle, id: &str) -> UiResult<()> {
        self.tree.borrow_mut().node_mut(element)?.id = Some(id.to_string());
        Ok(())
    }

    fn element_id(&self, element: ElementHandle) -> UiResult<Option<String>> {
        Ok(self.tree.borrow().node(element)?.id.clone())
    }

    fn set_text(&self, element: ElementHandle, text: &str) -> UiResult<()> {
        self.tree.borrow_mut().node_mut(element)?.text = text.to_string();
        Ok(())
    }

    fn text(&self, element: ElementHandle) -> UiResult<String> {
        Ok(self.tree.borrow().node(element)?.text.clone())
    }

    fn value(&self, element: ElementHandle) -> UiResult<String> {
        Ok(self.tree.borrow().node(element)?.value.clone())
    }

    fn set_value(&self, element: ElementHandle, value: &str) -> UiResult<()> {
        self.tree.borrow_mut().node_mut(element)?.value = value.to_string();
        Ok(())
    }

    fn set_attribute(&self, element: ElementHandle, name: &str, value: &str) -> UiResult<()> {
        self.tree
            .borrow_mut()
            .node_mut(element)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> UiResult<Option<String>> {
        Ok(self.tree.borrow().node(element)?.attributes.get(name).cloned())
    }

    fn add_class(&self, element: ElementHandle, class: &str) -> UiResult<()> {
        let mut tree = self.tree.borrow_mut();
        let node = tree.node_mut(element)?;
        if !node.classes.iter().any(|value| value == class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, element: ElementHandle, class: &str) -> UiResult<()> {
        self.tree
            .borrow_mut()
            .node_mut(element)?
            .classes
            .retain(|value| value != class);
        Ok(())
    }

    fn has_class(&self, element: ElementHandle, class: &str) -> UiResult<bool> {
        Ok(self
            .tree
            .borrow()
            .node(element)?
            .classes
            .iter()
            .any(|value| value == class))
    }

    fn clear_children(&self, element: ElementHandle) -> UiResult<()> {
        let removed = {
            let mut tree = self.tree.borrow_mut();
            let removed = tree.descendants(element)?;
            tree.node_mut(element)?.children.clear();
            for handle in &removed {
                tree.nodes.remove(&handle.index());
            }
            removed
        };
        self.handlers
            .borrow_mut()
            .retain(|(handle, _), _| !removed.contains(handle));
        Ok(())
    }

    fn children(&self, element: ElementHandle) -> UiResult<Vec<ElementHandle>> {
        Ok(self.tree.borrow().node(element)?.children.clone())
    }

    fn add_event_listener(
        &self,
        element: ElementHandle,
        kind: EventKind,
        handler: EventHandler,
    ) -> UiResult<()> {
        self.tree.borrow().node(element)?;
        self.handlers
            .borrow_mut()
            .entry((element, kind))
            .or_default()
            .push(Rc::new(RefCell::new(handler)));
        Ok(())
    }

    fn alert(&self, message: &str) {
        debug!("event=alert module=dom status=shown");
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_selector, ElementSpec, MemoryDom, Selector};
    use crate::ui::event::{DomEvent, EventKind};
    use crate::ui::surface::{InsertPosition, RenderSurface, UiError};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn parses_supported_selectors() {
        assert_eq!(
            parse_selector("#title").expect("id selector"),
            Selector::Id("title".to_string())
        );
        assert_eq!(
            parse_selector(".droppable").expect("class selector"),
            Selector::Class("droppable".to_string())
        );
        assert_eq!(
            parse_selector("UL").expect("tag selector"),
            Selector::Tag("ul".to_string())
        );
        assert!(matches!(
            parse_selector("ul > li"),
            Err(UiError::InvalidSelector(_))
        ));
    }

    #[test]
    fn template_content_is_not_found_by_id_until_attached() {
        let dom = MemoryDom::with_board_templates();
        assert!(dom.element_by_id("title").is_none());

        let form = dom
            .instantiate_template("project-input")
            .expect("template should exist");
        assert!(dom.element_by_id("title").is_none());

        let app = dom.element_by_id("app").expect("app host");
        dom.attach(app, form, InsertPosition::Start)
            .expect("attach form");
        assert!(dom.element_by_id("title").is_some());
    }

    #[test]
    fn instances_are_independent_clones() {
        let dom = MemoryDom::with_board_templates();
        let first = dom.instantiate_template("single-project").expect("clone");
        let second = dom.instantiate_template("single-project").expect("clone");
        let first_h2 = dom
            .query_selector(first, "h2")
            .expect("query")
            .expect("h2");
        dom.set_text(first_h2, "changed").expect("set text");

        let second_h2 = dom
            .query_selector(second, "h2")
            .expect("query")
            .expect("h2");
        assert_eq!(dom.text(second_h2).expect("text"), "");
    }

    #[test]
    fn attach_respects_insert_position() {
        let dom = MemoryDom::new();
        let host = dom.append_to_body(&ElementSpec::new("div").id("host"));
        dom.register_template("item", &ElementSpec::new("span"));

        let end = dom.instantiate_template("item").expect("clone");
        let start = dom.instantiate_template("item").expect("clone");
        dom.attach(host, end, InsertPosition::End).expect("attach");
        dom.attach(host, start, InsertPosition::Start).expect("attach");

        assert_eq!(dom.children(host).expect("children"), vec![start, end]);
    }

    #[test]
    fn missing_template_is_reported() {
        let dom = MemoryDom::new();
        let err = dom
            .instantiate_template("nope")
            .expect_err("missing template must fail");
        assert_eq!(err, UiError::TemplateNotFound("nope".to_string()));
    }

    #[test]
    fn events_bubble_to_ancestors() {
        let dom = MemoryDom::new();
        let outer = dom.append_to_body(
            &ElementSpec::new("section").child(ElementSpec::new("ul").id("inner")),
        );
        let inner = dom.element_by_id("inner").expect("inner");
        let hits = Rc::new(RefCell::new(Vec::new()));
        for element in [inner, outer] {
            let hits = Rc::clone(&hits);
            dom.add_event_listener(
                element,
                EventKind::DragOver,
                Box::new(move |_| hits.borrow_mut().push(element)),
            )
            .expect("listener");
        }

        let mut event = DomEvent::new(EventKind::DragOver, inner);
        dom.dispatch(&mut event).expect("dispatch");
        assert_eq!(*hits.borrow(), vec![inner, outer]);
    }

    #[test]
    fn clear_children_detaches_and_drops_handlers() {
        let dom = MemoryDom::new();
        let list = dom.append_to_body(
            &ElementSpec::new("ul")
                .id("list")
                .child(ElementSpec::new("li").id("item")),
        );
        let item = dom.element_by_id("item").expect("item");
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        dom.add_event_listener(
            item,
            EventKind::DragStart,
            Box::new(move |_| *sink.borrow_mut() += 1),
        )
        .expect("listener");

        dom.clear_children(list).expect("clear");
        assert!(dom.children(list).expect("children").is_empty());
        assert!(dom.element_by_id("item").is_none());

        let mut event = DomEvent::new(EventKind::DragStart, item);
        dom.dispatch(&mut event).expect("dispatch");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn clear_children_frees_removed_nodes() {
        let dom = MemoryDom::with_board_templates();
        let list = dom.append_to_body(&ElementSpec::new("ul"));
        let baseline = dom.node_count();

        for _ in 0..50 {
            for _ in 0..3 {
                let item = dom.instantiate_template("single-project").expect("clone");
                dom.attach(list, item, InsertPosition::End).expect("attach");
            }
            dom.clear_children(list).expect("clear");
        }
        assert_eq!(dom.node_count(), baseline);
    }

    #[test]
    fn freed_handles_are_unknown() {
        let dom = MemoryDom::new();
        let list = dom.append_to_body(&ElementSpec::new("ul").child(ElementSpec::new("li")));
        let item = dom.children(list).expect("children")[0];
        dom.clear_children(list).expect("clear");

        assert_eq!(dom.text(item), Err(UiError::UnknownElement(item)));
        let mut event = DomEvent::new(EventKind::DragEnd, item);
        dom.dispatch(&mut event).expect("stale target is skipped");
    }

    #[test]
    fn outline_lists_attached_elements() {
        let dom = MemoryDom::with_board_templates();
        let outline = dom.render_outline();
        assert!(outline.starts_with("body\n"));
        assert!(outline.contains("  div#app"));
    }
}
