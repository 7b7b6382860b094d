// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tooltip controller.
//!
//! Every chart owns one [`Tooltip`]. Marks forward pointer events to its three handlers; the
//! controller decides the content, follows the pointer, and hides itself on leave. The floating
//! node is created lazily on the first hover and only when a [`TooltipConfig`] is present, so a
//! chart without one never produces a `tooltip-<id>` node.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Record, Surface, display_value, text_at};

/// Class of the transient guide lines some charts draw while hovering.
pub const GUIDE_CLASS: &str = "axis-point-line";

/// Pixel offset between the pointer and the tooltip's top-left corner.
pub const POINTER_OFFSET: f64 = 10.0;

/// Horizontal position of a hidden tooltip.
pub const HIDDEN_LEFT: f64 = -1000.0;

/// Maps a datum to tooltip markup.
pub type HtmlFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Tooltip configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipConfig {
    /// Class of the tooltip container.
    pub class_name: Option<String>,
    /// Custom content; wins over every other content source.
    #[serde(skip)]
    pub html: Option<HtmlFn>,
    /// Restricts the default `key: value` listing to these keys, in this order.
    pub keys: Option<Vec<String>>,
    /// Inline style overrides, in declaration order.
    pub style: IndexMap<String, String>,
}

impl fmt::Debug for TooltipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipConfig")
            .field("class_name", &self.class_name)
            .field("html", &self.html.as_ref().map(|_| "<fn>"))
            .field("keys", &self.keys)
            .field("style", &self.style)
            .finish()
    }
}

impl TooltipConfig {
    /// An empty configuration: default content, no class, no style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container class.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Sets a custom content function.
    pub fn with_html(mut self, html: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.html = Some(Arc::new(html));
        self
    }

    /// Restricts the default listing to `keys`.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one inline style declaration.
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }
}

/// The floating tooltip node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipNode {
    /// `tooltip-<chart id>`.
    pub dom_id: String,
    /// Current markup.
    pub content: String,
    /// Left edge in page pixels.
    pub left: f64,
    /// Top edge in page pixels.
    pub top: f64,
    /// Current opacity; `0` when hidden.
    pub opacity: f64,
    /// Container class.
    pub class: String,
    /// Inline styles.
    pub style: IndexMap<String, String>,
}

impl TooltipNode {
    /// Whether the node is currently shown.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Tooltip state for one chart instance.
pub struct Tooltip {
    id: String,
    config: Option<TooltipConfig>,
    default_html: Option<HtmlFn>,
    node: Option<TooltipNode>,
    last: Option<Record>,
}

impl fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("default_html", &self.default_html.as_ref().map(|_| "<fn>"))
            .field("node", &self.node)
            .field("last", &self.last)
            .finish()
    }
}

impl Drop for Tooltip {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Tooltip {
    /// Creates a controller for chart `id`.
    ///
    /// `default_html` is the chart's own content format, used when the configuration has
    /// neither `html` nor `keys`. Without it every field of the datum is listed.
    pub fn new(
        id: impl Into<String>,
        config: Option<TooltipConfig>,
        default_html: Option<HtmlFn>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            default_html,
            node: None,
            last: None,
        }
    }

    /// The owning chart's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The configuration, if any.
    pub fn config(&self) -> Option<&TooltipConfig> {
        self.config.as_ref()
    }

    /// Whether the handlers do anything.
    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Replaces the configuration; the existing node is dropped.
    pub fn set_config(&mut self, config: Option<TooltipConfig>) {
        self.teardown();
        self.config = config;
    }

    /// Re-keys the controller to a new chart id, dropping the node of the old one.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id != self.id {
            self.teardown();
            self.id = id;
        }
    }

    /// The floating node, once it has been created.
    pub fn node(&self) -> Option<&TooltipNode> {
        self.node.as_ref()
    }

    /// Removes the floating node.
    pub fn teardown(&mut self) {
        if self.node.take().is_some() {
            tracing::trace!(id = %self.id, "tooltip removed");
        }
        self.last = None;
    }

    /// Content for `datum` under the current configuration.
    pub fn content_for(&self, datum: &Record) -> String {
        let config = self.config.as_ref();
        if let Some(html) = config.and_then(|c| c.html.as_ref()) {
            return html(datum);
        }
        if let Some(keys) = config.and_then(|c| c.keys.as_ref()) {
            return keys
                .iter()
                .map(|key| format!("{key}: {}", text_at(datum, key).unwrap_or_default()))
                .collect::<Vec<_>>()
                .join("<br/>");
        }
        if let Some(default_html) = &self.default_html {
            return default_html(datum);
        }
        datum
            .iter()
            .map(|(key, value)| format!("{key}: {}", display_value(value)))
            .collect::<Vec<_>>()
            .join("<br/>")
    }

    /// Shows the tooltip for `datum` next to the pointer.
    pub fn on_mouse_over(&mut self, pointer: Point, datum: &Record) {
        if self.config.is_none() {
            return;
        }
        let content = self.content_for(datum);
        let node = self.ensure_node();
        node.content = content;
        node.opacity = 1.0;
        node.left = pointer.x + POINTER_OFFSET;
        node.top = pointer.y + POINTER_OFFSET;
        self.last = Some(datum.clone());
        tracing::trace!(id = %self.id, x = pointer.x, y = pointer.y, "tooltip shown");
    }

    /// Follows the pointer, refreshing the content when the hovered datum changed.
    pub fn on_mouse_move(&mut self, pointer: Point, datum: Option<&Record>) {
        if self.config.is_none() {
            return;
        }
        if let Some(datum) = datum
            && self.last.as_ref() != Some(datum)
        {
            self.on_mouse_over(pointer, datum);
            return;
        }
        // Nothing hovered yet: no node to move.
        let Some(node) = self.node.as_mut() else {
            return;
        };
        node.left = pointer.x + POINTER_OFFSET;
        node.top = pointer.y + POINTER_OFFSET;
    }

    /// Hides the tooltip and clears hover guide lines from `surface`.
    pub fn on_mouse_leave(&mut self, surface: &mut Surface) {
        if self.config.is_none() {
            return;
        }
        for id in surface.select_class(GUIDE_CLASS) {
            surface.remove(id);
        }
        if let Some(node) = self.node.as_mut() {
            node.opacity = 0.0;
            node.left = HIDDEN_LEFT;
        }
        self.last = None;
    }

    fn ensure_node(&mut self) -> &mut TooltipNode {
        let Self {
            id, config, node, ..
        } = self;
        node.get_or_insert_with(|| {
            tracing::trace!(id = %id, "tooltip created");
            TooltipNode {
                dom_id: format!("tooltip-{id}"),
                content: String::new(),
                left: HIDDEN_LEFT,
                top: 0.0,
                opacity: 0.0,
                class: config
                    .as_ref()
                    .and_then(|c| c.class_name.clone())
                    .unwrap_or_default(),
                style: config.as_ref().map(|c| c.style.clone()).unwrap_or_default(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use charta_core::{Element, record};
    use serde_json::json;

    use super::*;

    fn datum() -> Record {
        record([("name", json!("a")), ("value", json!(3)), ("note", json!(null))])
    }

    #[test]
    fn no_config_creates_no_node() {
        let mut s = Surface::new("c", 10.0, 10.0);
        let mut t = Tooltip::new("c", None, None);
        t.on_mouse_over(Point::new(1.0, 1.0), &datum());
        t.on_mouse_move(Point::new(2.0, 2.0), Some(&datum()));
        t.on_mouse_leave(&mut s);
        assert!(t.node().is_none());
    }

    #[test]
    fn html_wins() {
        let cfg = TooltipConfig::new()
            .with_html(|d| format!("<b>{}</b>", display_value(&d["name"])))
            .with_keys(["value"]);
        let t = Tooltip::new("c", Some(cfg), None);
        assert_eq!(t.content_for(&datum()), "<b>a</b>");
    }

    #[test]
    fn keys_filter_the_listing() {
        let cfg = TooltipConfig::new().with_keys(["value", "missing"]);
        let t = Tooltip::new("c", Some(cfg), None);
        assert_eq!(t.content_for(&datum()), "value: 3<br/>missing: ");
    }

    #[test]
    fn default_lists_every_field() {
        let t = Tooltip::new("c", Some(TooltipConfig::new()), None);
        assert_eq!(t.content_for(&datum()), "name: a<br/>value: 3<br/>note: null");
    }

    #[test]
    fn chart_default_html_is_used_without_keys() {
        let fallback: HtmlFn = Arc::new(|d| format!("{} = {}", display_value(&d["name"]), display_value(&d["value"])));
        let t = Tooltip::new("c", Some(TooltipConfig::new()), Some(fallback));
        assert_eq!(t.content_for(&datum()), "a = 3");
    }

    #[test]
    fn follows_pointer_and_hides() {
        let mut s = Surface::new("c", 100.0, 100.0);
        let root = s.root();
        s.append(root, Element::line((0.0, 0.0), (0.0, 10.0)))
            .with_class(GUIDE_CLASS);
        let cfg = TooltipConfig::new().with_class_name("tip").with_style("color", "red");
        let mut t = Tooltip::new("chart", Some(cfg), None);

        t.on_mouse_over(Point::new(5.0, 6.0), &datum());
        let node = t.node().cloned().unwrap_or_else(|| panic!("node created on hover"));
        assert_eq!(node.dom_id, "tooltip-chart");
        assert_eq!((node.left, node.top), (15.0, 16.0));
        assert_eq!(node.class, "tip");
        assert!(node.is_visible());

        t.on_mouse_move(Point::new(20.0, 30.0), None);
        assert_eq!(t.node().map(|n| (n.left, n.top)), Some((30.0, 40.0)));

        t.on_mouse_leave(&mut s);
        let node = t.node().cloned().unwrap_or_else(|| panic!("node kept after leave"));
        assert_eq!((node.opacity, node.left), (0.0, HIDDEN_LEFT));
        assert!(s.select_class(GUIDE_CLASS).is_empty());
    }

    #[test]
    fn move_to_new_datum_refreshes_content() {
        let mut t = Tooltip::new("c", Some(TooltipConfig::new().with_keys(["name"])), None);
        t.on_mouse_over(Point::ZERO, &datum());
        let other = record([("name", json!("b"))]);
        t.on_mouse_move(Point::ZERO, Some(&other));
        assert_eq!(t.node().map(|n| n.content.as_str()), Some("name: b"));
    }

    #[test]
    fn move_off_data_before_any_hover_creates_no_node() {
        let mut t = Tooltip::new("c", Some(TooltipConfig::new()), None);
        t.on_mouse_move(Point::new(4.0, 4.0), None);
        assert!(t.node().is_none(), "no node until a datum is hovered");
        t.on_mouse_move(Point::new(4.0, 4.0), Some(&datum()));
        assert!(t.node().is_some_and(TooltipNode::is_visible));
    }

    #[test]
    fn id_change_tears_down() {
        let mut t = Tooltip::new("a", Some(TooltipConfig::new()), None);
        t.on_mouse_over(Point::ZERO, &datum());
        t.set_id("a");
        assert!(t.node().is_some());
        t.set_id("b");
        assert!(t.node().is_none());
        t.on_mouse_over(Point::ZERO, &datum());
        assert_eq!(t.node().map(|n| n.dom_id.as_str()), Some("tooltip-b"));
    }

    #[test]
    fn config_deserializes_without_html() {
        let cfg: TooltipConfig =
            serde_json::from_str(r#"{"className":"tip","keys":["a"],"style":{"z-index":"3"}}"#)
                .unwrap_or_default();
        assert_eq!(cfg.class_name.as_deref(), Some("tip"));
        assert!(cfg.html.is_none());
        assert_eq!(cfg.style.get("z-index").map(String::as_str), Some("3"));
    }
}
