//! Tabbed views with a single-active invariant.
//!
//! The controller owns a fixed set of views, each with a tab button in the
//! main button bar, plus the render set ("layers") the display draws from.
//! Switching hides every other view and shows the target, so after every
//! call exactly one view is in the render set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PortalError, Result};
use crate::geometry::{Button, Point, TouchLatch};

/// View identifier, numbered from 1 in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u8);

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a view renders when visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Latest value received on the subscribed cloud feed.
    #[default]
    Feed,
    /// Temperature reading plus the history chart and its controls.
    Chart,
    /// Touch point, host CPU temperature and clock.
    Info,
}

/// One entry of the tab bar.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id:   ViewId,
    pub kind: ViewKind,
    pub tab:  Button,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind, tab: Button) -> Self {
        Self { id, kind, tab }
    }
}

#[derive(Debug, Clone)]
pub struct ViewController {
    views:   Vec<View>,
    /// Render set, in the order views were revealed.
    layers:  Vec<ViewId>,
    current: ViewId,
    latch:   TouchLatch,
}

impl ViewController {
    /// Build the controller and show `initial`.
    ///
    /// Fails when `views` is empty, contains duplicate ids, or does not
    /// contain `initial`.
    pub fn new(views: Vec<View>, initial: ViewId) -> Result<Self> {
        if views.is_empty() {
            return Err(PortalError::Config("at least one view is required".into()));
        }
        for (i, v) in views.iter().enumerate() {
            if views[..i].iter().any(|w| w.id == v.id) {
                return Err(PortalError::Config(format!("duplicate view id {}", v.id)));
            }
        }

        let mut controller = Self {
            views,
            layers: Vec::new(),
            current: initial,
            latch: TouchLatch::new(),
        };
        controller.switch_view(initial)?;
        Ok(controller)
    }

    /// Make `target` the only visible view.
    ///
    /// Every other tab is marked `selected` (drawn as an inactive tab) and
    /// the target's tab is cleared, matching the tab bar's inverted
    /// convention.  Calling it with the current view is a no-op.
    pub fn switch_view(&mut self, target: ViewId) -> Result<()> {
        if !self.views.iter().any(|v| v.id == target) {
            return Err(PortalError::UnknownView(target.0));
        }

        let others: Vec<ViewId> = self
            .views
            .iter()
            .map(|v| v.id)
            .filter(|id| *id != target)
            .collect();
        for id in others {
            self.hide_layer(id);
        }

        for view in &mut self.views {
            view.tab.selected = view.id != target;
        }

        self.show_layer(target);
        self.current = target;
        debug!("view {target} on");
        Ok(())
    }

    /// Route one touch sample to the tab bar.
    ///
    /// Returns the newly shown view when the touch switched views.  After a
    /// switch all samples are ignored until the touch is released, so a
    /// single press never registers twice.
    pub fn handle_touch(&mut self, point: Option<Point>) -> Option<ViewId> {
        let p = self.latch.sample(point)?;

        let target = self
            .views
            .iter()
            .find(|v| v.tab.contains(p) && v.id != self.current)
            .map(|v| v.id)?;

        self.switch_view(target).ok()?;
        self.latch.latch();
        Some(target)
    }

    #[must_use]
    pub fn current(&self) -> ViewId {
        self.current
    }

    /// The current view's entry.
    #[must_use]
    pub fn current_view(&self) -> &View {
        self.views
            .iter()
            .find(|v| v.id == self.current)
            .unwrap_or(&self.views[0])
    }

    #[must_use]
    pub fn is_visible(&self, id: ViewId) -> bool {
        self.layers.contains(&id)
    }

    /// Number of views currently in the render set (always 1).
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.layers.len()
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Whether a view of `kind` is the visible one.
    #[must_use]
    pub fn shows(&self, kind: ViewKind) -> bool {
        self.current_view().kind == kind
    }

    // ── Render set ────────────────────────────────────────────────────────────

    /// Remove a layer if present, else nothing.
    fn hide_layer(&mut self, id: ViewId) {
        if let Some(pos) = self.layers.iter().position(|l| *l == id) {
            self.layers.remove(pos);
        }
    }

    /// Append a layer unless it is already shown.
    fn show_layer(&mut self, id: ViewId) {
        if !self.layers.contains(&id) {
            self.layers.push(id);
        }
    }
}
