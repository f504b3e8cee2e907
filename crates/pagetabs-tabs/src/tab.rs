//! Tab data structure
//!
//! A tab displays:
//! - Icon (optional)
//! - Label (optional)
//!
//! and carries the position assigned by the bar it is attached to.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    fn new() -> Self {
        TabId(Uuid::new_v4())
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque drawable handle. The host resolves `resource` when painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub resource: u32,
    /// Intrinsic size in px
    pub size: Size,
}

impl Icon {
    pub const fn new(resource: u32, size: Size) -> Self {
        Self { resource, size }
    }
}

#[derive(Debug, Default)]
struct TabData {
    icon: Option<Icon>,
    text: Option<String>,
    position: Option<usize>,
}

/// Shared handle to a tab.
///
/// Clones refer to the same tab; equality is identity. A tab is created
/// detached and only acquires a position once a bar adds it.
#[derive(Debug, Clone)]
pub struct Tab {
    id: TabId,
    data: Arc<RwLock<TabData>>,
}

impl Tab {
    /// Raw position of a detached tab
    pub const INVALID_POSITION: i32 = -1;

    pub fn new() -> Self {
        Self {
            id: TabId::new(),
            data: Arc::new(RwLock::new(TabData::default())),
        }
    }

    pub fn with_icon(self, icon: Icon) -> Self {
        self.set_icon(Some(icon));
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(Some(text.into()));
        self
    }

    pub fn set_icon(&self, icon: Option<Icon>) -> &Self {
        self.data.write().icon = icon;
        self
    }

    pub fn set_text(&self, text: Option<String>) -> &Self {
        self.data.write().text = text;
        self
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn icon(&self) -> Option<Icon> {
        self.data.read().icon
    }

    pub fn text(&self) -> Option<String> {
        self.data.read().text.clone()
    }

    /// True when the tab shows an icon above a non-empty label.
    pub fn has_icon_and_text(&self) -> bool {
        let data = self.data.read();
        data.icon.is_some() && data.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Index within the owning bar, `None` while detached.
    pub fn position(&self) -> Option<usize> {
        self.data.read().position
    }

    /// Position as an integer, [`Tab::INVALID_POSITION`] while detached.
    pub fn raw_position(&self) -> i32 {
        self.position()
            .map_or(Self::INVALID_POSITION, |p| p as i32)
    }

    pub fn is_attached(&self) -> bool {
        self.position().is_some()
    }

    /// Called by the owning bar whenever the tab's index changes.
    pub fn set_position(&self, position: Option<usize>) {
        self.data.write().position = position;
    }

    /// A detached tab with a fresh identity and the same icon and label.
    pub fn duplicate(&self) -> Tab {
        let data = self.data.read();
        let copy = Tab::new();
        {
            let mut target = copy.data.write();
            target.icon = data.icon;
            target.text = data.text.clone();
        }
        copy
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Tab {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tab {}
