//! pagetabs Tabs
//!
//! The tab entity and the per-tab item view. A [`Tab`] is a shared handle
//! the caller creates up front; the owning bar assigns its position. A
//! [`TabItemView`] wraps one tab's icon and label and measures itself
//! against a read-only [`ItemStyle`] snapshot.

mod geometry;
mod item;
mod style;
mod tab;
mod text;

pub use geometry::{Density, MeasureSpec, Padding, Px, Rect, Size};
pub use item::TabItemView;
pub use style::{Color, ItemStyle, LayoutDirection, TabGravity, TabMode, TextColors};
pub use tab::{Icon, Tab, TabId};
pub use text::{ApproxTextMeasurer, TextLayout, TextMeasurer};
