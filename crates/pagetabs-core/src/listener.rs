//! Selection callbacks

use pagetabs_tabs::Tab;

/// Receives selection changes from a [`crate::TabBar`].
///
/// Callbacks run synchronously inside `select_tab`, before any animation
/// frame is produced.
pub trait OnTabSelectedListener: Send {
    fn on_tab_selected(&mut self, tab: &Tab);

    fn on_tab_unselected(&mut self, _tab: &Tab) {}

    /// The already-selected tab was selected again.
    fn on_tab_reselected(&mut self, _tab: &Tab) {}
}
