//! Paged container binding
//!
//! Keeps a [`TabBar`] and a paged container in step:
//! ```text
//! pager ──scrolled/selected──→ TabBarOnPageChangeListener ──→ bar
//! bar   ──tab selected──────→ PagerOnTabSelectedListener  ──→ pager
//! ```
//! Each listener holds a `Weak` to its target and goes quiet once the
//! target is dropped. An event that comes back around to its source finds
//! the source locked and is dropped, so neither side fires twice.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use pagetabs_tabs::{Px, Tab};

use crate::bar::{SharedTabBar, TabBar};
use crate::error::TabBarError;
use crate::listener::OnTabSelectedListener;
use crate::Result;

/// Supplies page count and titles to a paged container.
pub trait PagerAdapter: Send {
    fn count(&self) -> usize;

    fn page_title(&self, position: usize) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    /// The user is dragging
    Dragging,
    /// Moving to a final position without user input
    Settling,
}

pub trait OnPageChangeListener: Send {
    /// `offset` is in `[0, 1)` toward `position + 1`.
    fn on_page_scrolled(&mut self, position: usize, offset: f32, offset_px: Px);

    fn on_page_selected(&mut self, position: usize);

    fn on_page_scroll_state_changed(&mut self, state: ScrollState);
}

/// Host container that pages through content.
pub trait PagedContainer: Send {
    fn adapter(&self) -> Option<&dyn PagerAdapter>;

    fn current_item(&self) -> usize;

    fn set_current_item(&mut self, item: usize);

    fn add_on_page_change_listener(&mut self, listener: Box<dyn OnPageChangeListener>);
}

/// Forwards pager movement to a tab bar.
pub struct TabBarOnPageChangeListener {
    bar: Weak<Mutex<TabBar>>,
    previous_state: ScrollState,
    state: ScrollState,
}

impl TabBarOnPageChangeListener {
    pub fn new(bar: &SharedTabBar) -> Self {
        Self {
            bar: Arc::downgrade(bar),
            previous_state: ScrollState::Idle,
            state: ScrollState::Idle,
        }
    }

    /// Only a drag, or the settle that follows one, moves the highlight.
    fn follows_drag(&self) -> bool {
        self.state == ScrollState::Dragging
            || (self.state == ScrollState::Settling && self.previous_state == ScrollState::Dragging)
    }
}

impl OnPageChangeListener for TabBarOnPageChangeListener {
    fn on_page_scrolled(&mut self, position: usize, offset: f32, _offset_px: Px) {
        let Some(bar) = self.bar.upgrade() else {
            return;
        };
        let Some(mut bar) = bar.try_lock() else {
            tracing::trace!(position, "Tab bar busy, skipping page scroll");
            return;
        };
        bar.set_scroll_position(position, offset, self.follows_drag());
    }

    fn on_page_selected(&mut self, position: usize) {
        let Some(bar) = self.bar.upgrade() else {
            return;
        };
        let Some(mut bar) = bar.try_lock() else {
            tracing::trace!(position, "Tab bar busy, skipping page selection");
            return;
        };
        if bar.selected_tab_position() != Some(position) {
            if let Some(tab) = bar.tab_at(position).cloned() {
                bar.select_tab(Some(&tab));
            }
        }
    }

    fn on_page_scroll_state_changed(&mut self, state: ScrollState) {
        self.previous_state = self.state;
        self.state = state;
    }
}

/// Moves a pager to whichever tab gets selected.
pub struct PagerOnTabSelectedListener<P> {
    pager: Weak<Mutex<P>>,
}

impl<P: PagedContainer> PagerOnTabSelectedListener<P> {
    pub fn new(pager: &Arc<Mutex<P>>) -> Self {
        Self {
            pager: Arc::downgrade(pager),
        }
    }
}

impl<P: PagedContainer> OnTabSelectedListener for PagerOnTabSelectedListener<P> {
    fn on_tab_selected(&mut self, tab: &Tab) {
        let Some(position) = tab.position() else {
            return;
        };
        let Some(pager) = self.pager.upgrade() else {
            return;
        };
        let Some(mut pager) = pager.try_lock() else {
            tracing::trace!(position, "Pager busy, skipping tab selection");
            return;
        };
        pager.set_current_item(position);
    }
}

impl TabBar {
    /// Bind `bar` to `pager`.
    ///
    /// Replaces the bar's tabs with one tab per page, titled from the
    /// adapter, or cycles through `tabs` when given. Templates that are
    /// used more than once are duplicated. Installs both listeners and
    /// selects the pager's current page.
    pub fn setup_with_pager<P: PagedContainer + 'static>(
        bar: &SharedTabBar,
        pager: &Arc<Mutex<P>>,
        tabs: Option<&[Tab]>,
    ) -> Result<()> {
        let (titles, current) = {
            let pager = pager.lock();
            let adapter = pager.adapter().ok_or(TabBarError::MissingAdapter)?;
            let titles: Vec<Option<String>> =
                (0..adapter.count()).map(|i| adapter.page_title(i)).collect();
            (titles, pager.current_item())
        };
        let count = titles.len();

        {
            let mut bar = bar.lock();
            bar.remove_all_tabs();

            match tabs.filter(|templates| !templates.is_empty()) {
                Some(templates) => {
                    for i in 0..count {
                        let template = &templates[i % templates.len()];
                        let tab = if template.is_attached() {
                            template.duplicate()
                        } else {
                            template.clone()
                        };
                        bar.add_tab(tab);
                    }
                }
                None => {
                    for title in titles {
                        let tab = bar.new_tab();
                        tab.set_text(title);
                        bar.add_tab(tab);
                    }
                }
            }
        }

        pager
            .lock()
            .add_on_page_change_listener(Box::new(TabBarOnPageChangeListener::new(bar)));

        let mut bar = bar.lock();
        bar.set_on_tab_selected_listener(Some(Box::new(PagerOnTabSelectedListener::new(pager))));

        if count > 0 && bar.selected_tab_position() != Some(current) {
            if let Some(tab) = bar.tab_at(current).cloned() {
                bar.select_tab(Some(&tab));
            }
        }

        tracing::debug!(pages = count, current, "Bound tab bar to pager");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabBarConfig;
    use pagetabs_strip::ManualClock;
    use pagetabs_tabs::{ApproxTextMeasurer, MeasureSpec};

    struct TitledPages(Vec<String>);

    impl PagerAdapter for TitledPages {
        fn count(&self) -> usize {
            self.0.len()
        }

        fn page_title(&self, position: usize) -> Option<String> {
            self.0.get(position).cloned()
        }
    }

    #[derive(Default)]
    struct MockPager {
        adapter: Option<TitledPages>,
        current: usize,
        listeners: Vec<Box<dyn OnPageChangeListener>>,
        set_calls: Vec<usize>,
    }

    impl MockPager {
        fn with_pages(count: usize) -> Self {
            Self {
                adapter: Some(TitledPages(
                    (0..count).map(|i| format!("Page {i}")).collect(),
                )),
                ..Self::default()
            }
        }

        fn set_state(&mut self, state: ScrollState) {
            for listener in &mut self.listeners {
                listener.on_page_scroll_state_changed(state);
            }
        }

        fn scrolled(&mut self, position: usize, offset: f32) {
            for listener in &mut self.listeners {
                listener.on_page_scrolled(position, offset, 0);
            }
        }

        fn select(&mut self, item: usize) {
            self.current = item;
            for listener in &mut self.listeners {
                listener.on_page_selected(item);
            }
        }

        /// A user drag from the current page to the next one.
        fn swipe_forward(&mut self) {
            let from = self.current;
            self.set_state(ScrollState::Dragging);
            self.scrolled(from, 0.3);
            self.scrolled(from, 0.6);
            self.set_state(ScrollState::Settling);
            self.select(from + 1);
            self.scrolled(from, 0.9);
            self.scrolled(from + 1, 0.0);
            self.set_state(ScrollState::Idle);
        }
    }

    impl PagedContainer for MockPager {
        fn adapter(&self) -> Option<&dyn PagerAdapter> {
            self.adapter.as_ref().map(|a| a as &dyn PagerAdapter)
        }

        fn current_item(&self) -> usize {
            self.current
        }

        fn set_current_item(&mut self, item: usize) {
            self.set_calls.push(item);
            if item != self.current {
                self.set_state(ScrollState::Settling);
                self.select(item);
                self.set_state(ScrollState::Idle);
            }
        }

        fn add_on_page_change_listener(&mut self, listener: Box<dyn OnPageChangeListener>) {
            self.listeners.push(listener);
        }
    }

    fn shared_bar() -> SharedTabBar {
        TabBar::with_measurer(
            TabBarConfig::default(),
            Arc::new(ManualClock::new()),
            Arc::new(ApproxTextMeasurer::new(0.5, 1.0)),
        )
        .unwrap()
        .shared()
    }

    fn bound(pages: usize, current: usize) -> (SharedTabBar, Arc<Mutex<MockPager>>) {
        let bar = shared_bar();
        let pager = Arc::new(Mutex::new(MockPager {
            current,
            ..MockPager::with_pages(pages)
        }));
        TabBar::setup_with_pager(&bar, &pager, None).unwrap();
        {
            let mut bar = bar.lock();
            bar.measure(MeasureSpec::Exactly(300), MeasureSpec::Unspecified);
            bar.layout();
        }
        pager.lock().set_calls.clear();
        (bar, pager)
    }

    #[test]
    fn test_missing_adapter() {
        let bar = shared_bar();
        let pager = Arc::new(Mutex::new(MockPager::default()));
        let err = TabBar::setup_with_pager(&bar, &pager, None).unwrap_err();
        assert!(matches!(err, TabBarError::MissingAdapter));
    }

    #[test]
    fn test_populates_titled_tabs() {
        let (bar, pager) = bound(3, 0);
        let bar = bar.lock();
        let titles: Vec<String> = bar.tabs().iter().filter_map(Tab::text).collect();
        assert_eq!(titles, vec!["Page 0", "Page 1", "Page 2"]);
        assert_eq!(bar.selected_tab_position(), Some(0));
        assert_eq!(pager.lock().listeners.len(), 1);
    }

    #[test]
    fn test_syncs_to_current_item() {
        let bar = shared_bar();
        let pager = Arc::new(Mutex::new(MockPager {
            current: 2,
            ..MockPager::with_pages(3)
        }));
        TabBar::setup_with_pager(&bar, &pager, None).unwrap();

        assert_eq!(bar.lock().selected_tab_position(), Some(2));
        // Selecting tab 2 forwards once to the pager, which is already on
        // page 2 and does not select it again.
        assert_eq!(pager.lock().set_calls, vec![2]);
        assert_eq!(pager.lock().current, 2);
    }

    #[test]
    fn test_replaces_existing_tabs() {
        let bar = shared_bar();
        {
            let mut bar = bar.lock();
            for text in ["Old", "Stale"] {
                let tab = bar.new_tab().with_text(text);
                bar.add_tab(tab);
            }
        }
        let old = bar.lock().tab_at(0).cloned().unwrap();

        let pager = Arc::new(Mutex::new(MockPager::with_pages(3)));
        TabBar::setup_with_pager(&bar, &pager, None).unwrap();

        assert_eq!(bar.lock().tab_count(), 3);
        assert!(!old.is_attached());
    }

    #[test]
    fn test_cycles_supplied_tabs() {
        let bar = shared_bar();
        let pager = Arc::new(Mutex::new(MockPager::with_pages(3)));
        let templates = vec![Tab::new().with_text("Cup"), Tab::new().with_text("Cake")];
        TabBar::setup_with_pager(&bar, &pager, Some(templates.as_slice())).unwrap();

        let bar = bar.lock();
        let texts: Vec<String> = bar.tabs().iter().filter_map(Tab::text).collect();
        assert_eq!(texts, vec!["Cup", "Cake", "Cup"]);
        assert_eq!(bar.tab_at(0), Some(&templates[0]));
        assert_ne!(bar.tab_at(2), Some(&templates[0]));
        assert_eq!(templates[0].position(), Some(0));
        for (index, tab) in bar.tabs().iter().enumerate() {
            assert_eq!(tab.position(), Some(index));
        }
    }

    #[test]
    fn test_empty_template_slice_uses_titles() {
        let bar = shared_bar();
        let pager = Arc::new(Mutex::new(MockPager::with_pages(2)));
        TabBar::setup_with_pager(&bar, &pager, Some(&[][..])).unwrap();
        assert_eq!(
            bar.lock().tab_at(1).and_then(Tab::text),
            Some("Page 1".to_string())
        );
    }

    #[test]
    fn test_tab_selection_moves_pager_once() {
        let (bar, pager) = bound(3, 0);
        let tab = bar.lock().tab_at(2).cloned().unwrap();
        bar.lock().select_tab(Some(&tab));

        let pager = pager.lock();
        assert_eq!(pager.set_calls, vec![2]);
        assert_eq!(pager.current, 2);
        assert_eq!(bar.lock().selected_tab_position(), Some(2));
    }

    #[test]
    fn test_tab_click_moves_pager() {
        let (bar, pager) = bound(3, 0);
        assert_eq!(bar.lock().click_at(150), Some(1));
        assert_eq!(pager.lock().current, 1);
        assert_eq!(pager.lock().set_calls, vec![1]);
    }

    #[test]
    fn test_swipe_selects_tab_without_echo() {
        let (bar, pager) = bound(3, 0);
        pager.lock().swipe_forward();

        let bar = bar.lock();
        assert_eq!(bar.selected_tab_position(), Some(1));
        assert_eq!(bar.strip().highlighted(), Some(1));
        assert!(pager.lock().set_calls.is_empty());
    }

    #[test]
    fn test_drag_moves_indicator_and_highlight() {
        let (bar, pager) = bound(3, 0);
        {
            let mut pager = pager.lock();
            pager.set_state(ScrollState::Dragging);
            pager.scrolled(0, 0.5);
        }

        let bar = bar.lock();
        assert_eq!(bar.indicator_position(), Some(0.5));
        assert_eq!(bar.strip().highlighted(), Some(1));
        assert_eq!(bar.selected_tab_position(), Some(0));
    }

    #[test]
    fn test_settle_without_drag_leaves_highlight() {
        let (bar, pager) = bound(3, 0);
        {
            let mut pager = pager.lock();
            pager.set_state(ScrollState::Settling);
            pager.scrolled(0, 0.7);
        }

        let bar = bar.lock();
        assert_eq!(bar.indicator_position(), Some(0.7));
        assert_eq!(bar.strip().highlighted(), Some(0));
    }

    /// Records selections, then forwards them to the pager.
    struct RecordingForwarder {
        selected: Arc<Mutex<Vec<usize>>>,
        inner: PagerOnTabSelectedListener<MockPager>,
    }

    impl OnTabSelectedListener for RecordingForwarder {
        fn on_tab_selected(&mut self, tab: &Tab) {
            self.selected.lock().extend(tab.position());
            self.inner.on_tab_selected(tab);
        }
    }

    #[test]
    fn test_matching_page_selection_fires_once() {
        let (bar, pager) = bound(3, 0);
        let selected = Arc::new(Mutex::new(Vec::new()));
        bar.lock().set_on_tab_selected_listener(Some(Box::new(RecordingForwarder {
            selected: selected.clone(),
            inner: PagerOnTabSelectedListener::new(&pager),
        })));

        pager.lock().select(1);
        pager.lock().select(1);

        assert_eq!(*selected.lock(), vec![1]);
        assert_eq!(bar.lock().selected_tab_position(), Some(1));
        assert!(pager.lock().set_calls.is_empty());
    }

    #[test]
    fn test_dropped_pager_is_ignored() {
        let (bar, pager) = bound(3, 0);
        let weak = Arc::downgrade(&pager);
        drop(pager);
        assert!(weak.upgrade().is_none());

        let mut bar = bar.lock();
        assert_eq!(bar.click_at(150), Some(1));
        assert_eq!(bar.selected_tab_position(), Some(1));
    }

    #[test]
    fn test_dropped_bar_is_ignored() {
        let (bar, pager) = bound(3, 0);
        drop(bar);
        pager.lock().swipe_forward();
        assert_eq!(pager.lock().current, 1);
    }
}
