//! pagetabs demo
//!
//! Drives a bar with four icon tabs bound to a simulated pager and logs
//! every animation frame. Run with `RUST_LOG=debug` to see the bar's own
//! selection and layout events.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use pagetabs_core::{
    Canvas, Color, Icon, ManualClock, MeasureSpec, OnPageChangeListener, PagedContainer,
    PagerAdapter, Rect, ScrollState, Size, TabBar, TabBarConfig,
};

const CONFIG: &str = r#"{
    "mode": "fixed",
    "gravity": "fill",
    "indicator_gravity": "bottom",
    "indicator_height": 3,
    "indicator_color": 4294940672,
    "show_selected_tab_animation": true
}"#;

const FRAME: Duration = Duration::from_millis(16);

struct Foods;

impl PagerAdapter for Foods {
    fn count(&self) -> usize {
        4
    }

    fn page_title(&self, position: usize) -> Option<String> {
        ["Cup", "Cake", "Apple", "Hamburger"]
            .get(position)
            .map(|title| title.to_string())
    }
}

#[derive(Default)]
struct DemoPager {
    adapter: Option<Foods>,
    current: usize,
    listeners: Vec<Box<dyn OnPageChangeListener>>,
}

impl DemoPager {
    fn state(&mut self, state: ScrollState) {
        for listener in &mut self.listeners {
            listener.on_page_scroll_state_changed(state);
        }
    }

    fn scrolled(&mut self, position: usize, offset: f32) {
        for listener in &mut self.listeners {
            listener.on_page_scrolled(position, offset, 0);
        }
    }

    fn selected(&mut self, position: usize) {
        self.current = position;
        for listener in &mut self.listeners {
            listener.on_page_selected(position);
        }
    }

    /// Simulate the user swiping one page forward.
    fn swipe_forward(&mut self) {
        let from = self.current;
        self.state(ScrollState::Dragging);
        for step in 1..=5 {
            self.scrolled(from, step as f32 * 0.1);
        }
        self.state(ScrollState::Settling);
        self.selected(from + 1);
        self.state(ScrollState::Idle);
    }
}

impl PagedContainer for DemoPager {
    fn adapter(&self) -> Option<&dyn PagerAdapter> {
        self.adapter.as_ref().map(|a| a as &dyn PagerAdapter)
    }

    fn current_item(&self) -> usize {
        self.current
    }

    fn set_current_item(&mut self, item: usize) {
        if item != self.current {
            tracing::info!(item, "Pager moved");
            self.state(ScrollState::Settling);
            self.selected(item);
            self.state(ScrollState::Idle);
        }
    }

    fn add_on_page_change_listener(&mut self, listener: Box<dyn OnPageChangeListener>) {
        self.listeners.push(listener);
    }
}

struct LogCanvas;

impl Canvas for LogCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        tracing::info!(
            left = rect.left,
            top = rect.top,
            right = rect.right,
            bottom = rect.bottom,
            color = %format!("#{:08X}", color.0),
            "Indicator"
        );
    }
}

fn run_frames(bar: &Mutex<TabBar>, clock: &ManualClock) {
    let mut frames = 0;
    loop {
        let mut bar = bar.lock();
        if bar.next_frame_deadline().is_none() {
            break;
        }
        clock.advance(FRAME);
        bar.tick();
        frames += 1;
        bar.draw(&mut LogCanvas);
    }
    tracing::info!(frames, "Animations settled");
}

fn main() -> anyhow::Result<()> {
    pagetabs_core::init_logging();

    let config = TabBarConfig::from_json(CONFIG)?;
    let clock = Arc::new(ManualClock::new());
    let bar = TabBar::with_clock(config, clock.clone())?.shared();

    let pager = Arc::new(Mutex::new(DemoPager {
        adapter: Some(Foods),
        ..DemoPager::default()
    }));
    TabBar::setup_with_pager(&bar, &pager, None)?;

    {
        let mut bar = bar.lock();
        for (resource, tab) in bar.tabs().iter().enumerate() {
            tab.set_icon(Some(Icon::new(resource as u32, Size::new(24, 24))));
        }
        if bar.is_layout_requested() {
            let size = bar.measure(MeasureSpec::Exactly(360), MeasureSpec::Unspecified);
            bar.layout();
            tracing::info!(width = size.width, height = size.height, tabs = bar.tab_count(), "Laid out");
        }
        bar.draw(&mut LogCanvas);
    }

    // Tap the third tab: the pager follows and the indicator animates.
    let tapped = bar.lock().click_at(200);
    tracing::info!(?tapped, current = pager.lock().current_item(), "Tapped");
    run_frames(&bar, &clock);

    // Swipe forward: the bar follows the pager.
    pager.lock().swipe_forward();
    {
        let bar = bar.lock();
        tracing::info!(
            selected = ?bar.selected_tab_position(),
            indicator = ?bar.indicator_position(),
            "Swiped"
        );
    }
    run_frames(&bar, &clock);

    Ok(())
}
