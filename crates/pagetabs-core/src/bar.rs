//! Tab bar
//!
//! Outer scroll container around a [`TabStrip`]. Owns the ordered tab
//! collection, the selection, the horizontal scroll offset and the
//! add/remove/select API.
//!
//! ```text
//! add_tab ──→ strip child + position ──→ select_tab (first tab)
//!                                          │ listener: unselected, selected
//!                                          ├─ layout pending: jump
//!                                          └─ laid out: animate indicator + scroll
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pagetabs_strip::{
    AnimationEvent, Canvas, Easing, FrameClock, IndicatorBounds, SystemClock, TabStrip,
    ValueAnimator, ANIMATION_DURATION,
};
use pagetabs_tabs::{
    ApproxTextMeasurer, ItemStyle, MeasureSpec, Px, Size, Tab, TabGravity, TabMode, TextMeasurer,
};

use crate::config::TabBarConfig;
use crate::listener::OnTabSelectedListener;
use crate::Result;

/// Height (dp) of a bar whose tabs show an icon or a label.
pub const DEFAULT_HEIGHT: i32 = 48;

/// Height (dp) of a bar where some tab shows both an icon and a label.
pub const DEFAULT_HEIGHT_WITH_TEXT_ICON: i32 = 72;

/// Width (dp) kept free next to the widest tab.
pub const TAB_MIN_WIDTH_MARGIN: i32 = 56;

/// Default minimum tab width (dp) in scrollable mode.
pub const SCROLLABLE_TAB_MIN_WIDTH: i32 = 72;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Bar shared between the host and a pager binding.
pub type SharedTabBar = Arc<Mutex<TabBar>>;

pub struct TabBar {
    config: TabBarConfig,
    clock: Arc<dyn FrameClock>,
    tabs: Vec<Tab>,
    selected_tab: Option<Tab>,
    strip: TabStrip,
    mode: TabMode,
    gravity: TabGravity,
    scroll_x: Px,
    scroll_animator: ValueAnimator<Px>,
    listener: Option<Box<dyn OnTabSelectedListener>>,
    measured: Size,
    laid_out: bool,
    layout_requested: bool,
    tab_max_width: Option<Px>,
}

impl TabBar {
    /// Create a bar driven by the system clock.
    pub fn new(config: TabBarConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TabBarConfig, clock: Arc<dyn FrameClock>) -> Result<Self> {
        Self::with_measurer(config, clock, Arc::new(ApproxTextMeasurer::default()))
    }

    pub fn with_measurer(
        config: TabBarConfig,
        clock: Arc<dyn FrameClock>,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Result<Self> {
        config.validate()?;

        let strip = TabStrip::new(
            measurer,
            config.indicator_style(),
            config.density,
            config.layout_direction,
        );
        let mut bar = Self {
            mode: config.mode,
            gravity: config.gravity,
            config,
            clock,
            tabs: Vec::new(),
            selected_tab: None,
            strip,
            scroll_x: 0,
            scroll_animator: ValueAnimator::new(Easing::FAST_OUT_SLOW_IN),
            listener: None,
            measured: Size::default(),
            laid_out: false,
            layout_requested: true,
            tab_max_width: None,
        };
        bar.apply_mode_and_gravity();

        tracing::debug!(mode = ?bar.mode, gravity = ?bar.gravity, "Created tab bar");

        Ok(bar)
    }

    pub fn shared(self) -> SharedTabBar {
        Arc::new(Mutex::new(self))
    }

    /// Create a detached tab. It has no position until added.
    pub fn new_tab(&self) -> Tab {
        Tab::new()
    }

    pub fn config(&self) -> &TabBarConfig {
        &self.config
    }

    /// Install the selection listener, replacing any previous one.
    pub fn set_on_tab_selected_listener(&mut self, listener: Option<Box<dyn OnTabSelectedListener>>) {
        self.listener = listener;
    }

    /// Add a tab at the end. The first tab added to an empty bar is
    /// selected.
    pub fn add_tab(&mut self, tab: Tab) {
        let select = self.tabs.is_empty();
        self.add_tab_with(tab, self.tabs.len(), select);
    }

    pub fn add_tab_at(&mut self, tab: Tab, position: usize) {
        let select = self.tabs.is_empty();
        self.add_tab_with(tab, position, select);
    }

    /// Insert a tab at `position` (clamped to the end) and optionally
    /// select it. A tab that is already attached is ignored.
    pub fn add_tab_with(&mut self, tab: Tab, position: usize, select: bool) {
        if tab.is_attached() {
            tracing::warn!(tab_id = %tab.id(), position = ?tab.position(), "Tab is already attached");
            return;
        }

        let position = position.min(self.tabs.len());
        let style = self.item_style();
        self.strip.add_tab_view(tab.clone(), position, style);
        self.tabs.insert(position, tab.clone());
        self.reindex_from(position);
        self.layout_requested = true;

        tracing::debug!(tab_id = %tab.id(), position, count = self.tabs.len(), "Added tab");

        if select {
            self.select_tab(Some(&tab));
        }
    }

    /// Remove `tab` if it belongs to this bar.
    pub fn remove_tab(&mut self, tab: &Tab) -> Option<Tab> {
        let position = tab.position()?;
        if self.tabs.get(position) != Some(tab) {
            tracing::trace!(tab_id = %tab.id(), "Tab is not attached to this bar");
            return None;
        }
        self.remove_tab_at(position)
    }

    /// Remove the tab at `position`. If it was selected, the tab before it
    /// (or the new first tab) becomes selected.
    pub fn remove_tab_at(&mut self, position: usize) -> Option<Tab> {
        if position >= self.tabs.len() {
            tracing::trace!(position, count = self.tabs.len(), "Remove position out of range");
            return None;
        }

        let selected_position = self.selected_tab_position();
        let now = self.clock.now();

        self.strip.remove_tab_view_at(position, now);
        let removed = self.tabs.remove(position);
        removed.set_position(None);
        self.reindex_from(position);
        self.layout_requested = true;

        tracing::debug!(tab_id = %removed.id(), position, count = self.tabs.len(), "Removed tab");

        if selected_position == Some(position) {
            match self.tabs.get(position.saturating_sub(1)).cloned() {
                Some(next) => self.select_tab(Some(&next)),
                None => {
                    self.selected_tab = None;
                    self.strip.set_selected_tab_view(None);
                }
            }
        }

        Some(removed)
    }

    pub fn remove_all_tabs(&mut self) {
        let now = self.clock.now();
        self.strip.remove_all(now);
        for tab in self.tabs.drain(..) {
            tab.set_position(None);
        }
        self.selected_tab = None;
        if self.scroll_animator.cancel(now).is_some() {
            self.scroll_animator.tick(now);
        }
        self.scroll_x = 0;
        self.layout_requested = true;

        tracing::debug!("Removed all tabs");
    }

    fn reindex_from(&self, start: usize) {
        for (index, tab) in self.tabs.iter().enumerate().skip(start) {
            tab.set_position(Some(index));
        }
    }

    pub fn tab_at(&self, position: usize) -> Option<&Tab> {
        self.tabs.get(position)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected_tab.as_ref()
    }

    pub fn selected_tab_position(&self) -> Option<usize> {
        self.selected_tab.as_ref().and_then(Tab::position)
    }

    /// Selected position, `-1` without a selection.
    pub fn raw_selected_tab_position(&self) -> i32 {
        self.selected_tab
            .as_ref()
            .map_or(Tab::INVALID_POSITION, Tab::raw_position)
    }

    /// Make `tab` the selected tab.
    ///
    /// Selecting the current tab only reports a reselection. Otherwise the
    /// listener hears about the previous and new tab, then the indicator
    /// jumps (nothing was selected, or the bar is waiting for a layout) or
    /// animates.
    pub fn select_tab(&mut self, tab: Option<&Tab>) {
        let Some(tab) = tab else {
            return;
        };
        let Some(position) = tab.position().filter(|p| self.tabs.get(*p) == Some(tab)) else {
            tracing::trace!(tab_id = %tab.id(), "Ignoring selection of a tab outside this bar");
            return;
        };

        if self.selected_tab.as_ref() == Some(tab) {
            tracing::debug!(tab_id = %tab.id(), position, "Tab reselected");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_tab_reselected(tab);
            }
            return;
        }

        let previous = self.selected_tab.replace(tab.clone());
        self.strip.set_selected_tab_view(Some(position));

        tracing::debug!(
            tab_id = %tab.id(),
            position,
            previous = ?previous.as_ref().and_then(Tab::position),
            "Tab selected"
        );

        if let Some(listener) = self.listener.as_mut() {
            if let Some(previous) = previous.as_ref() {
                listener.on_tab_unselected(previous);
            }
            listener.on_tab_selected(tab);
        }

        if previous.as_ref().map_or(true, |p| !p.is_attached()) {
            self.set_scroll_position(position, 0.0, true);
        } else {
            self.animate_to_tab(position);
        }
    }

    /// Drive the indicator and scroll offset from a continuous position,
    /// such as a pager being dragged. Does not change the selection.
    pub fn set_scroll_position(&mut self, position: usize, offset: f32, update_selected_visual: bool) {
        if self.strip.is_indicator_animating() {
            return;
        }
        if position >= self.strip.len() {
            tracing::trace!(position, count = self.strip.len(), "Scroll position out of range");
            return;
        }

        self.strip
            .set_indicator_position_from_tab_position(position, offset);

        let now = self.clock.now();
        if self.scroll_animator.cancel(now).is_some() {
            self.scroll_animator.tick(now);
        }
        self.scroll_x = self.scroll_x_for_tab(position, offset);

        if update_selected_visual {
            let highlighted = (position as f32 + offset).round() as usize;
            self.strip.set_selected_tab_view(Some(highlighted));
        }
    }

    fn animate_to_tab(&mut self, position: usize) {
        if !self.laid_out || self.layout_requested || self.strip.children_need_layout() {
            self.set_scroll_position(position, 0.0, true);
            return;
        }

        let now = self.clock.now();
        if let Some((current, _)) = self.scroll_animator.cancel(now) {
            self.scroll_animator.tick(now);
            self.scroll_x = current;
        }

        let start = self.scroll_x;
        let target = self.scroll_x_for_tab(position, 0.0);
        if start != target {
            self.scroll_animator
                .start(start, target, now, ANIMATION_DURATION);
        }

        self.strip
            .animate_indicator_to_position(position, ANIMATION_DURATION, now);
    }

    /// Scroll offset that centers the (blended) tab at `position`.
    fn scroll_x_for_tab(&self, position: usize, offset: f32) -> Px {
        if self.mode != TabMode::Scrollable {
            return 0;
        }
        let Some(selected) = self.strip.child(position) else {
            return 0;
        };
        let selected_width = selected.width();
        let next_width = self.strip.child(position + 1).map_or(0, |c| c.width());

        let x = selected.left()
            + ((selected_width + next_width) as f32 * offset * 0.5) as Px
            + selected_width / 2
            - self.measured.width / 2;

        x.clamp(0, self.max_scroll_x())
    }

    fn max_scroll_x(&self) -> Px {
        (self.strip.size().width - self.measured.width).max(0)
    }

    pub fn tab_mode(&self) -> TabMode {
        self.mode
    }

    pub fn set_tab_mode(&mut self, mode: TabMode) {
        if self.mode != mode {
            self.mode = mode;
            self.apply_mode_and_gravity();
        }
    }

    pub fn tab_gravity(&self) -> TabGravity {
        self.gravity
    }

    pub fn set_tab_gravity(&mut self, gravity: TabGravity) {
        if self.gravity != gravity {
            self.gravity = gravity;
            self.apply_mode_and_gravity();
        }
    }

    fn apply_mode_and_gravity(&mut self) {
        let padding_start = match self.mode {
            TabMode::Scrollable => {
                (self.config.dp(self.config.content_inset_start) - self.config.padding().start)
                    .max(0)
            }
            TabMode::Fixed => 0,
        };
        self.strip.configure(self.mode, self.gravity, padding_start);
        let style = self.item_style();
        self.strip.update_item_styles(&style);
        self.layout_requested = true;

        tracing::debug!(mode = ?self.mode, gravity = ?self.gravity, padding_start, "Applied tab mode");
    }

    /// Whether the host should measure and lay the bar out again before
    /// the next frame. Cleared by [`TabBar::layout`].
    pub fn is_layout_requested(&self) -> bool {
        self.layout_requested
    }

    /// Widest a tab may grow, once a width constraint has been seen.
    pub fn tab_max_width(&self) -> Option<Px> {
        self.tab_max_width
    }

    pub fn tab_min_width(&self) -> Px {
        match self.config.tab_min_width {
            Some(min) => self.config.dp(min),
            None if self.mode == TabMode::Scrollable => self.config.dp(SCROLLABLE_TAB_MIN_WIDTH),
            None => 0,
        }
    }

    fn item_style(&self) -> ItemStyle {
        ItemStyle {
            padding: self.config.padding(),
            text_size: self.config.density.sp(self.config.text_size),
            multi_line_text_size: self.config.density.sp(self.config.multi_line_text_size),
            text_colors: self.config.text_colors(),
            max_width: self.tab_max_width,
            min_width: self.tab_min_width(),
            mode: self.mode,
            background: self.config.tab_background,
        }
    }

    fn default_height(&self) -> Px {
        if let Some(height) = self.config.default_height {
            return self.config.dp(height);
        }
        let with_icon_and_text = self.tabs.iter().any(Tab::has_icon_and_text);
        self.config.dp(if with_icon_and_text {
            DEFAULT_HEIGHT_WITH_TEXT_ICON
        } else {
            DEFAULT_HEIGHT
        })
    }

    pub fn measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> Size {
        let ideal_height = self.default_height();
        let height_spec = match height_spec {
            MeasureSpec::AtMost(size) => MeasureSpec::Exactly(ideal_height.min(size)),
            MeasureSpec::Unspecified => MeasureSpec::Exactly(ideal_height),
            exact => exact,
        };

        if let Some(spec_width) = width_spec.size() {
            let max_width = match self.config.tab_max_width.filter(|w| *w > 0) {
                Some(requested) => self.config.dp(requested),
                None => spec_width - self.config.dp(TAB_MIN_WIDTH_MARGIN),
            };
            if self.tab_max_width != Some(max_width) {
                self.tab_max_width = Some(max_width);
                let style = self.item_style();
                self.strip.update_item_styles(&style);
            }
        }

        let strip = self.strip.measure(MeasureSpec::Unspecified, height_spec);
        let width = width_spec.resolve(strip.width);
        let height = height_spec.resolve(strip.height);

        let remeasure = match self.mode {
            TabMode::Scrollable => strip.width < width,
            TabMode::Fixed => strip.width != width,
        };
        if remeasure {
            self.strip.measure(MeasureSpec::Exactly(width), height_spec);
        }

        self.measured = Size::new(width, height);
        self.measured
    }

    pub fn measured(&self) -> Size {
        self.measured
    }

    /// Lay the strip out at its measured width. The bar itself is
    /// `measured().width` wide and scrolls over it.
    pub fn layout(&mut self) {
        let now = self.clock.now();
        let strip = self.strip.measured();
        self.strip
            .layout(strip.width.max(self.measured.width), self.measured.height, now);
        self.laid_out = true;
        self.layout_requested = false;
        self.scroll_x = self.scroll_x.clamp(0, self.max_scroll_x());
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.strip.draw(canvas, self.scroll_x);
    }

    /// Handle a tap at bar-local `x`. Returns the tapped tab's position.
    pub fn click_at(&mut self, x: Px) -> Option<usize> {
        let position = self.strip.hit_test(x + self.scroll_x)?;
        let tab = self.tabs.get(position)?.clone();

        if self.config.show_selected_tab_animation && self.selected_tab.as_ref() != Some(&tab) {
            let now = self.clock.now();
            self.strip.pulse_icon(position, now);
        }
        self.select_tab(Some(&tab));

        Some(position)
    }

    /// Advance every running animation to the clock's current time.
    /// Returns whether another frame is needed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let strip = self.strip.tick(now);

        let scroll = match self.scroll_animator.tick(now) {
            Some(AnimationEvent::Frame(x)) => {
                self.scroll_x = x;
                true
            }
            Some(AnimationEvent::Finished(x)) | Some(AnimationEvent::Cancelled(x)) => {
                self.scroll_x = x;
                false
            }
            None => false,
        };

        tracing::trace!(scroll_x = self.scroll_x, bounds = ?self.strip.indicator_bounds(), "Tick");

        strip || scroll
    }

    pub fn is_animating(&self) -> bool {
        self.strip.is_animating() || self.scroll_animator.is_running()
    }

    /// When the host should call [`TabBar::tick`] next.
    pub fn next_frame_deadline(&self) -> Option<Instant> {
        self.is_animating()
            .then(|| self.clock.now() + FRAME_INTERVAL)
    }

    pub fn scroll_x(&self) -> Px {
        self.scroll_x
    }

    pub fn indicator_bounds(&self) -> Option<IndicatorBounds> {
        self.strip.indicator_bounds()
    }

    pub fn indicator_position(&self) -> Option<f32> {
        self.strip.indicator().position()
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }
}

impl std::fmt::Debug for TabBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabBar")
            .field("tabs", &self.tabs.len())
            .field("selected", &self.selected_tab_position())
            .field("mode", &self.mode)
            .field("gravity", &self.gravity)
            .field("scroll_x", &self.scroll_x)
            .field("strip", &self.strip)
            .finish()
    }
}
