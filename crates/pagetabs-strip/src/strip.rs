//! Tab strip
//!
//! Horizontal row of [`TabItemView`]s. Owns the measurement pass that picks
//! between content-fit and equal-width tabs, the child layout (including
//! RTL mirroring), the selected-child highlight, the selection indicator
//! and the icon pulse played on tap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pagetabs_tabs::{
    Color, Density, ItemStyle, LayoutDirection, MeasureSpec, Px, Rect, Size, Tab, TabGravity,
    TabId, TabItemView, TabMode, TextMeasurer,
};

use crate::animation::{AnimationEvent, ValueAnimator};
use crate::easing::Easing;
use crate::indicator::{Indicator, IndicatorBounds, IndicatorStyle};

/// Duration of discrete indicator and scroll animations.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Duration of the selected-icon pulse.
pub const ICON_PULSE_DURATION: Duration = Duration::from_millis(200);

/// Gutter (dp) kept free on both sides before centered fixed tabs give up
/// and fill the strip instead.
pub const FIXED_WRAP_GUTTER_MIN: i32 = 16;

/// Distance (dp) outside the target's near edge that a non-adjacent
/// indicator move grows from.
pub const MOTION_NON_ADJACENT_OFFSET: i32 = 24;

const ICON_PULSE_PEAK: f32 = 1.5;

/// How a child's width is chosen during measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthPolicy {
    /// Content width
    Wrap,
    /// Forced width in px
    Exact(Px),
    /// Share of whatever width the other children leave
    Weighted(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalGravity {
    #[default]
    Start,
    Center,
}

/// Paint target for the strip.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

#[derive(Debug, Clone)]
struct ChildSlot {
    view: TabItemView,
    policy: WidthPolicy,
}

pub struct TabStrip {
    children: Vec<ChildSlot>,
    mode: TabMode,
    gravity: TabGravity,
    child_gravity: HorizontalGravity,
    padding_start: Px,
    direction: LayoutDirection,
    density: Density,
    measurer: Arc<dyn TextMeasurer>,
    measured: Size,
    size: Size,
    highlighted: Option<usize>,
    indicator: Indicator,
    pulse: ValueAnimator<f32>,
    pulse_target: Option<TabId>,
}

impl TabStrip {
    pub fn new(
        measurer: Arc<dyn TextMeasurer>,
        indicator_style: IndicatorStyle,
        density: Density,
        direction: LayoutDirection,
    ) -> Self {
        Self {
            children: Vec::new(),
            mode: TabMode::default(),
            gravity: TabGravity::default(),
            child_gravity: HorizontalGravity::Center,
            padding_start: 0,
            direction,
            density,
            measurer,
            measured: Size::default(),
            size: Size::default(),
            highlighted: None,
            indicator: Indicator::new(indicator_style),
            pulse: ValueAnimator::new(Easing::AccelerateDecelerate),
            pulse_target: None,
        }
    }

    /// Set sizing mode, gravity and the start inset, then reset every
    /// child's width policy.
    pub fn configure(&mut self, mode: TabMode, gravity: TabGravity, padding_start: Px) {
        self.mode = mode;
        self.gravity = gravity;
        self.padding_start = padding_start.max(0);
        self.child_gravity = match mode {
            TabMode::Fixed => HorizontalGravity::Center,
            TabMode::Scrollable => HorizontalGravity::Start,
        };
        self.apply_policies();
    }

    fn base_policy(&self) -> WidthPolicy {
        if self.mode == TabMode::Fixed && self.gravity == TabGravity::Fill {
            WidthPolicy::Weighted(1.0)
        } else {
            WidthPolicy::Wrap
        }
    }

    fn apply_policies(&mut self) {
        let policy = self.base_policy();
        for slot in &mut self.children {
            slot.policy = policy;
        }
    }

    fn set_all_policies(&mut self, policy: WidthPolicy) {
        for slot in &mut self.children {
            slot.policy = policy;
        }
    }

    pub fn mode(&self) -> TabMode {
        self.mode
    }

    pub fn gravity(&self) -> TabGravity {
        self.gravity
    }

    pub fn child_gravity(&self) -> HorizontalGravity {
        self.child_gravity
    }

    pub fn padding_start(&self) -> Px {
        self.padding_start
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, index: usize) -> Option<&TabItemView> {
        self.children.get(index).map(|slot| &slot.view)
    }

    pub fn children(&self) -> impl Iterator<Item = &TabItemView> {
        self.children.iter().map(|slot| &slot.view)
    }

    pub fn width_policy(&self, index: usize) -> Option<WidthPolicy> {
        self.children.get(index).map(|slot| slot.policy)
    }

    pub fn measured(&self) -> Size {
        self.measured
    }

    /// Size of the last layout pass.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn set_indicator_style(&mut self, style: IndicatorStyle) {
        self.indicator.set_style(style);
    }

    pub fn indicator_bounds(&self) -> Option<IndicatorBounds> {
        self.indicator.bounds()
    }

    pub fn frames(&self) -> Vec<Rect> {
        self.children.iter().map(|slot| slot.view.frame()).collect()
    }

    pub fn add_tab_view(&mut self, tab: Tab, position: usize, style: ItemStyle) {
        let position = position.min(self.children.len());
        let slot = ChildSlot {
            view: TabItemView::new(tab, style),
            policy: self.base_policy(),
        };
        self.children.insert(position, slot);

        if let Some(highlighted) = self.highlighted.as_mut() {
            if *highlighted >= position {
                *highlighted += 1;
            }
        }
        self.indicator.on_child_inserted(position);
    }

    pub fn remove_tab_view_at(&mut self, position: usize, now: Instant) -> Option<TabItemView> {
        if position >= self.children.len() {
            return None;
        }
        let slot = self.children.remove(position);

        self.highlighted = match self.highlighted {
            Some(h) if h == position => None,
            Some(h) if h > position => Some(h - 1),
            other => other,
        };
        self.indicator.on_child_removed(position, now);

        if self.pulse_target == Some(slot.view.tab().id()) {
            self.pulse.cancel(now);
            self.pulse.tick(now);
            self.pulse_target = None;
        }

        Some(slot.view)
    }

    pub fn remove_all(&mut self, now: Instant) {
        self.children.clear();
        self.highlighted = None;
        self.indicator.reset(now);
        self.pulse.cancel(now);
        self.pulse.tick(now);
        self.pulse_target = None;
    }

    /// Highlight the child at `position` and clear every other child.
    pub fn set_selected_tab_view(&mut self, position: Option<usize>) {
        for (index, slot) in self.children.iter_mut().enumerate() {
            slot.view.set_selected(Some(index) == position);
        }
        self.highlighted = position.filter(|p| *p < self.children.len());
    }

    pub fn update_item_styles(&mut self, style: &ItemStyle) {
        for slot in &mut self.children {
            slot.view.set_style(style.clone());
        }
    }

    pub fn set_child_visible(&mut self, index: usize, visible: bool) {
        if let Some(slot) = self.children.get_mut(index) {
            slot.view.set_visible(visible);
        }
    }

    pub fn measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> Size {
        // Policies are recomputed every pass so a previous CENTER fallback
        // does not stick.
        self.apply_policies();
        self.measure_children(width_spec, height_spec);

        if !width_spec.is_exact()
            || self.mode != TabMode::Fixed
            || self.gravity != TabGravity::Center
        {
            return self.measured;
        }

        let visible: Vec<Px> = self
            .children
            .iter()
            .filter(|slot| slot.view.is_visible())
            .map(|slot| slot.view.measured().width)
            .collect();
        let largest = visible.iter().copied().max().unwrap_or(0);
        if largest <= 0 {
            return self.measured;
        }

        let gutter = self.density.dp(FIXED_WRAP_GUTTER_MIN);
        let fits = largest * visible.len() as Px <= self.measured.width - gutter * 2;

        if fits {
            self.set_all_policies(WidthPolicy::Exact(largest));
        } else {
            tracing::debug!(
                largest,
                count = visible.len(),
                width = self.measured.width,
                "Centered tabs do not fit, filling strip"
            );
            self.set_all_policies(WidthPolicy::Weighted(1.0));
        }
        self.measure_children(width_spec, height_spec);

        self.measured
    }

    fn measure_children(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) {
        let available = width_spec.shrink(self.padding_start);
        let wrap_spec = match available {
            MeasureSpec::Exactly(size) | MeasureSpec::AtMost(size) => MeasureSpec::AtMost(size),
            MeasureSpec::Unspecified => MeasureSpec::Unspecified,
        };
        let distribute = width_spec.is_exact();
        let measurer = self.measurer.as_ref();

        let mut used: Px = 0;
        let mut weight_sum = 0.0f32;

        for slot in &mut self.children {
            if !slot.view.is_visible() {
                slot.view.measure(wrap_spec, height_spec, measurer);
                continue;
            }
            let width = match slot.policy {
                WidthPolicy::Weighted(weight) if distribute => {
                    weight_sum += weight;
                    continue;
                }
                WidthPolicy::Exact(width) => {
                    slot.view
                        .measure(MeasureSpec::Exactly(width), height_spec, measurer)
                        .width
                }
                WidthPolicy::Wrap | WidthPolicy::Weighted(_) => {
                    slot.view.measure(wrap_spec, height_spec, measurer).width
                }
            };
            used += width;
        }

        if weight_sum > 0.0 {
            let mut delta = (available.size().unwrap_or(0) - used).max(0);
            let mut remaining = weight_sum;

            for slot in &mut self.children {
                let WidthPolicy::Weighted(weight) = slot.policy else {
                    continue;
                };
                if !slot.view.is_visible() {
                    continue;
                }
                let share = if remaining > 0.0 {
                    ((weight * delta as f32) / remaining).floor() as Px
                } else {
                    delta
                };
                delta -= share;
                remaining -= weight;
                used += slot
                    .view
                    .measure(MeasureSpec::Exactly(share), height_spec, measurer)
                    .width;
            }
        }

        let content_height = self
            .children
            .iter()
            .map(|slot| slot.view.measured().height)
            .max()
            .unwrap_or(0);

        self.measured = Size::new(
            width_spec.resolve(used + self.padding_start),
            height_spec.resolve(content_height),
        );
    }

    /// Place children inside a strip of the given size and refresh the
    /// indicator against the new frames.
    pub fn layout(&mut self, width: Px, height: Px, now: Instant) {
        self.size = Size::new(width, height);

        let content: Px = self
            .children
            .iter()
            .map(|slot| slot.view.measured().width)
            .sum();
        let mut x = match self.child_gravity {
            HorizontalGravity::Start => self.padding_start,
            HorizontalGravity::Center => {
                self.padding_start + ((width - self.padding_start - content) / 2).max(0)
            }
        };

        for slot in &mut self.children {
            let w = slot.view.measured().width;
            let frame = Rect::new(x, 0, x + w, height);
            let frame = match self.direction {
                LayoutDirection::Ltr => frame,
                LayoutDirection::Rtl => Rect::new(width - frame.right, 0, width - frame.left, height),
            };
            slot.view.layout(frame);
            x += w;
        }

        let frames = self.frames();
        let offset = self.density.dp(MOTION_NON_ADJACENT_OFFSET);
        self.indicator.relayout(&frames, now, self.direction, offset);
    }

    /// Whether some visible child has not been given a width yet.
    pub fn children_need_layout(&self) -> bool {
        self.children
            .iter()
            .any(|slot| slot.view.is_visible() && slot.view.width() <= 0)
    }

    pub fn set_indicator_position_from_tab_position(&mut self, position: usize, offset: f32) {
        let frames = self.frames();
        self.indicator.set_position(&frames, position, offset);
    }

    pub fn animate_indicator_to_position(&mut self, position: usize, duration: Duration, now: Instant) {
        let frames = self.frames();
        let offset = self.density.dp(MOTION_NON_ADJACENT_OFFSET);
        self.indicator
            .animate_to(&frames, position, duration, now, self.direction, offset);
    }

    pub fn is_animating(&self) -> bool {
        self.indicator.is_animating() || self.pulse.is_running()
    }

    pub fn is_indicator_animating(&self) -> bool {
        self.indicator.is_animating()
    }

    /// Advance the indicator and icon pulse. Returns whether another frame
    /// is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let indicator = self.indicator.tick(now);
        let pulse = self.tick_pulse(now);
        indicator || pulse
    }

    fn tick_pulse(&mut self, now: Instant) -> bool {
        let (fraction, running) = match self.pulse.tick(now) {
            Some(AnimationEvent::Frame(fraction)) => (fraction, true),
            Some(AnimationEvent::Finished(_)) | Some(AnimationEvent::Cancelled(_)) => (0.0, false),
            None => return false,
        };

        let scale = 1.0 + (ICON_PULSE_PEAK - 1.0) * (1.0 - (2.0 * fraction - 1.0).abs());
        if let Some(target) = self.pulse_target {
            if let Some(slot) = self
                .children
                .iter_mut()
                .find(|slot| slot.view.tab().id() == target)
            {
                slot.view.set_icon_scale(if running { scale } else { 1.0 });
            }
        }
        if !running {
            self.pulse_target = None;
        }
        running
    }

    /// Scale the icon of the child at `position` up and back down.
    pub fn pulse_icon(&mut self, position: usize, now: Instant) {
        let Some(slot) = self.children.get(position) else {
            return;
        };
        if !slot.view.has_icon_element() {
            return;
        }
        let target = slot.view.tab().id();

        if self.pulse.cancel(now).is_some() {
            self.tick_pulse(now);
        }
        self.pulse_target = Some(target);
        self.pulse.start(0.0, 1.0, now, ICON_PULSE_DURATION);

        tracing::trace!(tab_id = %target, position, "Pulsing selected icon");
    }

    /// Index of the visible child under strip-local `x`.
    pub fn hit_test(&self, x: Px) -> Option<usize> {
        self.children
            .iter()
            .position(|slot| slot.view.is_visible() && slot.view.frame().contains_x(x))
    }

    /// Paint the indicator, shifted left by the bar's scroll offset.
    pub fn draw(&self, canvas: &mut dyn Canvas, scroll_x: Px) {
        if let Some(rect) = self.indicator.rect(self.size.height) {
            canvas.fill_rect(rect.translate_x(-scroll_x), self.indicator.style().color);
        }
    }
}

impl std::fmt::Debug for TabStrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStrip")
            .field("children", &self.children.len())
            .field("mode", &self.mode)
            .field("gravity", &self.gravity)
            .field("measured", &self.measured)
            .field("highlighted", &self.highlighted)
            .field("indicator", &self.indicator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{FrameClock, ManualClock};
    use pagetabs_tabs::{ApproxTextMeasurer, Icon, Padding};

    #[derive(Default)]
    struct RecordingCanvas {
        rects: Vec<(Rect, Color)>,
    }

    impl Canvas for RecordingCanvas {
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.rects.push((rect, color));
        }
    }

    fn style(mode: TabMode) -> ItemStyle {
        ItemStyle {
            padding: Padding {
                start: 10,
                top: 0,
                end: 10,
                bottom: 0,
            },
            text_size: 10.0,
            multi_line_text_size: 8.0,
            mode,
            ..ItemStyle::default()
        }
    }

    fn strip(mode: TabMode, gravity: TabGravity, labels: &[&str]) -> TabStrip {
        let mut strip = TabStrip::new(
            Arc::new(ApproxTextMeasurer::new(0.5, 1.0)),
            IndicatorStyle::default(),
            Density::default(),
            LayoutDirection::Ltr,
        );
        strip.configure(mode, gravity, 0);
        for (i, label) in labels.iter().enumerate() {
            strip.add_tab_view(Tab::new().with_text(*label), i, style(mode));
        }
        strip
    }

    fn widths(strip: &TabStrip) -> Vec<Px> {
        strip.children().map(|c| c.measured().width).collect()
    }

    #[test]
    fn test_fixed_fill_shares_sum_to_width() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &["Cup", "Cake", "Pie", "Tea"]);
        strip.measure(MeasureSpec::Exactly(402), MeasureSpec::Exactly(48));
        assert_eq!(widths(&strip), vec![100, 100, 101, 101]);
        assert_eq!(strip.measured(), Size::new(402, 48));
    }

    #[test]
    fn test_fixed_center_uniform_when_fits() {
        // Content widths are 35, 40, 35 and 35.
        let mut strip = strip(TabMode::Fixed, TabGravity::Center, &["Cup", "Cake", "Pie", "Tea"]);
        strip.measure(MeasureSpec::Exactly(400), MeasureSpec::Exactly(48));
        assert_eq!(widths(&strip), vec![40, 40, 40, 40]);
        assert_eq!(strip.width_policy(0), Some(WidthPolicy::Exact(40)));

        let clock = ManualClock::new();
        strip.layout(400, 48, clock.now());
        assert_eq!(strip.child(0).unwrap().frame(), Rect::new(120, 0, 160, 48));
        assert_eq!(strip.child(3).unwrap().frame(), Rect::new(240, 0, 280, 48));
    }

    #[test]
    fn test_fixed_center_falls_back_to_fill() {
        let labels = ["Cup", "Cake", "Apple", "Hamburger"];
        let mut strip = strip(TabMode::Fixed, TabGravity::Center, &labels);
        strip.measure(MeasureSpec::Exactly(200), MeasureSpec::Exactly(48));
        assert_eq!(widths(&strip).iter().sum::<Px>(), 200);
        assert_eq!(widths(&strip), vec![50, 50, 50, 50]);
        assert_eq!(strip.gravity(), TabGravity::Center);

        // A wider pass evaluates CENTER again from scratch.
        strip.measure(MeasureSpec::Exactly(600), MeasureSpec::Exactly(48));
        assert!(matches!(strip.width_policy(0), Some(WidthPolicy::Exact(_))));
    }

    #[test]
    fn test_center_refinement_needs_exact_width() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Center, &["Cup", "Cake"]);
        strip.measure(MeasureSpec::Unspecified, MeasureSpec::Exactly(48));
        assert_eq!(widths(&strip), vec![35, 40]);
        assert_eq!(strip.measured().width, 75);
    }

    #[test]
    fn test_scrollable_wraps_and_mirrors_in_rtl() {
        let mut strip = strip(TabMode::Scrollable, TabGravity::Fill, &["Cup", "Cake", "Pie"]);
        strip.direction = LayoutDirection::Rtl;
        let size = strip.measure(MeasureSpec::Unspecified, MeasureSpec::Exactly(48));
        assert_eq!(size.width, 110);

        strip.layout(110, 48, Instant::now());
        assert_eq!(strip.child(0).unwrap().frame(), Rect::new(75, 0, 110, 48));
        assert_eq!(strip.child(1).unwrap().frame(), Rect::new(35, 0, 75, 48));
        assert_eq!(strip.child(2).unwrap().frame(), Rect::new(0, 0, 35, 48));
        assert_eq!(strip.hit_test(80), Some(0));
    }

    #[test]
    fn test_padding_start_offsets_children() {
        let mut strip = strip(TabMode::Scrollable, TabGravity::Fill, &["Cup", "Cake"]);
        strip.configure(TabMode::Scrollable, TabGravity::Fill, 20);
        let size = strip.measure(MeasureSpec::Unspecified, MeasureSpec::Exactly(48));
        assert_eq!(size.width, 95);
        strip.layout(95, 48, Instant::now());
        assert_eq!(strip.child(0).unwrap().left(), 20);
        assert_eq!(strip.hit_test(10), None);
    }

    #[test]
    fn test_children_need_layout_until_laid_out() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &["Cup", "Cake"]);
        assert!(strip.children_need_layout());
        strip.measure(MeasureSpec::Exactly(200), MeasureSpec::Exactly(48));
        strip.layout(200, 48, Instant::now());
        assert!(!strip.children_need_layout());
    }

    #[test]
    fn test_selected_view_is_idempotent() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &["Cup", "Cake", "Pie"]);
        strip.set_selected_tab_view(Some(1));
        strip.set_selected_tab_view(Some(1));
        let selected: Vec<bool> = strip.children().map(|c| c.is_selected()).collect();
        assert_eq!(selected, vec![false, true, false]);
        assert_eq!(strip.highlighted(), Some(1));

        strip.add_tab_view(Tab::new().with_text("Tea"), 0, style(TabMode::Fixed));
        assert_eq!(strip.highlighted(), Some(2));
        strip.remove_tab_view_at(2, Instant::now());
        assert_eq!(strip.highlighted(), None);
    }

    #[test]
    fn test_draw_translates_by_scroll() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &["Cup", "Cake"]);
        strip.measure(MeasureSpec::Exactly(200), MeasureSpec::Exactly(48));
        strip.layout(200, 48, Instant::now());
        strip.set_indicator_position_from_tab_position(1, 0.0);

        let mut canvas = RecordingCanvas::default();
        strip.draw(&mut canvas, 30);
        assert_eq!(canvas.rects, vec![(Rect::new(70, 0, 170, 2), Color::WHITE)]);
    }

    #[test]
    fn test_icon_pulse_peaks_and_resets() {
        let clock = ManualClock::new();
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &[]);
        let icon = Icon::new(1, Size::new(24, 24));
        strip.add_tab_view(Tab::new().with_icon(icon), 0, style(TabMode::Fixed));

        strip.pulse_icon(0, clock.now());
        assert!(strip.is_animating());

        clock.advance(Duration::from_millis(100));
        assert!(strip.tick(clock.now()));
        assert!((strip.child(0).unwrap().icon_scale() - 1.5).abs() < 0.01);

        clock.advance(Duration::from_millis(100));
        assert!(!strip.tick(clock.now()));
        assert_eq!(strip.child(0).unwrap().icon_scale(), 1.0);
        assert!(!strip.is_animating());
    }

    #[test]
    fn test_pulse_ignores_text_only_tab() {
        let mut strip = strip(TabMode::Fixed, TabGravity::Fill, &["Cup"]);
        strip.pulse_icon(0, Instant::now());
        assert!(!strip.is_animating());
    }
}
