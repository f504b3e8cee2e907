//! Selection indicator
//!
//! Tracks which tab the indicator sits on (with a fractional offset while a
//! pager is dragged), the bounds currently painted, and the single animation
//! slot used for discrete tab-to-tab moves.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use pagetabs_tabs::{Color, LayoutDirection, Px, Rect};

use crate::animation::{AnimationEvent, AnimationState, Lerp, ValueAnimator};
use crate::easing::Easing;

/// Horizontal extent of the indicator in strip coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorBounds {
    pub left: Px,
    pub right: Px,
}

impl IndicatorBounds {
    pub const fn new(left: Px, right: Px) -> Self {
        Self { left, right }
    }

    fn of(frame: Rect) -> Self {
        Self::new(frame.left, frame.right)
    }

    pub fn width(&self) -> Px {
        self.right - self.left
    }
}

impl Lerp for IndicatorBounds {
    fn lerp(start: Self, end: Self, fraction: f32) -> Self {
        let left = i32::lerp(start.left, end.left, fraction);
        let right = i32::lerp(start.right, end.right, fraction);
        Self::new(left, right.max(left))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorGravity {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorStyle {
    pub visible: bool,
    pub gravity: IndicatorGravity,
    pub height: Px,
    pub color: Color,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            visible: true,
            gravity: IndicatorGravity::Top,
            height: 2,
            color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Indicator {
    style: IndicatorStyle,
    selected_position: Option<usize>,
    selection_offset: f32,
    bounds: Option<IndicatorBounds>,
    animator: ValueAnimator<IndicatorBounds>,
    destination: Option<usize>,
}

impl Indicator {
    pub fn new(style: IndicatorStyle) -> Self {
        Self {
            style,
            selected_position: None,
            selection_offset: 0.0,
            bounds: None,
            animator: ValueAnimator::new(Easing::FAST_OUT_SLOW_IN),
            destination: None,
        }
    }

    pub fn style(&self) -> &IndicatorStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: IndicatorStyle) {
        self.style = style;
    }

    pub fn bounds(&self) -> Option<IndicatorBounds> {
        self.bounds
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.selected_position
    }

    pub fn selection_offset(&self) -> f32 {
        self.selection_offset
    }

    /// Position including the drag offset, e.g. `1.25`.
    pub fn position(&self) -> Option<f32> {
        self.selected_position
            .map(|p| p as f32 + self.selection_offset)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn animation_state(&self) -> &AnimationState<IndicatorBounds> {
        self.animator.state()
    }

    /// Keep indices valid after a tab view was inserted at `position`.
    pub fn on_child_inserted(&mut self, position: usize) {
        for index in [&mut self.selected_position, &mut self.destination]
            .into_iter()
            .flatten()
        {
            if *index >= position {
                *index += 1;
            }
        }
    }

    /// Keep indices valid after the tab view at `position` was removed.
    /// An animation heading for that view stops where it is.
    pub fn on_child_removed(&mut self, position: usize, now: Instant) {
        if self.destination == Some(position) {
            self.destination = None;
            self.cancel(now);
        }
        for index in [&mut self.selected_position, &mut self.destination] {
            *index = match *index {
                Some(i) if i == position => None,
                Some(i) if i > position => Some(i - 1),
                other => other,
            };
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.cancel(now);
        self.selected_position = None;
        self.selection_offset = 0.0;
        self.bounds = None;
    }

    /// Jump to `position + offset` without animating.
    pub fn set_position(&mut self, frames: &[Rect], position: usize, offset: f32) {
        self.selected_position = Some(position);
        self.selection_offset = offset;
        self.update_position(frames);
    }

    /// Recompute the painted bounds from the selected position and offset.
    pub fn update_position(&mut self, frames: &[Rect]) {
        let bounds = self.selected_position.and_then(|position| {
            let selected = frames.get(position).filter(|f| f.width() > 0)?;
            let mut bounds = IndicatorBounds::of(*selected);

            if self.selection_offset > 0.0 {
                if let Some(next) = frames.get(position + 1) {
                    bounds = IndicatorBounds::lerp(
                        bounds,
                        IndicatorBounds::of(*next),
                        self.selection_offset,
                    );
                }
            }
            Some(bounds)
        });

        self.bounds = bounds;
    }

    /// Animate toward the tab at `position`.
    ///
    /// A running animation is cancelled first and the new one starts from
    /// the bounds it had reached. Otherwise adjacent moves slide edge to
    /// edge, and longer moves grow out of a point just outside the target's
    /// near edge.
    pub fn animate_to(
        &mut self,
        frames: &[Rect],
        position: usize,
        duration: Duration,
        now: Instant,
        direction: LayoutDirection,
        near_edge_offset: Px,
    ) {
        let Some(frame) = frames.get(position) else {
            tracing::trace!(position, "Indicator target out of range");
            return;
        };
        let target = IndicatorBounds::of(*frame);
        let interrupted = self.cancel(now).is_some();

        let start = match self.selected_position {
            Some(current) if !interrupted && current.abs_diff(position) > 1 => {
                let towards_start = position < current;
                let edge = match (towards_start, direction) {
                    (true, LayoutDirection::Ltr) | (false, LayoutDirection::Rtl) => {
                        target.right + near_edge_offset
                    }
                    (true, LayoutDirection::Rtl) | (false, LayoutDirection::Ltr) => {
                        target.left - near_edge_offset
                    }
                };
                Some(IndicatorBounds::new(edge, edge))
            }
            _ => self.bounds,
        };

        match start {
            Some(start) if start != target => {
                tracing::debug!(
                    from = ?self.selected_position,
                    to = position,
                    start_left = start.left,
                    start_right = start.right,
                    target_left = target.left,
                    target_right = target.right,
                    duration_ms = duration.as_millis() as u64,
                    "Animating indicator"
                );
                self.destination = Some(position);
                self.animator.start(start, target, now, duration);
            }
            _ => {
                self.bounds = Some(target);
                self.selected_position = Some(position);
                self.selection_offset = 0.0;
            }
        }
    }

    /// Called after every layout pass. A running animation restarts toward
    /// the same tab's new frame for whatever time it had left.
    pub fn relayout(
        &mut self,
        frames: &[Rect],
        now: Instant,
        direction: LayoutDirection,
        near_edge_offset: Px,
    ) {
        let Some(duration) = self.animator.duration() else {
            self.update_position(frames);
            return;
        };
        let Some(destination) = self.destination else {
            self.update_position(frames);
            return;
        };

        if let Some(fraction) = self.cancel(now) {
            let remaining = duration.mul_f32((1.0 - fraction).max(0.0));
            self.animate_to(frames, destination, remaining, now, direction, near_edge_offset);
        }
    }

    /// Advance the animation. Returns whether another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.animator.tick(now) {
            Some(AnimationEvent::Frame(bounds)) => {
                self.bounds = Some(bounds);
                true
            }
            Some(AnimationEvent::Finished(bounds)) | Some(AnimationEvent::Cancelled(bounds)) => {
                self.bounds = Some(bounds);
                self.settle();
                false
            }
            None => false,
        }
    }

    /// Stop a running animation where it is. Returns the fraction it had
    /// reached.
    pub fn cancel(&mut self, now: Instant) -> Option<f32> {
        let (bounds, fraction) = self.animator.cancel(now)?;
        self.bounds = Some(bounds);
        if let Some(AnimationEvent::Cancelled(_)) = self.animator.tick(now) {
            self.settle();
        }

        tracing::debug!(
            position = ?self.selected_position,
            fraction,
            left = bounds.left,
            right = bounds.right,
            "Cancelled indicator animation"
        );

        Some(fraction)
    }

    fn settle(&mut self) {
        if let Some(destination) = self.destination.take() {
            self.selected_position = Some(destination);
        }
        self.selection_offset = 0.0;
    }

    /// Rectangle to paint inside a strip of the given height.
    pub fn rect(&self, strip_height: Px) -> Option<Rect> {
        if !self.style.visible {
            return None;
        }
        let bounds = self.bounds.filter(|b| b.right > b.left)?;
        let (top, bottom) = match self.style.gravity {
            IndicatorGravity::Top => (0, self.style.height),
            IndicatorGravity::Bottom => (strip_height - self.style.height, strip_height),
        };
        Some(Rect::new(bounds.left, top, bounds.right, bottom))
    }
}
