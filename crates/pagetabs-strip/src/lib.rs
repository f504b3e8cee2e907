//! pagetabs Strip
//!
//! Row of tab items with a selection indicator. Measurement decides between
//! content-fit and equal-width tabs; the indicator follows either a
//! continuous position (pager drags) or animates between tabs, driven by
//! the host's frame clock.

mod animation;
mod easing;
mod indicator;
mod strip;

pub use animation::{
    AnimationEvent, AnimationState, FrameClock, Lerp, ManualClock, SystemClock, ValueAnimator,
};
pub use easing::{CubicBezier, Easing};
pub use indicator::{Indicator, IndicatorBounds, IndicatorGravity, IndicatorStyle};
pub use strip::{
    Canvas, HorizontalGravity, TabStrip, WidthPolicy, ANIMATION_DURATION,
    FIXED_WRAP_GUTTER_MIN, ICON_PULSE_DURATION, MOTION_NON_ADJACENT_OFFSET,
};
