//! pagetabs Core
//!
//! Scrollable tab bar with an animated selection indicator that can be
//! bound to a paged container. The host owns the window and the event
//! loop: it measures and lays the bar out, forwards taps to `click_at`,
//! calls `tick` on every frame while `next_frame_deadline` says so, and
//! paints through a [`Canvas`].

mod bar;
mod config;
mod error;
mod listener;
mod pager;

pub use bar::{
    SharedTabBar, TabBar, DEFAULT_HEIGHT, DEFAULT_HEIGHT_WITH_TEXT_ICON,
    SCROLLABLE_TAB_MIN_WIDTH, TAB_MIN_WIDTH_MARGIN,
};
pub use config::TabBarConfig;
pub use error::TabBarError;
pub use listener::OnTabSelectedListener;
pub use pager::{
    OnPageChangeListener, PagedContainer, PagerAdapter, PagerOnTabSelectedListener, ScrollState,
    TabBarOnPageChangeListener,
};

// Re-export the building blocks hosts need alongside the bar
pub use pagetabs_strip::{
    Canvas, FrameClock, IndicatorBounds, IndicatorGravity, IndicatorStyle, ManualClock,
    SystemClock, ANIMATION_DURATION,
};
pub use pagetabs_tabs::{
    ApproxTextMeasurer, Color, Density, Icon, LayoutDirection, MeasureSpec, Px, Rect, Size, Tab,
    TabGravity, TabId, TabMode, TextLayout, TextMeasurer,
};

pub type Result<T> = std::result::Result<T, TabBarError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
