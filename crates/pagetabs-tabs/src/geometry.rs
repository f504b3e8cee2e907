//! Layout primitives shared by the item, strip and bar

use serde::{Deserialize, Serialize};

/// Device pixels.
pub type Px = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: Px,
    pub height: Px,
}

impl Size {
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: Px,
    pub top: Px,
    pub right: Px,
    pub bottom: Px,
}

impl Rect {
    pub const fn new(left: Px, top: Px, right: Px, bottom: Px) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> Px {
        self.right - self.left
    }

    pub fn height(&self) -> Px {
        self.bottom - self.top
    }

    /// Half-open horizontal hit test: `left <= x < right`.
    pub fn contains_x(&self, x: Px) -> bool {
        x >= self.left && x < self.right
    }

    pub fn translate_x(&self, dx: Px) -> Self {
        Self {
            left: self.left + dx,
            right: self.right + dx,
            ..*self
        }
    }
}

/// Constraint handed from a parent to a child during measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    /// The child must be exactly this size
    Exactly(Px),
    /// The child may be as large as it wants up to this size
    AtMost(Px),
    /// No constraint
    Unspecified,
}

impl MeasureSpec {
    pub fn size(&self) -> Option<Px> {
        match self {
            MeasureSpec::Exactly(size) | MeasureSpec::AtMost(size) => Some(*size),
            MeasureSpec::Unspecified => None,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MeasureSpec::Exactly(_))
    }

    /// Reconcile a desired size with this constraint.
    pub fn resolve(&self, desired: Px) -> Px {
        match self {
            MeasureSpec::Exactly(size) => *size,
            MeasureSpec::AtMost(size) => desired.min(*size),
            MeasureSpec::Unspecified => desired,
        }
    }

    /// Same mode, reduced by `amount` (never below zero).
    pub fn shrink(&self, amount: Px) -> Self {
        match self {
            MeasureSpec::Exactly(size) => MeasureSpec::Exactly((size - amount).max(0)),
            MeasureSpec::AtMost(size) => MeasureSpec::AtMost((size - amount).max(0)),
            MeasureSpec::Unspecified => MeasureSpec::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub start: Px,
    pub top: Px,
    pub end: Px,
    pub bottom: Px,
}

impl Padding {
    pub const fn uniform(value: Px) -> Self {
        Self {
            start: value,
            top: value,
            end: value,
            bottom: value,
        }
    }

    pub fn horizontal(&self) -> Px {
        self.start + self.end
    }

    pub fn vertical(&self) -> Px {
        self.top + self.bottom
    }
}

/// Display density used to turn density-independent values into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(pub f32);

impl Density {
    pub fn dp(&self, dps: i32) -> Px {
        (self.0 * dps as f32).round() as Px
    }

    pub fn sp(&self, sps: f32) -> f32 {
        self.0 * sps
    }
}

impl Default for Density {
    fn default() -> Self {
        Density(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(MeasureSpec::Exactly(100).resolve(40), 100);
        assert_eq!(MeasureSpec::AtMost(100).resolve(140), 100);
        assert_eq!(MeasureSpec::AtMost(100).resolve(40), 40);
        assert_eq!(MeasureSpec::Unspecified.resolve(40), 40);
    }

    #[test]
    fn test_shrink_keeps_mode() {
        assert_eq!(MeasureSpec::Exactly(10).shrink(16), MeasureSpec::Exactly(0));
        assert_eq!(MeasureSpec::AtMost(50).shrink(16), MeasureSpec::AtMost(34));
        assert_eq!(MeasureSpec::Unspecified.shrink(16), MeasureSpec::Unspecified);
    }

    #[test]
    fn test_density() {
        let density = Density(2.5);
        assert_eq!(density.dp(16), 40);
        assert_eq!(density.dp(0), 0);
    }
}
