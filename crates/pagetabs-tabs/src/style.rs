//! Sizing modes and the style snapshot handed to each tab item

use serde::{Deserialize, Serialize};

use crate::geometry::{Padding, Px};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabMode {
    /// Tabs keep their content width and the strip scrolls horizontally
    Scrollable,
    /// All tabs are visible at once and the strip matches the bar width
    #[default]
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabGravity {
    /// Tabs share the available width equally
    #[default]
    Fill,
    /// Tabs take the widest tab's width and are centered
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// Two-state color list: one color for the selected state, one otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColors {
    pub default: Color,
    pub selected: Color,
}

impl TextColors {
    pub fn for_state(&self, selected: bool) -> Color {
        if selected {
            self.selected
        } else {
            self.default
        }
    }
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            default: Color(0xB3FF_FFFF),
            selected: Color::WHITE,
        }
    }
}

/// Read-only configuration every tab item measures against.
///
/// The bar builds a fresh snapshot whenever its mode, gravity or computed
/// max tab width changes and pushes it to each item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStyle {
    pub padding: Padding,
    /// Label size in px at one line
    pub text_size: f32,
    /// Label size in px once the label wraps
    pub multi_line_text_size: f32,
    pub text_colors: TextColors,
    /// `None` leaves the item unbounded
    pub max_width: Option<Px>,
    pub min_width: Px,
    pub mode: TabMode,
    /// Opaque background drawable painted behind each item by the host
    pub background: Option<u32>,
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            padding: Padding {
                start: 12,
                top: 0,
                end: 12,
                bottom: 0,
            },
            text_size: 14.0,
            multi_line_text_size: 12.0,
            text_colors: TextColors::default(),
            max_width: None,
            min_width: 0,
            mode: TabMode::Fixed,
            background: None,
        }
    }
}
