//! Tab bar configuration
//!
//! Dimensions are density-independent (dp, text in sp) and converted with
//! [`TabBarConfig::density`] when the bar applies them.

use serde::{Deserialize, Serialize};

use pagetabs_strip::{IndicatorGravity, IndicatorStyle};
use pagetabs_tabs::{Color, Density, LayoutDirection, Padding, Px, TabGravity, TabMode, TextColors};

use crate::error::TabBarError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabBarConfig {
    pub mode: TabMode,
    pub gravity: TabGravity,
    pub show_tab_indicator: bool,
    pub indicator_gravity: IndicatorGravity,
    /// dp
    pub indicator_height: i32,
    pub indicator_color: Color,
    /// Padding on every edge of every tab, in dp
    pub tab_padding: i32,
    pub tab_padding_start: Option<i32>,
    pub tab_padding_top: Option<i32>,
    pub tab_padding_end: Option<i32>,
    pub tab_padding_bottom: Option<i32>,
    /// sp
    pub text_size: f32,
    /// Label size once it wraps, in sp
    pub multi_line_text_size: f32,
    pub text_color: Color,
    /// Overrides the label color of the selected tab
    pub selected_text_color: Option<Color>,
    pub tab_min_width: Option<i32>,
    pub tab_max_width: Option<i32>,
    /// Start inset of the first tab in scrollable mode, in dp
    pub content_inset_start: i32,
    pub density: Density,
    pub layout_direction: LayoutDirection,
    /// Pulse the icon of a tab when it is tapped
    pub show_selected_tab_animation: bool,
    /// Replaces the content-driven default height, in dp
    pub default_height: Option<i32>,
    /// Host drawable painted behind every tab
    pub tab_background: Option<u32>,
}

impl Default for TabBarConfig {
    fn default() -> Self {
        let colors = TextColors::default();
        Self {
            mode: TabMode::Fixed,
            gravity: TabGravity::Fill,
            show_tab_indicator: true,
            indicator_gravity: IndicatorGravity::Top,
            indicator_height: 2,
            indicator_color: Color::WHITE,
            tab_padding: 0,
            tab_padding_start: Some(12),
            tab_padding_top: None,
            tab_padding_end: Some(12),
            tab_padding_bottom: None,
            text_size: 14.0,
            multi_line_text_size: 12.0,
            text_color: colors.default,
            selected_text_color: Some(colors.selected),
            tab_min_width: None,
            tab_max_width: None,
            content_inset_start: 0,
            density: Density::default(),
            layout_direction: LayoutDirection::Ltr,
            show_selected_tab_animation: false,
            default_height: None,
            tab_background: None,
        }
    }
}

impl TabBarConfig {
    /// Parse and validate a JSON document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TabBarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.density.0.is_finite() && self.density.0 > 0.0) {
            return Err(TabBarError::InvalidConfig(format!(
                "density must be positive, got {}",
                self.density.0
            )));
        }
        if !(self.text_size > 0.0 && self.multi_line_text_size > 0.0) {
            return Err(TabBarError::InvalidConfig(
                "text sizes must be positive".to_string(),
            ));
        }

        let lengths = [
            ("indicator_height", Some(self.indicator_height)),
            ("tab_padding", Some(self.tab_padding)),
            ("tab_padding_start", self.tab_padding_start),
            ("tab_padding_top", self.tab_padding_top),
            ("tab_padding_end", self.tab_padding_end),
            ("tab_padding_bottom", self.tab_padding_bottom),
            ("tab_min_width", self.tab_min_width),
            ("tab_max_width", self.tab_max_width),
            ("content_inset_start", Some(self.content_inset_start)),
            ("default_height", self.default_height),
        ];
        for (name, value) in lengths {
            if let Some(value) = value.filter(|v| *v < 0) {
                return Err(TabBarError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.tab_min_width, self.tab_max_width) {
            if max > 0 && min > max {
                return Err(TabBarError::InvalidConfig(format!(
                    "tab_min_width {min} exceeds tab_max_width {max}"
                )));
            }
        }

        Ok(())
    }

    pub fn dp(&self, dps: i32) -> Px {
        self.density.dp(dps)
    }

    /// Per-edge tab padding in px.
    pub fn padding(&self) -> Padding {
        let edge = |value: Option<i32>| self.dp(value.unwrap_or(self.tab_padding));
        Padding {
            start: edge(self.tab_padding_start),
            top: edge(self.tab_padding_top),
            end: edge(self.tab_padding_end),
            bottom: edge(self.tab_padding_bottom),
        }
    }

    pub fn text_colors(&self) -> TextColors {
        TextColors {
            default: self.text_color,
            selected: self.selected_text_color.unwrap_or(self.text_color),
        }
    }

    pub fn indicator_style(&self) -> IndicatorStyle {
        IndicatorStyle {
            visible: self.show_tab_indicator,
            gravity: self.indicator_gravity,
            height: self.dp(self.indicator_height),
            color: self.indicator_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TabBarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, TabMode::Fixed);
        assert_eq!(config.gravity, TabGravity::Fill);
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_keys() {
        let config = TabBarConfig::from_json(
            r#"{"mode": "scrollable", "gravity": "center", "indicator_gravity": "bottom", "density": 2.0}"#,
        )
        .unwrap();
        assert_eq!(config.mode, TabMode::Scrollable);
        assert_eq!(config.gravity, TabGravity::Center);
        assert_eq!(config.indicator_gravity, IndicatorGravity::Bottom);
        assert_eq!(config.text_size, 14.0);
        assert_eq!(config.indicator_style().height, 4);
    }

    #[test]
    fn test_padding_overrides_uniform_value() {
        let config = TabBarConfig {
            tab_padding: 4,
            tab_padding_start: Some(10),
            tab_padding_end: None,
            density: Density(2.0),
            ..TabBarConfig::default()
        };
        assert_eq!(
            config.padding(),
            Padding {
                start: 20,
                top: 8,
                end: 8,
                bottom: 8
            }
        );
    }

    #[test]
    fn test_selected_color_falls_back_to_text_color() {
        let config = TabBarConfig {
            text_color: Color::BLACK,
            selected_text_color: None,
            ..TabBarConfig::default()
        };
        assert_eq!(config.text_colors().for_state(true), Color::BLACK);
    }

    #[test]
    fn test_malformed_json() {
        let err = TabBarConfig::from_json("{\"mode\": \"sideways\"}").unwrap_err();
        assert!(matches!(err, TabBarError::Config(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = TabBarConfig::from_json(r#"{"density": 0.0}"#).unwrap_err();
        assert!(matches!(err, TabBarError::InvalidConfig(_)));

        let err = TabBarConfig::from_json(r#"{"tab_min_width": 200, "tab_max_width": 100}"#)
            .unwrap_err();
        assert!(matches!(err, TabBarError::InvalidConfig(_)));

        let err = TabBarConfig::from_json(r#"{"tab_padding": -1}"#).unwrap_err();
        assert!(matches!(err, TabBarError::InvalidConfig(_)));
    }
}
