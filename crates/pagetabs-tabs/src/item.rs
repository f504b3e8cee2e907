//! Tab item view
//!
//! Renders one tab's icon and label as a vertical stack and reports its
//! measured box. Sub-elements are created the first time the tab carries a
//! non-empty value and are kept from then on.

use crate::geometry::{MeasureSpec, Px, Rect, Size};
use crate::style::{Color, ItemStyle, TabMode};
use crate::tab::{Icon, Tab};
use crate::text::{TextLayout, TextMeasurer};

const DEFAULT_MAX_LINES: usize = 2;

#[derive(Debug, Clone)]
struct IconElement {
    icon: Option<Icon>,
    selected: bool,
    scale: f32,
}

#[derive(Debug, Clone)]
struct LabelElement {
    text: String,
    size: f32,
    max_lines: usize,
    selected: bool,
    layout: Option<TextLayout>,
}

impl LabelElement {
    fn line_count(&self) -> usize {
        self.layout.as_ref().map_or(0, TextLayout::line_count)
    }
}

#[derive(Debug, Clone)]
pub struct TabItemView {
    tab: Tab,
    style: ItemStyle,
    icon: Option<IconElement>,
    label: Option<LabelElement>,
    selected: bool,
    visible: bool,
    measured: Size,
    frame: Rect,
}

impl TabItemView {
    pub fn new(tab: Tab, style: ItemStyle) -> Self {
        let mut view = Self {
            tab,
            style,
            icon: None,
            label: None,
            selected: false,
            visible: true,
            measured: Size::default(),
            frame: Rect::default(),
        };
        view.sync_elements();
        view
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn style(&self) -> &ItemStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ItemStyle) {
        self.style = style;
    }

    pub fn background(&self) -> Option<u32> {
        self.style.background
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Toggle the selected state. Returns whether it changed.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        if let Some(icon) = self.icon.as_mut() {
            icon.selected = selected;
        }
        if let Some(label) = self.label.as_mut() {
            label.selected = selected;
        }

        tracing::trace!(tab_id = %self.tab.id(), selected, "Tab item selection changed");

        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn measured(&self) -> Size {
        self.measured
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn left(&self) -> Px {
        self.frame.left
    }

    pub fn right(&self) -> Px {
        self.frame.right
    }

    pub fn width(&self) -> Px {
        self.frame.width()
    }

    pub fn layout(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn has_icon_element(&self) -> bool {
        self.icon.is_some()
    }

    pub fn has_label_element(&self) -> bool {
        self.label.is_some()
    }

    /// Icon drawn by this item, if the element exists and holds one.
    pub fn icon(&self) -> Option<Icon> {
        self.icon.as_ref().and_then(|el| el.icon)
    }

    pub fn icon_scale(&self) -> f32 {
        self.icon.as_ref().map_or(1.0, |el| el.scale)
    }

    pub fn set_icon_scale(&mut self, scale: f32) {
        if let Some(icon) = self.icon.as_mut() {
            icon.scale = scale;
        }
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.text.as_str())
    }

    pub fn label_text_size(&self) -> Option<f32> {
        self.label.as_ref().map(|l| l.size)
    }

    pub fn label_max_lines(&self) -> Option<usize> {
        self.label.as_ref().map(|l| l.max_lines)
    }

    pub fn label_line_count(&self) -> usize {
        self.label.as_ref().map_or(0, LabelElement::line_count)
    }

    pub fn label_color(&self) -> Option<Color> {
        self.label
            .as_ref()
            .map(|l| self.style.text_colors.for_state(l.selected))
    }

    /// Measure against the given constraints, honoring the style's max width
    /// and adjusting the label's size and line limit.
    pub fn measure(
        &mut self,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
        measurer: &dyn TextMeasurer,
    ) -> Size {
        self.sync_elements();

        if !self.visible {
            self.measured = Size::default();
            return self.measured;
        }

        let width_spec = self.clamp_to_max_width(width_spec);

        self.measure_content(width_spec, height_spec, measurer);

        if self.adjust_label() {
            self.measure_content(width_spec, height_spec, measurer);
        }

        self.measured
    }

    fn clamp_to_max_width(&self, spec: MeasureSpec) -> MeasureSpec {
        let Some(max) = self.style.max_width.filter(|max| *max > 0) else {
            return spec;
        };
        match spec {
            MeasureSpec::Unspecified => MeasureSpec::AtMost(max),
            MeasureSpec::AtMost(size) if size > max => MeasureSpec::AtMost(max),
            MeasureSpec::Exactly(size) if size > max => MeasureSpec::Exactly(max),
            other => other,
        }
    }

    fn measure_content(
        &mut self,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
        measurer: &dyn TextMeasurer,
    ) {
        let padding = self.style.padding;
        let available = width_spec.shrink(padding.horizontal()).size();

        let icon_size = self.icon().map(|icon| icon.size).unwrap_or_default();

        let (label_width, label_height) = match self.label.as_mut() {
            Some(label) if !label.text.is_empty() => {
                let layout = measurer.layout(&label.text, label.size, available, label.max_lines);
                let size = (layout.max_line_width().ceil() as Px, layout.height());
                label.layout = Some(layout);
                size
            }
            Some(label) => {
                label.layout = None;
                (0, 0)
            }
            None => (0, 0),
        };

        let content_width = icon_size.width.max(label_width);
        let content_height = icon_size.height + label_height;

        let desired_width = (content_width + padding.horizontal()).max(self.style.min_width);
        let desired_height = content_height + padding.vertical();

        self.measured = Size::new(
            width_spec.resolve(desired_width),
            height_spec.resolve(desired_height),
        );
    }

    /// Pick the label's text size and line limit for the last measurement.
    /// Returns whether anything changed and a re-measure is needed.
    fn adjust_label(&mut self) -> bool {
        let icon_visible = self.icon().is_some();
        let style = &self.style;
        let Some(label) = self.label.as_mut() else {
            return false;
        };

        let line_count = label.line_count();
        let mut text_size = style.text_size;
        let mut max_lines = DEFAULT_MAX_LINES;

        if icon_visible {
            max_lines = 1;
        } else if line_count > 1 {
            text_size = style.multi_line_text_size;
        }

        if text_size == label.size && max_lines == label.max_lines {
            return false;
        }

        if style.mode == TabMode::Fixed && text_size > label.size && line_count == 1 {
            // Growing a single line in fixed mode can push it onto a second
            // line, which would shrink it again on the next pass.
            let fits = label.layout.as_ref().is_some_and(|layout| {
                layout
                    .line_width(0)
                    .is_some_and(|w| w * (text_size / label.size) <= layout.width() as f32)
            });
            if !fits {
                tracing::trace!(
                    tab_id = %self.tab.id(),
                    from = label.size,
                    to = text_size,
                    "Rejected label size increase"
                );
                return false;
            }
        }

        label.size = text_size;
        label.max_lines = max_lines;
        true
    }

    fn sync_elements(&mut self) {
        let icon = self.tab.icon();
        match self.icon.as_mut() {
            Some(element) => element.icon = icon,
            None => {
                if icon.is_some() {
                    self.icon = Some(IconElement {
                        icon,
                        selected: self.selected,
                        scale: 1.0,
                    });
                }
            }
        }

        let text = self.tab.text().unwrap_or_default();
        match self.label.as_mut() {
            Some(element) => element.text = text,
            None => {
                if !text.is_empty() {
                    self.label = Some(LabelElement {
                        text,
                        size: self.style.text_size,
                        max_lines: DEFAULT_MAX_LINES,
                        selected: self.selected,
                        layout: None,
                    });
                }
            }
        }
    }
}
