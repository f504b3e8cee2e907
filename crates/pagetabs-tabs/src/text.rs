//! Text measurement seam
//!
//! Labels never rasterize glyphs here; a [`TextMeasurer`] reports how a
//! string breaks into lines at a given size and width so the item can pick
//! its text size and line limit.

use unicode_width::UnicodeWidthChar;

use crate::geometry::Px;

/// Result of laying out a label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    lines: Vec<f32>,
    width: Px,
    line_height: Px,
}

impl TextLayout {
    pub fn new(lines: Vec<f32>, width: Px, line_height: Px) -> Self {
        Self {
            lines,
            width,
            line_height,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Painted width of a line in px
    pub fn line_width(&self, line: usize) -> Option<f32> {
        self.lines.get(line).copied()
    }

    /// Width the text was laid out against
    pub fn width(&self) -> Px {
        self.width
    }

    pub fn height(&self) -> Px {
        self.line_height * self.lines.len() as Px
    }

    pub fn max_line_width(&self) -> f32 {
        self.lines.iter().copied().fold(0.0, f32::max)
    }
}

pub trait TextMeasurer: Send + Sync {
    /// Break `text` at `size` px into at most `max_lines` lines no wider than
    /// `max_width` (unbounded when `None`).
    fn layout(&self, text: &str, size: f32, max_width: Option<Px>, max_lines: usize) -> TextLayout;
}

/// Measurer that assumes a fixed advance per terminal column.
///
/// Each character advances `advance × size × columns`, where columns come
/// from its Unicode display width. Lines break greedily at whitespace and
/// inside words that are wider than a line on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasurer {
    pub advance: f32,
    pub line_spacing: f32,
}

impl ApproxTextMeasurer {
    pub fn new(advance: f32, line_spacing: f32) -> Self {
        Self {
            advance,
            line_spacing,
        }
    }

    fn char_width(&self, c: char, size: f32) -> f32 {
        c.width().unwrap_or(0) as f32 * self.advance * size
    }

    fn word_width(&self, word: &str, size: f32) -> f32 {
        word.chars().map(|c| self.char_width(c, size)).sum()
    }
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self {
        Self::new(0.5, 1.2)
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn layout(&self, text: &str, size: f32, max_width: Option<Px>, max_lines: usize) -> TextLayout {
        let limit = max_width.map(|w| w as f32).unwrap_or(f32::INFINITY);
        let space = self.char_width(' ', size);
        let mut lines: Vec<f32> = Vec::new();
        let mut current = 0.0f32;
        let mut line_open = false;

        for word in text.split_whitespace() {
            let width = self.word_width(word, size);
            let needed = if line_open { current + space + width } else { width };

            if needed <= limit {
                current = needed;
                line_open = true;
                continue;
            }

            if line_open {
                lines.push(current);
                current = 0.0;
                line_open = false;
            }

            if width <= limit {
                current = width;
                line_open = true;
                continue;
            }

            // Word wider than a whole line: break between characters
            for c in word.chars() {
                let w = self.char_width(c, size);
                if line_open && current + w > limit {
                    lines.push(current);
                    current = 0.0;
                }
                current += w;
                line_open = true;
            }
        }

        if line_open {
            lines.push(current);
        }

        lines.truncate(max_lines.max(1));

        let width = match max_width {
            Some(w) => w,
            None => lines.iter().copied().fold(0.0, f32::max).ceil() as Px,
        };
        let line_height = (size * self.line_spacing).ceil() as Px;

        TextLayout::new(lines, width, line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let measurer = ApproxTextMeasurer::new(0.5, 1.0);
        let layout = measurer.layout("Cake", 10.0, None, 2);
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.line_width(0), Some(20.0));
        assert_eq!(layout.width(), 20);
        assert_eq!(layout.height(), 10);
    }

    #[test]
    fn test_wraps_at_whitespace() {
        let measurer = ApproxTextMeasurer::new(0.5, 1.0);
        // "Apple" and "Pie" are 25px and 15px at size 10; a space is 5px.
        let layout = measurer.layout("Apple Pie", 10.0, Some(30), 2);
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.line_width(0), Some(25.0));
        assert_eq!(layout.line_width(1), Some(15.0));
        assert_eq!(layout.width(), 30);
    }

    #[test]
    fn test_truncates_to_max_lines() {
        let measurer = ApproxTextMeasurer::new(0.5, 1.0);
        let layout = measurer.layout("a b c d", 10.0, Some(5), 2);
        assert_eq!(layout.line_count(), 2);
    }

    #[test]
    fn test_breaks_long_word() {
        let measurer = ApproxTextMeasurer::new(0.5, 1.0);
        let layout = measurer.layout("hamburger", 10.0, Some(20), 5);
        assert_eq!(layout.line_count(), 3);
        assert_eq!(layout.line_width(2), Some(5.0));
    }

    #[test]
    fn test_wide_characters_take_two_columns() {
        let measurer = ApproxTextMeasurer::new(0.5, 1.0);
        let layout = measurer.layout("蛋糕", 10.0, None, 1);
        assert_eq!(layout.line_width(0), Some(20.0));
    }
}
