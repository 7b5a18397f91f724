//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - Complete cell style
//! - [`StyleTable`] - Append-only storage addressed by [`StyleId`]
//! - [`FontStyle`], [`FillStyle`], [`BorderStyle`], [`Alignment`]
//! - [`NumberFormat`] - Display format and formatted rendering

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod table;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLine, BorderStyle};
pub use color::Color;
pub use fill::{FillPattern, FillStyle};
pub use font::FontStyle;
pub use number_format::{datetime_to_serial, serial_to_datetime, NumberFormat};
pub use table::StyleTable;

use std::fmt;

/// Handle of a style inside a [`StyleTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StyleId(u32);

impl StyleId {
    /// The default style (table entry 0)
    pub const DEFAULT: StyleId = StyleId(0);

    /// Raw table index
    pub fn index(self) -> u32 {
        self.0
    }

    /// Handle for a raw index read back from storage
    pub(crate) const fn from_raw(index: u32) -> Self {
        StyleId(index)
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
    pub protection: Protection,
    /// Text is stored with a leading apostrophe (forced text)
    pub quote_prefix: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set a solid fill
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::solid(color);
        self
    }

    /// Set the number format from a pattern
    pub fn number_format(mut self, pattern: &str) -> Self {
        self.number_format = NumberFormat::from_pattern(pattern);
        self
    }

    /// Set the locked flag
    pub fn locked(mut self, locked: bool) -> Self {
        self.protection.locked = locked;
        self
    }
}

/// Cell protection settings, effective once the sheet is protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    pub locked: bool,
    /// Formula is hidden when the sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}
