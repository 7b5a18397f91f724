//! Partial style builder applied on top of existing cell styles

use ahash::AHashMap;
use report_sheets_core::{
    BorderLine, Color, FillPattern, FontStyle, HorizontalAlignment, NumberFormat, Style, StyleId,
    StyleTable, VerticalAlignment,
};

/// A set of style overrides; unset fields leave the base style alone
///
/// ```rust
/// use report_sheets::{CellStyles, Colors};
/// use report_sheets_core::{BorderLine, StyleTable};
///
/// let mut table = StyleTable::new();
/// let mut styles = CellStyles::new()
///     .fill_color(Colors::LightYellow)
///     .borders(BorderLine::Thin, Colors::Black);
/// let id = styles.create(&mut table);
/// assert!(!table.resolve(id).fill.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CellStyles {
    number_format: Option<String>,
    font: Option<FontStyle>,
    hidden: Option<bool>,
    locked: Option<bool>,
    quote_prefix: Option<bool>,
    horizontal: Option<HorizontalAlignment>,
    vertical: Option<VerticalAlignment>,
    wrap_text: Option<bool>,
    rotation: Option<i16>,
    indent: Option<u8>,
    border_left: Option<(BorderLine, Color)>,
    border_right: Option<(BorderLine, Color)>,
    border_top: Option<(BorderLine, Color)>,
    border_bottom: Option<(BorderLine, Color)>,
    fill_pattern: Option<FillPattern>,
    fill_foreground: Option<Color>,
    fill_background: Option<Color>,
    /// Base style to derived style; `None` keys the default base
    cache: AHashMap<Option<StyleId>, StyleId>,
}

macro_rules! setter {
    ($(#[$doc:meta])* $name:ident: $ty:ty) => {
        $(#[$doc])*
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value.into());
            self.cache.clear();
            self
        }
    };
}

impl CellStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the `locked` flag
    pub fn locking(locked: bool) -> Self {
        Self::new().locked(locked)
    }

    // === Setters ===

    setter!(hidden: bool);
    setter!(locked: bool);
    setter!(quote_prefix: bool);
    setter!(horizontal: HorizontalAlignment);
    setter!(vertical: VerticalAlignment);
    setter!(wrap_text: bool);
    setter!(
        /// Rotation in degrees
        rotation: i16
    );
    setter!(indent: u8);
    setter!(fill_pattern: FillPattern);
    setter!(fill_foreground: Color);
    setter!(fill_background: Color);
    setter!(font: FontStyle);

    pub fn number_format(mut self, pattern: impl Into<String>) -> Self {
        self.number_format = Some(pattern.into());
        self.cache.clear();
        self
    }

    /// Solid fill in one color
    pub fn fill_color(self, color: impl Into<Color>) -> Self {
        self.fill_pattern(FillPattern::Solid).fill_foreground(color.into())
    }

    pub fn border_left(mut self, line: BorderLine, color: impl Into<Color>) -> Self {
        self.border_left = Some((line, color.into()));
        self.cache.clear();
        self
    }

    pub fn border_right(mut self, line: BorderLine, color: impl Into<Color>) -> Self {
        self.border_right = Some((line, color.into()));
        self.cache.clear();
        self
    }

    pub fn border_top(mut self, line: BorderLine, color: impl Into<Color>) -> Self {
        self.border_top = Some((line, color.into()));
        self.cache.clear();
        self
    }

    pub fn border_bottom(mut self, line: BorderLine, color: impl Into<Color>) -> Self {
        self.border_bottom = Some((line, color.into()));
        self.cache.clear();
        self
    }

    /// Same border on all four sides
    pub fn borders(self, line: BorderLine, color: impl Into<Color>) -> Self {
        let color = color.into();
        self.border_left(line, color)
            .border_right(line, color)
            .border_top(line, color)
            .border_bottom(line, color)
    }

    // === Application ===

    /// Write the overrides into `style`
    pub fn apply(&self, style: &mut Style) {
        if let Some(pattern) = &self.number_format {
            style.number_format = NumberFormat::from_pattern(pattern);
        }
        if let Some(font) = &self.font {
            style.font = font.clone();
        }
        if let Some(hidden) = self.hidden {
            style.protection.hidden = hidden;
        }
        if let Some(locked) = self.locked {
            style.protection.locked = locked;
        }
        if let Some(quote_prefix) = self.quote_prefix {
            style.quote_prefix = quote_prefix;
        }
        if let Some(horizontal) = self.horizontal {
            style.alignment.horizontal = horizontal;
        }
        if let Some(vertical) = self.vertical {
            style.alignment.vertical = vertical;
        }
        if let Some(wrap_text) = self.wrap_text {
            style.alignment.wrap_text = wrap_text;
        }
        if let Some(rotation) = self.rotation {
            style.alignment.rotation = rotation;
        }
        if let Some(indent) = self.indent {
            style.alignment.indent = indent;
        }
        let edges = [
            (self.border_left, &mut style.border.left),
            (self.border_right, &mut style.border.right),
            (self.border_top, &mut style.border.top),
            (self.border_bottom, &mut style.border.bottom),
        ];
        for (edge, target) in edges {
            if let Some((line, color)) = edge {
                target.line = line;
                target.color = color;
            }
        }
        if let Some(pattern) = self.fill_pattern {
            style.fill.pattern = pattern;
        }
        if let Some(color) = self.fill_foreground {
            style.fill.foreground = color;
        }
        if let Some(color) = self.fill_background {
            style.fill.background = color;
        }
    }

    /// Handle of `base` with the overrides applied
    ///
    /// The derived handle is cached per base, and a derived handle maps to
    /// itself, so applying the same builder again changes nothing.
    pub fn append_clone(&mut self, table: &mut StyleTable, base: Option<StyleId>) -> StyleId {
        if let Some(id) = self.cache.get(&base) {
            return *id;
        }
        let mut style = base.map_or_else(Style::default, |id| table.resolve(id).clone());
        self.apply(&mut style);
        let id = table.intern(style);
        self.cache.insert(base, id);
        self.cache.insert(Some(id), id);
        id
    }

    /// Handle of the default style with the overrides applied
    pub fn create(&mut self, table: &mut StyleTable) -> StyleId {
        self.append_clone(table, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Colors;

    #[test]
    fn test_unset_fields_keep_base() {
        let mut table = StyleTable::new();
        let base = table.push(Style::new().bold(true).number_format("0.00"));
        let mut styles = CellStyles::new().locked(false);

        let derived = styles.append_clone(&mut table, Some(base));
        let style = table.resolve(derived);
        assert!(style.font.bold);
        assert_eq!(style.number_format.pattern(), "0.00");
        assert!(!style.protection.locked);
        assert!(table.resolve(base).protection.locked);
    }

    #[test]
    fn test_append_clone_is_cached() {
        let mut table = StyleTable::new();
        let mut styles = CellStyles::new().fill_color(Colors::Gold);
        let a = styles.create(&mut table);
        let b = styles.create(&mut table);
        let again = styles.append_clone(&mut table, Some(a));
        assert_eq!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn test_borders() {
        let mut table = StyleTable::new();
        let mut styles = CellStyles::new().borders(BorderLine::Thin, Colors::Black);
        let id = styles.create(&mut table);
        let border = table.resolve(id).border;
        assert_eq!(border.left.line, BorderLine::Thin);
        assert_eq!(border.bottom.color, Color::BLACK);
    }
}
