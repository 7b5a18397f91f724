//! Style conversion for the xlsx writer

use report_sheets_core::style::{
    BorderLine, FillPattern, HorizontalAlignment, NumberFormat, Style, StyleTable,
    VerticalAlignment,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline};

/// One writer format per style table entry, indexed by style index
pub(crate) fn build_formats(styles: &StyleTable) -> Vec<Format> {
    styles.iter().map(|(_, style)| to_format(style)).collect()
}

/// Convert a style, setting only what differs from the default style
pub(crate) fn to_format(style: &Style) -> Format {
    let defaults = Style::default();
    let mut format = Format::new();

    // === Font ===
    let font = &style.font;
    if font.name != defaults.font.name {
        format = format.set_font_name(font.name.as_str());
    }
    if font.size != defaults.font.size {
        format = format.set_font_size(font.size);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if font.strikethrough {
        format = format.set_font_strikethrough();
    }
    if let Some(rgb) = font.color.to_rgb_u32() {
        format = format.set_font_color(rust_xlsxwriter::Color::RGB(rgb));
    }

    // === Number Format ===
    match &style.number_format {
        NumberFormat::General => {}
        NumberFormat::BuiltIn(id) => match u8::try_from(*id) {
            Ok(index) => format = format.set_num_format_index(index),
            Err(_) => format = format.set_num_format(style.number_format.pattern()),
        },
        NumberFormat::Custom(pattern) => format = format.set_num_format(pattern.as_str()),
    }

    // === Alignment ===
    let alignment = &style.alignment;
    if let Some(align) = horizontal(alignment.horizontal) {
        format = format.set_align(align);
    }
    if let Some(align) = vertical(alignment.vertical) {
        format = format.set_align(align);
    }
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    if alignment.rotation != 0 {
        format = format.set_rotation(alignment.rotation);
    }
    if alignment.indent > 0 {
        format = format.set_indent(alignment.indent);
    }

    // === Borders ===
    let border = &style.border;
    if !border.top.is_none() {
        format = format.set_border_top(border_line(border.top.line));
        if let Some(rgb) = border.top.color.to_rgb_u32() {
            format = format.set_border_top_color(rust_xlsxwriter::Color::RGB(rgb));
        }
    }
    if !border.bottom.is_none() {
        format = format.set_border_bottom(border_line(border.bottom.line));
        if let Some(rgb) = border.bottom.color.to_rgb_u32() {
            format = format.set_border_bottom_color(rust_xlsxwriter::Color::RGB(rgb));
        }
    }
    if !border.left.is_none() {
        format = format.set_border_left(border_line(border.left.line));
        if let Some(rgb) = border.left.color.to_rgb_u32() {
            format = format.set_border_left_color(rust_xlsxwriter::Color::RGB(rgb));
        }
    }
    if !border.right.is_none() {
        format = format.set_border_right(border_line(border.right.line));
        if let Some(rgb) = border.right.color.to_rgb_u32() {
            format = format.set_border_right_color(rust_xlsxwriter::Color::RGB(rgb));
        }
    }

    // === Fill ===
    if !style.fill.is_none() {
        format = format.set_pattern(pattern(style.fill.pattern));
        if let Some(rgb) = style.fill.foreground.to_rgb_u32() {
            format = format.set_foreground_color(rust_xlsxwriter::Color::RGB(rgb));
        }
        if let Some(rgb) = style.fill.background.to_rgb_u32() {
            format = format.set_background_color(rust_xlsxwriter::Color::RGB(rgb));
        }
    }

    // === Protection ===
    if !style.protection.locked {
        format = format.set_unlocked();
    }
    if style.protection.hidden {
        format = format.set_hidden();
    }
    if style.quote_prefix {
        format = format.set_quote_prefix();
    }

    format
}

fn horizontal(align: HorizontalAlignment) -> Option<FormatAlign> {
    let align = match align {
        HorizontalAlignment::General => return None,
        HorizontalAlignment::Left => FormatAlign::Left,
        HorizontalAlignment::Center => FormatAlign::Center,
        HorizontalAlignment::Right => FormatAlign::Right,
        HorizontalAlignment::Fill => FormatAlign::Fill,
        HorizontalAlignment::Justify => FormatAlign::Justify,
        HorizontalAlignment::CenterContinuous => FormatAlign::CenterAcross,
        HorizontalAlignment::Distributed => FormatAlign::Distributed,
    };
    Some(align)
}

fn vertical(align: VerticalAlignment) -> Option<FormatAlign> {
    let align = match align {
        VerticalAlignment::Bottom => return None,
        VerticalAlignment::Top => FormatAlign::Top,
        VerticalAlignment::Center => FormatAlign::VerticalCenter,
        VerticalAlignment::Justify => FormatAlign::VerticalJustify,
        VerticalAlignment::Distributed => FormatAlign::VerticalDistributed,
    };
    Some(align)
}

fn border_line(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::None => FormatBorder::None,
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
        BorderLine::Dashed => FormatBorder::Dashed,
        BorderLine::Dotted => FormatBorder::Dotted,
        BorderLine::Thick => FormatBorder::Thick,
        BorderLine::Double => FormatBorder::Double,
        BorderLine::Hair => FormatBorder::Hair,
        BorderLine::MediumDashed => FormatBorder::MediumDashed,
        BorderLine::DashDot => FormatBorder::DashDot,
        BorderLine::MediumDashDot => FormatBorder::MediumDashDot,
        BorderLine::DashDotDot => FormatBorder::DashDotDot,
        BorderLine::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        BorderLine::SlantDashDot => FormatBorder::SlantDashDot,
    }
}

fn pattern(pattern: FillPattern) -> FormatPattern {
    match pattern {
        FillPattern::None => FormatPattern::None,
        FillPattern::Solid => FormatPattern::Solid,
        FillPattern::MediumGray => FormatPattern::MediumGray,
        FillPattern::DarkGray => FormatPattern::DarkGray,
        FillPattern::LightGray => FormatPattern::LightGray,
        FillPattern::DarkHorizontal => FormatPattern::DarkHorizontal,
        FillPattern::DarkVertical => FormatPattern::DarkVertical,
        FillPattern::DarkDown => FormatPattern::DarkDown,
        FillPattern::DarkUp => FormatPattern::DarkUp,
        FillPattern::DarkGrid => FormatPattern::DarkGrid,
        FillPattern::DarkTrellis => FormatPattern::DarkTrellis,
        FillPattern::LightHorizontal => FormatPattern::LightHorizontal,
        FillPattern::LightVertical => FormatPattern::LightVertical,
        FillPattern::LightDown => FormatPattern::LightDown,
        FillPattern::LightUp => FormatPattern::LightUp,
        FillPattern::LightGrid => FormatPattern::LightGrid,
        FillPattern::LightTrellis => FormatPattern::LightTrellis,
        FillPattern::Gray125 => FormatPattern::Gray125,
        FillPattern::Gray0625 => FormatPattern::Gray0625,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_plain_format() {
        assert_eq!(to_format(&Style::default()), Format::new());
    }

    #[test]
    fn test_formats_follow_table() {
        let mut table = StyleTable::new();
        table.push(Style::new().bold(true));
        let formats = build_formats(&table);
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[1], Format::new().set_bold());
    }
}
