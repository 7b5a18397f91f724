//! Cell fill settings

use super::Color;

/// Fill pattern, named after the OOXML pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

/// Pattern fill with foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FillStyle {
    pub pattern: FillPattern,
    pub foreground: Color,
    pub background: Color,
}

impl FillStyle {
    /// Solid fill in one color
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: FillPattern::Solid,
            foreground: color,
            background: Color::Auto,
        }
    }

    pub fn is_none(&self) -> bool {
        self.pattern == FillPattern::None
    }
}
