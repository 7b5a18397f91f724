//! Cell border settings

use super::Color;

/// Border line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLine {
    #[default]
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

/// One side of a cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderEdge {
    pub line: BorderLine,
    pub color: Color,
}

impl BorderEdge {
    pub fn new(line: BorderLine, color: Color) -> Self {
        Self { line, color }
    }

    pub fn is_none(&self) -> bool {
        self.line == BorderLine::None
    }
}

/// Borders on the four sides of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
}

impl BorderStyle {
    /// Same edge on every side
    pub fn all(edge: BorderEdge) -> Self {
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
        }
    }
}
