//! Cell comments (notes)
//!
//! ## Example
//!
//! ```rust
//! use report_sheets_core::CellComment;
//!
//! let comment = CellComment::new("reviewer", "Check this total").anchored_at(4, 2);
//! assert_eq!(comment.anchor.last_row, 6);
//! assert_eq!(comment.anchor.last_col, 4);
//! ```

/// Box position of a comment, in cell coordinates (0-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentAnchor {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

/// A cell comment
#[derive(Debug, Clone, PartialEq)]
pub struct CellComment {
    pub author: String,
    pub text: String,
    pub anchor: CommentAnchor,
    /// Whether the comment box is shown without hovering
    pub visible: bool,
}

impl CellComment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            anchor: CommentAnchor::default(),
            visible: false,
        }
    }

    /// Anchor the box at `(row, col)` spanning two rows and two columns
    pub fn anchored_at(mut self, row: u32, col: u16) -> Self {
        self.anchor = CommentAnchor {
            first_row: row,
            first_col: col,
            last_row: row.saturating_add(2),
            last_col: col.saturating_add(2),
        };
        self
    }
}
