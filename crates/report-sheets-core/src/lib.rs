//! # report-sheets-core
//!
//! Native workbook model used by the report-sheets cursor layer.
//!
//! This crate provides the document structures the codecs fill and the
//! cursor engines mutate:
//! - [`CellValue`] / [`CellKind`] - cell contents and their native kinds
//! - [`CellRef`] and [`CellRegion`] - cell addressing and inclusive regions
//! - [`Style`] and [`StyleTable`] - cell formatting, stored append-only
//! - [`RowStore`] - row storage in full or windowed mode
//! - [`Workbook`], [`Worksheet`] - the main document structures
//!
//! ## Example
//!
//! ```rust
//! use report_sheets_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_value(0, 0, CellValue::from("Hello")).unwrap();
//! sheet.set_value(0, 1, CellValue::Number(42.0)).unwrap();
//!
//! assert_eq!(sheet.cell(0, 1).unwrap().value, CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod comment;
pub mod error;
pub mod formula;
pub mod named_range;
pub mod style;
pub mod validation;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    column_to_letters, letters_to_column, CellData, CellError, CellKind, CellRef, CellRegion,
    CellValue, RowData, RowStore, StorageMode,
};
pub use comment::{CellComment, CommentAnchor};
pub use error::{Error, Result};
pub use named_range::{DefinedName, DefinedNames};
pub use validation::{DataValidation, ListSource};
pub use workbook::{Workbook, WorkbookSettings};
pub use worksheet::{
    ColumnSettings, CopyPolicy, FreezePanes, OutlineGroup, SheetProtection, Worksheet,
};

pub use style::{
    datetime_to_serial, serial_to_datetime, Alignment, BorderEdge, BorderLine, BorderStyle, Color,
    FillPattern, FillStyle, FontStyle, HorizontalAlignment, NumberFormat, Protection, Style,
    StyleId, StyleTable, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
