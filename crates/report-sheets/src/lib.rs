//! # report-sheets
//!
//! Cursor-based spreadsheet writing and reading for report generation.
//!
//! An engine holds one workbook and a cursor over it (sheet, row, cell).
//! Operations act on what the cursor selects and return the engine, so
//! they chain:
//!
//! - [`SheetWriter`] - builds a workbook with random access to every row
//! - [`StreamingWriter`] - builds large workbooks keeping only a row window
//! - [`Rewriter`] - opens an `.xls` / `.xlsx` file and edits it in place
//! - [`SheetReader`] - opens a file and iterates its rows as data objects
//!
//! The capabilities live in traits shared by the engines: [`Navigable`],
//! [`Readable`], [`SheetIterate`], [`Writable`], [`SheetWritable`] and
//! [`Copyable`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use report_sheets::prelude::*;
//!
//! # fn main() -> report_sheets::Result<()> {
//! let mut writer = SheetWriter::new("Contacts", Options::default())?;
//! writer
//!     .row(0)?
//!     .cell_at(Column::A)?
//!     .write_text(Some("Name"))?
//!     .cell_at(Column::B)?
//!     .write_text(Some("Phone"))?
//!     .row(1)?
//!     .cell_at(Column::A)?
//!     .write_text(Some("Ann"))?
//!     .cell_at(Column::B)?
//!     .write_text(Some("187-0000-0000"))?
//!     .freeze(0, 1)?;
//! writer.save_workbook("out/contacts.xlsx")?;
//!
//! let mut reader = SheetReader::open("out/contacts.xlsx", None)?;
//! reader.sheet(0)?.row(0)?;
//! let headers = reader.headers()?;
//! while let Some(row) = reader.next()? {
//!     println!("{}", row.row_json_object(&headers)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cell_styles;
pub mod colors;
pub mod context;
pub mod convert;
pub mod coordinate;
pub mod copy;
pub mod cursor;
pub mod engine;
pub mod entity;
pub mod error;
pub mod formula;
pub mod navigate;
pub mod prelude;
pub mod read;
pub mod rownum;
pub mod sheet;
pub mod style_cache;
pub mod write;

pub use cell_styles::CellStyles;
pub use colors::Colors;
pub use context::Options;
pub use coordinate::{Column, Position, Range};
pub use copy::Copyable;
pub use cursor::{Cursor, CursorState, Document, DocumentHandle};
pub use engine::{Rewriter, SheetReader, SheetWriter, StreamingWriter};
pub use entity::{
    Cell, DataType, FooterConfig, ParseConfig, Row, RowConfig, SheetEntry, Table, TotalRange,
};
pub use error::{Error, Result};
pub use formula::Formula;
pub use navigate::{Navigable, SheetIterate};
pub use read::{CellReader, Readable};
pub use rownum::Rownum;
pub use sheet::SheetWritable;
pub use style_cache::StyleCache;
pub use write::Writable;
