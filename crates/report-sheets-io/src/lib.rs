//! # report-sheets-io
//!
//! Codec layer for report-sheets:
//! - [`WorkbookReader`] opens `.xls` / `.xlsx` files into a
//!   [`report_sheets_core::Workbook`]
//! - [`WorkbookWriter`] writes a workbook as `.xlsx`
//! - [`save`] writes to disk, creating parent directories and fixing permissions
//!
//! ## Example
//!
//! ```rust,no_run
//! use report_sheets_core::{CellValue, Workbook};
//! use report_sheets_io::{save, ReadOptions, WorkbookReader};
//!
//! let mut workbook = Workbook::new();
//! workbook
//!     .worksheet_mut(0)
//!     .unwrap()
//!     .set_value(0, 0, CellValue::from("Total"))
//!     .unwrap();
//! let path = save(&workbook, "out/report.xlsx").unwrap();
//!
//! let reopened = WorkbookReader::read_file(&path, &ReadOptions::default()).unwrap();
//! assert_eq!(reopened.sheet_count(), 1);
//! ```

pub mod error;
pub mod format;
pub mod reader;
mod styles;
pub mod writer;

pub use error::{CodecError, CodecResult};
pub use format::FileFormat;
pub use reader::{ReadOptions, WorkbookReader};
pub use writer::{save, save_with_mode, WorkbookWriter, DEFAULT_FILE_MODE};
