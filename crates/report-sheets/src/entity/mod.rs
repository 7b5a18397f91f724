//! Logical entity model exchanged with callers

mod cell;
mod config;
mod data_type;
mod row;

pub use cell::Cell;
pub use config::{FooterConfig, ParseConfig, RowConfig, TotalRange};
pub use data_type::DataType;
pub use row::{Row, SheetEntry, Table};
