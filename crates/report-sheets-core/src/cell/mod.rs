//! Cell addressing, values and row storage

mod address;
mod spill;
mod storage;
mod value;

pub use address::{column_to_letters, letters_to_column, CellRef, CellRegion};
pub use spill::FlushedRows;
pub use storage::{CellData, RowData, RowStore, StorageMode};
pub use value::{CellError, CellKind, CellValue};
