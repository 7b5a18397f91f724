//! Prelude module - engines, capability traits and common value types
//!
//! ```rust
//! use report_sheets::prelude::*;
//! ```

pub use crate::{
    // Value types
    Cell,
    CellStyles,
    Colors,
    Column,
    // Capability traits
    Copyable,
    DataType,
    // Error types
    Error,
    Formula,
    Navigable,
    Options,
    Position,
    Range,
    Readable,
    Result,
    // Engines
    Rewriter,
    Row,
    Rownum,
    SheetIterate,
    SheetReader,
    SheetWritable,
    SheetWriter,
    StreamingWriter,
    Writable,
};
