//! Spill file for rows flushed out of a windowed sheet
//!
//! Flushed rows are appended to a temp file (removed on drop) as compact binary
//! records and read back, in order, only when the sheet is saved. Memory use
//! of a windowed sheet is the window plus a few counters.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Write};

use tempfile::NamedTempFile;

use super::{CellData, CellError, CellValue, RowData};
use crate::error::Result;
use crate::style::StyleId;

const HIDDEN: u8 = 0b01;
const HAS_HEIGHT: u8 = 0b10;

const TAG_BLANK: u8 = 0;
const TAG_NUMBER: u8 = 1;
const TAG_TEXT: u8 = 2;
const TAG_BOOLEAN: u8 = 3;
const TAG_ERROR: u8 = 4;
const TAG_FORMULA: u8 = 5;

/// Append-only store of flushed rows
#[derive(Debug, Default)]
pub(crate) struct SpillFile {
    /// Created on the first flushed row
    file: Option<NamedTempFile>,
    rows: usize,
    bytes: u64,
    first: Option<u32>,
    last: Option<u32>,
}

impl SpillFile {
    /// Append a row; rows arrive in ascending index order
    pub fn push(&mut self, index: u32, row: &RowData) -> Result<()> {
        let mut record = Vec::with_capacity(16 + row.cell_count() * 16);
        encode_row(&mut record, index, row);

        let file = match &mut self.file {
            Some(file) => file,
            slot @ None => slot.insert(NamedTempFile::new()?),
        };
        file.as_file_mut().write_all(&record)?;

        self.rows += 1;
        self.bytes += record.len() as u64;
        self.first.get_or_insert(index);
        self.last = Some(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    /// Size of the spilled records in bytes
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn first(&self) -> Option<u32> {
        self.first
    }

    pub fn last(&self) -> Option<u32> {
        self.last
    }

    /// Read the rows back from the start through a separate handle
    pub fn replay(&self) -> Result<FlushedRows> {
        let reader = match &self.file {
            Some(file) => Some(BufReader::new(file.reopen()?)),
            None => None,
        };
        Ok(FlushedRows {
            reader,
            remaining: self.rows,
        })
    }
}

/// Flushed rows in index order, decoded one at a time
#[derive(Debug)]
pub struct FlushedRows {
    reader: Option<BufReader<File>>,
    remaining: usize,
}

impl Iterator for FlushedRows {
    type Item = Result<(u32, RowData)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let reader = self.reader.as_mut()?;
        match decode_row(reader) {
            Ok(row) => {
                self.remaining -= 1;
                Some(Ok(row))
            }
            Err(err) => {
                self.remaining = 0;
                Some(Err(err.into()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

// === Encoding ===

fn encode_row(out: &mut Vec<u8>, index: u32, row: &RowData) {
    out.extend_from_slice(&index.to_le_bytes());
    let mut flags = 0;
    if row.hidden {
        flags |= HIDDEN;
    }
    if row.height.is_some() {
        flags |= HAS_HEIGHT;
    }
    out.push(flags);
    if let Some(height) = row.height {
        out.extend_from_slice(&height.to_le_bytes());
    }
    out.extend_from_slice(&(row.cell_count() as u32).to_le_bytes());
    for (col, cell) in row.cells() {
        out.extend_from_slice(&col.to_le_bytes());
        out.extend_from_slice(&cell.style.index().to_le_bytes());
        encode_value(out, &cell.value);
    }
}

fn encode_value(out: &mut Vec<u8>, value: &CellValue) {
    match value {
        CellValue::Blank => out.push(TAG_BLANK),
        CellValue::Number(n) => {
            out.push(TAG_NUMBER);
            out.extend_from_slice(&n.to_le_bytes());
        }
        CellValue::Text(s) => {
            out.push(TAG_TEXT);
            encode_str(out, s);
        }
        CellValue::Boolean(b) => {
            out.push(TAG_BOOLEAN);
            out.push(u8::from(*b));
        }
        CellValue::Error(e) => {
            out.push(TAG_ERROR);
            encode_str(out, e.as_str());
        }
        CellValue::Formula { text, cached } => {
            out.push(TAG_FORMULA);
            encode_str(out, text);
            match cached {
                Some(result) => {
                    out.push(1);
                    encode_value(out, result);
                }
                None => out.push(0),
            }
        }
    }
}

fn encode_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

// === Decoding ===

fn decode_row<R: Read>(r: &mut R) -> io::Result<(u32, RowData)> {
    let index = u32::from_le_bytes(read_array(r)?);
    let [flags] = read_array(r)?;
    let mut row = RowData::new();
    row.hidden = flags & HIDDEN != 0;
    if flags & HAS_HEIGHT != 0 {
        row.height = Some(f64::from_le_bytes(read_array(r)?));
    }
    let count = u32::from_le_bytes(read_array(r)?);
    for _ in 0..count {
        let col = u16::from_le_bytes(read_array(r)?);
        let style = StyleId::from_raw(u32::from_le_bytes(read_array(r)?));
        let value = decode_value(r)?;
        row.insert_cell(col, CellData::with_style(value, style));
    }
    Ok((index, row))
}

fn decode_value<R: Read>(r: &mut R) -> io::Result<CellValue> {
    let [tag] = read_array(r)?;
    let value = match tag {
        TAG_BLANK => CellValue::Blank,
        TAG_NUMBER => CellValue::Number(f64::from_le_bytes(read_array(r)?)),
        TAG_TEXT => CellValue::Text(decode_str(r)?),
        TAG_BOOLEAN => {
            let [b] = read_array(r)?;
            CellValue::Boolean(b != 0)
        }
        TAG_ERROR => {
            let text = decode_str(r)?;
            let error = CellError::parse(&text)
                .ok_or_else(|| invalid(format!("unknown error value {text}")))?;
            CellValue::Error(error)
        }
        TAG_FORMULA => {
            let text = decode_str(r)?;
            let [has_cached] = read_array(r)?;
            let cached = if has_cached == 1 {
                Some(Box::new(decode_value(r)?))
            } else {
                None
            };
            CellValue::Formula { text, cached }
        }
        other => return Err(invalid(format!("unknown value tag {other}"))),
    };
    Ok(value)
}

fn decode_str<R: Read>(r: &mut R) -> io::Result<String> {
    let len = u32::from_le_bytes(read_array(r)?) as usize;
    let mut bytes = vec![0; len];
    r.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
}

fn read_array<const N: usize, R: Read>(r: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg)
}
