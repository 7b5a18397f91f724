//! Spreadsheet file formats

use std::path::Path;

use crate::error::{CodecError, CodecResult};

/// Workbook file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Legacy binary workbook (`.xls`), read only
    Xls,
    /// Office Open XML workbook (`.xlsx`)
    Xlsx,
}

impl FileFormat {
    /// Detect the format from the path extension (case-insensitive)
    pub fn from_path(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xls" => Ok(FileFormat::Xls),
            "xlsx" => Ok(FileFormat::Xlsx),
            _ => Err(CodecError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xls => "xls",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("a/b/report.XLSX").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_path("old.xls").unwrap(), FileFormat::Xls);
        assert!(matches!(
            FileFormat::from_path("data.csv"),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path("noext").is_err());
    }
}
