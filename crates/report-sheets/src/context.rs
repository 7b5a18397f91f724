//! Engine options

use std::path::Path;

use report_sheets_core::CopyPolicy;
use report_sheets_io::DEFAULT_FILE_MODE;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options passed to engine constructors
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use report_sheets::Options;
///
/// let options = Options::from_json(r#"{"windowSize": 100}"#).unwrap();
/// assert_eq!(options.window_size, 100);
/// assert!(options.copy_policy.copy_formula);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Rows kept addressable by the streaming writer
    pub window_size: usize,
    /// What native row copies carry over
    pub copy_policy: CopyPolicy,
    /// chrono pattern for dates read as text
    pub date_pattern: String,
    /// Author recorded on written comments
    pub comment_author: String,
    /// Permission bits of saved files (Unix)
    pub file_mode: u32,
}

impl Options {
    pub const DEFAULT_WINDOW_SIZE: usize = 500;
    pub const DEFAULT_DATE_PATTERN: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_copy_policy(mut self, copy_policy: CopyPolicy) -> Self {
        self.copy_policy = copy_policy;
        self
    }

    pub fn with_comment_author(mut self, author: impl Into<String>) -> Self {
        self.comment_author = author.into();
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_size: Self::DEFAULT_WINDOW_SIZE,
            copy_policy: CopyPolicy::default(),
            date_pattern: Self::DEFAULT_DATE_PATTERN.to_string(),
            comment_author: String::new(),
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.window_size, 500);
        assert_eq!(options.file_mode, 0o644);
        assert_eq!(options.date_pattern, "%Y-%m-%d %H:%M:%S");
        assert_eq!(Options::from_json("{}").unwrap(), options);
    }

    #[test]
    fn test_copy_policy_from_json() {
        let options =
            Options::from_json(r#"{"copyPolicy": {"copyFormula": false}, "commentAuthor": "ops"}"#)
                .unwrap();
        assert!(!options.copy_policy.copy_formula);
        assert!(options.copy_policy.copy_style);
        assert_eq!(options.comment_author, "ops");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fileMode": 384}}"#).unwrap();
        assert_eq!(Options::from_path(file.path()).unwrap().file_mode, 0o600);

        let missing = file.path().with_extension("missing");
        assert!(matches!(Options::from_path(&missing), Err(Error::NotFound(_))));
    }
}
