//! Defined names

use crate::cell::CellRef;
use crate::error::{Error, Result};

/// A workbook-scoped defined name, e.g. `Grades` → `Lists!$A$1:$A$5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    pub name: String,
    /// Reference or formula the name stands for, without a leading `=`
    pub refers_to: String,
}

/// Collection of defined names; names are case-insensitive
#[derive(Debug, Clone, Default)]
pub struct DefinedNames {
    names: Vec<DefinedName>,
}

impl DefinedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a name
    pub fn define(&mut self, name: &str, refers_to: &str) -> Result<()> {
        validate_name(name)?;
        let refers_to = refers_to.strip_prefix('=').unwrap_or(refers_to).to_string();
        match self
            .names
            .iter_mut()
            .find(|n| n.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.refers_to = refers_to,
            None => self.names.push(DefinedName {
                name: name.to_string(),
                refers_to,
            }),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DefinedName> {
        self.names.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<DefinedName> {
        let pos = self
            .names
            .iter()
            .position(|n| n.name.eq_ignore_ascii_case(name))?;
        Some(self.names.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinedName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Names start with a letter or underscore, hold letters, digits, `_` and `.`,
/// and must not read as a cell reference
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_' || c == '\\');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if !valid_start || !valid_rest || name.len() > 255 || CellRef::parse(name).is_ok() {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_redefine() {
        let mut names = DefinedNames::new();
        names.define("Grades", "=Lists!$A$1:$A$5").unwrap();
        assert_eq!(names.get("grades").unwrap().refers_to, "Lists!$A$1:$A$5");
        names.define("GRADES", "Lists!$B$1:$B$5").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("Grades").unwrap().refers_to, "Lists!$B$1:$B$5");
    }

    #[test]
    fn test_invalid_names() {
        let mut names = DefinedNames::new();
        assert!(names.define("A1", "Sheet1!$A$1").is_err());
        assert!(names.define("1abc", "Sheet1!$A$1").is_err());
        assert!(names.define("has space", "Sheet1!$A$1").is_err());
        assert!(names.define("", "Sheet1!$A$1").is_err());
        assert!(names.define("Sheet1A1B2", "Sheet1!$A$1").is_ok());
    }
}
