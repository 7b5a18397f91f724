//! List data validations (dropdowns)

use crate::cell::CellRegion;

/// Where the allowed values of a list validation come from
#[derive(Debug, Clone, PartialEq)]
pub enum ListSource {
    /// Explicit values
    Items(Vec<String>),
    /// Formula yielding the values, usually a defined name (`=Grades`)
    Formula(String),
}

/// A list validation applied to one or more regions
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidation {
    pub source: ListSource,
    pub regions: Vec<CellRegion>,
    /// Reject input outside the list with an error box
    pub show_error_box: bool,
    /// Show the in-cell dropdown arrow
    pub show_dropdown: bool,
    pub allow_blank: bool,
}

impl DataValidation {
    /// Maximum number of explicit items in a list
    pub const MAX_ITEMS: usize = 128;

    /// Validation over explicit values
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(ListSource::Items(items.into_iter().map(Into::into).collect()))
    }

    /// Validation whose values come from a formula; a leading `=` is added when missing
    pub fn formula_list(formula: impl AsRef<str>) -> Self {
        let formula = formula.as_ref();
        let formula = if formula.starts_with('=') {
            formula.to_string()
        } else {
            format!("={formula}")
        };
        Self::with_source(ListSource::Formula(formula))
    }

    fn with_source(source: ListSource) -> Self {
        Self {
            source,
            regions: Vec::new(),
            show_error_box: true,
            show_dropdown: true,
            allow_blank: true,
        }
    }

    /// Add a target region
    pub fn on(mut self, region: CellRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Check whether the validation covers a cell
    pub fn applies_to(&self, row: u32, col: u16) -> bool {
        self.regions.iter().any(|r| r.contains(row, col))
    }
}
