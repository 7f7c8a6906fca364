use crate::error::Error;
use glob::Pattern;

/// Criteria for selecting which sheets and rows are read from a spreadsheet.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns for filtering which sheets to process.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Maximum number of sheets to read.
    pub sheet_limit: Option<usize>,

    /// Maximum number of data rows (after the header row) to read per sheet.
    pub rows_limit: Option<usize>,
}

impl Criteria {
    /// Builds criteria that only accept sheets matching one of the glob patterns.
    pub fn with_sheet_names(patterns: &[&str]) -> Result<Self, Error> {
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Criteria {
            sheet_name_patterns: Some(patterns),
            ..Criteria::default()
        })
    }

    pub fn sheet_limit(mut self, limit: usize) -> Self {
        self.sheet_limit = Some(limit);
        self
    }

    pub fn rows_limit(mut self, limit: usize) -> Self {
        self.rows_limit = Some(limit);
        self
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }

    /// Returns true once `sheet_count` sheets have been selected and the limit is reached.
    pub(crate) fn exhausted(&self, sheet_count: usize) -> bool {
        self.sheet_limit.map(|limit| sheet_count >= limit).unwrap_or(false)
    }
}
