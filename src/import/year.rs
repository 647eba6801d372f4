//! Reporting-year resolution
//!
//! Record types bucketed by a reporting year resolve the effective year per
//! row in precedence order: explicit override from the import request, then
//! the row's own year column, then a 4-digit year token in the uploaded
//! filename. A row with no resolvable year, or a year outside the schema's
//! range, is a validation error.

use crate::schema::PartitionSpec;
use once_cell::sync::Lazy;
use regex::Regex;

static FILENAME_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"20\d{2}").unwrap());

/// Resolves the effective year for each row of one import.
#[derive(Debug)]
pub struct YearResolver {
    label: &'static str,
    min: i32,
    max: i32,
    override_year: Option<i32>,
    filename_year: Option<i32>,
}

impl YearResolver {
    pub fn new(spec: &PartitionSpec, override_year: Option<i32>, filename: Option<&str>) -> Self {
        let filename_year = filename
            .and_then(|name| FILENAME_YEAR.find(name))
            .and_then(|m| m.as_str().parse().ok());
        Self {
            label: spec.aliases[0],
            min: spec.min,
            max: spec.max,
            override_year,
            filename_year,
        }
    }

    /// Whether any year source exists at all. With no override, no year
    /// column, and no filename hint, the file is rejected before row
    /// processing with a hint listing all three options.
    pub fn has_any_source(&self, column_present: bool) -> bool {
        self.override_year.is_some() || column_present || self.filename_year.is_some()
    }

    /// Validate the request-level override once, before any rows run.
    pub fn check_override(&self) -> Result<(), String> {
        match self.override_year {
            Some(y) if y < self.min || y > self.max => Err(self.range_message()),
            _ => Ok(()),
        }
    }

    /// Resolve the year for one row. `row_value` is the trimmed cell from
    /// the year column, if that column exists and the cell is non-blank.
    pub fn resolve_row(&self, row_value: Option<&str>) -> Result<i32, String> {
        if let Some(y) = self.override_year {
            return Ok(y);
        }
        if let Some(raw) = row_value {
            return match raw.parse::<i32>() {
                Ok(y) if y >= self.min && y <= self.max => Ok(y),
                Ok(_) => Err(self.range_message()),
                Err(_) => Err(self.missing_message()),
            };
        }
        match self.filename_year {
            Some(y) if y >= self.min && y <= self.max => Ok(y),
            Some(_) => Err(self.range_message()),
            None => Err(self.missing_message()),
        }
    }

    fn missing_message(&self) -> String {
        format!("{} is missing or not a number", self.label)
    }

    fn range_message(&self) -> String {
        format!("{} must be between {} and {}", self.label, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PartitionSpec {
        PartitionSpec {
            field: "year",
            aliases: &["Year"],
            min: 2000,
            max: 2100,
        }
    }

    #[test]
    fn test_override_wins_over_row_column() {
        let resolver = YearResolver::new(&spec(), Some(2023), None);
        assert_eq!(resolver.resolve_row(Some("2020")), Ok(2023));
    }

    #[test]
    fn test_row_column_wins_over_filename() {
        let resolver = YearResolver::new(&spec(), None, Some("closed_files_2021.csv"));
        assert_eq!(resolver.resolve_row(Some("2020")), Ok(2020));
    }

    #[test]
    fn test_filename_inference_as_last_resort() {
        let resolver = YearResolver::new(&spec(), None, Some("closed_files_2021.csv"));
        assert_eq!(resolver.resolve_row(None), Ok(2021));
    }

    #[test]
    fn test_unresolvable_year_is_row_error() {
        let resolver = YearResolver::new(&spec(), None, Some("closed_files.csv"));
        assert_eq!(
            resolver.resolve_row(None),
            Err("Year is missing or not a number".to_string())
        );
    }

    #[test]
    fn test_non_numeric_row_year_is_row_error() {
        let resolver = YearResolver::new(&spec(), None, None);
        assert_eq!(
            resolver.resolve_row(Some("twenty")),
            Err("Year is missing or not a number".to_string())
        );
    }

    #[test]
    fn test_out_of_range_row_year() {
        let resolver = YearResolver::new(&spec(), None, None);
        assert_eq!(
            resolver.resolve_row(Some("1999")),
            Err("Year must be between 2000 and 2100".to_string())
        );
    }

    #[test]
    fn test_out_of_range_override_rejected_up_front() {
        let resolver = YearResolver::new(&spec(), Some(1990), None);
        assert!(resolver.check_override().is_err());
    }

    #[test]
    fn test_source_detection() {
        let none = YearResolver::new(&spec(), None, Some("roster.csv"));
        assert!(!none.has_any_source(false));
        assert!(none.has_any_source(true));

        let from_name = YearResolver::new(&spec(), None, Some("roster_2024.csv"));
        assert!(from_name.has_any_source(false));
    }
}
