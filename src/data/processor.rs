//! Data Processor Module
//! Normalizes raw CSV exports into the typed sick-leave dataset.

use polars::prelude::*;
use thiserror::Error;

/// Internal name of the sick-day count column.
pub const WORK_DAYS: &str = "work_days";
/// Internal name of the age column.
pub const AGE: &str = "age";
/// Internal name of the gender column.
pub const GENDER: &str = "gender";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' not found in input")]
    MissingColumn(&'static str),
    #[error("Columns '{0}' and '{1}' both map to '{2}'")]
    DuplicateColumn(String, String, &'static str),
    #[error("Row {row}: cannot parse '{value}' as {column}")]
    BadValue {
        column: &'static str,
        row: usize,
        value: String,
    },
    #[error("Row {row}: missing value in column '{column}'")]
    MissingValue { column: &'static str, row: usize },
}

/// Normalized sick-leave dataset.
///
/// Wraps the cleaned DataFrame (non-essential columns carried through
/// untouched) together with the three typed columns the hypothesis tests
/// consume. Immutable after construction.
#[derive(Debug)]
pub struct SickLeaveData {
    df: DataFrame,
    work_days: Vec<i64>,
    age: Vec<f64>,
    gender: Vec<String>,
}

impl SickLeaveData {
    /// Sick-day counts, one per row.
    pub fn work_days(&self) -> &[i64] {
        &self.work_days
    }

    /// Ages, one per row.
    pub fn age(&self) -> &[f64] {
        &self.age
    }

    /// Gender labels, one per row, quote-stripped and non-empty.
    pub fn gender(&self) -> &[String] {
        &self.gender
    }

    /// The full cleaned DataFrame, including pass-through columns.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.work_days.len()
    }

    /// (min, max) of the sick-day counts. None on an empty dataset.
    pub fn work_days_range(&self) -> Option<(i64, i64)> {
        let min = self.work_days.iter().min()?;
        let max = self.work_days.iter().max()?;
        Some((*min, *max))
    }

    /// (min, max) of the ages. None on an empty dataset.
    pub fn age_range(&self) -> Option<(f64, f64)> {
        self.age.iter().copied().fold(None, |acc, a| match acc {
            None => Some((a, a)),
            Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
        })
    }

    /// Boolean age-bucket labels for the age hypothesis: "true" where
    /// `age > threshold`, "false" otherwise.
    pub fn age_over(&self, threshold: f64) -> Vec<String> {
        self.age
            .iter()
            .map(|a| (*a > threshold).to_string())
            .collect()
    }
}

/// Turns a raw export DataFrame into a [`SickLeaveData`].
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize a raw export: rename the three required columns to stable
    /// internal names, strip stray quote characters, coerce types.
    ///
    /// Any row that fails coercion fails the whole file.
    pub fn normalize(raw: &DataFrame) -> Result<SickLeaveData, ProcessorError> {
        let mut df = raw.clone();

        for (target, aliases) in [
            (WORK_DAYS, &["количествобольничныхдней", "work_days", "sick_days"][..]),
            (AGE, &["возраст", "age"][..]),
            (GENDER, &["пол", "gender"][..]),
        ] {
            let source = Self::find_source_column(&df, target, aliases)?;
            if source != target {
                df.rename(&source, target.into())?;
            }
        }

        let work_days = Self::clean_count_column(df.column(WORK_DAYS)?)?;
        let age = Self::clean_numeric_column(df.column(AGE)?)?;
        let gender = Self::clean_label_column(df.column(GENDER)?)?;

        df.with_column(Column::new(WORK_DAYS.into(), work_days.clone()))?;
        df.with_column(Column::new(AGE.into(), age.clone()))?;
        df.with_column(Column::new(GENDER.into(), gender.clone()))?;

        Ok(SickLeaveData {
            df,
            work_days,
            age,
            gender,
        })
    }

    /// Find the unique raw column whose normalized header matches one of the
    /// known aliases for `target`.
    fn find_source_column(
        df: &DataFrame,
        target: &'static str,
        aliases: &[&str],
    ) -> Result<String, ProcessorError> {
        let mut found: Option<String> = None;
        for name in df.get_column_names() {
            let normalized = Self::normalize_header(name);
            if aliases.iter().any(|a| *a == normalized) {
                match found {
                    None => found = Some(name.to_string()),
                    Some(first) => {
                        return Err(ProcessorError::DuplicateColumn(
                            first,
                            name.to_string(),
                            target,
                        ))
                    }
                }
            }
        }
        found.ok_or(ProcessorError::MissingColumn(target))
    }

    /// Strip quote characters and whitespace from a header and case-fold it.
    ///
    /// The real export double-encodes headers, leaving literal `"` baked into
    /// column names (e.g. `"Количество больничных дней`). Matching on the
    /// stripped form loads that file without hard-coding the malformed text.
    fn normalize_header(raw: &str) -> String {
        raw.chars()
            .filter(|c| *c != '"' && *c != '\'' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
    }

    /// Coerce a column to non-negative sick-day counts, stripping residual
    /// quote characters first.
    fn clean_count_column(col: &Column) -> Result<Vec<i64>, ProcessorError> {
        let as_str = col.cast(&DataType::String)?;
        let ca = as_str.str()?;
        let mut out = Vec::with_capacity(ca.len());
        for (row, cell) in ca.into_iter().enumerate() {
            let cell = cell.ok_or(ProcessorError::MissingValue {
                column: WORK_DAYS,
                row,
            })?;
            let token = cell.replace('"', "");
            let token = token.trim();
            let value: i64 = token.parse().map_err(|_| ProcessorError::BadValue {
                column: WORK_DAYS,
                row,
                value: cell.to_string(),
            })?;
            if value < 0 {
                return Err(ProcessorError::BadValue {
                    column: WORK_DAYS,
                    row,
                    value: cell.to_string(),
                });
            }
            out.push(value);
        }
        Ok(out)
    }

    /// Coerce a column to f64, tolerating stray quotes around numeric text.
    fn clean_numeric_column(col: &Column) -> Result<Vec<f64>, ProcessorError> {
        let as_str = col.cast(&DataType::String)?;
        let ca = as_str.str()?;
        let mut out = Vec::with_capacity(ca.len());
        for (row, cell) in ca.into_iter().enumerate() {
            let cell = cell.ok_or(ProcessorError::MissingValue { column: AGE, row })?;
            let token = cell.replace('"', "");
            let token = token.trim();
            let value: f64 = token.parse().map_err(|_| ProcessorError::BadValue {
                column: AGE,
                row,
                value: cell.to_string(),
            })?;
            out.push(value);
        }
        Ok(out)
    }

    /// Strip residual quotes from a categorical column; empty labels are an
    /// error.
    fn clean_label_column(col: &Column) -> Result<Vec<String>, ProcessorError> {
        let as_str = col.cast(&DataType::String)?;
        let ca = as_str.str()?;
        let mut out = Vec::with_capacity(ca.len());
        for (row, cell) in ca.into_iter().enumerate() {
            let cell = cell.ok_or(ProcessorError::MissingValue {
                column: GENDER,
                row,
            })?;
            let label = cell.replace('"', "");
            let label = label.trim();
            if label.is_empty() {
                return Err(ProcessorError::MissingValue {
                    column: GENDER,
                    row,
                });
            }
            out.push(label.to_string());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_export() -> DataFrame {
        // Header shapes as they come out of the real export tool.
        DataFrame::new(vec![
            Column::new(
                "\"Количество больничных дней".into(),
                vec!["\"5", "\"0", "\"7"],
            ),
            Column::new("\"\"Возраст\"\"".into(), vec![38i64, 52, 29]),
            Column::new("\"\"Пол\"\"\"".into(), vec!["М\"", "Ж\"", "М\""]),
        ])
        .unwrap()
    }

    #[test]
    fn normalizes_malformed_export_headers() {
        let data = DataProcessor::normalize(&raw_export()).expect("export should normalize");
        assert_eq!(data.work_days(), &[5, 0, 7]);
        assert_eq!(data.age(), &[38.0, 52.0, 29.0]);
        assert_eq!(data.gender(), &["М", "Ж", "М"]);
        assert!(data.dataframe().column(WORK_DAYS).is_ok());
    }

    #[test]
    fn accepts_already_clean_headers() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec![1i64, 4]),
            Column::new("age".into(), vec![30i64, 40]),
            Column::new("gender".into(), vec!["M", "F"]),
        ])
        .unwrap();
        let data = DataProcessor::normalize(&df).unwrap();
        assert_eq!(data.work_days(), &[1, 4]);
        assert_eq!(data.gender(), &["M", "F"]);
    }

    #[test]
    fn carries_extra_columns_through() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec![1i64]),
            Column::new("age".into(), vec![30i64]),
            Column::new("gender".into(), vec!["M"]),
            Column::new("department".into(), vec!["sales"]),
        ])
        .unwrap();
        let data = DataProcessor::normalize(&df).unwrap();
        assert!(data.dataframe().column("department").is_ok());
    }

    #[test]
    fn missing_gender_column_is_an_error() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec![1i64]),
            Column::new("age".into(), vec![30i64]),
        ])
        .unwrap();
        let err = DataProcessor::normalize(&df).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(c) if c == GENDER));
    }

    #[test]
    fn non_numeric_work_days_fails_whole_file() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec!["3", "many"]),
            Column::new("age".into(), vec![30i64, 40]),
            Column::new("gender".into(), vec!["M", "F"]),
        ])
        .unwrap();
        let err = DataProcessor::normalize(&df).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::BadValue { column, row: 1, .. } if column == WORK_DAYS
        ));
    }

    #[test]
    fn negative_work_days_is_an_error() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec![-1i64]),
            Column::new("age".into(), vec![30i64]),
            Column::new("gender".into(), vec!["M"]),
        ])
        .unwrap();
        assert!(DataProcessor::normalize(&df).is_err());
    }

    #[test]
    fn empty_gender_after_stripping_is_an_error() {
        let df = DataFrame::new(vec![
            Column::new("work_days".into(), vec![1i64]),
            Column::new("age".into(), vec![30i64]),
            Column::new("gender".into(), vec!["\"\""]),
        ])
        .unwrap();
        assert!(DataProcessor::normalize(&df).is_err());
    }

    #[test]
    fn age_bucket_labels_follow_threshold() {
        let data = DataProcessor::normalize(&raw_export()).unwrap();
        assert_eq!(data.age_over(35.0), vec!["true", "true", "false"]);
        assert_eq!(data.work_days_range(), Some((0, 7)));
        assert_eq!(data.age_range(), Some((29.0, 52.0)));
    }
}
