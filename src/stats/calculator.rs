//! Statistics Calculator Module
//! Contingency tables and Pearson's chi-squared test of independence.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Default significance level for the dependency decision.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Group labels ({labels}) do not align with rows ({rows})")]
    LengthMismatch { labels: usize, rows: usize },
}

/// Outcome of the dependency decision at a given significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependence {
    Dependent,
    Independent,
}

/// Cross-tabulation of group labels against "sick days exceed threshold".
///
/// Groups are kept sorted so identical inputs always produce an identical
/// table. Margins are derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    threshold: i64,
    groups: Vec<String>,
    /// Per group: [count with work_days <= threshold, count above].
    cells: Vec<[u64; 2]>,
}

impl ContingencyTable {
    /// Sorted distinct group labels.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Observed count for a group row, below/above the threshold.
    pub fn cell(&self, group_idx: usize, exceeds: bool) -> u64 {
        self.cells[group_idx][usize::from(exceeds)]
    }

    /// Row margin for a group.
    pub fn row_total(&self, group_idx: usize) -> u64 {
        self.cells[group_idx].iter().sum()
    }

    /// Column margins: [total at or below threshold, total above].
    pub fn col_totals(&self) -> [u64; 2] {
        self.cells.iter().fold([0, 0], |acc, row| {
            [acc[0] + row[0], acc[1] + row[1]]
        })
    }

    /// Grand total; equals the number of dataset rows tabulated.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// The sick-day threshold this table was built against.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }
}

/// Renders the margin-inclusive table for display, one group per row plus an
/// "All" margin row and column.
impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("work_days > {}", self.threshold);
        let label_width = self
            .groups
            .iter()
            .map(|g| g.chars().count())
            .chain([header.chars().count(), 3])
            .max()
            .unwrap_or(3);

        writeln!(f, "{header:<label_width$}  {:>7}  {:>7}  {:>7}", "false", "true", "All")?;
        for (i, group) in self.groups.iter().enumerate() {
            writeln!(
                f,
                "{group:<label_width$}  {:>7}  {:>7}  {:>7}",
                self.cell(i, false),
                self.cell(i, true),
                self.row_total(i)
            )?;
        }
        let [below, above] = self.col_totals();
        write!(f, "{:<label_width$}  {below:>7}  {above:>7}  {:>7}", "All", self.total())
    }
}

/// Result of one chi-squared test of independence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub table: ContingencyTable,
}

impl TestResult {
    /// Dependency decision: reject independence when `p_value < alpha`.
    pub fn decision(&self, alpha: f64) -> Dependence {
        if self.p_value < alpha {
            Dependence::Dependent
        } else {
            Dependence::Independent
        }
    }
}

/// Runs chi-squared independence tests over per-row group labels.
pub struct IndependenceTester;

impl IndependenceTester {
    /// Cross-tabulate `group_labels` against `work_days > threshold`.
    ///
    /// Labels must align 1:1 with rows; the caller derives them from the
    /// dataset (gender column, or an age-bucket column).
    pub fn crosstab(
        group_labels: &[String],
        work_days: &[i64],
        threshold: i64,
    ) -> Result<ContingencyTable, StatsError> {
        if group_labels.len() != work_days.len() {
            return Err(StatsError::LengthMismatch {
                labels: group_labels.len(),
                rows: work_days.len(),
            });
        }

        let mut counts: BTreeMap<&str, [u64; 2]> = BTreeMap::new();
        for (label, days) in group_labels.iter().zip(work_days) {
            let entry = counts.entry(label).or_insert([0, 0]);
            entry[usize::from(*days > threshold)] += 1;
        }

        let mut groups = Vec::with_capacity(counts.len());
        let mut cells = Vec::with_capacity(counts.len());
        for (label, row) in counts {
            groups.push(label.to_string());
            cells.push(row);
        }

        Ok(ContingencyTable {
            threshold,
            groups,
            cells,
        })
    }

    /// Run Pearson's chi-squared test of independence.
    ///
    /// Degenerate tables (a zero row or column margin, or fewer than two
    /// groups) cannot reject independence: the result is `statistic = 0`,
    /// `p_value = 1.0` rather than an error, so boundary thresholds stay
    /// usable interactively.
    pub fn test(
        group_labels: &[String],
        work_days: &[i64],
        threshold: i64,
    ) -> Result<TestResult, StatsError> {
        let table = Self::crosstab(group_labels, work_days, threshold)?;

        let (statistic, p_value) = match Self::pearson_statistic(&table) {
            Some((statistic, dof)) => {
                // Upper-tail p-value from the chi-squared distribution
                if let Ok(dist) = ChiSquared::new(dof as f64) {
                    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);
                    (statistic, p_value)
                } else {
                    (statistic, 1.0)
                }
            }
            None => (0.0, 1.0),
        };

        Ok(TestResult {
            statistic,
            p_value,
            table,
        })
    }

    /// Compute `sum((observed - expected)^2 / expected)` and the degrees of
    /// freedom. None when the table is degenerate.
    fn pearson_statistic(table: &ContingencyTable) -> Option<(f64, usize)> {
        let rows = table.groups().len();
        let cols = 2;
        if rows < 2 {
            return None;
        }

        let grand = table.total() as f64;
        let col_totals = table.col_totals();
        if col_totals.contains(&0) {
            return None;
        }

        let mut statistic = 0.0;
        for i in 0..rows {
            let row_total = table.row_total(i);
            if row_total == 0 {
                return None;
            }
            for (j, col_total) in col_totals.iter().enumerate() {
                let observed = table.cell(i, j == 1) as f64;
                let expected = row_total as f64 * *col_total as f64 / grand;
                statistic += (observed - expected).powi(2) / expected;
            }
        }

        let dof = (rows - 1) * (cols - 1);
        Some((statistic, dof))
    }
}
