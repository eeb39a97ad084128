//! sickstat - Sick-leave CSV analysis & chi-squared independence testing
//!
//! Loads employee sick-leave exports (windows-1251, single-quote quoted,
//! malformed Cyrillic headers) into a typed dataset, then tests whether
//! sick-day counts depend on gender or on an age bucket via Pearson's
//! chi-squared test of independence.

pub mod data;
pub mod stats;

pub use data::{DataLoader, DataProcessor, LoaderError, ProcessorError, SickLeaveData};
pub use stats::{
    ContingencyTable, Dependence, IndependenceTester, StatsError, TestResult, SIGNIFICANCE_LEVEL,
};
