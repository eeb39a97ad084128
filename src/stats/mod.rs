//! Stats module - contingency tables and independence testing

mod calculator;

pub use calculator::{
    ContingencyTable, Dependence, IndependenceTester, StatsError, TestResult, SIGNIFICANCE_LEVEL,
};
