//! sickstat - thin command-line front-end over the analysis core.
//!
//! Loads one sick-leave CSV, runs the gender and age-bucket hypotheses at the
//! given thresholds, and prints the margin tables and decisions. All
//! computation lives in the library; this binary only formats output.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sickstat::{
    DataLoader, DataProcessor, Dependence, IndependenceTester, TestResult, SIGNIFICANCE_LEVEL,
};

const DEFAULT_WORK_DAYS_THRESHOLD: i64 = 2;
const DEFAULT_AGE_THRESHOLD: f64 = 35.0;

#[derive(Serialize)]
struct Report {
    work_days_threshold: i64,
    age_threshold: f64,
    alpha: f64,
    gender: Hypothesis,
    age: Hypothesis,
}

#[derive(Serialize)]
struct Hypothesis {
    group: String,
    decision: Dependence,
    #[serde(flatten)]
    result: TestResult,
}

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    let Some(path) = args.first() else {
        bail!("usage: sickstat <file.csv> [work_days_threshold] [age_threshold] [--json]");
    };
    let work_days_threshold: i64 = match args.get(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid work-days threshold '{raw}'"))?,
        None => DEFAULT_WORK_DAYS_THRESHOLD,
    };
    let age_threshold: f64 = match args.get(2) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid age threshold '{raw}'"))?,
        None => DEFAULT_AGE_THRESHOLD,
    };

    let mut loader = DataLoader::new();
    let raw = loader
        .load_csv(path)
        .with_context(|| format!("failed to load {path}"))?;
    let data = DataProcessor::normalize(raw).context("failed to normalize input")?;

    let gender = IndependenceTester::test(data.gender(), data.work_days(), work_days_threshold)?;
    let age_labels = data.age_over(age_threshold);
    let age = IndependenceTester::test(&age_labels, data.work_days(), work_days_threshold)?;

    if json {
        let report = Report {
            work_days_threshold,
            age_threshold,
            alpha: SIGNIFICANCE_LEVEL,
            gender: Hypothesis {
                group: "gender".to_string(),
                decision: gender.decision(SIGNIFICANCE_LEVEL),
                result: gender,
            },
            age: Hypothesis {
                group: format!("age>{age_threshold}"),
                decision: age.decision(SIGNIFICANCE_LEVEL),
                result: age,
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Loaded {} rows from {path}", data.row_count());
        print_hypothesis("gender", &gender);
        print_hypothesis(&format!("age>{age_threshold}"), &age);
    }

    Ok(())
}

fn print_hypothesis(group: &str, result: &TestResult) {
    println!();
    println!("Frequency table ({group}):");
    println!("{}", result.table);
    match result.decision(SIGNIFICANCE_LEVEL) {
        Dependence::Dependent => println!(
            "Significant at alpha = {SIGNIFICANCE_LEVEL}: sick-day counts depend on {group}"
        ),
        Dependence::Independent => println!(
            "Not significant at alpha = {SIGNIFICANCE_LEVEL}: sick-day counts do not depend on {group}"
        ),
    }
    println!(
        "statistic: {:.2}, p-value: {:.3}",
        result.statistic, result.p_value
    );
}
