//! benfords: CLI entry point.
//!
//! Tests numeric data from CSV files or plain lists against Benford's Law.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use benfords::benford::ComparisonCurves;
use benfords::config::{load_config_file, AnalysisConfig};
use benfords::source::read_csv;
use benfords::types::{Alpha, Analysis};
use benfords::{Dataset, HeaderConvention, TestKind};

#[derive(Parser)]
#[command(name = "benfords")]
#[command(about = "Test numeric data for conformance with Benford's Law")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the numbers in a CSV file.
    Csv {
        /// CSV file to read.
        file: PathBuf,

        /// YAML file with the test and include/exclude filters.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Which edges of the file hold labels.
        #[arg(long, value_enum, default_value_t = Headers::Both)]
        headers: Headers,

        /// Field delimiter.
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyze numbers given as arguments or as a JSON array file.
    List {
        /// Values to analyze.
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,

        /// JSON file containing a flat array of numbers.
        #[arg(short, long, conflicts_with = "values")]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Test statistic: kuiper, ks, m or d (default kuiper).
    #[arg(short, long)]
    test: Option<TestKind>,

    /// Run all four tests.
    #[arg(long, conflicts_with = "test")]
    all: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Also print the PDF/CDF comparison table.
    #[arg(long)]
    curves: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Headers {
    None,
    Row,
    Column,
    Both,
}

impl From<Headers> for HeaderConvention {
    fn from(h: Headers) -> Self {
        match h {
            Headers::None => Self::None,
            Headers::Row => Self::FirstRow,
            Headers::Column => Self::FirstColumn,
            Headers::Both => Self::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Csv {
            file,
            config,
            headers,
            delimiter,
            output,
        } => cmd_csv(&file, config.as_deref(), headers, delimiter, &output),
        Commands::List {
            values,
            input,
            output,
        } => cmd_list(values, input.as_deref(), &output),
    }
}

fn cmd_csv(
    file: &Path,
    config_path: Option<&Path>,
    headers: Headers,
    delimiter: char,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow::anyhow!("Delimiter must be a single ASCII character"))?;

    let config = config_path
        .map(load_config_file)
        .transpose()?
        .unwrap_or_default();
    let filter = config.filter_config()?;

    let workbook = read_csv(file, delimiter, headers.into())?;
    let dataset = Dataset::from_workbook(&workbook, &filter)
        .map_err(|e| anyhow::anyhow!("{}: {e}", file.display()))?;

    if !output.json {
        print_header(&file.display().to_string(), &dataset);
    }
    report(&dataset, &selected_tests(output, &config), output)
}

fn cmd_list(values: Vec<f64>, input: Option<&Path>, output: &OutputArgs) -> anyhow::Result<()> {
    let (source, dataset) = match input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (path.display().to_string(), Dataset::from_json(&text)?)
        }
        None => ("command line".to_string(), Dataset::new(values)?),
    };

    if !output.json {
        print_header(&source, &dataset);
    }
    report(&dataset, &selected_tests(output, &AnalysisConfig::default()), output)
}

fn selected_tests(output: &OutputArgs, config: &AnalysisConfig) -> Vec<TestKind> {
    if output.all {
        TestKind::ALL.to_vec()
    } else {
        vec![output.test.or(config.test).unwrap_or(TestKind::Kuiper)]
    }
}

fn report(dataset: &Dataset, tests: &[TestKind], output: &OutputArgs) -> anyhow::Result<()> {
    let analyses = tests
        .iter()
        .map(|&kind| dataset.analyze(kind))
        .collect::<benfords::Result<Vec<_>>>()?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
        return Ok(());
    }

    for analysis in &analyses {
        print_analysis(analysis);
    }
    if output.curves {
        if let Some(first) = analyses.first() {
            print_curves(&first.curves);
        }
    }

    println!("{}", "=".repeat(60));
    let rejected = analyses
        .iter()
        .filter(|a| a.result.is_significant_at(Alpha::FivePercent))
        .count();
    if rejected == 0 {
        println!(
            "  {} consistent with Benford's Law at alpha = 0.05",
            "CONFORMS".green()
        );
    } else {
        println!(
            "  {} {} of {} tests reject Benford's Law at alpha = 0.05",
            "DEVIATES".red(),
            rejected.to_string().red(),
            analyses.len()
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_header(source: &str, dataset: &Dataset) {
    println!("{}", "benfords".bold());
    println!("  Source: {source}");
    println!("  Values: {}", dataset.len());
    println!();
}

fn print_analysis(analysis: &Analysis) {
    let result = &analysis.result;
    println!("{}", format!("{} Test", result.statistic).cyan());
    println!(
        "  {} = {:.4} (n = {})",
        result.test.symbol(),
        result.value,
        result.sample_size
    );
    println!("  Alpha  Critical  Significant?");
    println!("  -----  --------  ------------");
    for level in &result.significance {
        let verdict = if level.significant {
            "yes".red()
        } else {
            "no".green()
        };
        println!(
            "  {:.2}   {:<8.3}  {verdict}",
            level.alpha.value(),
            level.critical_value
        );
    }
    println!();
}

fn print_curves(curves: &ComparisonCurves) {
    println!("{}", "Digit distribution".cyan());
    println!("  Digit  Benford PDF  Sample PDF  Benford CDF  Sample CDF");
    for i in 0..curves.digits.len() {
        println!(
            "  {:>5}  {:>11.4}  {:>10.4}  {:>11.4}  {:>10.4}",
            curves.digits[i],
            curves.benford_pdf[i],
            curves.empirical_pdf[i],
            curves.benford_cdf[i],
            curves.empirical_cdf[i]
        );
    }
    println!();
}
