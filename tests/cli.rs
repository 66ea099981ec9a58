use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_benfords"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const LEDGER: &str = "\
item,q1,q2,q3
alpha,1200,1834,0
beta,215,2999,377
gamma,41,18,12
total,1456,4851,389
";

#[test]
fn list_reports_significance_table() {
    let out = run(&["list", "--test", "ks", "1", "234", "5234", "6457", "345"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Kolmogorov-Smirnov Test"), "{stdout}");
    assert!(stdout.contains("Values: 5"), "{stdout}");
    assert!(stdout.contains("Alpha"), "{stdout}");
}

#[test]
fn list_json_output_runs_all_tests() {
    let out = run(&["list", "--all", "--json", "12", "150", "1.7", "-33"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let analyses = json.as_array().unwrap();
    assert_eq!(analyses.len(), 4);
    assert_eq!(analyses[0]["result"]["test"], "kuiper");
    assert_eq!(analyses[0]["result"]["sample_size"], 4);
    assert_eq!(analyses[3]["result"]["test"], "cho-gaines-d");
    assert_eq!(analyses[0]["curves"]["empirical_pdf"].as_array().unwrap().len(), 9);
}

#[test]
fn list_without_values_is_empty_dataset() {
    let out = run(&["list"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("empty"));
}

#[test]
fn unknown_test_kind_is_rejected() {
    let out = run(&["list", "--test", "chi2", "1", "2"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown test kind"));
}

#[test]
fn list_reads_json_input() {
    let input = write_temp(".json", "[3, 31, 310, 0]");
    let out = run(&["list", "--json", "--input", input.path().to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0]["result"]["sample_size"], 3);

    let nested = write_temp(".json", "[[1, 2], [3]]");
    let out = run(&["list", "--input", nested.path().to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("one-dimensional"));
}

#[test]
fn csv_with_config_filters() {
    let csv = write_temp(".csv", LEDGER);
    let config = write_temp(
        ".yaml",
        "test: m\nrows:\n  labels: { exclude: [total] }\ncolumns:\n  labels: { include: [q1, q2] }\n",
    );
    let out = run(&[
        "csv",
        csv.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
        "--json",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    // alpha: 1200, 1834; beta: 215, 2999; gamma: 41, 18
    assert_eq!(json[0]["result"]["sample_size"], 6);
    assert_eq!(json[0]["result"]["test"], "leemis-m");
}

#[test]
fn csv_with_nothing_admitted_fails() {
    let csv = write_temp(".csv", LEDGER);
    let config = write_temp(".yaml", "worksheets: { include: [other] }\n");
    let out = run(&[
        "csv",
        csv.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("empty"));
}

#[test]
fn csv_curves_table() {
    let csv = write_temp(".csv", LEDGER);
    let out = run(&["csv", csv.path().to_str().unwrap(), "--curves"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Kuiper's Test"), "{stdout}");
    assert!(stdout.contains("Benford CDF"), "{stdout}");
    // Twelve data cells, one of them zero.
    assert!(stdout.contains("Values: 11"), "{stdout}");
}

#[test]
fn list_reports_unreadable_input() {
    let out = run(&["list", "--input", "/nonexistent/values.json"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to read /nonexistent/values.json"), "{stderr}");
}
