mod common;

use std::fs;

use assert_cmd::Command;

use common::{COHORT_A, COHORT_B, Fixture};

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("sigvival").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn cohorts_lists_reference_cohorts() {
    let fx = Fixture::new();
    let output = Command::cargo_bin("sigvival")
        .unwrap()
        .args(["cohorts", "--data-dir"])
        .arg(fx.data.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("{}\t12", COHORT_A)), "{stdout}");
    assert!(stdout.contains(COHORT_B));
}

#[test]
fn genes_filter_narrows_listing() {
    let fx = Fixture::new();
    let output = Command::cargo_bin("sigvival")
        .unwrap()
        .args(["genes", "--filter", "g1", "--data-dir"])
        .arg(fx.data.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let genes: Vec<&str> = stdout.lines().collect();
    assert!(genes.contains(&"G1"));
    assert!(genes.contains(&"G12"));
    assert!(!genes.contains(&"G2"));
}

#[test]
fn validate_reports_reference_counts() {
    let fx = Fixture::new();
    let output = Command::cargo_bin("sigvival")
        .unwrap()
        .args(["validate", "--data-dir"])
        .arg(fx.data.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("sigvival validate ok"));
    assert!(stdout.contains("genes: 20"));
    assert!(stdout.contains("cohorts: 3"));
}

#[test]
fn run_prints_summary_and_writes_files() {
    let fx = Fixture::new();
    let out = fx.out.path().join("cli");
    let output = Command::cargo_bin("sigvival")
        .unwrap()
        .args([
            "run",
            "--signature",
            "SIG",
            "--genes",
            "G1,G2,G3",
            "--cohorts",
            "TCGA-AAA,TCGA-BBB",
            "--cut-point",
            "tertile-extremes",
            "--threads",
            "2",
            "--json",
            "--data-dir",
        ])
        .arg(fx.data.path())
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stdout}\n{stderr}");
    assert!(stdout.contains("Signature: SIG (3/3 genes found)"));
    assert!(stdout.contains("Cut point: tertile-extremes"));
    assert!(stdout.contains("Log-rank:"));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3);
}

#[test]
fn run_with_unknown_cohort_fails() {
    let fx = Fixture::new();
    let out = fx.out.path().join("cli");
    Command::cargo_bin("sigvival")
        .unwrap()
        .args([
            "run",
            "--signature",
            "SIG",
            "--genes",
            "G1",
            "--cohorts",
            "TCGA-ZZZ",
            "--cut-point",
            "median",
            "--data-dir",
        ])
        .arg(fx.data.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .failure();
    assert!(!out.exists());
}

#[test]
fn run_rejects_unknown_cut_point() {
    Command::cargo_bin("sigvival")
        .unwrap()
        .args([
            "run",
            "--signature",
            "SIG",
            "--genes",
            "G1",
            "--cohorts",
            "TCGA-AAA",
            "--cut-point",
            "decile",
        ])
        .assert()
        .failure();
}

#[test]
fn run_prints_results_then_fails_when_export_cannot_write() {
    let fx = Fixture::new();
    let blocker = fx.out.path().join("occupied");
    fs::write(&blocker, "x").unwrap();
    let output = Command::cargo_bin("sigvival")
        .unwrap()
        .args([
            "run",
            "--signature",
            "SIG",
            "--genes",
            "G1,G2,G3",
            "--cohorts",
            "TCGA-AAA,TCGA-BBB",
            "--cut-point",
            "median",
            "--data-dir",
        ])
        .arg(fx.data.path())
        .arg("--out")
        .arg(blocker.join("sub"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Log-rank:"), "{stdout}");
    assert!(stderr.contains("failed to write"), "{stderr}");
}
