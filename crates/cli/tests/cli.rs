use assert_cmd::Command;
use predicates::prelude::*;

fn fonts_available() -> bool {
    let available = winners_circle_report::fonts::default_fonts_available();
    if !available {
        eprintln!(
            "Skipping: no usable font family found. Set {} to run the CLI rendering tests.",
            winners_circle_report::fonts::FONTS_DIR_ENV
        );
    }
    available
}

#[test]
fn writes_the_report_to_the_requested_path() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("analysis.pdf");

    Command::cargo_bin("winners-circle-report")
        .expect("binary")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report successfully generated:"))
        .stdout(predicate::str::contains("analysis.pdf"));

    let bytes = std::fs::read(&output).expect("read report");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn default_output_lands_in_the_working_directory() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");

    Command::cargo_bin("winners-circle-report")
        .expect("binary")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Winners_Circle_Analysis.pdf"));

    assert!(dir.path().join("Winners_Circle_Analysis.pdf").is_file());
}

#[test]
fn missing_directory_exits_non_zero() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("missing").join("analysis.pdf");

    Command::cargo_bin("winners-circle-report")
        .expect("binary")
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));

    assert!(!output.exists());
}

#[test]
fn unknown_flags_are_rejected() {
    Command::cargo_bin("winners-circle-report")
        .expect("binary")
        .arg("--pages")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pages"));
}
