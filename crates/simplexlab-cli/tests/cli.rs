use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Helper function to create a temporary input file
fn create_test_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("problem.json");
    fs::write(&file_path, content).expect("Failed to write test file");
    (temp_dir, file_path)
}

fn run(args: &[&str], file: &PathBuf) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simplexlab"))
        .args(args)
        .arg(file)
        .output()
        .expect("Failed to run simplexlab")
}

const WYNDOR: &str = r#"{
    "sense": "maximize",
    "variables": ["x1", "x2"],
    "objective": [3, 5],
    "constraints": [
        { "coefficients": [1, 0], "sign": "<=", "rhs": 4 },
        { "coefficients": [0, 2], "sign": "<=", "rhs": 12 },
        { "coefficients": [3, 2], "sign": "<=", "rhs": 18 }
    ]
}"#;

#[test]
fn test_solve_pretty() {
    let (_dir, path) = create_test_file(WYNDOR);
    let output = run(&["solve"], &path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Status: OPTIMAL"), "stdout: {}", stdout);
    assert!(stdout.contains("Objective: 36.0000"), "stdout: {}", stdout);
}

#[test]
fn test_solve_json_with_trace() {
    let (_dir, path) = create_test_file(WYNDOR);
    let output = run(&["solve", "--format", "json"], &path);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["status"], "Optimal");
    assert_eq!(value["columns"].as_array().map(|c| c.len()), Some(5));
    assert!(value["iterations"].as_array().is_some_and(|its| its.len() >= 2));
    assert!(value["graph"]["feasible_region"].is_array());
}

#[test]
fn test_solve_integer() {
    let (_dir, path) = create_test_file(
        r#"{
            "sense": "max",
            "variables": ["x1", "x2"],
            "objective": [3, 4],
            "constraints": [
                { "coefficients": [2, 1], "sign": "<=", "rhs": 6 },
                { "coefficients": [2, 3], "sign": "<=", "rhs": 9 }
            ]
        }"#,
    );
    let output = run(&["solve", "--integer"], &path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Status: INTEGER OPTIMAL"), "stdout: {}", stdout);
    assert!(stdout.contains("Objective: 12.0000"), "stdout: {}", stdout);
}

#[test]
fn test_infeasible_exits_nonzero() {
    let (_dir, path) = create_test_file(
        r#"{
            "sense": "minimize",
            "variables": ["x"],
            "objective": [1],
            "constraints": [
                { "coefficients": [1], "sign": ">=", "rhs": 5 },
                { "coefficients": [1], "sign": "<=", "rhs": 2 }
            ]
        }"#,
    );
    let output = run(&["solve"], &path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(stdout.contains("Status: INFEASIBLE"), "stdout: {}", stdout);
}

#[test]
fn test_verbose_logs_result() {
    let (_dir, path) = create_test_file(WYNDOR);
    let quiet = run(&["solve"], &path);
    let verbose = run(&["-v", "solve"], &path);
    let stderr = String::from_utf8_lossy(&verbose.stderr);

    assert!(verbose.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("simplex finished"), "stderr: {}", stderr);
    assert!(!stderr.contains("DEBUG"), "-v should stay at info: {}", stderr);
    assert!(quiet.stderr.is_empty());
}

#[test]
fn test_dual() {
    let (_dir, path) = create_test_file(WYNDOR);
    let output = run(&["dual"], &path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("min W = 4y1 + 12y2 + 18y3"), "stdout: {}", stdout);
    assert!(stdout.contains("Strong duality holds."), "stdout: {}", stdout);
}

#[test]
fn test_check_rejects_mismatched_lengths() {
    let (_dir, path) = create_test_file(
        r#"{
            "sense": "maximize",
            "variables": ["x", "y"],
            "objective": [1, 1],
            "constraints": [{ "coefficients": [1], "sign": "<=", "rhs": 4 }]
        }"#,
    );
    let output = run(&["check"], &path);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("constraint 0 has 1 coefficients, expected 2"), "stderr: {}", stderr);
}

#[test]
fn test_linsys() {
    let (_dir, path) = create_test_file(r#"{ "matrix": [[2, 1], [1, 3]], "rhs": [5, 10] }"#);
    let output = run(&["linsys"], &path);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("1.0000"), "stdout: {}", stdout);
    assert!(stdout.contains("3.0000"), "stdout: {}", stdout);
}
