//! Integration tests for JSON output of the commands that need no database

use serde_json::Value;
use std::process::{Command, Output};

fn satnexus(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_satnexus"))
        .args(args)
        .env_remove("SATNEXUS_CONFIG")
        .env_remove("SATNEXUS_AREA_MODE")
        .env_remove("DATABASE_URL")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_area_json_output() {
    let output = satnexus(&["--json", "area", "-v", "0,0", "-v", "1,0", "-v", "1,1", "-v", "0,1"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let parsed = stdout_json(&output);
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"]["mode"], "Planar");
    assert_eq!(parsed["data"]["area"], 1.0);
    assert_eq!(parsed["data"]["vertices"].as_array().unwrap().len(), 4);
}

#[test]
fn test_area_geodesic_mode() {
    let output = satnexus(&[
        "--json", "area", "--mode", "geodesic", "-v", "0,0", "-v", "1,0", "-v", "1,1", "-v", "0,1",
    ]);
    assert!(output.status.success());

    let parsed = stdout_json(&output);
    assert_eq!(parsed["data"]["unit"], "m²");
    let area = parsed["data"]["area"].as_f64().unwrap();
    assert!(area > 1.2e10 && area < 1.3e10, "unexpected area {}", area);
}

#[test]
fn test_area_flags_after_negative_vertices() {
    let output = satnexus(&[
        "area", "--vertex", "-1,0", "--vertex", "-1,1", "--vertex", "0,1", "--vertex", "0,0",
        "--mode", "geodesic", "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let parsed = stdout_json(&output);
    assert_eq!(parsed["data"]["mode"], "Geodesic");
    assert_eq!(parsed["data"]["vertices"][0]["lat"], -1.0);
    let area = parsed["data"]["area"].as_f64().unwrap();
    assert!(area > 1.2e10 && area < 1.3e10, "unexpected area {}", area);
}

#[test]
fn test_area_rejects_malformed_vertex() {
    let output = satnexus(&["area", "-v", "0,0", "-v", "north,east", "-v", "1,1"]);
    assert!(!output.status.success());
}

#[test]
fn test_token_json_output() {
    let output = satnexus(&["token", "--user", "507f1f77bcf86cd799439011", "--ttl-hours", "2", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let parsed = stdout_json(&output);
    assert_eq!(parsed["data"]["userId"], "507f1f77bcf86cd799439011");
    let token = parsed["data"]["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_listing_without_database_fails() {
    let output = satnexus(&["images"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DATABASE_URL"));
}
