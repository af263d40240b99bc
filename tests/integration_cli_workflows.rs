//! Integration tests exercising CLI commands end-to-end.
//!
//! These tests invoke the real `mailgen` binary against a temporary
//! `.mailgen` directory and profile directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mailgen_binary() -> PathBuf {
    let mut path = std::env::current_exe().expect("could not get current exe path");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("mailgen");
    assert!(
        path.exists(),
        "mailgen binary not found at {:?}. Run `cargo build` first.",
        path
    );
    path
}

/// A `.mailgen` directory and a profile directory inside one temp dir.
struct Env {
    _tmp: TempDir,
    dir: PathBuf,
    profile: PathBuf,
}

impl Env {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".mailgen");
        let profile = tmp.path().join("profile");
        Env {
            _tmp: tmp,
            dir,
            profile,
        }
    }

    fn initialized() -> Self {
        let env = Self::new();
        env.ok(&["init"]);
        env
    }

    fn cmd(&self, args: &[&str]) -> std::process::Output {
        Command::new(mailgen_binary())
            .arg("--dir")
            .arg(&self.dir)
            .arg("--profile-dir")
            .arg(&self.profile)
            .args(args)
            .env_remove("MAILGEN_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .unwrap_or_else(|e| panic!("Failed to run mailgen {:?}: {}", args, e))
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.cmd(args);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "mailgen {:?} failed.\nstdout: {}\nstderr: {}",
            args,
            stdout,
            stderr
        );
        stdout
    }

    fn fails(&self, args: &[&str]) -> String {
        let output = self.cmd(args);
        assert!(
            !output.status.success(),
            "mailgen {:?} should have failed.\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        serde_json::from_str(&self.ok(&full)).unwrap()
    }
}

// ===========================================================================
// mailgen init / templates / check
// ===========================================================================

#[test]
fn test_init_writes_config_and_starter_library() {
    let env = Env::new();
    let out = env.ok(&["init"]);
    assert!(out.contains("Initialized mailgen"));
    assert!(env.dir.join("config.toml").exists());
    assert!(env.dir.join("templates").join("starter.toml").exists());
    assert!(env.dir.join(".gitignore").exists());

    let stderr = env.fails(&["init"]);
    assert!(stderr.contains("already initialized"));
}

#[test]
fn test_commands_require_init() {
    let env = Env::new();
    let stderr = env.fails(&["templates"]);
    assert!(stderr.contains("mailgen init"));
}

#[test]
fn test_templates_lists_by_category() {
    let env = Env::initialized();
    let out = env.ok(&["templates"]);
    let billing = out.find("Billing").unwrap();
    let account = out.find("Account").unwrap();
    assert!(billing < account);
    assert!(out.contains("payment-missing"));

    let json = env.json(&["templates"]);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["payment-missing", "refund-issued", "password-reset"]);
}

#[test]
fn test_check_starter_library() {
    let env = Env::initialized();
    let out = env.ok(&["check"]);
    assert!(out.contains("Library OK: 3 templates"));

    let json = env.json(&["check"]);
    assert_eq!(json["ok"], true);
}

#[test]
fn test_library_commands_run_without_a_home_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(".mailgen");
    let run = |args: &[&str]| {
        Command::new(mailgen_binary())
            .arg("--dir")
            .arg(&dir)
            .args(args)
            .env_remove("HOME")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("MAILGEN_LOG")
            .stdin(Stdio::null())
            .output()
            .unwrap()
    };

    let cases: [&[&str]; 3] = [&["init"], &["check"], &["config", "--show"]];
    for args in cases {
        let output = run(args);
        assert!(
            output.status.success(),
            "mailgen {:?} failed.\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// ===========================================================================
// mailgen select / set / show
// ===========================================================================

#[test]
fn test_select_set_show() {
    let env = Env::initialized();
    env.ok(&["select", "payment-missing"]);
    env.ok(&["set", "biller_name", "City Water"]);
    env.ok(&["set", "customer_name", "Jane <Doe>"]);

    let subject = env.ok(&["show", "--output", "subject"]);
    assert!(subject.contains("City Water"));

    let body = env.ok(&["show", "--output", "body"]);
    assert!(body.contains("<span data-field=\"customer_name\">Jane &lt;Doe&gt;</span>"));

    let text = env.ok(&["show", "--output", "body", "--text"]);
    assert!(text.contains("Jane <Doe>"));
    assert!(!text.contains("data-field"));

    let json = env.json(&["show"]);
    assert_eq!(json["template_id"], "payment-missing");
    assert_eq!(json["field_values"]["biller_name"], "City Water");
    let unfilled: Vec<&str> = json["unfilled"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(unfilled, vec!["case_number"]);
}

#[test]
fn test_wording_is_stable_between_invocations() {
    let env = Env::initialized();
    env.ok(&["select", "payment-missing"]);
    let first = env.ok(&["show", "--output", "body"]);
    let second = env.ok(&["show", "--output", "body"]);
    assert_eq!(first, second);
}

#[test]
fn test_unfilled_tokens_stay_visible() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    let subject = env.ok(&["show", "--output", "subject"]);
    assert_eq!(subject.trim(), "Your refund of {{refund.amount}}");

    env.ok(&["set", "refund_amount", "$25.00"]);
    let subject = env.ok(&["show", "--output", "subject"]);
    assert_eq!(subject.trim(), "Your refund of $25.00");

    env.ok(&["set", "refund_amount", ""]);
    let subject = env.ok(&["show", "--output", "subject"]);
    assert_eq!(subject.trim(), "Your refund of {{refund.amount}}");
}

#[test]
fn test_set_errors() {
    let env = Env::initialized();
    let stderr = env.fails(&["set", "customer_name", "Jane"]);
    assert!(stderr.contains("No template selected"));

    env.ok(&["select", "refund-issued"]);
    let stderr = env.fails(&["set", "shoe_size", "9"]);
    assert!(stderr.contains("has no field 'shoe_size'"));
}

#[test]
fn test_select_unknown_template() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    let stderr = env.fails(&["select", "nope"]);
    assert!(stderr.contains("Template 'nope' not found"));

    let out = env.ok(&["show"]);
    assert!(out.contains("No template selected"));
}

#[test]
fn test_pinned_field_carries_over_on_select() {
    let env = Env::initialized();
    env.ok(&["select", "payment-missing"]);
    env.ok(&["set", "recipient_email", "jane@example.com"]);
    env.ok(&["set", "case_number", "00123"]);

    let out = env.ok(&["select", "refund-issued"]);
    assert!(out.contains("recipient_email = jane@example.com"));

    let json = env.json(&["show"]);
    assert_eq!(json["field_values"]["recipient_email"], "jane@example.com");
    assert!(json["field_values"].get("case_number").is_none());
}

#[test]
fn test_config_pin_extends_carry_over() {
    let env = Env::initialized();
    env.ok(&["config", "--pin", "customer_name"]);
    env.ok(&["select", "payment-missing"]);
    env.ok(&["set", "customer_name", "Jane"]);
    env.ok(&["select", "refund-issued"]);

    let json = env.json(&["show"]);
    assert_eq!(json["field_values"]["customer_name"], "Jane");

    let config = env.json(&["config"]);
    assert_eq!(
        config["session"]["pinned_fields"],
        serde_json::json!(["recipient_email", "customer_name"])
    );
}

#[test]
fn test_shuffle_keeps_values() {
    let env = Env::initialized();
    env.ok(&["select", "payment-missing"]);
    env.ok(&["set", "biller_name", "City Water"]);
    for _ in 0..3 {
        let subject = env.ok(&["shuffle"]);
        assert!(subject.contains("City Water"));
    }
}

// ===========================================================================
// mailgen agent / theme
// ===========================================================================

#[test]
fn test_agent_name_signs_outputs() {
    let env = Env::initialized();
    env.ok(&["agent", "Sam Agent"]);
    env.ok(&["select", "refund-issued"]);
    let comment = env.ok(&["show", "--output", "case-comment"]);
    assert!(comment.contains("Agent: Sam Agent"));

    let json = env.json(&["agent"]);
    assert_eq!(json["agent_name"], "Sam Agent");
    assert!(env.profile.join("profile.json").exists());
}

#[test]
fn test_theme_toggle_persists() {
    let env = Env::initialized();
    assert_eq!(env.ok(&["theme"]).trim(), "light");
    assert_eq!(env.ok(&["theme", "--toggle"]).trim(), "dark");
    assert_eq!(env.ok(&["theme"]).trim(), "dark");
    assert_eq!(env.ok(&["theme", "light"]).trim(), "light");
    env.fails(&["theme", "purple"]);
}

// ===========================================================================
// mailgen copy
// ===========================================================================

#[test]
fn test_copy_body_rich_and_plain() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    env.ok(&["set", "customer_name", "Jane"]);

    let rich = env.ok(&["copy", "body"]);
    assert!(rich.contains("<span data-field=\"customer_name\">Jane</span>"));

    let plain = env.ok(&["copy", "body", "--plain"]);
    assert!(plain.contains("Jane"));
    assert!(!plain.contains('<'));

    let subject = env.ok(&["copy", "subject"]);
    assert_eq!(subject.trim(), "Your refund of {{refund.amount}}");
}

#[test]
fn test_copy_respects_rich_copy_config() {
    let env = Env::initialized();
    env.ok(&["config", "--rich-copy", "false"]);
    env.ok(&["select", "refund-issued"]);
    let out = env.ok(&["copy", "body"]);
    assert!(!out.contains("data-field"));
}

// ===========================================================================
// mailgen export / import / clear
// ===========================================================================

#[test]
fn test_export_import_roundtrip() {
    let env = Env::initialized();
    env.ok(&["select", "payment-missing"]);
    env.ok(&["set", "customer_name", "Jane \"JD\" Doe"]);
    env.ok(&["set", "case_number", "00042"]);
    let before = env.json(&["show"])["field_values"].clone();

    let export_path = env.dir.join("case.export.json");
    env.ok(&["export", "--output", export_path.to_str().unwrap()]);

    env.ok(&["clear"]);
    assert!(env.ok(&["show"]).contains("No template selected"));

    env.ok(&["import", export_path.to_str().unwrap()]);
    let after = env.json(&["show"]);
    assert_eq!(after["field_values"], before);
    assert_eq!(after["template_id"], "payment-missing");
}

#[test]
fn test_export_to_stdout_is_a_document() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    env.ok(&["set", "refund_amount", "$5"]);
    let doc: serde_json::Value = serde_json::from_str(&env.ok(&["export"])).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["template_id"], "refund-issued");
    assert_eq!(doc["field_values"]["refund_amount"], "$5");
}

#[test]
fn test_malformed_import_leaves_session_intact() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    env.ok(&["set", "refund_amount", "$5"]);
    let before = env.json(&["show"]);

    let bad = env.dir.join("bad.json");
    fs::write(&bad, "{\"refund_amount\": ").unwrap();
    let stderr = env.fails(&["import", bad.to_str().unwrap()]);
    assert!(stderr.contains("Import rejected"));

    let numbers = env.dir.join("numbers.json");
    fs::write(&numbers, "{\"refund_amount\": 5}").unwrap();
    env.fails(&["import", numbers.to_str().unwrap()]);

    let after = env.json(&["show"]);
    assert_eq!(after, before);
}

#[test]
fn test_import_bare_values() {
    let env = Env::initialized();
    env.ok(&["select", "refund-issued"]);
    let file = env.dir.join("bare.json");
    fs::write(&file, r#"{"customer_name": "Jane", "refund_amount": "$9"}"#).unwrap();
    env.ok(&["import", file.to_str().unwrap()]);

    let subject = env.ok(&["show", "--output", "subject"]);
    assert_eq!(subject.trim(), "Your refund of $9");
}

#[test]
fn test_corrupt_session_file_is_ignored() {
    let env = Env::initialized();
    fs::write(session_path(&env.dir), "not json").unwrap();
    let out = env.ok(&["show"]);
    assert!(out.contains("No template selected"));
    env.ok(&["select", "refund-issued"]);
}

fn session_path(dir: &Path) -> PathBuf {
    dir.join("session.json")
}
