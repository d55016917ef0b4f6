//! CLI integration tests for dbdump.
//!
//! These cover argument parsing, help output and every failure that is
//! reachable before a database connection is opened.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the dbdump binary.
fn cmd() -> Command {
    Command::cargo_bin("dbdump").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_connection_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("-h"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--tables"))
        .stdout(predicate::str::contains("--ssl-mode"));
}

#[test]
fn test_help_lists_registered_formatters() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--format-type"))
        .stdout(predicate::str::contains("json|template|yaml"));
}

#[test]
fn test_logging_flag_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: warn]"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbdump"));
}

#[test]
fn test_short_h_is_host_not_help() {
    // `-h` needs a value; alone it is a usage error, not help output.
    cmd()
        .arg("-h")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

// =============================================================================
// Formatter Errors (Exit Codes 5 and 6)
// =============================================================================

#[test]
fn test_unknown_formatter_exits_with_code_5() {
    cmd()
        .args(["--format-type", "doesnotexist", "-h", "127.0.0.1", "-P", "1"])
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("doesnotexist formatter not found"));
}

#[test]
fn test_legacy_flag_spelling_is_accepted() {
    cmd()
        .args(["--format_type", "doesnotexist", "--dbType", "pgsql"])
        .assert()
        .code(5);
}

#[test]
fn test_empty_template_exits_with_code_6() {
    cmd()
        .args(["--format-type", "template"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("initialize formatter template failed"));
}

#[test]
fn test_unparsable_template_exits_with_code_6() {
    cmd()
        .args(["--format-type", "template", "--format-config", "{{#each this}}"])
        .assert()
        .code(6);
}

#[test]
fn test_bad_json_options_exit_with_code_6() {
    cmd()
        .args(["--format-config", "indent: 2"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("initialize formatter json failed"));
}

// =============================================================================
// IO Errors (Exit Code 7)
// =============================================================================

#[test]
fn test_missing_template_file_exits_with_code_7() {
    cmd()
        .args([
            "--format-type",
            "template",
            "--format-config",
            "@nonexistent_template_file.hbs",
        ])
        .assert()
        .code(7);
}

#[test]
fn test_missing_config_exits_with_code_7() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml"])
        .assert()
        .code(7);
}

// =============================================================================
// Config Errors (Exit Code 1)
// =============================================================================

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "source: [unclosed").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_db_type_in_file_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "source:").unwrap();
    writeln!(file, "  type: oracle").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown database type"));
}

#[test]
fn test_unknown_db_type_flag_exits_with_code_1() {
    cmd()
        .args(["--db-type", "oracle"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_flag_overrides_file_value() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "source:").unwrap();
    writeln!(file, "  type: oracle").unwrap();

    // The flag replaces the invalid type, so the run gets as far as the formatter.
    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "--db-type",
            "mysql",
            "--format-type",
            "doesnotexist",
        ])
        .assert()
        .code(5);
}

#[test]
fn test_empty_table_name_exits_with_code_1() {
    cmd()
        .args(["-t", "orders,,items"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dump.tables"));
}

#[test]
fn test_unknown_verbosity_exits_with_code_1() {
    cmd().args(["--verbosity", "loud"]).assert().code(1);
}

#[test]
fn test_invalid_ssl_mode_is_usage_error() {
    cmd()
        .args(["--ssl-mode", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ssl_mode"));
}
