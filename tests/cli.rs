//! CLI tests for the commands that need no database.

use assert_cmd::Command;
use predicates::prelude::*;

fn akowe() -> Command {
    let mut cmd = Command::cargo_bin("akowe").unwrap();
    cmd.env_remove("DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    akowe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tax"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn tax_splits_hst_amount() {
    akowe()
        .args(["tax", "1000.00", "--rate", "0.13"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-tax:       884.96"))
        .stdout(predicate::str::contains("Tax collected: 115.04"));
}

#[test]
fn tax_defaults_to_ontario_hst() {
    akowe()
        .args(["tax", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13%"))
        .stdout(predicate::str::contains("Tax collected: 11.50"));
}

#[test]
fn tax_rejects_negative_amount() {
    akowe()
        .args(["tax", "-5.00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount"));
}

#[test]
fn tax_rejects_negative_rate() {
    akowe()
        .args(["tax", "5.00", "--rate", "-0.13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid tax rate"));
}

#[test]
fn migrate_history_needs_no_database() {
    akowe()
        .args(["migrate", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<base> -> a1c0f4e2b7d1"))
        .stdout(predicate::str::contains("e5a4b8c6f1d5 -> f6b5c9d7a2e6"));
}
