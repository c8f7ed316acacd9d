mod common;

use common::cargo_bin;
use predicates::prelude::*;

#[test]
fn check_balanced_program_prints_ok() {
    cargo_bin()
        .args(["check", "+[>+[-]<-]"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn check_reports_unclosed_loop_with_caret() {
    cargo_bin()
        .args(["check", "++[>[-]"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("unmatched bracket")
                .and(predicate::str::contains("at instruction 2"))
                .and(predicate::str::contains("  ++[>[-]\n    ^")),
        );
}
