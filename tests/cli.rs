// CLI integration tests
//
// Runs the built binary and checks exit codes and where output lands

use assert_cmd::Command;
use predicates::prelude::*;

fn cache_stride() -> Command {
    Command::cargo_bin("cache-stride").unwrap()
}

#[test]
fn small_run_prints_the_table_and_succeeds() {
    cache_stride()
        .args(["--row_size", "64", "--col_size", "32"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Array Size: 64 x 32\n"))
        .stdout(predicate::str::contains("Access Time"));
}

#[test]
fn alignment_table_includes_a_measured_stack_row() {
    cache_stride()
        .args(["--row_size", "600", "--alignment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alignment Probe: 600 x 600"))
        .stdout(predicate::str::contains("Stack  "))
        .stdout(predicate::str::contains("skipped").not());
}

#[test]
fn missing_sizes_exit_with_one_on_stdout() {
    cache_stride()
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Error: please write --row_size parameter.",
        ));
}

#[test]
fn non_positive_size_exits_with_one() {
    cache_stride()
        .args(["--row_size", "0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("greater than 0"));
}

#[test]
fn clap_errors_exit_with_one_not_two() {
    for args in [
        &["--row_size", "abc"][..],
        &["--bogus"][..],
        &["--row_size", "4", "--log-level", "nonsense"][..],
    ] {
        cache_stride()
            .args(args)
            .assert()
            .code(1)
            .stderr(predicate::str::is_empty().not());
    }
}

#[test]
fn help_and_version_exit_with_zero() {
    cache_stride()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--row_size"));
    cache_stride()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unaddressable_grid_exits_with_two() {
    cache_stride()
        .args(["--row_size", "4611686018427387904", "--col_size", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("does not fit in the address space"));
}

#[test]
fn refused_allocation_exits_with_two() {
    cache_stride()
        .args(["--row_size", "1073741824"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("Error: Allocation failed"));
}
