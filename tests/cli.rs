#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DOCTORS: &str = "Name,Seniority,Chief,Carried Hours,Half Block,Pre Block Hours,Requested Day:Time:Duration,Mandatory Day:Time:Duration
Alice,0,No,0,Both,0,_,_
";

fn write_inputs(dir: &Path, shifts: &str) {
    fs::write(dir.join("doctors.csv"), DOCTORS).unwrap();
    fs::write(
        dir.join("shifts.csv"),
        format!("Location,Day,Time,Duration,Position Preferences,Optional\n{shifts}"),
    )
    .unwrap();
}

fn cli() -> Command {
    Command::cargo_bin("roster-cli").unwrap()
}

#[test]
fn solve_then_check_and_report() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "Resus,1,7,8,0,False\nAcute 1,2,19,12,0>1,False\n");
    let roster = dir.path().join("roster.json");
    let csv = dir.path().join("shifts_out.csv");

    cli()
        .arg("solve")
        .arg("--doctors")
        .arg(dir.path().join("doctors.csv"))
        .arg("--shifts")
        .arg(dir.path().join("shifts.csv"))
        .arg("--out")
        .arg(&roster)
        .arg("--out-csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("day 1 Mon 07:00 +8h Resus -> Alice"))
        .stdout(predicate::str::contains("Search: 2 nodes, 0 backtracks"));

    assert!(fs::read_to_string(&csv).unwrap().contains(",Acute 1,2,19,12,true,false,Alice"));

    cli()
        .arg("check")
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    cli()
        .arg("report")
        .arg("--roster")
        .arg(&roster)
        .arg("--anchor-date")
        .arg("2025-01-06")
        .assert()
        .success()
        .stdout(predicate::str::contains("day 2 Tue 2025-01-07 19:00"));
}

#[test]
fn infeasible_input_exits_with_code_two() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "Resus,4,10,8,3,False\n");

    cli()
        .arg("solve")
        .arg("--doctors")
        .arg(dir.path().join("doctors.csv"))
        .arg("--shifts")
        .arg(dir.path().join("shifts.csv"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no feasible roster"));
}

#[test]
fn anchor_date_must_be_a_monday() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "Resus,1,7,8,0,False\n");

    cli()
        .arg("solve")
        .arg("--doctors")
        .arg(dir.path().join("doctors.csv"))
        .arg("--shifts")
        .arg(dir.path().join("shifts.csv"))
        .arg("--anchor-date")
        .arg("2025-01-07")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a Monday"));
}
