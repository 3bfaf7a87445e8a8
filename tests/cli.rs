#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(roster: &Path) -> Command {
    let mut cmd = Command::cargo_bin("garde-cli").unwrap();
    cmd.arg("--roster").arg(roster);
    cmd
}

fn seed(dir: &Path, min_staff: u32) -> std::path::PathBuf {
    let roster = dir.join("roster.json");
    let staff = dir.join("staff.csv");
    let reqs = dir.join("req.csv");
    fs::write(
        &staff,
        "id,name,role,department\na,Dr. A,Doctor,Cardiology\nb,Dr. B,Doctor,Cardiology\nn,Nurse N,Nurse,Cardiology\n",
    )
    .unwrap();
    fs::write(&reqs, format!("department,shifts,min_staff\nCardiology,all,{min_staff}\n")).unwrap();

    cli(&roster)
        .args(["import-staff", "--csv"])
        .arg(&staff)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 3 staff member(s)"));
    cli(&roster)
        .args(["import-requirements", "--csv"])
        .arg(&reqs)
        .assert()
        .success();
    roster
}

#[test]
fn generate_covers_every_slot_and_exports_csv() {
    let dir = tempdir().unwrap();
    let roster = seed(dir.path(), 1);
    let out = dir.path().join("plan.csv");

    cli(&roster)
        .args(["generate", "--start", "2025-03-03", "--days", "2", "--out-csv"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 assignment(s), 6/6 slot(s) covered"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("date,shift,department,staff_id,staff_name"));
    assert_eq!(csv.lines().count(), 7);
    assert!(!csv.contains("Nurse N"));

    cli(&roster)
        .args(["check", "--start", "2025-03-03", "--days", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    cli(&roster)
        .arg("fatigue")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no high-risk workload"));
}

#[test]
fn shortfall_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    let roster = seed(dir.path(), 3);

    cli(&roster)
        .args(["generate", "--start", "2025-03-03", "--days", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "ALERT: Cardiology needs 3 staff on Morning 2025-03-03, only 2 assigned (short by 1)",
        ));
}

#[test]
fn approved_leave_is_honoured_by_generation() {
    let dir = tempdir().unwrap();
    let roster = seed(dir.path(), 1);
    let leave = dir.path().join("leave.csv");
    fs::write(&leave, "staff_id,start,end\na,2025-03-03,2025-03-03\n").unwrap();

    cli(&roster)
        .args(["import-leave", "--csv"])
        .arg(&leave)
        .assert()
        .success();
    cli(&roster)
        .args(["decide-leave", "--staff", "a", "--start", "2025-03-03", "--decision", "approve"])
        .assert()
        .success();
    cli(&roster)
        .args(["decide-leave", "--staff", "a", "--start", "2025-03-03", "--decision", "deny"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already decided"));

    cli(&roster)
        .args(["generate", "--start", "2025-03-03", "--days", "1"])
        .assert()
        .success();
    cli(&roster)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dr. B"))
        .stdout(predicate::str::contains("Dr. A").not());
}

#[test]
fn empty_roster_cannot_generate() {
    let dir = tempdir().unwrap();
    cli(&dir.path().join("roster.json"))
        .args(["generate", "--start", "2025-03-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no doctors available"));
}

#[test]
fn bad_window_is_rejected() {
    let dir = tempdir().unwrap();
    let roster = seed(dir.path(), 1);
    cli(&roster)
        .args(["generate", "--start", "03/03/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid roster window"));
    cli(&roster)
        .args(["generate", "--start", "2025-03-03", "--days", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("window length must be positive"));
}
