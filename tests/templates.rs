#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    io, CoverageRequirement, CoverageTemplate, EngineOptions, JsonStorage, LeaveStatus, Role,
    Roster, Rules, ShiftType, StaffMember, Storage, TemplateStore,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn save_and_load_template_roundtrip() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    let template = sample_template();
    store.save(&template).unwrap();

    let loaded = store.load(&template.id).unwrap();
    assert_eq!(loaded.id, template.id);
    assert_eq!(loaded.requirements, template.requirements);
    assert_eq!(
        loaded.departments().into_iter().collect::<Vec<_>>(),
        vec!["Cardiology", "ICU"]
    );
}

#[test]
fn list_skips_foreign_files_and_sorts_by_id() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    let mut second = sample_template();
    second.id = "a-first".into();
    store.save(&sample_template()).unwrap();
    store.save(&second).unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    fs::write(dir.path().join("broken.json"), "{").unwrap();

    let ids: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|info| info.template.id)
        .collect();
    assert_eq!(ids, vec!["a-first".to_string(), "cardio-icu".to_string()]);
}

#[test]
fn invalid_templates_are_rejected() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());

    let mut empty = sample_template();
    empty.requirements.clear();
    assert!(store.save(&empty).is_err());

    let mut zero_window = sample_template();
    zero_window.rules = Some(Rules {
        window_days: Some(0),
        default_max_consecutive: None,
    });
    assert!(store.save(&zero_window).is_err());

    let mut sneaky = sample_template();
    sneaky.id = "../escape".into();
    assert!(store.save(&sneaky).is_err());
}

#[test]
fn template_rules_override_engine_options() {
    let template = sample_template();
    let opts = template.engine_options(EngineOptions::default());
    assert_eq!(opts.window_days, 14);
    assert_eq!(opts.default_max_consecutive, Some(4));

    let window = template
        .window(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), EngineOptions::default())
        .unwrap();
    assert_eq!(window.end(), NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
}

#[test]
fn json_storage_roundtrip_is_atomic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    let storage = JsonStorage::open(&path).unwrap();
    assert!(storage.load_or_default().unwrap().staff.is_empty());

    let mut roster = Roster::default();
    roster.staff.push(StaffMember::doctor("a", "Dr. A", "ICU"));
    roster
        .requirements
        .push(CoverageRequirement::every_shift("ICU", 1).unwrap());
    storage.save(&roster).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.staff, roster.staff);
    assert_eq!(loaded.requirements, roster.requirements);
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn csv_imports_parse_every_record_kind() {
    let dir = tempdir().unwrap();
    let staff_csv = dir.path().join("staff.csv");
    fs::write(
        &staff_csv,
        "id,name,role,department\na,Dr. A,Doctor,Cardiology\n,Nurse Joy,nurse,\nf,Dr. F,doctor,\n",
    )
    .unwrap();
    let staff = io::import_staff_csv(&staff_csv).unwrap();
    assert_eq!(staff.len(), 3);
    assert_eq!(staff[0].id.as_str(), "a");
    assert_eq!(staff[0].department.as_deref(), Some("Cardiology"));
    assert_eq!(staff[1].role, Role::Nurse);
    assert!(!staff[1].id.as_str().is_empty());
    assert_eq!(staff[2].department, None);

    let leave_csv = dir.path().join("leave.csv");
    fs::write(
        &leave_csv,
        "staff_id,start,end,status\na,2025-03-04,2025-03-05,approved\nf,2025-03-06,2025-03-06\n",
    )
    .unwrap();
    let leave = io::import_leave_csv(&leave_csv).unwrap();
    assert_eq!(leave[0].status, LeaveStatus::Approved);
    assert_eq!(leave[1].status, LeaveStatus::Pending);

    let prefs_csv = dir.path().join("prefs.csv");
    fs::write(
        &prefs_csv,
        "staff_id,preferred,disliked,max_consecutive\na,night;evening,morning,3\nf,,,2\n",
    )
    .unwrap();
    let prefs = io::import_preferences_csv(&prefs_csv).unwrap();
    assert!(prefs[0].preferred.contains(&ShiftType::Night));
    assert!(prefs[0].disliked.contains(&ShiftType::Morning));
    assert!(prefs[1].preferred.is_empty());
    assert_eq!(prefs[1].max_consecutive, 2);

    let req_csv = dir.path().join("req.csv");
    fs::write(
        &req_csv,
        "department,shifts,min_staff\nCardiology,all,1\nICU,night,2\n",
    )
    .unwrap();
    let reqs = io::import_requirements_csv(&req_csv).unwrap();
    assert_eq!(reqs[0].shifts.len(), 3);
    assert_eq!(reqs[1].min_staff, 2);
}

#[test]
fn csv_imports_reject_broken_rows() {
    let dir = tempdir().unwrap();
    let leave_csv = dir.path().join("leave.csv");
    fs::write(&leave_csv, "staff_id,start,end\na,2025-03-05,2025-03-04\n").unwrap();
    assert!(io::import_leave_csv(&leave_csv).is_err());

    let req_csv = dir.path().join("req.csv");
    fs::write(&req_csv, "department,shifts,min_staff\nICU,night,0\n").unwrap();
    assert!(io::import_requirements_csv(&req_csv).is_err());

    let prefs_csv = dir.path().join("prefs.csv");
    fs::write(
        &prefs_csv,
        "staff_id,preferred,disliked,max_consecutive\na,brunch,,3\n",
    )
    .unwrap();
    assert!(io::import_preferences_csv(&prefs_csv).is_err());
}

fn sample_template() -> CoverageTemplate {
    CoverageTemplate {
        id: "cardio-icu".into(),
        name: "Cardiologie + réanimation".into(),
        description: Some("Couverture standard".into()),
        requirements: vec![
            CoverageRequirement::every_shift("Cardiology", 1).unwrap(),
            CoverageRequirement::new("ICU", [ShiftType::Night], 2).unwrap(),
        ],
        rules: Some(Rules {
            window_days: Some(14),
            default_max_consecutive: Some(4),
        }),
    }
}
