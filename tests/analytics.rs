#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    classify_fatigue, fatigue::high_risk, prepare_duty_notice, ConflictKind, CoverageRequirement,
    FatigueRisk, FatigueThresholds, GenerateRequest, LeaveRequest, Preference, RosterEngine,
    RosterWindow, Roster, ShiftAssignment, ShiftType, StaffId, StaffMember, TextDuty,
};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, n).unwrap()
}

fn shift(staff: &str, date: NaiveDate, shift: ShiftType) -> ShiftAssignment {
    ShiftAssignment {
        staff: StaffId::new(staff),
        date,
        shift,
        department: "Cardiology".into(),
    }
}

#[test]
fn fatigue_flags_nights_and_total_load() {
    let mut assignments = vec![
        shift("nights", day(3), ShiftType::Night),
        shift("nights", day(4), ShiftType::Night),
        shift("nights", day(5), ShiftType::Night),
    ];
    for n in 3..8 {
        assignments.push(shift("busy", day(n), ShiftType::Morning));
    }
    assignments.extend([
        shift("steady", day(3), ShiftType::Morning),
        shift("steady", day(4), ShiftType::Evening),
        shift("steady", day(5), ShiftType::Morning),
        shift("steady", day(6), ShiftType::Night),
    ]);

    let entries = classify_fatigue(&assignments, FatigueThresholds::default());
    let got: Vec<(&str, u32, u32, FatigueRisk)> = entries
        .iter()
        .map(|e| (e.staff.as_str(), e.total, e.nights, e.risk))
        .collect();
    assert_eq!(
        got,
        vec![
            ("busy", 5, 0, FatigueRisk::High),
            ("nights", 3, 3, FatigueRisk::High),
            ("steady", 4, 1, FatigueRisk::Normal),
        ]
    );
    assert_eq!(high_risk(&entries).count(), 2);
}

#[test]
fn two_nights_stay_below_threshold() {
    let assignments = vec![
        shift("a", day(3), ShiftType::Night),
        shift("a", day(4), ShiftType::Night),
    ];
    let entries = classify_fatigue(&assignments, FatigueThresholds::default());
    assert_eq!(entries[0].risk, FatigueRisk::Normal);
}

#[test]
fn checker_reports_each_violation_kind() {
    let assignments = vec![
        shift("a", day(3), ShiftType::Morning),
        shift("a", day(3), ShiftType::Morning),
        shift("a", day(4), ShiftType::Morning),
        shift("a", day(5), ShiftType::Morning),
        shift("b", day(6), ShiftType::Evening),
    ];
    let leave = vec![LeaveRequest::approved(StaffId::new("b"), day(6), day(7)).unwrap()];
    let prefs = vec![Preference::new(StaffId::new("a"), 2).unwrap()];

    let conflicts = RosterEngine::default().detect_conflicts(&assignments, &leave, &prefs);
    let kinds: Vec<(&str, ConflictKind)> = conflicts
        .iter()
        .map(|c| (c.staff.as_str(), c.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("a", ConflictKind::DoubleBooking),
            ("a", ConflictKind::ConsecutiveExceeded),
            ("b", ConflictKind::LeaveViolation),
        ]
    );
    assert_eq!(conflicts[1].date, day(5));
}

#[test]
fn standard_shift_types_do_not_overlap() {
    for a in ShiftType::ALL {
        for b in ShiftType::ALL {
            assert_eq!(a.overlaps(b), a == b, "{a} vs {b}");
        }
    }
}

#[test]
fn duty_notice_lists_upcoming_shifts_in_order() {
    let mut roster = Roster::default();
    roster.staff.push(StaffMember::doctor("a", "Dr. A", "Cardiology"));
    roster.assignments = vec![
        shift("a", day(5), ShiftType::Night),
        shift("a", day(2), ShiftType::Morning),
        shift("a", day(4), ShiftType::Evening),
    ];

    let notice = prepare_duty_notice(&roster, &StaffId::new("a"), day(3), &TextDuty).unwrap();
    assert_eq!(notice.shifts, 2);
    assert!(notice.content.starts_with("Bonjour Dr. A,"));
    let evening = notice.content.find("2025-03-04 Evening (15h-23h)").unwrap();
    let night = notice.content.find("2025-03-05 Night (23h-07h)").unwrap();
    assert!(evening < night);
    assert!(!notice.content.contains("2025-03-02"));

    assert!(prepare_duty_notice(&roster, &StaffId::new("a"), day(6), &TextDuty).is_err());
    assert!(prepare_duty_notice(&roster, &StaffId::new("zz"), day(1), &TextDuty).is_err());
}

#[test]
fn small_roster_snapshot() {
    let request = GenerateRequest::new(
        vec![
            StaffMember::doctor("b", "Dr. B", "Cardiology"),
            StaffMember::doctor("a", "Dr. A", "Cardiology"),
        ],
        RosterWindow::new(day(3), 2).unwrap(),
    )
    .with_preferences(vec![
        Preference::new(StaffId::new("a"), 3)
            .unwrap()
            .prefers([ShiftType::Night]),
        Preference::new(StaffId::new("b"), 2).unwrap(),
    ])
    .with_requirements(vec![CoverageRequirement::every_shift("Cardiology", 1).unwrap()]);

    let plan = RosterEngine::default().generate(&request).unwrap();
    let rendered = plan
        .assignments
        .iter()
        .map(|a| format!("{} {} {} {}", a.date, a.shift, a.department, a.staff))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(rendered, @r###"
    2025-03-03 Morning Cardiology a
    2025-03-03 Evening Cardiology b
    2025-03-03 Night Cardiology a
    2025-03-04 Morning Cardiology b
    2025-03-04 Evening Cardiology a
    2025-03-04 Night Cardiology a
    "###);
}
