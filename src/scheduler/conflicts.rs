use super::{util, Conflict, ConflictKind, EngineOptions};
use crate::model::{LeaveRequest, Preference, ShiftAssignment, ShiftType, StaffId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

pub(super) fn detect_conflicts(
    assignments: &[ShiftAssignment],
    leave: &[LeaveRequest],
    preferences: &[Preference],
    opts: EngineOptions,
) -> Vec<Conflict> {
    let mut out = Vec::new();

    let mut by_staff: BTreeMap<&StaffId, Vec<&ShiftAssignment>> = BTreeMap::new();
    for a in assignments {
        by_staff.entry(&a.staff).or_default().push(a);
    }

    let approved: Vec<&LeaveRequest> = leave.iter().collect();

    for (staff, mut held) in by_staff {
        held.sort_by(|a, b| (a.date, a.shift).cmp(&(b.date, b.shift)));

        let mut seen: BTreeSet<(NaiveDate, ShiftType)> = BTreeSet::new();
        for a in &held {
            if !seen.insert((a.date, a.shift)) {
                out.push(Conflict {
                    staff: staff.clone(),
                    date: a.date,
                    kind: ConflictKind::DoubleBooking,
                    detail: format!("{} {} assigned twice ({})", a.date, a.shift, a.department),
                });
            }
            if util::on_leave(&approved, staff, a.date) {
                out.push(Conflict {
                    staff: staff.clone(),
                    date: a.date,
                    kind: ConflictKind::LeaveViolation,
                    detail: format!("{} {} during approved leave", a.date, a.shift),
                });
            }
        }

        for (idx, a) in held.iter().enumerate() {
            for b in held.iter().skip(idx + 1) {
                if b.date != a.date {
                    break;
                }
                if a.shift != b.shift && a.shift.overlaps(b.shift) {
                    out.push(Conflict {
                        staff: staff.clone(),
                        date: a.date,
                        kind: ConflictKind::Overlap,
                        detail: format!("{} overlaps {}", a.shift, b.shift),
                    });
                }
            }
        }

        let cap = preferences
            .iter()
            .filter(|p| &p.staff == staff)
            .map(|p| p.max_consecutive)
            .min()
            .or(opts.default_max_consecutive);
        if let Some(max) = cap {
            let days: BTreeSet<NaiveDate> = held.iter().map(|a| a.date).collect();
            let (run, end) = util::longest_run(&days);
            if let (true, Some(end)) = (run > max, end) {
                out.push(Conflict {
                    staff: staff.clone(),
                    date: end,
                    kind: ConflictKind::ConsecutiveExceeded,
                    detail: format!("{run} consecutive days, limit {max}"),
                });
            }
        }
    }

    out.sort_by(|a, b| {
        (&a.staff, a.date, a.kind).cmp(&(&b.staff, b.date, b.kind))
    });
    out
}
