use crate::model::{LeaveRequest, ShiftType, StaffId};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Jours travaillés et créneaux tenus, par médecin, pour le planning en cours.
#[derive(Debug, Default, Clone)]
pub(super) struct Ledger {
    slots: BTreeMap<StaffId, BTreeSet<(NaiveDate, ShiftType)>>,
    /// Jours antérieurs à la fenêtre fournis par l'appelant.
    history: BTreeMap<StaffId, BTreeSet<NaiveDate>>,
}

impl Ledger {
    pub(super) fn with_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = (&'a StaffId, NaiveDate)>,
    {
        let mut ledger = Self::default();
        for (staff, date) in history {
            ledger.history.entry(staff.clone()).or_default().insert(date);
        }
        ledger
    }

    pub(super) fn record(&mut self, staff: &StaffId, date: NaiveDate, shift: ShiftType) {
        self.slots
            .entry(staff.clone())
            .or_default()
            .insert((date, shift));
    }

    pub(super) fn holds(&self, staff: &StaffId, date: NaiveDate, shift: ShiftType) -> bool {
        self.slots
            .get(staff)
            .is_some_and(|s| s.contains(&(date, shift)))
    }

    /// Un créneau déjà tenu ce jour-là chevauche-t-il `shift` ?
    pub(super) fn overlaps_same_day(&self, staff: &StaffId, date: NaiveDate, shift: ShiftType) -> bool {
        self.slots.get(staff).is_some_and(|s| {
            s.range((date, ShiftType::Morning)..=(date, ShiftType::Night))
                .any(|(_, held)| held.overlaps(shift))
        })
    }

    pub(super) fn load(&self, staff: &StaffId) -> usize {
        self.slots.get(staff).map_or(0, BTreeSet::len)
    }

    fn works(&self, staff: &StaffId, date: NaiveDate) -> bool {
        let in_plan = self.slots.get(staff).is_some_and(|s| {
            s.range((date, ShiftType::Morning)..=(date, ShiftType::Night))
                .next()
                .is_some()
        });
        in_plan || self.history.get(staff).is_some_and(|h| h.contains(&date))
    }

    /// Longueur de la série de jours consécutifs si `staff` travaille `date`.
    pub(super) fn run_with(&self, staff: &StaffId, date: NaiveDate) -> u32 {
        let mut run = 1u32;
        let mut cursor = date;
        while let Some(prev) = cursor.checked_sub_signed(Duration::days(1)) {
            if !self.works(staff, prev) {
                break;
            }
            run += 1;
            cursor = prev;
        }
        cursor = date;
        while let Some(next) = cursor.checked_add_signed(Duration::days(1)) {
            if !self.works(staff, next) {
                break;
            }
            run += 1;
            cursor = next;
        }
        run
    }
}

pub(super) fn on_leave(leave: &[&LeaveRequest], staff: &StaffId, date: NaiveDate) -> bool {
    leave.iter().any(|l| &l.staff == staff && l.covers(date))
}

/// Plus longue série de dates consécutives dans un ensemble trié.
pub(super) fn longest_run(days: &BTreeSet<NaiveDate>) -> (u32, Option<NaiveDate>) {
    let mut best = 0u32;
    let mut best_end = None;
    let mut current = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in days {
        current = match prev {
            Some(p) if day.signed_duration_since(p).num_days() == 1 => current + 1,
            _ => 1,
        };
        if current > best {
            best = current;
            best_end = Some(day);
        }
        prev = Some(day);
    }
    (best, best_end)
}
