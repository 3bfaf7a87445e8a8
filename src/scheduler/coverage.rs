use super::window::RosterWindow;
use crate::model::{CoverageAlert, CoverageRequirement, ShiftAssignment, ShiftType};
use crate::notification::AlertRenderer;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Besoin élémentaire : un service, une date, un type de créneau.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demand {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub department: String,
    pub required: u32,
}

/// Déplie les règles sur la fenêtre, triées par (date, type de créneau, service).
///
/// Deux règles visant le même (service, créneau) se fondent en gardant le
/// minimum le plus élevé. Les règles invalides (minimum nul, aucun créneau)
/// sont ignorées ici ; le moteur les rejette en amont.
pub fn expand_demands(window: &RosterWindow, requirements: &[CoverageRequirement]) -> Vec<Demand> {
    let mut merged: BTreeMap<(NaiveDate, ShiftType, String), u32> = BTreeMap::new();
    for req in requirements.iter().filter(|r| r.validate().is_ok()) {
        let department = req.department.trim().to_string();
        for date in window.dates() {
            for &shift in &req.shifts {
                let slot = merged
                    .entry((date, shift, department.clone()))
                    .or_insert(0);
                *slot = (*slot).max(req.min_staff);
            }
        }
    }
    merged
        .into_iter()
        .map(|((date, shift, department), required)| Demand {
            date,
            shift,
            department,
            required,
        })
        .collect()
}

pub(super) fn alert_for(demand: &Demand, assigned: u32, renderer: &dyn AlertRenderer) -> CoverageAlert {
    CoverageAlert {
        department: demand.department.clone(),
        date: demand.date,
        shift: demand.shift,
        required: demand.required,
        assigned,
        message: renderer.render(demand, assigned),
    }
}

/// Recalcule les alertes de sous-couverture pour un ensemble d'affectations quelconque.
pub fn audit_coverage(
    window: &RosterWindow,
    requirements: &[CoverageRequirement],
    assignments: &[ShiftAssignment],
    renderer: &dyn AlertRenderer,
) -> Vec<CoverageAlert> {
    let mut counts: BTreeMap<(NaiveDate, ShiftType, String), u32> = BTreeMap::new();
    for a in assignments {
        *counts
            .entry((a.date, a.shift, a.department.trim().to_string()))
            .or_insert(0) += 1;
    }

    expand_demands(window, requirements)
        .iter()
        .filter_map(|demand| {
            let assigned = counts
                .get(&(demand.date, demand.shift, demand.department.clone()))
                .copied()
                .unwrap_or(0);
            (assigned < demand.required).then(|| alert_for(demand, assigned, renderer))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub demands: usize,
    pub satisfied: usize,
    pub short: usize,
}

pub fn coverage_summary(
    window: &RosterWindow,
    requirements: &[CoverageRequirement],
    alerts: &[CoverageAlert],
) -> CoverageSummary {
    let demands = expand_demands(window, requirements).len();
    let short = alerts.len().min(demands);
    CoverageSummary {
        demands,
        satisfied: demands - short,
        short,
    }
}
