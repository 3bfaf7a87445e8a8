use super::coverage::{self, Demand};
use super::ranking::{PreferenceTier, RankKey};
use super::util::{self, Ledger};
use super::{EngineOptions, GenerateRequest, RosterPlan, SchedError};
use crate::model::{LeaveRequest, LeaveStatus, Preference, ShiftAssignment, StaffId, StaffMember};
use crate::notification::AlertRenderer;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub(super) fn generate(
    opts: EngineOptions,
    request: &GenerateRequest,
    renderer: &dyn AlertRenderer,
) -> Result<RosterPlan, SchedError> {
    validate_inputs(request)?;

    let pool = eligible_pool(&request.staff);
    if pool.is_empty() {
        return Err(SchedError::NoEligibleStaff);
    }

    let preferences = merge_preferences(&request.preferences);
    let leave: Vec<&LeaveRequest> = request
        .leave
        .iter()
        .filter(|l| l.status == LeaveStatus::Approved)
        .collect();
    let window = request.window;
    let demands = coverage::expand_demands(&window, &request.requirements);

    let mut ledger = Ledger::with_history(
        request
            .history
            .iter()
            .filter(|a| a.date < window.start())
            .map(|a| (&a.staff, a.date)),
    );

    info!(
        start = %window.start(),
        days = window.len(),
        doctors = pool.len(),
        demands = demands.len(),
        "generating roster"
    );

    let mut plan = RosterPlan::default();

    for demand in &demands {
        let mut candidates: Vec<RankKey<'_>> = pool
            .iter()
            .filter(|member| {
                is_candidate(member, demand, &ledger, &leave, cap_for(&member.id, &preferences, opts))
            })
            .map(|member| RankKey {
                tier: PreferenceTier::of(preferences.get(&member.id), demand.shift),
                load: ledger.load(&member.id),
                staff: &member.id,
            })
            .collect();
        candidates.sort();

        let chosen: Vec<StaffId> = candidates
            .into_iter()
            .take(demand.required as usize)
            .map(|key| key.staff.clone())
            .collect();

        for staff in &chosen {
            ledger.record(staff, demand.date, demand.shift);
            plan.assignments.push(ShiftAssignment {
                staff: staff.clone(),
                date: demand.date,
                shift: demand.shift,
                department: demand.department.clone(),
            });
        }

        let assigned = u32::try_from(chosen.len()).unwrap_or(u32::MAX);
        debug!(
            date = %demand.date,
            shift = %demand.shift,
            department = %demand.department,
            required = demand.required,
            assigned,
            "demand processed"
        );

        if assigned < demand.required {
            warn!(
                date = %demand.date,
                shift = %demand.shift,
                department = %demand.department,
                missing = demand.required - assigned,
                "coverage shortfall"
            );
            plan.alerts.push(coverage::alert_for(demand, assigned, renderer));
        }
    }

    info!(
        assignments = plan.assignments.len(),
        alerts = plan.alerts.len(),
        "roster generated"
    );
    Ok(plan)
}

fn validate_inputs(request: &GenerateRequest) -> Result<(), SchedError> {
    if request.window.is_empty() {
        return Err(SchedError::InvalidWindow(
            "window length must be positive".to_string(),
        ));
    }
    for req in &request.requirements {
        req.validate().map_err(SchedError::InvalidRequirement)?;
    }
    for leave in &request.leave {
        leave.validate().map_err(SchedError::InvalidLeave)?;
    }
    for pref in &request.preferences {
        pref.validate().map_err(SchedError::InvalidPreference)?;
        let overlap = pref.overlap();
        if !overlap.is_empty() {
            warn!(staff = %pref.staff, ?overlap, "shift both preferred and disliked, treated as disliked");
        }
    }
    Ok(())
}

/// Médecins uniquement, dédoublonnés par identifiant (première occurrence), triés.
fn eligible_pool(staff: &[StaffMember]) -> Vec<&StaffMember> {
    let mut seen = BTreeSet::new();
    let mut pool: Vec<&StaffMember> = staff
        .iter()
        .filter(|m| m.role.is_roster_eligible())
        .filter(|m| seen.insert(m.id.clone()))
        .collect();
    pool.sort_by(|a, b| a.id.cmp(&b.id));
    pool
}

/// Plusieurs fiches pour un même médecin : union des ensembles, plafond le plus strict.
fn merge_preferences(prefs: &[Preference]) -> BTreeMap<StaffId, Preference> {
    let mut merged: BTreeMap<StaffId, Preference> = BTreeMap::new();
    for pref in prefs {
        merged
            .entry(pref.staff.clone())
            .and_modify(|existing| {
                existing.preferred.extend(pref.preferred.iter().copied());
                existing.disliked.extend(pref.disliked.iter().copied());
                existing.max_consecutive = existing.max_consecutive.min(pref.max_consecutive);
            })
            .or_insert_with(|| pref.clone());
    }
    merged
}

fn cap_for(
    staff: &StaffId,
    preferences: &BTreeMap<StaffId, Preference>,
    opts: EngineOptions,
) -> Option<u32> {
    preferences
        .get(staff)
        .map(|p| p.max_consecutive)
        .or(opts.default_max_consecutive)
}

fn is_candidate(
    member: &StaffMember,
    demand: &Demand,
    ledger: &Ledger,
    leave: &[&LeaveRequest],
    cap: Option<u32>,
) -> bool {
    if !member.role.is_roster_eligible() || !member.serves(&demand.department) {
        return false;
    }
    if util::on_leave(leave, &member.id, demand.date) {
        return false;
    }
    // un seul service par créneau (date, type)
    if ledger.holds(&member.id, demand.date, demand.shift) {
        return false;
    }
    if ledger.overlaps_same_day(&member.id, demand.date, demand.shift) {
        return false;
    }
    match cap {
        Some(max) => ledger.run_with(&member.id, demand.date) <= max,
        None => true,
    }
}
