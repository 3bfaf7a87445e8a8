mod assignment;
mod conflicts;
mod coverage;
mod ranking;
mod types;
mod util;
mod window;

pub use coverage::{audit_coverage, coverage_summary, expand_demands, CoverageSummary, Demand};
pub use ranking::PreferenceTier;
pub use types::{
    Conflict, ConflictKind, EngineOptions, GenerateRequest, RosterPlan, SchedError,
};
pub use window::{RosterWindow, DEFAULT_WINDOW_DAYS};

use crate::model::{
    CoverageAlert, CoverageRequirement, LeaveRequest, Preference, ShiftAssignment, StaffMember,
};
use crate::notification::{AlertRenderer, TextAlert};
use chrono::NaiveDate;

/// Moteur de planning : ne garde que ses options, aucun état entre deux appels.
#[derive(Debug, Default, Clone, Copy)]
pub struct RosterEngine {
    opts: EngineOptions,
}

impl RosterEngine {
    pub fn new(opts: EngineOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> EngineOptions {
        self.opts
    }

    /// Construit les affectations et les alertes de couverture pour la fenêtre demandée.
    ///
    /// Erreurs fatales : fenêtre invalide, règle/congé/préférence invalide,
    /// aucun médecin disponible. La sous-couverture n'est jamais fatale.
    pub fn generate(&self, request: &GenerateRequest) -> Result<RosterPlan, SchedError> {
        self.generate_with(request, &TextAlert)
    }

    pub fn generate_with(
        &self,
        request: &GenerateRequest,
        renderer: &dyn AlertRenderer,
    ) -> Result<RosterPlan, SchedError> {
        assignment::generate(self.opts, request, renderer)
    }

    pub fn detect_conflicts(
        &self,
        assignments: &[ShiftAssignment],
        leave: &[LeaveRequest],
        preferences: &[Preference],
    ) -> Vec<Conflict> {
        conflicts::detect_conflicts(assignments, leave, preferences, self.opts)
    }
}

/// Forme positionnelle du contrat de génération, options par défaut.
pub fn generate(
    staff_pool: &[StaffMember],
    preferences: &[Preference],
    approved_leave: &[LeaveRequest],
    coverage_requirements: &[CoverageRequirement],
    window_start: NaiveDate,
    window_length: u32,
) -> Result<(Vec<ShiftAssignment>, Vec<CoverageAlert>), SchedError> {
    let window = RosterWindow::new(window_start, window_length)?;
    let request = GenerateRequest::new(staff_pool.to_vec(), window)
        .with_preferences(preferences.to_vec())
        .with_leave(approved_leave.to_vec())
        .with_requirements(coverage_requirements.to_vec());
    let plan = RosterEngine::default().generate(&request)?;
    Ok((plan.assignments, plan.alerts))
}
