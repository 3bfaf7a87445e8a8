use crate::model::{
    CoverageAlert, CoverageRequirement, LeaveRequest, Preference, ShiftAssignment, ShiftType,
    StaffId, StaffMember,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::window::{RosterWindow, DEFAULT_WINDOW_DAYS};

/// Options du moteur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Plafond de jours consécutifs pour un médecin sans préférence (`None` = illimité).
    pub default_max_consecutive: Option<u32>,
    pub window_days: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_max_consecutive: None,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Requête de génération : toutes les entrées, déjà résolues.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub staff: Vec<StaffMember>,
    pub preferences: Vec<Preference>,
    pub leave: Vec<LeaveRequest>,
    pub requirements: Vec<CoverageRequirement>,
    pub window: RosterWindow,
    /// Affectations antérieures à la fenêtre, utilisées uniquement pour
    /// prolonger les séries de jours consécutifs.
    pub history: Vec<ShiftAssignment>,
}

impl GenerateRequest {
    pub fn new(staff: Vec<StaffMember>, window: RosterWindow) -> Self {
        Self {
            staff,
            preferences: Vec::new(),
            leave: Vec::new(),
            requirements: Vec::new(),
            window,
            history: Vec::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: Vec<Preference>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_leave(mut self, leave: Vec<LeaveRequest>) -> Self {
        self.leave = leave;
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<CoverageRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_history(mut self, history: Vec<ShiftAssignment>) -> Self {
        self.history = history;
        self
    }
}

/// Résultat d'une génération, possédé par l'appelant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlan {
    pub assignments: Vec<ShiftAssignment>,
    pub alerts: Vec<CoverageAlert>,
}

impl RosterPlan {
    pub fn is_fully_covered(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn for_staff<'a>(&'a self, staff: &'a StaffId) -> impl Iterator<Item = &'a ShiftAssignment> {
        self.assignments.iter().filter(move |a| &a.staff == staff)
    }

    pub fn in_slot<'a>(
        &'a self,
        date: NaiveDate,
        shift: ShiftType,
        department: &'a str,
    ) -> impl Iterator<Item = &'a ShiftAssignment> {
        self.assignments
            .iter()
            .filter(move |a| a.date == date && a.shift == shift && a.department == department)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConflictKind {
    DoubleBooking,
    Overlap,
    LeaveViolation,
    ConsecutiveExceeded,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::DoubleBooking => "double",
            ConflictKind::Overlap => "overlap",
            ConflictKind::LeaveViolation => "leave",
            ConflictKind::ConsecutiveExceeded => "consecutive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub kind: ConflictKind,
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("cannot generate: no doctors available")]
    NoEligibleStaff,
    #[error("invalid roster window: {0}")]
    InvalidWindow(String),
    #[error("invalid coverage requirement: {0}")]
    InvalidRequirement(String),
    #[error("invalid leave request: {0}")]
    InvalidLeave(String),
    #[error("invalid preference: {0}")]
    InvalidPreference(String),
    #[error("unknown staff member: {0}")]
    UnknownStaff(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
