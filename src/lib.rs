#![forbid(unsafe_code)]
//! Garde — moteur de planning des gardes médicales, déterministe et sans état.
//!
//! - Règles de couverture par service et par créneau.
//! - Congés approuvés, préférences, plafond de jours consécutifs.
//! - Affectation gloutonne reproductible, alertes de sous-couverture.
//! - Indicateur de fatigue ; stockage fichiers (JSON/CSV) en dehors du moteur.

pub mod fatigue;
pub mod io;
pub mod model;
pub mod notification;
pub mod scheduler;
pub mod storage;
pub mod template;

pub use fatigue::{classify_fatigue, FatigueEntry, FatigueRisk, FatigueThresholds};
pub use model::{
    CoverageAlert, CoverageRequirement, LeaveRequest, LeaveStatus, Preference, Role, Roster,
    ShiftAssignment, ShiftType, StaffId, StaffMember,
};
pub use notification::{prepare_duty_notice, AlertRenderer, DutyNotice, DutyRenderer, TextAlert, TextDuty};
pub use scheduler::{
    audit_coverage, generate, Conflict, ConflictKind, EngineOptions, GenerateRequest,
    RosterEngine, RosterPlan, RosterWindow, SchedError,
};
pub use storage::{JsonStorage, Storage};
pub use template::{
    export_template_json, load_template_from_file, CoverageTemplate, Rules, TemplateInfo,
    TemplateStore,
};
