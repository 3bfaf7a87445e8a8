use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour un membre du personnel (ordre total = départage final).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rôle d'un membre du personnel. Seul `Doctor` est planifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Doctor,
    Nurse,
    Admin,
    Custom(String),
}

impl Role {
    pub fn is_roster_eligible(&self) -> bool {
        matches!(self, Role::Doctor)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err("role cannot be empty".to_string());
        }
        Ok(match raw.to_ascii_lowercase().as_str() {
            "doctor" | "medecin" | "médecin" => Role::Doctor,
            "nurse" | "infirmier" | "infirmiere" => Role::Nurse,
            "admin" => Role::Admin,
            _ => Role::Custom(raw.to_string()),
        })
    }
}

/// Membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: Role,
    /// `None` : affectable à n'importe quel service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl StaffMember {
    pub fn new<N: Into<String>>(name: N, role: Role, department: Option<String>) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            role,
            department,
        }
    }

    pub fn doctor<I: AsRef<str>, N: Into<String>, D: Into<String>>(
        id: I,
        name: N,
        department: D,
    ) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            role: Role::Doctor,
            department: Some(department.into()),
        }
    }

    /// Affinité de service : comparaison insensible à la casse, `None` = tout service.
    pub fn serves(&self, department: &str) -> bool {
        match &self.department {
            None => true,
            Some(own) => {
                let own = own.trim();
                own.is_empty() || own.eq_ignore_ascii_case(department.trim())
            }
        }
    }
}

/// Type de créneau, ordonné globalement (affichage et comptage des enchaînements).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShiftType {
    Morning,
    Evening,
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 3] = [ShiftType::Morning, ShiftType::Evening, ShiftType::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Morning => "Morning",
            ShiftType::Evening => "Evening",
            ShiftType::Night => "Night",
        }
    }

    /// Plage horaire en heures (début, fin). La nuit se termine le lendemain.
    pub fn hours(self) -> (u32, u32) {
        match self {
            ShiftType::Morning => (7, 15),
            ShiftType::Evening => (15, 23),
            ShiftType::Night => (23, 7),
        }
    }

    fn minutes(self) -> (u32, u32) {
        let (start, end) = self.hours();
        let start = start * 60;
        let mut end = end * 60;
        if end <= start {
            end += 24 * 60;
        }
        (start, end)
    }

    /// Chevauchement de deux créneaux d'une même date.
    pub fn overlaps(self, other: ShiftType) -> bool {
        let (a_start, a_end) = self.minutes();
        let (b_start, b_end) = other.minutes();
        a_start < b_end && b_start < a_end
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ShiftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" | "matin" | "m" => Ok(ShiftType::Morning),
            "evening" | "soir" | "e" => Ok(ShiftType::Evening),
            "night" | "nuit" | "n" => Ok(ShiftType::Night),
            other => Err(format!("unknown shift type: {other}")),
        }
    }
}

/// Règle de couverture : un service a besoin d'au moins `min_staff` médecins
/// sur chacun des créneaux listés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    pub department: String,
    pub shifts: BTreeSet<ShiftType>,
    pub min_staff: u32,
}

impl CoverageRequirement {
    pub fn new<D: Into<String>, I: IntoIterator<Item = ShiftType>>(
        department: D,
        shifts: I,
        min_staff: u32,
    ) -> Result<Self, String> {
        let req = Self {
            department: department.into(),
            shifts: shifts.into_iter().collect(),
            min_staff,
        };
        req.validate()?;
        Ok(req)
    }

    /// Tous les créneaux de la journée.
    pub fn every_shift<D: Into<String>>(department: D, min_staff: u32) -> Result<Self, String> {
        Self::new(department, ShiftType::ALL, min_staff)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.department.trim().is_empty() {
            return Err("requirement department cannot be empty".to_string());
        }
        if self.shifts.is_empty() {
            return Err(format!(
                "requirement for {} must name at least one shift type",
                self.department
            ));
        }
        if self.min_staff == 0 {
            return Err(format!(
                "requirement for {} must ask for at least one staff member",
                self.department
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "denied" | "rejected" => Ok(LeaveStatus::Denied),
            other => Err(format!("unknown leave status: {other}")),
        }
    }
}

/// Demande de congé sur l'intervalle de dates inclusif [start, end].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub staff: StaffId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub status: LeaveStatus,
}

impl LeaveRequest {
    pub fn new(
        staff: StaffId,
        start: NaiveDate,
        end: NaiveDate,
        status: LeaveStatus,
    ) -> Result<Self, String> {
        let leave = Self {
            staff,
            start,
            end,
            status,
        };
        leave.validate()?;
        Ok(leave)
    }

    pub fn approved(staff: StaffId, start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        Self::new(staff, start, end, LeaveStatus::Approved)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end < self.start {
            return Err(format!(
                "leave for {} ends ({}) before it starts ({})",
                self.staff, self.end, self.start
            ));
        }
        Ok(())
    }

    /// Seules les demandes approuvées bloquent une date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.start <= date && date <= self.end
    }
}

/// Préférences d'un médecin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub staff: StaffId,
    #[serde(default)]
    pub preferred: BTreeSet<ShiftType>,
    #[serde(default)]
    pub disliked: BTreeSet<ShiftType>,
    pub max_consecutive: u32,
}

impl Preference {
    pub fn new(staff: StaffId, max_consecutive: u32) -> Result<Self, String> {
        let pref = Self {
            staff,
            preferred: BTreeSet::new(),
            disliked: BTreeSet::new(),
            max_consecutive,
        };
        pref.validate()?;
        Ok(pref)
    }

    pub fn prefers<I: IntoIterator<Item = ShiftType>>(mut self, shifts: I) -> Self {
        self.preferred.extend(shifts);
        self
    }

    pub fn dislikes<I: IntoIterator<Item = ShiftType>>(mut self, shifts: I) -> Self {
        self.disliked.extend(shifts);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_consecutive == 0 {
            return Err(format!(
                "max_consecutive for {} must be at least 1",
                self.staff
            ));
        }
        Ok(())
    }

    /// Créneaux à la fois préférés et refusés (qualité de données douteuse).
    pub fn overlap(&self) -> BTreeSet<ShiftType> {
        self.preferred.intersection(&self.disliked).copied().collect()
    }
}

/// Affectation d'un médecin à un créneau d'un service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub department: String,
}

/// Alerte de sous-couverture (jamais persistée par le moteur).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageAlert {
    pub department: String,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub required: u32,
    pub assigned: u32,
    pub message: String,
}

impl CoverageAlert {
    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.assigned)
    }
}

/// Jeu de données de l'établissement, tel que stocké par la CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
    #[serde(default)]
    pub leave: Vec<LeaveRequest>,
    #[serde(default)]
    pub requirements: Vec<CoverageRequirement>,
    #[serde(default)]
    pub assignments: Vec<ShiftAssignment>,
}

impl Roster {
    pub fn find_staff<'a>(&'a self, id: &StaffId) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_staff_by_name<'a>(&'a self, name: &str) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| s.name == name)
    }
    pub fn find_leave_mut(&mut self, staff: &StaffId, start: NaiveDate) -> Option<&mut LeaveRequest> {
        self.leave
            .iter_mut()
            .find(|l| &l.staff == staff && l.start == start)
    }
    pub fn display_name<'a>(&'a self, id: &'a StaffId) -> &'a str {
        self.find_staff(id).map_or(id.as_str(), |s| s.name.as_str())
    }
}
