use crate::model::{Preference, ShiftType, StaffId};
use std::cmp::Ordering;

/// Palier de préférence, du plus favorable au moins favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreferenceTier {
    Preferred,
    Neutral,
    Disliked,
}

impl PreferenceTier {
    /// Un créneau à la fois préféré et refusé compte comme refusé.
    pub fn of(pref: Option<&Preference>, shift: ShiftType) -> Self {
        match pref {
            Some(p) if p.disliked.contains(&shift) => PreferenceTier::Disliked,
            Some(p) if p.preferred.contains(&shift) => PreferenceTier::Preferred,
            _ => PreferenceTier::Neutral,
        }
    }
}

/// Clé de tri d'un candidat : palier, charge courante, identifiant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RankKey<'a> {
    pub tier: PreferenceTier,
    pub load: usize,
    pub staff: &'a StaffId,
}

impl Ord for RankKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then(self.load.cmp(&other.load))
            .then_with(|| self.staff.cmp(other.staff))
    }
}

impl PartialOrd for RankKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
