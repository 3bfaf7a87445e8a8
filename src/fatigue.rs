//! Classification de charge (indicative, affichage uniquement).

use crate::model::{ShiftAssignment, ShiftType, StaffId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seuils de risque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatigueThresholds {
    /// Risque élevé au-delà de ce nombre de nuits.
    pub max_nights: u32,
    /// Risque élevé à partir de ce nombre total de gardes.
    pub high_total: u32,
}

impl Default for FatigueThresholds {
    fn default() -> Self {
        Self {
            max_nights: 2,
            high_total: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueRisk {
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueEntry {
    pub staff: StaffId,
    pub total: u32,
    pub nights: u32,
    pub risk: FatigueRisk,
}

/// Fonction pure sur un ensemble d'affectations ; une entrée par médecin, triée par identifiant.
pub fn classify_fatigue(
    assignments: &[ShiftAssignment],
    thresholds: FatigueThresholds,
) -> Vec<FatigueEntry> {
    let mut counts: BTreeMap<&StaffId, (u32, u32)> = BTreeMap::new();
    for a in assignments {
        let (total, nights) = counts.entry(&a.staff).or_insert((0, 0));
        *total += 1;
        if a.shift == ShiftType::Night {
            *nights += 1;
        }
    }

    counts
        .into_iter()
        .map(|(staff, (total, nights))| {
            let risk = if nights > thresholds.max_nights || total >= thresholds.high_total {
                FatigueRisk::High
            } else {
                FatigueRisk::Normal
            };
            FatigueEntry {
                staff: staff.clone(),
                total,
                nights,
                risk,
            }
        })
        .collect()
}

pub fn high_risk(entries: &[FatigueEntry]) -> impl Iterator<Item = &FatigueEntry> {
    entries.iter().filter(|e| e.risk == FatigueRisk::High)
}
