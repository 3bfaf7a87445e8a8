use crate::model::{Roster, ShiftAssignment, StaffId, StaffMember};
use crate::scheduler::Demand;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

/// Rendu du message d'une alerte de sous-couverture.
pub trait AlertRenderer {
    fn render(&self, demand: &Demand, assigned: u32) -> String;
}

/// Message texte court, affichable tel quel dans la grille.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextAlert;

impl AlertRenderer for TextAlert {
    fn render(&self, demand: &Demand, assigned: u32) -> String {
        format!(
            "{department} needs {required} staff on {shift} {date}, only {assigned} assigned (short by {missing})",
            department = demand.department,
            required = demand.required,
            shift = demand.shift,
            date = demand.date,
            missing = demand.required.saturating_sub(assigned),
        )
    }
}

/// Avis de garde pour un médecin.
#[derive(Debug, Clone)]
pub struct DutyNotice {
    pub staff: StaffId,
    pub name: String,
    pub shifts: usize,
    pub content: String,
}

/// Permet de customiser le rendu de l'avis (texte, mail, etc.).
pub trait DutyRenderer {
    fn render(&self, member: &StaffMember, duties: &[&ShiftAssignment]) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextDuty;

impl DutyRenderer for TextDuty {
    fn render(&self, member: &StaffMember, duties: &[&ShiftAssignment]) -> String {
        let mut out = format!("Bonjour {},\n\nVoici tes prochaines gardes :\n", member.name);
        for duty in duties {
            let (start, end) = duty.shift.hours();
            out.push_str(&format!(
                "- {date} {shift} ({start:02}h-{end:02}h) : {department}\n",
                date = duty.date,
                shift = duty.shift,
                department = duty.department,
            ));
        }
        out.push_str("\nMerci de signaler tout empêchement au plus tôt.\n");
        out
    }
}

/// Prépare l'avis des gardes d'un médecin à partir de `from` (inclus).
pub fn prepare_duty_notice(
    roster: &Roster,
    staff: &StaffId,
    from: NaiveDate,
    renderer: &dyn DutyRenderer,
) -> Result<DutyNotice> {
    let member = roster
        .find_staff(staff)
        .with_context(|| format!("unknown staff member: {staff}"))?;

    let mut upcoming: Vec<&ShiftAssignment> = roster
        .assignments
        .iter()
        .filter(|a| &a.staff == staff && a.date >= from)
        .collect();

    if upcoming.is_empty() {
        bail!("no upcoming shift found for {staff}");
    }

    upcoming.sort_by_key(|a| (a.date, a.shift));

    let content = renderer.render(member, &upcoming);
    Ok(DutyNotice {
        staff: member.id.clone(),
        name: member.name.clone(),
        shifts: upcoming.len(),
        content,
    })
}
