use crate::fatigue::{FatigueEntry, FatigueRisk};
use crate::model::{
    CoverageAlert, CoverageRequirement, LeaveRequest, LeaveStatus, Preference, Role, Roster,
    ShiftType, StaffId, StaffMember,
};
use crate::scheduler::RosterPlan;
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Import du personnel : header `id,name,role[,department]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let role = rec.get(2).context("missing role")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let role: Role = role
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid role for {name}"))?;
        let department = rec
            .get(3)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let mut member = StaffMember::new(name, role, department);
        if !id.is_empty() {
            member.id = StaffId::new(id);
        }
        out.push(member);
    }
    Ok(out)
}

/// Import des congés : header `staff_id,start,end[,status]` (dates `YYYY-MM-DD`, bornes incluses)
pub fn import_leave_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LeaveRequest>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let staff = rec.get(0).context("missing staff_id")?.trim();
        if staff.is_empty() {
            bail!("invalid leave row (empty staff_id)");
        }
        let start = parse_date(rec.get(1).context("missing start")?)?;
        let end = parse_date(rec.get(2).context("missing end")?)?;
        let status: LeaveStatus = rec
            .get(3)
            .unwrap_or("")
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid status for {staff}"))?;
        let leave = LeaveRequest::new(StaffId::new(staff), start, end, status)
            .map_err(anyhow::Error::msg)?;
        out.push(leave);
    }
    Ok(out)
}

/// Import des préférences : header `staff_id,preferred,disliked,max_consecutive`
/// (listes de créneaux séparées par `;`)
pub fn import_preferences_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Preference>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let staff = rec.get(0).context("missing staff_id")?.trim();
        if staff.is_empty() {
            bail!("invalid preference row (empty staff_id)");
        }
        let preferred = parse_shift_list(rec.get(1).unwrap_or(""))
            .with_context(|| format!("invalid preferred shifts for {staff}"))?;
        let disliked = parse_shift_list(rec.get(2).unwrap_or(""))
            .with_context(|| format!("invalid disliked shifts for {staff}"))?;
        let max: u32 = rec
            .get(3)
            .context("missing max_consecutive")?
            .trim()
            .parse()
            .with_context(|| format!("invalid max_consecutive for {staff}"))?;
        let pref = Preference::new(StaffId::new(staff), max)
            .map_err(anyhow::Error::msg)?
            .prefers(preferred)
            .dislikes(disliked);
        out.push(pref);
    }
    Ok(out)
}

/// Import des règles de couverture : header `department,shifts,min_staff`
/// (`all` = tous les créneaux)
pub fn import_requirements_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<CoverageRequirement>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let department = rec.get(0).context("missing department")?.trim();
        let raw_shifts = rec.get(1).context("missing shifts")?.trim();
        let shifts = if raw_shifts.eq_ignore_ascii_case("all") {
            ShiftType::ALL.into_iter().collect()
        } else {
            parse_shift_list(raw_shifts)
                .with_context(|| format!("invalid shifts for {department}"))?
        };
        let min: u32 = rec
            .get(2)
            .context("missing min_staff")?
            .trim()
            .parse()
            .with_context(|| format!("invalid min_staff for {department}"))?;
        let req = CoverageRequirement::new(department, shifts, min).map_err(anyhow::Error::msg)?;
        out.push(req);
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

fn parse_shift_list(raw: &str) -> anyhow::Result<BTreeSet<ShiftType>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.parse::<ShiftType>().map_err(|e| anyhow!(e)))
        .collect()
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &RosterPlan) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(plan)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des affectations : header `date,shift,department,staff_id,staff_name`
pub fn export_assignments_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "department", "staff_id", "staff_name"])?;
    for a in &roster.assignments {
        let date = a.date.to_string();
        w.write_record([
            date.as_str(),
            a.shift.as_str(),
            a.department.as_str(),
            a.staff.as_str(),
            roster.display_name(&a.staff),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des alertes : header `date,shift,department,required,assigned,message`
pub fn export_alerts_csv<P: AsRef<Path>>(path: P, alerts: &[CoverageAlert]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "department", "required", "assigned", "message"])?;
    let mut required = itoa::Buffer::new();
    let mut assigned = itoa::Buffer::new();
    for alert in alerts {
        let date = alert.date.to_string();
        w.write_record([
            date.as_str(),
            alert.shift.as_str(),
            alert.department.as_str(),
            required.format(alert.required),
            assigned.format(alert.assigned),
            alert.message.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV de la charge : header `staff_id,staff_name,total,nights,risk`
pub fn export_fatigue_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    entries: &[FatigueEntry],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["staff_id", "staff_name", "total", "nights", "risk"])?;
    let mut total = itoa::Buffer::new();
    let mut nights = itoa::Buffer::new();
    for e in entries {
        w.write_record([
            e.staff.as_str(),
            roster.display_name(&e.staff),
            total.format(e.total),
            nights.format(e.nights),
            match e.risk {
                FatigueRisk::Normal => "normal",
                FatigueRisk::High => "high",
            },
        ])?;
    }
    w.flush()?;
    Ok(())
}
