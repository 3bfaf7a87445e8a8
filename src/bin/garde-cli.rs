#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use garde::{
    fatigue::{classify_fatigue, high_risk, FatigueThresholds},
    io,
    model::{LeaveStatus, StaffId},
    notification::{prepare_duty_notice, TextAlert, TextDuty},
    scheduler::{
        audit_coverage, coverage_summary, EngineOptions, GenerateRequest, RosterEngine,
        RosterWindow, DEFAULT_WINDOW_DAYS,
    },
    storage::{JsonStorage, Storage},
    template::{load_template_from_file, TemplateStore},
};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des gardes médicales
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du jeu de données
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Decision {
    Approve,
    Deny,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer le personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des demandes de congé depuis un CSV
    ImportLeave {
        #[arg(long)]
        csv: String,
    },

    /// Importer les préférences depuis un CSV
    ImportPreferences {
        #[arg(long)]
        csv: String,
    },

    /// Importer les règles de couverture depuis un CSV (remplace les règles existantes)
    ImportRequirements {
        #[arg(long)]
        csv: String,
    },

    /// Approuver ou refuser une demande de congé
    DecideLeave {
        #[arg(long)]
        staff: String,
        /// Premier jour de la demande (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        #[arg(long, value_enum)]
        decision: Decision,
    },

    /// Générer le planning d'une fenêtre
    Generate {
        /// Premier jour (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Nombre de jours (défaut : template ou 7)
        #[arg(long)]
        days: Option<i64>,
        /// Identifiant du template de couverture à utiliser
        #[arg(long)]
        template: Option<String>,
        #[arg(long, default_value = "templates")]
        template_dir: String,
        /// Plafond de jours consécutifs pour les médecins sans préférence
        #[arg(long)]
        default_max_consecutive: Option<u32>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        alerts_csv: Option<String>,
    },

    /// Lister les affectations et optionnellement exporter
    List {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les conflits et la couverture
    Check {
        /// Fenêtre à auditer (YYYY-MM-DD) ; sans elle, seuls les conflits sont vérifiés
        #[arg(long)]
        start: Option<String>,
        #[arg(long, default_value_t = i64::from(DEFAULT_WINDOW_DAYS))]
        days: i64,
        #[arg(long)]
        default_max_consecutive: Option<u32>,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Indicateur de fatigue par médecin
    Fatigue {
        #[arg(long, default_value_t = 2)]
        max_nights: u32,
        #[arg(long, default_value_t = 5)]
        high_total: u32,
        #[arg(long)]
        report: Option<String>,
    },

    /// Générer l'avis de garde d'un médecin
    Notify {
        #[arg(long)]
        staff: String,
        /// À partir de (YYYY-MM-DD), défaut : aujourd'hui
        #[arg(long)]
        from: Option<String>,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },

    /// Enregistrer un template de couverture
    TemplateSave {
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "templates")]
        dir: String,
    },

    /// Lister les templates de couverture
    TemplateList {
        #[arg(long, default_value = "templates")]
        dir: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;
    let mut roster = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            println!("imported {} staff member(s)", staff.len());
            roster.staff.extend(staff);
            storage.save(&roster)?;
            0
        }
        Commands::ImportLeave { csv } => {
            let leave = io::import_leave_csv(csv)?;
            for l in &leave {
                if roster.find_staff(&l.staff).is_none() {
                    bail!("unknown staff member in leave: {}", l.staff);
                }
            }
            println!("imported {} leave request(s)", leave.len());
            roster.leave.extend(leave);
            storage.save(&roster)?;
            0
        }
        Commands::ImportPreferences { csv } => {
            let prefs = io::import_preferences_csv(csv)?;
            for p in &prefs {
                if !p.overlap().is_empty() {
                    eprintln!(
                        "Warning: {} both prefers and dislikes the same shift, dislike wins",
                        p.staff
                    );
                }
            }
            let ids: Vec<StaffId> = prefs.iter().map(|p| p.staff.clone()).collect();
            roster.preferences.retain(|p| !ids.contains(&p.staff));
            roster.preferences.extend(prefs);
            storage.save(&roster)?;
            0
        }
        Commands::ImportRequirements { csv } => {
            roster.requirements = io::import_requirements_csv(csv)?;
            storage.save(&roster)?;
            0
        }
        Commands::DecideLeave {
            staff,
            start,
            decision,
        } => {
            let staff = StaffId::new(staff);
            let start = io::parse_date(&start)?;
            let leave = roster
                .find_leave_mut(&staff, start)
                .with_context(|| format!("no leave request for {staff} starting {start}"))?;
            if leave.status != LeaveStatus::Pending {
                bail!("leave request already decided ({:?})", leave.status);
            }
            leave.status = match decision {
                Decision::Approve => LeaveStatus::Approved,
                Decision::Deny => LeaveStatus::Denied,
            };
            storage.save(&roster)?;
            0
        }
        Commands::Generate {
            start,
            days,
            template,
            template_dir,
            default_max_consecutive,
            out_json,
            out_csv,
            alerts_csv,
        } => {
            let mut opts = EngineOptions::default();
            if default_max_consecutive.is_some() {
                opts.default_max_consecutive = default_max_consecutive;
            }
            let requirements = match template {
                Some(id) => {
                    let template = TemplateStore::new(&template_dir).load(&id)?;
                    opts = template.engine_options(opts);
                    template.requirements
                }
                None => roster.requirements.clone(),
            };
            let window = RosterWindow::parse(&start, days.unwrap_or(i64::from(opts.window_days)))?;

            let history = roster
                .assignments
                .iter()
                .filter(|a| a.date < window.start())
                .cloned()
                .collect();
            let request = GenerateRequest::new(roster.staff.clone(), window)
                .with_preferences(roster.preferences.clone())
                .with_leave(roster.leave.clone())
                .with_requirements(requirements.clone())
                .with_history(history);

            let plan = RosterEngine::new(opts).generate(&request)?;

            roster.assignments.retain(|a| !window.contains(a.date));
            roster.assignments.extend(plan.assignments.iter().cloned());
            roster
                .assignments
                .sort_by(|a, b| (a.date, a.shift, &a.department).cmp(&(b.date, b.shift, &b.department)));
            storage.save(&roster)?;

            if let Some(path) = out_json {
                io::export_plan_json(path, &plan)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &roster)?;
            }
            if let Some(path) = alerts_csv {
                io::export_alerts_csv(path, &plan.alerts)?;
            }

            let summary = coverage_summary(&window, &requirements, &plan.alerts);
            println!(
                "{} assignment(s), {}/{} slot(s) covered",
                plan.assignments.len(),
                summary.satisfied,
                summary.demands
            );
            for alert in &plan.alerts {
                eprintln!("ALERT: {}", alert.message);
            }
            // Code 2 = WARNING/INCOMPLETE
            if plan.alerts.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::List { out_csv } => {
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &roster)?;
            }
            for a in &roster.assignments {
                println!(
                    "{} | {:<7} | {} | {}",
                    a.date,
                    a.shift,
                    a.department,
                    roster.display_name(&a.staff)
                );
            }
            0
        }
        Commands::Check {
            start,
            days,
            default_max_consecutive,
            report,
        } => {
            let opts = EngineOptions {
                default_max_consecutive,
                ..EngineOptions::default()
            };
            let conflicts = RosterEngine::new(opts).detect_conflicts(
                &roster.assignments,
                &roster.leave,
                &roster.preferences,
            );
            let alerts = match start {
                Some(start) => {
                    let window = RosterWindow::parse(&start, days)?;
                    audit_coverage(&window, &roster.requirements, &roster.assignments, &TextAlert)
                }
                None => Vec::new(),
            };

            if conflicts.is_empty() && alerts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!(
                    "Found {} conflict(s), {} coverage alert(s)",
                    conflicts.len(),
                    alerts.len()
                );
                for alert in &alerts {
                    eprintln!("ALERT: {}", alert.message);
                }
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["staff_id", "date", "kind", "detail"])?;
                    for c in &conflicts {
                        let date = c.date.to_string();
                        w.write_record([c.staff.as_str(), date.as_str(), c.kind.as_str(), c.detail.as_str()])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
        Commands::Fatigue {
            max_nights,
            high_total,
            report,
        } => {
            let entries = classify_fatigue(
                &roster.assignments,
                FatigueThresholds {
                    max_nights,
                    high_total,
                },
            );
            if let Some(path) = report {
                io::export_fatigue_csv(path, &roster, &entries)?;
            }
            let risky: Vec<_> = high_risk(&entries).collect();
            for e in &risky {
                println!(
                    "HIGH RISK: {} ({} shift(s), {} night(s))",
                    roster.display_name(&e.staff),
                    e.total,
                    e.nights
                );
            }
            if risky.is_empty() {
                println!("OK: no high-risk workload");
                0
            } else {
                2
            }
        }
        Commands::Notify { staff, from, out } => {
            let from = match from {
                Some(raw) => io::parse_date(&raw)?,
                None => Utc::now().date_naive(),
            };
            let notice = prepare_duty_notice(&roster, &StaffId::new(staff), from, &TextDuty)?;
            std::fs::write(&out, &notice.content)?;
            println!(
                "Notice generated for {} ({} shift(s))",
                notice.name, notice.shifts
            );
            0
        }
        Commands::TemplateSave { file, dir } => {
            let template = load_template_from_file(&file)?;
            let path = TemplateStore::new(&dir).save(&template)?;
            println!("template {} saved to {}", template.id, path.display());
            0
        }
        Commands::TemplateList { dir } => {
            for info in TemplateStore::new(&dir).list()? {
                let departments: Vec<&str> = info.template.departments().into_iter().collect();
                println!(
                    "{} | {} | {}",
                    info.template.id,
                    info.template.name,
                    departments.join(", ")
                );
            }
            0
        }
    };

    std::process::exit(code);
}
