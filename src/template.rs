use crate::model::CoverageRequirement;
use crate::scheduler::{EngineOptions, RosterWindow};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Jeu de règles de couverture réutilisable (un service ou un établissement).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<CoverageRequirement>,
    #[serde(default)]
    pub rules: Option<Rules>,
}

impl CoverageTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.id.contains(['/', '\\']) {
            bail!("template id cannot contain path separators");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        if self.requirements.is_empty() {
            bail!("template must contain at least one requirement");
        }
        for req in &self.requirements {
            req.validate().map_err(anyhow::Error::msg)?;
        }
        if let Some(rules) = &self.rules {
            rules.validate()?;
        }
        Ok(())
    }

    pub fn departments(&self) -> BTreeSet<&str> {
        self.requirements
            .iter()
            .map(|r| r.department.trim())
            .collect()
    }

    /// Options du moteur, surchargées par les règles du template.
    pub fn engine_options(&self, base: EngineOptions) -> EngineOptions {
        match &self.rules {
            Some(rules) => EngineOptions {
                default_max_consecutive: rules
                    .default_max_consecutive
                    .or(base.default_max_consecutive),
                window_days: rules.window_days.unwrap_or(base.window_days),
            },
            None => base,
        }
    }

    /// Fenêtre démarrant à `start`, de la longueur prévue par le template.
    pub fn window(&self, start: NaiveDate, base: EngineOptions) -> Result<RosterWindow> {
        let days = self.engine_options(base).window_days;
        RosterWindow::new(start, days).map_err(anyhow::Error::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default)]
    pub window_days: Option<u32>,
    #[serde(default)]
    pub default_max_consecutive: Option<u32>,
}

impl Rules {
    fn validate(&self) -> Result<()> {
        if self.window_days == Some(0) {
            bail!("window_days must be > 0");
        }
        if self.default_max_consecutive == Some(0) {
            bail!("default_max_consecutive must be > 0");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: CoverageTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Templates persistés sur disque, un fichier JSON par identifiant.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &CoverageTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id));
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json).with_context(|| format!("writing template {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<CoverageTemplate> {
        let path = self.base_dir.join(format!("{id}.json"));
        load_template_from_file(&path)
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let template: CoverageTemplate = match serde_json::from_slice(&data) {
                Ok(t) => t,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable template");
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }
}

pub fn export_template_json<P: AsRef<Path>>(path: P, template: &CoverageTemplate) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<CoverageTemplate> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading template {}", path.display()))?;
    let template: CoverageTemplate = serde_json::from_slice(&data)
        .with_context(|| format!("parsing template {}", path.display()))?;
    template.validate()?;
    Ok(template)
}
