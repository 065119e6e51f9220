//! New project scaffolding.

use crate::config::{ConfigDocument, write_config};
use crate::constants::{CONFIG_FILE_NAME, layout::PROJECT_SUBDIRS};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory name for a project created on `date`, e.g. `mouse1-Apr30-2020`.
pub fn project_dir_name(name: &str, date: NaiveDate) -> String {
    format!("{name}-{}", date.format("%b%-d-%Y"))
}

/// Create a project directory under `working_dir` and write its config.
///
/// The config starts with only `Project` and `project_path` set. Returns the
/// path of the written config file.
pub fn init_project(name: &str, working_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let project_path = std::path::absolute(working_dir.join(project_dir_name(name, date)))?;
    if project_path.exists() {
        return Err(Error::ProjectExists { path: project_path });
    }

    for subdir in PROJECT_SUBDIRS {
        std::fs::create_dir_all(project_path.join(subdir))?;
    }

    let mut doc = ConfigDocument::new();
    doc.insert("Project", name);
    doc.insert("project_path", project_path.to_string_lossy().into_owned());

    let config_path = project_path.join(CONFIG_FILE_NAME);
    write_config(&config_path, &doc)?;

    info!(path = %project_path.display(), "created project");
    Ok(config_path)
}
