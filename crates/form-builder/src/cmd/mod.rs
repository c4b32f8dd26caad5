pub mod catalog;
pub mod field;
pub mod logic;
pub mod snapshot;
pub mod translate;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use form_spec::Form;
use tracing::debug;

use crate::config::BuilderConfig;
use crate::fs_store::FsStore;

/// Shared state for one invocation: the working form file plus config.
#[derive(Debug, Clone)]
pub struct Context {
    form_path: PathBuf,
    config: BuilderConfig,
    store_dir: Option<PathBuf>,
}

impl Context {
    pub fn new(form_path: PathBuf, config: BuilderConfig, store_dir: Option<PathBuf>) -> Self {
        Self {
            form_path,
            config,
            store_dir,
        }
    }

    pub fn form_path(&self) -> &Path {
        &self.form_path
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Reads the working form; a missing file is an empty form.
    pub fn load_form(&self) -> Result<Form> {
        let raw = match fs::read_to_string(&self.form_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.form_path.display(), "no form file yet; starting empty");
                return Ok(Form::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.form_path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid form file", self.form_path.display()))
    }

    /// Writes the whole field list back to the working form file.
    pub fn save_form(&self, form: &Form) -> Result<()> {
        let mut json = serde_json::to_string_pretty(form).context("failed to serialize form")?;
        json.push('\n');
        fs::write(&self.form_path, json)
            .with_context(|| format!("failed to write {}", self.form_path.display()))
    }

    pub fn open_store(&self) -> Result<FsStore> {
        let dir = self.config.store_dir(self.store_dir.as_deref())?;
        FsStore::open(&dir)
            .with_context(|| format!("failed to open snapshot store {}", dir.display()))
    }
}
