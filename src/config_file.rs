//! Settings file management
//!
//! Each script keeps its record in its own JSON file inside one folder
//! (`~/Documents/WestTekAuto` by default). Files are read at startup and
//! rewritten whenever settings are saved. Reading is forgiving: unknown keys
//! are ignored, missing keys keep their defaults and a damaged file falls
//! back to defaults instead of stopping the program.

use crate::automation::Variant;
use crate::config;
use crate::constants::CONFIG_FOLDER_NAME;
use crate::settings::{
    ElevatorSettings, FieldSpec, FieldValue, SettingsError, SettingsRecord, WalkSettings,
};
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the per-script settings files
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the standard settings folder
    ///
    /// - Windows: `%USERPROFILE%\Documents\WestTekAuto`
    /// - macOS/Linux: `~/Documents/WestTekAuto`, or the config dir if there is
    ///   no Documents folder
    pub fn default_dir() -> Result<PathBuf> {
        dirs::document_dir()
            .or_else(dirs::config_dir)
            .map(|dir| dir.join(CONFIG_FOLDER_NAME))
            .ok_or_else(|| anyhow!("Failed to determine a folder for settings files"))
    }

    /// Resolve the folder (precedence: explicit path > WESTTEK_CONFIG_DIR > default)
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let dir = match explicit.or_else(config::parse_config_dir) {
            Some(dir) => dir,
            None => Self::default_dir()?,
        };
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, variant: Variant) -> PathBuf {
        self.dir.join(variant.file_name())
    }

    /// Create the folder if needed. Returns true when it was just created.
    pub fn ensure_dir(&self) -> Result<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create settings folder: {}", self.dir.display()))?;
        info!("Created settings folder: {}", self.dir.display());
        Ok(true)
    }

    /// Load every script's record
    ///
    /// A fresh folder is populated with defaults. A file that cannot be read
    /// or parsed is replaced by defaults, with a warning.
    pub fn load_profiles(&self) -> Result<Profiles> {
        let created = self.ensure_dir()?;
        let profiles = Profiles {
            primary: self.load_or_default(Variant::Primary),
            timed_run: self.load_or_default(Variant::TimedRun),
            alt: self.load_or_default(Variant::Alt),
        };
        if created {
            self.save_profiles(&profiles)?;
        }
        Ok(profiles)
    }

    pub fn save_profiles(&self, profiles: &Profiles) -> Result<()> {
        self.ensure_dir()?;
        save_record(&self.path_for(Variant::Primary), &profiles.primary)?;
        save_record(&self.path_for(Variant::TimedRun), &profiles.timed_run)?;
        save_record(&self.path_for(Variant::Alt), &profiles.alt)?;
        Ok(())
    }

    /// Save only one script's record
    pub fn save_variant(&self, profiles: &Profiles, variant: Variant) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(variant);
        match variant {
            Variant::Primary => save_record(&path, &profiles.primary),
            Variant::TimedRun => save_record(&path, &profiles.timed_run),
            Variant::Alt => save_record(&path, &profiles.alt),
        }
    }

    fn load_or_default<R: SettingsRecord>(&self, variant: Variant) -> R {
        let path = self.path_for(variant);
        match load_record::<R>(&path) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "Error loading {}: {:#}. Default settings will be used.",
                    path.display(),
                    e
                );
                let record = R::default();
                if let Err(e) = save_record(&path, &record) {
                    warn!("Could not rewrite {}: {:#}", path.display(), e);
                }
                record
            }
        }
    }
}

/// Load a record from a JSON file, starting from defaults
///
/// A missing file yields the defaults. Only a file that exists but is not a
/// JSON object is an error.
pub fn load_record<R: SettingsRecord>(path: &Path) -> Result<R> {
    let mut record = R::default();
    if !path.exists() {
        return Ok(record);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
    let Value::Object(map) = parsed else {
        anyhow::bail!("Settings file is not a JSON object: {}", path.display());
    };

    let rejected = record.merge_map(&map);
    if !rejected.is_empty() {
        warn!(
            "{} value(s) in {} were ignored",
            rejected.len(),
            path.display()
        );
    }
    Ok(record)
}

/// Write a record as pretty JSON
pub fn save_record<R: SettingsRecord>(path: &Path, record: &R) -> Result<()> {
    let contents = serde_json::to_string_pretty(record).context("Failed to serialize settings")?;
    fs::write(path, contents)
        .with_context(|| format!("Could not save settings: {}", path.display()))?;
    log::debug!("Settings saved to: {}", path.display());
    Ok(())
}

/// The three scripts' records as loaded from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profiles {
    pub primary: ElevatorSettings,
    pub timed_run: ElevatorSettings,
    pub alt: WalkSettings,
}

impl Profiles {
    pub fn fields(variant: Variant) -> &'static [FieldSpec] {
        match variant {
            Variant::Primary | Variant::TimedRun => ElevatorSettings::fields(),
            Variant::Alt => WalkSettings::fields(),
        }
    }

    pub fn get(&self, variant: Variant, key: &str) -> Option<FieldValue> {
        match variant {
            Variant::Primary => self.primary.get(key),
            Variant::TimedRun => self.timed_run.get(key),
            Variant::Alt => self.alt.get(key),
        }
    }

    /// Warning shown when an edit is rejected, naming the value kept
    pub fn rejected_edit_message(&self, variant: Variant, key: &str, error: &SettingsError) -> String {
        match self.get(variant, key) {
            Some(kept) => format!("{}. Keeping '{}'.", error, kept),
            None => error.to_string(),
        }
    }

    pub fn default_value(variant: Variant, key: &str) -> Option<FieldValue> {
        match variant {
            Variant::Primary | Variant::TimedRun => ElevatorSettings::default().get(key),
            Variant::Alt => WalkSettings::default().get(key),
        }
    }

    pub fn set_from_str(&mut self, variant: Variant, key: &str, text: &str) -> Result<(), SettingsError> {
        match variant {
            Variant::Primary => self.primary.set_from_str(key, text),
            Variant::TimedRun => self.timed_run.set_from_str(key, text),
            Variant::Alt => self.alt.set_from_str(key, text),
        }
    }

    pub fn reset_field(&mut self, variant: Variant, key: &str) -> Result<FieldValue, SettingsError> {
        match variant {
            Variant::Primary => self.primary.reset_field(key),
            Variant::TimedRun => self.timed_run.reset_field(key),
            Variant::Alt => self.alt.reset_field(key),
        }
    }

    pub fn reset_all(&mut self, variant: Variant) {
        match variant {
            Variant::Primary => self.primary = ElevatorSettings::default(),
            Variant::TimedRun => self.timed_run = ElevatorSettings::default(),
            Variant::Alt => self.alt = WalkSettings::default(),
        }
    }

    pub fn game_process(&self, variant: Variant) -> &str {
        match variant {
            Variant::Primary => self.primary.game_process(),
            Variant::TimedRun => self.timed_run.game_process(),
            Variant::Alt => self.alt.game_process(),
        }
    }
}
