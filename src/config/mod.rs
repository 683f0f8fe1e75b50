use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{BankError, BankResult};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Policy knobs for the ledger rules. Defaults carry the branch policy the
/// system has always shipped with: a 100.00 savings floor, 1% savings
/// interest, and 2% credit card interest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub default_minimum_balance: f64,
    pub savings_interest_rate: f64,
    pub credit_card_interest_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_minimum_balance: 100.0,
            savings_interest_rate: 0.01,
            credit_card_interest_rate: 0.02,
        }
    }
}

impl Config {
    /// Checks values sourced from outside the program (the config file).
    pub fn validate(&self) -> BankResult<()> {
        if !(self.default_minimum_balance >= 0.0) {
            return Err(BankError::Validation(
                "minimum balance must be non-negative".into(),
            ));
        }
        if !(self.savings_interest_rate >= 0.0) || !(self.credit_card_interest_rate >= 0.0) {
            return Err(BankError::Validation(
                "interest rates must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Loads and saves the policy file under the user's config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> BankResult<Self> {
        Self::from_base(default_base())
    }

    #[cfg(test)]
    pub fn with_base_dir(base: PathBuf) -> BankResult<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> BankResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Returns the saved policy, or the defaults when no file exists yet.
    pub fn load(&self) -> BankResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> BankResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn default_base() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bank_core")
}

fn ensure_dir(path: &Path) -> BankResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension(TMP_SUFFIX)
}

fn write_atomic(path: &Path, contents: &str) -> BankResult<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
