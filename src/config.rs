//! Configuration management for the cs CLI
//!
//! Endpoints and credentials live in a YAML profiles file, by default
//! `~/.config/cs/profiles.yaml` or the path named by `CS_CONFIG`.
//!
//! ## Environment Variable Expansion
//!
//! Values support environment variable expansion with the following syntax:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use crate::constants::{CS_CONFIG_ENV, DEFAULT_CONFIG_FILE};
use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs, path::PathBuf};

/// Profiles file
///
/// # Example
///
/// ```yaml
/// defaultProfile: gva
/// profiles:
///   - name: gva
///     endpoint: https://api.example.com/compute
///     key: ${CS_KEY}
///     secret: ${CS_SECRET}
///     pollTimeout: 600
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Profile used when none is requested explicitly
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// Endpoint and credentials of one account
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
    /// Give up waiting on async jobs after this many seconds
    #[serde(default)]
    pub poll_timeout: Option<u64>,
}

impl Config {
    /// Pick a profile by name, falling back to `defaultProfile`, then to the
    /// only profile if there is exactly one
    pub fn profile(&self, name: Option<&str>) -> anyhow::Result<&Profile> {
        let wanted = name.or(self.default_profile.as_deref());
        match wanted {
            Some(wanted) => self
                .profiles
                .iter()
                .find(|p| p.name == wanted)
                .ok_or_else(|| anyhow!("profile '{}' is not configured", wanted)),
            None => match self.profiles.as_slice() {
                [only] => Ok(only),
                [] => Err(anyhow!("no profiles configured")),
                _ => Err(anyhow!(
                    "several profiles configured; pick one with --profile or set defaultProfile"
                )),
            },
        }
    }
}

/// Location of the profiles file
pub fn config_path() -> PathBuf {
    env::var(CS_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(DEFAULT_CONFIG_FILE);
            p
        })
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let data = preprocess_config(path)
        .with_context(|| format!("reading profiles {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("parsing profiles {}", path.display()))?;
    Ok(cfg)
}

pub fn expand_env_placeholders(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}")
        .expect("placeholder pattern is valid");
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let op = caps.get(2).map_or("", |m| m.as_str());
        let val = caps.get(3).map_or("", |m| m.as_str());
        let var = env::var(var_name).ok();

        match (var.as_deref(), op) {
            (Some(v), "") => v.to_string(),                    // ${VAR}
            (Some(v), ":-") if !v.is_empty() => v.to_string(), // ${VAR:-default}
            (Some(_), ":-") | (None, ":-") => val.to_string(),
            (Some(v), "-") => v.to_string(), // ${VAR-default}
            (None, "-") => val.to_string(),
            (Some(v), ":+") if !v.is_empty() => val.to_string(), // ${VAR:+alt}
            (Some(_), "+") => val.to_string(),                   // ${VAR+alt}
            _ => String::new(),
        }
    })
    .to_string()
}

pub fn preprocess_config(path: &Path) -> anyhow::Result<String> {
    let raw_data = fs::read_to_string(path)?;
    Ok(expand_env_placeholders(&raw_data))
}
