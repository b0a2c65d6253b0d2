//! Connection profiles: load/save a simple JSON mapping of profile name -> { url }
//! Stored under $XDG_CONFIG_HOME/tasktop/profiles.json (fallback ~/.config/tasktop/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("tasktop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tasktop")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> std::io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(std::io::Error::other)?;
    fs::write(path, data)
}

pub enum ResolveProfile {
    /// Use the provided runtime url (not persisted by default).
    Direct(String),
    /// Loaded from an existing profile entry.
    Loaded(String),
    /// Should prompt the user to select among profile names.
    PromptSelect(Vec<String>),
    /// Should prompt the user to create a new profile with this name.
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments).
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        // Case: only profile name given -> try load
        if self.url.is_none() {
            if let Some(name) = self.profile_name {
                return match pf.profiles.get(&name) {
                    Some(entry) => ResolveProfile::Loaded(entry.url.clone()),
                    None => ResolveProfile::PromptCreate(name),
                };
            }
        }
        // URL provided -> direct (maybe later saved by caller)
        if let Some(u) = self.url {
            return ResolveProfile::Direct(u);
        }
        // Nothing provided -> maybe prompt select if profiles exist
        if pf.profiles.is_empty() {
            ResolveProfile::None
        } else {
            ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect())
        }
    }
}
