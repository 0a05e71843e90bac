//! Named store profiles saved between CLI runs.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelf_core::config::{BASE_URL_ENV, RETRIES_ENV, RETRY_WAIT_ENV};
use shelf_core::util::is_http_url;
use shelf_core::ClientConfig;
use thiserror::Error;

pub use shelf_core::util::normalize_text_option;

const CONFIG_FILE_NAME: &str = "cli-config.json";
const PROFILE_ENV: &str = "SHELF_PROFILE";
const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("No config directory is available for Shelf profiles")]
    NoConfigDir,
    #[error("Cannot read Shelf profiles from {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Shelf profiles file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot save Shelf profiles to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

/// Per-profile overrides; anything unset falls through to the environment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub retry_wait_ms: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, ProfileStoreError> {
    let dir = dirs::config_dir().ok_or(ProfileStoreError::NoConfigDir)?;
    Ok(dir.join("shelf").join(CONFIG_FILE_NAME))
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, ProfileStoreError> {
        Self::load_from_path(&default_config_path()?)
    }

    /// A missing file is an empty set of profiles.
    pub fn load_from_path(path: &Path) -> Result<Self, ProfileStoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ProfileStoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| ProfileStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.normalized())
    }

    pub fn save(&self) -> Result<PathBuf, ProfileStoreError> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ProfileStoreError> {
        let write_error = |source: io::Error| ProfileStoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_error)?;
        }
        let json = serde_json::to_string_pretty(&self.clone().normalized())
            .map_err(io::Error::from)
            .map_err(write_error)?;
        std::fs::write(path, json).map_err(write_error)
    }

    /// Profile to use: `explicit`, then `SHELF_PROFILE`, then the active profile, then `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        let from_env = std::env::var(PROFILE_ENV).ok();
        self.pick_profile(explicit, from_env.as_deref())
    }

    fn pick_profile(&self, explicit: Option<&str>, from_env: Option<&str>) -> String {
        [explicit, from_env, self.active_profile.as_deref()]
            .into_iter()
            .find_map(normalize_profile_name)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalized(mut self) -> Self {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.api_base_url = profile
                .api_base_url()
                .map(|url| url.trim_end_matches('/').to_string());
        }
        self
    }
}

impl CliProfile {
    pub fn api_base_url(&self) -> Option<String> {
        normalize_text_option(self.api_base_url.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.api_base_url() {
            Some(url) if !is_http_url(&url) => Err(format!(
                "api_base_url '{url}' must start with http:// or https://"
            )),
            _ => Ok(()),
        }
    }
}

/// Build the client config with `base_url_flag` over `profile` over `env`.
///
/// Each setting is taken from the first layer that has it, so a broken
/// environment value only matters when nothing overrides it.
pub fn resolve_client_config(
    env: impl Fn(&str) -> Option<String>,
    profile: Option<&CliProfile>,
    base_url_flag: Option<String>,
) -> shelf_core::Result<ClientConfig> {
    let base_url = normalize_text_option(base_url_flag)
        .or_else(|| profile.and_then(CliProfile::api_base_url));
    let retries = profile
        .and_then(|profile| profile.retries)
        .map(|retries| retries.to_string());
    let retry_wait_ms = profile
        .and_then(|profile| profile.retry_wait_ms)
        .map(|wait_ms| wait_ms.to_string());

    ClientConfig::from_lookup(|key| {
        let layered = match key {
            BASE_URL_ENV => base_url.clone(),
            RETRIES_ENV => retries.clone(),
            RETRY_WAIT_ENV => retry_wait_ms.clone(),
            _ => None,
        };
        layered.or_else(|| env(key))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;
    use shelf_core::RetryPolicy;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
        assert_eq!(normalize_profile_name(Some(" work ")), Some("work".to_string()));
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" default ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "default".to_string(),
            CliProfile {
                api_base_url: Some(" http://localhost:1337/ ".to_string()),
                retries: Some(3),
                retry_wait_ms: None,
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("default"));
        assert_eq!(profile.api_base_url.as_deref(), Some("http://localhost:1337"));
        assert_eq!(profile.retries, Some(3));
        assert_eq!(profile.retry_wait_ms, None);
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliProfilesConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let error = CliProfilesConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(error, ProfileStoreError::Parse { .. }));
        assert!(error.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn pick_profile_prefers_explicit_then_env_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(config.pick_profile(Some("local"), Some("env")), "local");
        assert_eq!(config.pick_profile(Some(" "), Some("env")), "env");
        assert_eq!(config.pick_profile(None, None), "work");
        assert_eq!(
            CliProfilesConfig::default().pick_profile(None, None),
            DEFAULT_PROFILE
        );
    }

    #[test]
    fn validate_rejects_scheme_less_urls() {
        let profile = CliProfile {
            api_base_url: Some("localhost:9001".to_string()),
            ..CliProfile::default()
        };
        assert!(profile.validate().is_err());
        assert!(CliProfile::default().validate().is_ok());
    }

    #[test]
    fn resolve_client_config_precedence() {
        let profile = CliProfile {
            api_base_url: Some("http://profile.example.com".to_string()),
            retries: Some(4),
            retry_wait_ms: Some(100),
        };
        let env = env_from(&[(BASE_URL_ENV, "http://env.example.com"), (RETRIES_ENV, "7")]);

        let from_profile = resolve_client_config(&env, Some(&profile), None).unwrap();
        assert_eq!(from_profile.base_url, "http://profile.example.com");
        assert_eq!(from_profile.retry, RetryPolicy::from_millis(4, 100));

        let from_flag = resolve_client_config(
            &env,
            Some(&profile),
            Some("https://flag.example.com/".to_string()),
        )
        .unwrap();
        assert_eq!(from_flag.base_url, "https://flag.example.com");

        let from_env = resolve_client_config(&env, None, None).unwrap();
        assert_eq!(from_env.base_url, "http://env.example.com");
        assert_eq!(from_env.retry, RetryPolicy::from_millis(7, 20));

        let defaults = resolve_client_config(env_from(&[]), None, None).unwrap();
        assert_eq!(defaults, ClientConfig::default());

        assert!(resolve_client_config(env_from(&[]), None, Some("nope".to_string())).is_err());
    }

    #[test]
    fn overridden_environment_values_are_not_validated() {
        let env = env_from(&[(BASE_URL_ENV, "localhost"), (RETRIES_ENV, "many")]);
        let profile = CliProfile {
            retries: Some(2),
            ..CliProfile::default()
        };

        let config = resolve_client_config(
            &env,
            Some(&profile),
            Some("http://flag.example.com".to_string()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://flag.example.com");
        assert_eq!(config.retry.retries, 2);

        assert!(resolve_client_config(&env, Some(&profile), None).is_err());
    }
}
