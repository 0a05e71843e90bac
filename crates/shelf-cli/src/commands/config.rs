use shelf_core::ClientConfig;

use crate::cli::ConfigCommands;
use crate::config_profiles::{
    default_config_path, normalize_text_option, resolve_client_config, CliProfilesConfig,
};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            retries,
            retry_wait_ms,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_base_url,
            retries,
            retry_wait_ms,
            no_activate,
        ),
        ConfigCommands::Show { profile } => run_config_show(profile.as_deref().or(global_profile)),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    retries: Option<u32>,
    retry_wait_ms: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_profile_update(
        &mut config,
        &profile_name,
        api_base_url,
        retries,
        retry_wait_ms,
        no_activate,
    )?;

    let path = config.save()?;
    println!("Saved profile '{profile_name}' to {}", path.display());
    if no_activate {
        println!("Active profile unchanged.");
    } else {
        println!("Active profile: {profile_name}");
    }
    Ok(())
}

/// Merge explicit values into a profile, keeping anything not given.
pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    api_base_url: Option<String>,
    retries: Option<u32>,
    retry_wait_ms: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut profile = config.profile(profile_name).cloned().unwrap_or_default();
    if let Some(url) = normalize_text_option(api_base_url) {
        profile.api_base_url = Some(url);
    }
    if retries.is_some() {
        profile.retries = retries;
    }
    if retry_wait_ms.is_some() {
        profile.retry_wait_ms = retry_wait_ms;
    }
    profile.validate().map_err(CliError::Config)?;

    *config.profile_mut_or_default(profile_name) = profile;
    if !no_activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    let resolved = resolve_client_config(
        |key| std::env::var(key).ok(),
        config.profile(&profile_name),
        None,
    )?;

    let path = default_config_path()?;
    println!("Config file: {}", path.display());
    println!("Profile: {profile_name}");
    for line in describe_client_config(&resolved) {
        println!("{line}");
    }
    Ok(())
}

pub fn describe_client_config(config: &ClientConfig) -> Vec<String> {
    vec![
        format!("Base URL: {}", config.base_url),
        format!("Retries: {}", config.retry.retries),
        format!("Retry wait: {}ms", config.retry.wait.as_millis()),
    ]
}
