use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{warn, ListingFormat};

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("failed to read config \"{0}\": {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to reserialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub(crate) struct Config {
    /// The catalog file. Relative paths are resolved against the directory
    /// containing the config file.
    pub catalog: Option<PathBuf>,
    /// The default output format for listings
    pub format: Option<ListingFormat>,
}

fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/modelcat/config.toml", ".modelcat.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/modelcat.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

fn extra_fields_helper<'a>(
    path: &mut Vec<&'a str>,
    user_config: &'a toml::Table,
    config: &'a toml::Table,
    extra: &mut Vec<String>,
) {
    for (user_key, user_value) in user_config {
        path.push(user_key);

        match (user_value, config.get(user_key)) {
            (toml::Value::Table(user_value), Some(toml::Value::Table(config_value))) => {
                extra_fields_helper(path, user_value, config_value, extra)
            }
            (_, Some(_)) => {}
            (_, None) => extra.push(path.join(".")),
        }

        path.pop();
    }
}

/// Returns the dotted paths of keys the user specified which are not part of
/// the configuration.
fn extra_fields(config: &Config, raw_config: &str) -> Result<Vec<String>, Error> {
    let user_config: toml::Table = toml::de::from_str(raw_config)?;

    let config: toml::Table = {
        let serialized_config = toml::ser::to_string(config)?;

        toml::de::from_str(&serialized_config)?
    };

    let mut path = Vec::new();
    let mut extra = Vec::new();

    extra_fields_helper(&mut path, &user_config, &config, &mut extra);

    Ok(extra)
}

fn parse_config(raw_config: &str, config_dir: Option<&Path>) -> Result<Config, Error> {
    let mut config: Config = toml::de::from_str(raw_config)?;

    for key in extra_fields(&config, raw_config)? {
        warn!("config contains extraneous key \"{}\", ignoring", key);
    }

    if let (Some(catalog), Some(dir)) = (&config.catalog, config_dir) {
        if catalog.is_relative() {
            config.catalog = Some(dir.join(catalog));
        }
    }

    Ok(config)
}

pub(crate) fn read_config(config: Option<PathBuf>) -> Result<Config, Error> {
    let config_path = config.or_else(get_config_path);

    match config_path {
        Some(path) => {
            let raw_config =
                std::fs::read_to_string(&path).map_err(|e| Error::Read(path.clone(), e))?;

            parse_config(&raw_config, path.parent())
        }
        None => Ok(Config::default()),
    }
}
