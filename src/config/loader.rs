use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError};
use crate::suite::Suite;

/// Loads a suite from `path`, picking the format by extension.
///
/// Relative `bodyFromFile` paths are resolved against the suite's directory
/// and an unnamed suite takes the file stem as its name.
///
/// # Errors
///
/// Returns an error when the file cannot be read, parsed or validated.
pub fn load_suite(path: &Path) -> AppResult<Suite> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadSuite {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let mut suite = parse_suite(path, &content)?;

    if suite.name.is_empty() {
        suite.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    if let Some(base) = path.parent() {
        let files = suite
            .items
            .iter_mut()
            .filter_map(|case| case.request.body_from_file.as_mut());
        for file in files.filter(|file| file.is_relative()) {
            *file = base.join(&*file);
        }
    }

    validate_suite(path, &suite)?;
    Ok(suite)
}

/// Decodes `content` in the format named by `path`'s extension.
///
/// # Errors
///
/// Returns an error for an unknown extension or malformed content.
pub fn parse_suite(path: &Path, content: &str) -> AppResult<Suite> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(content).map_err(|err| {
            AppError::config(ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("toml") => toml::from_str(content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}

fn validate_suite(path: &Path, suite: &Suite) -> AppResult<()> {
    if suite.items.is_empty() {
        return Err(AppError::config(ConfigError::EmptySuite {
            path: path.to_path_buf(),
        }));
    }
    let mut names = BTreeSet::new();
    for (index, case) in suite.items.iter().enumerate() {
        if case.name.trim().is_empty() {
            return Err(AppError::config(ConfigError::EmptyCaseName { index }));
        }
        if !names.insert(case.name.as_str()) {
            return Err(AppError::config(ConfigError::DuplicateCaseName {
                name: case.name.clone(),
            }));
        }
        if case.request.api.trim().is_empty() {
            return Err(AppError::config(ConfigError::MissingApi {
                name: case.name.clone(),
            }));
        }
    }
    Ok(())
}
