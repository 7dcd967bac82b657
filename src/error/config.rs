use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read suite '{path}': {source}")]
    ReadSuite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML suite '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse TOML suite '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON suite '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported suite extension '{ext}'. Use .yaml, .yml, .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Suite file must have a .yaml, .yml, .toml or .json extension.")]
    MissingExtension,
    #[error("Suite '{path}' has no test cases.")]
    EmptySuite { path: PathBuf },
    #[error("Test case #{index} has no name.")]
    EmptyCaseName { index: usize },
    #[error("Test case name '{name}' is used more than once.")]
    DuplicateCaseName { name: String },
    #[error("Test case '{name}' has no api.")]
    MissingApi { name: String },
}
