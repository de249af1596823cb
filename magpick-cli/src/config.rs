//! Settings resolution: config file, environment and command-line flags.
//!
//! Priority: CLI flags > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

pub(crate) const ENV_DB: &str = "MAGPICK_DB";
pub(crate) const ENV_SUBTITLE_ONLY: &str = "MAGPICK_SUBTITLE_ONLY";

const DEFAULT_OUTPUT: &str = "result";

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueSource {
    CommandLine,
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigFile {
    select: Option<SelectConfig>,
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct SelectConfig {
    subtitle_only: Option<bool>,
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseConfig {
    path: Option<PathBuf>,
}

impl ConfigFile {
    pub(crate) fn parse(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::config(format!("Invalid config file: {}", e)))
    }
}

/// Values given on the command line, if any.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub db: Option<PathBuf>,
    pub chn: Option<u8>,
    pub output: Option<PathBuf>,
}

/// Effective settings with the provenance of each field.
#[derive(Debug)]
pub(crate) struct Settings {
    pub db_path: PathBuf,
    pub db_source: ValueSource,
    pub subtitle_only: bool,
    pub subtitle_only_source: ValueSource,
    pub output: PathBuf,
    pub output_source: ValueSource,
}

impl Settings {
    /// Load settings from the config file and process environment.
    pub(crate) fn load(overrides: Overrides) -> Result<Self, CliError> {
        let file = load_config_file()?;
        Self::resolve(file.as_ref(), |var| std::env::var(var).ok(), overrides)
    }

    /// Combine the layers. `env` looks up an environment variable.
    pub(crate) fn resolve(
        file: Option<&ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self, CliError> {
        let select = file.and_then(|f| f.select.as_ref());
        let database = file.and_then(|f| f.database.as_ref());

        let (db_path, db_source) = if let Some(path) = overrides.db {
            (path, ValueSource::CommandLine)
        } else if let Some(path) = env(ENV_DB).filter(|v| !v.is_empty()) {
            (PathBuf::from(path), ValueSource::EnvVar(ENV_DB))
        } else if let Some(path) = database.and_then(|d| d.path.clone()) {
            (path, ValueSource::ConfigFile)
        } else {
            (default_db_path()?, ValueSource::Default)
        };

        let (subtitle_only, subtitle_only_source) = if let Some(chn) = overrides.chn {
            (chn == 1, ValueSource::CommandLine)
        } else if let Some(value) = env(ENV_SUBTITLE_ONLY).filter(|v| !v.is_empty()) {
            (parse_flag(ENV_SUBTITLE_ONLY, &value)?, ValueSource::EnvVar(ENV_SUBTITLE_ONLY))
        } else if let Some(flag) = select.and_then(|s| s.subtitle_only) {
            (flag, ValueSource::ConfigFile)
        } else {
            (true, ValueSource::Default)
        };

        let (output, output_source) = if let Some(path) = overrides.output {
            (path, ValueSource::CommandLine)
        } else if let Some(path) = select.and_then(|s| s.output.clone()) {
            (path, ValueSource::ConfigFile)
        } else {
            (PathBuf::from(DEFAULT_OUTPUT), ValueSource::Default)
        };

        Ok(Self {
            db_path,
            db_source,
            subtitle_only,
            subtitle_only_source,
            output: with_txt_extension(&output),
            output_source,
        })
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CliError::config(format!(
            "${} must be 0 or 1, got '{}'",
            var, other
        ))),
    }
}

/// Append `.txt` when the path has no extension.
pub(crate) fn with_txt_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("txt")
    }
}

/// Return the path to the config file.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("magpick").join("config.toml"))
}

/// Default location of the record database.
pub(crate) fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|d| d.join("magpick").join("records.db"))
        .ok_or_else(|| CliError::config("Could not determine data directory; pass --db"))
}

fn load_config_file() -> Result<Option<ConfigFile>, CliError> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            log::debug!("Loaded config from {}", path.display());
            ConfigFile::parse(&text).map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CliError::config(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn db_overrides() -> Overrides {
        Overrides {
            db: Some(PathBuf::from("cli.db")),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_subtitle_only_and_result_txt() {
        let settings = Settings::resolve(None, no_env, db_overrides()).unwrap();
        assert!(settings.subtitle_only);
        assert_eq!(settings.subtitle_only_source, ValueSource::Default);
        assert_eq!(settings.output, PathBuf::from("result.txt"));
        assert_eq!(settings.db_path, PathBuf::from("cli.db"));
        assert_eq!(settings.db_source, ValueSource::CommandLine);
    }

    #[test]
    fn config_file_values_apply() {
        let file = ConfigFile::parse(
            r#"
            [select]
            subtitle_only = false
            output = "picks.list"

            [database]
            path = "/tmp/file.db"
            "#,
        )
        .unwrap();
        let settings = Settings::resolve(Some(&file), no_env, Overrides::default()).unwrap();
        assert!(!settings.subtitle_only);
        assert_eq!(settings.subtitle_only_source, ValueSource::ConfigFile);
        assert_eq!(settings.output, PathBuf::from("picks.list"));
        assert_eq!(settings.db_path, PathBuf::from("/tmp/file.db"));
        assert_eq!(settings.db_source, ValueSource::ConfigFile);
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        let file = ConfigFile::parse("[select]\nsubtitle_only = true\n[database]\npath = \"f.db\"\n")
            .unwrap();
        let env = |var: &str| match var {
            ENV_DB => Some("env.db".to_string()),
            ENV_SUBTITLE_ONLY => Some("0".to_string()),
            _ => None,
        };

        let settings = Settings::resolve(Some(&file), env, Overrides::default()).unwrap();
        assert_eq!(settings.db_path, PathBuf::from("env.db"));
        assert_eq!(settings.db_source, ValueSource::EnvVar(ENV_DB));
        assert!(!settings.subtitle_only);

        let overrides = Overrides {
            db: Some(PathBuf::from("cli.db")),
            chn: Some(1),
            output: Some(PathBuf::from("out")),
        };
        let settings = Settings::resolve(Some(&file), env, overrides).unwrap();
        assert_eq!(settings.db_path, PathBuf::from("cli.db"));
        assert!(settings.subtitle_only);
        assert_eq!(settings.subtitle_only_source, ValueSource::CommandLine);
        assert_eq!(settings.output, PathBuf::from("out.txt"));
    }

    #[test]
    fn bad_env_flag_is_rejected() {
        let env = |var: &str| (var == ENV_SUBTITLE_ONLY).then(|| "maybe".to_string());
        let err = Settings::resolve(None, env, db_overrides()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        assert!(matches!(
            ConfigFile::parse("[select\n"),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn txt_extension_only_when_missing() {
        assert_eq!(with_txt_extension(Path::new("result")), PathBuf::from("result.txt"));
        assert_eq!(with_txt_extension(Path::new("out.log")), PathBuf::from("out.log"));
        assert_eq!(
            with_txt_extension(Path::new("dir/picks")),
            PathBuf::from("dir/picks.txt")
        );
    }
}
