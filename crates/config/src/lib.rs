//! Layered configuration for reel.
//!
//! Sources are merged in increasing order of precedence:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. The first of `reel.toml`, `reel.yaml` or `reel.json` found in the
//!    platform configuration directory.
//! 3. A file passed explicitly (`--config`).
//! 4. `REEL_` prefixed environment variables, with `__` separating nested
//!    keys (`REEL_ASSIGN_LOADS=false`, `REEL_EXTENSIONS=[mp4,mkv]`).
//!
//! Command line flags are applied by the binary on top of the result.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_STEM: &str = "reel";
const ENV_PREFIX: &str = "REEL_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the JSON library document used in place of a live host.
    pub library: PathBuf,
    /// Display name of the library, used in logs.
    pub library_name: String,
    /// File extensions treated as video, without the leading dot.
    pub extensions: Vec<String>,
    /// Import the matching root-level load video into each `L<n>` bin.
    pub assign_loads: bool,
}
impl Default for Config {
    fn default() -> Self {
        let library = match project_dirs() {
            Some(dirs) => dirs.data_dir().join("library.json"),
            None => PathBuf::from("library.json"),
        };
        Self {
            library,
            library_name: "Resolve".to_string(),
            extensions: ["mp4", "mov", "mxf", "avi"].map(String::from).to_vec(),
            assign_loads: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", CONFIG_STEM)
}

impl Config {
    /// Load from the platform configuration directory, `explicit` and the
    /// environment, then normalise and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let dirs = project_dirs();
        Self::load_from(dirs.as_ref().map(ProjectDirs::config_dir), explicit)
    }

    /// Like [`Config::load`], searching `config_dir` instead of the platform
    /// configuration directory.
    pub fn load_from(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut config: Self = Self::figment(config_dir, explicit)?.extract().or_raise(|| ErrorKind::Load)?;
        config.normalise();
        config.validate()?;
        Ok(config)
    }

    fn figment(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(dir) = config_dir {
            let found = ["toml", "yaml", "json"]
                .iter()
                .map(|ext| dir.join(format!("{CONFIG_STEM}.{ext}")))
                .find(|path| path.is_file());
            if let Some(path) = found {
                tracing::debug!(path = %path.display(), "Using configuration file");
                figment = merge_file(figment, &path)?;
            }
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::Invalid(format!("config file not found: {}", path.display())));
            }
            figment = merge_file(figment, path)?;
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Strip leading dots from and lowercase every extension.
    pub fn normalise(&mut self) {
        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            exn::bail!(ErrorKind::Invalid("at least one video extension is required".to_string()));
        }
        for ext in &self.extensions {
            if ext.is_empty() {
                exn::bail!(ErrorKind::Invalid("video extensions must not be blank".to_string()));
            }
            if ext.contains(['/', '\\']) {
                exn::bail!(ErrorKind::Invalid(format!("video extension contains a path separator: {ext}")));
            }
        }
        if self.library.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("library path must not be empty".to_string()));
        }
        Ok(())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let merged = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::Invalid(format!("unsupported config format: {}", path.display()))),
    };
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn load_in(jail: &Jail, explicit: Option<&str>) -> Result<Config> {
        let explicit = explicit.map(|name| jail.directory().join(name));
        Config::load_from(Some(jail.directory()), explicit.as_deref())
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let config = load_in(jail, None).unwrap();
            assert_eq!(config.library_name, "Resolve");
            assert_eq!(config.extensions, ["mp4", "mov", "mxf", "avi"]);
            assert!(config.assign_loads);
            assert!(config.library.ends_with("library.json"));
            Ok(())
        });
    }

    #[test]
    fn test_config_dir_file() {
        Jail::expect_with(|jail| {
            jail.create_file("reel.toml", "library_name = \"Edit Suite\"\nextensions = [\".MKV\", \"mp4\"]\n")?;
            let config = load_in(jail, None).unwrap();
            assert_eq!(config.library_name, "Edit Suite");
            assert_eq!(config.extensions, ["mkv", "mp4"]);
            Ok(())
        });
    }

    #[test]
    fn test_toml_preferred_over_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("reel.toml", "library_name = \"toml\"")?;
            jail.create_file("reel.yaml", "library_name: yaml")?;
            assert_eq!(load_in(jail, None).unwrap().library_name, "toml");
            Ok(())
        });
    }

    #[test]
    fn test_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file("reel.yaml", "library_name: dir\nassign_loads: false\n")?;
            jail.create_file("custom.json", r#"{"library_name": "explicit", "library": "/srv/lib.json"}"#)?;
            jail.set_env("REEL_LIBRARY_NAME", "env");
            let config = load_in(jail, Some("custom.json")).unwrap();
            assert_eq!(config.library_name, "env");
            assert_eq!(config.library, PathBuf::from("/srv/lib.json"));
            assert!(!config.assign_loads);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        Jail::expect_with(|jail| {
            let err = load_in(jail, Some("nope.toml")).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("reel.toml", "assign_loads = \"sometimes\"")?;
            let err = load_in(jail, None).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["mp4".to_string(), "".to_string()])]
    #[case(vec!["mp4/x".to_string()])]
    #[case(vec!["a\\b".to_string()])]
    fn test_invalid_extensions(#[case] extensions: Vec<String>) {
        let config = Config {
            extensions,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_normalise() {
        let mut config = Config {
            extensions: vec![".MP4".to_string(), " Mov ".to_string()],
            ..Config::default()
        };
        config.normalise();
        assert_eq!(config.extensions, ["mp4", "mov"]);
    }
}
