use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::schema::Config;

/// Prefix for environment variable overrides, e.g. `SHELF_STORE__VERIFY=always`.
pub const ENV_PREFIX: &str = "SHELF_";
/// File stem searched for in the user configuration directory.
const FILE_STEM: &str = "config";
/// User configuration files, merged in this order when present.
const USER_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];
/// Top-level configuration sections. Other variables sharing the prefix are
/// ignored rather than rejected as unknown fields.
const SECTIONS: [&str; 2] = ["store", "log"];

/// Layered configuration loader.
///
/// Layers, later ones overriding earlier ones:
///
/// 1. built-in defaults,
/// 2. `config.toml`, `config.yaml` / `config.yml`, `config.json` in the user
///    configuration directory (platform specific, via `directories`),
/// 3. an explicit file chosen by the caller (format from its extension,
///    TOML when unknown),
/// 4. environment variables with the [`ENV_PREFIX`], nested keys separated
///    by `__`.
///
/// ```no_run
/// use shelf_config::Loader;
///
/// let config = Loader::new().with_file("shelf.toml").load().unwrap();
/// let store = config.store.build();
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    user_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        let user_dir = ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().to_path_buf());
        if user_dir.is_none() {
            tracing::warn!("no home directory found; skipping user configuration");
        }
        Self { user_dir, file: None, env_prefix: Some(ENV_PREFIX.to_string()) }
    }

    /// Look for the user configuration in `dir` instead of the platform default.
    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    pub fn without_user_config(mut self) -> Self {
        self.user_dir = None;
        self
    }

    /// Merge an explicit configuration file, which must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dir) = &self.user_dir {
            for extension in USER_EXTENSIONS {
                let path = dir.join(format!("{FILE_STEM}.{extension}"));
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "merging user configuration");
                    figment = merge_by_extension(figment, &path);
                }
            }
        }
        if let Some(path) = &self.file {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.clone()));
            }
            figment = merge_by_extension(figment, path);
        }
        if let Some(prefix) = &self.env_prefix {
            figment = figment.merge(Env::prefixed(prefix).filter(|key| is_known_key(key.as_str())).split("__"));
        }
        Ok(figment)
    }

    #[instrument(level = "debug", skip(self), fields(file = ?self.file, user_dir = ?self.user_dir))]
    pub fn load(&self) -> Result<Config> {
        let config: Config = self.figment()?.extract().or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(verify = %config.store.verify, log_format = %config.log.format, "configuration loaded");
        Ok(config)
    }
}

/// Returns `true` if an environment key (prefix already stripped) addresses
/// a field inside one of the known sections, e.g. `STORE__VERIFY`.
fn is_known_key(key: &str) -> bool {
    let Some((section, field)) = key.split_once("__") else {
        return false;
    };
    !field.is_empty() && SECTIONS.iter().any(|known| section.eq_ignore_ascii_case(known))
}

fn merge_by_extension(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => figment.merge(Toml::file_exact(path)),
    }
}
