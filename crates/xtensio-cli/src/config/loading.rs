use crate::config::{CONFIG_FILE, XtensioConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
    value::Uncased,
};
use std::path::{Path, PathBuf};
use xtensio_config::BuildMode;

/// Prefix of environment overrides (`XTENSIO_OUT_DIR`, `XTENSIO_CONVENTIONS__CONTENTS_DIR`).
pub const ENV_PREFIX: &str = "XTENSIO_";

/// Values set on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<BuildMode>,
    pub out_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub package: Option<bool>,
}

impl XtensioConfig {
    /// Load configuration for the project at `root`.
    ///
    /// `config_path` must exist when given; otherwise `xtensio.config.json`
    /// in `root` is used if present.
    pub fn load(root: &Path, config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let config = Self::figment(root, config_path, overrides)?
            .extract::<Self>()
            .map_err(|e| ConfigError::LoadFailed { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn figment(root: &Path, config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Some(path.to_path_buf())
            }
            None => {
                let default_path = root.join(CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };
        if let Some(path) = config_file {
            tracing::debug!("loading configuration from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // Keys are mapped case-sensitively so camelCase survives.
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| Uncased::from(env_key(key.as_str())))
                .lowercase(false),
        );

        if let Some(mode) = overrides.mode {
            figment = figment.merge(Serialized::default("mode", mode));
        }
        if let Some(out_dir) = &overrides.out_dir {
            figment = figment.merge(Serialized::default("outDir", out_dir));
        }
        if let Some(concurrency) = overrides.concurrency {
            figment = figment.merge(Serialized::default("concurrency", concurrency));
        }
        if let Some(package) = overrides.package {
            figment = figment.merge(Serialized::default("package", package));
        }

        Ok(figment)
    }
}

/// Map a prefix-stripped environment key to a config key path.
///
/// `__` separates nesting levels and each level is converted from
/// snake_case to camelCase: `conventions__contents_dir` becomes
/// `conventions.contentsDir`.
pub fn env_key(key: &str) -> String {
    key.split("__")
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper = false;
            for c in segment.chars() {
                if c == '_' {
                    upper = !out.is_empty();
                } else if upper {
                    out.extend(c.to_uppercase());
                    upper = false;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}
