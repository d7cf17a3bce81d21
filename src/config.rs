use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use mergegate_loader::{UrlResolver, DEFAULT_URL_ENV_PREFIX};
use mergegate_schema::{ConflictPolicy, MergeOptions, MergeOrder};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Default, Deserialize, Args)]
pub struct Config {
    /// Path of the config file
    #[clap(long = "config", env = "CONFIG_FILE", default_value = "config.toml")]
    #[serde(skip)]
    pub file: PathBuf,

    #[clap(long, env, default_value = "127.0.0.1:8080")]
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding one `<service>.graphql` file per upstream
    #[clap(long, env, default_value = "schema/remote")]
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Upstream URLs are read from `<prefix><SERVICE>`
    #[clap(long, env, default_value = DEFAULT_URL_ENV_PREFIX)]
    #[serde(default = "default_url_env_prefix")]
    pub url_env_prefix: String,

    #[clap(long, env, value_enum, default_value_t)]
    #[serde(default)]
    pub merge_order: MergeOrderConfig,

    #[clap(long, env, value_enum, default_value_t)]
    #[serde(default)]
    pub conflicts: ConflictPolicyConfig,

    #[clap(skip)]
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Deserialize, Clone, Eq, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize, ValueEnum, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MergeOrderConfig {
    #[default]
    BySource,
    AsGiven,
}

#[derive(Debug, Default, Deserialize, ValueEnum, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicyConfig {
    #[default]
    FirstWins,
    Reject,
}

impl Config {
    /// If the config file exists, it is parsed and the command line and environment
    /// variables are ignored.
    pub fn resolve(self) -> anyhow::Result<Self> {
        if !Path::exists(&self.file) {
            return Ok(self);
        }

        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read config file '{}'.", self.file.display()))?;
        let mut file_config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'.", self.file.display()))?;
        file_config.file = self.file;
        Ok(file_config)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            conflicts: match self.conflicts {
                ConflictPolicyConfig::FirstWins => ConflictPolicy::FirstWins,
                ConflictPolicyConfig::Reject => ConflictPolicy::Reject,
            },
            order: match self.merge_order {
                MergeOrderConfig::BySource => MergeOrder::BySource,
                MergeOrderConfig::AsGiven => MergeOrder::AsGiven,
            },
        }
    }

    #[instrument(ret, level = "trace")]
    pub fn url_resolver(&self) -> UrlResolver {
        self.services
            .iter()
            .fold(UrlResolver::new(&self.url_env_prefix), |resolver, service| {
                resolver.with_override(&service.name, &service.url)
            })
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schema/remote")
}

fn default_url_env_prefix() -> String {
    DEFAULT_URL_ENV_PREFIX.to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn without_file() -> Config {
        Config {
            file: PathBuf::from("does_not_exist.toml"),
            bind: default_bind(),
            schema_dir: default_schema_dir(),
            url_env_prefix: default_url_env_prefix(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_config_file_keeps_flags() {
        let config = without_file().resolve().expect("Failed to resolve config");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.schema_dir, PathBuf::from("schema/remote"));
        assert_eq!(config.merge_options(), MergeOptions::default());
    }

    #[test]
    fn parse_config_file() {
        let mut tmpfile = NamedTempFile::with_prefix("mergegate").expect("Failed to create temp config");
        write!(
            tmpfile,
            r#"
        bind = "0.0.0.0:4000"
        schema_dir = "schemas"
        conflicts = "reject"
        merge_order = "as-given"
        [[services]]
        name = "users"
        url = "http://users:4000/graphql"
        "#
        )
        .expect("Failed to write temp config");

        let config = Config {
            file: tmpfile.path().to_path_buf(),
            ..without_file()
        }
        .resolve()
        .expect("Failed to parse config");

        assert_eq!(config.bind, "0.0.0.0:4000");
        assert_eq!(config.schema_dir, PathBuf::from("schemas"));
        assert_eq!(config.url_env_prefix, "INTERNAL_API_URL_");
        assert_eq!(config.merge_options(), MergeOptions {
            conflicts: ConflictPolicy::Reject,
            order: MergeOrder::AsGiven,
        });
        assert_eq!(config.services, vec![ServiceConfig {
            name: "users".to_string(),
            url: "http://users:4000/graphql".to_string(),
        }]);
        assert_eq!(
            config.url_resolver().resolve("users").expect("Failed to resolve url"),
            "http://users:4000/graphql"
        );
    }

    #[test]
    fn invalid_config_file_is_reported() {
        let mut tmpfile = NamedTempFile::with_prefix("mergegate").expect("Failed to create temp config");
        write!(tmpfile, r#"conflicts = "sometimes""#).expect("Failed to write temp config");

        let err = Config {
            file: tmpfile.path().to_path_buf(),
            ..without_file()
        }
        .resolve()
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
