use std::collections::HashMap;

use mergegate_schema::SchemaDocument;

use crate::LoadError;

pub const DEFAULT_URL_ENV_PREFIX: &str = "INTERNAL_API_URL_";

/// A parsed schema together with the upstream serving it.
#[derive(Debug, Clone)]
pub struct RemoteSchema {
    /// Service name, the schema file stem.
    pub name: String,
    pub url: String,
    pub document: SchemaDocument,
}

/// Finds the upstream URL of a service.
///
/// Explicit overrides come first, then the environment variable `<prefix><NAME>`.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    prefix: String,
    overrides: HashMap<String, String>,
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_URL_ENV_PREFIX)
    }
}

impl UrlResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, service: impl Into<String>, url: impl Into<String>) -> Self {
        self.overrides.insert(service.into(), url.into());
        self
    }

    /// `users` -> `INTERNAL_API_URL_USERS`
    pub fn env_var(&self, service: &str) -> String {
        format!("{}{}", self.prefix, service.to_ascii_uppercase())
    }

    pub fn resolve(&self, service: &str) -> Result<String, LoadError> {
        if let Some(url) = self.overrides.get(service) {
            return Ok(url.clone());
        }

        let var = self.env_var(service);
        std::env::var(&var).map_err(|_| LoadError::MissingUrl {
            service: service.to_string(),
            var,
        })
    }
}
