#![forbid(unsafe_code)]

pub use error::LoadError;
pub use loader::load_dir;
pub use remote_schema::{RemoteSchema, UrlResolver, DEFAULT_URL_ENV_PREFIX};

mod error;
mod loader;
mod remote_schema;
