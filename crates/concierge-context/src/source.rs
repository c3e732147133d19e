//! Data sources for data-backed context formatters.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ContextError, ContextResult};

/// Fetches the data a formatter renders.
///
/// `Ok(None)` means "no data right now" and is reported as
/// [`ContextError::MissingData`] by the manager.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> ContextResult<Option<Value>>;
}

/// A fixed value, e.g. data already held by the caller.
#[derive(Debug, Clone)]
pub struct StaticSource {
    value: Value,
}

impl StaticSource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self) -> ContextResult<Option<Value>> {
        Ok((!self.value.is_null()).then(|| self.value.clone()))
    }
}

/// A JSON file, re-read on every fetch so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch(&self) -> ContextResult<Option<Value>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ContextError::Io {
                path: self.path.clone(),
                source,
            })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ContextError::Json {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "data file loaded");
        Ok((!value.is_null()).then_some(value))
    }
}
