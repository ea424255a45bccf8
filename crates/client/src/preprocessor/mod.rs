// ABOUTME: Per-field value transforms applied to extracted bookmark metadata.
// ABOUTME: PreprocessorRegistry holds at most one transform per bookmark field and passes others through.

pub mod stock;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::model::BookmarkFieldKey;

/// Transforms one bookmark field value.
#[async_trait]
pub trait Preprocessor: Send + Sync {
    async fn process(&self, value: String) -> anyhow::Result<String>;
}

/// Adapter making a synchronous `Fn(String) -> String` awaitable as a [`Preprocessor`].
pub struct SyncPreprocessor<F>(F);

/// Wrap a synchronous transform so it composes with async ones.
pub fn preprocessor<F>(f: F) -> SyncPreprocessor<F>
where
    F: Fn(String) -> String + Send + Sync,
{
    SyncPreprocessor(f)
}

#[async_trait]
impl<F> Preprocessor for SyncPreprocessor<F>
where
    F: Fn(String) -> String + Send + Sync,
{
    async fn process(&self, value: String) -> anyhow::Result<String> {
        Ok((self.0)(value))
    }
}

/// One transform per bookmark field.
#[derive(Clone, Default)]
pub struct PreprocessorRegistry {
    processors: HashMap<BookmarkFieldKey, Arc<dyn Preprocessor>>,
}

impl PreprocessorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` for `field`, replacing any previous one.
    pub fn register<P>(&mut self, field: BookmarkFieldKey, processor: P)
    where
        P: Preprocessor + 'static,
    {
        self.register_arc(field, Arc::new(processor));
    }

    /// Registers an already shared processor.
    pub fn register_arc(&mut self, field: BookmarkFieldKey, processor: Arc<dyn Preprocessor>) {
        self.processors.insert(field, processor);
    }

    /// Returns true if a transform is registered for `field`.
    pub fn contains(&self, field: BookmarkFieldKey) -> bool {
        self.processors.contains_key(&field)
    }

    /// Apply the transform registered for `field`, or return `value` unchanged.
    pub async fn process(&self, field: BookmarkFieldKey, value: String) -> Result<String> {
        match self.processors.get(&field) {
            Some(processor) => processor
                .process(value)
                .await
                .map_err(|e| ClientError::preprocess(field.as_str(), e)),
            None => Ok(value),
        }
    }
}

impl fmt::Debug for PreprocessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.processors.keys().copied().collect();
        fields.sort();
        f.debug_struct("PreprocessorRegistry")
            .field("fields", &fields)
            .finish()
    }
}
