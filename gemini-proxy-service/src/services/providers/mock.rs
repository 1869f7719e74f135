//! Mock provider for testing.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Test double: replies with a canned result and records how it was called.
pub struct MockTextProvider {
    reply: Result<String, ProviderError>,
    calls: AtomicUsize,
    last_params: Mutex<Option<GenerationParams>>,
}

impl MockTextProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    /// Number of times `generate` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Parameters of the most recent `generate` call, if any.
    pub fn last_params(&self) -> Option<GenerationParams> {
        self.last_params.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        _prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().expect("lock poisoned") = Some(params.clone());
        self.reply.clone()
    }
}
