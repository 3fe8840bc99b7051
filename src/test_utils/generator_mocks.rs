//! Scripted stand-in for the text-generation service.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::text_generator::TextGenerator,
};

/// Returns canned responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedTextGenerator {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail_at: Option<usize>,
    delay: Option<Duration>,
}

impl ScriptedTextGenerator {
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Fail the call with zero-based index `call` (the prompt is still recorded).
    pub fn failing_at<I, S>(call: usize, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_at: Some(call),
            ..Self::with_responses(responses)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far (for test assertions).
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        if self.fail_at == Some(call) {
            return Err(AppError::GenerationFailed("scripted failure".into()));
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::GenerationFailed("script exhausted".into()))
    }
}

/// Never runs out: call `n` returns `"generated-{n}"`.
#[derive(Default)]
pub struct CannedTextGenerator {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl TextGenerator for CannedTextGenerator {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        let n = self
            .calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(format!("generated-{n}"))
    }
}
