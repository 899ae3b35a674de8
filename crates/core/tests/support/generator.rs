//! Scripted generative collaborator

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use daybook_core::forecast::TextGenerator;
use daybook_domain::{DaybookError, Result as DomainResult};

#[derive(Default)]
struct Inner {
    replies: VecDeque<DomainResult<String>>,
    prompts: Vec<String>,
}

/// Returns queued replies in order and records every prompt.
#[derive(Default, Clone)]
pub struct ScriptedGenerator {
    inner: Arc<Mutex<Inner>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.inner.lock().unwrap().replies.push_back(Ok(reply.into()));
        self
    }

    pub fn with_error(self, error: DaybookError) -> Self {
        self.inner.lock().unwrap().replies.push_back(Err(error));
        self
    }

    /// Sleep before answering so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().prompts.len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner.lock().unwrap().prompts.clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.prompts.push(prompt.to_string());
            inner.replies.pop_front()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply.unwrap_or_else(|| Err(DaybookError::Generation("no scripted reply left".into())))
    }
}
