use crate::traits::{ChatClient, ChatRequest, ChatResponse};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Chat client that replays a fixed script of replies
///
/// Each call pops the next entry; `Err` entries surface as failed calls.
/// Every received request is recorded for inspection. Once the script is
/// exhausted further calls fail.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<std::result::Result<ChatResponse, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, response: ChatResponse) -> Self {
        self.lock_replies().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: impl Into<String>) -> Self {
        self.lock_replies().push_back(Err(error.into()));
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.lock_replies().len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<ChatResponse, String>>> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        match self.lock_replies().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => anyhow::bail!("Scripted client has no replies left"),
        }
    }
}
