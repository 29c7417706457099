//! Score Coordinator - drives the full request flow.
//!
//! Load memory (remote state preferred, local fallback) → run the scoring
//! pipeline or the chat buffer → persist best-effort to both stores →
//! return the summary. The pure computation lives in `pulse_core`; this is
//! the only module that touches I/O.
//!
//! Consistency: concurrent requests for the same user key resolve
//! last-write-wins on `ChatState` and history. That tradeoff is deliberate;
//! a deployment needing stronger guarantees should serialize per-user
//! requests or add optimistic-concurrency tokens upstream.

use anyhow::Result;
use chrono::Utc;
use pulse_core::chat::{join_messages, ChatOutcome};
use pulse_core::summary::{score_and_record, summary_from_scores};
use pulse_core::{PulseConfig, Summary, UserMemory};

use crate::remote::RemoteStore;
use crate::store::{FileStore, MemoryStore};

/// Outcome of feeding one chat message through the buffer.
#[derive(Debug, Clone)]
pub enum ChatResponse {
    /// Message buffered; scoring deferred.
    Queued { count: u32, threshold: u32 },
    /// Threshold reached; the buffered batch was scored.
    Scored(Box<Summary>),
}

pub struct ScoreCoordinator {
    config: PulseConfig,
    local: FileStore,
    remote: Option<RemoteStore>,
}

impl ScoreCoordinator {
    pub fn new(config: PulseConfig) -> Self {
        let local = FileStore::new(&config.storage.dir);
        let remote = config.remote.as_ref().and_then(|rc| {
            match RemoteStore::new(rc) {
                Ok(store) => Some(store),
                Err(e) => {
                    tracing::warn!("Remote store disabled: {}", e);
                    None
                }
            }
        });
        Self {
            config,
            local,
            remote,
        }
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Score a list of free-text answers joined into one message.
    pub async fn submit_answers(
        &self,
        user: &str,
        nickname: Option<&str>,
        answers: &[String],
    ) -> Result<Summary> {
        let message = join_messages(answers.iter().map(String::as_str));
        self.score_message(user, nickname, &message).await
    }

    /// Feed one chat message into the user's buffer. Returns a queued
    /// acknowledgment until the randomized threshold is reached, then a
    /// full summary computed over the joined buffer.
    pub async fn submit_chat(
        &self,
        user: &str,
        nickname: Option<&str>,
        message: &str,
    ) -> Result<ChatResponse> {
        let trimmed = message.trim();
        anyhow::ensure!(!trimmed.is_empty(), "chat message must not be empty");

        let mut memory = self.load_memory(user).await;
        memory.apply_nickname(nickname);

        let mut state = memory.chat_state.take().unwrap_or_default();
        let outcome = state.absorb(
            trimmed,
            self.config.engine.threshold_range(),
            &mut rand::thread_rng(),
        );
        memory.chat_state = Some(state);

        match outcome {
            ChatOutcome::Queued { count, threshold } => {
                self.persist_state(user, &memory).await;
                Ok(ChatResponse::Queued { count, threshold })
            }
            ChatOutcome::Flush { combined } => {
                let summary =
                    score_and_record(&mut memory, &combined, nickname, Utc::now(), &self.config.engine);
                self.persist_scored(user, &memory, &summary).await;
                Ok(ChatResponse::Scored(Box::new(summary)))
            }
        }
    }

    /// Latest summary for a user: remote first when configured, then local
    /// history recomputation. `None` when the user has no history anywhere.
    pub async fn latest_summary(&self, user: &str) -> Result<Option<Summary>> {
        if let Some(remote) = &self.remote {
            match remote.fetch_latest_summary(user, &self.config.engine).await {
                Ok(Some(summary)) => return Ok(Some(summary)),
                Ok(None) => {}
                Err(e) => tracing::warn!("Remote summary read failed for {}: {}", user, e),
            }
        }

        let memory = match self.local.load(user).await {
            Ok(memory) => memory,
            Err(e) => {
                tracing::warn!("Local memory read failed for {}: {}", user, e);
                return Ok(None);
            }
        };
        let last = match memory.history.last() {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let recent = memory.recent_scores(self.config.engine.rolling_window);
        Ok(Some(summary_from_scores(
            user,
            memory.nickname.clone(),
            Some(last.tone),
            last.qscore,
            &recent,
            &self.config.engine,
        )))
    }

    async fn score_message(
        &self,
        user: &str,
        nickname: Option<&str>,
        message: &str,
    ) -> Result<Summary> {
        let mut memory = self.load_memory(user).await;
        let summary = score_and_record(&mut memory, message, nickname, Utc::now(), &self.config.engine);
        self.persist_scored(user, &memory, &summary).await;
        Ok(summary)
    }

    /// Remote state blob wins when present; otherwise the local document.
    /// A fresh memory on total miss.
    async fn load_memory(&self, user: &str) -> UserMemory {
        if let Some(remote) = &self.remote {
            match remote.fetch_state_memory(user).await {
                Ok(Some(memory)) => return memory,
                Ok(None) => {}
                Err(e) => tracing::warn!("Remote memory read failed for {}: {}", user, e),
            }
        }
        match self.local.load(user).await {
            Ok(memory) => memory,
            Err(e) => {
                tracing::warn!("Local memory read failed for {}: {}", user, e);
                UserMemory::new(user)
            }
        }
    }

    /// Persist after a scoring pass: local document plus remote history row
    /// and state upsert. Every write is best-effort.
    async fn persist_scored(&self, user: &str, memory: &UserMemory, summary: &Summary) {
        if let Err(e) = self.local.save(user, memory).await {
            tracing::warn!("Local save failed for {}: {}", user, e);
        }
        let Some(remote) = &self.remote else {
            return;
        };
        if let Some(entry) = memory.history.last() {
            if let Err(e) = remote
                .insert_history(
                    user,
                    entry.ts,
                    &entry.message,
                    entry.qscore,
                    entry.tone,
                    memory.nickname.as_deref(),
                )
                .await
            {
                tracing::warn!("Remote history insert failed for {}: {}", user, e);
            }
        }
        if let Err(e) = remote.upsert_state(user, memory, Some(summary)).await {
            tracing::warn!("Remote state upsert failed for {}: {}", user, e);
        }
    }

    /// Persist a buffering-only update. The remote state row keeps its
    /// previously cached summary so readers don't lose it mid-buffer.
    async fn persist_state(&self, user: &str, memory: &UserMemory) {
        if let Err(e) = self.local.save(user, memory).await {
            tracing::warn!("Local save failed for {}: {}", user, e);
        }
        let Some(remote) = &self.remote else {
            return;
        };
        let cached = match remote.fetch_latest_summary(user, &self.config.engine).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Remote summary read failed for {}: {}", user, e);
                None
            }
        };
        if let Err(e) = remote.upsert_state(user, memory, cached.as_ref()).await {
            tracing::warn!("Remote state upsert failed for {}: {}", user, e);
        }
    }
}
