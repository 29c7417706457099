//! Optional remote row store over a PostgREST-style API.
//!
//! Two tables are expected:
//!   `qscore_history(user, ts, message, qscore, tone, nickname)`
//!   `qscore_state(user primary key, memory, last_summary, updated_at)`
//!
//! Every call is best-effort with a bounded timeout: callers log failures
//! and continue, so an unreachable remote degrades to local persistence
//! without surfacing to the request.

use chrono::{DateTime, Utc};
use pulse_core::{summary::summary_from_scores, EngineConfig, Summary, ToneCategory, UserMemory};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Remote persistence failure taxonomy. Never fatal to a request; the
/// coordinator logs these at `warn` and moves on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote store unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("remote store returned status {0}")]
    Status(StatusCode),
    #[error("remote row schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),
}

/// One row of `qscore_history`, newest first as fetched. Ordering happens
/// server-side on `ts`; only the fields the reconstruction reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryRow {
    #[serde(default)]
    pub qscore: Option<i64>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(config: &pulse_core::RemoteConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(StoreError::Status(response.status()))
        }
    }

    /// Append one scored entry to the history table.
    pub async fn insert_history(
        &self,
        user: &str,
        ts: DateTime<Utc>,
        message: &str,
        qscore: i64,
        tone: ToneCategory,
        nickname: Option<&str>,
    ) -> Result<(), StoreError> {
        let row = json!([{
            "user": user,
            "ts": ts.to_rfc3339(),
            "message": message,
            "qscore": qscore,
            "tone": tone.as_str(),
            "nickname": nickname,
        }]);
        let response = self
            .authed(self.client.post(self.endpoint("qscore_history")))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Upsert the state row carrying the full memory blob and the latest
    /// summary.
    pub async fn upsert_state(
        &self,
        user: &str,
        memory: &UserMemory,
        summary: Option<&Summary>,
    ) -> Result<(), StoreError> {
        let row = json!([{
            "user": user,
            "memory": memory,
            "last_summary": summary,
            "updated_at": Utc::now().to_rfc3339(),
        }]);
        let response = self
            .authed(self.client.post(self.endpoint("qscore_state")))
            .query(&[("on_conflict", "user")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetch the cached summary from the state row; on a miss, reconstruct
    /// one from the most recent history rows. Returns `None` when the user
    /// has no remote presence at all.
    pub async fn fetch_latest_summary(
        &self,
        user: &str,
        config: &EngineConfig,
    ) -> Result<Option<Summary>, StoreError> {
        let user_filter = format!("eq.{user}");
        let response = self
            .authed(self.client.get(self.endpoint("qscore_state")))
            .query(&[
                ("select", "last_summary"),
                ("user", user_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(response).await?.json().await?;
        if let Some(value) = rows.into_iter().next() {
            let cached = value.get("last_summary").cloned().unwrap_or_default();
            if !cached.is_null() {
                if let Ok(summary) = serde_json::from_value::<Summary>(cached) {
                    return Ok(Some(summary));
                }
                tracing::debug!("Cached summary for {} unreadable, rebuilding from rows", user);
            }
        }

        // Fallback: rebuild from the latest history rows.
        let limit = config.rolling_window.to_string();
        let response = self
            .authed(self.client.get(self.endpoint("qscore_history")))
            .query(&[
                ("select", "ts,message,qscore,tone,nickname"),
                ("user", user_filter.as_str()),
                ("order", "ts.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let rows: Vec<HistoryRow> = Self::check(response).await?.json().await?;
        Ok(summary_from_rows(user, &rows, config))
    }

    /// Fetch the memory blob from the state row, if any.
    pub async fn fetch_state_memory(&self, user: &str) -> Result<Option<UserMemory>, StoreError> {
        let user_filter = format!("eq.{user}");
        let response = self
            .authed(self.client.get(self.endpoint("qscore_state")))
            .query(&[
                ("select", "memory"),
                ("user", user_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(response).await?.json().await?;
        if let Some(value) = rows.into_iter().next() {
            let blob = value.get("memory").cloned().unwrap_or_default();
            if !blob.is_null() {
                return Ok(Some(serde_json::from_value(blob)?));
            }
        }
        Ok(None)
    }
}

/// Rebuild a summary from raw history rows (newest first). Runs the same
/// trend computation as the write path, so rounding matches exactly.
pub(crate) fn summary_from_rows(
    user: &str,
    rows: &[HistoryRow],
    config: &EngineConfig,
) -> Option<Summary> {
    if rows.is_empty() {
        return None;
    }
    let mut recent: Vec<i64> = rows.iter().filter_map(|r| r.qscore).collect();
    recent.reverse(); // chronological

    let last = &rows[0];
    let qscore = last.qscore.unwrap_or(0);
    let tone = last
        .tone
        .as_deref()
        .map_or(Some(ToneCategory::Neutral), ToneCategory::parse);
    Some(summary_from_scores(
        user,
        last.nickname.clone(),
        tone,
        qscore,
        &recent,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(qscore: i64, tone: &str) -> HistoryRow {
        HistoryRow {
            qscore: Some(qscore),
            tone: Some(tone.to_string()),
            nickname: None,
        }
    }

    #[test]
    fn test_summary_from_rows_empty() {
        assert!(summary_from_rows("ada", &[], &EngineConfig::default()).is_none());
    }

    #[test]
    fn test_summary_from_rows_reverses_to_chronological() {
        // Rows arrive newest first: 320 is the latest score.
        let rows = vec![row(320, "positive"), row(310, "neutral"), row(300, "neutral")];
        let summary = summary_from_rows("ada", &rows, &EngineConfig::default()).unwrap();

        assert_eq!(summary.qscore, 320);
        assert_eq!(summary.tone, ToneCategory::Positive);
        // Chronological [300, 310, 320]: weighted (300+620+960)/6 = 313.
        assert_eq!(summary.main_qscore, Some(313));
        assert_eq!(summary.streak.direction.as_str(), "up");
        assert_eq!(summary.streak.length, 2);
    }

    #[test]
    fn test_summary_from_rows_unknown_tone_degrades() {
        let rows = vec![row(250, "euphoric")];
        let summary = summary_from_rows("ada", &rows, &EngineConfig::default()).unwrap();
        assert_eq!(summary.tone, ToneCategory::Neutral);
        assert!(summary.reflection.starts_with("Clarity compounds."));
    }

    #[test]
    fn test_summary_from_rows_skips_null_scores() {
        let rows = vec![
            row(320, "positive"),
            HistoryRow {
                qscore: None,
                tone: None,
                nickname: None,
            },
            row(300, "neutral"),
        ];
        let summary = summary_from_rows("ada", &rows, &EngineConfig::default()).unwrap();
        assert_eq!(summary.main_qscore, Some(313));
    }
}
