//! Summary composition: the full pipeline folded over a user's memory.

use crate::config::EngineConfig;
use crate::memory::{HistoryEntry, UserMemory};
use crate::range::{assign_range, RangeInfo};
use crate::reflect;
use crate::score::calculate_qscore;
use crate::tone::{self, ToneCategory};
use crate::trend::{self, StreakDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Streak fields as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub direction: StreakDirection,
    pub length: usize,
}

/// Derived per-request view of a user's latest score and trend. Recomputed
/// on every read and write, never persisted locally (the remote state row
/// caches one copy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub user: String,
    pub nickname: Option<String>,
    pub tone: ToneCategory,
    pub qscore: i64,
    pub range: RangeInfo,
    pub main_qscore: Option<i64>,
    pub trend_slope: f64,
    pub volatility: Option<i64>,
    pub streak: Streak,
    pub reflection: String,
}

/// Build a summary from an already-windowed chronological score slice plus
/// the latest entry's score and tone.
///
/// This is the single trend computation in the system: the write path, the
/// local read path and the remote fallback reconstruction all call it, so
/// their rounding behavior matches by construction. `tone` is `None` only
/// when a persisted row carried an unknown tone name; the summary then
/// reports neutral with a generic reflection.
pub fn summary_from_scores(
    user: &str,
    nickname: Option<String>,
    tone: Option<ToneCategory>,
    qscore: i64,
    recent: &[i64],
    config: &EngineConfig,
) -> Summary {
    let qrange = assign_range(qscore);
    let main_qscore = trend::weighted_main_qscore(recent);
    let volatility = trend::volatility(recent);
    let slope_start = recent.len().saturating_sub(config.slope_window);
    let trend_slope = trend::linear_slope(&recent[slope_start..]);
    let (direction, length) = trend::streak_direction(recent);
    let reflection = reflect::reflection(tone, &qrange, trend_slope);

    Summary {
        user: user.to_string(),
        nickname,
        tone: tone.unwrap_or(ToneCategory::Neutral),
        qscore,
        range: qrange,
        main_qscore,
        trend_slope,
        volatility,
        streak: Streak { direction, length },
        reflection,
    }
}

/// Score a message, append it to the user's history and return the summary
/// over the updated window.
///
/// Pure with respect to I/O: the caller owns persistence and supplies the
/// timestamp.
pub fn score_and_record(
    memory: &mut UserMemory,
    message: &str,
    nickname: Option<&str>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Summary {
    let tone = tone::classify(message);
    let qscore = calculate_qscore(message);

    memory.apply_nickname(nickname);
    memory.history.push(HistoryEntry {
        ts: now,
        message: message.to_string(),
        qscore,
        tone,
    });

    let recent = memory.recent_scores(config.rolling_window);
    summary_from_scores(
        &memory.user,
        memory.nickname.clone(),
        Some(tone),
        qscore,
        &recent,
        config,
    )
}
