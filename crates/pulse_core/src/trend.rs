//! Rolling-window trend statistics over score history.
//!
//! All functions take a chronological slice (oldest first) of the most
//! recent scores and degrade gracefully on short input: empty or
//! single-element windows return `None` / `0.0` / steady defaults rather
//! than erroring.

use serde::{Deserialize, Serialize};

/// Direction of the most recent run of score changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakDirection {
    Up,
    Down,
    Steady,
}

impl StreakDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakDirection::Up => "up",
            StreakDirection::Down => "down",
            StreakDirection::Steady => "steady",
        }
    }
}

/// Recency-weighted average with linear weights 1..n (newest weighs most).
/// `None` on an empty window.
pub fn weighted_main_qscore(scores: &[i64]) -> Option<i64> {
    if scores.is_empty() {
        return None;
    }
    let numerator: i64 = scores.iter().zip(1i64..).map(|(s, w)| s * w).sum();
    let denominator: i64 = (1..=scores.len() as i64).sum();
    Some((numerator as f64 / denominator as f64).round() as i64)
}

/// Population standard deviation, rounded. `None` with fewer than 2 scores.
pub fn volatility(scores: &[i64]) -> Option<i64> {
    if scores.len() < 2 {
        return None;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<i64>() as f64 / n;
    let variance = scores
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some(variance.sqrt().round() as i64)
}

/// Ordinary least-squares slope of score against index (x = 0..n-1).
/// Returns 0.0 with fewer than 2 points or a degenerate denominator.
pub fn linear_slope(scores: &[i64]) -> f64 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let x_sum = (nf - 1.0) * nf / 2.0;
    let x2_sum = (nf - 1.0) * nf * (2.0 * nf - 1.0) / 6.0;
    let y_sum: f64 = scores.iter().map(|&s| s as f64).sum();
    let xy_sum: f64 = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| i as f64 * s as f64)
        .sum();
    let denominator = nf * x2_sum - x_sum * x_sum;
    if denominator == 0.0 {
        return 0.0;
    }
    (nf * xy_sum - x_sum * y_sum) / denominator
}

/// Direction and length of the most recent run of same-direction steps,
/// scanning from the newest pair backward. Steady steps at the tail are
/// skipped until a directional step anchors the streak; the scan stops at
/// the first step that breaks it.
pub fn streak_direction(scores: &[i64]) -> (StreakDirection, usize) {
    if scores.len() < 2 {
        return (StreakDirection::Steady, 1);
    }
    let mut direction = StreakDirection::Steady;
    let mut length = 1;
    for i in (1..scores.len()).rev() {
        let diff = scores[i] - scores[i - 1];
        let step = if diff > 0 {
            StreakDirection::Up
        } else if diff < 0 {
            StreakDirection::Down
        } else {
            StreakDirection::Steady
        };
        if direction == StreakDirection::Steady {
            direction = step;
            length = 1;
        } else if step == direction {
            length += 1;
        } else {
            break;
        }
    }
    (direction, length)
}
