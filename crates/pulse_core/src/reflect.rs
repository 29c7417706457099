//! Reflection text templates keyed by tone.

use crate::range::RangeInfo;
use crate::tone::ToneCategory;

fn trend_hint(slope: f64) -> &'static str {
    if slope > 0.5 {
        "You're trending up — keep channeling that rhythm."
    } else if slope < -0.5 {
        "Tiny wobble — slow the breath, steady the hands."
    } else {
        "You're steady — consistency compounds."
    }
}

/// Build the reflection line for a summary.
///
/// `tone` is `None` when a persisted row carried a tone name this build
/// doesn't know; that degrades to a generic clarity message with the trend
/// hint appended.
pub fn reflection(tone: Option<ToneCategory>, qrange: &RangeInfo, slope: f64) -> String {
    let hint = trend_hint(slope);
    match tone {
        Some(ToneCategory::Anxious) => format!(
            "You sound tense, but self-aware — {} energy. Breathe. Let's steady those hands. {}",
            qrange.name, hint
        ),
        Some(ToneCategory::Neutral) => format!(
            "You're composed — classic {} range. Builder focus on. {}",
            qrange.name, hint
        ),
        Some(ToneCategory::Positive) => format!(
            "Calm confidence detected — pure {} flow. Stay locked in. {}",
            qrange.name, hint
        ),
        Some(ToneCategory::HighEnergy) => format!(
            "Hyped and focused — {} elite energy. Channel it with patience. {}",
            qrange.name, hint
        ),
        None => format!("Clarity compounds. {}", hint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::assign_range;

    #[test]
    fn test_hint_thresholds() {
        assert!(trend_hint(0.6).contains("trending up"));
        assert!(trend_hint(-0.6).contains("wobble"));
        assert!(trend_hint(0.5).contains("steady"));
        assert!(trend_hint(-0.5).contains("steady"));
        assert!(trend_hint(0.0).contains("steady"));
    }

    #[test]
    fn test_reflection_names_the_range() {
        let qrange = assign_range(320);
        let text = reflection(Some(ToneCategory::Positive), &qrange, 1.0);
        assert!(text.contains("Flow"));
        assert!(text.contains("trending up"));
    }

    #[test]
    fn test_unknown_tone_falls_back() {
        let qrange = assign_range(250);
        let text = reflection(None, &qrange, 0.0);
        assert!(text.starts_with("Clarity compounds."));
        assert!(text.contains("steady"));
    }
}
