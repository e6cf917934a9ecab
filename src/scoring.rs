//! Priority scoring for study topics.
//!
//! Three pure functions combine into a topic's day-specific ranking:
//! intrinsic priority from the 1-5 ratings, an exam-urgency multiplier that
//! ramps linearly over the last 30 days before an exam, and a flat
//! spaced-repetition boost for low-confidence topics.
//!
//! Scores must be recomputed every day of a planning run: days-until-exam
//! shrinks as dates advance and remaining effort shrinks as work is allocated.

/// Weight of difficulty in the intrinsic priority score
pub const DIFFICULTY_WEIGHT: f64 = 0.3;

/// Weight of importance in the intrinsic priority score
pub const IMPORTANCE_WEIGHT: f64 = 0.3;

/// Weight of inverted confidence, using (6 - confidence)
pub const CONFIDENCE_INV_WEIGHT: f64 = 0.4;

/// Days before an exam at which urgency starts ramping up
pub const URGENCY_LOOKBACK_DAYS: i64 = 30;

/// Urgency ceiling, applied when the exam is today or already past
pub const MAX_URGENCY_MULTIPLIER: f64 = 2.0;

/// Boost applied to topics with confidence below this threshold
pub const SPACED_BOOST_CONFIDENCE_THRESHOLD: u8 = 3;

/// The spaced-repetition boost factor for weak topics
pub const SPACED_BOOST_FACTOR: f64 = 1.2;

/// Intrinsic priority of a topic from its 1-5 ratings.
///
/// Confidence is inverted around 6 so lower self-rated confidence raises
/// priority.
pub fn priority_score(difficulty: u8, importance: u8, confidence: u8) -> f64 {
    f64::from(difficulty) * DIFFICULTY_WEIGHT
        + f64::from(importance) * IMPORTANCE_WEIGHT
        + (6.0 - f64::from(confidence)) * CONFIDENCE_INV_WEIGHT
}

/// Urgency multiplier from days until the subject's nearest exam.
///
/// Ramps linearly from 1.0 at 30 days out to 2.0 when the exam is today or
/// has passed. Callers with no upcoming exam should not call this with a
/// sentinel; absence of an exam means no pressure, i.e. a multiplier of 1.0,
/// and that decision belongs to the caller.
pub fn urgency_multiplier(days_until_exam: i64) -> f64 {
    if days_until_exam <= 0 {
        return MAX_URGENCY_MULTIPLIER;
    }
    if days_until_exam >= URGENCY_LOOKBACK_DAYS {
        return 1.0;
    }
    let frac =
        (URGENCY_LOOKBACK_DAYS - days_until_exam) as f64 / URGENCY_LOOKBACK_DAYS as f64;
    1.0 + frac * (MAX_URGENCY_MULTIPLIER - 1.0)
}

/// Flat multiplicative boost for weak topics, independent of urgency.
pub fn spaced_boost(confidence: u8) -> f64 {
    if confidence < SPACED_BOOST_CONFIDENCE_THRESHOLD {
        SPACED_BOOST_FACTOR
    } else {
        1.0
    }
}

/// Day-specific ranking score for a topic.
///
/// `days_until_exam` of `None` means the subject has no upcoming exam; the
/// urgency multiplier is then 1.0.
pub fn effective_priority(
    difficulty: u8,
    importance: u8,
    confidence: u8,
    days_until_exam: Option<i64>,
) -> f64 {
    let urgency = days_until_exam.map(urgency_multiplier).unwrap_or(1.0);
    priority_score(difficulty, importance, confidence) * urgency * spaced_boost(confidence)
}
