//! Answer rewards
//!
//! Pure function of (question, answer, elapsed time). Every missing field has
//! a fallback, so scoring never fails.

use super::question::{Points, Question, QuestionKind};
use crate::consts::{SPEED_BONUS_POINTS, SPEED_BONUS_WINDOW_MS, XP_FACTOR, XP_FLOOR};

/// Award for a mapped answer that isn't in the mapping
pub const UNMAPPED_ANSWER_POINTS: u64 = 8;
pub const MULTIPLE_CHOICE_POINTS: u64 = 10;
pub const TEXT_POINTS: u64 = 8;
pub const OTHER_POINTS: u64 = 6;
pub const DEFAULT_POINTS_PER_STAR: f64 = 2.0;

/// Points and experience earned by one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reward {
    pub points: u64,
    pub experience: u64,
}

/// Points before the speed bonus
pub fn base_points(question: &Question, answer: &str) -> u64 {
    match &question.points {
        Some(Points::ByAnswer(map)) => map
            .get(answer)
            .map(|points| whole_points(*points))
            .unwrap_or(UNMAPPED_ANSWER_POINTS),
        Some(Points::Flat(points)) => whole_points(*points),
        None => match question.kind {
            QuestionKind::MultipleChoice => MULTIPLE_CHOICE_POINTS,
            QuestionKind::Rating => {
                let stars = rated_stars(question, answer);
                let per_star = question.points_per_star.unwrap_or(DEFAULT_POINTS_PER_STAR);
                whole_points(per_star * stars as f64)
            }
            QuestionKind::Text => TEXT_POINTS,
            QuestionKind::Other(_) => OTHER_POINTS,
        },
    }
}

/// Star count of a rating answer, within `1..=star_count`; unparsable -> 1
fn rated_stars(question: &Question, answer: &str) -> u64 {
    answer
        .trim()
        .parse::<u64>()
        .unwrap_or(1)
        .clamp(1, u64::from(question.star_count()))
}

/// Configured point values may be fractional; scores are whole, never negative
fn whole_points(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Speed bonus for an answer given `elapsed_ms` after the question appeared
pub fn speed_bonus(elapsed_ms: f64) -> u64 {
    if elapsed_ms < SPEED_BONUS_WINDOW_MS {
        SPEED_BONUS_POINTS
    } else {
        0
    }
}

/// Reward for answering `question` with `answer` after `elapsed_ms`
pub fn compute_reward(question: &Question, answer: &str, elapsed_ms: f64) -> Reward {
    let base = base_points(question, answer);
    let bonus = speed_bonus(elapsed_ms);
    let experience = ((base as f64 * XP_FACTOR).round() as u64)
        .max(XP_FLOOR)
        .saturating_add(bonus);
    Reward {
        points: base.saturating_add(bonus),
        experience,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn question(kind: QuestionKind, points: Option<Points>) -> Question {
        Question {
            id: 1,
            kind,
            text: "q".to_string(),
            options: vec!["Yes".to_string(), "No".to_string()],
            placeholder: None,
            points,
            points_per_star: None,
            max_stars: None,
        }
    }

    #[test]
    fn test_flat_points_ignore_answer() {
        let q = question(QuestionKind::Text, Some(Points::Flat(12.0)));
        assert_eq!(base_points(&q, "anything"), 12);
        assert_eq!(base_points(&q, ""), 12);
    }

    #[test]
    fn test_mapping_falls_back_to_eight() {
        let mut map = BTreeMap::new();
        map.insert("Yes".to_string(), 15.0);
        let q = question(QuestionKind::MultipleChoice, Some(Points::ByAnswer(map)));
        assert_eq!(base_points(&q, "Yes"), 15);
        assert_eq!(base_points(&q, "Maybe"), 8);
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(base_points(&question(QuestionKind::MultipleChoice, None), "Yes"), 10);
        assert_eq!(base_points(&question(QuestionKind::Text, None), "hi"), 8);
        assert_eq!(
            base_points(&question(QuestionKind::Other("x".into()), None), "hi"),
            6
        );
    }

    #[test]
    fn test_rating_uses_stars() {
        let mut q = question(QuestionKind::Rating, None);
        assert_eq!(base_points(&q, "4"), 8);
        assert_eq!(base_points(&q, "not a number"), 2);
        assert_eq!(base_points(&q, "0"), 2);
        q.points_per_star = Some(3.0);
        assert_eq!(base_points(&q, "5"), 15);
    }

    #[test]
    fn test_rating_clamped_to_star_count() {
        let mut q = question(QuestionKind::Rating, None);
        q.points_per_star = Some(3.0);
        q.max_stars = Some(5);
        assert_eq!(base_points(&q, "1000"), 15);
        assert_eq!(base_points(&q, "18446744073709551615"), 15);
        // too large for u64 is unparsable
        assert_eq!(base_points(&q, "99999999999999999999999"), 3);
        let reward = compute_reward(&q, "1000", 20_000.0);
        assert_eq!(reward, Reward { points: 15, experience: 26 });
    }

    #[test]
    fn test_huge_configured_points_saturate() {
        let q = question(QuestionKind::Text, Some(Points::Flat(1e30)));
        let reward = compute_reward(&q, "", 0.0);
        assert_eq!(reward.points, u64::MAX);
        assert_eq!(reward.experience, u64::MAX);
    }

    #[test]
    fn test_fractional_points_round() {
        let q = question(QuestionKind::Text, Some(Points::Flat(7.5)));
        assert_eq!(base_points(&q, ""), 8);
        let q = question(QuestionKind::Text, Some(Points::Flat(-4.0)));
        assert_eq!(base_points(&q, ""), 0);
        let mut q = question(QuestionKind::Rating, None);
        q.points_per_star = Some(2.5);
        assert_eq!(base_points(&q, "3"), 8);
    }

    #[test]
    fn test_speed_bonus_boundary() {
        let q = question(QuestionKind::MultipleChoice, None);
        let fast = compute_reward(&q, "Yes", 9_999.0);
        assert_eq!(fast, Reward { points: 15, experience: 22 });
        let slow = compute_reward(&q, "Yes", 10_000.0);
        assert_eq!(slow, Reward { points: 10, experience: 17 });
    }

    #[test]
    fn test_experience_floor() {
        let q = question(QuestionKind::Text, Some(Points::Flat(1.0)));
        let reward = compute_reward(&q, "", 60_000.0);
        assert_eq!(reward, Reward { points: 1, experience: 6 });
    }
}
