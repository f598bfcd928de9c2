//! Session and gamification state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::achievements::{Achievement, AchievementId, evaluate};
use super::question::QuestionId;
use super::scoring::Reward;

/// Where the player is in the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Welcome screen, nothing answered yet
    Welcome,
    /// Answering the question at `index`
    InProgress { index: usize },
    /// Last question answered
    Completed,
    /// Reviewing answers from the completion screen
    Reviewing,
}

/// One survey attempt (in-memory only)
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phase: Phase,
    /// Raw answers keyed by question id
    pub answers: BTreeMap<QuestionId, String>,
    /// When the current question became visible (ms)
    pub question_started_at_ms: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Welcome,
            answers: BTreeMap::new(),
            question_started_at_ms: 0.0,
        }
    }
}

impl Session {
    /// Reset to the first question with no answers
    pub fn begin(&mut self, now_ms: f64) {
        self.phase = Phase::InProgress { index: 0 };
        self.answers.clear();
        self.question_started_at_ms = now_ms;
    }

    /// Index of the question on screen, if any
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress { index } => Some(index),
            _ => None,
        }
    }

    pub fn answer_for(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    /// Milliseconds spent on the current question
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.question_started_at_ms).max(0.0)
    }
}

/// Score, XP and badges; spans sessions and is persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub score: u64,
    pub experience: u64,
    /// Unlock order
    pub achievements: Vec<AchievementId>,
}

impl Progress {
    /// Add a reward and unlock any achievements it crosses
    pub fn apply(&mut self, reward: Reward) -> Vec<&'static Achievement> {
        self.score = self.score.saturating_add(reward.points);
        self.experience = self.experience.saturating_add(reward.experience);
        let unlocked = evaluate(self.score, &self.achievements);
        self.achievements
            .extend(unlocked.iter().map(|a| a.id.to_string()));
        unlocked
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    /// XP bar fill (0-100)
    pub fn xp_bar_percent(&self) -> u64 {
        (self.experience % 100).min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_begin_clears() {
        let mut session = Session::default();
        session.answers.insert(1, "x".to_string());
        session.phase = Phase::Completed;
        session.begin(500.0);
        assert_eq!(session.phase, Phase::InProgress { index: 0 });
        assert!(session.answers.is_empty());
        assert_eq!(session.question_started_at_ms, 500.0);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let mut session = Session::default();
        session.begin(1_000.0);
        assert_eq!(session.elapsed_ms(400.0), 0.0);
        assert_eq!(session.elapsed_ms(1_250.0), 250.0);
    }

    #[test]
    fn test_progress_apply_unlocks() {
        let mut progress = Progress::default();
        let unlocked = progress.apply(Reward { points: 45, experience: 70 });
        assert!(unlocked.is_empty());
        let unlocked = progress.apply(Reward { points: 10, experience: 17 });
        assert_eq!(unlocked.len(), 1);
        assert_eq!(progress.score, 55);
        assert_eq!(progress.experience, 87);
        assert!(progress.has_achievement("bronze"));
    }

    #[test]
    fn test_xp_bar_wraps() {
        let progress = Progress {
            experience: 237,
            ..Default::default()
        };
        assert_eq!(progress.xp_bar_percent(), 37);
    }
}
