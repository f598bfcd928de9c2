//! Short-lived feedback: score pulse, achievement toasts, confetti

use std::collections::VecDeque;

use crate::consts::{ACHIEVEMENT_TOAST_MS, CONFETTI_MS, SCORE_PULSE_MS};
use crate::survey::AnswerOutcome;

/// An achievement toast
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub until_ms: f64,
}

/// Timed UI effects, expired by the glue's ticker
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pulse_until_ms: Option<f64>,
    confetti_until_ms: Option<f64>,
    toasts: VecDeque<Toast>,
}

impl Effects {
    /// React to a scored answer
    pub fn on_answer(&mut self, outcome: &AnswerOutcome, now_ms: f64) {
        self.pulse_until_ms = Some(now_ms + SCORE_PULSE_MS);
        for achievement in &outcome.unlocked {
            self.toasts.push_back(Toast {
                title: achievement.name.to_string(),
                until_ms: now_ms + ACHIEVEMENT_TOAST_MS,
            });
        }
        if outcome.completed {
            self.confetti_until_ms = Some(now_ms + CONFETTI_MS);
        }
    }

    /// Drop everything that has run its course; true if anything changed
    pub fn expire(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        if self.pulse_until_ms.is_some_and(|t| now_ms >= t) {
            self.pulse_until_ms = None;
            changed = true;
        }
        if self.confetti_until_ms.is_some_and(|t| now_ms >= t) {
            self.confetti_until_ms = None;
            changed = true;
        }
        let before = self.toasts.len();
        self.toasts.retain(|t| now_ms < t.until_ms);
        changed || self.toasts.len() != before
    }

    /// Earliest pending expiry, for scheduling the next cleanup
    pub fn next_expiry(&self) -> Option<f64> {
        self.pulse_until_ms
            .into_iter()
            .chain(self.confetti_until_ms)
            .chain(self.toasts.iter().map(|t| t.until_ms))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn pulse_active(&self) -> bool {
        self.pulse_until_ms.is_some()
    }

    pub fn confetti_active(&self) -> bool {
        self.confetti_until_ms.is_some()
    }

    /// Newest toast still showing
    pub fn current_toast(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    /// Leaving the completion screen stops the confetti
    pub fn clear_confetti(&mut self) {
        self.confetti_until_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{ACHIEVEMENTS, Reward};

    fn outcome(unlocked: usize, completed: bool) -> AnswerOutcome {
        AnswerOutcome {
            reward: Reward {
                points: 10,
                experience: 17,
            },
            unlocked: ACHIEVEMENTS.iter().take(unlocked).collect(),
            completed,
        }
    }

    #[test]
    fn test_pulse_expires() {
        let mut fx = Effects::default();
        fx.on_answer(&outcome(0, false), 1_000.0);
        assert!(fx.pulse_active());
        assert!(!fx.expire(1_600.0));
        assert!(fx.expire(1_650.0));
        assert!(!fx.pulse_active());
    }

    #[test]
    fn test_toasts_show_newest() {
        let mut fx = Effects::default();
        fx.on_answer(&outcome(2, false), 0.0);
        assert_eq!(fx.current_toast().unwrap().title, "Silver Contributor");
        fx.expire(3_600.0);
        assert!(fx.current_toast().is_none());
    }

    #[test]
    fn test_confetti_on_completion() {
        let mut fx = Effects::default();
        fx.on_answer(&outcome(0, true), 0.0);
        assert!(fx.confetti_active());
        assert_eq!(fx.next_expiry(), Some(650.0));
        fx.expire(5_000.0);
        assert!(fx.confetti_active());
        fx.expire(8_000.0);
        assert!(!fx.confetti_active());
        assert_eq!(fx.next_expiry(), None);
    }
}
