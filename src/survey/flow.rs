//! Survey transitions
//!
//! `Survey` owns the question set, the current session, the persisted
//! progress and the store it is saved to. Every intent from the UI goes
//! through one method here; an answer's reward, unlocks and save happen
//! inside a single call.

use super::SurveyError;
use super::achievements::Achievement;
use super::question::{Question, QuestionSet};
use super::scoring::{Reward, compute_reward};
use super::state::{Phase, Progress, Session};
use crate::persistence::{KeyValueStore, ProgressStore};

/// Result of a scored answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub reward: Reward,
    /// Achievements unlocked by this answer, ascending threshold
    pub unlocked: Vec<&'static Achievement>,
    /// True if this was the last question
    pub completed: bool,
}

/// The survey state machine plus its gamification state
#[derive(Debug)]
pub struct Survey<S: KeyValueStore> {
    questions: QuestionSet,
    session: Session,
    progress: Progress,
    store: ProgressStore<S>,
}

impl<S: KeyValueStore> Survey<S> {
    /// Create a survey, loading progress from `store`
    pub fn new(questions: QuestionSet, store: S) -> Self {
        let store = ProgressStore::new(store);
        let progress = store.load();
        Self {
            questions,
            session: Session::default(),
            progress,
            store,
        }
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    /// The question on screen, if answering
    pub fn current_question(&self) -> Option<&Question> {
        self.session
            .current_index()
            .and_then(|index| self.questions.get(index))
    }

    /// Percent through the survey for the progress bar
    pub fn progress_percent(&self) -> Option<u32> {
        let index = self.session.current_index()?;
        let pct = (index + 1) as f64 / self.questions.len() as f64 * 100.0;
        Some(pct.round() as u32)
    }

    /// Answers in question order (None if skipped)
    pub fn responses(&self) -> impl Iterator<Item = (&Question, Option<&str>)> {
        self.questions
            .iter()
            .map(|q| (q, self.session.answer_for(q.id)))
    }

    /// Welcome -> first question
    pub fn start(&mut self, now_ms: f64) {
        self.session.begin(now_ms);
        log::info!("Survey started ({} questions)", self.questions.len());
    }

    /// Record an answer for the current question, score it and advance
    pub fn answer(&mut self, value: &str, now_ms: f64) -> Result<AnswerOutcome, SurveyError> {
        let Phase::InProgress { index } = self.session.phase else {
            return Err(SurveyError::NotInProgress(self.session.phase));
        };
        let Some(question) = self.questions.get(index) else {
            return Err(SurveyError::NotInProgress(self.session.phase));
        };

        let elapsed = self.session.elapsed_ms(now_ms);
        let reward = compute_reward(question, value, elapsed);
        log::debug!(
            "Question {} answered in {:.0} ms: +{} pts, +{} XP",
            question.id,
            elapsed,
            reward.points,
            reward.experience
        );

        self.session.answers.insert(question.id, value.to_string());
        let unlocked = self.progress.apply(reward);
        for achievement in &unlocked {
            log::info!("Achievement unlocked: {}", achievement.name);
        }
        self.store.save(&self.progress);

        let completed = index >= self.questions.last_index();
        if completed {
            self.session.phase = Phase::Completed;
            log::info!(
                "Survey completed: {} answers, {} pts total",
                self.session.answers.len(),
                self.progress.score
            );
        } else {
            self.session.phase = Phase::InProgress { index: index + 1 };
            self.session.question_started_at_ms = now_ms;
        }

        Ok(AnswerOutcome {
            reward,
            unlocked,
            completed,
        })
    }

    /// Move forward without scoring; false if already at the last question
    pub fn next(&mut self, now_ms: f64) -> bool {
        match self.session.phase {
            Phase::InProgress { index } if index < self.questions.last_index() => {
                self.session.phase = Phase::InProgress { index: index + 1 };
                self.session.question_started_at_ms = now_ms;
                true
            }
            _ => false,
        }
    }

    /// Move back without scoring; false if already at the first question
    pub fn prev(&mut self, now_ms: f64) -> bool {
        match self.session.phase {
            Phase::InProgress { index } if index > 0 => {
                self.session.phase = Phase::InProgress { index: index - 1 };
                self.session.question_started_at_ms = now_ms;
                true
            }
            _ => false,
        }
    }

    /// Start over from the first question; progress is kept
    pub fn restart(&mut self, now_ms: f64) {
        self.session.begin(now_ms);
        log::info!("Survey restarted ({} pts kept)", self.progress.score);
    }

    /// Completed -> Reviewing
    pub fn view_responses(&mut self) -> bool {
        if self.session.phase == Phase::Completed {
            self.session.phase = Phase::Reviewing;
            true
        } else {
            false
        }
    }

    /// Reviewing -> Completed
    pub fn go_back(&mut self) -> bool {
        if self.session.phase == Phase::Reviewing {
            self.session.phase = Phase::Completed;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SCORE_KEY};

    const QUESTIONS: &str = r#"[
        {"id": 1, "type": "multiple-choice", "text": "Pick", "options": ["A", "B"]},
        {"id": 2, "type": "text", "text": "Say", "points": 40},
        {"id": 3, "type": "multiple-choice", "text": "Pick again", "options": ["X", "Y"],
         "points": {"X": 100}}
    ]"#;

    fn survey() -> Survey<MemoryStore> {
        Survey::new(QuestionSet::from_json(QUESTIONS).unwrap(), MemoryStore::new())
    }

    #[test]
    fn test_welcome_rejects_answer() {
        let mut s = survey();
        assert_eq!(s.phase(), Phase::Welcome);
        assert!(matches!(
            s.answer("A", 0.0),
            Err(SurveyError::NotInProgress(Phase::Welcome))
        ));
        assert_eq!(s.progress().score, 0);
    }

    #[test]
    fn test_full_run() {
        let mut s = survey();
        s.start(0.0);
        assert_eq!(s.current_question().unwrap().id, 1);
        assert_eq!(s.progress_percent(), Some(33));

        let first = s.answer("A", 2_000.0).unwrap();
        assert_eq!(first.reward, Reward { points: 15, experience: 22 });
        assert!(!first.completed);
        assert_eq!(s.phase(), Phase::InProgress { index: 1 });
        assert_eq!(s.session().question_started_at_ms, 2_000.0);

        // 20 s on question 2: no bonus
        let second = s.answer("hello", 22_000.0).unwrap();
        assert_eq!(second.reward.points, 40);
        assert_eq!(second.unlocked.len(), 1);

        let last = s.answer("X", 23_000.0).unwrap();
        assert!(last.completed);
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.progress().score, 160);
        let ids: Vec<_> = last.unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["silver"]);

        assert!(matches!(
            s.answer("Y", 24_000.0),
            Err(SurveyError::NotInProgress(Phase::Completed))
        ));
        assert_eq!(s.progress().score, 160);
    }

    #[test]
    fn test_out_of_range_rating_is_capped() {
        let json = r#"[{"id": 7, "type": "rating", "text": "Rate", "pointsPerStar": 2, "maxStars": 5}]"#;
        let mut s = Survey::new(QuestionSet::from_json(json).unwrap(), MemoryStore::new());
        s.start(0.0);
        let outcome = s.answer("18446744073709551615", 20_000.0).unwrap();
        assert_eq!(outcome.reward, Reward { points: 10, experience: 17 });

        s.restart(0.0);
        let outcome = s.answer("1000", 20_000.0).unwrap();
        assert_eq!(outcome.reward.points, 10);
        assert_eq!(s.progress().score, 20);
    }

    #[test]
    fn test_each_answer_is_persisted() {
        let mut s = survey();
        s.start(0.0);
        s.answer("A", 1_000.0).unwrap();
        let stored = s.store().store().get_item(SCORE_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some("15"));
        assert_eq!(s.store().load(), *s.progress());
    }

    #[test]
    fn test_navigation_is_bounded_and_unscored() {
        let mut s = survey();
        assert!(!s.next(0.0));
        s.start(0.0);
        assert!(!s.prev(10.0));
        assert!(s.next(20.0));
        assert!(s.next(30.0));
        assert!(!s.next(40.0));
        assert_eq!(s.phase(), Phase::InProgress { index: 2 });
        assert_eq!(s.session().question_started_at_ms, 30.0);
        assert!(s.prev(50.0));
        assert_eq!(s.phase(), Phase::InProgress { index: 1 });
        assert_eq!(s.progress().score, 0);
        assert!(s.session().answers.is_empty());
    }

    #[test]
    fn test_restart_keeps_progress() {
        let mut s = survey();
        s.start(0.0);
        s.answer("A", 1.0).unwrap();
        s.answer("hi", 2.0).unwrap();
        let before = s.progress().clone();
        s.restart(100.0);
        assert_eq!(s.phase(), Phase::InProgress { index: 0 });
        assert!(s.session().answers.is_empty());
        assert_eq!(*s.progress(), before);
    }

    #[test]
    fn test_review_toggle() {
        let mut s = survey();
        assert!(!s.view_responses());
        s.start(0.0);
        for answer in ["B", "words", "Y"] {
            s.answer(answer, 0.0).unwrap();
        }
        assert!(s.view_responses());
        assert_eq!(s.phase(), Phase::Reviewing);
        assert!(s.answer("A", 0.0).is_err());
        assert!(!s.view_responses());
        assert!(s.go_back());
        assert_eq!(s.phase(), Phase::Completed);
        assert!(!s.go_back());
    }

    #[test]
    fn test_responses_in_question_order() {
        let mut s = survey();
        s.start(0.0);
        s.next(0.0);
        s.answer("only this", 0.0).unwrap();
        let responses: Vec<_> = s.responses().map(|(q, a)| (q.id, a)).collect();
        assert_eq!(responses, vec![(1, None), (2, Some("only this")), (3, None)]);
    }

    #[test]
    fn test_progress_loaded_from_store() {
        let mut store = MemoryStore::new();
        store.set_item(SCORE_KEY, "75").unwrap();
        let s = Survey::new(QuestionSet::from_json(QUESTIONS).unwrap(), store);
        assert_eq!(s.progress().score, 75);
    }
}
