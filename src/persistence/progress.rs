//! Progress codec: score, XP and badges as three independent keys

use serde::Deserialize;

use super::{KeyValueStore, read_key, write_key};
use crate::survey::{Achievement, AchievementId, Progress};

pub const SCORE_KEY: &str = "surveyScore";
pub const EXPERIENCE_KEY: &str = "surveyXP";
pub const ACHIEVEMENTS_KEY: &str = "surveyAchievements";

/// Achievements were once stored as full objects; accept both shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAchievement {
    Id(String),
    Legacy { id: String },
}

/// Loads and saves `Progress` through a key-value store
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load progress; each key falls back to its default on its own
    pub fn load(&self) -> Progress {
        let score = read_key(&self.store, SCORE_KEY)
            .and_then(|raw| parse_counter(SCORE_KEY, &raw))
            .unwrap_or(0);
        let experience = read_key(&self.store, EXPERIENCE_KEY)
            .and_then(|raw| parse_counter(EXPERIENCE_KEY, &raw))
            .unwrap_or(0);
        let achievements = read_key(&self.store, ACHIEVEMENTS_KEY)
            .map(|raw| parse_achievements(&raw))
            .unwrap_or_default();

        log::info!(
            "Loaded progress: {} pts, {} XP, {} badges",
            score,
            experience,
            achievements.len()
        );
        Progress {
            score,
            experience,
            achievements,
        }
    }

    /// Write all three keys; returns false if any write failed
    pub fn save(&mut self, progress: &Progress) -> bool {
        let achievements = match serde_json::to_string(&progress.achievements) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode achievements: {}", e);
                "[]".to_string()
            }
        };
        let mut ok = write_key(&mut self.store, SCORE_KEY, &progress.score.to_string());
        ok &= write_key(
            &mut self.store,
            EXPERIENCE_KEY,
            &progress.experience.to_string(),
        );
        ok &= write_key(&mut self.store, ACHIEVEMENTS_KEY, &achievements);
        ok
    }
}

fn parse_counter(key: &str, raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value.round() as u64),
        _ => {
            log::warn!("Ignoring malformed `{}` value {:?}", key, raw);
            None
        }
    }
}

fn parse_achievements(raw: &str) -> Vec<AchievementId> {
    let stored: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Ignoring malformed `{}`: {}", ACHIEVEMENTS_KEY, e);
            return Vec::new();
        }
    };

    let mut ids: Vec<AchievementId> = Vec::with_capacity(stored.len());
    for value in stored {
        let id = match serde_json::from_value::<StoredAchievement>(value) {
            Ok(StoredAchievement::Id(id) | StoredAchievement::Legacy { id }) => id,
            Err(e) => {
                log::warn!("Skipping unreadable `{}` entry: {}", ACHIEVEMENTS_KEY, e);
                continue;
            }
        };
        if Achievement::find(&id).is_some() && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
