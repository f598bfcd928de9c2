//! Score-threshold achievements

/// Persisted achievement identifier
pub type AchievementId = String;

/// A badge unlocked once the cumulative score reaches `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub threshold: u64,
}

/// All achievements, ascending by threshold
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "bronze",
        name: "Bronze Contributor",
        threshold: 50,
    },
    Achievement {
        id: "silver",
        name: "Silver Contributor",
        threshold: 120,
    },
    Achievement {
        id: "gold",
        name: "Gold Contributor",
        threshold: 250,
    },
];

impl Achievement {
    /// Look up a definition by id
    pub fn find(id: &str) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }

    /// Display name for a persisted id (falls back to the raw id)
    pub fn display_name(id: &str) -> &str {
        Self::find(id).map(|a| a.name).unwrap_or(id)
    }
}

/// Achievements newly earned at `score`, in ascending threshold order
pub fn evaluate(score: u64, unlocked: &[AchievementId]) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| score >= a.threshold && !unlocked.iter().any(|id| id == a.id))
        .collect()
}
