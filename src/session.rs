use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::companion::progression::{ProgressionState, ReflectionOutcome};

/// The original experience seeds new accounts with a week-long streak.
pub const SEEDED_STREAK_DAYS: u32 = 7;

/// Everything the active session knows about its user: the assigned
/// companion and the accumulated progression. One per session, single owner;
/// all mutation goes through the progression transition functions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionProfile {
    pub id: String,
    pub email: Option<String>,
    pub progression: ProgressionState,
    pub created_at: DateTime<Utc>,
}

impl SessionProfile {
    pub fn new(persona_id: &str, email: Option<String>) -> Self {
        let mut progression = ProgressionState::new(persona_id);
        progression.streak_days = SEEDED_STREAK_DAYS;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            progression,
            created_at: Utc::now(),
        }
    }
}

/// In-memory registry of active sessions. State is ephemeral by design;
/// there is no persistence layer. Each profile is an owned value: transitions
/// compute the replacement outside any awareness of the map, and the store
/// performs the swap under its write lock.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionProfile>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: SessionProfile) {
        self.inner.write().await.insert(profile.id.clone(), profile);
    }

    pub async fn get(&self, id: &str) -> Option<SessionProfile> {
        self.inner.read().await.get(id).cloned()
    }

    /// Run one reflection through the progression engine and swap in the new
    /// state. `None` when the session does not exist; the inner `Option` is
    /// `None` when the reflection was below the minimum length.
    pub async fn apply_reflection(
        &self,
        id: &str,
        text: &str,
    ) -> Option<(SessionProfile, Option<ReflectionOutcome>)> {
        let mut sessions = self.inner.write().await;
        let profile = sessions.get_mut(id)?;
        let (next, outcome) = profile.progression.apply_reflection(text);
        profile.progression = next;
        Some((profile.clone(), outcome))
    }

    pub async fn increment_streak(&self, id: &str) -> Option<SessionProfile> {
        let mut sessions = self.inner.write().await;
        let profile = sessions.get_mut(id)?;
        profile.progression = profile.progression.increment_streak();
        Some(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companion::sentiment::MoodLabel;

    #[test]
    fn new_profile_starts_fresh_with_seeded_streak() {
        let profile = SessionProfile::new("spark", Some("hi@example.com".to_string()));
        assert_eq!(profile.progression.persona_id, "spark");
        assert_eq!(profile.progression.level, 1);
        assert_eq!(profile.progression.xp, 0);
        assert_eq!(profile.progression.streak_days, SEEDED_STREAK_DAYS);
        assert_eq!(profile.progression.current_mood, MoodLabel::Happy);
    }

    #[tokio::test]
    async fn store_round_trips_profiles() {
        let store = SessionStore::new();
        let profile = SessionProfile::new("luna", None);
        let id = profile.id.clone();
        store.insert(profile).await;

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn reflections_update_the_stored_progression() {
        let store = SessionStore::new();
        let profile = SessionProfile::new("buddy", None);
        let id = profile.id.clone();
        store.insert(profile).await;

        let (updated, outcome) = store
            .apply_reflection(&id, "today was busy but I stayed calm and grateful")
            .await
            .unwrap();
        assert!(outcome.is_some());
        assert!(updated.progression.xp > 0);

        // The swap stuck.
        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.progression.xp, updated.progression.xp);
    }

    #[tokio::test]
    async fn streak_increment_persists() {
        let store = SessionStore::new();
        let profile = SessionProfile::new("sage", None);
        let id = profile.id.clone();
        store.insert(profile).await;

        let updated = store.increment_streak(&id).await.unwrap();
        assert_eq!(updated.progression.streak_days, SEEDED_STREAK_DAYS + 1);
        assert!(store.increment_streak("missing").await.is_none());
    }
}
