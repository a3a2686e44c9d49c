//! User profile store: the durable attributes routing reads.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    drape_common::{PremiumFeature, UserProfileSnapshot},
};

use crate::{
    Error, Result,
    error::Context,
    now_ms,
};

/// Read-only profile access for routing.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Snapshot for `user_id`; an unknown user yields an empty snapshot.
    async fn load(&self, user_id: &str) -> anyhow::Result<UserProfileSnapshot>;
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    confirmed_gender: Option<String>,
    inferred_gender: Option<String>,
    confirmed_age_group: Option<String>,
    inferred_age_group: Option<String>,
    last_vibe_check_at: Option<i64>,
    last_color_analysis_at: Option<i64>,
}

fn from_millis(column: &'static str, millis: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    millis
        .map(|ms| {
            DateTime::from_timestamp_millis(ms)
                .with_context(|| format!("invalid timestamp {ms} in column {column}"))
        })
        .transpose()
}

impl TryFrom<ProfileRow> for UserProfileSnapshot {
    type Error = Error;

    fn try_from(r: ProfileRow) -> Result<Self> {
        Ok(Self {
            confirmed_gender: r.confirmed_gender,
            inferred_gender: r.inferred_gender,
            confirmed_age_group: r.confirmed_age_group,
            inferred_age_group: r.inferred_age_group,
            last_vibe_check_at: from_millis("last_vibe_check_at", r.last_vibe_check_at)?,
            last_color_analysis_at: from_millis(
                "last_color_analysis_at",
                r.last_color_analysis_at,
            )?,
        })
    }
}

/// SQLite-backed profile store.
pub struct SqliteProfileStore {
    pool: sqlx::SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserProfileSnapshot>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT confirmed_gender, inferred_gender, confirmed_age_group, inferred_age_group, \
             last_vibe_check_at, last_color_analysis_at FROM user_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserProfileSnapshot::try_from).transpose()
    }

    /// Insert or fully replace a profile.
    pub async fn upsert(&self, user_id: &str, profile: &UserProfileSnapshot) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO user_profiles
                 (user_id, confirmed_gender, inferred_gender, confirmed_age_group,
                  inferred_age_group, last_vibe_check_at, last_color_analysis_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                 confirmed_gender = excluded.confirmed_gender,
                 inferred_gender = excluded.inferred_gender,
                 confirmed_age_group = excluded.confirmed_age_group,
                 inferred_age_group = excluded.inferred_age_group,
                 last_vibe_check_at = excluded.last_vibe_check_at,
                 last_color_analysis_at = excluded.last_color_analysis_at,
                 updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(profile.confirmed_gender.as_deref())
        .bind(profile.inferred_gender.as_deref())
        .bind(profile.confirmed_age_group.as_deref())
        .bind(profile.inferred_age_group.as_deref())
        .bind(profile.last_vibe_check_at.map(|t| t.timestamp_millis()))
        .bind(profile.last_color_analysis_at.map(|t| t.timestamp_millis()))
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record that `feature` was used at `at`, creating the profile if needed.
    ///
    /// Called by feature handlers once they have served the feature.
    pub async fn touch_feature(
        &self,
        user_id: &str,
        feature: PremiumFeature,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let column = match feature {
            PremiumFeature::VibeCheck => "last_vibe_check_at",
            PremiumFeature::ColorAnalysis => "last_color_analysis_at",
        };
        let sql = format!(
            "INSERT INTO user_profiles (user_id, {column}, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET {column} = excluded.{column}, \
             updated_at = excluded.updated_at"
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(at.timestamp_millis())
            .bind(now_ms())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn load(&self, user_id: &str) -> anyhow::Result<UserProfileSnapshot> {
        Ok(self.get(user_id).await?.unwrap_or_default())
    }
}
