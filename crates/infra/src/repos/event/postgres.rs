use super::IEventRepo;
use anyhow::Context;
use gifting_domain::{Assignment, GiftEvent, Participant, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    name: String,
    deadline: i64,
    owner_uid: Uuid,
    owner_name: String,
    code: String,
    status: String,
    assignments: Option<serde_json::Value>,
    version: i64,
    created: i64,
    participants: serde_json::Value,
}

impl TryFrom<EventRaw> for GiftEvent {
    type Error = anyhow::Error;

    fn try_from(e: EventRaw) -> anyhow::Result<Self> {
        let participants: Vec<Participant> = serde_json::from_value(e.participants)
            .with_context(|| format!("Malformed participants of event {}", e.event_uid))?;
        let assignments: Option<Vec<Assignment>> = e
            .assignments
            .map(serde_json::from_value)
            .transpose()
            .with_context(|| format!("Malformed assignments of event {}", e.event_uid))?;

        Ok(GiftEvent {
            id: e.event_uid.into(),
            name: e.name,
            deadline: e.deadline,
            owner_id: e.owner_uid.into(),
            owner_name: e.owner_name,
            code: e.code,
            status: e.status.parse()?,
            participants,
            assignments,
            version: e.version,
            created: e.created,
        })
    }
}

/// Event columns together with the participants aggregated in join order
const SELECT_EVENTS: &str = r#"
    SELECT e.*, COALESCE(
        (
            SELECT json_agg(
                json_build_object(
                    'userId', p.user_uid,
                    'name', p.name,
                    'email', p.email,
                    'wishlist', p.wishlist
                ) ORDER BY p.joined_seq
            )
            FROM gift_event_participants AS p
            WHERE p.event_uid = e.event_uid
        ),
        '[]'::json
    ) AS participants
    FROM gift_events AS e
"#;

fn into_events(rows: Vec<EventRaw>) -> anyhow::Result<Vec<GiftEvent>> {
    rows.into_iter().map(GiftEvent::try_from).collect()
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &GiftEvent) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO gift_events(
                event_uid,
                name,
                deadline,
                owner_uid,
                owner_name,
                code,
                status,
                assignments,
                version,
                created
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.name)
        .bind(e.deadline)
        .bind(e.owner_id.inner_ref())
        .bind(&e.owner_name)
        .bind(&e.code)
        .bind(e.status.as_str())
        .bind(e.assignments.as_ref().map(Json))
        .bind(e.version)
        .bind(e.created)
        .execute(&mut *tx)
        .await?;

        for p in &e.participants {
            sqlx::query(
                r#"
                INSERT INTO gift_event_participants(event_uid, user_uid, name, email, wishlist)
                VALUES($1, $2, $3, $4, $5)
                "#,
            )
            .bind(e.id.inner_ref())
            .bind(p.user_id.inner_ref())
            .bind(&p.name)
            .bind(&p.email)
            .bind(&p.wishlist)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>> {
        let query = format!("{} WHERE e.event_uid = $1", SELECT_EVENTS);
        let event = sqlx::query_as::<_, EventRaw>(&query)
            .bind(event_id.inner_ref())
            .fetch_optional(&self.pool)
            .await?;
        event.map(GiftEvent::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<GiftEvent>> {
        let query = format!("{} WHERE e.code = $1", SELECT_EVENTS);
        let event = sqlx::query_as::<_, EventRaw>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        event.map(GiftEvent::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<GiftEvent>> {
        let query = format!(
            r#"{}
            WHERE e.owner_uid = $1 OR EXISTS (
                SELECT 1 FROM gift_event_participants AS p
                WHERE p.event_uid = e.event_uid AND p.user_uid = $1
            )
            ORDER BY e.created DESC
            "#,
            SELECT_EVENTS
        );
        let events = sqlx::query_as::<_, EventRaw>(&query)
            .bind(user_id.inner_ref())
            .fetch_all(&self.pool)
            .await?;
        into_events(events)
    }

    async fn add_participant(
        &self,
        event_id: &ID,
        participant: &Participant,
    ) -> anyhow::Result<bool> {
        // The version bump locks the event row, which serializes joins
        // with the matching commit
        let res = sqlx::query(
            r#"
            WITH bumped AS (
                UPDATE gift_events AS e SET version = e.version + 1
                WHERE e.event_uid = $1 AND e.status = 'active' AND NOT EXISTS (
                    SELECT 1 FROM gift_event_participants AS p
                    WHERE p.event_uid = $1 AND p.user_uid = $2
                )
                RETURNING e.event_uid
            )
            INSERT INTO gift_event_participants(event_uid, user_uid, name, email, wishlist)
            SELECT event_uid, $2, $3, $4, $5 FROM bumped
            ON CONFLICT (event_uid, user_uid) DO NOTHING
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(participant.user_id.inner_ref())
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.wishlist)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            WITH bumped AS (
                UPDATE gift_events AS e SET version = e.version + 1
                WHERE e.event_uid = $1 AND e.status = 'active' AND EXISTS (
                    SELECT 1 FROM gift_event_participants AS p
                    WHERE p.event_uid = $1 AND p.user_uid = $2
                )
                RETURNING e.event_uid
            )
            DELETE FROM gift_event_participants AS p
            USING bumped
            WHERE p.event_uid = bumped.event_uid AND p.user_uid = $2
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn set_wishlist(
        &self,
        event_id: &ID,
        user_id: &ID,
        wishlist: &[String],
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE gift_event_participants AS p SET wishlist = $3
            FROM gift_events AS e
            WHERE p.event_uid = $1 AND p.user_uid = $2
            AND e.event_uid = p.event_uid AND e.status = 'active'
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(user_id.inner_ref())
        .bind(wishlist)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn complete_matching(
        &self,
        event_id: &ID,
        expected_version: i64,
        assignments: &[Assignment],
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE gift_events SET
                status = 'matched',
                assignments = $3
            WHERE event_uid = $1 AND status = 'active' AND version = $2
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(expected_version)
        .bind(Json(assignments))
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<GiftEvent>> {
        let mut tx = self.pool.begin().await?;
        let query = format!("{} WHERE e.event_uid = $1", SELECT_EVENTS);
        let event = sqlx::query_as::<_, EventRaw>(&query)
            .bind(event_id.inner_ref())
            .fetch_optional(&mut *tx)
            .await?;
        let event = match event {
            Some(event) => GiftEvent::try_from(event)?,
            None => return Ok(None),
        };

        // Participants are removed by the cascade
        sqlx::query("DELETE FROM gift_events WHERE event_uid = $1")
            .bind(event_id.inner_ref())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(event))
    }
}
