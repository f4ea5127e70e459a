//! PostgreSQL implementation of the activity store port.
//!
//! Reads go straight to the pool. Writes are staged on the unit of work and
//! flushed by `save` inside one transaction. An update locks the current row
//! and writes only what the handler changed relative to its own read, so
//! writes committed in between are kept.

use activities::{
    ports::PendingChange,
    store::{rebase, ActivityDiff, PendingChanges},
    Activity, ActivityDraft, ActivityId, ActivityStore, Attendee, StoreError, UnitOfWork, UserId,
};
use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{FromRow, PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::repositories::RepositoryError;

const SELECT_ACTIVITY: &str = r#"
    SELECT id, title, description, category, date, city, venue, is_cancelled
    FROM activities
    WHERE id = $1
    "#;

const SELECT_ACTIVITY_FOR_UPDATE: &str = r#"
    SELECT id, title, description, category, date, city, venue, is_cancelled
    FROM activities
    WHERE id = $1
    FOR UPDATE
    "#;

const SELECT_ATTENDEES: &str = r#"
    SELECT activity_id, user_id, is_host, joined_at
    FROM activity_attendees
    WHERE activity_id = $1
    ORDER BY is_host DESC, joined_at
    "#;

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    date: OffsetDateTime,
    city: String,
    venue: String,
    is_cancelled: bool,
}

#[derive(Debug, FromRow)]
struct AttendeeRow {
    activity_id: Uuid,
    user_id: String,
    is_host: bool,
    joined_at: OffsetDateTime,
}

impl From<AttendeeRow> for Attendee {
    fn from(row: AttendeeRow) -> Self {
        Self {
            user_id: UserId::from(row.user_id),
            activity_id: ActivityId::from(row.activity_id),
            is_host: row.is_host,
            joined_at: row.joined_at,
        }
    }
}

impl ActivityRow {
    fn into_activity(self, attendees: Vec<AttendeeRow>) -> Result<Activity, RepositoryError> {
        let id = ActivityId::from(self.id);
        let draft = ActivityDraft {
            title: self.title,
            description: self.description,
            category: self.category,
            date: Some(self.date),
            city: self.city,
            venue: self.venue,
        };
        let attendees = attendees.into_iter().map(Attendee::from).collect();

        Activity::restore(id, draft, self.is_cancelled, attendees)
            .map_err(|e| RepositoryError::Corrupt(format!("activity {id}: {e}")))
    }
}

#[derive(Clone)]
pub struct PostgresActivityStore {
    pool: PgPool,
}

impl PostgresActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PostgresActivityStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(PostgresUnitOfWork {
            pool: self.pool.clone(),
            pending: PendingChanges::default(),
        }))
    }
}

pub struct PostgresUnitOfWork {
    pool: PgPool,
    pending: PendingChanges,
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn add(&mut self, activity: Activity) {
        self.pending.add(activity);
    }

    async fn find_by_id(&mut self, id: ActivityId) -> Result<Option<Activity>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        let activity = load_activity(&mut conn, id, false).await?;
        if let Some(activity) = &activity {
            self.pending.loaded(activity);
        }
        Ok(activity)
    }

    async fn query_all(&mut self) -> Result<Vec<Activity>, StoreError> {
        let activities = load_all(&self.pool).await?;
        for activity in &activities {
            self.pending.loaded(activity);
        }
        Ok(activities)
    }

    fn update(&mut self, activity: Activity) {
        self.pending.update(activity);
    }

    fn remove(&mut self, id: ActivityId) {
        self.pending.remove(id);
    }

    async fn save(&mut self) -> Result<u64, StoreError> {
        let changes = self.pending.take();
        if changes.is_empty() {
            return Ok(0);
        }
        Ok(commit(&self.pool, changes).await?)
    }
}

async fn load_activity(
    conn: &mut PgConnection,
    id: ActivityId,
    lock: bool,
) -> Result<Option<Activity>, RepositoryError> {
    let query = if lock {
        SELECT_ACTIVITY_FOR_UPDATE
    } else {
        SELECT_ACTIVITY
    };
    let Some(row) = sqlx::query_as::<_, ActivityRow>(query)
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let attendees = sqlx::query_as::<_, AttendeeRow>(SELECT_ATTENDEES)
        .bind(id.as_uuid())
        .fetch_all(&mut *conn)
        .await?;

    row.into_activity(attendees).map(Some)
}

async fn load_all(pool: &PgPool) -> Result<Vec<Activity>, RepositoryError> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT id, title, description, category, date, city, venue, is_cancelled
        FROM activities
        ORDER BY seq
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut attendees = sqlx::query_as::<_, AttendeeRow>(
        r#"
        SELECT activity_id, user_id, is_host, joined_at
        FROM activity_attendees
        ORDER BY is_host DESC, joined_at
        "#,
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .into_group_map_by(|attendee| attendee.activity_id);

    rows.into_iter()
        .map(|row| {
            let own = attendees.remove(&row.id).unwrap_or_default();
            row.into_activity(own)
        })
        .collect()
}

/// Applies every staged change in one transaction and returns the number of
/// rows written. Dropping the future before commit rolls everything back.
async fn commit(pool: &PgPool, changes: Vec<PendingChange>) -> Result<u64, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut rows = 0;

    for change in changes {
        rows += match change {
            PendingChange::Add(activity) => insert_activity(&mut tx, &activity).await?,
            PendingChange::Update { loaded, staged } => {
                update_activity(&mut tx, loaded.as_ref(), &staged).await?
            }
            PendingChange::Remove(id) => delete_activity(&mut tx, id).await?,
        };
    }

    tx.commit().await?;
    Ok(rows)
}

async fn insert_activity(
    conn: &mut PgConnection,
    activity: &Activity,
) -> Result<u64, RepositoryError> {
    let mut rows = sqlx::query(
        r#"
        INSERT INTO activities (id, title, description, category, date, city, venue, is_cancelled)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(activity.id().as_uuid())
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(&activity.category)
    .bind(activity.date)
    .bind(&activity.city)
    .bind(&activity.venue)
    .bind(activity.is_cancelled())
    .execute(&mut *conn)
    .await?
    .rows_affected();

    for attendee in activity.attendees() {
        rows += insert_attendee(conn, attendee).await?;
    }
    Ok(rows)
}

async fn update_activity(
    conn: &mut PgConnection,
    loaded: Option<&Activity>,
    staged: &Activity,
) -> Result<u64, RepositoryError> {
    let Some(persisted) = load_activity(conn, staged.id(), true).await? else {
        return Ok(0);
    };
    let activity = &rebase(loaded, staged, &persisted);
    let diff = ActivityDiff::between(&persisted, activity);
    if diff.is_empty() {
        return Ok(0);
    }

    let mut rows = 0;
    if diff.row_changed() {
        rows += sqlx::query(
            r#"
            UPDATE activities
            SET title = $2, description = $3, category = $4, date = $5,
                city = $6, venue = $7, is_cancelled = $8
            WHERE id = $1
            "#,
        )
        .bind(activity.id().as_uuid())
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(activity.date)
        .bind(&activity.city)
        .bind(&activity.venue)
        .bind(activity.is_cancelled())
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    for attendee in &diff.left {
        rows += sqlx::query(
            "DELETE FROM activity_attendees WHERE activity_id = $1 AND user_id = $2",
        )
        .bind(attendee.activity_id.as_uuid())
        .bind(attendee.user_id.as_str())
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    for attendee in &diff.joined {
        rows += insert_attendee(conn, attendee).await?;
    }

    Ok(rows)
}

async fn insert_attendee(
    conn: &mut PgConnection,
    attendee: &Attendee,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r#"
        INSERT INTO activity_attendees (activity_id, user_id, is_host, joined_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(attendee.activity_id.as_uuid())
    .bind(attendee.user_id.as_str())
    .bind(attendee.is_host)
    .bind(attendee.joined_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Attendee rows go with the activity through `ON DELETE CASCADE`; only the
/// activity row is counted.
async fn delete_activity(conn: &mut PgConnection, id: ActivityId) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = $1")
        .bind(id.as_uuid())
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
