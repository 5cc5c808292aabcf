//! Postgres store adapter.
//!
//! Mutations write through to the database and then reload the full
//! collection, newest-first, into the watch channel. That keeps the
//! subscription contract identical to the in-process adapter: every
//! mutation is followed by one whole-snapshot push.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use time::{Date, OffsetDateTime};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::application::store::{PostingsStore, SettingsStore, StoreError};
use crate::domain::entities::{NewPosting, PostingPatch, PostingRecord, SiteSettingsRecord};
use crate::domain::types::{Category, PostingStatus};

pub struct PostgresStore {
    pool: PgPool,
    postings_tx: watch::Sender<Vec<PostingRecord>>,
    settings_tx: watch::Sender<Option<SiteSettingsRecord>>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        let (postings_tx, _) = watch::channel(Vec::new());
        let (settings_tx, _) = watch::channel(None);
        Self {
            pool,
            postings_tx,
            settings_tx,
        }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }

    /// Load the current collection and deliver the first snapshot. Call once
    /// at startup, before the first subscriber attaches.
    pub async fn prime(&self) -> Result<(), StoreError> {
        self.push_snapshot().await
    }

    async fn push_snapshot(&self) -> Result<(), StoreError> {
        let snapshot = self.load_snapshot().await?;
        super::count_push();
        self.postings_tx.send_replace(snapshot);
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Vec<PostingRecord>, StoreError> {
        let rows: Vec<PostingRow> = sqlx::query_as(
            r#"
            SELECT id, title, department, category, status, publish_at,
                   posted_date, last_date, link, notification_link,
                   official_website, short_info, important_dates, fee,
                   age_limit, total_posts, vacancy_details, eligibility,
                   how_to_apply, selection_process, created_at
            FROM postings
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostingRecord::from).collect())
    }

    async fn fetch_record(&self, id: Uuid) -> Result<Option<PostingRecord>, StoreError> {
        let row: Option<PostingRow> = sqlx::query_as(
            r#"
            SELECT id, title, department, category, status, publish_at,
                   posted_date, last_date, link, notification_link,
                   official_website, short_info, important_dates, fee,
                   age_limit, total_posts, vacancy_details, eligibility,
                   how_to_apply, selection_process, created_at
            FROM postings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostingRecord::from))
    }

    async fn write_record(&self, record: &PostingRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE postings SET
                title = $2, department = $3, category = $4, status = $5,
                publish_at = $6, last_date = $7, link = $8,
                notification_link = $9, official_website = $10,
                short_info = $11, important_dates = $12, fee = $13,
                age_limit = $14, total_posts = $15, vacancy_details = $16,
                eligibility = $17, how_to_apply = $18, selection_process = $19
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.department)
        .bind(record.category.as_str())
        .bind(record.status.as_str())
        .bind(record.publish_at)
        .bind(&record.last_date)
        .bind(&record.link)
        .bind(&record.notification_link)
        .bind(&record.official_website)
        .bind(&record.short_info)
        .bind(&record.important_dates)
        .bind(&record.fee)
        .bind(&record.age_limit)
        .bind(&record.total_posts)
        .bind(&record.vacancy_details)
        .bind(&record.eligibility)
        .bind(&record.how_to_apply)
        .bind(&record.selection_process)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl PostingsStore for PostgresStore {
    fn subscribe(&self) -> watch::Receiver<Vec<PostingRecord>> {
        self.postings_tx.subscribe()
    }

    async fn create(&self, posting: NewPosting) -> Result<PostingRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = PostingRecord {
            id: Uuid::new_v4(),
            title: posting.title,
            department: posting.department,
            category: posting.category,
            status: posting.status,
            publish_at: posting.publish_at,
            posted_date: now.date(),
            last_date: posting.last_date,
            link: posting.link,
            notification_link: posting.notification_link,
            official_website: posting.official_website,
            short_info: posting.short_info,
            important_dates: posting.important_dates,
            fee: posting.fee,
            age_limit: posting.age_limit,
            total_posts: posting.total_posts,
            vacancy_details: posting.vacancy_details,
            eligibility: posting.eligibility,
            how_to_apply: posting.how_to_apply,
            selection_process: posting.selection_process,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO postings (
                id, title, department, category, status, publish_at,
                posted_date, last_date, link, notification_link,
                official_website, short_info, important_dates, fee,
                age_limit, total_posts, vacancy_details, eligibility,
                how_to_apply, selection_process, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                      $13, $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.department)
        .bind(record.category.as_str())
        .bind(record.status.as_str())
        .bind(record.publish_at)
        .bind(record.posted_date)
        .bind(&record.last_date)
        .bind(&record.link)
        .bind(&record.notification_link)
        .bind(&record.official_website)
        .bind(&record.short_info)
        .bind(&record.important_dates)
        .bind(&record.fee)
        .bind(&record.age_limit)
        .bind(&record.total_posts)
        .bind(&record.vacancy_details)
        .bind(&record.eligibility)
        .bind(&record.how_to_apply)
        .bind(&record.selection_process)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.push_snapshot().await?;
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: PostingPatch) -> Result<(), StoreError> {
        let Some(mut record) = self.fetch_record(id).await? else {
            debug!(target = "rozgar::store", posting_id = %id, "update for unknown id ignored");
            return Ok(());
        };
        patch.apply(&mut record);
        self.write_record(&record).await?;
        self.push_snapshot().await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            debug!(target = "rozgar::store", posting_id = %id, "delete for unknown id ignored");
            return Ok(());
        }
        self.push_snapshot().await
    }
}

#[async_trait]
impl SettingsStore for PostgresStore {
    fn subscribe(&self) -> watch::Receiver<Option<SiteSettingsRecord>> {
        self.settings_tx.subscribe()
    }

    async fn ensure_settings(&self) -> Result<SiteSettingsRecord, StoreError> {
        let defaults = SiteSettingsRecord::initial();
        sqlx::query(
            r#"
            INSERT INTO site_settings (
                id, site_name, footer_text, telegram_link, whatsapp_link,
                publisher_id, ad_slot_top, ad_slot_side, ad_slot_bottom
            ) VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&defaults.site_name)
        .bind(&defaults.footer_text)
        .bind(&defaults.telegram_link)
        .bind(&defaults.whatsapp_link)
        .bind(&defaults.publisher_id)
        .bind(&defaults.ad_slot_top)
        .bind(&defaults.ad_slot_side)
        .bind(&defaults.ad_slot_bottom)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let row: SiteSettingsRow = sqlx::query_as(
            r#"
            SELECT site_name, footer_text, telegram_link, whatsapp_link,
                   publisher_id, ad_slot_top, ad_slot_side, ad_slot_bottom
            FROM site_settings
            WHERE id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let record = SiteSettingsRecord::from(row);
        self.settings_tx.send_replace(Some(record.clone()));
        Ok(record)
    }

    async fn write_settings(&self, settings: SiteSettingsRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO site_settings (
                id, site_name, footer_text, telegram_link, whatsapp_link,
                publisher_id, ad_slot_top, ad_slot_side, ad_slot_bottom
            ) VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                site_name = EXCLUDED.site_name,
                footer_text = EXCLUDED.footer_text,
                telegram_link = EXCLUDED.telegram_link,
                whatsapp_link = EXCLUDED.whatsapp_link,
                publisher_id = EXCLUDED.publisher_id,
                ad_slot_top = EXCLUDED.ad_slot_top,
                ad_slot_side = EXCLUDED.ad_slot_side,
                ad_slot_bottom = EXCLUDED.ad_slot_bottom
            "#,
        )
        .bind(&settings.site_name)
        .bind(&settings.footer_text)
        .bind(&settings.telegram_link)
        .bind(&settings.whatsapp_link)
        .bind(&settings.publisher_id)
        .bind(&settings.ad_slot_top)
        .bind(&settings.ad_slot_side)
        .bind(&settings.ad_slot_bottom)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.settings_tx.send_replace(Some(settings));
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unreachable(err.to_string())
        }
        other => StoreError::from_persistence(other),
    }
}

#[derive(sqlx::FromRow)]
struct PostingRow {
    id: Uuid,
    title: String,
    department: String,
    category: String,
    // Legacy rows predate the status column; NULL normalizes to published.
    status: Option<String>,
    publish_at: Option<OffsetDateTime>,
    posted_date: Date,
    last_date: String,
    link: String,
    notification_link: Option<String>,
    official_website: Option<String>,
    short_info: Option<String>,
    important_dates: Option<String>,
    fee: Option<String>,
    age_limit: Option<String>,
    total_posts: Option<String>,
    vacancy_details: Option<String>,
    eligibility: Option<String>,
    how_to_apply: Option<String>,
    selection_process: Option<String>,
    created_at: OffsetDateTime,
}

impl From<PostingRow> for PostingRecord {
    fn from(row: PostingRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            department: row.department,
            category: Category::from_label(&row.category).unwrap_or(Category::LatestJobs),
            status: PostingStatus::from_raw(row.status.as_deref()),
            publish_at: row.publish_at,
            posted_date: row.posted_date,
            last_date: row.last_date,
            link: row.link,
            notification_link: row.notification_link,
            official_website: row.official_website,
            short_info: row.short_info,
            important_dates: row.important_dates,
            fee: row.fee,
            age_limit: row.age_limit,
            total_posts: row.total_posts,
            vacancy_details: row.vacancy_details,
            eligibility: row.eligibility,
            how_to_apply: row.how_to_apply,
            selection_process: row.selection_process,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SiteSettingsRow {
    site_name: String,
    footer_text: String,
    telegram_link: String,
    whatsapp_link: String,
    publisher_id: String,
    ad_slot_top: String,
    ad_slot_side: String,
    ad_slot_bottom: String,
}

impl From<SiteSettingsRow> for SiteSettingsRecord {
    fn from(row: SiteSettingsRow) -> Self {
        Self {
            site_name: row.site_name,
            footer_text: row.footer_text,
            telegram_link: row.telegram_link,
            whatsapp_link: row.whatsapp_link,
            publisher_id: row.publisher_id,
            ad_slot_top: row.ad_slot_top,
            ad_slot_side: row.ad_slot_side,
            ad_slot_bottom: row.ad_slot_bottom,
        }
    }
}
