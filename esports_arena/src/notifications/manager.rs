//! Notification manager implementation.

use super::{
    errors::{NotificationError, NotificationResult},
    models::Notification,
};
use crate::db::DbTransaction;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Notification manager
#[derive(Clone)]
pub struct NotificationManager {
    pool: Arc<SqlitePool>,
}

impl NotificationManager {
    /// Create a new notification manager
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Append an unread notification for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - Recipient
    /// * `message` - Notification text
    /// * `link` - Optional in-app link target
    pub async fn notify(
        &self,
        user_id: &str,
        message: &str,
        link: Option<&str>,
    ) -> NotificationResult<Notification> {
        let mut tx = self.pool.begin().await?;
        let notification = self.notify_in_tx(&mut tx, user_id, message, link).await?;
        tx.commit().await?;
        Ok(notification)
    }

    /// Notify variant composing into a caller-owned transaction, used by the
    /// approval workflow so the notification commits with the ledger write.
    pub async fn notify_in_tx(
        &self,
        tx: &mut DbTransaction<'_>,
        user_id: &str,
        message: &str,
        link: Option<&str>,
    ) -> NotificationResult<Notification> {
        let created_at = Utc::now();
        let id = sqlx::query(
            "INSERT INTO notifications (user_id, message, link, is_read, created_at)
             VALUES (?, ?, ?, 0, ?)",
        )
        .bind(user_id)
        .bind(message)
        .bind(link)
        .bind(created_at)
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();

        Ok(Notification {
            id,
            user_id: user_id.to_string(),
            message: message.to_string(),
            link: link.map(str::to_string),
            is_read: false,
            created_at,
        })
    }

    /// List a user's notifications, newest first
    pub async fn list(&self, user_id: &str) -> NotificationResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, user_id, message, link, is_read, created_at
             FROM notifications
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let notifications = rows
            .into_iter()
            .map(|row| Notification {
                id: row.get("id"),
                user_id: row.get("user_id"),
                message: row.get("message"),
                link: row.get("link"),
                is_read: row.get("is_read"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(notifications)
    }

    /// Count of unread notifications for a user
    pub async fn unread_count(&self, user_id: &str) -> NotificationResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    /// Mark a notification as read
    ///
    /// Only the owning user may mark a notification read.
    ///
    /// # Errors
    ///
    /// * `NotificationError::NotFound` - Unknown notification id
    /// * `NotificationError::Forbidden` - Notification belongs to another user
    pub async fn mark_read(&self, id: i64, user_id: &str) -> NotificationResult<()> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM notifications WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        match owner {
            None => Err(NotificationError::NotFound(id)),
            Some(owner) if owner != user_id => Err(NotificationError::Forbidden(id)),
            Some(_) => {
                sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
                    .bind(id)
                    .execute(self.pool.as_ref())
                    .await?;
                Ok(())
            }
        }
    }
}
