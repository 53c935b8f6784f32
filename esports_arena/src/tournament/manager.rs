//! Tournament manager implementation.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{
        Participant, RoomDetails, Tournament, TournamentDetails, TournamentStatus, WinnerEntry,
    },
};
use crate::auth::Identity;
use crate::db::DbTransaction;
use crate::notifications::NotificationManager;
use crate::wallet::WalletManager;
use chrono::Utc;
use log::info;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::collections::HashSet;
use std::sync::Arc;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    pool: Arc<SqlitePool>,
    wallet: Arc<WalletManager>,
    notifications: Arc<NotificationManager>,
}

impl TournamentManager {
    /// Create a new tournament manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `wallet` - Wallet manager, used for winner payouts
    /// * `notifications` - Notification manager, used for join/result messages
    pub fn new(
        pool: Arc<SqlitePool>,
        wallet: Arc<WalletManager>,
        notifications: Arc<NotificationManager>,
    ) -> Self {
        Self {
            pool,
            wallet,
            notifications,
        }
    }

    /// Create and publish a tournament directly (admin action)
    ///
    /// # Errors
    ///
    /// * `TournamentError::Forbidden` - Caller is not an admin
    /// * `TournamentError::Validation` - Malformed details
    pub async fn create(
        &self,
        details: &TournamentDetails,
        actor: &Identity,
    ) -> TournamentResult<Tournament> {
        if !actor.is_admin() {
            return Err(TournamentError::Forbidden);
        }
        validate_details(details)?;

        let mut tx = self.pool.begin().await?;
        let tournament = self.publish_in_tx(&mut tx, details, None).await?;
        tx.commit().await?;
        Ok(tournament)
    }

    /// Insert a tournament row as part of a caller-owned transaction.
    ///
    /// Used by [`create`](Self::create) and by the approval workflow when an
    /// approved creation request is published.
    pub async fn publish_in_tx(
        &self,
        tx: &mut DbTransaction<'_>,
        details: &TournamentDetails,
        creator_id: Option<&str>,
    ) -> TournamentResult<Tournament> {
        validate_details(details)?;

        let created_at = Utc::now();
        let id = sqlx::query(
            "INSERT INTO tournaments
                 (title, game_name, entry_fee, prize_pool, host, rules, match_time,
                  status, image_url, creator_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 'upcoming', ?, ?, ?)",
        )
        .bind(&details.title)
        .bind(&details.game_name)
        .bind(details.entry_fee)
        .bind(details.prize_pool)
        .bind(&details.host)
        .bind(&details.rules)
        .bind(details.match_time)
        .bind(&details.image_url)
        .bind(creator_id)
        .bind(created_at)
        .execute(&mut **tx)
        .await?
        .last_insert_rowid();

        info!("published tournament {id}: {}", details.title);

        Ok(Tournament {
            id,
            title: details.title.clone(),
            game_name: details.game_name.clone(),
            entry_fee: details.entry_fee,
            prize_pool: details.prize_pool,
            host: details.host.clone(),
            rules: details.rules.clone(),
            match_time: details.match_time,
            status: TournamentStatus::Upcoming,
            image_url: details.image_url.clone(),
            creator_id: creator_id.map(str::to_string),
            room_details: None,
            created_at,
        })
    }

    /// List all tournaments, newest first
    pub async fn list(&self) -> TournamentResult<Vec<Tournament>> {
        let rows = sqlx::query(
            "SELECT id, title, game_name, entry_fee, prize_pool, host, rules, match_time,
                    status, image_url, creator_id, room_id, room_pass, created_at
             FROM tournaments
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(row_to_tournament).collect())
    }

    /// Get a tournament by id
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - Unknown id
    pub async fn get(&self, id: i64) -> TournamentResult<Tournament> {
        let row = sqlx::query(
            "SELECT id, title, game_name, entry_fee, prize_pool, host, rules, match_time,
                    status, image_url, creator_id, room_id, room_pass, created_at
             FROM tournaments
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(TournamentError::NotFound(id))?;

        Ok(row_to_tournament(row))
    }

    /// Delete a tournament (admin only)
    pub async fn delete(&self, id: i64, actor: &Identity) -> TournamentResult<()> {
        if !actor.is_admin() {
            return Err(TournamentError::Forbidden);
        }

        let result = sqlx::query("DELETE FROM tournaments WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        if result.rows_affected() == 0 {
            return Err(TournamentError::NotFound(id));
        }
        Ok(())
    }

    /// Join a tournament. Idempotent: re-joining is a no-op and never
    /// produces a duplicate participant row.
    ///
    /// The first join writes a confirmation notification for the user.
    pub async fn join(&self, tournament_id: i64, user_id: &str) -> TournamentResult<Participant> {
        // Existence check up front so joining a missing tournament is a
        // NotFound, not a silent insert.
        let tournament = self.get(tournament_id).await?;

        let joined_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tournament_participants (tournament_id, user_id, joined_at)
             VALUES (?, ?, ?)",
        )
        .bind(tournament_id)
        .bind(user_id)
        .bind(joined_at)
        .execute(&mut *tx)
        .await?;

        let newly_joined = result.rows_affected() == 1;
        if newly_joined {
            self.notifications
                .notify_in_tx(
                    &mut tx,
                    user_id,
                    &format!(
                        "You have successfully joined the tournament: \"{}\". Good luck!",
                        tournament.title
                    ),
                    Some(&format!("/tournaments/{tournament_id}")),
                )
                .await?;
        }
        tx.commit().await?;

        Ok(Participant {
            tournament_id,
            user_id: user_id.to_string(),
            joined_at,
        })
    }

    /// List participants of a tournament
    pub async fn participants(&self, tournament_id: i64) -> TournamentResult<Vec<Participant>> {
        let rows = sqlx::query(
            "SELECT tournament_id, user_id, joined_at
             FROM tournament_participants
             WHERE tournament_id = ?
             ORDER BY joined_at",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let participants = rows
            .into_iter()
            .map(|row| Participant {
                tournament_id: row.get("tournament_id"),
                user_id: row.get("user_id"),
                joined_at: row.get("joined_at"),
            })
            .collect();

        Ok(participants)
    }

    /// Whether a user has joined a tournament
    pub async fn is_participant(&self, tournament_id: i64, user_id: &str) -> TournamentResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tournament_participants
             WHERE tournament_id = ? AND user_id = ?",
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count > 0)
    }

    /// Set the match room credentials. Admin or tournament creator only.
    pub async fn set_room_details(
        &self,
        tournament_id: i64,
        room: &RoomDetails,
        actor: &Identity,
    ) -> TournamentResult<Tournament> {
        let tournament = self.get(tournament_id).await?;
        require_host(&tournament, actor)?;

        sqlx::query("UPDATE tournaments SET room_id = ?, room_pass = ? WHERE id = ?")
            .bind(&room.room_id)
            .bind(&room.room_pass)
            .bind(tournament_id)
            .execute(self.pool.as_ref())
            .await?;

        self.get(tournament_id).await
    }

    /// Declare tournament winners and pay out prizes.
    ///
    /// Admin or tournament creator only. Validates the winner list
    /// server-side: prizes must not exceed the prize pool, every winner must
    /// be a participant, and positions/users must not repeat. Credits each
    /// winner's wallet, notifies them, and marks the tournament completed,
    /// all in one database transaction.
    ///
    /// # Errors
    ///
    /// * `TournamentError::AlreadyCompleted` - Winners were declared before
    /// * `TournamentError::PrizePoolExceeded` - Prize total above the pool
    /// * `TournamentError::NotParticipant` - A winner never joined
    pub async fn declare_winners(
        &self,
        tournament_id: i64,
        winners: &[WinnerEntry],
        actor: &Identity,
    ) -> TournamentResult<()> {
        let tournament = self.get(tournament_id).await?;
        require_host(&tournament, actor)?;
        validate_winners(winners, tournament.prize_pool)?;

        let participants: HashSet<String> = self
            .participants(tournament_id)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        for winner in winners {
            if !participants.contains(&winner.user_id) {
                return Err(TournamentError::NotParticipant(winner.user_id.clone()));
            }
        }

        let mut tx = self.pool.begin().await?;

        // Claim completion inside the transaction; a concurrent declaration
        // updates zero rows here and fails before any payout.
        let claimed = sqlx::query(
            "UPDATE tournaments SET status = 'completed' WHERE id = ? AND status != 'completed'",
        )
        .bind(tournament_id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Err(TournamentError::AlreadyCompleted(tournament_id));
        }

        for winner in winners {
            sqlx::query(
                "INSERT INTO tournament_results (tournament_id, user_id, position, prize)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(tournament_id)
            .bind(&winner.user_id)
            .bind(winner.position)
            .bind(winner.prize)
            .execute(&mut *tx)
            .await?;

            if winner.prize > 0 {
                self.wallet
                    .credit_in_tx(
                        &mut tx,
                        &winner.user_id,
                        winner.prize,
                        &format!("Won \"{}\" (position {})", tournament.title, winner.position),
                        None,
                    )
                    .await?;
            }

            self.notifications
                .notify_in_tx(
                    &mut tx,
                    &winner.user_id,
                    &format!(
                        "Congratulations! You finished #{} in \"{}\" and won {} points.",
                        winner.position, tournament.title, winner.prize
                    ),
                    Some(&format!("/tournaments/{tournament_id}")),
                )
                .await?;
        }

        tx.commit().await?;

        info!(
            "declared {} winner(s) for tournament {tournament_id}",
            winners.len()
        );
        Ok(())
    }

    /// Declared results for a tournament, ordered by position
    pub async fn results(&self, tournament_id: i64) -> TournamentResult<Vec<WinnerEntry>> {
        let rows = sqlx::query(
            "SELECT user_id, position, prize
             FROM tournament_results
             WHERE tournament_id = ?
             ORDER BY position",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let results = rows
            .into_iter()
            .map(|row| WinnerEntry {
                user_id: row.get("user_id"),
                position: row.get("position"),
                prize: row.get("prize"),
            })
            .collect();

        Ok(results)
    }
}

fn require_host(tournament: &Tournament, actor: &Identity) -> TournamentResult<()> {
    let is_creator = tournament.creator_id.as_deref() == Some(actor.user_id.as_str());
    if actor.is_admin() || is_creator {
        Ok(())
    } else {
        Err(TournamentError::Forbidden)
    }
}

pub(crate) fn validate_details(details: &TournamentDetails) -> TournamentResult<()> {
    if details.title.trim().is_empty() {
        return Err(TournamentError::Validation("title must not be empty".into()));
    }
    if details.game_name.trim().is_empty() {
        return Err(TournamentError::Validation(
            "game name must not be empty".into(),
        ));
    }
    if details.entry_fee < 0 {
        return Err(TournamentError::Validation(
            "entry fee must not be negative".into(),
        ));
    }
    if details.prize_pool <= 0 {
        return Err(TournamentError::Validation(
            "prize pool must be positive".into(),
        ));
    }
    Ok(())
}

fn validate_winners(winners: &[WinnerEntry], prize_pool: i64) -> TournamentResult<()> {
    if winners.is_empty() {
        return Err(TournamentError::Validation(
            "winner list must not be empty".into(),
        ));
    }

    let mut users = HashSet::new();
    let mut positions = HashSet::new();
    let mut declared: i64 = 0;
    for winner in winners {
        if winner.position < 1 {
            return Err(TournamentError::Validation(
                "positions are 1-indexed".into(),
            ));
        }
        if winner.prize < 0 {
            return Err(TournamentError::Validation(
                "prizes must not be negative".into(),
            ));
        }
        if !users.insert(winner.user_id.as_str()) {
            return Err(TournamentError::Validation(format!(
                "duplicate winner: {}",
                winner.user_id
            )));
        }
        if !positions.insert(winner.position) {
            return Err(TournamentError::Validation(format!(
                "duplicate position: {}",
                winner.position
            )));
        }
        declared = declared
            .checked_add(winner.prize)
            .ok_or_else(|| TournamentError::Validation("prize total overflows".into()))?;
    }

    if declared > prize_pool {
        return Err(TournamentError::PrizePoolExceeded {
            pool: prize_pool,
            declared,
        });
    }
    Ok(())
}

fn row_to_tournament(row: SqliteRow) -> Tournament {
    let room_id: Option<String> = row.get("room_id");
    let room_pass: Option<String> = row.get("room_pass");
    let room_details = match (room_id, room_pass) {
        (Some(room_id), Some(room_pass)) => Some(RoomDetails { room_id, room_pass }),
        _ => None,
    };

    Tournament {
        id: row.get("id"),
        title: row.get("title"),
        game_name: row.get("game_name"),
        entry_fee: row.get("entry_fee"),
        prize_pool: row.get("prize_pool"),
        host: row.get("host"),
        rules: row.get("rules"),
        match_time: row.get("match_time"),
        status: match row.get::<String, _>("status").as_str() {
            "live" => TournamentStatus::Live,
            "completed" => TournamentStatus::Completed,
            _ => TournamentStatus::Upcoming,
        },
        image_url: row.get("image_url"),
        creator_id: row.get("creator_id"),
        room_details,
        created_at: row.get("created_at"),
    }
}
