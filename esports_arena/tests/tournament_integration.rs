//! Integration tests for tournaments: publishing, idempotent joins, room
//! credentials, and winner declaration with prize payouts.

use chrono::{Duration, Utc};
use esports_arena::auth::Identity;
use esports_arena::db::{Database, DatabaseConfig};
use esports_arena::notifications::NotificationManager;
use esports_arena::tournament::{
    RoomDetails, TournamentDetails, TournamentError, TournamentManager, TournamentStatus,
    WinnerEntry,
};
use esports_arena::wallet::WalletManager;
use sqlx::SqlitePool;
use std::sync::Arc;

async fn setup_test_db() -> Arc<SqlitePool> {
    let config = DatabaseConfig::in_memory();
    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Migration failed");
    Arc::new(db.pool().clone())
}

async fn setup_managers() -> (TournamentManager, Arc<WalletManager>, Arc<NotificationManager>) {
    let pool = setup_test_db().await;
    let wallet = Arc::new(WalletManager::new(pool.clone()));
    let notifications = Arc::new(NotificationManager::new(pool.clone()));
    let tournaments = TournamentManager::new(pool, wallet.clone(), notifications.clone());
    (tournaments, wallet, notifications)
}

fn sample_details(title: &str) -> TournamentDetails {
    TournamentDetails {
        title: title.to_string(),
        game_name: "BGMI".to_string(),
        entry_fee: 50,
        prize_pool: 1000,
        host: "Arena Esports".to_string(),
        rules: "Squad, TPP, no emulators.".to_string(),
        match_time: Utc::now() + Duration::hours(6),
        image_url: None,
    }
}

fn winner(user: &str, position: i64, prize: i64) -> WinnerEntry {
    WinnerEntry {
        user_id: user.to_string(),
        position,
        prize,
    }
}

#[tokio::test]
async fn test_admin_creates_and_lists_tournaments() {
    let (tournaments, _, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");

    let created = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .expect("Create failed");
    assert_eq!(created.status, TournamentStatus::Upcoming);
    assert_eq!(created.creator_id, None);

    let listed = tournaments.list().await.expect("List failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Friday Cup");

    let fetched = tournaments.get(created.id).await.expect("Get failed");
    assert_eq!(fetched.title, created.title);
}

#[tokio::test]
async fn test_player_cannot_create_or_delete() {
    let (tournaments, _, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");
    let player = Identity::player("player@example.com");

    let err = tournaments
        .create(&sample_details("Rogue Cup"), &player)
        .await
        .expect_err("Player create should fail");
    assert!(matches!(err, TournamentError::Forbidden));

    let created = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    let err = tournaments
        .delete(created.id, &player)
        .await
        .expect_err("Player delete should fail");
    assert!(matches!(err, TournamentError::Forbidden));

    tournaments
        .delete(created.id, &admin)
        .await
        .expect("Admin delete failed");
    assert!(matches!(
        tournaments.get(created.id).await.unwrap_err(),
        TournamentError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_join_is_idempotent() {
    let (tournaments, _, notifications) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");
    let user = "player@example.com";

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();

    tournaments.join(t.id, user).await.expect("Join failed");
    tournaments
        .join(t.id, user)
        .await
        .expect("Re-join should be a no-op, not an error");

    let participants = tournaments.participants(t.id).await.unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].user_id, user);
    assert!(tournaments.is_participant(t.id, user).await.unwrap());

    // Only the first join writes a confirmation.
    let inbox = notifications.list(user).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("Friday Cup"));
}

#[tokio::test]
async fn test_join_unknown_tournament_is_not_found() {
    let (tournaments, _, _) = setup_managers().await;
    let err = tournaments
        .join(404, "player@example.com")
        .await
        .expect_err("Joining a missing tournament should fail");
    assert!(matches!(err, TournamentError::NotFound(404)));
}

#[tokio::test]
async fn test_room_details_restricted_to_host() {
    let (tournaments, _, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");
    let player = Identity::player("player@example.com");

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    let room = RoomDetails {
        room_id: "558421".to_string(),
        room_pass: "arena".to_string(),
    };

    let err = tournaments
        .set_room_details(t.id, &room, &player)
        .await
        .expect_err("Non-host should be rejected");
    assert!(matches!(err, TournamentError::Forbidden));

    let updated = tournaments
        .set_room_details(t.id, &room, &admin)
        .await
        .expect("Admin should set room details");
    assert_eq!(updated.room_details, Some(room));
}

#[tokio::test]
async fn test_declare_winners_pays_and_completes() {
    let (tournaments, wallet, notifications) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    tournaments.join(t.id, "first@example.com").await.unwrap();
    tournaments.join(t.id, "second@example.com").await.unwrap();

    let winners = [
        winner("first@example.com", 1, 600),
        winner("second@example.com", 2, 400),
    ];
    tournaments
        .declare_winners(t.id, &winners, &admin)
        .await
        .expect("Declare failed");

    assert_eq!(wallet.balance("first@example.com").await.unwrap(), 600);
    assert_eq!(wallet.balance("second@example.com").await.unwrap(), 400);

    let t = tournaments.get(t.id).await.unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);

    let results = tournaments.results(t.id).await.unwrap();
    assert_eq!(results, winners.to_vec());

    // Join confirmation plus result message.
    let inbox = notifications.list("first@example.com").await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox[0].message.contains("Congratulations"));
}

#[tokio::test]
async fn test_declare_winners_is_one_shot() {
    let (tournaments, _, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    tournaments.join(t.id, "first@example.com").await.unwrap();

    let winners = [winner("first@example.com", 1, 500)];
    tournaments
        .declare_winners(t.id, &winners, &admin)
        .await
        .unwrap();

    let err = tournaments
        .declare_winners(t.id, &winners, &admin)
        .await
        .expect_err("Second declaration should fail");
    assert!(matches!(err, TournamentError::AlreadyCompleted(_)));
}

#[tokio::test]
async fn test_repeat_declaration_with_other_winners_pays_nobody() {
    let (tournaments, wallet, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    tournaments.join(t.id, "first@example.com").await.unwrap();
    tournaments.join(t.id, "second@example.com").await.unwrap();

    tournaments
        .declare_winners(t.id, &[winner("first@example.com", 1, 600)], &admin)
        .await
        .unwrap();

    // A second declaration naming a different winner must fail on the
    // completed status and leave no trace of a payout.
    let err = tournaments
        .declare_winners(t.id, &[winner("second@example.com", 1, 600)], &admin)
        .await
        .expect_err("Completed tournament must not accept another declaration");
    assert!(matches!(err, TournamentError::AlreadyCompleted(_)));

    assert_eq!(wallet.balance("second@example.com").await.unwrap(), 0);
    let results = tournaments.results(t.id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].user_id, "first@example.com");
}

#[tokio::test]
async fn test_declare_winners_rejects_overspend_and_outsiders() {
    let (tournaments, wallet, _) = setup_managers().await;
    let admin = Identity::admin("admin@example.com");

    let t = tournaments
        .create(&sample_details("Friday Cup"), &admin)
        .await
        .unwrap();
    tournaments.join(t.id, "first@example.com").await.unwrap();

    let overspend = [winner("first@example.com", 1, 1001)];
    let err = tournaments
        .declare_winners(t.id, &overspend, &admin)
        .await
        .expect_err("Prize above pool should fail");
    assert!(matches!(err, TournamentError::PrizePoolExceeded { .. }));

    let outsider = [winner("stranger@example.com", 1, 100)];
    let err = tournaments
        .declare_winners(t.id, &outsider, &admin)
        .await
        .expect_err("Non-participant winner should fail");
    assert!(matches!(err, TournamentError::NotParticipant(_)));

    // Failed declarations pay nobody.
    assert_eq!(wallet.balance("first@example.com").await.unwrap(), 0);
    assert_eq!(
        tournaments.get(t.id).await.unwrap().status,
        TournamentStatus::Upcoming
    );
}
