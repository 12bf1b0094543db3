//! Transaction behaviour of the PostgreSQL membership store.
//!
//! Set `TOGETHER_TEST_DATABASE_URL` (or `DATABASE_URL`) to a scratch
//! database; without it these tests return early.

use std::time::{Duration, Instant};

use together_core::config::DatabaseConfig;
use together_database::repositories::MemberRepository;
use together_database::{
    DatabasePool, MembershipStore, PgMembershipStore, SessionStore, UnitOfWork,
};
use together_entity::member::{CreateMember, Member};
use together_entity::session::{CreateWatchSession, WatchSession};

async fn connect() -> Option<DatabasePool> {
    let Some(url) = std::env::var("TOGETHER_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
    else {
        eprintln!("TOGETHER_TEST_DATABASE_URL not set; skipping PostgreSQL test");
        return None;
    };
    let config = DatabaseConfig {
        url,
        pool_size: 4,
        min_idle: 1,
        acquire_timeout_seconds: 10,
        lock_timeout_ms: 10_000,
    };
    let db = DatabasePool::connect(&config)
        .await
        .expect("Failed to connect to test database");
    together_database::migration::run_migrations(db.pool())
        .await
        .expect("Failed to run migrations");
    Some(db)
}

async fn owner(db: &DatabasePool) -> Member {
    let mut conn = db.pool().acquire().await.expect("connection");
    MemberRepository::create(
        &mut conn,
        &CreateMember {
            display_name: "owner".to_string(),
        },
    )
    .await
    .expect("member created")
}

fn new_session(owner: &Member) -> WatchSession {
    CreateWatchSession {
        owner_id: owner.id,
        title: "Movie night".to_string(),
        capacity: 2,
        media_url: None,
    }
    .into_session()
}

#[tokio::test]
async fn test_rollback_discards_writes() {
    let Some(db) = connect().await else {
        return;
    };
    let store = PgMembershipStore::new(db.pool().clone());
    let session = new_session(&owner(&db).await);

    let mut uow = store.begin().await.expect("begin");
    uow.insert_session(&session).await.expect("insert");
    assert!(uow.session_by_id(session.id).await.expect("read").is_some());
    uow.rollback().await.expect("rollback");

    let mut check = store.begin().await.expect("begin");
    assert!(check.session_by_id(session.id).await.expect("read").is_none());
}

#[tokio::test]
async fn test_dropped_unit_discards_writes() {
    let Some(db) = connect().await else {
        return;
    };
    let store = PgMembershipStore::new(db.pool().clone());
    let session = new_session(&owner(&db).await);

    {
        let mut uow = store.begin().await.expect("begin");
        uow.insert_session(&session).await.expect("insert");
    }

    let mut check = store.begin().await.expect("begin");
    assert!(check.session_by_id(session.id).await.expect("read").is_none());
}

#[tokio::test]
async fn test_commit_makes_writes_visible() {
    let Some(db) = connect().await else {
        return;
    };
    let store = PgMembershipStore::new(db.pool().clone());
    let mut session = new_session(&owner(&db).await);

    let mut uow = store.begin().await.expect("begin");
    uow.insert_session(&session).await.expect("insert");
    session.admit();
    uow.save_session(&session).await.expect("save");
    uow.commit().await.expect("commit");
    assert!(uow.commit().await.is_err());

    let mut check = store.begin().await.expect("begin");
    let stored = check
        .session_by_id(session.id)
        .await
        .expect("read")
        .expect("committed");
    assert_eq!(stored.occupancy, 1);
    assert_eq!(stored.invite_code(), session.invite_code());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_locked_session_blocks_second_locker_until_commit() {
    let Some(db) = connect().await else {
        return;
    };
    let store = PgMembershipStore::new(db.pool().clone());
    let session = new_session(&owner(&db).await);

    let mut setup = store.begin().await.expect("begin");
    setup.insert_session(&session).await.expect("insert");
    setup.commit().await.expect("commit");

    let mut first = store.begin().await.expect("begin");
    first
        .lock_session_by_id(session.id)
        .await
        .expect("lock")
        .expect("session");

    let second_store = store.clone();
    let id = session.id;
    let waiter = tokio::spawn(async move {
        let mut second = second_store.begin().await.expect("begin");
        second.lock_session_by_id(id).await.expect("lock");
        let acquired = Instant::now();
        second.commit().await.expect("commit");
        acquired
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!waiter.is_finished());
    let released = Instant::now();
    first.commit().await.expect("commit");

    let acquired = waiter.await.expect("task");
    assert!(acquired >= released);
}
