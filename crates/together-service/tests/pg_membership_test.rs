//! Membership service over the PostgreSQL store.
//!
//! These tests need a scratch database; see `helpers::pg`.

mod helpers;

use together_core::error::ErrorKind;

use helpers::pg::PgTestApp;

#[tokio::test]
async fn test_pg_first_join_creates_record() {
    let Some(app) = PgTestApp::connect().await else {
        return;
    };
    let (_, owner) = app.member("owner").await;
    let (_, guest) = app.member("guest").await;
    let session = app.session(&owner, 2).await;

    let info = app
        .service
        .join_direct(&guest, session)
        .await
        .expect("join should succeed");

    assert_eq!(info.occupancy, 1);
    assert_eq!(info.available_seats, 1);
    assert_eq!(app.occupancy(session).await, 1);

    let record = app
        .record(guest.member_id, session)
        .await
        .expect("record committed");
    assert!(record.joined);
    assert!(record.active);
    assert_eq!(app.record_count(session).await, 1);
}

#[tokio::test]
async fn test_pg_capacity_rejection_leaves_no_row() {
    let Some(app) = PgTestApp::connect().await else {
        return;
    };
    let (_, owner) = app.member("owner").await;
    let (_, a) = app.member("a").await;
    let (_, b) = app.member("b").await;
    let session = app.session(&owner, 1).await;

    app.service.join_direct(&a, session).await.expect("a joins");
    let err = app.service.join_direct(&b, session).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(app.occupancy(session).await, 1);
    assert!(app.record(b.member_id, session).await.is_none());
    assert_eq!(app.record_count(session).await, 1);
}

#[tokio::test]
async fn test_pg_leave_and_rejoin_reuse_single_row() {
    let Some(app) = PgTestApp::connect().await else {
        return;
    };
    let (_, owner) = app.member("owner").await;
    let (_, a) = app.member("a").await;
    let (_, b) = app.member("b").await;
    let (_, c) = app.member("c").await;
    let session = app.session(&owner, 2).await;

    app.service.join_direct(&a, session).await.expect("a joins");
    app.service.join_direct(&b, session).await.expect("b joins");
    let first = app.record(a.member_id, session).await.expect("record");

    let err = app.service.join_direct(&c, session).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);

    app.service.leave(&a, session).await.expect("a leaves");
    assert_eq!(app.occupancy(session).await, 1);
    let left = app.record(a.member_id, session).await.expect("record kept");
    assert!(!left.active);
    assert!(left.joined);

    let code = app.stored_session(session).await.invite_code().to_string();
    let info = app
        .service
        .join_by_code(&a, &code)
        .await
        .expect("a rejoins by code");
    assert_eq!(info.occupancy, 2);

    let again = app.record(a.member_id, session).await.expect("record");
    assert_eq!(again.id, first.id);
    assert!(again.active);
    assert_eq!(app.occupancy(session).await, 2);
    assert_eq!(app.record_count(session).await, 2);
}

#[tokio::test]
async fn test_pg_leave_without_record_is_not_found() {
    let Some(app) = PgTestApp::connect().await else {
        return;
    };
    let (_, owner) = app.member("owner").await;
    let (_, guest) = app.member("guest").await;
    let session = app.session(&owner, 2).await;

    let err = app.service.leave(&guest, session).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.occupancy(session).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_concurrent_joins_admit_exactly_capacity() {
    let Some(app) = PgTestApp::connect().await else {
        return;
    };
    let (_, owner) = app.member("owner").await;
    let session = app.session(&owner, 3).await;

    let mut guests = Vec::new();
    for i in 0..8 {
        let (_, ctx) = app.member(&format!("guest-{i}")).await;
        guests.push(ctx);
    }

    let mut handles = Vec::new();
    for ctx in guests {
        let service = app.service.clone();
        handles.push(tokio::spawn(async move {
            service.join_direct(&ctx, session).await
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(err) => {
                assert_eq!(err.kind, ErrorKind::CapacityExceeded);
                rejected += 1;
            }
        }
    }

    assert_eq!(admitted, 3);
    assert_eq!(rejected, 5);
    assert_eq!(app.occupancy(session).await, 3);
    assert_eq!(app.record_count(session).await, 3);
}
