//! Tests for leaving sessions and membership state.

mod helpers;

use together_core::error::ErrorKind;
use together_core::types::SessionId;
use together_entity::membership::MembershipState;

#[tokio::test]
async fn test_leave_releases_seat() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.member("owner").await;
    let (_, guest) = app.member("guest").await;
    let session = app.session(&owner, 2).await;

    app.service.join_direct(&guest, session.id).await.expect("join");
    app.service.leave(&guest, session.id).await.expect("leave");

    assert_eq!(app.occupancy(&session).await, 0);
    let record = app
        .store
        .record(guest.member_id, session.id)
        .await
        .expect("record kept");
    assert!(record.joined);
    assert!(!record.active);
}

#[tokio::test]
async fn test_double_leave_is_a_no_op() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.member("owner").await;
    let (_, a) = app.member("a").await;
    let (_, b) = app.member("b").await;
    let session = app.session(&owner, 3).await;

    app.service.join_direct(&a, session.id).await.expect("a joins");
    app.service.join_direct(&b, session.id).await.expect("b joins");

    app.service.leave(&a, session.id).await.expect("first leave");
    app.service.leave(&a, session.id).await.expect("second leave");

    assert_eq!(app.occupancy(&session).await, 1);
}

#[tokio::test]
async fn test_leave_without_record_is_not_found() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.member("owner").await;
    let (_, stranger) = app.member("stranger").await;
    let session = app.session(&owner, 2).await;

    let err = app.service.leave(&stranger, session.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.occupancy(&session).await, 0);
}

#[tokio::test]
async fn test_leave_unknown_session_is_not_found() {
    let app = helpers::TestApp::new();
    let (_, guest) = app.member("guest").await;

    let err = app.service.leave(&guest, SessionId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_leave_never_drives_occupancy_negative() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.member("owner").await;
    let (_, guest) = app.member("guest").await;
    let session = app.session(&owner, 2).await;

    app.service.join_direct(&guest, session.id).await.expect("join");
    app.store
        .set_occupancy(session.id, 0)
        .await
        .expect("force drift");

    app.service.leave(&guest, session.id).await.expect("leave");
    assert_eq!(app.occupancy(&session).await, 0);
}

#[tokio::test]
async fn test_membership_state_follows_transitions() {
    let app = helpers::TestApp::new();
    let (owner, _) = app.member("owner").await;
    let (_, guest) = app.member("guest").await;
    let session = app.session(&owner, 2).await;

    let state = app
        .service
        .membership_state(&guest, session.id)
        .await
        .expect("state");
    assert_eq!(state, MembershipState::NonMember);

    app.service.join_direct(&guest, session.id).await.expect("join");
    let state = app
        .service
        .membership_state(&guest, session.id)
        .await
        .expect("state");
    assert_eq!(state, MembershipState::Active);

    app.service.leave(&guest, session.id).await.expect("leave");
    let state = app
        .service
        .membership_state(&guest, session.id)
        .await
        .expect("state");
    assert_eq!(state, MembershipState::Inactive);
}

#[tokio::test]
async fn test_membership_state_of_unknown_session_is_not_found() {
    let app = helpers::TestApp::new();
    let (_, guest) = app.member("guest").await;

    let err = app
        .service
        .membership_state(&guest, SessionId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
