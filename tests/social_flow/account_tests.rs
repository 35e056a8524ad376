use super::support::*;

#[tokio::test]
async fn signup_login_session_round_trip() {
    let store = MemoryStore::new();
    let sessions = SessionIssuer::new("test-secret", false);

    let alice = register_user(&store, "alice").await;
    let logged_in = auth::login(&store, "alice@example.com", "alice-password")
        .await
        .expect("login");
    assert_eq!(logged_in.id, alice.id);

    let token = sessions.issue(&alice.id).expect("issue");
    assert_eq!(sessions.authenticate(&token).expect("authenticate"), alice.id);
}

#[tokio::test]
async fn duplicate_registration_leaves_first_account_intact() {
    let store = MemoryStore::new();
    register_user(&store, "alice").await;

    let err = auth::register(
        &store,
        Registration {
            name: "Other Alice".into(),
            username: "alice2".into(),
            email: "alice@example.com".into(),
            password: "other-password".into(),
        },
        TEST_COST,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // The original credentials still work.
    auth::login(&store, "alice@example.com", "alice-password")
        .await
        .expect("original login");
}

#[tokio::test]
async fn stolen_token_survives_logout_until_expiry() {
    // Logout is client-side cookie clearing only; an issued token stays
    // valid until it expires.
    let store = MemoryStore::new();
    let sessions = SessionIssuer::new("test-secret", false);
    let alice = register_user(&store, "alice").await;

    let token = sessions.issue(&alice.id).expect("issue");
    let cleared = sessions.expired_cookie();
    assert!(cleared.value().is_empty());
    assert_eq!(sessions.authenticate(&token).expect("still valid"), alice.id);
}

#[tokio::test]
async fn follow_graph_stays_symmetric_across_toggles() {
    let store = MemoryStore::new();
    let alice = register_user(&store, "alice").await;
    let bob = register_user(&store, "bob").await;
    let carol = register_user(&store, "carol").await;

    relations::toggle_follow(&store, &alice.id, &bob.id).await.unwrap();
    relations::toggle_follow(&store, &alice.id, &carol.id).await.unwrap();
    relations::toggle_follow(&store, &bob.id, &carol.id).await.unwrap();
    relations::toggle_follow(&store, &alice.id, &bob.id).await.unwrap();

    assert_eq!(store.following(&alice.id).await.unwrap(), vec![carol.id.clone()]);
    assert_eq!(store.followers(&carol.id).await.unwrap().len(), 2);
    assert!(store.followers(&bob.id).await.unwrap().is_empty());
}
