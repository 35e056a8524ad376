use super::support::*;

#[tokio::test]
async fn feeds_track_follow_state() {
    let store = MemoryStore::new();
    let sink = MemorySink::new();
    let alice = register_user(&store, "alice").await;
    let bob = register_user(&store, "bob").await;

    post_text(&store, &sink, &bob, "bob's tweet").await;

    let page = feed::following_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
    assert_eq!(page.count, 0);
    assert_eq!(page.total_pages, 0);

    relations::toggle_follow(&store, &alice.id, &bob.id).await.unwrap();
    let page = feed::following_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.tweets[0].description.as_deref(), Some("bob's tweet"));
}

#[tokio::test]
async fn deleted_tweet_disappears_from_feeds_but_not_bookmark_totals() {
    let store = MemoryStore::new();
    let sink = MemorySink::new();
    let alice = register_user(&store, "alice").await;

    let keeper = post_text(&store, &sink, &alice, "keeper").await;
    let doomed = post_text(&store, &sink, &alice, "doomed").await;
    relations::toggle_bookmark(&store, &alice.id, &keeper.id).await.unwrap();
    relations::toggle_bookmark(&store, &alice.id, &doomed.id).await.unwrap();

    content::delete_tweet(&store, &doomed.id).await.unwrap();

    let home = feed::home_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
    assert_eq!(home.count, 1);

    // The dangling bookmark entry still counts toward the total.
    let bookmarked = feed::bookmarked_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
    assert_eq!(bookmarked.count, 2);
    assert_eq!(bookmarked.tweets.len(), 1);
    assert_eq!(bookmarked.tweets[0].id, keeper.id);
}

#[tokio::test]
async fn likes_and_comments_ride_along_on_feed_reads() {
    let store = MemoryStore::new();
    let sink = MemorySink::new();
    let alice = register_user(&store, "alice").await;
    let bob = register_user(&store, "bob").await;
    let tweet = post_text(&store, &sink, &alice, "discuss").await;

    relations::toggle_like(&store, &bob.id, &tweet.id).await.unwrap();
    content::add_comment(&store, &bob.id, &tweet.id, "nice one").await.unwrap();

    let page = feed::author_feed(&store, &alice.id, PageQuery::default()).await.unwrap();
    assert_eq!(page.tweets[0].like, vec![bob.id.clone()]);
    assert_eq!(page.tweets[0].comments.len(), 1);
    assert_eq!(page.tweets[0].comments[0].text, "nice one");
}

#[tokio::test]
async fn author_snapshot_survives_profile_edits() {
    let store = MemoryStore::new();
    let sink = MemorySink::new();
    let alice = register_user(&store, "alice").await;
    let tweet = post_text(&store, &sink, &alice, "before rename").await;

    store
        .patch_account(
            &alice.id,
            &chirp::models::AccountPatch {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = store.tweet(&tweet.id).await.unwrap().unwrap();
    assert_eq!(stored.author.name, "ALICE");
}

#[tokio::test]
async fn pagination_walks_the_whole_timeline() {
    let store = MemoryStore::new();
    let sink = MemorySink::new();
    let alice = register_user(&store, "alice").await;
    for i in 0..25 {
        let mut tweet = chirp::models::Tweet::new(
            (&store.account(&alice.id).await.unwrap().unwrap()).into(),
            Some(format!("tweet {i}")),
            None,
            None,
        );
        tweet.created_at -= chrono::Duration::seconds(25 - i);
        store.insert_tweet(&tweet).await.unwrap();
    }

    let mut seen = Vec::new();
    for page_no in 1..=3 {
        let page = feed::author_feed(
            &store,
            &alice.id,
            PageQuery {
                page: Some(page_no),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.count, 25);
        seen.extend(page.tweets.into_iter().map(|t| t.id));
    }
    assert_eq!(seen.len(), 25);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 25, "no tweet repeats across pages");
}
