pub(crate) use chirp::{
    auth::{self, Registration, SessionIssuer},
    errors::Error,
    media::MemorySink,
    models::Account,
    service::{content, content::NewTweet, feed, feed::PageQuery, relations},
    store::{MemoryStore, Store},
};

pub(crate) const TEST_COST: u32 = 4;

pub(crate) async fn register_user(store: &MemoryStore, username: &str) -> Account {
    auth::register(
        store,
        Registration {
            name: username.to_uppercase(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: format!("{username}-password"),
        },
        TEST_COST,
    )
    .await
    .expect("register")
}

pub(crate) async fn post_text(store: &MemoryStore, sink: &MemorySink, author: &Account, text: &str) -> chirp::models::Tweet {
    content::create_tweet(
        store,
        sink,
        &author.id,
        NewTweet {
            description: Some(text.to_string()),
            media: None,
        },
    )
    .await
    .expect("create tweet")
}
