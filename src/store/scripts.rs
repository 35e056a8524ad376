use redis::Script;
use std::sync::LazyLock;

pub static CREATE_ACCOUNT_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/create_account.lua")));
pub static PATCH_ACCOUNT_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/patch_account.lua")));
pub static TOGGLE_FOLLOW_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/toggle_follow.lua")));
pub static TOGGLE_LIKE_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/toggle_like.lua")));
pub static TOGGLE_BOOKMARK_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/toggle_bookmark.lua")));
pub static ADD_COMMENT_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/add_comment.lua")));
pub static REMOVE_COMMENT_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/remove_comment.lua")));
pub static REMOVE_TWEET_SCRIPT: LazyLock<Script> =
    LazyLock::new(|| Script::new(include_str!("../../lua/remove_tweet.lua")));
