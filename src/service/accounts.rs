//! Account directory: profile reads and profile edits.

use crate::{
    errors::{Error, Result},
    media::{MediaSink, Upload},
    models::{Account, AccountPatch, Profile, BIO_MAX_CHARS},
    store::Store,
    validators::is_valid_email,
};

/// A profile edit as submitted by the owner. Text fields and image uploads
/// are all optional; whatever is absent stays untouched.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<Upload>,
    pub banner: Option<Upload>,
}

async fn hydrate_profile<S: Store>(store: &S, account: Account) -> Result<Profile> {
    let followers = store.followers(&account.id).await?;
    let following = store.following(&account.id).await?;
    let bookmarks = store.bookmarks(&account.id).await?;
    Ok(Profile::from_account(account, followers, following, bookmarks))
}

/// Reads an account's full profile, relationship state included.
pub async fn profile<S: Store>(store: &S, account_id: &str) -> Result<Profile> {
    let account = store.account(account_id).await?.ok_or(Error::not_found("account"))?;
    hydrate_profile(store, account).await
}

/// Every profile except the caller's own, for the who-to-follow listing.
pub async fn list_others<S: Store>(store: &S, caller_id: &str) -> Result<Vec<Profile>> {
    let accounts = store.accounts_except(caller_id).await?;
    let mut profiles = Vec::with_capacity(accounts.len());
    for account in accounts {
        profiles.push(hydrate_profile(store, account).await?);
    }
    Ok(profiles)
}

/// Applies a profile edit. Image uploads go to the sink first so a sink
/// failure leaves the account record unchanged.
pub async fn update_profile<S: Store, M: MediaSink>(
    store: &S,
    sink: &M,
    caller_id: &str,
    update: ProfileUpdate,
) -> Result<Profile> {
    if let Some(bio) = &update.bio
        && bio.chars().count() > BIO_MAX_CHARS
    {
        return Err(Error::validation(format!("bio must be at most {BIO_MAX_CHARS} characters")));
    }
    if let Some(email) = &update.email
        && !is_valid_email(email)
    {
        return Err(Error::validation("invalid email address"));
    }

    let avatar = match update.avatar {
        Some(upload) => Some(sink.upload(upload).await?),
        None => None,
    };
    let banner = match update.banner {
        Some(upload) => Some(sink.upload(upload).await?),
        None => None,
    };

    let patch = AccountPatch {
        name: update.name,
        username: update.username,
        email: update.email,
        bio: update.bio,
        avatar,
        banner,
    };
    let account = if patch.is_empty() {
        store.account(caller_id).await?.ok_or(Error::not_found("account"))?
    } else {
        store.patch_account(caller_id, &patch).await?
    };
    hydrate_profile(store, account).await
}
