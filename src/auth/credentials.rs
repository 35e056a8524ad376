//! Registration and password verification.

use crate::{
    errors::{Error, Result},
    models::Account,
    store::Store,
    validators::{is_blank, is_valid_email},
};

/// Fields collected at sign-up.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Creates an account with a bcrypt-hashed password.
///
/// The store's unique indexes are the real guarantee against duplicates; the
/// lookup here only exists to produce the friendlier conflict message before
/// paying for the hash.
pub async fn register<S: Store>(store: &S, registration: Registration, bcrypt_cost: u32) -> Result<Account> {
    if is_blank(&registration.name)
        || is_blank(&registration.username)
        || is_blank(&registration.email)
        || is_blank(&registration.password)
    {
        return Err(Error::validation("all fields are required"));
    }
    if !is_valid_email(&registration.email) {
        return Err(Error::validation("invalid email address"));
    }
    if store.account_by_email(&registration.email).await?.is_some() {
        return Err(Error::Conflict("account"));
    }

    let password_hash = bcrypt::hash(&registration.password, bcrypt_cost)?;
    let account = Account::new(
        registration.name,
        registration.username,
        registration.email,
        password_hash,
    );
    store.insert_account(&account).await?;
    tracing::info!(account_id = %account.id, "account registered");
    Ok(account)
}

/// Looks up the account by email and verifies the password against its hash.
///
/// An unknown email reports `NotFound`; a wrong password reports the vaguer
/// `Unauthorized` so the response never confirms which part was wrong.
pub async fn login<S: Store>(store: &S, email: &str, password: &str) -> Result<Account> {
    if is_blank(email) || is_blank(password) {
        return Err(Error::validation("all fields are required"));
    }
    let account = store
        .account_by_email(email)
        .await?
        .ok_or(Error::not_found("account"))?;
    if !bcrypt::verify(password, &account.password_hash)? {
        return Err(Error::Unauthorized);
    }
    Ok(account)
}
