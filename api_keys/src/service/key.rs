use std::sync::Arc;

use base44::{
    dtos::key::NewApiKey,
    models::{
        key::{ApiKey, Environment, KeyStatus},
        user::User,
    },
    store::KeyBackend,
};
use chrono::Utc;
use common::error::{AppError, Res};
use log::info;

use crate::{
    dtos::key::CreateKeyRequest,
    service::{cache::KeyListCache, generator},
};

/// Newest keys first.
pub const LIST_ORDER: &str = "-created_date";

/// Retrieves the account's keys, newest first, from the shared cache when
/// it holds a fresh list for this account.
///
/// # Arguments
///
/// * `store` - The key entity backend.
/// * `cache` - The shared key list cache.
/// * `user` - The account owning the keys.
/// * `token` - The caller's session token.
pub async fn list_keys<S: KeyBackend>(
    store: &S,
    cache: &KeyListCache,
    user: &User,
    token: &str,
) -> Res<Arc<Vec<ApiKey>>> {
    if let Some(keys) = cache.get(&user.email, Utc::now()) {
        return Ok(keys);
    }
    let generation = cache.generation(&user.email);
    let keys = store.list_keys(token, LIST_ORDER).await?;
    Ok(cache.put(&user.email, generation, keys, Utc::now()))
}

/// Validates the request, generates the secret and stores a new active key.
///
/// The name is checked before the session so an empty form never reaches
/// the backend.
pub async fn create_key<S: KeyBackend>(
    store: &S,
    cache: &KeyListCache,
    user: &User,
    token: &str,
    req: CreateKeyRequest,
) -> Res<ApiKey> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Please enter a name for your API key".to_string(),
        ));
    }
    if !user.has_email() {
        return Err(AppError::Unauthenticated(
            "You must be logged in to create an API key".to_string(),
        ));
    }
    let environment = match req.environment.as_deref() {
        Some(env) => env.parse::<Environment>()?,
        None => Environment::Development,
    };

    let created = store
        .create_key(
            token,
            NewApiKey {
                name: name.to_string(),
                environment,
                key: generator::generate_key(environment, Utc::now()),
                status: KeyStatus::Active,
                calls_count: 0,
            },
        )
        .await;
    cache.invalidate(&user.email);

    let created = created?;
    info!("{} created {} key {}", user.email, environment, created.id);
    Ok(created)
}

/// Deletes a key. The backend does not promise idempotency: a second delete
/// of the same id surfaces as `NotFound`.
pub async fn delete_key<S: KeyBackend>(
    store: &S,
    cache: &KeyListCache,
    user: &User,
    token: &str,
    key_id: &str,
) -> Res<()> {
    let result = store.delete_key(token, key_id).await;
    // even a failed delete may mean our list is stale
    cache.invalidate(&user.email);
    result?;
    info!("{} deleted key {}", user.email, key_id);
    Ok(())
}

pub async fn find_key<S: KeyBackend>(
    store: &S,
    cache: &KeyListCache,
    user: &User,
    token: &str,
    key_id: &str,
) -> Res<ApiKey> {
    list_keys(store, cache, user, token)
        .await?
        .iter()
        .find(|key| key.id == key_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("API key {} not found", key_id)))
}
