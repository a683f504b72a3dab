use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use futures_util::future::LocalBoxFuture;
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Owning-user identifier resolved from the API key. Every repository query
/// filters on this value; handlers receive it as an extractor.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

impl FromRequest for OwnerId {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<OwnerId>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Missing owner identity").into()),
        )
    }
}

/// API key authentication middleware.
///
/// Keys have the form `<key_id>.<secret>`. The key_id locates the record,
/// the secret is verified against its argon2 hash. On success the owner_id
/// is stored in request extensions for the OwnerId extractor.
pub struct ApiKeyAuth {
    pool: MySqlPool,
}

impl ApiKeyAuth {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    pool: MySqlPool,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            // Health check and index are public
            let path = req.path();
            if path == "/health" || path == "/" {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            let record = authenticate(&pool, api_key).await.map_err(Error::from)?;

            req.extensions_mut().insert(OwnerId(record.owner_id.clone()));
            req.extensions_mut().insert(record);

            svc.call(req).await
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKeyRecord {
    pub id: String,
    pub key_id: String,
    pub secret_hash: String,
    pub owner_id: String,
    pub is_active: bool,
}

async fn authenticate(pool: &MySqlPool, api_key: &str) -> crate::core::Result<ApiKeyRecord> {
    let (key_id, secret) = api_key
        .split_once('.')
        .ok_or_else(|| AppError::unauthorized("Malformed API key"))?;

    let record = sqlx::query_as::<_, ApiKeyRecord>(
        r#"
        SELECT id, key_id, secret_hash, owner_id, is_active
        FROM api_keys
        WHERE key_id = ? AND is_active = TRUE
        LIMIT 1
        "#,
    )
    .bind(key_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Database)?
    .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    if !verify_api_secret(secret, &record.secret_hash)? {
        return Err(AppError::unauthorized("Invalid API key"));
    }

    // Update last_used_at timestamp (fire and forget)
    let _ = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = ?")
        .bind(&record.id)
        .execute(pool)
        .await;

    Ok(record)
}

/// Hash an API key secret with argon2 for storage
pub fn hash_api_secret(secret: &str) -> crate::core::Result<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash API key: {}", e)))
}

/// Verify an API key secret against its stored argon2 hash
pub fn verify_api_secret(secret: &str, hash: &str) -> crate::core::Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}
