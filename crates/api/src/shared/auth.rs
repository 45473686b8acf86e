use crate::error::GiftingError;
use actix_web::{http::header, HttpRequest};
use gifting_domain::{User, ID};
use gifting_infra::GiftingContext;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Session issued by the auth service
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub exp: usize,      // Expiration time (as UTC timestamp)
    pub iat: usize,      // Issued at (as UTC timestamp)
    pub user_id: String, // Subject (whom token refers to)
    pub email: String,
    pub name: String,
}

fn parse_authtoken_header(token_header_value: &str) -> String {
    token_header_value
        .replace("Bearer", "")
        .replace("bearer", "")
        .trim()
        .to_string()
}

fn session_token(req: &HttpRequest, ctx: &GiftingContext) -> Option<String> {
    if let Some(cookie) = req.cookie(&ctx.config.session_cookie_name) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|token| token.to_str().ok())
        .map(parse_authtoken_header)
}

fn decode_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?
    .claims;
    Ok(claims)
}

/// Keeps the user store in line with the identity carried by the session
async fn create_user_if_not_exists(user: &User, ctx: &GiftingContext) -> anyhow::Result<()> {
    match ctx.repos.users.find(&user.id).await? {
        Some(stored) if stored == *user => Ok(()),
        Some(_) => ctx.repos.users.save(user).await,
        None => ctx.repos.users.insert(user).await,
    }
}

/// Resolves the `User` behind the session token of the request
pub async fn protect_route(req: &HttpRequest, ctx: &GiftingContext) -> Result<User, GiftingError> {
    let token = session_token(req, ctx).ok_or_else(|| {
        GiftingError::Unauthorized("Missing session token".into())
    })?;
    let claims = decode_token(&ctx.config.session_secret, &token).map_err(|e| {
        GiftingError::Unauthorized(format!("Invalid session token: {}", e))
    })?;
    let user_id = claims.user_id.parse::<ID>().map_err(|e| {
        GiftingError::Unauthorized(format!("Invalid user in session token: {}", e))
    })?;

    let user = User::new(user_id, claims.name, claims.email);
    create_user_if_not_exists(&user, ctx).await.map_err(|e| {
        error!("Unable to store the user {} of a session: {:?}", user.id, e);
        GiftingError::InternalError
    })?;

    Ok(user)
}
