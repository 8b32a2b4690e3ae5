use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use common::constants::{SESSION_COOKIE_NAME, TOKEN_EXPIRE_TIME};
use common::env::TOKEN_SECRET_KEY;
use common::error_code::BackendError;
use common::error_code::BackendError::Authorization;
use common::utils::time::now_millis;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Claims {
    user_id: String,
    iat: u64,
    exp: u64,
}

impl Claims {
    pub fn new(user_id: &str, iat: u64, exp: u64) -> Self {
        Self {
            user_id: user_id.to_owned(),
            iat,
            exp,
        }
    }
}

pub fn create_jwt(user_id: &str) -> Result<String, BackendError> {
    let iat = now_millis();
    let claims = Claims::new(user_id, iat, iat + TOKEN_EXPIRE_TIME);

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TOKEN_SECRET_KEY.as_bytes()),
    )
    .map_err(|err| BackendError::InternalError(err.to_string()))
}

fn validate_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(TOKEN_SECRET_KEY.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

pub fn validate_token(token: &str) -> Result<String, BackendError> {
    let claim_dat =
        validate_jwt(token).map_err(|_err| Authorization("Invalid token signature".to_string()))?;
    if now_millis() > claim_dat.exp {
        Err(Authorization("Token has expired.".to_string()))?
    } else {
        Ok(claim_dat.user_id)
    }
}

/// Account id bound to the session cookie of this request.
pub fn validate_credentials(req: &HttpRequest) -> Result<String, BackendError> {
    let cookie = req
        .cookie(SESSION_COOKIE_NAME)
        .ok_or(Authorization("Please login first".to_string()))?;
    if cookie.value().is_empty() {
        Err(Authorization("Please login first".to_string()))?;
    }
    validate_token(cookie.value())
}
