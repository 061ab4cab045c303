use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use uuid::Uuid;

use super::{Claims, Role};

pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn make_claims(user_id: &Uuid, role: Role, issued_at: DateTime<Utc>) -> Claims {
    let iat = issued_at.timestamp();
    Claims {
        user_id: *user_id,
        role,
        sub: user_id.to_string(),
        iat,
        nbf: iat,
        exp: iat + TOKEN_TTL_SECS,
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, JwtError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
}

/// Only HS256 is accepted, so a token whose header names another algorithm
/// fails before its signature is looked at.
pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, JwtError> {
    let data = decode::<Claims>(token, &keys.dec, &validation())?;
    let claims = data.claims;

    // The library treats `exp == now` as still valid; the token's lifetime is half-open.
    if claims.exp <= Utc::now().timestamp() {
        return Err(ErrorKind::ExpiredSignature.into());
    }

    if claims.sub != claims.user_id.to_string() {
        return Err(ErrorKind::InvalidSubject.into());
    }

    Ok(claims)
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "sub"]);
    validation
}
