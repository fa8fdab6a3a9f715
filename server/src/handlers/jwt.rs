use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const TOKEN_COOKIE: &str = "jobtoken";
pub const TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn generate_token(
    user_id: i64,
    email: &str,
    secret: &str,
) -> jsonwebtoken::errors::Result<String> {
    let exp = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(
    token: &str,
    secret: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<Claims>> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_with_the_same_secret_only() {
        let token = generate_token(7, "ada@example.com", "s3cret").unwrap();

        let data = verify_token(&token, "s3cret").unwrap();
        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.email, "ada@example.com");

        assert!(verify_token(&token, "other").is_err());
    }
}
