use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Session token signing and verification keys, derived from the process secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::days(cfg.ttl_days),
        }
    }

    pub fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        self.sign_issued_at(user_id, email, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_issued_at(
        &self,
        user_id: Uuid,
        email: &str,
        issued_at: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let exp = issued_at + self.ttl;
        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: issued_at.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry, with no clock leeway.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            ttl_days: 90,
        })
    }

    #[test]
    fn sign_and_verify_round_trips_identity() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "x@example.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, "x@example.com");
    }

    #[test]
    fn token_lives_ninety_days() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(Uuid::new_v4(), "x@example.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.exp - claims.iat, 90 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc() - Duration::days(91);
        let token = keys
            .sign_issued_at(Uuid::new_v4(), "x@example.com", issued)
            .expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_accepts_token_just_before_expiry() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc() - Duration::days(89);
        let token = keys
            .sign_issued_at(Uuid::new_v4(), "x@example.com", issued)
            .expect("sign");
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = make_keys("secret-a")
            .sign(Uuid::new_v4(), "x@example.com")
            .expect("sign");
        assert!(make_keys("secret-b").verify(&token).is_err());
    }

    #[test]
    fn payload_uses_underscore_id() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "x@example.com").expect("sign");
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(b""), &validation)
            .expect("decode");
        assert_eq!(raw.claims["_id"], user_id.to_string());
        assert_eq!(raw.claims["email"], "x@example.com");
    }
}
