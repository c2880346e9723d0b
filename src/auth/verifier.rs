// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims verifier.
//!
//! Checks, in order: structure, HS256 signature, issuer and audience, then
//! expiry. Expiry is evaluated here rather than by `jsonwebtoken` so the
//! boundary is exact (`now < exp`, no leeway) and testable with a fixed clock.

use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, Validation};

use super::{claims::Claims, keys::SigningKeys, AuthError};
use crate::config::TOKEN_AUDIENCE;

#[derive(Clone)]
pub struct ClaimsVerifier {
    keys: SigningKeys,
    validation: Validation,
}

impl ClaimsVerifier {
    pub fn new(keys: SigningKeys, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self { keys, validation }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as of `now` (seconds since epoch).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, self.keys.decoding(), &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::MalformedToken,
            },
        )?;

        if data.claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for ClaimsVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsVerifier")
            .field("iss", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issuer::ClaimsIssuer;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";
    const ISSUER: &str = "jobportal project";

    fn pair(secret: &[u8]) -> (ClaimsIssuer, ClaimsVerifier) {
        let keys = SigningKeys::from_secret(secret).unwrap();
        (
            ClaimsIssuer::new(keys.clone(), ISSUER),
            ClaimsVerifier::new(keys, ISSUER),
        )
    }

    #[test]
    fn mint_and_verify() {
        let (issuer, verifier) = pair(SECRET);
        let signed = issuer.issue(1, Utc::now()).unwrap();

        let claims = verifier.verify(&signed.token).unwrap();
        assert_eq!(claims, signed.claims);
        assert_eq!(claims.user_id(), Some(1));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (issuer, verifier) = pair(SECRET);
        let issued_at = Utc::now() - Duration::minutes(61);
        let signed = issuer.issue(1, issued_at).unwrap();

        assert_eq!(verifier.verify(&signed.token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn expiry_is_exclusive() {
        let (issuer, verifier) = pair(SECRET);
        let signed = issuer.issue(1, Utc::now()).unwrap();
        let exp = signed.claims.exp;

        assert!(verifier.verify_at(&signed.token, exp - 1).is_ok());
        assert_eq!(
            verifier.verify_at(&signed.token, exp),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn bad_signature_is_rejected() {
        let (issuer_a, _) = pair(b"secret-A");
        let (_, verifier_b) = pair(b"secret-B");
        let signed = issuer_a.issue(1, Utc::now()).unwrap();

        assert_eq!(
            verifier_b.verify(&signed.token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn expired_and_mis_signed_is_still_rejected() {
        let (issuer_a, _) = pair(b"secret-A");
        let (_, verifier_b) = pair(b"secret-B");
        let signed = issuer_a
            .issue(1, Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(verifier_b.verify(&signed.token).is_err());
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let (issuer, verifier) = pair(SECRET);
        let signed = issuer.issue(1, Utc::now()).unwrap();

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = signed.token.split('.').nth(1).unwrap();
        let forged = format!("{header}.{payload}.");

        assert!(verifier.verify(&forged).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let (issuer, verifier) = pair(SECRET);
        let signed = issuer.issue(1, Utc::now()).unwrap();

        let mut parts: Vec<&str> = signed.token.split('.').collect();
        let mut claims = signed.claims.clone();
        claims.sub = "2".into();
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        parts[1] = &payload;

        assert_eq!(
            verifier.verify(&parts.join(".")),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn malformed_token_is_rejected() {
        let (_, verifier) = pair(SECRET);
        assert_eq!(verifier.verify("not-a-jwt"), Err(AuthError::MalformedToken));
        assert!(verifier.verify("").is_err());
    }

    #[test]
    fn wrong_issuer_or_audience_is_rejected() {
        let (_, verifier) = pair(SECRET);
        let now = Utc::now().timestamp();
        let key = EncodingKey::from_secret(SECRET);

        let foreign_issuer = Claims {
            iss: "someone else".into(),
            sub: "1".into(),
            aud: vec!["companies".into()],
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &foreign_issuer, &key).unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidIssuer));

        let foreign_audience = Claims {
            iss: ISSUER.into(),
            aud: vec!["wallets".into()],
            ..foreign_issuer
        };
        let token = encode(&Header::default(), &foreign_audience, &key).unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidAudience));
    }
}
