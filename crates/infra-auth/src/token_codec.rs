// HMAC TokenCodec Implementation (JWT, HS256/384/512)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use taskdesk_core::error::{AppError, Result};
use taskdesk_core::port::{Claims, IssuedToken, TokenCodec};
use thiserror::Error;
use tracing::debug;

const TOKEN_TYPE: &str = "bearer";

/// Supported signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenAlgorithm {
    #[default]
    Hs256,
    Hs384,
    Hs512,
}

impl TokenAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAlgorithm::Hs256 => "HS256",
            TokenAlgorithm::Hs384 => "HS384",
            TokenAlgorithm::Hs512 => "HS512",
        }
    }

    fn jwt_algorithm(&self) -> Algorithm {
        match self {
            TokenAlgorithm::Hs256 => Algorithm::HS256,
            TokenAlgorithm::Hs384 => Algorithm::HS384,
            TokenAlgorithm::Hs512 => Algorithm::HS512,
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(TokenAlgorithm::Hs256),
            "HS384" => Ok(TokenAlgorithm::Hs384),
            "HS512" => Ok(TokenAlgorithm::Hs512),
            other => Err(format!(
                "unsupported token algorithm '{}' (expected HS256, HS384 or HS512)",
                other
            )),
        }
    }
}

#[derive(Debug, Error)]
enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token algorithm does not match {0}")]
    AlgorithmMismatch(TokenAlgorithm),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has no expiry")]
    MissingExpiry,

    #[error("token expired")]
    Expired,

    #[error("token lifetime overflows the calendar")]
    Lifetime,

    #[error("signing failed: {0}")]
    Key(String),
}

impl TokenError {
    fn from_jwt(err: jsonwebtoken::errors::Error, algorithm: TokenAlgorithm) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::AlgorithmMismatch(algorithm)
            }
            ErrorKind::MissingRequiredClaim(_) => TokenError::MissingExpiry,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Key(_) | TokenError::Lifetime => AppError::Internal(err.to_string()),
            other => AppError::Authentication(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    // Missing subject decodes to "" and is rejected by the auth service
    #[serde(default)]
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Stateless HMAC token codec.
///
/// Claims are `{sub, iat, exp}` in epoch seconds. Only the configured
/// algorithm is accepted on decode. Expiry is checked against the clock
/// handed to `decode`, so `exp == now` is still valid.
pub struct HmacTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: TokenAlgorithm,
    ttl: Duration,
}

impl HmacTokenCodec {
    pub fn new(secret: impl AsRef<[u8]>, algorithm: TokenAlgorithm, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            algorithm,
            ttl,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm.jwt_algorithm());
        validation.leeway = 0;
        // `exp` stays required; it is compared with the injected clock below
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation
    }

    fn sign(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> std::result::Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::Lifetime)?;
        let payload = Payload {
            sub: subject.to_string(),
            iat: Some(issued_at.timestamp()),
            exp: Some(expires_at.timestamp()),
        };

        jsonwebtoken::encode(
            &Header::new(self.algorithm.jwt_algorithm()),
            &payload,
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Key(e.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> std::result::Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Payload>(token, &self.decoding_key, &self.validation())
            .map_err(|e| TokenError::from_jwt(e, self.algorithm))?;
        let payload = data.claims;

        let exp = payload.exp.ok_or(TokenError::MissingExpiry)?;
        if exp < now.timestamp() {
            return Err(TokenError::Expired);
        }

        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(TokenError::MissingExpiry)?;
        let issued_at = payload
            .iat
            .and_then(|iat| DateTime::from_timestamp(iat, 0))
            .or_else(|| expires_at.checked_sub_signed(self.ttl))
            .unwrap_or(expires_at);

        Ok(Claims {
            subject: payload.sub,
            issued_at,
            expires_at,
        })
    }
}

impl TokenCodec for HmacTokenCodec {
    fn issue(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let token = self.sign(subject, issued_at)?;
        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        self.verify(token, now).map_err(|err| {
            debug!(error = %err, "Token rejected");
            AppError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn codec(algorithm: TokenAlgorithm) -> HmacTokenCodec {
        HmacTokenCodec::new("test-secret", algorithm, Duration::minutes(30))
    }

    #[test]
    fn test_issue_and_decode_each_algorithm() {
        for algorithm in [TokenAlgorithm::Hs256, TokenAlgorithm::Hs384, TokenAlgorithm::Hs512] {
            let codec = codec(algorithm);
            let issued = codec.issue("admin", issued_at()).unwrap();

            assert_eq!(issued.token_type, "bearer");
            assert_eq!(issued.expires_in, 1800);
            assert_eq!(issued.token.split('.').count(), 3);

            let claims = codec.decode(&issued.token, issued_at()).unwrap();
            assert_eq!(claims.subject, "admin");
            assert_eq!(claims.issued_at, issued_at());
            assert_eq!(claims.expires_at, issued_at() + Duration::minutes(30));
        }
    }

    #[test]
    fn test_header_names_algorithm() {
        let issued = codec(TokenAlgorithm::Hs384).issue("admin", issued_at()).unwrap();
        let header = issued.token.split('.').next().unwrap();
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();

        assert_eq!(header["alg"], "HS384");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec(TokenAlgorithm::Hs256);
        let issued = codec.issue("admin", issued_at()).unwrap();
        let exp = issued_at() + Duration::minutes(30);

        assert!(codec.decode(&issued.token, exp).is_ok());
        let err = codec
            .decode(&issued.token, exp + Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(ref m) if m.contains("expired")));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = codec(TokenAlgorithm::Hs256).issue("admin", issued_at()).unwrap();
        let other =
            HmacTokenCodec::new("other-secret", TokenAlgorithm::Hs256, Duration::minutes(30));

        let err = other.decode(&issued.token, issued_at()).unwrap_err();
        assert!(matches!(err, AppError::Authentication(ref m) if m.contains("signature")));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec(TokenAlgorithm::Hs256);
        let issued = codec.issue("admin", issued_at()).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"root","exp":99999999999}"#);
        let token = format!("{}.{}.{}", parts[0], forged, parts[2]);

        assert!(matches!(
            codec.decode(&token, issued_at()).unwrap_err(),
            AppError::Authentication(_)
        ));
    }

    #[test]
    fn test_algorithm_mismatch_and_none_are_rejected() {
        let issued = codec(TokenAlgorithm::Hs512).issue("admin", issued_at()).unwrap();
        assert!(codec(TokenAlgorithm::Hs256)
            .decode(&issued.token, issued_at())
            .is_err());

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"admin","exp":99999999999}"#);
        let unsigned = format!("{}.{}.", header, payload);
        assert!(codec(TokenAlgorithm::Hs256)
            .decode(&unsigned, issued_at())
            .is_err());
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec(TokenAlgorithm::Hs256);
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            let err = codec.decode(token, issued_at()).unwrap_err();
            assert!(matches!(err, AppError::Authentication(_)), "token {:?}", token);
        }
    }

    #[test]
    fn test_missing_subject_decodes_empty() {
        let codec = codec(TokenAlgorithm::Hs256);
        let issued = codec.issue("", issued_at()).unwrap();
        assert_eq!(codec.decode(&issued.token, issued_at()).unwrap().subject, "");
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("HS256".parse::<TokenAlgorithm>().unwrap(), TokenAlgorithm::Hs256);
        assert_eq!("hs512".parse::<TokenAlgorithm>().unwrap(), TokenAlgorithm::Hs512);
        assert!("RS256".parse::<TokenAlgorithm>().is_err());
        assert!("none".parse::<TokenAlgorithm>().is_err());
    }

    #[test]
    fn test_missing_expiry_is_rejected() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"sub": "admin"}),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            codec(TokenAlgorithm::Hs256).decode(&token, issued_at()),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_oversized_lifetime_is_an_internal_error() {
        let codec = HmacTokenCodec::new(
            "test-secret",
            TokenAlgorithm::Hs256,
            Duration::minutes(1_000_000_000_000),
        );

        let err = codec.issue("admin", Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("lifetime")));
    }
}
