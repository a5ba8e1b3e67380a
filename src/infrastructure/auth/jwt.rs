//! JWT Token 适配器
//!
//! HS256 签发与校验。密钥与有效期来自进程级配置，启动时构建一次。
//! 过期与无效必须区分：守卫据此返回 TOKEN_EXPIRED / INVALID_TOKEN。

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::ports::{TokenClaims, TokenError, TokenIssuerPort};
use crate::config::AuthConfig;

/// JWT 载荷（编码用）
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    /// 用户 ID
    sub: i64,
    username: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// JWT Token 签发器
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 过期判定不留余量，确保 TOKEN_EXPIRED 语义精确
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    fn sign_with_exp(&self, claims: &TokenClaims, iat: i64, exp: i64) -> Result<String, TokenError> {
        let jwt_claims = JwtClaims {
            sub: claims.sub,
            username: claims.username.clone(),
            email: claims.email.clone(),
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &jwt_claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

impl TokenIssuerPort for JwtTokenIssuer {
    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        self.sign_with_exp(claims, now, now + self.ttl_secs as i64)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;

        Ok(TokenClaims {
            sub: data.claims.sub,
            username: data.claims.username,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> TokenClaims {
        TokenClaims {
            sub: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let token = issuer.sign(&claims()).unwrap();
        let decoded = issuer.verify(&token).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_expired_token() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let token = issuer
            .sign_with_exp(&claims(), now - 7200, now - 3600)
            .unwrap();
        assert!(matches!(
            issuer.verify(&token).unwrap_err(),
            TokenError::Expired
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        assert!(matches!(
            issuer.verify("not-a-token").unwrap_err(),
            TokenError::Invalid(_)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let other = JwtTokenIssuer::new("other-secret", 3600);
        let token = issuer.sign(&claims()).unwrap();
        assert!(matches!(
            other.verify(&token).unwrap_err(),
            TokenError::Invalid(_)
        ));
    }
}
