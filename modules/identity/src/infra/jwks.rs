//! JWT verification against a JSON Web Key Set.
//!
//! Keys come either from configuration (static, for tests and air-gapped
//! deployments) or from the provider's JWKS endpoint with a TTL cache.
//! A kid that is still unknown after one forced refresh is treated as
//! withdrawn and the credential as revoked.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::config::{AuthConfig, JwkKey, JwksSourceConfig};
use crate::domain::error::VerificationError;
use crate::domain::model::ExternalIdentity;
use crate::domain::verifier::{TokenVerifier, codes};

/// Claims the gateway cares about; everything else is validated and dropped.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<JwkKey>,
}

struct CachedKeys {
    keys: HashMap<String, JwkKey>,
    expires_at: Option<Instant>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifierBuildError {
    #[error("unsupported jwt algorithm `{0}`")]
    InvalidAlgorithm(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Process-scoped verifier. Built once at bootstrap and shared behind an
/// `Arc`; the key cache lives inside it, not in any global.
pub struct JwksVerifier {
    issuer: String,
    audience: Vec<String>,
    algorithms: Vec<Algorithm>,
    source: JwksSourceConfig,
    client: Option<reqwest::Client>,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksVerifier {
    /// Build a verifier from module configuration.
    ///
    /// # Errors
    ///
    /// Fails when an algorithm name is not a known JWT algorithm or when
    /// the HTTP client cannot be constructed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, VerifierBuildError> {
        let algorithms = config
            .algorithms
            .iter()
            .map(|alg| {
                Algorithm::from_str(alg)
                    .map_err(|_| VerifierBuildError::InvalidAlgorithm(alg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let client = match &config.jwks {
            JwksSourceConfig::Http { .. } => {
                Some(reqwest::Client::builder().use_rustls_tls().build()?)
            }
            JwksSourceConfig::Static { .. } => None,
        };

        Ok(Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            algorithms,
            source: config.jwks.clone(),
            client,
            cache: RwLock::new(None),
        })
    }

    async fn ensure_keys(&self, force: bool) -> Result<(), VerificationError> {
        let needs_refresh = force || {
            let guard = self.cache.read();
            match guard.as_ref() {
                Some(cached) => cached
                    .expires_at
                    .is_some_and(|expiry| expiry <= Instant::now()),
                None => true,
            }
        };
        if !needs_refresh {
            return Ok(());
        }

        let fresh = match &self.source {
            JwksSourceConfig::Static { keys } => CachedKeys {
                keys: keys.iter().map(|k| (k.kid.clone(), k.clone())).collect(),
                expires_at: None,
            },
            JwksSourceConfig::Http {
                url,
                cache_ttl_seconds,
            } => {
                let client = self.client.as_ref().ok_or_else(|| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, "http client not initialised")
                })?;
                let response = client.get(url).send().await.map_err(|err| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, format!("jwks fetch: {err}"))
                })?;
                if response.status() != reqwest::StatusCode::OK {
                    return Err(VerificationError::new(
                        codes::KEYS_UNAVAILABLE,
                        format!("jwks fetch status: {}", response.status()),
                    ));
                }
                let body: JwkSet = response.json().await.map_err(|err| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, format!("jwks decode: {err}"))
                })?;
                CachedKeys {
                    keys: body.keys.into_iter().map(|k| (k.kid.clone(), k)).collect(),
                    expires_at: Some(Instant::now() + Duration::from_secs(*cache_ttl_seconds)),
                }
            }
        };

        *self.cache.write() = Some(fresh);
        Ok(())
    }

    fn cached_key(&self, kid: &str) -> Option<JwkKey> {
        self.cache
            .read()
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
    }

    async fn key_for_kid(&self, kid: &str) -> Result<JwkKey, VerificationError> {
        self.ensure_keys(false).await?;
        if let Some(jwk) = self.cached_key(kid) {
            return Ok(jwk);
        }
        // One forced refresh covers provider key rotation.
        self.ensure_keys(true).await?;
        self.cached_key(kid).ok_or_else(|| {
            VerificationError::new(codes::REVOKED, format!("no jwk published for kid `{kid}`"))
        })
    }

    fn select_algorithm(
        &self,
        header_alg: Algorithm,
        jwk: &JwkKey,
    ) -> Result<Algorithm, VerificationError> {
        if !self.algorithms.contains(&header_alg) {
            return Err(VerificationError::new(
                codes::INVALID,
                format!("token algorithm {header_alg:?} not allowed"),
            ));
        }
        if let Some(alg) = jwk.alg.as_deref() {
            let published = Algorithm::from_str(alg).map_err(|_| {
                VerificationError::new(
                    codes::KEYS_UNAVAILABLE,
                    format!("unsupported jwk algorithm: {alg}"),
                )
            })?;
            if published != header_alg {
                return Err(VerificationError::new(
                    codes::INVALID,
                    "token algorithm does not match the published key",
                ));
            }
        }
        Ok(header_alg)
    }

    fn decoding_key(jwk: &JwkKey) -> Result<DecodingKey, VerificationError> {
        match jwk.kty.as_str() {
            "RSA" => {
                let n = jwk.n.as_deref().ok_or_else(|| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, "jwk rsa modulus missing")
                })?;
                let e = jwk.e.as_deref().ok_or_else(|| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, "jwk rsa exponent missing")
                })?;
                DecodingKey::from_rsa_components(n, e).map_err(|err| {
                    VerificationError::new(
                        codes::KEYS_UNAVAILABLE,
                        format!("bad rsa components: {err}"),
                    )
                })
            }
            "oct" => {
                let secret = jwk.k.as_deref().ok_or_else(|| {
                    VerificationError::new(codes::KEYS_UNAVAILABLE, "jwk secret missing")
                })?;
                let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
                    .decode(secret)
                    .map_err(|err| {
                        VerificationError::new(
                            codes::KEYS_UNAVAILABLE,
                            format!("jwk secret decode: {err}"),
                        )
                    })?;
                Ok(DecodingKey::from_secret(&bytes))
            }
            other => Err(VerificationError::new(
                codes::KEYS_UNAVAILABLE,
                format!("unsupported jwk key type: {other}"),
            )),
        }
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_required_spec_claims(&["exp", "iat"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        if self.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&self.audience);
        }
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity, VerificationError> {
        let header = jsonwebtoken::decode_header(credential).map_err(|err| {
            VerificationError::new(codes::MALFORMED, format!("invalid token header: {err}"))
        })?;
        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| VerificationError::new(codes::MALFORMED, "token header missing kid"))?;

        let jwk = self.key_for_kid(kid).await?;
        let alg = self.select_algorithm(header.alg, &jwk)?;
        let key = Self::decoding_key(&jwk)?;

        let data = jsonwebtoken::decode::<TokenClaims>(credential, &key, &self.validation(alg))
            .map_err(|err| map_decode_error(&err))?;

        if data.claims.sub.is_empty() {
            return Err(VerificationError::new(codes::INVALID, "empty sub claim"));
        }

        Ok(ExternalIdentity {
            external_id: data.claims.sub,
            email: data.claims.email,
            display_name: data.claims.name,
        })
    }
}

fn map_decode_error(err: &jsonwebtoken::errors::Error) -> VerificationError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => VerificationError::new(codes::EXPIRED, "token expired"),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            VerificationError::new(codes::MALFORMED, format!("token not decodable: {err}"))
        }
        _ => VerificationError::new(codes::INVALID, format!("token rejected: {err}")),
    }
}
