//! Configuration for credential verification.

use serde::{Deserialize, Serialize};

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_owned()]
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

/// Verifier configuration: token issuer, accepted audiences and the JWKS
/// source holding the provider's signing keys.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Expected `iss` claim.
    pub issuer: String,

    /// Accepted `aud` values. Empty disables audience validation.
    #[serde(default)]
    pub audience: Vec<String>,

    /// Where signing keys come from.
    pub jwks: JwksSourceConfig,

    /// Accepted signing algorithms, e.g. `["RS256"]`.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
}

/// JWKS source: keys inlined in configuration, or fetched from the
/// provider's JWKS endpoint and cached for a TTL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JwksSourceConfig {
    Static {
        keys: Vec<JwkKey>,
    },
    Http {
        url: String,
        #[serde(default = "default_cache_ttl_seconds")]
        cache_ttl_seconds: u64,
    },
}

/// A single JWK. Only the members needed to build a decoding key are
/// kept; unknown members from provider JWKS documents are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwkKey {
    pub kid: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub kty: String,
    /// RSA modulus (base64url).
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent (base64url).
    #[serde(default)]
    pub e: Option<String>,
    /// Symmetric key material (base64url), `oct` keys only.
    #[serde(default)]
    pub k: Option<String>,
}
