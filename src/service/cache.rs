//! Redis cache service for profiles and generation outcomes

use std::env;

use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::model::ContextRequest;

// Environment variable names
const ENV_REDIS_HOST: &str = "MATURITY_INTEL_REDIS_HOST";
const ENV_REDIS_PORT: &str = "MATURITY_INTEL_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "MATURITY_INTEL_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "MATURITY_INTEL_REDIS_DB";
const ENV_CACHE_TTL: &str = "MATURITY_INTEL_CACHE_TTL";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";
const DEFAULT_TTL_SECONDS: u64 = 3600; // 1 hour

// TTL for generation outcomes (7 days in seconds); drafts are cheap to
// re-derive but expensive to regenerate
const GENERATION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

// Cache key prefixes
const PREFIX_PROFILE: &str = "profile:";
const PREFIX_GENERATION: &str = "generation:";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache miss for key: {0}")]
    Miss(String),
}

/// Redis-based cache for organization profiles and generation outcomes
#[derive(Clone)]
pub struct ContextCache {
    client: Client,
    ttl_seconds: u64,
}

impl ContextCache {
    /// Create a new cache instance and verify connection
    ///
    /// Configuration via environment variables:
    /// - `MATURITY_INTEL_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `MATURITY_INTEL_REDIS_PORT` - Redis port (default: 6379)
    /// - `MATURITY_INTEL_REDIS_PASSWORD` - Redis password (default: none)
    /// - `MATURITY_INTEL_REDIS_DB` - Redis database number (default: 0)
    /// - `MATURITY_INTEL_CACHE_TTL` - Cache TTL in seconds (default: 3600)
    pub async fn new() -> Result<Self, CacheError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        let ttl_seconds = env::var(ENV_CACHE_TTL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS);

        // Build Redis URL: redis://[password@]host:port/db
        let redis_url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let client = Client::open(redis_url)?;

        // Test the connection by pinging Redis
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    /// Get a cached organization profile
    pub async fn get_profile<T: DeserializeOwned>(
        &self,
        organization_id: &str,
    ) -> Result<T, CacheError> {
        self.get_with_prefix(PREFIX_PROFILE, organization_id).await
    }

    /// Cache an organization profile
    pub async fn set_profile<T: Serialize>(
        &self,
        organization_id: &str,
        profile: &T,
    ) -> Result<(), CacheError> {
        self.set_with_prefix(PREFIX_PROFILE, organization_id, profile, self.ttl_seconds)
            .await
    }

    /// Get a cached generation outcome for a request fingerprint
    pub async fn get_generation<T: DeserializeOwned>(
        &self,
        fingerprint: &str,
    ) -> Result<T, CacheError> {
        self.get_with_prefix(PREFIX_GENERATION, fingerprint).await
    }

    /// Cache a generation outcome by request fingerprint
    pub async fn set_generation<T: Serialize>(
        &self,
        fingerprint: &str,
        outcome: &T,
    ) -> Result<(), CacheError> {
        self.set_with_prefix(
            PREFIX_GENERATION,
            fingerprint,
            outcome,
            GENERATION_TTL_SECONDS,
        )
        .await
    }

    async fn get_with_prefix<T: DeserializeOwned>(
        &self,
        prefix: &str,
        key: &str,
    ) -> Result<T, CacheError> {
        let full_key = format!("{}{}", prefix, key);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let payload: Option<String> = conn.get(&full_key).await?;
        let payload = payload.ok_or_else(|| CacheError::Miss(full_key.clone()))?;

        serde_json::from_str(&payload).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    async fn set_with_prefix<T: Serialize>(
        &self,
        prefix: &str,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        let full_key = format!("{}{}", prefix, key);
        let payload =
            serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(&full_key, payload, ttl_seconds)
            .await?;

        tracing::debug!(key = %full_key, ttl = ttl_seconds, "Cached value");
        Ok(())
    }
}

/// Fingerprint a generation request for cache keying.
///
/// Every field that shapes classification, retrieval, or the composed
/// prompt is part of the key; requests that differ in any of them must
/// never share a cached draft.
pub fn generation_fingerprint(request: &ContextRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.organization_id.as_bytes());
    hasher.update([0]);
    hasher.update(request.prompt_text.as_bytes());
    hasher.update([0]);
    hasher.update(request.free_text_context.as_bytes());
    hasher.update([0]);
    if let Some(domain) = &request.current_domain {
        hasher.update(domain.as_bytes());
    }
    hasher.update([0]);
    hasher.update([request.allow_external_context as u8]);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> ContextRequest {
        ContextRequest {
            organization_id: "org-1".to_string(),
            prompt_text: prompt.to_string(),
            free_text_context: String::new(),
            current_domain: None,
            allow_external_context: true,
        }
    }

    #[test]
    fn test_fingerprint_varies_with_inputs() {
        let base = request("generate criteria");

        let mut with_domain = request("generate criteria");
        with_domain.current_domain = Some("Governance".to_string());

        let mut other_org = request("generate criteria");
        other_org.organization_id = "org-2".to_string();

        assert_ne!(generation_fingerprint(&base), generation_fingerprint(&with_domain));
        assert_ne!(generation_fingerprint(&base), generation_fingerprint(&other_org));
        assert_eq!(
            generation_fingerprint(&base),
            generation_fingerprint(&request("generate criteria"))
        );
    }

    #[test]
    fn test_fingerprint_varies_with_free_text_context() {
        let base = request("generate criteria");

        let mut with_context = request("generate criteria");
        with_context.free_text_context = "we operate in a regulated sector".to_string();

        assert_ne!(
            generation_fingerprint(&base),
            generation_fingerprint(&with_context)
        );
    }

    #[test]
    fn test_fingerprint_varies_with_external_context_flag() {
        let base = request("generate criteria");

        let mut no_external = request("generate criteria");
        no_external.allow_external_context = false;

        assert_ne!(
            generation_fingerprint(&base),
            generation_fingerprint(&no_external)
        );
    }
}
