//! Organization profile store

use async_trait::async_trait;

use crate::db::repository::OrganizationRepository;
use crate::db::DbError;
use crate::model::OrganizationProfile;
use crate::service::cache::ContextCache;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    Db(DbError),
}

/// Organization profile collaborator.
///
/// A missing profile is a value, not an error; only storage failures error.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn get_profile(
        &self,
        organization_id: &str,
    ) -> Result<Option<OrganizationProfile>, ProfileError>;
}

/// Profile store backed by the organization_profiles table, with an
/// optional read-through cache
pub struct DbOrganizationStore {
    repository: OrganizationRepository,
    cache: Option<ContextCache>,
}

impl DbOrganizationStore {
    pub fn new(repository: OrganizationRepository, cache: Option<ContextCache>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl OrganizationStore for DbOrganizationStore {
    async fn get_profile(
        &self,
        organization_id: &str,
    ) -> Result<Option<OrganizationProfile>, ProfileError> {
        if let Some(cache) = &self.cache {
            if let Ok(profile) = cache.get_profile::<OrganizationProfile>(organization_id).await {
                tracing::debug!(organization = %organization_id, "Profile cache hit");
                return Ok(Some(profile));
            }
        }

        let profile = match self.repository.get(organization_id).await {
            Ok(profile) => profile,
            Err(DbError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(ProfileError::Db(e)),
        };

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_profile(organization_id, &profile).await {
                tracing::warn!(error = %e, "Failed to cache organization profile");
            }
        }

        Ok(Some(profile))
    }
}
