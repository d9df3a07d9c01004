use std::sync::Arc;

use org_directory_sdk::{BkUsername, TokenIdentity, TokenUserInfo};
use tracing::{debug, instrument};

use super::Service;
use crate::domain::error::{DomainError, TENANT_USER};
use crate::domain::model::TenantUser;
use crate::domain::ports::TokenValidator;

impl Service {
    fn validator(&self) -> Result<&Arc<dyn TokenValidator>, DomainError> {
        self.token_validator
            .as_ref()
            .ok_or_else(|| DomainError::unavailable("no token validator configured"))
    }

    async fn token_owner(&self, bk_token: &str) -> Result<TenantUser, DomainError> {
        let validator = self.validator()?;
        if bk_token.trim().is_empty() {
            return Err(DomainError::invalid_argument("bk_token must not be empty"));
        }
        let bk_username: BkUsername = validator.validate(bk_token).await?;
        debug!(bk_username = %bk_username, "Token accepted");

        self.tenants
            .get_user(&bk_username)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANT_USER, bk_username))
    }

    /// Verify a login token and return the identity behind it.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if no validator is configured or the validator fails
    /// - `InvalidArgument` if the token is empty or rejected
    /// - `NotFound` if the token's user no longer exists
    #[instrument(skip_all)]
    pub async fn verify_token(&self, bk_token: &str) -> Result<TokenIdentity, DomainError> {
        let user = self.token_owner(bk_token).await?;
        Ok(TokenIdentity {
            bk_username: user.id,
            tenant_id: user.tenant_id,
        })
    }

    /// Verify a login token and return the basic profile behind it.
    ///
    /// # Errors
    ///
    /// Same as [`Service::verify_token`].
    #[instrument(skip_all)]
    pub async fn token_user_info(&self, bk_token: &str) -> Result<TokenUserInfo, DomainError> {
        let user = self.token_owner(bk_token).await?;
        let (user, directory) = self.resolve_user(user).await?;
        Ok(TokenUserInfo {
            bk_username: user.id,
            tenant_id: user.tenant_id,
            display_name: directory.full_name,
            language: user.language,
            time_zone: user.time_zone,
        })
    }
}
