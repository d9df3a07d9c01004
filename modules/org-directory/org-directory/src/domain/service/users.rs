use std::collections::{HashMap, HashSet};

use org_directory_sdk::{
    BkUsername, DepartmentDetail, Page, TenantInfo, TenantUserInfo, UserListQuery, UserRef,
};
use tracing::{debug, info, instrument};

use super::{Service, check_batch};
use crate::domain::error::{DomainError, TENANT_USER};
use crate::domain::lookup::UserLookup;
use crate::domain::model::{DirectoryUser, DirectoryUserId, TenantUser};

pub(super) fn user_info(user: &TenantUser, directory: &DirectoryUser) -> TenantUserInfo {
    let phone = user.active_phone(directory);
    TenantUserInfo {
        bk_username: user.id.clone(),
        tenant_id: user.tenant_id.clone(),
        display_name: directory.full_name.clone(),
        language: user.language.clone(),
        time_zone: user.time_zone.clone(),
        phone: phone.number.clone(),
        phone_country_code: phone.country_code.clone(),
        email: user.active_email(directory).to_owned(),
    }
}

impl Service {
    /// Fetch directory users keyed by id.
    async fn directory_users(
        &self,
        ids: &[DirectoryUserId],
    ) -> Result<HashMap<DirectoryUserId, DirectoryUser>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self
            .directory
            .get_users(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    /// Join a tenant user with its directory user.
    ///
    /// A directory user that vanished concurrently makes the tenant user
    /// look missing.
    pub(super) async fn resolve_user(
        &self,
        user: TenantUser,
    ) -> Result<(TenantUser, DirectoryUser), DomainError> {
        let directory = self
            .directory
            .get_users(&[user.data_source_user_id])
            .await?
            .into_iter()
            .find(|d| d.id == user.data_source_user_id)
            .ok_or_else(|| DomainError::not_found(TENANT_USER, &user.id))?;
        Ok((user, directory))
    }

    /// Resolve a batch of handles in input order, dropping duplicates and
    /// handles that are unknown or live in another tenant.
    async fn resolve_batch(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<(TenantUser, DirectoryUser)>, DomainError> {
        let mut seen = HashSet::new();
        let requested: Vec<BkUsername> = bk_usernames
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        let mut users: HashMap<BkUsername, TenantUser> = self
            .tenants
            .get_users(&requested)
            .await?
            .into_iter()
            .filter(|u| u.tenant_id == tenant_id)
            .map(|u| (u.id.clone(), u))
            .collect();
        let directory_ids: Vec<DirectoryUserId> =
            users.values().map(|u| u.data_source_user_id).collect();
        let directory = self.directory_users(&directory_ids).await?;

        let resolved: Vec<(TenantUser, DirectoryUser)> = requested
            .iter()
            .filter_map(|name| {
                let user = users.remove(name)?;
                let dir = directory.get(&user.data_source_user_id)?.clone();
                Some((user, dir))
            })
            .collect();

        let dropped = requested.len() - resolved.len();
        if dropped > 0 {
            info!(dropped, "Skipped bk_usernames not found in tenant");
        }
        Ok(resolved)
    }

    /// Get a tenant user with the active contact values.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, bk_username = %bk_username))]
    pub async fn get_user(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<TenantUserInfo, DomainError> {
        let user = self.anchor_user(tenant_id, bk_username).await?;
        let (user, directory) = self.resolve_user(user).await?;
        Ok(user_info(&user, &directory))
    }

    /// List the departments a user directly belongs to.
    ///
    /// Ancestor chains are resolved for all memberships in one batch, so the
    /// number of store calls does not depend on the number of memberships.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    /// - `Unavailable` on store failure
    #[instrument(
        skip_all,
        fields(tenant_id = %tenant_id, bk_username = %bk_username, with_ancestors = with_ancestors)
    )]
    pub async fn list_user_departments(
        &self,
        tenant_id: &str,
        bk_username: &str,
        with_ancestors: bool,
    ) -> Result<Vec<DepartmentDetail>, DomainError> {
        let user = self.anchor_user(tenant_id, bk_username).await?;
        let memberships = self
            .directory
            .list_user_departments(user.data_source_user_id)
            .await?;
        let projected = self.project_departments(tenant_id, &memberships).await?;
        debug!(
            memberships = memberships.len(),
            projected = projected.len(),
            "Resolved user departments"
        );

        if !with_ancestors {
            return Ok(projected
                .into_iter()
                .map(|p| DepartmentDetail {
                    id: p.id,
                    name: p.name,
                    ancestors: None,
                })
                .collect());
        }

        let ids: Vec<_> = projected.iter().map(|p| p.directory_id).collect();
        let mut chains = self.ancestor_chains(tenant_id, &ids).await?;
        Ok(projected
            .into_iter()
            .map(|p| DepartmentDetail {
                ancestors: Some(chains.remove(&p.directory_id).unwrap_or_default()),
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    /// List a user's direct leaders.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist in the tenant
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, bk_username = %bk_username))]
    pub async fn list_user_leaders(
        &self,
        tenant_id: &str,
        bk_username: &str,
    ) -> Result<Vec<UserRef>, DomainError> {
        let user = self.anchor_user(tenant_id, bk_username).await?;
        let mut seen = HashSet::new();
        let leader_ids: Vec<DirectoryUserId> = self
            .directory
            .list_user_leaders(user.data_source_user_id)
            .await?
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        if leader_ids.is_empty() {
            return Ok(Vec::new());
        }

        let projections: HashMap<DirectoryUserId, TenantUser> = self
            .tenants
            .find_users(tenant_id, &leader_ids)
            .await?
            .into_iter()
            .filter(|u| u.tenant_id == tenant_id)
            .map(|u| (u.data_source_user_id, u))
            .collect();
        let directory = self.directory_users(&leader_ids).await?;

        Ok(leader_ids
            .iter()
            .filter_map(|id| {
                let leader = projections.get(id)?;
                let dir = directory.get(id)?;
                Some(UserRef {
                    bk_username: leader.id.clone(),
                    display_name: dir.full_name.clone(),
                })
            })
            .collect())
    }

    /// Filtered or fuzzy user listing, ordered by `bk_username`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for inconsistent, empty, or over-long lookup values,
    ///   or a malformed page request
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, lookup_field = ?query.lookup_field))]
    pub async fn list_users(
        &self,
        tenant_id: &str,
        query: &UserListQuery,
    ) -> Result<Page<TenantUserInfo>, DomainError> {
        let lookup = UserLookup::from_query(query, self.config.max_lookups)?;
        let window = self.window(query.page)?;
        debug!(
            filtered = lookup.is_some(),
            exact = lookup.as_ref().is_some_and(UserLookup::is_exact),
            "Listing users"
        );

        let mut users = self.tenants.list_users(tenant_id).await?;
        users.retain(|u| u.tenant_id == tenant_id);
        let ids: Vec<DirectoryUserId> = users.iter().map(|u| u.data_source_user_id).collect();
        let directory = self.directory_users(&ids).await?;

        let mut matched: Vec<TenantUserInfo> = users
            .iter()
            .filter_map(|u| directory.get(&u.data_source_user_id).map(|d| (u, d)))
            .filter(|(u, d)| lookup.as_ref().is_none_or(|l| l.matches(u, d)))
            .map(|(u, d)| user_info(u, d))
            .collect();
        matched.sort_by(|a, b| a.bk_username.cmp(&b.bk_username));

        Ok(window.apply(matched))
    }

    /// Batch display-name lookup, in input order.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the batch is empty or over the configured limit
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, count = bk_usernames.len()))]
    pub async fn list_user_display_names(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<UserRef>, DomainError> {
        let bk_usernames =
            check_batch("bk_usernames", bk_usernames, self.config.display_name_batch_limit)?;
        Ok(self
            .resolve_batch(tenant_id, &bk_usernames)
            .await?
            .into_iter()
            .map(|(user, dir)| UserRef {
                bk_username: user.id,
                display_name: dir.full_name,
            })
            .collect())
    }

    /// Batch user lookup, in input order.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the batch is empty or over the configured limit
    /// - `Unavailable` on store failure
    #[instrument(skip_all, fields(tenant_id = %tenant_id, count = bk_usernames.len()))]
    pub async fn list_users_by_usernames(
        &self,
        tenant_id: &str,
        bk_usernames: &[BkUsername],
    ) -> Result<Vec<TenantUserInfo>, DomainError> {
        let bk_usernames =
            check_batch("bk_usernames", bk_usernames, self.config.user_info_batch_limit)?;
        Ok(self
            .resolve_batch(tenant_id, &bk_usernames)
            .await?
            .iter()
            .map(|(user, dir)| user_info(user, dir))
            .collect())
    }

    /// List all tenants ordered by id.
    ///
    /// # Errors
    ///
    /// - `Unavailable` on store failure
    #[instrument(skip_all)]
    pub async fn list_tenants(&self) -> Result<Vec<TenantInfo>, DomainError> {
        let mut tenants = self.tenants.list_tenants().await?;
        tenants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tenants)
    }
}
