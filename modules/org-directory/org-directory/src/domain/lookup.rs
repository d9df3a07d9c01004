//! Typed user-listing filters.
//!
//! Each [`LookupField`] is paired with an extractor that yields the value a
//! tenant user is matched on. Phone and email extractors read the *active*
//! value, so inherited users match on the directory value and custom users on
//! their override.

use org_directory_sdk::{LookupField, UserListQuery};

use super::error::DomainError;
use super::model::{DirectoryUser, TenantUser};

type Extractor = for<'a> fn(&'a TenantUser, &'a DirectoryUser) -> &'a str;

fn bk_username<'a>(user: &'a TenantUser, _: &'a DirectoryUser) -> &'a str {
    &user.id
}

fn display_name<'a>(_: &'a TenantUser, directory: &'a DirectoryUser) -> &'a str {
    &directory.full_name
}

fn phone<'a>(user: &'a TenantUser, directory: &'a DirectoryUser) -> &'a str {
    &user.active_phone(directory).number
}

fn email<'a>(user: &'a TenantUser, directory: &'a DirectoryUser) -> &'a str {
    user.active_email(directory)
}

fn extractor(field: LookupField) -> Extractor {
    match field {
        LookupField::BkUsername => bk_username,
        LookupField::DisplayName => display_name,
        LookupField::Phone => phone,
        LookupField::Email => email,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Exact(Vec<String>),
    Fuzzy(Vec<String>),
}

/// A validated user filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLookup {
    field: LookupField,
    mode: Mode,
}

impl UserLookup {
    /// Build a filter from a listing query.
    ///
    /// Returns `Ok(None)` when the query carries no values, meaning the
    /// listing is unfiltered. Exact values take precedence; fuzzy values are
    /// then ignored entirely, including their validation.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when values are given without a field, or when the
    /// chosen value list is longer than `max_lookups` or empty once blanks
    /// are dropped.
    pub fn from_query(
        query: &UserListQuery,
        max_lookups: usize,
    ) -> Result<Option<Self>, DomainError> {
        let (name, values, exact) = match (&query.exact_lookups, &query.fuzzy_lookups) {
            (Some(values), _) => ("exact_lookups", values, true),
            (None, Some(values)) => ("fuzzy_lookups", values, false),
            (None, None) => return Ok(None),
        };

        let Some(field) = query.lookup_field else {
            return Err(DomainError::invalid_argument(format!(
                "{name} requires lookup_field"
            )));
        };

        if values.len() > max_lookups {
            return Err(DomainError::invalid_argument(format!(
                "{name} accepts at most {max_lookups} values, got {}",
                values.len()
            )));
        }
        let values = normalize(values);
        if values.is_empty() {
            return Err(DomainError::invalid_argument(format!(
                "{name} must not be empty"
            )));
        }

        let mode = if exact {
            Mode::Exact(values)
        } else {
            Mode::Fuzzy(values)
        };
        Ok(Some(Self { field, mode }))
    }

    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self.mode, Mode::Exact(_))
    }

    /// Whether the tenant user (joined with its directory user) passes the filter.
    #[must_use]
    pub fn matches(&self, user: &TenantUser, directory: &DirectoryUser) -> bool {
        let value = extractor(self.field)(user, directory);
        match &self.mode {
            Mode::Exact(values) => values.iter().any(|v| v == value),
            Mode::Fuzzy(values) => values.iter().any(|v| value.contains(v.as_str())),
        }
    }
}

fn normalize(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.to_owned());
        }
    }
    out
}
