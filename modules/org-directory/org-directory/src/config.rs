//! Configuration for the org directory module.

use serde::{Deserialize, Serialize};

/// Module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrgDirectoryConfig {
    /// Maximum number of exact or fuzzy values in one user listing.
    pub max_lookups: usize,

    /// Maximum number of handles in one display-name batch.
    pub display_name_batch_limit: usize,

    /// Maximum number of handles in one user-info batch.
    pub user_info_batch_limit: usize,

    /// Page size used when the caller does not pick one.
    pub default_page_size: usize,

    /// Largest page size a caller may request.
    pub max_page_size: usize,
}

impl Default for OrgDirectoryConfig {
    fn default() -> Self {
        Self {
            max_lookups: 100,
            display_name_batch_limit: 100,
            user_info_batch_limit: 100,
            default_page_size: 10,
            max_page_size: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OrgDirectoryConfig::default();
        assert_eq!(config.max_lookups, 100);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 1000);
    }

    #[test]
    fn test_config_applies_defaults() {
        let yaml = r"
max_lookups: 5
";
        let config: OrgDirectoryConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.max_lookups, 5);
        assert_eq!(config.display_name_batch_limit, 100);
        assert_eq!(config.user_info_batch_limit, 100);
    }

    #[test]
    fn test_config_reject_unknown_fields() {
        let yaml = r"
max_lookups: 5
lookup_limit: 10
";
        let result: Result<OrgDirectoryConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
