#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for filtered and fuzzy user listing

mod common;

use common::{DEFAULT, PARTIAL, create_client, create_service, create_service_with_config};
use org_directory::OrgDirectoryConfig;
use org_directory_sdk::{LookupField, PageRequest, TenantUserInfo, UserListQuery};

fn usernames(items: &[TenantUserInfo]) -> Vec<&str> {
    items.iter().map(|u| u.bk_username.as_str()).collect()
}

#[tokio::test]
async fn test_unfiltered_listing_is_ordered_by_username() {
    let service = create_service();

    let page = service
        .list_users(DEFAULT, &UserListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(usernames(&page.items), vec!["freedom", "lisi", "zhangsan"]);
}

#[tokio::test]
async fn test_exact_username_lookup() {
    let service = create_service();

    let query = UserListQuery::exact(LookupField::BkUsername, ["zhangsan", "lisi", "partner"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["lisi", "zhangsan"]);
}

#[tokio::test]
async fn test_fuzzy_display_name_lookup() {
    let service = create_service();

    let query = UserListQuery::fuzzy(LookupField::DisplayName, ["San"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["zhangsan"]);
}

#[tokio::test]
async fn test_phone_matches_active_value() {
    let service = create_service();

    // freedom's directory phone is shadowed by a custom one.
    let query = UserListQuery::exact(LookupField::Phone, ["13512345673"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(page.count, 0);

    let query = UserListQuery::exact(LookupField::Phone, ["13900000000"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["freedom"]);
}

#[tokio::test]
async fn test_inherited_phone_lookup() {
    let service = create_service();

    let query = UserListQuery::exact(LookupField::Phone, ["13512345671"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["zhangsan"]);
}

#[tokio::test]
async fn test_phone_lookup_mixes_inherited_and_custom_values() {
    let service = create_service();

    // 13512345673 is freedom's shadowed directory phone and matches nobody.
    let query = UserListQuery::exact(
        LookupField::Phone,
        ["13512345671", "13900000000", "13512345673"],
    );
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["freedom", "zhangsan"]);
}

#[tokio::test]
async fn test_email_fuzzy_matches_active_value() {
    let service = create_service();

    let query = UserListQuery::fuzzy(LookupField::Email, ["@m.com"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["lisi", "zhangsan"]);

    let query = UserListQuery::fuzzy(LookupField::Email, ["corp"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["freedom"]);
}

#[tokio::test]
async fn test_exact_wins_over_fuzzy() {
    let service = create_service();

    let query = UserListQuery::exact(LookupField::BkUsername, ["lisi"]).with_fuzzy(["zhang"]);
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(usernames(&page.items), vec!["lisi"]);
}

#[tokio::test]
async fn test_lookup_validation() {
    let client = create_client(create_service_with_config(OrgDirectoryConfig {
        max_lookups: 2,
        ..OrgDirectoryConfig::default()
    }));

    let no_field = UserListQuery {
        fuzzy_lookups: Some(vec!["li".to_owned()]),
        ..UserListQuery::default()
    };
    let too_many = UserListQuery::exact(LookupField::BkUsername, ["a", "b", "c"]);
    let empty = UserListQuery::fuzzy(LookupField::Email, Vec::<String>::new());

    for query in [no_field, too_many, empty] {
        let err = client.list_users(DEFAULT, &query).await.unwrap_err();
        assert!(err.is_invalid_argument(), "{query:?}");
    }
}

#[tokio::test]
async fn test_lookup_limit_counts_duplicates() {
    let client = create_client(create_service_with_config(OrgDirectoryConfig {
        max_lookups: 2,
        ..OrgDirectoryConfig::default()
    }));

    let query = UserListQuery::exact(LookupField::BkUsername, ["lisi"; 50]);
    let err = client.list_users(DEFAULT, &query).await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_listing_is_repeatable() {
    let service = create_service();

    let query = UserListQuery::fuzzy(LookupField::Email, ["@"]).with_page(PageRequest::new(1, 2));
    let first = service.list_users(DEFAULT, &query).await.unwrap();
    let second = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_unknown_lookup_field_name_is_rejected() {
    let err = "nickname".parse::<LookupField>().unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!("display_name".parse::<LookupField>().unwrap(), LookupField::DisplayName);
}

#[tokio::test]
async fn test_listing_is_tenant_scoped_and_paginated() {
    let service = create_service();

    let page = service
        .list_users(PARTIAL, &UserListQuery::default())
        .await
        .unwrap();
    assert_eq!(usernames(&page.items), vec!["lisi_p", "wangwu"]);

    let query = UserListQuery::default().with_page(PageRequest::new(2, 2));
    let page = service.list_users(DEFAULT, &query).await.unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(usernames(&page.items), vec!["zhangsan"]);
}
