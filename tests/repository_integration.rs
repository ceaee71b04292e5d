//! Integration tests for the MongoDB repository
//!
//! These tests verify that `MongoUserRepository` round-trips users through a
//! real server, including the unique phone index and partial updates.
//! They run only when `MONGODB_TEST_URL` is set; each test uses its own
//! throwaway database.

use chrono::{Duration, Utc};
use cooking_assistant_api::domain::inventory::InventoryItem;
use cooking_assistant_api::domain::repositories::{
    ProfileUpdate, RepositoryError, UserRepository,
};
use cooking_assistant_api::domain::user::{ChefPersonality, Email, PhoneNumber, User};
use cooking_assistant_api::infrastructure::database;
use cooking_assistant_api::infrastructure::repositories::MongoUserRepository;
use mongodb::Database;

/// Connect to a fresh database, or `None` when no test server is configured
async fn setup_test_db(name: &str) -> Option<Database> {
    let url = std::env::var("MONGODB_TEST_URL").ok()?;
    let db_name = format!(
        "cooking_assistant_test_{}_{}",
        name,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );

    Some(
        database::connect(&url, &db_name)
            .await
            .expect("Failed to connect to test database"),
    )
}

fn phone(raw: &str) -> PhoneNumber {
    PhoneNumber::parse(raw).unwrap()
}

#[tokio::test]
async fn test_create_and_find_user() {
    let Some(db) = setup_test_db("create").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let user = User::new(phone("+15550000001"), Utc::now());
    repo.create(&user).await.expect("user created");

    let by_phone = repo
        .find_by_phone(&user.phone_number)
        .await
        .unwrap()
        .expect("found by phone");
    assert_eq!(by_phone.user_id, user.user_id);
    assert!(by_phone.is_active);

    let by_id = repo.find_by_id(&user.user_id).await.unwrap();
    assert!(by_id.is_some());

    db.drop(None).await.ok();
}

#[tokio::test]
async fn test_duplicate_phone_rejected() {
    let Some(db) = setup_test_db("duplicate").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let first = User::new(phone("+15550000002"), Utc::now());
    repo.create(&first).await.unwrap();

    let mut second = User::new(phone("+15550000002"), Utc::now() + Duration::seconds(5));
    second.user_id = format!("{}_b", second.user_id);
    let result = repo.create(&second).await;
    assert!(matches!(result, Err(RepositoryError::Duplicate(_))));

    let user = repo.get_or_create(&first.phone_number).await.unwrap();
    assert_eq!(user.user_id, first.user_id);

    db.drop(None).await.ok();
}

#[tokio::test]
async fn test_shared_user_id_suffix_allowed() {
    let Some(db) = setup_test_db("shared_id").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let now = Utc::now();
    let first = User::new(phone("+15550001234"), now);
    let second = User::new(phone("+16660001234"), now);
    assert_eq!(first.user_id, second.user_id);

    repo.create(&first).await.expect("first user created");
    repo.create(&second).await.expect("second user created");

    let found = repo.get_or_create(&second.phone_number).await.unwrap();
    assert_eq!(found.phone_number.as_str(), "+16660001234");

    db.drop(None).await.ok();
}

#[tokio::test]
async fn test_partial_updates() {
    let Some(db) = setup_test_db("updates").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let user = User::new(phone("+15550000003"), Utc::now());
    repo.create(&user).await.unwrap();

    repo.update_profile(
        &user.user_id,
        &ProfileUpdate {
            name: Some("Ana".to_string()),
            email: Some(Email::new("ana@example.com").unwrap()),
            is_active: None,
        },
    )
    .await
    .unwrap();

    let mut preferences = user.preferences.clone();
    preferences.chef_personality = ChefPersonality::Informative;
    repo.update_preferences(&user.user_id, &preferences)
        .await
        .unwrap();

    let items = vec![
        InventoryItem::new("tomato", "2 kg"),
        InventoryItem::new("egg", "6 pieces"),
    ];
    repo.save_inventory(&user.user_id, &items, Utc::now())
        .await
        .unwrap();

    let mut with_history = user.clone();
    with_history.record_exchange("hi", "hello!", Utc::now(), 50);
    repo.save_conversation(&user.user_id, &with_history.conversation_history, Utc::now())
        .await
        .unwrap();

    let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Ana"));
    assert_eq!(stored.email.as_ref().map(|e| e.as_str()), Some("ana@example.com"));
    assert_eq!(
        stored.preferences.chef_personality,
        ChefPersonality::Informative
    );
    assert_eq!(stored.kitchen_inventory.ingredients, items);
    assert_eq!(stored.conversation_history.len(), 2);

    db.drop(None).await.ok();
}

#[tokio::test]
async fn test_missing_user_and_delete() {
    let Some(db) = setup_test_db("delete").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let result = repo
        .update_profile("USER_missing", &ProfileUpdate::default())
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));

    let user = User::new(phone("+15550000004"), Utc::now());
    repo.create(&user).await.unwrap();
    repo.delete(&user.user_id).await.unwrap();
    assert!(repo.find_by_id(&user.user_id).await.unwrap().is_none());
    assert!(matches!(
        repo.delete(&user.user_id).await,
        Err(RepositoryError::NotFound(_))
    ));

    db.drop(None).await.ok();
}

#[tokio::test]
async fn test_list_newest_first() {
    let Some(db) = setup_test_db("list").await else {
        return;
    };
    let repo = MongoUserRepository::new(&db);

    let now = Utc::now();
    for (i, offset) in [0i64, 10, 20].iter().enumerate() {
        let user = User::new(
            phone(&format!("+1555000010{}", i)),
            now + Duration::seconds(*offset),
        );
        repo.create(&user).await.unwrap();
    }

    let page = repo.list(2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].phone_number.as_str(), "+15550000102");
    assert_eq!(page[1].phone_number.as_str(), "+15550000101");

    let rest = repo.list(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);

    db.drop(None).await.ok();
}
