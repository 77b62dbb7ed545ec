//! End-to-end behaviour of SocialService over the in-memory store

use std::sync::Arc;

use chrono::{Duration, Utc};
use socialctl_core::{
    ErrorKind, MemoryStore, Person, PersonId, PersonInput, SocialError, SocialService,
};

fn setup() -> (SocialService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (SocialService::new(store.clone(), store.clone()), store)
}

fn names(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.name.as_str()).collect()
}

async fn register(svc: &SocialService, input: PersonInput) -> Person {
    svc.register_person(input).await.expect("register failed")
}

// === Registration ===

#[tokio::test]
async fn test_patch_preserves_unsupplied_fields() {
    let (svc, _) = setup();
    let original = register(
        &svc,
        PersonInput::named("Alice")
            .with_id("alice")
            .with_city("Lima")
            .with_age(31)
            .with_hobby("chess"),
    )
    .await;

    let updated = register(&svc, PersonInput::named("Alice").with_id("alice").with_age(32)).await;

    assert_eq!(updated.city.as_deref(), Some("Lima"));
    assert_eq!(updated.hobby.as_deref(), Some("chess"));
    assert_eq!(updated.age, Some(32));
    assert_eq!(updated.created_at, original.created_at);

    let stored = svc
        .find_person(&PersonId::new("alice").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_duplicate_name_conflicts_case_insensitively() {
    let (svc, _) = setup();
    register(&svc, PersonInput::named("Alice")).await;

    let err = svc
        .register_person(PersonInput::named("ALICE"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(svc.list_people(None).await.unwrap().len(), 1);
}

// === Friendships ===

#[tokio::test]
async fn test_add_friend_is_symmetric_and_idempotent() {
    let (svc, store) = setup();
    let a = register(&svc, PersonInput::named("Alice")).await;
    let b = register(&svc, PersonInput::named("Bob")).await;

    svc.add_friend(&a.id, &b.id).await.unwrap();
    svc.add_friend(&a.id, &b.id).await.unwrap();

    assert_eq!(names(&svc.list_friends(&a.id).await.unwrap()), vec!["Bob"]);
    assert_eq!(names(&svc.list_friends(&b.id).await.unwrap()), vec!["Alice"]);
    assert_eq!(store.edge_count().await, 2);
}

#[tokio::test]
async fn test_remove_friend_clears_both_sides() {
    let (svc, _) = setup();
    svc.register_person(PersonInput::named("Alice")).await.unwrap();
    svc.register_person(PersonInput::named("Bob")).await.unwrap();

    svc.add_friend_by_name("alice", "bob").await.unwrap();
    assert!(svc.remove_friend_by_name("Bob", "Alice").await.unwrap());

    assert!(svc.list_friends_by_name("Alice").await.unwrap().is_empty());
    assert!(svc.list_friends_by_name("Bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_self_friendship_rejected() {
    let (svc, store) = setup();
    let a = register(&svc, PersonInput::named("Alice")).await;

    let err = svc.add_friend(&a.id, &a.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = svc.add_friend_by_name("Alice", "alice").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(store.edge_count().await, 0);
}

#[tokio::test]
async fn test_remove_self_friendship_rejected() {
    let (svc, _) = setup();
    let a = register(&svc, PersonInput::named("Alice")).await;

    let err = svc.remove_friend(&a.id, &a.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = svc.remove_friend_by_name("alice", "ALICE").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_unknown_names_are_not_found() {
    let (svc, _) = setup();
    register(&svc, PersonInput::named("Alice")).await;

    let err = svc.add_friend_by_name("Alice", "Zed").await.unwrap_err();
    assert!(matches!(err, SocialError::NotFound { ref key, .. } if key == "Zed"));

    let err = svc.city_recommendations("Nobody").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_add_friend_by_id_requires_both_endpoints() {
    let (svc, _) = setup();
    let a = register(&svc, PersonInput::named("Alice")).await;
    let ghost = PersonId::new("ghost").unwrap();

    let err = svc.add_friend(&a.id, &ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// === Deletion ===

#[tokio::test]
async fn test_delete_cascades_to_friend_lists() {
    let (svc, _) = setup();
    let a = register(&svc, PersonInput::named("Alice")).await;
    let b = register(&svc, PersonInput::named("Bob")).await;
    let c = register(&svc, PersonInput::named("Carol")).await;
    svc.add_friend(&a.id, &b.id).await.unwrap();
    svc.add_friend(&c.id, &b.id).await.unwrap();

    let deleted = svc.delete_person_by_name("alice").await.unwrap();
    assert_eq!(deleted.id, a.id);

    assert_eq!(names(&svc.list_people(None).await.unwrap()), vec!["Bob", "Carol"]);
    assert_eq!(names(&svc.list_friends(&b.id).await.unwrap()), vec!["Carol"]);
}

#[tokio::test]
async fn test_delete_unknown_person_is_not_found() {
    let (svc, _) = setup();
    let err = svc
        .delete_person(&PersonId::new("missing").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = svc.delete_person_by_name("Missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// === Recommendations ===

#[tokio::test]
async fn test_city_recommendations_lima_quito() {
    let (svc, _) = setup();
    register(&svc, PersonInput::named("Alice").with_city("Lima")).await;
    register(&svc, PersonInput::named("Bob").with_city("Lima")).await;
    register(&svc, PersonInput::named("Carol").with_city("Quito")).await;
    svc.add_friend_by_name("Alice", "Bob").await.unwrap();

    assert!(svc.city_recommendations("Alice").await.unwrap().is_empty());
    assert!(svc.city_recommendations("Carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_exclude_self_and_friends_only() {
    let (svc, _) = setup();
    register(&svc, PersonInput::named("Alice").with_city("Lima").with_hobby("chess")).await;
    register(&svc, PersonInput::named("Bob").with_city("Lima").with_hobby("chess")).await;
    register(&svc, PersonInput::named("Dora").with_city("Lima").with_hobby("go")).await;
    register(&svc, PersonInput::named("Carl").with_city("Lima").with_hobby("chess")).await;
    register(&svc, PersonInput::named("Eve").with_city("Cusco").with_hobby("chess")).await;
    svc.add_friend_by_name("Alice", "Bob").await.unwrap();

    let city = svc.city_recommendations("Alice").await.unwrap();
    assert_eq!(names(&city), vec!["Carl", "Dora"]);

    let hobby = svc.hobby_recommendations("Alice").await.unwrap();
    assert_eq!(names(&hobby), vec!["Carl", "Eve"]);
}

// === Statistics ===

#[tokio::test]
async fn test_statistics_without_relationships() {
    let (svc, _) = setup();
    for name in ["A", "B", "C"] {
        register(&svc, PersonInput::named(name)).await;
    }

    let stats = svc.statistics().await.unwrap();
    assert_eq!(stats.total_people, 3);
    assert_eq!(stats.total_relationships, 0);
    assert_eq!(stats.average_friends, 0.0);
    let top = stats.most_connected.expect("people exist");
    assert_eq!(top.friend_count, 0);
    assert_eq!(top.name, "A");
}

#[tokio::test]
async fn test_statistics_on_empty_graph() {
    let (svc, _) = setup();
    let stats = svc.statistics().await.unwrap();
    assert_eq!(stats.total_people, 0);
    assert_eq!(stats.average_friends, 0.0);
    assert!(stats.most_connected.is_none());
}

#[tokio::test]
async fn test_statistics_counts_directed_edges_and_distinct_values() {
    let (svc, _) = setup();
    register(&svc, PersonInput::named("Alice").with_city("Lima").with_hobby("chess")).await;
    register(&svc, PersonInput::named("Bob").with_city("Lima").with_hobby("go")).await;
    register(&svc, PersonInput::named("Carol").with_city("Quito")).await;
    register(&svc, PersonInput::named("Dan")).await;
    svc.add_friend_by_name("Alice", "Bob").await.unwrap();
    svc.add_friend_by_name("Alice", "Carol").await.unwrap();

    let stats = svc.statistics().await.unwrap();
    assert_eq!(stats.total_people, 4);
    assert_eq!(stats.total_relationships, 4);
    assert_eq!(stats.unique_cities, 2);
    assert_eq!(stats.unique_hobbies, 2);
    // Alice 2, Bob 1, Carol 1, Dan 0
    assert!((stats.average_friends - 1.0).abs() < f64::EPSILON);
    let top = stats.most_connected.unwrap();
    assert_eq!(top.name, "Alice");
    assert_eq!(top.friend_count, 2);
}

// === Dedupe ===

#[tokio::test]
async fn test_dedupe_keeps_earliest_record() {
    let (svc, store) = setup();
    let now = Utc::now();
    let legacy = |id: &str, name: &str, age_minutes: i64| Person {
        id: PersonId::new(id).unwrap(),
        name: name.to_string(),
        city: None,
        age: None,
        hobby: None,
        created_at: now - Duration::minutes(age_minutes),
    };
    store.seed(legacy("new", "alice", 1)).await;
    store.seed(legacy("old", "Alice", 10)).await;
    store.seed(legacy("bob", "Bob", 5)).await;
    svc.add_friend(&PersonId::new("new").unwrap(), &PersonId::new("bob").unwrap())
        .await
        .unwrap();

    let preview = svc.dedupe_names(true).await.unwrap();
    assert!(preview.dry_run);
    assert_eq!(preview.removed_count(), 1);
    assert_eq!(svc.list_people(None).await.unwrap().len(), 3);

    let report = svc.dedupe_names(false).await.unwrap();
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].kept.id.as_str(), "old");
    assert_eq!(report.groups[0].removed[0].id.as_str(), "new");

    let remaining = svc.list_people(None).await.unwrap();
    assert_eq!(names(&remaining), vec!["Alice", "Bob"]);
    assert_eq!(store.edge_count().await, 0);
    assert!(svc.dedupe_names(false).await.unwrap().is_clean());
}
