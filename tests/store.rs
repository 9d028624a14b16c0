mod common;

use assert_matches::assert_matches;
use common::{file_pool, memory_pool};
use record_service::resource::{EmployeeChanges, Employees, NewEmployee, NewUser, Patch, Payload, UserChanges, Users};
use record_service::service::ValidationPolicy;
use record_service::{AppError, CrudService, Store, StoreError};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

fn new_user(i: usize) -> NewUser {
    NewUser {
        name: Some(format!("user {}", i)),
        email: Some(format!("user{}@x.com", i)),
        age: Some(20),
    }
}

async fn seeded_users(n: usize) -> Store<Users> {
    let store = Store::<Users>::new(memory_pool().await);
    for i in 0..n {
        store.insert(&new_user(i).fields()).await.unwrap();
    }
    store
}

#[tokio::test]
async fn inserts_get_fresh_ids() {
    let store = Store::<Users>::new(memory_pool().await);
    let mut seen = HashSet::new();
    for i in 0..20 {
        let user = store.insert(&new_user(i).fields()).await.unwrap();
        assert!(seen.insert(user.id), "id {} handed out twice", user.id);
    }
    assert_eq!(store.count().await.unwrap(), 20);
}

#[tokio::test]
async fn duplicate_email_leaves_table_unchanged() {
    let store = seeded_users(1).await;
    let clash = NewUser {
        name: Some("other".into()),
        email: Some("user0@x.com".into()),
        age: None,
    };
    assert_matches!(
        store.insert(&clash.fields()).await,
        Err(StoreError::Duplicate { field: "email", value }) if value == "user0@x.com"
    );
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_ids_change_nothing() {
    let store = seeded_users(2).await;
    let changes = UserChanges {
        name: Patch::Value("ghost".into()),
        ..UserChanges::default()
    };
    assert!(store.get_by_id(99).await.unwrap().is_none());
    assert!(store.update(99, &changes.fields()).await.unwrap().is_none());
    assert!(!store.delete(99).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn deleted_ids_are_never_reused() {
    let store = seeded_users(3).await;
    assert!(store.delete(3).await.unwrap());
    assert!(!store.delete(3).await.unwrap());
    let next = store.insert(&new_user(10).fields()).await.unwrap();
    assert_eq!(next.id, 4);
}

#[tokio::test]
async fn get_by_email_finds_exact_match() {
    let store = seeded_users(2).await;
    let found = store.get_by_email("user1@x.com").await.unwrap().unwrap();
    assert_eq!(found.id, 2);
    assert!(store.get_by_email("nobody@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() {
    let store = seeded_users(1).await;
    let before = store.get_by_id(1).await.unwrap().unwrap();
    let changes = UserChanges {
        name: Patch::Value("renamed".into()),
        ..UserChanges::default()
    };
    let after = store.update(1, &changes.fields()).await.unwrap().unwrap();
    assert_eq!(after.name, "renamed");
    assert_eq!(after.email, before.email);
    assert_eq!(after.age, before.age);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn empty_update_returns_current_row() {
    let store = seeded_users(1).await;
    let before = store.get_by_id(1).await.unwrap().unwrap();
    let after = store.update(1, &UserChanges::default().fields()).await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_rechecks_email_against_other_rows() {
    let store = seeded_users(2).await;
    let changes = UserChanges {
        email: Patch::Value("user0@x.com".into()),
        ..UserChanges::default()
    };
    assert_matches!(
        store.update(2, &changes.fields()).await,
        Err(StoreError::Duplicate { .. })
    );
    assert_eq!(store.get_by_id(2).await.unwrap().unwrap().email, "user1@x.com");
}

#[tokio::test]
async fn employee_update_advances_updated_at() {
    let store = Store::<Employees>::new(memory_pool().await);
    let hired = NewEmployee {
        name: Some("Bo".into()),
        email: Some("bo@corp.com".into()),
        position: Some("Engineer".into()),
        salary: Some(15000.0),
    };
    let created = store.insert(&hired.fields()).await.unwrap();
    assert_eq!(created.created_at, created.updated_at);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let changes = EmployeeChanges {
        salary: Patch::Value(16000.0),
        ..EmployeeChanges::default()
    };
    let updated = store.update(created.id, &changes.fields()).await.unwrap().unwrap();
    assert_eq!(updated.salary, 16000.0);
    assert_eq!(updated.position, "Engineer");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn delete_many_counts_only_existing_rows() {
    let store = seeded_users(5).await;
    assert_eq!(store.delete_many(&[]).await.unwrap(), 0);
    assert_eq!(store.delete_many(&[2, 4, 42]).await.unwrap(), 2);
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn pages_concatenate_to_the_full_ordered_set() {
    let store = seeded_users(23).await;
    store.delete_many(&[5, 6, 17]).await.unwrap();
    let all: Vec<i64> = store.list(0, 1000).await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(all.len(), 20);
    assert!(all.windows(2).all(|w| w[0] < w[1]));

    for page_size in [1u32, 3, 7, 20, 50] {
        let mut collected = Vec::new();
        let mut skip = 0u64;
        loop {
            let page = store.list(skip, page_size).await.unwrap();
            assert!(page.len() <= page_size as usize);
            if page.is_empty() {
                break;
            }
            skip += page.len() as u64;
            collected.extend(page.iter().map(|u| u.id));
        }
        assert_eq!(collected, all, "page size {}", page_size);
    }
}

fn email_change(email: String) -> UserChanges {
    UserChanges {
        email: Patch::Value(email),
        ..UserChanges::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_email_changes_on_a_file_database_all_succeed() {
    let (_dir, pool) = file_pool(8).await;
    let service = Arc::new(CrudService::<Users>::new(pool, ValidationPolicy::default()));
    for i in 0..16 {
        service.create(&new_user(i)).await.unwrap();
    }

    for round in 0..10 {
        let mut tasks = JoinSet::new();
        for id in 1..=16i64 {
            let service = Arc::clone(&service);
            let changes = email_change(format!("r{}-u{}@x.com", round, id));
            tasks.spawn(async move { service.update(id, &changes).await });
        }
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap();
            assert!(result.is_ok(), "round {}: {:?}", round, result.err());
        }
    }

    for id in 1..=16i64 {
        let user = service.read(id).await.unwrap();
        assert_eq!(user.email, format!("r9-u{}@x.com", id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writers_for_one_email_yield_a_single_owner() {
    let (_dir, pool) = file_pool(8).await;
    let service = Arc::new(CrudService::<Users>::new(pool, ValidationPolicy::default()));
    for i in 0..8 {
        service.create(&new_user(i)).await.unwrap();
    }

    let mut tasks = JoinSet::new();
    for id in 1..=8i64 {
        let service = Arc::clone(&service);
        tasks.spawn(async move { service.update(id, &email_change("shared@x.com".into())).await });
    }
    let mut owners = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(user) => {
                assert_eq!(user.email, "shared@x.com");
                owners += 1;
            }
            Err(err) => assert_matches!(err, AppError::Duplicate(email) if email == "shared@x.com"),
        }
    }
    assert_eq!(owners, 1);
}
