//! End-to-end tests of the poll -> commit -> dispatch pipeline

mod helpers;

use std::sync::Arc;

use groupguard::models::ChatPayload;

use helpers::*;

#[tokio::test]
async fn poll_cycle_stores_group_member_and_message() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    api.queue_batch(vec![message_update(
        5,
        -100123,
        "supergroup",
        "Announcements",
        user_json(555, "Ana"),
        42,
        "hello",
    )]);

    let processed = services.poll_worker.run_cycle(config.id).await.unwrap();
    assert_eq!(processed, 1);

    let group = db
        .groups
        .find_by_chat_id(config.id, -100123)
        .await
        .unwrap()
        .expect("group row created");
    assert_eq!(group.title, "Announcements");
    assert_eq!(group.chat_type, "supergroup");

    let member = db
        .members
        .find_by_telegram_id(group.id, 555)
        .await
        .unwrap()
        .expect("member row created");
    assert_eq!(member.display_name, "Ana");
    assert!(member.is_active);

    assert_eq!(db.messages.count(group.id).await.unwrap(), 1);
    let message = db
        .messages
        .find_by_message_id(group.id, 42)
        .await
        .unwrap()
        .expect("message row created");
    assert_eq!(message.text, "hello");

    // Offset committed durably, next poll resumes one past it
    let config = db.configs.find_by_id(config.id).await.unwrap().unwrap();
    assert_eq!(config.last_update_id, 5);
    assert_eq!(services.offsets.next_offset(&config), Some(6));
}

#[tokio::test]
async fn first_poll_requests_no_offset_then_resumes_past_committed() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    api.queue_batch(vec![message_update(
        5,
        -100123,
        "supergroup",
        "Announcements",
        user_json(555, "Ana"),
        42,
        "hello",
    )]);

    services.poll_worker.run_cycle(config.id).await.unwrap();
    services.poll_worker.run_cycle(config.id).await.unwrap();

    assert_eq!(api.requested_offsets(), vec![None, Some(6)]);
}

#[tokio::test]
async fn redelivered_message_creates_no_duplicate_rows() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    let envelope = message_update(
        5,
        -100123,
        "supergroup",
        "Announcements",
        user_json(555, "Ana"),
        42,
        "hello",
    );
    api.queue_batch(vec![envelope.clone()]);
    services.poll_worker.run_cycle(config.id).await.unwrap();

    // Same message body under a fresh update id, as after a commit failure
    let mut replay = envelope;
    replay.update_id = 6;
    api.queue_batch(vec![replay]);
    services.poll_worker.run_cycle(config.id).await.unwrap();

    let group = db
        .groups
        .find_by_chat_id(config.id, -100123)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(db.groups.count(config.id).await.unwrap(), 1);
    assert_eq!(db.members.count(group.id).await.unwrap(), 1);
    assert_eq!(db.messages.count(group.id).await.unwrap(), 1);
}

#[tokio::test]
async fn replaying_a_whole_batch_is_idempotent() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    let batch = vec![
        message_update(
            1,
            -100123,
            "supergroup",
            "Announcements",
            user_json(555, "Ana"),
            10,
            "first",
        ),
        message_update(
            2,
            -100123,
            "supergroup",
            "Announcements",
            user_json(556, "Bo"),
            11,
            "second",
        ),
    ];

    services.dispatcher.process_batch(&config, &batch).await;
    services.dispatcher.process_batch(&config, &batch).await;

    let group = db
        .groups
        .find_by_chat_id(config.id, -100123)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(db.members.count(group.id).await.unwrap(), 2);
    assert_eq!(db.messages.count(group.id).await.unwrap(), 2);
}

#[tokio::test]
async fn committed_offset_never_moves_backwards() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    let mut config = db.configs.find_by_id(config.id).await.unwrap().unwrap();

    let high = vec![message_update(
        10,
        -100123,
        "supergroup",
        "Announcements",
        user_json(555, "Ana"),
        1,
        "x",
    )];
    services.offsets.commit(&mut config, &high).await.unwrap();
    assert_eq!(config.last_update_id, 10);

    // A stale or replayed batch commits as a no-op
    let low = vec![message_update(
        7,
        -100123,
        "supergroup",
        "Announcements",
        user_json(555, "Ana"),
        2,
        "y",
    )];
    services.offsets.commit(&mut config, &low).await.unwrap();
    assert_eq!(config.last_update_id, 10);

    let stored = db.configs.find_by_id(config.id).await.unwrap().unwrap();
    assert_eq!(stored.last_update_id, 10);
    assert_eq!(services.offsets.next_offset(&stored), Some(11));
}

#[tokio::test]
async fn unsupported_update_advances_offset_without_side_effects() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    api.queue_batch(vec![unsupported_update(8)]);
    let processed = services.poll_worker.run_cycle(config.id).await.unwrap();
    assert_eq!(processed, 1);

    assert_eq!(db.groups.count(config.id).await.unwrap(), 0);
    assert!(api.sent_messages().is_empty());

    let config = db.configs.find_by_id(config.id).await.unwrap().unwrap();
    assert_eq!(config.last_update_id, 8);
}

#[tokio::test]
async fn private_chat_messages_are_not_stored() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    let batch = vec![message_update(
        3,
        555,
        "private",
        "Ana",
        user_json(555, "Ana"),
        1,
        "dm",
    )];
    services.dispatcher.process_batch(&config, &batch).await;

    assert_eq!(db.groups.count(config.id).await.unwrap(), 0);
}

#[tokio::test]
async fn transport_failure_yields_zero_progress() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    api.fail_get_updates();
    let processed = services.poll_worker.run_cycle(config.id).await.unwrap();
    assert_eq!(processed, 0);

    let config = db.configs.find_by_id(config.id).await.unwrap().unwrap();
    assert_eq!(config.last_update_id, 0);
    assert_eq!(services.offsets.next_offset(&config), None);
}

#[tokio::test]
async fn titleless_chat_falls_back_to_unknown_group() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    let chat = ChatPayload {
        id: -77,
        chat_type: "group".to_string(),
        title: None,
    };
    let group = services.reconciler.upsert_group(&config, &chat).await.unwrap();
    assert_eq!(group.title, "Unknown Group");
}

#[tokio::test]
async fn supergroup_conversion_removes_the_stale_group_row() {
    let db = test_db().await;
    let config = create_config(&db, ConfigOptions::default()).await;
    let api = Arc::new(MockTelegramApi::default());
    let services = build_services(&db, api.clone());

    // Plain group appears first
    let before = vec![message_update(
        1,
        -200,
        "group",
        "Club",
        user_json(555, "Ana"),
        1,
        "a",
    )];
    services.dispatcher.process_batch(&config, &before).await;
    assert!(db.groups.find_by_chat_id(config.id, -200).await.unwrap().is_some());

    // Telegram converts it and re-issues the chat under the -100 prefix
    let after = vec![message_update(
        2,
        -100200,
        "supergroup",
        "Club",
        user_json(555, "Ana"),
        2,
        "b",
    )];
    services.dispatcher.process_batch(&config, &after).await;

    assert!(db.groups.find_by_chat_id(config.id, -200).await.unwrap().is_none());
    assert!(db.groups.find_by_chat_id(config.id, -100200).await.unwrap().is_some());
    assert_eq!(db.groups.count(config.id).await.unwrap(), 1);
}
