//! Integration tests for ScoreCoordinator.
//!
//! Uses tempfile::TempDir for isolated storage directories. No remote
//! store is configured, so every path exercises the local JSON documents.

use pulse_core::{ChatState, PulseConfig, ToneCategory, UserMemory};
use pulse_memory::{ChatResponse, FileStore, MemoryStore, ScoreCoordinator};

fn local_config(dir: &tempfile::TempDir) -> PulseConfig {
    let mut config = PulseConfig::default();
    config.storage.dir = dir.path().to_path_buf();
    config
}

/// Pin a user's chat threshold so buffering tests are deterministic.
async fn seed_threshold(store: &FileStore, user: &str, threshold: u32) {
    let mut memory = UserMemory::new(user);
    memory.chat_state = Some(ChatState {
        count: 0,
        threshold,
        buffer: Vec::new(),
    });
    store.save(user, &memory).await.unwrap();
}

#[tokio::test]
async fn test_answers_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));

    let summary = coordinator
        .submit_answers(
            "ada",
            Some("Ada"),
            &["I feel calm and confident today".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(summary.user, "ada");
    assert_eq!(summary.nickname.as_deref(), Some("Ada"));
    assert_eq!(summary.tone, ToneCategory::Positive);
    assert!((100..=600).contains(&summary.qscore));
    // Range must be consistent with the score.
    assert_eq!(summary.range, pulse_core::assign_range(summary.qscore));
}

#[tokio::test]
async fn test_answers_are_joined_with_separator() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));
    let store = FileStore::new(dir.path());

    coordinator
        .submit_answers(
            "ada",
            None,
            &["calm".to_string(), "  ".to_string(), "focused".to_string()],
        )
        .await
        .unwrap();

    let memory = store.load("ada").await.unwrap();
    assert_eq!(memory.history[0].message, "calm | focused");
}

#[tokio::test]
async fn test_history_accumulates_and_summary_tracks_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));

    for i in 0..5 {
        coordinator
            .submit_answers("ada", None, &[format!("update number {i}")])
            .await
            .unwrap();
    }

    let store = FileStore::new(dir.path());
    let memory = store.load("ada").await.unwrap();
    assert_eq!(memory.history.len(), 5);

    let summary = coordinator.latest_summary("ada").await.unwrap().unwrap();
    assert_eq!(summary.qscore, memory.history[4].qscore);
    assert!(summary.volatility.is_some());
}

#[tokio::test]
async fn test_latest_summary_missing_user() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));
    assert!(coordinator.latest_summary("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_chat_queues_then_flushes_at_threshold() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));
    let store = FileStore::new(dir.path());
    seed_threshold(&store, "ada", 15).await;

    for i in 1..15 {
        match coordinator
            .submit_chat("ada", None, &format!("chat message {i}"))
            .await
            .unwrap()
        {
            ChatResponse::Queued { count, threshold } => {
                assert_eq!(count, i);
                assert_eq!(threshold, 15);
            }
            other => panic!("message {i} should queue, got {other:?}"),
        }
    }

    let summary = match coordinator.submit_chat("ada", None, "chat message 15").await.unwrap() {
        ChatResponse::Scored(summary) => summary,
        other => panic!("message 15 should flush, got {other:?}"),
    };
    assert!((100..=600).contains(&summary.qscore));

    // One scored entry covering the whole batch, and a reset state with a
    // freshly drawn threshold.
    let memory = store.load("ada").await.unwrap();
    assert_eq!(memory.history.len(), 1);
    assert!(memory.history[0].message.starts_with("chat message 1 | "));
    assert!(memory.history[0].message.ends_with("chat message 15"));
    let state = memory.chat_state.unwrap();
    assert_eq!(state.count, 0);
    assert!(state.buffer.is_empty());
    assert!((15..=20).contains(&state.threshold));
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));
    assert!(coordinator.submit_chat("ada", None, "   ").await.is_err());
}

#[tokio::test]
async fn test_chat_state_survives_between_requests() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_threshold(&store, "ada", 20).await;

    // Two separate coordinators simulate separate invocations sharing the
    // same storage directory.
    {
        let coordinator = ScoreCoordinator::new(local_config(&dir));
        coordinator.submit_chat("ada", None, "first").await.unwrap();
    }
    {
        let coordinator = ScoreCoordinator::new(local_config(&dir));
        match coordinator.submit_chat("ada", None, "second").await.unwrap() {
            ChatResponse::Queued { count, threshold } => {
                assert_eq!(count, 2);
                assert_eq!(threshold, 20);
            }
            other => panic!("expected queued, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_users_do_not_interfere() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));
    let store = FileStore::new(dir.path());
    seed_threshold(&store, "ada", 15).await;
    seed_threshold(&store, "grace", 15).await;

    for i in 0..3 {
        coordinator
            .submit_chat("ada", None, &format!("ada {i}"))
            .await
            .unwrap();
    }
    coordinator.submit_chat("grace", None, "grace 0").await.unwrap();

    let ada = store.load("ada").await.unwrap().chat_state.unwrap();
    let grace = store.load("grace").await.unwrap().chat_state.unwrap();
    assert_eq!(ada.count, 3);
    assert_eq!(grace.count, 1);
}

#[tokio::test]
async fn test_nickname_sticky_across_requests() {
    let dir = tempfile::TempDir::new().unwrap();
    let coordinator = ScoreCoordinator::new(local_config(&dir));

    coordinator
        .submit_answers("ada", Some("Ada"), &["feeling fine".to_string()])
        .await
        .unwrap();
    let summary = coordinator
        .submit_answers("ada", None, &["still fine".to_string()])
        .await
        .unwrap();

    assert_eq!(summary.nickname.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_scoring_proceeds_when_save_fails() {
    // Point storage at an unwritable path: the summary must still come
    // back, with durability silently lost.
    let mut config = PulseConfig::default();
    config.storage.dir = std::path::PathBuf::from("/proc/pulse-no-such-dir");
    let coordinator = ScoreCoordinator::new(config);

    let summary = coordinator
        .submit_answers("ada", None, &["calm and focused".to_string()])
        .await
        .unwrap();
    assert_eq!(summary.tone, ToneCategory::Positive);
}
