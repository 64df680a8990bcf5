//! Artifact lifecycle scenarios: generation, editing, history,
//! translation, and deletion.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use assert_matches::assert_matches;

use lectern_core::artifact::ArtifactKind;
use lectern_core::version::ArtifactVersion;
use lectern_gateway::types::{ArtifactPayload, TranslatedArtifact};
use lectern_gateway::LectureGateway;
use lectern_jobs::{ArtifactManager, ChatRole, EventBus, JobError, VersionAction};

use common::{api_error, FakeGateway, LECTURE};

fn manager(gateway: &Arc<FakeGateway>, kind: ArtifactKind) -> ArtifactManager {
    ArtifactManager::new(
        Arc::clone(gateway) as Arc<dyn LectureGateway>,
        Arc::new(EventBus::new()),
        kind,
        LECTURE.to_string(),
    )
}

fn payload(content: &str) -> ArtifactPayload {
    ArtifactPayload {
        content: content.to_string(),
        language: None,
        quiz_type: None,
        difficulty: None,
    }
}

fn version(id: &str, content: &str, editable: bool) -> ArtifactVersion {
    ArtifactVersion {
        version_id: id.to_string(),
        created_at: chrono::Utc::now(),
        content: content.to_string(),
        user_prompt: "make notes".to_string(),
        is_current: false,
        editable,
        language: "en".to_string(),
        language_name: None,
        translated_from: None,
        quiz_type: Default::default(),
        difficulty: Default::default(),
    }
}

async fn loaded_manager(gateway: &Arc<FakeGateway>, content: &str) -> ArtifactManager {
    *gateway.artifact_response.lock().unwrap() = Some(payload(content));
    let manager = manager(gateway, ArtifactKind::Notes);
    manager.load_current().await.unwrap();
    manager
}

#[tokio::test]
async fn absent_artifact_is_a_normal_empty_state() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = manager(&gateway, ArtifactKind::Notes);

    manager.load_current().await.unwrap();
    let state = manager.snapshot().await;
    assert!(state.artifact.is_empty());
    assert!(!state.editing);
}

#[tokio::test]
async fn generation_replaces_content_in_base_language() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "old notes").await;
    *gateway.generate_response.lock().unwrap() = Some(Ok(payload("# Notes v2")));

    manager.generate("summarize the lecture", None).await.unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "# Notes v2");
    assert_eq!(state.artifact.original_content, "# Notes v2");
    assert_eq!(state.artifact.current_language, "en");
    assert_eq!(state.selected_version, None);
    // Greeting, user prompt, generated reply.
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[1].role, ChatRole::User);
    assert_eq!(state.messages[2].role, ChatRole::Bot);
}

#[tokio::test]
async fn generation_failure_becomes_a_chat_message() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "old notes").await;
    *gateway.generate_response.lock().unwrap() =
        Some(Err(api_error(500, "generator overloaded")));

    manager.generate("summarize", None).await.unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "old notes");
    let last = state.messages.last().unwrap();
    assert_eq!(last.role, ChatRole::Bot);
    assert!(last.text.contains("generator overloaded"));
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_call() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = manager(&gateway, ArtifactKind::Notes);

    assert_matches!(
        manager.generate("   ", None).await,
        Err(JobError::Validation(_))
    );
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn edit_save_persists_the_buffer() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "old notes").await;

    manager.begin_edit().await.unwrap();
    manager.set_draft("new notes").await.unwrap();
    manager.save_edit().await.unwrap();

    let state = manager.snapshot().await;
    assert!(!state.editing);
    assert_eq!(state.artifact.original_content, "new notes");
    assert_eq!(state.selected_version, None);

    let requests = gateway.update_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].content, "new notes");
    assert_eq!(requests[0].version_id, None);
}

#[tokio::test]
async fn failed_save_keeps_the_edit_buffer() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "old notes").await;
    *gateway.update_error.lock().unwrap() = Some(api_error(500, "db down"));

    manager.begin_edit().await.unwrap();
    manager.set_draft("new notes").await.unwrap();
    assert_matches!(manager.save_edit().await, Err(JobError::Gateway(_)));

    let state = manager.snapshot().await;
    assert!(state.editing);
    assert_eq!(state.artifact.current_content, "new notes");
    assert_eq!(state.artifact.original_content, "old notes");
}

#[tokio::test]
async fn cancel_edit_restores_saved_content() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "old notes").await;

    manager.begin_edit().await.unwrap();
    manager.set_draft("scratch").await.unwrap();
    manager.cancel_edit().await;

    let state = manager.snapshot().await;
    assert!(!state.editing);
    assert_eq!(state.artifact.current_content, "old notes");
}

#[tokio::test]
async fn append_concatenates_with_a_blank_line() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "A").await;
    *gateway.history.lock().unwrap() = vec![version("v3", "B", true)];
    manager.load_history().await.unwrap();

    manager
        .select_version("v3", VersionAction::Append)
        .await
        .unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "A\n\nB");
    assert_eq!(state.artifact.original_content, "A");
    assert!(!state.editing);
    assert_eq!(state.selected_version, None);
}

#[tokio::test]
async fn editing_a_version_loads_it_into_the_buffer() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "current").await;
    *gateway.history.lock().unwrap() = vec![version("v2", "older draft", true)];
    manager.load_history().await.unwrap();

    manager
        .select_version("v2", VersionAction::Edit)
        .await
        .unwrap();

    let state = manager.snapshot().await;
    assert!(state.editing);
    assert_eq!(state.artifact.current_content, "older draft");
    assert_eq!(state.selected_version.as_deref(), Some("v2"));
}

#[tokio::test]
async fn non_editable_versions_are_refused() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "current").await;
    *gateway.history.lock().unwrap() = vec![version("v2", "translated copy", false)];
    manager.load_history().await.unwrap();

    assert_matches!(
        manager.select_version("v2", VersionAction::Edit).await,
        Err(JobError::Conflict(_))
    );
    assert_matches!(
        manager.select_version("v9", VersionAction::Edit).await,
        Err(JobError::Validation(_))
    );
}

#[tokio::test]
async fn restore_applies_the_returned_content() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "current").await;
    *gateway.history.lock().unwrap() = vec![version("v1", "first draft", true)];
    manager.load_history().await.unwrap();
    *gateway.restore_response.lock().unwrap() = Some(payload("first draft"));

    manager
        .select_version("v1", VersionAction::Restore)
        .await
        .unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "first draft");
    assert_eq!(state.artifact.original_content, "first draft");
    assert_eq!(state.selected_version, None);
}

#[tokio::test]
async fn delete_requires_a_pending_confirmation() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "notes").await;

    assert_matches!(manager.confirm_delete().await, Err(JobError::Conflict(_)));
    assert_eq!(gateway.delete_calls.load(Ordering::SeqCst), 0);

    manager.request_delete().await;
    manager.confirm_delete().await.unwrap();

    let state = manager.snapshot().await;
    assert!(state.artifact.is_empty());
    assert!(!state.pending_delete);
    assert_eq!(gateway.delete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancelled_delete_changes_nothing() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "notes").await;

    manager.request_delete().await;
    manager.cancel_delete().await;
    assert_matches!(manager.confirm_delete().await, Err(JobError::Conflict(_)));
    assert_eq!(gateway.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn translation_changes_display_but_not_original() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "hello notes").await;
    gateway
        .artifact_languages
        .lock()
        .unwrap()
        .insert("hi".to_string(), "Hindi".to_string());
    manager.load_supported_languages().await.unwrap();
    *gateway.translate_artifact_response.lock().unwrap() = Some(Ok(TranslatedArtifact {
        translated_content: "anuvaad".to_string(),
        language_name: Some("Hindi".to_string()),
    }));

    manager.translate("hi").await.unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "anuvaad");
    assert_eq!(state.artifact.current_language, "hi");
    assert_eq!(state.artifact.original_content, "hello notes");
    assert!(!state.translating);

    manager.reset_to_base().await;
    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "hello notes");
    assert_eq!(state.artifact.current_language, "en");
}

#[tokio::test]
async fn failed_translation_leaves_the_display_unchanged() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "hello notes").await;
    *gateway.translate_artifact_response.lock().unwrap() =
        Some(Err(api_error(500, "mt backend down")));

    assert_matches!(manager.translate("hi").await, Err(JobError::Gateway(_)));

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.current_content, "hello notes");
    assert_eq!(state.artifact.current_language, "en");
    assert!(!state.translating);
}

#[tokio::test]
async fn unsupported_artifact_language_is_rejected() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "notes").await;
    gateway
        .artifact_languages
        .lock()
        .unwrap()
        .insert("hi".to_string(), "Hindi".to_string());
    manager.load_supported_languages().await.unwrap();

    assert_matches!(manager.translate("fr").await, Err(JobError::Validation(_)));
}

#[tokio::test]
async fn editing_blocks_generation_and_translation() {
    let gateway = Arc::new(FakeGateway::new());
    let manager = loaded_manager(&gateway, "notes").await;

    manager.begin_edit().await.unwrap();
    assert_matches!(
        manager.generate("more notes", None).await,
        Err(JobError::Conflict(_))
    );
    assert_matches!(manager.translate("hi").await, Err(JobError::Conflict(_)));
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quiz_generation_carries_quiz_options() {
    use lectern_core::artifact::{Difficulty, QuizType};

    let gateway = Arc::new(FakeGateway::new());
    let manager = manager(&gateway, ArtifactKind::Quiz);
    manager
        .set_quiz_options(QuizType::MultipleChoice, Difficulty::Hard)
        .await;
    *gateway.generate_response.lock().unwrap() = Some(Ok(ArtifactPayload {
        content: "Q1 ...".to_string(),
        language: None,
        quiz_type: Some(QuizType::MultipleChoice),
        difficulty: Some(Difficulty::Hard),
    }));

    manager.generate("quiz me", None).await.unwrap();

    let state = manager.snapshot().await;
    assert_eq!(state.artifact.quiz_type, QuizType::MultipleChoice);
    assert_eq!(state.artifact.difficulty, Difficulty::Hard);
    assert_eq!(state.artifact.current_content, "Q1 ...");
}
