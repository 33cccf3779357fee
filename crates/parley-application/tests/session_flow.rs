use async_trait::async_trait;
use parley_application::{ErrorCode, SessionFactory};
use parley_core::config::ParleyConfig;
use parley_core::session::{Message, ModelOracle, NamingOracle, OracleError, Role};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

struct NumberedModel {
    calls: AtomicUsize,
}

#[async_trait]
impl ModelOracle for NumberedModel {
    async fn generate(&self, history: &[Message]) -> Result<Message, OracleError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert_eq!(history[0].role, Role::System);
        Ok(Message::assistant(format!("answer {n}")))
    }
}

struct FixedNamer(&'static str);

#[async_trait]
impl NamingOracle for FixedNamer {
    async fn suggest_name(&self, _history: &[Message]) -> Result<String, OracleError> {
        Ok(self.0.to_string())
    }
}

fn factory(temp_dir: &TempDir) -> SessionFactory {
    let mut config = ParleyConfig::default();
    config.storage.records_dir = temp_dir.path().join("conversations");
    SessionFactory::new(config)
}

#[tokio::test]
async fn test_conversation_is_named_and_kept_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let manager = factory(&temp_dir).create_manager_with(
        Arc::new(NumberedModel {
            calls: AtomicUsize::new(0),
        }),
        Arc::new(FixedNamer("\"Tide Tables\"")),
    );

    manager.handle_user_message("hello").await.unwrap();
    let unnamed = manager.active_record_id().await.unwrap();
    assert_eq!(manager.list_records().await.unwrap(), vec![unnamed.clone()]);

    manager.handle_user_message("tell me about tides").await.unwrap();
    let named = manager.active_record_id().await.unwrap();
    assert!(named.starts_with("Tide_Tables_"), "got {named}");
    assert_eq!(named.len(), "Tide_Tables_".len() + 8);

    let err = manager.load_record(&unnamed).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    manager.handle_user_message("and the moon?").await.unwrap();
    assert_eq!(manager.active_record_id().await.unwrap(), named);
    assert_eq!(manager.list_records().await.unwrap(), vec![named.clone()]);

    let turns = manager.load_record(&named).await.unwrap();
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[4], Message::human("and the moon?"));
    assert_eq!(turns[5], Message::assistant("answer 3"));

    let raw = std::fs::read_to_string(
        temp_dir
            .path()
            .join("conversations")
            .join(format!("{named}.json")),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value[0],
        serde_json::json!({"type": "HumanMessage", "content": "hello"})
    );
    assert_eq!(
        value[1],
        serde_json::json!({"type": "AIMessage", "content": "answer 1"})
    );
    assert!(!raw.contains("SystemMessage"));
}

#[tokio::test]
async fn test_unusable_name_leaves_record_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let manager = factory(&temp_dir).create_manager_with(
        Arc::new(NumberedModel {
            calls: AtomicUsize::new(0),
        }),
        Arc::new(FixedNamer("../../etc/passwd")),
    );

    for text in ["one", "two", "three"] {
        manager.handle_user_message(text).await.unwrap();
    }

    let id = manager.active_record_id().await.unwrap();
    assert_eq!(manager.list_records().await.unwrap(), vec![id.clone()]);
    assert_eq!(manager.load_record(&id).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_missing_api_key_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = ParleyConfig::default();
    config.storage.records_dir = temp_dir.path().to_path_buf();
    config.model.api_key_env = "PARLEY_TEST_KEY_THAT_IS_NEVER_SET".to_string();

    let err = SessionFactory::new(config).create_manager().err().unwrap();
    assert!(err.to_string().contains("PARLEY_TEST_KEY_THAT_IS_NEVER_SET"));
}
