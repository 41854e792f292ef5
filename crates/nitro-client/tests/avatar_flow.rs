//! End-to-end tests for the login, upload and logout flow against a mock
//! account service.

use nitro_client::storage::keys;
use nitro_client::{
    Channel, Config, LocalStorage, MemoryStorage, Presenter, SessionManager, SessionState,
    StatusKind, UploadCoordinator, UploadError,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Screen {
    busy: Mutex<bool>,
    hides: Mutex<usize>,
    messages: Mutex<Vec<(Channel, StatusKind, String)>>,
    progress: Mutex<Vec<u8>>,
}

impl Presenter for Screen {
    fn show_busy(&self) {
        *self.busy.lock().unwrap() = true;
        self.progress.lock().unwrap().clear();
    }

    fn hide_busy(&self) {
        *self.busy.lock().unwrap() = false;
        *self.hides.lock().unwrap() += 1;
    }

    fn report_status(&self, channel: Channel, kind: StatusKind, message_key: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((channel, kind, message_key.to_string()));
    }

    fn report_progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }
}

fn config(server: &MockServer) -> Config {
    Config {
        service_url: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_fresh_user_logs_in_uploads_and_logs_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("username=alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": 42, "access_token": "abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user-avatar/user/42/avatar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imageUrl": "u"})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let screen = Arc::new(Screen::default());
    let mut session = SessionManager::new(config(&server), storage.clone(), screen.clone()).unwrap();

    assert!(session.initialize().await.is_err());
    assert_eq!(session.handle().state(), SessionState::Anonymous);
    assert!(screen.messages.lock().unwrap().is_empty());

    session.login("alice", "pw").await.unwrap();
    assert_eq!(storage.get_item(keys::TOKEN).as_deref(), Some("abc"));

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("avatar.gif");
    std::fs::write(&file, vec![0u8; 1000]).unwrap();

    let uploads = UploadCoordinator::new(screen.clone());
    let pending = uploads.select_file(&file).await.unwrap();
    let body = uploads
        .submit(&pending, &session.handle(), &session.adapter())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(body["imageUrl"], "u");
    assert_eq!(screen.progress.lock().unwrap().last(), Some(&100));
    assert!(!*screen.busy.lock().unwrap());

    session.logout().await.unwrap();
    assert_eq!(storage.get_item(keys::TOKEN), None);
    assert_eq!(session.handle().state(), SessionState::Anonymous);

    let after_logout = uploads.submit(&pending, &session.handle(), &session.adapter());
    assert!(matches!(after_logout, Err(UploadError::NotAuthenticated)));

    let keys: Vec<String> = screen
        .messages
        .lock()
        .unwrap()
        .iter()
        .map(|(_, _, key)| key.clone())
        .collect();
    assert_eq!(keys, vec!["login-success", "upload-success"]);
}

#[tokio::test]
async fn test_returning_user_uploads_without_logging_in() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userId": "42"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user-avatar/user/42/avatar"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_items([(keys::TOKEN, "abc")]));
    let screen = Arc::new(Screen::default());
    let session = SessionManager::new(config(&server), storage, screen.clone()).unwrap();

    assert_eq!(session.initialize().await.unwrap(), 42);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("big.gif");
    std::fs::write(&file, vec![0u8; 4096]).unwrap();

    let uploads = UploadCoordinator::new(screen.clone());
    let pending = uploads.select_file(&file).await.unwrap();
    let err = uploads
        .submit(&pending, &session.handle(), &session.adapter())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::TooLarge));
    assert_eq!(*screen.hides.lock().unwrap(), 1);
    assert_eq!(
        screen.messages.lock().unwrap().last().map(|(_, _, k)| k.as_str()),
        Some("upload-badsize")
    );
}
