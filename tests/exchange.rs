use std::io;

use pretty_assertions::assert_eq;
use reqwest_xauth::{
    authenticate, exchange, fetch_starred, AuthExchangeError, Bookmark, Config,
    CredentialSource, Error, RejectionReason, TokenPair, TokenStore, UserCredentials,
};
use url::Url;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN_PATH: &str = "/api/1.1/oauth/access_token";
const BOOKMARKS_PATH: &str = "/api/1.1/bookmarks/list";

fn config_for(server: &MockServer) -> Config {
    let base = Url::parse(&server.uri()).unwrap();
    Config::new("CK", "CS").with_api_base(&base).unwrap()
}

// reqwest's blocking client must neither run nor drop on an async worker
async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

struct FixedLogin;

impl CredentialSource for FixedLogin {
    fn credentials(&mut self) -> io::Result<UserCredentials> {
        Ok(UserCredentials::new("u@example.test", "p"))
    }
}

struct BrokenTerminal;

impl CredentialSource for BrokenTerminal {
    fn credentials(&mut self) -> io::Result<UserCredentials> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
    }
}

#[tokio::test]
async fn exchange_returns_token_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .and(header_exists("authorization"))
        .and(body_string_contains("x_auth_username=u%40example.test"))
        .and(body_string_contains("x_auth_password=p"))
        .and(body_string_contains("x_auth_mode=client_auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("oauth_token=T&oauth_token_secret=S"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "p"))
    })
    .await;

    assert_eq!(result.unwrap(), TokenPair::new("T", "S"));
}

#[tokio::test]
async fn exchange_header_has_no_token_and_no_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("oauth_token=T&oauth_token_secret=S"),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "hunter2"))
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.starts_with("OAuth oauth_consumer_key=\"CK\""));
    assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA1\""));
    assert!(authorization.contains("oauth_version=\"1.0\""));
    assert!(!authorization.contains("oauth_token="));
    assert!(!authorization.contains("hunter2"));
    assert_eq!(authorization.matches("oauth_signature=").count(), 1);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid xAuth credentials."))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "wrong"))
    })
    .await;

    match result {
        Err(Error::AuthExchange(AuthExchangeError::Rejected {
            status, reason, ..
        })) => {
            assert_eq!(status, 401);
            assert_eq!(reason, RejectionReason::InvalidCredentials);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn bad_consumer_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid consumer key."))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "p"))
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::AuthExchange(AuthExchangeError::Rejected {
            reason: RejectionReason::InvalidConsumer,
            ..
        }))
    ));
}

#[tokio::test]
async fn missing_secret_in_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=T"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "p"))
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::AuthExchange(AuthExchangeError::TokenKeyNotFound(
            "oauth_token_secret",
            _
        )))
    ));
}

#[tokio::test]
async fn blank_tokens_in_response_fail_the_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=&oauth_token_secret="))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("tokens");
    let config = config_for(&server).with_token_file(&token_file);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        let store = TokenStore::from_config(&config);
        authenticate(&http, &config, &mut FixedLogin, &store)
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::AuthExchange(AuthExchangeError::TokenKeyNotFound(
            "oauth_token",
            _
        )))
    ));
    assert!(!token_file.exists());
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    // nothing listens on a port once its listener is closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);
    let config = Config::new("CK", "CS").with_api_base(&base).unwrap();

    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        exchange(&http, &config, &UserCredentials::new("u@example.test", "p"))
    })
    .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn authenticate_saves_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=T&oauth_token_secret=S&user_id=42"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("tokens");
    let config = config_for(&server).with_token_file(&token_file);
    let tokens = blocking(move || {
        let http = reqwest::blocking::Client::new();
        let store = TokenStore::from_config(&config);
        authenticate(&http, &config, &mut FixedLogin, &store)
    })
    .await
    .unwrap();

    assert_eq!(tokens, TokenPair::new("T", "S"));
    let saved = std::fs::read_to_string(&token_file).unwrap();
    assert!(saved.contains("\"oauth_token\":\"T\""));
    assert!(!saved.contains("u@example.test"));
    assert!(!saved.contains("user_id"));
}

#[tokio::test]
async fn authenticate_reports_prompt_failure() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("tokens");
    let config = config_for(&server).with_token_file(&token_file);

    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        let store = TokenStore::from_config(&config);
        authenticate(&http, &config, &mut BrokenTerminal, &store)
    })
    .await;

    assert!(matches!(result, Err(Error::Prompt(_))));
    assert!(!token_file.exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn starred_bookmarks_use_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOKMARKS_PATH))
        .and(body_string_contains("folder_id=starred"))
        .and(body_string_contains("limit=3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"type": "meta"},
            {"type": "bookmark", "title": "One", "url": "https://one.example.test/"},
            {"type": "bookmark", "title": "Two", "url": "https://two.example.test/"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_bookmark_limit(3);
    let bookmarks = blocking(move || {
        let http = reqwest::blocking::Client::new();
        fetch_starred(&http, &config, &TokenPair::new("T", "S"))
    })
    .await
    .unwrap();

    assert_eq!(
        bookmarks,
        vec![
            Bookmark {
                title: "One".to_string(),
                url: "https://one.example.test/".to_string(),
            },
            Bookmark {
                title: "Two".to_string(),
                url: "https://two.example.test/".to_string(),
            },
        ]
    );

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.contains("oauth_token=\"T\""));
    assert!(!authorization.contains("folder_id"));
}

#[tokio::test]
async fn revoked_token_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOKMARKS_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        fetch_starred(&http, &config, &TokenPair::new("revoked", "S"))
    })
    .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn blank_token_pair_is_never_sent() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    let result = blocking(move || {
        let http = reqwest::blocking::Client::new();
        fetch_starred(&http, &config, &TokenPair::new("", "S"))
    })
    .await;

    assert!(matches!(
        result,
        Err(Error::AuthExchange(AuthExchangeError::TokenKeyNotFound(
            "oauth_token",
            _
        )))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
