use reqwest::blocking::Client as ReqwestClient;
use serde::Serialize;
use serde_json::Value;

use crate::{
    AuthExchangeError, Config, OAuthClientProvider, Result, TokenPair, OAUTH_TOKEN_KEY,
    OAUTH_TOKEN_SECRET_KEY,
};

const STARRED_FOLDER: &str = "starred";
const BOOKMARK_TYPE: &str = "bookmark";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

/// Fetch the most recent starred bookmarks with a stored token pair.
pub fn fetch_starred(
    http: &ReqwestClient,
    config: &Config,
    tokens: &TokenPair,
) -> Result<Vec<Bookmark>> {
    // a blank pair would be signed as a consumer-only request
    if tokens.oauth_token.is_empty() {
        return Err(AuthExchangeError::TokenKeyNotFound(OAUTH_TOKEN_KEY, String::new()).into());
    }
    if tokens.oauth_token_secret.is_empty() {
        return Err(
            AuthExchangeError::TokenKeyNotFound(OAUTH_TOKEN_SECRET_KEY, String::new()).into(),
        );
    }
    let secrets = config.secrets().token_pair(tokens);
    let limit = config.bookmark_limit().to_string();

    log::debug!("listing starred bookmarks from {}", config.bookmarks_url());
    let text = http
        .clone()
        .oauth1(&secrets)
        .post(config.bookmarks_url().clone())
        .form(&[("folder_id", STARRED_FOLDER), ("limit", limit.as_str())])
        .send()?
        .error_for_status()?
        .text()?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(read_bookmarks(value))
}

// the list endpoint answers either a bare array or `{"bookmarks": [...]}`
fn read_bookmarks(value: Value) -> Vec<Bookmark> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("bookmarks") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some(BOOKMARK_TYPE))
        .map(|item| Bookmark {
            title: string_or(item, "title", "Untitled"),
            url: string_or(item, "url", "#"),
        })
        .collect()
}

fn string_or(item: &Value, key: &str, default: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
