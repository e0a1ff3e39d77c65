use std::{env, fmt, path::PathBuf, time::Duration};

use url::Url;

use crate::{ConfigError, ConfigResult, Secrets};

pub const ENV_CONSUMER_KEY: &str = "INSTAPAPER_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "INSTAPAPER_CONSUMER_SECRET";
pub const ENV_API_BASE: &str = "INSTAPAPER_API_BASE";
pub const ENV_TOKEN_FILE: &str = "INSTAPAPER_TOKEN_FILE";
pub const ENV_TIMEOUT_SECS: &str = "INSTAPAPER_TIMEOUT_SECS";
pub const ENV_LIMIT: &str = "INSTAPAPER_LIMIT";

pub const DEFAULT_API_BASE: &str = "https://www.instapaper.com";
pub const DEFAULT_TOKEN_FILE: &str = ".instapaper_tokens";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_LIMIT: u32 = 5;

const ACCESS_TOKEN_PATH: &str = "/api/1.1/oauth/access_token";
const BOOKMARKS_LIST_PATH: &str = "/api/1.1/bookmarks/list";

/// Process-wide settings, read once at startup and passed by reference.
#[derive(Clone)]
pub struct Config {
    consumer_key: String,
    consumer_secret: String,
    access_token_url: Url,
    bookmarks_url: Url,
    token_file: PathBuf,
    timeout: Duration,
    bookmark_limit: u32,
}

impl Config {
    /// Settings for the given consumer credentials, everything else at its default.
    pub fn new<K, S>(consumer_key: K, consumer_secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        let base = Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL");
        Config {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token_url: endpoint(&base, ACCESS_TOKEN_PATH),
            bookmarks_url: endpoint(&base, BOOKMARKS_LIST_PATH),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            timeout: DEFAULT_TIMEOUT,
            bookmark_limit: DEFAULT_LIMIT,
        }
    }

    /// Read the settings from `INSTAPAPER_*` environment variables.
    ///
    /// The consumer key and secret are required, the rest fall back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Config::new(
            required_env(ENV_CONSUMER_KEY)?,
            required_env(ENV_CONSUMER_SECRET)?,
        );
        if let Some(base) = optional_env(ENV_API_BASE) {
            let base = Url::parse(&base)
                .map_err(|e| ConfigError::InvalidValue(ENV_API_BASE, e.to_string()))?;
            config = config.with_api_base(&base)?;
        }
        if let Some(path) = optional_env(ENV_TOKEN_FILE) {
            config = config.with_token_file(path);
        }
        if let Some(secs) = optional_env(ENV_TIMEOUT_SECS) {
            let secs = secs
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue(ENV_TIMEOUT_SECS, e.to_string()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(limit) = optional_env(ENV_LIMIT) {
            let limit = limit
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue(ENV_LIMIT, e.to_string()))?;
            config = config.with_bookmark_limit(limit);
        }
        Ok(config)
    }

    /// Point every endpoint at another host, e.g. a mock provider.
    pub fn with_api_base(self, base: &Url) -> ConfigResult<Self> {
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(ENV_API_BASE, base.to_string()));
        }
        Ok(Config {
            access_token_url: endpoint(base, ACCESS_TOKEN_PATH),
            bookmarks_url: endpoint(base, BOOKMARKS_LIST_PATH),
            ..self
        })
    }

    pub fn with_token_file<P: Into<PathBuf>>(self, token_file: P) -> Self {
        Config {
            token_file: token_file.into(),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Config { timeout, ..self }
    }

    pub fn with_bookmark_limit(self, bookmark_limit: u32) -> Self {
        Config {
            bookmark_limit,
            ..self
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Consumer secrets without a token, ready for signing.
    pub fn secrets(&self) -> Secrets<'_, ()> {
        Secrets::new(self.consumer_key.as_str(), self.consumer_secret.as_str())
    }

    pub fn access_token_url(&self) -> &Url {
        &self.access_token_url
    }

    pub fn bookmarks_url(&self) -> &Url {
        &self.bookmarks_url
    }

    pub fn token_file(&self) -> &PathBuf {
        &self.token_file
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn bookmark_limit(&self) -> u32 {
        self.bookmark_limit
    }

    /// A blocking HTTP client with the configured timeout applied.
    pub fn http_client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token_url", &self.access_token_url.as_str())
            .field("bookmarks_url", &self.bookmarks_url.as_str())
            .field("token_file", &self.token_file)
            .field("timeout", &self.timeout)
            .field("bookmark_limit", &self.bookmark_limit)
            .finish()
    }
}

fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn required_env(key: &'static str) -> ConfigResult<String> {
    optional_env(key).ok_or(ConfigError::MissingEnv(key))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
