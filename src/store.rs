use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{Config, StoreError, StoreResult, TokenPair};

pub const ENV_OAUTH_TOKEN: &str = "INSTAPAPER_OAUTH_TOKEN";
pub const ENV_OAUTH_TOKEN_SECRET: &str = "INSTAPAPER_OAUTH_TOKEN_SECRET";

/// Where the token pair lives between runs.
///
/// `load` prefers the environment (unattended runs), then the token file
/// written by the one-time interactive setup.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    token_env: &'static str,
    secret_env: &'static str,
}

impl TokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        TokenStore {
            path: path.into(),
            token_env: ENV_OAUTH_TOKEN,
            secret_env: ENV_OAUTH_TOKEN_SECRET,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        TokenStore::new(config.token_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no token pair has been set up yet.
    pub fn load(&self) -> StoreResult<Option<TokenPair>> {
        let token = env::var(self.token_env).ok().filter(|v| !v.is_empty());
        let secret = env::var(self.secret_env).ok().filter(|v| !v.is_empty());
        if let (Some(token), Some(secret)) = (token, secret) {
            log::debug!("using token pair from {}", self.token_env);
            return Ok(Some(TokenPair::new(token, secret)));
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no token file at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let pair: TokenPair =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        if pair.oauth_token.is_empty() || pair.oauth_token_secret.is_empty() {
            log::warn!(
                "ignoring blank token pair in {}, run the setup again",
                self.path.display()
            );
            return Ok(None);
        }
        log::debug!("using token pair from {}", self.path.display());
        Ok(Some(pair))
    }

    pub fn save(&self, pair: &TokenPair) -> StoreResult<()> {
        let content = serde_json::to_string(pair).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        self.write(content.as_bytes())
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        log::warn!(
            "{} holds durable credentials; keep it out of version control and any published directory",
            self.path.display()
        );
        Ok(())
    }

    fn write(&self, content: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(content)?;
        file.sync_all()
    }
}
