use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed key the preview token is stored under.
const TOKEN_KEY: &str = "ai-token";

const TOKEN_PATH_ENV: &str = "CODEMEND_TOKEN_PATH";

/// Single-value key-value store persisting the optional preview token across
/// runs. Backed by one small JSON object file; read and written whole.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_path() -> Self {
        Self::new(default_path())
    }

    pub fn load(&self) -> Result<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("reading token store {}", self.path.display()))
            }
        };

        let map: Map<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing token store {}", self.path.display()))?;
        Ok(map
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    pub fn save(&self, token: Option<&str>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let mut map = Map::new();
        if let Some(token) = token {
            map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        }
        let raw = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing token store {}", self.path.display()))
    }
}

fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var(TOKEN_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".codemend").join("token.json"),
        Err(_) => PathBuf::from(".codemend-token.json"),
    }
}
