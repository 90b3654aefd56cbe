use std::path::PathBuf;

use iroh::SecretKey;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static DATA_DIR_NAME: &str = "threadline";
static THREADLINE_DB_NAME: &str = "threadline.sqlite";
static CONFIG_FILE_NAME: &str = "config.json";

// data_dir_path
// |- threadline
//    |- threadline.sqlite
//    |- config.json

fn default_secret_key() -> SecretKey {
    SecretKey::generate(&mut rand::rng())
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ThreadlineConfig {
    /// Secret key for the local node/instance.
    #[serde(default = "default_secret_key")]
    pub(crate) secret_key: SecretKey,

    /// Secret key for the local client endpoint (separate from node secret).
    #[serde(default = "default_secret_key")]
    pub(crate) client_secret_key: SecretKey,

    pub(crate) database_path: PathBuf,

    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub(crate) log_filter: String,
}

impl ThreadlineConfig {
    /// Creates a new config with generated secret keys rooted at `data_dir`
    fn new(data_dir: PathBuf) -> Self {
        ThreadlineConfig {
            secret_key: default_secret_key(),
            client_secret_key: default_secret_key(),
            database_path: data_dir.join(THREADLINE_DB_NAME),
            log_filter: default_log_filter(),
        }
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.database_path
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

/// Gets the existing config or initializes a new one if it doesn't exist
pub async fn get_or_init() -> Result<ThreadlineConfig, Box<dyn std::error::Error>> {
    let data_dir = dirs::data_dir().ok_or("failed to find a data directory on this platform")?;
    load_or_create(data_dir.join(DATA_DIR_NAME)).await
}

/// Reads `config.json` from `dir`, writing a fresh one first if it is missing.
pub async fn load_or_create(dir: PathBuf) -> Result<ThreadlineConfig, Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    fs::create_dir_all(&dir).await?;

    if fs::try_exists(&config_path).await? {
        let mut file = fs::File::open(&config_path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let config: ThreadlineConfig = serde_json::from_str(&contents)?;
        Ok(config)
    } else {
        let config = ThreadlineConfig::new(dir);

        let json = serde_json::to_string_pretty(&config)?;
        let mut file = fs::File::create(&config_path).await?;
        file.write_all(json.as_bytes()).await?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("threadline-config-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn creates_then_reloads_config() {
        let dir = scratch_dir("roundtrip");
        let _ = fs::remove_dir_all(&dir).await;

        let created = load_or_create(dir.clone()).await.unwrap();
        assert_eq!(created.database_path, dir.join(THREADLINE_DB_NAME));
        assert_eq!(created.log_filter(), "info");

        let reloaded = load_or_create(dir.clone()).await.unwrap();
        assert_eq!(reloaded.database_path, created.database_path);
        assert_eq!(reloaded.secret_key.public(), created.secret_key.public());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_log_filter_defaults_to_info() {
        let dir = scratch_dir("legacy");
        let _ = fs::remove_dir_all(&dir).await;
        fs::create_dir_all(&dir).await.unwrap();

        let legacy = serde_json::json!({ "database_path": dir.join("db.sqlite") });
        fs::write(dir.join(CONFIG_FILE_NAME), legacy.to_string())
            .await
            .unwrap();

        let config = load_or_create(dir.clone()).await.unwrap();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.database_path, dir.join("db.sqlite"));

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
