pub mod logging;

use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_RUN_MODE: &str = "development";
const DEFAULT_STORAGE_PATH: &str = "library.json";

/// 설정 로드 중 발생한 에러 열거
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 설정 파일 혹은 환경 변수를 읽을 수 없음
    LoadFailed(String),

    /// 로깅 설정 값이 올바르지 않음
    InvalidLogging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed(message) => write!(f, "Failed to load config, {}", message),
            ConfigError::InvalidLogging(message) => write!(f, "Invalid logging config, {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::LoadFailed(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    path: PathBuf,
}

impl StorageConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    storage: StorageConfig,
    logger: Option<logging::Config>,
}

impl AppConfig {
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn logger(&self) -> Option<&logging::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `RUN_MODE` 환경 변수에 해당하는 `config/{RUN_MODE}.json` 설정을 읽는다.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| DEFAULT_RUN_MODE.into());
    load_config_from(Path::new("config"), &run_mode)
}

/// 설정은 아래 순서로 병합되며 뒤에 오는 값이 앞의 값을 덮어 쓴다.
///
/// 1. 기본값 (`storage.path = library.json`)
/// 2. `{dir}/{run_mode}.json` 파일 (없어도 무관)
/// 3. `LIBRARY__` 접두어를 가진 환경 변수 (예: `LIBRARY__STORAGE__PATH`)
pub fn load_config_from(dir: &Path, run_mode: &str) -> Result<AppConfig, ConfigError> {
    let file = dir.join(format!("{}.json", run_mode));
    let config = config::Config::builder()
        .set_default("storage.path", DEFAULT_STORAGE_PATH)?
        .add_source(config::File::from(file).required(false))
        .add_source(config::Environment::with_prefix("LIBRARY").prefix_separator("__").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
