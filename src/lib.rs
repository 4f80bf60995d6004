use crate::configs::ConfigError;
use crate::storage::StorageError;
use std::fmt;
use std::fmt::Formatter;

pub mod catalog;
pub mod cli;
pub mod clock;
pub mod configs;
pub mod id;
pub mod ledger;
pub mod member;
pub mod search;
pub mod stats;
pub mod storage;

/// 프로그램 실행 중 발생한 에러 열거
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Storage(StorageError),

    /// 결과 출력 실패
    Output(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "{}", e),
            AppError::Output(message) => write!(f, "Failed to write output, {}", message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Output(e.to_string())
    }
}
