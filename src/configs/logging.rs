use crate::configs::ConfigError;
use serde::Deserialize;
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// 설정 파일의 `logger` 항목
///
/// 이 항목이 없으면 [`set_default_logging`]이 사용되어 WARN 이상의 로그만 stderr로 출력된다.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// 로그 파일이 생성될 디렉토리
    dir: String,

    /// 로그 파일 이름의 접두어, 실제 파일은 `{name}.{날짜}.log` 형태로 생성된다.
    name: String,

    /// 보관할 로그 파일 수, 없으면 오래된 파일을 지우지 않는다.
    keep: Option<usize>,

    /// 기록할 최소 로그 레벨 (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
    ///
    /// `logger` 항목은 있지만 레벨이 없는 경우 파일과 stdout 모두 DEBUG 이상을 기록한다.
    level: Option<String>,

    /// 로그 파일을 나누는 주기 (`DAILY`, `HOURLY`, `MINUTELY`, `NEVER`), 없으면 DAILY
    rotation: Option<String>
}

impl Config {
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keep(&self) -> Option<usize> {
        self.keep
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    pub fn rotation(&self) -> Option<&str> {
        self.rotation.as_deref()
    }
}

/// 파일과 stdout에 JSON 형식으로 로그를 남기도록 전역 로깅 옵션을 설정한다.
///
/// 반환된 [`WorkerGuard`]가 drop 되면 파일 로그 기록이 중단 됨으로 프로그램 종료 시까지 유지해야 한다.
pub fn set_global_logging_config(c: &Config) -> Result<WorkerGuard, ConfigError> {
    let rotation = c.rotation().map(parse_rotation).transpose()?
        .unwrap_or(rolling::Rotation::DAILY);
    let level = c.level().map(parse_level).transpose()?
        .unwrap_or(tracing::Level::DEBUG);

    let mut file_appender = rolling::RollingFileAppender::builder()
        .filename_prefix(c.name())
        .filename_suffix("log")
        .rotation(rotation);

    if let Some(keep) = c.keep() {
        file_appender = file_appender.max_log_files(keep);
    }

    let file_appender = file_appender.build(c.dir())
        .map_err(|e| ConfigError::InvalidLogging(e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = std::io::stdout.and(non_blocking);

    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_writer(writer)
        .with_max_level(level)
        .try_init()
        .map_err(|e| ConfigError::InvalidLogging(e.to_string()))?;

    info!("로깅 설정 완료 (디렉토리: {}, 파일: {}, 레벨: {})", c.dir(), c.name(), level);
    Ok(guard)
}

/// 로깅 설정이 없을 때 사용하는 기본 로깅, 경고 이상의 로그만 stderr로 출력한다.
pub fn set_default_logging() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .try_init()
        .map_err(|e| ConfigError::InvalidLogging(e.to_string()))
}

fn parse_rotation(s: &str) -> Result<rolling::Rotation, ConfigError> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(ConfigError::InvalidLogging(format!(
            "로깅 파일 로테이션(rotation)은 \"DAILY\", \"HOURLY\", \"MINUTELY\", \"NEVER\"만 가능 합니다. (입력 값: {})", s
        )))
    }
}

fn parse_level(l: &str) -> Result<tracing::Level, ConfigError> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::InvalidLogging(format!(
            "로그 레벨(level)은 \"TRACE\", \"DEBUG\", \"INFO\", \"WARN\", \"ERROR\"만 가능 합니다. (입력 값: {})", l
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_and_rotations_parse() {
        assert_eq!(parse_level("INFO").unwrap(), tracing::Level::INFO);
        assert_eq!(parse_rotation("NEVER").unwrap(), rolling::Rotation::NEVER);
    }

    #[test]
    fn unknown_values_are_config_errors() {
        assert!(matches!(parse_level("VERBOSE"), Err(ConfigError::InvalidLogging(_))));
        assert!(matches!(parse_rotation("DALY"), Err(ConfigError::InvalidLogging(_))));
    }
}
