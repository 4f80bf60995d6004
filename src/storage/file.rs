use crate::storage::{Storage, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// JSON 파일 하나를 키/값 저장소로 사용하는 저장소
///
/// 파일은 `{ "키": "값" }` 형태의 JSON 객체로 저장되며 모든 쓰기는
/// 임시 파일에 기록한 후 원본 파일로 이름을 바꾸는 방식으로 이루어진다.
/// 따라서 [`Storage::set_all`]로 전달된 키들은 모두 저장되거나 모두 저장되지 않는다.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io(format!("{} ({})", e, self.path.display()))),
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str::<Entries>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("저장소 파일을 읽을 수 없어 빈 저장소로 취급 합니다. => {} ({})", e, self.path.display());
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("{} ({})", e, parent.display())))?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)
            .map_err(|e| StorageError::Io(format!("{} ({})", e, tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::Io(format!("{} ({})", e, self.path.display())))?;

        debug!("저장소 파일 갱신 완료 ({}, {} keys)", self.path.display(), entries.len());
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries)
    }

    fn set_all(&self, values: Vec<(String, String)>) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.extend(values);
        self.write_entries(&entries)
    }
}
