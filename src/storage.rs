pub mod file;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::warn;

/// 저장소 사용 중 발생한 에러 열거
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// 파일 읽기/쓰기 실패
    Io(String),

    /// 레코드 직렬화 실패
    Encode(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(message) => write!(f, "Storage I/O failed, {}", message),
            StorageError::Encode(message) => write!(f, "Storage encoding failed, {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

/// 문자열 키/값 저장소
///
/// 각 스토어는 전역 상태 대신 이 트레이트를 주입 받아 사용한다.
/// 키 하나에는 컬렉션 전체가 JSON 문자열로 저장 된다.
pub trait Storage {

    /// 키에 저장된 값을 가져온다. 저장된 값이 없다면 `None`을 반환한다.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 키에 값을 저장한다. 기존 값은 덮어 쓴다.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// 여러 키를 한번에 저장한다.
    ///
    /// 기본 구현은 순서대로 [`Storage::set`]을 호출 함으로 중간에 실패하면 앞선 키만 저장된 상태로 남는다.
    /// 여러 키를 하나의 단위로 저장 할 수 있는 저장소는 이 함수를 재정의 해야 한다.
    fn set_all(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }
}

pub type SharedStorage = Rc<Box<dyn Storage>>;

pub fn shared<S: Storage + 'static>(storage: S) -> SharedStorage {
    Rc::new(Box::new(storage))
}

/// 저장소 키 하나에 묶인 레코드 컬렉션
///
/// 컬렉션은 항상 전체를 읽고 전체를 쓴다. 부분 쓰기는 없다.
#[derive(Debug)]
pub struct Collection<T> {
    key: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> Collection<T> {
    pub const fn new(key: &'static str) -> Self {
        Self { key, _phantom: PhantomData }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned
{
    /// 저장된 컬렉션을 읽는다.
    /// 값이 없거나 JSON 형식이 올바르지 않은 경우 모두 `None`으로 취급한다.
    pub fn load(&self, storage: &dyn Storage) -> Result<Option<Vec<T>>, StorageError> {
        let Some(raw) = storage.get(self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!("{}에 저장된 데이터를 읽을 수 없어 빈 값으로 취급 합니다. => {}", self.key, e);
                Ok(None)
            }
        }
    }

    pub fn load_or_default(&self, storage: &dyn Storage) -> Result<Vec<T>, StorageError> {
        Ok(self.load(storage)?.unwrap_or_default())
    }

    /// 저장된 컬렉션을 읽고, 없을 경우 `seed`로 생성한 컬렉션을 저장 후 반환한다.
    pub fn load_or_seed<F>(&self, storage: &dyn Storage, seed: F) -> Result<Vec<T>, StorageError>
    where
        F: FnOnce() -> Vec<T>
    {
        if let Some(items) = self.load(storage)? {
            return Ok(items);
        }

        let items = seed();
        self.save(storage, &items)?;
        Ok(items)
    }

    pub fn encode(&self, items: &[T]) -> Result<String, StorageError> {
        serde_json::to_string(items)
            .map_err(|e| StorageError::Encode(format!("{} ({})", e, self.key)))
    }

    /// [`Storage::set_all`]에 전달할 (키, 값) 엔트리를 만든다.
    pub fn entry(&self, items: &[T]) -> Result<(String, String), StorageError> {
        Ok((self.key.to_owned(), self.encode(items)?))
    }

    pub fn save(&self, storage: &dyn Storage, items: &[T]) -> Result<(), StorageError> {
        storage.set(self.key, self.encode(items)?)
    }
}
