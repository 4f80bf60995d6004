use crate::catalog::{Book, BOOKS};
use crate::clock::{Clock, SystemClock};
use crate::id;
use crate::member::MEMBERS;
use crate::storage::{Collection, SharedStorage, StorageError};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

pub const RECORDS_KEY: &str = "library_records";

/// 대출 기록 컬렉션 (`library_records`)
pub const RECORDS: Collection<BorrowRecord> = Collection::new(RECORDS_KEY);

/// 대출 기간 (일)
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// 반납 이력 화면에 보여줄 최대 기록 수, 저장 개수를 제한하지는 않는다.
pub const RETURN_HISTORY_LIMIT: usize = 6;

/// 대출 기록
///
/// 도서 제목과 회원 이름은 대출 시점의 값이 복사되어 저장되며
/// 이후 도서나 회원이 수정/삭제 되어도 갱신되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    id: String,
    book_id: String,
    book_title: String,
    member_id: String,
    member_name: String,
    borrow_date: NaiveDate,
    due_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_date: Option<NaiveDate>,
}

impl BorrowRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    pub fn borrow_date(&self) -> NaiveDate {
        self.borrow_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// 아직 반납되지 않은 기록인지 확인한다.
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// 반납되지 않았고 반납 예정일이 `today`와 같거나 이전인 경우 연체로 판단한다.
    /// 반납 예정일 당일부터 연체로 표시되며, 저장되는 값이 아닌 조회 시점에 계산되는 값이다.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date <= today
    }
}

/// 대출 원장
///
/// 대출/반납 시 기록 컬렉션과 도서 컬렉션을 함께 갱신하여 도서의 대출 가능 여부를 동기화 한다.
/// 두 컬렉션은 [`crate::storage::Storage::set_all`]로 한번에 저장된다.
pub struct BorrowLedger {
    storage: SharedStorage,
    clock: Box<dyn Clock>,
}

impl BorrowLedger {
    pub fn open(storage: SharedStorage) -> Result<Self, StorageError> {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: SharedStorage, clock: Box<dyn Clock>) -> Result<Self, StorageError> {
        RECORDS.load_or_seed(&**storage, Vec::new)?;
        Ok(Self { storage, clock })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// 저장된 모든 대출 기록을 저장 순서대로 반환한다.
    pub fn records(&self) -> Result<Vec<BorrowRecord>, StorageError> {
        RECORDS.load_or_default(&**self.storage)
    }

    /// 반납되지 않은 기록, 저장 순서를 유지한다.
    pub fn active(&self) -> Result<Vec<BorrowRecord>, StorageError> {
        Ok(self.records()?.into_iter().filter(BorrowRecord::is_active).collect())
    }

    /// 반납된 기록을 최근 반납 순으로 반환한다.
    /// 반납일이 같은 경우 나중에 저장된 기록이 먼저 온다.
    pub fn returned(&self) -> Result<Vec<BorrowRecord>, StorageError> {
        let mut returned = self.records()?.into_iter()
            .rev()
            .filter(|record| !record.is_active())
            .collect::<Vec<_>>();
        returned.sort_by_key(|record| Reverse(record.return_date));
        Ok(returned)
    }

    /// 반납 이력 화면용, 최근 [`RETURN_HISTORY_LIMIT`]개의 반납 기록
    pub fn recent_returns(&self) -> Result<Vec<BorrowRecord>, StorageError> {
        let mut returned = self.returned()?;
        returned.truncate(RETURN_HISTORY_LIMIT);
        Ok(returned)
    }

    pub fn overdue(&self) -> Result<Vec<BorrowRecord>, StorageError> {
        let today = self.today();
        Ok(self.records()?.into_iter().filter(|record| record.is_overdue(today)).collect())
    }

    /// 대출 가능한 도서 목록
    pub fn available_books(&self) -> Result<Vec<Book>, StorageError> {
        Ok(BOOKS.load_or_default(&**self.storage)?.into_iter().filter(Book::available).collect())
    }

    /// 도서를 대출한다.
    ///
    /// 도서나 회원 아이디가 비어 있거나 존재하지 않는 경우 아무것도 하지 않고 `None`을 반환한다.
    /// 대출에 성공하면 새 대출 기록을 원장에 추가하고 도서를 대출 불가 상태로 변경한다.
    pub fn borrow(&self, book_id: &str, member_id: &str) -> Result<Option<BorrowRecord>, StorageError> {
        if book_id.is_empty() || member_id.is_empty() {
            debug!("도서 또는 회원이 선택되지 않아 대출을 무시 합니다.");
            return Ok(None);
        }

        let mut books = BOOKS.load_or_default(&**self.storage)?;
        let members = MEMBERS.load_or_default(&**self.storage)?;

        let Some(book) = books.iter_mut().find(|book| book.id() == book_id) else {
            debug!("대출할 도서를 찾을 수 없습니다. (도서 ID: {})", book_id);
            return Ok(None);
        };
        let Some(member) = members.iter().find(|member| member.id() == member_id) else {
            debug!("대출할 회원을 찾을 수 없습니다. (회원 ID: {})", member_id);
            return Ok(None);
        };

        let borrow_date = self.today();
        let Some(due_date) = borrow_date.checked_add_days(Days::new(LOAN_PERIOD_DAYS)) else {
            warn!("반납 예정일을 계산할 수 없습니다. (대출일: {})", borrow_date);
            return Ok(None);
        };

        if !book.available() {
            warn!("이미 대출 중인 도서가 다시 대출 됩니다. (도서 ID: {})", book_id);
        }

        let record = BorrowRecord {
            id: id::generate(),
            book_id: book.id().to_owned(),
            book_title: book.title().to_owned(),
            member_id: member.id().to_owned(),
            member_name: member.name().to_owned(),
            borrow_date,
            due_date,
            return_date: None,
        };
        book.set_available(false);

        let mut records = self.records()?;
        records.push(record.clone());
        self.storage.set_all(vec![RECORDS.entry(&records)?, BOOKS.entry(&books)?])?;

        info!("대출 완료 (기록 ID: {}, 도서 ID: {}, 회원 ID: {}, 반납 예정일: {})",
            record.id, record.book_id, record.member_id, record.due_date);
        Ok(Some(record))
    }

    /// 대출 기록을 반납 처리한다.
    ///
    /// 반납일을 오늘로 설정하고 기록이 참조하는 도서를 대출 가능 상태로 변경한다.
    /// 기록이 없거나 이미 반납된 기록인 경우 아무것도 하지 않고 `None`을 반환한다.
    pub fn return_record(&self, record_id: &str) -> Result<Option<BorrowRecord>, StorageError> {
        let mut records = self.records()?;
        let Some(record) = records.iter_mut().find(|record| record.id == record_id) else {
            debug!("반납할 대출 기록을 찾을 수 없습니다. (기록 ID: {})", record_id);
            return Ok(None);
        };

        if let Some(returned_at) = record.return_date {
            debug!("이미 반납된 기록 입니다. (기록 ID: {}, 반납일: {})", record_id, returned_at);
            return Ok(None);
        }

        record.return_date = Some(self.today());
        let returned = record.clone();

        let mut entries = vec![RECORDS.entry(&records)?];
        let mut books = BOOKS.load_or_default(&**self.storage)?;
        if let Some(book) = books.iter_mut().find(|book| book.id() == returned.book_id) {
            book.set_available(true);
            entries.push(BOOKS.entry(&books)?);
        } else {
            debug!("반납된 도서가 카탈로그에 없습니다. (도서 ID: {})", returned.book_id);
        }
        self.storage.set_all(entries)?;

        info!("반납 완료 (기록 ID: {}, 도서 ID: {})", returned.id, returned.book_id);
        Ok(Some(returned))
    }
}
