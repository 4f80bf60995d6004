use crate::catalog::BOOKS;
use crate::ledger::RECORDS;
use crate::member::MEMBERS;
use crate::storage::{Storage, StorageError};

/// 도서관 현황 요약
///
/// 캐싱하지 않으며 조회 할 때마다 저장된 컬렉션 전체로부터 다시 계산한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_books: usize,
    pub available_books: usize,
    pub total_members: usize,
    pub active_borrowings: usize,
}

impl Stats {
    pub fn collect(storage: &dyn Storage) -> Result<Self, StorageError> {
        let books = BOOKS.load_or_default(storage)?;
        let members = MEMBERS.load_or_default(storage)?;
        let records = RECORDS.load_or_default(storage)?;

        Ok(Self {
            total_books: books.len(),
            available_books: books.iter().filter(|book| book.available()).count(),
            total_members: members.len(),
            active_borrowings: records.iter().filter(|record| record.is_active()).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookCatalog, BookForm};
    use crate::clock::FixedClock;
    use crate::ledger::BorrowLedger;
    use crate::member::MemberDirectory;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::shared;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_storage_counts_nothing() {
        let storage = MemoryStorage::new();

        assert_eq!(Stats::collect(&storage).unwrap(), Stats::default());
        assert!(storage.is_empty());
    }

    #[test]
    fn counts_follow_every_mutation() {
        let storage = shared(MemoryStorage::new());
        let catalog = BookCatalog::open(storage.clone()).unwrap();
        let directory = MemberDirectory::open(storage.clone()).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let ledger = BorrowLedger::with_clock(storage.clone(), Box::new(FixedClock(today))).unwrap();

        let expected = Stats { total_books: 3, available_books: 3, total_members: 2, active_borrowings: 0 };
        assert_eq!(Stats::collect(&**storage).unwrap(), expected);

        let record = ledger.borrow("1", "2").unwrap().unwrap();
        ledger.borrow("2", "1").unwrap().unwrap();
        catalog.create(BookForm { title: "Beloved".to_owned(), ..BookForm::default() }).unwrap();
        directory.delete("2").unwrap();

        let expected = Stats { total_books: 4, available_books: 2, total_members: 1, active_borrowings: 2 };
        assert_eq!(Stats::collect(&**storage).unwrap(), expected);

        ledger.return_record(record.id()).unwrap().unwrap();
        let stats = Stats::collect(&**storage).unwrap();
        assert_eq!(stats.available_books, 3);
        assert_eq!(stats.active_borrowings, 1);
        assert_eq!(stats.active_borrowings, ledger.active().unwrap().len());
        assert_eq!(stats.available_books, ledger.available_books().unwrap().len());
    }
}
