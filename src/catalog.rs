mod seed;

use crate::id;
use crate::search::contains_ignore_case;
use crate::storage::{Collection, SharedStorage, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const BOOKS_KEY: &str = "library_books";

/// 도서 컬렉션 (`library_books`)
pub const BOOKS: Collection<Book> = Collection::new(BOOKS_KEY);

/// 도서
///
/// `available`은 대출 원장에 의해서만 변경된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: String,
    title: String,
    author: String,
    isbn: String,
    category: String,
    available: bool,
}

impl Book {
    fn new(id: String, form: BookForm) -> Self {
        Self {
            id,
            title: form.title,
            author: form.author,
            isbn: form.isbn,
            category: form.category,
            available: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// 제목, 저자, ISBN 중 하나라도 검색어를 포함하고 있는지 확인한다.
    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.title, term)
            || contains_ignore_case(&self.author, term)
            || contains_ignore_case(&self.isbn, term)
    }
}

/// 도서 등록 폼
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
}

/// 도서 수정 내용, 값이 있는 항목만 기존 도서에 병합된다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
}

impl BookPatch {
    fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
        if let Some(category) = self.category {
            book.category = category;
        }
    }
}

/// 검색어와 일치하는 도서만 순서를 유지하여 반환한다.
pub fn filter<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    books.iter()
        .filter(|book| book.matches(term))
        .collect()
}

/// 도서 카탈로그 저장소
///
/// 모든 연산은 저장소에서 컬렉션 전체를 읽고, 변경을 적용한 뒤 전체를 다시 저장한다.
pub struct BookCatalog {
    storage: SharedStorage,
}

impl BookCatalog {

    /// 카탈로그를 연다. 저장된 도서 컬렉션이 없을 경우 샘플 도서를 저장한다.
    pub fn open(storage: SharedStorage) -> Result<Self, StorageError> {
        BOOKS.load_or_seed(&**storage, seed::books)?;
        Ok(Self { storage })
    }

    pub fn list(&self) -> Result<Vec<Book>, StorageError> {
        BOOKS.load_or_default(&**self.storage)
    }

    pub fn find(&self, id: &str) -> Result<Option<Book>, StorageError> {
        Ok(self.list()?.into_iter().find(|book| book.id == id))
    }

    pub fn search(&self, term: &str) -> Result<Vec<Book>, StorageError> {
        Ok(self.list()?.into_iter().filter(|book| book.matches(term)).collect())
    }

    /// 새 도서를 등록한다. 등록된 도서는 대출 가능 상태로 시작한다.
    pub fn create(&self, form: BookForm) -> Result<Book, StorageError> {
        let mut books = self.list()?;
        let book = Book::new(id::generate(), form);
        books.push(book.clone());
        self.save(&books)?;

        info!("도서 등록 완료 (ID: {}, ISBN: {})", book.id, book.isbn);
        Ok(book)
    }

    /// 아이디에 해당하는 도서에 수정 내용을 병합한다.
    /// 도서를 찾지 못하면 아무것도 저장하지 않고 `None`을 반환한다.
    pub fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StorageError> {
        let mut books = self.list()?;
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            debug!("수정할 도서를 찾을 수 없습니다. (ID: {})", id);
            return Ok(None);
        };

        patch.apply(book);
        let updated = book.clone();
        self.save(&books)?;

        info!("도서 수정 완료 (ID: {})", id);
        Ok(Some(updated))
    }

    /// 아이디에 해당하는 도서를 삭제하고 삭제 여부를 반환한다.
    /// 해당 도서를 참조하는 대출 기록은 변경하지 않는다.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut books = self.list()?;
        let before = books.len();
        books.retain(|book| book.id != id);

        if books.len() == before {
            debug!("삭제할 도서를 찾을 수 없습니다. (ID: {})", id);
            return Ok(false);
        }

        self.save(&books)?;
        info!("도서 삭제 완료 (ID: {})", id);
        Ok(true)
    }

    fn save(&self, books: &[Book]) -> Result<(), StorageError> {
        BOOKS.save(&**self.storage, books)
    }
}
