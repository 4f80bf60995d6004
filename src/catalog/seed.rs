use crate::catalog::{Book, BookForm};

fn sample(id: &str, title: &str, author: &str, isbn: &str, category: &str) -> Book {
    Book::new(id.to_owned(), BookForm {
        title: title.to_owned(),
        author: author.to_owned(),
        isbn: isbn.to_owned(),
        category: category.to_owned(),
    })
}

/// 카탈로그가 처음 열릴 때 저장되는 샘플 도서
pub(super) fn books() -> Vec<Book> {
    vec![
        sample("1", "The Great Gatsby", "F. Scott Fitzgerald", "9780743273565", "Fiction"),
        sample("2", "1984", "George Orwell", "9780451524935", "Fiction"),
        sample("3", "To Kill a Mockingbird", "Harper Lee", "9780061120084", "Fiction"),
    ]
}
