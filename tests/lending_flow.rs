use book_ledger_rust::catalog::{BookCatalog, BOOKS_KEY};
use book_ledger_rust::cli::{self, BookCommand, Command, MemberCommand};
use book_ledger_rust::clock::FixedClock;
use book_ledger_rust::ledger::BorrowLedger;
use book_ledger_rust::stats::Stats;
use book_ledger_rust::storage::file::JsonFileStorage;
use book_ledger_rust::storage::{shared, SharedStorage, Storage};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::path::Path;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn open(path: &Path) -> SharedStorage {
    shared(JsonFileStorage::new(path))
}

fn run(path: &Path, today: NaiveDate, command: Command) -> String {
    let mut out = Vec::new();
    cli::execute(command, open(path), FixedClock(today), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn borrow_and_return_seed_book_across_reopened_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");

    let output = run(&path, date(2025, 9, 1), Command::Stats);
    assert_eq!(output, "Total books: 0\nAvailable books: 0\nTotal members: 0\nActive borrowings: 0\n");

    run(&path, date(2025, 9, 1), Command::Book(BookCommand::List { search: None }));
    let output = run(&path, date(2025, 9, 1), Command::Stats);
    assert_eq!(output, "Total books: 3\nAvailable books: 3\nTotal members: 0\nActive borrowings: 0\n");

    run(&path, date(2025, 9, 1), Command::Member(MemberCommand::List { search: None }));
    let output = run(&path, date(2025, 9, 1), Command::Borrow { book_id: "1".to_owned(), member_id: "1".to_owned() });
    assert!(output.starts_with("Borrowed: "));
    assert!(output.contains("The Great Gatsby\tJohn Doe\tborrowed 2025-09-01\tdue 2025-09-15"));

    let ledger = BorrowLedger::with_clock(open(&path), Box::new(FixedClock(date(2025, 9, 5)))).unwrap();
    let active = ledger.active().unwrap();
    assert_eq!(active.len(), 1);
    let record_id = active[0].id().to_owned();

    let catalog = BookCatalog::open(open(&path)).unwrap();
    assert!(!catalog.find("1").unwrap().unwrap().available());

    let output = run(&path, date(2025, 9, 5), Command::Return { record_id: record_id.clone() });
    assert!(output.contains("returned 2025-09-05"));
    assert!(catalog.find("1").unwrap().unwrap().available());

    let output = run(&path, date(2025, 9, 6), Command::Return { record_id });
    assert!(output.starts_with("Return ignored"));
}

#[test]
fn stats_match_direct_counts_after_mixed_operations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let today = date(2025, 10, 1);

    run(&path, today, Command::Member(MemberCommand::List { search: None }));
    run(&path, today, Command::Book(BookCommand::Add {
        title: "Middlemarch".to_owned(),
        author: "George Eliot".to_owned(),
        isbn: "9780141439549".to_owned(),
        category: "Classic".to_owned(),
    }));
    run(&path, today, Command::Borrow { book_id: "2".to_owned(), member_id: "2".to_owned() });
    run(&path, today, Command::Book(BookCommand::Delete { id: "3".to_owned() }));

    let storage = open(&path);
    let stats = Stats::collect(&**storage).unwrap();
    let books = BookCatalog::open(storage.clone()).unwrap().list().unwrap();
    let ledger = BorrowLedger::open(storage).unwrap();

    assert_eq!(stats.total_books, books.len());
    assert_eq!(stats.available_books, books.iter().filter(|b| b.available()).count());
    assert_eq!(stats.total_members, 2);
    assert_eq!(stats.active_borrowings, ledger.active().unwrap().len());
    assert_eq!(stats.total_books, 3);
    assert_eq!(stats.available_books, 2);
}

#[test]
fn overdue_records_are_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");

    run(&path, date(2025, 1, 1), Command::Member(MemberCommand::List { search: None }));
    run(&path, date(2025, 1, 1), Command::Book(BookCommand::List { search: None }));
    run(&path, date(2025, 1, 1), Command::Borrow { book_id: "3".to_owned(), member_id: "2".to_owned() });

    let output = run(&path, date(2025, 1, 15), Command::Records { overdue: true });
    assert!(output.contains("To Kill a Mockingbird\tJane Smith"));
    assert!(output.ends_with("\tOVERDUE\n"));

    let output = run(&path, date(2025, 1, 14), Command::Records { overdue: true });
    assert_eq!(output, "");

    let output = run(&path, date(2025, 1, 14), Command::Available);
    assert!(!output.contains("To Kill a Mockingbird"));
}

#[test]
fn search_command_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");

    let output = run(&path, date(2025, 1, 1), Command::Book(BookCommand::List { search: Some("gat".to_owned()) }));
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("1\tThe Great Gatsby\t"));

    let raw = JsonFileStorage::new(&path).get(BOOKS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"available\":true"));
}
