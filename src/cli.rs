use crate::catalog::{Book, BookCatalog, BookForm, BookPatch};
use crate::clock::Clock;
use crate::ledger::{BorrowLedger, BorrowRecord};
use crate::member::{Member, MemberDirectory, MemberForm, MemberPatch};
use crate::stats::Stats;
use crate::storage::SharedStorage;
use crate::AppError;
use chrono::NaiveDate;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// 도서관 도서/회원/대출 관리 도구
#[derive(Debug, Parser)]
#[command(name = "book-ledger", version, about)]
pub struct Cli {
    /// 저장소 파일 경로, 설정 파일의 `storage.path`보다 우선한다.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 도서관 현황 요약
    Stats,

    /// 도서 카탈로그 관리
    #[command(subcommand)]
    Book(BookCommand),

    /// 회원 명부 관리
    #[command(subcommand)]
    Member(MemberCommand),

    /// 도서 대출
    Borrow {
        book_id: String,
        member_id: String,
    },

    /// 대출 기록 반납
    Return {
        record_id: String,
    },

    /// 대출 중인 기록과 최근 반납 이력
    Records {
        /// 연체된 기록만 출력
        #[arg(long)]
        overdue: bool,
    },

    /// 대출 가능한 도서 목록
    Available,
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        title: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        author: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        isbn: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        category: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        email: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        phone: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Delete {
        id: String,
    },
}

/// 명령을 실행하고 결과를 `out`에 출력한다.
///
/// 각 명령은 필요한 스토어만 열어 사용하며 스토어 간에 공유하는 메모리 상태는 없다.
pub fn execute<C, W>(command: Command, storage: SharedStorage, clock: C, out: &mut W) -> Result<(), AppError>
where
    C: Clock + 'static,
    W: Write
{
    match command {
        Command::Stats => {
            let stats = Stats::collect(&**storage)?;
            writeln!(out, "Total books: {}", stats.total_books)?;
            writeln!(out, "Available books: {}", stats.available_books)?;
            writeln!(out, "Total members: {}", stats.total_members)?;
            writeln!(out, "Active borrowings: {}", stats.active_borrowings)?;
        }
        Command::Book(command) => execute_book(command, BookCatalog::open(storage)?, out)?,
        Command::Member(command) => {
            let directory = MemberDirectory::with_clock(storage, Box::new(clock))?;
            execute_member(command, directory, out)?
        }
        Command::Borrow { book_id, member_id } => {
            let ledger = BorrowLedger::with_clock(storage, Box::new(clock))?;
            match ledger.borrow(&book_id, &member_id)? {
                Some(record) => writeln!(out, "Borrowed: {}", format_active(&record, ledger.today()))?,
                None => writeln!(out, "Borrow ignored: book or member not found")?,
            }
        }
        Command::Return { record_id } => {
            let ledger = BorrowLedger::with_clock(storage, Box::new(clock))?;
            match ledger.return_record(&record_id)? {
                Some(record) => writeln!(out, "Returned: {}", format_returned(&record))?,
                None => writeln!(out, "Return ignored: no active record {}", record_id)?,
            }
        }
        Command::Records { overdue } => {
            let ledger = BorrowLedger::with_clock(storage, Box::new(clock))?;
            let today = ledger.today();
            if overdue {
                for record in ledger.overdue()? {
                    writeln!(out, "{}", format_active(&record, today))?;
                }
                return Ok(());
            }

            writeln!(out, "Active borrowings:")?;
            for record in ledger.active()? {
                writeln!(out, "{}", format_active(&record, today))?;
            }
            writeln!(out, "Return history:")?;
            for record in ledger.recent_returns()? {
                writeln!(out, "{}", format_returned(&record))?;
            }
        }
        Command::Available => {
            let ledger = BorrowLedger::with_clock(storage, Box::new(clock))?;
            for book in ledger.available_books()? {
                writeln!(out, "{}", format_book(&book))?;
            }
        }
    }
    Ok(())
}

fn execute_book<W: Write>(command: BookCommand, catalog: BookCatalog, out: &mut W) -> Result<(), AppError> {
    match command {
        BookCommand::List { search } => {
            let books = match search {
                Some(term) => catalog.search(&term)?,
                None => catalog.list()?,
            };
            for book in books {
                writeln!(out, "{}", format_book(&book))?;
            }
        }
        BookCommand::Add { title, author, isbn, category } => {
            let book = catalog.create(BookForm { title, author, isbn, category })?;
            writeln!(out, "Added: {}", format_book(&book))?;
        }
        BookCommand::Update { id, title, author, isbn, category } => {
            match catalog.update(&id, BookPatch { title, author, isbn, category })? {
                Some(book) => writeln!(out, "Updated: {}", format_book(&book))?,
                None => writeln!(out, "Update ignored: no book {}", id)?,
            }
        }
        BookCommand::Delete { id } => {
            if catalog.delete(&id)? {
                writeln!(out, "Deleted book {}", id)?;
            } else {
                writeln!(out, "Delete ignored: no book {}", id)?;
            }
        }
    }
    Ok(())
}

fn execute_member<W: Write>(command: MemberCommand, directory: MemberDirectory, out: &mut W) -> Result<(), AppError> {
    match command {
        MemberCommand::List { search } => {
            let members = match search {
                Some(term) => directory.search(&term)?,
                None => directory.list()?,
            };
            for member in members {
                writeln!(out, "{}", format_member(&member))?;
            }
        }
        MemberCommand::Add { name, email, phone } => {
            let member = directory.create(MemberForm { name, email, phone })?;
            writeln!(out, "Added: {}", format_member(&member))?;
        }
        MemberCommand::Update { id, name, email, phone } => {
            match directory.update(&id, MemberPatch { name, email, phone })? {
                Some(member) => writeln!(out, "Updated: {}", format_member(&member))?,
                None => writeln!(out, "Update ignored: no member {}", id)?,
            }
        }
        MemberCommand::Delete { id } => {
            if directory.delete(&id)? {
                writeln!(out, "Deleted member {}", id)?;
            } else {
                writeln!(out, "Delete ignored: no member {}", id)?;
            }
        }
    }
    Ok(())
}

fn format_book(book: &Book) -> String {
    let status = if book.available() { "Available" } else { "Borrowed" };
    format!("{}\t{}\t{}\t{}\t{}\t{}", book.id(), book.title(), book.author(), book.isbn(), book.category(), status)
}

fn format_member(member: &Member) -> String {
    format!("{}\t{}\t{}\t{}\tjoined {}", member.id(), member.name(), member.email(), member.phone(), member.join_date())
}

fn format_active(record: &BorrowRecord, today: NaiveDate) -> String {
    let mut line = format!("{}\t{}\t{}\tborrowed {}\tdue {}",
        record.id(), record.book_title(), record.member_name(), record.borrow_date(), record.due_date());
    if record.is_overdue(today) {
        line.push_str("\tOVERDUE");
    }
    line
}

fn format_returned(record: &BorrowRecord) -> String {
    let returned = record.return_date().map(|d| d.to_string()).unwrap_or_default();
    format!("{}\t{}\t{}\tborrowed {}\treturned {}",
        record.id(), record.book_title(), record.member_name(), record.borrow_date(), returned)
}
