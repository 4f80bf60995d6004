use crate::member::{Member, MemberForm};
use chrono::NaiveDate;

fn sample(id: &str, name: &str, email: &str, phone: &str, join_date: (i32, u32, u32)) -> Member {
    let (year, month, day) = join_date;
    Member::new(
        id.to_owned(),
        MemberForm { name: name.to_owned(), email: email.to_owned(), phone: phone.to_owned() },
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
    )
}

/// 명부가 처음 열릴 때 저장되는 샘플 회원
pub(super) fn members() -> Vec<Member> {
    vec![
        sample("1", "John Doe", "john@example.com", "555-0101", (2024, 1, 15)),
        sample("2", "Jane Smith", "jane@example.com", "555-0102", (2024, 2, 20)),
    ]
}
