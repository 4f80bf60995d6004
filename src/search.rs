/// 대소문자를 구분하지 않고 `value`에 `term`이 포함되어 있는지 확인한다.
/// 단어 단위가 아닌 부분 문자열 단위로 비교하며 빈 검색어는 모든 값과 일치한다.
///
/// # Example
/// ```
/// use book_ledger_rust::search::contains_ignore_case;
///
/// assert!(contains_ignore_case("The Great Gatsby", "gat"));
/// assert!(contains_ignore_case("The Great Gatsby", ""));
/// assert!(!contains_ignore_case("1984", "orwell"));
/// ```
pub fn contains_ignore_case(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(&term.to_lowercase())
}
