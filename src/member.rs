mod seed;

use crate::clock::{Clock, SystemClock};
use crate::id;
use crate::search::contains_ignore_case;
use crate::storage::{Collection, SharedStorage, StorageError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const MEMBERS_KEY: &str = "library_members";

/// 회원 컬렉션 (`library_members`)
pub const MEMBERS: Collection<Member> = Collection::new(MEMBERS_KEY);

/// 도서관 회원
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: String,
    name: String,
    email: String,
    phone: String,
    join_date: NaiveDate,
}

impl Member {
    fn new(id: String, form: MemberForm, join_date: NaiveDate) -> Self {
        Self {
            id,
            name: form.name,
            email: form.email,
            phone: form.phone,
            join_date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// 가입일, 등록 시점에 한번 설정된 후 변경되지 않는다.
    pub fn join_date(&self) -> NaiveDate {
        self.join_date
    }

    /// 이름 또는 이메일이 검색어를 포함하고 있는지 확인한다.
    pub fn matches(&self, term: &str) -> bool {
        contains_ignore_case(&self.name, term) || contains_ignore_case(&self.email, term)
    }
}

/// 회원 등록 폼
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// 회원 수정 내용, 가입일은 수정 할 수 없다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl MemberPatch {
    fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(phone) = self.phone {
            member.phone = phone;
        }
    }
}

pub fn filter<'a>(members: &'a [Member], term: &str) -> Vec<&'a Member> {
    members.iter()
        .filter(|member| member.matches(term))
        .collect()
}

/// 회원 명부 저장소
pub struct MemberDirectory {
    storage: SharedStorage,
    clock: Box<dyn Clock>,
}

impl MemberDirectory {
    pub fn open(storage: SharedStorage) -> Result<Self, StorageError> {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    /// 가입일 계산에 사용할 시계를 지정하여 명부를 연다.
    /// 저장된 회원 컬렉션이 없을 경우 샘플 회원을 저장한다.
    pub fn with_clock(storage: SharedStorage, clock: Box<dyn Clock>) -> Result<Self, StorageError> {
        MEMBERS.load_or_seed(&**storage, seed::members)?;
        Ok(Self { storage, clock })
    }

    pub fn list(&self) -> Result<Vec<Member>, StorageError> {
        MEMBERS.load_or_default(&**self.storage)
    }

    pub fn find(&self, id: &str) -> Result<Option<Member>, StorageError> {
        Ok(self.list()?.into_iter().find(|member| member.id == id))
    }

    pub fn search(&self, term: &str) -> Result<Vec<Member>, StorageError> {
        Ok(self.list()?.into_iter().filter(|member| member.matches(term)).collect())
    }

    pub fn create(&self, form: MemberForm) -> Result<Member, StorageError> {
        let mut members = self.list()?;
        let member = Member::new(id::generate(), form, self.clock.today());
        members.push(member.clone());
        self.save(&members)?;

        info!("회원 등록 완료 (ID: {}, 가입일: {})", member.id, member.join_date);
        Ok(member)
    }

    pub fn update(&self, id: &str, patch: MemberPatch) -> Result<Option<Member>, StorageError> {
        let mut members = self.list()?;
        let Some(member) = members.iter_mut().find(|member| member.id == id) else {
            debug!("수정할 회원을 찾을 수 없습니다. (ID: {})", id);
            return Ok(None);
        };

        patch.apply(member);
        let updated = member.clone();
        self.save(&members)?;

        info!("회원 수정 완료 (ID: {})", id);
        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut members = self.list()?;
        let before = members.len();
        members.retain(|member| member.id != id);

        if members.len() == before {
            debug!("삭제할 회원을 찾을 수 없습니다. (ID: {})", id);
            return Ok(false);
        }

        self.save(&members)?;
        info!("회원 삭제 완료 (ID: {})", id);
        Ok(true)
    }

    fn save(&self, members: &[Member]) -> Result<(), StorageError> {
        MEMBERS.save(&**self.storage, members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::shared;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn open_directory() -> (SharedStorage, MemberDirectory) {
        let storage = shared(MemoryStorage::new());
        let directory = MemberDirectory::with_clock(storage.clone(), Box::new(FixedClock(today()))).unwrap();
        (storage, directory)
    }

    fn form(name: &str, email: &str) -> MemberForm {
        MemberForm { name: name.to_owned(), email: email.to_owned(), phone: "555-0199".to_owned() }
    }

    #[test]
    fn open_seeds_two_sample_members() {
        let (_, directory) = open_directory();

        let members = directory.list().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name(), "John Doe");
        assert_eq!(members[0].join_date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(members[1].name(), "Jane Smith");
    }

    #[test]
    fn join_date_is_serialized_as_calendar_date() {
        let (storage, _) = open_directory();

        let raw = storage.get(MEMBERS_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""joinDate":"2024-01-15""#));
    }

    #[test]
    fn create_assigns_today_as_join_date() {
        let (_, directory) = open_directory();

        let member = directory.create(form("Ada Lovelace", "ada@example.com")).unwrap();

        assert_eq!(member.join_date(), today());
        assert_eq!(directory.find(member.id()).unwrap(), Some(member));
    }

    #[test]
    fn update_never_touches_join_date() {
        let storage = shared(MemoryStorage::new());
        let created = MemberDirectory::with_clock(storage.clone(), Box::new(FixedClock(today())))
            .unwrap()
            .create(form("Ada Lovelace", "ada@example.com"))
            .unwrap();

        let later = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let directory = MemberDirectory::with_clock(storage, Box::new(FixedClock(later))).unwrap();
        let patch = MemberPatch { email: Some("ada@analytical.engine".to_owned()), ..MemberPatch::default() };
        let updated = directory.update(created.id(), patch).unwrap().unwrap();

        assert_eq!(updated.email(), "ada@analytical.engine");
        assert_eq!(updated.name(), "Ada Lovelace");
        assert_eq!(updated.join_date(), today());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (_, directory) = open_directory();
        let before = directory.list().unwrap();

        assert_eq!(directory.update("404", MemberPatch::default()).unwrap(), None);
        assert!(!directory.delete("404").unwrap());
        assert_eq!(directory.list().unwrap(), before);
    }

    #[test]
    fn delete_removes_member() {
        let (_, directory) = open_directory();

        assert!(directory.delete("2").unwrap());
        assert_eq!(directory.list().unwrap().len(), 1);
        assert_eq!(directory.find("2").unwrap(), None);
    }

    #[test]
    fn interleaved_operations_persist_net_effect() {
        let (storage, directory) = open_directory();

        let created = directory.create(form("Grace Hopper", "grace@example.com")).unwrap();
        assert!(directory.delete("1").unwrap());
        let patch = MemberPatch { phone: Some("555-0300".to_owned()), ..MemberPatch::default() };
        directory.update(created.id(), patch).unwrap().unwrap();
        assert!(directory.delete("2").unwrap());

        let reopened = MemberDirectory::with_clock(storage, Box::new(FixedClock(today()))).unwrap();
        let members = reopened.list().unwrap();
        let ids = members.iter().map(Member::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![created.id()]);
        assert_eq!(members[0].name(), "Grace Hopper");
        assert_eq!(members[0].email(), "grace@example.com");
        assert_eq!(members[0].phone(), "555-0300");
        assert_eq!(members[0].join_date(), today());
    }

    #[test]
    fn search_matches_name_or_email_only() {
        let (_, directory) = open_directory();

        assert_eq!(directory.search("JOHN").unwrap()[0].id(), "1");
        assert_eq!(directory.search("jane@").unwrap()[0].id(), "2");
        assert_eq!(directory.search("example.com").unwrap().len(), 2);
        assert!(directory.search("555-0101").unwrap().is_empty());

        let members = directory.list().unwrap();
        assert_eq!(filter(&members, "smith").len(), 1);
    }
}
