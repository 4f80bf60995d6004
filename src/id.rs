use uuid::Uuid;

/// 새 레코드의 아이디를 생성한다.
///
/// 같은 밀리초 안에 여러 레코드가 생성되어도 겹치지 않도록 랜덤 UUID(v4)를 사용한다.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
