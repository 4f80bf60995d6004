use chrono::NaiveDate;

/// 오늘 날짜를 제공하는 트레이트
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// 시스템 시간을 기준으로 한 UTC 날짜
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// 항상 같은 날짜를 반환하는 시계
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
