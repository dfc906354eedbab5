// ============================================================================
// 时钟抽象：记录 updatedAt 时间戳与导出文件名日期
// ============================================================================

use std::sync::atomic::{AtomicI64, Ordering};

use time::{Date, OffsetDateTime, UtcOffset};

/// 时钟 trait，便于在测试中注入可控时间
pub trait Clock: Send + Sync {
    /// 当前 Unix 毫秒时间戳
    fn now_millis(&self) -> i64;

    /// 当前本地日期（无法获取本地时区时使用 UTC）
    fn today(&self) -> Date {
        millis_to_local(self.now_millis())
            .map(|dt| dt.date())
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }
}

/// 系统时钟
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// 手动推进的时钟（测试与回放使用）
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// 向前推进指定毫秒数
    pub fn advance(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// 毫秒时间戳转为本地时区时间，超出范围返回 None
pub fn millis_to_local(millis: i64) -> Option<OffsetDateTime> {
    let utc = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()?;
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    Some(utc.to_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_millis_to_local_out_of_range() {
        assert!(millis_to_local(i64::MAX).is_none());
        assert!(millis_to_local(0).is_some());
    }
}
