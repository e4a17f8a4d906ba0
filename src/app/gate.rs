// 按键去抖
use embassy_time::{Duration, Instant};

/// 去抖判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateDecision {
    Accepted,
    Suppressed,
}

/// 触发门
///
/// 只记录上一次被接受的时间戳。窗口从上一次接受算起，
/// 窗口内被抑制的边沿不会延长窗口。无锁、无分配，只有分支。
#[derive(Debug, Clone, Copy)]
pub struct TriggerGate {
    last_accepted: Option<Instant>,
    min_interval: Duration,
}

impl TriggerGate {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_accepted: None,
            min_interval,
        }
    }

    /// 判定一次边沿
    ///
    /// 首次边沿总是接受；之后必须严格晚于 `last_accepted + min_interval`
    pub fn evaluate(&mut self, now: Instant) -> GateDecision {
        let live = match self.last_accepted {
            None => true,
            Some(last) => match now.checked_duration_since(last) {
                Some(elapsed) => elapsed > self.min_interval,
                None => false,
            },
        };

        if live {
            self.last_accepted = Some(now);
            GateDecision::Accepted
        } else {
            GateDecision::Suppressed
        }
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
