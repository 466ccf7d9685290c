use crate::domain::model::{Band, GoalRecord, Progress, Rgb};

pub const HIGH_THRESHOLD: f64 = 75.0;
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// 完成百分比：只限制上限 100，負值保留；目標值為 0 時定義為 0
pub fn compute_progress(record: &GoalRecord) -> Progress {
    let percent = if record.target_value == 0.0 {
        0.0
    } else {
        ((record.current_value / record.target_value) * 100.0).min(100.0)
    };

    Progress {
        percent,
        band: band(percent),
    }
}

pub fn band(percent: f64) -> Band {
    if percent >= HIGH_THRESHOLD {
        Band::High
    } else if percent >= MEDIUM_THRESHOLD {
        Band::Medium
    } else {
        Band::Low
    }
}

impl Band {
    pub fn color(self) -> Rgb {
        match self {
            Band::High => Rgb(46, 160, 67),
            Band::Medium => Rgb(240, 173, 78),
            Band::Low => Rgb(217, 83, 79),
        }
    }
}

impl Progress {
    /// 進度條填滿比例 (0.0..=1.0)
    pub fn bar_fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}
