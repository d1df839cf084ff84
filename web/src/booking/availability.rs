use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::calendar::MonthCursor;

/// Free-slot counts per day of one month, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthAvailability {
    month: MonthCursor,
    free_slots: BTreeMap<u32, u32>,
}

impl MonthAvailability {
    pub fn new(month: MonthCursor, free_slots: BTreeMap<u32, u32>) -> Self {
        Self { month, free_slots }
    }

    pub fn month(&self) -> MonthCursor {
        self.month
    }

    /// `None` when the backend did not report the day.
    pub fn free_slots(&self, day: u32) -> Option<u32> {
        self.free_slots.get(&day).copied()
    }

    pub fn total_free(&self) -> u32 {
        self.free_slots.values().sum()
    }
}

/// `round(part / total * 100)`, 0 when `total` is 0.
pub fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(total) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityLevel {
    High,
    Medium,
    Low,
}

impl AvailabilityLevel {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage > 70 {
            Self::High
        } else if percentage > 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "availability-high",
            Self::Medium => "availability-medium",
            Self::Low => "availability-low",
        }
    }
}
