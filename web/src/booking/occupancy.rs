//! Occupancy overview for administrators, computed from the full
//! appointment list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::availability::percentage;
use super::calendar::MonthCursor;
use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyLevel {
    High,
    Medium,
    Low,
    Empty,
}

impl OccupancyLevel {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p > 80 => Self::High,
            p if p > 50 => Self::Medium,
            p if p > 0 => Self::Low,
            _ => Self::Empty,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High occupancy",
            Self::Medium => "Medium occupancy",
            Self::Low => "Low occupancy",
            Self::Empty => "No appointments",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "occupancy-high",
            Self::Medium => "occupancy-medium",
            Self::Low => "occupancy-low",
            Self::Empty => "occupancy-empty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOccupancy {
    pub occupied: u32,
    pub total: u32,
    pub percentage: u32,
}

impl DayOccupancy {
    pub fn new(occupied: u32, total: u32) -> Self {
        Self {
            occupied,
            total,
            percentage: percentage(occupied, total),
        }
    }

    pub fn level(&self) -> OccupancyLevel {
        OccupancyLevel::from_percentage(self.percentage)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthStats {
    pub total_days: u32,
    pub days_with_appointments: u32,
    /// Mean percentage over days with at least one appointment.
    pub average_occupancy: u32,
    pub total_appointments: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOccupancy {
    pub month: MonthCursor,
    /// Keyed by day of month; every day is present.
    pub days: BTreeMap<u32, DayOccupancy>,
    pub stats: MonthStats,
}

fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> u32 {
    appointments
        .iter()
        .filter(|a| a.starts_at.date() == date)
        .count() as u32
}

pub fn day_occupancy(appointments: &[Appointment], date: NaiveDate, slots_per_day: u32) -> DayOccupancy {
    DayOccupancy::new(appointments_on(appointments, date), slots_per_day)
}

pub fn month_occupancy(
    appointments: &[Appointment],
    month: MonthCursor,
    slots_per_day: u32,
) -> MonthOccupancy {
    let mut per_day: BTreeMap<u32, u32> = (1..=month.days_in_month()).map(|d| (d, 0)).collect();
    for appointment in appointments {
        let date = appointment.starts_at.date();
        if MonthCursor::of(date) == month {
            *per_day.entry(date.day()).or_default() += 1;
        }
    }

    let days: BTreeMap<u32, DayOccupancy> = per_day
        .into_iter()
        .map(|(day, occupied)| (day, DayOccupancy::new(occupied, slots_per_day)))
        .collect();

    let busy: Vec<&DayOccupancy> = days.values().filter(|d| d.occupied > 0).collect();
    let percentage_sum: u32 = busy.iter().map(|d| d.percentage).sum();
    let days_with_appointments = busy.len() as u32;
    let stats = MonthStats {
        total_days: month.days_in_month(),
        days_with_appointments,
        average_occupancy: if days_with_appointments > 0 {
            (f64::from(percentage_sum) / f64::from(days_with_appointments)).round() as u32
        } else {
            0
        },
        total_appointments: days.values().map(|d| d.occupied).sum(),
    };

    MonthOccupancy { month, days, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: i64, raw: &str) -> Appointment {
        Appointment {
            id,
            starts_at: crate::models::parse_local_timestamp(raw).unwrap(),
            service_name: Some("Corte".into()),
            duration_minutes: Some(30),
            client_name: None,
            comment: None,
            confirmed: true,
            recurring_every_days: None,
        }
    }

    #[test]
    fn day_counts_only_that_date() {
        let list = vec![
            appointment(1, "2025-03-12T09:00:00"),
            appointment(2, "2025-03-12T10:00:00"),
            appointment(3, "2025-03-13T10:00:00"),
        ];
        let day = day_occupancy(&list, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(), 10);
        assert_eq!(day, DayOccupancy { occupied: 2, total: 10, percentage: 20 });
        assert_eq!(day.level(), OccupancyLevel::Low);
    }

    #[test]
    fn zero_slots_per_day_is_zero_percent() {
        let list = vec![appointment(1, "2025-03-12T09:00:00")];
        let day = day_occupancy(&list, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(), 0);
        assert_eq!(day.percentage, 0);
        assert_eq!(day.level(), OccupancyLevel::Empty);
    }

    #[test]
    fn month_stats_average_busy_days_only() {
        let mut list: Vec<Appointment> = (0..9)
            .map(|i| appointment(i, &format!("2025-03-03T{:02}:00:00", 9 + i)))
            .collect();
        list.push(appointment(20, "2025-03-20T09:00:00"));
        list.push(appointment(21, "2025-03-20T10:00:00"));
        list.push(appointment(30, "2025-04-01T10:00:00"));

        let month = month_occupancy(&list, MonthCursor::new(2025, 3).unwrap(), 10);
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days[&3].level(), OccupancyLevel::High);
        assert_eq!(month.days[&4].level(), OccupancyLevel::Empty);
        assert_eq!(
            month.stats,
            MonthStats {
                total_days: 31,
                days_with_appointments: 2,
                average_occupancy: 55,
                total_appointments: 11,
            }
        );
    }

    #[test]
    fn empty_month_has_zero_average() {
        let month = month_occupancy(&[], MonthCursor::new(2025, 2).unwrap(), 10);
        assert_eq!(month.stats.average_occupancy, 0);
        assert_eq!(month.stats.total_days, 28);
    }
}
