use std::collections::BTreeMap;

use shared_types::{DisponibilidadDiaResponse, DisponibilidadMesResponse, TiempoMinimoResponse};

use super::{DayAvailabilityParams, MonthAvailabilityParams};
use crate::booking::availability::MonthAvailability;
use crate::booking::calendar::MonthCursor;
use crate::error::ApiError;
use crate::models::SlotTime;

pub const LOGIN: &str = "/api/auth/login";
pub const ACCOUNT_STATUS: &str = "/api/usuarios/estado";
pub const PROFILE: &str = "/api/usuarios/perfil";
pub const USERS: &str = "/api/usuarios";
pub const SERVICES: &str = "/api/servicios";
pub const MINIMUM_LEAD_TIME: &str = "/api/configuracion/tiempo-minimo";
pub const DAY_AVAILABILITY: &str = "/api/citas/disponibilidad";
pub const MONTH_AVAILABILITY: &str = "/api/citas/disponibilidad-mes";
pub const BOOKINGS: &str = "/api/citas";
pub const ALL_BOOKINGS: &str = "/api/citas/todas";

/// Error code the backend uses for logins on unverified accounts.
pub const EMAIL_NOT_VERIFIED: &str = "EMAIL_NOT_VERIFIED";

fn with_query(base_url: &str, path: &str, pairs: &[(&str, String)]) -> String {
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_url}{path}?{query}")
}

pub fn day_availability_url(base_url: &str, params: &DayAvailabilityParams) -> String {
    with_query(
        base_url,
        DAY_AVAILABILITY,
        &[
            ("fecha", params.date.format("%Y-%m-%d").to_string()),
            ("duracion", params.duration_minutes.to_string()),
            ("userRole", params.role.as_str().to_string()),
        ],
    )
}

pub fn month_availability_url(base_url: &str, params: &MonthAvailabilityParams) -> String {
    with_query(
        base_url,
        MONTH_AVAILABILITY,
        &[
            ("anio", params.year.to_string()),
            ("mes", params.month.to_string()),
            ("duracion", params.duration_minutes.to_string()),
            ("userRole", params.role.as_str().to_string()),
        ],
    )
}

/// Validates the free start times of a day. The result is sorted and
/// free of duplicates.
pub fn parse_day_slots(body: DisponibilidadDiaResponse) -> Result<Vec<SlotTime>, ApiError> {
    let mut slots = body
        .horas_libres
        .iter()
        .map(|raw| raw.parse::<SlotTime>())
        .collect::<Result<Vec<_>, _>>()?;
    slots.sort();
    slots.dedup();
    Ok(slots)
}

/// Validates the per-day free-slot counts of the requested month.
pub fn parse_month_availability(
    body: DisponibilidadMesResponse,
    params: &MonthAvailabilityParams,
) -> Result<MonthAvailability, ApiError> {
    let cursor = MonthCursor::new(params.year, params.month).ok_or_else(|| {
        ApiError::malformed(format!("invalid month {}-{}", params.year, params.month))
    })?;
    let days_in_month = cursor.days_in_month();

    let mut free_slots = BTreeMap::new();
    for entry in body.dias {
        let day = u32::try_from(entry.dia)
            .ok()
            .filter(|d| (1..=days_in_month).contains(d))
            .ok_or_else(|| ApiError::malformed(format!("day {} is outside {cursor}", entry.dia)))?;
        let free = u32::try_from(entry.slots_libres).map_err(|_| {
            ApiError::malformed(format!(
                "negative free-slot count {} for day {day}",
                entry.slots_libres
            ))
        })?;
        free_slots.insert(day, free);
    }

    Ok(MonthAvailability::new(cursor, free_slots))
}

pub fn parse_lead_hours(body: TiempoMinimoResponse) -> Result<u32, ApiError> {
    u32::try_from(body.horas_minimas)
        .map_err(|_| ApiError::malformed(format!("negative lead time {}", body.horas_minimas)))
}
