//! Validated domain types. Wire DTOs from `shared_types` are converted here
//! so that nothing past the API boundary sees an unchecked payload.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use shared_types::{CitaResponse, PerfilResponse, Servicio, UsuarioResumen};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    /// Wire spelling used in query strings and profile payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Client => "CLIENTE",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "CLIENTE" | "USER" => Ok(Role::Client),
            other => Err(ApiError::malformed(format!("unknown role `{other}`"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logged in user as reported by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

impl TryFrom<PerfilResponse> for CurrentUser {
    type Error = ApiError;

    fn try_from(profile: PerfilResponse) -> Result<Self, Self::Error> {
        if profile.email.trim().is_empty() {
            return Err(ApiError::malformed("profile without email"));
        }
        let role = match profile.rol.or(profile.role) {
            Some(raw) => raw.parse()?,
            None => Role::Client,
        };
        Ok(Self {
            email: profile.email,
            name: profile.nombre.filter(|n| !n.trim().is_empty()),
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub emoji: Option<String>,
    pub details: Option<String>,
}

impl TryFrom<Servicio> for Service {
    type Error = ApiError;

    fn try_from(raw: Servicio) -> Result<Self, Self::Error> {
        if !raw.precio.is_finite() || raw.precio < 0.0 {
            return Err(ApiError::malformed(format!(
                "service {} has invalid price {}",
                raw.id, raw.precio
            )));
        }
        let duration_minutes = u32::try_from(raw.duracion_minutos)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                ApiError::malformed(format!(
                    "service {} has invalid duration {}",
                    raw.id, raw.duracion_minutos
                ))
            })?;
        Ok(Self {
            id: raw.id,
            name: raw.nombre,
            description: raw.descripcion,
            price: raw.precio,
            duration_minutes,
            emoji: raw.emoji.filter(|e| !e.is_empty()),
            details: raw.texto_descriptivo.filter(|t| !t.is_empty()),
        })
    }
}

/// A bookable start time, `HH:MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotTime {
    hour: u8,
    minute: u8,
}

impl SlotTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // hour and minute are range checked on construction
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Strictly later than the wall-clock time, hour first then minute.
    pub fn is_after(&self, now: NaiveTime) -> bool {
        use chrono::Timelike;
        let now_hour = now.hour() as u8;
        let now_minute = now.minute() as u8;
        self.hour > now_hour || (self.hour == now_hour && self.minute > now_minute)
    }
}

impl FromStr for SlotTime {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::malformed(format!("invalid slot time `{raw}`"));
        let (hour, minute) = raw.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ClientSummary {
    /// `Name (email)`, as shown in the client picker.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }
}

impl From<UsuarioResumen> for ClientSummary {
    fn from(raw: UsuarioResumen) -> Self {
        Self {
            id: raw.id,
            name: raw.nombre,
            email: raw.email,
            phone: raw.telefono.filter(|p| !p.trim().is_empty()),
        }
    }
}

/// An existing appointment as listed for the admin calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub starts_at: NaiveDateTime,
    pub service_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub client_name: Option<String>,
    pub comment: Option<String>,
    pub confirmed: bool,
    pub recurring_every_days: Option<u32>,
}

impl TryFrom<CitaResponse> for Appointment {
    type Error = ApiError;

    fn try_from(raw: CitaResponse) -> Result<Self, Self::Error> {
        let starts_at = parse_local_timestamp(&raw.fecha_hora).ok_or_else(|| {
            ApiError::malformed(format!(
                "appointment {} has invalid timestamp `{}`",
                raw.id, raw.fecha_hora
            ))
        })?;
        let recurring_every_days = (raw.fija && raw.periodicidad_dias > 0)
            .then(|| u32::try_from(raw.periodicidad_dias).ok())
            .flatten();
        Ok(Self {
            id: raw.id,
            starts_at,
            service_name: raw.servicio.as_ref().map(|s| s.nombre.clone()),
            duration_minutes: raw
                .servicio
                .and_then(|s| s.duracion_minutos)
                .and_then(|d| u32::try_from(d).ok()),
            client_name: raw.usuario.map(|u| u.nombre),
            comment: raw.comentario.filter(|c| !c.trim().is_empty()),
            confirmed: raw.confirmada,
            recurring_every_days,
        })
    }
}

/// Format used for the `fecha` field of a new booking: local wall-clock
/// time with no offset, as the backend stores it.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, LOCAL_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
