use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Servicio {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub precio: f64,
    pub duracion_minutos: i64,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub texto_descriptivo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a login response. Success carries `token`, failure carries `error`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerfilResponse {
    pub email: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    /// Older backends send `role` instead of `rol`.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstadoUsuarioResponse {
    #[serde(default)]
    pub baneado: bool,
    #[serde(default)]
    pub email_verificado: Option<bool>,
    #[serde(default)]
    pub rol: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TiempoMinimoResponse {
    pub horas_minimas: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisponibilidadDiaResponse {
    pub horas_libres: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaDisponible {
    pub dia: i64,
    pub slots_libres: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DisponibilidadMesResponse {
    pub dias: Vec<DiaDisponible>,
}

/// Body of `POST /api/citas`. `fecha` is a local timestamp without offset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitaRequest {
    pub servicio_id: i64,
    pub fecha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioResumen {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitaServicio {
    pub nombre: String,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(default)]
    pub duracion_minutos: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CitaUsuario {
    pub nombre: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitaResponse {
    pub id: i64,
    pub fecha_hora: String,
    #[serde(default)]
    pub comentario: Option<String>,
    #[serde(default)]
    pub confirmada: bool,
    #[serde(default)]
    pub fija: bool,
    #[serde(default)]
    pub periodicidad_dias: i64,
    #[serde(default)]
    pub servicio: Option<CitaServicio>,
    #[serde(default, alias = "cliente")]
    pub usuario: Option<CitaUsuario>,
}
