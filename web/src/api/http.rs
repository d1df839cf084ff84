use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared_types::{
    CitaRequest, CitaResponse, DisponibilidadDiaResponse, DisponibilidadMesResponse,
    EstadoUsuarioResponse, LoginRequest, LoginResponse, PerfilResponse, Servicio,
    TiempoMinimoResponse, UsuarioResumen,
};

use super::endpoints;
use super::{AccountStatus, BookingApi, DayAvailabilityParams, MonthAvailabilityParams};
use crate::booking::availability::MonthAvailability;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Appointment, ClientSummary, CurrentUser, Service, SlotTime};

/// Stateless HTTP client for the booking backend.
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = Self::authorized(self.client.get(&url), token).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Maps non-2xx responses to typed errors, keeping the body as the message.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait(?Send)]
impl BookingApi for HttpBookingApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::info!(email, "logging in");

        let response = self
            .client
            .post(self.url(endpoints::LOGIN))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body: LoginResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            return Err(match body.error {
                Some(code) if code == endpoints::EMAIL_NOT_VERIFIED => ApiError::EmailNotVerified,
                Some(message) => ApiError::Rejected(message),
                None => ApiError::Rejected(
                    body.message
                        .unwrap_or_else(|| "Incorrect credentials".to_string()),
                ),
            });
        }

        body.token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::malformed("login response without token"))
    }

    async fn account_status(&self, token: &str) -> Result<AccountStatus, ApiError> {
        let body: EstadoUsuarioResponse = self
            .get_json(self.url(endpoints::ACCOUNT_STATUS), Some(token))
            .await?;
        Ok(AccountStatus {
            suspended: body.baneado,
        })
    }

    async fn profile(&self, token: &str) -> Result<CurrentUser, ApiError> {
        let body: PerfilResponse = self
            .get_json(self.url(endpoints::PROFILE), Some(token))
            .await?;
        CurrentUser::try_from(body)
    }

    async fn services(&self) -> Result<Vec<Service>, ApiError> {
        let body: Vec<Servicio> = self.get_json(self.url(endpoints::SERVICES), None).await?;
        body.into_iter().map(Service::try_from).collect()
    }

    async fn clients(&self, token: &str) -> Result<Vec<ClientSummary>, ApiError> {
        let body: Vec<UsuarioResumen> = self
            .get_json(self.url(endpoints::USERS), Some(token))
            .await?;
        Ok(body.into_iter().map(ClientSummary::from).collect())
    }

    async fn minimum_lead_hours(&self, token: Option<&str>) -> Result<u32, ApiError> {
        let body: TiempoMinimoResponse = self
            .get_json(self.url(endpoints::MINIMUM_LEAD_TIME), token)
            .await?;
        endpoints::parse_lead_hours(body)
    }

    async fn day_availability(
        &self,
        params: &DayAvailabilityParams,
    ) -> Result<Vec<SlotTime>, ApiError> {
        let url = endpoints::day_availability_url(&self.base_url, params);
        let body: DisponibilidadDiaResponse = self.get_json(url, None).await?;
        endpoints::parse_day_slots(body)
    }

    async fn month_availability(
        &self,
        params: &MonthAvailabilityParams,
    ) -> Result<MonthAvailability, ApiError> {
        let url = endpoints::month_availability_url(&self.base_url, params);
        let body: DisponibilidadMesResponse = self.get_json(url, None).await?;
        endpoints::parse_month_availability(body, params)
    }

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &CitaRequest,
    ) -> Result<(), ApiError> {
        tracing::info!(
            servicio_id = booking.servicio_id,
            fecha = %booking.fecha,
            on_behalf = booking.cliente_id.is_some(),
            "creating appointment"
        );
        let request = self.client.post(self.url(endpoints::BOOKINGS)).json(booking);
        let response = Self::authorized(request, token).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn appointments(&self, token: &str) -> Result<Vec<Appointment>, ApiError> {
        let body: Vec<CitaResponse> = self
            .get_json(self.url(endpoints::ALL_BOOKINGS), Some(token))
            .await?;
        body.into_iter().map(Appointment::try_from).collect()
    }
}
