//! Cliente HTTP de la API del tracker
//!
//! Usado por los dispositivos de campo para autenticarse, enviar posiciones
//! y leer el intervalo de envío configurado por el administrador.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::location::Location;
use crate::models::system_setting::{SystemSetting, LOCATION_UPDATE_INTERVAL};

/// Intervalo por defecto entre posiciones
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Posición enviada al servidor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPing {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_session_id: Option<Uuid>,
}

pub struct TrackerApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TrackerApiClient {
    /// `base_url` sin el prefijo `/api`, p. ej. `http://localhost:5000`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Autentica y guarda el token para las siguientes llamadas
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let login: LoginResponse = ensure_success(response).await?.json().await?;
        self.token = Some(login.token.clone());
        Ok(login)
    }

    pub async fn record_location(&self, ping: &LocationPing) -> Result<Location> {
        let response = self
            .client
            .post(self.url("/location"))
            .bearer_auth(self.require_token()?)
            .json(ping)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn settings(&self) -> Result<Vec<SystemSetting>> {
        let response = self
            .client
            .get(self.url("/settings"))
            .bearer_auth(self.require_token()?)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    /// Intervalo configurado en `location_update_interval` (milisegundos)
    pub async fn ping_interval(&self) -> Result<Duration> {
        let settings = self.settings().await?;
        Ok(ping_interval_from(&settings))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow!("not authenticated: call login first"))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("HTTP {}: {}", status, body)).context("tracker API request failed")
}

/// Un valor ausente o no numérico vuelve al intervalo por defecto
pub fn ping_interval_from(settings: &[SystemSetting]) -> Duration {
    settings
        .iter()
        .find(|s| s.key == LOCATION_UPDATE_INTERVAL)
        .and_then(|s| s.value.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PING_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn setting(key: &str, value: &str) -> SystemSetting {
        SystemSetting {
            key: key.to_string(),
            value: value.to_string(),
            description: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ping_interval_from_settings() {
        let settings = vec![
            setting("company_name", "FENIX Construction"),
            setting(LOCATION_UPDATE_INTERVAL, "300000"),
        ];
        assert_eq!(ping_interval_from(&settings), Duration::from_secs(300));
        assert_eq!(ping_interval_from(&[]), DEFAULT_PING_INTERVAL);
        assert_eq!(
            ping_interval_from(&[setting(LOCATION_UPDATE_INTERVAL, "soon")]),
            DEFAULT_PING_INTERVAL
        );
    }

    #[test]
    fn test_location_ping_wire_format() {
        let ping = LocationPing {
            latitude: 41.9981,
            longitude: 21.4254,
            accuracy: 8.0,
            address: None,
            work_session_id: Some(Uuid::nil()),
        };
        let json = serde_json::to_value(&ping).unwrap();
        assert_eq!(json["workSessionId"], Uuid::nil().to_string());
        assert!(json.get("address").is_none());
    }

    #[tokio::test]
    async fn test_requests_require_login() {
        let client = TrackerApiClient::new("http://127.0.0.1:1/").unwrap();
        assert!(client.settings().await.is_err());
        assert_eq!(client.url("/health"), "http://127.0.0.1:1/api/health");
    }
}
