//! Middleware de Rate Limiting
//!
//! Ventana fija por IP de cliente, aplicada al login.
//!
//! La IP es la del peer TCP. `x-forwarded-for` solo se consulta cuando el peer
//! es un proxy de confianza (`TRUSTED_PROXIES`), y entonces se toma el salto
//! más a la derecha que no sea otro proxy de confianza.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado compartido del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trusted_proxies: Arc<Vec<IpAddr>>,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trusted_proxies: Arc::new(Vec::new()),
        }
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = Arc::new(proxies);
        self
    }

    fn is_trusted(&self, ip: &IpAddr) -> bool {
        self.trusted_proxies.contains(ip)
    }

    /// Clave del cliente para el límite
    pub fn client_ip(&self, request: &Request) -> String {
        let Some(peer) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
        else {
            return "unknown".to_string();
        };

        if !self.is_trusted(&peer) {
            return peer.to_string();
        }

        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        // Un salto ilegible corta la cadena: lo que está a su izquierda no es fiable
        for hop in forwarded.rsplit(',').map(str::trim).filter(|h| !h.is_empty()) {
            match hop.parse::<IpAddr>() {
                Ok(ip) if self.is_trusted(&ip) => continue,
                Ok(ip) => return ip.to_string(),
                Err(_) => break,
            }
        }

        peer.to_string()
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

impl From<&EnvironmentConfig> for RateLimitState {
    fn from(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        )
        .with_trusted_proxies(config.trusted_proxies.clone())
    }
}

/// Middleware de rate limiting para el login
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = state.rate_limit.client_ip(&request);

    if let Err(e) = state.rate_limit.check_rate_limit(&ip).await {
        warn!("🚦 Límite de login alcanzado para {}", ip);
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_window_per_ip() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));

        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            limiter.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        // Otra IP tiene su propia ventana
        assert!(limiter.check_rate_limit("10.0.0.2").await.is_ok());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
    }

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder();
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: SocketAddr = format!("{}:40000", peer).parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_header_is_ignored_from_untrusted_peer() {
        let limiter = RateLimitState::new(10, Duration::from_secs(60));

        let spoofed = request_from("198.51.100.4", Some("203.0.113.7"));
        assert_eq!(limiter.client_ip(&spoofed), "198.51.100.4");

        let anonymous = axum::http::Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(limiter.client_ip(&anonymous), "unknown");
    }

    #[test]
    fn test_trusted_proxy_uses_rightmost_untrusted_hop() {
        let limiter = RateLimitState::new(10, Duration::from_secs(60))
            .with_trusted_proxies(vec!["10.0.0.1".parse().unwrap(), "10.0.0.2".parse().unwrap()]);

        // El cliente antepone una IP falsa; el proxy añade la real a la derecha
        let request = request_from("10.0.0.1", Some("1.2.3.4, 203.0.113.7, 10.0.0.2"));
        assert_eq!(limiter.client_ip(&request), "203.0.113.7");

        let no_header = request_from("10.0.0.1", None);
        assert_eq!(limiter.client_ip(&no_header), "10.0.0.1");

        let garbage = request_from("10.0.0.1", Some("203.0.113.7, nonsense"));
        assert_eq!(limiter.client_ip(&garbage), "10.0.0.1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotating_forwarded_header_shares_one_window() {
        let limiter = RateLimitState::new(3, Duration::from_secs(60));

        let mut outcomes = Vec::new();
        for i in 0..5 {
            let request = request_from("198.51.100.4", Some(&format!("203.0.113.{}", i)));
            let ip = limiter.client_ip(&request);
            outcomes.push(limiter.check_rate_limit(&ip).await.is_ok());
        }
        assert_eq!(outcomes, vec![true, true, true, false, false]);
    }
}
