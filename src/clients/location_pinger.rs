//! Envío periódico de posiciones
//!
//! [`LocationPinger`] observa el estado de la jornada por un canal `watch`:
//! mientras esté ACTIVE envía una posición al entrar y después cada intervalo;
//! al salir de ACTIVE se detiene y al volver empieza de nuevo. Un envío fallido
//! se descarta (como mucho una vez por tick).

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::api_client::{LocationPing, TrackerApiClient};
use crate::models::work_session::WorkSessionStatus;

/// Posición GPS actual del dispositivo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// Estado de la jornada observado por el pinger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: WorkSessionStatus,
}

#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Position>;
}

#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn send(&self, ping: &LocationPing) -> Result<()>;
}

#[async_trait]
impl LocationSink for TrackerApiClient {
    async fn send(&self, ping: &LocationPing) -> Result<()> {
        self.record_location(ping).await.map(|_| ())
    }
}

pub struct LocationPinger<S, K> {
    source: S,
    sink: K,
    interval: Duration,
    session: watch::Receiver<Option<SessionSnapshot>>,
}

impl<S: PositionSource, K: LocationSink> LocationPinger<S, K> {
    pub fn new(
        source: S,
        sink: K,
        interval: Duration,
        session: watch::Receiver<Option<SessionSnapshot>>,
    ) -> Self {
        Self {
            source,
            sink,
            // `tokio::time::interval` no admite cero
            interval: interval.max(Duration::from_millis(1)),
            session,
        }
    }

    /// Corre hasta la cancelación o hasta que se cierre el canal de estado.
    /// Devuelve cuántas posiciones se enviaron con éxito.
    pub async fn run(mut self, cancel: CancellationToken) -> u64 {
        let mut sent = 0;

        loop {
            let Some(session_id) = self.active_session() else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return sent,
                    changed = self.session.changed() => {
                        if changed.is_err() {
                            return sent;
                        }
                    }
                }
                continue;
            };

            // El primer tick es inmediato
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return sent,
                    changed = self.session.changed() => {
                        if changed.is_err() {
                            return sent;
                        }
                        if self.active_session() != Some(session_id) {
                            debug!("📍 Jornada {} fuera de ACTIVE, envío detenido", session_id);
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if self.ping(session_id).await {
                            sent += 1;
                        }
                    }
                }
            }
        }
    }

    fn active_session(&self) -> Option<Uuid> {
        (*self.session.borrow())
            .filter(|s| s.status == WorkSessionStatus::Active)
            .map(|s| s.id)
    }

    async fn ping(&self, session_id: Uuid) -> bool {
        let position = match self.source.current_position().await {
            Ok(position) => position,
            Err(e) => {
                warn!("📍 Posición no disponible, envío descartado: {}", e);
                return false;
            }
        };

        let ping = LocationPing {
            latitude: position.latitude,
            longitude: position.longitude,
            accuracy: position.accuracy,
            address: None,
            work_session_id: Some(session_id),
        };

        match self.sink.send(&ping).await {
            Ok(()) => true,
            Err(e) => {
                warn!("📍 Envío de posición fallido, descartado: {}", e);
                false
            }
        }
    }
}
