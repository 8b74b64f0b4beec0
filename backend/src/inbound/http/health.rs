//! `/health/live` and `/health/ready` probes.
//!
//! The process moves through [`Phase::Starting`], [`Phase::Serving`] and
//! finally [`Phase::Draining`]; each probe maps the phase to 200 or 503.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Starting = 0,
    Serving = 1,
    Draining = 2,
}

impl Phase {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Lifecycle flag shared between `main` and the probe handlers.
#[derive(Debug)]
pub struct HealthState(AtomicU8);

impl Default for HealthState {
    fn default() -> Self {
        Self(AtomicU8::new(Phase::Starting as u8))
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        Phase::from_raw(self.0.load(Ordering::Acquire))
    }

    /// Called once the listener is bound.
    pub fn mark_ready(&self) {
        // Never resurrect a draining process.
        let _ = self.0.compare_exchange(
            Phase::Starting as u8,
            Phase::Serving as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn mark_draining(&self) {
        self.0.store(Phase::Draining as u8, Ordering::Release);
    }
}

fn probe(healthy: bool) -> HttpResponse {
    let mut builder = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.phase() == Phase::Serving)
}

#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.phase() != Phase::Draining)
}
