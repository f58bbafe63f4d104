use crate::consts::{
    DEFAULT_CALL_MODEL, DEFAULT_CALL_VOICE, DEFAULT_LANGUAGE_HINT, DEFAULT_MAX_CALL_SECS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TEMPERATURE,
};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::{Date, Time};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(iso_time, Time, "[hour]:[minute]:[second]");

/// Read-only snapshot of the patient on whose behalf we are calling. Sourced
/// from the persistence collaborator as JSON.
#[derive(Deserialize, Debug, Clone)]
pub struct PatientProfile {
    pub name: String,
    pub gender: String,
    pub age: String,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
    #[serde(default)]
    pub preferred_dates: Vec<String>,
}

/// Read-only snapshot of the dentist/clinic we are calling.
#[derive(Deserialize, Debug, Clone)]
pub struct ProviderProfile {
    pub name: String,
    pub specialty: String,
    pub clinic: String,
    pub address: String,
    pub phone_number: String,
}

/// One in-progress remote voice-AI session: the opaque session id plus the
/// endpoint the carrier streams call media to.
#[derive(Debug, Clone)]
pub struct CallSession {
    pub session_id: String,
    pub join_endpoint: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Booked,
    Canceled,
    Rescheduled,
    Pending,
}

/// Structured outcome of one call attempt. `Booked` always carries both a
/// date and a time; every other status carries neither.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppointmentOutcome {
    #[serde(with = "iso_date::option")]
    pub appointment_date: Option<Date>,
    #[serde(with = "iso_time::option")]
    pub appointment_time: Option<Time>,
    pub appointment_status: AppointmentStatus,
}

impl AppointmentOutcome {
    /// Fallback outcome when no booking was confirmed or extraction failed.
    pub fn pending() -> Self {
        Self {
            appointment_date: None,
            appointment_time: None,
            appointment_status: AppointmentStatus::Pending,
        }
    }
}

/// Terminal artifact of one orchestration run, handed to the persistence
/// collaborator for the appointment record.
#[derive(Serialize, Debug, Clone)]
pub struct CallResult {
    pub session_id: String,
    pub summary: String,
    pub transcript: String,
    pub outcome: AppointmentOutcome,
}

/// Per-attempt configuration, assembled once at startup and passed into the
/// orchestrator. No module-level credentials or mutable state.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: String,
    pub voice: String,
    pub temperature: f32,
    pub language_hint: String,
    pub poll_interval: Duration,
    pub max_call_duration: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CALL_MODEL.to_string(),
            voice: DEFAULT_CALL_VOICE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            language_hint: DEFAULT_LANGUAGE_HINT.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_call_duration: Duration::from_secs(DEFAULT_MAX_CALL_SECS),
        }
    }
}
