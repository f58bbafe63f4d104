use crate::error::{CallAttemptFailed, CallError, Stage};
use crate::extract::ExtractionProvider;
use crate::prompt::build_agent_script;
use crate::telephony::TelephonyProvider;
use crate::transcript::format_transcript;
use crate::types::{
    AgentConfig, AppointmentOutcome, CallResult, CallSession, PatientProfile, ProviderProfile,
};
use crate::ultravox_types::CallConfig;
use crate::voice::VoiceSessionProvider;

use tokio::time::{sleep, timeout};
use tracing::{info, warn};
use uuid::Uuid;

/// Runs booking-call attempts end to end. Generic over the provider seams so
/// tests can substitute deterministic fakes.
pub struct CallAgent<V, T, X> {
    voice: V,
    telephony: T,
    extractor: X,
    config: AgentConfig,
}

impl<V, T, X> CallAgent<V, T, X>
where
    V: VoiceSessionProvider,
    T: TelephonyProvider,
    X: ExtractionProvider,
{
    pub fn new(voice: V, telephony: T, extractor: X, config: AgentConfig) -> Self {
        Self {
            voice,
            telephony,
            extractor,
            config,
        }
    }

    /// One complete call attempt: create the voice session, dial, wait for
    /// the session to end, fetch the transcript, extract the outcome.
    ///
    /// Stages run strictly in sequence; a fatal error aborts with the stage
    /// and cause, producing no partial result. An extraction failure is the
    /// exception: the attempt still returns a `CallResult` carrying the
    /// pending fallback outcome so the summary and transcript survive for
    /// manual review.
    ///
    /// Known limitations: dropping this future after the dial stage stops
    /// local processing only, the live phone call is not hung up. Retrying
    /// an attempt that died between dial and extraction places a second real
    /// call; deduplication is the caller's concern.
    pub async fn run_call_attempt(
        &self,
        patient: &PatientProfile,
        dentist: &ProviderProfile,
    ) -> Result<CallResult, CallAttemptFailed> {
        let attempt_id = Uuid::new_v4();
        let script = build_agent_script(patient, dentist);
        let call_config = CallConfig::new(script, &self.config);

        let new_session = self
            .voice
            .create_session(&call_config)
            .await
            .map_err(CallAttemptFailed::at(Stage::CreateSession))?;
        // A success response without either field is still fatal.
        let session = CallSession {
            session_id: new_session.session_id.ok_or_else(|| CallAttemptFailed {
                stage: Stage::CreateSession,
                source: CallError::MissingField("callId"),
            })?,
            join_endpoint: new_session.join_endpoint.ok_or_else(|| CallAttemptFailed {
                stage: Stage::CreateSession,
                source: CallError::MissingField("joinUrl"),
            })?,
        };
        info!(attempt=%attempt_id, session=%session.session_id, "voice session created");

        let call_sid = self
            .telephony
            .place_call(&dentist.phone_number, &session.join_endpoint)
            .await
            .map_err(CallAttemptFailed::at(Stage::Dial))?;
        info!(attempt=%attempt_id, call=%call_sid, to=%dentist.phone_number, "outbound call placed");

        let summary = self
            .await_session_end(&session.session_id)
            .await
            .map_err(CallAttemptFailed::at(Stage::AwaitEnd))?;

        let turns = self
            .voice
            .transcript(&session.session_id)
            .await
            .map_err(CallAttemptFailed::at(Stage::FetchTranscript))?;
        let transcript = format_transcript(&turns);

        let outcome = match self.extractor.classify(&transcript).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Extraction failure must not lose the call record; keep
                // the result and mark the appointment pending.
                warn!(attempt=%attempt_id, error=%e, "outcome extraction failed; falling back to pending");
                AppointmentOutcome::pending()
            }
        };
        info!(attempt=%attempt_id, status=?outcome.appointment_status, "call attempt completed");

        Ok(CallResult {
            session_id: session.session_id,
            summary,
            transcript,
            outcome,
        })
    }

    /// Poll the session on a fixed interval until it reports an end
    /// timestamp, then return its summary. The whole wait runs under the
    /// configured ceiling so an attempt can never block forever on a session
    /// that fails to end cleanly.
    async fn await_session_end(&self, session_id: &str) -> Result<String, CallError> {
        let wait = async {
            loop {
                match self.voice.session_state(session_id).await {
                    Ok(state) if state.ended.is_some() => {
                        break state.summary.unwrap_or_default()
                    }
                    Ok(_) => {}
                    // A transient status-check failure must not discard an
                    // already-placed phone call; retry on the next tick.
                    Err(e) => {
                        warn!(session=%session_id, error=%e, "status check failed; retrying")
                    }
                }
                sleep(self.config.poll_interval).await;
            }
        };
        timeout(self.config.max_call_duration, wait)
            .await
            .map_err(|_| CallError::Timeout(self.config.max_call_duration))
    }
}
