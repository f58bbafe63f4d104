use crate::error::CallError;
use crate::openai_types::{
    JsonSchemaFormat, OpenAIBatchResponse, OpenAIMessage, OpenAIPayload, ResponseFormat,
};
use crate::types::{AppointmentOutcome, AppointmentStatus};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use time::macros::format_description;
use time::{Date, Time};
use tracing::warn;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Seam over the classification model so the orchestrator can be driven by
/// deterministic fakes in tests.
#[async_trait]
pub trait ExtractionProvider {
    /// Extract a structured appointment outcome from a normalized transcript.
    async fn classify(&self, transcript: &str) -> Result<AppointmentOutcome, CallError>;
}

/// Model output before invariant checks.
#[derive(Deserialize, Debug)]
struct RawOutcome {
    #[serde(default)]
    appointment_date: Option<String>,
    #[serde(default)]
    appointment_time: Option<String>,
    appointment_status: AppointmentStatus,
}

pub struct OpenAiExtractor {
    http: reqwest::Client,
    api_key: String,
    model: String,
    reference_year: i32,
}

impl OpenAiExtractor {
    pub fn new(http: reqwest::Client, api_key: String, model: String, reference_year: i32) -> Self {
        Self {
            http,
            api_key,
            model,
            reference_year,
        }
    }
}

/// The extraction contract: never infer a date or time the transcript does
/// not explicitly confirm.
fn extraction_prompt(reference_year: i32) -> String {
    format!(
        "\
You are an AI assistant tasked with extracting appointment details from a phone conversation between a caller-side agent and a dental clinic. Given the transcript, extract and format the following details:

- `appointment_date`: the date of the appointment in YYYY-MM-DD format, or null.
- `appointment_time`: the time of the appointment in HH:MM:SS format, or null.
- `appointment_status`: one of Booked, Canceled, Rescheduled, Pending.

### Important Instructions:
- The year is **{reference_year}**. Resolve any relative or partial dates against it.
- If the transcript does **not** explicitly mention a confirmed appointment date and time, do **not** infer or assume any values.
- If no appointment is explicitly booked, return appointment_status Pending with appointment_date and appointment_time both null.
- If the conversation suggests a rescheduling but no confirmed new date and time, return appointment_status Rescheduled with appointment_date and appointment_time both null.
- If the appointment is explicitly canceled, return appointment_status Canceled with appointment_date and appointment_time both null.
- Only when a booking is explicitly confirmed, return appointment_status Booked with both appointment_date and appointment_time filled in."
    )
}

/// JSON schema the model's response is constrained to.
fn outcome_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "appointment_date": { "type": ["string", "null"] },
            "appointment_time": { "type": ["string", "null"] },
            "appointment_status": {
                "type": "string",
                "enum": ["Booked", "Canceled", "Rescheduled", "Pending"]
            }
        },
        "required": ["appointment_date", "appointment_time", "appointment_status"]
    })
}

/// Enforce the outcome invariants: Booked carries both a parseable date and
/// time; any other status carries neither.
fn validate_outcome(raw: RawOutcome) -> Result<AppointmentOutcome, CallError> {
    match raw.appointment_status {
        AppointmentStatus::Booked => {
            let date = raw
                .appointment_date
                .as_deref()
                .ok_or_else(|| CallError::Extraction("booked outcome without a date".to_string()))?;
            let date = Date::parse(date, format_description!("[year]-[month]-[day]")).map_err(
                |e| CallError::Extraction(format!("unparseable appointment date `{date}`: {e}")),
            )?;
            let time = raw
                .appointment_time
                .as_deref()
                .ok_or_else(|| CallError::Extraction("booked outcome without a time".to_string()))?;
            let time = Time::parse(time, format_description!("[hour]:[minute]:[second]")).map_err(
                |e| CallError::Extraction(format!("unparseable appointment time `{time}`: {e}")),
            )?;
            Ok(AppointmentOutcome {
                appointment_date: Some(date),
                appointment_time: Some(time),
                appointment_status: AppointmentStatus::Booked,
            })
        }
        status => {
            // Unconfirmed outcomes never carry a slot, whatever the model says.
            if raw.appointment_date.is_some() || raw.appointment_time.is_some() {
                warn!(status=?status, "discarding date/time on unconfirmed outcome");
            }
            Ok(AppointmentOutcome {
                appointment_date: None,
                appointment_time: None,
                appointment_status: status,
            })
        }
    }
}

#[async_trait]
impl ExtractionProvider for OpenAiExtractor {
    async fn classify(&self, transcript: &str) -> Result<AppointmentOutcome, CallError> {
        let payload = OpenAIPayload {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: extraction_prompt(self.reference_year),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            response_format: Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: "appointment_details".to_string(),
                    strict: true,
                    schema: outcome_schema(),
                },
            }),
            ..Default::default()
        };
        let resp = self
            .http
            .post(OPENAI_CHAT_URL)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<OpenAIBatchResponse>()
            .await?;
        let content = resp
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| CallError::Extraction("model returned no choices".to_string()))?;
        let raw = serde_json::from_str::<RawOutcome>(content)
            .map_err(|e| CallError::Extraction(format!("non-conforming model output: {e}")))?;
        validate_outcome(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn raw(date: Option<&str>, time: Option<&str>, status: AppointmentStatus) -> RawOutcome {
        RawOutcome {
            appointment_date: date.map(str::to_string),
            appointment_time: time.map(str::to_string),
            appointment_status: status,
        }
    }

    #[test]
    fn booked_outcome_parses_date_and_time() {
        let outcome = validate_outcome(raw(
            Some("2025-03-05"),
            Some("10:00:00"),
            AppointmentStatus::Booked,
        ))
        .unwrap();
        assert_eq!(outcome.appointment_date, Some(date!(2025 - 03 - 05)));
        assert_eq!(outcome.appointment_time, Some(time!(10:00:00)));
        assert_eq!(outcome.appointment_status, AppointmentStatus::Booked);
    }

    #[test]
    fn booked_without_date_is_an_extraction_error() {
        let err = validate_outcome(raw(None, Some("10:00:00"), AppointmentStatus::Booked));
        assert!(matches!(err, Err(CallError::Extraction(_))));
    }

    #[test]
    fn booked_without_time_is_an_extraction_error() {
        let err = validate_outcome(raw(Some("2025-03-05"), None, AppointmentStatus::Booked));
        assert!(matches!(err, Err(CallError::Extraction(_))));
    }

    #[test]
    fn booked_with_unparseable_date_is_an_extraction_error() {
        let err = validate_outcome(raw(
            Some("March 5th"),
            Some("10:00:00"),
            AppointmentStatus::Booked,
        ));
        assert!(matches!(err, Err(CallError::Extraction(_))));
    }

    #[test]
    fn pending_clears_any_reported_slot() {
        let outcome = validate_outcome(raw(
            Some("2025-03-05"),
            Some("10:00:00"),
            AppointmentStatus::Pending,
        ))
        .unwrap();
        assert_eq!(outcome, AppointmentOutcome::pending());
    }

    #[test]
    fn rescheduled_and_canceled_carry_no_slot() {
        for status in [AppointmentStatus::Rescheduled, AppointmentStatus::Canceled] {
            let outcome = validate_outcome(raw(Some("2025-03-05"), None, status)).unwrap();
            assert!(outcome.appointment_date.is_none());
            assert!(outcome.appointment_time.is_none());
            assert_eq!(outcome.appointment_status, status);
        }
    }

    #[test]
    fn unknown_status_fails_deserialization() {
        let parsed = serde_json::from_str::<RawOutcome>(
            r#"{"appointment_date": null, "appointment_time": null, "appointment_status": "Maybe"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn prompt_interpolates_reference_year() {
        let prompt = extraction_prompt(2026);
        assert!(prompt.contains("**2026**"));
        assert!(prompt.contains("do **not** infer"));
    }

    #[test]
    fn schema_requires_all_three_fields() {
        let schema = outcome_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert_eq!(
            schema["properties"]["appointment_status"]["enum"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }
}
