mod error;
mod extract;
mod openai_types;
mod prompt;
mod tasks;
mod telephony;
mod transcript;
mod twilio_types;
mod types;
mod ultravox_types;
mod voice;

use crate::extract::OpenAiExtractor;
use crate::tasks::CallAgent;
use crate::telephony::TwilioClient;
use crate::types::{AgentConfig, PatientProfile, ProviderProfile};
use crate::voice::UltravoxClient;

use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

pub mod consts {
    pub const DEFAULT_CALL_MODEL: &str = "fixie-ai/ultravox";
    pub const DEFAULT_CALL_VOICE: &str = "Mark";
    pub const DEFAULT_TEMPERATURE: f32 = 0.5;
    pub const DEFAULT_LANGUAGE_HINT: &str = "pt";
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
    pub const DEFAULT_MAX_CALL_SECS: u64 = 600;
    pub const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;
    pub const NO_RESPONSE_PLACEHOLDER: &str = "[No response]";
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

async fn read_profile<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let raw = tokio::fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::filter::Targets::new().with_targets([
            ("hyper", tracing_subscriber::filter::LevelFilter::OFF),
            (
                "dental_call_rs",
                tracing_subscriber::filter::LevelFilter::DEBUG,
            ),
        ]));
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let ultravox_api_key = env::var("ULTRAVOX_API_KEY").expect("ULTRAVOX_API_KEY not set!");
    let twilio_account_sid = env::var("TWILIO_ACCOUNT_SID").expect("TWILIO_ACCOUNT_SID not set!");
    let twilio_auth_token = env::var("TWILIO_AUTH_TOKEN").expect("TWILIO_AUTH_TOKEN not set!");
    let twilio_phone_number =
        env::var("TWILIO_PHONE_NUMBER").expect("TWILIO_PHONE_NUMBER not set!");
    let openai_api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set!");

    let mut args = env::args().skip(1);
    let (patient_path, dentist_path) = match (args.next(), args.next()) {
        (Some(p), Some(d)) => (p, d),
        _ => {
            eprintln!("usage: dental-call-rs <patient.json> <dentist.json>");
            std::process::exit(2);
        }
    };
    let patient: PatientProfile = read_profile(&patient_path).await;
    let dentist: ProviderProfile = read_profile(&dentist_path).await;

    let config = AgentConfig {
        model: env_or("CALL_MODEL", consts::DEFAULT_CALL_MODEL),
        voice: env_or("CALL_VOICE", consts::DEFAULT_CALL_VOICE),
        temperature: env_parse("CALL_TEMPERATURE", consts::DEFAULT_TEMPERATURE),
        language_hint: env_or("LANGUAGE_HINT", consts::DEFAULT_LANGUAGE_HINT),
        poll_interval: Duration::from_secs(env_parse(
            "POLL_INTERVAL_SECS",
            consts::DEFAULT_POLL_INTERVAL_SECS,
        )),
        max_call_duration: Duration::from_secs(env_parse(
            "MAX_CALL_SECS",
            consts::DEFAULT_MAX_CALL_SECS,
        )),
    };

    let http_client = reqwest::Client::new();
    let voice = UltravoxClient::new(http_client.clone(), ultravox_api_key);
    let telephony = TwilioClient::new(
        http_client.clone(),
        twilio_account_sid,
        twilio_auth_token,
        twilio_phone_number,
    );
    let extractor = OpenAiExtractor::new(
        http_client,
        openai_api_key,
        env_or("EXTRACTION_MODEL", consts::DEFAULT_EXTRACTION_MODEL),
        env_parse("REFERENCE_YEAR", consts::DEFAULT_REFERENCE_YEAR),
    );
    let agent = CallAgent::new(voice, telephony, extractor, config);

    match agent.run_call_attempt(&patient, &dentist).await {
        Ok(result) => {
            info!(session=%result.session_id, status=?result.outcome.appointment_status, "call attempt succeeded");
            // Hand the result to the persistence collaborator via stdout.
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
        }
        Err(e) => {
            // The phone call may already have been placed and billed; keep
            // the stage and cause on record for reconciliation.
            error!(stage=%e.stage, error=%e, "call attempt failed");
            std::process::exit(1);
        }
    }
}
