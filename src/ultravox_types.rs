mod call {
    use crate::types::AgentConfig;
    use serde::{Deserialize, Serialize};

    /// Write-once configuration for one voice-AI session.
    #[derive(Serialize, Debug, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct CallConfig {
        pub system_prompt: String,
        pub model: String,
        pub voice: String,
        pub temperature: f32,
        pub first_speaker: FirstSpeaker,
        pub medium: CallMedium,
        pub transcript_optional: bool,
        pub language_hint: String,
    }

    impl CallConfig {
        /// Session contract for a booking call: the remote party speaks first
        /// (the agent waits to be addressed) and a transcript is always kept.
        pub fn new(system_prompt: String, config: &AgentConfig) -> Self {
            Self {
                system_prompt,
                model: config.model.clone(),
                voice: config.voice.clone(),
                temperature: config.temperature,
                first_speaker: FirstSpeaker::User,
                medium: CallMedium::default(),
                transcript_optional: false,
                language_hint: config.language_hint.clone(),
            }
        }
    }

    #[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FirstSpeaker {
        #[serde(rename = "FIRST_SPEAKER_AGENT")]
        Agent,
        #[serde(rename = "FIRST_SPEAKER_USER")]
        User,
    }

    /// Serializes as `{"twilio": {}}`, telling the session its media arrives
    /// over a carrier bridge rather than a direct websocket.
    #[derive(Serialize, Debug, Clone, Default)]
    pub struct CallMedium {
        pub twilio: serde_json::Map<String, serde_json::Value>,
    }

    /// Create-session response. Both fields are nominally required but the
    /// remote may omit them even on HTTP success, so they stay optional here
    /// and the orchestrator treats absence as fatal.
    #[derive(Deserialize, Debug)]
    pub struct NewSession {
        #[serde(rename = "callId")]
        pub session_id: Option<String>,
        #[serde(rename = "joinUrl")]
        pub join_endpoint: Option<String>,
    }

    /// Status-poll response. `ended` is the session end timestamp; it stays
    /// absent while the call is in progress.
    #[derive(Deserialize, Debug, Clone)]
    pub struct SessionState {
        #[serde(default)]
        pub ended: Option<String>,
        #[serde(default)]
        pub summary: Option<String>,
    }
}
pub use call::*;

mod messages {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct TranscriptPage {
        pub results: Vec<TranscriptMessage>,
    }

    /// One utterance. The sequence order is conversational order and must be
    /// preserved through normalization.
    #[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct TranscriptMessage {
        pub role: MessageRole,
        #[serde(default)]
        pub text: Option<String>,
        #[serde(default)]
        pub medium: Option<MessageMedium>,
    }

    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MessageRole {
        #[serde(rename = "MESSAGE_ROLE_AGENT")]
        Agent,
        #[serde(rename = "MESSAGE_ROLE_USER")]
        User,
        #[serde(other)]
        Unknown,
    }

    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MessageMedium {
        #[serde(rename = "MESSAGE_MEDIUM_VOICE")]
        Voice,
        #[serde(other)]
        Text,
    }
}
pub use messages::*;
