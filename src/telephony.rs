use crate::error::CallError;
use crate::twilio_types::{
    wrap_twiml, CallResource, ConnectAction, Connection, Response, ResponseAction, StreamAction,
};

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Seam over the carrier. A failed dial is fatal to the attempt; retrying
/// means placing a new call, which starts a new session.
#[async_trait]
pub trait TelephonyProvider {
    /// Places an outbound call whose media is streamed to `join_endpoint` for
    /// the session's duration. Returns the carrier's call reference id.
    async fn place_call(&self, to: &str, join_endpoint: &str) -> Result<String, CallError>;
}

/// TwiML instructing the carrier to bridge call media to the voice session's
/// join endpoint.
pub fn connect_stream_twiml(join_endpoint: &str) -> String {
    let stream_action = StreamAction {
        url: join_endpoint.to_string(),
    };
    let connect_action = ConnectAction {
        connection: Connection::Stream(stream_action),
    };
    let response = Response {
        actions: vec![ResponseAction::Connect(connect_action)],
    };
    wrap_twiml(xmlserde::xml_serialize(response))
}

pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(
        http: reqwest::Client,
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Self {
        Self {
            http,
            account_sid,
            auth_token,
            from_number,
        }
    }

    fn calls_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Calls.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl TelephonyProvider for TwilioClient {
    async fn place_call(&self, to: &str, join_endpoint: &str) -> Result<String, CallError> {
        let twiml = connect_stream_twiml(join_endpoint);
        let mut form = HashMap::new();
        form.insert("To", to.to_string());
        form.insert("From", self.from_number.clone());
        form.insert("Twiml", twiml);
        let resp = self
            .http
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;
        if resp.status().is_client_error() {
            // Invalid destination, carrier rejection, account/quota failure.
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Configuration(format!(
                "carrier rejected call to {to} ({status}): {body}"
            )));
        }
        let call = resp.error_for_status()?.json::<CallResource>().await?;
        debug!(call=%call.sid, status=?call.status, "outbound call created");
        Ok(call.sid)
    }
}
