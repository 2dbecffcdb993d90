//! The client: configuration, the implemented operation, and call history.
//!
//! # Design
//! `WebexClient` owns every piece of per-tenant state the legacy client kept
//! in shared fields: credentials, endpoint, send mode, and the append-only
//! call history. An operation is one pass through the pipeline — build the
//! envelope, dispatch over the configured [`Transport`], check the HTTP
//! status, decode — and only a fully completed pass appends to history, so
//! `call_count` always equals the number of completed calls.
//!
//! One Reference Guide operation is implemented:
//! [`WebexClient::list_summary_meetings`]. The rest of the guide's catalogue
//! follows the same envelope/dispatch/decode pattern and slots in beside it:
//! `user.AuthenticateUser`, `user.CreateUser`, `user.DelUser`,
//! `user.GetloginTicket`, `user.GetUser`, `user.LstsummaryUser`,
//! `user.SetUser`, `meeting.CreateMeeting`, `meeting.DelMeeting`,
//! `meeting.GetMeeting`, `meeting.GethosturlMeeting`,
//! `meeting.GetjoinurlMeeting`, `meeting.SetMeeting`, `event.CreateEvent`,
//! `event.DelEvent`, `event.GetEvent`, `event.LstsummaryEvent`,
//! `event.SetEvent`, `attendee.CreateMeetingAttendee`,
//! `attendee.LstMeetingAttendee`, `attendee.RegisterMeetingAttendee`, and
//! `history.LstmeetingattendeeHistory`.

use crate::decode;
use crate::endpoint::Endpoint;
use crate::envelope;
use crate::error::ApiError;
use crate::transport::{
    self, HttpTransport, SendMode, SocketTransport, Transport, WireResponse,
};
use crate::types::{CallRecord, Credentials, LstSummaryMeetingResponse};

/// Synchronous client for the WebEx XML service.
///
/// Not designed for shared-mutable use across threads; give each worker its
/// own client.
pub struct WebexClient {
    credentials: Option<Credentials>,
    endpoint: Option<Endpoint>,
    send_mode: SendMode,
    transport: Option<Box<dyn Transport>>,
    history: Vec<CallRecord>,
}

impl Default for WebexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WebexClient {
    pub fn new() -> Self {
        Self {
            credentials: None,
            endpoint: None,
            send_mode: SendMode::default(),
            transport: None,
            history: Vec::new(),
        }
    }

    /// Set the endpoint from a customer site URL, validated against the
    /// `webex.com` allow-list.
    pub fn set_url(&mut self, url: &str) -> Result<(), ApiError> {
        self.endpoint = Some(Endpoint::parse(url)?);
        Ok(())
    }

    /// Set a pre-built endpoint, bypassing URL-string validation.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoint = Some(endpoint);
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn set_send_mode(&mut self, mode: SendMode) {
        self.send_mode = mode;
    }

    pub fn send_mode(&self) -> SendMode {
        self.send_mode
    }

    /// Replace the security context wholesale.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// True when a complete set of credentials (all four fields non-empty)
    /// is configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(Credentials::is_complete)
    }

    /// Override the send strategy. Takes precedence over [`SendMode`] until
    /// the client is rebuilt; tests use this to run calls without a network.
    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = Some(transport);
    }

    /// `meeting.LstsummaryMeeting`: list up to `maximum_num` meetings
    /// ordered by start time.
    ///
    /// Requires complete credentials and an endpoint; both are checked
    /// before any I/O. On success the call is appended to history — read the
    /// result back through [`WebexClient::response_data`] or
    /// [`WebexClient::response_xml`].
    pub fn list_summary_meetings(&mut self, maximum_num: u32) -> Result<(), ApiError> {
        let credentials = match &self.credentials {
            Some(credentials) if credentials.is_complete() => credentials,
            _ => return Err(ApiError::MissingCredentials),
        };
        let endpoint = self.endpoint.as_ref().ok_or(ApiError::MissingEndpoint)?;

        let body = format!(
            "<listControl><startFrom/><maximumNum>{maximum_num}</maximumNum></listControl>\
             <order><orderBy>STARTTIME</orderBy></order>\
             <dateScope></dateScope>"
        );
        let envelope =
            envelope::build_envelope(credentials, "meeting.LstsummaryMeeting", None, &body);
        let request = transport::build_request(endpoint, self.send_mode, credentials, &envelope);
        tracing::debug!(
            service = "meeting.LstsummaryMeeting",
            mode = %self.send_mode,
            host = %endpoint.host(),
            "dispatching xml api call"
        );

        let response = self.current_transport().send(&request)?;
        check_status(&response)?;
        let decoded = decode::decode_lstsummary_meeting(&response.body)?;

        self.history.push(CallRecord {
            request_xml: envelope,
            response_xml: response.body,
            response: decoded,
        });
        Ok(())
    }

    /// Number of completed calls.
    pub fn call_count(&self) -> usize {
        self.history.len()
    }

    /// Every completed call, oldest first.
    pub fn history(&self) -> &[CallRecord] {
        &self.history
    }

    /// The raw response body of call `number` (1-based; `None` means the
    /// most recent call).
    pub fn response_xml(&self, number: Option<usize>) -> Result<&str, ApiError> {
        Ok(&self.record(number)?.response_xml)
    }

    /// The decoded response of call `number` (1-based; `None` means the
    /// most recent call).
    pub fn response_data(
        &self,
        number: Option<usize>,
    ) -> Result<&LstSummaryMeetingResponse, ApiError> {
        Ok(&self.record(number)?.response)
    }

    fn record(&self, number: Option<usize>) -> Result<&CallRecord, ApiError> {
        let completed = self.history.len();
        let requested = number.unwrap_or(completed);
        if requested == 0 || requested > completed {
            return Err(ApiError::InvalidResponseNumber {
                requested,
                completed,
            });
        }
        Ok(&self.history[requested - 1])
    }

    fn current_transport(&self) -> &dyn Transport {
        match &self.transport {
            Some(transport) => transport.as_ref(),
            None => match self.send_mode {
                SendMode::Http => &HttpTransport,
                SendMode::Socket => &SocketTransport,
            },
        }
    }
}

/// The XML service answers 200 for everything it parsed, including
/// API-level `FAILURE` results; any other status is a transport-level error.
fn check_status(response: &WireResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Scheme;
    use crate::transport::{WireRequest, WireResponse};
    use std::sync::{Arc, Mutex};

    const CANNED_RESPONSE: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
        "<serv:message xmlns:serv=\"http://www.webex.com/schemas/2002/06/service\" ",
        "xmlns:meet=\"http://www.webex.com/schemas/2002/06/service/meeting\">",
        "<serv:header><serv:response>",
        "<serv:result>SUCCESS</serv:result>",
        "<serv:gsbStatus>PRIMARY</serv:gsbStatus>",
        "</serv:response></serv:header>",
        "<serv:body><serv:bodyContent>",
        "<meet:meeting>",
        "<meet:meetingKey>805325231</meet:meetingKey>",
        "<meet:confName>Standup</meet:confName>",
        "<meet:meetingType>3</meet:meetingType>",
        "<meet:hostWebExID>jdoe</meet:hostWebExID>",
        "<meet:timeZoneID>4</meet:timeZoneID>",
        "<meet:timeZone>GMT-08:00, Pacific (San Jose)</meet:timeZone>",
        "<meet:status>NOT_INPROGRESS</meet:status>",
        "<meet:startDate>03/12/2013 10:00:00</meet:startDate>",
        "<meet:duration>15</meet:duration>",
        "<meet:listStatus>PUBLIC</meet:listStatus>",
        "<meet:hostJoined>false</meet:hostJoined>",
        "<meet:participantsJoined>false</meet:participantsJoined>",
        "<meet:telePresence>false</meet:telePresence>",
        "</meet:meeting>",
        "</serv:bodyContent></serv:body></serv:message>",
    );

    /// Records every request and answers with a canned body.
    struct RecordingTransport {
        requests: Arc<Mutex<Vec<WireRequest>>>,
        status: u16,
        body: String,
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &WireRequest) -> Result<WireResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(WireResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Fails the test if any I/O is attempted.
    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn send(&self, _request: &WireRequest) -> Result<WireResponse, ApiError> {
            panic!("transport must not be reached");
        }
    }

    fn configured_client() -> (WebexClient, Arc<Mutex<Vec<WireRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut client = WebexClient::new();
        client.set_credentials(Credentials::new("jdoe", "s3cret", "690319", "g0webx!"));
        client.set_endpoint(Endpoint::new(Scheme::Http, "company.webex.com"));
        client.set_transport(Box::new(RecordingTransport {
            requests: Arc::clone(&requests),
            status: 200,
            body: CANNED_RESPONSE.to_string(),
        }));
        (client, requests)
    }

    #[test]
    fn listing_without_credentials_fails_before_any_io() {
        let mut client = WebexClient::new();
        client.set_endpoint(Endpoint::new(Scheme::Http, "company.webex.com"));
        client.set_transport(Box::new(PanickingTransport));
        let err = client.list_summary_meetings(5).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredentials));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn incomplete_credentials_are_refused() {
        let mut client = WebexClient::new();
        client.set_endpoint(Endpoint::new(Scheme::Http, "company.webex.com"));
        client.set_transport(Box::new(PanickingTransport));
        client.set_credentials(Credentials::new("jdoe", "", "690319", "g0webx!"));
        assert!(!client.has_credentials());
        assert!(matches!(
            client.list_summary_meetings(5),
            Err(ApiError::MissingCredentials)
        ));
    }

    #[test]
    fn listing_without_endpoint_is_a_usage_error() {
        let mut client = WebexClient::new();
        client.set_credentials(Credentials::new("jdoe", "s3cret", "690319", "g0webx!"));
        client.set_transport(Box::new(PanickingTransport));
        assert!(matches!(
            client.list_summary_meetings(5),
            Err(ApiError::MissingEndpoint)
        ));
    }

    #[test]
    fn successful_call_appends_to_history() {
        let (mut client, _) = configured_client();
        client.list_summary_meetings(5).unwrap();
        assert_eq!(client.call_count(), 1);

        let data = client.response_data(None).unwrap();
        assert_eq!(data.status.result, "SUCCESS");
        assert_eq!(data.meetings.len(), 1);
        assert_eq!(data.meetings[0].meeting_key, 805_325_231);
        assert_eq!(client.response_xml(None).unwrap(), CANNED_RESPONSE);
        assert!(client.history()[0].request_xml.contains("<webExID>jdoe</webExID>"));
    }

    #[test]
    fn request_carries_the_envelope_in_the_form_body() {
        let (mut client, requests) = configured_client();
        client.list_summary_meetings(25).unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.body.starts_with("UID=jdoe&PWD=s3cret&SID=690319&PID=g0webx%21&XML="));
        // maximumNum lands inside the url-encoded envelope.
        assert!(request.body.contains("%3CmaximumNum%3E25%3C%2FmaximumNum%3E"));
        assert!(request.body.contains("meeting.LstsummaryMeeting"));
        assert_eq!(request.path, "/WBXService/XMLService");
    }

    #[test]
    fn history_is_one_based_and_defaults_to_most_recent() {
        let (mut client, _) = configured_client();
        client.list_summary_meetings(5).unwrap();

        // Swap in a transport with a distinguishable response body.
        let failure = CANNED_RESPONSE
            .replace("SUCCESS", "FAILURE")
            .replace("<serv:gsbStatus>PRIMARY</serv:gsbStatus>", "");
        client.set_transport(Box::new(RecordingTransport {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: 200,
            body: failure,
        }));
        client.list_summary_meetings(5).unwrap();
        assert_eq!(client.call_count(), 2);

        assert_eq!(client.response_data(Some(1)).unwrap().status.result, "SUCCESS");
        assert_eq!(client.response_data(Some(2)).unwrap().status.result, "FAILURE");
        assert_eq!(client.response_data(None).unwrap().status.result, "FAILURE");
    }

    #[test]
    fn out_of_range_history_lookups_are_rejected() {
        let (mut client, _) = configured_client();
        assert!(matches!(
            client.response_xml(None),
            Err(ApiError::InvalidResponseNumber { requested: 0, completed: 0 })
        ));

        client.list_summary_meetings(5).unwrap();
        assert!(matches!(
            client.response_xml(Some(0)),
            Err(ApiError::InvalidResponseNumber { requested: 0, completed: 1 })
        ));
        assert!(matches!(
            client.response_data(Some(2)),
            Err(ApiError::InvalidResponseNumber { requested: 2, completed: 1 })
        ));
    }

    #[test]
    fn non_200_status_fails_without_advancing_history() {
        let mut client = WebexClient::new();
        client.set_credentials(Credentials::new("jdoe", "s3cret", "690319", "g0webx!"));
        client.set_endpoint(Endpoint::new(Scheme::Http, "company.webex.com"));
        client.set_transport(Box::new(RecordingTransport {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: 500,
            body: "internal error".to_string(),
        }));
        let err = client.list_summary_meetings(5).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn undecodable_response_fails_without_advancing_history() {
        let mut client = WebexClient::new();
        client.set_credentials(Credentials::new("jdoe", "s3cret", "690319", "g0webx!"));
        client.set_endpoint(Endpoint::new(Scheme::Http, "company.webex.com"));
        client.set_transport(Box::new(RecordingTransport {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: 200,
            body: "<not-a-webex-response/>".to_string(),
        }));
        assert!(matches!(
            client.list_summary_meetings(5),
            Err(ApiError::DecodeError(_))
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn set_url_validates_the_domain() {
        let mut client = WebexClient::new();
        client.set_url("https://company.webex.com").unwrap();
        assert_eq!(client.endpoint().unwrap().host(), "company.webex.com");
        assert!(matches!(
            client.set_url("https://example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn default_send_mode_is_http() {
        assert_eq!(WebexClient::new().send_mode(), SendMode::Http);
    }
}
