//! Full client lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over
//! both real transports: the HTTP strategy for the first call, the
//! raw-socket strategy for the second. Validates envelope building, form
//! encoding, response decoding, and the history accessors end-to-end.

use std::sync::Arc;

use webex_core::{ApiError, Credentials, Endpoint, Scheme, SendMode, WebexClient};

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let db = Arc::new(tokio::sync::RwLock::new(mock_server::sample_meetings()));
            mock_server::run(listener, db).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn listing_lifecycle_over_both_transports() {
    let addr = start_server();

    let mut client = WebexClient::new();
    client.set_credentials(Credentials::new("jdoe", "s3cret", "690319", "g0webx!"));
    client.set_endpoint(Endpoint::new(Scheme::Http, "127.0.0.1").with_port(addr.port()));

    // Call 1: pooled HTTP transport (the default mode).
    assert_eq!(client.send_mode(), SendMode::Http);
    client.list_summary_meetings(10).unwrap();
    assert_eq!(client.call_count(), 1);

    let data = client.response_data(None).unwrap();
    assert_eq!(data.status.result, "SUCCESS");
    assert_eq!(data.status.gsb_status, "PRIMARY");
    assert_eq!(data.meetings.len(), 3);
    let keys: Vec<u64> = data.meetings.iter().map(|m| m.meeting_key).collect();
    assert_eq!(keys, [805_325_231, 805_325_462, 805_326_017]);
    // Escaped content round-trips back to its source text.
    assert_eq!(data.meetings[1].conf_name, "Q&A session");
    assert_eq!(data.meetings[1].other_host_webex_id.as_deref(), Some("jdoe"));

    // Call 2: raw-socket transport, truncated listing.
    client.set_send_mode(SendMode::Socket);
    client.list_summary_meetings(1).unwrap();
    assert_eq!(client.call_count(), 2);

    let truncated = client.response_data(None).unwrap();
    assert_eq!(truncated.meetings.len(), 1);
    assert_eq!(truncated.meetings[0].meeting_key, 805_325_231);

    // History: 1-based access, raw and decoded views of past calls.
    let first = client.response_data(Some(1)).unwrap();
    assert_eq!(first.meetings.len(), 3);
    let first_xml = client.response_xml(Some(1)).unwrap();
    assert!(first_xml.contains("lstsummaryMeetingResponse"));
    assert!(first_xml.contains("<meet:meetingKey>805326017</meet:meetingKey>"));
    let second_xml = client.response_xml(Some(2)).unwrap();
    assert!(!second_xml.contains("<meet:meetingKey>805326017</meet:meetingKey>"));

    assert!(matches!(
        client.response_xml(Some(0)),
        Err(ApiError::InvalidResponseNumber { requested: 0, completed: 2 })
    ));
    assert!(matches!(
        client.response_data(Some(3)),
        Err(ApiError::InvalidResponseNumber { requested: 3, completed: 2 })
    ));

    // The stored request envelope is the exact document that went out.
    assert!(client.history()[0]
        .request_xml
        .contains("xsi:type=\"java:com.webex.service.binding.meeting.LstsummaryMeeting\""));
}
