//! A local stand-in for the WebEx `WBXService/XMLService` endpoint.
//!
//! Accepts the legacy `UID/PWD/SID/PID/XML` form POST regardless of content
//! type (the production server tolerated both the form-encoded and the
//! `application/xml` framings the two client transports send), and answers
//! with a namespaced `lstsummaryMeetingResponse` rendered from its
//! configured meeting list. Requests missing any credential field get a
//! `FAILURE` response with a reason and exception id, over HTTP 200 — the
//! real service reported API errors in-band.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Router};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use tokio::{net::TcpListener, sync::RwLock};

/// Fixed path of the XML service.
pub const SERVICE_PATH: &str = "/WBXService/XMLService";

/// One meeting the server can list. `start_date` is kept in the wire format
/// (`MM/DD/YYYY HH:MM:SS`) since it is only ever rendered back out.
#[derive(Clone, Debug)]
pub struct MockMeeting {
    pub meeting_key: u64,
    pub conf_name: String,
    pub meeting_type: u32,
    pub host_webex_id: String,
    pub other_host_webex_id: Option<String>,
    pub time_zone_id: i32,
    pub time_zone: String,
    pub status: String,
    pub start_date: String,
    pub duration_min: u32,
    pub list_status: String,
    pub host_joined: bool,
    pub participants_joined: bool,
    pub tele_presence: bool,
}

pub type Db = Arc<RwLock<Vec<MockMeeting>>>;

/// Three meetings matching what a small site would list, including one name
/// that exercises XML escaping on the way out.
pub fn sample_meetings() -> Vec<MockMeeting> {
    let base = MockMeeting {
        meeting_key: 0,
        conf_name: String::new(),
        meeting_type: 3,
        host_webex_id: "jdoe".to_string(),
        other_host_webex_id: None,
        time_zone_id: 4,
        time_zone: "GMT-08:00, Pacific (San Jose)".to_string(),
        status: "NOT_INPROGRESS".to_string(),
        start_date: String::new(),
        duration_min: 60,
        list_status: "PUBLIC".to_string(),
        host_joined: false,
        participants_joined: false,
        tele_presence: false,
    };
    vec![
        MockMeeting {
            meeting_key: 805_325_231,
            conf_name: "Weekly team sync".to_string(),
            start_date: "03/12/2013 10:00:00".to_string(),
            ..base.clone()
        },
        MockMeeting {
            meeting_key: 805_325_462,
            conf_name: "Q&A session".to_string(),
            host_webex_id: "asmith".to_string(),
            other_host_webex_id: Some("jdoe".to_string()),
            status: "INPROGRESS".to_string(),
            start_date: "03/13/2013 14:30:00".to_string(),
            duration_min: 45,
            list_status: "PRIVATE".to_string(),
            host_joined: true,
            participants_joined: true,
            ..base.clone()
        },
        MockMeeting {
            meeting_key: 805_326_017,
            conf_name: "Roadmap review".to_string(),
            start_date: "03/15/2013 09:00:00".to_string(),
            duration_min: 90,
            ..base
        },
    ]
}

pub fn app(db: Db) -> Router {
    Router::new()
        .route(SERVICE_PATH, post(xml_service))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

async fn xml_service(State(db): State<Db>, body: String) -> (StatusCode, String) {
    // Decode the form manually: the socket-mode client labels the body
    // `application/xml`, so a typed Form extractor would reject it.
    let form: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let complete = ["UID", "PWD", "SID", "PID", "XML"]
        .iter()
        .all(|field| form.get(*field).is_some_and(|value| !value.is_empty()));
    if !complete {
        tracing::debug!("rejecting request with missing credential fields");
        return (
            StatusCode::OK,
            failure_response("Access denied.  Need full credentials", "030048"),
        );
    }

    let maximum_num = extract_maximum_num(&form["XML"]).unwrap_or(u32::MAX) as usize;
    let meetings = db.read().await;
    let selected = &meetings[..meetings.len().min(maximum_num)];
    tracing::debug!(
        total = meetings.len(),
        returned = selected.len(),
        "serving lstsummaryMeeting"
    );
    (StatusCode::OK, success_response(selected, meetings.len()))
}

/// Pull `maximumNum` out of the request envelope, prefix-insensitively.
fn extract_maximum_num(envelope: &str) -> Option<u32> {
    let mut reader = quick_xml::Reader::from_str(envelope);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) if start.local_name().as_ref() == b"maximumNum" => {
                let text = reader.read_text(start.name()).ok()?;
                return text.trim().parse().ok();
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn success_response(meetings: &[MockMeeting], total: usize) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    xml.push_str(
        "<serv:message xmlns:serv=\"http://www.webex.com/schemas/2002/06/service\" \
         xmlns:com=\"http://www.webex.com/schemas/2002/06/common\" \
         xmlns:meet=\"http://www.webex.com/schemas/2002/06/service/meeting\">",
    );
    xml.push_str(
        "<serv:header><serv:response><serv:result>SUCCESS</serv:result>\
         <serv:gsbStatus>PRIMARY</serv:gsbStatus></serv:response></serv:header>",
    );
    xml.push_str(
        "<serv:body><serv:bodyContent xsi:type=\"meet:lstsummaryMeetingResponse\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );
    xml.push_str(&format!(
        "<meet:matchingRecords><serv:total>{total}</serv:total>\
         <serv:returned>{}</serv:returned>\
         <serv:startFrom>1</serv:startFrom></meet:matchingRecords>",
        meetings.len()
    ));
    for meeting in meetings {
        push_meeting(&mut xml, meeting);
    }
    xml.push_str("</serv:bodyContent></serv:body></serv:message>");
    xml
}

fn push_meeting(xml: &mut String, meeting: &MockMeeting) {
    xml.push_str("<meet:meeting>");
    leaf(xml, "meetingKey", &meeting.meeting_key.to_string());
    leaf(xml, "confName", &meeting.conf_name);
    leaf(xml, "meetingType", &meeting.meeting_type.to_string());
    leaf(xml, "hostWebExID", &meeting.host_webex_id);
    leaf(
        xml,
        "otherHostWebExID",
        meeting.other_host_webex_id.as_deref().unwrap_or(""),
    );
    leaf(xml, "timeZoneID", &meeting.time_zone_id.to_string());
    leaf(xml, "timeZone", &meeting.time_zone);
    leaf(xml, "status", &meeting.status);
    leaf(xml, "startDate", &meeting.start_date);
    leaf(xml, "duration", &meeting.duration_min.to_string());
    leaf(xml, "listStatus", &meeting.list_status);
    leaf(xml, "hostJoined", &meeting.host_joined.to_string());
    leaf(
        xml,
        "participantsJoined",
        &meeting.participants_joined.to_string(),
    );
    leaf(xml, "telePresence", &meeting.tele_presence.to_string());
    xml.push_str("</meet:meeting>");
}

fn leaf(xml: &mut String, name: &str, value: &str) {
    xml.push_str("<meet:");
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape(value));
    xml.push_str("</meet:");
    xml.push_str(name);
    xml.push('>');
}

fn failure_response(reason: &str, exception_id: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <serv:message xmlns:serv=\"http://www.webex.com/schemas/2002/06/service\">\
         <serv:header><serv:response>\
         <serv:result>FAILURE</serv:result>\
         <serv:reason>{}</serv:reason>\
         <serv:gsbStatus>PRIMARY</serv:gsbStatus>\
         <serv:exceptionID>{exception_id}</serv:exceptionID>\
         </serv:response></serv:header>\
         <serv:body><serv:bodyContent/></serv:body></serv:message>",
        escape(reason)
    )
}
