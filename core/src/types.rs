//! Domain types for the WebEx XML API.
//!
//! # Design
//! The original client copied every response leaf into untyped string
//! fields. These are the same fields with their real types spelled out:
//! `meetingKey` is numeric, `startDate` is a site-local timestamp,
//! `duration` is minutes, and the three `*Joined`/`telePresence` flags are
//! booleans. Status strings (`status`, `listStatus`, `result`, `gsbStatus`)
//! stay verbatim text — the API reference treats them as open vocabularies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The four-part security context sent with every request.
///
/// Replaced wholesale via [`crate::WebexClient::set_credentials`]; a set of
/// credentials is usable only when all four fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub webex_id: String,
    pub password: String,
    pub site_id: String,
    pub partner_id: String,
}

impl Credentials {
    pub fn new(
        webex_id: impl Into<String>,
        password: impl Into<String>,
        site_id: impl Into<String>,
        partner_id: impl Into<String>,
    ) -> Self {
        Self {
            webex_id: webex_id.into(),
            password: password.into(),
            site_id: site_id.into(),
            partner_id: partner_id.into(),
        }
    }

    /// True when every field is non-empty. Calls are refused otherwise.
    pub fn is_complete(&self) -> bool {
        !self.webex_id.is_empty()
            && !self.password.is_empty()
            && !self.site_id.is_empty()
            && !self.partner_id.is_empty()
    }
}

/// The `serv:response` status pair present in every API response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// `SUCCESS` or `FAILURE`, copied verbatim.
    pub result: String,
    /// Global-site-backup status (e.g. `PRIMARY`). Empty when the server
    /// omits it, which some failure responses do.
    #[serde(default)]
    pub gsb_status: String,
}

/// One meeting entry from a `lstsummaryMeetingResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub meeting_key: u64,
    pub conf_name: String,
    pub meeting_type: u32,
    pub host_webex_id: String,
    /// Alternate host, when one is assigned. Absent or empty elements map
    /// to `None`.
    pub other_host_webex_id: Option<String>,
    pub time_zone_id: i32,
    pub time_zone: String,
    /// Session state, e.g. `INPROGRESS` or `NOT_INPROGRESS`.
    pub status: String,
    /// Scheduled start in the site-local `timeZone`, parsed from the API's
    /// `MM/DD/YYYY HH:MM:SS` format.
    pub start_date: NaiveDateTime,
    /// Scheduled length in minutes.
    pub duration_min: u32,
    /// Listing visibility, e.g. `PUBLIC` or `PRIVATE`.
    pub list_status: String,
    pub host_joined: bool,
    pub participants_joined: bool,
    pub tele_presence: bool,
}

/// Decoded result of the `meeting.LstsummaryMeeting` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LstSummaryMeetingResponse {
    pub status: ResponseStatus,
    /// Meetings in server order. Entries the server sent without a
    /// `meetingKey` are excluded.
    pub meetings: Vec<MeetingSummary>,
}

/// One completed call, as stored in the client's history.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// The envelope that went out.
    pub request_xml: String,
    /// The raw response body as received.
    pub response_xml: String,
    /// The decoded response.
    pub response: LstSummaryMeetingResponse,
}
