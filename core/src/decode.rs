//! Decoding of `lstsummaryMeetingResponse` documents.
//!
//! # Design
//! A namespace-aware walk with `quick_xml::NsReader`: the status pair comes
//! from the first `serv:response` block, and every child of
//! `serv:bodyContent` that lives in the meeting schema namespace is a
//! candidate item. Candidates without a `meetingKey` child (such as
//! `matchingRecords`) are excluded, matching the legacy client's filter.
//! Prefixes are irrelevant throughout; only namespace URIs are compared.
//!
//! Leaf values are converted to their real types here rather than copied as
//! strings. A present-but-unparseable numeric, date, or boolean is a
//! `DecodeError` naming the field; absent string fields default to empty and
//! absent booleans to `false`, the tolerance the legacy string-cast client
//! effectively had.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::ApiError;
use crate::types::{LstSummaryMeetingResponse, MeetingSummary, ResponseStatus};

/// Namespace of the response header and envelope elements.
pub const SERVICE_NS: &str = "http://www.webex.com/schemas/2002/06/service";

/// Namespace of the meeting service's elements.
pub const MEETING_NS: &str = "http://www.webex.com/schemas/2002/06/service/meeting";

/// `startDate` wire format, site-local time.
pub const START_DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Decode a raw `meeting.LstsummaryMeeting` response body.
pub fn decode_lstsummary_meeting(xml: &str) -> Result<LstSummaryMeetingResponse, ApiError> {
    let mut reader = NsReader::from_str(xml);
    let mut status: Option<ResponseStatus> = None;
    let mut meetings = Vec::new();

    loop {
        let (ns, event) = next(&mut reader)?;
        let service_ns = in_ns(&ns, SERVICE_NS);
        match event {
            Event::Start(start) => {
                if service_ns && start.local_name().as_ref() == b"response" && status.is_none() {
                    status = Some(read_status(&mut reader)?);
                } else if service_ns && start.local_name().as_ref() == b"bodyContent" {
                    read_meetings(&mut reader, &mut meetings)?;
                }
                // Containers (message, header, body) are descended into.
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let status = status.ok_or_else(|| {
        ApiError::DecodeError("response has no serv:response status block".to_string())
    })?;
    Ok(LstSummaryMeetingResponse { status, meetings })
}

/// Read the children of a `serv:response` element up to its end tag.
fn read_status(reader: &mut NsReader<&[u8]>) -> Result<ResponseStatus, ApiError> {
    let mut result: Option<String> = None;
    let mut gsb_status = String::new();

    loop {
        let (ns, event) = next(reader)?;
        let service_ns = in_ns(&ns, SERVICE_NS);
        match event {
            Event::Start(start) => {
                if service_ns && start.local_name().as_ref() == b"result" {
                    result = Some(read_leaf_text(reader)?);
                } else if service_ns && start.local_name().as_ref() == b"gsbStatus" {
                    gsb_status = read_leaf_text(reader)?;
                } else {
                    skip(reader, &start)?;
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }

    let result = result.ok_or_else(|| {
        ApiError::DecodeError("serv:response is missing serv:result".to_string())
    })?;
    Ok(ResponseStatus { result, gsb_status })
}

/// Read the children of `serv:bodyContent`, collecting meeting items.
fn read_meetings(
    reader: &mut NsReader<&[u8]>,
    out: &mut Vec<MeetingSummary>,
) -> Result<(), ApiError> {
    loop {
        let (ns, event) = next(reader)?;
        let meeting_ns = in_ns(&ns, MEETING_NS);
        match event {
            Event::Start(start) => {
                if meeting_ns {
                    if let Some(meeting) = read_meeting_item(reader)? {
                        out.push(meeting);
                    }
                } else {
                    skip(reader, &start)?;
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

/// Read one candidate item element to its end tag.
///
/// Returns `None` when the item has no `meetingKey` child — the filter that
/// separates `meeting` entries from `matchingRecords` and friends.
fn read_meeting_item(reader: &mut NsReader<&[u8]>) -> Result<Option<MeetingSummary>, ApiError> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();

    loop {
        let (ns, event) = next(reader)?;
        let meeting_ns = in_ns(&ns, MEETING_NS);
        match event {
            Event::Start(start) => {
                if meeting_ns {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let text = read_leaf_text(reader)?;
                    fields.insert(name, text);
                } else {
                    skip(reader, &start)?;
                }
            }
            Event::Empty(start) => {
                if meeting_ns {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    fields.insert(name, String::new());
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }

    if !fields.contains_key("meetingKey") {
        return Ok(None);
    }
    meeting_from_fields(&fields).map(Some)
}

fn meeting_from_fields(fields: &BTreeMap<String, String>) -> Result<MeetingSummary, ApiError> {
    Ok(MeetingSummary {
        meeting_key: parse_required(fields, "meetingKey")?,
        conf_name: string_field(fields, "confName"),
        meeting_type: parse_required(fields, "meetingType")?,
        host_webex_id: string_field(fields, "hostWebExID"),
        other_host_webex_id: fields
            .get("otherHostWebExID")
            .filter(|value| !value.is_empty())
            .cloned(),
        time_zone_id: parse_required(fields, "timeZoneID")?,
        time_zone: string_field(fields, "timeZone"),
        status: string_field(fields, "status"),
        start_date: date_field(fields, "startDate")?,
        duration_min: parse_required(fields, "duration")?,
        list_status: string_field(fields, "listStatus"),
        host_joined: bool_field(fields, "hostJoined")?,
        participants_joined: bool_field(fields, "participantsJoined")?,
        tele_presence: bool_field(fields, "telePresence")?,
    })
}

fn string_field(fields: &BTreeMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn parse_required<T: FromStr>(fields: &BTreeMap<String, String>, name: &str) -> Result<T, ApiError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| ApiError::DecodeError(format!("meeting is missing field `{name}`")))?;
    raw.trim()
        .parse()
        .map_err(|_| ApiError::DecodeError(format!("field `{name}` has unparseable value `{raw}`")))
}

fn date_field(fields: &BTreeMap<String, String>, name: &str) -> Result<NaiveDateTime, ApiError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| ApiError::DecodeError(format!("meeting is missing field `{name}`")))?;
    NaiveDateTime::parse_from_str(raw.trim(), START_DATE_FORMAT)
        .map_err(|_| ApiError::DecodeError(format!("field `{name}` has unparseable value `{raw}`")))
}

fn bool_field(fields: &BTreeMap<String, String>, name: &str) -> Result<bool, ApiError> {
    let raw = match fields.get(name) {
        Some(value) => value,
        None => return Ok(false),
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        _ => Err(ApiError::DecodeError(format!(
            "field `{name}` has unparseable value `{raw}`"
        ))),
    }
}

/// Collect the text content of the element whose start tag was just read,
/// consuming through its end tag. Nested markup contributes its text only.
fn read_leaf_text(reader: &mut NsReader<&[u8]>) -> Result<String, ApiError> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Text(t) => {
                let chunk = t.unescape().map_err(xml_err)?;
                text.push_str(&chunk);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => return Err(truncated()),
            _ => {}
        }
    }
}

fn next<'i, 'r>(
    reader: &'r mut NsReader<&'i [u8]>,
) -> Result<(ResolveResult<'r>, Event<'i>), ApiError> {
    reader.read_resolved_event().map_err(xml_err)
}

fn skip(reader: &mut NsReader<&[u8]>, start: &BytesStart) -> Result<(), ApiError> {
    reader.read_to_end(start.name()).map_err(xml_err)?;
    Ok(())
}

fn in_ns(resolved: &ResolveResult, ns: &str) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(bound)) if *bound == ns.as_bytes())
}

fn truncated() -> ApiError {
    ApiError::DecodeError("unexpected end of document".to_string())
}

fn xml_err(e: impl std::fmt::Display) -> ApiError {
    ApiError::DecodeError(e.to_string())
}
