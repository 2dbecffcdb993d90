//! Request envelope construction.
//!
//! # Design
//! Pure string assembly, matching the legacy wire format byte for byte: a
//! fixed XML declaration, a `serv:message` root that declares only the
//! `xsi` prefix (the production parser tolerates the unbound `serv:`
//! prefix, and changing it would alter a format the server is known to
//! accept), a `securityContext` holding the four credentials in fixed
//! order, and a `bodyContent` element whose `xsi:type` names the target
//! service binding. Credential values and caller-supplied fragments are
//! embedded verbatim; nothing is escaped or validated here.

use crate::types::Credentials;

/// XML declaration version used for every envelope.
pub const XML_VERSION: &str = "1.0";

/// XML declaration encoding used for every envelope.
pub const XML_ENCODING: &str = "UTF-8";

/// Assemble a complete request envelope.
///
/// `service` is the dotted binding name (e.g. `meeting.LstsummaryMeeting`),
/// expanded to `java:com.webex.service.binding.<service>` in the
/// `bodyContent` type attribute. `security_header` is an optional XML
/// fragment appended inside `securityContext` after the credentials; `body`
/// is the operation-specific fragment placed inside `bodyContent`.
pub fn build_envelope(
    credentials: &Credentials,
    service: &str,
    security_header: Option<&str>,
    body: &str,
) -> String {
    let mut xml = String::with_capacity(512 + body.len());
    xml.push_str("<?xml version=\"");
    xml.push_str(XML_VERSION);
    xml.push_str("\" encoding=\"");
    xml.push_str(XML_ENCODING);
    xml.push_str("\"?>");
    xml.push_str("<serv:message xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">");
    xml.push_str("<header>");
    xml.push_str("<securityContext>");
    xml.push_str("<webExID>");
    xml.push_str(&credentials.webex_id);
    xml.push_str("</webExID>");
    xml.push_str("<password>");
    xml.push_str(&credentials.password);
    xml.push_str("</password>");
    xml.push_str("<siteID>");
    xml.push_str(&credentials.site_id);
    xml.push_str("</siteID>");
    xml.push_str("<partnerID>");
    xml.push_str(&credentials.partner_id);
    xml.push_str("</partnerID>");
    if let Some(fragment) = security_header {
        xml.push_str(fragment);
    }
    xml.push_str("</securityContext>");
    xml.push_str("</header>");
    xml.push_str("<body>");
    xml.push_str("<bodyContent xsi:type=\"java:com.webex.service.binding.");
    xml.push_str(service);
    xml.push_str("\">");
    xml.push_str(body);
    xml.push_str("</bodyContent>");
    xml.push_str("</body>");
    xml.push_str("</serv:message>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("jdoe", "s3cret", "690319", "g0webx!")
    }

    #[test]
    fn envelope_matches_the_wire_format() {
        let xml = build_envelope(&credentials(), "meeting.LstsummaryMeeting", None, "<x/>");
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <serv:message xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
             <header><securityContext>\
             <webExID>jdoe</webExID>\
             <password>s3cret</password>\
             <siteID>690319</siteID>\
             <partnerID>g0webx!</partnerID>\
             </securityContext></header>\
             <body><bodyContent xsi:type=\"java:com.webex.service.binding.meeting.LstsummaryMeeting\">\
             <x/>\
             </bodyContent></body></serv:message>"
        );
    }

    #[test]
    fn credentials_appear_verbatim_in_fixed_order() {
        let xml = build_envelope(&credentials(), "user.GetUser", None, "");
        let webex_id = xml.find("<webExID>jdoe</webExID>").unwrap();
        let password = xml.find("<password>s3cret</password>").unwrap();
        let site_id = xml.find("<siteID>690319</siteID>").unwrap();
        let partner_id = xml.find("<partnerID>g0webx!</partnerID>").unwrap();
        assert!(webex_id < password && password < site_id && site_id < partner_id);
    }

    #[test]
    fn security_header_fragment_lands_inside_the_security_context() {
        let xml = build_envelope(
            &credentials(),
            "user.AuthenticateUser",
            Some("<sessionTicket>abc</sessionTicket>"),
            "",
        );
        assert!(xml.contains(
            "</partnerID><sessionTicket>abc</sessionTicket></securityContext>"
        ));
    }
}
