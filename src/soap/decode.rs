//! Response envelope reader.
//!
//! The document is read into a small element tree keyed by local names
//! (namespace prefixes vary between upstream releases), then walked along
//! `Envelope > Body > {operation}Response > return`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Operation, Response};
use crate::domain::{DomainListResponse, DomainRecord};
use crate::error_handling::ApiError;

/// Deepest element nesting accepted in a response. Real envelopes stay
/// under 10 levels.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Self {
        Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of a direct child, empty when the child is absent.
    fn child_text(&self, name: &str) -> &str {
        self.child(name).map(|c| c.text.as_str()).unwrap_or("")
    }

    fn required(&self, name: &str) -> Result<&Element, ApiError> {
        self.child(name).ok_or_else(|| {
            malformed(format!("<{}> has no <{}> element", self.name, name))
        })
    }
}

/// Decodes a response envelope for `operation`.
///
/// # Errors
///
/// - `ApiError::MalformedResponse` if the bytes are not well-formed XML or
///   the envelope/body/response/return nesting is missing
/// - `ApiError::Fault` if the body carries a SOAP Fault
pub fn decode_response(bytes: &[u8], operation: Operation) -> Result<Response, ApiError> {
    let envelope = parse_tree(bytes)?;
    if envelope.name != "Envelope" {
        return Err(malformed(format!(
            "root element is <{}>, expected <Envelope>",
            envelope.name
        )));
    }

    let body = envelope.required("Body")?;
    if let Some(fault) = body.child("Fault") {
        return Err(ApiError::Fault {
            code: fault.child_text("faultcode").to_string(),
            message: fault.child_text("faultstring").to_string(),
        });
    }

    let result = body.required(operation.response_element())?.required("return")?;

    match operation {
        Operation::ListDomains => decode_domain_list(result).map(Response::ListDomains),
    }
}

fn decode_domain_list(result: &Element) -> Result<DomainListResponse, ApiError> {
    let domains = match result.child("domainList") {
        Some(list) => list
            .children_named("item")
            .map(decode_domain_record)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(DomainListResponse {
        status: result.child_text("status").to_string(),
        error_message: optional_text(result, "errorMessage"),
        domains,
    })
}

fn decode_domain_record(item: &Element) -> Result<DomainRecord, ApiError> {
    let auto_renew = match item.child_text("autoRenew").trim() {
        "" => 0,
        raw => raw.parse::<i64>().map_err(|_| {
            malformed(format!(
                "autoRenew {:?} for {} is not an integer",
                raw,
                item.child_text("domainName")
            ))
        })?,
    };

    let name_servers = item
        .child("nameServers")
        .map(|ns| {
            ns.children_named("item")
                .map(|server| server.text.clone())
                .collect()
        })
        .unwrap_or_default();

    let dnssec_keys = item
        .child("DSData")
        .map(|ds| {
            ds.children_named("item")
                .filter_map(|key| key.child("UUID"))
                .map(|uuid| uuid.text.clone())
                .collect()
        })
        .unwrap_or_default();

    Ok(DomainRecord {
        status: item.child_text("status").to_string(),
        error_message: optional_text(item, "errorMessage"),
        domain_name: item.child_text("domainName").to_string(),
        domain_status: item.child_text("domain_status").to_string(),
        domain_created: item.child_text("domain_created").to_string(),
        domain_expiry: item.child_text("domain_expiry").to_string(),
        created_date: item.child_text("createdDate").to_string(),
        transfer_status: item.child_text("transfer_status").to_string(),
        auto_renew,
        name_servers,
        dnssec_keys,
    })
}

fn optional_text(element: &Element, name: &str) -> Option<String> {
    Some(element.child_text(name))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Reads a whole document into an element tree.
fn parse_tree(bytes: &[u8]) -> Result<Element, ApiError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| malformed(format!("response is not UTF-8: {}", e)))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(malformed(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed(format!(
                        "elements nested deeper than {} levels",
                        MAX_DEPTH
                    )));
                }
                stack.push(Element::from_start(&start));
            }
            Event::Empty(start) => attach(&mut stack, &mut root, Element::from_start(&start))?,
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without an open element".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| malformed(format!("bad text content: {}", e)))?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!(
            "document ended inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| malformed("document has no root element".into()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ApiError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("document has more than one root element".into())),
    }
    Ok(())
}

fn malformed(reason: String) -> ApiError {
    ApiError::MalformedResponse(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> Result<DomainListResponse, ApiError> {
        decode_response(xml.as_bytes(), Operation::ListDomains).map(Response::into_domain_list)
    }

    fn wrap_return(inner: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" "#,
                r#"xmlns:ns1="http://api.synergywholesale.com">"#,
                "<SOAP-ENV:Body><ns1:listDomainsResponse><return>{}</return>",
                "</ns1:listDomainsResponse></SOAP-ENV:Body></SOAP-ENV:Envelope>"
            ),
            inner
        )
    }

    #[test]
    fn test_decode_minimal_ok() {
        let list = decode(&wrap_return("<status>OK</status>")).unwrap();
        assert_eq!(list.status, "OK");
        assert!(list.domains.is_empty());
        assert_eq!(list.error_message, None);
    }

    #[test]
    fn test_decode_top_level_error() {
        let list = decode(&wrap_return(
            "<status>ERR_LOGIN_FAILED</status><errorMessage>Unable to validate SOAP client</errorMessage>",
        ))
        .unwrap();
        assert_eq!(list.status, "ERR_LOGIN_FAILED");
        assert_eq!(
            list.error_message.as_deref(),
            Some("Unable to validate SOAP client")
        );
        assert!(!list.is_ok());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let list = decode(&wrap_return(concat!(
            "<status>OK</status><totalDomains>1</totalDomains>",
            "<domainList><item><status>OK</status><domainName>a.com</domainName>",
            "<icannStatus>Verified</icannStatus><categories><item>x</item></categories>",
            "</item></domainList>"
        )))
        .unwrap();
        assert_eq!(list.domains.len(), 1);
        assert_eq!(list.domains[0].domain_name, "a.com");
        assert!(list.domains[0].name_servers.is_empty());
    }

    #[test]
    fn test_decode_unescapes_text_and_cdata() {
        let list = decode(&wrap_return(concat!(
            "<status>OK</status><domainList><item>",
            "<status>OK</status><domainName>r&amp;d.com</domainName>",
            "<domain_status><![CDATA[ok]]></domain_status>",
            "</item></domainList>"
        )))
        .unwrap();
        assert_eq!(list.domains[0].domain_name, "r&d.com");
        assert_eq!(list.domains[0].domain_status, "ok");
    }

    #[test]
    fn test_decode_empty_elements() {
        let list = decode(&wrap_return(concat!(
            "<status>OK</status><errorMessage/><domainList><item>",
            "<status>OK</status><domainName>a.com</domainName><autoRenew/>",
            "<nameServers/><DSData><item><keyTag>1</keyTag></item></DSData>",
            "</item></domainList>"
        )))
        .unwrap();
        assert_eq!(list.error_message, None);
        let record = &list.domains[0];
        assert_eq!(record.auto_renew, 0);
        assert!(record.name_servers.is_empty());
        // a DS item without a UUID is not counted
        assert!(record.dnssec_keys.is_empty());
    }

    #[test]
    fn test_decode_non_numeric_auto_renew_is_malformed() {
        let err = decode(&wrap_return(concat!(
            "<status>OK</status><domainList><item>",
            "<domainName>a.com</domainName><autoRenew>yes</autoRenew>",
            "</item></domainList>"
        )))
        .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(ref m) if m.contains("a.com")));
    }

    #[test]
    fn test_decode_not_xml() {
        let err = decode("<html><body>502 Bad Gateway").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));

        let err = decode("").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));

        let err = decode_response(&[0xff, 0xfe, 0x00], Operation::ListDomains).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_mismatched_tags() {
        let err = decode("<Envelope><Body></Envelope></Body>").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_missing_nesting() {
        let missing_body = "<Envelope><Header/></Envelope>";
        let missing_response = "<Envelope><Body><otherResponse/></Body></Envelope>";
        let missing_return =
            "<Envelope><Body><listDomainsResponse><status>OK</status></listDomainsResponse></Body></Envelope>";
        let wrong_root = "<Body><listDomainsResponse><return/></listDomainsResponse></Body>";

        for xml in [missing_body, missing_response, missing_return, wrong_root] {
            let err = decode(xml).unwrap_err();
            assert!(
                matches!(err, ApiError::MalformedResponse(_)),
                "expected malformed for {}",
                xml
            );
        }
    }

    #[test]
    fn test_decode_soap_fault() {
        let xml = concat!(
            r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<SOAP-ENV:Body><SOAP-ENV:Fault>",
            "<faultcode>SOAP-ENV:Server</faultcode>",
            "<faultstring>Procedure 'listDomain' not present</faultstring>",
            "</SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"
        );
        match decode(xml).unwrap_err() {
            ApiError::Fault { code, message } => {
                assert_eq!(code, "SOAP-ENV:Server");
                assert_eq!(message, "Procedure 'listDomain' not present");
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_multiple_roots() {
        let err = decode("<Envelope/><Envelope/>").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_deep_nesting_is_malformed() {
        let depth = 200_000;
        let body = format!("{}{}", "<x>".repeat(depth), "</x>".repeat(depth));
        let xml = wrap_return(&body);

        // Run on a 2 MiB stack, the tokio worker default.
        let result = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || decode(&xml))
            .unwrap()
            .join()
            .unwrap();

        match result.unwrap_err() {
            ApiError::MalformedResponse(reason) => assert!(reason.contains("nested deeper")),
            other => panic!("expected malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_nesting_at_limit_is_accepted() {
        // Envelope > Body > listDomainsResponse > return is four levels.
        let depth = MAX_DEPTH - 4;
        let body = format!("{}{}", "<x>".repeat(depth), "</x>".repeat(depth));
        assert!(decode(&wrap_return(&body)).is_ok());
    }
}
