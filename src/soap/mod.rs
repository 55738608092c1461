//! SOAP codec for the Synergy Wholesale API.
//!
//! The upstream server validates request envelopes structurally, so the
//! writer in `envelope` reproduces the exact element layout, attribute order,
//! and namespace URIs it accepts. Responses are read by local element name
//! in `decode`, ignoring fields the exporter does not use.
//!
//! Each operation is a variant of `Request`/`Response`; the envelope writer
//! itself only knows about an operation name and ordered key/value params.

mod decode;
mod envelope;

pub use decode::decode_response;
pub use envelope::encode_envelope;

use crate::config::Credentials;
use crate::domain::DomainListResponse;
use crate::error_handling::ApiError;

/// Upstream API operations this exporter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `listDomains`: every domain in the reseller account
    ListDomains,
}

impl Operation {
    /// Operation element name (without the `ns1:` prefix).
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListDomains => "listDomains",
        }
    }

    /// Local name of the element wrapping the operation's `return`.
    pub fn response_element(&self) -> &'static str {
        match self {
            Operation::ListDomains => "listDomainsResponse",
        }
    }
}

/// An outbound request.
#[derive(Debug, Clone, Copy)]
pub enum Request<'a> {
    /// List every domain in the account
    ListDomains(&'a Credentials),
}

impl Request<'_> {
    /// The operation this request invokes.
    pub fn operation(&self) -> Operation {
        match self {
            Request::ListDomains(_) => Operation::ListDomains,
        }
    }

    /// Map parameters in the order the upstream expects them.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Request::ListDomains(credentials) => vec![
                ("apiKey", credentials.api_key.as_str()),
                ("resellerID", credentials.reseller_id.as_str()),
            ],
        }
    }
}

/// A decoded inbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Result of `listDomains`
    ListDomains(DomainListResponse),
}

impl Response {
    /// Unwraps a `listDomains` result.
    pub fn into_domain_list(self) -> DomainListResponse {
        match self {
            Response::ListDomains(list) => list,
        }
    }
}

/// Encodes a request into a complete envelope, XML declaration included.
pub fn encode_request(request: &Request<'_>) -> Result<Vec<u8>, ApiError> {
    encode_envelope(request.operation().name(), &request.params())
}

/// Decodes a `listDomains` response envelope.
pub fn decode_list_domains(bytes: &[u8]) -> Result<DomainListResponse, ApiError> {
    decode_response(bytes, Operation::ListDomains).map(Response::into_domain_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/list_domains_response.xml");

    #[test]
    fn test_list_domains_params_order() {
        let creds = Credentials::new("123", "abc");
        let request = Request::ListDomains(&creds);
        assert_eq!(request.operation(), Operation::ListDomains);
        assert_eq!(
            request.params(),
            vec![("apiKey", "abc"), ("resellerID", "123")]
        );
    }

    #[test]
    fn test_encode_then_decode_canned_response() {
        let creds = Credentials::new("123", "abc");
        let encoded = encode_request(&Request::ListDomains(&creds)).unwrap();
        let text = String::from_utf8(encoded).unwrap();
        assert!(text.contains("<ns1:listDomains>"));
        assert!(text.contains("<value>abc</value>"));
        assert!(text.contains("<value>123</value>"));

        let list = decode_list_domains(FIXTURE.as_bytes()).unwrap();
        assert_eq!(list.status, "OK");
        assert_eq!(list.error_message, None);
        assert_eq!(list.domains.len(), 3);

        let first = &list.domains[0];
        assert_eq!(first.status, "OK");
        assert_eq!(first.error_message, None);
        assert_eq!(first.domain_name, "example.com.au");
        assert_eq!(first.domain_status, "ok");
        assert_eq!(first.domain_created, "2020-12-25 10:00:00");
        assert_eq!(first.domain_expiry, "2025-12-25 10:00:00");
        assert_eq!(first.created_date, "2020-12-25 10:05:13");
        assert_eq!(first.transfer_status, "");
        assert_eq!(first.auto_renew, 1);
        assert_eq!(
            first.name_servers,
            vec!["ns1.example.net", "ns2.example.net"]
        );
        assert_eq!(
            first.dnssec_keys,
            vec!["5f2b7c1e-1111-4a2b-9c3d-000000000001"]
        );

        let second = &list.domains[1];
        assert_eq!(second.domain_name, "shop.example.com");
        assert_eq!(second.domain_status, "clientTransferProhibited");
        assert_eq!(second.transfer_status, "none");
        assert_eq!(second.auto_renew, 0);
        assert_eq!(second.name_servers, vec!["dns1.registrar-servers.com"]);
        assert!(second.dnssec_keys.is_empty());

        let third = &list.domains[2];
        assert_eq!(third.status, "ERR_DOMAININFO_FAILED");
        assert_eq!(
            third.error_message.as_deref(),
            Some("Domain Info Failed - Unable to retrieve domain id")
        );
        assert_eq!(third.domain_name, "deleted-domain.com");
        assert!(third.name_servers.is_empty());
    }

    #[test]
    fn test_response_into_domain_list() {
        let list = DomainListResponse {
            status: "OK".into(),
            ..Default::default()
        };
        assert_eq!(
            Response::ListDomains(list.clone()).into_domain_list(),
            list
        );
    }
}
