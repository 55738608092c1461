//! Request envelope writer.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::{APACHE_MAP_NS, API_NS, SOAP_ENVELOPE_NS};
use crate::error_handling::ApiError;

/// Writes a request envelope for `operation` carrying `params` as an
/// Apache map, in the given order.
///
/// Layout (two-space indented, preceded by an XML declaration):
///
/// ```text
/// <Envelope xmlns:SOAP-ENV=".." xmlns:ns1=".." xmlns:ns2="..">
///   <Body>
///     <ns1:{operation}>
///       <param xsi:type="ns2:Map">
///         <item><key>..</key><value>..</value></item>
///         ...
/// ```
pub fn encode_envelope(operation: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, ApiError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let op_element = format!("ns1:{}", operation);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(encode_error)?;

    let envelope = BytesStart::new("Envelope").with_attributes([
        ("xmlns:SOAP-ENV", SOAP_ENVELOPE_NS),
        ("xmlns:ns1", API_NS),
        ("xmlns:ns2", APACHE_MAP_NS),
    ]);
    start(&mut writer, envelope)?;
    start(&mut writer, BytesStart::new("Body"))?;
    start(&mut writer, BytesStart::new(op_element.as_str()))?;
    start(
        &mut writer,
        BytesStart::new("param").with_attributes([("xsi:type", "ns2:Map")]),
    )?;

    for (key, value) in params {
        start(&mut writer, BytesStart::new("item"))?;
        text_element(&mut writer, "key", key)?;
        text_element(&mut writer, "value", value)?;
        end(&mut writer, "item")?;
    }

    end(&mut writer, "param")?;
    end(&mut writer, &op_element)?;
    end(&mut writer, "Body")?;
    end(&mut writer, "Envelope")?;

    Ok(writer.into_inner())
}

fn start(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<(), ApiError> {
    writer
        .write_event(Event::Start(element))
        .map_err(encode_error)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), ApiError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(encode_error)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), ApiError> {
    start(writer, BytesStart::new(name))?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(encode_error)?;
    end(writer, name)
}

fn encode_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::Encode(err.to_string())
}
