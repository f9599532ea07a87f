//! Vector markup handling: root attribute access and rewrite, the XML
//! declaration, and the base64 data URI the rasterizer loads from.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::ExportError;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";
pub const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Size-related attributes of the root `<svg>` element, undecoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootAttributes {
    pub view_box: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Reads `viewBox`, `width` and `height` from the root element.
pub fn root_attributes(markup: &str) -> Result<RootAttributes, ExportError> {
    let mut reader = Reader::from_str(markup);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) | Ok(Event::Empty(start)) => {
                ensure_svg_root(&start)?;
                let mut attrs = RootAttributes::default();
                for attr in start.attributes() {
                    let attr = attr.map_err(|e| ExportError::InvalidMarkup(e.to_string()))?;
                    let slot = match attr.key.as_ref() {
                        b"viewBox" => &mut attrs.view_box,
                        b"width" => &mut attrs.width,
                        b"height" => &mut attrs.height,
                        _ => continue,
                    };
                    let value = std::str::from_utf8(&attr.value)
                        .map_err(|e| ExportError::InvalidMarkup(e.to_string()))?;
                    *slot = Some(value.to_string());
                }
                return Ok(attrs);
            }
            Ok(Event::Eof) => {
                return Err(ExportError::InvalidMarkup("no root element".to_string()));
            }
            Ok(_) => {}
            Err(e) => return Err(parse_error(&reader, e)),
        }
    }
}

/// Rewrites the root element's `width` and `height`, leaving every other
/// byte of the document as it was.
pub fn rewrite_root_size(markup: &str, width: f64, height: f64) -> Result<String, ExportError> {
    let width = format_length(width);
    let height = format_length(height);

    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::with_capacity(markup.len() + 32));
    let mut rewritten = false;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) if !rewritten => {
                rewritten = true;
                Event::Start(resized_root(&start, &width, &height)?)
            }
            Ok(Event::Empty(start)) if !rewritten => {
                rewritten = true;
                Event::Empty(resized_root(&start, &width, &height)?)
            }
            Ok(event) => event,
            Err(e) => return Err(parse_error(&reader, e)),
        };
        writer
            .write_event(event)
            .map_err(|e| ExportError::InvalidMarkup(e.to_string()))?;
    }

    if !rewritten {
        return Err(ExportError::InvalidMarkup("no root element".to_string()));
    }

    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::InvalidMarkup(e.to_string()))
}

/// Prepends the XML declaration unless the markup already starts with one.
pub fn with_xml_declaration(markup: String) -> String {
    if markup.trim_start().starts_with("<?xml") {
        markup
    } else {
        format!("{XML_DECLARATION}{markup}")
    }
}

pub fn encode_data_uri(markup: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", BASE64_STANDARD.encode(markup.as_bytes()))
}

/// Decodes a URI produced by [`encode_data_uri`]; any other form is an
/// image load failure.
pub fn decode_data_uri(uri: &str) -> Result<String, ExportError> {
    let payload = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| ExportError::ImageLoad("unsupported data URI".to_string()))?;
    let bytes = BASE64_STANDARD
        .decode(payload)
        .map_err(|e| ExportError::ImageLoad(format!("invalid base64 payload: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ExportError::ImageLoad(format!("payload is not UTF-8: {e}")))
}

/// Formats a length in pixels, dropping a zero fraction.
fn format_length(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{value}px")
    }
}

fn ensure_svg_root(start: &BytesStart<'_>) -> Result<(), ExportError> {
    if start.local_name().as_ref() == b"svg" {
        Ok(())
    } else {
        Err(ExportError::InvalidMarkup(format!(
            "root element is <{}>, expected <svg>",
            String::from_utf8_lossy(start.name().as_ref())
        )))
    }
}

fn resized_root(
    start: &BytesStart<'_>,
    width: &str,
    height: &str,
) -> Result<BytesStart<'static>, ExportError> {
    ensure_svg_root(start)?;

    let kept = start
        .attributes()
        .map(|attr| attr.map(|a| (a.key.as_ref().to_vec(), a.value.into_owned())))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ExportError::InvalidMarkup(e.to_string()))?;

    let mut root = start.clone().into_owned();
    root.clear_attributes();
    for (key, value) in &kept {
        if key.as_slice() == b"width" || key.as_slice() == b"height" {
            continue;
        }
        // Values are still escaped; push them through untouched.
        root.push_attribute(Attribute {
            key: QName(key.as_slice()),
            value: Cow::Borrowed(value.as_slice()),
        });
    }
    root.push_attribute(("width", width));
    root.push_attribute(("height", height));
    Ok(root)
}

fn parse_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> ExportError {
    ExportError::InvalidMarkup(format!(
        "malformed markup at byte {}: {}",
        reader.error_position(),
        err
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100%" viewBox="0 0 400 200" style="max-width: 400px;" height="200"><g><text x="1" y="2">A &amp; B</text></g></svg>"##;

    #[test]
    fn test_root_attributes() {
        let attrs = root_attributes(SAMPLE).unwrap();
        assert_eq!(attrs.view_box.as_deref(), Some("0 0 400 200"));
        assert_eq!(attrs.width.as_deref(), Some("100%"));
        assert_eq!(attrs.height.as_deref(), Some("200"));
    }

    #[test]
    fn test_rewrite_replaces_size_and_keeps_rest() {
        let out = rewrite_root_size(SAMPLE, 3000.0, 1500.0).unwrap();
        assert!(out.contains(r#"width="3000px""#));
        assert!(out.contains(r#"height="1500px""#));
        assert!(!out.contains("100%"));
        assert!(out.contains(r#"viewBox="0 0 400 200""#));
        assert!(out.contains(r#"style="max-width: 400px;""#));
        assert!(out.contains("A &amp; B"));
        assert!(out.ends_with("</svg>"));

        let attrs = root_attributes(&out).unwrap();
        assert_eq!(attrs.width.as_deref(), Some("3000px"));
    }

    #[test]
    fn test_rewrite_adds_missing_size_and_handles_self_closing_root() {
        let out = rewrite_root_size(r#"<svg viewBox="0 0 10 10"/>"#, 3000.0, 1234.5).unwrap();
        assert!(out.contains(r#"width="3000px""#));
        assert!(out.contains(r#"height="1234.5px""#));
    }

    #[test]
    fn test_rewrite_only_touches_root() {
        let markup = r#"<svg width="10" height="10"><rect width="4" height="5"/></svg>"#;
        let out = rewrite_root_size(markup, 3000.0, 3000.0).unwrap();
        assert!(out.contains(r#"<rect width="4" height="5"/>"#));
    }

    #[test]
    fn test_non_svg_root_is_invalid() {
        let err = rewrite_root_size("<html><body/></html>", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::InvalidMarkup(_)));
        assert!(root_attributes("just text").is_err());
    }

    #[test]
    fn test_mismatched_tags_are_invalid() {
        let err = rewrite_root_size("<svg><g></svg>", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::InvalidMarkup(_)));
    }

    #[test]
    fn test_xml_declaration_prepended_once() {
        let with = with_xml_declaration("<svg/>".to_string());
        assert_eq!(with, "<?xml version=\"1.0\" standalone=\"no\"?>\r\n<svg/>");
        assert_eq!(with_xml_declaration(with.clone()), with);
    }

    #[test]
    fn test_data_uri() {
        let uri = encode_data_uri("<svg>é</svg>");
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), "<svg>é</svg>");

        assert!(matches!(
            decode_data_uri("data:image/png;base64,AAAA"),
            Err(ExportError::ImageLoad(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/svg+xml;base64,@@@"),
            Err(ExportError::ImageLoad(_))
        ));
    }
}
