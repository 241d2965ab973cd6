//! SOAP envelopes for the metadata API and the XML ⇄ JSON mapping.

use crate::error::ClientError;
use crate::Result;
use roxmltree::{Document, Node};
use scratchkit_core::{MetadataItem, MetadataRecord};
use serde_json::{Map, Value};

pub const SOAPENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap `body` in an envelope carrying the session header.
pub fn envelope(session_id: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"{SOAPENV_NS}\" xmlns:xsi=\"{XSI_NS}\" xmlns=\"{METADATA_NS}\">\
         <soapenv:Header><SessionHeader><sessionId>{}</sessionId></SessionHeader></soapenv:Header>\
         <soapenv:Body>{body}</soapenv:Body>\
         </soapenv:Envelope>",
        escape(session_id)
    )
}

pub fn list_metadata_body(metadata_type: &str, api_version: &str) -> String {
    format!(
        "<listMetadata><queries><type>{}</type></queries><asOfVersion>{}</asOfVersion></listMetadata>",
        escape(metadata_type),
        escape(api_version)
    )
}

pub fn read_metadata_body(metadata_type: &str, full_name: &str) -> String {
    format!(
        "<readMetadata><type>{}</type><fullNames>{}</fullNames></readMetadata>",
        escape(metadata_type),
        escape(full_name)
    )
}

pub fn update_metadata_body(record: &MetadataRecord) -> String {
    let mut out = format!(
        "<updateMetadata><metadata xsi:type=\"{}\">",
        escape(&record.type_name)
    );
    write_fields(&mut out, &record.fields);
    out.push_str("</metadata></updateMetadata>");
    out
}

fn write_fields(out: &mut String, fields: &Map<String, Value>) {
    for (name, value) in fields {
        match value {
            Value::Array(items) => items.iter().for_each(|item| write_element(out, name, item)),
            single => write_element(out, name, single),
        }
    }
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => {
            out.push_str(&format!("<{name} xsi:nil=\"true\"/>"));
        }
        Value::Object(fields) => {
            out.push_str(&format!("<{name}>"));
            write_fields(out, fields);
            out.push_str(&format!("</{name}>"));
        }
        Value::Array(items) => items.iter().for_each(|item| write_element(out, name, item)),
        Value::String(s) => out.push_str(&format!("<{name}>{}</{name}>", escape(s))),
        Value::Bool(b) => out.push_str(&format!("<{name}>{b}</{name}>")),
        Value::Number(n) => out.push_str(&format!("<{name}>{n}</{name}>")),
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    elements(node).find(|n| n.tag_name().name() == name)
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).map(|n| n.text().unwrap_or(""))
}

fn is_nil(node: Node<'_, '_>) -> bool {
    node.attribute((XSI_NS, "nil")) == Some("true")
}

/// Map an element's content to JSON.
pub fn element_to_value(node: Node<'_, '_>) -> Value {
    if is_nil(node) {
        return Value::Null;
    }
    if elements(node).next().is_none() {
        return Value::String(node.text().unwrap_or("").to_string());
    }
    Value::Object(children_to_map(node))
}

fn children_to_map(node: Node<'_, '_>) -> Map<String, Value> {
    let mut map = Map::new();
    for el in elements(node) {
        let name = el.tag_name().name().to_string();
        let value = element_to_value(el);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    map
}

/// Body element of the envelope, after checking for a SOAP fault.
fn body<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let body = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Body")
        .ok_or_else(|| ClientError::Unexpected("SOAP response has no Body".to_string()))?;
    if let Some(fault) = child(body, "Fault") {
        return Err(ClientError::Fault {
            code: child_text(fault, "faultcode").unwrap_or("unknown").to_string(),
            message: child_text(fault, "faultstring").unwrap_or("").to_string(),
        });
    }
    Ok(body)
}

/// `<xxxResponse><result>…</result>…</xxxResponse>` result elements.
fn results<'a, 'input>(doc: &'a Document<'input>, response: &str) -> Result<Vec<Node<'a, 'input>>> {
    let body = body(doc)?;
    let response_node = child(body, response)
        .ok_or_else(|| ClientError::Unexpected(format!("missing {response} element")))?;
    Ok(elements(response_node)
        .filter(|n| n.tag_name().name() == "result")
        .collect())
}

/// Raise any SOAP fault in `xml` without interpreting the rest.
pub fn check_fault(xml: &str) -> Result<()> {
    let doc = Document::parse(xml)?;
    body(&doc).map(|_| ())
}

pub fn parse_list_metadata(xml: &str) -> Result<Vec<MetadataItem>> {
    let doc = Document::parse(xml)?;
    let items = results(&doc, "listMetadataResponse")?
        .into_iter()
        .filter_map(|result| {
            let full_name = child_text(result, "fullName")?;
            let type_name = child_text(result, "type")?;
            Some(MetadataItem::new(full_name, type_name))
        })
        .collect();
    Ok(items)
}

/// First record of a `readMetadata` response; `None` for a nil or empty one.
pub fn parse_read_metadata(xml: &str, requested_type: &str) -> Result<Option<MetadataRecord>> {
    let doc = Document::parse(xml)?;
    let Some(result) = results(&doc, "readMetadataResponse")?.into_iter().next() else {
        return Ok(None);
    };
    let Some(records) = child(result, "records") else {
        return Ok(None);
    };
    if is_nil(records) || elements(records).next().is_none() {
        return Ok(None);
    }
    let type_name = records
        .attribute((XSI_NS, "type"))
        .map(|t| t.rsplit(':').next().unwrap_or(t))
        .unwrap_or(requested_type);
    Ok(Some(MetadataRecord::new(type_name, children_to_map(records))))
}

/// Fail unless every `updateMetadata` result reports success.
pub fn parse_save_result(xml: &str) -> Result<()> {
    let doc = Document::parse(xml)?;
    let results = results(&doc, "updateMetadataResponse")?;
    if results.is_empty() {
        return Err(ClientError::Unexpected(
            "updateMetadata returned no result".to_string(),
        ));
    }
    for result in results {
        if child_text(result, "success") == Some("true") {
            continue;
        }
        let full_name = child_text(result, "fullName").unwrap_or("").to_string();
        let message = elements(result)
            .filter(|n| n.tag_name().name() == "errors")
            .map(|e| {
                let code = child_text(e, "statusCode").unwrap_or("");
                let text = child_text(e, "message").unwrap_or("");
                if code.is_empty() {
                    text.to_string()
                } else {
                    format!("{code}: {text}")
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ClientError::Rejected { full_name, message });
    }
    Ok(())
}
