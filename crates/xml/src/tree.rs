//! Owned document tree built ahead of decoding.
//!
//! The decoder never walks raw parser events. [`parse`] reads the whole input
//! once, resolves namespace prefixes, unescapes character data, and produces
//! an [`Element`] tree that the name resolution and mapping layers can scan
//! repeatedly without re-parsing.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{LocalName, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{DecodeError, Result};

/// Maximum element nesting the parser will follow.
pub(crate) const MAX_PARSE_DEPTH: usize = 512;

/// A resolved element or attribute name.
///
/// Prefixes are resolved while parsing; `namespace` holds the namespace URI,
/// or `None` for names bound to no namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

/// An attribute with its resolved name and unescaped value.
///
/// `xmlns` declarations are consumed during prefix resolution and never
/// appear here. Attribute order follows the document.
#[derive(Debug, Clone)]
pub(crate) struct Attribute {
    pub name: QName,
    pub value: String,
}

/// An element node.
///
/// Character data of the element itself accumulates into `text`; the
/// interleaving of text with child elements is not preserved.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
    pub text: String,
    pub self_closing: bool,
}

impl Element {
    fn new(name: QName, attributes: Vec<Attribute>, self_closing: bool) -> Self {
        Element {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
            self_closing,
        }
    }

    /// Concatenated character data of this element and all its descendants.
    pub fn value(&self) -> Cow<'_, str> {
        if self.children.is_empty() {
            return Cow::Borrowed(&self.text);
        }
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.value());
        }
        Cow::Owned(out)
    }

    /// The scalar content of this element, if it carries any.
    ///
    /// A bare self-closing element (`<a/>`) has no content and reads as
    /// missing. Otherwise the element's text wins, then the value of its
    /// first attribute, then the empty string.
    pub fn scalar_value(&self) -> Option<Cow<'_, str>> {
        if self.self_closing && self.attributes.is_empty() {
            return None;
        }
        let text = self.value();
        if !text.is_empty() {
            return Some(text);
        }
        Some(Cow::Borrowed(
            self.attributes
                .first()
                .map(|attr| attr.value.as_str())
                .unwrap_or(""),
        ))
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Parse `input` into an element tree.
///
/// Comments, processing instructions, and the XML declaration are discarded.
/// Whitespace-only character data between elements is dropped; any other
/// text is kept verbatim. Structural problems, DOCTYPE declarations,
/// unresolvable prefixes, and undefined entities all surface as
/// [`DecodeError::MalformedXml`].
pub(crate) fn parse(input: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| DecodeError::MalformedXml(e.to_string()))?;
        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(DecodeError::MalformedXml(
                        "multiple root elements".to_string(),
                    ));
                }
                if stack.len() >= MAX_PARSE_DEPTH {
                    return Err(DecodeError::MalformedXml(format!(
                        "nesting exceeds {MAX_PARSE_DEPTH} levels"
                    )));
                }
                let name = resolve_name(resolved, start.local_name())?;
                let attributes = collect_attributes(&reader, &start)?;
                stack.push(Element::new(name, attributes, false));
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(DecodeError::MalformedXml(
                        "multiple root elements".to_string(),
                    ));
                }
                let name = resolve_name(resolved, start.local_name())?;
                let attributes = collect_attributes(&reader, &start)?;
                attach(Element::new(name, attributes, true), &mut stack, &mut root);
            }
            Event::End(_) => match stack.pop() {
                Some(done) => attach(done, &mut stack, &mut root),
                None => {
                    return Err(DecodeError::MalformedXml(
                        "unexpected closing tag".to_string(),
                    ));
                }
            },
            Event::Text(text) => {
                let content = text
                    .decode()
                    .map_err(|e| DecodeError::MalformedXml(e.to_string()))?;
                if content.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&content),
                    None => {
                        return Err(DecodeError::MalformedXml(
                            "text outside of the root element".to_string(),
                        ));
                    }
                }
            }
            Event::CData(data) => {
                let content = String::from_utf8_lossy(&data).into_owned();
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&content),
                    None => {
                        return Err(DecodeError::MalformedXml(
                            "text outside of the root element".to_string(),
                        ));
                    }
                }
            }
            Event::GeneralRef(reference) => {
                let raw = reference
                    .decode()
                    .map_err(|e| DecodeError::MalformedXml(e.to_string()))?;
                let ch = resolve_entity(&raw)?;
                match stack.last_mut() {
                    Some(open) => open.text.push(ch),
                    None => {
                        return Err(DecodeError::MalformedXml(
                            "text outside of the root element".to_string(),
                        ));
                    }
                }
            }
            Event::DocType(_) => {
                return Err(DecodeError::MalformedXml(
                    "document type declarations are not supported".to_string(),
                ));
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::MalformedXml(
            "unexpected end of input".to_string(),
        ));
    }
    root.ok_or_else(|| DecodeError::MalformedXml("no root element".to_string()))
}

/// Produce a copy of the tree with every name reduced to its local part.
pub(crate) fn strip_namespaces(element: Element) -> Element {
    Element {
        name: QName {
            namespace: None,
            local: element.name.local,
        },
        attributes: element
            .attributes
            .into_iter()
            .map(|attr| Attribute {
                name: QName {
                    namespace: None,
                    local: attr.name.local,
                },
                value: attr.value,
            })
            .collect(),
        children: element.children.into_iter().map(strip_namespaces).collect(),
        text: element.text,
        self_closing: element.self_closing,
    }
}

fn attach(element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn resolve_name(resolved: ResolveResult<'_>, local: LocalName<'_>) -> Result<QName> {
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(DecodeError::MalformedXml(format!(
                "unknown namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    Ok(QName {
        namespace,
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
    })
}

fn collect_attributes(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DecodeError::MalformedXml(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let name = resolve_name(resolved, local)?;
        let value = attr
            .unescape_value()
            .map_err(|e| DecodeError::MalformedXml(e.to_string()))?
            .into_owned();
        attributes.push(Attribute { name, value });
    }
    Ok(attributes)
}

/// Resolve a general entity reference (the content between `&` and `;`).
///
/// The five predefined entities and numeric character references are
/// supported; anything else would require a DTD, which the parser refuses.
fn resolve_entity(raw: &str) -> Result<char> {
    match raw {
        "amp" => return Ok('&'),
        "lt" => return Ok('<'),
        "gt" => return Ok('>'),
        "quot" => return Ok('"'),
        "apos" => return Ok('\''),
        _ => {}
    }
    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            rest.parse::<u32>().ok()
        };
        return code.and_then(char::from_u32).ok_or_else(|| {
            DecodeError::MalformedXml(format!("invalid character reference &#{rest};"))
        });
    }
    Err(DecodeError::MalformedXml(format!(
        "undefined entity &{raw};"
    )))
}
