//! The decoder: a serde `Deserializer` over the parsed element tree.
//!
//! Decoding is driven by the target type, not the document. For each struct
//! field the deserializer asks the name resolver for a matching element
//! (falling back to attributes), extracts that location's scalar content or
//! maps its children, and coerces text at the last moment based on the
//! visitor the target supplies. Fields with no match decode to zero values;
//! lists discover their item elements from the item type's name.

use std::borrow::Cow;
use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use tracing::{debug, trace};

use crate::coerce;
use crate::error::{DecodeError, Result};
use crate::resolve;
use crate::tree::{self, Element};
use crate::value::TIMESTAMP_NEWTYPE;

/// Maximum mapping recursion. Separate from the parser's nesting limit
/// because the `Value` self-reference can recurse without consuming input.
const MAX_MAP_DEPTH: usize = 128;

/// Decode a value from an XML string using default options.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CompleteSuggestion {
///     suggestion: String,
///     num_queries: String,
/// }
///
/// let results: Vec<CompleteSuggestion> = lax_xml::from_str(&body)?;
/// ```
pub fn from_str<T>(input: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    Decoder::new().decode(input)
}

/// Decode a value from an XML string with explicit options.
///
/// # Example
///
/// ```ignore
/// let options = DecodeOptions::new().root_element("payload");
/// let value: Target = lax_xml::from_str_with(&body, options)?;
/// ```
pub fn from_str_with<T>(input: &str, options: DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    Decoder::with_options(options).decode(input)
}

/// Decode a value from UTF-8 bytes.
pub fn from_slice<T>(input: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let text = std::str::from_utf8(input)
        .map_err(|e| DecodeError::MalformedXml(format!("invalid UTF-8: {e}")))?;
    from_str(text)
}

/// Options controlling how a document is decoded.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Decode from the first element with this local name instead of the
    /// document root. When no such element exists the decode yields the
    /// target's zero value.
    pub root_element: Option<String>,
    /// Namespace URI that qualified names must carry to match. Without it,
    /// namespace information is stripped before mapping and local names
    /// match alone.
    pub namespace: Option<String>,
    /// `chrono` format string that timestamp text must match exactly.
    /// Without it, a chain of common formats is tried.
    pub date_format: Option<String>,
}

impl DecodeOptions {
    /// Options with no root element, no namespace, and free-form dates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element to decode from.
    pub fn root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = Some(name.into());
        self
    }

    /// Require qualified names to carry this namespace URI.
    pub fn namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace = Some(uri.into());
        self
    }

    /// Require timestamps to match this `chrono` format string.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

/// Convention-based XML decoder.
///
/// A `Decoder` is cheap to construct and holds nothing but its options;
/// every call to [`Decoder::decode`] is independent.
///
/// # Example
///
/// ```ignore
/// let decoder = Decoder::with_options(DecodeOptions::new().namespace("urn:example"));
/// let value: Target = decoder.decode(&body)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// A decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder with the given options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Decoder { options }
    }

    /// Decode `input` into `T`.
    ///
    /// Blank input decodes to the target's zero value, as does a configured
    /// root element that the document does not contain. Malformed documents
    /// and unconvertible values are the only errors.
    pub fn decode<T>(&self, input: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let ctx = Ctx {
            options: &self.options,
            depth: 0,
        };
        if input.trim().is_empty() {
            debug!("input is blank, decoding zero value");
            return T::deserialize(Absent { ctx, node: None });
        }

        let tree = tree::parse(input)?;
        let tree = match self.options.namespace {
            Some(_) => tree,
            None => tree::strip_namespaces(tree),
        };

        match self.effective_root(&tree) {
            Some(root) => {
                trace!(root = %root.name.local, "decoding document");
                T::deserialize(ValueDeserializer::document(ctx, root))
            }
            None => {
                debug!(
                    root_element = self.options.root_element.as_deref().unwrap_or(""),
                    "root element not found, decoding zero value"
                );
                T::deserialize(Absent { ctx, node: None })
            }
        }
    }

    /// The element decoding starts from: the document root, or the first
    /// descendant matching `root_element` in document order.
    fn effective_root<'a>(&self, tree: &'a Element) -> Option<&'a Element> {
        let Some(name) = self.options.root_element.as_deref() else {
            return Some(tree);
        };
        let namespace = self.options.namespace.as_deref();
        tree.descendants().find(|element| {
            element.name.local == name && element.name.namespace.as_deref() == namespace
        })
    }
}

/// Per-decode state threaded through every deserializer.
#[derive(Clone, Copy)]
struct Ctx<'o> {
    options: &'o DecodeOptions,
    depth: usize,
}

impl<'o> Ctx<'o> {
    fn descend(self) -> Result<Ctx<'o>> {
        if self.depth >= MAX_MAP_DEPTH {
            return Err(DecodeError::TooDeep(MAX_MAP_DEPTH));
        }
        Ok(Ctx {
            options: self.options,
            depth: self.depth + 1,
        })
    }

    fn namespace(&self) -> Option<&'o str> {
        self.options.namespace.as_deref()
    }
}

/// Where a resolved value reads from.
#[derive(Clone, Copy)]
enum Source<'de> {
    Element(&'de Element),
    Attribute(&'de str),
}

/// Deserializer for one resolved location in the tree.
struct ValueDeserializer<'de, 'o> {
    ctx: Ctx<'o>,
    source: Source<'de>,
    /// Set at the decode entry point, where a sequence target scans the
    /// whole tree for items instead of a wrapper's children.
    top_level: bool,
}

impl<'de, 'o> ValueDeserializer<'de, 'o> {
    fn element(ctx: Ctx<'o>, element: &'de Element) -> Self {
        ValueDeserializer {
            ctx,
            source: Source::Element(element),
            top_level: false,
        }
    }

    fn attribute(ctx: Ctx<'o>, value: &'de str) -> Self {
        ValueDeserializer {
            ctx,
            source: Source::Attribute(value),
            top_level: false,
        }
    }

    fn document(ctx: Ctx<'o>, root: &'de Element) -> Self {
        ValueDeserializer {
            ctx,
            source: Source::Element(root),
            top_level: true,
        }
    }

    /// The scalar text at this location: element content (text, else first
    /// attribute value), or the attribute value itself.
    fn raw(&self) -> Cow<'de, str> {
        match self.source {
            Source::Element(element) => element.scalar_value().unwrap_or(Cow::Borrowed("")),
            Source::Attribute(value) => Cow::Borrowed(value),
        }
    }
}

impl<'de, 'o> de::Deserializer<'de> for ValueDeserializer<'de, 'o> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.source {
            Source::Element(element) if !element.children.is_empty() => {
                self.deserialize_map(visitor)
            }
            _ => match self.raw() {
                Cow::Borrowed(text) => visitor.visit_borrowed_str(text),
                Cow::Owned(text) => visitor.visit_string(text),
            },
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(coerce::parse_bool(&self.raw())?)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i8(coerce::parse_scalar(&self.raw(), "i8")?)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i16(coerce::parse_scalar(&self.raw(), "i16")?)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i32(coerce::parse_scalar(&self.raw(), "i32")?)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(coerce::parse_scalar(&self.raw(), "i64")?)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u8(coerce::parse_scalar(&self.raw(), "u8")?)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u16(coerce::parse_scalar(&self.raw(), "u16")?)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u32(coerce::parse_scalar(&self.raw(), "u32")?)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(coerce::parse_scalar(&self.raw(), "u64")?)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f32(coerce::parse_scalar(&self.raw(), "f32")?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(coerce::parse_scalar(&self.raw(), "f64")?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_char(coerce::parse_char(&self.raw())?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.raw() {
            Cow::Borrowed(text) => visitor.visit_borrowed_str(text),
            Cow::Owned(text) => visitor.visit_string(text),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "byte arrays cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if name == TIMESTAMP_NEWTYPE {
            let raw = self.raw();
            let parsed =
                coerce::parse_timestamp(&raw, self.ctx.options.date_format.as_deref())?;
            return visitor.visit_string(coerce::render_timestamp(&parsed));
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.source {
            Source::Element(element) if self.top_level => {
                visitor.visit_seq(ListAccess::probe(self.ctx, Scope::Descendants(element)))
            }
            Source::Element(element) => {
                visitor.visit_seq(ListAccess::ready(self.ctx, wrapper_items(element)))
            }
            Source::Attribute(_) => visitor.visit_seq(EmptyAccess),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "tuples cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "tuple structs cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.source {
            Source::Element(element) => {
                let ctx = self.ctx.descend()?;
                visitor.visit_map(ChildrenMap::new(ctx, element))
            }
            Source::Attribute(_) => visitor.visit_map(EmptyAccess),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.source {
            Source::Element(element) => {
                let ctx = self.ctx.descend()?;
                visitor.visit_map(StructAccess::new(ctx, element, fields))
            }
            // A struct cannot be read out of an attribute value; it decodes
            // to its zero value instead.
            Source::Attribute(_) => {
                visitor.visit_map(AbsentFields::new(self.ctx.descend()?, fields))
            }
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let symbol = self.raw().trim().to_string();
        symbol
            .into_deserializer()
            .deserialize_enum(name, variants, visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// The elements a wrapper-style list reads: the container's children that
/// share the first child's name.
fn wrapper_items(container: &Element) -> VecDeque<&Element> {
    match container.children.first() {
        Some(first) => container
            .children
            .iter()
            .filter(|child| child.name == first.name)
            .collect(),
        None => VecDeque::new(),
    }
}

/// MapAccess driven by the target's field list rather than the document.
///
/// Each field is resolved against the mapped element: element match first,
/// then attribute, then absence.
struct StructAccess<'de, 'o> {
    ctx: Ctx<'o>,
    node: &'de Element,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<Resolved<'de>>,
}

enum Resolved<'de> {
    Element(&'de Element),
    Attribute(&'de str),
    Missing,
}

impl<'de, 'o> StructAccess<'de, 'o> {
    fn new(ctx: Ctx<'o>, node: &'de Element, fields: &'static [&'static str]) -> Self {
        StructAccess {
            ctx,
            node,
            fields: fields.iter(),
            pending: None,
        }
    }

    fn resolve(&self, field: &str) -> Resolved<'de> {
        let namespace = self.ctx.namespace();
        if let Some(element) = resolve::find_element(self.node, field, namespace) {
            // A bare self-closing element carries nothing and reads as
            // missing; the attribute fallback is skipped.
            if element.scalar_value().is_none() {
                return Resolved::Missing;
            }
            return Resolved::Element(element);
        }
        if let Some(attr) = resolve::find_attribute(self.node, field, namespace) {
            return Resolved::Attribute(&attr.value);
        }
        Resolved::Missing
    }
}

impl<'de, 'o> MapAccess<'de> for StructAccess<'de, 'o> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some(field) = self.fields.next() else {
            return Ok(None);
        };
        self.pending = Some(self.resolve(field));
        seed.deserialize(BorrowedStrDeserializer::new(field)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(Resolved::Element(element)) => {
                seed.deserialize(ValueDeserializer::element(self.ctx, element))
            }
            Some(Resolved::Attribute(value)) => {
                seed.deserialize(ValueDeserializer::attribute(self.ctx, value))
            }
            Some(Resolved::Missing) => seed.deserialize(Absent {
                ctx: self.ctx,
                node: Some(self.node),
            }),
            None => Err(DecodeError::Message(
                "value requested before key".to_string(),
            )),
        }
    }
}

/// MapAccess over an element's children, keyed by local name. Serves map
/// targets and self-describing decoding.
struct ChildrenMap<'de, 'o> {
    ctx: Ctx<'o>,
    children: std::slice::Iter<'de, Element>,
    current: Option<&'de Element>,
}

impl<'de, 'o> ChildrenMap<'de, 'o> {
    fn new(ctx: Ctx<'o>, node: &'de Element) -> Self {
        ChildrenMap {
            ctx,
            children: node.children.iter(),
            current: None,
        }
    }
}

impl<'de, 'o> MapAccess<'de> for ChildrenMap<'de, 'o> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.children.next() {
            Some(child) => {
                self.current = Some(child);
                seed.deserialize(BorrowedStrDeserializer::new(&child.name.local))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some(child) => seed.deserialize(ValueDeserializer::element(self.ctx, child)),
            None => Err(DecodeError::Message(
                "value requested before key".to_string(),
            )),
        }
    }
}

/// Where list item discovery looks for elements.
#[derive(Clone, Copy)]
enum Scope<'de> {
    /// Items sit directly under this node; the exemplar is found by the
    /// full resolution chain and its same-named siblings form the list.
    Inline(&'de Element),
    /// Items may sit anywhere under this node; matched by exact name.
    Descendants(&'de Element),
}

/// SeqAccess for lists.
///
/// A wrapper list starts `Ready` with its items known. Discovered lists
/// start in `Probe` state: the first item's type reveals the element name,
/// and the probe locates every match before any item is decoded.
struct ListAccess<'de, 'o> {
    ctx: Ctx<'o>,
    items: Items<'de>,
}

enum Items<'de> {
    Probe(Scope<'de>),
    Ready(VecDeque<&'de Element>),
}

impl<'de, 'o> ListAccess<'de, 'o> {
    fn probe(ctx: Ctx<'o>, scope: Scope<'de>) -> Self {
        ListAccess {
            ctx,
            items: Items::Probe(scope),
        }
    }

    fn ready(ctx: Ctx<'o>, items: VecDeque<&'de Element>) -> Self {
        ListAccess {
            ctx,
            items: Items::Ready(items),
        }
    }
}

impl<'de, 'o> SeqAccess<'de> for ListAccess<'de, 'o> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match std::mem::replace(&mut self.items, Items::Ready(VecDeque::new())) {
            Items::Probe(scope) => {
                let mut rest = VecDeque::new();
                match seed.deserialize(Probe {
                    ctx: self.ctx,
                    scope,
                    rest: &mut rest,
                }) {
                    Ok(value) => {
                        self.items = Items::Ready(rest);
                        Ok(Some(value))
                    }
                    Err(DecodeError::NoMatchingItems) => Ok(None),
                    Err(other) => Err(other),
                }
            }
            Items::Ready(mut items) => match items.pop_front() {
                Some(element) => {
                    self.items = Items::Ready(items);
                    seed.deserialize(ValueDeserializer::element(self.ctx, element))
                        .map(Some)
                }
                None => Ok(None),
            },
        }
    }
}

/// Deserializer handed to the first item of a discovered list.
///
/// It learns the item element name from the target type, locates every
/// matching element, replays the first, and leaves the rest for the
/// sequence. When the target names no element (scalars) or nothing matches,
/// it raises the internal end-of-sequence signal before touching any data.
struct Probe<'de, 'o, 'r> {
    ctx: Ctx<'o>,
    scope: Scope<'de>,
    rest: &'r mut VecDeque<&'de Element>,
}

impl<'de, 'o, 'r> Probe<'de, 'o, 'r> {
    fn discover(&mut self, name: &str) -> Result<&'de Element> {
        let namespace = self.ctx.namespace();
        let mut found: VecDeque<&'de Element> = match self.scope {
            Scope::Inline(node) => match resolve::find_element(node, name, namespace) {
                Some(exemplar) => node
                    .children
                    .iter()
                    .filter(|child| child.name == exemplar.name)
                    .collect(),
                None => VecDeque::new(),
            },
            Scope::Descendants(node) => node
                .descendants()
                .filter(|element| {
                    element.name.local == name && element.name.namespace.as_deref() == namespace
                })
                .collect(),
        };
        match found.pop_front() {
            Some(first) => {
                trace!(item = name, count = found.len() + 1, "discovered list items");
                *self.rest = found;
                Ok(first)
            }
            None => Err(DecodeError::NoMatchingItems),
        }
    }
}

impl<'de, 'o, 'r> de::Deserializer<'de> for Probe<'de, 'o, 'r> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::NoMatchingItems)
    }

    fn deserialize_struct<V>(
        mut self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let first = self.discover(name)?;
        ValueDeserializer::element(self.ctx, first).deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V>(
        mut self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let first = self.discover(name)?;
        ValueDeserializer::element(self.ctx, first).deserialize_enum(name, variants, visitor)
    }

    fn deserialize_newtype_struct<V>(mut self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let first = self.discover(name)?;
        ValueDeserializer::element(self.ctx, first).deserialize_newtype_struct(name, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple tuple_struct map
        identifier ignored_any
    }
}

/// Deserializer for values with no backing data. Produces zero values.
#[derive(Clone, Copy)]
struct Absent<'de, 'o> {
    ctx: Ctx<'o>,
    /// The element whose mapping produced this absence, when there is one.
    /// Inline list discovery still runs against it.
    node: Option<&'de Element>,
}

impl<'de, 'o> de::Deserializer<'de> for Absent<'de, 'o> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(0.0)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(false)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i8(0)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i16(0)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i32(0)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(0)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u8(0)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u16(0)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u32(0)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(0)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f32(0.0)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(0.0)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_char('\0')
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str("")
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str("")
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "byte arrays cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_none()
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if name == TIMESTAMP_NEWTYPE {
            return visitor.visit_string(coerce::render_timestamp(&NaiveDateTime::default()));
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Some(node) => visitor.visit_seq(ListAccess::probe(self.ctx, Scope::Inline(node))),
            None => visitor.visit_seq(EmptyAccess),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "tuples cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "tuple structs cannot be decoded from XML".to_string(),
        ))
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(EmptyAccess)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(AbsentFields::new(self.ctx.descend()?, fields))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        // The zero value of an enum is its first declared variant.
        match variants.first() {
            Some(first) => visitor.visit_enum(AbsentEnum {
                ctx: self.ctx,
                variant: first,
            }),
            None => Err(DecodeError::Message(format!(
                "enum {name} has no variants"
            ))),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str("")
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// MapAccess that feeds every field of a struct from [`Absent`].
struct AbsentFields<'o> {
    ctx: Ctx<'o>,
    fields: std::slice::Iter<'static, &'static str>,
}

impl<'o> AbsentFields<'o> {
    fn new(ctx: Ctx<'o>, fields: &'static [&'static str]) -> Self {
        AbsentFields {
            ctx,
            fields: fields.iter(),
        }
    }
}

impl<'de, 'o> MapAccess<'de> for AbsentFields<'o> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(field) => seed
                .deserialize(BorrowedStrDeserializer::new(field))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        seed.deserialize(Absent {
            ctx: self.ctx,
            node: None,
        })
    }
}

/// EnumAccess that selects a fixed variant and zero-fills its contents.
struct AbsentEnum<'o> {
    ctx: Ctx<'o>,
    variant: &'static str,
}

impl<'de, 'o> EnumAccess<'de> for AbsentEnum<'o> {
    type Error = DecodeError;
    type Variant = AbsentVariant<'o>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let value = seed.deserialize(BorrowedStrDeserializer::new(self.variant))?;
        Ok((value, AbsentVariant { ctx: self.ctx }))
    }
}

struct AbsentVariant<'o> {
    ctx: Ctx<'o>,
}

impl<'de, 'o> VariantAccess<'de> for AbsentVariant<'o> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(Absent {
            ctx: self.ctx.descend()?,
            node: None,
        })
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(DecodeError::Message(
            "tuples cannot be decoded from XML".to_string(),
        ))
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(AbsentFields::new(self.ctx.descend()?, fields))
    }
}

/// Access that yields nothing.
struct EmptyAccess;

impl<'de> SeqAccess<'de> for EmptyAccess {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, _seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        Ok(None)
    }
}

impl<'de> MapAccess<'de> for EmptyAccess {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, _seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, _seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        Err(DecodeError::Message("no value available".to_string()))
    }
}
