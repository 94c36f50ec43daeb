//! End-to-end decoding tests: name resolution conventions, scalar coercions,
//! missing-data semantics, and the three list shapes (wrapper, inline,
//! top-level discovery).

use std::collections::HashMap;

use lax_xml::{DecodeError, Result, Timestamp, Uid, Uri, from_slice, from_str};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, PartialEq, Deserialize)]
struct CompleteSuggestion {
    suggestion: String,
    num_queries: String,
}

// =============================================================================
// Name resolution
// =============================================================================

#[derive(Debug, Deserialize)]
struct Account {
    #[serde(rename = "UserName")]
    user_name: String,
}

#[test]
fn test_exact_name_match() -> Result<()> {
    let account: Account = from_str("<r><UserName>ada</UserName></r>")?;
    assert_eq!(account.user_name, "ada");
    Ok(())
}

#[test]
fn test_case_fallbacks_resolve_to_the_same_value() -> Result<()> {
    // Exact, lowercased, and camelCased element names must all land on the
    // same field.
    for xml in [
        "<r><UserName>ada</UserName></r>",
        "<r><username>ada</username></r>",
        "<r><userName>ada</userName></r>",
    ] {
        let account: Account = from_str(xml)?;
        assert_eq!(account.user_name, "ada");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct QueryStats {
    num_queries: String,
}

#[derive(Debug, Deserialize)]
struct QueryStatsCamel {
    #[serde(rename = "numQueries")]
    num_queries: String,
}

#[test]
fn test_separator_fallbacks_resolve_both_directions() -> Result<()> {
    // snake_case field finding camelCase elements...
    let stats: QueryStats = from_str("<r><numQueries>12</numQueries></r>")?;
    assert_eq!(stats.num_queries, "12");

    // ...and camelCase field finding snake_case and dash-case elements.
    let stats: QueryStatsCamel = from_str("<r><num_queries>34</num_queries></r>")?;
    assert_eq!(stats.num_queries, "34");
    let stats: QueryStatsCamel = from_str("<r><num-queries>56</num-queries></r>")?;
    assert_eq!(stats.num_queries, "56");
    Ok(())
}

#[test]
fn test_fallback_scan_prefers_the_shallowest_match() -> Result<()> {
    let stats: QueryStats =
        from_str("<r><deep><numQueries>1</numQueries></deep><numQueries>2</numQueries></r>")?;
    assert_eq!(stats.num_queries, "2");
    Ok(())
}

#[test]
fn test_attribute_fallback() -> Result<()> {
    let stats: QueryStats = from_str(r#"<r numQueries="77"/>"#)?;
    assert_eq!(stats.num_queries, "77");
    Ok(())
}

#[test]
fn test_element_wins_over_attribute() -> Result<()> {
    let stats: QueryStats = from_str(r#"<r num_queries="attr"><numQueries>elem</numQueries></r>"#)?;
    assert_eq!(stats.num_queries, "elem");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SelfReferencing {
    value: String,
    lang: String,
}

#[test]
fn test_value_field_reads_the_element_itself() -> Result<()> {
    let item: SelfReferencing = from_str(r#"<item lang="en">payload</item>"#)?;
    assert_eq!(item.value, "payload");
    assert_eq!(item.lang, "en");
    Ok(())
}

// =============================================================================
// Missing data and zero values
// =============================================================================

#[derive(Debug, PartialEq, Deserialize)]
enum Status {
    Unknown,
    Active,
}

#[derive(Debug, Deserialize)]
struct Everything {
    text: String,
    count: i32,
    ratio: f64,
    flag: bool,
    maybe: Option<String>,
    items: Vec<Entry>,
    nested: Inner,
    status: Status,
    when: Timestamp,
    id: Uid,
    link: Uri,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct Inner {
    name: String,
}

#[derive(Debug, PartialEq, Deserialize)]
struct Entry {
    id: String,
}

#[test]
fn test_missing_fields_keep_zero_values() -> Result<()> {
    let all: Everything = from_str("<r><unrelated>x</unrelated></r>")?;
    assert_eq!(all.text, "");
    assert_eq!(all.count, 0);
    assert_eq!(all.ratio, 0.0);
    assert!(!all.flag);
    assert_eq!(all.maybe, None);
    assert!(all.items.is_empty());
    assert_eq!(all.nested.name, "");
    assert_eq!(all.status, Status::Unknown);
    assert_eq!(all.when.to_string(), "1970-01-01T00:00:00");
    assert!(all.id.0.is_nil());
    assert_eq!(all.link.to_string(), "/");
    assert_eq!(all.price, Decimal::ZERO);
    Ok(())
}

#[test]
fn test_empty_input_decodes_to_the_zero_value() -> Result<()> {
    let all: Everything = from_str("")?;
    assert_eq!(all.text, "");
    assert_eq!(all.count, 0);
    assert!(all.items.is_empty());
    assert_eq!(all.status, Status::Unknown);

    let all: Everything = from_str("  \n\t ")?;
    assert_eq!(all.maybe, None);

    let list: Vec<Entry> = from_str("")?;
    assert!(list.is_empty());
    Ok(())
}

#[derive(Debug, Deserialize)]
struct MaybeNamed {
    name: Option<String>,
}

#[test]
fn test_self_closing_element_is_missing_but_empty_element_is_not() -> Result<()> {
    // <name/> carries nothing and reads as absent...
    let item: MaybeNamed = from_str("<r><name/></r>")?;
    assert_eq!(item.name, None);

    // ...while <name></name> is an empty string that was really there.
    let item: MaybeNamed = from_str("<r><name></name></r>")?;
    assert_eq!(item.name, Some(String::new()));
    Ok(())
}

#[test]
fn test_present_option_is_some() -> Result<()> {
    let item: MaybeNamed = from_str("<r><name>ivy</name></r>")?;
    assert_eq!(item.name, Some("ivy".to_string()));
    Ok(())
}

// =============================================================================
// Scalar coercion
// =============================================================================

#[derive(Debug, Deserialize)]
struct Numbers {
    count: i32,
    ratio: f64,
}

#[test]
fn test_numeric_coercion_trims_whitespace() -> Result<()> {
    let numbers: Numbers = from_str("<r><count> 42 </count><ratio>2.5</ratio></r>")?;
    assert_eq!(numbers.count, 42);
    assert_eq!(numbers.ratio, 2.5);
    Ok(())
}

#[test]
fn test_non_numeric_text_is_a_coercion_error() {
    let err = from_str::<Numbers>("<r><count>plenty</count></r>").unwrap_err();
    assert!(matches!(err, DecodeError::Coercion { .. }));
    assert!(err.to_string().contains("plenty"));
}

#[derive(Debug, Deserialize)]
struct Flag {
    enabled: bool,
}

#[test]
fn test_bool_coercion_is_case_insensitive() -> Result<()> {
    let flag: Flag = from_str("<r><enabled>True</enabled></r>")?;
    assert!(flag.enabled);
    let flag: Flag = from_str("<r><enabled>FALSE</enabled></r>")?;
    assert!(!flag.enabled);

    let err = from_str::<Flag>("<r><enabled>1</enabled></r>").unwrap_err();
    assert!(matches!(err, DecodeError::Coercion { .. }));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Tagged {
    status: Status,
}

#[test]
fn test_enum_symbol_must_match_exactly() -> Result<()> {
    let tagged: Tagged = from_str("<r><status>Active</status></r>")?;
    assert_eq!(tagged.status, Status::Active);

    // Any other casing is a coercion failure, not a fuzzy match.
    let err = from_str::<Tagged>("<r><status>active</status></r>").unwrap_err();
    assert!(matches!(err, DecodeError::Coercion { .. }));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Priced {
    price: Decimal,
}

#[test]
fn test_decimal_coercion_is_exact() -> Result<()> {
    let priced: Priced = from_str("<r><price>19.99</price></r>")?;
    assert_eq!(priced.price, dec!(19.99));

    assert!(from_str::<Priced>("<r><price>cheap</price></r>").is_err());
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Dated {
    when: Timestamp,
}

#[test]
fn test_timestamp_free_form_parsing() -> Result<()> {
    let dated: Dated = from_str("<r><when>2012-03-04T05:06:07Z</when></r>")?;
    assert_eq!(dated.when.to_string(), "2012-03-04T05:06:07");

    let dated: Dated = from_str("<r><when>Wed, 18 Feb 2015 23:16:09 GMT</when></r>")?;
    assert_eq!(dated.when.to_string(), "2015-02-18T23:16:09");

    let err = from_str::<Dated>("<r><when>yesterday</when></r>").unwrap_err();
    assert!(matches!(err, DecodeError::Coercion { .. }));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Identified {
    id: Uid,
}

#[test]
fn test_uid_blank_is_nil_and_garbage_fails() -> Result<()> {
    let identified: Identified = from_str("<r><id></id></r>")?;
    assert!(identified.id.0.is_nil());

    let identified: Identified =
        from_str("<r><id>f3faf0a6-fba2-4b1e-8bd3-54a7c5a286b7</id></r>")?;
    assert_eq!(identified.id.to_string(), "f3faf0a6-fba2-4b1e-8bd3-54a7c5a286b7");

    let err = from_str::<Identified>("<r><id>not-an-id</id></r>").unwrap_err();
    assert!(matches!(err, DecodeError::Coercion { .. }));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Linked {
    link: Uri,
}

#[test]
fn test_uri_accepts_relative_and_absolute() -> Result<()> {
    let linked: Linked = from_str("<r><link>/complete/search</link></r>")?;
    assert_eq!(linked.link.to_string(), "/complete/search");

    let linked: Linked = from_str("<r><link>http://example.com/a?b=c</link></r>")?;
    assert_eq!(linked.link.to_string(), "http://example.com/a?b=c");
    Ok(())
}

#[test]
fn test_scalar_root_target() -> Result<()> {
    let text: String = from_str("<greeting>hello</greeting>")?;
    assert_eq!(text, "hello");

    let number: i32 = from_str("<n>42</n>")?;
    assert_eq!(number, 42);
    Ok(())
}

// =============================================================================
// Nested objects and maps
// =============================================================================

#[derive(Debug, Deserialize)]
struct Order {
    number: u32,
    customer: Customer,
}

#[derive(Debug, Deserialize)]
struct Customer {
    name: String,
    city: String,
}

#[test]
fn test_nested_struct_maps_its_own_element() -> Result<()> {
    let order: Order = from_str(
        "<order>
           <number>7</number>
           <customer><name>Ada</name><city>London</city></customer>
         </order>",
    )?;
    assert_eq!(order.number, 7);
    assert_eq!(order.customer.name, "Ada");
    assert_eq!(order.customer.city, "London");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct WithMeta {
    meta: HashMap<String, String>,
}

#[test]
fn test_string_map_from_child_elements() -> Result<()> {
    let tagged: WithMeta = from_str("<r><meta><a>1</a><b>2</b></meta></r>")?;
    assert_eq!(tagged.meta.len(), 2);
    assert_eq!(tagged.meta["a"], "1");
    assert_eq!(tagged.meta["b"], "2");
    Ok(())
}

// =============================================================================
// Lists
// =============================================================================

#[derive(Debug, Deserialize)]
struct Library {
    books: Vec<Book>,
}

#[derive(Debug, PartialEq, Deserialize)]
struct Book {
    title: String,
}

#[test]
fn test_wrapper_list_takes_children_sharing_the_first_name() -> Result<()> {
    let library: Library = from_str(
        "<library>
           <books>
             <book><title>one</title></book>
             <book><title>two</title></book>
             <afterword>ignored</afterword>
           </books>
         </library>",
    )?;
    let titles: Vec<&str> = library.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
    Ok(())
}

#[test]
fn test_empty_wrapper_is_an_empty_list() -> Result<()> {
    let library: Library = from_str("<library><books></books></library>")?;
    assert!(library.books.is_empty());
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Shelf {
    books: Vec<Book>,
}

#[test]
fn test_inline_list_recovery_without_a_wrapper() -> Result<()> {
    // No <books> element anywhere: the items are found by the item type's
    // name among the node's own children.
    let shelf: Shelf = from_str(
        "<shelf>
           <Book><title>one</title></Book>
           <Book><title>two</title></Book>
         </shelf>",
    )?;
    let titles: Vec<&str> = shelf.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
    Ok(())
}

#[test]
fn test_top_level_list_discovers_items_anywhere() -> Result<()> {
    let books: Vec<Book> = from_str(
        "<catalog>
           <section>
             <Book><title>one</title></Book>
           </section>
           <Book><title>two</title></Book>
         </catalog>",
    )?;
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
    Ok(())
}

#[test]
fn test_sibling_list_preserves_document_order() -> Result<()> {
    let entries: Vec<Entry> = from_str(
        "<r><Entry><id>1</id></Entry><Entry><id>2</id></Entry><Entry><id>3</id></Entry></r>",
    )?;
    assert_eq!(
        entries,
        [
            Entry { id: "1".into() },
            Entry { id: "2".into() },
            Entry { id: "3".into() }
        ]
    );
    Ok(())
}

#[derive(Debug, Deserialize)]
struct Feed {
    title: String,
    entries: Vec<Entry>,
}

#[test]
fn test_list_plus_metadata_fields() -> Result<()> {
    let feed: Feed = from_str(
        "<feed>
           <title>updates</title>
           <entries>
             <entry><id>1</id></entry>
             <entry><id>2</id></entry>
           </entries>
         </feed>",
    )?;
    assert_eq!(feed.title, "updates");
    assert_eq!(feed.entries.len(), 2);
    Ok(())
}

#[test]
fn test_scalar_list_items_from_a_wrapper() -> Result<()> {
    #[derive(Debug, Deserialize)]
    struct Names {
        names: Vec<String>,
    }

    let names: Names = from_str("<r><names><n>a</n><n>b</n></names></r>")?;
    assert_eq!(names.names, ["a", "b"]);
    Ok(())
}

// =============================================================================
// Namespaces
// =============================================================================

#[test]
fn test_namespaced_documents_match_unqualified_by_default() -> Result<()> {
    let stats: QueryStats = from_str(
        r#"<g:r xmlns:g="urn:g"><g:num_queries>9</g:num_queries></g:r>"#,
    )?;
    assert_eq!(stats.num_queries, "9");

    let stats: QueryStats =
        from_str(r#"<r xmlns="urn:default"><num_queries>8</num_queries></r>"#)?;
    assert_eq!(stats.num_queries, "8");
    Ok(())
}

// =============================================================================
// The suggestion scenario
// =============================================================================

#[test]
fn test_complete_suggestion_scenario() -> Result<()> {
    let xml = "<toplevel>\
               <CompleteSuggestion>\
               <suggestion>microsoft</suggestion>\
               <num_queries>12345</num_queries>\
               </CompleteSuggestion>\
               </toplevel>";
    let suggestions: Vec<CompleteSuggestion> = from_str(xml)?;
    assert_eq!(
        suggestions,
        [CompleteSuggestion {
            suggestion: "microsoft".to_string(),
            num_queries: "12345".to_string(),
        }]
    );
    Ok(())
}

#[test]
fn test_complete_suggestion_attribute_form() -> Result<()> {
    // The live toolbar format carries values in attributes; the first
    // attribute of an otherwise empty element is its value.
    let xml = r#"<toplevel>
        <CompleteSuggestion>
          <suggestion data="microsoft"/>
          <num_queries int="12345"/>
        </CompleteSuggestion>
        <CompleteSuggestion>
          <suggestion data="microsoft office"/>
          <num_queries int="678"/>
        </CompleteSuggestion>
      </toplevel>"#;
    let suggestions: Vec<CompleteSuggestion> = from_str(xml)?;
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].suggestion, "microsoft");
    assert_eq!(suggestions[0].num_queries, "12345");
    assert_eq!(suggestions[1].suggestion, "microsoft office");
    Ok(())
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn test_malformed_documents_are_rejected() {
    for xml in [
        "not xml at all",
        "<a><b>",
        "<a/>trailing",
        "<a/><b/>",
        "<!DOCTYPE a><a/>",
        "<a>&undefined;</a>",
    ] {
        let err = from_str::<QueryStats>(xml).unwrap_err();
        assert!(
            matches!(err, DecodeError::MalformedXml(_)),
            "{xml:?} should be malformed, got {err}"
        );
    }
}

#[test]
fn test_from_slice_checks_utf8() {
    let err = from_slice::<QueryStats>(&[0xff, 0xfe, 0x3c]).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedXml(_)));

    let stats: QueryStats = from_slice(b"<r><num_queries>5</num_queries></r>").unwrap();
    assert_eq!(stats.num_queries, "5");
}

#[derive(Debug, Deserialize)]
struct Selfie {
    value: Option<Box<Selfie>>,
}

#[test]
fn test_self_referential_shape_fails_fast() {
    // The `value` self-reference maps the same element over and over; the
    // depth guard stops it instead of overflowing the stack.
    let err = from_str::<Selfie>("<r>x</r>").unwrap_err();
    assert!(matches!(err, DecodeError::TooDeep(_)));
}
