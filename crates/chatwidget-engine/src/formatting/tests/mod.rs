//! End-to-end tests for the formatting pipeline.
//!
//! Node trees are normalised into an indented outline and compared with
//! inline snapshots.


use super::{Rendered, format_reply};

fn outline_of(raw: &str) -> String {
    match format_reply(raw) {
        Rendered::Nodes(nodes) => outline::outline(&nodes),
        Rendered::Raw(text) => format!("Raw {text:?}"),
    }
}

#[test]
fn menu_reply_with_nested_bullets() {
    let raw = "Here is what we offer:\n\
               \n\
               1. **Live Menu Availability**\n\
               - Updated every morning\n\
               \n\
               * Includes vegan options\n\
               2. Catering\n\
               3. Events\n\
               • Up to 200 guests\n\
               \n\
               Let me know if you need anything else!";
    insta::assert_snapshot!(outline_of(raw), @r#"
    Paragraph "Here is what we offer:"
    OrderedList
      Item **"Live Menu Availability"**
        Bullet "Updated every morning"
        Bullet "Includes vegan options"
      Item "Catering"
      Item "Events"
        Bullet "Up to 200 guests"
    Paragraph "Let me know if you need anything else!"
    "#);
}

#[test]
fn loose_bullets_between_paragraphs() {
    let raw = "Opening hours:\n- Mon to Fri\n- Sat\nClosed on Sundays.\n- Holidays vary";
    insta::assert_snapshot!(outline_of(raw), @r#"
    Paragraph "Opening hours:"
    OrderedList
      Item "Mon to Fri"
      Item "Sat"
    Paragraph "Closed on Sundays."
    OrderedList
      Item "Holidays vary"
    "#);
}

#[test]
fn prebuilt_markup_with_headings_and_emphasis() {
    let raw = "<h3>Allergens</h3>\n<p>Please <em>always</em> ask <b>staff</b>.</p>\n<ul><li>Nuts</li><li>Gluten</li></ul>";
    insta::assert_snapshot!(outline_of(raw), @r#"
    Heading(3) "Allergens"
    Paragraph "Please " _"always"_ " ask " **"staff"** "."
    UnorderedList
      Item "Nuts"
      Item "Gluten"
    "#);
}

#[test]
fn stray_angle_brackets_stay_text() {
    insta::assert_snapshot!(outline_of("compare a<b and c\n1. Reply <yes>\n- or <no>"), @r#"
    Paragraph "compare a<b and c"
    OrderedList
      Item "Reply <yes>"
        Bullet "or <no>"
    "#);
}

#[test]
fn multi_line_html_reply() {
    let raw = "<p>Our menu:</p>\n<ul>\n  <li>Pizza</li>\n  <li><b>Pasta</b></li>\n</ul>\n<ol>\n<li>Order</li>\n</ol>";
    insta::assert_snapshot!(outline_of(raw), @r#"
    Paragraph "Our menu:"
    UnorderedList
      Item "Pizza"
      Item **"Pasta"**
    OrderedList
      Item "Order"
    "#);
}

#[test]
fn unbalanced_markup_falls_back_to_raw_text() {
    insta::assert_snapshot!(outline_of("<p>never closed"), @r#"Raw "<p>never closed""#);
}

#[test]
fn blank_reply_is_empty() {
    assert_eq!(outline_of("\n\n   \n"), "");
}
