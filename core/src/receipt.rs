//! Card details scraped from a Square payment receipt page.
//!
//! Missing elements give empty text and a missing `AID: ...` marker gives no
//! AID. Extraction never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::types::ReceiptInfo;

static APPLICATION_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".chip-application-id").expect("static selector"));

static NAME_ON_CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".name_on_card").expect("static selector"));

static AID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"AID: ([A-Z][0-9]+)").expect("static regex"));

/// Extract the AID and cardholder name from receipt HTML.
///
/// Text of every matching element is concatenated in document order. The
/// name is returned verbatim, whitespace included.
pub fn extract(html: &str) -> ReceiptInfo {
    let document = Html::parse_document(html);

    let chip_text = select_text(&document, &APPLICATION_ID);
    let aid = AID_PATTERN
        .captures(&chip_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    ReceiptInfo {
        aid,
        name_on_card: select_text(&document, &NAME_ON_CARD),
    }
}

fn select_text(document: &Html, selector: &Selector) -> String {
    document.select(selector).flat_map(|element| element.text()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_aid_and_name() {
        let info = extract(
            r#"<div class="chip-application-id">AID: A1234567</div><span class="name_on_card">J. Doe</span>"#,
        );
        assert_eq!(info.aid.as_deref(), Some("A1234567"));
        assert_eq!(info.name_on_card, "J. Doe");
    }

    #[test]
    fn missing_aid_element_gives_no_aid() {
        let info = extract(r#"<span class="name_on_card">J. Doe</span>"#);
        assert_eq!(info.aid, None);
        assert_eq!(info.name_on_card, "J. Doe");
    }

    #[test]
    fn aid_text_without_marker_gives_no_aid() {
        let info = extract(r#"<div class="chip-application-id">Contactless</div>"#);
        assert_eq!(info.aid, None);
        assert_eq!(info.name_on_card, "");
    }

    #[test]
    fn aid_requires_letter_then_digits() {
        let info = extract(r#"<div class="chip-application-id">AID: 1234567</div>"#);
        assert_eq!(info.aid, None);
    }

    #[test]
    fn aid_found_inside_nested_markup() {
        let html = r#"
            <html><body>
              <div class="receipt">
                <p class="chip-application-id"><b>Visa Credit</b> AID: A0000000031010 PIN Verified</p>
                <p class="name_on_card">  JANE DOE </p>
              </div>
            </body></html>
        "#;
        let info = extract(html);
        assert_eq!(info.aid.as_deref(), Some("A0000000031010"));
        assert_eq!(info.name_on_card, "  JANE DOE ");
    }

    #[test]
    fn multiple_matches_are_concatenated() {
        let info = extract(r#"<i class="name_on_card">JANE</i><i class="name_on_card"> DOE</i>"#);
        assert_eq!(info.name_on_card, "JANE DOE");
    }

    #[test]
    fn garbage_input_is_tolerated() {
        let info = extract("<<<not html at all");
        assert_eq!(info, ReceiptInfo::default());
    }
}
