//! Event listing fragment: `<div class="event-in">` blocks between the
//! event markers.
//!
//! Block contract (whitespace between tags is free):
//!
//! ```text
//! <div class="event-in">
//!     <h3>TITLE (lines separated by <br>)</h3>
//!     <div class="event-in-flex">
//!         <div>
//!             <p>日時：DATE</p>
//!             <p>TIME (…開演…開場…)</p>
//!             <p>ＷＥＢ販売：WEB SALE DATE</p>
//!             <p>窓口発売日：COUNTER SALE DATE</p>
//!         </div>
//!         <div class="event_btns">
//!             … <a href="TICKET">チケットを買う …
//!             … <a href="DETAIL">詳しく見る …
//!         </div>
//!     </div>
//! </div>
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ids::generate_id;
use super::layout::{indent, Markup, BASE_INDENT};
use super::splice::replace_between_markers;
use super::text::{text_before_closing, unwrap_lines};
use crate::constants::{
    COUNTER_SALE_LABEL, DATE_LABEL, DETAIL_BUTTON_TEXT, EVENTS_END_MARKER, EVENTS_START_MARKER,
    NEW_EVENT_TITLE, TICKET_BUTTON_TEXT, WEB_SALE_LABEL,
};

/// One promotional event block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    /// Newline separated in memory, `<br>` separated in the document.
    pub title: String,
    pub date: String,
    pub time: String,
    pub web_sale_date: String,
    pub counter_sale_date: String,
    pub ticket_link: String,
    pub detail_link: String,
}

impl Event {
    /// Record created by the "add event" action.
    pub fn placeholder() -> Self {
        Self {
            id: generate_id(),
            title: NEW_EVENT_TITLE.to_string(),
            ..Self::default()
        }
    }

    /// Field equality ignoring the session-local id.
    pub fn same_content(&self, other: &Event) -> bool {
        Event {
            id: String::new(),
            ..self.clone()
        } == Event {
            id: String::new(),
            ..other.clone()
        }
    }
}

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?s)<div class="event-in">\s*<h3>(?P<title>{})</h3>\s*<div class="event-in-flex">\s*<div>\s*(?P<info>.*?)\s*</div>\s*<div class="event_btns">\s*(?P<buttons>.*?)\s*</div>\s*</div>\s*</div>"#,
        text_before_closing("h3")
    ))
    .expect("valid event block regex")
});
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("<p>(?P<text>{})</p>", text_before_closing("p")))
        .expect("valid paragraph regex")
});
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));
static TICKET_RE: Lazy<Regex> = Lazy::new(|| button_link(TICKET_BUTTON_TEXT));
static DETAIL_RE: Lazy<Regex> = Lazy::new(|| button_link(DETAIL_BUTTON_TEXT));

const INFO_LABELS: [&str; 3] = [DATE_LABEL, WEB_SALE_LABEL, COUNTER_SALE_LABEL];

fn button_link(text: &str) -> Regex {
    Regex::new(&format!(
        r#"<a href="(?P<value>[^"]*)"[^>]*>\s*{}"#,
        regex::escape(text)
    ))
    .expect("valid button link regex")
}

fn capture(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .and_then(|caps| caps.name("value"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Text of every `<p>` in the info column, unwrapped and trimmed.
fn paragraphs(info: &str) -> Vec<String> {
    PARAGRAPH_RE
        .captures_iter(info)
        .filter_map(|caps| caps.name("text"))
        .map(|m| unwrap_lines(m.as_str()).trim().to_string())
        .collect()
}

fn labeled(paragraphs: &[String], label: &str) -> String {
    paragraphs
        .iter()
        .find_map(|text| text.strip_prefix(label))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// `…開演…開場…` with no `日` before the curtain time.
fn looks_like_time(text: &str) -> bool {
    text.find("開演")
        .is_some_and(|at| !text[..at].contains('日') && text[at..].contains("開場"))
}

/// The time line is the paragraph shaped like a curtain time, or failing
/// that the only paragraph without a label.
fn time_line(paragraphs: &[String]) -> String {
    if let Some(text) = paragraphs.iter().find(|text| looks_like_time(text)) {
        return text.clone();
    }
    let unlabeled: Vec<&String> = paragraphs
        .iter()
        .filter(|text| !INFO_LABELS.iter().any(|label| text.starts_with(label)))
        .collect();
    match unlabeled.as_slice() {
        [only] => (*only).clone(),
        _ => String::new(),
    }
}

/// Title markup to in-memory text: source wraps fold to a space, each
/// `<br>` becomes a newline and every line is trimmed.
fn title_from_markup(markup: &str) -> String {
    BR_RE
        .split(&unwrap_lines(markup))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Extract every well-formed event block in document order.
///
/// Lines missing from a block come back as empty strings; a document with
/// no blocks yields an empty list.
pub fn parse_events(document: &str) -> Vec<Event> {
    let events: Vec<Event> = BLOCK_RE
        .captures_iter(document)
        .map(|caps| {
            let info = paragraphs(caps.name("info").map_or("", |m| m.as_str()));
            let buttons = caps.name("buttons").map_or("", |m| m.as_str());
            Event {
                id: generate_id(),
                title: title_from_markup(caps.name("title").map_or("", |m| m.as_str())),
                date: labeled(&info, DATE_LABEL),
                time: time_line(&info),
                web_sale_date: labeled(&info, WEB_SALE_LABEL),
                counter_sale_date: labeled(&info, COUNTER_SALE_LABEL),
                ticket_link: capture(&TICKET_RE, buttons),
                detail_link: capture(&DETAIL_RE, buttons),
            }
        })
        .collect();

    debug!("Parsed {} event blocks", events.len());
    events
}

fn render_block(event: &Event) -> String {
    Markup::new()
        .line(0, r#"<div class="event-in">"#)
        .line(1, format!("<h3>{}</h3>", event.title.replace('\n', "<br>")))
        .line(1, r#"<div class="event-in-flex">"#)
        .line(2, "<div>")
        .line(3, format!("<p>{DATE_LABEL}{}</p>", event.date))
        .line(3, format!("<p>{}</p>", event.time))
        .line(3, format!("<p>{WEB_SALE_LABEL}{}</p>", event.web_sale_date))
        .line(3, format!("<p>{COUNTER_SALE_LABEL}{}</p>", event.counter_sale_date))
        .line(2, "</div>")
        .line(2, r#"<div class="event_btns">"#)
        .line(3, r#"<div class="btn btn_bottom">"#)
        .line(
            4,
            format!(
                r#"<a href="{}">{TICKET_BUTTON_TEXT}<span></span></a>"#,
                event.ticket_link
            ),
        )
        .line(3, "</div>")
        .line(3, r#"<div class="btn" style="margin-bottom: 25px;">"#)
        .line(
            4,
            format!(
                r#"<a href="{}">{DETAIL_BUTTON_TEXT}<span></span></a>"#,
                event.detail_link
            ),
        )
        .line(3, "</div>")
        .line(2, "</div>")
        .line(1, "</div>")
        .line(0, "</div>")
        .finish()
}

/// Rewrite the event marker span with one block per event, in list order.
///
/// Returns `document` unchanged when either marker is missing.
pub fn generate_events_html(document: &str, events: &[Event]) -> String {
    let blocks: Vec<String> = events
        .iter()
        .map(|event| format!("\n{}", render_block(event)))
        .collect();
    let body = format!("\n\n{}\n\n{}", blocks.join("\n"), indent(BASE_INDENT));

    match replace_between_markers(document, EVENTS_START_MARKER, EVENTS_END_MARKER, &body) {
        Some(updated) => updated,
        None => {
            debug!("Event markers not found; leaving document unchanged");
            document.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blocks: &str) -> String {
        format!(
            "<html><body>\n<div class=\"event-in\"><h3>お知らせ</h3><p>PDF</p></div>\n{EVENTS_START_MARKER}\n{blocks}\n{EVENTS_END_MARKER}\n<footer>end</footer>\n</body></html>"
        )
    }

    const TEA_CEREMONY: &str = r#"
        <div class="event-in">
            <h3>新春にしきの亭<br>
                初釜茶会</h3>
            <div class="event-in-flex">
                <div>
                    <p>日時：２０２６年１月１８日（日）</p>
                    <p>１４：００開演（１３：３０開場）</p>
                    <p>ＷＥＢ販売：１２月１日（月）１０：００～</p>
                    <p>窓口発売日：１２月２日（火）</p>
                </div>
                <div class="event_btns">
                    <div class="btn btn_bottom">
                        <a href="https://tickets.example.jp/tea">チケットを買う<span></span></a>
                    </div>
                    <div class="btn" style="margin-bottom: 25px;">
                        <a href="event/tea.html">詳しく見る<span></span></a>
                    </div>
                </div>
            </div>
        </div>"#;

    #[test]
    fn parses_all_fields_of_a_block() {
        let events = parse_events(&page(TEA_CEREMONY));
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.title, "新春にしきの亭\n初釜茶会");
        assert_eq!(event.date, "２０２６年１月１８日（日）");
        assert_eq!(event.time, "１４：００開演（１３：３０開場）");
        assert_eq!(event.web_sale_date, "１２月１日（月）１０：００～");
        assert_eq!(event.counter_sale_date, "１２月２日（火）");
        assert_eq!(event.ticket_link, "https://tickets.example.jp/tea");
        assert_eq!(event.detail_link, "event/tea.html");
        assert_eq!(event.id.len(), 7);
    }

    #[test]
    fn announcement_blocks_with_other_markup_are_ignored() {
        let events = parse_events(&page(""));
        assert!(events.is_empty());
    }

    #[test]
    fn missing_counter_sale_line_parses_as_empty() {
        let block = TEA_CEREMONY.replace("<p>窓口発売日：１２月２日（火）</p>", "");
        let events = parse_events(&page(&block));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].counter_sale_date, "");
        assert_eq!(events[0].web_sale_date, "１２月１日（月）１０：００～");
        assert_eq!(events[0].detail_link, "event/tea.html");

        let regenerated = generate_events_html(&page(&block), &events);
        assert!(regenerated.contains("<p>窓口発売日：</p>"));
    }

    #[test]
    fn single_line_buttons_keep_links_apart() {
        let compact = r#"<div class="event-in"><h3>Concert</h3><div class="event-in-flex"><div><p>日時：1/1</p></div><div class="event_btns"><div class="btn"><a href="t.html">チケットを買う<span></span></a></div><div class="btn"><a href="d.html">詳しく見る<span></span></a></div></div></div></div>"#;
        let events = parse_events(compact);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ticket_link, "t.html");
        assert_eq!(events[0].detail_link, "d.html");
        assert_eq!(events[0].time, "");
    }

    #[test]
    fn empty_input_is_safe() {
        assert!(parse_events("").is_empty());
        assert_eq!(generate_events_html("", &[]), "");
    }

    #[test]
    fn missing_markers_leave_document_untouched() {
        let doc = format!("<body>{TEA_CEREMONY}{EVENTS_END_MARKER}</body>");
        let events = vec![Event::placeholder()];
        assert_eq!(generate_events_html(&doc, &events), doc);

        let doc = format!("<body>{EVENTS_START_MARKER}{TEA_CEREMONY}</body>");
        assert_eq!(generate_events_html(&doc, &events), doc);
    }

    #[test]
    fn round_trip_preserves_content() {
        let doc = page(TEA_CEREMONY);
        let parsed = parse_events(&doc);
        let regenerated = generate_events_html(&doc, &parsed);
        let reparsed = parse_events(&regenerated);

        assert_eq!(reparsed.len(), parsed.len());
        for (a, b) in parsed.iter().zip(&reparsed) {
            assert!(a.same_content(b), "{a:?} != {b:?}");
        }
        assert_eq!(generate_events_html(&regenerated, &reparsed), regenerated);
    }

    #[test]
    fn empty_list_clears_the_span() {
        let doc = page(TEA_CEREMONY);
        let cleared = generate_events_html(&doc, &[]);
        let expected_span = format!("\n\n\n\n{}", indent(BASE_INDENT));
        assert!(cleared.contains(&format!(
            "{EVENTS_START_MARKER}{expected_span}{EVENTS_END_MARKER}"
        )));
        assert!(cleared.contains("<h3>お知らせ</h3>"));
        assert!(parse_events(&cleared).is_empty());
    }

    #[test]
    fn reordering_only_moves_blocks() {
        let second = TEA_CEREMONY
            .replace("新春にしきの亭", "春の演奏会")
            .replace("tea.html", "spring.html");
        let doc = page(&format!("{TEA_CEREMONY}\n{second}"));
        let mut events = parse_events(&doc);
        assert_eq!(events.len(), 2);
        events.reverse();

        let regenerated = generate_events_html(&doc, &events);
        let start = regenerated.find(EVENTS_START_MARKER).unwrap() + EVENTS_START_MARKER.len();
        let end = regenerated.find(EVENTS_END_MARKER).unwrap();
        let original_start = doc.find(EVENTS_START_MARKER).unwrap() + EVENTS_START_MARKER.len();
        let original_end = doc.find(EVENTS_END_MARKER).unwrap();
        assert_eq!(&regenerated[..start], &doc[..original_start]);
        assert_eq!(&regenerated[end..], &doc[original_end..]);

        let titles: Vec<String> = parse_events(&regenerated).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["春の演奏会\n初釜茶会", "新春にしきの亭\n初釜茶会"]);
    }

    #[test]
    fn field_text_is_injected_verbatim() {
        let doc = page("");
        let event = Event {
            title: "<strong>Gala</strong>".to_string(),
            ticket_link: "a?b=1&c=2".to_string(),
            ..Event::placeholder()
        };
        let out = generate_events_html(&doc, &[event]);
        assert!(out.contains("<h3><strong>Gala</strong></h3>"));
        assert!(out.contains(r#"<a href="a?b=1&c=2">チケットを買う"#));
    }

    #[test]
    fn wrapped_info_lines_survive_regeneration() {
        let block = TEA_CEREMONY
            .replace(
                "<p>日時：２０２６年１月１８日（日）</p>",
                "<p>日時：２０２６年１月１８日（日）\n                    ・１９日（月）</p>",
            )
            .replace(
                "<p>１４：００開演（１３：３０開場）</p>",
                "<p>\n                    １４：００開演\n                    （１３：３０開場）\n                </p>",
            );
        let doc = page(&block);
        let events = parse_events(&doc);
        assert_eq!(events[0].date, "２０２６年１月１８日（日） ・１９日（月）");
        assert_eq!(events[0].time, "１４：００開演 （１３：３０開場）");

        let out = generate_events_html(&doc, &events);
        assert!(out.contains("<p>日時：２０２６年１月１８日（日） ・１９日（月）</p>"));
        assert!(out.contains("<p>１４：００開演 （１３：３０開場）</p>"));
        let reparsed = parse_events(&out);
        assert!(events[0].same_content(&reparsed[0]));
    }

    #[test]
    fn wrapped_title_is_not_a_line_break() {
        let block = TEA_CEREMONY.replace(
            "新春にしきの亭<br>\n                初釜茶会",
            "Spring Organ\n                Recital",
        );
        let doc = page(&block);
        let events = parse_events(&doc);
        assert_eq!(events[0].title, "Spring Organ Recital");

        let out = generate_events_html(&doc, &events);
        assert!(out.contains("<h3>Spring Organ Recital</h3>"));
        assert!(events[0].same_content(&parse_events(&out)[0]));
    }

    #[test]
    fn unusual_time_line_falls_back_to_the_unlabeled_paragraph() {
        let block = TEA_CEREMONY.replace("１４：００開演（１３：３０開場）", "14:00開演");
        let doc = page(&block);
        let events = parse_events(&doc);
        assert_eq!(events[0].time, "14:00開演");
        assert!(generate_events_html(&doc, &events).contains("<p>14:00開演</p>"));
    }

    #[test]
    fn title_ending_in_angle_bracket_stays_in_its_block() {
        let first = TEA_CEREMONY.replace("新春にしきの亭<br>\n                初釜茶会", "x<");
        let second = TEA_CEREMONY.replace("新春にしきの亭", "春の演奏会");
        let events = parse_events(&page(&format!("{first}\n{second}")));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "x<");
        assert_eq!(events[1].title, "春の演奏会\n初釜茶会");
    }

    #[test]
    fn placeholder_has_fresh_id_and_default_title() {
        let a = Event::placeholder();
        let b = Event::placeholder();
        assert_eq!(a.title, NEW_EVENT_TITLE);
        assert_eq!(a.date, "");
        assert_ne!(a.id, b.id);
    }
}
