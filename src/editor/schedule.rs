//! Annual schedule fragment: `<div class="year-event-text">` blocks between
//! the schedule markers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ids::generate_id;
use super::layout::{indent, Markup, BASE_INDENT};
use super::splice::replace_between_markers;
use super::text::{text_before_closing, unwrap_lines};
use crate::constants::{
    NEW_SCHEDULE_TITLE, SCHEDULE_CLOSED_TEXT, SCHEDULE_END_MARKER, SCHEDULE_START_MARKER,
};

/// One calendar row of the annual schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub is_closed: bool,
}

impl ScheduleItem {
    pub fn placeholder() -> Self {
        Self {
            id: generate_id(),
            title: NEW_SCHEDULE_TITLE.to_string(),
            ..Self::default()
        }
    }

    pub fn same_content(&self, other: &ScheduleItem) -> bool {
        self.title == other.title
            && self.date == other.date
            && self.time == other.time
            && self.is_closed == other.is_closed
    }
}

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?s)<div class="year-event-text">\s*<h5>(?P<title>{})</h5>\s*<p>(?P<when>{})</p>(?P<closed>\s*<p class="close">{}</p>)?\s*</div>"#,
        text_before_closing("h5"),
        text_before_closing("p"),
        regex::escape(SCHEDULE_CLOSED_TEXT)
    ))
    .expect("valid schedule block regex")
});
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));

/// Split the paragraph body into date (before the first `<br>`) and time
/// (everything after it, joined with spaces). Source wraps fold to a space.
fn split_date_time(when: &str) -> (String, String) {
    let unwrapped = unwrap_lines(when);
    let mut parts = BR_RE.split(&unwrapped);
    let date = parts.next().unwrap_or("").trim().to_string();
    let time = parts.collect::<Vec<_>>().join(" ").trim().to_string();
    (date, time)
}

/// Extract every schedule block in document order.
pub fn parse_schedule(document: &str) -> Vec<ScheduleItem> {
    let items: Vec<ScheduleItem> = BLOCK_RE
        .captures_iter(document)
        .map(|caps| {
            let (date, time) = split_date_time(caps.name("when").map_or("", |m| m.as_str()));
            ScheduleItem {
                id: generate_id(),
                title: unwrap_lines(caps.name("title").map_or("", |m| m.as_str()))
                    .trim()
                    .to_string(),
                date,
                time,
                is_closed: caps.name("closed").is_some(),
            }
        })
        .collect();

    debug!("Parsed {} schedule blocks", items.len());
    items
}

fn render_block(item: &ScheduleItem) -> String {
    let mut markup = Markup::new();
    markup
        .line(0, r#"<div class="year-event-text">"#)
        .line(1, format!("<h5>{}</h5>", item.title))
        .line(1, format!("<p>{}<br>", item.date))
        .line(2, &item.time)
        .line(1, "</p>");
    if item.is_closed {
        markup.line(1, format!(r#"<p class="close">{SCHEDULE_CLOSED_TEXT}</p>"#));
    }
    markup.line(0, "</div>").finish()
}

/// Rewrite the schedule marker span with one block per item, in list order.
///
/// Returns `document` unchanged when either marker is missing.
pub fn generate_schedule_html(document: &str, items: &[ScheduleItem]) -> String {
    let blocks: Vec<String> = items.iter().map(render_block).collect();
    let body = format!("\n{}\n{}", blocks.join("\n"), indent(BASE_INDENT));

    match replace_between_markers(document, SCHEDULE_START_MARKER, SCHEDULE_END_MARKER, &body) {
        Some(updated) => updated,
        None => {
            debug!("Schedule markers not found; leaving document unchanged");
            document.to_string()
        }
    }
}
