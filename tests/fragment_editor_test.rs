use ftp_site_editor::constants::{EVENTS_END_MARKER, EVENTS_START_MARKER, SCHEDULE_START_MARKER};
use ftp_site_editor::editor::{
    generate_events_html, generate_schedule_html, parse_events, parse_schedule, EditorSession,
};

const VENUE_PAGE: &str = include_str!("fixtures/venue_page.html");

fn between<'a>(document: &'a str, start: &str, end: &str) -> &'a str {
    let from = document.find(start).unwrap() + start.len();
    let to = from + document[from..].find(end).unwrap();
    &document[from..to]
}

#[test]
fn parses_the_venue_page() {
    let events = parse_events(VENUE_PAGE);
    assert_eq!(events.len(), 2);

    let tea = &events[0];
    assert_eq!(tea.title, "New Year Tea Ceremony\n初釜茶会");
    assert_eq!(tea.date, "2026年1月18日（日）");
    assert_eq!(tea.time, "14:00開演（13:30開場）");
    assert_eq!(tea.web_sale_date, "2025年12月1日（月）10:00～");
    assert_eq!(tea.counter_sale_date, "2025年12月2日（火）10:00～");
    assert_eq!(tea.ticket_link, "https://tickets.example.jp/tea");
    assert_eq!(tea.detail_link, "event/tea.html");

    let organ = &events[1];
    assert_eq!(organ.title, "Spring Organ Recital");
    assert_eq!(organ.counter_sale_date, "");

    let schedule = parse_schedule(VENUE_PAGE);
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0].title, "Piano Tryout Day");
    assert_eq!(schedule[0].date, "2025年4月5日（土）");
    assert_eq!(schedule[0].time, "9:00～17:00");
    assert!(schedule[0].is_closed);
    assert_eq!(schedule[1].title, "Summer Family Concert");
    assert!(!schedule[1].is_closed);
}

#[test]
fn regeneration_is_idempotent() {
    let events = parse_events(VENUE_PAGE);
    let once = generate_events_html(VENUE_PAGE, &events);
    let twice = generate_events_html(&once, &parse_events(&once));
    assert_eq!(once, twice);

    let schedule = parse_schedule(&once);
    let once = generate_schedule_html(&once, &schedule);
    let twice = generate_schedule_html(&once, &parse_schedule(&once));
    assert_eq!(once, twice);

    for (a, b) in events.iter().zip(parse_events(&once).iter()) {
        assert!(a.same_content(b));
    }
}

#[test]
fn counter_sale_line_is_written_even_when_empty() {
    let events = parse_events(VENUE_PAGE);
    let out = generate_events_html(VENUE_PAGE, &events);
    assert_eq!(out.matches("<p>窓口発売日：").count(), 2);
    assert!(out.contains("<p>窓口発売日：</p>"));
}

#[test]
fn deleting_the_tea_ceremony_leaves_the_schedule_intact() {
    let mut session = EditorSession::new();
    session.load("index.html", VENUE_PAGE);
    session.enter_structured_mode();

    let ids: Vec<String> = session.events().iter().map(|e| e.id.clone()).collect();
    for id in &ids {
        assert!(session.remove_event(id));
    }
    assert!(session.has_changes());

    let buffer = session.buffer();
    assert!(parse_events(buffer).is_empty());
    assert_eq!(
        between(buffer, EVENTS_START_MARKER, EVENTS_END_MARKER).trim(),
        ""
    );

    let schedule_span = &buffer[buffer.find(SCHEDULE_START_MARKER).unwrap()..];
    let original_span = &VENUE_PAGE[VENUE_PAGE.find(SCHEDULE_START_MARKER).unwrap()..];
    assert_eq!(schedule_span, original_span);

    let schedule = parse_schedule(buffer);
    assert_eq!(schedule[0].title, "Piano Tryout Day");
    assert!(schedule[0].is_closed);
}

#[test]
fn reordering_keeps_bytes_outside_the_span() {
    let mut events = parse_events(VENUE_PAGE);
    events.reverse();
    let out = generate_events_html(VENUE_PAGE, &events);

    let prefix_len = VENUE_PAGE.find(EVENTS_START_MARKER).unwrap() + EVENTS_START_MARKER.len();
    assert_eq!(&out[..prefix_len], &VENUE_PAGE[..prefix_len]);
    let suffix = &VENUE_PAGE[VENUE_PAGE.find(EVENTS_END_MARKER).unwrap()..];
    assert!(out.ends_with(suffix));

    let titles: Vec<String> = parse_events(&out).into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Spring Organ Recital", "New Year Tea Ceremony\n初釜茶会"]);
}

const HAND_EDITED_PAGE: &str = include_str!("fixtures/hand_edited_page.html");

#[test]
fn hand_wrapped_fields_parse_as_one_line() {
    let events = parse_events(HAND_EDITED_PAGE);
    assert_eq!(events.len(), 1);
    let chamber = &events[0];
    assert_eq!(chamber.title, "Chamber Music Evening\n室内楽の夕べ");
    assert_eq!(chamber.date, "2026年2月14日（土） ・15日（日）");
    assert_eq!(chamber.time, "18:30開演 （18:00開場）");
    assert_eq!(chamber.web_sale_date, "2025年12月20日（土） 10:00～");
    assert_eq!(chamber.counter_sale_date, "2025年12月21日（日）");
    assert_eq!(chamber.ticket_link, "https://tickets.example.jp/chamber");
    assert_eq!(chamber.detail_link, "event/chamber.html");

    let schedule = parse_schedule(HAND_EDITED_PAGE);
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].title, "Autumn Choir Festival");
    assert_eq!(schedule[0].date, "2026年10月3日（土） ・4日（日）");
    assert_eq!(schedule[0].time, "10:00～ 16:00");
    assert!(schedule[0].is_closed);
}

#[test]
fn hand_wrapped_fields_survive_regeneration() {
    let events = parse_events(HAND_EDITED_PAGE);
    let out = generate_events_html(HAND_EDITED_PAGE, &events);
    assert!(out.contains("<h3>Chamber Music Evening<br>室内楽の夕べ</h3>"));
    assert!(out.contains("<p>日時：2026年2月14日（土） ・15日（日）</p>"));
    assert!(out.contains("<p>18:30開演 （18:00開場）</p>"));

    let schedule = parse_schedule(&out);
    let out = generate_schedule_html(&out, &schedule);
    assert!(out.contains("<h5>Autumn Choir Festival</h5>"));

    for (a, b) in events.iter().zip(parse_events(&out).iter()) {
        assert!(a.same_content(b), "{a:?} != {b:?}");
    }
    for (a, b) in schedule.iter().zip(parse_schedule(&out).iter()) {
        assert!(a.same_content(b), "{a:?} != {b:?}");
    }
    assert_eq!(generate_events_html(&out, &parse_events(&out)), out);
}
