/// Marker comments delimiting the regions the fragment editor rewrites.
/// These are site-template conventions and must match byte for byte,
/// including the full-width spaces.

// Event listing region
pub const EVENTS_START_MARKER: &str = "<!--　イベント情報　内容　ここからdivごとに増やす　-->";
pub const EVENTS_END_MARKER: &str = "<!--　イベント情報　ここまで　-->";

// Annual schedule region
pub const SCHEDULE_START_MARKER: &str = "<!--　年間イベント　内容　ここからdivごとに増やす　-->";
pub const SCHEDULE_END_MARKER: &str = "<!--　年間イベント　内容　ここまでdivごとに増やす　-->";

// Labels the event block uses for its info lines and buttons
pub const DATE_LABEL: &str = "日時：";
pub const WEB_SALE_LABEL: &str = "ＷＥＢ販売：";
pub const COUNTER_SALE_LABEL: &str = "窓口発売日：";
pub const TICKET_BUTTON_TEXT: &str = "チケットを買う";
pub const DETAIL_BUTTON_TEXT: &str = "詳しく見る";

/// Text of the line appended to a finished schedule entry.
pub const SCHEDULE_CLOSED_TEXT: &str = "終了しました";

// Titles seeded into records created with "add new"
pub const NEW_EVENT_TITLE: &str = "新しいイベント";
pub const NEW_SCHEDULE_TITLE: &str = "新しい予定";

/// File opened first when a project lists it among its targets.
pub const DEFAULT_TARGET_FILE: &str = "index.html";

pub const DEFAULT_FTP_PORT: u16 = 21;
pub const DEFAULT_FTP_PATH: &str = "/";
