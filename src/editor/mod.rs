//! Structured editing of the event listing and annual schedule fragments.
//!
//! Both pipelines are pure text transforms: `parse_*` extracts records from
//! the blocks in a document, `generate_*` rewrites only the span between a
//! fragment's marker comments and leaves every other byte alone. A document
//! without the markers is returned unchanged.

pub mod event_list;
pub mod ids;
mod layout;
pub mod preview;
pub mod schedule;
pub mod session;
pub mod splice;
mod text;

pub use event_list::{generate_events_html, parse_events, Event};
pub use schedule::{generate_schedule_html, parse_schedule, ScheduleItem};
pub use session::{EditorMode, EditorSession};
