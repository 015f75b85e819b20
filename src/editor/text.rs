//! Text helpers shared by the fragment parsers.

use once_cell::sync::Lazy;
use regex::Regex;

static WRAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\r\n]*\n[ \t\r\n]*").expect("valid line wrap regex"));

/// Fold source line wraps into a single space.
///
/// A newline in markup renders as a space, so a hand-wrapped value and the
/// same value on one line are the same text. Only `<br>` is a line break.
pub fn unwrap_lines(text: &str) -> String {
    WRAP_RE.replace_all(text, " ").into_owned()
}

/// Regex fragment matching any text that does not contain `</tag>`.
///
/// Built as the automaton over the closing tag so that a stray `<` or a
/// partial closing tag such as `</h` can never carry the match past the
/// real one.
pub fn text_before_closing(tag: &str) -> String {
    let closing: Vec<char> = format!("</{tag}>").chars().skip(1).collect();
    let prefix = partial(&closing[..closing.len() - 1]);
    let restart = format!("(?:{prefix}<)*");
    let cycle = format!("[^<]|<{restart}(?:{})", leave(&closing));
    format!("(?:{cycle})*(?:<{restart}{prefix})?")
}

fn lit(c: char) -> String {
    regex::escape(&c.to_string())
}

/// Ways out of a partial closing tag back to plain text.
fn leave(rest: &[char]) -> String {
    match rest {
        [] => String::new(),
        [last] => format!("[^<{}]", lit(*last)),
        [next, tail @ ..] => format!("[^<{0}]|{0}(?:{1})", lit(*next), leave(tail)),
    }
}

/// Optional proper prefix of the closing tag after its `<`.
fn partial(rest: &[char]) -> String {
    match rest {
        [] => String::new(),
        [next, tail @ ..] => format!("(?:{}{})?", lit(*next), partial(tail)),
    }
}
