/// Replace the text strictly between `start_marker` and the first
/// `end_marker` that follows it. Both markers stay in place.
///
/// Returns `None` when either marker cannot be found, so callers can fall
/// back to the untouched document.
pub fn replace_between_markers(
    document: &str,
    start_marker: &str,
    end_marker: &str,
    body: &str,
) -> Option<String> {
    let start = document.find(start_marker)?;
    let span_start = start + start_marker.len();
    let end = span_start + document[span_start..].find(end_marker)?;

    let mut out = String::with_capacity(span_start + body.len() + (document.len() - end));
    out.push_str(&document[..span_start]);
    out.push_str(body);
    out.push_str(&document[end..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_the_span() {
        let doc = "head<!--a-->old stuff<!--b-->tail";
        let out = replace_between_markers(doc, "<!--a-->", "<!--b-->", "NEW").unwrap();
        assert_eq!(out, "head<!--a-->NEW<!--b-->tail");
    }

    #[test]
    fn missing_marker_yields_none() {
        assert!(replace_between_markers("x<!--a-->y", "<!--a-->", "<!--b-->", "z").is_none());
        assert!(replace_between_markers("x<!--b-->y", "<!--a-->", "<!--b-->", "z").is_none());
        assert!(replace_between_markers("", "<!--a-->", "<!--b-->", "z").is_none());
    }

    #[test]
    fn end_marker_before_start_is_not_used() {
        let doc = "<!--b-->pre<!--a-->mid";
        assert!(replace_between_markers(doc, "<!--a-->", "<!--b-->", "z").is_none());

        let doc = "<!--b-->pre<!--a-->mid<!--b-->post";
        let out = replace_between_markers(doc, "<!--a-->", "<!--b-->", "z").unwrap();
        assert_eq!(out, "<!--b-->pre<!--a-->z<!--b-->post");
    }
}
