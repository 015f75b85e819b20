use crate::domain::Project;

/// Base URL relative links in a previewed page resolve against: the public
/// site URL when known, otherwise the FTP host and directory over http.
pub fn preview_base_url(project: &Project) -> String {
    let base = match project.public_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("http://{}{}", project.ftp_host, project.ftp_path),
    };
    if base.ends_with('/') {
        base
    } else {
        format!("{base}/")
    }
}

/// Insert `<base href>` right after the first `<head>` tag.
pub fn inject_base_href(document: &str, base_url: &str) -> String {
    document.replacen("<head>", &format!(r#"<head><base href="{base_url}">"#), 1)
}

pub fn render_preview(project: &Project, document: &str) -> String {
    inject_base_href(document, &preview_base_url(project))
}
