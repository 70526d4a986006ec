//! HTML page builders.
//!
//! Pages are assembled from small string fragments; every dynamic value goes
//! through [`escape`].

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// URL slug for a movie title: lowercase words joined by `-`.
pub fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Flash messages to show at the top of a page.
#[derive(Debug, Default, Clone)]
pub struct Flashes {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Wrap `content` in the site layout.
pub fn layout(site: &str, title: &str, authenticated: bool, flashes: &Flashes, content: &str) -> String {
    let nav = if authenticated {
        r#"<a href="/home">Home</a> <a href="/watchlist">Watchlist</a> <a href="/logout">Logout</a>"#
    } else {
        r#"<a href="/">Home</a> <a href="/login">Login</a> <a href="/register">Register</a>"#
    };

    let mut page = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} - {}</title></head>\n<body>\n<nav>{} <a href=\"/movies/trending\">Trending</a> <a href=\"/movies/upcoming\">Upcoming</a> <a href=\"/movies/top-rated\">Top Rated</a></nav>\n",
        escape(title),
        escape(site),
        nav
    );
    if let Some(msg) = &flashes.success {
        page.push_str(&format!("<div class=\"alert alert-success\">{}</div>\n", escape(msg)));
    }
    if let Some(msg) = &flashes.error {
        page.push_str(&format!("<div class=\"alert alert-error\">{}</div>\n", escape(msg)));
    }
    page.push_str(content);
    page.push_str("\n</body>\n</html>\n");
    page
}

/// A form text input.
pub fn input(kind: &str, name: &str, label: &str, value: &str) -> String {
    format!(
        "<label>{label}<input type=\"{kind}\" name=\"{name}\" value=\"{value}\"></label>\n",
        label = escape(label),
        kind = kind,
        name = name,
        value = escape(value),
    )
}

/// Hidden CSRF token field.
pub fn csrf_field(token: &str) -> String {
    format!("<input type=\"hidden\" name=\"csrf_token\" value=\"{}\">\n", escape(token))
}
