//! `@page` style injection
//!
//! Adds a page-size rule to a document by plain text insertion. The input is
//! never parsed, so everything outside the inserted block is preserved byte for
//! byte. Repeated calls insert repeated blocks.

/// Opening tag after which the style block is placed
const HEAD_OPEN: &str = "<head>";

/// Build the `<style>` block for the given page settings
///
/// Returns `None` when neither setting is present. The orientation is emitted
/// as a bare token (`@page { size: A4; landscape; margin: 0; }`), which is the
/// established output of this service and is relied on by existing callers.
pub fn page_style(page_size: Option<&str>, orientation: Option<&str>) -> Option<String> {
    let mut rules = Vec::with_capacity(2);
    if let Some(size) = page_size.filter(|s| !s.is_empty()) {
        rules.push(format!("size: {}", size));
    }
    if let Some(orientation) = orientation.filter(|o| !o.is_empty()) {
        rules.push(orientation.to_string());
    }

    if rules.is_empty() {
        return None;
    }

    Some(format!(
        "<style>@page {{ {}; margin: 0; }}</style>",
        rules.join("; ")
    ))
}

/// Insert the page style into `html`
///
/// With a `<head>` present the block goes right after its first occurrence;
/// otherwise the input becomes the body of a new minimal document.
pub fn inject_page_style(html: &str, page_size: Option<&str>, orientation: Option<&str>) -> String {
    let Some(style) = page_style(page_size, orientation) else {
        return html.to_string();
    };

    match html.find(HEAD_OPEN) {
        Some(pos) => {
            let split = pos + HEAD_OPEN.len();
            let mut out = String::with_capacity(html.len() + style.len());
            out.push_str(&html[..split]);
            out.push_str(&style);
            out.push_str(&html[split..]);
            out
        }
        None => format!("<html><head>{}</head><body>{}</body></html>", style, html),
    }
}
