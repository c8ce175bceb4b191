/// Template renderer for the dashboard page.
///
/// The page is a single HTML template (`board/assets/board.html`) embedded at
/// compile time, with placeholder tokens like `{{TOKEN}}`. Callers fill
/// page-specific tokens in a closure; anything left over is blanked so raw
/// tokens never reach the browser.

const TEMPLATE: &str = include_str!("assets/board.html");

pub fn render_page<F>(fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    blank_remaining(fill(TEMPLATE.to_owned()))
}

/// Replaces any `{{TOKEN}}` that wasn't substituted with an empty string.
fn blank_remaining(mut html: String) -> String {
    let mut from = 0;
    while let Some(rel) = html[from..].find("{{") {
        let start = from + rel;
        match html[start..].find("}}") {
            Some(end) => {
                html.replace_range(start..start + end + 2, "");
                from = start;
            }
            None => break,
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_unfilled_tokens() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".into()), "abc");
        assert_eq!(blank_remaining("open {{ only".into()), "open {{ only");
    }

    #[test]
    fn template_tokens_are_filled() {
        let html = render_page(|t| t.replace("{{LOG_PATH}}", "run_log.csv"));
        assert!(html.contains("run_log.csv"));
        assert!(!html.contains("{{"));
    }
}
