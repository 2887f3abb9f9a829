//! Markup for pages and fragments. Every function here is a pure mapping
//! from view data to HTML text.

mod meters;
mod readings;

use axum::http::StatusCode;

/// A view that can be rendered either as a swappable fragment or inside the
/// full site layout.
pub trait Render {
    fn title(&self) -> String;

    /// Markup for the page region this view replaces.
    fn fragment(&self) -> String;

    /// What goes into `#pushedContent` when the whole page is rendered.
    fn page_content(&self) -> String {
        self.fragment()
    }
}

/// The full document around `content`.
pub fn page(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body>
  <nav>
    <a href="/" hx-get="/" hx-target="#pushedContent" hx-push-url="true">Home</a>
    <a href="/meters" hx-get="/meters" hx-target="#pushedContent" hx-push-url="true">Meters</a>
  </nav>
  <div id="toast" role="status"></div>
  <main id="pushedContent">
{content}
  </main>
  <script>
    document.body.addEventListener("showToast", function (evt) {{
      document.getElementById("toast").textContent = evt.detail.value;
    }});
  </script>
</body>
</html>
"##,
        title = escape(title),
    )
}

pub fn error_fragment(status: StatusCode, message: &str) -> String {
    format!(
        r#"<section class="error">
  <h2>{code} {reason}</h2>
  <p>{message}</p>
</section>"#,
        code = status.as_u16(),
        reason = escape(status.canonical_reason().unwrap_or("Error")),
        message = escape(message),
    )
}

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
