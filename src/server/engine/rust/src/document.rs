/* src/server/engine/rust/src/document.rs */

//! HTML document assembly: page shell, SEO meta, placeholders and error states.

use crate::config::Page;
use crate::dealer::DealerData;

pub fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for ch in input.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      _ => out.push(ch),
    }
  }
  out
}

/// Substitute `{field}` placeholders with dealer profile values.
/// Unknown placeholders are left as written so typos stay visible.
pub fn render_meta_template(template: &str, dealer: &DealerData) -> String {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;
  while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let after = &rest[open + 1..];
    match after.find('}') {
      Some(close) => {
        let name = &after[..close];
        match dealer.field(name) {
          Some(value) => out.push_str(&value),
          None => {
            out.push('{');
            out.push_str(name);
            out.push('}');
          }
        }
        rest = &after[close + 1..];
      }
      None => {
        out.push_str(&rest[open..]);
        rest = "";
      }
    }
  }
  out.push_str(rest);
  out
}

/// Inline diagnostic shown in place of a section that failed to resolve or render.
pub fn section_error_box(path: &str, message: &str) -> String {
  format!(
    r#"<div class="section-error" role="alert" data-section="{}"><strong>Section error</strong> <code>{}</code><p>{}</p></div>"#,
    escape_html(path),
    escape_html(path),
    escape_html(message),
  )
}

/// One navigation entry: (label, href).
pub struct NavLink<'a> {
  pub label: &'a str,
  pub href: &'a str,
}

fn shell(title: &str, head: &str, body: &str) -> String {
  format!(
    concat!(
      "<!DOCTYPE html><html lang=\"en\"><head>",
      "<meta charset=\"utf-8\">",
      "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
      "<title>{}</title>{}</head><body>{}</body></html>"
    ),
    escape_html(title),
    head,
    body,
  )
}

fn nav_html(dealer: &DealerData, nav: &[NavLink<'_>], current: &str) -> String {
  let mut out = String::from(r#"<header class="site-header">"#);
  match dealer.logo.as_deref() {
    Some(logo) if !logo.is_empty() => out.push_str(&format!(
      r#"<a href="/" class="logo"><img src="{}" alt="{}"></a>"#,
      escape_html(logo),
      escape_html(&dealer.company_name)
    )),
    _ => out.push_str(&format!(
      r#"<a href="/" class="logo">{}</a>"#,
      escape_html(&dealer.company_name)
    )),
  }
  out.push_str("<nav><ul>");
  for link in nav {
    let aria = if link.href == current { r#" aria-current="page""# } else { "" };
    out.push_str(&format!(
      r#"<li><a href="{}"{aria}>{}</a></li>"#,
      escape_html(link.href),
      escape_html(link.label)
    ));
  }
  out.push_str("</ul></nav></header>");
  out
}

/// Full page: header navigation, sections in order, SEO title/description.
pub fn render_document(
  page: &Page,
  dealer: &DealerData,
  nav: &[NavLink<'_>],
  sections_html: &[String],
) -> String {
  let title = if page.title.is_empty() {
    dealer.company_name.clone()
  } else {
    render_meta_template(&page.title, dealer)
  };
  let description = render_meta_template(&page.description, dealer);

  let mut body = nav_html(dealer, nav, &page.path);
  body.push_str(&format!(r#"<main data-page="{}">"#, escape_html(&page.page_name)));
  for html in sections_html {
    body.push_str(html);
  }
  body.push_str("</main>");
  let head = if description.is_empty() {
    String::new()
  } else {
    format!(r#"<meta name="description" content="{}">"#, escape_html(&description))
  };
  shell(&title, &head, &body)
}

/// Shown while the dealer session is still bootstrapping.
pub fn loading_document() -> String {
  shell(
    "Loading",
    r#"<meta http-equiv="refresh" content="2">"#,
    r#"<div class="page-loading" aria-busy="true"><p>Loading&hellip;</p></div>"#,
  )
}

/// Full-page fatal state for a failed session bootstrap; the form re-runs it.
pub fn session_error_document(message: &str, retry_action: &str) -> String {
  let body = format!(
    r#"<div class="page-error" role="alert"><h1>Something went wrong</h1><p>{}</p><form method="post" action="{}"><button type="submit">Try again</button></form></div>"#,
    escape_html(message),
    escape_html(retry_action),
  );
  shell("Error", "", &body)
}

pub fn not_found_document(dealer: &DealerData, nav: &[NavLink<'_>], path: &str) -> String {
  let mut body = nav_html(dealer, nav, path);
  body.push_str(&format!(
    r#"<main class="not-found"><h1>Page not found</h1><p>No page at <code>{}</code>.</p><a href="/">Back to home</a></main>"#,
    escape_html(path)
  ));
  shell(&format!("Page not found | {}", dealer.company_name), "", &body)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn dealer() -> DealerData {
    serde_json::from_value(json!({
      "companyName": "Acme & Sons",
      "town": "Leeds",
      "strapline": "Quality cars"
    }))
    .unwrap()
  }

  #[test]
  fn escapes_markup() {
    assert_eq!(
      escape_html(r#"<a href="x">'&'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
    );
  }

  #[test]
  fn meta_template_substitution() {
    let d = dealer();
    assert_eq!(render_meta_template("{companyName} in {town}", &d), "Acme & Sons in Leeds");
    assert_eq!(render_meta_template("{strapline}!", &d), "Quality cars!");
    assert_eq!(render_meta_template("{unknown} stays", &d), "{unknown} stays");
    assert_eq!(render_meta_template("open { brace", &d), "open { brace");
    assert_eq!(render_meta_template("", &d), "");
  }

  #[test]
  fn document_keeps_section_order_and_meta() {
    let page: Page = serde_json::from_value(json!({
      "pageName": "home",
      "path": "/",
      "title": "{companyName} | Used cars in {town}",
      "description": "Visit {companyName}"
    }))
    .unwrap();
    let nav =
      [NavLink { label: "Home", href: "/" }, NavLink { label: "Contact", href: "/contact" }];
    let html = render_document(
      &page,
      &dealer(),
      &nav,
      &["<section>one</section>".to_string(), "<section>two</section>".to_string()],
    );
    assert!(html.contains("<title>Acme &amp; Sons | Used cars in Leeds</title>"));
    assert!(html.contains(r#"<meta name="description" content="Visit Acme &amp; Sons">"#));
    assert!(html.contains(r#"<a href="/" aria-current="page">Home</a>"#));
    let one = html.find("<section>one").unwrap();
    let two = html.find("<section>two").unwrap();
    assert!(one < two);
  }

  #[test]
  fn section_error_box_escapes_message() {
    let html = section_error_box("shared/hero", "variant \"<X>\" missing");
    assert!(html.contains(r#"class="section-error""#));
    assert!(html.contains("<code>shared/hero</code>"));
    assert!(html.contains("&quot;&lt;X&gt;&quot;"));
  }

  #[test]
  fn session_error_has_retry_form() {
    let html = session_error_document("auth exchange failed", "/_forecourt/session/retry");
    assert!(html.contains(r#"action="/_forecourt/session/retry""#));
    assert!(html.contains("auth exchange failed"));
  }

  #[test]
  fn not_found_names_path() {
    let html = not_found_document(&dealer(), &[], "/nope<");
    assert!(html.contains("<code>/nope&lt;</code>"));
  }
}
