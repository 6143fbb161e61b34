/* src/server/core/rust/src/catalog.rs */

//! Built-in section renderers. Dealers pick variants by name in their
//! config; deployments can add or override entries with `SectionRegistry::merge`.

use forecourt_engine::{
  FinanceQuote, FinanceType, Scope, SectionContext, SectionError, SectionRegistry, escape_html,
  format_currency, quote_checked,
};
use serde_json::Value;

pub fn builtin_sections() -> SectionRegistry {
  SectionRegistry::new()
    .register(Scope::Shared, "hero", "HeroBanner", hero_banner)
    .register(Scope::Shared, "trusted-partner", "PartnerGrid", partner_grid)
    .register(Scope::Shared, "contact", "ContactDetails", contact_details)
    .register(Scope::Shared, "opening-hours", "OpeningHoursTable", opening_hours)
    .register(Scope::Shared, "map", "StaticMap", static_map)
    .register(Scope::Shared, "rich-text", "RichText", rich_text)
    .register(Scope::Shared, "stock-list", "StockGrid", stock_grid)
    .register(
      Scope::Page("finance".into()),
      "representative-example",
      "RepresentativeExample",
      representative_example,
    )
}

fn hero_banner(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let heading = ctx.prop_str("heading").unwrap_or(&ctx.dealer.company_name);
  let mut html = String::from(r#"<section class="hero">"#);
  if let Some(image) = ctx.prop_str("image") {
    html.push_str(&format!(r#"<img class="hero-image" src="{}" alt="">"#, escape_html(image)));
  }
  html.push_str(&format!("<h1>{}</h1>", escape_html(heading)));
  if let Some(sub) = ctx.prop_str("subheading") {
    html.push_str(&format!("<p>{}</p>", escape_html(sub)));
  }
  if let (Some(label), Some(href)) = (ctx.prop_str("ctaLabel"), ctx.prop_str("ctaHref")) {
    let (href, label) = (escape_html(href), escape_html(label));
    html.push_str(&format!(r#"<a class="cta" href="{href}">{label}</a>"#));
  }
  html.push_str("</section>");
  Ok(html)
}

fn partner_grid(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let dealer = ctx.dealer;
  let mut html = String::from(r#"<section class="trusted-partner">"#);
  html.push_str(&format!(
    "<h2>{}</h2>",
    escape_html(ctx.prop_str("heading").unwrap_or("Our finance partners"))
  ));
  if !dealer.finance_companies.is_empty() {
    html.push_str("<ul>");
    for company in &dealer.finance_companies {
      let label = match &company.logo {
        Some(logo) => {
          format!(r#"<img src="{}" alt="{}">"#, escape_html(logo), escape_html(&company.name))
        }
        None => escape_html(&company.name),
      };
      match &company.url {
        Some(url) => {
          html.push_str(&format!(r#"<li><a href="{}">{label}</a></li>"#, escape_html(url)))
        }
        None => html.push_str(&format!("<li>{label}</li>")),
      }
    }
    html.push_str("</ul>");
  }
  if let Some(fca) = dealer.fca_number.as_deref().filter(|_| dealer.has_fca_number()) {
    html.push_str(&format!(
      r#"<p class="fca">{} is authorised and regulated by the Financial Conduct Authority. FCA number {}.</p>"#,
      escape_html(&dealer.company_name),
      escape_html(fca.trim())
    ));
  }
  html.push_str("</section>");
  Ok(html)
}

fn contact_details(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let dealer = ctx.dealer;
  let mut html = String::from(r#"<section class="contact"><address>"#);
  html.push_str(&format!("<strong>{}</strong>", escape_html(&dealer.company_name)));
  let address = dealer.address();
  if !address.is_empty() {
    html.push_str(&format!("<p>{}</p>", escape_html(&address)));
  }
  if let Some(phone) = dealer.phone.as_deref().filter(|p| !p.is_empty()) {
    let tel: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    html.push_str(&format!(r#"<p><a href="tel:{tel}">{}</a></p>"#, escape_html(phone)));
  }
  if let Some(email) = dealer.email.as_deref().filter(|e| !e.is_empty()) {
    let email = escape_html(email);
    html.push_str(&format!(r#"<p><a href="mailto:{email}">{email}</a></p>"#));
  }
  html.push_str("</address>");
  let social: Vec<_> = dealer.social_links.iter().collect();
  if !social.is_empty() {
    html.push_str(r#"<ul class="social">"#);
    for (network, url) in social {
      let url = escape_html(url);
      html.push_str(&format!(r#"<li><a href="{url}" rel="noopener">{network}</a></li>"#));
    }
    html.push_str("</ul>");
  }
  html.push_str("</section>");
  Ok(html)
}

fn opening_hours(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let times = &ctx.dealer.opening_times;
  if times.is_empty() {
    return Err(SectionError::new("dealer profile has no opening times"));
  }
  let mut html = String::from(r#"<section class="opening-hours"><table>"#);
  for time in times {
    let hours = match (time.closed, time.open.as_deref(), time.close.as_deref()) {
      (false, Some(open), Some(close)) => {
        format!("{} &ndash; {}", escape_html(open), escape_html(close))
      }
      _ => "Closed".to_string(),
    };
    html.push_str(&format!("<tr><th>{}</th><td>{hours}</td></tr>", escape_html(&time.day)));
  }
  html.push_str("</table></section>");
  Ok(html)
}

fn static_map(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let (lat, lng) = ctx
    .dealer
    .geolocation()
    .ok_or_else(|| SectionError::new("dealer profile has no latitude/longitude"))?;
  let zoom = ctx.prop_f64("zoom").unwrap_or(15.0);
  Ok(format!(
    concat!(
      r#"<section class="map" data-lat="{lat}" data-lng="{lng}" data-zoom="{zoom}">"#,
      r#"<a href="https://www.google.com/maps/search/?api=1&amp;query={lat},{lng}">Get directions to {name}</a>"#,
      "</section>"
    ),
    lat = lat,
    lng = lng,
    zoom = zoom,
    name = escape_html(&ctx.dealer.company_name),
  ))
}

fn rich_text(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let mut html = String::from(r#"<section class="rich-text">"#);
  if let Some(heading) = ctx.prop_str("heading") {
    html.push_str(&format!("<h2>{}</h2>", escape_html(heading)));
  }
  match ctx.section.props.get("paragraphs") {
    Some(Value::Array(paragraphs)) => {
      for p in paragraphs.iter().filter_map(Value::as_str) {
        html.push_str(&format!("<p>{}</p>", escape_html(p)));
      }
    }
    Some(Value::String(p)) => html.push_str(&format!("<p>{}</p>", escape_html(p))),
    _ => {}
  }
  html.push_str("</section>");
  Ok(html)
}

/// Loader data is either an array of vehicles or `{ "items": [...] }`.
fn stock_grid(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let data = ctx.data.ok_or_else(|| SectionError::new("stock list needs a loader"))?;
  let vehicles = match data {
    Value::Array(items) => items,
    Value::Object(map) => map
      .get("items")
      .and_then(Value::as_array)
      .ok_or_else(|| SectionError::new("stock data has no items array"))?,
    _ => return Err(SectionError::new("stock data is not a list")),
  };

  let mut html = String::from(r#"<section class="stock-list">"#);
  if vehicles.is_empty() {
    html.push_str(r#"<p class="empty">No vehicles in stock right now.</p>"#);
  } else {
    html.push_str("<ul>");
    for vehicle in vehicles {
      let text = |key: &str| vehicle.get(key).and_then(Value::as_str).unwrap_or_default();
      let title = format!("{} {}", text("make"), text("model"));
      html.push_str(&format!(r#"<li class="vehicle" data-id="{}">"#, escape_html(text("id"))));
      if !text("image").is_empty() {
        html.push_str(&format!(
          r#"<img src="{}" alt="{}">"#,
          escape_html(text("image")),
          escape_html(title.trim())
        ));
      }
      html.push_str(&format!("<h3>{}</h3>", escape_html(title.trim())));
      if let Some(price) = vehicle.get("price").and_then(Value::as_f64) {
        let price = format_currency(price, ctx.currency_symbol);
        html.push_str(&format!(r#"<p class="price">{}</p>"#, escape_html(&price)));
      }
      if let Some(mileage) = vehicle.get("mileage").and_then(Value::as_u64) {
        html.push_str(&format!(r#"<p class="mileage">{mileage} miles</p>"#));
      }
      html.push_str("</li>");
    }
    html.push_str("</ul>");
  }
  html.push_str("</section>");
  Ok(html)
}

fn whole_months(months: f64) -> Result<i32, SectionError> {
  if months.fract() != 0.0 || months < f64::from(i32::MIN) || months > f64::from(i32::MAX) {
    return Err(SectionError::new(format!("nbrOfMonths must be a whole number, got {months}")));
  }
  Ok(months as i32)
}

/// Representative example disclosure built from the section props.
fn representative_example(ctx: &SectionContext<'_>) -> Result<String, SectionError> {
  let number = |key: &str| {
    ctx.prop_f64(key).ok_or_else(|| SectionError::new(format!("missing numeric prop \"{key}\"")))
  };
  let finance_type = match ctx.prop_str("financeType") {
    Some("hp") => FinanceType::Hp,
    _ => FinanceType::Pcp,
  };
  let request = FinanceQuote {
    total_cash: number("totalCash")?,
    deposit: number("deposit")?,
    apr: number("apr")?,
    nbr_of_months: whole_months(number("nbrOfMonths")?)?,
    final_payment_percentage: ctx.prop_f64("finalPaymentPercentage"),
    currency_symbol: Some(ctx.currency_symbol.to_string()),
    finance_type,
  };
  let summary = quote_checked(&request).map_err(|e| SectionError::new(e.to_string()))?;
  let f = &summary.formatted;
  let label = match finance_type {
    FinanceType::Pcp => "PCP",
    FinanceType::Hp => "HP",
  };

  let mut rows = vec![
    ("Cash price", &f.cash_price),
    ("Deposit", &f.deposit),
    ("Amount of credit", &f.borrowing),
    ("Monthly payment", &f.monthly_payment),
  ];
  if finance_type == FinanceType::Pcp {
    rows.push(("Optional final payment", &f.final_payment));
  }
  rows.push(("Total amount payable", &f.total_amount_payable));
  rows.push(("Interest", &f.amount_of_interest));

  let mut html = format!(
    r#"<section class="representative-example"><h2>Representative example ({label})</h2><dl>"#
  );
  for (term, value) in rows {
    html.push_str(&format!("<dt>{term}</dt><dd>{}</dd>", escape_html(value)));
  }
  html.push_str(&format!(
    "<dt>Duration</dt><dd>{} months</dd><dt>APR</dt><dd>{}% APR representative</dd></dl></section>",
    summary.nbr_of_months, summary.apr
  ));
  Ok(html)
}
