/* src/server/engine/rust/src/dealer.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dealer company profile carried inside the info token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerData {
  #[serde(default)]
  pub company_name: String,
  #[serde(default)]
  pub address_line1: Option<String>,
  #[serde(default)]
  pub address_line2: Option<String>,
  #[serde(default)]
  pub town: Option<String>,
  #[serde(default)]
  pub postcode: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub logo: Option<String>,
  #[serde(rename = "FCANumber", default, deserialize_with = "string_or_number")]
  pub fca_number: Option<String>,
  #[serde(default)]
  pub finance_companies: Vec<FinanceCompany>,
  #[serde(default)]
  pub opening_times: Vec<OpeningTime>,
  #[serde(default)]
  pub social_links: SocialLinks,
  #[serde(default)]
  pub latitude: Option<f64>,
  #[serde(default)]
  pub longitude: Option<f64>,
  /// Fields this model does not name; kept so SEO templates can use them.
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceCompany {
  pub name: String,
  #[serde(default)]
  pub logo: Option<String>,
  #[serde(default)]
  pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningTime {
  pub day: String,
  #[serde(default)]
  pub open: Option<String>,
  #[serde(default)]
  pub close: Option<String>,
  #[serde(default)]
  pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
  #[serde(default)]
  pub facebook: Option<String>,
  #[serde(default)]
  pub instagram: Option<String>,
  #[serde(default)]
  pub twitter: Option<String>,
  #[serde(default)]
  pub youtube: Option<String>,
  #[serde(default)]
  pub tiktok: Option<String>,
}

impl SocialLinks {
  /// Present links as (network, url) in a fixed order.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
    [
      ("facebook", &self.facebook),
      ("instagram", &self.instagram),
      ("twitter", &self.twitter),
      ("youtube", &self.youtube),
      ("tiktok", &self.tiktok),
    ]
    .into_iter()
    .filter_map(|(name, url)| url.as_deref().filter(|u| !u.is_empty()).map(|u| (name, u)))
  }
}

impl DealerData {
  /// A blank or whitespace-only FCA number counts as absent.
  pub fn has_fca_number(&self) -> bool {
    self.fca_number.as_deref().is_some_and(|n| !n.trim().is_empty())
  }

  pub fn has_finance_companies(&self) -> bool {
    !self.finance_companies.is_empty()
  }

  pub fn geolocation(&self) -> Option<(f64, f64)> {
    Some((self.latitude?, self.longitude?))
  }

  /// String value of a profile field by its JSON name, for template substitution.
  pub fn field(&self, name: &str) -> Option<String> {
    let known = match name {
      "companyName" => Some(self.company_name.clone()),
      "addressLine1" => self.address_line1.clone(),
      "addressLine2" => self.address_line2.clone(),
      "town" => self.town.clone(),
      "postcode" => self.postcode.clone(),
      "phone" => self.phone.clone(),
      "email" => self.email.clone(),
      "FCANumber" => self.fca_number.clone(),
      _ => None,
    };
    known.or_else(|| match self.extra.get(name)? {
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      _ => None,
    })
  }

  /// Single-line postal address from whichever parts are present.
  pub fn address(&self) -> String {
    [&self.address_line1, &self.address_line2, &self.town, &self.postcode]
      .into_iter()
      .filter_map(|part| part.as_deref().filter(|p| !p.is_empty()))
      .collect::<Vec<_>>()
      .join(", ")
  }
}

/// Registration numbers arrive as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(other) => Err(serde::de::Error::custom(format!(
      "expected a string or number for FCANumber, got {other}"
    ))),
  }
}
