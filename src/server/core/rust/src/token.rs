/* src/server/core/rust/src/token.rs */

//! Info-token decoding. The token is `header.payload.signature`; only the
//! payload is read and the signature is not verified.

use forecourt_engine::DealerData;
use serde_json::Value;

use crate::errors::ForecourtError;

/// Claim that carries the JSON-encoded dealer profile.
pub const DEALER_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/userdata";

/// Base64url decoding without padding requirements (RFC 4648 §5).
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, ForecourtError> {
  fn decode_char(c: u8) -> Option<u8> {
    match c {
      b'A'..=b'Z' => Some(c - b'A'),
      b'a'..=b'z' => Some(c - b'a' + 26),
      b'0'..=b'9' => Some(c - b'0' + 52),
      b'-' | b'+' => Some(62),
      b'_' | b'/' => Some(63),
      _ => None,
    }
  }

  let bytes = input.trim_end_matches('=').as_bytes();
  if bytes.len() % 4 == 1 {
    return Err(ForecourtError::upstream("invalid base64url length in info token"));
  }
  let mut output = Vec::with_capacity(bytes.len() * 3 / 4);

  for chunk in bytes.chunks(4) {
    let mut buf = [0u8; 4];
    for (slot, &c) in buf.iter_mut().zip(chunk) {
      *slot = decode_char(c)
        .ok_or_else(|| ForecourtError::upstream("invalid base64url character in info token"))?;
    }
    output.push((buf[0] << 2) | (buf[1] >> 4));
    if chunk.len() > 2 {
      output.push((buf[1] << 4) | (buf[2] >> 2));
    }
    if chunk.len() > 3 {
      output.push((buf[2] << 6) | buf[3]);
    }
  }

  Ok(output)
}

/// Decode the claims object from the middle segment.
pub fn decode_claims(token: &str) -> Result<serde_json::Map<String, Value>, ForecourtError> {
  let segments: Vec<&str> = token.split('.').collect();
  let [_, payload, _] = segments.as_slice() else {
    return Err(ForecourtError::upstream(format!(
      "info token must have 3 segments, got {}",
      segments.len()
    )));
  };
  let bytes = base64url_decode(payload)?;
  match serde_json::from_slice(&bytes) {
    Ok(Value::Object(claims)) => Ok(claims),
    Ok(_) => Err(ForecourtError::upstream("info token payload is not a JSON object")),
    Err(e) => Err(ForecourtError::upstream(format!("info token payload: {e}"))),
  }
}

/// Extract the dealer profile. The claim holds a JSON string, though an
/// already-decoded object is accepted too.
pub fn decode_dealer_profile(token: &str, claim: &str) -> Result<DealerData, ForecourtError> {
  let mut claims = decode_claims(token)?;
  let raw = claims
    .remove(claim)
    .ok_or_else(|| ForecourtError::upstream(format!("info token has no \"{claim}\" claim")))?;
  let parsed = match raw {
    Value::String(text) => serde_json::from_str(&text),
    other => serde_json::from_value(other),
  };
  parsed.map_err(|e| ForecourtError::upstream(format!("dealer profile in info token: {e}")))
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn base64url_encode(bytes: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut out = String::new();
    for chunk in bytes.chunks(3) {
      let b = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
      let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
      let chars = chunk.len() + 1;
      for i in 0..chars {
        out.push(ALPHABET[((n >> (18 - 6 * i)) & 0x3F) as usize] as char);
      }
    }
    out
  }

  /// Build an unsigned token whose payload holds `profile` under the dealer claim.
  pub(crate) fn info_token(profile: &Value) -> String {
    let payload = serde_json::json!({ DEALER_CLAIM: profile.to_string(), "exp": 1_900_000_000 });
    format!(
      "{}.{}.{}",
      base64url_encode(br#"{"alg":"HS256","typ":"JWT"}"#),
      base64url_encode(payload.to_string().as_bytes()),
      "c2lnbmF0dXJl"
    )
  }

  #[test]
  fn decode_known_vectors() {
    assert_eq!(base64url_decode("").unwrap(), b"");
    assert_eq!(base64url_decode("Zg").unwrap(), b"f");
    assert_eq!(base64url_decode("Zm8").unwrap(), b"fo");
    assert_eq!(base64url_decode("Zm9v").unwrap(), b"foo");
    assert_eq!(base64url_decode("Zm9vYg==").unwrap(), b"foob");
    assert_eq!(base64url_decode("-_8").unwrap(), [0xfb, 0xff]);
  }

  #[test]
  fn decode_rejects_bad_input() {
    assert!(base64url_decode("Z").is_err());
    assert!(base64url_decode("Zm9v!").is_err());
  }

  #[test]
  fn encoder_and_decoder_agree_on_utf8() {
    let text = "Acme \u{a3} Motors \u{2014} Leeds";
    assert_eq!(base64url_decode(&base64url_encode(text.as_bytes())).unwrap(), text.as_bytes());
  }

  #[test]
  fn profile_from_string_claim() {
    let profile = serde_json::json!({"companyName": "Acme Motors", "FCANumber": "123456"});
    let token = info_token(&profile);
    let dealer = decode_dealer_profile(&token, DEALER_CLAIM).unwrap();
    assert_eq!(dealer.company_name, "Acme Motors");
    assert!(dealer.has_fca_number());
  }

  #[test]
  fn profile_from_object_claim() {
    let payload = serde_json::json!({"dealer": {"companyName": "Inline"}});
    let token = format!("h.{}.s", base64url_encode(payload.to_string().as_bytes()));
    assert_eq!(decode_dealer_profile(&token, "dealer").unwrap().company_name, "Inline");
  }

  #[test]
  fn wrong_segment_count() {
    let err = decode_claims("only.two").unwrap_err();
    assert_eq!(err.code(), "UPSTREAM_ERROR");
    assert!(err.message().contains("3 segments"));
  }

  #[test]
  fn missing_claim() {
    let token = format!("h.{}.s", base64url_encode(br#"{"sub":"x"}"#));
    let err = decode_dealer_profile(&token, DEALER_CLAIM).unwrap_err();
    assert!(err.message().contains("no \""));
  }

  #[test]
  fn malformed_profile_json() {
    let payload = serde_json::json!({ DEALER_CLAIM: "{not json" });
    let token = format!("h.{}.s", base64url_encode(payload.to_string().as_bytes()));
    assert!(decode_dealer_profile(&token, DEALER_CLAIM).is_err());
  }
}
