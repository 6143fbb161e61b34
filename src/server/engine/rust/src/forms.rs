/* src/server/engine/rust/src/forms.rs */

//! Step validation for the appointment, reservation and sell-your-car forms.
//! Errors carry the user-facing message shown as a toast; any error blocks
//! progression to the next step.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

impl FieldError {
  fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self { field, message: message.into() }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
  Appointment,
  Reservation,
  SellCar,
}

impl FormKind {
  pub fn from_slug(slug: &str) -> Option<Self> {
    match slug {
      "appointment" => Some(Self::Appointment),
      "reservation" => Some(Self::Reservation),
      "sell-car" => Some(Self::SellCar),
      _ => None,
    }
  }

  /// Backend endpoint a valid submission is forwarded to.
  pub fn endpoint(self) -> &'static str {
    match self {
      Self::Appointment => "/api/appointments",
      Self::Reservation => "/api/reservations",
      Self::SellCar => "/api/sell-car",
    }
  }

  pub fn steps(self) -> u8 {
    match self {
      Self::Appointment => 2,
      Self::Reservation => 2,
      Self::SellCar => 3,
    }
  }

  /// Deserialize `body` as this form and validate one step, or every step when `step` is `None`.
  pub fn validate_json(
    self,
    body: &serde_json::Value,
    step: Option<u8>,
  ) -> Result<Vec<FieldError>, serde_json::Error> {
    let errors = match self {
      Self::Appointment => {
        validate_steps(&serde_json::from_value::<AppointmentForm>(body.clone())?, self, step)
      }
      Self::Reservation => {
        validate_steps(&serde_json::from_value::<ReservationForm>(body.clone())?, self, step)
      }
      Self::SellCar => {
        validate_steps(&serde_json::from_value::<SellCarForm>(body.clone())?, self, step)
      }
    };
    Ok(errors)
  }
}

pub trait StepForm {
  fn validate_step(&self, step: u8) -> Vec<FieldError>;
}

fn validate_steps(form: &impl StepForm, kind: FormKind, step: Option<u8>) -> Vec<FieldError> {
  match step {
    Some(s) if s == 0 || s > kind.steps() => {
      vec![FieldError::new("step", format!("step must be between 1 and {}", kind.steps()))]
    }
    Some(s) => form.validate_step(s),
    None => (1..=kind.steps()).flat_map(|s| form.validate_step(s)).collect(),
  }
}

// -- field checks --

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str, label: &str) -> bool {
  if value.trim().is_empty() {
    errors.push(FieldError::new(field, format!("Please enter your {label}")));
    return false;
  }
  true
}

fn is_email(value: &str) -> bool {
  let Some((local, domain)) = value.trim().split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.split('.').count() >= 2
    && domain.split('.').all(|part| !part.is_empty())
}

/// UK numbers: 10 or 11 digits, or +44 followed by 10 digits. Spaces and dashes ignored.
fn is_phone(value: &str) -> bool {
  let compact: String = value.chars().filter(|c| !matches!(c, ' ' | '-' | '(' | ')')).collect();
  let digits = compact.strip_prefix('+').unwrap_or(&compact);
  if !digits.chars().all(|c| c.is_ascii_digit()) {
    return false;
  }
  if compact.starts_with('+') {
    return digits.starts_with("44") && digits.len() == 12;
  }
  (10..=11).contains(&digits.len()) && digits.starts_with('0')
}

fn is_registration(value: &str) -> bool {
  let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
  (2..=8).contains(&compact.len()) && compact.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `YYYY-MM-DD` with a plausible month/day.
fn is_date(value: &str) -> bool {
  let parts: Vec<&str> = value.split('-').collect();
  let [y, m, d] = parts.as_slice() else {
    return false;
  };
  if y.len() != 4 || m.len() != 2 || d.len() != 2 {
    return false;
  }
  match (y.parse::<u16>(), m.parse::<u8>(), d.parse::<u8>()) {
    (Ok(_), Ok(m), Ok(d)) => (1..=12).contains(&m) && (1..=31).contains(&d),
    _ => false,
  }
}

/// `HH:MM`, 24-hour.
fn is_time(value: &str) -> bool {
  let Some((h, m)) = value.split_once(':') else {
    return false;
  };
  h.len() == 2
    && m.len() == 2
    && matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

fn contact_errors(errors: &mut Vec<FieldError>, name: &str, email: &str, phone: &str) {
  require(errors, "name", name, "name");
  if require(errors, "email", email, "email address") && !is_email(email) {
    errors.push(FieldError::new("email", "Please enter a valid email address"));
  }
  if require(errors, "phone", phone, "phone number") && !is_phone(phone) {
    errors.push(FieldError::new("phone", "Please enter a valid UK phone number"));
  }
}

// -- forms --

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentForm {
  pub appointment_type: String,
  pub date: String,
  pub time: String,
  pub vehicle_id: Option<String>,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub message: Option<String>,
}

impl StepForm for AppointmentForm {
  fn validate_step(&self, step: u8) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
      1 => {
        require(&mut errors, "appointmentType", &self.appointment_type, "appointment type");
        if !is_date(&self.date) {
          errors.push(FieldError::new("date", "Please choose a date"));
        }
        if !is_time(&self.time) {
          errors.push(FieldError::new("time", "Please choose a time slot"));
        }
      }
      _ => contact_errors(&mut errors, &self.name, &self.email, &self.phone),
    }
    errors
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationForm {
  pub vehicle_id: String,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub accept_terms: bool,
}

impl StepForm for ReservationForm {
  fn validate_step(&self, step: u8) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
      1 => {
        if self.vehicle_id.trim().is_empty() {
          errors.push(FieldError::new("vehicleId", "No vehicle selected for reservation"));
        }
        contact_errors(&mut errors, &self.name, &self.email, &self.phone);
      }
      _ => {
        if !self.accept_terms {
          errors.push(FieldError::new("acceptTerms", "Please accept the terms and conditions"));
        }
      }
    }
    errors
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SellCarForm {
  pub registration: String,
  pub mileage: Option<u32>,
  pub service_history: Option<String>,
  pub condition: Option<String>,
  pub photo_count: u32,
  pub name: String,
  pub email: String,
  pub phone: String,
}

pub const SELL_CAR_MAX_PHOTOS: u32 = 10;

impl StepForm for SellCarForm {
  fn validate_step(&self, step: u8) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
      1 => {
        if require(&mut errors, "registration", &self.registration, "registration")
          && !is_registration(&self.registration)
        {
          errors.push(FieldError::new("registration", "Please enter a valid registration"));
        }
        match self.mileage {
          None => errors.push(FieldError::new("mileage", "Please enter the mileage")),
          Some(m) if m > 500_000 => {
            errors.push(FieldError::new("mileage", "Mileage looks too high, please check it"))
          }
          Some(_) => {}
        }
      }
      2 => {
        if self.condition.as_deref().is_none_or(|c| c.trim().is_empty()) {
          errors.push(FieldError::new("condition", "Please describe the vehicle condition"));
        }
        if self.photo_count > SELL_CAR_MAX_PHOTOS {
          errors.push(FieldError::new(
            "photos",
            format!("Please upload at most {SELL_CAR_MAX_PHOTOS} photos"),
          ));
        }
      }
      _ => contact_errors(&mut errors, &self.name, &self.email, &self.phone),
    }
    errors
  }
}
