/* src/server/engine/rust/src/finance.rs */

//! Reducing-balance finance maths for PCP/HP quotes.
//!
//! Every money value is rounded to 2 dp at the step that derives it, and the
//! rounded value is what feeds the next step. Rounding once at the end gives
//! different pennies, so the staging here is part of the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FINAL_PAYMENT_PERCENTAGE: f64 = 0.5;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "\u{a3}";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceInputs {
  pub total_cash: f64,
  pub deposit: f64,
  pub apr: f64,
  pub nbr_of_months: i32,
  #[serde(default = "default_final_payment_percentage")]
  pub final_payment_percentage: f64,
}

fn default_final_payment_percentage() -> f64 {
  DEFAULT_FINAL_PAYMENT_PERCENTAGE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceCalculations {
  pub borrowing: f64,
  pub monthly_payment: f64,
  pub final_payment: f64,
  pub total_amount_payable: f64,
  pub amount_of_interest: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceType {
  #[default]
  Pcp,
  Hp,
}

/// Round half away from zero to 2 decimal places.
pub fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// Amount borrowed. Not floored: a deposit above the price yields a negative value.
pub fn calculate_borrowing(total_cash: f64, deposit: f64) -> f64 {
  round2(total_cash - deposit)
}

pub fn calculate_monthly_payment(principal: f64, apr_percent: f64, months: i32) -> f64 {
  if months <= 0 || principal <= 0.0 {
    return 0.0;
  }
  let n = f64::from(months);
  let rate = apr_percent / 100.0 / 12.0;
  if rate == 0.0 {
    return round2(principal / n);
  }
  let growth = (1.0 + rate).powf(n);
  let denominator = growth - 1.0;
  if denominator == 0.0 {
    return 0.0;
  }
  round2(principal * rate * growth / denominator)
}

pub fn calculate_total_amount_payable(
  monthly_payment: f64,
  months: i32,
  final_payment: f64,
) -> f64 {
  round2(monthly_payment * f64::from(months) + final_payment)
}

pub fn calculate_amount_of_interest(total_amount_payable: f64, borrowing: f64) -> f64 {
  round2(total_amount_payable - borrowing)
}

/// Staged calculation: borrowing -> monthly -> final -> total -> interest.
/// Degenerate inputs produce zeros rather than errors.
pub fn calculate_finance(inputs: &FinanceInputs) -> FinanceCalculations {
  let borrowing = calculate_borrowing(inputs.total_cash, inputs.deposit);
  let monthly_payment = calculate_monthly_payment(borrowing, inputs.apr, inputs.nbr_of_months);
  let final_payment = round2(monthly_payment * inputs.final_payment_percentage);
  let total_amount_payable =
    calculate_total_amount_payable(monthly_payment, inputs.nbr_of_months, final_payment);
  let amount_of_interest = calculate_amount_of_interest(total_amount_payable, borrowing);
  FinanceCalculations {
    borrowing,
    monthly_payment,
    final_payment,
    total_amount_payable,
    amount_of_interest,
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidFinanceInput {
  NotFinite(&'static str),
  NonPositiveTerm(i32),
  NonPositiveBorrowing(f64),
  NegativeApr(f64),
  FinalPaymentOutOfRange(f64),
}

impl fmt::Display for InvalidFinanceInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFinite(field) => write!(f, "{field} must be a finite number"),
      Self::NonPositiveTerm(months) => write!(f, "term must be at least one month, got {months}"),
      Self::NonPositiveBorrowing(amount) => {
        write!(f, "deposit must be less than the cash price (borrowing {amount:.2})")
      }
      Self::NegativeApr(apr) => write!(f, "APR must not be negative, got {apr}"),
      Self::FinalPaymentOutOfRange(pct) => {
        write!(f, "final payment percentage must be within 0..=1, got {pct}")
      }
    }
  }
}

impl std::error::Error for InvalidFinanceInput {}

/// Strict variant of [`calculate_finance`] that reports why an input would
/// have been silently zeroed.
pub fn calculate_finance_checked(
  inputs: &FinanceInputs,
) -> Result<FinanceCalculations, InvalidFinanceInput> {
  let numbers = [
    ("totalCash", inputs.total_cash),
    ("deposit", inputs.deposit),
    ("apr", inputs.apr),
    ("finalPaymentPercentage", inputs.final_payment_percentage),
  ];
  if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
    return Err(InvalidFinanceInput::NotFinite(*field));
  }
  if inputs.nbr_of_months <= 0 {
    return Err(InvalidFinanceInput::NonPositiveTerm(inputs.nbr_of_months));
  }
  if inputs.apr < 0.0 {
    return Err(InvalidFinanceInput::NegativeApr(inputs.apr));
  }
  if !(0.0..=1.0).contains(&inputs.final_payment_percentage) {
    return Err(InvalidFinanceInput::FinalPaymentOutOfRange(inputs.final_payment_percentage));
  }
  let borrowing = calculate_borrowing(inputs.total_cash, inputs.deposit);
  if borrowing <= 0.0 {
    return Err(InvalidFinanceInput::NonPositiveBorrowing(borrowing));
  }
  Ok(calculate_finance(inputs))
}

/// Symbol, two decimals, comma thousands separators: `£1,234.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
  if amount.is_nan() {
    return format!("{symbol}NaN");
  }
  if amount.is_infinite() {
    let sign = if amount < 0.0 { "-" } else { "" };
    return format!("{symbol}{sign}Infinity");
  }
  let fixed = format!("{amount:.2}");
  let (sign, digits) = match fixed.strip_prefix('-') {
    Some(rest) => ("-", rest),
    None => ("", fixed.as_str()),
  };
  let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  format!("{symbol}{sign}{grouped}.{fraction}")
}

/// Quote request as posted by vehicle and finance pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceQuote {
  pub total_cash: f64,
  pub deposit: f64,
  pub apr: f64,
  pub nbr_of_months: i32,
  #[serde(default)]
  pub final_payment_percentage: Option<f64>,
  #[serde(default)]
  pub currency_symbol: Option<String>,
  #[serde(default)]
  pub finance_type: FinanceType,
}

impl FinanceQuote {
  /// HP amortises fully, so its final payment share is always zero.
  pub fn inputs(&self) -> FinanceInputs {
    let final_payment_percentage = match self.finance_type {
      FinanceType::Hp => 0.0,
      FinanceType::Pcp => self.final_payment_percentage.unwrap_or(DEFAULT_FINAL_PAYMENT_PERCENTAGE),
    };
    FinanceInputs {
      total_cash: self.total_cash,
      deposit: self.deposit,
      apr: self.apr,
      nbr_of_months: self.nbr_of_months,
      final_payment_percentage,
    }
  }

  pub fn symbol(&self) -> &str {
    self.currency_symbol.as_deref().unwrap_or(DEFAULT_CURRENCY_SYMBOL)
  }
}

/// Figures plus display strings for a representative example disclosure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
  pub finance_type: FinanceType,
  pub apr: f64,
  pub nbr_of_months: i32,
  pub calculations: FinanceCalculations,
  pub formatted: FormattedFigures,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFigures {
  pub cash_price: String,
  pub deposit: String,
  pub borrowing: String,
  pub monthly_payment: String,
  pub final_payment: String,
  pub total_amount_payable: String,
  pub amount_of_interest: String,
}

fn summarize(quote: &FinanceQuote, calculations: FinanceCalculations) -> QuoteSummary {
  let symbol = quote.symbol();
  QuoteSummary {
    finance_type: quote.finance_type,
    apr: quote.apr,
    nbr_of_months: quote.nbr_of_months,
    formatted: FormattedFigures {
      cash_price: format_currency(quote.total_cash, symbol),
      deposit: format_currency(quote.deposit, symbol),
      borrowing: format_currency(calculations.borrowing, symbol),
      monthly_payment: format_currency(calculations.monthly_payment, symbol),
      final_payment: format_currency(calculations.final_payment, symbol),
      total_amount_payable: format_currency(calculations.total_amount_payable, symbol),
      amount_of_interest: format_currency(calculations.amount_of_interest, symbol),
    },
    calculations,
  }
}

pub fn quote(request: &FinanceQuote) -> QuoteSummary {
  summarize(request, calculate_finance(&request.inputs()))
}

pub fn quote_checked(request: &FinanceQuote) -> Result<QuoteSummary, InvalidFinanceInput> {
  let calculations = calculate_finance_checked(&request.inputs())?;
  Ok(summarize(request, calculations))
}
