/* src/cli/core/src/finance.rs */

use anyhow::Result;
use clap::Args;
use forecourt_engine::{FinanceQuote, FinanceType, QuoteSummary, quote, quote_checked};

use crate::ui;

#[derive(Args)]
pub struct FinanceArgs {
  /// Cash price of the vehicle
  #[arg(long)]
  pub cash: f64,
  #[arg(long, default_value_t = 0.0)]
  pub deposit: f64,
  /// Annual percentage rate, e.g. 9.9
  #[arg(long)]
  pub apr: f64,
  /// Term in months
  #[arg(long, allow_negative_numbers = true)]
  pub months: i32,
  /// PCP balloon as a share of the monthly payment (default 0.5)
  #[arg(long)]
  pub final_percentage: Option<f64>,
  /// Hire purchase instead of PCP
  #[arg(long)]
  pub hp: bool,
  /// Reject degenerate input instead of quoting zeros
  #[arg(long)]
  pub strict: bool,
  #[arg(long, default_value = "\u{a3}")]
  pub symbol: String,
}

impl FinanceArgs {
  fn request(&self) -> FinanceQuote {
    FinanceQuote {
      total_cash: self.cash,
      deposit: self.deposit,
      apr: self.apr,
      nbr_of_months: self.months,
      final_payment_percentage: self.final_percentage,
      currency_symbol: Some(self.symbol.clone()),
      finance_type: if self.hp { FinanceType::Hp } else { FinanceType::Pcp },
    }
  }
}

fn print_summary(summary: &QuoteSummary) {
  let f = &summary.formatted;
  ui::row("Cash price", &f.cash_price);
  ui::row("Deposit", &f.deposit);
  ui::row("Amount of credit", &f.borrowing);
  ui::row(&format!("{} monthly payments", summary.nbr_of_months), &f.monthly_payment);
  if summary.finance_type == FinanceType::Pcp {
    ui::row("Optional final payment", &f.final_payment);
  }
  ui::row("Total amount payable", &f.total_amount_payable);
  ui::row("Interest", &f.amount_of_interest);
  ui::row("APR", &format!("{}%", summary.apr));
}

pub fn run_finance(args: &FinanceArgs) -> Result<()> {
  let request = args.request();
  let summary = if args.strict { quote_checked(&request)? } else { quote(&request) };
  ui::banner(if args.hp { "finance (HP)" } else { "finance (PCP)" });
  print_summary(&summary);
  Ok(())
}
