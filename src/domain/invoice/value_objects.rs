use std::fmt;
use std::str::FromStr;

/// Rate applied to the invoice amount to derive the fee
pub const FEE_RATE: f64 = 0.04;

/// Rate applied to the fee to derive the tax
pub const TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("'status' must be one of [unprocessed, processing, paid, error], but got {0}")]
  InvalidStatus(String),

  #[error("'amount' is out of range: {0}")]
  AmountOutOfRange(i64),
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
  Unprocessed,
  Processing,
  Paid,
  Error,
}

impl InvoiceStatus {
  pub const ALL: [InvoiceStatus; 4] = [
    InvoiceStatus::Unprocessed,
    InvoiceStatus::Processing,
    InvoiceStatus::Paid,
    InvoiceStatus::Error,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Unprocessed => "unprocessed",
      InvoiceStatus::Processing => "processing",
      InvoiceStatus::Paid => "paid",
      InvoiceStatus::Error => "error",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  // Exact match only: "Paid" or " paid" are rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    InvoiceStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| ValueObjectError::InvalidStatus(s.to_string()))
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
