//! Payment Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Card,
    NetBanking,
    CashOnDelivery,
    Credit,
}

/// Payment method parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised payment method \"{0}\"")]
pub struct InvalidPaymentMethod(pub String);

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::NetBanking => "netbanking",
            Self::CashOnDelivery => "cod",
            Self::Credit => "credit",
        }
    }

    /// Offline/deferred methods settle after delivery; a payment record is
    /// written at placement time. Online methods settle through the gateway
    /// callback instead.
    #[must_use]
    pub const fn is_offline(self) -> bool {
        matches!(self, Self::CashOnDelivery | Self::Credit)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = InvalidPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "netbanking" => Ok(Self::NetBanking),
            "cod" => Ok(Self::CashOnDelivery),
            "credit" => Ok(Self::Credit),
            other => Err(InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// Settlement state of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Payment status parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised payment status \"{0}\"")]
pub struct InvalidPaymentStatus(pub String);

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = InvalidPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(InvalidPaymentStatus(other.to_string())),
        }
    }
}

/// Payment Model
#[derive(Debug, Clone)]
pub struct Payment {
    pub uuid: Uuid,
    pub order_uuid: Uuid,
    pub user_uuid: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    /// Credit purchases fall due after a grace period; everything else has no
    /// due date.
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// New Payment Model
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub uuid: Uuid,
    pub order_uuid: Uuid,
    pub user_uuid: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub due_date: Option<Timestamp>,
}
