use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{
    AccountType, ApplicationStatus, CreditCheckRequest, PaymentStatus, RiskLevel, Ssn,
};

/// Create (or overwrite) the score on file for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScoreRequest {
    pub ssn: Ssn,
    pub first_name: String,
    pub last_name: String,
    pub score: i32,
    /// Explicit override; derived from `score` when absent.
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScoreRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHistoryRequest {
    pub ssn: Ssn,
    pub account_type: AccountType,
    pub creditor_name: String,
    pub original_amount: Decimal,
    #[serde(default)]
    pub current_balance: Option<Decimal>,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub days_late: Option<u32>,
    #[serde(default)]
    pub account_opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_payment_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHistoryRequest {
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub creditor_name: Option<String>,
    #[serde(default)]
    pub original_amount: Option<Decimal>,
    #[serde(default)]
    pub current_balance: Option<Decimal>,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub days_late: Option<u32>,
    #[serde(default)]
    pub account_opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_payment_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Loan application intake: the credit check inputs plus contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplicationRequest {
    #[serde(flatten)]
    pub applicant: CreditCheckRequest,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Query filter for listing applications. Both fields are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default)]
    pub ssn: Option<Ssn>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
}
