use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity key shared by score, history, and application records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ssn(pub String);

impl Ssn {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four characters only, for log lines.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.trim().chars().collect();
        let visible = chars.len().saturating_sub(4);
        let tail: String = chars[visible..].iter().collect();
        format!("***-**-{tail}")
    }
}

impl fmt::Display for Ssn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse risk tier derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Bureau score on file for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ssn: Ssn,
    pub first_name: String,
    pub last_name: String,
    pub score: i32,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    CreditCard,
    Loan,
    Mortgage,
    AutoLoan,
}

/// Reported payment standing of a tradeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "CURRENT")]
    Current,
    #[serde(rename = "LATE_30")]
    Late30,
    #[serde(rename = "LATE_60")]
    Late60,
    #[serde(rename = "LATE_90")]
    Late90,
    #[serde(rename = "CHARGED_OFF")]
    ChargedOff,
    #[serde(rename = "COLLECTIONS")]
    Collections,
}

impl PaymentStatus {
    /// Every status other than `Current` counts against the applicant.
    pub const fn is_delinquent(self) -> bool {
        !matches!(self, PaymentStatus::Current)
    }
}

/// Identifier assigned by the store when a history record is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(pub u64);

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One historical credit account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub ssn: Ssn,
    pub account_type: AccountType,
    pub creditor_name: String,
    pub original_amount: Decimal,
    pub current_balance: Option<Decimal>,
    pub credit_limit: Option<Decimal>,
    pub payment_status: PaymentStatus,
    pub days_late: u32,
    pub account_opened_at: Option<DateTime<Utc>>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub reported_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    Personal,
    Mortgage,
    Auto,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
}

/// Loan terms and income submitted alongside the applicant identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCheckRequest {
    pub ssn: Ssn,
    pub first_name: String,
    pub last_name: String,
    pub requested_amount: Decimal,
    pub loan_type: LoanType,
    pub term_months: u32,
    #[serde(default)]
    pub annual_income: Option<Decimal>,
    pub employment_status: EmploymentStatus,
}

/// Underwriting outcome produced by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditDecision {
    Approved,
    ManualReview,
    Rejected,
}

impl CreditDecision {
    pub const fn label(self) -> &'static str {
        match self {
            CreditDecision::Approved => "APPROVED",
            CreditDecision::ManualReview => "MANUAL_REVIEW",
            CreditDecision::Rejected => "REJECTED",
        }
    }
}

/// Identifier wrapper for submitted loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status tracked for a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    UnderReview,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
        }
    }
}

impl From<CreditDecision> for ApplicationStatus {
    fn from(decision: CreditDecision) -> Self {
        match decision {
            CreditDecision::Approved => ApplicationStatus::Approved,
            CreditDecision::ManualReview => ApplicationStatus::UnderReview,
            CreditDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Stored loan application together with its underwriting outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub application_id: ApplicationId,
    pub ssn: Ssn,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub requested_amount: Decimal,
    pub loan_type: LoanType,
    pub term_months: u32,
    pub annual_income: Option<Decimal>,
    pub employment_status: EmploymentStatus,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_uses_bureau_wire_names() {
        let encoded = serde_json::to_string(&PaymentStatus::Late30).expect("serializes");
        assert_eq!(encoded, "\"LATE_30\"");
        let decoded: PaymentStatus =
            serde_json::from_str("\"CHARGED_OFF\"").expect("deserializes");
        assert_eq!(decoded, PaymentStatus::ChargedOff);
    }

    #[test]
    fn masked_ssn_keeps_last_four() {
        assert_eq!(Ssn("123-45-6789".to_string()).masked(), "***-**-6789");
        assert_eq!(Ssn("42".to_string()).masked(), "***-**-42");
    }

    #[test]
    fn only_current_accounts_are_in_good_standing() {
        assert!(!PaymentStatus::Current.is_delinquent());
        for status in [
            PaymentStatus::Late30,
            PaymentStatus::Late60,
            PaymentStatus::Late90,
            PaymentStatus::ChargedOff,
            PaymentStatus::Collections,
        ] {
            assert!(status.is_delinquent(), "{status:?} should be delinquent");
        }
    }

    #[test]
    fn decisions_map_onto_application_statuses() {
        assert_eq!(
            ApplicationStatus::from(CreditDecision::ManualReview),
            ApplicationStatus::UnderReview
        );
        assert_eq!(
            ApplicationStatus::from(CreditDecision::Rejected).label(),
            "REJECTED"
        );
    }
}
