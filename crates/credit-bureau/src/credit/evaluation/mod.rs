mod aggregate;
mod offer;
mod policy;
mod rejection;
mod risk;

pub use aggregate::{
    aggregate, debt_to_income_ratio, delinquent_count, monthly_income, AccountSignals,
};
pub use offer::{calculate_offer, LoanOffer};
pub use policy::{decide, decide_with, MAX_AUTO_APPROVAL_RATIO};
pub use rejection::{explain_rejection, RejectionReason};
pub use risk::classify;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    AccountType, CreditCheckRequest, CreditDecision, HistoryRecord, PaymentStatus, RiskLevel,
    ScoreRecord, Ssn,
};

/// Malformed numeric input that prevents an evaluation from completing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("annual income is required to compute the debt-to-income ratio")]
    MissingIncome,
    #[error("annual income must be positive (got {annual_income})")]
    NonPositiveIncome { annual_income: Decimal },
    #[error("debt-to-income ratio overflowed for total debt {total_debt}")]
    RatioOverflow { total_debt: Decimal },
}

/// Account line echoed back with a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub account_type: AccountType,
    pub creditor_name: String,
    pub current_balance: Option<Decimal>,
    pub payment_status: PaymentStatus,
    pub days_late: u32,
}

impl From<&HistoryRecord> for HistorySummary {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            account_type: record.account_type,
            creditor_name: record.creditor_name.clone(),
            current_balance: record.current_balance,
            payment_status: record.payment_status,
            days_late: record.days_late,
        }
    }
}

/// Assembled underwriting result for one credit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub ssn: Ssn,
    pub first_name: String,
    pub last_name: String,
    pub credit_score: i32,
    pub risk_level: RiskLevel,
    pub approved: bool,
    pub decision: CreditDecision,
    pub rejection_reason: Option<String>,
    pub approved_amount: Decimal,
    pub recommended_interest_rate: Decimal,
    pub credit_history: Vec<HistorySummary>,
    pub checked_at: DateTime<Utc>,
}

/// Stateless underwriting engine. Every call is a pure function of its arguments plus the
/// evaluation timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditDecisionEngine;

impl CreditDecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        score: &ScoreRecord,
        history: &[HistoryRecord],
        request: &CreditCheckRequest,
    ) -> Result<DecisionResult, EvaluationError> {
        self.evaluate_at(score, history, request, Utc::now())
    }

    pub fn evaluate_at(
        &self,
        score: &ScoreRecord,
        history: &[HistoryRecord],
        request: &CreditCheckRequest,
        checked_at: DateTime<Utc>,
    ) -> Result<DecisionResult, EvaluationError> {
        let credit_score = score.score;

        let decision = decide_with(credit_score, || {
            debt_to_income_ratio(history, request.annual_income)
        })?;
        let offer = calculate_offer(credit_score, request.requested_amount);

        let (approved_amount, rejection_reason) = match decision {
            CreditDecision::Rejected => {
                let reason = explain_rejection(credit_score, history);
                (
                    offer::to_money(Decimal::ZERO),
                    Some(reason.summary().to_string()),
                )
            }
            _ => (offer.approved_amount, None),
        };

        debug!(
            ssn = %score.ssn,
            credit_score,
            decision = decision.label(),
            accounts = history.len(),
            "credit decision evaluated"
        );

        Ok(DecisionResult {
            ssn: score.ssn.clone(),
            first_name: score.first_name.clone(),
            last_name: score.last_name.clone(),
            credit_score,
            risk_level: classify(credit_score),
            approved: decision == CreditDecision::Approved,
            decision,
            rejection_reason,
            approved_amount,
            recommended_interest_rate: offer.interest_rate,
            credit_history: history.iter().map(HistorySummary::from).collect(),
            checked_at,
        })
    }
}
