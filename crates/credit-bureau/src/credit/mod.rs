//! Credit checks, bureau records, and loan applications.
//!
//! The decision core lives in [`evaluation`] and is pure; everything that touches storage or
//! randomness goes through [`CreditBureauService`] and its injected collaborators.

pub mod domain;
pub mod evaluation;
pub mod provider;
pub mod repository;
pub mod requests;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    AccountType, ApplicationId, ApplicationStatus, CreditCheckRequest, CreditDecision,
    EmploymentStatus, HistoryId, HistoryRecord, LoanApplication, LoanType, PaymentStatus,
    RiskLevel, ScoreRecord, Ssn,
};
pub use evaluation::{
    CreditDecisionEngine, DecisionResult, EvaluationError, HistorySummary, RejectionReason,
};
pub use provider::{FixedScoreProvider, RandomScoreProvider, ScoreProvider};
pub use repository::{CreditRepository, RepositoryError};
pub use requests::{
    ApplicationFilter, CreateHistoryRequest, CreateScoreRequest, LoanApplicationRequest,
    UpdateHistoryRequest, UpdateScoreRequest,
};
pub use router::credit_router;
pub use service::{CreditBureauService, CreditServiceError, ScoreWrite, SubmittedApplication};
