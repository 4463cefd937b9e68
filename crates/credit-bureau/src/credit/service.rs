use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    ApplicationId, CreditCheckRequest, HistoryId, HistoryRecord, LoanApplication, ScoreRecord, Ssn,
};
use super::evaluation::{classify, CreditDecisionEngine, DecisionResult, EvaluationError};
use super::provider::{ScoreProvider, MAX_BUREAU_SCORE, MIN_BUREAU_SCORE};
use super::repository::{CreditRepository, RepositoryError};
use super::requests::{
    ApplicationFilter, CreateHistoryRequest, CreateScoreRequest, LoanApplicationRequest,
    UpdateHistoryRequest, UpdateScoreRequest,
};

/// Whether a score upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreWrite {
    Created,
    Updated,
}

/// Stored application together with the credit check that decided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedApplication {
    pub application: LoanApplication,
    pub credit_check: DecisionResult,
}

/// Service composing the store, the fallback score provider, and the decision engine.
pub struct CreditBureauService<R, P: ?Sized> {
    repository: Arc<R>,
    provider: Arc<P>,
    engine: CreditDecisionEngine,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("LA-{id:06}"))
}

fn require_ssn(ssn: &Ssn) -> Result<(), CreditServiceError> {
    if ssn.as_str().trim().is_empty() {
        return Err(CreditServiceError::Input("ssn must not be empty".to_string()));
    }
    Ok(())
}

fn require_bureau_range(score: i32) -> Result<(), CreditServiceError> {
    if !(MIN_BUREAU_SCORE..=MAX_BUREAU_SCORE).contains(&score) {
        return Err(CreditServiceError::Input(format!(
            "score {score} outside bureau range {MIN_BUREAU_SCORE}-{MAX_BUREAU_SCORE}"
        )));
    }
    Ok(())
}

fn validate_check_request(request: &CreditCheckRequest) -> Result<(), CreditServiceError> {
    require_ssn(&request.ssn)?;
    if request.requested_amount < Decimal::ZERO {
        return Err(CreditServiceError::Input(
            "requested_amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

impl<R, P> CreditBureauService<R, P>
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>, provider: Arc<P>) -> Self {
        Self {
            repository,
            provider,
            engine: CreditDecisionEngine::new(),
        }
    }

    /// Resolve the score and active accounts for the applicant, then run the engine once.
    pub fn perform_credit_check(
        &self,
        request: &CreditCheckRequest,
    ) -> Result<DecisionResult, CreditServiceError> {
        validate_check_request(request)?;
        info!(ssn = %request.ssn.masked(), "performing credit check");

        let score = match self.repository.find_score(&request.ssn)? {
            Some(record) => record,
            None => self.materialize_score(request)?,
        };
        let history = self.repository.active_history_for(&request.ssn)?;

        let result = self.engine.evaluate(&score, &history, request)?;
        info!(
            ssn = %request.ssn.masked(),
            decision = result.decision.label(),
            "credit check complete"
        );
        Ok(result)
    }

    fn materialize_score(
        &self,
        request: &CreditCheckRequest,
    ) -> Result<ScoreRecord, CreditServiceError> {
        let score = self.provider.default_score(request);
        info!(
            ssn = %request.ssn.masked(),
            score,
            "no score on file, storing provider default"
        );

        let now = Utc::now();
        let record = ScoreRecord {
            ssn: request.ssn.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            score,
            risk_level: classify(score),
            created_at: now,
            last_updated: now,
        };
        Ok(self.repository.save_score(record)?)
    }

    pub fn get_score(&self, ssn: &Ssn) -> Result<ScoreRecord, CreditServiceError> {
        self.repository
            .find_score(ssn)?
            .ok_or_else(|| CreditServiceError::ScoreNotFound(ssn.clone()))
    }

    pub fn get_history(
        &self,
        ssn: &Ssn,
        active_only: bool,
    ) -> Result<Vec<HistoryRecord>, CreditServiceError> {
        let history = if active_only {
            self.repository.active_history_for(ssn)?
        } else {
            self.repository.history_for(ssn)?
        };
        Ok(history)
    }

    /// Accounts not in good standing, most days late first.
    pub fn delinquent_history(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, CreditServiceError> {
        let mut history: Vec<HistoryRecord> = self
            .repository
            .history_for(ssn)?
            .into_iter()
            .filter(|record| record.payment_status.is_delinquent())
            .collect();
        history.sort_by(|a, b| b.days_late.cmp(&a.days_late));
        Ok(history)
    }

    /// Upsert: an existing record keeps its `created_at` and takes every other field from the
    /// request.
    pub fn create_score(
        &self,
        request: CreateScoreRequest,
    ) -> Result<(ScoreRecord, ScoreWrite), CreditServiceError> {
        require_ssn(&request.ssn)?;
        require_bureau_range(request.score)?;
        info!(ssn = %request.ssn.masked(), "creating credit score");

        let now = Utc::now();
        let risk_level = request
            .risk_level
            .unwrap_or_else(|| classify(request.score));

        let (created_at, write) = match self.repository.find_score(&request.ssn)? {
            Some(existing) => {
                warn!(
                    ssn = %request.ssn.masked(),
                    "credit score already exists, updating existing record"
                );
                (existing.created_at, ScoreWrite::Updated)
            }
            None => (now, ScoreWrite::Created),
        };

        let record = ScoreRecord {
            ssn: request.ssn,
            first_name: request.first_name,
            last_name: request.last_name,
            score: request.score,
            risk_level,
            created_at,
            last_updated: now,
        };
        let stored = self.repository.save_score(record)?;
        Ok((stored, write))
    }

    pub fn update_score(
        &self,
        ssn: &Ssn,
        request: UpdateScoreRequest,
    ) -> Result<ScoreRecord, CreditServiceError> {
        if let Some(score) = request.score {
            require_bureau_range(score)?;
        }
        info!(ssn = %ssn.masked(), "updating credit score");

        let existing = self.get_score(ssn)?;
        let risk_level = match (request.risk_level, request.score) {
            (Some(level), _) => level,
            (None, Some(score)) => classify(score),
            (None, None) => existing.risk_level,
        };

        let record = ScoreRecord {
            ssn: existing.ssn,
            first_name: request.first_name.unwrap_or(existing.first_name),
            last_name: request.last_name.unwrap_or(existing.last_name),
            score: request.score.unwrap_or(existing.score),
            risk_level,
            created_at: existing.created_at,
            last_updated: Utc::now(),
        };
        Ok(self.repository.save_score(record)?)
    }

    pub fn create_history(
        &self,
        request: CreateHistoryRequest,
    ) -> Result<HistoryRecord, CreditServiceError> {
        require_ssn(&request.ssn)?;
        info!(ssn = %request.ssn.masked(), "creating credit history");

        let record = HistoryRecord {
            id: HistoryId(0),
            ssn: request.ssn,
            account_type: request.account_type,
            creditor_name: request.creditor_name,
            original_amount: request.original_amount,
            current_balance: request.current_balance,
            credit_limit: request.credit_limit,
            payment_status: request.payment_status,
            days_late: request.days_late.unwrap_or(0),
            account_opened_at: request.account_opened_at,
            last_payment_at: request.last_payment_at,
            reported_at: Utc::now(),
            is_active: request.is_active.unwrap_or(true),
        };
        Ok(self.repository.insert_history(record)?)
    }

    pub fn update_history(
        &self,
        id: HistoryId,
        request: UpdateHistoryRequest,
    ) -> Result<HistoryRecord, CreditServiceError> {
        info!(history_id = %id, "updating credit history record");

        let existing = self
            .repository
            .find_history(id)?
            .ok_or(CreditServiceError::HistoryNotFound(id))?;

        let record = HistoryRecord {
            id: existing.id,
            ssn: existing.ssn,
            account_type: request.account_type.unwrap_or(existing.account_type),
            creditor_name: request.creditor_name.unwrap_or(existing.creditor_name),
            original_amount: request.original_amount.unwrap_or(existing.original_amount),
            current_balance: request.current_balance.or(existing.current_balance),
            credit_limit: request.credit_limit.or(existing.credit_limit),
            payment_status: request.payment_status.unwrap_or(existing.payment_status),
            days_late: request.days_late.unwrap_or(existing.days_late),
            account_opened_at: request.account_opened_at.or(existing.account_opened_at),
            last_payment_at: request.last_payment_at.or(existing.last_payment_at),
            reported_at: Utc::now(),
            is_active: request.is_active.unwrap_or(existing.is_active),
        };
        Ok(self.repository.update_history(record)?)
    }

    /// Run a credit check for the applicant and persist the application with its outcome.
    pub fn submit_application(
        &self,
        request: LoanApplicationRequest,
    ) -> Result<SubmittedApplication, CreditServiceError> {
        let applied_at = Utc::now();
        let credit_check = self.perform_credit_check(&request.applicant)?;

        let LoanApplicationRequest {
            applicant,
            email,
            phone,
        } = request;
        let application = LoanApplication {
            application_id: next_application_id(),
            ssn: applicant.ssn,
            first_name: applicant.first_name,
            last_name: applicant.last_name,
            email,
            phone,
            requested_amount: applicant.requested_amount,
            loan_type: applicant.loan_type,
            term_months: applicant.term_months,
            annual_income: applicant.annual_income,
            employment_status: applicant.employment_status,
            status: credit_check.decision.into(),
            rejection_reason: credit_check.rejection_reason.clone(),
            applied_at,
            processed_at: Some(credit_check.checked_at),
        };

        let application = self.repository.insert_application(application)?;
        info!(
            application_id = %application.application_id,
            status = application.status.label(),
            "loan application recorded"
        );
        Ok(SubmittedApplication {
            application,
            credit_check,
        })
    }

    pub fn get_application(
        &self,
        id: &ApplicationId,
    ) -> Result<LoanApplication, CreditServiceError> {
        self.repository
            .find_application(id)?
            .ok_or_else(|| CreditServiceError::ApplicationNotFound(id.clone()))
    }

    pub fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<LoanApplication>, CreditServiceError> {
        let applications = match (&filter.ssn, filter.status) {
            (Some(ssn), status) => self
                .repository
                .applications_for(ssn)?
                .into_iter()
                .filter(|application| status.map_or(true, |status| application.status == status))
                .collect(),
            (None, Some(status)) => self.repository.applications_with_status(status)?,
            (None, None) => self.repository.applications()?,
        };
        Ok(applications)
    }
}

/// Error raised by the credit bureau service.
#[derive(Debug, thiserror::Error)]
pub enum CreditServiceError {
    #[error("invalid request: {0}")]
    Input(String),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("credit score not found for SSN {}", .0.masked())]
    ScoreNotFound(Ssn),
    #[error("credit history record not found with id {0}")]
    HistoryNotFound(HistoryId),
    #[error("loan application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
