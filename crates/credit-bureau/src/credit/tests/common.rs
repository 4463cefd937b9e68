use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::credit::domain::{
    AccountType, ApplicationId, ApplicationStatus, CreditCheckRequest, EmploymentStatus,
    HistoryId, HistoryRecord, LoanApplication, LoanType, PaymentStatus, ScoreRecord, Ssn,
};
use crate::credit::evaluation::classify;
use crate::credit::provider::FixedScoreProvider;
use crate::credit::repository::{CreditRepository, RepositoryError};
use crate::credit::{credit_router, CreditBureauService};

pub(crate) const APPLICANT_SSN: &str = "123-45-6789";

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn history_record(
    id: u64,
    current_balance: Option<Decimal>,
    payment_status: PaymentStatus,
) -> HistoryRecord {
    HistoryRecord {
        id: HistoryId(id),
        ssn: Ssn(APPLICANT_SSN.to_string()),
        account_type: AccountType::CreditCard,
        creditor_name: "Chase Bank".to_string(),
        original_amount: Decimal::from(5000),
        current_balance,
        credit_limit: Some(Decimal::from(5000)),
        days_late: if payment_status.is_delinquent() { 45 } else { 0 },
        payment_status,
        account_opened_at: None,
        last_payment_at: None,
        reported_at: fixed_time(),
        is_active: true,
    }
}

pub(crate) fn check_request(
    ssn: &str,
    requested_amount: i64,
    annual_income: Option<i64>,
) -> CreditCheckRequest {
    CreditCheckRequest {
        ssn: Ssn(ssn.to_string()),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        requested_amount: Decimal::from(requested_amount),
        loan_type: LoanType::Personal,
        term_months: 36,
        annual_income: annual_income.map(Decimal::from),
        employment_status: EmploymentStatus::Employed,
    }
}

pub(crate) fn score_record(ssn: &str, score: i32) -> ScoreRecord {
    ScoreRecord {
        ssn: Ssn(ssn.to_string()),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        score,
        risk_level: classify(score),
        created_at: fixed_time(),
        last_updated: fixed_time(),
    }
}

pub(crate) type TestService = CreditBureauService<MemoryRepository, FixedScoreProvider>;

pub(crate) fn build_service(fallback_score: i32) -> (TestService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CreditBureauService::new(
        repository.clone(),
        Arc::new(FixedScoreProvider(fallback_score)),
    );
    (service, repository)
}

pub(crate) fn router_with_service(service: TestService) -> axum::Router {
    credit_router(Arc::new(service))
}

#[derive(Default)]
struct MemoryState {
    scores: HashMap<Ssn, ScoreRecord>,
    history: Vec<HistoryRecord>,
    applications: Vec<LoanApplication>,
    next_history_id: u64,
}

#[derive(Default, Clone)]
pub(crate) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(crate) fn seed_history(&self, record: HistoryRecord) -> HistoryRecord {
        self.insert_history(record).expect("insert succeeds")
    }
}

impl CreditRepository for MemoryRepository {
    fn find_score(&self, ssn: &Ssn) -> Result<Option<ScoreRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.scores.get(ssn).cloned())
    }

    fn save_score(&self, record: ScoreRecord) -> Result<ScoreRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.scores.insert(record.ssn.clone(), record.clone());
        Ok(record)
    }

    fn history_for(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .history
            .iter()
            .filter(|record| &record.ssn == ssn)
            .cloned()
            .collect())
    }

    fn active_history_for(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let mut history: Vec<HistoryRecord> = self
            .history_for(ssn)?
            .into_iter()
            .filter(|record| record.is_active)
            .collect();
        history.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(history)
    }

    fn find_history(&self, id: HistoryId) -> Result<Option<HistoryRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.history.iter().find(|record| record.id == id).cloned())
    }

    fn insert_history(&self, mut record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_history_id += 1;
        record.id = HistoryId(guard.next_history_id);
        guard.history.push(record.clone());
        Ok(record)
    }

    fn update_history(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let slot = guard
            .history
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record.clone();
        Ok(record)
    }

    fn insert_application(
        &self,
        application: LoanApplication,
    ) -> Result<LoanApplication, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if guard
            .applications
            .iter()
            .any(|existing| existing.application_id == application.application_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.applications.push(application.clone());
        Ok(application)
    }

    fn find_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .applications
            .iter()
            .find(|application| &application.application_id == id)
            .cloned())
    }

    fn applications(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.applications.clone())
    }

    fn applications_for(&self, ssn: &Ssn) -> Result<Vec<LoanApplication>, RepositoryError> {
        Ok(self
            .applications()?
            .into_iter()
            .filter(|application| &application.ssn == ssn)
            .collect())
    }

    fn applications_with_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, RepositoryError> {
        Ok(self
            .applications()?
            .into_iter()
            .filter(|application| application.status == status)
            .collect())
    }
}

pub(crate) struct UnavailableRepository;

impl UnavailableRepository {
    fn offline<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CreditRepository for UnavailableRepository {
    fn find_score(&self, _ssn: &Ssn) -> Result<Option<ScoreRecord>, RepositoryError> {
        Self::offline()
    }

    fn save_score(&self, _record: ScoreRecord) -> Result<ScoreRecord, RepositoryError> {
        Self::offline()
    }

    fn history_for(&self, _ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError> {
        Self::offline()
    }

    fn active_history_for(&self, _ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError> {
        Self::offline()
    }

    fn find_history(&self, _id: HistoryId) -> Result<Option<HistoryRecord>, RepositoryError> {
        Self::offline()
    }

    fn insert_history(&self, _record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        Self::offline()
    }

    fn update_history(&self, _record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        Self::offline()
    }

    fn insert_application(
        &self,
        _application: LoanApplication,
    ) -> Result<LoanApplication, RepositoryError> {
        Self::offline()
    }

    fn find_application(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, RepositoryError> {
        Self::offline()
    }

    fn applications(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        Self::offline()
    }

    fn applications_for(&self, _ssn: &Ssn) -> Result<Vec<LoanApplication>, RepositoryError> {
        Self::offline()
    }

    fn applications_with_status(
        &self,
        _status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, RepositoryError> {
        Self::offline()
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
