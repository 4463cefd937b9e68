use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use credit_bureau::credit::{
    ApplicationId, ApplicationStatus, CreditRepository, EmploymentStatus, HistoryId,
    HistoryRecord, LoanApplication, LoanType, RepositoryError, ScoreRecord, Ssn,
};
use serde::de::DeserializeOwned;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreState {
    scores: HashMap<Ssn, ScoreRecord>,
    history: Vec<HistoryRecord>,
    applications: Vec<LoanApplication>,
    next_history_id: u64,
}

/// Process-local store backing the HTTP service and the CLI commands.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCreditRepository {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryCreditRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("credit store mutex poisoned".to_string()))
    }
}

impl CreditRepository for InMemoryCreditRepository {
    fn find_score(&self, ssn: &Ssn) -> Result<Option<ScoreRecord>, RepositoryError> {
        Ok(self.lock()?.scores.get(ssn).cloned())
    }

    fn save_score(&self, record: ScoreRecord) -> Result<ScoreRecord, RepositoryError> {
        self.lock()?
            .scores
            .insert(record.ssn.clone(), record.clone());
        Ok(record)
    }

    fn history_for(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError> {
        Ok(self
            .lock()?
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
        Ok(self
            .lock()?
            .history
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    fn insert_history(&self, mut record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        let mut guard = self.lock()?;
        guard.next_history_id += 1;
        record.id = HistoryId(guard.next_history_id);
        guard.history.push(record.clone());
        Ok(record)
    }

    fn update_history(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
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
        Ok(self
            .lock()?
            .applications
            .iter()
            .find(|application| &application.application_id == id)
            .cloned())
    }

    fn applications(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        let mut applications = self.lock()?.applications.clone();
        applications.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        Ok(applications)
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

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))
}

pub(crate) fn parse_loan_type(raw: &str) -> Result<LoanType, String> {
    parse_wire_name(raw, "loan type")
}

pub(crate) fn parse_employment_status(raw: &str) -> Result<EmploymentStatus, String> {
    parse_wire_name(raw, "employment status")
}

fn parse_wire_name<T: DeserializeOwned>(raw: &str, kind: &str) -> Result<T, String> {
    let normalized = raw.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("'{raw}' is not a recognised {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use credit_bureau::credit::{AccountType, PaymentStatus};

    fn account(ssn: &str, is_active: bool) -> HistoryRecord {
        HistoryRecord {
            id: HistoryId(0),
            ssn: Ssn(ssn.to_string()),
            account_type: AccountType::Mortgage,
            creditor_name: "Wells Fargo".to_string(),
            original_amount: Decimal::from(250_000),
            current_balance: Some(Decimal::from(180_000)),
            credit_limit: None,
            payment_status: PaymentStatus::Current,
            days_late: 0,
            account_opened_at: None,
            last_payment_at: None,
            reported_at: Utc::now(),
            is_active,
        }
    }

    #[test]
    fn history_ids_are_assigned_sequentially() {
        let repository = InMemoryCreditRepository::default();
        let first = repository
            .insert_history(account("123-45-6789", true))
            .expect("insert");
        let second = repository
            .insert_history(account("123-45-6789", false))
            .expect("insert");

        assert_eq!(first.id, HistoryId(1));
        assert_eq!(second.id, HistoryId(2));
        let ssn = Ssn("123-45-6789".to_string());
        assert_eq!(repository.history_for(&ssn).expect("history").len(), 2);
        assert_eq!(
            repository.active_history_for(&ssn).expect("active").len(),
            1
        );
    }

    #[test]
    fn updating_unknown_history_is_not_found() {
        let repository = InMemoryCreditRepository::default();
        let mut record = account("123-45-6789", true);
        record.id = HistoryId(7);

        assert!(matches!(
            repository.update_history(record),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn parses_decimal_arguments() {
        assert_eq!(parse_decimal(" 60000.50 "), Ok(Decimal::new(6_000_050, 2)));
        assert!(parse_decimal("sixty").is_err());
    }

    #[test]
    fn parses_enum_arguments_case_insensitively() {
        assert_eq!(parse_loan_type("auto"), Ok(LoanType::Auto));
        assert_eq!(
            parse_employment_status("self-employed"),
            Ok(EmploymentStatus::SelfEmployed)
        );
        assert!(parse_loan_type("boat").is_err());
    }
}
