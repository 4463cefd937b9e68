use super::domain::{
    ApplicationId, ApplicationStatus, HistoryId, HistoryRecord, LoanApplication, ScoreRecord, Ssn,
};

/// Storage abstraction so the service can be exercised without a database.
pub trait CreditRepository: Send + Sync {
    fn find_score(&self, ssn: &Ssn) -> Result<Option<ScoreRecord>, RepositoryError>;
    fn save_score(&self, record: ScoreRecord) -> Result<ScoreRecord, RepositoryError>;

    fn history_for(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError>;
    /// Active accounts only, most recently reported first.
    fn active_history_for(&self, ssn: &Ssn) -> Result<Vec<HistoryRecord>, RepositoryError>;
    fn find_history(&self, id: HistoryId) -> Result<Option<HistoryRecord>, RepositoryError>;
    /// Stores a new record; the store assigns the id and returns the stored copy.
    fn insert_history(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError>;
    fn update_history(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError>;

    fn insert_application(
        &self,
        application: LoanApplication,
    ) -> Result<LoanApplication, RepositoryError>;
    fn find_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<LoanApplication>, RepositoryError>;
    /// Application listings below are ordered oldest first.
    fn applications(&self) -> Result<Vec<LoanApplication>, RepositoryError>;
    fn applications_for(&self, ssn: &Ssn) -> Result<Vec<LoanApplication>, RepositoryError>;
    fn applications_with_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
