use serde::{Deserialize, Serialize};

use super::super::domain::HistoryRecord;
use super::aggregate::delinquent_count;

const VERY_LOW_SCORE: i32 = 500;
const MAX_DELINQUENT_ACCOUNTS: usize = 2;

/// Most salient reason behind a rejection, used for adverse action notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    ScoreTooLow,
    TooManyDelinquentAccounts,
    ProfileBelowCriteria,
}

impl RejectionReason {
    pub fn summary(&self) -> &'static str {
        match self {
            RejectionReason::ScoreTooLow => "Credit score too low",
            RejectionReason::TooManyDelinquentAccounts => "Too many delinquent accounts",
            RejectionReason::ProfileBelowCriteria => {
                "Credit profile does not meet lending criteria"
            }
        }
    }
}

pub fn explain_rejection(score: i32, history: &[HistoryRecord]) -> RejectionReason {
    if score < VERY_LOW_SCORE {
        return RejectionReason::ScoreTooLow;
    }

    if delinquent_count(history) > MAX_DELINQUENT_ACCOUNTS {
        return RejectionReason::TooManyDelinquentAccounts;
    }

    RejectionReason::ProfileBelowCriteria
}
