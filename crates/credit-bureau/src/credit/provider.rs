//! Fallback scores for identities the bureau has never seen.
//!
//! The engine never draws random numbers itself; the service asks a [`ScoreProvider`] for a
//! starting score and persists the result before evaluating.

use rand::Rng;

use super::domain::CreditCheckRequest;

pub const MIN_BUREAU_SCORE: i32 = 300;
pub const MAX_BUREAU_SCORE: i32 = 850;

pub trait ScoreProvider: Send + Sync {
    fn default_score(&self, request: &CreditCheckRequest) -> i32;
}

/// Uniformly random score in `[300, 850)`, for demo deployments without seeded data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScoreProvider;

impl ScoreProvider for RandomScoreProvider {
    fn default_score(&self, _request: &CreditCheckRequest) -> i32 {
        let mut rng = rand::thread_rng();
        rng.gen_range(MIN_BUREAU_SCORE..MAX_BUREAU_SCORE)
    }
}

/// Always answers with the same score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScoreProvider(pub i32);

impl ScoreProvider for FixedScoreProvider {
    fn default_score(&self, _request: &CreditCheckRequest) -> i32 {
        self.0
    }
}
