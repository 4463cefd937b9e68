use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::domain::CreditDecision;
use super::risk::{LOW_RISK_FLOOR, MEDIUM_RISK_FLOOR};

/// Highest debt-to-income ratio a mid-tier score may carry and still auto-approve.
pub const MAX_AUTO_APPROVAL_RATIO: Decimal = dec!(0.40);

/// Decides with an already computed ratio.
pub fn decide(score: i32, debt_to_income_ratio: Decimal) -> CreditDecision {
    match decide_with(score, || Ok::<_, std::convert::Infallible>(debt_to_income_ratio)) {
        Ok(decision) => decision,
        Err(never) => match never {},
    }
}

/// Tier cascade, first match wins. `ratio` is only invoked for mid-tier scores, so callers can
/// defer income validation to the one band that needs it.
pub fn decide_with<F, E>(score: i32, ratio: F) -> Result<CreditDecision, E>
where
    F: FnOnce() -> Result<Decimal, E>,
{
    if score >= LOW_RISK_FLOOR {
        return Ok(CreditDecision::Approved);
    }

    if score >= MEDIUM_RISK_FLOOR {
        let ratio = ratio()?;
        return Ok(if ratio <= MAX_AUTO_APPROVAL_RATIO {
            CreditDecision::Approved
        } else {
            CreditDecision::ManualReview
        });
    }

    Ok(CreditDecision::Rejected)
}
