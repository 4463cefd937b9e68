use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::super::domain::HistoryRecord;
use super::EvaluationError;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const RATIO_SCALE: u32 = 2;

/// Signals the decision engine reads from an applicant's account history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSignals {
    pub debt_to_income_ratio: Decimal,
    pub delinquent_count: usize,
}

pub(crate) fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Annual income divided by twelve, rounded to cents.
pub fn monthly_income(annual_income: Option<Decimal>) -> Result<Decimal, EvaluationError> {
    let annual_income = annual_income.ok_or(EvaluationError::MissingIncome)?;
    if annual_income <= Decimal::ZERO {
        return Err(EvaluationError::NonPositiveIncome { annual_income });
    }

    let monthly = round_half_up(annual_income / MONTHS_PER_YEAR);
    if monthly.is_zero() {
        // Sub-cent monthly income would still divide by zero below.
        return Err(EvaluationError::NonPositiveIncome { annual_income });
    }
    Ok(monthly)
}

/// Sum of reported balances over monthly income. Records without a balance are skipped.
pub fn debt_to_income_ratio(
    history: &[HistoryRecord],
    annual_income: Option<Decimal>,
) -> Result<Decimal, EvaluationError> {
    let monthly = monthly_income(annual_income)?;
    let total_debt = history
        .iter()
        .filter_map(|record| record.current_balance)
        .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance).ok_or(total))
        .map_err(|total_debt| EvaluationError::RatioOverflow { total_debt })?;

    let ratio = total_debt
        .checked_div(monthly)
        .ok_or(EvaluationError::RatioOverflow { total_debt })?;
    Ok(round_half_up(ratio))
}

pub fn delinquent_count(history: &[HistoryRecord]) -> usize {
    history
        .iter()
        .filter(|record| record.payment_status.is_delinquent())
        .count()
}

pub fn aggregate(
    history: &[HistoryRecord],
    annual_income: Option<Decimal>,
) -> Result<AccountSignals, EvaluationError> {
    Ok(AccountSignals {
        debt_to_income_ratio: debt_to_income_ratio(history, annual_income)?,
        delinquent_count: delinquent_count(history),
    })
}
