use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const MONEY_SCALE: u32 = 2;

/// `(score floor, share of requested amount, annual rate %)`, by descending floor.
const OFFER_TIERS: [(i32, Decimal, Decimal); 4] = [
    (750, dec!(1.00), dec!(3.5)),
    (700, dec!(0.90), dec!(5.0)),
    (650, dec!(0.75), dec!(7.5)),
    (600, dec!(0.50), dec!(12.0)),
];

const SUBPRIME_RATE: Decimal = dec!(18.0);

/// Amount and rate that would apply if the loan were approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub approved_amount: Decimal,
    pub interest_rate: Decimal,
}

pub(crate) fn to_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Computed from the score alone, whatever the decision turns out to be.
pub fn calculate_offer(score: i32, requested_amount: Decimal) -> LoanOffer {
    OFFER_TIERS
        .iter()
        .find(|(floor, _, _)| score >= *floor)
        .map(|(_, share, rate)| LoanOffer {
            approved_amount: to_money(requested_amount * *share),
            interest_rate: *rate,
        })
        .unwrap_or(LoanOffer {
            approved_amount: to_money(Decimal::ZERO),
            interest_rate: SUBPRIME_RATE,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(score: i32) -> LoanOffer {
        calculate_offer(score, dec!(10000))
    }

    #[test]
    fn amount_tiers_scale_the_request() {
        assert_eq!(offer(800).approved_amount, dec!(10000.00));
        assert_eq!(offer(750).approved_amount, dec!(10000.00));
        assert_eq!(offer(749).approved_amount, dec!(9000.00));
        assert_eq!(offer(700).approved_amount, dec!(9000.00));
        assert_eq!(offer(699).approved_amount, dec!(7500.00));
        assert_eq!(offer(650).approved_amount, dec!(7500.00));
        assert_eq!(offer(649).approved_amount, dec!(5000.00));
        assert_eq!(offer(600).approved_amount, dec!(5000.00));
        assert_eq!(offer(599).approved_amount, Decimal::ZERO);
    }

    #[test]
    fn rate_tiers_are_flat() {
        assert_eq!(offer(760).interest_rate, dec!(3.5));
        assert_eq!(offer(720).interest_rate, dec!(5.0));
        assert_eq!(offer(680).interest_rate, dec!(7.5));
        assert_eq!(offer(610).interest_rate, dec!(12.0));
        assert_eq!(offer(420).interest_rate, dec!(18.0));
        assert_eq!(
            calculate_offer(720, dec!(250)).interest_rate,
            offer(720).interest_rate
        );
    }

    #[test]
    fn amounts_carry_cents() {
        assert_eq!(offer(720).approved_amount.to_string(), "9000.00");
        assert_eq!(offer(500).approved_amount.to_string(), "0.00");
        assert_eq!(
            calculate_offer(660, dec!(1234.57)).approved_amount,
            dec!(925.93)
        );
    }
}
