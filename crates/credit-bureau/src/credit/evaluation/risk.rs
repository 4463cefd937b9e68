use super::super::domain::RiskLevel;

pub(crate) const LOW_RISK_FLOOR: i32 = 700;
pub(crate) const MEDIUM_RISK_FLOOR: i32 = 600;

/// Maps a score onto its risk tier. Total over every integer.
pub fn classify(score: i32) -> RiskLevel {
    if score >= LOW_RISK_FLOOR {
        RiskLevel::Low
    } else if score >= MEDIUM_RISK_FLOOR {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_higher_tier() {
        assert_eq!(classify(700), RiskLevel::Low);
        assert_eq!(classify(699), RiskLevel::Medium);
        assert_eq!(classify(600), RiskLevel::Medium);
        assert_eq!(classify(599), RiskLevel::High);
    }

    #[test]
    fn out_of_range_scores_still_classify() {
        assert_eq!(classify(i32::MAX), RiskLevel::Low);
        assert_eq!(classify(-40), RiskLevel::High);
        assert_eq!(classify(0), RiskLevel::High);
    }
}
