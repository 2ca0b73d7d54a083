//! Scholarship recontribution estimate
//!
//! Students holding the support scholarship return a share of it that depends on
//! their general CUM. The share tiers are fixed; the base amount is configurable.

use serde::Serialize;

/// Base support amount used when the configuration does not set one
pub const DEFAULT_BASE_AMOUNT: f64 = 4964.0;

/// Performance tier determining the recontribution share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecontributionTier {
    /// CUM ≥ 9.0
    Excellent,
    /// 8.0 ≤ CUM < 9.0
    VeryGood,
    /// 7.0 ≤ CUM < 8.0
    Good,
    /// CUM < 7.0
    Low,
}

impl RecontributionTier {
    /// Tier for a general CUM
    #[must_use]
    pub fn for_cum(cum: f64) -> Self {
        if cum >= 9.0 {
            Self::Excellent
        } else if cum >= 8.0 {
            Self::VeryGood
        } else if cum >= 7.0 {
            Self::Good
        } else {
            Self::Low
        }
    }

    /// Share of the base amount to return, in percent
    #[must_use]
    pub const fn percentage(self) -> f64 {
        match self {
            Self::Excellent => 5.0,
            Self::VeryGood => 10.0,
            Self::Good => 20.0,
            Self::Low => 100.0,
        }
    }

    /// Human-readable tier description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent academic performance",
            Self::VeryGood => "Very good academic performance",
            Self::Good => "Good academic performance",
            Self::Low => "Low academic performance",
        }
    }
}

/// Result of [`estimate_recontribution`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipEstimate {
    /// CUM the estimate was computed from
    pub cum: f64,
    /// Applicable tier
    pub tier: RecontributionTier,
    /// Base support amount
    pub base_amount: f64,
    /// Share to return, in percent
    pub percentage: f64,
    /// Amount to return
    pub amount: f64,
}

/// Estimate how much of `base_amount` must be returned for a given general CUM
#[must_use]
pub fn estimate_recontribution(general_cum: f64, base_amount: f64) -> ScholarshipEstimate {
    let tier = RecontributionTier::for_cum(general_cum);
    let percentage = tier.percentage();
    ScholarshipEstimate {
        cum: general_cum,
        tier,
        base_amount,
        percentage,
        amount: base_amount * percentage / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_by_cum() {
        assert_eq!(RecontributionTier::for_cum(9.0), RecontributionTier::Excellent);
        assert_eq!(RecontributionTier::for_cum(8.9), RecontributionTier::VeryGood);
        assert_eq!(RecontributionTier::for_cum(7.0), RecontributionTier::Good);
        assert_eq!(RecontributionTier::for_cum(6.9), RecontributionTier::Low);
        assert_eq!(RecontributionTier::for_cum(0.0), RecontributionTier::Low);
    }

    #[test]
    fn amount_is_share_of_base() {
        let estimate = estimate_recontribution(8.2, DEFAULT_BASE_AMOUNT);
        assert_eq!(estimate.tier, RecontributionTier::VeryGood);
        assert!((estimate.amount - 496.4).abs() < 1e-9);

        let low = estimate_recontribution(5.0, 1000.0);
        assert!((low.amount - 1000.0).abs() < 1e-9);
    }
}
