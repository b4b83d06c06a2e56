//! Static regime playbook shown alongside a non-empty report.

use serde::Serialize;
use sentiment_desk_core::Classification;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeGuidance {
    pub regime: Classification,
    pub observations: &'static [&'static str],
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub title: &'static str,
    pub regimes: &'static [RegimeGuidance],
    pub insight: &'static [&'static str],
    pub benefits: &'static [&'static str],
    pub conclusion: &'static str,
}

static REGIMES: [RegimeGuidance; 5] = [
    RegimeGuidance {
        regime: Classification::ExtremeGreed,
        observations: &[
            "Highest average PnL observed but accompanied by elevated volatility.",
            "Momentum-driven trades perform well, but reversal risk increases sharply.",
            "Avoid over-leveraging during late-stage greed cycles.",
        ],
        recommendation: "Deploy momentum strategies with strict stop-loss and predefined profit booking.",
    },
    RegimeGuidance {
        regime: Classification::Greed,
        observations: &[
            "Moderate win rate with controlled volatility.",
            "Directional bias present (long dominance observed).",
        ],
        recommendation: "Use trend-following setups with disciplined position sizing.",
    },
    RegimeGuidance {
        regime: Classification::Fear,
        observations: &[
            "Reduced win rate compared to greed phases.",
            "Volatility remains elevated with inconsistent profitability.",
        ],
        recommendation: "Reduce exposure, tighten risk controls, and prioritize capital protection.",
    },
    RegimeGuidance {
        regime: Classification::ExtremeFear,
        observations: &[
            "Lowest stability in performance and suppressed win rate.",
            "Emotional trading and uncertainty dominate.",
        ],
        recommendation: "Avoid aggressive entries and limit trade frequency. Focus on defensive positioning or stay partially sidelined.",
    },
    RegimeGuidance {
        regime: Classification::Neutral,
        observations: &[
            "Most stable and balanced performance.",
            "Risk-adjusted behavior comparatively smoother.",
        ],
        recommendation: "Ideal regime for systematic strategy deployment.",
    },
];

pub static RECOMMENDATIONS: Recommendations = Recommendations {
    title: "Regime-Based Trading Strategy Framework",
    regimes: &REGIMES,
    insight: &[
        "Trader profitability is strongly regime-dependent.",
        "Performance, volatility, and directional bias shift significantly across sentiment states.",
    ],
    benefits: &[
        "Improve risk-adjusted returns",
        "Reduce drawdowns during extreme phases",
        "Enhance trade timing and exposure control",
        "Support disciplined behavioral trading",
    ],
    conclusion: "Sentiment-aware strategy design provides a structural edge over static trading systems.",
};

/// The playbook, or `None` when there are no trades to act on.
#[must_use]
pub fn for_trade_count(total_trades: usize) -> Option<&'static Recommendations> {
    (total_trades > 0).then_some(&RECOMMENDATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shown_only_with_trades() {
        assert!(for_trade_count(0).is_none());
        assert_eq!(for_trade_count(3).map(|r| r.regimes.len()), Some(5));
    }
}
