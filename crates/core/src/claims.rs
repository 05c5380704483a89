//! Claims-history analysis: risk score and frequency trend per client.
//!
//! The claim frame is optional across the whole pipeline; absence yields an
//! explicit empty analysis rather than null checks in the callers.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ClaimsConfig;
use crate::domain::claim::ClaimRecord;
use crate::domain::client::ClientRef;

/// Qualitative direction of a client's claim frequency over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimsTrend {
    Increasing,
    Decreasing,
    Stable,
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimsAnalysis {
    pub total_claims: u32,
    pub total_claim_amount: f64,
    pub avg_claim_amount: f64,
    pub recent_claims: u32,
    pub high_risk_claims: u32,
    /// 0–100; additive buckets capped at 100.
    pub claims_risk_score: f64,
    pub claims_trend: ClaimsTrend,
}

impl ClaimsAnalysis {
    pub fn empty() -> Self {
        Self {
            total_claims: 0,
            total_claim_amount: 0.0,
            avg_claim_amount: 0.0,
            recent_claims: 0,
            high_risk_claims: 0,
            claims_risk_score: 0.0,
            claims_trend: ClaimsTrend::None,
        }
    }
}

/// Analyze one client's claim history as of `today`. `claims` may be the
/// full frame; only rows for `client_ref` are considered.
pub fn analyze_claims(
    client_ref: &ClientRef,
    claims: Option<&[ClaimRecord]>,
    today: NaiveDate,
    config: &ClaimsConfig,
) -> ClaimsAnalysis {
    let Some(claims) = claims else {
        return ClaimsAnalysis::empty();
    };
    let client_claims: Vec<&ClaimRecord> =
        claims.iter().filter(|claim| &claim.client_ref == client_ref).collect();
    if client_claims.is_empty() {
        return ClaimsAnalysis::empty();
    }

    let total_claims = client_claims.len() as u32;
    let total_claim_amount: f64 = client_claims.iter().map(|claim| claim.amount_collected).sum();
    let avg_claim_amount = total_claim_amount / f64::from(total_claims);

    let recent_cutoff = today
        .checked_sub_days(Days::new(config.recent_claims_days.max(0) as u64))
        .unwrap_or(NaiveDate::MIN);
    let recent_claims = client_claims
        .iter()
        .filter(|claim| claim.occurred_on.is_some_and(|date| date >= recent_cutoff))
        .count() as u32;
    let high_risk_claims = client_claims
        .iter()
        .filter(|claim| claim.responsibility_rate >= config.high_risk_responsibility_rate)
        .count() as u32;

    let mut risk_score = 0.0;
    if total_claims > config.multiple_claims_threshold {
        risk_score += 30.0;
    }
    risk_score += (f64::from(recent_claims) * 15.0).min(30.0);
    risk_score += (f64::from(high_risk_claims) * 20.0).min(30.0);
    if avg_claim_amount > config.large_claim_threshold {
        risk_score += 10.0;
    }

    ClaimsAnalysis {
        total_claims,
        total_claim_amount,
        avg_claim_amount,
        recent_claims,
        high_risk_claims,
        claims_risk_score: risk_score.min(100.0),
        claims_trend: determine_trend(&client_claims),
    }
}

/// Split dated claims at the midpoint of their date span; compare the
/// newer-half count to the older-half count with 1.5×/0.7× cutoffs.
fn determine_trend(client_claims: &[&ClaimRecord]) -> ClaimsTrend {
    let mut dates: Vec<NaiveDate> =
        client_claims.iter().filter_map(|claim| claim.occurred_on).collect();
    if dates.len() < 2 {
        return ClaimsTrend::Stable;
    }
    dates.sort_unstable();
    let first = dates[0];
    let last = dates[dates.len() - 1];
    if first == last {
        return ClaimsTrend::Stable;
    }
    let midpoint = first + chrono::Duration::days((last - first).num_days() / 2);
    let newer = dates.iter().filter(|&&date| date > midpoint).count() as f64;
    let older = dates.len() as f64 - newer;
    if newer > older * 1.5 {
        ClaimsTrend::Increasing
    } else if newer < older * 0.7 {
        ClaimsTrend::Decreasing
    } else {
        ClaimsTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(client: &str, category: &str, amount: f64, rate: f64, date: Option<(i32, u32, u32)>) -> ClaimRecord {
        ClaimRecord {
            client_ref: ClientRef::new(client),
            contract_id: "C-1".to_owned(),
            category: category.to_owned(),
            responsibility_rate: rate,
            amount_collected: amount,
            occurred_on: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn missing_frame_yields_empty_analysis() {
        let analysis =
            analyze_claims(&ClientRef::new("1"), None, today(), &ClaimsConfig::default());
        assert_eq!(analysis, ClaimsAnalysis::empty());
        assert_eq!(analysis.claims_trend, ClaimsTrend::None);
    }

    #[test]
    fn client_without_claims_yields_empty_analysis() {
        let claims = vec![claim("9", "AUTOMOBILE", 100.0, 50.0, Some((2025, 1, 1)))];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.total_claims, 0);
        assert_eq!(analysis.claims_trend, ClaimsTrend::None);
    }

    #[test]
    fn risk_score_buckets_accumulate_and_cap() {
        // Three claims, all recent, all full responsibility, large amounts:
        // 30 (multiple) + 30 (recent, capped) + 30 (high risk, capped) + 10 (large).
        let claims = vec![
            claim("1", "AUTOMOBILE", 9_000.0, 100.0, Some((2025, 5, 1))),
            claim("1", "AUTOMOBILE", 9_000.0, 100.0, Some((2025, 4, 1))),
            claim("1", "INCENDIE", 9_000.0, 100.0, Some((2025, 3, 1))),
        ];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.total_claims, 3);
        assert_eq!(analysis.recent_claims, 3);
        assert_eq!(analysis.high_risk_claims, 3);
        assert_eq!(analysis.claims_risk_score, 100.0);
    }

    #[test]
    fn old_low_responsibility_claims_score_low() {
        let claims = vec![
            claim("1", "VOL", 100.0, 10.0, Some((2020, 1, 1))),
            claim("1", "VOL", 150.0, 0.0, Some((2020, 6, 1))),
        ];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.claims_risk_score, 0.0);
    }

    #[test]
    fn clustered_recent_claims_trend_increasing() {
        let claims = vec![
            claim("1", "VOL", 100.0, 0.0, Some((2024, 1, 1))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 11, 1))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 11, 15))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 12, 1))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 12, 20))),
        ];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.claims_trend, ClaimsTrend::Increasing);
    }

    #[test]
    fn clustered_old_claims_trend_decreasing() {
        let claims = vec![
            claim("1", "VOL", 100.0, 0.0, Some((2024, 1, 1))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 1, 10))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 1, 20))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 2, 1))),
            claim("1", "VOL", 100.0, 0.0, Some((2024, 12, 1))),
        ];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.claims_trend, ClaimsTrend::Decreasing);
    }

    #[test]
    fn single_claim_is_stable() {
        let claims = vec![claim("1", "VOL", 100.0, 0.0, Some((2024, 1, 1)))];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.claims_trend, ClaimsTrend::Stable);
    }

    #[test]
    fn undated_claims_are_excluded_from_date_rules() {
        let claims = vec![
            claim("1", "VOL", 100.0, 0.0, None),
            claim("1", "VOL", 100.0, 0.0, Some((2025, 5, 1))),
        ];
        let analysis =
            analyze_claims(&ClientRef::new("1"), Some(&claims), today(), &ClaimsConfig::default());
        assert_eq!(analysis.total_claims, 2);
        assert_eq!(analysis.recent_claims, 1);
        assert_eq!(analysis.claims_trend, ClaimsTrend::Stable);
    }
}
