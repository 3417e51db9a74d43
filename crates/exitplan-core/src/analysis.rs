//! The complete analysis returned by the AI service.

use serde::{Deserialize, Serialize};

/// Risk, SWOT and valuation report. Received once and then only read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall risk, 1 (low) – 10 (high).
    pub overall_risk: u8,
    pub risk_scores: Vec<RiskScore>,
    pub swot: Swot,
    pub valuation: ValuationRange,
    pub recommendations: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskScore {
    pub area: String,
    /// 1 (low) – 10 (high).
    pub score: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

/// Indicative valuation range in SEK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValuationRange {
    pub low: f64,
    pub high: f64,
    pub method: String,
    pub comment: String,
}

impl AnalysisResult {
    /// The risk areas sorted highest score first.
    pub fn top_risks(&self, n: usize) -> Vec<&RiskScore> {
        let mut risks: Vec<&RiskScore> = self.risk_scores.iter().collect();
        risks.sort_by(|a, b| b.score.cmp(&a.score));
        risks.truncate(n);
        risks
    }
}

impl ValuationRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// True when the range is usable: positive and not inverted.
    pub fn is_valid(&self) -> bool {
        self.low > 0.0 && self.high >= self.low
    }
}
