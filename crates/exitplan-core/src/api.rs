//! Request and response bodies for the external services.
//!
//! Every response may carry `{"error": "..."}` instead of its payload, so
//! payload fields are optional here and validated by the client.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::answers::AnswerState;
use crate::category::{
    BalanceSheet, BusinessRelations, Category, CategoryData, FinancialDocs, GeneratedSummaries,
    KeyPerson, LegalDocs,
};
use crate::completion::Completion;
use crate::report::ReportKind;
use crate::vocabulary::{Choice, Industry};

// ── Scrape by URL ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScrapeResponse {
    pub success: bool,
    pub combined: Option<ScrapedCompany>,
    pub website: Option<WebsiteInfo>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrapedCompany {
    pub company_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebsiteInfo {
    pub title: String,
    pub highlights: Vec<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A validated scrape: what the wizard keeps for display and merge-back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrapeResult {
    pub combined: ScrapedCompany,
    pub website: WebsiteInfo,
}

// ── Document analysis ──

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentAnalysisResponse {
    pub success: bool,
    pub analysis: Option<DocumentAnalysis>,
    pub error: Option<String>,
}

/// Values extracted from uploaded documents, per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub financial_docs: Option<FinancialDocs>,
    pub business_relations: Option<BusinessRelations>,
    pub key_person: Option<KeyPerson>,
    pub balance_sheet: Option<BalanceSheet>,
    pub legal_docs: Option<LegalDocs>,
}

impl DocumentAnalysis {
    /// The categories the service returned data for.
    pub fn into_categories(self) -> Vec<CategoryData> {
        let mut out = Vec::new();
        if let Some(d) = self.financial_docs {
            out.push(CategoryData::FinancialDocs(d));
        }
        if let Some(d) = self.business_relations {
            out.push(CategoryData::BusinessRelations(d));
        }
        if let Some(d) = self.key_person {
            out.push(CategoryData::KeyPerson(d));
        }
        if let Some(d) = self.balance_sheet {
            out.push(CategoryData::BalanceSheet(d));
        }
        if let Some(d) = self.legal_docs {
            out.push(CategoryData::LegalDocs(d));
        }
        out
    }
}

// ── Category summary ──

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub category: Category,
    pub category_data: serde_json::Value,
    pub scraped_data: Option<ScrapeResult>,
    pub company_name: String,
}

impl SummaryRequest {
    pub fn new(
        data: &CategoryData,
        scraped: Option<&ScrapeResult>,
        company_name: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            category: data.category(),
            category_data: data.fields_json()?,
            scraped_data: scraped.cloned(),
            company_name: company_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryResponse {
    pub summary: Option<String>,
    pub error: Option<String>,
}

// ── Complete analysis ──

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    pub analysis: Option<AnalysisResult>,
    pub error: Option<String>,
}

// ── PDF report ──

/// Fields the PDF template consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportKind,
    pub company_name: String,
    pub org_number: String,
    pub industry: String,
    pub why_sell: String,
    pub sale_timeline: String,
    pub price_expectation: String,
    pub readiness_percent: u8,
    pub summaries: GeneratedSummaries,
    pub analysis: AnalysisResult,
}

impl ReportRequest {
    pub fn new(
        kind: ReportKind,
        answers: &AnswerState,
        summaries: &GeneratedSummaries,
        analysis: &AnalysisResult,
    ) -> Self {
        let industry = Industry::parse(&answers.industry)
            .map(|i| i.label().to_string())
            .unwrap_or_else(|| answers.industry.trim().to_string());
        Self {
            report_type: kind,
            company_name: answers.company_name.trim().to_string(),
            org_number: answers.org_number.trim().to_string(),
            industry,
            why_sell: answers.why_sell.clone(),
            sale_timeline: answers.sale_timeline.clone(),
            price_expectation: answers.price_expectation.clone(),
            readiness_percent: Completion::of(answers).readiness_percent(),
            summaries: summaries.clone(),
            analysis: analysis.clone(),
        }
    }
}

/// Body of a failed call: `{"error": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
}
