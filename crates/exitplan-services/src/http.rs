//! HTTP client for the wizard's backend endpoints.

use exitplan_core::{AnalysisResult, AnswerState, UploadedFile};
use exitplan_core::api::{
    AnalysisResponse, DocumentAnalysis, DocumentAnalysisResponse, ErrorBody, ReportRequest,
    ScrapeRequest, ScrapeResponse, ScrapeResult, SummaryRequest, SummaryResponse,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::ServiceError;

/// Client for the scrape, document analysis, summary, analysis and PDF endpoints.
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// `base_url` is like `http://localhost:3000`; a trailing slash is dropped.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Fetch company name, description and contact details from a website.
    pub async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ServiceError> {
        let url = self.endpoint("scrape");
        info!(url = %url, target = %request.url, "scraping company website");
        let resp = self.client.post(&url).json(request).send().await?;
        let body: ScrapeResponse = read_json(resp).await?;
        let result = scrape_result(body)?;
        info!(company = %result.combined.company_name, "scrape complete");
        Ok(result)
    }

    /// Upload documents and get back extracted values per category.
    pub async fn analyze_documents(
        &self,
        files: &[UploadedFile],
    ) -> Result<DocumentAnalysis, ServiceError> {
        if files.is_empty() {
            return Err(ServiceError::NoFiles);
        }
        let url = self.endpoint("analyze-documents");
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(file.mime_type())?;
            form = form.part("files", part);
        }

        info!(url = %url, count = files.len(), "uploading documents for analysis");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let body: DocumentAnalysisResponse = read_json(resp).await?;
        document_analysis(body)
    }

    pub async fn generate_category_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<String, ServiceError> {
        let url = self.endpoint("generate-category-summary");
        info!(url = %url, category = %request.category, "generating category summary");
        let resp = self.client.post(&url).json(request).send().await?;
        let body: SummaryResponse = read_json(resp).await?;
        summary_text(body)
    }

    pub async fn generate_complete_analysis(
        &self,
        answers: &AnswerState,
    ) -> Result<AnalysisResult, ServiceError> {
        let url = self.endpoint("generate-complete-analysis");
        info!(url = %url, company = %answers.company_name, "generating complete analysis");
        let resp = self.client.post(&url).json(answers).send().await?;
        let body: AnalysisResponse = read_json(resp).await?;
        let analysis = analysis_result(body)?;
        info!(overall_risk = analysis.overall_risk, "analysis received");
        Ok(analysis)
    }

    /// Render the PDF and return its bytes.
    pub async fn generate_pdf_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint("generate-pdf-report");
        info!(url = %url, kind = %request.report_type, "generating PDF report");
        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), body));
        }
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(ServiceError::MissingPayload("pdf"));
        }
        info!(size = bytes.len(), "report received");
        Ok(bytes.to_vec())
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(error_for_status(status.as_u16(), body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// A failed call with `{"error": "..."}` in its body is a rejection with a
/// message worth showing; anything else is a bare server error.
fn error_for_status(status: u16, body: String) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error: Some(msg) }) if !msg.trim().is_empty() => ServiceError::Rejected(msg),
        _ => ServiceError::Server { status, body },
    }
}

fn rejection(error: Option<String>) -> Result<(), ServiceError> {
    match error {
        Some(msg) => Err(ServiceError::Rejected(msg)),
        None => Ok(()),
    }
}

pub(crate) fn scrape_result(body: ScrapeResponse) -> Result<ScrapeResult, ServiceError> {
    rejection(body.error)?;
    match body.combined {
        Some(combined) if body.success => Ok(ScrapeResult {
            combined,
            website: body.website.unwrap_or_default(),
        }),
        _ => Err(ServiceError::MissingPayload("combined")),
    }
}

pub(crate) fn document_analysis(
    body: DocumentAnalysisResponse,
) -> Result<DocumentAnalysis, ServiceError> {
    rejection(body.error)?;
    body.analysis.ok_or(ServiceError::MissingPayload("analysis"))
}

pub(crate) fn summary_text(body: SummaryResponse) -> Result<String, ServiceError> {
    rejection(body.error)?;
    match body.summary {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServiceError::MissingPayload("summary")),
    }
}

pub(crate) fn analysis_result(body: AnalysisResponse) -> Result<AnalysisResult, ServiceError> {
    rejection(body.error)?;
    body.analysis.ok_or(ServiceError::MissingPayload("analysis"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ServiceClient::new("http://localhost:3000/".into());
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.endpoint("scrape"),
            "http://localhost:3000/api/scrape"
        );
    }

    #[test]
    fn error_body_becomes_rejection() {
        let err = error_for_status(400, r#"{"error":"Ogiltig URL"}"#.into());
        assert!(matches!(err, ServiceError::Rejected(ref m) if m == "Ogiltig URL"));
    }

    #[test]
    fn html_error_page_stays_server_error() {
        let err = error_for_status(502, "<html>Bad Gateway</html>".into());
        assert!(matches!(err, ServiceError::Server { status: 502, .. }));
    }

    #[test]
    fn scrape_error_field_wins() {
        let body: ScrapeResponse =
            serde_json::from_str(r#"{"success": false, "error": "Sidan svarade inte"}"#).unwrap();
        assert!(matches!(scrape_result(body), Err(ServiceError::Rejected(_))));
    }

    #[test]
    fn scrape_without_combined_is_malformed() {
        let body: ScrapeResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            scrape_result(body),
            Err(ServiceError::MissingPayload("combined"))
        ));
    }

    #[test]
    fn scrape_without_website_defaults_it() {
        let body: ScrapeResponse = serde_json::from_str(
            r#"{"success": true, "combined": {"companyName": "Acme AB", "description": ""}}"#,
        )
        .unwrap();
        let result = scrape_result(body).unwrap();
        assert_eq!(result.combined.company_name, "Acme AB");
        assert!(result.website.highlights.is_empty());
    }

    #[test]
    fn blank_summary_is_malformed() {
        let body: SummaryResponse = serde_json::from_str(r#"{"summary": "  "}"#).unwrap();
        assert!(matches!(
            summary_text(body),
            Err(ServiceError::MissingPayload("summary"))
        ));
    }

    #[test]
    fn analysis_payload_is_required() {
        let body: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert!(analysis_result(body).is_err());

        let body: AnalysisResponse =
            serde_json::from_str(r#"{"analysis": {"overallRisk": 5}}"#).unwrap();
        assert_eq!(analysis_result(body).unwrap().overall_risk, 5);
    }

    #[test]
    fn document_analysis_passes_categories_through() {
        let body: DocumentAnalysisResponse = serde_json::from_str(
            r#"{"success": true, "analysis": {"keyPerson": {"hasDeputy": true}}}"#,
        )
        .unwrap();
        let analysis = document_analysis(body).unwrap();
        assert!(analysis.key_person.unwrap().has_deputy);
    }

    #[tokio::test]
    async fn empty_upload_is_refused_before_sending() {
        let client = ServiceClient::new("http://127.0.0.1:9".into());
        assert!(matches!(
            client.analyze_documents(&[]).await,
            Err(ServiceError::NoFiles)
        ));
    }
}
