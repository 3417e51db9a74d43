//! An interactive wizard session: state plus the services it calls.
//!
//! Every external call follows the same shape. Mark the operation in flight
//! (a duplicate is refused), await the service, then reduce either the
//! success action or a `Fail` carrying the user-facing message. A failure
//! only blocks that operation; the rest of the wizard stays usable.

use async_trait::async_trait;
use chrono::NaiveDate;
use exitplan_core::api::{
    DocumentAnalysis, ReportRequest, ScrapeRequest, ScrapeResult, SummaryRequest,
};
use exitplan_core::{
    Action, AnalysisResult, AnswerState, Category, Operation, ReportKind, Transition,
    UploadedFile, WizardState, reduce, report_filename,
};
use tracing::{info, warn};

use crate::{ServiceClient, ServiceError};

/// The backend as the session sees it.
#[async_trait]
pub trait WizardServices: Send + Sync {
    async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ServiceError>;

    async fn analyze_documents(
        &self,
        files: &[UploadedFile],
    ) -> Result<DocumentAnalysis, ServiceError>;

    async fn generate_category_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<String, ServiceError>;

    async fn generate_complete_analysis(
        &self,
        answers: &AnswerState,
    ) -> Result<AnalysisResult, ServiceError>;

    async fn generate_pdf_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ServiceError>;
}

#[async_trait]
impl WizardServices for ServiceClient {
    async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ServiceError> {
        ServiceClient::scrape_url(self, request).await
    }

    async fn analyze_documents(
        &self,
        files: &[UploadedFile],
    ) -> Result<DocumentAnalysis, ServiceError> {
        ServiceClient::analyze_documents(self, files).await
    }

    async fn generate_category_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<String, ServiceError> {
        ServiceClient::generate_category_summary(self, request).await
    }

    async fn generate_complete_analysis(
        &self,
        answers: &AnswerState,
    ) -> Result<AnalysisResult, ServiceError> {
        ServiceClient::generate_complete_analysis(self, answers).await
    }

    async fn generate_pdf_report(&self, request: &ReportRequest) -> Result<Vec<u8>, ServiceError> {
        ServiceClient::generate_pdf_report(self, request).await
    }
}

/// A rendered report ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct Session<S> {
    services: S,
    state: WizardState,
}

impl<S: WizardServices> Session<S> {
    pub fn new(services: S, state: WizardState) -> Self {
        Self { services, state }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn into_state(self) -> WizardState {
        self.state
    }

    /// Apply a synchronous edit.
    pub fn dispatch(&mut self, action: Action) {
        reduce(&mut self.state, action);
    }

    /// Move forward one step. Leaving the readiness step without an
    /// analysis runs it first; the move happens whether it succeeds or
    /// not, with a failure left in the operation's error slot.
    pub async fn next(&mut self) -> bool {
        match self.state.navigator.transition(self.state.analysis.is_some()) {
            Transition::AtEnd => return false,
            Transition::RequiresAnalysis => {
                info!(step = self.state.navigator.step_id(), "readiness step left, running analysis");
                if let Err(e) = self.generate_analysis().await {
                    warn!(error = %e, "continuing without analysis");
                }
            }
            Transition::Move(_) => {}
        }
        self.dispatch(Action::Next);
        true
    }

    pub fn prev(&mut self) {
        self.dispatch(Action::Prev);
    }

    pub async fn scrape(&mut self, url: &str) -> Result<(), ServiceError> {
        let op = Operation::Scrape;
        self.begin(op)?;
        let url = match normalize_url(url) {
            Some(url) => url,
            None => return Err(self.fail(op, ServiceError::MissingUrl)),
        };
        let company = self.state.answers.company_name.trim();
        let request = ScrapeRequest {
            url,
            company_name: (!company.is_empty()).then(|| company.to_string()),
        };
        match self.services.scrape_url(&request).await {
            Ok(result) => {
                self.dispatch(Action::ScrapeSucceeded(result));
                Ok(())
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    /// Send every held upload for analysis and merge the extracted values.
    pub async fn analyze_documents(&mut self) -> Result<(), ServiceError> {
        let op = Operation::AnalyzeDocuments;
        self.begin(op)?;
        if self.state.uploads.is_empty() {
            return Err(self.fail(op, ServiceError::NoFiles));
        }
        match self.services.analyze_documents(&self.state.uploads).await {
            Ok(analysis) => {
                info!(files = self.state.uploads.len(), "documents analyzed");
                self.dispatch(Action::DocumentsAnalyzed(analysis));
                Ok(())
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    pub async fn generate_summary(&mut self, category: Category) -> Result<(), ServiceError> {
        let op = Operation::Summary(category);
        self.begin(op)?;
        let data = self.state.answers.company_data.to_data(category);
        let request = match SummaryRequest::new(
            &data,
            self.state.scraped.as_ref(),
            self.state.answers.company_name.trim(),
        ) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(op, e.into())),
        };
        match self.services.generate_category_summary(&request).await {
            Ok(summary) => {
                self.dispatch(Action::SummaryGenerated(category, summary));
                Ok(())
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    /// Request the complete analysis. Once one is held, later results are
    /// ignored by the reducer.
    pub async fn generate_analysis(&mut self) -> Result<(), ServiceError> {
        let op = Operation::CompleteAnalysis;
        self.begin(op)?;
        match self
            .services
            .generate_complete_analysis(&self.state.answers)
            .await
        {
            Ok(analysis) => {
                self.dispatch(Action::AnalysisSucceeded(analysis));
                Ok(())
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    /// Render a PDF report. Refused without a network call when no analysis
    /// has been received.
    pub async fn generate_report(
        &mut self,
        kind: ReportKind,
        date: NaiveDate,
    ) -> Result<ReportFile, ServiceError> {
        let op = Operation::Report;
        self.begin(op)?;
        let request = match self.state.require_analysis() {
            Ok(analysis) => {
                ReportRequest::new(kind, &self.state.answers, &self.state.summaries, analysis)
            }
            Err(e) => return Err(self.fail(op, e.into())),
        };
        match self.services.generate_pdf_report(&request).await {
            Ok(bytes) => {
                let filename = report_filename(kind, &self.state.answers.company_name, date);
                info!(filename = %filename, size = bytes.len(), "report generated");
                self.dispatch(Action::ReportSaved);
                Ok(ReportFile { filename, bytes })
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    fn begin(&mut self, op: Operation) -> Result<(), ServiceError> {
        if self.state.operations.begin(op) {
            Ok(())
        } else {
            warn!(operation = ?op, "already in flight, refusing duplicate");
            Err(ServiceError::Busy(op.label()))
        }
    }

    fn fail(&mut self, op: Operation, err: ServiceError) -> ServiceError {
        self.dispatch(Action::Fail(op, err.user_message()));
        err
    }
}

/// Trimmed URL with `https://` added when no scheme is given. `None` when blank.
fn normalize_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        None
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        Some(format!("https://{url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exitplan_core::AnswerField;
    use exitplan_core::api::ScrapedCompany;
    use exitplan_core::category::FinancialDocs;
    use exitplan_core::completion::SUMMARY_STEP;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeServices {
        fail_analysis: bool,
        calls: Mutex<Vec<&'static str>>,
        last_scrape: Mutex<Option<ScrapeRequest>>,
    }

    impl FakeServices {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl WizardServices for FakeServices {
        async fn scrape_url(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ServiceError> {
            self.record("scrape");
            *self.last_scrape.lock().unwrap() = Some(request.clone());
            Ok(ScrapeResult {
                combined: ScrapedCompany {
                    company_name: "Acme AB".into(),
                    description: "Snickerier och renoveringar i Uppsala".into(),
                },
                ..Default::default()
            })
        }

        async fn analyze_documents(
            &self,
            _files: &[UploadedFile],
        ) -> Result<DocumentAnalysis, ServiceError> {
            self.record("documents");
            Ok(DocumentAnalysis {
                financial_docs: Some(FinancialDocs {
                    annual_reports: true,
                    ..Default::default()
                }),
                ..Default::default()
            })
        }

        async fn generate_category_summary(
            &self,
            request: &SummaryRequest,
        ) -> Result<String, ServiceError> {
            self.record("summary");
            Ok(format!("Sammanfattning av {}", request.category.label()))
        }

        async fn generate_complete_analysis(
            &self,
            _answers: &AnswerState,
        ) -> Result<AnalysisResult, ServiceError> {
            self.record("analysis");
            if self.fail_analysis {
                return Err(ServiceError::Server {
                    status: 503,
                    body: String::new(),
                });
            }
            Ok(AnalysisResult {
                overall_risk: 4,
                ..Default::default()
            })
        }

        async fn generate_pdf_report(
            &self,
            _request: &ReportRequest,
        ) -> Result<Vec<u8>, ServiceError> {
            self.record("pdf");
            Ok(b"%PDF-1.7".to_vec())
        }
    }

    fn on_readiness_step(services: FakeServices) -> Session<FakeServices> {
        let mut session = Session::new(services, WizardState::new());
        session.dispatch(Action::GoTo(usize::from(SUMMARY_STEP) - 1));
        session
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    #[tokio::test]
    async fn leaving_readiness_step_runs_analysis_once() {
        let mut session = on_readiness_step(FakeServices::default());
        assert!(session.next().await);
        assert_eq!(session.state().navigator.step_id(), SUMMARY_STEP + 1);
        assert_eq!(session.state().analysis.as_ref().unwrap().overall_risk, 4);

        session.prev();
        assert!(session.next().await);
        assert_eq!(session.services.calls(), vec!["analysis"]);
    }

    #[tokio::test]
    async fn failed_analysis_still_moves_and_records_error() {
        let mut session = on_readiness_step(FakeServices {
            fail_analysis: true,
            ..Default::default()
        });
        assert!(session.next().await);
        assert_eq!(session.state().navigator.step_id(), SUMMARY_STEP + 1);
        assert!(session.state().analysis.is_none());
        let error = session.state().operations.error(Operation::CompleteAnalysis);
        assert!(error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn ordinary_steps_do_not_call_services() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        assert!(session.next().await);
        assert_eq!(session.state().navigator.step_id(), 2);
        assert!(session.services.calls().is_empty());
    }

    #[tokio::test]
    async fn next_on_last_step_is_a_no_op() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        session.dispatch(Action::GoTo(usize::MAX));
        assert!(!session.next().await);
    }

    #[tokio::test]
    async fn report_without_analysis_is_refused_locally() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        let err = session.generate_report(ReportKind::Analysis, date()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(_)));
        assert!(session.services.calls().is_empty());
        assert!(session.state().operations.error(Operation::Report).is_some());
        assert!(!session.state().operations.is_in_flight(Operation::Report));
    }

    #[tokio::test]
    async fn report_after_analysis_gets_filename() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        session.dispatch(Action::SetAnswer(AnswerField::CompanyName, "Acme AB".into()));
        session.generate_analysis().await.unwrap();

        let report = session
            .generate_report(ReportKind::Preparation, date())
            .await
            .unwrap();
        assert_eq!(report.filename, "forberedelseplan-acme-ab-2026-05-04.pdf");
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn scrape_adds_scheme_and_sends_company_name() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        session.dispatch(Action::SetAnswer(AnswerField::CompanyName, "Mitt AB".into()));
        session.scrape(" acme.se ").await.unwrap();

        let sent = session.services.last_scrape.lock().unwrap().clone().unwrap();
        assert_eq!(sent.url, "https://acme.se");
        assert_eq!(sent.company_name.as_deref(), Some("Mitt AB"));
        assert_eq!(session.state().answers.company_name, "Mitt AB");
        assert_eq!(
            session.state().answers.business_description,
            "Snickerier och renoveringar i Uppsala"
        );
    }

    #[tokio::test]
    async fn blank_url_is_refused() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        assert!(matches!(
            session.scrape("   ").await,
            Err(ServiceError::MissingUrl)
        ));
        assert!(session.state().operations.error(Operation::Scrape).is_some());
        assert!(session.services.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_operation_is_refused() {
        let mut state = WizardState::new();
        state.operations.begin(Operation::CompleteAnalysis);
        let mut session = Session::new(FakeServices::default(), state);
        assert!(matches!(
            session.generate_analysis().await,
            Err(ServiceError::Busy(_))
        ));
        assert!(session.services.calls().is_empty());
        let ops = &session.state().operations;
        assert!(ops.error(Operation::CompleteAnalysis).is_none());
        assert!(ops.is_in_flight(Operation::CompleteAnalysis));
    }

    #[tokio::test]
    async fn documents_need_uploads() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        assert!(matches!(
            session.analyze_documents().await,
            Err(ServiceError::NoFiles)
        ));

        session.dispatch(Action::AddUpload(
            UploadedFile::new("bokslut.pdf", vec![1, 2, 3]).unwrap(),
        ));
        session.analyze_documents().await.unwrap();
        assert!(session.state().operations.error(Operation::AnalyzeDocuments).is_none());
        assert!(
            session
                .state()
                .answers
                .company_data
                .get(Category::FinancialDocs)
                .is_populated()
        );
    }

    #[tokio::test]
    async fn summary_marks_category_generated() {
        let mut session = Session::new(FakeServices::default(), WizardState::new());
        session.generate_summary(Category::LegalDocs).await.unwrap();
        assert!(session.state().summaries.contains(Category::LegalDocs));
    }

    #[test]
    fn url_normalization() {
        assert_eq!(normalize_url("http://a.se").as_deref(), Some("http://a.se"));
        assert_eq!(normalize_url("a.se").as_deref(), Some("https://a.se"));
        assert!(normalize_url(" ").is_none());
    }
}
