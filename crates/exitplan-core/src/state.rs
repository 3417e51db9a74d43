//! Application state and the reducer that updates it.
//!
//! All mutation goes through [`reduce`], one [`Action`] at a time. Derived
//! values (completion, category badges, merged content) are computed from
//! the state on demand and never stored next to it.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::CoreError;
use crate::analysis::AnalysisResult;
use crate::answers::{AnswerField, AnswerState, CustomerShare, MultiField, RevenueYear};
use crate::api::{DocumentAnalysis, ScrapeResult};
use crate::category::{Category, CategoryData, CategoryStatus, GeneratedSummaries, classify_all, has_text};
use crate::completion::{Completion, is_step_complete};
use crate::content::{StepDefinition, base_steps};
use crate::industry::IndustryCatalog;
use crate::navigation::Navigator;

/// File extensions accepted for document analysis.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "xlsx", "xls", "csv", "docx", "doc", "txt"];

// ── Operations ──

/// An external call the user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Scrape,
    AnalyzeDocuments,
    Summary(Category),
    CompleteAnalysis,
    Report,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Scrape => "hämtning från webbplats",
            Operation::AnalyzeDocuments => "dokumentanalys",
            Operation::Summary(_) => "sammanfattning",
            Operation::CompleteAnalysis => "analys",
            Operation::Report => "PDF-rapport",
        }
    }
}

/// In-flight flags and last error per operation.
///
/// Each operation is independent: a scrape in flight does not block
/// document analysis, only a second scrape.
#[derive(Debug, Clone, Default)]
pub struct Operations {
    in_flight: HashSet<Operation>,
    errors: BTreeMap<Operation, String>,
}

impl Operations {
    /// Mark `op` as started. Returns false, changing nothing, if it is
    /// already in flight. Clears the previous error for `op`.
    pub fn begin(&mut self, op: Operation) -> bool {
        if !self.in_flight.insert(op) {
            return false;
        }
        self.errors.remove(&op);
        true
    }

    pub fn succeed(&mut self, op: Operation) {
        self.in_flight.remove(&op);
    }

    pub fn fail(&mut self, op: Operation, message: String) {
        self.in_flight.remove(&op);
        self.errors.insert(op, message);
    }

    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.in_flight.contains(&op)
    }

    pub fn error(&self, op: Operation) -> Option<&str> {
        self.errors.get(&op).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (Operation, &str)> {
        self.errors.iter().map(|(op, msg)| (*op, msg.as_str()))
    }
}

// ── Uploads ──

/// A document held in memory until it is submitted or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Accepts the file if its extension is in [`ACCEPTED_EXTENSIONS`], case-insensitively.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        let name = name.into();
        let ext = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(CoreError::UnsupportedFile(name));
        }
        Ok(Self { name, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => "application/pdf",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xls" => "application/vnd.ms-excel",
            "csv" => "text/csv",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "doc" => "application/msword",
            _ => "text/plain",
        }
    }
}

// ── State ──

#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub answers: AnswerState,
    pub summaries: GeneratedSummaries,
    pub analysis: Option<AnalysisResult>,
    pub scraped: Option<ScrapeResult>,
    pub navigator: Navigator,
    pub uploads: Vec<UploadedFile>,
    pub operations: Operations,
}

/// One state change.
#[derive(Debug, Clone)]
pub enum Action {
    SetAnswer(AnswerField, String),
    ToggleChoice(MultiField, String),
    SetRevenue(RevenueYear, String),
    SetTopCustomers(Vec<CustomerShare>),
    SetCategory(CategoryData),
    /// Positional move; the readiness gate is applied by the caller.
    Next,
    Prev,
    GoTo(usize),
    AddUpload(UploadedFile),
    RemoveUpload(String),
    Fail(Operation, String),
    ScrapeSucceeded(ScrapeResult),
    DocumentsAnalyzed(DocumentAnalysis),
    SummaryGenerated(Category, String),
    AnalysisSucceeded(AnalysisResult),
    ReportSaved,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SetAnswer(..) => "set_answer",
            Action::ToggleChoice(..) => "toggle_choice",
            Action::SetRevenue(..) => "set_revenue",
            Action::SetTopCustomers(_) => "set_top_customers",
            Action::SetCategory(_) => "set_category",
            Action::Next => "next",
            Action::Prev => "prev",
            Action::GoTo(_) => "go_to",
            Action::AddUpload(_) => "add_upload",
            Action::RemoveUpload(_) => "remove_upload",
            Action::Fail(..) => "fail",
            Action::ScrapeSucceeded(_) => "scrape_succeeded",
            Action::DocumentsAnalyzed(_) => "documents_analyzed",
            Action::SummaryGenerated(..) => "summary_generated",
            Action::AnalysisSucceeded(_) => "analysis_succeeded",
            Action::ReportSaved => "report_saved",
        }
    }
}

/// Apply one action.
pub fn reduce(state: &mut WizardState, action: Action) {
    debug!(action = action.name(), step = state.navigator.step_id(), "reduce");
    match action {
        Action::SetAnswer(field, value) => field.set(&mut state.answers, value),
        Action::ToggleChoice(field, option) => field.toggle(&mut state.answers, &option),
        Action::SetRevenue(year, value) => state.answers.revenue.set(year, value),
        Action::SetTopCustomers(customers) => state.answers.top_customers = customers,
        Action::SetCategory(data) => state.answers.company_data.set(data),
        Action::Next => {
            state.navigator.next();
        }
        Action::Prev => {
            state.navigator.prev();
        }
        Action::GoTo(index) => state.navigator.set_step(index),
        Action::AddUpload(file) => {
            state.uploads.retain(|f| f.name != file.name);
            state.uploads.push(file);
        }
        Action::RemoveUpload(name) => state.uploads.retain(|f| f.name != name),
        Action::Fail(op, message) => {
            warn!(operation = ?op, error = %message, "operation failed");
            state.operations.fail(op, message);
        }
        Action::ScrapeSucceeded(result) => {
            let answers = &mut state.answers;
            if !has_text(&answers.company_name) && has_text(&result.combined.company_name) {
                answers.company_name = result.combined.company_name.clone();
            }
            if !has_text(&answers.business_description) && has_text(&result.combined.description) {
                answers.business_description = result.combined.description.clone();
            }
            state.scraped = Some(result);
            state.operations.succeed(Operation::Scrape);
        }
        Action::DocumentsAnalyzed(analysis) => {
            for data in analysis.into_categories() {
                state.answers.company_data.absorb(&data);
            }
            state.operations.succeed(Operation::AnalyzeDocuments);
        }
        Action::SummaryGenerated(category, summary) => {
            state.summaries.insert(category, summary);
            state.operations.succeed(Operation::Summary(category));
        }
        Action::AnalysisSucceeded(analysis) => {
            if state.analysis.is_none() {
                state.analysis = Some(analysis);
            } else {
                debug!("analysis already present, keeping the first result");
            }
            state.operations.succeed(Operation::CompleteAnalysis);
        }
        Action::ReportSaved => state.operations.succeed(Operation::Report),
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completion(&self) -> Completion {
        Completion::of(&self.answers)
    }

    pub fn current_step_complete(&self) -> bool {
        is_step_complete(&self.answers, self.navigator.step_id())
    }

    pub fn category_statuses(&self) -> Vec<(Category, CategoryStatus)> {
        classify_all(&self.answers.company_data, &self.summaries)
    }

    /// Step content for the selected industry.
    pub fn steps(&self, catalog: &IndustryCatalog) -> Cow<'static, [StepDefinition]> {
        catalog.steps_for(&self.answers.industry, base_steps())
    }

    /// The analysis, required before a PDF can be generated.
    pub fn require_analysis(&self) -> Result<&AnalysisResult, CoreError> {
        self.analysis.as_ref().ok_or(CoreError::MissingAnalysis)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            answers: self.answers.clone(),
            summaries: self.summaries.clone(),
            analysis: self.analysis.clone(),
            scraped: self.scraped.clone(),
            current_step: self.navigator.step_id(),
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mut state = Self {
            answers: snapshot.answers,
            summaries: snapshot.summaries,
            analysis: snapshot.analysis,
            scraped: snapshot.scraped,
            ..Self::default()
        };
        state
            .navigator
            .set_step(usize::from(snapshot.current_step.max(1)) - 1);
        state
    }
}

/// The part of [`WizardState`] worth keeping between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub answers: AnswerState,
    pub summaries: GeneratedSummaries,
    pub analysis: Option<AnalysisResult>,
    pub scraped: Option<ScrapeResult>,
    /// 1-based step id.
    pub current_step: u8,
}
