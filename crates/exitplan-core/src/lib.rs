//! Core of the sale-preparation wizard: answers, completion rules, category
//! status, industry content and the reducer-driven application state.

pub mod analysis;
pub mod answers;
pub mod api;
pub mod category;
pub mod completion;
pub mod content;
mod error;
pub mod industry;
pub mod navigation;
pub mod report;
pub mod state;
pub mod vocabulary;

pub use analysis::AnalysisResult;
pub use answers::{AnswerField, AnswerState, MultiField};
pub use category::{Category, CategoryData, CategoryStatus, GeneratedSummaries, classify};
pub use completion::{Completion, is_step_complete};
pub use content::{ItemDefinition, StepDefinition, base_steps};
pub use error::CoreError;
pub use industry::{IndustryCatalog, get_industry_steps};
pub use navigation::{Navigator, Transition};
pub use report::{ReportKind, report_filename};
pub use state::{Action, Operation, SessionSnapshot, UploadedFile, WizardState, reduce};
