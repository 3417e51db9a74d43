//! External service adapters and the async wizard session.

mod error;
pub mod http;
pub mod session;

pub use error::ServiceError;
pub use http::ServiceClient;
pub use session::{ReportFile, Session, WizardServices};
