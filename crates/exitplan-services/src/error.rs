use exitplan_core::CoreError;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "Något gick fel. Försök igen om en stund.";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("service rejected the request: {0}")]
    Rejected(String),
    #[error("response is missing `{0}`")]
    MissingPayload(&'static str),
    #[error("{0} is already in progress")]
    Busy(&'static str),
    #[error("no files selected")]
    NoFiles,
    #[error("no URL given")]
    MissingUrl,
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    /// Swedish message shown next to the control that triggered the call.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Rejected(msg) if !msg.trim().is_empty() => msg.trim().to_string(),
            ServiceError::Http(e) if e.is_timeout() || e.is_connect() => {
                "Kunde inte nå tjänsten. Kontrollera anslutningen och försök igen.".to_string()
            }
            ServiceError::Server { status, .. } if *status >= 500 => {
                format!("Tjänsten är inte tillgänglig just nu ({status}). Försök igen senare.")
            }
            ServiceError::Server { status, .. } => {
                format!("Begäran kunde inte behandlas ({status}).")
            }
            ServiceError::Busy(what) => format!("En {what} pågår redan."),
            ServiceError::NoFiles => "Välj minst en fil att analysera.".to_string(),
            ServiceError::MissingUrl => "Ange företagets webbadress.".to_string(),
            ServiceError::Core(CoreError::MissingAnalysis) => {
                "Analysen saknas. Gör analysen innan du laddar ner rapporten.".to_string()
            }
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_passed_through() {
        let err = ServiceError::Rejected(" Ogiltig URL ".into());
        assert_eq!(err.user_message(), "Ogiltig URL");
    }

    #[test]
    fn blank_rejection_falls_back_to_generic() {
        assert_eq!(ServiceError::Rejected("  ".into()).user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn malformed_payload_uses_generic_message() {
        assert_eq!(ServiceError::MissingPayload("analysis").user_message(), GENERIC_MESSAGE);
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ServiceError::Json(json_err).user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn server_errors_mention_status() {
        let err = ServiceError::Server {
            status: 503,
            body: String::new(),
        };
        assert!(err.user_message().contains("503"));
    }

    #[test]
    fn missing_analysis_has_own_message() {
        let err = ServiceError::from(CoreError::MissingAnalysis);
        assert!(err.user_message().starts_with("Analysen saknas"));
    }
}
