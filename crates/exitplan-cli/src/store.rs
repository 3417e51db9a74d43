//! Session file and report output on disk.
//!
//! Writes go through a temp file in the target directory and are persisted
//! with a rename, so an interrupted run never leaves a half-written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use exitplan_core::{SessionSnapshot, WizardState};
use exitplan_services::ReportFile;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Load the session, or start a fresh one if the file doesn't exist yet.
pub fn load_session(path: &Path) -> Result<WizardState> {
    if !path.exists() {
        info!(path = %path.display(), "no session file, starting a new session");
        return Ok(WizardState::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;
    let snapshot: SessionSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("Session file {} is not valid JSON", path.display()))?;
    debug!(path = %path.display(), step = snapshot.current_step, "session loaded");
    Ok(WizardState::from_snapshot(snapshot))
}

pub fn save_session(path: &Path, state: &WizardState) -> Result<()> {
    let json =
        serde_json::to_string_pretty(&state.snapshot()).context("Failed to serialize session")?;
    write_atomic(path, json.as_bytes())?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Write a rendered report into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &ReportFile) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(&report.filename);
    write_atomic(&path, &report.bytes)?;
    info!(path = %path.display(), size = report.bytes.len(), "report written");
    Ok(path)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(bytes)
        .context("Failed to write temp file")?;
    temp.persist(path)
        .with_context(|| format!("Failed to persist {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exitplan_core::{Action, AnswerField, reduce};

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_session(&dir.path().join("session.json")).unwrap();
        assert!(state.navigator.is_first());
        assert!(state.answers.company_name.is_empty());
    }

    #[test]
    fn save_then_load_keeps_answers_and_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut state = WizardState::new();
        reduce(&mut state, Action::SetAnswer(AnswerField::CompanyName, "Acme AB".into()));
        reduce(&mut state, Action::GoTo(2));
        save_session(&path, &state).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.answers.company_name, "Acme AB");
        assert_eq!(loaded.navigator.step_id(), 3);
    }

    #[test]
    fn save_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        save_session(&path, &WizardState::new()).unwrap();

        let mut state = WizardState::new();
        reduce(&mut state, Action::SetAnswer(AnswerField::OrgNumber, "556000-0000".into()));
        save_session(&path, &state).unwrap();

        assert_eq!(load_session(&path).unwrap().answers.org_number, "556000-0000");
    }

    #[test]
    fn corrupt_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_session(&path).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn report_lands_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("rapporter");
        let report = ReportFile {
            filename: "analysrapport-acme-ab-2026-05-04.pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        };
        let path = write_report(&out, &report).unwrap();
        assert_eq!(path, out.join("analysrapport-acme-ab-2026-05-04.pdf"));
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.7");
    }
}
