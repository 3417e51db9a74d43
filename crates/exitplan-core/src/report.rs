//! Report kinds and download filenames.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

const COMPANY_PLACEHOLDER: &str = "foretag";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportKind {
    /// Risk, SWOT and valuation report.
    #[default]
    #[serde(rename = "analysrapport")]
    Analysis,
    /// Preparation checklist built from the wizard answers.
    #[serde(rename = "forberedelseplan")]
    Preparation,
}

impl ReportKind {
    pub fn id(self) -> &'static str {
        match self {
            ReportKind::Analysis => "analysrapport",
            ReportKind::Preparation => "forberedelseplan",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "analysrapport" => Ok(ReportKind::Analysis),
            "forberedelseplan" => Ok(ReportKind::Preparation),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

/// `{kind}-{company-slug}-{YYYY-MM-DD}.pdf`, with a placeholder when the
/// company name is blank or has nothing sluggable in it.
pub fn report_filename(kind: ReportKind, company_name: &str, date: NaiveDate) -> String {
    let slug = slugify(company_name);
    let company = if slug.is_empty() {
        COMPANY_PLACEHOLDER
    } else {
        slug.as_str()
    };
    format!("{}-{}-{}.pdf", kind.id(), company, date.format("%Y-%m-%d"))
}

/// Lowercase ASCII slug. Swedish letters fold to their base letter and
/// every other run of non-alphanumerics becomes a single `-`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for ch in s.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            'å' | 'ä' | 'á' | 'à' => 'a',
            'ö' | 'ø' | 'ó' => 'o',
            'é' | 'è' | 'ë' => 'e',
            'ü' | 'ú' => 'u',
            c => c,
        };
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(folded);
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn filename_with_company() {
        assert_eq!(
            report_filename(ReportKind::Analysis, "Acme AB", date()),
            "analysrapport-acme-ab-2026-03-09.pdf"
        );
    }

    #[test]
    fn filename_folds_swedish_letters() {
        assert_eq!(
            report_filename(ReportKind::Preparation, "Åkes Bygg & Måleri AB", date()),
            "forberedelseplan-akes-bygg-maleri-ab-2026-03-09.pdf"
        );
    }

    #[test]
    fn filename_placeholder_when_blank() {
        assert_eq!(
            report_filename(ReportKind::Analysis, "   ", date()),
            "analysrapport-foretag-2026-03-09.pdf"
        );
        assert_eq!(
            report_filename(ReportKind::Analysis, "&&&", date()),
            "analysrapport-foretag-2026-03-09.pdf"
        );
    }

    #[test]
    fn slug_trims_separators() {
        assert_eq!(slugify("  --Öst & Väst--  "), "ost-vast");
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [ReportKind::Analysis, ReportKind::Preparation] {
            assert_eq!(kind.id().parse::<ReportKind>().unwrap(), kind);
        }
        assert!("pdf".parse::<ReportKind>().is_err());
    }
}
