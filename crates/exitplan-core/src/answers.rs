//! The wizard's answer state and typed field handles.
//!
//! The browser form reads and writes fields by string key; here each
//! scalar field is an [`AnswerField`] variant and each multi-select an
//! [`MultiField`] variant, so every access is checked at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::category::{CompanyData, has_text};
use crate::vocabulary;

/// Revenue for the last three fiscal years, oldest first, as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevenueBreakdown {
    pub year1: String,
    pub year2: String,
    pub year3: String,
}

impl RevenueBreakdown {
    pub fn years(&self) -> [&str; 3] {
        [
            self.year1.as_str(),
            self.year2.as_str(),
            self.year3.as_str(),
        ]
    }

    pub fn set(&mut self, year: RevenueYear, value: String) {
        match year {
            RevenueYear::First => self.year1 = value,
            RevenueYear::Second => self.year2 = value,
            RevenueYear::Third => self.year3 = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueYear {
    First,
    Second,
    Third,
}

/// A customer and its share of revenue, e.g. `{"name": "Kommunen", "percentage": "35"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerShare {
    pub name: String,
    pub percentage: String,
}

impl CustomerShare {
    pub(crate) fn has_any_text(&self) -> bool {
        has_text(&self.name) || has_text(&self.percentage)
    }
}

/// Everything the owner has entered so far. Created empty when the wizard
/// starts and edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerState {
    // Step 1
    pub company_name: String,
    pub org_number: String,
    pub website: String,
    pub why_sell: String,
    pub strategy_scale: String,
    // Step 2
    pub industry: String,
    pub business_description: String,
    pub employee_count: String,
    pub revenue_last_year: String,
    // Step 3
    pub revenue: RevenueBreakdown,
    pub profit_trend: String,
    pub audited_accounts: String,
    // Step 4
    pub customer_concentration: String,
    pub top_customers: Vec<CustomerShare>,
    pub customer_comment: String,
    // Step 5
    pub owner_dependency: String,
    pub succession_plan: String,
    pub key_person_comment: String,
    // Step 6
    pub balance_sheet_clean: String,
    pub non_operating_assets: Vec<String>,
    // Step 7
    pub legal_readiness: String,
    pub pending_disputes: String,
    pub legal_documents: Vec<String>,
    // Step 8
    pub price_expectation: String,
    pub sale_timeline: String,
    pub buyer_types: Vec<String>,
    // Step 10
    pub next_step_choice: String,

    pub company_data: CompanyData,
}

// ── Scalar fields ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerField {
    CompanyName,
    OrgNumber,
    Website,
    WhySell,
    StrategyScale,
    Industry,
    BusinessDescription,
    EmployeeCount,
    RevenueLastYear,
    ProfitTrend,
    AuditedAccounts,
    CustomerConcentration,
    CustomerComment,
    OwnerDependency,
    SuccessionPlan,
    KeyPersonComment,
    BalanceSheetClean,
    LegalReadiness,
    PendingDisputes,
    PriceExpectation,
    SaleTimeline,
    NextStepChoice,
}

impl AnswerField {
    pub const ALL: &'static [AnswerField] = &[
        AnswerField::CompanyName,
        AnswerField::OrgNumber,
        AnswerField::Website,
        AnswerField::WhySell,
        AnswerField::StrategyScale,
        AnswerField::Industry,
        AnswerField::BusinessDescription,
        AnswerField::EmployeeCount,
        AnswerField::RevenueLastYear,
        AnswerField::ProfitTrend,
        AnswerField::AuditedAccounts,
        AnswerField::CustomerConcentration,
        AnswerField::CustomerComment,
        AnswerField::OwnerDependency,
        AnswerField::SuccessionPlan,
        AnswerField::KeyPersonComment,
        AnswerField::BalanceSheetClean,
        AnswerField::LegalReadiness,
        AnswerField::PendingDisputes,
        AnswerField::PriceExpectation,
        AnswerField::SaleTimeline,
        AnswerField::NextStepChoice,
    ];

    /// Kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            AnswerField::CompanyName => "company-name",
            AnswerField::OrgNumber => "org-number",
            AnswerField::Website => "website",
            AnswerField::WhySell => "why-sell",
            AnswerField::StrategyScale => "strategy-scale",
            AnswerField::Industry => "industry",
            AnswerField::BusinessDescription => "business-description",
            AnswerField::EmployeeCount => "employee-count",
            AnswerField::RevenueLastYear => "revenue-last-year",
            AnswerField::ProfitTrend => "profit-trend",
            AnswerField::AuditedAccounts => "audited-accounts",
            AnswerField::CustomerConcentration => "customer-concentration",
            AnswerField::CustomerComment => "customer-comment",
            AnswerField::OwnerDependency => "owner-dependency",
            AnswerField::SuccessionPlan => "succession-plan",
            AnswerField::KeyPersonComment => "key-person-comment",
            AnswerField::BalanceSheetClean => "balance-sheet-clean",
            AnswerField::LegalReadiness => "legal-readiness",
            AnswerField::PendingDisputes => "pending-disputes",
            AnswerField::PriceExpectation => "price-expectation",
            AnswerField::SaleTimeline => "sale-timeline",
            AnswerField::NextStepChoice => "next-step-choice",
        }
    }

    pub fn get(self, answers: &AnswerState) -> &str {
        self.slot_ref(answers)
    }

    pub fn set(self, answers: &mut AnswerState, value: String) {
        *self.slot_mut(answers) = value;
    }

    fn slot_ref(self, a: &AnswerState) -> &String {
        match self {
            AnswerField::CompanyName => &a.company_name,
            AnswerField::OrgNumber => &a.org_number,
            AnswerField::Website => &a.website,
            AnswerField::WhySell => &a.why_sell,
            AnswerField::StrategyScale => &a.strategy_scale,
            AnswerField::Industry => &a.industry,
            AnswerField::BusinessDescription => &a.business_description,
            AnswerField::EmployeeCount => &a.employee_count,
            AnswerField::RevenueLastYear => &a.revenue_last_year,
            AnswerField::ProfitTrend => &a.profit_trend,
            AnswerField::AuditedAccounts => &a.audited_accounts,
            AnswerField::CustomerConcentration => &a.customer_concentration,
            AnswerField::CustomerComment => &a.customer_comment,
            AnswerField::OwnerDependency => &a.owner_dependency,
            AnswerField::SuccessionPlan => &a.succession_plan,
            AnswerField::KeyPersonComment => &a.key_person_comment,
            AnswerField::BalanceSheetClean => &a.balance_sheet_clean,
            AnswerField::LegalReadiness => &a.legal_readiness,
            AnswerField::PendingDisputes => &a.pending_disputes,
            AnswerField::PriceExpectation => &a.price_expectation,
            AnswerField::SaleTimeline => &a.sale_timeline,
            AnswerField::NextStepChoice => &a.next_step_choice,
        }
    }

    fn slot_mut(self, a: &mut AnswerState) -> &mut String {
        match self {
            AnswerField::CompanyName => &mut a.company_name,
            AnswerField::OrgNumber => &mut a.org_number,
            AnswerField::Website => &mut a.website,
            AnswerField::WhySell => &mut a.why_sell,
            AnswerField::StrategyScale => &mut a.strategy_scale,
            AnswerField::Industry => &mut a.industry,
            AnswerField::BusinessDescription => &mut a.business_description,
            AnswerField::EmployeeCount => &mut a.employee_count,
            AnswerField::RevenueLastYear => &mut a.revenue_last_year,
            AnswerField::ProfitTrend => &mut a.profit_trend,
            AnswerField::AuditedAccounts => &mut a.audited_accounts,
            AnswerField::CustomerConcentration => &mut a.customer_concentration,
            AnswerField::CustomerComment => &mut a.customer_comment,
            AnswerField::OwnerDependency => &mut a.owner_dependency,
            AnswerField::SuccessionPlan => &mut a.succession_plan,
            AnswerField::KeyPersonComment => &mut a.key_person_comment,
            AnswerField::BalanceSheetClean => &mut a.balance_sheet_clean,
            AnswerField::LegalReadiness => &mut a.legal_readiness,
            AnswerField::PendingDisputes => &mut a.pending_disputes,
            AnswerField::PriceExpectation => &mut a.price_expectation,
            AnswerField::SaleTimeline => &mut a.sale_timeline,
            AnswerField::NextStepChoice => &mut a.next_step_choice,
        }
    }
}

impl fmt::Display for AnswerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnswerField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnswerField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s.trim())
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

// ── Multi-select fields ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiField {
    NonOperatingAssets,
    LegalDocuments,
    BuyerTypes,
}

impl MultiField {
    pub const ALL: &'static [MultiField] = &[
        MultiField::NonOperatingAssets,
        MultiField::LegalDocuments,
        MultiField::BuyerTypes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MultiField::NonOperatingAssets => "non-operating-assets",
            MultiField::LegalDocuments => "legal-documents",
            MultiField::BuyerTypes => "buyer-types",
        }
    }

    /// The options offered by the form.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            MultiField::NonOperatingAssets => vocabulary::NON_OPERATING_ASSETS,
            MultiField::LegalDocuments => vocabulary::LEGAL_DOCUMENTS,
            MultiField::BuyerTypes => vocabulary::BUYER_TYPES,
        }
    }

    /// The step whose completion rule reads this field.
    pub fn step(self) -> u8 {
        match self {
            MultiField::NonOperatingAssets => 6,
            MultiField::LegalDocuments => 7,
            MultiField::BuyerTypes => 8,
        }
    }

    /// Check that toggling `option` is allowed: it must be one of
    /// [`Self::options`], or already selected so it can be removed.
    pub fn check_option(self, a: &AnswerState, option: &str) -> Result<(), CoreError> {
        let option = option.trim();
        if self.options().contains(&option) || self.get(a).iter().any(|o| o == option) {
            return Ok(());
        }
        Err(CoreError::UnknownOption {
            field: self.name(),
            value: option.to_string(),
            expected: self.options().join(", "),
        })
    }

    pub fn get(self, a: &AnswerState) -> &[String] {
        match self {
            MultiField::NonOperatingAssets => &a.non_operating_assets,
            MultiField::LegalDocuments => &a.legal_documents,
            MultiField::BuyerTypes => &a.buyer_types,
        }
    }

    /// Select `option` if unselected, otherwise deselect it.
    pub fn toggle(self, a: &mut AnswerState, option: &str) {
        let option = option.trim();
        if option.is_empty() {
            return;
        }
        let list = match self {
            MultiField::NonOperatingAssets => &mut a.non_operating_assets,
            MultiField::LegalDocuments => &mut a.legal_documents,
            MultiField::BuyerTypes => &mut a.buyer_types,
        };
        if let Some(pos) = list.iter().position(|o| o == option) {
            list.remove(pos);
        } else {
            list.push(option.to_string());
        }
    }
}

impl fmt::Display for MultiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MultiField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MultiField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s.trim())
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_every_field() {
        let mut answers = AnswerState::default();
        for (i, field) in AnswerField::ALL.iter().enumerate() {
            field.set(&mut answers, format!("v{i}"));
        }
        for (i, field) in AnswerField::ALL.iter().enumerate() {
            assert_eq!(field.get(&answers), format!("v{i}"), "{field}");
        }
    }

    #[test]
    fn field_names_parse_back() {
        for field in AnswerField::ALL {
            assert_eq!(field.name().parse::<AnswerField>().unwrap(), *field);
        }
        assert!("whySell".parse::<AnswerField>().is_err());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut answers = AnswerState::default();
        MultiField::BuyerTypes.toggle(&mut answers, "konkurrent");
        MultiField::BuyerTypes.toggle(&mut answers, "familj");
        assert_eq!(answers.buyer_types, vec!["konkurrent", "familj"]);

        MultiField::BuyerTypes.toggle(&mut answers, "konkurrent");
        assert_eq!(answers.buyer_types, vec!["familj"]);
    }

    #[test]
    fn options_are_checked_against_the_form_list() {
        let mut answers = AnswerState::default();
        assert!(MultiField::BuyerTypes.check_option(&answers, " familj ").is_ok());

        let err = MultiField::BuyerTypes
            .check_option(&answers, "utlandsk koncern")
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownOption { field: "buyer-types", .. }));
        assert!(err.to_string().contains("konkurrent"));

        // A stray value that got in by other means can still be deselected.
        answers.legal_documents.push("franchiseavtal".into());
        assert!(MultiField::LegalDocuments.check_option(&answers, "franchiseavtal").is_ok());
    }

    #[test]
    fn every_option_list_is_non_empty_and_unique() {
        for field in MultiField::ALL {
            let options = field.options();
            assert!(!options.is_empty(), "{field}");
            let unique: std::collections::HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), options.len(), "{field}");
        }
    }

    #[test]
    fn toggle_ignores_blank_option() {
        let mut answers = AnswerState::default();
        MultiField::LegalDocuments.toggle(&mut answers, "  ");
        assert!(answers.legal_documents.is_empty());
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let json = r#"{
            "companyName": "Acme AB",
            "whySell": "Vill pensionera mig",
            "revenue": { "year3": "12 000 000" },
            "topCustomers": [{ "name": "Kommunen", "percentage": "40" }]
        }"#;
        let answers: AnswerState = serde_json::from_str(json).unwrap();
        assert_eq!(answers.company_name, "Acme AB");
        assert_eq!(answers.revenue.year3, "12 000 000");
        assert!(answers.revenue.year1.is_empty());
        assert_eq!(answers.top_customers[0].percentage, "40");
        assert!(answers.org_number.is_empty());
    }
}
