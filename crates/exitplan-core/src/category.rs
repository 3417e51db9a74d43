//! Company-data categories edited in the data-entry modal, and their status.
//!
//! Status is never stored: [`classify`] derives it from the field values and
//! the generated-summary map on every call, so a badge can't drift out of
//! sync with the data it describes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::answers::CustomerShare;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    FinancialDocs,
    BusinessRelations,
    KeyPerson,
    BalanceSheet,
    LegalDocs,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::FinancialDocs,
        Category::BusinessRelations,
        Category::KeyPerson,
        Category::BalanceSheet,
        Category::LegalDocs,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::FinancialDocs => "financialDocs",
            Category::BusinessRelations => "businessRelations",
            Category::KeyPerson => "keyPerson",
            Category::BalanceSheet => "balanceSheet",
            Category::LegalDocs => "legalDocs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::FinancialDocs => "Finansiella dokument",
            Category::BusinessRelations => "Affärsrelationer",
            Category::KeyPerson => "Nyckelpersonsberoende",
            Category::BalanceSheet => "Balansräkning",
            Category::LegalDocs => "Juridiska dokument",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the camelCase id or its kebab-case spelling (`key-person`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '-').collect();
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

// ── Category shapes ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialDocs {
    pub annual_reports: bool,
    pub monthly_reports: bool,
    pub budget: bool,
    pub ebitda: String,
    pub auditor: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessRelations {
    pub top_customers: Vec<CustomerShare>,
    pub written_contracts: bool,
    pub key_suppliers: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyEmployee {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyPerson {
    pub owner_roles: Vec<String>,
    pub has_deputy: bool,
    pub documented_processes: bool,
    pub key_employees: Vec<KeyEmployee>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalanceSheet {
    pub shareholder_loans: bool,
    pub excess_cash: String,
    pub inventory_value: String,
    pub receivables: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalDocs {
    pub articles_of_association: bool,
    pub shareholder_agreement: bool,
    pub ip_registered: bool,
    pub disputes: String,
    pub permits: Vec<String>,
    pub notes: String,
}

/// One category's data, owned. Used when a whole category is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "camelCase")]
pub enum CategoryData {
    FinancialDocs(FinancialDocs),
    BusinessRelations(BusinessRelations),
    KeyPerson(KeyPerson),
    BalanceSheet(BalanceSheet),
    LegalDocs(LegalDocs),
}

impl CategoryData {
    pub fn category(&self) -> Category {
        match self {
            CategoryData::FinancialDocs(_) => Category::FinancialDocs,
            CategoryData::BusinessRelations(_) => Category::BusinessRelations,
            CategoryData::KeyPerson(_) => Category::KeyPerson,
            CategoryData::BalanceSheet(_) => Category::BalanceSheet,
            CategoryData::LegalDocs(_) => Category::LegalDocs,
        }
    }

    /// The category's own fields as a JSON object, without the tag.
    pub fn fields_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            CategoryData::FinancialDocs(d) => serde_json::to_value(d),
            CategoryData::BusinessRelations(d) => serde_json::to_value(d),
            CategoryData::KeyPerson(d) => serde_json::to_value(d),
            CategoryData::BalanceSheet(d) => serde_json::to_value(d),
            CategoryData::LegalDocs(d) => serde_json::to_value(d),
        }
    }
}

/// One category's data, borrowed from [`CompanyData`].
#[derive(Debug, Clone, Copy)]
pub enum CategoryRef<'a> {
    FinancialDocs(&'a FinancialDocs),
    BusinessRelations(&'a BusinessRelations),
    KeyPerson(&'a KeyPerson),
    BalanceSheet(&'a BalanceSheet),
    LegalDocs(&'a LegalDocs),
}

impl CategoryRef<'_> {
    pub fn category(self) -> Category {
        match self {
            CategoryRef::FinancialDocs(_) => Category::FinancialDocs,
            CategoryRef::BusinessRelations(_) => Category::BusinessRelations,
            CategoryRef::KeyPerson(_) => Category::KeyPerson,
            CategoryRef::BalanceSheet(_) => Category::BalanceSheet,
            CategoryRef::LegalDocs(_) => Category::LegalDocs,
        }
    }

    /// True if at least one field carries user data.
    pub fn is_populated(self) -> bool {
        match self {
            CategoryRef::FinancialDocs(d) => {
                let FinancialDocs {
                    annual_reports,
                    monthly_reports,
                    budget,
                    ebitda,
                    auditor,
                    notes,
                } = d;
                *annual_reports
                    || *monthly_reports
                    || *budget
                    || has_text(ebitda)
                    || has_text(auditor)
                    || has_text(notes)
            }
            CategoryRef::BusinessRelations(d) => {
                let BusinessRelations {
                    top_customers,
                    written_contracts,
                    key_suppliers,
                    notes,
                } = d;
                top_customers.iter().any(CustomerShare::has_any_text)
                    || *written_contracts
                    || any_text(key_suppliers)
                    || has_text(notes)
            }
            CategoryRef::KeyPerson(d) => {
                let KeyPerson {
                    owner_roles,
                    has_deputy,
                    documented_processes,
                    key_employees,
                    notes,
                } = d;
                any_text(owner_roles)
                    || *has_deputy
                    || *documented_processes
                    || key_employees.iter().any(KeyEmployee::has_any_text)
                    || has_text(notes)
            }
            CategoryRef::BalanceSheet(d) => {
                let BalanceSheet {
                    shareholder_loans,
                    excess_cash,
                    inventory_value,
                    receivables,
                    notes,
                } = d;
                *shareholder_loans
                    || has_text(excess_cash)
                    || has_text(inventory_value)
                    || has_text(receivables)
                    || has_text(notes)
            }
            CategoryRef::LegalDocs(d) => {
                let LegalDocs {
                    articles_of_association,
                    shareholder_agreement,
                    ip_registered,
                    disputes,
                    permits,
                    notes,
                } = d;
                *articles_of_association
                    || *shareholder_agreement
                    || *ip_registered
                    || has_text(disputes)
                    || any_text(permits)
                    || has_text(notes)
            }
        }
    }
}

impl KeyEmployee {
    fn has_any_text(&self) -> bool {
        has_text(&self.name) || has_text(&self.role)
    }
}

/// All five categories as edited in the company-profile modal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyData {
    pub financial_docs: FinancialDocs,
    pub business_relations: BusinessRelations,
    pub key_person: KeyPerson,
    pub balance_sheet: BalanceSheet,
    pub legal_docs: LegalDocs,
}

impl CompanyData {
    pub fn get(&self, category: Category) -> CategoryRef<'_> {
        match category {
            Category::FinancialDocs => CategoryRef::FinancialDocs(&self.financial_docs),
            Category::BusinessRelations => CategoryRef::BusinessRelations(&self.business_relations),
            Category::KeyPerson => CategoryRef::KeyPerson(&self.key_person),
            Category::BalanceSheet => CategoryRef::BalanceSheet(&self.balance_sheet),
            Category::LegalDocs => CategoryRef::LegalDocs(&self.legal_docs),
        }
    }

    /// Replace one category wholesale.
    pub fn set(&mut self, data: CategoryData) {
        match data {
            CategoryData::FinancialDocs(d) => self.financial_docs = d,
            CategoryData::BusinessRelations(d) => self.business_relations = d,
            CategoryData::KeyPerson(d) => self.key_person = d,
            CategoryData::BalanceSheet(d) => self.balance_sheet = d,
            CategoryData::LegalDocs(d) => self.legal_docs = d,
        }
    }

    /// Owned copy of one category, as sent to the summary generator.
    pub fn to_data(&self, category: Category) -> CategoryData {
        match self.get(category) {
            CategoryRef::FinancialDocs(d) => CategoryData::FinancialDocs(d.clone()),
            CategoryRef::BusinessRelations(d) => CategoryData::BusinessRelations(d.clone()),
            CategoryRef::KeyPerson(d) => CategoryData::KeyPerson(d.clone()),
            CategoryRef::BalanceSheet(d) => CategoryData::BalanceSheet(d.clone()),
            CategoryRef::LegalDocs(d) => CategoryData::LegalDocs(d.clone()),
        }
    }

    /// Overlay extracted values onto one category.
    ///
    /// Non-blank strings overwrite, `true` flags are set, and lists with at
    /// least one populated entry replace the current list. Anything the
    /// extraction left empty keeps what the user typed.
    pub fn absorb(&mut self, incoming: &CategoryData) {
        match incoming {
            CategoryData::FinancialDocs(src) => {
                let dst = &mut self.financial_docs;
                set_flag(&mut dst.annual_reports, src.annual_reports);
                set_flag(&mut dst.monthly_reports, src.monthly_reports);
                set_flag(&mut dst.budget, src.budget);
                set_text(&mut dst.ebitda, &src.ebitda);
                set_text(&mut dst.auditor, &src.auditor);
                set_text(&mut dst.notes, &src.notes);
            }
            CategoryData::BusinessRelations(src) => {
                let dst = &mut self.business_relations;
                if src.top_customers.iter().any(CustomerShare::has_any_text) {
                    dst.top_customers = src.top_customers.clone();
                }
                set_flag(&mut dst.written_contracts, src.written_contracts);
                set_list(&mut dst.key_suppliers, &src.key_suppliers);
                set_text(&mut dst.notes, &src.notes);
            }
            CategoryData::KeyPerson(src) => {
                let dst = &mut self.key_person;
                set_list(&mut dst.owner_roles, &src.owner_roles);
                set_flag(&mut dst.has_deputy, src.has_deputy);
                set_flag(&mut dst.documented_processes, src.documented_processes);
                if src.key_employees.iter().any(KeyEmployee::has_any_text) {
                    dst.key_employees = src.key_employees.clone();
                }
                set_text(&mut dst.notes, &src.notes);
            }
            CategoryData::BalanceSheet(src) => {
                let dst = &mut self.balance_sheet;
                set_flag(&mut dst.shareholder_loans, src.shareholder_loans);
                set_text(&mut dst.excess_cash, &src.excess_cash);
                set_text(&mut dst.inventory_value, &src.inventory_value);
                set_text(&mut dst.receivables, &src.receivables);
                set_text(&mut dst.notes, &src.notes);
            }
            CategoryData::LegalDocs(src) => {
                let dst = &mut self.legal_docs;
                set_flag(&mut dst.articles_of_association, src.articles_of_association);
                set_flag(&mut dst.shareholder_agreement, src.shareholder_agreement);
                set_flag(&mut dst.ip_registered, src.ip_registered);
                set_text(&mut dst.disputes, &src.disputes);
                set_list(&mut dst.permits, &src.permits);
                set_text(&mut dst.notes, &src.notes);
            }
        }
    }
}

// ── Status ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Empty,
    Filled,
    Generated,
}

impl CategoryStatus {
    pub fn label(self) -> &'static str {
        match self {
            CategoryStatus::Empty => "Ej ifylld",
            CategoryStatus::Filled => "Ifylld",
            CategoryStatus::Generated => "Sammanfattad",
        }
    }
}

/// AI-written summaries per category. Absence means "not generated yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedSummaries(BTreeMap<Category, String>);

impl GeneratedSummaries {
    /// Store a summary. Blank text is ignored.
    pub fn insert(&mut self, category: Category, summary: String) {
        if has_text(&summary) {
            self.0.insert(category, summary);
        }
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.0.iter().map(|(c, s)| (*c, s.as_str()))
    }
}

/// Derive the tri-state badge for one category.
///
/// A generated summary wins over everything, even if every field has since
/// been cleared.
pub fn classify(data: CategoryRef<'_>, summaries: &GeneratedSummaries) -> CategoryStatus {
    if summaries.contains(data.category()) {
        CategoryStatus::Generated
    } else if data.is_populated() {
        CategoryStatus::Filled
    } else {
        CategoryStatus::Empty
    }
}

/// Status for every category, in display order.
pub fn classify_all(
    company: &CompanyData,
    summaries: &GeneratedSummaries,
) -> Vec<(Category, CategoryStatus)> {
    Category::ALL
        .into_iter()
        .map(|c| (c, classify(company.get(c), summaries)))
        .collect()
}

// ── Helpers ──

pub(crate) fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

fn any_text(items: &[String]) -> bool {
    items.iter().any(|s| has_text(s))
}

fn set_flag(dst: &mut bool, src: bool) {
    if src {
        *dst = true;
    }
}

fn set_text(dst: &mut String, src: &str) {
    if has_text(src) {
        *dst = src.to_string();
    }
}

fn set_list(dst: &mut Vec<String>, src: &[String]) {
    if any_text(src) {
        *dst = src.to_vec();
    }
}
