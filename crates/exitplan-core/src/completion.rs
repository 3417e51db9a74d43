//! Step completion rules.
//!
//! Each numbered step has an explicit conjunction of field predicates. The
//! summary step is a roll-up over [`DEPENDENT_STEPS`] and is recomputed from
//! the answers on every call; nothing here caches.

use std::ops::RangeInclusive;

use crate::answers::AnswerState;
use crate::category::has_text;
use crate::vocabulary::{self, Choice, Industry, NextStep, ProfitTrend, SaleTimeline, Scale, YesNo};

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 10;

/// Steps whose own rules feed the summary roll-up and the readiness percentage.
pub const DEPENDENT_STEPS: RangeInclusive<u8> = 1..=8;

/// The roll-up step. Also the readiness step past which the complete analysis runs.
pub const SUMMARY_STEP: u8 = 9;

/// The trailing "what next" step.
pub const NEXT_STEP_STEP: u8 = 10;

// Minimum lengths for free-text answers, in characters after trimming.
const WHY_SELL_MIN: usize = 10;
const BUSINESS_DESCRIPTION_MIN: usize = 20;
const SHORT_COMMENT_MIN: usize = 5;

/// Whether `step`'s mandatory inputs are satisfied. Unknown step ids are never complete.
pub fn is_step_complete(answers: &AnswerState, step: u8) -> bool {
    let a = answers;
    match step {
        1 => {
            present(&a.company_name)
                && present(&a.org_number)
                && min_chars(&a.why_sell, WHY_SELL_MIN)
                && chosen::<Scale>(&a.strategy_scale)
        }
        2 => {
            chosen::<Industry>(&a.industry)
                && min_chars(&a.business_description, BUSINESS_DESCRIPTION_MIN)
                && present(&a.employee_count)
                && present(&a.revenue_last_year)
        }
        3 => {
            a.revenue.years().iter().all(|y| present(y))
                && chosen::<ProfitTrend>(&a.profit_trend)
                && chosen::<YesNo>(&a.audited_accounts)
        }
        4 => {
            chosen::<Scale>(&a.customer_concentration)
                && a.top_customers.iter().any(|c| present(&c.name))
                && min_chars(&a.customer_comment, SHORT_COMMENT_MIN)
        }
        5 => {
            chosen::<Scale>(&a.owner_dependency)
                && chosen::<YesNo>(&a.succession_plan)
                && min_chars(&a.key_person_comment, SHORT_COMMENT_MIN)
        }
        6 => chosen::<YesNo>(&a.balance_sheet_clean) && !a.non_operating_assets.is_empty(),
        7 => {
            chosen::<Scale>(&a.legal_readiness)
                && chosen::<YesNo>(&a.pending_disputes)
                && !a.legal_documents.is_empty()
        }
        8 => {
            present(&a.price_expectation)
                && chosen::<SaleTimeline>(&a.sale_timeline)
                && !a.buyer_types.is_empty()
        }
        SUMMARY_STEP => DEPENDENT_STEPS.into_iter().all(|s| is_step_complete(a, s)),
        NEXT_STEP_STEP => chosen::<NextStep>(&a.next_step_choice),
        _ => false,
    }
}

/// Aggregate completion across the whole wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Complete steps out of all steps, roll-up and trailing step included.
    pub completed: usize,
    pub total: usize,
    /// Complete steps within [`DEPENDENT_STEPS`].
    pub main_completed: usize,
    pub main_total: usize,
}

impl Completion {
    pub fn of(answers: &AnswerState) -> Self {
        let completed = (FIRST_STEP..=LAST_STEP)
            .filter(|s| is_step_complete(answers, *s))
            .count();
        let main_completed = DEPENDENT_STEPS
            .filter(|s| is_step_complete(answers, *s))
            .count();
        Self {
            completed,
            total: usize::from(LAST_STEP - FIRST_STEP + 1),
            main_completed,
            main_total: DEPENDENT_STEPS.count(),
        }
    }

    /// Content-based readiness over the dependent steps, 0–100, rounded.
    pub fn readiness_percent(&self) -> u8 {
        if self.main_total == 0 {
            return 0;
        }
        ((self.main_completed * 100 + self.main_total / 2) / self.main_total) as u8
    }

    pub fn is_ready(&self) -> bool {
        self.main_completed == self.main_total
    }
}

/// Ids of dependent steps that are still incomplete, in order.
pub fn missing_steps(answers: &AnswerState) -> Vec<u8> {
    DEPENDENT_STEPS
        .filter(|s| !is_step_complete(answers, *s))
        .collect()
}

// ── Field predicates ──

fn present(value: &str) -> bool {
    has_text(value)
}

fn min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

fn chosen<C: Choice>(value: &str) -> bool {
    vocabulary::is_choice::<C>(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{AnswerField, CustomerShare, MultiField, RevenueYear};

    fn step_one() -> AnswerState {
        AnswerState {
            company_name: "Acme AB".into(),
            org_number: "556000-0000".into(),
            why_sell: "Vill pensionera mig och trappa ner".into(),
            strategy_scale: "4".into(),
            ..Default::default()
        }
    }

    /// Answers that satisfy every dependent step.
    fn all_main_steps() -> AnswerState {
        let mut a = step_one();
        a.industry = "bygg".into();
        a.business_description = "Totalentreprenader åt privatkunder i Mälardalen".into();
        a.employee_count = "14".into();
        a.revenue_last_year = "18 000 000".into();
        a.revenue.year1 = "15 000 000".into();
        a.revenue.year2 = "16 500 000".into();
        a.revenue.year3 = "18 000 000".into();
        a.profit_trend = "vaxande".into();
        a.audited_accounts = "ja".into();
        a.customer_concentration = "2".into();
        a.top_customers = vec![CustomerShare {
            name: "Bostadsbolaget".into(),
            percentage: "22".into(),
        }];
        a.customer_comment = "Spridd kundbas".into();
        a.owner_dependency = "3".into();
        a.succession_plan = "nej".into();
        a.key_person_comment = "Platschef kan ta över".into();
        a.balance_sheet_clean = "ja".into();
        a.non_operating_assets = vec!["inga".into()];
        a.legal_readiness = "4".into();
        a.pending_disputes = "nej".into();
        a.legal_documents = vec!["bolagsordning".into()];
        a.price_expectation = "25000000".into();
        a.sale_timeline = "6-12".into();
        a.buyer_types = vec!["konkurrent".into()];
        a
    }

    #[test]
    fn step_one_complete_with_valid_answers() {
        assert!(is_step_complete(&step_one(), 1));
    }

    #[test]
    fn step_one_rejects_short_rationale() {
        let mut a = step_one();
        a.why_sell = "Pension".into();
        assert!(!is_step_complete(&a, 1));
    }

    #[test]
    fn whitespace_only_counts_as_absent() {
        let mut a = step_one();
        a.org_number = "   \t".into();
        assert!(!is_step_complete(&a, 1));
    }

    #[test]
    fn min_length_is_measured_after_trim() {
        let mut a = step_one();
        a.why_sell = "   Pension   ".into();
        assert!(!is_step_complete(&a, 1));
        a.why_sell = "Pensionera".into();
        assert!(is_step_complete(&a, 1));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let mut a = step_one();
        // 9 characters, 18 bytes.
        a.why_sell = "åäöåäöåäö".into();
        assert!(!is_step_complete(&a, 1));
    }

    #[test]
    fn selection_must_come_from_vocabulary() {
        let mut a = step_one();
        a.strategy_scale = "7".into();
        assert!(!is_step_complete(&a, 1));
        a.strategy_scale = " 5 ".into();
        assert!(is_step_complete(&a, 1));
    }

    #[test]
    fn numeric_fields_only_need_text() {
        let mut a = all_main_steps();
        a.price_expectation = "ungefär tjugo miljoner".into();
        assert!(is_step_complete(&a, 8));
    }

    #[test]
    fn multi_select_counts_any_option() {
        let mut a = all_main_steps();
        a.non_operating_assets = vec!["inga".into()];
        assert!(is_step_complete(&a, 6));
        a.non_operating_assets.clear();
        assert!(!is_step_complete(&a, 6));
    }

    #[test]
    fn customers_need_a_named_entry() {
        let mut a = all_main_steps();
        a.top_customers = vec![CustomerShare {
            name: " ".into(),
            percentage: "50".into(),
        }];
        assert!(!is_step_complete(&a, 4));
    }

    #[test]
    fn summary_rolls_up_dependent_steps() {
        let mut a = all_main_steps();
        for step in DEPENDENT_STEPS {
            assert!(is_step_complete(&a, step), "step {step} should be complete");
        }
        assert!(is_step_complete(&a, SUMMARY_STEP));

        a.revenue.year2 = String::new();
        assert!(!is_step_complete(&a, 3));
        assert!(!is_step_complete(&a, SUMMARY_STEP));

        a.revenue.year2 = "16 500 000".into();
        assert!(is_step_complete(&a, SUMMARY_STEP));
    }

    /// Every scalar conjunct of steps 1..=8, with an out-of-vocabulary or
    /// too-short value where one applies.
    const SCALAR_RULES: &[(u8, AnswerField, Option<&str>)] = &[
        (1, AnswerField::CompanyName, None),
        (1, AnswerField::OrgNumber, None),
        (1, AnswerField::WhySell, Some("Pension")),
        (1, AnswerField::StrategyScale, Some("6")),
        (2, AnswerField::Industry, Some("fiske")),
        (2, AnswerField::BusinessDescription, Some("Bygger hus")),
        (2, AnswerField::EmployeeCount, None),
        (2, AnswerField::RevenueLastYear, None),
        (3, AnswerField::ProfitTrend, Some("okand")),
        (3, AnswerField::AuditedAccounts, Some("kanske")),
        (4, AnswerField::CustomerConcentration, Some("0")),
        (4, AnswerField::CustomerComment, Some("kort")),
        (5, AnswerField::OwnerDependency, Some("9")),
        (5, AnswerField::SuccessionPlan, Some("kanske")),
        (5, AnswerField::KeyPersonComment, Some("kort")),
        (6, AnswerField::BalanceSheetClean, Some("kanske")),
        (7, AnswerField::LegalReadiness, Some("6")),
        (7, AnswerField::PendingDisputes, Some("kanske")),
        (8, AnswerField::PriceExpectation, None),
        (8, AnswerField::SaleTimeline, Some("36+")),
    ];

    fn assert_breaks(a: &AnswerState, step: u8, what: &str) {
        assert!(!is_step_complete(a, step), "step {step} complete with {what}");
        assert!(
            !is_step_complete(a, SUMMARY_STEP),
            "summary complete with {what}"
        );
        assert_eq!(missing_steps(a), vec![step], "{what}");
    }

    #[test]
    fn every_scalar_field_is_mandatory() {
        for &(step, field, invalid) in SCALAR_RULES {
            let mut values = vec![String::new(), "  \t ".to_string()];
            values.extend(invalid.map(str::to_string));
            for value in values {
                let mut a = all_main_steps();
                field.set(&mut a, value.clone());
                assert_breaks(&a, step, &format!("{field} = {value:?}"));
            }
        }
    }

    #[test]
    fn every_revenue_year_is_mandatory() {
        for year in [RevenueYear::First, RevenueYear::Second, RevenueYear::Third] {
            for value in ["", "   "] {
                let mut a = all_main_steps();
                a.revenue.set(year, value.into());
                assert_breaks(&a, 3, &format!("{year:?} = {value:?}"));
            }
        }
    }

    #[test]
    fn every_multi_select_needs_a_selection() {
        for &field in MultiField::ALL {
            let mut a = all_main_steps();
            let selected = field.get(&a).to_vec();
            for option in &selected {
                field.toggle(&mut a, option);
            }
            assert!(field.get(&a).is_empty());
            assert_breaks(&a, field.step(), field.name());
        }
    }

    #[test]
    fn top_customers_are_mandatory() {
        let mut a = all_main_steps();
        a.top_customers.clear();
        assert_breaks(&a, 4, "no customers");
    }

    #[test]
    fn business_description_boundary() {
        let mut a = all_main_steps();
        a.business_description = "a".repeat(BUSINESS_DESCRIPTION_MIN - 1);
        assert!(!is_step_complete(&a, 2));
        a.business_description = "a".repeat(BUSINESS_DESCRIPTION_MIN);
        assert!(is_step_complete(&a, 2));
        assert_eq!(BUSINESS_DESCRIPTION_MIN, 20);
    }

    #[test]
    fn short_comment_boundaries() {
        assert_eq!(SHORT_COMMENT_MIN, 5);
        let mut a = all_main_steps();
        a.customer_comment = "abcd".into();
        assert!(!is_step_complete(&a, 4));
        a.customer_comment = "abcde".into();
        assert!(is_step_complete(&a, 4));

        a.key_person_comment = "abcd".into();
        assert!(!is_step_complete(&a, 5));
        a.key_person_comment = " abcde ".into();
        assert!(is_step_complete(&a, 5));
    }

    #[test]
    fn why_sell_boundary() {
        assert_eq!(WHY_SELL_MIN, 10);
        let mut a = step_one();
        a.why_sell = "a".repeat(9);
        assert!(!is_step_complete(&a, 1));
        a.why_sell = "a".repeat(10);
        assert!(is_step_complete(&a, 1));
    }

    #[test]
    fn summary_ignores_trailing_step() {
        let a = all_main_steps();
        assert!(a.next_step_choice.is_empty());
        assert!(is_step_complete(&a, SUMMARY_STEP));
        assert!(!is_step_complete(&a, NEXT_STEP_STEP));
    }

    #[test]
    fn trailing_step_has_single_rule() {
        let a = AnswerState {
            next_step_choice: "radgivare".into(),
            ..Default::default()
        };
        assert!(is_step_complete(&a, NEXT_STEP_STEP));
    }

    #[test]
    fn out_of_range_steps_are_incomplete() {
        let a = all_main_steps();
        assert!(!is_step_complete(&a, 0));
        assert!(!is_step_complete(&a, 11));
    }

    #[test]
    fn readiness_excludes_summary_and_trailing_steps() {
        let empty = Completion::of(&AnswerState::default());
        assert_eq!(empty.completed, 0);
        assert_eq!(empty.main_total, 8);
        assert_eq!(empty.readiness_percent(), 0);

        let partial = Completion::of(&step_one());
        assert_eq!(partial.main_completed, 1);
        assert_eq!(partial.readiness_percent(), 13);

        let mut full = all_main_steps();
        full.next_step_choice = "sjalv".into();
        let done = Completion::of(&full);
        assert_eq!(done.completed, 10);
        assert_eq!(done.total, 10);
        assert_eq!(done.readiness_percent(), 100);
        assert!(done.is_ready());
    }

    #[test]
    fn missing_steps_lists_gaps_in_order() {
        let mut a = all_main_steps();
        a.sale_timeline.clear();
        a.customer_comment = "ok".into();
        assert_eq!(missing_steps(&a), vec![4, 8]);
    }
}
