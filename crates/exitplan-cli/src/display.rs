//! Terminal rendering of the wizard: status card, step content, analysis.

use exitplan_core::analysis::AnalysisResult;
use exitplan_core::api::ScrapeResult;
use exitplan_core::completion::{is_step_complete, missing_steps};
use exitplan_core::content::Visual;
use exitplan_core::vocabulary::{Choice, Industry};
use exitplan_core::{IndustryCatalog, MultiField, StepDefinition, WizardState};

const MAX_LIST_ITEMS: usize = 10;

// ── Status ──

/// Print the session as a card: position, readiness, steps, categories.
pub fn print_status(state: &WizardState, steps: &[StepDefinition]) {
    let answers = &state.answers;
    let name = answers.company_name.trim();
    println!("=== {} ===", if name.is_empty() { "(inget företagsnamn)" } else { name });
    if let Some(industry) = Industry::parse(&answers.industry) {
        println!("{}", industry.label());
    }
    println!();

    let nav = &state.navigator;
    let completion = state.completion();
    println!("Position");
    field("Steg", format!("{} av {}", nav.step_id(), nav.total()));
    if let Some(step) = steps.get(nav.index()) {
        field("Rubrik", &step.title);
    }
    field("Framsteg", format!("{} %", nav.progress_percent()));
    println!();

    println!("Beredskap");
    field(
        "Beredskap",
        format!(
            "{} % ({} av {} steg)",
            completion.readiness_percent(),
            completion.main_completed,
            completion.main_total
        ),
    );
    let missing = missing_steps(answers);
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(u8::to_string).collect();
        field("Saknas", format!("steg {}", ids.join(", ")));
    }
    println!();

    println!("Steg");
    for step in steps {
        let mark = if is_step_complete(answers, step.id) { "✓" } else { " " };
        let here = if step.id == nav.step_id() { "  ◀" } else { "" };
        println!("  {mark} {:>2} {}{here}", step.id, step.title);
    }
    println!();

    println!("Kategorier");
    for (category, status) in state.category_statuses() {
        field(category.label(), status.label());
    }
    println!();

    if let Some(analysis) = &state.analysis {
        println!("Analys");
        field("Total risk", format!("{}/10", analysis.overall_risk));
        if analysis.valuation.is_valid() {
            field(
                "Värdering",
                format!(
                    "{} – {}",
                    format_sek(analysis.valuation.low),
                    format_sek(analysis.valuation.high)
                ),
            );
        }
        println!();
    }

    if !state.uploads.is_empty() {
        println!("Filer");
        print_list(state.uploads.iter().map(|f| f.name.as_str()));
        println!();
    }
}

/// Inline error messages left by failed operations.
pub fn print_operation_errors(state: &WizardState) {
    for (op, message) in state.operations.errors() {
        eprintln!("  {:<26} {}", op.label(), message);
    }
}

// ── Step content ──

pub fn print_step(step: &StepDefinition) {
    println!("=== {}. {} ===", step.id, step.title);
    if !step.subtitle.is_empty() {
        println!("{}", step.subtitle);
    }
    if !step.duration.is_empty() {
        println!("({})", step.duration);
    }
    println!();
    if !step.fact.is_empty() {
        println!("  » {}", step.fact);
        println!();
    }
    for field in MultiField::ALL.iter().filter(|f| f.step() == step.id) {
        println!("  {:<26} {}", field, field.options().join(", "));
        println!();
    }
    for item in &step.items {
        println!("  {}", item.title);
        if !item.summary.is_empty() {
            println!("    {}", item.summary);
        }
        if !item.details.is_empty() {
            println!("    {}", item.details);
        }
        if let Some(visual) = &item.visual {
            for line in visual_lines(visual) {
                println!("      {line}");
            }
        }
        println!();
    }
}

pub fn print_step_list(steps: &[StepDefinition]) {
    for step in steps {
        println!("  {:>2} {:<30} {}", step.id, step.title, step.duration);
    }
}

pub fn print_industries(catalog: &IndustryCatalog) {
    for industry in Industry::ALL {
        let note = if catalog.has_overrides(industry.id()) { "branschanpassad" } else { "" };
        println!("  {:<14} {:<26} {}", industry.id(), industry.label(), note);
    }
}

fn visual_lines(visual: &Visual) -> Vec<String> {
    match visual {
        Visual::BarChart { bars } => {
            let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
            bars.iter()
                .map(|b| {
                    let width = if max > 0.0 { (b.value / max * 20.0).round() as usize } else { 0 };
                    format!("{:<20} {} {}", b.label, "█".repeat(width), b.value)
                })
                .collect()
        }
        Visual::Ring { value, label } => vec![format!("{value} % {label}")],
        Visual::Timeline { entries } => entries
            .iter()
            .map(|e| format!("{:<10} {}", e.period, e.text))
            .collect(),
        Visual::Stats { tiles } => tiles
            .iter()
            .map(|t| format!("{:<10} {}", t.value, t.label))
            .collect(),
    }
}

// ── Service results ──

pub fn print_scrape(result: &ScrapeResult) {
    println!("Hämtat från webbplatsen");
    field("Företag", &result.combined.company_name);
    field("Beskrivning", &result.combined.description);
    if !result.website.title.is_empty() {
        field("Titel", &result.website.title);
    }
    let contact = &result.website.contact;
    for (label, value) in [
        ("E-post", &contact.email),
        ("Telefon", &contact.phone),
        ("Adress", &contact.address),
    ] {
        if !value.is_empty() {
            field(label, value);
        }
    }
    print_list(result.website.highlights.iter().map(String::as_str));
}

pub fn print_analysis(analysis: &AnalysisResult) {
    println!("=== Analys ===");
    println!();
    if !analysis.summary.is_empty() {
        println!("{}", analysis.summary);
        println!();
    }

    println!("Risk");
    field("Total risk", format!("{}/10", analysis.overall_risk));
    for risk in analysis.top_risks(MAX_LIST_ITEMS) {
        field(&risk.area, format!("{}/10 {}", risk.score, risk.comment));
    }
    println!();

    println!("SWOT");
    for (label, items) in [
        ("Styrkor", &analysis.swot.strengths),
        ("Svagheter", &analysis.swot.weaknesses),
        ("Möjligheter", &analysis.swot.opportunities),
        ("Hot", &analysis.swot.threats),
    ] {
        if !items.is_empty() {
            field(label, items.join("; "));
        }
    }
    println!();

    let valuation = &analysis.valuation;
    if valuation.is_valid() {
        println!("Värdering");
        field(
            "Intervall",
            format!("{} – {}", format_sek(valuation.low), format_sek(valuation.high)),
        );
        field("Mittpunkt", format_sek(valuation.midpoint()));
        if !valuation.method.is_empty() {
            field("Metod", &valuation.method);
        }
        println!();
    }

    if !analysis.recommendations.is_empty() {
        println!("Rekommendationer");
        print_list(analysis.recommendations.iter().map(String::as_str));
        println!();
    }
}

// ── Helpers ──

fn field(label: &str, value: impl AsRef<str>) {
    println!("  {:<26} {}", label, value.as_ref());
}

fn print_list<'a>(items: impl ExactSizeIterator<Item = &'a str>) {
    let len = items.len();
    for item in items.take(MAX_LIST_ITEMS) {
        println!("    - {item}");
    }
    if len > MAX_LIST_ITEMS {
        println!("    ... och {} till", len - MAX_LIST_ITEMS);
    }
}

/// Whole kronor with space-grouped thousands: `12 500 000 kr`.
pub fn format_sek(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} kr")
}
