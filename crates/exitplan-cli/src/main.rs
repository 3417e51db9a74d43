mod display;
mod store;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use exitplan_core::answers::{CustomerShare, RevenueYear};
use exitplan_core::completion::{FIRST_STEP, LAST_STEP};
use exitplan_core::content::find_step;
use exitplan_core::{
    Action, AnswerField, Category, CategoryData, CoreError, IndustryCatalog, MultiField,
    ReportKind, UploadedFile, WizardState, base_steps,
};
use exitplan_services::{ServiceClient, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exitplan", version, about = "Step-by-step preparation for selling a company")]
struct Cli {
    /// Base URL of the backend serving the /api endpoints.
    #[arg(long, env = "EXITPLAN_API_URL", default_value = "http://localhost:3000", global = true)]
    api_url: String,

    /// Session file holding answers, summaries and analysis between runs.
    #[arg(long, env = "EXITPLAN_STATE", default_value = "exitplan-session.json", global = true)]
    state: PathBuf,

    /// JSON file with extra industry overrides, merged over the built-in ones.
    #[arg(long, env = "EXITPLAN_INDUSTRY_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show position, readiness and category status.
    Status,
    /// Show step content, adapted to an industry.
    Steps {
        /// Industry id; defaults to the session's industry.
        #[arg(long)]
        industry: Option<String>,
        /// Show a single step in full.
        #[arg(long)]
        step: Option<u8>,
    },
    /// List the industries and whether they have tailored content.
    Industries,
    /// Set a single answer, e.g. `set company-name "Acme AB"`.
    Set { field: AnswerField, value: String },
    /// Select or deselect an option in a multi-select answer.
    Toggle { field: MultiField, value: String },
    /// Set revenue for year 1, 2 or 3 (oldest first).
    Revenue { year: u8, value: String },
    /// Replace the top customers, as `NAME=PERCENT` pairs.
    Customers { entries: Vec<String> },
    /// Replace a company-data category with a JSON object of its fields.
    Category { category: Category, json: String },
    /// Jump to step N.
    Goto { step: u8 },
    /// Next step. Leaving the readiness step runs the analysis.
    Next,
    /// Previous step.
    Prev,
    /// Fetch company details from a website.
    Scrape { url: String },
    /// Upload documents and merge the extracted values.
    AnalyzeDocs {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate an AI summary for one category.
    Summarize { category: Category },
    /// Generate the complete analysis.
    Analyze,
    /// Render a PDF report.
    Report {
        #[arg(long, default_value = "analysrapport")]
        kind: ReportKind,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

impl Command {
    fn is_read_only(&self) -> bool {
        matches!(self, Command::Status | Command::Steps { .. } | Command::Industries)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    info!("exitplan v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let state = store::load_session(&cli.state)?;
    let read_only = cli.command.is_read_only();

    let mut session = Session::new(ServiceClient::new(cli.api_url), state);
    let outcome = run(&mut session, &catalog, cli.command).await;
    if !read_only {
        store::save_session(&cli.state, session.state())?;
        display::print_operation_errors(session.state());
    }
    outcome
}

fn load_catalog(path: Option<&Path>) -> Result<IndustryCatalog> {
    let mut catalog = IndustryCatalog::builtin().clone();
    if let Some(path) = path {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read industry catalog {}", path.display()))?;
        let extra = IndustryCatalog::from_json(&json)
            .with_context(|| format!("Invalid industry catalog {}", path.display()))?;
        catalog.extend(extra);
    }
    Ok(catalog)
}

async fn run(
    session: &mut Session<ServiceClient>,
    catalog: &IndustryCatalog,
    command: Command,
) -> Result<()> {
    match command {
        Command::Status => {
            let state = session.state();
            display::print_status(state, &state.steps(catalog));
        }
        Command::Steps { industry, step } => {
            let industry = industry.unwrap_or_else(|| session.state().answers.industry.clone());
            let steps = catalog.steps_for(&industry, base_steps());
            match step {
                Some(id) => {
                    let step = find_step(&steps, id).ok_or(CoreError::StepOutOfRange(id))?;
                    display::print_step(step);
                }
                None => display::print_step_list(&steps),
            }
        }
        Command::Industries => display::print_industries(catalog),
        Command::Set { field, value } => {
            session.dispatch(Action::SetAnswer(field, value));
            print_position(session.state(), catalog);
        }
        Command::Toggle { field, value } => {
            field.check_option(&session.state().answers, &value)?;
            session.dispatch(Action::ToggleChoice(field, value));
            println!("  {:<26} {}", field, field.get(&session.state().answers).join(", "));
        }
        Command::Revenue { year, value } => {
            session.dispatch(Action::SetRevenue(revenue_year(year)?, value));
            print_position(session.state(), catalog);
        }
        Command::Customers { entries } => {
            let customers = entries
                .iter()
                .map(|e| parse_customer(e))
                .collect::<Result<Vec<_>>>()?;
            session.dispatch(Action::SetTopCustomers(customers));
            print_position(session.state(), catalog);
        }
        Command::Category { category, json } => {
            let fields: serde_json::Value =
                serde_json::from_str(&json).context("Category fields must be a JSON object")?;
            let data: CategoryData = serde_json::from_value(serde_json::json!({
                "category": category.id(),
                "data": fields,
            }))
            .with_context(|| format!("Fields do not match category {category}"))?;
            session.dispatch(Action::SetCategory(data));
            print_categories(session.state());
        }
        Command::Goto { step } => {
            if !(FIRST_STEP..=LAST_STEP).contains(&step) {
                return Err(CoreError::StepOutOfRange(step).into());
            }
            session.dispatch(Action::GoTo(usize::from(step - FIRST_STEP)));
            print_position(session.state(), catalog);
        }
        Command::Next => {
            if !session.next().await {
                println!("Redan på sista steget.");
            }
            print_position(session.state(), catalog);
        }
        Command::Prev => {
            session.prev();
            print_position(session.state(), catalog);
        }
        Command::Scrape { url } => {
            session.scrape(&url).await.context("Scrape failed")?;
            if let Some(result) = &session.state().scraped {
                display::print_scrape(result);
            }
        }
        Command::AnalyzeDocs { files } => {
            for path in &files {
                session.dispatch(Action::AddUpload(read_upload(path)?));
            }
            session
                .analyze_documents()
                .await
                .context("Document analysis failed")?;
            print_categories(session.state());
        }
        Command::Summarize { category } => {
            session
                .generate_summary(category)
                .await
                .with_context(|| format!("Summary for {category} failed"))?;
            if let Some(summary) = session.state().summaries.get(category) {
                println!("=== {} ===", category.label());
                println!("{summary}");
            }
        }
        Command::Analyze => {
            if session.state().analysis.is_none() {
                session.generate_analysis().await.context("Analysis failed")?;
            }
            if let Some(analysis) = &session.state().analysis {
                display::print_analysis(analysis);
            }
        }
        Command::Report { kind, out_dir } => {
            let today = chrono::Local::now().date_naive();
            let report = session
                .generate_report(kind, today)
                .await
                .context("Report generation failed")?;
            let path = store::write_report(&out_dir, &report)?;
            println!("Rapport sparad: {}", path.display());
        }
    }
    Ok(())
}

fn print_position(state: &WizardState, catalog: &IndustryCatalog) {
    let steps = state.steps(catalog);
    let nav = &state.navigator;
    let title = steps.get(nav.index()).map(|s| s.title.as_str()).unwrap_or_default();
    let done = if state.current_step_complete() { "klart" } else { "ej klart" };
    println!("  {:<26} {} av {} ({done})", title, nav.step_id(), nav.total());
    println!("  {:<26} {} %", "Beredskap", state.completion().readiness_percent());
}

fn print_categories(state: &WizardState) {
    for (category, status) in state.category_statuses() {
        println!("  {:<26} {}", category.label(), status.label());
    }
}

fn revenue_year(year: u8) -> Result<RevenueYear> {
    match year {
        1 => Ok(RevenueYear::First),
        2 => Ok(RevenueYear::Second),
        3 => Ok(RevenueYear::Third),
        _ => bail!("revenue year must be 1, 2 or 3, got {year}"),
    }
}

/// `NAME=PERCENT`; the percentage may be left out.
fn parse_customer(entry: &str) -> Result<CustomerShare> {
    let (name, percentage) = entry.rsplit_once('=').unwrap_or((entry, ""));
    let name = name.trim();
    if name.is_empty() {
        bail!("customer entry {entry:?} has no name");
    }
    Ok(CustomerShare {
        name: name.to_string(),
        percentage: percentage.trim().trim_end_matches('%').trim().to_string(),
    })
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(UploadedFile::new(name, bytes)?)
}
