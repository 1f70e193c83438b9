//! Colored console output for lineup generation.
//!
//! Provides a custom `tracing` layer that renders the structured events
//! emitted by `rosterforge_engine` and `rosterforge_milp`.
//!
//! ## Log Levels
//!
//! - **INFO**: batch start/end and each accepted lineup
//! - **WARN**: ignored locks and repeated lineups
//! - **DEBUG**: per-attempt model sizes and solver runs

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Targets whose events the layer renders.
const TARGETS: [&str; 2] = ["rosterforge_engine", "rosterforge_milp"];

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. The level
/// defaults to INFO and can be overridden with `RUST_LOG`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(LineupConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!("RosterForge v{} - MLB lineup generator", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats lineup events with colors.
pub struct LineupConsoleLayer;

impl<S: Subscriber> Layer<S> for LineupConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !TARGETS.iter().any(|t| target.starts_with(t)) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    solver: Option<String>,
    status: Option<String>,
    player: Option<String>,
    model: Option<String>,
    requested: Option<u64>,
    produced: Option<u64>,
    pool_size: Option<u64>,
    excluded: Option<u64>,
    attempt_budget: Option<u64>,
    attempt: Option<u64>,
    attempts: Option<u64>,
    index: Option<u64>,
    variables: Option<u64>,
    constraints: Option<u64>,
    fixed: Option<u64>,
    nodes: Option<u64>,
    nodes_per_second: Option<u64>,
    duration_ms: Option<u64>,
    salary: Option<f64>,
    points: Option<f64>,
    completed: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "requested" => &mut self.requested,
            "produced" => &mut self.produced,
            "pool_size" => &mut self.pool_size,
            "excluded" => &mut self.excluded,
            "attempt_budget" => &mut self.attempt_budget,
            "attempt" => &mut self.attempt,
            "attempts" => &mut self.attempts,
            "index" => &mut self.index,
            "variables" | "variable_count" => &mut self.variables,
            "constraints" | "constraint_count" => &mut self.constraints,
            "fixed" | "fixed_count" => &mut self.fixed,
            "nodes" => &mut self.nodes,
            "nodes_per_second" => &mut self.nodes_per_second,
            "duration_ms" => &mut self.duration_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "salary" => self.salary = Some(value),
            "points" => self.points = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "completed" {
            self.completed = Some(value);
        }
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "solver" => self.solver = Some(value),
            "status" => self.status = Some(value),
            "player" => self.player = Some(value),
            "model" => self.model = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "batch_start" => format_batch_start(v),
        "batch_end" => format_batch_end(v),
        "lineup" => format_lineup(v),
        "attempt" => format_attempt(v),
        "attempt_infeasible" => format!(
            "    {} attempt {} infeasible",
            "✗".bright_red(),
            count(v.attempt).white()
        ),
        "lock_ignored" => format!(
            "{} lock on {} ignored: not in the pool",
            "WARN".yellow().bold(),
            v.player.as_deref().unwrap_or("?").white().bold()
        ),
        "duplicate_lineup" => format!(
            "{} attempt {} repeated an earlier lineup",
            "WARN".yellow().bold(),
            count(v.attempt).white()
        ),
        "milp_end" => format_milp_end(v),
        _ => String::new(),
    }
}

fn format_batch_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Generating {} lineups │ {} players",
        "▶".bright_green().bold(),
        count(v.requested).bright_yellow(),
        count(v.pool_size).bright_yellow(),
    );
    if let Some(excluded) = v.excluded.filter(|&n| n > 0) {
        output.push_str(&format!(
            " ({} excluded)",
            excluded.to_formatted_string(&Locale::en).bright_black()
        ));
    }
    output.push_str(&format!(
        " │ {} attempts max",
        count(v.attempt_budget).bright_yellow()
    ));
    if let Some(solver) = &v.solver {
        output.push_str(&format!(" │ {}", solver.bright_magenta()));
    }
    output
}

fn format_batch_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let status_colored = if status == "complete" {
        status.bright_green().bold().to_string()
    } else {
        status.bright_yellow().bold().to_string()
    };

    format!(
        "{} Batch done │ {}/{} lineups │ {} attempts │ {} │ {}",
        "■".bright_cyan().bold(),
        count(v.produced).bright_yellow(),
        count(v.requested),
        count(v.attempts).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        status_colored
    )
}

fn format_lineup(v: &EventVisitor) -> String {
    format!(
        "  {} Lineup {:>4} │ salary {:>7} │ {} pts",
        "✓".bright_green(),
        count(v.index).white().bold(),
        format_salary(v.salary.unwrap_or(0.0)).bright_yellow(),
        format!("{:.2}", v.points.unwrap_or(0.0)).bright_green()
    )
}

fn format_attempt(v: &EventVisitor) -> String {
    format!(
        "    {} attempt {} │ {} vars │ {} rows │ {} fixed",
        "→".bright_blue(),
        count(v.attempt).white(),
        count(v.variables),
        count(v.constraints),
        count(v.fixed)
    )
}

fn format_milp_end(v: &EventVisitor) -> String {
    let icon = if v.completed.unwrap_or(true) {
        "◀".bright_blue().to_string()
    } else {
        "◀".bright_red().to_string()
    };
    format!(
        "    {} {} │ {} nodes │ {} nodes/s │ {}",
        icon,
        v.model.as_deref().unwrap_or("model").white(),
        count(v.nodes),
        count(v.nodes_per_second).bright_magenta(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    )
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_salary(salary: f64) -> String {
    (salary.max(0.0).round() as u64).to_formatted_string(&Locale::en)
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
