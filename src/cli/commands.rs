//! CLI command implementations

use std::time::Instant;

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use tracing::{debug, info, warn};

use super::render;
use crate::api::{resolve_master_slip_id, FileSource, SlipApiClient, SlipSource};
use crate::config::Config;
use crate::session::{LoadStatus, SessionState, SlipRow};
use crate::view::{RiskFilter, SortKey};

/// Optional view settings for the one-shot `list` command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub risk: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Build the slip source named on the command line
pub fn open_source(
    config: &Config,
    source: &str,
    from_file: bool,
) -> crate::error::Result<Box<dyn SlipSource>> {
    if from_file {
        return Ok(Box::new(FileSource::new(source)));
    }

    let master_slip_id = resolve_master_slip_id(source)?;
    let client = SlipApiClient::new(&config.api)?;
    Ok(Box::new(client.source(master_slip_id)))
}

/// Fetch once and load the result into a fresh session. A source that
/// cannot be built fails the load like any other fetch error.
async fn load_session(config: &Config, source: &str, from_file: bool) -> Result<SessionState> {
    let mut state = SessionState::from_config(config);
    let fetched = match open_source(config, source, from_file) {
        Ok(source) => {
            info!("Fetching slips from {}", source.describe());
            source.fetch().await
        }
        Err(e) => Err(e),
    };
    state.apply_fetch(fetched);
    Ok(state)
}

/// Apply `list` flags to a session. Search is applied immediately.
pub fn apply_list_options(state: &mut SessionState, options: &ListOptions) -> Result<()> {
    if let Some(risk) = &options.risk {
        let filter: RiskFilter = risk.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        state.set_risk_filter(filter);
    }
    if let Some(sort) = &options.sort {
        state.set_sort_key(SortKey::parse(sort));
    }
    if let Some(search) = &options.search {
        state.set_search(search.clone(), Instant::now());
        state.flush_search();
    }
    if let Some(size) = options.page_size {
        state.set_page_size(size)?;
    }
    if let Some(page) = options.page {
        state.set_page(page);
    }
    Ok(())
}

/// Print one derived page
pub async fn list(config: &Config, source: &str, from_file: bool, options: ListOptions) -> Result<()> {
    let mut state = load_session(config, source, from_file).await?;
    if let LoadStatus::Failed(message) = state.status() {
        return Err(anyhow::anyhow!("{}", message));
    }
    apply_list_options(&mut state, &options)?;

    print_page(&state);
    println!("{}", render::stats_summary(&state.stats()));
    Ok(())
}

/// Distribute a bankroll across one risk bucket and print the stakes
pub async fn distribute(
    config: &Config,
    source: &str,
    from_file: bool,
    risk: &str,
    bankroll: &str,
) -> Result<()> {
    let mut state = load_session(config, source, from_file).await?;
    if let LoadStatus::Failed(message) = state.status() {
        return Err(anyhow::anyhow!("{}", message));
    }

    let filter: RiskFilter = risk.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    state.set_risk_filter(filter);
    state.set_bankroll(bankroll)?;

    let currency = state.settings().currency.clone();
    match state.distribute_bankroll() {
        Ok(allocation) => print!("{}", render::allocation_summary(allocation, &currency)),
        Err(reason) => return Err(anyhow::anyhow!("Nothing distributed: {}", reason)),
    }

    println!();
    print_page(&state);
    Ok(())
}

fn print_page(state: &SessionState) {
    let currency = &state.settings().currency;
    if let Some(id) = state.master_slip_id() {
        println!("\n=== MASTER SLIP {} ===\n", id);
    }
    print!("{}", render::slip_table(&state.page_rows(), currency));
    println!("{}", render::page_summary(&state.view().info));
}

/// Review menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Risk,
    Sort,
    NextPage,
    PreviousPage,
    GoToPage,
    PageSize,
    Bankroll,
    Distribute,
    Override,
    ClearOverrides,
    ClearFilters,
    Detail,
    Place,
    Ignore,
    Quit,
}

impl Action {
    const ALL: [Action; 16] = [
        Action::Detail,
        Action::Place,
        Action::Ignore,
        Action::Search,
        Action::Risk,
        Action::Sort,
        Action::NextPage,
        Action::PreviousPage,
        Action::GoToPage,
        Action::PageSize,
        Action::Bankroll,
        Action::Distribute,
        Action::Override,
        Action::ClearOverrides,
        Action::ClearFilters,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Search => "Search",
            Action::Risk => "Risk filter",
            Action::Sort => "Sort by",
            Action::NextPage => "Next page",
            Action::PreviousPage => "Previous page",
            Action::GoToPage => "Go to page",
            Action::PageSize => "Page size",
            Action::Bankroll => "Set bankroll",
            Action::Distribute => "Distribute bankroll",
            Action::Override => "Override a stake",
            Action::ClearOverrides => "Clear overrides",
            Action::ClearFilters => "Clear all filters",
            Action::Detail => "Slip details",
            Action::Place => "Place slip",
            Action::Ignore => "Ignore slip",
            Action::Quit => "Quit",
        }
    }
}

/// Interactive review loop
pub async fn review(config: &Config, source: &str, from_file: bool) -> Result<()> {
    let mut state = load_session(config, source, from_file).await?;
    if let LoadStatus::Failed(message) = state.status() {
        println!("\nCould not load slips: {}", message);
        return Ok(());
    }

    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
    loop {
        print_page(&state);
        println!("{}", render::stats_summary(&state.stats()));
        if state.slips().is_empty() {
            println!("\nAll slips processed.");
            break;
        }
        if !state.search_input().is_empty() {
            println!("Search: {:?}", state.search_input());
        }

        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        let Some(action) = choice.map(|i| Action::ALL[i]) else {
            break;
        };
        debug!("Review action: {:?}", action);

        match action {
            Action::Quit => break,
            Action::Search => {
                let term: String = Input::new()
                    .with_prompt("Search slip id or team")
                    .with_initial_text(state.search_input())
                    .allow_empty(true)
                    .interact_text()?;
                state.set_search(term, Instant::now());
                if let Some(deadline) = state.search_deadline() {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                }
                state.poll_search(Instant::now());
            }
            Action::Risk => {
                let current = state.view_settings().criteria.risk;
                let items: Vec<String> = RiskFilter::OPTIONS.iter().map(|r| r.to_string()).collect();
                let idx = Select::new()
                    .with_prompt("Risk filter")
                    .items(&items)
                    .default(RiskFilter::OPTIONS.iter().position(|r| *r == current).unwrap_or(0))
                    .interact()?;
                state.set_risk_filter(RiskFilter::OPTIONS[idx]);
            }
            Action::Sort => {
                let current = state.view_settings().sort;
                let items: Vec<&str> = SortKey::OPTIONS.iter().map(|k| k.as_str()).collect();
                let idx = Select::new()
                    .with_prompt("Sort by")
                    .items(&items)
                    .default(SortKey::OPTIONS.iter().position(|k| *k == current).unwrap_or(0))
                    .interact()?;
                state.set_sort_key(SortKey::OPTIONS[idx]);
            }
            Action::NextPage => {
                let info = &state.view().info;
                if info.has_next() {
                    let next = info.page + 1;
                    state.set_page(next);
                }
            }
            Action::PreviousPage => {
                let info = &state.view().info;
                if info.has_previous() {
                    let previous = info.page - 1;
                    state.set_page(previous);
                }
            }
            Action::GoToPage => {
                let page: usize = Input::new()
                    .with_prompt(format!("Page (1-{})", state.view().info.total_pages))
                    .interact_text()?;
                state.set_page(page);
            }
            Action::PageSize => {
                let options = &config.display.page_size_options;
                let current = state.view_settings().page_size;
                let items: Vec<String> = options.iter().map(|n| n.to_string()).collect();
                let idx = Select::new()
                    .with_prompt("Rows per page")
                    .items(&items)
                    .default(options.iter().position(|n| *n == current).unwrap_or(0))
                    .interact()?;
                if let Err(e) = state.set_page_size(options[idx]) {
                    warn!("{}", e);
                }
            }
            Action::Bankroll => {
                println!("{}", state.distribute_hint());
                let input: String = Input::new()
                    .with_prompt(format!("Bankroll ({})", state.settings().currency))
                    .with_initial_text(state.bankroll_input())
                    .allow_empty(true)
                    .interact_text()?;
                if let Err(e) = state.set_bankroll(&input) {
                    println!("{}", e);
                }
            }
            Action::Distribute => {
                let currency = state.settings().currency.clone();
                let hint = state.distribute_hint();
                match state.distribute_bankroll() {
                    Ok(allocation) => print!("{}", render::allocation_summary(allocation, &currency)),
                    Err(reason) => println!("Nothing distributed: {} ({})", reason, hint),
                }
            }
            Action::Override => {
                let Some(slip_id) = pick_slip(&state, "Override stake for")? else {
                    continue;
                };
                let stake: f64 = Input::new()
                    .with_prompt(format!("Stake ({})", state.settings().currency))
                    .interact_text()?;
                if let Err(e) = state.set_override(&slip_id, stake) {
                    println!("{}", e);
                }
            }
            Action::ClearOverrides => {
                if state.has_overrides() {
                    state.clear_overrides();
                    println!("Overrides cleared.");
                }
            }
            Action::ClearFilters => {
                let confirmed = Confirm::new()
                    .with_prompt("Reset search, filters, sort, bankroll and overrides?")
                    .default(false)
                    .interact()?;
                if confirmed {
                    state.clear_filters();
                }
            }
            Action::Detail => {
                let Some(slip_id) = pick_slip(&state, "Show slip")? else {
                    continue;
                };
                let detail = state.select(&slip_id)?;
                print!("{}", render::slip_detail(&detail, &state.settings().currency));

                let next = Select::new()
                    .items(&["Back", "Place", "Ignore"])
                    .default(0)
                    .interact()?;
                state.close_detail();
                match next {
                    1 => dispose(&mut state, &slip_id, true).await?,
                    2 => dispose(&mut state, &slip_id, false).await?,
                    _ => {}
                }
            }
            Action::Place | Action::Ignore => {
                let prompt = if action == Action::Place { "Place" } else { "Ignore" };
                let Some(slip_id) = pick_slip(&state, prompt)? else {
                    continue;
                };
                dispose(&mut state, &slip_id, action == Action::Place).await?;
            }
        }
    }

    let stats = state.stats();
    println!("\n=== SESSION SUMMARY ===\n");
    println!("{}", stats);
    for record in state.history() {
        println!(
            "  {} {:<8} {}",
            record.at.format("%H:%M:%S"),
            record.disposition.to_string(),
            record.slip_id
        );
    }
    Ok(())
}

/// Choose a slip from the current page
fn pick_slip(state: &SessionState, prompt: &str) -> Result<Option<String>> {
    let rows: Vec<SlipRow> = state.page_rows().into_iter().filter(|r| !r.removing).collect();
    if rows.is_empty() {
        println!("No slips on this page.");
        return Ok(None);
    }

    let currency = &state.settings().currency;
    let items: Vec<String> = rows
        .iter()
        .map(|r| {
            format!(
                "{} ({}, {})",
                r.slip_id,
                r.risk,
                render::format_currency(r.stake, currency)
            )
        })
        .collect();

    let choice = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| rows[i].slip_id.clone()))
}

/// Place or ignore a slip and wait out the removal delay before committing
async fn dispose(state: &mut SessionState, slip_id: &str, place: bool) -> Result<()> {
    if place {
        let stake = state
            .slip_detail(slip_id)
            .map(|d| render::format_currency(d.stake, &state.settings().currency))
            .unwrap_or_default();
        let confirmed = Confirm::new()
            .with_prompt(format!("Place {} for {}?", slip_id, stake))
            .default(true)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let now = Instant::now();
    let deadline = if place {
        state.begin_place(slip_id, now)
    } else {
        state.begin_ignore(slip_id, now)
    };
    let deadline = match deadline {
        Ok(d) => d,
        Err(e) if e.is_slip_action_rejected() => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    for record in state.complete_removals(Instant::now()) {
        println!("Slip {} {}.", record.slip_id, record.disposition);
    }
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}
