//! Location directory commands
//!
//! Thin wrappers over the store backend. `search --interactive` drives the
//! same debounced autocomplete the checkout form uses, one stdin line per
//! keystroke burst.

use crate::autocomplete::{AutocompleteController, AutocompleteSettings, AutocompleteView, Phase};
use crate::config::Config;
use crate::coord::Coordinate;
use crate::directory::{AddressSuggestion, LocationDirectory, LocationDirectoryClient, NodeId};
use crate::error::Result;
use crate::format::OutputFormatter;
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address text (required unless --interactive)
    #[arg(required_unless_present = "interactive")]
    pub query: Option<String>,

    /// Restrict to one region id
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Read queries from stdin; ":N" selects the N-th suggestion
    #[arg(long, short = 'i', conflicts_with = "query")]
    pub interactive: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Position as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub position: Coordinate,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Prefectures command arguments
#[derive(Args)]
pub struct PrefecturesArgs {
    /// Region id
    pub region: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Quartiers command arguments
#[derive(Args)]
pub struct QuartiersArgs {
    /// Prefecture id
    pub prefecture: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

pub async fn search(args: SearchArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;
    let client = super::directory_client(&config)?;
    let region = args.region.map(NodeId::new);

    if args.interactive {
        let mut settings = AutocompleteSettings::from(&config.autocomplete);
        settings.region = region;
        let stdin = BufReader::new(tokio::io::stdin());
        return interactive(client, settings, formatter.as_ref(), stdin, &mut std::io::stdout())
            .await;
    }

    let query = args.query.unwrap_or_default();
    let results = client.search(&query, region.as_ref()).await;
    print!("{}", formatter.format_suggestions(&results)?);
    Ok(())
}

/// Drive the autocomplete controller from `input`, one line per query;
/// ":N" picks the N-th suggestion
///
/// At end of input the controller is settled first, so the last query is
/// always searched and rendered before returning.
async fn interactive<D, R, W>(
    client: Arc<LocationDirectoryClient<D>>,
    settings: AutocompleteSettings,
    formatter: &dyn OutputFormatter,
    input: R,
    out: &mut W,
) -> Result<()>
where
    D: LocationDirectory + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (chosen_tx, mut chosen) = mpsc::unbounded_channel();
    let (handle, _task) = AutocompleteController::spawn(
        client,
        settings,
        Box::new(move |suggestion| {
            let _ = chosen_tx.send(suggestion);
        }),
    );

    let mut views = handle.subscribe();
    let mut lines = input.lines();
    let mut shown: Option<Vec<AddressSuggestion>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.strip_prefix(':').map(str::parse::<usize>) {
                    Some(Ok(n)) if n > 0 => handle.select(n - 1)?,
                    _ => handle.input(line)?,
                }
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                render(&view, &mut shown, formatter, out)?;
            }
            Some(suggestion) = chosen.recv() => selected(&suggestion, out)?,
        }
    }

    let view = handle.settle().await?;
    while let Ok(suggestion) = chosen.try_recv() {
        selected(&suggestion, out)?;
    }
    render(&view, &mut shown, formatter, out)?;
    Ok(())
}

/// Print rendered suggestions unless they are already on screen
fn render<W: Write>(
    view: &AutocompleteView,
    shown: &mut Option<Vec<AddressSuggestion>>,
    formatter: &dyn OutputFormatter,
    out: &mut W,
) -> Result<()> {
    if view.phase != Phase::Rendered || shown.as_ref() == Some(&view.suggestions) {
        return Ok(());
    }
    write!(out, "{}", formatter.format_suggestions(&view.suggestions)?)?;
    *shown = Some(view.suggestions.clone());
    Ok(())
}

fn selected<W: Write>(suggestion: &AddressSuggestion, out: &mut W) -> Result<()> {
    info!(description = %suggestion.description, "suggestion selected");
    writeln!(out, "Selected: {}", suggestion.description)?;
    Ok(())
}

pub async fn reverse(args: ReverseArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;
    let client = super::directory_client(&config)?;

    let address = client.reverse_geocode(args.position).await;
    print!("{}", formatter.format_address(address.as_ref())?);
    Ok(())
}

pub async fn prefectures(args: PrefecturesArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;
    let client = super::directory_client(&config)?;

    let nodes = client.list_prefectures(&NodeId::new(args.region)).await;
    print!("{}", formatter.format_nodes(&nodes)?);
    Ok(())
}

pub async fn quartiers(args: QuartiersArgs) -> Result<()> {
    let formatter = super::formatter(&args.format)?;
    let config = Config::load()?;
    let client = super::directory_client(&config)?;

    let nodes = client.list_quartiers(&NodeId::new(args.prefecture)).await;
    print!("{}", formatter.format_nodes(&nodes)?);
    Ok(())
}
