use anyhow::{Context, Result};
use chatms::{
    GroupedView, HttpSearchClient, QueryCodec, QueryState, SearchController, SearchStatus,
    SortDirection, SortKey, present,
    view::highlight::split_spans,
};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "chatms",
    version,
    about = "Search a chat-analytics message corpus from the command line",
    long_about = None
)]
struct Cli {
    /// Free-text search query
    query: Option<String>,

    /// Filter by author id
    #[arg(short, long)]
    user: Option<String>,

    /// Only messages on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only messages up to this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only messages with media attached
    #[arg(long)]
    has_media: bool,

    /// Only forwarded messages
    #[arg(long)]
    forwarded: bool,

    /// Only messages that received replies
    #[arg(long)]
    has_reply: bool,

    /// Sort key
    #[arg(short, long, value_enum, default_value = "date")]
    sort: SortArg,

    /// Sort direction
    #[arg(short, long, value_enum, default_value = "desc")]
    order: OrderArg,

    /// Result page to fetch (20 results per page)
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Base URL of the analytics API
    #[arg(long, env = "CHATMS_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Print the shareable query string instead of searching
    #[arg(long)]
    share: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Date,
    Author,
    Length,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "chatms=debug" } else { "chatms=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_query(cli: &Cli) -> QueryState {
    let mut query = QueryState::new();
    if let Some(text) = &cli.query {
        query = query.with_text(text.clone());
    }
    if let Some(user) = &cli.user {
        query = query.with_author(user.clone());
    }
    query = query
        .with_date_from(cli.from)
        .with_date_to(cli.to)
        .with_has_media(cli.has_media)
        .with_is_forwarded(cli.forwarded)
        .with_has_reply(cli.has_reply)
        .with_sort_key(match cli.sort {
            SortArg::Date => SortKey::Date,
            SortArg::Author => SortKey::Author,
            SortArg::Length => SortKey::Length,
        })
        .with_sort_direction(match cli.order {
            OrderArg::Asc => SortDirection::Ascending,
            OrderArg::Desc => SortDirection::Descending,
        })
        .with_page(cli.page);
    query
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let query = build_query(&cli);

    if cli.share {
        println!("{}", QueryCodec::to_query_string(&query));
        return Ok(());
    }

    let client = HttpSearchClient::new(&cli.api_url).context("invalid API URL")?;
    let (mut controller, ticket) = SearchController::with_query(query);

    let Some(ticket) = ticket else {
        eprintln!("Nothing to search for - give a query or at least one filter.");
        return Ok(());
    };

    controller.run(&client, ticket).await;

    match controller.status() {
        SearchStatus::Ready(page) => {
            let view = present(page, controller.query());
            match cli.format {
                OutputFormat::Text => print_text(&view),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
            }
            Ok(())
        }
        SearchStatus::Failed(message) => anyhow::bail!("{message}"),
        // One-shot runs always resolve; these are unreachable here.
        SearchStatus::Idle | SearchStatus::Loading => Ok(()),
    }
}

fn print_text(view: &GroupedView) {
    if view.is_empty() {
        println!("No results.");
        return;
    }

    for day in &view.days {
        match day.date {
            Some(date) => println!("{}", date.format("%Y-%m-%d").to_string().bold().cyan()),
            None => println!("{}", "(undated)".bold().cyan()),
        }
        for presented in &day.messages {
            let mut line = String::new();
            for (is_match, segment) in split_spans(&presented.text, &presented.spans) {
                if is_match {
                    line.push_str(&segment.red().bold().to_string());
                } else {
                    line.push_str(segment);
                }
            }
            let name = if presented.message.from_name.is_empty() {
                presented.message.from_id.as_str()
            } else {
                presented.message.from_name.as_str()
            };
            println!("  {} {}", format!("{name}:").green(), line);
        }
        println!();
    }

    let window = view.window;
    println!(
        "{}",
        format!(
            "{}-{} of {} (page {}/{})",
            window.window_start, window.window_end, window.total, window.page, window.total_pages
        )
        .dimmed()
    );
}
