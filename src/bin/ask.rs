//! Ask with web search
//!
//! Extracts search queries from a question with Claude, runs each through a
//! running tool server, and prints what came back.

use clap::Parser;
use mcp_search_bridge::mcp::{QueryExtractor, ToolCallResponse, ToolServerClient};
use mcp_search_bridge::search::format_search_results;
use mcp_search_bridge::{logging, Config, VERSION};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "mcp-ask",
    version = VERSION,
    about = "Ask a question with web search capabilities"
)]
struct Args {
    /// The question to ask (read from stdin when omitted)
    question: Vec<String>,

    /// Tool server base URL (overrides MCP_SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.server_url {
        config.client.server_url = url;
    }

    logging::init(&config.log);

    if config.validate().is_err() {
        eprintln!("Error: CLAUDE_API_KEY environment variable is not set.");
        return Ok(ExitCode::FAILURE);
    }

    let question = if args.question.is_empty() {
        prompt("Ask Claude: ")?
    } else {
        args.question.join(" ")
    };

    let client = ToolServerClient::new(&config.client.server_url)?;
    if !client.health().await {
        eprintln!(
            "Error: MCP server is not reachable at {}. Start mcp-search-server first.",
            client.base_url()
        );
        return Ok(ExitCode::FAILURE);
    }

    let extractor = QueryExtractor::from_config(&config)?;
    let outcome = extractor.extract(&question).await;

    if outcome.is_empty() {
        println!("No web searches needed for that question.");
        return Ok(ExitCode::SUCCESS);
    }

    for query in outcome.queries() {
        println!("Searching: {}", query);
        match client.fetch_web_content(query.as_str()).await {
            Ok(ToolCallResponse::Results { results }) if results.is_empty() => {
                println!("   No results.\n");
            }
            Ok(ToolCallResponse::Results { results }) => {
                print!("{}", format_search_results(&results));
            }
            Ok(ToolCallResponse::Error { error }) => println!("   Error: {}\n", error),
            Err(e) => println!("   Error: {}\n", e),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}
