use crate::config::Config;
use crate::error::SheetmarkResult;
use crate::excel::{self, reader};
use crate::service::CampaignSheet;
use crate::sheets::AuthSession;
use colored::Colorize;
use std::path::PathBuf;

use super::query_args::{describe, QueryArgParser};
use super::report;

/// Connect to the configured spreadsheet with a fresh token
async fn connect(config: &Config) -> SheetmarkResult<(CampaignSheet, AuthSession)> {
    let (service, tokens) = config.connect()?;
    let mut session = AuthSession::empty();
    session.refresh_if_expired(tokens.as_ref()).await?;
    Ok((service, session))
}

/// Execute the highlight command
pub async fn highlight(config: &Config, file: PathBuf) -> SheetmarkResult<()> {
    println!("{}", "📊 Sheetmark - Highlighting outlets".bold().green());
    println!("   File: {}\n", file.display());

    let table = reader::read_first_sheet(&file)?;
    let (service, session) = connect(config).await?;
    let report = service.process_table(&session, &table).await?;

    match report.row {
        Some(_) => println!("{}", "✅ Done".bold().green()),
        None => println!("{}", "❌ Campaign not found".bold().red()),
    }
    println!("{}", report::render_process(&report));

    if let Some(outcome) = &report.outcome {
        if !outcome.not_found.is_empty() {
            println!(
                "\n{}",
                format!("⚠️  {} outlet(s) not in the header row", outcome.not_found.len()).yellow()
            );
        }
    }
    Ok(())
}

/// Execute the query command
pub async fn query(config: &Config, args: Vec<String>) -> SheetmarkResult<()> {
    let filter = QueryArgParser::new()?.parse(&args.join(" "))?;

    println!("{}", "🔍 Sheetmark - Video duration query".bold().green());
    println!();

    let (service, session) = connect(config).await?;
    let result = service.query_video_duration(&session, &filter).await?;

    println!(
        "{}",
        report::render_query(&describe(&filter), &result)
    );
    Ok(())
}

/// Execute the locate command
pub async fn locate(config: &Config, name: String) -> SheetmarkResult<()> {
    let (service, session) = connect(config).await?;
    match service.find_campaign_row(&session, &name).await? {
        Some(row) => println!(
            "{} {} → row {}",
            "✅".green(),
            row.cell_text.bright_blue().bold(),
            row.row_number.to_string().bold()
        ),
        None => println!("{} \"{}\" not found in column A", "❌".red(), name),
    }
    Ok(())
}

/// Execute the status command
pub async fn status(config: &Config) -> SheetmarkResult<()> {
    let (service, session) = connect(config).await?;
    let info = service.spreadsheet_info(&session).await?;
    let range = service.outlet_range();

    println!("{}", "📋 Connected spreadsheet".bold().green());
    println!("   Title: {}", info.title.bright_blue().bold());
    println!("   URL:   {}", info.url);
    println!(
        "   Outlet columns: {}:{} ({} columns)",
        range.start_letter(),
        range.end_letter(),
        range.width()
    );
    Ok(())
}

/// Execute the ingest command: preview a file without touching the sheet
pub fn ingest(file: PathBuf, verbose: bool) -> SheetmarkResult<()> {
    println!("{}", "📋 Sheetmark - Reading outlet list".bold().green());
    println!("   File: {}\n", file.display());

    let table = reader::read_first_sheet(&file)?;
    let list = excel::ingest::ingest(&table)?;

    println!("{}", report::render_ingest(&list));
    if verbose {
        println!();
        for token in &list.tokens {
            println!("   • {}", token.cyan());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
