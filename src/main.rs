use anyhow::Result;
use std::path::{Path, PathBuf};
use stmtrecon::{
    commands::{self, ColumnRef, Command, Target, HELP},
    config::Config,
    export::{self, ExportFormat},
    extract::ExtractClient,
    process::ColumnKind,
    session::{Session, UploadOutcome},
};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env()?;
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) client + empty session ───────────────────────────────────
    let client = ExtractClient::new(&config)?;
    info!(endpoint = %client.endpoint(), "extraction service");
    let mut session = Session::new();

    if let Some(path) = std::env::args().nth(1) {
        upload(&mut session, &client, Path::new(&path)).await;
    }

    // ─── 3) one command per line until EOF or quit ───────────────────
    println!("{}", HELP);
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match commands::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = handle(&mut session, &client, &config, command).await {
            warn!("command failed: {:#}", e);
            println!("{}", e);
        }
    }

    info!("bye");
    Ok(())
}

async fn upload(session: &mut Session, client: &ExtractClient, path: &Path) {
    match session.upload(client, path).await {
        Ok(UploadOutcome::Loaded { rows }) => {
            println!("loaded {} transactions", rows);
            print!("{}", session.render());
        }
        Ok(UploadOutcome::NoData) => println!("no table found in {}", path.display()),
        Ok(UploadOutcome::Failed) => print!("{}", session.render()),
        Err(e) => println!("{}", e),
    }
}

async fn handle(
    session: &mut Session,
    client: &ExtractClient,
    config: &Config,
    command: Command,
) -> Result<()> {
    match command {
        Command::Upload(path) => upload(session, client, &path).await,
        Command::Show => print!("{}", session.render()),
        Command::Edit { row, col, value } => {
            let row = checked_row(session, row)?;
            let col = resolve_column(session, &col)?;
            let state = session.edit_cell(row, col, value);
            let validity = if session.is_cell_valid(row, col) { "" } else { " (invalid)" };
            println!("row {} {}{}", row, state.as_str(), validity);
        }
        Command::Save(Target::Row(row)) => {
            let row = checked_row(session, row)?;
            session.commit_row(row);
            println!("row {} saved ({})", row, session.row_state(row).as_str());
        }
        Command::Save(Target::All) => println!("saved {} rows", session.commit_all()),
        Command::Revert(Target::Row(row)) => {
            let row = checked_row(session, row)?;
            session.revert_row(row);
            println!("row {} reverted ({})", row, session.row_state(row).as_str());
        }
        Command::Revert(Target::All) => println!("reverted {} rows", session.revert_all()),
        Command::Invalid => {
            let cells = session.invalid_cells();
            if cells.is_empty() {
                println!("all cells valid");
            }
            for (row, col) in cells {
                let header = &session.headers()[col];
                println!(
                    "row {} {} (expects {}): {:?}",
                    row,
                    header,
                    ColumnKind::for_header(header).as_str(),
                    session.rows()[row][col]
                );
            }
        }
        Command::Export { format, path } => {
            let path = config.export_path(format.extension(), path.as_deref());
            export_to(session, config, format, &path)?;
            println!("wrote {}", path.display());
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn export_to(session: &Session, config: &Config, format: ExportFormat, path: &PathBuf) -> Result<()> {
    match format {
        ExportFormat::Csv => export::write_csv(path, session.headers(), session.rows()),
        ExportFormat::Xlsx => {
            export::write_xlsx(path, &config.sheet_name, session.headers(), session.rows())
        }
    }
    .map_err(|e| {
        error!("export to {} failed: {:#}", path.display(), e);
        e
    })
}

/// The engine treats bad indices as bugs, so user input is checked here first.
fn checked_row(session: &Session, row: usize) -> Result<usize> {
    if row >= session.rows().len() {
        anyhow::bail!("no row {} (table has {} rows)", row, session.rows().len());
    }
    Ok(row)
}

fn resolve_column(session: &Session, col: &ColumnRef) -> Result<usize> {
    match col {
        ColumnRef::Index(idx) if *idx < session.headers().len() => Ok(*idx),
        ColumnRef::Index(idx) => anyhow::bail!("no column {}", idx),
        ColumnRef::Name(name) => session
            .column_index(name)
            .ok_or_else(|| anyhow::anyhow!("no column named {:?}", name)),
    }
}
