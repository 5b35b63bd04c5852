mod api;
mod cli;
mod config;
mod controller;
mod form;
mod model;
mod transcript;
mod view;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "userctl", about = "A console admin client for a user REST service")]
pub struct Args {
    #[arg(short, long, help = "One-shot command mode (e.g. -c \"delete 3\")")]
    pub command: Option<String>,

    #[arg(long, env = "USERCTL_BASE_URL", help = "Service base URL (overrides config)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Auto-approve delete confirmations")]
    pub yes: bool,

    #[arg(long, help = "Session transcripts directory")]
    pub transcripts_dir: Option<PathBuf>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Debug output (print resolved settings)")]
    pub debug: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load configuration (user-level, then project-level overrides)
    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_default()
    };

    // CLI and environment override the config files
    if let Some(base_url) = &args.base_url {
        cfg.endpoint.base_url = base_url.clone();
    }

    if let Err(errors) = cfg.validate() {
        let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(anyhow::anyhow!("Invalid configuration:\n{}", lines.join("\n")));
    }

    if args.debug {
        eprintln!("[DEBUG] Endpoint: {}", cfg.endpoint.base_url);
        eprintln!("[DEBUG] Transcripts dir: {:?}", cfg.transcripts.dir);
        eprintln!("[DEBUG] Auto-yes: {}", args.yes);
    }

    let root = std::env::current_dir()?;
    let transcripts_dir = args
        .transcripts_dir
        .clone()
        .or_else(|| cfg.transcripts.dir.clone())
        .unwrap_or_else(|| root.join(".userctl").join("sessions"));
    std::fs::create_dir_all(&transcripts_dir)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let transcript_path = transcripts_dir.join(format!("{}.jsonl", session_id));
    let transcript = transcript::Transcript::new(&transcript_path, &session_id)?;

    let client = api::HttpClient::new(&cfg.endpoint.base_url);
    let controller = controller::Controller::new(client);

    let ctx = cli::Context {
        args,
        transcript: RefCell::new(transcript),
        session_id,
        config: RefCell::new(cfg),
        controller: RefCell::new(controller),
    };

    if let Some(command) = ctx.args.command.clone() {
        cli::run_once(&ctx, &command)
    } else {
        cli::run_repl(ctx)
    }
}
