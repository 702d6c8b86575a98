//! Types out a generated article in the terminal.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use futures::StreamExt;
use integrations_typewriter::observability::{LogFormat, LoggingConfig};
use integrations_typewriter::{
    ArticlePrompt, ArticleStyle, RenderState, SpeedPreset, TypewriterConfig, TypingRenderer,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "typewriter")]
#[command(about = "Generate an article and type it out like a human")]
struct Cli {
    /// Article title
    title: String,

    /// Typing speed: expert, senior, master, or milliseconds per character
    #[arg(short, long)]
    speed: Option<String>,

    /// Article tone (plain, comedy, sarcastic, ...); random when omitted
    #[arg(long)]
    style: Option<ArticleStyle>,

    /// Override the model from GEMINI_MODEL
    #[arg(short, long)]
    model: Option<String>,

    /// Fetch the whole article at once instead of typing it out
    #[arg(long)]
    once: bool,

    /// Redraw the markup at every render boundary
    #[arg(long)]
    live: bool,

    /// Log format: pretty, json or compact
    #[arg(long, default_value = "compact")]
    log_format: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = TypewriterConfig::from_env().context("loading configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let format = LogFormat::parse(&cli.log_format)
        .ok_or_else(|| anyhow!("unknown log format: {}", cli.log_format))?;
    LoggingConfig::new()
        .with_level(config.log_level)
        .with_format(format)
        .init()
        .map_err(|e| anyhow!("initializing logging: {e}"))?;

    let renderer = TypingRenderer::from_config(config).context("creating renderer")?;
    if let Some(speed) = cli.speed.as_deref() {
        match speed.parse::<SpeedPreset>() {
            Ok(preset) => renderer.speed().set_preset(preset),
            Err(_) => renderer.speed().set_str(speed),
        }
    }

    let mut article = ArticlePrompt::new(cli.title)?;
    if let Some(style) = cli.style {
        article = article.with_style(style);
    }
    tracing::info!(title = article.title(), style = %article.style(), "Composed prompt");

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let last = if cli.once {
        renderer.render_once(article.into_prompt(), cancel).await
    } else {
        let mut snapshots = renderer.stream(article.into_prompt(), cancel);
        let mut stdout = std::io::stdout();
        let mut last = None;
        while let Some(snapshot) = snapshots.next().await {
            if cli.live && !snapshot.is_final() {
                // Clear screen, cursor home.
                write!(stdout, "\x1b[2J\x1b[H{}", snapshot.markup)?;
                stdout.flush()?;
            }
            last = Some(snapshot);
        }
        last.ok_or_else(|| anyhow!("generation produced no output"))?
    };

    if cli.live {
        print!("\x1b[2J\x1b[H");
    }
    println!("{}", last.markup);

    Ok(match last.state {
        RenderState::Failed(error) => {
            eprintln!("generation failed: {error}");
            ExitCode::FAILURE
        }
        RenderState::Cancelled => ExitCode::from(130),
        RenderState::Complete | RenderState::Typing => ExitCode::SUCCESS,
    })
}
