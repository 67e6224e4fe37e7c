// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

mod app;
mod card;
mod deck_file;
mod error;
mod translator;
mod ui;

use app::AppState;
use deck_file::DeckFile;
use error::ConfigError;
use translator::{DEFAULT_ENDPOINT, OpenAiTranslator, Translate};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

// --------------------------------------------------
// コマンドライン引数
// --------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "hanzi-cards", about = "Chinese flashcards in the terminal", version)]
struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Path to flashcards file
    #[arg(long, default_value = "flashcards.jsonl")]
    file: PathBuf,

    /// OpenAI model to use
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Chat completions endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (0 = no timeout)
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// --------------------------------------------------
// メイン関数
// --------------------------------------------------

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_file.as_deref())?;

    let api_key = require_api_key(cli.api_key)?;

    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let translator = OpenAiTranslator::new(api_key, cli.model, cli.endpoint, timeout)
        .context("Error creating HTTP client")?;

    // デッキの読み込み
    let deck_file = DeckFile::new(cli.file);
    let deck = deck_file.load().context("Error loading deck")?;
    let mut app_state = AppState::new(deck, deck_file);

    let mut terminal = setup_terminal().context("Error starting terminal UI")?;
    let result = run_app(&mut terminal, &mut app_state, &translator);
    restore_terminal().context("Error restoring terminal")?;

    result.context("Error running application")
}

/// 空白だけのキーは未指定として扱う
fn require_api_key(api_key: Option<String>) -> Result<String, ConfigError> {
    api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)
}

/// ログはTUIの画面を壊さないよう、指定があればファイルに書く
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Error opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

// --------------------------------------------------
// TUIセットアップと実行ループ
// --------------------------------------------------

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<impl Backend>,
    app_state: &mut AppState,
    translator: &dyn Translate,
) -> Result<()> {
    info!("session started with {} cards", app_state.deck.len());

    loop {
        terminal.draw(|f| ui::draw(f, app_state))?;

        if app_state.quit {
            return Ok(());
        }

        // 「Translating…」を描画してから、同じスレッドで翻訳を待つ
        if app_state.submitting {
            // 失敗はステータス行に表示済みなので、ここでは続行する
            if let Err(e) = app_state.submit(translator) {
                debug!("submit failed, back to browsing: {e}");
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app_state.handle_key(key);
                }
            }
        }
    }
}
