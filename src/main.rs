use anyhow::Context;
use clap::Parser;
use order_ai_common::{render_text, share_text, AnalysisError, OrderRecord};
use order_ai_rust::{analyzer, cli, config, error, export, interactive, session, source};
use analyzer::HttpAnalysisClient;
use cli::{Cli, Commands};
use config::Config;
use error::OrderAiError;
use export::{CommandShare, ConsoleNotifier, CopyOutcome, Exporter, ShareOutcome, SystemClipboard};
use session::{AnalysisRun, Session};
use source::{SelectMethod, SelectOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, dropped, set, copy, share, output } => {
            println!("📸 order-ai - 訂單識別\n");

            let client = HttpAnalysisClient::new(&config.api_url()?)?;
            let mut session = Session::new(client);
            let method = if dropped { SelectMethod::Dropped } else { SelectMethod::Picked };

            // 1. 画像選択
            println!("[1/3] 圖片讀取中...");
            if session.select_path(&image, method)? == SelectOutcome::Rejected {
                println!("✖ 不是圖片檔案，已忽略: {}", image.display());
                return Ok(());
            }
            println!("✔ {}\n", image.display());

            // 2. 識別
            println!("[2/3] 識別中...");
            if let AnalysisRun::Aborted(_) = interactive::analyze_with_spinner(&mut session).await? {
                return Ok(());
            }
            if let Some(message) = session.error() {
                return Err(OrderAiError::Analysis(AnalysisError::new(message)).into());
            }
            println!("✔ 識別完成\n");

            // 3. 修正（修改 → 儲存）
            if !set.is_empty() {
                println!("[3/3] 修正中...");
                session.toggle_edit()?;
                for edit in set {
                    session.edit(edit.field, edit.value)?;
                }
                session.toggle_edit()?;
                println!("✔ 修正完成\n");
            }

            interactive::print_view(&session);

            if let (Some(output), Some(record)) = (output, session.record()) {
                let json = serde_json::to_string_pretty(record)?;
                std::fs::write(&output, json)
                    .with_context(|| format!("write {}", output.display()))?;
                println!("✔ 結果を保存: {}", output.display());
            }

            if copy || share {
                let mut exporter = build_exporter(&config);
                let mut copied = false;
                if let (Some(record), Some(image)) = (session.record(), session.image()) {
                    if copy {
                        let outcome = exporter.copy_text(record);
                        copied |= outcome == CopyOutcome::Copied;
                        interactive::report_copy(outcome);
                    }
                    if share {
                        let outcome = exporter.share(record, image);
                        copied |= outcome == ShareOutcome::ManualFallback { copied: true };
                        interactive::report_share(outcome);
                    }
                }
                let keeps = SystemClipboard::keeps_contents_after_exit();
                if let Some(notice) = interactive::clipboard_exit_notice(copied, keeps) {
                    println!("⚠ {}", notice);
                }
            }

            session.reset();
            println!("\n✅ 完了");
        }

        Commands::Session { image } => {
            println!("🦷 order-ai - 自動識別訂單\n");

            let client = HttpAnalysisClient::new(&config.api_url()?)?;
            let mut session = Session::new(client);
            let mut exporter = build_exporter(&config);
            interactive::run_interactive_session(&mut session, &mut exporter, image).await?;
        }

        Commands::Render { input, share_text: with_heading } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let record: OrderRecord = serde_json::from_str(&content)
                .with_context(|| format!("parse {}", input.display()))?;

            if with_heading {
                println!("{}", share_text(&record));
            } else {
                println!("{}", render_text(&record));
            }
        }

        Commands::Config { set_api_url, set_share_command, clear_share_command, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ 解析APIのURLを設定しました");
            }

            if let Some(argv) = set_share_command {
                config.set_share_command(argv)?;
                println!("✔ 共有コマンドを設定しました");
            }

            if clear_share_command {
                config.set_share_command(Vec::new())?;
                println!("✔ 共有コマンドを解除しました");
            }

            if show {
                println!("設定:");
                match config.api_url() {
                    Ok(url) => println!("  解析API: {}", url),
                    Err(_) => println!("  解析API: 未設定"),
                }
                match &config.share_command {
                    Some(command) => println!("  共有コマンド: {:?}", command),
                    None => println!("  共有コマンド: 未設定（クリップボードへコピー）"),
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_exporter(config: &Config) -> Exporter<SystemClipboard, CommandShare, ConsoleNotifier> {
    Exporter::new(
        SystemClipboard::new(),
        CommandShare::new(config.share_command.clone()),
        ConsoleNotifier,
    )
}
