//! 対話式セッション
//!
//! 現在の状態で選べる操作をメニューで提示し、選択→識別→修改→分享を繰り返す。

use crate::analyzer::Analyze;
use crate::error::{OrderAiError, Result};
use crate::export::{
    ClipboardChannel, CopyOutcome, Exporter, NativeShare, Notifier, ShareOutcome,
    TRANSIENT_CLIPBOARD_NOTICE,
};
use crate::session::{AnalysisRun, LateAnalysis, Session};
use crate::source::{SelectMethod, SelectOutcome};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use order_ai_common::{display_label, display_rows, OrderField, Phase, ViewMode};
use std::path::PathBuf;
use std::time::Duration;

/// メニュー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    PickImage,
    DropImage,
    Analyze,
    Reset,
    ToggleEdit,
    EditField,
    Copy,
    Share,
    Quit,
}

impl MenuAction {
    fn label(&self, phase: Phase) -> &'static str {
        match self {
            MenuAction::PickImage => "📂 選擇圖片",
            MenuAction::DropImage => "🖱  拖放圖片",
            MenuAction::Analyze => "🔍 開始識別",
            MenuAction::Reset => "🔄 重新",
            MenuAction::ToggleEdit if phase == Phase::Result(ViewMode::Editing) => "💾 儲存",
            MenuAction::ToggleEdit => "📝 修改",
            MenuAction::EditField => "✏️  編輯欄位",
            MenuAction::Copy => "📋 複製文字",
            MenuAction::Share => "📤 分享",
            MenuAction::Quit => "🚪 離開",
        }
    }
}

/// 状態ごとに選べる操作
pub fn available_actions(phase: Phase) -> Vec<MenuAction> {
    let mut actions = Vec::new();
    match phase {
        Phase::Empty => {}
        Phase::Selected | Phase::Failed => {
            actions.extend([MenuAction::Analyze, MenuAction::Reset]);
        }
        Phase::Analyzing => actions.push(MenuAction::Reset),
        Phase::Result(mode) => {
            if mode == ViewMode::Editing {
                actions.push(MenuAction::EditField);
            }
            actions.extend([
                MenuAction::ToggleEdit,
                MenuAction::Share,
                MenuAction::Copy,
                MenuAction::Analyze,
                MenuAction::Reset,
            ]);
        }
    }
    actions.extend([MenuAction::PickImage, MenuAction::DropImage, MenuAction::Quit]);
    actions
}

/// 端末に貼り付けられたパスを整える（ドラッグ時の引用符・エスケープを除去）
pub fn clean_pasted_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    PathBuf::from(unquoted.replace("\\ ", " "))
}

/// 現在の状態を表示
pub fn print_view<A: Analyze>(session: &Session<A>) {
    if let Some(image) = session.image() {
        print!("🖼  {}", image.file_name);
        match session.preview() {
            Some(preview) => println!("  (預覽: {})", preview.path().display()),
            None => println!(),
        }
    }

    if let Some(error) = session.error() {
        println!("💢 {} 💢", error);
    }

    if let (Phase::Result(mode), Some(record)) = (session.phase(), session.record()) {
        let editing = mode == ViewMode::Editing;
        println!("🦴 識別收穫{}", if editing { "（修改中）" } else { "" });
        for row in display_rows(record, editing) {
            if row.value.contains('\n') {
                println!("  {}:", row.label);
                for line in row.value.lines() {
                    println!("    {}", line);
                }
            } else {
                println!("  {}: {}", row.label, row.value);
            }
        }
    }
}

/// 解析を実行（スピナー付き、Ctrl+C で重新）
pub async fn analyze_with_spinner<A: Analyze + 'static>(
    session: &mut Session<A>,
) -> Result<AnalysisRun> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("⏳ 識別中...（Ctrl+C: 🔄 重新）");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let run = session.analyze_until(interrupted()).await;
    spinner.finish_and_clear();
    if let Ok(AnalysisRun::Aborted(_)) = &run {
        println!("🔄 已重新，識別結果將被忽略");
    }
    run
}

/// Ctrl+C を待つ（監視できない環境では完了しない）
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl+C を監視できません: {}", e);
        std::future::pending::<()>().await;
    }
}

/// 応答が届いた中断済み解析をセッションへ渡す（反映はされない）
pub async fn settle_finished<A: Analyze>(session: &mut Session<A>, late: &mut Vec<LateAnalysis>) {
    let (finished, running): (Vec<_>, Vec<_>) = late.drain(..).partition(|l| l.is_finished());
    *late = running;
    for analysis in finished {
        let completion = analysis.settle(session).await;
        tracing::debug!("中断済み解析の応答: {:?}", completion);
    }
}

/// 共有結果を表示
pub fn report_share(outcome: ShareOutcome) {
    match outcome {
        ShareOutcome::Shared => println!("✔ 已分享"),
        ShareOutcome::SharedWithoutImage => println!("✔ 已分享文字（圖片未附加）"),
        // 取り消しは何も出さない、退避時の案内は通知側で表示済み
        ShareOutcome::Cancelled | ShareOutcome::ManualFallback { .. } => {}
    }
}

/// コピー結果を表示
pub fn report_copy(outcome: CopyOutcome) {
    match outcome {
        CopyOutcome::Copied => println!("✔ 已複製文字"),
        CopyOutcome::Failed => println!("（無法存取剪貼簿）"),
    }
}

/// 単発実行の終了前に出す注意（コピーした内容が終了で消える場合のみ）
pub fn clipboard_exit_notice(copied: bool, keeps_after_exit: bool) -> Option<&'static str> {
    (copied && !keeps_after_exit).then_some(TRANSIENT_CLIPBOARD_NOTICE)
}

/// 対話ループ
pub async fn run_interactive_session<A, C, S, N>(
    session: &mut Session<A>,
    exporter: &mut Exporter<C, S, N>,
    initial_image: Option<PathBuf>,
) -> Result<()>
where
    A: Analyze + 'static,
    C: ClipboardChannel,
    S: NativeShare,
    N: Notifier,
{
    if let Some(path) = initial_image {
        session.select_path(&path, SelectMethod::Picked)?;
    }

    let mut late = Vec::new();

    loop {
        settle_finished(session, &mut late).await;

        println!();
        print_view(session);

        let phase = session.phase();
        let actions = available_actions(phase);
        let labels: Vec<&str> = actions.iter().map(|a| a.label(phase)).collect();
        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| OrderAiError::Prompt(e.to_string()))?;

        match actions[choice] {
            MenuAction::PickImage => prompt_select(session, SelectMethod::Picked)?,
            MenuAction::DropImage => prompt_select(session, SelectMethod::Dropped)?,
            MenuAction::Analyze => {
                if let AnalysisRun::Aborted(analysis) = analyze_with_spinner(session).await? {
                    late.push(analysis);
                }
            }
            MenuAction::Reset => session.reset(),
            MenuAction::ToggleEdit => {
                session.toggle_edit()?;
            }
            MenuAction::EditField => prompt_edit(session)?,
            MenuAction::Copy => {
                if let Some(record) = session.record() {
                    report_copy(exporter.copy_text(record));
                }
            }
            MenuAction::Share => {
                if let (Some(record), Some(image)) = (session.record(), session.image()) {
                    report_share(exporter.share(record, image));
                }
            }
            MenuAction::Quit => break,
        }
    }

    session.reset();
    Ok(())
}

fn prompt_select<A: Analyze>(session: &mut Session<A>, method: SelectMethod) -> Result<()> {
    let prompt = match method {
        SelectMethod::Picked => "圖片路徑",
        SelectMethod::Dropped => "將圖片拖放到此處",
    };
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| OrderAiError::Prompt(e.to_string()))?;

    if input.trim().is_empty() {
        return Ok(());
    }

    match session.select_path(&clean_pasted_path(&input), method) {
        Ok(SelectOutcome::Selected) => {}
        Ok(SelectOutcome::Rejected) => tracing::debug!("ドロップされたファイルは画像ではありません"),
        Err(e) => println!("💢 {}", e),
    }
    Ok(())
}

fn prompt_edit<A: Analyze>(session: &mut Session<A>) -> Result<()> {
    let labels: Vec<&str> = OrderField::ALL.iter().map(|f| display_label(*f)).collect();
    let index = Select::new()
        .with_prompt("欄位")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| OrderAiError::Prompt(e.to_string()))?;
    let field = OrderField::ALL[index];

    let current = session
        .record()
        .map(|r| r.get(field).to_string())
        .unwrap_or_default();
    let prompt = if field.is_optional() {
        format!("{}（選填）", labels[index])
    } else {
        labels[index].to_string()
    };
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| OrderAiError::Prompt(e.to_string()))?;

    session.edit(field, value)
}
