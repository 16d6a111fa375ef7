//! 識別セッション
//!
//! 画像ソース・ワークフロー・解析クライアントを束ねる。
//! 解析は「開始 → 通信 → 完了」の3段階に分かれ、通信中に select / reset が
//! 入った場合は完了時に結果が捨てられる。
//!
//! `analyze_until` は通信を別タスクで走らせ、中断シグナルが先に来た場合は
//! セッションをリセットして通信中の解析（`LateAnalysis`）を返す。

use crate::analyzer::Analyze;
use crate::error::Result;
use crate::source::{ImageSource, PreviewHandle, SelectMethod, SelectOutcome, SelectedImage};
use order_ai_common::{
    AnalysisError, AnalysisTicket, Completion, OrderField, OrderRecord, Phase, ViewMode,
    Workflow, WorkflowError,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 通信中の解析
///
/// 送信する画像の複製を持つため、セッションを借用せずに通信できる。
#[derive(Debug)]
pub struct PendingAnalysis {
    ticket: AnalysisTicket,
    image: SelectedImage,
}

impl PendingAnalysis {
    pub fn ticket(&self) -> AnalysisTicket {
        self.ticket
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }
}

/// 中断された解析
///
/// 通信は続いている。応答が届いたら `settle` でセッションへ渡すと、
/// 世代が古いため反映されずに捨てられる。
#[derive(Debug)]
pub struct LateAnalysis {
    pending: PendingAnalysis,
    handle: JoinHandle<std::result::Result<OrderRecord, AnalysisError>>,
}

impl LateAnalysis {
    /// 応答が届いているか
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// 応答を待ってセッションへ渡す
    pub async fn settle<A: Analyze>(self, session: &mut Session<A>) -> Completion {
        let result = join_result(self.handle.await);
        session.finish_analysis(self.pending, result)
    }
}

/// `analyze_until` の結果
#[derive(Debug)]
pub enum AnalysisRun {
    Completed(Completion),
    /// 中断（セッションはリセット済み）
    Aborted(LateAnalysis),
}

fn join_result(
    joined: std::result::Result<std::result::Result<OrderRecord, AnalysisError>, tokio::task::JoinError>,
) -> std::result::Result<OrderRecord, AnalysisError> {
    joined.unwrap_or_else(|e| {
        tracing::error!("解析タスク異常終了: {}", e);
        Err(AnalysisError::failed())
    })
}

pub struct Session<A> {
    source: ImageSource,
    workflow: Workflow,
    analyzer: Arc<A>,
}

impl<A: Analyze> Session<A> {
    pub fn new(analyzer: A) -> Self {
        Self::with_source(analyzer, ImageSource::new())
    }

    pub fn with_source(analyzer: A, source: ImageSource) -> Self {
        Self {
            source,
            workflow: Workflow::new(),
            analyzer: Arc::new(analyzer),
        }
    }

    /// 画像を選択（既存の結果・エラーは破棄）
    pub fn select(&mut self, image: SelectedImage, method: SelectMethod) -> SelectOutcome {
        let outcome = self.source.select(image, method);
        if outcome == SelectOutcome::Selected {
            self.workflow.select();
        }
        outcome
    }

    /// ファイルパスから画像を選択
    pub fn select_path(&mut self, path: &Path, method: SelectMethod) -> Result<SelectOutcome> {
        let image = SelectedImage::from_path(path)?;
        Ok(self.select(image, method))
    }

    /// すべてクリア
    pub fn reset(&mut self) {
        self.source.reset();
        self.workflow.reset();
    }

    /// 解析開始
    pub fn start_analysis(&mut self) -> Result<PendingAnalysis> {
        let image = self.source.image().cloned().ok_or(WorkflowError::NoImage)?;
        let ticket = self.workflow.begin_analysis()?;
        Ok(PendingAnalysis { ticket, image })
    }

    /// 解析完了（古い世代の結果は反映しない）
    pub fn finish_analysis(
        &mut self,
        pending: PendingAnalysis,
        result: std::result::Result<OrderRecord, AnalysisError>,
    ) -> Completion {
        self.workflow.complete_analysis(pending.ticket, result)
    }

    /// 解析を実行して結果を反映
    pub async fn analyze(&mut self) -> Result<Completion> {
        let pending = self.start_analysis()?;
        let result = self.analyzer.analyze(pending.image()).await;
        Ok(self.finish_analysis(pending, result))
    }

    /// 解析を実行（`abort` が先に完了したらリセットして中断）
    pub async fn analyze_until<F>(&mut self, abort: F) -> Result<AnalysisRun>
    where
        A: 'static,
        F: Future<Output = ()>,
    {
        let pending = self.start_analysis()?;
        let analyzer = Arc::clone(&self.analyzer);
        let image = pending.image().clone();
        let mut handle = tokio::spawn(async move { analyzer.analyze(&image).await });

        let finished = tokio::select! {
            joined = &mut handle => Some(join_result(joined)),
            _ = abort => None,
        };

        match finished {
            Some(result) => Ok(AnalysisRun::Completed(self.finish_analysis(pending, result))),
            None => {
                tracing::info!("解析を中断してリセット");
                self.reset();
                Ok(AnalysisRun::Aborted(LateAnalysis { pending, handle }))
            }
        }
    }

    pub fn toggle_edit(&mut self) -> Result<ViewMode> {
        Ok(self.workflow.toggle_edit()?)
    }

    pub fn edit(&mut self, field: OrderField, value: impl Into<String>) -> Result<()> {
        Ok(self.workflow.edit(field, value)?)
    }

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    pub fn record(&self) -> Option<&OrderRecord> {
        self.workflow.record()
    }

    pub fn error(&self) -> Option<&str> {
        self.workflow.error()
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.source.image()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.source.preview()
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn analyzer(&self) -> &A {
        self.analyzer.as_ref()
    }
}
