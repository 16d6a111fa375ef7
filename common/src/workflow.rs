//! 識別ワークフローの状態機械
//!
//! ```text
//! Empty --select--> Selected --analyze--> Analyzing --ok--> Result(Viewing <-> Editing)
//!                                                  \--err--> Failed --analyze--> Analyzing
//! select はどの状態からでも Selected、reset はどの状態からでも Empty
//! ```
//!
//! 世代番号（generation）は select / reset / 解析開始のたびに増える。
//! 解析結果は開始時の世代と一致する場合のみ反映し、古い応答は捨てる。

use crate::error::{AnalysisError, WorkflowError};
use crate::types::{OrderField, OrderRecord};

/// 結果表示のサブモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Viewing,
    Editing,
}

/// ワークフローの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Selected,
    Analyzing,
    Result(ViewMode),
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Empty => "empty",
            Phase::Selected => "selected",
            Phase::Analyzing => "analyzing",
            Phase::Result(ViewMode::Viewing) => "result:viewing",
            Phase::Result(ViewMode::Editing) => "result:editing",
            Phase::Failed => "failed",
        }
    }
}

/// 解析開始時に発行される引換券
///
/// 完了時に返却し、世代が変わっていれば結果は破棄される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 解析結果の反映可否
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// ワークフロー本体
///
/// 1セッションにつき識別結果は最大1件。新しい解析成功で丸ごと置き換え、
/// select / reset で破棄する。
#[derive(Debug, Default)]
pub struct Workflow {
    phase: Phase,
    generation: u64,
    record: Option<OrderRecord>,
    error: Option<String>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn record(&self) -> Option<&OrderRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    pub fn is_editing(&self) -> bool {
        self.phase == Phase::Result(ViewMode::Editing)
    }

    /// 画像選択（どの状態からでも Selected へ）
    pub fn select(&mut self) {
        self.advance_generation();
        self.record = None;
        self.error = None;
        self.transition(Phase::Selected);
    }

    /// リセット（どの状態からでも Empty へ）
    pub fn reset(&mut self) {
        self.advance_generation();
        self.record = None;
        self.error = None;
        self.transition(Phase::Empty);
    }

    /// 解析開始
    ///
    /// Selected / Failed / Result から開始できる。Result からの再解析では
    /// 既存の結果を破棄する。
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, WorkflowError> {
        match self.phase {
            Phase::Empty => return Err(WorkflowError::NoImage),
            Phase::Analyzing => return Err(WorkflowError::AlreadyAnalyzing),
            Phase::Selected | Phase::Failed | Phase::Result(_) => {}
        }

        self.advance_generation();
        self.record = None;
        self.error = None;
        self.transition(Phase::Analyzing);
        Ok(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// 解析完了
    ///
    /// 引換券の世代が現在と異なる、または解析中でなければ何もしない。
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<OrderRecord, AnalysisError>,
    ) -> Completion {
        if ticket.generation != self.generation || self.phase != Phase::Analyzing {
            tracing::warn!(
                "古い解析結果を破棄: ticket={} current={}",
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }

        match result {
            Ok(record) => {
                self.record = Some(record);
                self.transition(Phase::Result(ViewMode::Viewing));
            }
            Err(e) => {
                self.error = Some(e.message);
                self.transition(Phase::Failed);
            }
        }
        Completion::Applied
    }

    /// 修改 ⇔ 儲存 の切替（保存時の検証なし）
    pub fn toggle_edit(&mut self) -> Result<ViewMode, WorkflowError> {
        let next = match self.phase {
            Phase::Result(ViewMode::Viewing) => ViewMode::Editing,
            Phase::Result(ViewMode::Editing) => ViewMode::Viewing,
            _ => return Err(WorkflowError::NoRecord),
        };
        self.transition(Phase::Result(next));
        Ok(next)
    }

    /// 編集中のフィールド更新（即時反映、取り消しなし）
    pub fn edit(&mut self, field: OrderField, value: impl Into<String>) -> Result<(), WorkflowError> {
        match (self.phase, self.record.as_mut()) {
            (Phase::Result(ViewMode::Editing), Some(record)) => {
                record.set(field, value);
                Ok(())
            }
            (Phase::Result(ViewMode::Viewing), Some(_)) => Err(WorkflowError::NotEditing),
            _ => Err(WorkflowError::NoRecord),
        }
    }

    fn advance_generation(&mut self) {
        self.generation += 1;
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!(
            "workflow: {} -> {} (generation {})",
            self.phase.as_str(),
            next.as_str(),
            self.generation
        );
        self.phase = next;
    }
}
