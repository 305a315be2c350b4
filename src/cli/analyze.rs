//! # analyze 子命令 CLI 定义
//!
//! 计时数据分析统一入口，包含多个子命令：
//! - `summary`: 数据概览
//! - `timestep`: 耗时 vs 节点数 / KPAR
//! - `chessboard`: 单节点数的 KPAR×NCORE 热图
//! - `tetris`: 多节点数并排热图
//! - `optimal`: 每个节点数的最优设置
//! - `npar`: 每个 NPAR 一条的耗时折线
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze/` 相应模块

use crate::plot::PlotFormat;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// Analyze 主命令
// ─────────────────────────────────────────────────────────────

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Summarize a timing file
    Summary(SummaryArgs),

    /// Plot the timestep against nodes or KPAR
    Timestep(TimestepArgs),

    /// Heatmap of KPAR against NCORE (or NPAR) for one node count
    Chessboard(ChessboardArgs),

    /// Side-by-side heatmaps for several node counts
    Tetris(TetrisArgs),

    /// Best setting per node count with speedup and efficiency
    Optimal(OptimalArgs),

    /// Timestep against KPAR, one line per NPAR
    Npar(NparArgs),
}

// ─────────────────────────────────────────────────────────────
// 共用参数
// ─────────────────────────────────────────────────────────────

/// 图表输出参数
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Output format (inferred from the extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<PlotFormat>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

impl PlotArgs {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// summary 子命令参数
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,
}

// ─────────────────────────────────────────────────────────────
// timestep
// ─────────────────────────────────────────────────────────────

/// timestep 图的横轴
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TimestepMode {
    /// Scatter against node count, colored by KPAR
    Nodes,
    /// Lines against KPAR, one per node count
    Kpar,
}

/// timestep 子命令参数
#[derive(Args, Debug)]
pub struct TimestepArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,

    /// Quantity on the x axis
    #[arg(long, value_enum, default_value = "nodes")]
    pub by: TimestepMode,

    /// Output image
    #[arg(short, long, default_value = "timestep.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,
}

// ─────────────────────────────────────────────────────────────
// chessboard
// ─────────────────────────────────────────────────────────────

/// chessboard 横轴
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChessboardAxis {
    Ncore,
    Npar,
}

/// chessboard 子命令参数
#[derive(Args, Debug)]
pub struct ChessboardArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,

    /// Node count to show
    #[arg(long)]
    pub nodes: u32,

    /// Quantity on the x axis
    #[arg(long, value_enum, default_value = "ncore")]
    pub x_axis: ChessboardAxis,

    /// Output image
    #[arg(short, long, default_value = "chessboard.png")]
    pub output: PathBuf,

    /// Also export the grid as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

// ─────────────────────────────────────────────────────────────
// tetris
// ─────────────────────────────────────────────────────────────

/// tetris 子命令参数
#[derive(Args, Debug)]
pub struct TetrisArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,

    /// Node counts, one panel each (e.g., '1-4'; default: the first three)
    #[arg(long)]
    pub nodes: Option<String>,

    /// KPAR rows (default: the first three)
    #[arg(long)]
    pub kpar: Option<String>,

    /// NCORE columns (default: the first three)
    #[arg(long)]
    pub ncore: Option<String>,

    /// Output image
    #[arg(short, long, default_value = "tetris.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,
}

// ─────────────────────────────────────────────────────────────
// optimal
// ─────────────────────────────────────────────────────────────

/// optimal 子命令参数
#[derive(Args, Debug)]
pub struct OptimalArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "optimal.png")]
    pub output: PathBuf,

    /// Also export the table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Skip plot generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    #[command(flatten)]
    pub plot: PlotArgs,
}

// ─────────────────────────────────────────────────────────────
// npar
// ─────────────────────────────────────────────────────────────

/// npar 子命令参数
#[derive(Args, Debug)]
pub struct NparArgs {
    /// Timing file (JSON list of records)
    pub timing_file: PathBuf,

    /// Node count to show
    #[arg(long)]
    pub nodes: u32,

    /// Maximum number of NPAR lines
    #[arg(long, default_value_t = crate::analysis::series::NPAR_LINE_LIMIT)]
    pub limit: usize,

    /// Output image
    #[arg(short, long, default_value = "npar.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,
}
