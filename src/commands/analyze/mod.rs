//! # analyze 命令实现
//!
//! 计时数据分析统一入口，包含多个子命令：
//! - `summary`: 数据概览
//! - `timestep`: 耗时 vs 节点数 / KPAR
//! - `chessboard`, `tetris`: 热图
//! - `optimal`: 最优设置与标度
//! - `npar`: NPAR 折线
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 子模块: chessboard, npar, optimal, summary, tetris, timestep

pub mod chessboard;
pub mod npar;
pub mod optimal;
pub mod summary;
pub mod tetris;
pub mod timestep;

use crate::cli::analyze::{AnalyzeArgs, AnalyzeCommands, PlotArgs};
use crate::error::Result;
use crate::plot::{self, Figure};
use crate::utils::output;

use std::path::Path;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Summary(a) => summary::execute(a),
        AnalyzeCommands::Timestep(a) => timestep::execute(a),
        AnalyzeCommands::Chessboard(a) => chessboard::execute(a),
        AnalyzeCommands::Tetris(a) => tetris::execute(a),
        AnalyzeCommands::Optimal(a) => optimal::execute(a),
        AnalyzeCommands::Npar(a) => npar::execute(a),
    }
}

/// 渲染图表并报告输出位置
fn save_figure<F: Figure>(figure: &F, output_path: &Path, plot_args: &PlotArgs) -> Result<()> {
    plot::save(figure, output_path, plot_args.size(), plot_args.format)?;
    output::print_success(&format!("Plot saved to '{}'", output_path.display()));
    Ok(())
}
