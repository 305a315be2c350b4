//! # 计时数据分析模块
//!
//! 将扁平计时记录整理为图表所需的结构：
//! - `grid`: 二维透视网格 (chessboard / tetris)
//! - `optimal`: 每个节点数的最优设置、加速比与效率
//! - `series`: 散点与折线序列 (timestep / NPAR)
//! - `export`: CSV 导出
//!
//! ## 依赖关系
//! - 被 `plot/` 和 `commands/analyze/` 使用
//! - 使用 `models/timing.rs`

pub mod export;
pub mod grid;
pub mod optimal;
pub mod series;

pub use grid::{chessboard_grid, tetris_panels, TetrisPanel, TimingGrid};
pub use optimal::{optimal_settings, ScalingPoint};
pub use series::{npar_lines, time_vs_kpar, time_vs_nodes, ScatterPoint, Series};
