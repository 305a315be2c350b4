//! # analyze tetris 实现
//!
//! 节点数 / KPAR / NCORE 的选项缺省时各取前三个取值。
//!
//! ## 依赖关系
//! - 使用 `analysis/grid.rs`, `plot/tetris.rs`, `params/nodes.rs`

use super::chessboard::grid_table;
use super::save_figure;
use crate::analysis::grid::default_choices;
use crate::analysis::tetris_panels;
use crate::cli::analyze::TetrisArgs;
use crate::error::Result;
use crate::models::{Axis, TimingSet};
use crate::params::parse_range;
use crate::plot::TetrisFigure;
use crate::utils::output;

fn choices(set: &TimingSet, expr: Option<&str>, axis: Axis) -> Result<Vec<u32>> {
    match expr {
        Some(e) => parse_range(e),
        None => Ok(default_choices(set, axis)),
    }
}

/// 执行 tetris 子命令
pub fn execute(args: TetrisArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;

    let nodes = choices(&set, args.nodes.as_deref(), Axis::Nodes)?;
    let kpar = choices(&set, args.kpar.as_deref(), Axis::Kpar)?;
    let ncore = choices(&set, args.ncore.as_deref(), Axis::Ncore)?;

    let panels = tetris_panels(&set, &nodes, &kpar, &ncore)?;

    for panel in &panels {
        output::print_header(&format!("{} nodes", panel.nodes));
        println!("{}", grid_table(&panel.grid));
    }

    save_figure(&TetrisFigure { panels: &panels }, &args.output, &args.plot)
}
