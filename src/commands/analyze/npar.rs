//! # analyze npar 实现
//!
//! ## 依赖关系
//! - 使用 `analysis/series.rs`, `plot/timing.rs`

use super::save_figure;
use crate::analysis::npar_lines;
use crate::cli::analyze::NparArgs;
use crate::error::{ParbenchError, Result};
use crate::models::TimingSet;
use crate::plot::NparLinesFigure;
use crate::utils::output;

/// 执行 npar 子命令
pub fn execute(args: NparArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;

    let series = npar_lines(&set, args.nodes, args.limit);
    if series.is_empty() {
        return Err(ParbenchError::NoRecordsForNodes { nodes: args.nodes });
    }

    let total = set.for_nodes(args.nodes).len();
    output::print_info(&format!(
        "{} NPAR lines from {} records at {} nodes",
        series.len(),
        total,
        args.nodes
    ));

    let figure = NparLinesFigure {
        series: &series,
        nodes: args.nodes,
    };
    save_figure(&figure, &args.output, &args.plot)
}
