//! # analyze timestep 实现
//!
//! ## 依赖关系
//! - 使用 `analysis/series.rs`, `plot/timing.rs`

use super::save_figure;
use crate::analysis::{time_vs_kpar, time_vs_nodes};
use crate::cli::analyze::{TimestepArgs, TimestepMode};
use crate::error::Result;
use crate::models::TimingSet;
use crate::plot::{KparLinesFigure, NodesScatterFigure};
use crate::utils::output;

/// 执行 timestep 子命令
pub fn execute(args: TimestepArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;
    output::print_info(&format!(
        "Loaded {} timing records from '{}'",
        set.len(),
        args.timing_file.display()
    ));

    match args.by {
        TimestepMode::Nodes => {
            let (kpars, points) = time_vs_nodes(&set);
            let figure = NodesScatterFigure {
                kpars: &kpars,
                points: &points,
            };
            save_figure(&figure, &args.output, &args.plot)
        }
        TimestepMode::Kpar => {
            let series = time_vs_kpar(&set);
            save_figure(&KparLinesFigure { series: &series }, &args.output, &args.plot)
        }
    }
}
