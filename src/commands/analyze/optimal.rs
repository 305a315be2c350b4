//! # analyze optimal 实现
//!
//! 打印每个节点数的最优 (KPAR, NPAR, NCORE) 以及加速比、效率，
//! 可选导出 CSV 并绘制标度图。
//!
//! ## 依赖关系
//! - 使用 `analysis/optimal.rs`, `analysis/export.rs`, `plot/scaling.rs`

use super::save_figure;
use crate::analysis::export::optimal_to_csv;
use crate::analysis::{optimal_settings, ScalingPoint};
use crate::cli::analyze::OptimalArgs;
use crate::error::Result;
use crate::models::TimingSet;
use crate::plot::ScalingFigure;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OptimalRow {
    #[tabled(rename = "Nodes")]
    nodes: u32,
    #[tabled(rename = "KPAR")]
    kpar: u32,
    #[tabled(rename = "NPAR")]
    npar: u32,
    #[tabled(rename = "NCORE")]
    ncore: u32,
    #[tabled(rename = "Timestep (s)")]
    timing: String,
    #[tabled(rename = "Speedup")]
    speedup: String,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

impl From<&ScalingPoint> for OptimalRow {
    fn from(p: &ScalingPoint) -> Self {
        OptimalRow {
            nodes: p.best.nodes,
            kpar: p.best.kpar,
            npar: p.best.npar,
            ncore: p.best.ncore,
            timing: format!("{:.4}", p.best.timing),
            speedup: format!("{:.3}", p.speedup),
            efficiency: format!("{:.3}", p.efficiency),
        }
    }
}

/// 执行 optimal 子命令
pub fn execute(args: OptimalArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;
    let points = optimal_settings(set.records());

    if points.is_empty() {
        output::print_warning("The timing file contains no records.");
        return Ok(());
    }

    output::print_header("Optimal Settings per Node Count");
    let rows: Vec<OptimalRow> = points.iter().map(OptimalRow::from).collect();
    println!("{}", Table::new(&rows));

    if let Some(ref csv_path) = args.csv {
        optimal_to_csv(&points, csv_path)?;
        output::print_success(&format!("Table saved to '{}'", csv_path.display()));
    }

    if !args.no_plot {
        save_figure(&ScalingFigure { points: &points }, &args.output, &args.plot)?;
    }

    Ok(())
}
