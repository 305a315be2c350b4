//! # analyze summary 实现
//!
//! 打印计时文件的概览：记录数、各轴取值和每个节点数的最快设置。
//!
//! ## 依赖关系
//! - 使用 `models/timing.rs`, `analysis/optimal.rs`

use crate::analysis::optimal::best_per_node;
use crate::cli::analyze::SummaryArgs;
use crate::error::Result;
use crate::models::{Axis, TimingSet};
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Nodes")]
    nodes: u32,
    #[tabled(rename = "Runs")]
    runs: usize,
    #[tabled(rename = "Fastest (s)")]
    fastest: String,
    #[tabled(rename = "Slowest (s)")]
    slowest: String,
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 执行 summary 子命令
pub fn execute(args: SummaryArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;
    output::print_header(&format!("Timing Summary: {}", args.timing_file.display()));

    output::print_kv("Records", &set.len().to_string());
    for axis in [Axis::Nodes, Axis::Kpar, Axis::Npar, Axis::Ncore] {
        output::print_kv(axis.label(), &join(&set.unique(axis)));
    }
    println!();

    if set.is_empty() {
        output::print_warning("The timing file contains no records.");
        return Ok(());
    }

    let slowest = |nodes: u32| {
        set.for_nodes(nodes)
            .iter()
            .map(|r| r.timing)
            .fold(f64::NEG_INFINITY, f64::max)
    };
    let rows: Vec<NodeRow> = best_per_node(set.records())
        .into_iter()
        .map(|best| NodeRow {
            nodes: best.nodes,
            runs: set.for_nodes(best.nodes).len(),
            fastest: format!("{:.4}", best.timing),
            slowest: format!("{:.4}", slowest(best.nodes)),
        })
        .collect();
    println!("{}", Table::new(&rows));

    Ok(())
}
