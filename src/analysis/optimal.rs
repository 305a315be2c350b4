//! # 最优并行设置
//!
//! 对每个节点数取耗时最短的记录，并以最小节点数的最优耗时为基准
//! 计算加速比和并行效率。
//!
//! ```text
//! speedup    = best(n_min).timing / best(n).timing
//! efficiency = speedup / n
//! ```
//!
//! ## 依赖关系
//! - 被 `plot/scaling.rs`, `analysis/export.rs`, `commands/analyze/optimal.rs` 使用
//! - 使用 `models/timing.rs`

use crate::models::timing::unique_values;
use crate::models::{Axis, TimingRecord};

/// 单个节点数的最优设置及标度数据
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPoint {
    pub best: TimingRecord,
    pub speedup: f64,
    pub efficiency: f64,
}

/// 每个节点数（升序）耗时最短的记录；并列时取先出现者
pub fn best_per_node(records: &[TimingRecord]) -> Vec<TimingRecord> {
    unique_values(records, Axis::Nodes)
        .into_iter()
        .filter_map(|nodes| {
            records
                .iter()
                .filter(|r| r.nodes == nodes)
                .fold(None::<&TimingRecord>, |best, r| match best {
                    Some(b) if b.timing <= r.timing => Some(b),
                    _ => Some(r),
                })
                .copied()
        })
        .collect()
}

/// 最优设置及其加速比 / 效率
pub fn optimal_settings(records: &[TimingRecord]) -> Vec<ScalingPoint> {
    let best = best_per_node(records);
    let Some(reference) = best.first().map(|r| r.timing) else {
        return Vec::new();
    };

    best.into_iter()
        .map(|record| {
            let speedup = reference / record.timing;
            ScalingPoint {
                best: record,
                speedup,
                efficiency: speedup / record.nodes as f64,
            }
        })
        .collect()
}
