//! # 折线 / 散点数据序列
//!
//! 为 timestep 和 NPAR 折线图整理数据。
//!
//! ## 依赖关系
//! - 被 `plot/timing.rs` 使用
//! - 使用 `models/timing.rs`

use crate::models::{Axis, TimingRecord, TimingSet};

/// 耗时-节点数散点，按 KPAR 着色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub nodes: u32,
    pub timing: f64,
    pub kpar: u32,
    /// KPAR 在升序去重列表中的位置
    pub kpar_index: usize,
}

/// 一条以某个整数标签分组的折线
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// 分组标签（节点数或 NPAR）
    pub label: u32,
    /// (x, timing)
    pub points: Vec<(u32, f64)>,
}

/// NPAR 折线最多显示的条数
pub const NPAR_LINE_LIMIT: usize = 9;

/// 所有记录的 (节点数, 耗时) 散点
pub fn time_vs_nodes(set: &TimingSet) -> (Vec<u32>, Vec<ScatterPoint>) {
    let kpars = set.unique(Axis::Kpar);
    let points = set
        .records()
        .iter()
        .map(|r| ScatterPoint {
            nodes: r.nodes,
            timing: r.timing,
            kpar: r.kpar,
            kpar_index: kpars.binary_search(&r.kpar).unwrap_or(0),
        })
        .collect();
    (kpars, points)
}

/// 每个节点数一条 (KPAR, 耗时) 序列，点的顺序与输入一致
pub fn time_vs_kpar(set: &TimingSet) -> Vec<Series> {
    set.unique(Axis::Nodes)
        .into_iter()
        .map(|nodes| Series {
            label: nodes,
            points: set
                .records()
                .iter()
                .filter(|r| r.nodes == nodes)
                .map(|r| (r.kpar, r.timing))
                .collect(),
        })
        .collect()
}

/// 指定节点数下，每个 NPAR 一条按 KPAR 排序的折线；只保留前 `limit` 个 NPAR
pub fn npar_lines(set: &TimingSet, nodes: u32, limit: usize) -> Vec<Series> {
    let mut records: Vec<TimingRecord> = set.for_nodes(nodes);
    records.sort_by_key(|r| r.kpar);

    let mut npars: Vec<u32> = records.iter().map(|r| r.npar).collect();
    npars.sort_unstable();
    npars.dedup();
    npars.truncate(limit);

    npars
        .into_iter()
        .map(|npar| Series {
            label: npar,
            points: records
                .iter()
                .filter(|r| r.npar == npar)
                .map(|r| (r.kpar, r.timing))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimingSet {
        TimingSet::new(vec![
            TimingRecord::new(1, 4, 7, 1, 8.0),
            TimingRecord::new(1, 1, 28, 1, 12.0),
            TimingRecord::new(2, 2, 28, 1, 6.0),
            TimingRecord::new(1, 2, 7, 2, 9.0),
            TimingRecord::new(1, 1, 7, 4, 11.0),
        ])
    }

    #[test]
    fn test_time_vs_nodes_kpar_index() {
        let (kpars, points) = time_vs_nodes(&sample());
        assert_eq!(kpars, vec![1, 2, 4]);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].kpar_index, 2);
        assert_eq!(points[2].kpar_index, 1);
    }

    #[test]
    fn test_time_vs_kpar_groups_by_nodes() {
        let series = time_vs_kpar(&sample());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, 1);
        assert_eq!(series[0].points, vec![(4, 8.0), (1, 12.0), (2, 9.0), (1, 11.0)]);
        assert_eq!(series[1].points, vec![(2, 6.0)]);
    }

    #[test]
    fn test_npar_lines_sorted_and_stable() {
        let lines = npar_lines(&sample(), 1, NPAR_LINE_LIMIT);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, 7);
        // KPAR 排序稳定：两条 kpar=1 的记录中 npar=7 的只有 11.0
        assert_eq!(lines[0].points, vec![(1, 11.0), (2, 9.0), (4, 8.0)]);
        assert_eq!(lines[1].label, 28);
        assert_eq!(lines[1].points, vec![(1, 12.0)]);
    }

    #[test]
    fn test_npar_lines_limit() {
        let set = TimingSet::new(
            (1..=12)
                .map(|npar| TimingRecord::new(1, 1, npar, 1, npar as f64))
                .collect(),
        );
        let lines = npar_lines(&set, 1, NPAR_LINE_LIMIT);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines.last().map(|s| s.label), Some(9));
    }
}
