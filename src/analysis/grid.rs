//! # 计时网格透视
//!
//! 将扁平的计时记录透视为二维网格（行轴 × 列轴），供 chessboard / tetris 热图使用。
//!
//! ## 规则
//! - 轴取值总是升序去重
//! - 没有观测值的格子为 `None`，绘图时留空
//! - 同一 (行, 列) 出现多条记录时，按迭代顺序后者覆盖前者
//!
//! ## 依赖关系
//! - 被 `plot/`, `analysis/export.rs`, `commands/analyze/` 使用
//! - 使用 `models/timing.rs`

use crate::error::{ParbenchError, Result};
use crate::models::timing::unique_values;
use crate::models::{Axis, TimingRecord, TimingSet};

/// 二维计时网格
#[derive(Debug, Clone, PartialEq)]
pub struct TimingGrid {
    pub row_axis: Axis,
    pub col_axis: Axis,
    /// 行轴取值（升序）
    pub rows: Vec<u32>,
    /// 列轴取值（升序）
    pub cols: Vec<u32>,
    cells: Vec<Vec<Option<f64>>>,
}

impl TimingGrid {
    /// 透视记录，轴取值由数据本身决定
    pub fn pivot(records: &[TimingRecord], row_axis: Axis, col_axis: Axis) -> Self {
        let rows = unique_values(records, row_axis);
        let cols = unique_values(records, col_axis);
        Self::fill(records, row_axis, rows, col_axis, cols)
    }

    /// 透视到给定的轴取值上；不在取值内的记录被忽略
    pub fn pivot_onto(
        records: &[TimingRecord],
        row_axis: Axis,
        rows: &[u32],
        col_axis: Axis,
        cols: &[u32],
    ) -> Self {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        let mut cols = cols.to_vec();
        cols.sort_unstable();
        cols.dedup();
        Self::fill(records, row_axis, rows, col_axis, cols)
    }

    fn fill(
        records: &[TimingRecord],
        row_axis: Axis,
        rows: Vec<u32>,
        col_axis: Axis,
        cols: Vec<u32>,
    ) -> Self {
        let mut cells = vec![vec![None; cols.len()]; rows.len()];

        for record in records {
            let row = rows.binary_search(&row_axis.value(record));
            let col = cols.binary_search(&col_axis.value(record));
            if let (Ok(i), Ok(j)) = (row, col) {
                cells[i][j] = Some(record.timing);
            }
        }

        TimingGrid {
            row_axis,
            col_axis,
            rows,
            cols,
            cells,
        }
    }

    /// 按索引取格子
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// 按轴取值取格子
    pub fn lookup(&self, row_value: u32, col_value: u32) -> Option<f64> {
        let i = self.rows.binary_search(&row_value).ok()?;
        let j = self.cols.binary_search(&col_value).ok()?;
        self.get(i, j)
    }

    /// 所有有观测值的格子：(行索引, 列索引, 耗时)
    pub fn observed(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, cell)| cell.map(|t| (i, j, t)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.observed().next().is_none()
    }

    /// 观测值的 (最小, 最大)，用于颜色归一化
    pub fn range(&self) -> Option<(f64, f64)> {
        self.observed().fold(None, |acc, (_, _, t)| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}

/// chessboard：单个节点数下 KPAR × (NCORE|NPAR)
pub fn chessboard_grid(set: &TimingSet, nodes: u32, x_axis: Axis) -> Result<TimingGrid> {
    let records = set.for_nodes(nodes);
    if records.is_empty() {
        return Err(ParbenchError::NoRecordsForNodes { nodes });
    }
    Ok(TimingGrid::pivot(&records, Axis::Kpar, x_axis))
}

/// tetris 图中的一个面板
#[derive(Debug, Clone)]
pub struct TetrisPanel {
    pub nodes: u32,
    pub grid: TimingGrid,
}

/// tetris：多个节点数并排，每个面板透视到选定的 KPAR × NCORE 上
pub fn tetris_panels(
    set: &TimingSet,
    nodes_choices: &[u32],
    kpar_choices: &[u32],
    ncore_choices: &[u32],
) -> Result<Vec<TetrisPanel>> {
    let mut nodes = nodes_choices.to_vec();
    nodes.sort_unstable();
    nodes.dedup();

    nodes
        .into_iter()
        .map(|n| {
            let grid = TimingGrid::pivot_onto(
                &set.for_nodes(n),
                Axis::Kpar,
                kpar_choices,
                Axis::Ncore,
                ncore_choices,
            );
            if grid.is_empty() {
                return Err(ParbenchError::EmptySelection { nodes: n });
            }
            Ok(TetrisPanel { nodes: n, grid })
        })
        .collect()
}

/// tetris 默认选项：每个轴的前三个取值
pub fn default_choices(set: &TimingSet, axis: Axis) -> Vec<u32> {
    set.unique(axis).into_iter().take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(nodes: u32, kpar: u32, npar: u32, ncore: u32, timing: f64) -> TimingRecord {
        TimingRecord::new(nodes, kpar, npar, ncore, timing)
    }

    #[test]
    fn test_pivot_sorted_axes_and_missing_cells() {
        let records = vec![
            rec(1, 4, 1, 2, 3.0),
            rec(1, 1, 1, 1, 10.0),
            rec(1, 2, 1, 4, 5.0),
        ];
        let grid = TimingGrid::pivot(&records, Axis::Kpar, Axis::Ncore);

        assert_eq!(grid.rows, vec![1, 2, 4]);
        assert_eq!(grid.cols, vec![1, 2, 4]);
        assert_eq!(grid.lookup(1, 1), Some(10.0));
        assert_eq!(grid.lookup(4, 2), Some(3.0));
        assert_eq!(grid.lookup(2, 4), Some(5.0));
        assert_eq!(grid.lookup(1, 4), None);
        assert_eq!(grid.observed().count(), 3);
        assert_eq!(grid.range(), Some((3.0, 10.0)));
    }

    #[test]
    fn test_duplicates_keep_last_seen() {
        let set = TimingSet::new(vec![
            rec(2, 2, 7, 2, 8.0),
            rec(2, 2, 7, 2, 6.5),
            rec(1, 2, 7, 2, 99.0),
        ]);
        let grid = chessboard_grid(&set, 2, Axis::Ncore).unwrap();
        assert_eq!(grid.lookup(2, 2), Some(6.5));
        assert_eq!(grid.observed().count(), 1);
    }

    #[test]
    fn test_chessboard_npar_axis() {
        let set = TimingSet::new(vec![rec(1, 1, 28, 1, 4.0), rec(1, 2, 7, 2, 3.0)]);
        let grid = chessboard_grid(&set, 1, Axis::Npar).unwrap();
        assert_eq!(grid.cols, vec![7, 28]);
        assert_eq!(grid.get(0, 1), Some(4.0));
    }

    #[test]
    fn test_chessboard_unknown_nodes() {
        let set = TimingSet::new(vec![rec(1, 1, 1, 1, 1.0)]);
        assert!(matches!(
            chessboard_grid(&set, 8, Axis::Ncore),
            Err(ParbenchError::NoRecordsForNodes { nodes: 8 })
        ));
    }

    #[test]
    fn test_pivot_onto_ignores_unselected() {
        let records = vec![rec(1, 1, 1, 1, 2.0), rec(1, 8, 1, 1, 1.0)];
        let grid = TimingGrid::pivot_onto(&records, Axis::Kpar, &[2, 1], Axis::Ncore, &[1]);
        assert_eq!(grid.rows, vec![1, 2]);
        assert_eq!(grid.lookup(1, 1), Some(2.0));
        assert_eq!(grid.lookup(2, 1), None);
        assert_eq!(grid.observed().count(), 1);
    }

    #[test]
    fn test_tetris_empty_panel_reported() {
        let set = TimingSet::new(vec![rec(1, 1, 1, 1, 2.0), rec(2, 4, 1, 4, 1.0)]);
        let err = tetris_panels(&set, &[1, 2], &[1], &[1]).unwrap_err();
        assert!(matches!(err, ParbenchError::EmptySelection { nodes: 2 }));
        assert!(err.to_string().contains("empty plot for 2 nodes"));
    }

    #[test]
    fn test_tetris_panels_sorted_by_nodes() {
        let set = TimingSet::new(vec![rec(1, 1, 1, 1, 2.0), rec(2, 1, 1, 1, 1.0)]);
        let panels = tetris_panels(&set, &[2, 1], &[1], &[1]).unwrap();
        let nodes: Vec<u32> = panels.iter().map(|p| p.nodes).collect();
        assert_eq!(nodes, vec![1, 2]);
    }

    #[test]
    fn test_default_choices_first_three() {
        let set = TimingSet::new(
            [16, 1, 8, 2, 4]
                .iter()
                .map(|&k| rec(1, k, 1, 1, 1.0))
                .collect(),
        );
        assert_eq!(default_choices(&set, Axis::Kpar), vec![1, 2, 4]);
    }
}
