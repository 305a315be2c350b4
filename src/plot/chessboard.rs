//! # Chessboard 热图
//!
//! 行为 KPAR、列为 NCORE（或 NPAR）的耗时热图。第 0 行（最小的 KPAR）在最下方，
//! 缺失的格子留空，有值的格子标注一位小数。
//!
//! ## 依赖关系
//! - 被 `plot/tetris.rs` 复用 `draw_heatmap`
//! - 使用 `analysis/grid.rs`

use super::{plot_err, Figure, RD_YL_GN_R};
use crate::analysis::TimingGrid;
use crate::error::Result;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// 单节点数热图
pub struct ChessboardFigure<'a> {
    pub grid: &'a TimingGrid,
    pub nodes: u32,
}

impl Figure for ChessboardFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(plot_err)?;
        let range = self.grid.range().unwrap_or((0.0, 1.0));
        let title = format!("Timestep (s) for {} nodes", self.nodes);
        draw_heatmap(root, self.grid, &title, range)
    }
}

/// 在给定区域内绘制一个网格热图；`range` 决定色标范围
pub(crate) fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    grid: &TimingGrid,
    title: &str,
    range: (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = cell_ranges(grid);
    let n_cols = x_range.end;
    let n_rows = y_range.end;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    let (width, height) = chart.plotting_area().dim_in_pixel();
    let cell_w = width as i32 / n_cols;
    let cell_h = height as i32 / n_rows;

    let cols = &grid.cols;
    let rows = &grid.rows;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(grid.col_axis.label())
        .y_desc(grid.row_axis.label())
        .x_labels(n_cols as usize + 1)
        .y_labels(n_rows as usize + 1)
        .x_label_offset(cell_w / 2)
        .y_label_offset(-cell_h / 2)
        .x_label_formatter(&|x| axis_label(cols, *x))
        .y_label_formatter(&|y| axis_label(rows, *y))
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    let (min, max) = range;
    chart
        .draw_series(grid.observed().map(|(i, j, t)| {
            let (x, y) = (j as i32, i as i32);
            Rectangle::new([(x, y), (x + 1, y + 1)], RD_YL_GN_R.scaled(t, min, max).filled())
        }))
        .map_err(plot_err)?;

    let text_style = TextStyle::from(("sans-serif", 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(grid.observed().map(|(i, j, t)| {
            EmptyElement::at(text_anchor(i, j))
                + Text::new(format!("{:.1}", t), (cell_w / 2, cell_h / 2), text_style.clone())
        }))
        .map_err(plot_err)?;

    Ok(())
}

/// 列、行坐标范围；两者都递增，行 0 位于底部
fn cell_ranges(grid: &TimingGrid) -> (Range<i32>, Range<i32>) {
    let n_cols = grid.cols.len().max(1) as i32;
    let n_rows = grid.rows.len().max(1) as i32;
    (0..n_cols, 0..n_rows)
}

/// 格子 (i, j) 的左上角，文字再按半个格子偏移到中心
fn text_anchor(i: usize, j: usize) -> (i32, i32) {
    (j as i32, i as i32 + 1)
}

fn axis_label(values: &[u32], index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| values.get(i))
        .map(|v| v.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Axis, TimingRecord};

    #[test]
    fn test_smallest_kpar_at_bottom() {
        let records: Vec<TimingRecord> = [(1, 1, 3.0), (2, 1, 2.0), (4, 2, 1.0)]
            .iter()
            .map(|&(kpar, ncore, t)| TimingRecord::new(1, kpar, 1, ncore, t))
            .collect();
        let grid = TimingGrid::pivot(&records, Axis::Kpar, Axis::Ncore);

        let (x_range, y_range) = cell_ranges(&grid);
        assert_eq!(x_range, 0..2);
        assert_eq!(y_range, 0..3);
        assert_eq!(grid.rows[0], 1);

        // 行 0 的文字锚点在该行上边缘
        assert_eq!(text_anchor(0, 0), (0, 1));
        assert_eq!(text_anchor(2, 1), (1, 3));
    }

    #[test]
    fn test_axis_label() {
        assert_eq!(axis_label(&[1, 2, 4], 2), "4");
        assert_eq!(axis_label(&[1, 2, 4], 3), "");
        assert_eq!(axis_label(&[1, 2, 4], -1), "");
    }
}
