//! # Tetris 图
//!
//! 多个节点数的 KPAR×NCORE 热图并排显示，每个面板按自身的耗时范围着色。
//!
//! ## 依赖关系
//! - 使用 `plot/chessboard.rs` 的 `draw_heatmap`
//! - 使用 `analysis/grid.rs` 的 `TetrisPanel`

use super::chessboard::draw_heatmap;
use super::{plot_err, Figure};
use crate::analysis::TetrisPanel;
use crate::error::Result;

use plotters::coord::Shift;
use plotters::prelude::*;

pub struct TetrisFigure<'a> {
    pub panels: &'a [TetrisPanel],
}

/// 单个面板的色标范围
fn panel_range(panel: &TetrisPanel) -> (f64, f64) {
    panel.grid.range().unwrap_or((0.0, 1.0))
}

impl Figure for TetrisFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(plot_err)?;
        if self.panels.is_empty() {
            return Ok(());
        }

        let areas = root.split_evenly((1, self.panels.len()));
        for (area, panel) in areas.iter().zip(self.panels) {
            let title = format!("{} nodes", panel.nodes);
            draw_heatmap(area, &panel.grid, &title, panel_range(panel))?;
        }
        Ok(())
    }
}
