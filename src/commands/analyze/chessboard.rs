//! # analyze chessboard 实现
//!
//! 单节点数的 KPAR × NCORE（或 NPAR）热图，同时在终端打印网格。
//!
//! ## 依赖关系
//! - 使用 `analysis/grid.rs`, `analysis/export.rs`, `plot/chessboard.rs`

use super::save_figure;
use crate::analysis::export::grid_to_csv;
use crate::analysis::{chessboard_grid, TimingGrid};
use crate::cli::analyze::{ChessboardArgs, ChessboardAxis};
use crate::error::Result;
use crate::models::{Axis, TimingSet};
use crate::plot::ChessboardFigure;
use crate::utils::output;

use tabled::builder::Builder;

/// 执行 chessboard 子命令
pub fn execute(args: ChessboardArgs) -> Result<()> {
    let set = TimingSet::load(&args.timing_file)?;
    let x_axis = match args.x_axis {
        ChessboardAxis::Ncore => Axis::Ncore,
        ChessboardAxis::Npar => Axis::Npar,
    };
    let grid = chessboard_grid(&set, args.nodes, x_axis)?;

    output::print_header(&format!("Timestep (s) for {} nodes", args.nodes));
    println!("{}", grid_table(&grid));

    if let Some(ref csv_path) = args.csv {
        grid_to_csv(&grid, csv_path)?;
        output::print_success(&format!("Grid saved to '{}'", csv_path.display()));
    }

    let figure = ChessboardFigure {
        grid: &grid,
        nodes: args.nodes,
    };
    save_figure(&figure, &args.output, &args.plot)
}

/// 网格的终端表格，缺失格子显示为 "-"
pub(super) fn grid_table(grid: &TimingGrid) -> tabled::Table {
    let mut builder = Builder::default();

    let mut header = vec![format!("{} \\ {}", grid.row_axis.label(), grid.col_axis.label())];
    header.extend(grid.cols.iter().map(|c| c.to_string()));
    builder.push_record(header);

    for (i, row_value) in grid.rows.iter().enumerate() {
        let mut record = vec![row_value.to_string()];
        record.extend((0..grid.cols.len()).map(|j| {
            grid.get(i, j)
                .map(|t| format!("{:.1}", t))
                .unwrap_or_else(|| "-".to_string())
        }));
        builder.push_record(record);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimingRecord;

    #[test]
    fn test_grid_table_marks_missing_cells() {
        let grid = TimingGrid::pivot(
            &[
                TimingRecord::new(1, 1, 28, 1, 12.0),
                TimingRecord::new(1, 2, 7, 2, 9.3),
            ],
            Axis::Kpar,
            Axis::Ncore,
        );
        let rendered = grid_table(&grid).to_string();

        assert!(rendered.contains("KPAR \\ NCORE"));
        assert!(rendered.contains("12.0"));
        assert!(rendered.contains("9.3"));
        assert!(rendered.contains(" - "));
    }
}
