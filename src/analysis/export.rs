//! # 分析结果导出
//!
//! 将透视网格和最优设置表导出为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/` 调用
//! - 使用 `analysis/grid.rs`, `analysis/optimal.rs`
//! - 使用 `csv` 库写入 CSV 文件

use crate::analysis::grid::TimingGrid;
use crate::analysis::optimal::ScalingPoint;
use crate::error::{ParbenchError, Result};

use std::path::Path;

/// 导出网格为宽表 CSV：第一列为行轴取值，之后每列对应一个列轴取值，缺失格子留空
pub fn grid_to_csv(grid: &TimingGrid, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut header = vec![format!("{}\\{}", grid.row_axis, grid.col_axis)];
    header.extend(grid.cols.iter().map(|c| c.to_string()));
    wtr.write_record(&header)?;

    for (i, row_value) in grid.rows.iter().enumerate() {
        let mut record = vec![row_value.to_string()];
        record.extend((0..grid.cols.len()).map(|j| {
            grid.get(i, j)
                .map(|t| format!("{:.4}", t))
                .unwrap_or_default()
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| ParbenchError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出最优设置表
pub fn optimal_to_csv(points: &[ScalingPoint], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["nodes", "kpar", "npar", "ncore", "timing", "speedup", "efficiency"])?;

    for p in points {
        wtr.write_record(&[
            p.best.nodes.to_string(),
            p.best.kpar.to_string(),
            p.best.npar.to_string(),
            p.best.ncore.to_string(),
            format!("{:.4}", p.best.timing),
            format!("{:.4}", p.speedup),
            format!("{:.4}", p.efficiency),
        ])?;
    }

    wtr.flush().map_err(|e| ParbenchError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
