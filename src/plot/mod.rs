//! # 图表渲染
//!
//! 使用 `plotters` 把计时数据渲染为 PNG 或 SVG。
//!
//! 每种图表实现 `Figure`，由 `save` 统一选择后端并输出：
//! - `timing.rs`: 时间步 vs 节点数 / KPAR，NPAR 折线
//! - `chessboard.rs`: 单节点数的 KPAR×NCORE 热图
//! - `tetris.rs`: 多节点数并排热图
//! - `scaling.rs`: 最优设置的加速比与效率
//!
//! ## 依赖关系
//! - 被 `commands/analyze/` 使用
//! - 使用 `analysis/` 的网格与序列

pub mod chessboard;
pub mod scaling;
pub mod tetris;
pub mod timing;

pub use chessboard::ChessboardFigure;
pub use scaling::ScalingFigure;
pub use tetris::TetrisFigure;
pub use timing::{KparLinesFigure, NodesScatterFigure, NparLinesFigure};

use crate::error::{ParbenchError, Result};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlotFormat {
    Png,
    Svg,
}

impl PlotFormat {
    /// 由扩展名推断
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(PlotFormat::Png),
            Some("svg") => Ok(PlotFormat::Svg),
            _ => Err(ParbenchError::InvalidArgument(format!(
                "cannot infer plot format from '{}', use .png/.svg or --format",
                path.display()
            ))),
        }
    }
}

/// 可渲染到任意 plotters 后端的图表
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static;
}

/// 渲染并保存图表；`format` 为 `None` 时由扩展名推断
pub fn save<F: Figure>(
    figure: &F,
    output_path: &Path,
    size: (u32, u32),
    format: Option<PlotFormat>,
) -> Result<()> {
    let format = match format {
        Some(f) => f,
        None => PlotFormat::from_path(output_path)?,
    };

    match format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(plot_err)?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(plot_err)?;
        }
    }
    Ok(())
}

pub(crate) fn plot_err<E: std::fmt::Debug>(e: E) -> ParbenchError {
    ParbenchError::PlotError(format!("{:?}", e))
}

/// 线性插值的连续色图
pub struct Colormap {
    anchors: &'static [(u8, u8, u8)],
}

/// 红-黄-绿（反转）：小值为绿，大值为红
pub const RD_YL_GN_R: Colormap = Colormap {
    anchors: &[
        (0, 104, 55),
        (102, 189, 99),
        (217, 239, 139),
        (254, 224, 139),
        (244, 109, 67),
        (165, 0, 38),
    ],
};

pub const VIRIDIS: Colormap = Colormap {
    anchors: &[
        (68, 1, 84),
        (59, 82, 139),
        (33, 145, 140),
        (94, 201, 98),
        (253, 231, 37),
    ],
};

impl Colormap {
    /// `t` 取 [0, 1]，越界截断
    pub fn at(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.anchors.len() - 1;
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last.saturating_sub(1));
        let frac = pos - i as f64;

        let (r0, g0, b0) = self.anchors[i];
        let (r1, g1, b1) = self.anchors[(i + 1).min(last)];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }

    /// 在 [min, max] 上归一化后取色
    pub fn scaled(&self, value: f64, min: f64, max: f64) -> RGBColor {
        if max > min {
            self.at((value - min) / (max - min))
        } else {
            self.at(0.5)
        }
    }

    /// n 个类别的离散取色
    pub fn category(&self, index: usize, count: usize) -> RGBColor {
        if count <= 1 {
            self.at(0.0)
        } else {
            self.at(index as f64 / (count - 1) as f64)
        }
    }
}

/// 含正数据的对数坐标范围，上下各留半个量级
pub(crate) fn log_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values
        .filter(|v| *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.1..10.0;
    }
    (lo / 1.5)..(hi * 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(PlotFormat::from_path(Path::new("a.PNG")).unwrap(), PlotFormat::Png);
        assert_eq!(PlotFormat::from_path(Path::new("out/b.svg")).unwrap(), PlotFormat::Svg);
        assert!(PlotFormat::from_path(Path::new("c.pdf")).is_err());
        assert!(PlotFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(RD_YL_GN_R.at(0.0), RGBColor(0, 104, 55));
        assert_eq!(RD_YL_GN_R.at(1.0), RGBColor(165, 0, 38));
        assert_eq!(RD_YL_GN_R.at(7.0), RGBColor(165, 0, 38));
        assert_eq!(VIRIDIS.at(0.25), RGBColor(59, 82, 139));
        assert_eq!(VIRIDIS.scaled(3.0, 3.0, 3.0), VIRIDIS.at(0.5));
        assert_eq!(VIRIDIS.category(0, 1), VIRIDIS.at(0.0));
    }

    #[test]
    fn test_log_range() {
        let r = log_range([2.0, 0.0, 30.0].into_iter());
        assert!((r.start - 2.0 / 1.5).abs() < 1e-12);
        assert!((r.end - 45.0).abs() < 1e-12);
        assert_eq!(log_range(std::iter::empty()), 0.1..10.0);
    }
}
