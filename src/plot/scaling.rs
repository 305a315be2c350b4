//! # 最优设置标度图
//!
//! 左轴为每个节点数的最优耗时，右轴为并行效率（含 1.0 参考线）。
//! 每个点标注对应的 KPAR / NCORE。
//!
//! ## 依赖关系
//! - 使用 `analysis/optimal.rs`

use super::{plot_err, Figure};
use crate::analysis::ScalingPoint;
use crate::error::Result;

use plotters::coord::Shift;
use plotters::prelude::*;

pub struct ScalingFigure<'a> {
    pub points: &'a [ScalingPoint],
}

impl ScalingFigure<'_> {
    fn efficiency_max(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.efficiency)
            .fold(1.0, f64::max)
            * 1.15
    }
}

impl Figure for ScalingFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(plot_err)?;

        let max_nodes = self.points.iter().map(|p| p.best.nodes).max().unwrap_or(1) as f64;
        let max_time = self
            .points
            .iter()
            .map(|p| p.best.timing)
            .fold(0.0, f64::max)
            .max(f64::EPSILON)
            * 1.15;
        let x_range = 0.0..max_nodes + 1.0;

        let mut chart = ChartBuilder::on(root)
            .caption("Optimal settings", ("sans-serif", 26).into_font())
            .margin(30)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .right_y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), 0.0..max_time)
            .map_err(plot_err)?
            .set_secondary_coord(x_range, 0.0..self.efficiency_max());

        chart
            .configure_mesh()
            .x_desc("Nodes")
            .y_desc("Time per electronic step (s)")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .label_style(("sans-serif", 16))
            .axis_desc_style(("sans-serif", 18))
            .draw()
            .map_err(plot_err)?;
        chart
            .configure_secondary_axes()
            .y_desc("Efficiency")
            .label_style(("sans-serif", 16))
            .axis_desc_style(("sans-serif", 18))
            .draw()
            .map_err(plot_err)?;

        let time_color = RGBColor(0, 102, 204);
        let eff_color = RGBColor(204, 51, 17);
        let timings: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (p.best.nodes as f64, p.best.timing))
            .collect();
        let efficiencies: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (p.best.nodes as f64, p.efficiency))
            .collect();

        chart
            .draw_series(LineSeries::new(timings.iter().copied(), time_color.stroke_width(2)))
            .map_err(plot_err)?
            .label("best timestep")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], time_color.stroke_width(2)));
        chart
            .draw_series(self.points.iter().map(|p| {
                let at = (p.best.nodes as f64, p.best.timing);
                EmptyElement::at(at)
                    + Circle::new((0, 0), 5, time_color.filled())
                    + Text::new(
                        format!("K{} C{}", p.best.kpar, p.best.ncore),
                        (6, -18),
                        ("sans-serif", 13).into_font(),
                    )
            }))
            .map_err(plot_err)?;

        chart
            .draw_secondary_series(LineSeries::new(
                efficiencies.iter().copied(),
                eff_color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label("efficiency")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], eff_color.stroke_width(2)));
        chart
            .draw_secondary_series(
                efficiencies
                    .iter()
                    .map(|p| TriangleMarker::new(*p, 6, eff_color.filled())),
            )
            .map_err(plot_err)?;
        chart
            .draw_secondary_series(std::iter::once(PathElement::new(
                vec![(0.0, 1.0), (max_nodes + 1.0, 1.0)],
                BLACK.mix(0.5).stroke_width(1),
            )))
            .map_err(plot_err)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::optimal_settings;
    use crate::models::TimingRecord;

    #[test]
    fn test_efficiency_axis_covers_reference_line() {
        let points = optimal_settings(&[
            TimingRecord::new(1, 1, 28, 1, 10.0),
            TimingRecord::new(2, 1, 28, 1, 6.0),
        ]);
        let figure = ScalingFigure { points: &points };
        assert!(figure.efficiency_max() > 1.0);
        assert_eq!(ScalingFigure { points: &[] }.efficiency_max(), 1.15);
    }
}
