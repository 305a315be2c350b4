//! # 耗时折线 / 散点图
//!
//! - `NodesScatterFigure`: 耗时 vs 节点数，y 轴对数，按 KPAR 着色
//! - `KparLinesFigure`: 耗时 vs KPAR，双对数，每个节点数一条
//! - `NparLinesFigure`: 单节点数下耗时 vs KPAR，双对数，每个 NPAR 一条
//!
//! ## 依赖关系
//! - 使用 `analysis/series.rs`

use super::{log_range, plot_err, Figure, VIRIDIS};
use crate::analysis::{ScatterPoint, Series};
use crate::error::Result;

use plotters::coord::Shift;
use plotters::prelude::*;

pub struct NodesScatterFigure<'a> {
    /// 升序去重的 KPAR，决定颜色
    pub kpars: &'a [u32],
    pub points: &'a [ScatterPoint],
}

impl Figure for NodesScatterFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(plot_err)?;

        let max_nodes = self.points.iter().map(|p| p.nodes).max().unwrap_or(1) as f64;
        let y_range = log_range(self.points.iter().map(|p| p.timing));

        let mut chart = ChartBuilder::on(root)
            .caption("Timestep vs nodes", ("sans-serif", 26).into_font())
            .margin(30)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..max_nodes + 1.0, y_range.log_scale())
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("Nodes")
            .y_desc("Time per electronic step (s)")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .label_style(("sans-serif", 16))
            .axis_desc_style(("sans-serif", 18))
            .draw()
            .map_err(plot_err)?;

        for (index, kpar) in self.kpars.iter().enumerate() {
            let color = VIRIDIS.category(index, self.kpars.len());
            chart
                .draw_series(
                    self.points
                        .iter()
                        .filter(|p| p.kpar_index == index && p.timing > 0.0)
                        .map(|p| Circle::new((p.nodes as f64, p.timing), 5, color.filled())),
                )
                .map_err(plot_err)?
                .label(format!("KPAR = {}", kpar))
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

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

pub struct KparLinesFigure<'a> {
    pub series: &'a [Series],
}

impl Figure for KparLinesFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        draw_log_lines(
            root,
            self.series,
            "Timestep vs KPAR",
            |nodes| format!("# nodes = {}", nodes),
        )
    }
}

pub struct NparLinesFigure<'a> {
    pub series: &'a [Series],
    pub nodes: u32,
}

impl Figure for NparLinesFigure<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        draw_log_lines(
            root,
            self.series,
            &format!("Timestep vs KPAR for {} nodes", self.nodes),
            |npar| format!("NPAR = {}", npar),
        )
    }
}

/// 双对数坐标下的多条 (KPAR, 耗时) 折线
fn draw_log_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    title: &str,
    label: impl Fn(u32) -> String,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let all = || series.iter().flat_map(|s| s.points.iter());
    let x_range = log_range(all().map(|(k, _)| *k as f64));
    let y_range = log_range(all().map(|(_, t)| *t));

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 26).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("KPAR")
        .y_desc("Time per electronic step (s)")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    for (index, s) in series.iter().enumerate() {
        let color = VIRIDIS.category(index, series.len());
        let mut points: Vec<(f64, f64)> = s
            .points
            .iter()
            .filter(|(k, t)| *k > 0 && *t > 0.0)
            .map(|(k, t)| (*k as f64, *t))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(label(s.label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}
