use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ChartColors;
use crate::data::aggregate::Summary;
use crate::report::Report;
use crate::report::chart::{Chart, ChartKind};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Report page (central panel)
// ---------------------------------------------------------------------------

/// Render the current report in the central panel.
pub fn report_page(ui: &mut Ui, state: &AppState) {
    let report = match &state.report {
        Some(r) => r,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a statistics file to begin  (File → Open…)");
            });
            return;
        }
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            header(ui, report);

            if let Some(summary) = &report.summary {
                metrics(ui, summary);
                ui.add_space(8.0);
            }

            for (idx, chart) in report.charts.iter().enumerate() {
                ui.separator();
                ui.strong(&chart.spec.title);
                chart_plot(ui, chart, idx);
                if state.show_tables && !chart.is_empty() {
                    ui.add_space(4.0);
                    chart_table(ui, chart, idx);
                }
                ui.add_space(12.0);
            }
        });
}

fn header(ui: &mut Ui, report: &Report) {
    ui.heading(&report.title);
    ui.label(&report.description);
    if let Some(notice) = &report.notice {
        ui.label(RichText::new(format!("⚠ {notice}")).color(Color32::from_rgb(230, 160, 30)));
    }
    ui.add_space(6.0);
}

fn metrics(ui: &mut Ui, summary: &Summary) {
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total users", &format_number(summary.total_users as f64));
        metric(ui, "Total transaction amount", &format_number(summary.total_amount));
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).size(24.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Maps category indices to plot coordinates. Horizontal charts list the
/// first category at the top.
#[derive(Debug, Clone)]
struct CategoryAxis {
    labels: Vec<String>,
    reversed: bool,
}

impl CategoryAxis {
    fn position(&self, idx: usize) -> f64 {
        if self.reversed {
            (self.labels.len() - 1 - idx) as f64
        } else {
            idx as f64
        }
    }

    /// Label for a grid mark; blank between categories.
    fn label_at(&self, value: f64) -> String {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        let pos = rounded as usize;
        if pos >= self.labels.len() {
            return String::new();
        }
        let idx = if self.reversed {
            self.labels.len() - 1 - pos
        } else {
            pos
        };
        self.labels[idx].clone()
    }
}

fn chart_plot(ui: &mut Ui, chart: &Chart, idx: usize) {
    if chart.is_empty() {
        ui.label(RichText::new("No data for this selection.").italics());
        return;
    }

    let horizontal = chart.spec.kind == ChartKind::HorizontalBar;
    let axis = CategoryAxis {
        labels: chart.category_labels(),
        reversed: horizontal,
    };
    let colors = ChartColors::new(chart.spec.palette, chart.series.len(), chart.categories.len());

    let formatter_axis = axis.clone();
    let formatter =
        move |mark: GridMark, _range: &RangeInclusive<f64>| formatter_axis.label_at(mark.value);

    let mut plot = Plot::new(("chart", idx))
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true);
    if chart.series.len() > 1 {
        plot = plot.legend(Legend::default());
    }
    plot = if horizontal {
        plot.y_axis_formatter(formatter)
            .x_axis_label(chart.spec.measure.label())
            .y_axis_label(chart.spec.x.label())
    } else {
        plot.x_axis_formatter(formatter)
            .x_axis_label(chart.spec.x.label())
            .y_axis_label(chart.spec.measure.label())
    };

    plot.show(ui, |plot_ui| match chart.spec.kind {
        ChartKind::Bar | ChartKind::HorizontalBar => {
            let n = chart.series.len();
            let width = 0.8 / n as f64;
            for (si, series) in chart.series.iter().enumerate() {
                let offset = (si as f64 - (n as f64 - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(ci, v)| {
                        let v = (*v)?;
                        Some(
                            Bar::new(axis.position(ci) + offset, v)
                                .width(width * 0.95)
                                .fill(colors.color_for(si, ci))
                                .name(&axis.labels[ci]),
                        )
                    })
                    .collect();

                let mut bar_chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(colors.color_for(si, usize::MAX));
                if horizontal {
                    bar_chart = bar_chart.horizontal();
                }
                plot_ui.bar_chart(bar_chart);
            }
        }
        ChartKind::Line => {
            for (si, series) in chart.series.iter().enumerate() {
                let color = colors.color_for(si, usize::MAX);
                let points: Vec<[f64; 2]> = series
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(ci, v)| v.map(|v| [axis.position(ci), v]))
                    .collect();

                if chart.spec.markers {
                    plot_ui.points(
                        Points::new(PlotPoints::from(points.clone()))
                            .radius(3.0)
                            .color(color)
                            .name(&series.name),
                    );
                }
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .name(&series.name)
                        .color(color)
                        .width(1.5),
                );
            }
        }
    });
}

fn chart_table(ui: &mut Ui, chart: &Chart, idx: usize) {
    let labels = chart.category_labels();
    ui.push_id(("table", idx), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(120.0))
            .columns(Column::auto().at_least(90.0), chart.series.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(chart.spec.x.label());
                });
                for series in &chart.series {
                    header.col(|ui| {
                        ui.strong(&series.name);
                    });
                }
            })
            .body(|mut body| {
                for (ci, label) in labels.iter().enumerate() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        for series in &chart.series {
                            row.col(|ui| {
                                ui.label(series.values[ci].map_or_else(String::new, format_number));
                            });
                        }
                    });
                }
            });
    });
}

/// Two decimals at most, thousands grouped with commas.
pub fn format_number(value: f64) -> String {
    let negative = value < 0.0;
    let text = format!("{:.2}", value.abs());
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac == "00" {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1234.5), "1,234.50");
        assert_eq!(format_number(-42000.1), "-42,000.10");
    }

    #[test]
    fn axis_labels_only_on_category_marks() {
        let axis = CategoryAxis {
            labels: vec!["a".into(), "b".into(), "c".into()],
            reversed: false,
        };
        assert_eq!(axis.label_at(1.0), "b");
        assert_eq!(axis.label_at(1.5), "");
        assert_eq!(axis.label_at(-1.0), "");
        assert_eq!(axis.label_at(3.0), "");
    }

    #[test]
    fn reversed_axis_puts_first_category_on_top() {
        let axis = CategoryAxis {
            labels: vec!["top".into(), "mid".into(), "low".into()],
            reversed: true,
        };
        assert_eq!(axis.position(0), 2.0);
        assert_eq!(axis.label_at(2.0), "top");
        assert_eq!(axis.label_at(0.0), "low");
    }
}
