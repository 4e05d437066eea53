use anyhow::anyhow;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::formatters::format_currency;
use shared::MonthlySpending;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use super::{y_axis_max, AXIS, GRID, PINK, PRIMARY, TEAL};

#[derive(Properties, PartialEq)]
pub struct MonthlySpendingChartProps {
    pub data: Vec<MonthlySpending>,
}

pub struct MonthlySpendingChart {
    canvas_ref: NodeRef,
}

/// One stacked series per transaction type, bottom to top
fn series(data: &[MonthlySpending]) -> [(&'static str, RGBColor, Vec<f64>); 3] {
    [
        ("Merchant", PRIMARY, data.iter().map(|m| m.merchant).collect()),
        ("Transfer", TEAL, data.iter().map(|m| m.transfer).collect()),
        ("Fee", PINK, data.iter().map(|m| m.fee).collect()),
    ]
}

impl Component for MonthlySpendingChart {
    type Message = ();
    type Properties = MonthlySpendingChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self { canvas_ref: NodeRef::default() }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        ctx.props().data != old_props.data
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if let Err(e) = self.draw_chart(&ctx.props().data) {
            log::error!("Failed to draw monthly spending chart: {}", e);
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="chart-content">
                <canvas ref={self.canvas_ref.clone()} class="rust-chart-canvas" width="800" height="400"></canvas>
            </div>
        }
    }
}

impl MonthlySpendingChart {
    fn draw_chart(&self, data: &[MonthlySpending]) -> anyhow::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return Ok(());
        };
        let backend = CanvasBackend::with_canvas_object(canvas).ok_or_else(|| anyhow!("no 2d context"))?;
        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;

        let months: Vec<String> = data.iter().map(|m| m.month.clone()).collect();
        let max_total = data.iter().map(MonthlySpending::total).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption("Monthly Spending by Category", ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..months.len() as i32).into_segmented(), 0f64..y_axis_max(max_total))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Month")
            .y_desc("Amount ($)")
            .x_label_formatter(&|value: &SegmentValue<i32>| match value {
                SegmentValue::CenterOf(i) => months.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| format_currency(Some(*v)))
            .axis_style(AXIS)
            .bold_line_style(GRID)
            .label_style(("sans-serif", 12))
            .draw()?;

        let mut base = vec![0.0; data.len()];
        for (label, color, values) in series(data) {
            let bars: Vec<Rectangle<(SegmentValue<i32>, f64)>> = values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    let bottom = base[i];
                    let top = bottom + value.max(0.0);
                    base[i] = top;
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(i as i32), bottom), (SegmentValue::Exact(i as i32 + 1), top)],
                        color.mix(0.8).filled(),
                    );
                    bar.set_margin(0, 0, 12, 12);
                    bar
                })
                .collect();
            chart
                .draw_series(bars)?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(AXIS)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_order_and_values() {
        let data = vec![MonthlySpending { month: "2024-01".to_string(), merchant: 10.0, transfer: 5.0, fee: 1.5 }];
        let [merchant, transfer, fee] = series(&data);
        assert_eq!(merchant.0, "Merchant");
        assert_eq!(transfer.2, vec![5.0]);
        assert_eq!(fee.2, vec![1.5]);
    }
}
