use anyhow::anyhow;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::MerchantCount;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use super::{y_axis_max, AXIS, GRID, PRIMARY};

#[derive(Properties, PartialEq)]
pub struct MerchantBarChartProps {
    pub merchants: Vec<MerchantCount>,
    /// Number of merchants plotted
    pub top: usize,
}

pub struct MerchantBarChart {
    canvas_ref: NodeRef,
}

/// Busiest merchants first, at most `top` of them
pub fn top_merchants(merchants: &[MerchantCount], top: usize) -> Vec<MerchantCount> {
    let mut sorted = merchants.to_vec();
    sorted.sort_by(|a, b| b.transaction_count.cmp(&a.transaction_count));
    sorted.truncate(top);
    sorted
}

/// Long names are cut so the axis labels stay readable
fn short_label(name: &str) -> String {
    const MAX: usize = 14;
    if name.chars().count() <= MAX {
        name.to_string()
    } else {
        format!("{}…", name.chars().take(MAX - 1).collect::<String>())
    }
}

impl Component for MerchantBarChart {
    type Message = ();
    type Properties = MerchantBarChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self { canvas_ref: NodeRef::default() }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        ctx.props() != old_props
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        let merchants = top_merchants(&ctx.props().merchants, ctx.props().top);
        if let Err(e) = self.draw_chart(&merchants, ctx.props().top) {
            log::error!("Failed to draw merchant chart: {}", e);
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

impl MerchantBarChart {
    fn draw_chart(&self, merchants: &[MerchantCount], top: usize) -> anyhow::Result<()> {
        if merchants.is_empty() {
            return Ok(());
        }
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return Ok(());
        };
        let backend = CanvasBackend::with_canvas_object(canvas).ok_or_else(|| anyhow!("no 2d context"))?;
        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;

        let labels: Vec<String> = merchants.iter().map(|m| short_label(&m.merchant_name)).collect();
        let max_count = merchants.iter().map(|m| m.transaction_count).max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Top {} Merchants by Transaction Count", top), ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_axis_max(max_count))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Merchant")
            .y_desc("Transaction Count")
            .x_labels(labels.len())
            .x_label_formatter(&|value: &SegmentValue<i32>| match value {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| format!("{:.0}", v))
            .axis_style(AXIS)
            .bold_line_style(GRID)
            .label_style(("sans-serif", 11))
            .draw()?;

        chart.draw_series(merchants.iter().enumerate().map(|(i, merchant)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i as i32), 0.0),
                    (SegmentValue::Exact(i as i32 + 1), merchant.transaction_count as f64),
                ],
                PRIMARY.mix(0.8).filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(name: &str, transaction_count: u32) -> MerchantCount {
        MerchantCount { merchant_name: name.to_string(), transaction_count }
    }

    #[test]
    fn test_top_merchants_sorted_and_truncated() {
        let merchants = vec![count("A", 2), count("B", 9), count("C", 5)];
        let top = top_merchants(&merchants, 2);
        let names: Vec<&str> = top.iter().map(|m| m.merchant_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Cafe"), "Cafe");
        assert_eq!(short_label("WOOLWORTHS METRO SYDNEY"), "WOOLWORTHS ME…");
    }
}
