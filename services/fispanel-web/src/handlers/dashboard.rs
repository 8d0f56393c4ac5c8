//! Dashboard: stat cards and the last seven days

use axum::response::Html;
use fispanel_core::dashboard::{ChartPoint, StatCard};
use fispanel_core::{DashboardView, Page};
use serde_json::json;

use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, escape};

pub async fn show(console: Console) -> WebResult<Html<String>> {
    console.enter(Page::Dashboard);

    let body = match console.api.dashboard().await {
        Ok(snapshot) => {
            if snapshot.today.is_none() {
                tracing::debug!("today summary unavailable, using daily stats");
            }
            dashboard_body(&DashboardView::build(&snapshot))
        }
        Err(e) => {
            console.fail(e, "Could not load the dashboard")?;
            String::new()
        }
    };

    Ok(console.page(Page::Dashboard, body))
}

fn card(stat: &StatCard) -> String {
    let style = if stat.scale > 1.0 {
        format!(r#" style="transform: scaleX({}); z-index: 10""#, stat.scale)
    } else {
        String::new()
    };
    format!(
        r#"<div class="card" id="{id}"{style}><div class="title">{title}</div><div class="value">{value}</div></div>"#,
        id = stat.id,
        title = escape(stat.title),
        value = escape(&stat.value),
    )
}

/// Chart.js data for the two charts, safe to inline in a script element
fn chart_data(points: &[ChartPoint]) -> String {
    json!({
        "labels": points.iter().map(|p| p.label.as_str()).collect::<Vec<_>>(),
        "receipts": points.iter().map(|p| p.receipts).collect::<Vec<_>>(),
        "amounts": points.iter().map(|p| p.amount).collect::<Vec<_>>(),
    })
    .to_string()
    .replace("</", "<\\/")
}

fn dashboard_body(view: &DashboardView) -> String {
    let cards: String = view.cards.iter().map(card).collect();
    let charts = if view.chart.is_empty() {
        render::empty("No statistics yet")
    } else {
        format!(
            r##"<div class="cards">
    <div class="panel"><h2>Receipts</h2><canvas id="chart-receipts"></canvas></div>
    <div class="panel"><h2>Amount (TL)</h2><canvas id="chart-amount"></canvas></div>
</div>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<script>
    const stats = {data};
    const options = {{ responsive: true, plugins: {{ legend: {{ display: false }} }}, scales: {{ y: {{ beginAtZero: true }} }} }};
    new Chart(document.getElementById('chart-receipts'), {{
        type: 'line',
        data: {{ labels: stats.labels, datasets: [{{ data: stats.receipts, borderColor: '#6366f1', backgroundColor: 'rgba(99, 102, 241, 0.1)', tension: 0.4, fill: true }}] }},
        options
    }});
    new Chart(document.getElementById('chart-amount'), {{
        type: 'bar',
        data: {{ labels: stats.labels, datasets: [{{ data: stats.amounts, backgroundColor: 'rgba(139, 92, 246, 0.8)', borderRadius: 8 }}] }},
        options
    }});
</script>"##,
            data = chart_data(&view.chart),
        )
    };

    format!(
        r##"<div class="cards">{cards}</div>
<h2>Last 7 days</h2>
{charts}"##
    )
}
