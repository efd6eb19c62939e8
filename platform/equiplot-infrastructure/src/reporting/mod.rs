use equiplot_domain::repositories::exports::AnalysisPage;
use equiplot_domain::services::chart::{LinePoint, MarkerKind, TradeMarker};
use equiplot_domain::services::summary::PerformanceSummary;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_equity_csv(path: &Path, line: &[LinePoint], time_format: &str) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create equity csv {}: {}", path.display(), err))?;
    wtr.write_record(["timestamp_ms", "time", "equity"])
        .map_err(|err| format!("failed to write equity csv header: {}", err))?;

    for point in line {
        wtr.write_record([
            point.timestamp_ms.to_string(),
            point.time.format(time_format).to_string(),
            point.equity.to_string(),
        ])
        .map_err(|err| format!("failed to write equity row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush equity csv: {}", err))
}

pub fn write_markers_csv(
    path: &Path,
    markers: &[TradeMarker],
    time_format: &str,
) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create markers csv {}: {}", path.display(), err))?;
    wtr.write_record(["timestamp_ms", "time", "price", "direction"])
        .map_err(|err| format!("failed to write markers csv header: {}", err))?;

    for marker in markers {
        wtr.write_record([
            marker.timestamp_ms.to_string(),
            marker.time.format(time_format).to_string(),
            marker.price.to_string(),
            marker.kind.label().to_string(),
        ])
        .map_err(|err| format!("failed to write marker row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush markers csv: {}", err))
}

pub fn write_summary_json(
    path: &Path,
    summary: &PerformanceSummary,
    meta: &serde_json::Value,
) -> Result<(), String> {
    let json = serde_json::json!({
        "meta": meta,
        "summary": summary,
    });
    let json = serde_json::to_string_pretty(&json)
        .map_err(|err| format!("failed to serialize summary: {}", err))?;
    let mut file =
        fs::File::create(path).map_err(|err| format!("failed to create summary: {}", err))?;
    file.write_all(json.as_bytes())
        .map_err(|err| format!("failed to write summary: {}", err))
}

pub fn write_analysis_html(path: &Path, page: &AnalysisPage<'_>) -> Result<(), String> {
    let html = render_analysis_html(page)?;
    let mut file =
        fs::File::create(path).map_err(|err| format!("failed to create html: {}", err))?;
    file.write_all(html.as_bytes())
        .map_err(|err| format!("failed to write html: {}", err))
}

pub fn render_analysis_html(page: &AnalysisPage<'_>) -> Result<String, String> {
    let model = page.model;
    let summary = page.summary;

    let equity: Vec<(i64, f64)> = model
        .line
        .iter()
        .map(|p| (p.timestamp_ms, p.equity))
        .collect();
    let markers: Vec<serde_json::Value> = model
        .markers
        .iter()
        .map(|m| {
            serde_json::json!({
                "t": m.timestamp_ms,
                "p": m.price,
                "up": m.kind == MarkerKind::Entry,
            })
        })
        .collect();

    let equity_json = script_json(&equity, "equity")?;
    let markers_json = script_json(&markers, "markers")?;
    let returns_json = script_json(&page.returns, "returns")?;

    let (start, end) = match model.time_bounds() {
        Some((lo, hi)) => (
            model.zone.format(lo, page.time_format),
            model.zone.format(hi, page.time_format),
        ),
        None => ("n/a".to_string(), "n/a".to_string()),
    };

    let title = escape_html(page.title);
    let initial = money(summary.initial_equity);
    let final_equity = money(summary.final_equity);
    let total_return = money(summary.total_return);
    let total_return_pct = summary
        .total_return_pct
        .map(|v| format!("{v:.4}%"))
        .unwrap_or_else(|| "n/a".to_string());
    let skipped = model.skipped.len();

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  <style>
    body {{ font-family: ui-sans-serif, system-ui; padding: 24px; }}
    .stats {{ background: #f5f5f5; padding: 15px; border-radius: 6px; margin-bottom: 20px; }}
    .stats div {{ margin: 4px 0; }}
    .card {{ border: 1px solid #ddd; border-radius: 10px; padding: 16px; margin-bottom: 24px; }}
    canvas {{ width: 100%; height: 360px; border: 1px solid #eee; border-radius: 8px; }}
    .muted {{ color: #666; }}
    .legend span {{ margin-right: 16px; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p class="muted">from <code>{start}</code> to <code>{end}</code> ({zone})</p>

  <div class="stats">
    <div><strong>Initial Equity:</strong> {initial}</div>
    <div><strong>Final Equity:</strong> {final_equity}</div>
    <div><strong>Total Return:</strong> {total_return} ({total_return_pct})</div>
    <div><strong>Total Trades:</strong> {total_trades}</div>
    <div><strong>LONG entries:</strong> {long_entries}</div>
    <div><strong>CLOSE exits:</strong> {closes}</div>
    <div><strong>Not charted:</strong> {skipped}</div>
  </div>

  <div class="card">
    <h2>Equity Curve &amp; Trades</h2>
    <p class="legend">
      <span style="color:#1f4fd1">&#9472; Equity Curve</span>
      <span style="color:#1a9a32">&#9650; LONG</span>
      <span style="color:#d12a1f">&#9660; CLOSE</span>
    </p>
    <canvas id="equity"></canvas>
  </div>

  <div class="card">
    <h2>Percentage Returns</h2>
    <canvas id="returns"></canvas>
  </div>

  <script>
    const equity = {equity_json};
    const markers = {markers_json};
    const returns = {returns_json};

    function setup(canvas) {{
      const ratio = window.devicePixelRatio || 1;
      const ctx = canvas.getContext('2d');
      const w = canvas.width = canvas.clientWidth * ratio;
      const h = canvas.height = canvas.clientHeight * ratio;
      ctx.clearRect(0, 0, w, h);
      return {{ ctx, w, h, pad: 24 * ratio, ratio }};
    }}

    function scale(values, lo, hi) {{
      let min = Infinity;
      let max = -Infinity;
      for (const v of values) {{
        if (v < min) min = v;
        if (v > max) max = v;
      }}
      if (!isFinite(min) || !isFinite(max)) {{ min = 0; max = 1; }}
      if (max === min) {{ min -= 1; max += 1; }}
      return (v) => hi - ((v - min) / (max - min)) * (hi - lo);
    }}

    function grid(s) {{
      s.ctx.strokeStyle = '#eee';
      s.ctx.lineWidth = 1;
      for (let i = 0; i <= 4; i++) {{
        const y = s.pad + (i / 4) * (s.h - 2 * s.pad);
        const x = s.pad + (i / 4) * (s.w - 2 * s.pad);
        s.ctx.beginPath(); s.ctx.moveTo(s.pad, y); s.ctx.lineTo(s.w - s.pad, y); s.ctx.stroke();
        s.ctx.beginPath(); s.ctx.moveTo(x, s.pad); s.ctx.lineTo(x, s.h - s.pad); s.ctx.stroke();
      }}
    }}

    function polyline(s, points, x, y, color) {{
      if (points.length === 0) return;
      s.ctx.strokeStyle = color;
      s.ctx.lineWidth = 2 * s.ratio;
      s.ctx.beginPath();
      s.ctx.moveTo(x(points[0][0]), y(points[0][1]));
      for (let i = 1; i < points.length; i++) s.ctx.lineTo(x(points[i][0]), y(points[i][1]));
      s.ctx.stroke();
    }}

    function triangle(s, cx, cy, up, color) {{
      const r = 6 * s.ratio;
      s.ctx.fillStyle = color;
      s.ctx.beginPath();
      if (up) {{
        s.ctx.moveTo(cx, cy - r); s.ctx.lineTo(cx - r, cy + r); s.ctx.lineTo(cx + r, cy + r);
      }} else {{
        s.ctx.moveTo(cx, cy + r); s.ctx.lineTo(cx - r, cy - r); s.ctx.lineTo(cx + r, cy - r);
      }}
      s.ctx.closePath();
      s.ctx.fill();
    }}

    function drawEquity() {{
      const s = setup(document.getElementById('equity'));
      const times = equity.map(p => p[0]).concat(markers.map(m => m.t));
      const values = equity.map(p => p[1]).concat(markers.map(m => m.p));
      if (times.length === 0) {{ s.ctx.fillText('no data', 10, 20); return; }}
      const x = scale(times, s.w - s.pad, s.pad);
      const y = scale(values, s.pad, s.h - s.pad);
      grid(s);
      polyline(s, equity, x, y, '#1f4fd1');
      for (const m of markers) triangle(s, x(m.t), y(m.p), m.up, m.up ? '#1a9a32' : '#d12a1f');
    }}

    function drawReturns() {{
      const s = setup(document.getElementById('returns'));
      if (returns.length === 0) {{ s.ctx.fillText('no data', 10, 20); return; }}
      const x = scale(returns.map(p => p[0]), s.w - s.pad, s.pad);
      const y = scale(returns.map(p => p[1]).concat([0]), s.pad, s.h - s.pad);
      grid(s);
      s.ctx.setLineDash([6 * s.ratio, 4 * s.ratio]);
      s.ctx.strokeStyle = '#d12a1f';
      s.ctx.beginPath(); s.ctx.moveTo(s.pad, y(0)); s.ctx.lineTo(s.w - s.pad, y(0)); s.ctx.stroke();
      s.ctx.setLineDash([]);
      polyline(s, returns, x, y, '#a23b72');
    }}

    function drawAll() {{ drawEquity(); drawReturns(); }}
    drawAll();
    window.addEventListener('resize', drawAll);
  </script>
</body>
</html>"#,
        zone = model.zone.label(),
        total_trades = summary.total_trades,
        long_entries = summary.long_entries,
        closes = summary.closes,
    ))
}

fn money(value: Option<f64>) -> String {
    value
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn script_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<String, String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|err| format!("failed to serialize {what}: {err}"))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
