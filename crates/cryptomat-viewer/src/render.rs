//! HTML rendering of the coin board

use crate::board::BoardView;

pub const PAGE_TITLE: &str = "Welcome to cryptomat's viewer!";

/// Round to 2 decimal places; values that round to zero come back as `+0.0`
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page for `view`
pub fn render_page(view: &BoardView, source: &str) -> String {
    let mut rows = String::new();
    for (name, coin) in &view.coins {
        let change_24 = round2(coin.change_24);
        let change_class = if change_24 < 0.0 { "down" } else { "up" };
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td class=\"{}\">{:+.2}%</td></tr>\n",
            escape(name),
            round2(coin.current_price),
            round2(coin.ath),
            change_class,
            change_24,
        ));
    }

    let mut unavailable = String::new();
    if !view.unavailable.is_empty() {
        unavailable.push_str("  <h2>Unavailable</h2>\n  <ul>\n");
        for item in &view.unavailable {
            unavailable.push_str(&format!("    <li>{}: {}</li>\n", escape(&item.name), escape(&item.reason)));
        }
        unavailable.push_str("  </ul>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>cryptomat</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    table {{ border-collapse: collapse; }}
    th, td {{ padding: 0.3rem 1rem; text-align: right; border-bottom: 1px solid #ddd; }}
    td:first-child, th:first-child {{ text-align: left; }}
    .up {{ color: #0a7d28; }}
    .down {{ color: #b3261e; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>Source: {source}</p>
  <table>
    <thead>
      <tr><th>Coin</th><th>Current price</th><th>ATH</th><th>24h change</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
{unavailable}</body>
</html>
"#,
        title = PAGE_TITLE,
        source = escape(source),
    )
}
