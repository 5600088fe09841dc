use crate::models::{CatalogKind, ChartsResponse, IndexQuery, MoodCategory, MoodEntry, Rating};
use crate::state::Session;
use crate::stats::build_charts_at;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub fn render_index(session: &Session, query: &IndexQuery, now: DateTime<Local>) -> String {
    let analysis = query.tab.as_deref() == Some("analysis");
    let content = if analysis {
        let period = query.period.unwrap_or_default();
        render_analysis(&build_charts_at(now, &session.entries, period))
    } else {
        render_register(session)
    };
    let dialog = if query.saved.is_some() {
        SAVED_DIALOG
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{REGISTER_ACTIVE}}", if analysis { "" } else { "active" })
        .replace("{{ANALYSIS_ACTIVE}}", if analysis { "active" } else { "" })
        .replace("{{CONTENT}}", &content)
        .replace("{{DIALOG}}", dialog)
}

fn render_register(session: &Session) -> String {
    let draft = &session.form.draft;
    let mut html = String::new();

    let day = draft.date.with_timezone(&Local).format("%Y-%m-%d");
    let _ = write!(
        html,
        r#"<h2>Date</h2>
<form method="post" action="/draft/date" class="row">
  <input type="date" name="date" value="{day}" onchange="this.form.submit()" />
  <button type="submit" class="ghost">Set</button>
</form>
<h2>How do you feel? (1-5)</h2>
<form method="post" action="/draft/rating" class="ratings">"#
    );
    for rating in Rating::all() {
        let class = if rating == draft.rating { "rating active" } else { "rating" };
        let value = rating.value();
        let _ = write!(
            html,
            r#"<button type="submit" name="rating" value="{value}" class="{class}">{value}</button>"#
        );
    }
    let _ = write!(
        html,
        r#"</form><p class="mood-label">Mood: {}</p>"#,
        MoodCategory::from_rating(draft.rating).label()
    );

    for kind in CatalogKind::ALL {
        let slug = kind.slug();
        let _ = write!(
            html,
            r#"<h2>{title}</h2>
<form method="post" action="/draft/toggle" class="chips">
  <input type="hidden" name="kind" value="{slug}" />"#,
            title = kind.title()
        );
        for label in session.catalogs.get(kind) {
            let class = if draft.is_selected(kind, label) { "chip selected" } else { "chip" };
            let label = escape_html(label);
            let _ = write!(
                html,
                r#"<button type="submit" name="label" value="{label}" class="{class}">{label}</button>"#
            );
        }
        let _ = write!(
            html,
            r#"</form>
<form method="post" action="/catalog/add" class="row">
  <input type="hidden" name="kind" value="{slug}" />
  <input type="text" name="label" placeholder="Add to {lower}..." />
  <button type="submit" class="ghost">+ Add</button>
</form>"#,
            lower = kind.title().to_lowercase()
        );
    }

    let _ = write!(
        html,
        r#"<h2>Notes</h2>
<form method="post" action="/draft/notes">
  <textarea name="notes" rows="4" placeholder="Write your notes here..." onchange="this.form.submit()">{notes}</textarea>
</form>
<form method="post" action="/draft/submit">
  <button type="submit" class="primary">Save entry</button>
</form>"#,
        notes = escape_html(&draft.notes)
    );
    html
}

fn render_analysis(charts: &ChartsResponse) -> String {
    let mut html = String::from("<h2>Mood analysis</h2><div class=\"periods\">");
    for (period, title) in [("week", "Week"), ("month", "Month")] {
        let class = if charts.period.as_str() == period { "period active" } else { "period" };
        let _ = write!(
            html,
            r#"<a class="{class}" href="/?tab=analysis&period={period}">{title}</a>"#
        );
    }
    html.push_str("</div>");

    if charts.has_bar_data {
        html.push_str("<h3>Average mood</h3><div class=\"bars\">");
        for (label, value) in charts.bar.labels.iter().zip(&charts.bar.values) {
            let height = value / f64::from(Rating::MAX) * 100.0;
            let _ = write!(
                html,
                r#"<div class="bar"><span class="value">{value:.1}</span><div class="fill" style="height:{height:.0}%"></div><span class="label">{label}</span></div>"#
            );
        }
        html.push_str("</div>");
    } else {
        html.push_str("<p class=\"empty\">Not enough data to show the bar chart</p>");
    }

    if charts.has_category_data {
        let total: usize = charts.categories.iter().map(|item| item.count).sum();
        let mut stops = Vec::new();
        let mut start = 0.0;
        for item in &charts.categories {
            let end = start + item.count as f64 / total as f64 * 100.0;
            stops.push(format!("{} {start:.2}% {end:.2}%", item.color));
            start = end;
        }
        let _ = write!(
            html,
            r#"<h3>Mood distribution</h3><div class="pie-row"><div class="pie" style="background:conic-gradient({})"></div><ul class="legend">"#,
            stops.join(", ")
        );
        for item in &charts.categories {
            let _ = write!(
                html,
                r#"<li><span class="swatch" style="background:{}"></span>{} {}</li>"#,
                item.color, item.count, item.label
            );
        }
        html.push_str("</ul></div>");
    } else {
        html.push_str("<p class=\"empty\">Not enough data to show the distribution</p>");
    }

    html.push_str("<h2>Recent entries</h2>");
    for entry in &charts.recent {
        html.push_str(&render_entry_card(entry));
    }
    html
}

fn render_entry_card(entry: &MoodEntry) -> String {
    let notes = if entry.notes.is_empty() {
        String::new()
    } else {
        format!("<p class=\"notes\">{}</p>", escape_html(&entry.notes))
    };
    format!(
        r#"<div class="entry"><p class="entry-date">{date}</p><p>Mood: {label} ({rating}/5)</p>{notes}</div>"#,
        date = entry.date.with_timezone(&Local).format("%Y-%m-%d"),
        label = MoodCategory::from_rating(entry.rating).label(),
        rating = entry.rating.value(),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const SAVED_DIALOG: &str = r#"<dialog open class="saved">
  <p><strong>Saved!</strong> Your entry has been stored.</p>
  <a href="/" class="primary">OK</a>
</dialog>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mood Tracker</title>
  <style>
    :root {
      --bg: #f5f5f5;
      --ink: #2b2a28;
      --accent: #3b82f6;
      --muted: #8b857d;
      --card: #ffffff;
      --shadow: 0 12px 30px rgba(47, 72, 88, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    header {
      background: var(--accent);
      color: white;
      padding: 20px;
      text-align: center;
    }

    header h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    nav {
      display: grid;
      grid-template-columns: 1fr 1fr;
      background: white;
      box-shadow: var(--shadow);
    }

    nav a {
      padding: 14px;
      text-align: center;
      color: var(--muted);
      text-decoration: none;
      border-bottom: 3px solid transparent;
    }

    nav a.active {
      color: var(--accent);
      border-bottom-color: var(--accent);
      font-weight: 600;
    }

    main {
      width: min(720px, 100%);
      margin: 0 auto;
      padding: 20px;
    }

    h2 {
      font-size: 1.1rem;
      margin: 24px 0 10px;
    }

    .row {
      display: flex;
      gap: 8px;
      margin-top: 8px;
    }

    input[type="text"], input[type="date"], textarea {
      flex: 1;
      width: 100%;
      padding: 10px;
      border-radius: 10px;
      border: 1px solid #ddd;
      font: inherit;
    }

    button, .primary, .period {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font: inherit;
      cursor: pointer;
      text-decoration: none;
    }

    .ghost {
      background: transparent;
      color: var(--accent);
    }

    .primary {
      display: block;
      width: 100%;
      margin-top: 24px;
      background: var(--accent);
      color: white;
      font-weight: 600;
      text-align: center;
    }

    .ratings {
      display: flex;
      justify-content: space-between;
    }

    .rating {
      width: 52px;
      height: 52px;
      background: white;
      border: 2px solid #ddd;
      font-size: 1.2rem;
    }

    .rating.active {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    .mood-label {
      text-align: center;
      color: var(--muted);
    }

    .chips {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .chip {
      background: white;
      border: 1px solid #ddd;
    }

    .chip.selected {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    .periods {
      display: flex;
      gap: 8px;
    }

    .period {
      flex: 1;
      text-align: center;
      background: white;
      color: var(--ink);
    }

    .period.active {
      background: var(--accent);
      color: white;
    }

    .bars {
      display: flex;
      align-items: flex-end;
      gap: 10px;
      height: 220px;
      background: white;
      border-radius: 16px;
      padding: 16px;
    }

    .bar {
      flex: 1;
      height: 100%;
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
      gap: 4px;
    }

    .bar .fill {
      width: 100%;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
    }

    .bar .label, .bar .value {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .pie-row {
      display: flex;
      align-items: center;
      gap: 24px;
      background: white;
      border-radius: 16px;
      padding: 16px;
    }

    .pie {
      width: 160px;
      height: 160px;
      border-radius: 50%;
    }

    .legend {
      list-style: none;
      padding: 0;
    }

    .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 3px;
      margin-right: 8px;
    }

    .entry {
      background: var(--card);
      border-radius: 12px;
      padding: 12px 16px;
      margin-bottom: 10px;
      box-shadow: var(--shadow);
    }

    .entry p {
      margin: 4px 0;
    }

    .entry-date, .notes {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .empty {
      text-align: center;
      color: var(--muted);
      padding: 24px 0;
    }

    dialog.saved {
      border: none;
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 24px;
    }
  </style>
</head>
<body>
  <header><h1>Mood Tracker</h1></header>
  <nav>
    <a href="/" class="{{REGISTER_ACTIVE}}">Log</a>
    <a href="/?tab=analysis" class="{{ANALYSIS_ACTIVE}}">Analysis</a>
  </nav>
  <main>
{{CONTENT}}
  </main>
{{DIALOG}}
</body>
</html>
"#;
