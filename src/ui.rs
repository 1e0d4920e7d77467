use crate::analysis;
use crate::calendar::{self, CalendarDay, CalendarView};
use crate::keywords;
use crate::models::{Entry, ListFilters, MoodBucket, Notice, TrendPoint};
use crate::session::Session;
use crate::stats::{average_mood, mood_trend};

const CLOUD_LIMIT: usize = 30;
const CLOUD_MIN_SIZE: f64 = 0.8;
const CLOUD_MAX_SIZE: f64 = 2.2;
const PREVIEW_CHARS: usize = 50;

pub struct JournalPage<'a> {
    pub session: &'a Session,
    /// The full personal collection; feeds the cloud, trend and calendar marks.
    pub entries: &'a [Entry],
    /// Entries matching the active search, before any day selection.
    pub matching: &'a [Entry],
    pub filters: &'a ListFilters,
    pub view: CalendarView,
    pub selected: Option<CalendarDay>,
    pub today: CalendarDay,
    pub notice: Option<Notice>,
}

pub struct LibraryPage<'a> {
    pub session: Option<&'a Session>,
    pub entries: &'a [Entry],
    pub saved_only: bool,
    pub notice: Option<Notice>,
}

pub fn render_landing(notice: Option<Notice>) -> String {
    let body = r#"<section class="hero">
      <h2>Explore your subconscious</h2>
      <p class="subtitle">A dream journal with AI analysis and a shared library.</p>
      <div class="actions">
        <a class="button btn-add" href="/register">Get started</a>
        <a class="button btn-sub" href="/library">Browse other dreams</a>
      </div>
    </section>"#;
    layout("Dream Log", None, notice, body)
}

pub fn render_auth(register: bool, notice: Option<Notice>) -> String {
    let (title, action, button, switch) = if register {
        ("Create an account", "/register", "Register", r#"<a href="/login">Already registered? Log in</a>"#)
    } else {
        ("Log in", "/login", "Log in", r#"<a href="/register">No account yet? Register</a>"#)
    };
    let body = format!(
        r#"<section class="card narrow">
      <h2>{title}</h2>
      <form method="post" action="{action}" class="stack">
        <input name="username" placeholder="Username" autocomplete="username" required />
        <input name="password" type="password" placeholder="Password" required />
        <button class="btn-add" type="submit">{button}</button>
      </form>
      <p class="subtitle">{switch}</p>
    </section>"#
    );
    layout(title, None, notice, &body)
}

pub fn render_journal(page: &JournalPage<'_>) -> String {
    let mut body = String::new();
    body.push_str(r#"<div class="columns"><aside class="stack">"#);
    body.push_str(&entry_form());
    body.push_str(&calendar_panel(page));
    body.push_str(&keyword_panel(page.entries));
    body.push_str(&maintenance_panel());
    body.push_str(r#"</aside><main class="stack">"#);
    body.push_str(&trend_panel(&mood_trend(page.entries), page.entries));
    body.push_str(&search_panel(page.filters));

    let visible = match &page.selected {
        Some(day) => calendar::filter_by_day(page.matching, day),
        None => page.matching.to_vec(),
    };
    if let Some(day) = &page.selected {
        let (year, month) = page.view.displayed();
        body.push_str(&format!(
            r#"<p class="subtitle">Showing {} <a href="/journal?cached=1&year={year}&month={month}">show all</a></p>"#,
            day.date_key()
        ));
    }
    if visible.is_empty() {
        body.push_str(r#"<p class="empty">No entries here yet.</p>"#);
    }
    for entry in &visible {
        body.push_str(&personal_card(entry));
    }
    body.push_str("</main></div>");

    layout("Journal", Some(page.session), page.notice, &body)
}

pub fn render_library(page: &LibraryPage<'_>) -> String {
    let mut body = String::from(
        r#"<section class="hero"><h2>Dream library</h2><p class="subtitle">Peek into other dreamers' nights, you are not alone.</p>"#,
    );
    if page.session.is_some() {
        let (all, saved) = if page.saved_only { ("", " active") } else { (" active", "") };
        body.push_str(&format!(
            r#"<div class="tabs"><a class="tab{all}" href="/library">All</a><a class="tab{saved}" href="/library?saved=1">Saved only</a></div>"#
        ));
    }
    body.push_str("</section>");

    if page.entries.is_empty() {
        let message = if page.saved_only {
            "You have not saved any dreams yet."
        } else {
            "The library is empty for now."
        };
        body.push_str(&format!(r#"<p class="empty">{message}</p>"#));
    }

    body.push_str(r#"<div class="grid">"#);
    for entry in page.entries {
        body.push_str(&library_card(entry, page.session.is_some(), page.saved_only));
    }
    body.push_str("</div>");

    layout("Library", page.session, page.notice, &body)
}

fn entry_form() -> String {
    r#"<section class="card">
      <h3>New entry</h3>
      <form method="post" action="/journal/entries" class="stack">
        <textarea name="content" rows="5" placeholder="What did you dream about?" required></textarea>
        <textarea name="reality_context" rows="2" placeholder="Connection to waking life"></textarea>
        <label>Mood <input type="range" name="mood_level" min="1" max="5" value="3" /></label>
        <label><input type="checkbox" name="is_public" /> Share publicly</label>
        <label><input type="checkbox" name="is_anonymous" /> Anonymous</label>
        <button class="btn-add" type="submit">Analyze and save</button>
      </form>
    </section>"#
        .to_string()
}

fn calendar_panel(page: &JournalPage<'_>) -> String {
    let (year, month) = page.view.displayed();
    let (prev_year, prev_month) = calendar::advance(year, month, -1);
    let (next_year, next_month) = calendar::advance(year, month, 1);
    let selection = page
        .selected
        .map(|day| format!("&date={}", day.date_key()))
        .unwrap_or_default();
    let marked = calendar::days_with_entries(page.entries);

    let mut html = String::from(r#"<section class="card"><div class="calendar-head">"#);
    html.push_str(&format!(
        r#"<a href="/journal?cached=1&year={prev_year}&month={prev_month}{selection}">&lsaquo;</a><h3>{}</h3><a href="/journal?cached=1&year={next_year}&month={next_month}{selection}">&rsaquo;</a></div><div class="calendar">"#,
        page.view.title()
    ));
    for label in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
        html.push_str(&format!(r#"<span class="weekday">{label}</span>"#));
    }
    for cell in page.view.cells() {
        let key = cell.date.date_key();
        let mut class = String::from("day");
        if !cell.in_current_month {
            class.push_str(" outside");
        }
        if calendar::is_same_day(&cell.date, &page.today) {
            class.push_str(" today");
        }
        if page.selected.is_some_and(|day| calendar::is_same_day(&cell.date, &day)) {
            class.push_str(" selected");
        }
        if marked.contains(key.as_str()) {
            class.push_str(" marked");
        }
        let picked = page.view.select(&cell);
        html.push_str(&format!(
            r#"<a class="{class}" href="/journal?cached=1&year={year}&month={month}&date={}">{}</a>"#,
            picked.date_key(),
            cell.date.day
        ));
    }
    html.push_str("</div></section>");
    html
}

fn keyword_panel(entries: &[Entry]) -> String {
    let tags = keywords::cloud(entries, CLOUD_LIMIT, CLOUD_MIN_SIZE, CLOUD_MAX_SIZE);
    let mut html = String::from(r#"<section class="card"><h3>Keyword cloud</h3>"#);
    if tags.is_empty() {
        html.push_str(r#"<p class="empty">No keywords yet. Write a few entries to grow your cloud.</p>"#);
    } else {
        html.push_str(r#"<div class="cloud">"#);
        for tag in &tags {
            html.push_str(&format!(
                r#"<span class="tag" style="font-size: {:.2}rem" title="{} entries">#{}</span>"#,
                tag.weight,
                tag.count,
                escape(&tag.value)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</section>");
    html
}

fn maintenance_panel() -> String {
    r#"<section class="card stack">
      <form method="post" action="/journal/demo"><button class="btn-sub" type="submit">Generate demo entries</button></form>
      <form method="post" action="/journal/clear" onsubmit="return confirm('Delete every entry? This cannot be undone.')"><button class="btn-danger" type="submit">Clear all entries</button></form>
    </section>"#
        .to_string()
}

fn search_panel(filters: &ListFilters) -> String {
    let text = filters.search_text.as_deref().map(escape).unwrap_or_default();
    let mut options = String::from(r#"<option value="">Any mood</option>"#);
    for bucket in [MoodBucket::Happy, MoodBucket::Neutral, MoodBucket::Sad] {
        let selected = if filters.mood_bucket == Some(bucket) { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{0}"{selected}>{0}</option>"#,
            bucket.as_str()
        ));
    }
    format!(
        r#"<form class="card search" method="get" action="/journal">
      <input name="q" value="{text}" placeholder="Search entries" />
      <select name="mood">{options}</select>
      <button class="btn-sub" type="submit">Search</button>
    </form>"#
    )
}

fn trend_panel(points: &[TrendPoint], entries: &[Entry]) -> String {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 160.0;
    const PAD: f64 = 16.0;

    let mut html = String::from(r#"<section class="card"><h3>Mood trend</h3>"#);
    if points.is_empty() {
        html.push_str(r#"<p class="empty">No moods recorded yet.</p></section>"#);
        return html;
    }

    let step = if points.len() > 1 {
        (WIDTH - 2.0 * PAD) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mood = f64::from(point.mood_level.clamp(1, 5));
            let x = if points.len() > 1 { PAD + step * index as f64 } else { WIDTH / 2.0 };
            let y = HEIGHT - PAD - (mood - 1.0) / 4.0 * (HEIGHT - 2.0 * PAD);
            (x, y)
        })
        .collect();
    let line = coords
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");

    html.push_str(&format!(
        r#"<svg class="trend" viewBox="0 0 {WIDTH} {HEIGHT}" role="img"><polyline class="chart-line" points="{line}" />"#
    ));
    for ((x, y), point) in coords.iter().zip(points) {
        html.push_str(&format!(
            r#"<circle class="chart-point" cx="{x:.1}" cy="{y:.1}" r="4"><title>{} mood {}</title></circle>"#,
            escape(&point.date),
            point.mood_level
        ));
    }
    html.push_str("</svg>");
    if let Some(average) = average_mood(entries) {
        html.push_str(&format!(r#"<p class="subtitle">Average mood {average:.1}</p>"#));
    }
    html.push_str("</section>");
    html
}

fn personal_card(entry: &Entry) -> String {
    let parsed = analysis::parse(entry.analysis.as_deref());
    let mood_class = if entry.is_positive_mood() { "good" } else { "low" };
    let visibility = match (entry.is_public, entry.is_anonymous) {
        (true, true) => "public, anonymous",
        (true, false) => "public",
        (false, _) => "private",
    };
    let mut html = String::from(r#"<article class="card entry">"#);
    html.push_str(&format!(
        r#"<header><span class="date">{}</span><span class="badge {mood_class}">Mood: {}</span><span class="subtitle">{visibility}</span>
        <form method="post" action="/journal/entries/{}/delete" onsubmit="return confirm('Delete this entry? This cannot be undone.')"><button class="icon" type="submit" title="Delete entry">&times;</button></form></header>"#,
        escape(&entry.date),
        entry.mood_level,
        entry.id
    ));
    html.push_str(&format!("<p>{}</p>", escape(&entry.content)));
    if let Some(reality) = entry.reality_context.as_deref().filter(|r| !r.is_empty()) {
        html.push_str(&format!(r#"<p class="subtitle">Waking life: {}</p>"#, escape(reality)));
    }
    html.push_str(&keyword_chips(&entry.keywords));
    html.push_str(&format!(
        r#"<div class="analysis">{}<p>{}</p></div>"#,
        radar(&parsed.profile),
        escape(&parsed.display_text)
    ));
    html.push_str("</article>");
    html
}

fn library_card(entry: &Entry, can_save: bool, saved_only: bool) -> String {
    let parsed = analysis::parse(entry.analysis.as_deref());
    let author = entry.author.as_deref().unwrap_or("anonymous");
    let mut html = String::from(r#"<article class="card entry">"#);
    html.push_str(&format!(
        r#"<header><span class="author">{}</span><span class="date">{}</span>"#,
        escape(author),
        escape(&entry.date)
    ));
    if can_save {
        let (class, label) = if entry.is_saved {
            ("icon saved", "Remove from saved")
        } else {
            ("icon", "Save")
        };
        let back = if saved_only { "?saved=1" } else { "" };
        html.push_str(&format!(
            r#"<form method="post" action="/library/{}/save{back}"><button class="{class}" type="submit" title="{label}">&hearts;</button></form>"#,
            entry.id
        ));
    }
    html.push_str("</header>");

    if entry.content.chars().count() > PREVIEW_CHARS {
        let preview: String = entry.content.chars().take(PREVIEW_CHARS).collect();
        html.push_str(&format!(
            r#"<details><summary>{}&hellip; <em>read more</em></summary><p>{}</p></details>"#,
            escape(&preview),
            escape(&entry.content)
        ));
    } else {
        html.push_str(&format!("<p>{}</p>", escape(&entry.content)));
    }
    html.push_str(&keyword_chips(&entry.keywords));
    html.push_str(&format!(
        r#"<div class="analysis">{}<p>{}</p></div></article>"#,
        radar(&parsed.profile),
        escape(&parsed.display_text)
    ));
    html
}

fn keyword_chips(keywords: &[String]) -> String {
    let mut html = String::from(r#"<div class="chips">"#);
    for keyword in keywords {
        html.push_str(&format!(r#"<span class="chip">#{}</span>"#, escape(keyword)));
    }
    html.push_str("</div>");
    html
}

/// Five-axis radar polygon for an analysis profile.
fn radar(profile: &[f64; 5]) -> String {
    let outline = radar_points(std::iter::repeat(1.0).take(profile.len()));
    let shape = radar_points(profile.iter().map(|value| value / 100.0));
    format!(
        r#"<svg class="radar" viewBox="0 0 100 100"><polygon class="radar-frame" points="{outline}" /><polygon class="radar-shape" points="{shape}" /></svg>"#
    )
}

fn radar_points(scales: impl Iterator<Item = f64>) -> String {
    const CENTER: f64 = 50.0;
    const RADIUS: f64 = 40.0;

    scales
        .enumerate()
        .map(|(index, scale)| {
            let angle = (-90.0 + 72.0 * index as f64).to_radians();
            let x = CENTER + RADIUS * scale * angle.cos();
            let y = CENTER + RADIUS * scale * angle.sin();
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn layout(title: &str, session: Option<&Session>, notice: Option<Notice>, body: &str) -> String {
    let nav = match session {
        Some(session) => format!(
            r#"<span class="subtitle">Hi, {}</span><a href="/journal">Journal</a><a href="/library">Library</a><form method="post" action="/logout"><button class="tab" type="submit">Log out</button></form>"#,
            escape(&session.username)
        ),
        None => r#"<a href="/library">Library</a><a href="/login">Log in</a>"#.to_string(),
    };
    let notice = notice
        .map(|notice| {
            let class = if notice.is_failure() { "notice error" } else { "notice" };
            format!(
                r#"<div class="{class}" data-notice="{}">{}</div>"#,
                notice.as_str(),
                notice.message()
            )
        })
        .unwrap_or_default();

    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{NAV}}", &nav)
        .replace("{{NOTICE}}", &notice)
        .replace("{{BODY}}", body)
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Dream Log</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #14122b;
      --bg-2: #3b2a63;
      --ink: #ece8f7;
      --muted: #a49fbd;
      --accent: #c45cf2;
      --accent-2: #ec4899;
      --card: rgba(30, 27, 58, 0.9);
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.35);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #1d1838 60%, #110f22 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    a {
      color: var(--accent-2);
    }

    nav {
      max-width: 1100px;
      margin: 0 auto 24px;
      display: flex;
      align-items: center;
      gap: 16px;
      background: var(--card);
      border-radius: 20px;
      padding: 14px 20px;
      box-shadow: var(--shadow);
    }

    nav h1 {
      font-family: "Fraunces", "Georgia", serif;
      margin: 0 auto 0 0;
      font-size: 1.6rem;
    }

    .page {
      max-width: 1100px;
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    .columns {
      display: grid;
      grid-template-columns: minmax(260px, 1fr) 2fr;
      gap: 20px;
    }

    .stack {
      display: grid;
      gap: 14px;
      align-content: start;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
      gap: 18px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(255, 255, 255, 0.06);
      box-shadow: var(--shadow);
    }

    .narrow {
      max-width: 420px;
      margin: 40px auto;
    }

    .hero {
      text-align: center;
    }

    .subtitle,
    .empty {
      color: var(--muted);
    }

    .empty {
      text-align: center;
      padding: 18px 0;
    }

    input,
    textarea,
    select {
      width: 100%;
      background: #110f22;
      color: var(--ink);
      border: 1px solid rgba(255, 255, 255, 0.1);
      border-radius: 12px;
      padding: 10px;
      font: inherit;
    }

    input[type="checkbox"],
    input[type="range"] {
      width: auto;
    }

    button,
    .button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      color: white;
      text-decoration: none;
      display: inline-flex;
      justify-content: center;
    }

    .btn-add {
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
    }

    .btn-sub {
      background: #3b3566;
    }

    .btn-danger {
      background: #7f1d1d;
    }

    .tabs {
      display: inline-flex;
      gap: 6px;
      padding: 6px;
      background: rgba(255, 255, 255, 0.06);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      padding: 6px 14px;
      border-radius: 999px;
      color: var(--muted);
      text-decoration: none;
    }

    .tab.active {
      background: var(--accent-2);
      color: white;
    }

    .notice {
      max-width: 1100px;
      margin: 0 auto 16px;
      padding: 12px 18px;
      border-radius: 14px;
      background: rgba(34, 197, 94, 0.2);
    }

    .notice.error {
      background: rgba(239, 68, 68, 0.25);
    }

    .calendar-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .calendar {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
      text-align: center;
    }

    .weekday {
      color: var(--muted);
      font-size: 0.8rem;
    }

    .day {
      padding: 6px 0;
      border-radius: 8px;
      color: var(--ink);
      text-decoration: none;
    }

    .day.outside {
      color: #5d587a;
    }

    .day.marked {
      box-shadow: inset 0 -3px 0 var(--accent);
    }

    .day.today {
      outline: 1px solid var(--muted);
    }

    .day.selected {
      background: var(--accent);
      color: white;
    }

    .cloud {
      display: flex;
      flex-wrap: wrap;
      gap: 8px 12px;
      align-items: baseline;
    }

    .tag,
    .chip {
      color: var(--accent-2);
    }

    .chips {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      font-size: 0.8rem;
    }

    .entry header {
      display: flex;
      align-items: center;
      gap: 10px;
    }

    .date {
      color: var(--muted);
      font-size: 0.85rem;
      margin-right: auto;
    }

    .badge {
      font-size: 0.8rem;
      padding: 2px 8px;
      border-radius: 6px;
    }

    .badge.good {
      background: rgba(34, 197, 94, 0.25);
    }

    .badge.low {
      background: rgba(239, 68, 68, 0.25);
    }

    .icon {
      background: transparent;
      color: var(--muted);
      padding: 4px 8px;
    }

    .icon.saved {
      color: var(--accent-2);
    }

    .analysis {
      display: flex;
      gap: 12px;
      align-items: center;
      background: rgba(255, 255, 255, 0.04);
      border-left: 4px solid var(--accent);
      border-radius: 10px;
      padding: 10px;
      font-size: 0.9rem;
    }

    .radar {
      width: 90px;
      flex: none;
    }

    .radar-frame {
      fill: none;
      stroke: rgba(255, 255, 255, 0.2);
    }

    .radar-shape {
      fill: rgba(196, 92, 242, 0.4);
      stroke: var(--accent);
    }

    .trend {
      width: 100%;
      height: 180px;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: #1d1838;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .search {
      display: flex;
      gap: 10px;
    }

    @media (max-width: 760px) {
      .columns {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <nav><h1>Dream Log</h1>{{NAV}}</nav>
  {{NOTICE}}
  <div class="page">
    {{BODY}}
  </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, content: &str, keywords: &[&str]) -> Entry {
        Entry {
            id,
            content: content.to_string(),
            mood_level: 2,
            date: "2024-02-10".to_string(),
            analysis: Some("Calm waters||RADAR:10,20,30,40,50".to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            is_public: true,
            is_anonymous: false,
            author: Some("mira".to_string()),
            is_saved: true,
            reality_context: None,
        }
    }

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            username: "mira".to_string(),
        }
    }

    #[test]
    fn radar_starts_at_top_axis() {
        assert!(radar_points([1.0, 0.0].into_iter()).starts_with("50.0,10.0 50.0,50.0"));
        assert_eq!(radar_points(std::iter::empty()), "");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn journal_shows_no_data_cloud_for_empty_collection() {
        let session = session();
        let filters = ListFilters::default();
        let html = render_journal(&JournalPage {
            session: &session,
            entries: &[],
            matching: &[],
            filters: &filters,
            view: CalendarView::new(2024, 1),
            selected: None,
            today: CalendarDay { year: 2024, month: 1, day: 10 },
            notice: None,
        });
        assert!(html.contains("No keywords yet"));
        assert!(html.contains("February 2024"));
        assert!(html.contains("No moods recorded yet"));
    }

    #[test]
    fn journal_filters_to_selected_day() {
        let session = session();
        let filters = ListFilters::default();
        let mut other = entry(2, "tuesday dream", &[]);
        other.date = "2024-02-11".to_string();
        let entries = vec![entry(1, "<script>sea</script>", &["sea", "sea"]), other];
        let html = render_journal(&JournalPage {
            session: &session,
            entries: &entries,
            matching: &entries,
            filters: &filters,
            view: CalendarView::new(2024, 1),
            selected: Some(CalendarDay { year: 2024, month: 1, day: 10 }),
            today: CalendarDay { year: 2024, month: 1, day: 10 },
            notice: Some(Notice::Saved),
        });
        assert!(html.contains("&lt;script&gt;sea&lt;/script&gt;"));
        assert!(!html.contains("tuesday dream"));
        assert!(html.contains("Calm waters"));
        assert!(html.contains(r#"data-notice="saved""#));
        assert!(html.contains("#sea"));
        assert!(html.contains("day marked"));
    }

    #[test]
    fn search_narrows_list_but_not_cloud() {
        let session = session();
        let filters = ListFilters {
            search_text: Some("maze".to_string()),
            mood_bucket: None,
        };
        let mut maze = entry(2, "maze of stairs", &["maze"]);
        maze.date = "2024-02-12".to_string();
        let entries = vec![entry(1, "open sea", &["sea"]), maze.clone()];
        let matching = vec![maze];
        let html = render_journal(&JournalPage {
            session: &session,
            entries: &entries,
            matching: &matching,
            filters: &filters,
            view: CalendarView::new(2024, 1),
            selected: None,
            today: CalendarDay { year: 2024, month: 1, day: 1 },
            notice: None,
        });
        assert!(html.contains("maze of stairs"));
        assert!(!html.contains("open sea"));
        assert!(html.contains("#sea"));
        assert!(html.contains("#maze"));
        assert_eq!(html.matches("day marked").count(), 2);
        assert!(html.contains(r#"value="maze""#));
    }

    #[test]
    fn library_truncates_long_content_and_marks_saved() {
        let session = session();
        let long = "a".repeat(80);
        let entries = vec![entry(7, &long, &[])];
        let html = render_library(&LibraryPage {
            session: Some(&session),
            entries: &entries,
            saved_only: false,
            notice: None,
        });
        assert!(html.contains("<details>"));
        assert!(html.contains("icon saved"));
        assert!(html.contains("/library/7/save"));
    }

    #[test]
    fn library_empty_states_differ() {
        let session = session();
        let saved = render_library(&LibraryPage {
            session: Some(&session),
            entries: &[],
            saved_only: true,
            notice: None,
        });
        assert!(saved.contains("not saved any dreams"));

        let anonymous = render_library(&LibraryPage {
            session: None,
            entries: &[],
            saved_only: false,
            notice: None,
        });
        assert!(anonymous.contains("library is empty"));
        assert!(!anonymous.contains("Saved only"));
    }
}
