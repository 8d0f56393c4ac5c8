//! HTML rendering
//!
//! Pages are assembled from view models with `format!` templates. Every
//! value coming from the API passes through [`escape`] before it lands in
//! markup.

use fispanel_core::dashboard::ChartPoint;
use fispanel_core::format::{format_currency, Tone};
use fispanel_core::views::Field;
use fispanel_core::{Notice, NoticeLevel, Page};

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
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

const STYLE: &str = r##"
        :root {
            --bg-primary: #0a0a0f;
            --bg-secondary: #12121a;
            --bg-card: rgba(26, 26, 36, 0.6);
            --border-primary: rgba(255, 255, 255, 0.06);
            --text-primary: #ffffff;
            --text-secondary: rgba(255, 255, 255, 0.7);
            --text-tertiary: rgba(255, 255, 255, 0.5);
            --accent-primary: #6366f1;
            --success: #10b981;
            --warning: #f59e0b;
            --error: #ef4444;
            --info: #0ea5e9;
        }
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            min-height: 100vh;
            line-height: 1.6;
        }
        a { color: var(--accent-primary); text-decoration: none; }
        .header {
            position: sticky; top: 0; z-index: 100;
            display: flex; align-items: center; gap: 2rem;
            background: rgba(10, 10, 15, 0.8);
            backdrop-filter: blur(20px);
            border-bottom: 1px solid var(--border-primary);
            padding: 1rem 2rem;
        }
        .logo { font-weight: 800; font-size: 1.25rem; }
        .nav { display: flex; gap: 0.25rem; flex: 1; }
        .nav a { color: var(--text-secondary); padding: 0.4rem 0.8rem; border-radius: 8px; }
        .nav a.active { background: var(--bg-card); color: var(--text-primary); }
        .operator { color: var(--text-tertiary); display: flex; gap: 1rem; align-items: center; }
        main { max-width: 1280px; margin: 0 auto; padding: 2rem; }
        h1 { font-size: 1.75rem; margin-bottom: 1.5rem; }
        h2 { font-size: 1.1rem; margin: 1.5rem 0 0.75rem; color: var(--text-secondary); }
        .panel {
            background: var(--bg-card);
            border: 1px solid var(--border-primary);
            border-radius: 16px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }
        .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
        .card { background: var(--bg-card); border: 1px solid var(--border-primary); border-radius: 16px; padding: 1.25rem; }
        .card .title { color: var(--text-tertiary); font-size: 0.85rem; }
        .card .value { font-size: 1.6rem; font-weight: 700; display: inline-block; transform-origin: left; }
        table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
        th { text-align: left; color: var(--text-tertiary); font-weight: 500; padding: 0.5rem; border-bottom: 1px solid var(--border-primary); }
        td { padding: 0.5rem; border-bottom: 1px solid var(--border-primary); }
        tr.selected td { background: rgba(99, 102, 241, 0.12); }
        .empty { color: var(--text-tertiary); padding: 1rem 0; }
        .badge { padding: 0.15rem 0.6rem; border-radius: 999px; font-size: 0.8rem; font-weight: 600; }
        .badge.success { background: rgba(16, 185, 129, 0.15); color: var(--success); }
        .badge.danger { background: rgba(239, 68, 68, 0.15); color: var(--error); }
        .badge.warning { background: rgba(245, 158, 11, 0.15); color: var(--warning); }
        .badge.info { background: rgba(14, 165, 233, 0.15); color: var(--info); }
        .badge.primary { background: rgba(99, 102, 241, 0.15); color: var(--accent-primary); }
        .badge.secondary { background: rgba(255, 255, 255, 0.08); color: var(--text-secondary); }
        .notice { padding: 0.75rem 1rem; border-radius: 10px; margin-bottom: 1.5rem; }
        .notice.success { background: rgba(16, 185, 129, 0.15); color: var(--success); }
        .notice.info { background: rgba(14, 165, 233, 0.15); color: var(--info); }
        .notice.error { background: rgba(239, 68, 68, 0.15); color: var(--error); }
        .fields { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 0.75rem 1.5rem; }
        .fields .label { color: var(--text-tertiary); font-size: 0.8rem; }
        form.inline { display: inline-flex; gap: 0.5rem; align-items: center; }
        .form-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; align-items: end; }
        label { display: flex; flex-direction: column; gap: 0.25rem; color: var(--text-tertiary); font-size: 0.85rem; }
        input, select, textarea {
            background: var(--bg-secondary); color: var(--text-primary);
            border: 1px solid var(--border-primary); border-radius: 8px; padding: 0.45rem 0.6rem;
        }
        .btn { border: 0; border-radius: 8px; padding: 0.45rem 1rem; font-weight: 600; cursor: pointer; color: #fff; background: var(--accent-primary); }
        .btn.danger { background: var(--error); }
        .btn.warning { background: var(--warning); }
        .btn.success { background: var(--success); }
        .btn.ghost { background: transparent; color: var(--text-secondary); border: 1px solid var(--border-primary); }
        .bar-row { display: grid; grid-template-columns: 110px 1fr 150px; gap: 0.75rem; align-items: center; font-size: 0.85rem; }
        .bar { height: 10px; border-radius: 5px; background: var(--accent-primary); }
        .split { display: grid; grid-template-columns: 380px 1fr; gap: 1.5rem; }
        .login { max-width: 380px; margin: 12vh auto; }
        .login form { display: flex; flex-direction: column; gap: 1rem; }
"##;

fn document(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Fispanel</title>
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800&display=swap" rel="stylesheet">
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>"##,
        title = escape(title),
        style = STYLE,
        body = body,
    )
}

fn nav(current: Page) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            format!(
                r#"<a href="{path}"{class}>{title}</a>"#,
                path = page.path(),
                class = if *page == current { r#" class="active""# } else { "" },
                title = page.title(),
            )
        })
        .collect()
}

pub fn notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!(
        r#"<div class="notice {class}" role="status">{}</div>"#,
        escape(&notice.message)
    )
}

/// A console page: header, navigation, flash notice and `body`
pub fn layout(page: Page, username: Option<&str>, flash: Option<&Notice>, body: &str) -> String {
    let content = format!(
        r##"<header class="header">
    <div class="logo">Fispanel</div>
    <nav class="nav">{nav}</nav>
    <div class="operator">
        <span>{username}</span>
        <form method="post" action="/logout"><button class="btn ghost" type="submit">Log out</button></form>
    </div>
</header>
<main>
    <h1>{title}</h1>
    {notice}
    {body}
</main>"##,
        nav = nav(page),
        username = escape(username.unwrap_or("")),
        title = page.title(),
        notice = flash.map(notice).unwrap_or_default(),
        body = body,
    );
    document(page.title(), &content)
}

pub fn login_page(error: Option<&str>, username: &str) -> String {
    let error = error
        .map(|message| notice(&Notice::error(message)))
        .unwrap_or_default();
    let content = format!(
        r##"<main class="login">
    <div class="panel">
        <h1>Fispanel</h1>
        {error}
        <form method="post" action="/login">
            <label>Username<input name="username" value="{username}" autocomplete="username" required autofocus></label>
            <label>Password<input name="password" type="password" autocomplete="current-password" required></label>
            <button class="btn" type="submit">Log in</button>
        </form>
    </div>
</main>"##,
        username = escape(username),
    );
    document("Log in", &content)
}

pub fn error_page(message: &str) -> String {
    let content = format!(
        r##"<main class="login">
    <div class="panel">
        <h1>Something went wrong</h1>
        {notice}
        <a class="btn" href="/">Back to the dashboard</a>
    </div>
</main>"##,
        notice = notice(&Notice::error(message)),
    );
    document("Error", &content)
}

/// Ask before a destructive action; the form re-posts with `confirm=yes`
pub fn confirm(question: &str, action: &str, button: &str, cancel: &str) -> String {
    format!(
        r##"<div class="panel">
    <p>{question}</p>
    <br>
    <form class="inline" method="post" action="{action}">
        <input type="hidden" name="confirm" value="yes">
        <button class="btn danger" type="submit">{button}</button>
        <a class="btn ghost" href="{cancel}">Cancel</a>
    </form>
</div>"##,
        question = escape(question),
        action = escape(action),
        button = escape(button),
        cancel = escape(cancel),
    )
}

pub fn badge(text: &str, tone: Tone) -> String {
    format!(r#"<span class="badge {}">{}</span>"#, tone.as_str(), escape(text))
}

pub fn link(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(href), escape(text))
}

pub fn empty(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape(message))
}

/// A table of pre-rendered cells, or `empty_message` without rows
pub fn table(headers: &[&str], rows: Vec<Vec<String>>, empty_message: &str) -> String {
    if rows.is_empty() {
        return empty(empty_message);
    }
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    let body: String = rows
        .into_iter()
        .map(|row| {
            let cells: String = row.into_iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

/// Label/value grid
pub fn fields(list: &[Field]) -> String {
    let items: String = list
        .iter()
        .map(|f| {
            format!(
                r#"<div><div class="label">{}</div><div>{}</div></div>"#,
                escape(f.label),
                escape(&f.value)
            )
        })
        .collect();
    format!(r#"<div class="fields">{items}</div>"#)
}

pub fn panel(title: &str, body: &str) -> String {
    format!(
        r#"<section class="panel"><h2>{}</h2>{}</section>"#,
        escape(title),
        body
    )
}

/// Horizontal bars of receipt counts, one row per day
pub fn bars(points: &[ChartPoint], empty_message: &str) -> String {
    if points.is_empty() {
        return empty(empty_message);
    }
    let max = points.iter().map(|p| p.receipts).max().unwrap_or(0).max(1);
    points
        .iter()
        .map(|p| {
            let width = (p.receipts.max(0) as f64 / max as f64 * 100.0).round();
            format!(
                r#"<div class="bar-row"><span>{label}</span><div class="bar" style="width: {width}%"></div><span>{receipts} / {amount}</span></div>"#,
                label = escape(&p.label),
                receipts = p.receipts,
                amount = escape(&format_currency(p.amount)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Acme" & 'Co'</b>"#),
            "&lt;b&gt;&quot;Acme&quot; &amp; &#39;Co&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_layout_marks_current_page() {
        let html = layout(Page::Users, Some("admin"), None, "<p>x</p>");
        assert!(html.contains(r#"<a href="/users" class="active">Users</a>"#));
        assert!(html.contains(r#"<a href="/licenses">Licenses</a>"#));
        assert!(html.contains("admin"));
    }

    #[test]
    fn test_flash_notice_is_escaped() {
        let html = layout(Page::Dashboard, None, Some(&Notice::error("<script>")), "");
        assert!(html.contains(r#"<div class="notice error" role="status">&lt;script&gt;</div>"#));
    }

    #[test]
    fn test_table_empty_message() {
        assert_eq!(table(&["A"], Vec::new(), "Nothing"), r#"<p class="empty">Nothing</p>"#);
        let html = table(&["A", "B"], vec![vec!["1".into(), "2".into()]], "Nothing");
        assert!(html.contains("<th>A</th><th>B</th>"));
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
    }

    #[test]
    fn test_bars_scale_to_largest_day() {
        let points = vec![
            ChartPoint { label: "01.03".into(), receipts: 5, amount: 10.0 },
            ChartPoint { label: "02.03".into(), receipts: 10, amount: 20.0 },
        ];
        let html = bars(&points, "-");
        assert!(html.contains("width: 50%"));
        assert!(html.contains("width: 100%"));
    }
}
