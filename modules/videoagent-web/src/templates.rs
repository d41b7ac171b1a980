use crate::{store::TaskStats, TaskView};

/// Render the dashboard page: create-task form plus stats and task list
/// panels that poll their fragments.
pub fn render_index() -> String {
    let content = r#"
<div class="container">
    <div class="hero">
        <h2>AI Video Creation Assistant</h2>
        <p>Pick a route, add keywords, and let the agent find a trending video, study it, and turn it into a new clip.</p>
    </div>

    <div class="task-card">
        <h3 style="margin-bottom:12px;">New Task</h3>
        <form id="create_form">
            <label>Route
                <select name="task_type">
                    <option value="complete">Full pipeline</option>
                    <option value="hotspot">Hotspot discovery</option>
                    <option value="analyze">Analyze only</option>
                    <option value="generate">Generate only</option>
                </select>
            </label>
            <label>Keywords (comma-separated)
                <input type="text" name="keywords" placeholder="AI, tech">
            </label>
            <label>What should the video be about?
                <textarea name="user_input" rows="3" placeholder="An engaging short video"></textarea>
            </label>
            <button type="submit">Create Task</button>
        </form>
    </div>

    <h3 style="margin:16px 0 8px;">Overview</h3>
    <div id="stats"></div>

    <h3 style="margin:16px 0 8px;">Tasks</h3>
    <div id="tasks"></div>
</div>
<script>
async function refresh(url, target) {
    const r = await fetch(url);
    document.getElementById(target).innerHTML = await r.text();
}
document.getElementById('create_form').addEventListener('submit', async (e) => {
    e.preventDefault();
    await fetch('/api/tasks', { method: 'POST', body: new URLSearchParams(new FormData(e.target)) });
    e.target.reset();
    refresh('/api/tasks', 'tasks');
    refresh('/api/stats', 'stats');
});
refresh('/api/stats', 'stats');
refresh('/api/tasks', 'tasks');
setInterval(() => refresh('/api/stats', 'stats'), 5000);
setInterval(() => refresh('/api/tasks', 'tasks'), 10000);
</script>
"#;

    build_page("Dashboard", content)
}

/// Render the task list fragment.
pub fn render_task_cards(tasks: &[TaskView]) -> String {
    if tasks.is_empty() {
        return r#"<p class="empty">No tasks yet. Create one above.</p>"#.to_string();
    }

    tasks.iter().map(render_task_card).collect()
}

/// Render one task card.
pub fn render_task_card(task: &TaskView) -> String {
    let error_html = match &task.error {
        Some(err) => format!(
            r#"<p class="task-error">{}</p>"#,
            html_escape(err)
        ),
        None => String::new(),
    };

    let video_html = match &task.video_url {
        Some(url) => format!(
            r#"<a href="{}" class="video-link" target="_blank" rel="noopener">Watch result</a>"#,
            html_escape(url)
        ),
        None => String::new(),
    };

    let progress_html = match &task.last_message {
        Some(msg) => format!(r#"<p class="progress">{}</p>"#, html_escape(msg)),
        None => String::new(),
    };

    format!(
        r#"<div class="task-card">
    <div><span class="badge badge-{status}">{status}</span><span class="kind-tag">{kind}</span></div>
    <h3>{title}</h3>
    <p class="summary">{description}</p>
    {progress_html}
    {error_html}
    <div class="meta-row"><span>Created {created}</span>{video_html}<a href="/api/tasks/{id}" class="detail-link" target="_blank" rel="noopener">Details</a></div>
</div>"#,
        id = html_escape(&task.id),
        status = task.status_label,
        kind = html_escape(&task.kind_label),
        title = html_escape(&task.title),
        description = html_escape(&task.description),
        created = html_escape(&task.created),
    )
}

/// Render the stats fragment.
pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        r#"<div class="stats-grid">
    <div class="stat"><div class="stat-value">{total}</div><div class="stat-label">Total</div></div>
    <div class="stat"><div class="stat-value">{pending}</div><div class="stat-label">Pending</div></div>
    <div class="stat"><div class="stat-value">{running}</div><div class="stat-label">Running</div></div>
    <div class="stat"><div class="stat-value stat-ok">{completed}</div><div class="stat-label">Completed</div></div>
    <div class="stat"><div class="stat-value stat-bad">{failed}</div><div class="stat-label">Failed</div></div>
</div>"#,
        total = stats.total,
        pending = stats.pending,
        running = stats.running,
        completed = stats.completed,
        failed = stats.failed,
    )
}

// --- Helpers ---

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — VideoAgent</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.header{{background:#1a1a1a;color:#fff;padding:12px 24px;display:flex;align-items:center;justify-content:space-between;}}
.header h1{{font-size:18px;font-weight:600;}}
.container{{max-width:860px;margin:0 auto;padding:24px;}}
.hero{{margin-bottom:20px;}}
.hero h2{{font-size:24px;margin-bottom:6px;}}
.hero p{{color:#555;font-size:14px;}}
.task-card{{background:#fff;border:1px solid #e0e0e0;border-radius:8px;padding:16px;margin-bottom:12px;}}
.task-card h3{{font-size:16px;margin:6px 0 4px;}}
.task-card .summary{{color:#555;font-size:14px;}}
.task-card form label{{display:block;font-size:13px;color:#555;margin-bottom:10px;}}
.task-card form input,.task-card form select,.task-card form textarea{{display:block;width:100%;margin-top:4px;padding:8px;border:1px solid #ccc;border-radius:4px;font-size:14px;}}
.task-card form button{{padding:8px 20px;background:#0066cc;color:#fff;border:none;border-radius:4px;font-size:14px;cursor:pointer;}}
.task-card form button:hover{{background:#004499;}}
.badge{{display:inline-block;padding:2px 8px;border-radius:12px;font-size:11px;font-weight:600;text-transform:uppercase;}}
.badge-pending{{background:#f5f5f5;color:#616161;}}
.badge-running{{background:#e3f2fd;color:#1565c0;}}
.badge-completed{{background:#e8f5e9;color:#2e7d32;}}
.badge-failed{{background:#fce4ec;color:#c62828;}}
.kind-tag{{margin-left:8px;font-size:11px;color:#888;}}
.meta-row{{display:flex;gap:12px;align-items:center;font-size:12px;color:#888;margin-top:8px;}}
.video-link{{color:#0066cc;font-weight:500;text-decoration:none;}}
.detail-link{{color:#888;text-decoration:none;}}
.progress{{font-size:13px;color:#555;margin-top:6px;}}
.task-error{{font-size:13px;color:#c62828;margin-top:6px;}}
.stats-grid{{display:grid;grid-template-columns:repeat(5,1fr);gap:12px;}}
.stat{{background:#fff;border:1px solid #e0e0e0;border-radius:8px;padding:12px;text-align:center;}}
.stat-value{{font-size:28px;font-weight:700;color:#1565c0;}}
.stat-value.stat-ok{{color:#2e7d32;}}
.stat-value.stat-bad{{color:#c62828;}}
.stat-label{{font-size:12px;color:#888;}}
.empty{{color:#888;text-align:center;padding:32px;}}
</style>
</head>
<body>
<div class="header">
    <h1>VideoAgent</h1>
</div>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_card_escapes_user_content() {
        let view = TaskView {
            id: "t1".to_string(),
            title: "<script>alert(1)</script>".to_string(),
            description: "a & b".to_string(),
            status_label: "pending",
            kind_label: "complete".to_string(),
            created: "2026-08-27 10:00".to_string(),
            last_message: None,
            video_url: None,
            error: Some("boom <tag>".to_string()),
        };

        let html = render_task_card(&view);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("boom &lt;tag&gt;"));
    }

    #[test]
    fn empty_task_list_renders_placeholder() {
        let html = render_task_cards(&[]);
        assert!(html.contains("No tasks yet"));
    }
}
