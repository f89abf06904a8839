use crate::models::{FilterSelection, Priority, Task, TaskStats, next_action};
use crate::state::Board;
use crate::stats::build_stats;
use crate::views::{filter_tasks, timeline};
use std::fmt::Write;

pub fn render_index(board: &Board) -> String {
    let tasks = board.store.tasks();
    let stats = build_stats(tasks);
    let visible = filter_tasks(tasks, board.filter);

    INDEX_HTML
        .replace("{{STATS}}", &render_stats(&stats))
        .replace("{{PRIORITIES}}", &render_priorities(board.draft.priority))
        .replace("{{FILTERS}}", &render_filters(board.filter, &stats))
        .replace("{{TASKS}}", &render_tasks(&visible, board.filter))
        .replace("{{TIMELINE}}", &render_timeline(&timeline(tasks)))
        .replace("{{DRAFT_NOTE}}", &escape_html(&board.draft.note))
        .replace("{{DRAFT_TITLE}}", &escape_html(&board.draft.title))
}

fn render_stats(stats: &TaskStats) -> String {
    let cards = [
        ("Total", stats.total.to_string()),
        ("In progress", stats.active.to_string()),
        ("Completed", stats.completed.to_string()),
        ("Focus tasks", stats.focus_count.to_string()),
        ("Completion", format!("{}%", stats.completion_rate)),
    ];
    let mut html = String::new();
    for (label, value) in cards {
        let _ = write!(
            html,
            r#"<div class="stat"><span class="label">{label}</span><span class="value">{value}</span></div>"#
        );
    }
    html
}

fn render_priorities(selected: Priority) -> String {
    let mut html = String::new();
    for priority in Priority::ALL {
        let checked = if priority == selected { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<label class="pill priority-{value}"><input type="radio" name="priority" value="{value}"{checked} />{label}</label>"#,
            value = priority.as_str(),
            label = priority.label(),
        );
    }
    html
}

fn render_filters(active: FilterSelection, stats: &TaskStats) -> String {
    let mut html = String::new();
    for filter in FilterSelection::ALL {
        let count = match filter {
            FilterSelection::All => stats.total,
            FilterSelection::Queued => stats.queued,
            FilterSelection::InProgress => stats.active,
            FilterSelection::Complete => stats.completed,
        };
        let class = if filter == active { "pill active" } else { "pill" };
        let _ = write!(
            html,
            r#"<button class="{class}" type="submit" name="filter" value="{value}" aria-pressed="{pressed}">{label} <span class="count">{count}</span></button>"#,
            value = filter.as_str(),
            pressed = filter == active,
            label = filter.label(),
        );
    }
    html
}

fn render_tasks(tasks: &[&Task], filter: FilterSelection) -> String {
    if tasks.is_empty() {
        let message = match filter {
            FilterSelection::All => "No tasks yet. Add one above to get started.".to_string(),
            other => format!("Nothing {} right now.", other.label().to_lowercase()),
        };
        return format!(r#"<p class="empty">{message}</p>"#);
    }

    let mut html = String::new();
    for task in tasks {
        let action = next_action(task.status);
        let note = if task.note.is_empty() {
            String::new()
        } else {
            format!(r#"<p class="note">{}</p>"#, escape_html(&task.note))
        };
        let id = escape_html(task.id.as_str());
        let _ = write!(
            html,
            r#"<article class="task status-{status}">
  <header>
    <span class="badge priority-{priority}">{priority_label}</span>
    <span class="badge">{status_label}</span>
  </header>
  <h3>{title}</h3>
  {note}
  {time}
  <div class="task-actions">
    <form method="post" action="/tasks/{id}/action"><button class="primary" type="submit">{action_label}</button></form>
    <form method="post" action="/tasks/{id}/delete"><button class="ghost" type="submit">Delete</button></form>
  </div>
</article>"#,
            status = task.status.as_str(),
            priority = task.priority.as_str(),
            priority_label = task.priority.label(),
            status_label = task.status.label(),
            title = escape_html(&task.title),
            time = render_time(task),
            action_label = action.label(),
        );
    }
    html
}

fn render_timeline(recent: &[&Task]) -> String {
    if recent.is_empty() {
        return r#"<li class="empty">Recent activity shows up here.</li>"#.to_string();
    }
    let mut html = String::new();
    for task in recent {
        let _ = write!(
            html,
            r#"<li><span class="dot status-{status}"></span><span>{title}</span>{time}</li>"#,
            status = task.status.as_str(),
            title = escape_html(&task.title),
            time = render_time(task),
        );
    }
    html
}

/// UTC fallback; the page script swaps in the browser's locale format.
fn render_time(task: &Task) -> String {
    format!(
        r#"<time data-local datetime="{iso}">{fallback}</time>"#,
        iso = task.created_at.to_rfc3339(),
        fallback = task.created_at.format("%b %-d, %H:%M UTC"),
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Keeps user text from ever forming a template placeholder.
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Task Board</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --ink: #262523;
      --muted: #7a746d;
      --card: #ffffff;
      --focus: #ff6b4a;
      --flow: #2f7fc1;
      --spark: #e0a100;
      --accent: #2f4858;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(2rem, 4vw, 2.6rem);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
    }

    .stat, .task, .card {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent);
    }

    .layout {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 24px;
    }

    form.create {
      display: grid;
      gap: 10px;
    }

    input[type="text"], textarea {
      font: inherit;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .pills {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
    }

    .pill {
      border: none;
      border-radius: 999px;
      padding: 6px 12px;
      background: rgba(47, 72, 88, 0.08);
      font: inherit;
      cursor: pointer;
    }

    .pill.active {
      background: var(--accent);
      color: white;
    }

    .pill input {
      margin-right: 6px;
    }

    button.primary {
      background: var(--accent);
      color: white;
      border: none;
      border-radius: 999px;
      padding: 8px 16px;
      font: inherit;
      cursor: pointer;
    }

    button.ghost {
      background: transparent;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 999px;
      padding: 8px 16px;
      font: inherit;
      cursor: pointer;
    }

    .tasks {
      display: grid;
      gap: 12px;
    }

    .task header {
      display: flex;
      gap: 6px;
    }

    .task h3 {
      margin: 10px 0 4px;
    }

    .task.status-complete h3 {
      text-decoration: line-through;
      color: var(--muted);
    }

    .task .note {
      margin: 0 0 6px;
      color: var(--muted);
    }

    .task-actions {
      display: flex;
      gap: 8px;
      margin-top: 10px;
    }

    .badge {
      font-size: 0.75rem;
      border-radius: 999px;
      padding: 2px 8px;
      background: rgba(47, 72, 88, 0.08);
    }

    .priority-focus { color: var(--focus); }
    .priority-flow { color: var(--flow); }
    .priority-spark { color: var(--spark); }

    time {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .timeline {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .timeline li {
      display: grid;
      grid-template-columns: 12px 1fr;
      column-gap: 8px;
    }

    .timeline time {
      grid-column: 2;
    }

    .dot {
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-top: 6px;
      background: var(--muted);
    }

    .dot.status-in-progress { background: var(--flow); }
    .dot.status-complete { background: #2d7a4b; }

    .empty {
      color: var(--muted);
    }

    @media (max-width: 720px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Task Board</h1>
    </header>

    <section class="panel">{{STATS}}</section>

    <section class="card">
      <form class="create" id="create-form" method="post" action="/tasks">
        <input type="text" name="title" placeholder="What needs doing?" value="{{DRAFT_TITLE}}" required />
        <textarea name="note" rows="2" placeholder="Optional note">{{DRAFT_NOTE}}</textarea>
        <div class="pills">{{PRIORITIES}}</div>
        <div><button class="primary" type="submit">Add task</button></div>
      </form>
    </section>

    <div class="layout">
      <section class="tasks">
        <form class="pills" method="post" action="/filter">{{FILTERS}}</form>
        {{TASKS}}
      </section>
      <aside class="card">
        <h2>Recent</h2>
        <ul class="timeline">{{TIMELINE}}</ul>
      </aside>
    </div>
  </main>

  <script>
    document.querySelectorAll('time[data-local]').forEach((el) => {
      const date = new Date(el.getAttribute('datetime'));
      if (!Number.isNaN(date.getTime())) {
        el.textContent = date.toLocaleString(undefined, { dateStyle: 'short', timeStyle: 'short' });
      }
    });

    const createForm = document.getElementById('create-form');
    const pushField = (name, value) =>
      fetch('/form/field', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ name, value })
      }).catch(() => {});

    createForm.querySelectorAll('input[type="text"], textarea').forEach((el) => {
      el.addEventListener('change', () => pushField(el.name, el.value));
    });
    createForm.querySelectorAll('input[name="priority"]').forEach((el) => {
      el.addEventListener('change', () => pushField('priority', el.value));
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::storage::{FileStorage, TaskPersistence};
    use crate::store::TaskStore;

    fn board_with(dir: &tempfile::TempDir) -> Board {
        let storage = FileStorage::new(dir.path().join("storage.json"));
        Board::new(TaskStore::open(TaskPersistence::new(storage)))
    }

    #[test]
    fn escapes_user_text() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn empty_board_shows_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let html = render_index(&board_with(&dir));
        assert!(html.contains("No tasks yet"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn cards_offer_action_for_current_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_with(&dir);
        let id = board
            .store
            .create("<script>alert(1)</script>", "", Priority::Spark)
            .unwrap()
            .id;

        let html = render_index(&board);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(">Advance</button>"));
        assert!(html.contains(&format!("/tasks/{id}/action")));

        board.store.advance(&id);
        board.store.advance(&id);
        assert_eq!(board.store.get(&id).unwrap().status, Status::Complete);
        assert!(render_index(&board).contains(">Reset to queued</button>"));
    }

    #[test]
    fn filtered_empty_view_names_the_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_with(&dir);
        board.store.create("Only queued", "", Priority::Flow).unwrap();
        board.filter = FilterSelection::Complete;

        let html = render_index(&board);
        assert!(html.contains("Nothing complete right now."));
        assert!(html.contains("Only queued"), "timeline ignores the filter");
    }

    #[test]
    fn draft_is_prefilled() {
        let dir = tempfile::tempdir().unwrap();
        let mut board = board_with(&dir);
        board.draft.title = "Half {{typed}}".into();
        board.draft.priority = Priority::Flow;

        let html = render_index(&board);
        assert!(html.contains(r#"value="Half &#123;&#123;typed&#125;&#125;""#));
        assert!(html.contains(r#"value="flow" checked"#));
    }
}
