use crate::models::FeedEntry;
use crate::paths::counter_name;
use askama::Template;

pub const LIKE_LABEL: &str = "Like";
pub const UNLIKE_LABEL: &str = "Unlike";

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Home</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
    }

    body {
      margin: 0;
      background: var(--bg-1);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    main {
      width: min(640px, 100%);
      display: grid;
      gap: 16px;
    }

    .tweet {
      background: var(--card);
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .tweet header {
      display: flex;
      justify-content: space-between;
      color: #8b857d;
      font-size: 0.85rem;
    }

    .tweet footer {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    button.like {
      border: none;
      border-radius: 999px;
      padding: 8px 16px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .count {
      color: var(--accent-2);
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main>
    <h1>Signed in as {{ viewer }}</h1>
    {% if items.is_empty() %}
    <p class="empty">No tweets yet</p>
    {% else %}
    {% for item in items %}
    <article class="tweet" id="tweet-{{ item.id }}">
      <header><span class="author">{{ item.author }}</span><time>{{ item.time }}</time></header>
      <p>{{ item.content }}</p>
      <footer>
        <button type="button" class="like" data-url="{{ item.url|safe }}">{{ item.label }}</button>
        <span class="count" name="{{ item.counter }}">{{ item.count }}</span>
      </footer>
    </article>
    {% endfor %}
    {% endif %}
  </main>
</body>
</html>
"#
)]
struct IndexTemplate<'a> {
    viewer: &'a str,
    items: Vec<TweetView<'a>>,
}

struct TweetView<'a> {
    id: u64,
    author: &'a str,
    content: &'a str,
    time: String,
    url: &'a str,
    label: &'static str,
    counter: String,
    count: u64,
}

impl<'a> From<&'a FeedEntry> for TweetView<'a> {
    fn from(entry: &'a FeedEntry) -> Self {
        Self {
            id: entry.id,
            author: &entry.author,
            content: &entry.content,
            time: entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            url: &entry.action_url,
            label: if entry.is_liked { UNLIKE_LABEL } else { LIKE_LABEL },
            counter: counter_name(entry.id),
            count: entry.liked_count,
        }
    }
}

/// Renders the feed; `data-url` and `name="count_{id}"` are what the like handler reads.
pub fn render_index(viewer: &str, entries: &[FeedEntry]) -> askama::Result<String> {
    IndexTemplate {
        viewer,
        items: entries.iter().map(TweetView::from).collect(),
    }
    .render()
}
