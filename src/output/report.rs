use crate::model::{RecipeDetail, RecipeSummary};
use crate::page::{Page, CARD_PROMPT};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

fn render_options(page: &Page) -> String {
    let mut out = String::new();
    for opt in page.area_options.iter() {
        let selected = if opt.value == page.selected {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "        <option value=\"{}\"{selected}>{}</option>\n",
            escape_html(&opt.value),
            escape_html(&opt.label)
        ));
    }
    out
}

pub fn render_card(card: &RecipeSummary) -> String {
    format!(
        r#"      <div class="recipe-card" data-meal-id="{id}">
        <img src="{thumb}" alt="{name}">
        <div class="recipe-card-content">
          <h3>{name}</h3>
          <p class="category">{prompt}</p>
        </div>
      </div>
"#,
        id = escape_html(&card.id),
        thumb = escape_html(&card.thumbnail),
        name = escape_html(&card.name),
        prompt = CARD_PROMPT,
    )
}

fn meta_tag(label: &str, value: &str) -> String {
    format!(
        "<span class=\"meta-tag\"><strong>{label}:</strong> {}</span>",
        escape_html(value)
    )
}

pub fn render_modal_body(detail: &RecipeDetail) -> String {
    let mut meta = vec![
        meta_tag("Category", &detail.category),
        meta_tag("Cuisine", &detail.area),
    ];
    if let Some(tags) = detail.tags.as_deref() {
        meta.push(meta_tag("Tags", tags));
    }

    let mut ingredients = String::new();
    for ingredient in detail.ingredients.iter() {
        ingredients.push_str(&format!(
            "          <div class=\"ingredient-item\">{}</div>\n",
            escape_html(&ingredient.label())
        ));
    }

    let embed = detail.video_embed_url();
    let video = match embed.as_deref() {
        Some(src) => format!(
            "<iframe src=\"{}\" allowfullscreen></iframe>",
            escape_html(src)
        ),
        None => String::new(),
    };

    format!(
        r#"      <img id="modalImage" src="{thumb}" alt="{name}">
      <h2 id="modalTitle">{name}</h2>
      <div id="recipeMeta">{meta}</div>
      <div id="ingredientsList">
{ingredients}      </div>
      <p id="instructions">{instructions}</p>
      <div id="videoSection"{video_hidden}>
        <div id="videoWrapper">{video}</div>
      </div>
"#,
        thumb = escape_html(&detail.thumbnail),
        name = escape_html(&detail.name),
        meta = meta.join("\n"),
        instructions = escape_html(&detail.instructions),
        video_hidden = hidden_attr(embed.is_some()),
    )
}

/// Full static document of the current page, modal included when open.
pub fn render_html(page: &Page) -> Vec<u8> {
    let options = render_options(page);
    let cards: String = page.cards.iter().map(render_card).collect();
    let (notice_title, notice_message) = match page.notice {
        Some(n) => (n.title(), n.message()),
        None => ("", ""),
    };
    let modal_class = if page.modal.is_open() {
        "modal active"
    } else {
        "modal"
    };
    let modal_body = page
        .modal
        .recipe()
        .map(render_modal_body)
        .unwrap_or_default();
    let body_style = if page.scroll_locked {
        "overflow: hidden"
    } else {
        "overflow: auto"
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Mealscout</title>
</head>
<body style="{body_style}">
  <header>
    <h1>Mealscout</h1>
    <label for="areaSelect">Cuisine</label>
    <select id="areaSelect">
{options}    </select>
  </header>
  <main>
    <div id="loading"{loading_hidden}>Loading...</div>
    <div id="emptyState"{notice_hidden}><h2>{notice_title}</h2><p>{notice_message}</p></div>
    <div id="recipesGrid">
{cards}    </div>
  </main>
  <div id="recipeModal" class="{modal_class}">
    <div class="modal-content">
{modal_body}    </div>
  </div>
</body>
</html>
"####,
        loading_hidden = hidden_attr(page.loading),
        notice_hidden = hidden_attr(page.notice.is_some()),
    );
    html.into_bytes()
}
