pub mod report;

use colored::Colorize;

use crate::model::RecipeDetail;
use crate::page::Page;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn render(page: &Page, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(page),
        OutputFormat::Json => render_json(page),
        OutputFormat::Html => report::render_html(page),
    }
}

fn format_kv_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<10}: {}\n", label, value));
}

fn push_detail(out: &mut String, detail: &RecipeDetail) {
    out.push_str(&format!("{}\n", detail.name.bold().white()));
    format_kv_line(out, "Category", &detail.category);
    format_kv_line(out, "Cuisine", &detail.area);
    if let Some(tags) = detail.tags.as_deref() {
        format_kv_line(out, "Tags", tags);
    }
    format_kv_line(out, "Image", &detail.thumbnail);
    out.push('\n');
    out.push_str(&format!("{}\n", "Ingredients".bold().cyan()));
    for ingredient in &detail.ingredients {
        out.push_str(&format!("  - {}\n", ingredient.label()));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "Instructions".bold().cyan()));
    for line in detail.instructions.lines() {
        out.push_str(&format!("  {}\n", line.trim_end()));
    }
    if let Some(url) = detail.video_embed_url() {
        out.push('\n');
        format_kv_line(out, "Video", &url);
    }
}

/// Plain terminal view of the page; styling follows `colored`'s global override.
pub fn render_text(page: &Page) -> Vec<u8> {
    let mut out = String::new();
    let selected = if page.selected.is_empty() {
        "-"
    } else {
        page.selected.as_str()
    };
    format_kv_line(&mut out, "Cuisine", selected);
    if page.loading {
        format_kv_line(&mut out, "Status", "loading...");
    }
    if let Some(notice) = page.notice {
        out.push('\n');
        out.push_str(&format!("{}\n", notice.title().bold().yellow()));
        out.push_str(&format!("{}\n", notice.message()));
    }
    if !page.cards.is_empty() {
        out.push('\n');
        for (i, card) in page.cards.iter().enumerate() {
            out.push_str(&format!(
                "[{:>3}] {} {}\n",
                (i + 1).to_string().bold().green(),
                card.name.bold().white(),
                format!("({})", card.id).dimmed()
            ));
        }
    }
    if let Some(detail) = page.modal.recipe() {
        out.push('\n');
        out.push_str(&"-".repeat(58));
        out.push('\n');
        push_detail(&mut out, detail);
        out.push_str(&"-".repeat(58));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(page: &Page) -> Vec<u8> {
    serde_json::to_vec_pretty(page).unwrap_or_else(|_| b"{}\n".to_vec())
}
