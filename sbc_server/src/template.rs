//! Minimal page templates.
//!
//! A template is plain HTML with `{{ field }}` placeholders naming fields of the
//! [`DisplayProjection`]. Substituted values are HTML-escaped.

use std::sync::OnceLock;

use regex::Regex;
use sbc_core::DisplayProjection;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load template: {0}")]
    Load(#[from] std::io::Error),
    #[error("unknown template field `{0}`")]
    UnknownField(String),
}

pub fn render(template: &str, display: &DisplayProjection) -> Result<String, RenderError> {
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").unwrap());
    let mut page = String::with_capacity(template.len());
    let mut last = 0;
    for captures in placeholder.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = field(display, name.as_str())
            .ok_or_else(|| RenderError::UnknownField(name.as_str().to_owned()))?;
        page.push_str(&template[last..whole.start()]);
        push_escaped(&mut page, value);
        last = whole.end();
    }
    page.push_str(&template[last..]);
    Ok(page)
}

fn field<'a>(display: &'a DisplayProjection, name: &str) -> Option<&'a str> {
    let value = match name {
        "mko_name" => &display.mko_name,
        "mko_date" => &display.mko_date,
        "emb_name" => &display.emb_name,
        "emb_date" => &display.emb_date,
        "bio_name" => &display.bio_name,
        "bio_date" => &display.bio_date,
        _ => return None,
    };
    Some(value)
}

fn push_escaped(page: &mut String, value: &str) {
    for character in value.chars() {
        match character {
            '&' => page.push_str("&amp;"),
            '<' => page.push_str("&lt;"),
            '>' => page.push_str("&gt;"),
            '"' => page.push_str("&#34;"),
            '\'' => page.push_str("&#39;"),
            _ => page.push(character),
        }
    }
}
