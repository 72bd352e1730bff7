//! HTML structure summary for selector-aware script generation
//!
//! The summary lists every element carrying an `id`, then the form controls,
//! and ends with the full page source so the model can match selectors
//! exactly.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

/// Characters of visible text shown per element with an id
const ELEMENT_TEXT_CHARS: usize = 50;

/// Tags whose contents never count as visible text
const HIDDEN_TAGS: &[&str] = &["script", "style"];

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::internal(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Build the structural summary of an HTML page
pub fn summarize_html(source: &str, filename: &str) -> Result<String> {
    let document = Html::parse_document(source);
    let mut lines = vec![format!("HTML STRUCTURE FOR {}\n", filename)];

    let with_ids: Vec<ElementRef> = document
        .select(&selector("[id]")?)
        .filter(|el| !is_hidden(el))
        .collect();

    if !with_ids.is_empty() {
        lines.push("ELEMENTS WITH IDs:".to_string());
        for el in with_ids {
            let element = el.value();
            let classes = element.classes().collect::<Vec<_>>().join(" ");
            let text: String = visible_text(&el).chars().take(ELEMENT_TEXT_CHARS).collect();
            lines.push(format!(
                "  - <{} id=\"{}\" class=\"{}\"> {}...",
                element.name(),
                element.attr("id").unwrap_or_default(),
                classes,
                text
            ));
        }
    }

    let inputs: Vec<ElementRef> = document.select(&selector("input")?).collect();
    let buttons: Vec<ElementRef> = document.select(&selector("button")?).collect();
    let textareas: Vec<ElementRef> = document.select(&selector("textarea")?).collect();

    if !inputs.is_empty() || !buttons.is_empty() || !textareas.is_empty() {
        lines.push("\nFORM ELEMENTS:".to_string());
        for input in &inputs {
            let el = input.value();
            lines.push(format!(
                "  - <input type=\"{}\" id=\"{}\" name=\"{}\">",
                el.attr("type").unwrap_or("text"),
                el.attr("id").unwrap_or("no-id"),
                el.attr("name").unwrap_or("no-name")
            ));
        }
        for button in &buttons {
            lines.push(format!(
                "  - <button id=\"{}\">{}</button>",
                button.value().attr("id").unwrap_or("no-id"),
                visible_text(button)
            ));
        }
        for textarea in &textareas {
            let el = textarea.value();
            lines.push(format!(
                "  - <textarea id=\"{}\" name=\"{}\">",
                el.attr("id").unwrap_or("no-id"),
                el.attr("name").unwrap_or("no-name")
            ));
        }
    }

    lines.push("\n FULL HTML SOURCE \n".to_string());
    lines.push(source.to_string());

    Ok(lines.join("\n"))
}

/// Whether the element is, or sits inside, a script or style block
fn is_hidden(el: &ElementRef) -> bool {
    HIDDEN_TAGS.contains(&el.value().name())
        || el.ancestors().any(|node| {
            node.value()
                .as_element()
                .map_or(false, |e| HIDDEN_TAGS.contains(&e.name()))
        })
}

/// Stripped text nodes below `el`, concatenated, skipping script and style contents
fn visible_text(el: &ElementRef) -> String {
    let mut out = String::new();

    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != el.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |e| HIDDEN_TAGS.contains(&e.name()))
            });
        if hidden {
            continue;
        }

        out.push_str(text.trim());
    }

    out
}
