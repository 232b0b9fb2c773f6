//! Parsed page: the raw markup, its DOM and the visible text.

use scraper::{ElementRef, Html};

/// Elements whose text children are never rendered.
const HIDDEN_TEXT_PARENTS: [&str; 4] = ["script", "style", "noscript", "template"];

pub struct Page<'a> {
    pub html: &'a str,
    pub document: Html,
    pub visible_text: String,
}

impl<'a> Page<'a> {
    /// html5ever recovers from any markup, so this never fails.
    pub fn parse(html: &'a str) -> Self {
        let document = Html::parse_document(html);
        let visible_text = visible_text(&document);
        Self { html, document, visible_text }
    }

    /// First `max_chars` characters of the visible text.
    pub fn text_sample(&self, max_chars: usize) -> String {
        self.visible_text.chars().take(max_chars).collect()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.document.root_element().descendants().filter_map(ElementRef::wrap)
    }
}

/// Every rendered text node, trimmed, joined with single spaces.
fn visible_text(document: &Html) -> String {
    rendered_text(document.root_element())
}

/// Rendered text of an element, text nodes joined with single spaces.
/// Nested `<script>`/`<style>` content is left out as in `visible_text`.
pub fn element_text(element: &ElementRef<'_>) -> String {
    rendered_text(*element)
}

fn rendered_text(root: ElementRef<'_>) -> String {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| HIDDEN_TEXT_PARENTS.contains(&el.name())))
                .unwrap_or(false);
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
