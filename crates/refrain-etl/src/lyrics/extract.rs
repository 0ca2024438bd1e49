//! Lyrics extraction from Genius song pages.
//!
//! Song pages come in two layouts. Older pages hold the whole text in a
//! single `div` with class `lyrics`; current pages split it across several
//! `div`s whose class starts with `Lyrics__Container` (the suffix is a
//! build hash such as `Lyrics__Container-sc-1ynbvzw-1`).

use scraper::{ElementRef, Html, Selector};

/// Class carried by the single lyrics container on legacy pages.
const LEGACY_CLASS: &str = "lyrics";

/// Class prefix of the lyrics containers on current pages.
const CONTAINER_CLASS_PREFIX: &str = "Lyrics__Container";

/// Text of an element: every descendant text node, one per line.
fn container_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("\n")
}

/// Extract the raw (untrimmed) lyrics text from a song page.
///
/// A legacy container wins when present, even if empty. Otherwise all
/// current-layout containers are joined in document order. Returns `None`
/// when the page has neither layout.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let divs = Selector::parse("div").ok()?;

    if let Some(legacy) = document
        .select(&divs)
        .find(|div| div.value().classes().any(|class| class == LEGACY_CLASS))
    {
        return Some(container_text(legacy));
    }

    let containers: Vec<String> = document
        .select(&divs)
        .filter(|div| {
            div.value()
                .classes()
                .any(|class| class.starts_with(CONTAINER_CLASS_PREFIX))
        })
        .map(container_text)
        .collect();

    if containers.is_empty() {
        None
    } else {
        Some(containers.join("\n"))
    }
}
