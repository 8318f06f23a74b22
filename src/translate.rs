//! Performer-name translation for star searches. The catalog sites index
//! performers under their Japanese names, so a name typed in another script
//! (typically Chinese) is translated first. Every failure path keeps the
//! original name; translation never blocks a search.

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub title: String,
    pub lang: String,
}

pub trait NameTranslator {
    /// Translate a zh name to its ja equivalent, or None if the collaborator
    /// has no match or failed.
    fn to_japanese(&self, name: &str) -> Option<Translation>;
}

/// Kana is unique to Japanese; CJK ideographs are shared with Chinese, so a
/// name without any kana cannot be assumed to already be Japanese.
pub fn is_japanese_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c, '\u{3040}'..='\u{309f}' | '\u{30a0}'..='\u{30ff}')
    })
}

/// Decide the name actually sent to the search provider. Returns the
/// translated title only when the translator reports it as Japanese;
/// everything else degrades to the original name.
pub fn resolve_star_name(name: &str, translator: &dyn NameTranslator) -> String {
    if is_japanese_script(name) {
        return name.to_string();
    }
    match translator.to_japanese(name) {
        Some(translation) if translation.lang == "ja" => translation.title,
        _ => name.to_string(),
    }
}
