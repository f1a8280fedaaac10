//! Keyword selection over the static catalog.

use crate::catalog::Catalog;
use crate::domain::recommendation::MAX_RESULTS;
use crate::domain::tool::ToolRecord;

pub const DEFAULT_CATEGORY: &str = "text_generator";

#[derive(Debug, Clone, Copy)]
struct KeywordGroup {
    keywords: &'static [&'static str],
    categories: &'static [&'static str],
}

/// Consulted in order only when no category name matched the query.
const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["convert", "csv", "pdf", "file"],
        categories: &["pdf_converter", "csv_tools"],
    },
    KeywordGroup {
        keywords: &["image", "picture", "photo", "generate"],
        categories: &["image_generator"],
    },
    KeywordGroup { keywords: &["text", "write", "content"], categories: &["text_generator"] },
    KeywordGroup {
        keywords: &["code", "programming", "developer"],
        categories: &["code_assistant"],
    },
    KeywordGroup { keywords: &["video", "edit", "movie"], categories: &["video_editor"] },
    KeywordGroup { keywords: &["design", "ui", "graphic"], categories: &["design_tools"] },
    KeywordGroup { keywords: &["music", "audio", "sound"], categories: &["music_generator"] },
];

pub fn select_fallback_tools(catalog: &Catalog, query: &str) -> Vec<ToolRecord> {
    let query = query.to_lowercase();
    let mut selected = Vec::new();

    for category in catalog.categories() {
        let matched = category
            .name
            .split('_')
            .filter(|token| !token.is_empty())
            .any(|token| query.contains(token));
        if matched {
            selected.extend(category.tools.iter().cloned());
        }
    }

    if selected.is_empty() {
        if let Some(group) = KEYWORD_GROUPS
            .iter()
            .find(|group| group.keywords.iter().any(|keyword| query.contains(keyword)))
        {
            for category in group.categories {
                selected.extend(catalog.lookup(category).iter().cloned());
            }
        }
    }

    if selected.is_empty() {
        selected.extend(catalog.lookup(DEFAULT_CATEGORY).iter().cloned());
    }

    selected.truncate(MAX_RESULTS);
    selected
}

#[cfg(test)]
mod tests {
    use super::select_fallback_tools;
    use crate::catalog::{Catalog, Category};
    use crate::domain::tool::ToolRecord;

    fn names(tools: &[ToolRecord]) -> Vec<&str> {
        tools.iter().map(|tool| tool.name.as_str()).collect()
    }

    #[test]
    fn category_token_match_selects_category() {
        let catalog = Catalog::builtin();
        let tools = select_fallback_tools(&catalog, "pdf");
        assert_eq!(names(&tools), ["SmallPDF", "ILovePDF", "PDF24", "Sejda PDF"]);
    }

    #[test]
    fn matches_accumulate_across_categories_and_cap_at_five() {
        let catalog = Catalog::builtin();
        let tools = select_fallback_tools(&catalog, "Convert CSV to PDF");
        assert_eq!(tools.len(), 5);
        assert_eq!(names(&tools), ["SmallPDF", "ILovePDF", "PDF24", "Sejda PDF", "CSV to PDF Converter"]);
    }

    #[test]
    fn secondary_keywords_apply_when_no_category_token_matched() {
        let catalog = Catalog::builtin();
        let tools = select_fallback_tools(&catalog, "make me a photo");
        assert_eq!(tools, catalog.lookup("image_generator"));

        let tools = select_fallback_tools(&catalog, "programming help");
        assert_eq!(tools, catalog.lookup("code_assistant"));
    }

    #[test]
    fn first_secondary_group_wins() {
        let catalog = Catalog::builtin();
        // "file" belongs to the first group, "sound" to the last.
        let tools = select_fallback_tools(&catalog, "sound file");
        assert_eq!(names(&tools), ["SmallPDF", "ILovePDF", "PDF24", "Sejda PDF", "CSV to PDF Converter"]);
        assert!(tools.iter().all(|tool| !catalog.lookup("music_generator").contains(tool)));
    }

    #[test]
    fn unmatched_query_defaults_to_text_generator() {
        let catalog = Catalog::builtin();
        let tools = select_fallback_tools(&catalog, "zzz");
        assert_eq!(tools, catalog.lookup("text_generator"));
    }

    #[test]
    fn music_query_selects_music_generator() {
        let catalog = Catalog::builtin();
        let tools = select_fallback_tools(&catalog, "music");
        assert_eq!(names(&tools), ["AIVA", "Mubert", "Soundful", "Boomy"]);
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let catalog = Catalog::new(vec![Category { name: "solo".to_string(), tools: Vec::new() }]);
        assert!(select_fallback_tools(&catalog, "anything").is_empty());
    }
}
