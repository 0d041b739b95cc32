use crate::types::{is_present, Article, REMOVED_TITLE};
use tracing::debug;

/// Drop articles that cannot be rendered: no title, retracted title, no URL,
/// or nothing to show in the body. Order is preserved and the predicate is
/// per-article, so applying the filter twice is a no-op.
pub fn apply(articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    let kept: Vec<Article> = articles.into_iter().filter(is_renderable).collect();
    if kept.len() < before {
        debug!("Filtered out {} unrenderable articles", before - kept.len());
    }
    kept
}

fn is_renderable(article: &Article) -> bool {
    is_present(&article.title)
        && article.title.as_deref() != Some(REMOVED_TITLE)
        && is_present(&article.url)
        && (is_present(&article.description) || is_present(&article.content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: Option<&str>, url: Option<&str>, description: Option<&str>, content: Option<&str>) -> Article {
        Article {
            title: title.map(str::to_string),
            url: url.map(str::to_string),
            description: description.map(str::to_string),
            content: content.map(str::to_string),
            ..Default::default()
        }
    }

    fn complete(title: &str) -> Article {
        article(Some(title), Some("https://example.com/a"), Some("desc"), Some("body"))
    }

    #[test]
    fn keeps_well_formed_articles_in_order() {
        let input = vec![complete("first"), complete("second"), complete("third")];
        let kept = apply(input);
        let titles: Vec<_> = kept.iter().filter_map(|a| a.title.as_deref()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn drops_articles_missing_title() {
        let kept = apply(vec![article(None, Some("https://e.com"), Some("d"), None)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn drops_retracted_articles() {
        let kept = apply(vec![article(
            Some(REMOVED_TITLE),
            Some("https://e.com"),
            Some("d"),
            Some("c"),
        )]);
        assert!(kept.is_empty());
    }

    #[test]
    fn drops_articles_missing_url() {
        let kept = apply(vec![article(Some("t"), None, Some("d"), Some("c"))]);
        assert!(kept.is_empty());
    }

    #[test]
    fn drops_articles_with_no_body_at_all() {
        let kept = apply(vec![article(Some("t"), Some("https://e.com"), None, None)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn description_or_content_alone_is_enough() {
        let only_description = article(Some("t"), Some("https://e.com"), Some("d"), None);
        let only_content = article(Some("t"), Some("https://e.com"), None, Some("c"));
        assert_eq!(apply(vec![only_description, only_content]).len(), 2);
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let kept = apply(vec![article(Some("  "), Some("https://e.com"), Some("d"), None)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let input = vec![
            complete("keep"),
            article(Some(REMOVED_TITLE), Some("https://e.com"), Some("d"), None),
            article(Some("no url"), None, Some("d"), None),
            complete("keep too"),
        ];
        let once = apply(input);
        let twice = apply(once.clone());
        assert_eq!(once.len(), twice.len());
        let titles_once: Vec<_> = once.iter().filter_map(|a| a.title.as_deref()).collect();
        let titles_twice: Vec<_> = twice.iter().filter_map(|a| a.title.as_deref()).collect();
        assert_eq!(titles_once, titles_twice);
    }
}
