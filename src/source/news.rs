// NewsAPI and GNews clients plus the digest that walks them in priority order
use crate::model::{Article, ProviderError};
use crate::source::traits::NewsProvider;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

pub const NO_NEWS: &str = "📰 No relevant news available.";
const DIGEST_HEADER: &str = "📰 *Relevant news:*";

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Article {
            title: raw.title.unwrap_or_default(),
            source: raw.source.and_then(|s| s.name).unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
        }
    }
}

fn into_articles(body: ArticlesResponse, max_count: usize) -> Vec<Article> {
    body.articles.into_iter().take(max_count).map(Article::from).collect()
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_articles(&self, query: &str, max_count: usize) -> Result<Vec<Article>, ProviderError> {
        let q = format!("{} OR crypto OR cryptocurrency OR blockchain", query);
        let page_size = max_count.to_string();
        let response = self
            .client
            .get("https://newsapi.org/v2/everything")
            .query(&[
                ("q", q.as_str()),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let body: ArticlesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(into_articles(body, max_count))
    }
}

pub struct GNewsClient {
    client: Client,
    api_key: String,
}

impl GNewsClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait::async_trait]
impl NewsProvider for GNewsClient {
    fn name(&self) -> &str {
        "gnews"
    }

    async fn fetch_articles(&self, query: &str, max_count: usize) -> Result<Vec<Article>, ProviderError> {
        let max = max_count.to_string();
        let response = self
            .client
            .get("https://gnews.io/api/v4/search")
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("max", max.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let body: ArticlesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(into_articles(body, max_count))
    }
}

/// Best-effort news section for a message.
pub struct NewsDigest {
    providers: Vec<Box<dyn NewsProvider>>,
    max_articles: usize,
}

impl NewsDigest {
    pub fn new(providers: Vec<Box<dyn NewsProvider>>, max_articles: usize) -> Self {
        Self { providers, max_articles }
    }

    /// The first provider that answers decides the section: `None` when it has no
    /// articles. Failing providers fall through; if none answers the "no news" line is used.
    pub async fn digest(&self, symbol: &str) -> Option<String> {
        for provider in &self.providers {
            match provider.fetch_articles(symbol, self.max_articles).await {
                Ok(articles) => return format_digest(&articles),
                Err(e) => warn!("News provider {} failed for {}: {}", provider.name(), symbol, e),
            }
        }
        Some(NO_NEWS.to_string())
    }
}

pub fn format_digest(articles: &[Article]) -> Option<String> {
    if articles.is_empty() {
        return None;
    }
    let items: Vec<String> = articles
        .iter()
        .map(|a| format!("• {} ({})\n  {}", a.title, a.source, a.url))
        .collect();
    Some(format!("{}\n{}", DIGEST_HEADER, items.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeNews {
        result: Option<Vec<Article>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl NewsProvider for FakeNews {
        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch_articles(&self, _query: &str, _max: usize) -> Result<Vec<Article>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(ProviderError::Malformed("rate limited".into()))
        }
    }

    fn article(title: &str) -> Article {
        Article { title: title.into(), source: "Wire".into(), url: "https://example.org/a".into() }
    }

    #[tokio::test]
    async fn test_no_providers_gives_no_news_line() {
        let digest = NewsDigest::new(vec![], 3);
        assert_eq!(digest.digest("BTC").await.as_deref(), Some(NO_NEWS));
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_second_provider() {
        let second_calls = Arc::new(AtomicUsize::new(0));
        let digest = NewsDigest::new(
            vec![
                Box::new(FakeNews { result: None, calls: Arc::new(AtomicUsize::new(0)) }),
                Box::new(FakeNews { result: Some(vec![article("ETF inflows")]), calls: second_calls.clone() }),
            ],
            3,
        );
        let text = digest.digest("BTC").await.unwrap();
        assert!(text.starts_with(DIGEST_HEADER));
        assert!(text.contains("• ETF inflows (Wire)\n  https://example.org/a"));
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_answer_stops_the_walk() {
        let second_calls = Arc::new(AtomicUsize::new(0));
        let digest = NewsDigest::new(
            vec![
                Box::new(FakeNews { result: Some(vec![]), calls: Arc::new(AtomicUsize::new(0)) }),
                Box::new(FakeNews { result: Some(vec![article("x")]), calls: second_calls.clone() }),
            ],
            3,
        );
        assert_eq!(digest.digest("ETH").await, None);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_response_is_truncated_and_tolerates_missing_fields() {
        let body: ArticlesResponse = serde_json::from_str(
            r#"{"articles": [{"title": "a"}, {"title": "b", "source": {"name": "S"}, "url": "u"}, {"title": "c"}]}"#,
        )
        .unwrap();
        let articles = into_articles(body, 2);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "");
        assert_eq!(articles[1].source, "S");
    }
}
