pub mod error;
pub mod types;

pub use error::{BiliError, Result};
pub use types::{Reply, SearchVideo, ViewData, ViewStat};

use std::time::Duration;

use serde::de::DeserializeOwned;

use types::{ApiEnvelope, ReplyData, SearchData};

const BASE_URL: &str = "https://api.bilibili.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Per-request timeout. A timed-out search is treated like any other
/// failed fetch by callers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct BiliClient {
    client: reqwest::Client,
    cookie: Option<String>,
    base_url: String,
}

impl BiliClient {
    pub fn new(cookie: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cookie,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// One page of keyword search results, ordered by clicks.
    /// Fixed page 1, page size 20, no duration filter.
    pub async fn search_videos(&self, keyword: &str) -> Result<Vec<SearchVideo>> {
        let url = format!("{}/x/web-interface/search/type", self.base_url);
        let params = [
            ("search_type", "video"),
            ("keyword", keyword),
            ("order", "click"),
            ("duration", "0"),
            ("page", "1"),
            ("pagesize", "20"),
        ];

        tracing::debug!(keyword, "Searching videos");
        let data: Option<SearchData> = self.get_json(&url, &params).await?;
        let hits = data.map(|d| d.result).unwrap_or_default();
        tracing::debug!(keyword, count = hits.len(), "Search returned");
        Ok(hits)
    }

    /// Full detail for one video, including the numeric `aid` needed for
    /// the comment endpoint and the stat block.
    pub async fn video_detail(&self, bvid: &str) -> Result<ViewData> {
        let url = format!("{}/x/web-interface/view", self.base_url);
        let params = [("bvid", bvid)];

        tracing::debug!(bvid, "Fetching video detail");
        let data: Option<ViewData> = self.get_json(&url, &params).await?;
        Ok(data.unwrap_or_default())
    }

    /// Hot comment replies for a video, sorted by like count server-side.
    /// The endpoint caps a page at 20 entries.
    pub async fn hot_replies(&self, aid: u64, limit: u32) -> Result<Vec<Reply>> {
        let url = format!("{}/x/v2/reply", self.base_url);
        let oid = aid.to_string();
        let ps = limit.min(20).to_string();
        let params = [
            ("type", "1"),
            ("oid", oid.as_str()),
            ("sort", "2"),
            ("ps", ps.as_str()),
            ("pn", "1"),
        ];

        tracing::debug!(aid, limit, "Fetching hot replies");
        let data: Option<ReplyData> = self.get_json(&url, &params).await?;
        Ok(data.map(|d| d.replies).unwrap_or_default())
    }

    /// Issue one GET, unwrap the response envelope, and surface HTTP or
    /// application-level failures as errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let mut req = self
            .client
            .get(url)
            .query(params)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT);
        if let Some(cookie) = &self.cookie {
            req = req.header("Cookie", cookie);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BiliError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ApiEnvelope<T> = resp.json().await?;
        if envelope.code != 0 {
            return Err(BiliError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_missing_counters_defaults_to_zero() {
        let body = r#"{"code":0,"message":"","data":{"result":[
            {"bvid":"BV1xx","title":"t","pubdate":1700000000}
        ]}}"#;
        let env: ApiEnvelope<SearchData> = serde_json::from_str(body).unwrap();
        let hits = env.data.unwrap().result;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].play, 0);
        assert_eq!(hits[0].review, 0);
        assert_eq!(hits[0].video_review, 0);
        assert!(hits[0].pic.is_none());
    }

    #[test]
    fn envelope_error_code_is_detected() {
        let body = r#"{"code":-412,"message":"rate limited"}"#;
        let env: ApiEnvelope<SearchData> = serde_json::from_str(body).unwrap();
        assert_eq!(env.code, -412);
        assert!(env.data.is_none());
    }
}
