//! Hotspot ranking pipeline.
//!
//! keywords → per-keyword search → recency filter → dedup by bvid →
//! time-decayed scoring → sort descending → truncate to top_k.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

use bili_client::{BiliClient, SearchVideo};
use videoagent_common::{ScoreWeights, VideoRecord};

/// Outbound search seam. One call per keyword, already limited to a single
/// page of click-ordered results. Mockable for deterministic tests.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchVideo>>;
}

#[async_trait]
impl VideoSearch for BiliClient {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchVideo>> {
        Ok(self.search_videos(keyword).await?)
    }
}

pub struct HotspotFinder<S: VideoSearch> {
    search: S,
    weights: ScoreWeights,
}

impl<S: VideoSearch> HotspotFinder<S> {
    pub fn new(search: S, weights: ScoreWeights) -> Self {
        Self { search, weights }
    }

    /// Find trending videos for a set of keywords.
    ///
    /// Searches sequentially per keyword; a failed keyword search is logged
    /// and contributes nothing. Returns at most `top_k` records sorted by
    /// score descending, ties in first-occurrence order.
    pub async fn find_hotspots(
        &self,
        keywords: &[String],
        top_k: usize,
        lookback_days: i64,
    ) -> Vec<VideoRecord> {
        if keywords.is_empty() || top_k == 0 {
            return Vec::new();
        }

        info!(?keywords, top_k, lookback_days, "Finding hotspots");

        let now = Utc::now().timestamp();
        let cutoff = now - lookback_days * 86_400;

        let mut all = Vec::new();
        for keyword in keywords {
            match self.search.search(keyword).await {
                Ok(hits) => {
                    let before = all.len();
                    all.extend(
                        hits.into_iter()
                            .filter(|h| h.pubdate >= cutoff)
                            .map(record_from_hit),
                    );
                    debug!(
                        keyword = %keyword,
                        kept = all.len() - before,
                        "Keyword search processed"
                    );
                }
                Err(e) => {
                    error!(keyword = %keyword, error = %e, "Keyword search failed");
                }
            }
        }

        let mut unique = dedup(all);
        for video in &mut unique {
            video.score = Some(score(video, &self.weights, now));
        }

        unique.sort_by(|a, b| {
            let sa = a.score.unwrap_or(f64::MIN);
            let sb = b.score.unwrap_or(f64::MIN);
            sb.total_cmp(&sa)
        });
        unique.truncate(top_k);

        info!(count = unique.len(), "Hotspots ranked");
        unique
    }
}

fn record_from_hit(hit: SearchVideo) -> VideoRecord {
    VideoRecord {
        bvid: hit.bvid,
        title: hit.title,
        author: hit.author,
        description: hit.description,
        duration: hit.duration,
        pubdate: hit.pubdate,
        play: hit.play,
        like: hit.like,
        comment: hit.review,
        danmaku: hit.video_review,
        pic: hit.pic,
        score: None,
    }
}

/// First occurrence of each bvid wins; records without a bvid are dropped.
fn dedup(videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut seen = HashSet::new();
    videos
        .into_iter()
        .filter(|v| !v.bvid.is_empty() && seen.insert(v.bvid.clone()))
        .collect()
}

/// Weighted engagement divided by a time-decay denominator.
///
/// Hours since publish is clamped to zero, so a future-dated record scores
/// as if published right now and the ordering stays total.
fn score(video: &VideoRecord, weights: &ScoreWeights, now: i64) -> f64 {
    let hours = ((now - video.pubdate) as f64 / 3600.0).max(0.0);
    let engagement = video.play as f64 * weights.play
        + video.like as f64 * weights.like
        + video.comment as f64 * weights.comment
        + video.danmaku as f64 * weights.danmaku;
    engagement / (hours + 2.0).powf(weights.gravity)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSearch {
        results: HashMap<String, Vec<SearchVideo>>,
        failing: Vec<String>,
        calls: AtomicUsize,
    }

    impl MockSearch {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
                failing: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with(mut self, keyword: &str, hits: Vec<SearchVideo>) -> Self {
            self.results.insert(keyword.to_string(), hits);
            self
        }

        fn failing_on(mut self, keyword: &str) -> Self {
            self.failing.push(keyword.to_string());
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VideoSearch for &MockSearch {
        async fn search(&self, keyword: &str) -> Result<Vec<SearchVideo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|k| k == keyword) {
                anyhow::bail!("simulated search failure");
            }
            Ok(self.results.get(keyword).cloned().unwrap_or_default())
        }
    }

    fn hit(bvid: &str, hours_old: i64, play: u64, like: u64) -> SearchVideo {
        SearchVideo {
            bvid: bvid.to_string(),
            title: format!("video {bvid}"),
            pubdate: Utc::now().timestamp() - hours_old * 3600,
            play,
            like,
            review: 100,
            video_review: 50,
            ..Default::default()
        }
    }

    fn finder(search: &MockSearch) -> HotspotFinder<&MockSearch> {
        HotspotFinder::new(search, ScoreWeights::default())
    }

    #[tokio::test]
    async fn fresher_video_with_same_stats_ranks_first() {
        let search = MockSearch::new().with(
            "AI",
            vec![hit("bv2", 100, 10_000, 1_000), hit("bv1", 2, 10_000, 1_000)],
        );
        let result = finder(&search)
            .find_hotspots(&["AI".to_string()], 10, 7)
            .await;

        // 100 hours is within the 7-day lookback, so both survive.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].bvid, "bv1");
        assert_eq!(result[1].bvid, "bv2");
        assert!(result[0].score.unwrap() > result[1].score.unwrap());
    }

    #[tokio::test]
    async fn same_bvid_across_keywords_appears_once() {
        let search = MockSearch::new()
            .with("AI", vec![hit("bv1", 2, 100, 10)])
            .with("tech", vec![hit("bv1", 2, 100, 10), hit("bv2", 3, 50, 5)]);
        let result = finder(&search)
            .find_hotspots(&["AI".to_string(), "tech".to_string()], 10, 7)
            .await;

        let bv1_count = result.iter().filter(|v| v.bvid == "bv1").count();
        assert_eq!(bv1_count, 1);
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn empty_keywords_issue_no_requests() {
        let search = MockSearch::new();
        let result = finder(&search).find_hotspots(&[], 10, 7).await;

        assert!(result.is_empty());
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn zero_top_k_yields_empty_without_requests() {
        let search = MockSearch::new().with("AI", vec![hit("bv1", 2, 100, 10)]);
        let result = finder(&search)
            .find_hotspots(&["AI".to_string()], 0, 7)
            .await;

        assert!(result.is_empty());
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_keyword_degrades_to_empty_contribution() {
        let search = MockSearch::new()
            .failing_on("AI")
            .with("tech", vec![hit("bv9", 5, 500, 50)]);
        let result = finder(&search)
            .find_hotspots(&["AI".to_string(), "tech".to_string()], 10, 7)
            .await;

        assert_eq!(search.call_count(), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bvid, "bv9");
    }

    #[tokio::test]
    async fn records_outside_lookback_are_dropped() {
        let search = MockSearch::new().with(
            "AI",
            vec![hit("old", 8 * 24, 1_000, 100), hit("new", 1, 10, 1)],
        );
        let result = finder(&search)
            .find_hotspots(&["AI".to_string()], 10, 7)
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bvid, "new");
    }

    #[tokio::test]
    async fn top_k_truncates_sorted_output() {
        let hits: Vec<SearchVideo> = (0..8)
            .map(|i| hit(&format!("bv{i}"), 1 + i, 100 * (i as u64 + 1), 10))
            .collect();
        let search = MockSearch::new().with("AI", hits);
        let result = finder(&search)
            .find_hotspots(&["AI".to_string()], 3, 7)
            .await;

        assert_eq!(result.len(), 3);
        for pair in result.windows(2) {
            assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
        }
    }

    #[test]
    fn dedup_is_idempotent() {
        let videos: Vec<VideoRecord> = ["a", "b", "a", "c", "b"]
            .iter()
            .map(|id| record_from_hit(hit(id, 1, 0, 0)))
            .collect();

        let once = dedup(videos);
        let ids: Vec<&str> = once.iter().map(|v| v.bvid.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let twice = dedup(once.clone());
        let ids_twice: Vec<&str> = twice.iter().map(|v| v.bvid.as_str()).collect();
        assert_eq!(ids, ids_twice);
    }

    #[test]
    fn dedup_drops_records_without_bvid() {
        let anon = record_from_hit(hit("", 1, 0, 0));
        let named = record_from_hit(hit("bv1", 1, 0, 0));

        let result = dedup(vec![anon, named]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].bvid, "bv1");
    }

    #[test]
    fn score_increases_with_likes() {
        let now = Utc::now().timestamp();
        let w = ScoreWeights::default();
        let base = record_from_hit(hit("bv1", 5, 1_000, 100));
        let mut more_likes = base.clone();
        more_likes.like += 1;

        assert!(score(&more_likes, &w, now) > score(&base, &w, now));
    }

    #[test]
    fn score_decreases_with_age() {
        let now = Utc::now().timestamp();
        let w = ScoreWeights::default();
        let fresh = record_from_hit(hit("bv1", 2, 1_000, 100));
        let stale = record_from_hit(hit("bv1", 50, 1_000, 100));

        assert!(score(&fresh, &w, now) > score(&stale, &w, now));
    }

    #[test]
    fn future_dated_record_scores_as_published_now() {
        let now = Utc::now().timestamp();
        let w = ScoreWeights::default();
        let mut future = record_from_hit(hit("bv1", 0, 1_000, 100));
        future.pubdate = now + 7_200;
        let current = record_from_hit(hit("bv1", 0, 1_000, 100));

        assert_eq!(score(&future, &w, now), score(&current, &w, now));
    }
}
