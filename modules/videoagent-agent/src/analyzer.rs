//! Video and comment analysis over the platform client.
//!
//! Every failure here degrades to empty output and a log line; analysis is
//! best-effort context for prompt generation, never a reason to fail a task.

use std::collections::HashMap;

use tracing::{error, info, warn};

use bili_client::{BiliClient, Reply};
use videoagent_common::{CommentsAnalysis, HotComment, VideoInsights, VideoRecord, VideoStats};

const HOT_COMMENT_LIMIT: usize = 10;
const KEYWORD_LIMIT: usize = 10;

/// Tokens skipped during comment keyword extraction. Mixed English/Chinese
/// because comment sections are.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "of", "to", "is", "in", "it", "this", "that", "for", "on", "with",
    "的", "了", "是", "在", "我", "有", "和", "就", "不", "人", "都", "一",
];

pub struct VideoAnalyzer {
    client: BiliClient,
}

impl VideoAnalyzer {
    pub fn new(client: BiliClient) -> Self {
        Self { client }
    }

    /// Build insights for one video from its detail endpoint, falling back
    /// to the search record's own fields where the detail call fails.
    pub async fn analyze_video(&self, video: &VideoRecord) -> VideoInsights {
        info!(bvid = %video.bvid, "Analyzing video");

        let detail = match self.client.video_detail(&video.bvid).await {
            Ok(detail) => detail,
            Err(e) => {
                error!(bvid = %video.bvid, error = %e, "Video detail fetch failed");
                return VideoInsights {
                    bvid: video.bvid.clone(),
                    title: video.title.clone(),
                    description: video.description.clone(),
                    duration: video.duration,
                    author: video.author.clone(),
                    pubdate: video.pubdate,
                    ..Default::default()
                };
            }
        };

        VideoInsights {
            bvid: video.bvid.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            tags: detail.tags,
            duration: video.duration,
            stats: VideoStats {
                view: detail.stat.view,
                like: detail.stat.like,
                coin: detail.stat.coin,
                favorite: detail.stat.favorite,
                share: detail.stat.share,
            },
            author: video.author.clone(),
            pubdate: video.pubdate,
        }
    }

    /// Fetch hot comments for a video and distill them into the top-liked
    /// entries plus a frequency-ranked keyword list.
    pub async fn analyze_comments(&self, bvid: &str, limit: u32) -> CommentsAnalysis {
        info!(bvid, "Analyzing comments");

        let aid = match self.client.video_detail(bvid).await {
            Ok(detail) if detail.aid != 0 => detail.aid,
            Ok(_) => {
                warn!(bvid, "Video detail carries no aid, skipping comments");
                return CommentsAnalysis::default();
            }
            Err(e) => {
                error!(bvid, error = %e, "Video detail fetch failed");
                return CommentsAnalysis::default();
            }
        };

        let replies = match self.client.hot_replies(aid, limit).await {
            Ok(replies) => replies,
            Err(e) => {
                error!(bvid, error = %e, "Comment fetch failed");
                return CommentsAnalysis::default();
            }
        };

        analyze_replies(&replies)
    }
}

fn analyze_replies(replies: &[Reply]) -> CommentsAnalysis {
    if replies.is_empty() {
        return CommentsAnalysis::default();
    }

    let mut by_likes: Vec<&Reply> = replies.iter().collect();
    by_likes.sort_by(|a, b| b.like.cmp(&a.like));

    let hot_comments = by_likes
        .into_iter()
        .take(HOT_COMMENT_LIMIT)
        .map(|r| HotComment {
            content: r.content.message.clone(),
            like: r.like,
            author: r.member.uname.clone(),
        })
        .collect();

    CommentsAnalysis {
        total: replies.len(),
        hot_comments,
        keywords: extract_keywords(replies),
    }
}

/// Frequency-ranked tokens across all comment texts. Single-character
/// tokens and stop words are skipped; ties keep first-seen order so the
/// output is deterministic.
fn extract_keywords(replies: &[Reply]) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0usize;

    for reply in replies {
        for word in reply.content.message.split_whitespace() {
            if word.chars().count() <= 1 || STOP_WORDS.contains(&word) {
                continue;
            }
            let entry = counts.entry(word).or_insert_with(|| {
                order += 1;
                (0, order)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> =
        counts.into_iter().map(|(w, (c, o))| (w, c, o)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(KEYWORD_LIMIT)
        .map(|(w, _, _)| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(message: &str, like: u64, uname: &str) -> Reply {
        let mut r = Reply::default();
        r.content.message = message.to_string();
        r.like = like;
        r.member.uname = uname.to_string();
        r
    }

    #[test]
    fn keywords_skip_stop_words_and_short_tokens() {
        let replies = vec![
            reply("the robot dance is amazing", 1, "a"),
            reply("robot dance robot", 2, "b"),
        ];

        let keywords = extract_keywords(&replies);
        assert_eq!(keywords[0], "robot");
        assert_eq!(keywords[1], "dance");
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"is".to_string()));
    }

    #[test]
    fn keyword_ties_keep_first_seen_order() {
        let replies = vec![reply("alpha beta", 0, "a"), reply("beta alpha", 0, "b")];
        let keywords = extract_keywords(&replies);
        assert_eq!(keywords, vec!["alpha", "beta"]);
    }

    #[test]
    fn hot_comments_are_top_liked_capped_at_ten() {
        let replies: Vec<Reply> = (0..15)
            .map(|i| reply(&format!("comment {i}"), i, &format!("user{i}")))
            .collect();

        let analysis = analyze_replies(&replies);
        assert_eq!(analysis.total, 15);
        assert_eq!(analysis.hot_comments.len(), 10);
        assert_eq!(analysis.hot_comments[0].like, 14);
        for pair in analysis.hot_comments.windows(2) {
            assert!(pair[0].like >= pair[1].like);
        }
    }

    #[test]
    fn empty_replies_produce_default_analysis() {
        let analysis = analyze_replies(&[]);
        assert_eq!(analysis.total, 0);
        assert!(analysis.hot_comments.is_empty());
        assert!(analysis.keywords.is_empty());
    }
}
