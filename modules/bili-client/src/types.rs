use serde::Deserialize;

/// Envelope wrapping every web API response. `code == 0` means success;
/// any other value is an application-level error described by `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

// --- Search ---

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub result: Vec<SearchVideo>,
}

/// A raw search hit. Counters default to zero when the source omits them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchVideo {
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: u32,
    /// Publish time, Unix epoch seconds.
    #[serde(default)]
    pub pubdate: i64,
    #[serde(default)]
    pub play: u64,
    #[serde(default)]
    pub like: u64,
    /// Comment count (`review` in the wire format).
    #[serde(default)]
    pub review: u64,
    /// Danmaku overlay-comment count (`video_review` in the wire format).
    #[serde(default)]
    pub video_review: u64,
    /// Thumbnail URL.
    #[serde(default)]
    pub pic: Option<String>,
}

// --- Video detail ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewData {
    #[serde(default)]
    pub aid: u64,
    #[serde(default)]
    pub bvid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stat: ViewStat,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewStat {
    #[serde(default)]
    pub view: u64,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub coin: u64,
    #[serde(default)]
    pub favorite: u64,
    #[serde(default)]
    pub share: u64,
}

// --- Comment replies ---

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyData {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub content: ReplyContent,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub member: ReplyMember,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyContent {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyMember {
    #[serde(default)]
    pub uname: String,
}
