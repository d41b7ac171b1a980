use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Platform access
    pub bili_cookie: Option<String>,

    // AI providers
    pub gemini_api_key: String,
    /// Absent means the video backend runs in mock mode.
    pub veo_api_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Task store
    pub task_store_capacity: usize,

    // Hotspot pipeline defaults
    pub hotspot: HotspotConfig,
}

/// Defaults for the hotspot ranking pipeline.
#[derive(Debug, Clone)]
pub struct HotspotConfig {
    /// Keywords used when a task supplies none.
    pub keywords: Vec<String>,
    pub top_k: usize,
    pub lookback_days: i64,
    pub weights: ScoreWeights,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["AI".to_string(), "tech".to_string()],
            top_k: 10,
            lookback_days: 7,
            weights: ScoreWeights::default(),
        }
    }
}

/// Engagement weights and decay exponent for hotspot scoring.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub play: f64,
    pub like: f64,
    pub comment: f64,
    pub danmaku: f64,
    /// Exponent controlling how fast score decays with video age.
    pub gravity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            play: 0.1,
            like: 1.0,
            comment: 0.8,
            danmaku: 0.5,
            gravity: 1.8,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let defaults = HotspotConfig::default();
        Self {
            bili_cookie: optional_env("BILI_COOKIE"),
            gemini_api_key: required_env("GEMINI_API_KEY"),
            veo_api_key: optional_env("VEO_API_KEY"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            task_store_capacity: env::var("TASK_STORE_CAPACITY")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("TASK_STORE_CAPACITY must be a number"),
            hotspot: HotspotConfig {
                keywords: env::var("HOTSPOT_KEYWORDS")
                    .map(|v| parse_keywords(&v))
                    .ok()
                    .filter(|k| !k.is_empty())
                    .unwrap_or(defaults.keywords),
                top_k: env::var("HOTSPOT_TOP_K")
                    .ok()
                    .map(|v| v.parse().expect("HOTSPOT_TOP_K must be a number"))
                    .unwrap_or(defaults.top_k),
                lookback_days: env::var("HOTSPOT_LOOKBACK_DAYS")
                    .ok()
                    .map(|v| v.parse().expect("HOTSPOT_LOOKBACK_DAYS must be a number"))
                    .unwrap_or(defaults.lookback_days),
                weights: defaults.weights,
            },
        }
    }
}

/// Split a comma-separated keyword list, dropping empty entries.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keywords_trims_and_drops_empty() {
        assert_eq!(parse_keywords("AI, tech,,  games "), vec!["AI", "tech", "games"]);
        assert!(parse_keywords("  , ,").is_empty());
    }

    #[test]
    fn default_weights_match_ranking_formula() {
        let w = ScoreWeights::default();
        assert_eq!(w.play, 0.1);
        assert_eq!(w.like, 1.0);
        assert_eq!(w.comment, 0.8);
        assert_eq!(w.danmaku, 0.5);
        assert_eq!(w.gravity, 1.8);
    }
}
