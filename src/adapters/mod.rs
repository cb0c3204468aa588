// Adapters layer: one module per upstream trend feed, sharing the HTTP transport in `http`.

pub mod google_daily;
pub mod google_realtime;
pub mod http;
pub mod youtube;

pub use google_daily::GoogleDailyAdapter;
pub use google_realtime::GoogleRealtimeAdapter;
pub use http::FeedClient;
pub use youtube::YoutubeTrendingAdapter;

use serde::de::DeserializeOwned;

/// 修剪字串，空字串視為缺值
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Google Trends 的 JSON 前面帶有 `)]}'` 防護前綴
pub(crate) fn strip_xssi_prefix(body: &str) -> &str {
    let body = body.trim_start();
    match body.strip_prefix(")]}'") {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => body,
    }
}

/// 逐筆反序列化；單筆格式錯誤只丟棄該筆
pub(crate) fn parse_each<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> (Vec<T>, usize) {
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    let malformed = total - parsed.len();
    (parsed, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_and_drops_blank() {
        assert_eq!(non_empty(Some("  Eclipse ".to_string())), Some("Eclipse".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_strip_xssi_prefix() {
        assert_eq!(strip_xssi_prefix(")]}',\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_xssi_prefix(")]}'\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_xssi_prefix("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_each_counts_malformed() {
        #[derive(serde::Deserialize)]
        struct Item {
            #[allow(dead_code)]
            id: u32,
        }

        let items = vec![
            serde_json::json!({"id": 1}),
            serde_json::json!({"id": "not a number"}),
            serde_json::json!({"id": 3}),
        ];
        let (parsed, malformed) = parse_each::<Item>(items);
        assert_eq!(parsed.len(), 2);
        assert_eq!(malformed, 1);
    }
}
