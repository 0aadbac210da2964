//! Timestamp helpers.
//!
//! All timestamps in Idobata are Unix milliseconds rendered in JST.

use chrono::{DateTime, FixedOffset, Utc};

/// Get the current Unix timestamp in milliseconds (JST).
pub fn get_jst_timestamp() -> i64 {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    Utc::now().with_timezone(&jst_offset).timestamp_millis()
}

/// Render a Unix millisecond timestamp as an RFC 3339 string in JST.
///
/// Returns an empty string for a timestamp outside the representable range.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.with_timezone(&jst_offset).to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_jst_timestamp_is_positive() {
        // テスト項目: 現在時刻のタイムスタンプが取得できる
        // when (操作):
        let ts = get_jst_timestamp();

        // then (期待する結果): 2020-01-01 以降のミリ秒値
        assert!(ts > 1_577_804_400_000);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプが JST の RFC 3339 文字列に変換される
        // given (前提条件): 2023-01-01T00:00:00+09:00 の UTC ミリ秒
        let millis = 1_672_498_800_000i64;

        // when (操作):
        let rendered = timestamp_to_jst_rfc3339(millis);

        // then (期待する結果):
        assert_eq!(rendered, "2023-01-01T00:00:00+09:00");
    }
}
