//! ASS 时间戳的格式化与解析。

use std::sync::LazyLock;

use regex::Regex;

use crate::converter::types::ConvertError;

static ASS_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)\.(\d{2})$").expect("编译 ASS_TIME_REGEX 失败")
});

/// 将秒数四舍五入为厘秒。
///
/// 负数、NaN 和无穷大会返回 `InvalidTimestamp`。
pub fn to_centiseconds(seconds: f64) -> Result<u64, ConvertError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ConvertError::InvalidTimestamp(format!("{seconds}")));
    }
    Ok((seconds * 100.0).round() as u64)
}

/// 将秒数格式化为 ASS 时间字符串 `H:MM:SS.CC` (小时:分钟:秒.厘秒)。
///
/// 先四舍五入到厘秒再拆分各个字段，因此 `59.996` 会得到 `0:01:00.00`。
pub fn format_ass_time(seconds: f64) -> Result<String, ConvertError> {
    let total_cs = to_centiseconds(seconds)?;
    let cs = total_cs % 100;
    let total_seconds = total_cs / 100;
    let secs = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    Ok(format!("{hours}:{minutes:02}:{secs:02}.{cs:02}"))
}

/// 将 `H:MM:SS.CC` 格式的字符串解析为秒数。
pub fn parse_ass_time(time_str: &str) -> Result<f64, ConvertError> {
    let caps = ASS_TIME_REGEX
        .captures(time_str.trim())
        .ok_or_else(|| ConvertError::InvalidTimestamp(time_str.to_string()))?;

    let field = |i: usize| -> Result<u64, ConvertError> {
        caps[i]
            .parse::<u64>()
            .map_err(|e| ConvertError::InvalidTimestamp(format!("{time_str}: {e}")))
    };

    let total_cs = ((field(1)? * 60 + field(2)?) * 60 + field(3)?) * 100 + field(4)?;
    Ok(total_cs as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_basic_values() {
        assert_eq!(format_ass_time(0.0).unwrap(), "0:00:00.00");
        assert_eq!(format_ass_time(1.5).unwrap(), "0:00:01.50");
        assert_eq!(format_ass_time(61.07).unwrap(), "0:01:01.07");
        assert_eq!(format_ass_time(3723.45).unwrap(), "1:02:03.45");
    }

    #[test]
    fn test_hours_are_not_padded_or_bounded() {
        assert_eq!(format_ass_time(36000.0).unwrap(), "10:00:00.00");
        assert_eq!(format_ass_time(360000.0).unwrap(), "100:00:00.00");
    }

    #[test]
    fn test_rounds_half_up_before_carrying() {
        assert_eq!(format_ass_time(0.125).unwrap(), "0:00:00.13");
        assert_eq!(format_ass_time(59.996).unwrap(), "0:01:00.00");
        assert_eq!(format_ass_time(3599.999).unwrap(), "1:00:00.00");
        assert_eq!(format_ass_time(0.004).unwrap(), "0:00:00.00");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            format_ass_time(-0.01),
            Err(ConvertError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            format_ass_time(f64::NAN),
            Err(ConvertError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            format_ass_time(f64::INFINITY),
            Err(ConvertError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_parse_round_trip_within_one_centisecond() {
        for t in [0.0, 0.013, 1.0, 12.345, 59.999, 61.5, 3599.994, 7322.1] {
            let parsed = parse_ass_time(&format_ass_time(t).unwrap()).unwrap();
            assert!((parsed - t).abs() <= 0.01, "{t} -> {parsed}");
        }
    }

    #[test]
    fn test_formatted_strings_preserve_order() {
        let times = [0.0, 0.5, 9.99, 10.0, 59.5, 60.0, 600.0, 3599.0];
        let formatted: Vec<String> = times
            .iter()
            .map(|t| format_ass_time(*t).unwrap())
            .collect();
        assert!(formatted.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "1:2:3.4", "0:00:60.00", "0:61:00.00", "abc", "0:00:01"] {
            assert!(
                matches!(parse_ass_time(bad), Err(ConvertError::InvalidTimestamp(_))),
                "应拒绝 {bad:?}"
            );
        }
    }
}
