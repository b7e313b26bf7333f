//! 对齐工具输出的逐词时间戳 JSON 解析器。
//!
//! 输入是一个段落数组，每个段落带有单词列表：
//!
//! ```json
//! [{"verse_number": 1, "start": 0.5, "end": 2.0,
//!   "words": [{"word": "Hello", "start": 0.5, "end": 1.0, "probability": 0.9}]}]
//! ```
//!
//! 段落自带的 `start` 不被使用，`end` 作为段落的独立结束时间保留。

use serde::Deserialize;
use tracing::debug;

use crate::converter::types::{ConvertError, Transcript, Verse, Word};

#[derive(Debug, Deserialize)]
struct RawVerse {
    #[serde(default)]
    verse_number: Option<u32>,
    #[serde(default)]
    end: Option<f64>,
    words: Vec<RawWord>,
}

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(alias = "text")]
    word: String,
    start: f64,
    end: f64,
}

/// 解析逐词时间戳 JSON。
///
/// 单词文本会去掉首尾空白；只包含空白的单词成为幽灵单词。
pub fn parse_transcript_json(content: &str) -> Result<Transcript, ConvertError> {
    let raw: Vec<RawVerse> = serde_json::from_str(content)
        .map_err(|e| ConvertError::json_parse(e, "逐词时间戳"))?;

    let transcript: Transcript = raw
        .into_iter()
        .enumerate()
        .map(|(index, verse)| {
            if let Some(number) = verse.verse_number
                && number as usize != index + 1
            {
                debug!(
                    "段落编号 {} 与位置 {} 不一致，按位置处理",
                    number,
                    index + 1
                );
            }
            let words = verse
                .words
                .into_iter()
                .map(|w| Word::new(w.word.trim(), w.start, w.end))
                .collect();
            Verse {
                words,
                nominal_end: verse.end,
            }
        })
        .collect();

    debug!("解析了 {} 个段落", transcript.len());
    Ok(transcript)
}
