//! 定义了整个 `karaoke-helper` 库的错误类型 `KaraokeHelperError`。

use std::io;
use thiserror::Error;

use crate::converter::types::ConvertError;

/// `karaoke-helper` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum KaraokeHelperError {
    /// 通用的 anyhow 错误
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    /// 字幕编译失败 (源自 `ConvertError`)
    #[error("字幕编译失败: {0}")]
    Convert(#[from] ConvertError),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 转写引擎未能给出逐词时间戳
    #[error("转写失败: {0}")]
    Transcription(String),
}

/// `KaraokeHelperError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, KaraokeHelperError>;
