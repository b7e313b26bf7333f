//! 卡拉OK字幕编译器核心模块
//!
//! 输入是带逐词时间戳的段落，输出是 ASS 字幕文档。
//! 各阶段都是同步的纯函数，不依赖任何全局状态。

pub mod assembler;
pub mod colors;
pub mod gap;
pub mod generators;
pub mod line_slots;
pub mod parsers;
pub mod processors;
pub mod segmenter;
pub mod time;
pub mod types;
pub mod window;

pub use assembler::compile_track;
pub use types::{
    CompiledTrack, ConvertError, KaraokeOptions, TimedTextEvent, Transcript, Verse, Word,
};

// ==========================================================
//  顶级编译入口
// ==========================================================

/// 将歌词编译为完整的 ASS 文档。
///
/// # 参数
///
/// * `transcript` - 按顺序排列的段落。
/// * `total_duration` - 音频总时长（秒）。
/// * `options` - 编译配置。
///
/// # 返回
///
/// * `Result<String, ConvertError>` - 成功时返回 ASS 文档，
///   对同样的输入总是返回逐字节相同的结果。
pub fn generate_karaoke_ass(
    transcript: &[Verse],
    total_duration: f64,
    options: &KaraokeOptions,
) -> Result<String, ConvertError> {
    compile_track(transcript, total_duration, options)?.to_ass_string()
}

/// 解析逐词时间戳 JSON 并编译为 ASS 文档。
pub fn generate_from_json(
    content: &str,
    total_duration: f64,
    options: &KaraokeOptions,
) -> Result<String, ConvertError> {
    let transcript = parsers::transcript_json_parser::parse_transcript_json(content)?;
    generate_karaoke_ass(&transcript, total_duration, options)
}
