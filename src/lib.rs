#![warn(missing_docs)]

//! # Karaoke Helper RS
//!
//! 一个 Rust 库，用于把带逐词时间戳的歌词编译为卡拉OK风格的 ASS 字幕。
//!
//! ## 主要功能
//!
//! - **逐字高亮**: 按字素把每个单词的时长等分，生成首尾相接的高亮事件。
//! - **上下文窗口**: 当前段落前后的若干段落同时显示。
//! - **间隙桥接**: 短暂停顿保持画面，间奏显示加载条。
//! - **行位布局**: 可选的 `\kf` 行位轮换布局，由播放器完成逐字填充。
//! - **批量编译**: 使用 rayon 并行编译多首歌曲。
//!
//! ## 编译歌词
//!
//! ```rust
//! use karaoke_helper_rs::converter::{
//!     generate_karaoke_ass,
//!     types::{KaraokeOptions, Verse, Word},
//! };
//!
//! let transcript = vec![
//!     Verse::new(vec![Word::new("Hello", 0.5, 1.0), Word::new("world", 1.1, 1.8)]),
//!     Verse::new(vec![Word::new("again", 2.5, 3.2)]),
//! ];
//!
//! match generate_karaoke_ass(&transcript, 5.0, &KaraokeOptions::default()) {
//!     Ok(ass) => println!("编译成功！共 {} 行。", ass.lines().count()),
//!     Err(e) => eprintln!("编译失败: {}", e),
//! }
//! ```
//!
//! ## 从音频生成
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use karaoke_helper_rs::{KaraokeHelper, providers::json_file::JsonFileTranscriber};
//!
//! async {
//!     let helper = KaraokeHelper::new(Box::new(JsonFileTranscriber::new()));
//!     match helper.generate(Path::new("song.mp3"), 180.0).await {
//!         Ok(ass) => println!("{ass}"),
//!         Err(e) => eprintln!("发生错误: {}", e),
//!     }
//! };
//! ```
pub mod config;
pub mod converter;
pub mod error;
pub mod providers;

use std::path::Path;

pub use crate::error::{KaraokeHelperError, Result};

use crate::{
    converter::types::{CompiledTrack, KaraokeOptions, Transcript, Verse},
    providers::Transcriber,
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层卡拉OK助手，把注入的转写引擎和字幕编译器串联起来。
///
/// 这是与本库交互的主要入口点。
pub struct KaraokeHelper {
    transcriber: Box<dyn Transcriber>,
    options: KaraokeOptions,
}

impl KaraokeHelper {
    /// 使用默认编译选项创建实例。
    pub fn new(transcriber: Box<dyn Transcriber>) -> Self {
        Self::with_options(transcriber, KaraokeOptions::default())
    }

    /// 使用指定编译选项创建实例。
    pub fn with_options(transcriber: Box<dyn Transcriber>, options: KaraokeOptions) -> Self {
        Self {
            transcriber,
            options,
        }
    }

    /// 当前的编译选项。
    pub fn options(&self) -> &KaraokeOptions {
        &self.options
    }

    /// 替换编译选项。
    pub fn set_options(&mut self, options: KaraokeOptions) {
        self.options = options;
    }

    /// 获取音频的逐词时间戳。
    pub async fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        tracing::info!(
            "[Main] 使用 '{}' 转写 {}",
            self.transcriber.name(),
            audio.display()
        );
        let transcript = self.transcriber.transcribe(audio).await?;
        if transcript.is_empty() {
            return Err(KaraokeHelperError::Transcription(format!(
                "'{}' 没有返回任何段落",
                self.transcriber.name()
            )));
        }
        Ok(transcript)
    }

    /// 编译已有的歌词，不调用转写引擎。
    pub fn compile(&self, transcript: &[Verse], total_duration: f64) -> Result<CompiledTrack> {
        Ok(converter::compile_track(
            transcript,
            total_duration,
            &self.options,
        )?)
    }

    /// 转写音频并编译为 ASS 文档。
    ///
    /// # 参数
    /// * `audio` - 音频文件路径。
    /// * `total_duration` - 音频总时长（秒）。
    pub async fn generate(&self, audio: &Path, total_duration: f64) -> Result<String> {
        let transcript = self.transcribe(audio).await?;
        let track = self.compile(&transcript, total_duration)?;
        Ok(track.to_ass_string()?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::converter::types::Word;

    fn init_tracing() {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,karaoke_helper_rs=debug"));
        let _ = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    struct FixedTranscriber(Transcript);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn transcribe(&self, _audio: &Path) -> Result<Transcript> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_generate_with_injected_transcriber() {
        init_tracing();

        let transcript = vec![Verse::new(vec![Word::new("la", 0.0, 1.0)])];
        let helper = KaraokeHelper::new(Box::new(FixedTranscriber(transcript)));

        let ass = helper.generate(Path::new("any.wav"), 2.0).await.unwrap();
        assert!(ass.starts_with("[Script Info]"));
        assert!(ass.contains(r"{\c&H0000FFFF}l{\c&H00FFFFFF}a"));
        let blank_tail = "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,\n";
        assert!(ass.contains(blank_tail));
    }

    #[tokio::test]
    async fn test_empty_transcription_is_an_error() {
        let helper = KaraokeHelper::new(Box::new(FixedTranscriber(Vec::new())));
        let result = helper.generate(Path::new("any.wav"), 2.0).await;
        assert!(matches!(result, Err(KaraokeHelperError::Transcription(_))));
    }

    #[tokio::test]
    async fn test_compile_errors_are_wrapped() {
        let transcript = vec![Verse::new(vec![Word::new("la", 1.0, 0.5)])];
        let helper = KaraokeHelper::new(Box::new(FixedTranscriber(transcript)));
        let result = helper.generate(Path::new("any.wav"), 2.0).await;
        assert!(matches!(result, Err(KaraokeHelperError::Convert(_))));
    }
}
