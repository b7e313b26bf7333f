//! 从对齐工具预先生成的 JSON 文件读取逐词时间戳。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    converter::{parsers::transcript_json_parser::parse_transcript_json, types::Transcript},
    error::{KaraokeHelperError, Result},
    providers::Transcriber,
};

/// 按音频文件名查找同名 `.json` 时间戳文件的转写器。
///
/// 例如 `song.mp3` 对应 `song.json`。设置了 `directory` 时在该目录下查找，
/// 否则在音频文件所在的目录查找。
#[derive(Debug, Clone, Default)]
pub struct JsonFileTranscriber {
    directory: Option<PathBuf>,
}

impl JsonFileTranscriber {
    /// 在音频文件旁边查找时间戳文件。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 在指定目录下查找时间戳文件。
    #[must_use]
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    /// 音频文件对应的时间戳文件路径。
    pub fn transcript_path(&self, audio: &Path) -> Result<PathBuf> {
        let stem = audio.file_stem().ok_or_else(|| {
            KaraokeHelperError::Transcription(format!("无效的音频路径: {}", audio.display()))
        })?;
        let mut file_name = stem.to_os_string();
        file_name.push(".json");

        Ok(match &self.directory {
            Some(directory) => directory.join(file_name),
            None => audio.with_file_name(file_name),
        })
    }
}

#[async_trait]
impl Transcriber for JsonFileTranscriber {
    fn name(&self) -> &'static str {
        "json_file"
    }

    async fn transcribe(&self, audio: &Path) -> Result<Transcript> {
        let path = self.transcript_path(audio)?;
        debug!("正在读取时间戳文件: {}", path.display());

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            KaraokeHelperError::Transcription(format!("无法读取 {}: {e}", path.display()))
        })?;
        let transcript = parse_transcript_json(&content)?;

        info!("从 {} 读取了 {} 个段落", path.display(), transcript.len());
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_path_resolution() {
        let beside = JsonFileTranscriber::new();
        assert_eq!(
            beside.transcript_path(Path::new("/music/song.mp3")).unwrap(),
            PathBuf::from("/music/song.json")
        );

        let elsewhere = JsonFileTranscriber::with_directory("/aligned");
        assert_eq!(
            elsewhere.transcript_path(Path::new("/music/song.mp3")).unwrap(),
            PathBuf::from("/aligned/song.json")
        );

        assert!(beside.transcript_path(Path::new("/")).is_err());
    }

    #[tokio::test]
    async fn test_transcribe_reads_sibling_json() {
        let dir = std::env::temp_dir().join(format!("karaoke_json_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("track.json"),
            r#"[{"words": [{"word": "hi", "start": 0.0, "end": 0.5}]}]"#,
        )
        .await
        .unwrap();

        let transcriber = JsonFileTranscriber::new();
        let transcript = transcriber.transcribe(&dir.join("track.wav")).await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].words[0].text, "hi");

        let missing = transcriber.transcribe(&dir.join("absent.wav")).await;
        assert!(matches!(missing, Err(KaraokeHelperError::Transcription(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
