//! 批量编译处理器。
//!
//! 每首歌的编译相互独立，使用 rayon 并行执行，结果按输入顺序返回。

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::converter::{
    assembler::compile_track,
    types::{ConvertError, KaraokeOptions, Verse},
};

/// 一个批量编译任务。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    /// 任务名称，同时用作输出文件名（不含扩展名）。
    pub name: String,
    /// 歌词段落
    pub verses: Vec<Verse>,
    /// 音频总时长（秒）
    pub total_duration: f64,
}

/// 单个批量任务的最终状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchEntryStatus {
    /// 已写出到 `output_path`。
    Completed {
        /// 输出文件路径
        output_path: PathBuf,
    },
    /// 编译或写入失败。
    Failed(String),
}

/// 并行编译所有任务，结果与 `jobs` 一一对应。
pub fn compile_batch(
    jobs: &[BatchJob],
    options: &KaraokeOptions,
) -> Vec<Result<String, ConvertError>> {
    jobs.par_iter()
        .map(|job| {
            compile_track(&job.verses, job.total_duration, options)?.to_ass_string()
        })
        .collect()
}

/// 并行编译所有任务，并将成功的结果写入 `output_dir/<name>.ass`。
///
/// 单个任务失败不会中断其它任务；只有无法创建输出目录时才返回错误。
pub fn execute_batch_compilation(
    jobs: &[BatchJob],
    output_dir: &Path,
    options: &KaraokeOptions,
) -> std::io::Result<Vec<BatchEntryStatus>> {
    fs::create_dir_all(output_dir)?;

    let statuses: Vec<BatchEntryStatus> = jobs
        .iter()
        .zip(compile_batch(jobs, options))
        .map(|(job, result)| match result {
            Ok(document) => {
                let output_path = output_dir.join(format!("{}.ass", job.name));
                match fs::write(&output_path, document) {
                    Ok(()) => BatchEntryStatus::Completed { output_path },
                    Err(e) => BatchEntryStatus::Failed(format!("写入文件失败: {e}")),
                }
            }
            Err(e) => {
                warn!("任务 '{}' 编译失败: {}", job.name, e);
                BatchEntryStatus::Failed(e.to_string())
            }
        })
        .collect();

    let completed = statuses
        .iter()
        .filter(|s| matches!(s, BatchEntryStatus::Completed { .. }))
        .count();
    info!("批量编译完成：{}/{} 个任务成功", completed, jobs.len());
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::types::Word;

    fn job(name: &str, word: &str, start: f64) -> BatchJob {
        BatchJob {
            name: name.to_string(),
            verses: vec![Verse::new(vec![Word::new(word, start, start + 1.0)])],
            total_duration: start + 2.0,
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let jobs: Vec<BatchJob> = (0..16)
            .map(|i| job(&format!("song{i}"), &format!("w{i}"), i as f64))
            .collect();
        let results = compile_batch(&jobs, &KaraokeOptions::default());

        assert_eq!(results.len(), jobs.len());
        for (i, result) in results.iter().enumerate() {
            let document = result.as_ref().unwrap();
            assert!(document.contains(&format!("w{i}")));
        }
    }

    #[test_log::test]
    fn test_failures_are_isolated() {
        let mut broken = job("broken", "x", 0.0);
        broken.verses.clear();
        let jobs = vec![job("ok", "fine", 0.0), broken];

        let results = compile_batch(&jobs, &KaraokeOptions::default());
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ConvertError::EmptyTranscript)));
    }

    #[test]
    fn test_outputs_are_written_to_directory() {
        let dir = std::env::temp_dir().join(format!("karaoke_batch_{}", std::process::id()));
        let mut broken = job("broken", "x", 0.0);
        broken.total_duration = f64::NAN;
        let jobs = vec![job("first", "a", 0.0), broken];

        let statuses = execute_batch_compilation(&jobs, &dir, &KaraokeOptions::default()).unwrap();

        match &statuses[0] {
            BatchEntryStatus::Completed { output_path } => {
                assert_eq!(output_path, &dir.join("first.ass"));
                let written = fs::read_to_string(output_path).unwrap();
                assert!(written.starts_with("[Script Info]"));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(statuses[1], BatchEntryStatus::Failed(_)));

        fs::remove_dir_all(&dir).unwrap();
    }
}
