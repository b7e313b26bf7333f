//! 转写提供者模块
//!
//! 该模块定义了获取逐词时间戳的抽象。编译器本身从不调用转写引擎，
//! 引擎以 [`Transcriber`] 的形式注入到 [`KaraokeHelper`](crate::KaraokeHelper) 中。

use std::path::Path;

use async_trait::async_trait;

use crate::{converter::types::Transcript, error::Result};

#[cfg(not(target_arch = "wasm32"))]
pub mod json_file;

/// 定义了所有转写引擎需要实现的通用接口。
#[async_trait]
pub trait Transcriber: Send + Sync {
    ///
    /// 返回转写引擎的唯一名称。
    ///
    /// 一个全小写的静态字符串，例如 `"json_file"`。
    ///
    fn name(&self) -> &'static str;

    ///
    /// 为一个音频文件生成带逐词时间戳的歌词。
    ///
    /// # 参数
    /// * `audio` - 音频文件路径。
    ///
    /// # 返回
    /// 一个 `Result`，成功时包含按顺序排列的段落。
    ///
    async fn transcribe(&self, audio: &Path) -> Result<Transcript>;
}
