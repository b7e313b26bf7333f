//! 字幕文档生成器模块

pub mod ass_generator;
pub mod header;
