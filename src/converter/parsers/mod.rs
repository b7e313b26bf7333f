//! 歌词输入解析器模块

pub mod transcript_json_parser;
