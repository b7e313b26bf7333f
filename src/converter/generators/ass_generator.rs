//! ASS 格式生成器

use std::fmt::Write;

use crate::converter::{
    generators::header::write_header,
    time::format_ass_time,
    types::{CompiledTrack, ConvertError, TimedTextEvent},
};

/// ASS 生成的主入口函数。
///
/// 同一个 [`CompiledTrack`] 总是生成逐字节相同的文档。
pub fn generate_ass(track: &CompiledTrack) -> Result<String, ConvertError> {
    let mut ass_content = String::with_capacity(track.events.len() * 160 + 1024);

    write_header(&mut ass_content, &track.header)?;
    for event in &track.events {
        write_dialogue_line(&mut ass_content, event)?;
    }

    Ok(ass_content)
}

/// 写出一行 `Dialogue`。
pub fn write_dialogue_line(
    ass_content: &mut String,
    event: &TimedTextEvent,
) -> Result<(), ConvertError> {
    let start = format_ass_time(event.start)?;
    let end = format_ass_time(event.end)?;
    writeln!(
        ass_content,
        "Dialogue: 0,{start},{end},{},,0,0,0,,{}",
        event.style, event.text
    )?;
    Ok(())
}
