//! 固定行位轮换的卡拉OK布局。
//!
//! 每个段落只生成一条事件，放在 `Line1..LineN` 中的一个行位上，
//! 逐字高亮交给播放器根据 `\kf` 标签完成。某个行位上的段落唱完之后，
//! 该行位才会显示下一个轮到它的段落。

use tracing::debug;

use crate::converter::{
    gap::{GapBridge, classify_boundary, loader_events},
    time::to_centiseconds,
    types::{ConvertError, KaraokeOptions, TimedTextEvent, Verse},
    window::WindowRenderer,
};

/// 行位数量的上限。
pub const MAX_LINE_SLOTS: u32 = 16;

/// 第 `slot` 个行位（从 0 开始）的样式名称。
#[must_use]
pub fn slot_style_name(slot: usize) -> String {
    format!("Line{}", slot + 1)
}

/// 为所有段落生成行位事件，段落之间的长间隙生成加载条。
///
/// 事件按段落顺序输出，加载条紧跟在间隙之前的段落后面。
pub fn slot_events(
    renderer: &WindowRenderer<'_>,
    slots: u32,
    options: &KaraokeOptions,
) -> Result<Vec<TimedTextEvent>, ConvertError> {
    if slots == 0 || slots > MAX_LINE_SLOTS {
        return Err(ConvertError::ConfigIncomplete("layout.slots".to_string()));
    }
    let slots = slots as usize;
    let verses = renderer.verses();
    let boundaries: Vec<_> = (0..verses.len())
        .map(|i| classify_boundary(renderer, i, &options.window))
        .collect();

    let mut event_ends = Vec::with_capacity(verses.len());
    let mut events = Vec::with_capacity(verses.len());
    let mut run_start = 0;

    for (i, verse) in verses.iter().enumerate() {
        if i > 0 && matches!(boundaries[i - 1], Some((_, _, GapBridge::Loader))) {
            run_start = i;
        }

        let show_at = if i - run_start < slots {
            verses[run_start].first_word_start()
        } else {
            event_ends[i - slots]
        };
        let event_end = match boundaries[i] {
            Some((_, next_start, GapBridge::Hold)) => next_start,
            _ => verse.span_end(),
        };
        event_ends.push(event_end);

        events.push(TimedTextEvent::new(
            show_at,
            event_end,
            &slot_style_name(i % slots),
            karaoke_text(verse, show_at)?,
        ));

        if let Some((gap_start, gap_end, GapBridge::Loader)) = boundaries[i] {
            events.extend(loader_events(gap_start, gap_end, options));
        }
    }

    debug!(
        "行位布局生成了 {} 条事件，共 {} 个行位",
        events.len(),
        slots
    );
    Ok(events)
}

/// 生成从 `show_at` 开始计时的卡拉OK标签文本。
///
/// 每个标签的时长由取整后的累计偏移相减得到，
/// 因此所有时长之和恰好等于最后一个单词的结束时间与 `show_at` 之差。
pub fn karaoke_text(verse: &Verse, show_at: f64) -> Result<String, ConvertError> {
    let mut text = String::new();
    let mut cursor = to_centiseconds(show_at)?;
    let mut has_visible = false;

    for word in &verse.words {
        let start = to_centiseconds(word.start)?;
        let end = to_centiseconds(word.end)?;

        let wait = start.saturating_sub(cursor);
        if wait > 0 {
            text.push_str(&format!("{{\\k{wait}}}"));
        }
        cursor = cursor.max(start);

        let length = end.saturating_sub(cursor);
        if word.is_ghost() {
            if length > 0 {
                text.push_str(&format!("{{\\k{length}}}"));
            }
        } else {
            if has_visible {
                text.push(' ');
            }
            let word_text = word.text.replace(['\r', '\n'], " ");
            text.push_str(&format!("{{\\kf{length}}}{word_text}"));
            has_visible = true;
        }
        cursor = cursor.max(end);
    }

    Ok(text)
}
