//! 将所有阶段串联为一次完整的轨道编译。
//!
//! 顺序：校验 → 头部 → 片头静默 → 逐段落事件与间隙桥接 → 尾部延长。
//! 任何一步失败都会让整次编译失败，不会输出部分结果。

use tracing::{debug, info};

use crate::converter::{
    gap::{bridge_events, check_leading_silence, leading_events},
    generators::header::{style_records, validate_style},
    line_slots::{MAX_LINE_SLOTS, slot_events},
    processors::timing_validator::{check_duration, prepare_verses},
    segmenter::segment_verse,
    types::{
        CompiledTrack, ConvertError, DEFAULT_STYLE, HighlightLayout, KaraokeOptions,
        TimedTextEvent, TrackHeader, Verse,
    },
    window::{HighlightPalette, WindowRenderer},
};

/// 检查与样式无关的配置项。
///
/// 这些检查与歌词内容无关，在读取任何段落之前完成。
pub fn validate_options(options: &KaraokeOptions) -> Result<(), ConvertError> {
    let missing = |field: &str| Err(ConvertError::ConfigIncomplete(field.to_string()));

    validate_style(&options.style)?;

    let window = &options.window;
    let threshold = window.gap_loader_threshold_seconds;
    if !threshold.is_finite() || threshold < 0.0 {
        return missing("window.gap_loader_threshold_seconds");
    }
    if window
        .hold_limit_seconds
        .is_some_and(|limit| !limit.is_finite() || limit < 0.0)
    {
        return missing("window.hold_limit_seconds");
    }
    if options.loader.bar_resolution == 0 {
        return missing("loader.bar_resolution");
    }
    if let HighlightLayout::LineSlots { slots } = options.layout
        && (slots == 0 || slots > MAX_LINE_SLOTS)
    {
        return missing("layout.slots");
    }
    check_leading_silence(&options.leading_silence)
}

/// 编译一首歌的字幕轨道。
///
/// # 参数
/// * `verses` - 按顺序排列的段落。
/// * `total_duration` - 音频总时长（秒），最后一段之后的剩余时间会用空白事件填满。
/// * `options` - 编译配置。
pub fn compile_track(
    verses: &[Verse],
    total_duration: f64,
    options: &KaraokeOptions,
) -> Result<CompiledTrack, ConvertError> {
    check_duration(total_duration)?;
    validate_options(options)?;
    let verses = prepare_verses(verses, options.overlap_policy)?;

    let header = TrackHeader {
        title: options.title.clone(),
        style: options.style.clone(),
        records: style_records(options),
    };

    let palette = HighlightPalette {
        highlight: &options.style.highlight_color,
        primary: &options.style.primary_color,
    };
    let renderer = WindowRenderer::new(&verses, palette, &options.window);

    let mut events = leading_events(verses[0].first_word_start(), options)?;

    match options.layout {
        HighlightLayout::Progressive => {
            for index in 0..verses.len() {
                let segments = segment_verse(&renderer, index);
                debug!("第 {} 段生成了 {} 个分段", index + 1, segments.len());
                events.extend(segments);
                events.extend(bridge_events(&renderer, index, options));
            }
        }
        HighlightLayout::LineSlots { slots } => {
            events.extend(slot_events(&renderer, slots, options)?);
        }
    }

    let last_end = verses.iter().map(Verse::span_end).fold(0.0, f64::max);
    if total_duration > last_end {
        events.push(TimedTextEvent::new(
            last_end,
            total_duration,
            DEFAULT_STYLE,
            "",
        ));
    }

    info!(
        "编译完成：{} 个段落，{} 条事件",
        verses.len(),
        events.len()
    );
    Ok(CompiledTrack { header, events })
}
