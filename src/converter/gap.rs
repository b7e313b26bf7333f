//! 静默间隙的桥接策略。
//!
//! 两个段落之间的短暂停顿保持当前画面，避免换气时画面闪烁；
//! 较长的停顿（例如间奏）切换为不含歌词的加载条。
//! 第一个单词之前的静默由 [`LeadingSilence`] 单独决定。

use crate::converter::{
    types::{
        ConvertError, DEFAULT_STYLE, KaraokeOptions, LeadingSilence, LoaderOptions, TITLE_STYLE,
        TimedTextEvent, WindowConfig,
    },
    window::{VerseProgress, WindowRenderer},
};

/// 一个间隙的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapBridge {
    /// 没有间隙，或者相邻段落重叠。
    None,
    /// 保持上一段完全高亮的画面。
    Hold,
    /// 显示空白画面。
    Blank,
    /// 显示加载条。
    Loader,
}

/// 根据间隙时长对其分类。
///
/// 恰好等于加载条阈值的间隙仍然按“保持”处理。
#[must_use]
pub fn classify_gap(gap: f64, config: &WindowConfig) -> GapBridge {
    if gap <= 0.0 {
        GapBridge::None
    } else if gap > config.gap_loader_threshold_seconds {
        GapBridge::Loader
    } else if config.hold_limit_seconds.is_some_and(|limit| gap > limit) {
        GapBridge::Blank
    } else {
        GapBridge::Hold
    }
}

/// 第 `index` 段与下一段之间的间隙分类。
pub(crate) fn classify_boundary(
    renderer: &WindowRenderer<'_>,
    index: usize,
    config: &WindowConfig,
) -> Option<(f64, f64, GapBridge)> {
    let verses = renderer.verses();
    let next = verses.get(index + 1)?;
    let start = verses[index].span_end();
    let end = next.first_word_start();
    Some((start, end, classify_gap(end - start, config)))
}

/// 生成第 `index` 段与下一段之间的桥接事件。
pub fn bridge_events(
    renderer: &WindowRenderer<'_>,
    index: usize,
    options: &KaraokeOptions,
) -> Vec<TimedTextEvent> {
    let Some((start, end, bridge)) = classify_boundary(renderer, index, &options.window) else {
        return Vec::new();
    };

    match bridge {
        GapBridge::None => Vec::new(),
        GapBridge::Hold => {
            let window = renderer.window(index);
            vec![TimedTextEvent::new(
                start,
                end,
                DEFAULT_STYLE,
                renderer.compose(&window, index, VerseProgress::Full),
            )]
        }
        GapBridge::Blank => vec![TimedTextEvent::new(start, end, DEFAULT_STYLE, "")],
        GapBridge::Loader => loader_events(start, end, options),
    }
}

/// 检查片头设置，标题所占比例必须在 `[0, 1]` 内。
pub(crate) fn check_leading_silence(leading: &LeadingSilence) -> Result<(), ConvertError> {
    if let LeadingSilence::Intro { title_share } = leading
        && !(0.0..=1.0).contains(title_share)
    {
        return Err(ConvertError::ConfigIncomplete(
            "leading_silence.title_share".to_string(),
        ));
    }
    Ok(())
}

/// 片头标题的字号，比正文大 12 号。
#[must_use]
pub fn intro_font_size(font_size_pt: u32) -> u32 {
    font_size_pt.saturating_add(12)
}

/// 生成填充第一个单词之前静默时间的事件。
pub fn leading_events(
    first_start: f64,
    options: &KaraokeOptions,
) -> Result<Vec<TimedTextEvent>, ConvertError> {
    if first_start <= 0.0 {
        return Ok(Vec::new());
    }

    match options.leading_silence {
        LeadingSilence::Skip => Ok(Vec::new()),
        LeadingSilence::Blank => Ok(vec![TimedTextEvent::new(
            0.0,
            first_start,
            DEFAULT_STYLE,
            "",
        )]),
        LeadingSilence::Intro { title_share } => {
            check_leading_silence(&options.leading_silence)?;
            let title_end = first_start * title_share;
            let mut events = Vec::with_capacity(options.loader.bar_resolution as usize + 1);
            if title_end > 0.0 {
                let title = options.title.replace(['\r', '\n'], " ");
                let font_size = intro_font_size(options.style.font_size_pt);
                events.push(TimedTextEvent::new(
                    0.0,
                    title_end,
                    TITLE_STYLE,
                    format!("{{\\fs{font_size}}}{title}"),
                ));
            }
            if first_start > title_end {
                events.extend(loader_events(title_end, first_start, options));
            }
            Ok(events)
        }
    }
}

/// 将 `[start, end)` 等分为 `bar_resolution` 份，每份显示一帧加载条。
pub fn loader_events(start: f64, end: f64, options: &KaraokeOptions) -> Vec<TimedTextEvent> {
    let loader = &options.loader;
    let steps = loader.bar_resolution as usize;
    let fill_color = loader
        .loader_color
        .as_deref()
        .unwrap_or(&options.style.highlight_color);
    let span = end - start;
    let boundary = |i: usize| {
        if i == steps {
            end
        } else {
            start + span * i as f64 / steps as f64
        }
    };

    (1..=steps)
        .map(|step| {
            TimedTextEvent::new(
                boundary(step - 1),
                boundary(step),
                DEFAULT_STYLE,
                loader_text(step, loader, fill_color),
            )
        })
        .collect()
}

/// 渲染第 `step` 帧（从 1 开始）的加载条文本。
#[must_use]
pub fn loader_text(step: usize, loader: &LoaderOptions, fill_color: &str) -> String {
    let total = loader.bar_resolution as usize;
    let filled = step.min(total);
    let glyphs = |n: usize| loader.fill_glyph.to_string().repeat(n);

    let mut text = format!("{{\\c{fill_color}}}");
    if loader.show_caps {
        text.push('|');
    }
    text.push_str(&glyphs(filled));
    if total > filled {
        text.push_str(&format!(
            "{{\\c{}}}{}",
            loader.track_color,
            glyphs(total - filled)
        ));
    }
    if loader.show_caps {
        if total > filled {
            text.push_str(&format!("{{\\c{fill_color}}}"));
        }
        text.push('|');
    }
    text
}
