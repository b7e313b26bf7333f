//! 定义了卡拉OK字幕编译中使用的核心数据类型。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 定义字幕时间轴编译过程中可能发生的各种错误。
///
/// 所有错误对单次编译调用都是不可恢复的：编译器不会尝试修补数据，
/// 也不会输出部分结果。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 时间值为负数、NaN 或无穷大，或时间字符串无法解析。
    #[error("无效的时间戳: {0}")]
    InvalidTimestamp(String),
    /// 样式或窗口配置缺少必需字段，或字段取值无效。
    #[error("配置不完整: 字段 `{0}` 缺失或无效")]
    ConfigIncomplete(String),
    /// 歌词中没有任何段落。
    #[error("歌词为空，没有可渲染的段落")]
    EmptyTranscript,
    /// 某个段落不包含任何单词 (段落编号从 1 开始)。
    #[error("第 {0} 段不包含任何单词")]
    EmptyVerse(usize),
    /// 单词或段落的时间顺序被破坏，例如相互重叠或结束早于开始。
    #[error("时间顺序无效: {0}")]
    NonMonotonicInput(String),
    /// 字符串格式化错误。
    #[error("格式错误: {0}")]
    Format(#[from] fmt::Error),
    /// 歌词 JSON 解析失败。
    #[error("解析 JSON 内容 {context} 失败: {source}")]
    JsonParse {
        /// 底层错误
        #[source]
        source: serde_json::Error,
        /// 出错位置的描述
        context: String,
    },
}

impl ConvertError {
    /// 创建一个带上下文的 JSON 解析错误。
    pub fn json_parse(source: serde_json::Error, context: impl Into<String>) -> Self {
        Self::JsonParse {
            source,
            context: context.into(),
        }
    }
}

//=============================================================================
// 2. 歌词数据结构
//=============================================================================

/// 一个带时间信息的单词。
///
/// 文本为空的单词是一个“幽灵”占位符：它不显示任何字符，
/// 但仍然占据自己的时间段。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word {
    /// 单词文本。
    pub text: String,
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒）。
    pub end: f64,
}

impl Word {
    /// 创建一个新的单词。
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// 是否为没有可见文本的占位单词。
    #[must_use]
    pub fn is_ghost(&self) -> bool {
        self.text.is_empty()
    }

    /// 单词的持续时间（秒）。
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// 一个歌词段落（通常是一行歌词）。
///
/// 段落的开始和结束时间总是由其单词重新计算，
/// 不信任外部提供的值。唯一的例外是 `nominal_end`：
/// 数据源单独给出的段落结束时间，只在晚于最后一个单词时才生效。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Verse {
    /// 按时间排序的单词列表。
    pub words: Vec<Word>,
    /// 数据源单独提供的段落结束时间。
    #[serde(default)]
    pub nominal_end: Option<f64>,
}

impl Verse {
    /// 从单词列表创建段落。
    #[must_use]
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            nominal_end: None,
        }
    }

    /// 创建一个带有独立结束时间的段落。
    #[must_use]
    pub fn with_nominal_end(words: Vec<Word>, nominal_end: f64) -> Self {
        Self {
            words,
            nominal_end: Some(nominal_end),
        }
    }

    /// 所有单词中最早的开始时间。
    #[must_use]
    pub fn start(&self) -> f64 {
        self.words
            .iter()
            .map(|w| w.start)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// 所有单词中最晚的结束时间。
    #[must_use]
    pub fn end(&self) -> f64 {
        self.words
            .iter()
            .map(|w| w.end)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// 段落在时间轴上实际占据的结束时间，包含晚于最后一个单词的 `nominal_end`。
    #[must_use]
    pub fn span_end(&self) -> f64 {
        let end = self.end();
        match self.nominal_end {
            Some(nominal) if nominal > end => nominal,
            _ => end,
        }
    }

    /// 第一个单词的开始时间。
    #[must_use]
    pub fn first_word_start(&self) -> f64 {
        self.words.first().map_or(0.0, |w| w.start)
    }

    /// 最后一个单词的结束时间。
    #[must_use]
    pub fn last_word_end(&self) -> f64 {
        self.words.last().map_or(0.0, |w| w.end)
    }
}

/// 一首歌的完整歌词，段落顺序即显示和高亮的顺序。
pub type Transcript = Vec<Verse>;

//=============================================================================
// 3. 配置
//=============================================================================

/// 字幕的样式配置。
///
/// 颜色必须是已经解析好的 ASS 颜色代码（例如 `&H00FFFFFF`），
/// 颜色名称的解析见 [`crate::converter::colors`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// 字体名称。
    pub font_name: String,
    /// 字号（磅）。
    pub font_size_pt: u32,
    /// 未高亮文字的颜色。
    pub primary_color: String,
    /// 高亮文字的颜色。
    pub highlight_color: String,
    /// 描边颜色。
    pub outline_color: String,
    /// 描边宽度（像素）。
    pub outline_width_px: u32,
    /// 阴影颜色。
    pub shadow_color: String,
    /// 阴影宽度（像素）。
    pub shadow_width_px: u32,
    /// 画面宽度（像素）。
    pub screen_width_px: u32,
    /// 画面高度（像素）。
    pub screen_height_px: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size_pt: 48,
            primary_color: "&H00FFFFFF".to_string(),
            highlight_color: "&H0000FFFF".to_string(),
            outline_color: "&H00000000".to_string(),
            outline_width_px: 2,
            shadow_color: "&H00000000".to_string(),
            shadow_width_px: 0,
            screen_width_px: 1280,
            screen_height_px: 720,
        }
    }
}

/// 上下文窗口与间隙处理的配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 当前段落之前显示多少个（完全高亮的）段落。
    pub verses_before: u32,
    /// 当前段落之后显示多少个（未高亮的）段落。
    pub verses_after: u32,
    /// 段落间隙超过该时长（秒）时显示加载条，否则保持画面。
    pub gap_loader_threshold_seconds: f64,
    /// 若设置，则长于该值但未超过加载条阈值的间隙显示为空白画面。
    pub hold_limit_seconds: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            verses_before: 1,
            verses_after: 1,
            gap_loader_threshold_seconds: 5.0,
            hold_limit_seconds: None,
        }
    }
}

/// 加载条动画的配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// 加载条被划分的格数，也是动画的帧数。
    pub bar_resolution: u32,
    /// 组成加载条的字形。
    pub fill_glyph: char,
    /// 已填充部分的颜色。为 `None` 时使用高亮颜色。
    pub loader_color: Option<String>,
    /// 未填充部分的颜色。
    pub track_color: String,
    /// 是否在加载条两端绘制 `|`。
    pub show_caps: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            bar_resolution: 30,
            fill_glyph: '█',
            loader_color: None,
            track_color: "&H80000000".to_string(),
            show_caps: true,
        }
    }
}

/// 当前段落的高亮呈现方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HighlightLayout {
    /// 逐字符渐进高亮，并与上下文窗口组合成一整块文本。
    #[default]
    Progressive,
    /// 固定行位轮换，每个段落一条使用 `\kf` 填充标签的事件。
    LineSlots {
        /// 屏幕上同时存在的行位数量，取值范围 `1..=16`。
        slots: u32,
    },
}

/// 第一个单词之前的静默时间的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LeadingSilence {
    /// 不生成任何事件。
    #[default]
    Skip,
    /// 生成一条空白事件。
    Blank,
    /// 先显示标题，随后显示加载条直到第一个单词。
    Intro {
        /// 标题所占的静默时间比例，取值范围 `[0, 1]`。
        title_share: f64,
    },
}

/// 遇到重叠或乱序的时间戳时采取的策略。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, EnumIter, Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// 以 `NonMonotonicInput` 拒绝整个编译。
    #[default]
    Reject,
    /// 将重叠的时间戳钳制到前一个单词的结束时间，并记录警告。
    Clamp,
}

/// 一次编译所需的全部配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KaraokeOptions {
    /// 写入 `[Script Info]` 的标题，也用于片头。
    pub title: String,
    /// 样式配置
    pub style: StyleConfig,
    /// 窗口与间隙配置
    pub window: WindowConfig,
    /// 加载条配置
    pub loader: LoaderOptions,
    /// 高亮布局
    pub layout: HighlightLayout,
    /// 片头静默处理
    pub leading_silence: LeadingSilence,
    /// 时间重叠处理策略
    pub overlap_policy: OverlapPolicy,
}

impl Default for KaraokeOptions {
    fn default() -> Self {
        Self {
            title: "Karaoke".to_string(),
            style: StyleConfig::default(),
            window: WindowConfig::default(),
            loader: LoaderOptions::default(),
            layout: HighlightLayout::default(),
            leading_silence: LeadingSilence::default(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

//=============================================================================
// 4. 编译输出
//=============================================================================

/// 默认样式的名称。
pub const DEFAULT_STYLE: &str = "Default";
/// 片头标题样式的名称。
pub const TITLE_STYLE: &str = "Title";

/// 一条带时间和样式的文本事件，对应输出中的一行 `Dialogue`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedTextEvent {
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒）。
    pub end: f64,
    /// 使用的样式名称。
    pub style: String,
    /// 文本内容，可能包含 ASS 覆盖标签和 `\N` 换行。
    pub text: String,
}

impl TimedTextEvent {
    /// 创建一个新的事件。
    pub fn new(start: f64, end: f64, style: &str, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            style: style.to_string(),
            text: text.into(),
        }
    }

    /// 事件的持续时间（秒）。
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// `[V4+ Styles]` 中的一条样式记录。
///
/// 同一个轨道中的样式共享 [`StyleConfig`] 的字体和颜色，
/// 只在位置以及是否用于 `\kf` 填充上有所不同。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    /// 样式名称
    pub name: String,
    /// ASS 对齐方式（小键盘布局，5 为居中，8 为顶部居中）。
    pub alignment: u8,
    /// 垂直边距（像素）。
    pub margin_v: u32,
    /// 是否用于卡拉OK填充。为真时主色为高亮色，次色为普通色。
    pub karaoke_fill: bool,
}

impl StyleRecord {
    /// 创建一个居中的普通样式。
    pub fn centered(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alignment: 5,
            margin_v: 0,
            karaoke_fill: false,
        }
    }
}

/// 轨道头部所需的信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackHeader {
    /// 文档标题
    pub title: String,
    /// 样式配置
    pub style: StyleConfig,
    /// 样式记录，至少包含 `Default`。
    pub records: Vec<StyleRecord>,
}

/// 一次编译的完整结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledTrack {
    /// 头部信息
    pub header: TrackHeader,
    /// 按输出顺序排列的事件
    pub events: Vec<TimedTextEvent>,
}

impl CompiledTrack {
    /// 将轨道序列化为 ASS 文档。
    pub fn to_ass_string(&self) -> Result<String, ConvertError> {
        crate::converter::generators::ass_generator::generate_ass(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_recomputes_bounds_from_words() {
        let verse = Verse::new(vec![
            Word::new("a", 1.5, 2.0),
            Word::new("b", 2.0, 3.25),
        ]);
        assert_eq!(verse.start(), 1.5);
        assert_eq!(verse.end(), 3.25);
        assert_eq!(verse.span_end(), 3.25);
    }

    #[test]
    fn test_nominal_end_only_extends_span() {
        let verse = Verse::with_nominal_end(vec![Word::new("a", 0.0, 1.0)], 0.5);
        assert_eq!(verse.span_end(), 1.0, "早于最后一个单词的结束时间应被忽略");

        let verse = Verse::with_nominal_end(vec![Word::new("a", 0.0, 1.0)], 1.8);
        assert_eq!(verse.span_end(), 1.8);
        assert_eq!(verse.end(), 1.0);
    }

    #[test]
    fn test_overlap_policy_parses_case_insensitively() {
        assert_eq!(
            "clamp".parse::<OverlapPolicy>().unwrap(),
            OverlapPolicy::Clamp
        );
        assert_eq!(
            "REJECT".parse::<OverlapPolicy>().unwrap(),
            OverlapPolicy::Reject
        );
        assert!("repair".parse::<OverlapPolicy>().is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let json = r#"{
            "title": "Song",
            "window": { "verses_before": 2 },
            "layout": { "mode": "line_slots", "slots": 3 },
            "leading_silence": { "mode": "intro", "title_share": 0.25 }
        }"#;
        let options: KaraokeOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.title, "Song");
        assert_eq!(options.window.verses_before, 2);
        assert_eq!(options.window.verses_after, 1);
        assert_eq!(options.window.gap_loader_threshold_seconds, 5.0);
        assert_eq!(options.layout, HighlightLayout::LineSlots { slots: 3 });
        assert_eq!(
            options.leading_silence,
            LeadingSilence::Intro { title_share: 0.25 }
        );
        assert_eq!(options.loader.bar_resolution, 30);
        assert_eq!(options.style, StyleConfig::default());
    }
}
