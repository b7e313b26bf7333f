//! 段落渲染与上下文窗口。
//!
//! 当前段落之前的若干段落以完全高亮的形式显示，之后的若干段落以普通形式显示，
//! 当前段落本身则由分段器按进度渲染，三者用固定的换行分隔符拼接。

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::converter::types::{Verse, WindowConfig, Word};

/// 窗口中各个块之间的分隔符。
pub const WINDOW_SEPARATOR: &str = r"\N\N\N\N";

/// 高亮所用的两种颜色。
#[derive(Debug, Clone, Copy)]
pub struct HighlightPalette<'a> {
    /// 高亮颜色
    pub highlight: &'a str,
    /// 普通颜色
    pub primary: &'a str,
}

/// 一个段落在某一时刻的高亮进度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseProgress {
    /// 没有任何高亮。
    Plain,
    /// 全部高亮。
    Full,
    /// 前 n 个单词完全高亮。
    Words(usize),
    /// 前 `word` 个单词完全高亮，第 `word` 个单词的前 `graphemes` 个字素高亮。
    Partial {
        /// 正在高亮的单词索引
        word: usize,
        /// 已高亮的字素数
        graphemes: usize,
    },
}

impl VerseProgress {
    /// 索引为 `index` 的单词已高亮的字素数，`None` 表示整个单词都已高亮。
    fn lit_graphemes(self, index: usize) -> Option<usize> {
        match self {
            Self::Plain => Some(0),
            Self::Full => None,
            Self::Words(n) => {
                if index < n {
                    None
                } else {
                    Some(0)
                }
            }
            Self::Partial { word, graphemes } => {
                if index < word {
                    None
                } else if index == word {
                    Some(graphemes)
                } else {
                    Some(0)
                }
            }
        }
    }
}

impl HighlightPalette<'_> {
    /// 按给定进度渲染一个段落。幽灵单词不产生任何文本。
    pub fn render_verse(&self, verse: &Verse, progress: VerseProgress) -> String {
        let mut out = String::new();
        for (index, word) in verse.words.iter().enumerate() {
            if word.is_ghost() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            self.write_word(&mut out, word, progress.lit_graphemes(index));
        }
        out
    }

    fn write_word(&self, out: &mut String, word: &Word, lit: Option<usize>) {
        let text = sanitize(&word.text);
        match lit {
            None => {
                out.push_str(&format!(
                    "{{\\c{}}}{}{{\\c{}}}",
                    self.highlight, text, self.primary
                ));
            }
            Some(0) => out.push_str(&text),
            Some(count) => {
                let split = text
                    .grapheme_indices(true)
                    .nth(count)
                    .map_or(text.len(), |(i, _)| i);
                let (head, tail) = text.split_at(split);
                out.push_str(&format!(
                    "{{\\c{}}}{}{{\\c{}}}{}",
                    self.highlight, head, self.primary, tail
                ));
            }
        }
    }
}

/// 单词文本中的换行会破坏 `Dialogue` 行，替换为空格。
fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains(['\r', '\n']) {
        Cow::Owned(text.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// 第 `index` 个段落的上下文窗口，包含预先渲染好的前后段落。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseWindow {
    /// 之前的段落，完全高亮。
    pub prior: Vec<String>,
    /// 之后的段落，未高亮。
    pub upcoming: Vec<String>,
}

impl VerseWindow {
    /// 为 `verses[index]` 构建窗口。窗口在歌词首尾处自动截断。
    pub fn build(
        verses: &[Verse],
        index: usize,
        config: &WindowConfig,
        palette: &HighlightPalette<'_>,
    ) -> Self {
        let before = config.verses_before as usize;
        let after = config.verses_after as usize;

        let prior_start = index.saturating_sub(before);
        let prior = verses[prior_start..index]
            .iter()
            .map(|v| palette.render_verse(v, VerseProgress::Full))
            .collect();

        let upcoming_end = verses.len().min(index.saturating_add(1).saturating_add(after));
        let upcoming = verses[index + 1..upcoming_end]
            .iter()
            .map(|v| palette.render_verse(v, VerseProgress::Plain))
            .collect();

        Self { prior, upcoming }
    }

    /// 将当前段落的文本放入窗口中间，得到完整的事件文本。
    pub fn compose(&self, current: &str) -> String {
        let blocks: Vec<&str> = self
            .prior
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(current))
            .chain(self.upcoming.iter().map(String::as_str))
            .collect();
        blocks.join(WINDOW_SEPARATOR)
    }
}

/// 将段落、调色板与窗口配置绑定在一起，按需渲染带窗口的事件文本。
#[derive(Debug, Clone, Copy)]
pub struct WindowRenderer<'a> {
    verses: &'a [Verse],
    palette: HighlightPalette<'a>,
    config: &'a WindowConfig,
}

impl<'a> WindowRenderer<'a> {
    /// 创建渲染器。
    pub fn new(
        verses: &'a [Verse],
        palette: HighlightPalette<'a>,
        config: &'a WindowConfig,
    ) -> Self {
        Self {
            verses,
            palette,
            config,
        }
    }

    /// 所有段落。
    pub fn verses(&self) -> &'a [Verse] {
        self.verses
    }

    /// 构建第 `index` 个段落的窗口。
    pub fn window(&self, index: usize) -> VerseWindow {
        VerseWindow::build(self.verses, index, self.config, &self.palette)
    }

    /// 在给定窗口中，以指定进度渲染第 `index` 个段落。
    pub fn compose(&self, window: &VerseWindow, index: usize, progress: VerseProgress) -> String {
        window.compose(&self.palette.render_verse(&self.verses[index], progress))
    }
}
