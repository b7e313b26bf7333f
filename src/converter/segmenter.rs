//! 逐字符渐进高亮分段器。
//!
//! 对当前段落的每个单词，按字素把单词的时长等分，每一份生成一条事件；
//! 事件文本是带窗口的整段歌词，当前段落渲染到该时刻的高亮进度。
//! 单词之间的静默、幽灵单词以及段落尾部的剩余时间都以“保持”事件填充，
//! 因此一个段落生成的事件在时间上首尾相接，不重叠也不留空隙。

use unicode_segmentation::UnicodeSegmentation;

use crate::converter::{
    types::{DEFAULT_STYLE, TimedTextEvent},
    window::{VerseProgress, WindowRenderer},
};

/// 为第 `index` 个段落生成渐进高亮事件。
///
/// 调用前必须已经校验过时间顺序，见
/// [`timing_validator`](crate::converter::processors::timing_validator)。
pub fn segment_verse(renderer: &WindowRenderer<'_>, index: usize) -> Vec<TimedTextEvent> {
    let verse = &renderer.verses()[index];
    let window = renderer.window(index);
    let hold = |start: f64, end: f64, progress: VerseProgress| {
        TimedTextEvent::new(
            start,
            end,
            DEFAULT_STYLE,
            renderer.compose(&window, index, progress),
        )
    };

    let mut events = Vec::new();

    for (j, word) in verse.words.iter().enumerate() {
        if j > 0 {
            let previous_end = verse.words[j - 1].end;
            if word.start > previous_end {
                events.push(hold(previous_end, word.start, VerseProgress::Words(j)));
            }
        }

        if word.end <= word.start {
            continue;
        }

        let graphemes = word.text.graphemes(true).count();
        if graphemes == 0 {
            // 幽灵单词：不显示字符，但之前的高亮状态在其时长内保持
            events.push(hold(word.start, word.end, VerseProgress::Words(j + 1)));
            continue;
        }

        let span = word.end - word.start;
        let boundary = |k: usize| {
            if k == graphemes {
                word.end
            } else {
                word.start + span * k as f64 / graphemes as f64
            }
        };

        for k in 1..=graphemes {
            events.push(hold(
                boundary(k - 1),
                boundary(k),
                VerseProgress::Partial {
                    word: j,
                    graphemes: k,
                },
            ));
        }
    }

    let last_end = verse.last_word_end();
    if let Some(nominal_end) = verse.nominal_end
        && nominal_end > last_end
    {
        events.push(hold(last_end, nominal_end, VerseProgress::Full));
    }

    events
}
