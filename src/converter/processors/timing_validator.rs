//! 时间轴校验与修复。
//!
//! 编译开始前检查所有时间戳：无效数值、乱序和重叠都会让编译立即失败。
//! 当选择 [`OverlapPolicy::Clamp`] 时，重叠会被钳制修复并记录警告，
//! 修复后的数据仍需通过同样的校验。

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::converter::types::{ConvertError, OverlapPolicy, Verse};

/// 校验（并按策略修复）段落的时间轴。
///
/// # 返回
/// 校验通过时返回可直接编译的段落。`Reject` 策略下总是借用原数据，
/// `Clamp` 策略下只有在实际发生修复时才会复制。
pub fn prepare_verses(
    verses: &[Verse],
    policy: OverlapPolicy,
) -> Result<Cow<'_, [Verse]>, ConvertError> {
    if verses.is_empty() {
        return Err(ConvertError::EmptyTranscript);
    }
    check_values(verses)?;

    let prepared = match policy {
        OverlapPolicy::Reject => Cow::Borrowed(verses),
        OverlapPolicy::Clamp => {
            let mut repaired = verses.to_vec();
            let repairs = clamp_overlaps(&mut repaired);
            if repairs == 0 {
                Cow::Borrowed(verses)
            } else {
                warn!("共修复了 {} 处重叠的时间戳", repairs);
                Cow::Owned(repaired)
            }
        }
    };

    check_order(&prepared)?;
    debug!("时间轴校验通过，共 {} 段", prepared.len());
    Ok(prepared)
}

/// 校验总时长。
pub fn check_duration(total_duration: f64) -> Result<(), ConvertError> {
    if total_duration.is_finite() && total_duration >= 0.0 {
        Ok(())
    } else {
        Err(ConvertError::InvalidTimestamp(format!(
            "总时长 {total_duration}"
        )))
    }
}

fn check_time(value: f64, what: impl FnOnce() -> String) -> Result<(), ConvertError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConvertError::InvalidTimestamp(format!(
            "{}: {value}",
            what()
        )))
    }
}

/// 检查每个时间值是否有限且非负，以及每段是否至少有一个单词。
fn check_values(verses: &[Verse]) -> Result<(), ConvertError> {
    for (v, verse) in verses.iter().enumerate() {
        let verse_no = v + 1;
        if verse.words.is_empty() {
            return Err(ConvertError::EmptyVerse(verse_no));
        }
        for (w, word) in verse.words.iter().enumerate() {
            let word_no = w + 1;
            check_time(word.start, || {
                format!("第 {verse_no} 段第 {word_no} 个单词的开始时间")
            })?;
            check_time(word.end, || {
                format!("第 {verse_no} 段第 {word_no} 个单词的结束时间")
            })?;
        }
        if let Some(nominal_end) = verse.nominal_end {
            check_time(nominal_end, || format!("第 {verse_no} 段的结束时间"))?;
        }
    }
    Ok(())
}

/// 检查单词内部、单词之间以及段落之间的时间顺序。
fn check_order(verses: &[Verse]) -> Result<(), ConvertError> {
    for (v, verse) in verses.iter().enumerate() {
        let verse_no = v + 1;
        for (w, word) in verse.words.iter().enumerate() {
            if word.start > word.end {
                return Err(ConvertError::NonMonotonicInput(format!(
                    "第 {verse_no} 段第 {} 个单词 '{}' 的结束时间 {} 早于开始时间 {}",
                    w + 1,
                    word.text,
                    word.end,
                    word.start
                )));
            }
            if w > 0 {
                let previous = &verse.words[w - 1];
                if word.start < previous.end {
                    return Err(ConvertError::NonMonotonicInput(format!(
                        "第 {verse_no} 段第 {} 个单词 '{}' 开始于 {}，早于上一个单词的结束时间 {}",
                        w + 1,
                        word.text,
                        word.start,
                        previous.end
                    )));
                }
            }
        }

        if let Some(next) = verses.get(v + 1) {
            let span_end = verse.span_end();
            let next_start = next.first_word_start();
            if next_start < span_end {
                return Err(ConvertError::NonMonotonicInput(format!(
                    "第 {} 段开始于 {next_start}，早于第 {verse_no} 段的结束时间 {span_end}",
                    verse_no + 1
                )));
            }
        }
    }
    Ok(())
}

/// 就地钳制所有重叠的时间戳，返回修复的次数。
///
/// 段落的独立结束时间如果越过下一段的开头，会被截断到下一段的开头；
/// 单词按全局顺序遍历，开始时间早于前一单词（或前一段落）结束时间的会被推后。
fn clamp_overlaps(verses: &mut [Verse]) -> usize {
    let mut repairs = 0;

    for v in 0..verses.len().saturating_sub(1) {
        let next_start = verses[v + 1].first_word_start();
        if let Some(nominal_end) = verses[v].nominal_end
            && nominal_end > next_start
        {
            warn!(
                "第 {} 段的结束时间 {} 越过了下一段的开头 {}，已截断",
                v + 1,
                nominal_end,
                next_start
            );
            verses[v].nominal_end = Some(next_start);
            repairs += 1;
        }
    }

    let mut cursor: Option<f64> = None;
    for (v, verse) in verses.iter_mut().enumerate() {
        for (w, word) in verse.words.iter_mut().enumerate() {
            if let Some(limit) = cursor
                && word.start < limit
            {
                warn!(
                    "第 {} 段第 {} 个单词 '{}' 开始于 {}，早于 {}，已钳制",
                    v + 1,
                    w + 1,
                    word.text,
                    word.start,
                    limit
                );
                word.start = limit;
                repairs += 1;
            }
            if word.end < word.start {
                word.end = word.start;
                repairs += 1;
            }
            cursor = Some(word.end);
        }
        cursor = Some(verse.span_end());
    }

    repairs
}
