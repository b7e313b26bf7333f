//! `[Script Info]`、`[V4+ Styles]` 与 `[Events]` 头部的生成。

use std::fmt::Write;

use crate::converter::{
    colors::is_valid_ass_color,
    line_slots::slot_style_name,
    types::{
        ConvertError, DEFAULT_STYLE, HighlightLayout, KaraokeOptions, LeadingSilence, StyleConfig,
        StyleRecord, TITLE_STYLE, TrackHeader,
    },
};

const STYLE_FORMAT: &str =
    "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";
const EVENT_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// 检查样式配置中的必需字段。
pub fn validate_style(style: &StyleConfig) -> Result<(), ConvertError> {
    let missing = |field: &str| Err(ConvertError::ConfigIncomplete(format!("style.{field}")));

    if style.font_name.trim().is_empty() {
        return missing("font_name");
    }
    if style.font_size_pt == 0 {
        return missing("font_size_pt");
    }
    if style.screen_width_px == 0 {
        return missing("screen_width_px");
    }
    if style.screen_height_px == 0 {
        return missing("screen_height_px");
    }

    let colors = [
        ("primary_color", &style.primary_color),
        ("highlight_color", &style.highlight_color),
        ("outline_color", &style.outline_color),
        ("shadow_color", &style.shadow_color),
    ];
    for (field, color) in colors {
        if !is_valid_ass_color(color) {
            return missing(field);
        }
    }
    Ok(())
}

/// 根据布局和片头设置列出需要的样式记录。
pub fn style_records(options: &KaraokeOptions) -> Vec<StyleRecord> {
    let style = &options.style;
    let mut records = vec![StyleRecord::centered(DEFAULT_STYLE)];

    if matches!(options.leading_silence, LeadingSilence::Intro { .. }) {
        records.push(StyleRecord {
            name: TITLE_STYLE.to_string(),
            alignment: 8,
            margin_v: (u64::from(style.screen_height_px) * 2 / 5) as u32,
            karaoke_fill: false,
        });
    }

    if let HighlightLayout::LineSlots { slots } = options.layout {
        // band * (k + 1) 不会超过屏幕高度
        let band = style.screen_height_px / slots.saturating_add(1);
        let half_font = style.font_size_pt / 2;
        records.extend((0..slots).map(|k| StyleRecord {
            name: slot_style_name(k as usize),
            alignment: 8,
            margin_v: (band * (k + 1)).saturating_sub(half_font),
            karaoke_fill: true,
        }));
    }

    records
}

/// 写出完整的头部，到 `[Events]` 的 `Format:` 行为止。
pub fn write_header(out: &mut String, header: &TrackHeader) -> Result<(), ConvertError> {
    let style = &header.style;
    let title = header.title.replace(['\r', '\n'], " ");

    writeln!(out, "[Script Info]")?;
    writeln!(out, "Title: {title}")?;
    writeln!(out, "ScriptType: v4.00+")?;
    writeln!(out, "PlayResX: {}", style.screen_width_px)?;
    writeln!(out, "PlayResY: {}", style.screen_height_px)?;
    writeln!(out, "WrapStyle: 0")?;
    writeln!(out, "ScaledBorderAndShadow: yes")?;
    writeln!(out, "PlayDepth: 0")?;
    writeln!(out)?;

    writeln!(out, "[V4+ Styles]")?;
    writeln!(out, "{STYLE_FORMAT}")?;
    for record in &header.records {
        write_style_line(out, style, record)?;
    }
    writeln!(out)?;

    writeln!(out, "[Events]")?;
    writeln!(out, "{EVENT_FORMAT}")?;
    Ok(())
}

fn write_style_line(
    out: &mut String,
    style: &StyleConfig,
    record: &StyleRecord,
) -> Result<(), ConvertError> {
    // 卡拉OK填充时，主色是已唱部分，次色是未唱部分
    let (primary, secondary) = if record.karaoke_fill {
        (&style.highlight_color, &style.primary_color)
    } else {
        (&style.primary_color, &style.highlight_color)
    };
    writeln!(
        out,
        "Style: {},{},{},{},{},{},{},0,0,0,0,100,100,0,0,1,{},{},{},0,0,{},1",
        record.name,
        style.font_name,
        style.font_size_pt,
        primary,
        secondary,
        style.outline_color,
        style.shadow_color,
        style.outline_width_px,
        style.shadow_width_px,
        record.alignment,
        record.margin_v,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let options = KaraokeOptions::default();
        let header = TrackHeader {
            title: options.title.clone(),
            style: options.style.clone(),
            records: style_records(&options),
        };
        let mut out = String::new();
        write_header(&mut out, &header).unwrap();

        let expected = "\
[Script Info]
Title: Karaoke
ScriptType: v4.00+
PlayResX: 1280
PlayResY: 720
WrapStyle: 0
ScaledBorderAndShadow: yes
PlayDepth: 0

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,48,&H00FFFFFF,&H0000FFFF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,5,0,0,0,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_intro_and_slot_records() {
        let options = KaraokeOptions {
            layout: HighlightLayout::LineSlots { slots: 3 },
            leading_silence: LeadingSilence::Intro { title_share: 0.5 },
            ..Default::default()
        };
        let records = style_records(&options);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Default", "Title", "Line1", "Line2", "Line3"]);

        assert_eq!(records[1].margin_v, 288);
        // 720 / 4 = 180，字号一半为 24
        assert_eq!(records[2].margin_v, 156);
        assert_eq!(records[3].margin_v, 336);
        assert_eq!(records[4].margin_v, 516);
        assert!(
            records[2..]
                .iter()
                .all(|r| r.karaoke_fill && r.alignment == 8)
        );
    }

    #[test]
    fn test_margins_do_not_overflow_on_extreme_sizes() {
        let mut options = KaraokeOptions {
            layout: HighlightLayout::LineSlots { slots: 2 },
            leading_silence: LeadingSilence::Intro { title_share: 0.5 },
            ..Default::default()
        };
        options.style.screen_height_px = u32::MAX;
        options.style.font_size_pt = u32::MAX;

        let records = style_records(&options);
        assert_eq!(records[1].margin_v, 1_717_986_918);
        assert_eq!(records[2].margin_v, 0);
        assert_eq!(records[3].margin_v, 715_827_883);
    }

    #[test]
    fn test_slot_style_swaps_colors() {
        let style = StyleConfig::default();
        let record = StyleRecord {
            name: "Line1".to_string(),
            alignment: 8,
            margin_v: 10,
            karaoke_fill: true,
        };
        let mut out = String::new();
        write_style_line(&mut out, &style, &record).unwrap();
        let swapped = "Style: Line1,Arial,48,&H0000FFFF,&H00FFFFFF,";
        assert!(out.starts_with(swapped));
        assert!(out.trim_end().ends_with(",8,0,0,10,1"));
    }

    #[test]
    fn test_missing_style_fields() {
        let cases: [(&str, fn(&mut StyleConfig)); 5] = [
            ("style.font_name", |s| s.font_name = " ".to_string()),
            ("style.font_size_pt", |s| s.font_size_pt = 0),
            ("style.screen_height_px", |s| s.screen_height_px = 0),
            ("style.highlight_color", |s| s.highlight_color.clear()),
            ("style.outline_color", |s| s.outline_color = "black".into()),
        ];
        for (field, breaker) in cases {
            let mut style = StyleConfig::default();
            breaker(&mut style);
            match validate_style(&style) {
                Err(ConvertError::ConfigIncomplete(f)) => assert_eq!(f, field),
                other => panic!("{field}: {other:?}"),
            }
        }
        assert!(validate_style(&StyleConfig::default()).is_ok());
    }
}
