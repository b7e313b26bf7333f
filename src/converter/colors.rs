//! 颜色名称到 ASS 颜色代码的静态查找表。
//!
//! 编译器本身只接受已经解析好的颜色代码，
//! 用户输入的颜色名称应在构造 [`StyleConfig`](crate::converter::types::StyleConfig) 之前通过本模块解析。

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;

/// 支持按名称引用的颜色。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum NamedColor {
    White,
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Gray,
    Orange,
    Pink,
    Purple,
    Brown,
    Lime,
    #[strum(to_string = "Light Blue", serialize = "LightBlue")]
    LightBlue,
    #[strum(to_string = "Dark Blue", serialize = "DarkBlue")]
    DarkBlue,
    #[strum(to_string = "Light Green", serialize = "LightGreen")]
    LightGreen,
    #[strum(to_string = "Dark Green", serialize = "DarkGreen")]
    DarkGreen,
    #[strum(to_string = "Light Red", serialize = "LightRed")]
    LightRed,
    #[strum(to_string = "Dark Red", serialize = "DarkRed")]
    DarkRed,
    #[strum(to_string = "Light Gray", serialize = "LightGray")]
    LightGray,
    #[strum(to_string = "Dark Gray", serialize = "DarkGray")]
    DarkGray,
    Gold,
    Silver,
    Beige,
    Maroon,
    Olive,
    Navy,
    Teal,
    Turquoise,
    Violet,
    Indigo,
    Coral,
}

impl NamedColor {
    /// 返回该颜色的 ASS 代码 (`&HAABBGGRR`)。
    #[must_use]
    pub fn ass_code(self) -> &'static str {
        match self {
            Self::White => "&H00FFFFFF",
            Self::Black => "&H00000000",
            Self::Red => "&H000000FF",
            Self::Green => "&H0000FF00",
            Self::Blue => "&H00FF0000",
            Self::Yellow => "&H0000FFFF",
            Self::Cyan => "&H00FFFF00",
            Self::Magenta => "&H00FF00FF",
            Self::Gray => "&H00808080",
            Self::Orange => "&H0000A5FF",
            Self::Pink => "&H00CBC0FF",
            Self::Purple => "&H00A020F0",
            Self::Brown => "&H002A2AA5",
            Self::Lime => "&H0000FF80",
            Self::LightBlue => "&H00FF8080",
            Self::DarkBlue => "&H008B0000",
            Self::LightGreen => "&H0090EE90",
            Self::DarkGreen => "&H00006400",
            Self::LightRed => "&H008080FF",
            Self::DarkRed => "&H0000008B",
            Self::LightGray => "&H00D3D3D3",
            Self::DarkGray => "&H00404040",
            Self::Gold => "&H0000D7FF",
            Self::Silver => "&H00C0C0C0",
            Self::Beige => "&H00DCF5F5",
            Self::Maroon => "&H00000080",
            Self::Olive => "&H00008080",
            Self::Navy => "&H00800000",
            Self::Teal => "&H00808000",
            Self::Turquoise => "&H00D0E040",
            Self::Violet => "&H00EE82EE",
            Self::Indigo => "&H004B0082",
            Self::Coral => "&H00507FFF",
        }
    }

    /// 所有可用颜色的显示名称，可用于前端的下拉列表。
    pub fn names() -> Vec<String> {
        Self::iter().map(|c| c.to_string()).collect()
    }
}

/// 判断字符串是否为 `&H` 加 8 位十六进制数的 ASS 颜色代码。
#[must_use]
pub fn is_valid_ass_color(color: &str) -> bool {
    color.len() == 10
        && color.starts_with("&H")
        && color[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// 将用户输入的颜色解析为 ASS 颜色代码。
///
/// 合法的颜色代码原样返回；否则按名称（忽略大小写）查找；
/// 都失败时返回 `fallback`。
pub fn resolve_color(input: &str, fallback: &str) -> String {
    let trimmed = input.trim();
    if is_valid_ass_color(trimmed) {
        return trimmed.to_string();
    }
    match trimmed.parse::<NamedColor>() {
        Ok(named) => named.ass_code().to_string(),
        Err(_) => {
            warn!("未知的颜色 '{}'，将使用 {}", input, fallback);
            fallback.to_string()
        }
    }
}
