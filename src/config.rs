//! 负责处理编译选项的持久化。

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::converter::types::KaraokeOptions;
use crate::error::Result;

const OPTIONS_FILE: &str = "karaoke_options.json";

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "karaoke_options.json"。
pub fn get_config_file_path(filename: &str) -> std::result::Result<PathBuf, std::io::Error> {
    if let Some(mut config_dir) = dirs::config_dir() {
        config_dir.push("karaoke-helper");
        fs::create_dir_all(&config_dir)?;
        config_dir.push(filename);
        Ok(config_dir)
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "无法找到用户配置目录",
        ))
    }
}

/// 从指定文件加载编译选项，文件不存在时返回默认选项。
///
/// 文件中缺失的字段使用默认值。
pub fn load_options_from(path: &Path) -> Result<KaraokeOptions> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let options: KaraokeOptions = serde_json::from_str(&content)?;
            info!("已从 {} 加载编译选项。", path.display());
            Ok(options)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("编译选项文件不存在，将使用默认选项。");
            Ok(KaraokeOptions::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// 将编译选项序列化为 JSON 并保存到指定文件。
pub fn save_options_to(path: &Path, options: &KaraokeOptions) -> Result<()> {
    let content = serde_json::to_string_pretty(options)?;
    fs::write(path, content)?;
    info!("编译选项已保存到 {}。", path.display());
    Ok(())
}

/// 从用户配置目录加载编译选项。
pub fn load_options() -> Result<KaraokeOptions> {
    load_options_from(&get_config_file_path(OPTIONS_FILE)?)
}

/// 将编译选项保存到用户配置目录。
pub fn save_options(options: &KaraokeOptions) -> Result<()> {
    save_options_to(&get_config_file_path(OPTIONS_FILE)?, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::types::{HighlightLayout, OverlapPolicy};
    use crate::error::KaraokeHelperError;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("karaoke_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = temp_path("missing.json");
        assert_eq!(load_options_from(&path).unwrap(), KaraokeOptions::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let mut options = KaraokeOptions {
            title: "Demo".to_string(),
            layout: HighlightLayout::LineSlots { slots: 4 },
            overlap_policy: OverlapPolicy::Clamp,
            ..Default::default()
        };
        options.window.hold_limit_seconds = Some(2.5);

        save_options_to(&path, &options).unwrap();
        let loaded = load_options_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, options);
    }

    #[test]
    fn test_broken_file_is_a_json_error() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ title: ").unwrap();
        let result = load_options_from(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(KaraokeHelperError::JsonParse(_))));
    }
}
