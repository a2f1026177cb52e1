//! Internationalization (i18n) support
//!
//! English and Korean labels are built in. A site may override or extend
//! them with `languages/<lang>.yml` files next to its `_config.yml`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_EN: &str = r#"
back_to_list: "← Back to list"
tagged: "Posts tagged %s"
series:
  heading: "%s series"
  show_list: "Show series list"
  hide_list: "Hide list"
  prev: "Previous: %s"
  next: "Next: %s"
terminal:
  label: ">_ Terminal"
  copy: "Copy command"
  copy_all: "Copy all commands"
explorer:
  title: "Project structure"
theme:
  toggle: "Toggle theme"
"#;

const BUILTIN_KO: &str = r#"
back_to_list: "← 목록으로 돌아가기"
tagged: "%s 태그의 글"
series:
  heading: "%s 시리즈"
  show_list: "시리즈 목록 보기"
  hide_list: "목록 접기"
  prev: "이전: %s"
  next: "다음: %s"
terminal:
  label: ">_ Terminal"
  copy: "명령어 복사"
  copy_all: "모든 명령어 복사"
explorer:
  title: "프로젝트 구조"
theme:
  toggle: "테마 전환"
"#;

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler with the built-in languages loaded
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in [("en", BUILTIN_EN), ("ko", BUILTIN_KO)] {
            match serde_yaml::from_str(source) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::error!("Built-in language {} is invalid: {}", lang, e),
            }
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory, merging them over the built-ins
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en")
                .to_string();
            let content = fs::read_to_string(&path)?;

            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let target = self.translations.entry(lang).or_default();
                    for (key, value) in data {
                        merge_value(target.entry(key).or_insert(serde_yaml::Value::Null), value);
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key; nested keys use dots, like "series.prev"
    pub fn get(&self, key: &str) -> String {
        if let Some(value) = self
            .translations
            .get(&self.language)
            .and_then(|data| get_nested_value(data, key))
        {
            return yaml_value_to_string(value);
        }

        // Fallback to English
        if let Some(value) = self
            .translations
            .get("en")
            .and_then(|data| get_nested_value(data, key))
        {
            return yaml_value_to_string(value);
        }

        key.to_string()
    }

    /// Get a translation and substitute `%s` placeholders in order
    pub fn format(&self, key: &str, args: &[&str]) -> String {
        let mut result = self.get(key);
        for arg in args {
            if let Some(pos) = result.find("%s") {
                result.replace_range(pos..pos + 2, arg);
            }
        }
        result
    }

    /// Get all translations for the current language as a flat HashMap
    /// This flattens nested keys using dot notation (e.g., "series.prev")
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();

        if let Some(lang_data) = self.translations.get(&self.language) {
            flatten_translations(lang_data, "", &mut result);
        }

        if self.language != "en" {
            if let Some(en_data) = self.translations.get("en") {
                let mut en_result = HashMap::new();
                flatten_translations(en_data, "", &mut en_result);
                for (k, v) in en_result {
                    result.entry(k).or_insert(v);
                }
            }
        }

        result
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("en")
    }
}

/// Merge `value` into `target`, recursing into mappings
fn merge_value(target: &mut serde_yaml::Value, value: serde_yaml::Value) {
    match (target, value) {
        (serde_yaml::Value::Mapping(target), serde_yaml::Value::Mapping(value)) => {
            for (k, v) in value {
                merge_value(target.entry(k).or_insert(serde_yaml::Value::Null), v);
            }
        }
        (target, value) => *target = value,
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(part);
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {}
            other => {
                result.insert(full_key, yaml_value_to_string(other));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_translations() {
        let en = I18n::new("en");
        assert_eq!(en.get("explorer.title"), "Project structure");
        assert_eq!(en.format("series.prev", &["Intro"]), "Previous: Intro");

        let ko = I18n::new("ko");
        assert_eq!(ko.format("series.heading", &["Rust"]), "Rust 시리즈");
        assert_eq!(ko.get("series.show_list"), "시리즈 목록 보기");
    }

    #[test]
    fn test_fallbacks() {
        let fr = I18n::new("fr");
        assert_eq!(fr.get("series.hide_list"), "Hide list");
        assert_eq!(fr.get("unknown.key"), "unknown.key");
    }

    #[test]
    fn test_load_languages_merges_over_builtins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("en.yml"),
            "series:\n  prev: \"« %s\"\nfooter: Bye\n",
        )
        .unwrap();

        let mut i18n = I18n::new("en");
        i18n.load_languages(dir.path()).unwrap();
        assert_eq!(i18n.format("series.prev", &["A"]), "« A");
        assert_eq!(i18n.get("series.next"), "Next: %s");
        assert_eq!(i18n.get("footer"), "Bye");
    }

    #[test]
    fn test_get_all_translations() {
        let ko = I18n::new("ko");
        let all = ko.get_all_translations();
        assert_eq!(all.get("back_to_list").map(String::as_str), Some("← 목록으로 돌아가기"));
        assert_eq!(all.get("terminal.label").map(String::as_str), Some(">_ Terminal"));
    }
}
