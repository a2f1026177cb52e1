//! Light/dark theme toggle

use crate::config::ThemeMode;
use crate::helpers::html_escape;
use crate::i18n::I18n;

/// Key under which the chosen theme is persisted in `localStorage`
pub const STORAGE_KEY: &str = "theme";

/// Script for `<head>` that applies the stored theme before first paint
pub fn init_script(default: ThemeMode) -> String {
    format!(
        r#"<script>
(function () {{
  var theme = localStorage.getItem('{key}') || '{default}';
  if (theme === 'dark') document.documentElement.classList.add('dark');
}})();
</script>"#,
        key = STORAGE_KEY,
        default = default.as_str()
    )
}

const ARIA_LABEL: &str = "Toggle theme";

/// The toggle button plus the click handler that flips and persists the theme
///
/// Both icons are emitted; the stylesheet shows 🌙 in light mode and ☀️ in
/// dark mode based on the `dark` class on `<html>`. The accessible name stays
/// "Toggle theme" in every language; the localized label is the tooltip.
pub fn render(i18n: &I18n) -> String {
    format!(
        r#"<button class="theme-toggle" type="button" aria-label="{aria}" title="{label}" onclick="toggleTheme()"><span class="icon-light">🌙</span><span class="icon-dark">☀️</span></button>
<script>
function toggleTheme() {{
  var dark = document.documentElement.classList.toggle('dark');
  localStorage.setItem('{key}', dark ? 'dark' : 'light');
}}
</script>"#,
        label = html_escape(&i18n.get("theme.toggle")),
        key = STORAGE_KEY,
        aria = ARIA_LABEL
    )
}
