//! Terminal-style blocks for shell commands and their output

use serde::Deserialize;

use crate::helpers::{class_list, html_escape};
use crate::i18n::I18n;

const COPY_ICON: &str = r#"<svg class="icon copy-icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect x="9" y="9" width="13" height="13" rx="2" ry="2"></rect><path d="M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1"></path></svg>"#;

const CHECK_ICON: &str = r#"<svg class="icon check-icon" viewBox="0 0 20 20" fill="currentColor"><path fill-rule="evenodd" d="M16.707 5.293a1 1 0 010 1.414l-8 8a1 1 0 01-1.414 0l-4-4a1 1 0 011.414-1.414L8 12.586l7.293-7.293a1 1 0 011.414 0z" clip-rule="evenodd"/></svg>"#;

/// Script shared by every copy button on a page
pub const COPY_SCRIPT: &str = r#"<script>
document.addEventListener('click', function (event) {
  var button = event.target.closest('[data-copy]');
  if (!button || !navigator.clipboard) return;
  navigator.clipboard.writeText(button.getAttribute('data-copy')).then(function () {
    button.classList.add('copied');
    setTimeout(function () { button.classList.remove('copied'); }, 2000);
  }, function (err) {
    console.error('Failed to copy: ', err);
  });
});
</script>"#;

/// A single command and the output it printed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandOutput {
    pub command: String,
    #[serde(default)]
    pub output: Option<String>,
}

/// A terminal window around free-form content
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    pub body: String,
    /// Render with the output palette and no copy button
    pub output: bool,
    pub command_to_copy: Option<String>,
    pub class: String,
}

/// Several commands with their outputs in one terminal window
#[derive(Debug, Clone, Default)]
pub struct TerminalSession {
    pub commands: Vec<CommandOutput>,
    pub class: String,
}

/// Split a command line into the program and its arguments
pub fn split_command(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

fn copy_button(text: &str, title: &str) -> String {
    format!(
        r#"<button class="copy-button" type="button" data-copy="{}" title="{}">{}{}</button>"#,
        preformatted(text),
        html_escape(title),
        COPY_ICON,
        CHECK_ICON
    )
}

fn header(i18n: &I18n, button: Option<String>) -> String {
    format!(
        r#"<div class="terminal-header"><span class="terminal-label">{}</span>{}</div>"#,
        html_escape(&i18n.get("terminal.label")),
        button.unwrap_or_default()
    )
}

/// Escape text shown in a `pre-wrap` body; newlines become character
/// references so the fragment never contains blank lines
fn preformatted(text: &str) -> String {
    html_escape(text).replace('\n', "&#10;")
}

fn render_command(command: &str) -> String {
    let (program, args) = split_command(command);
    let mut line = format!(
        r#"<span class="terminal-command">{}</span>"#,
        html_escape(program)
    );
    if !args.is_empty() {
        line.push_str(&format!(
            r#"<span class="terminal-args"> {}</span>"#,
            html_escape(args)
        ));
    }
    line
}

impl Terminal {
    pub fn render(&self, i18n: &I18n) -> String {
        let palette = if self.output {
            "terminal terminal-output"
        } else {
            "terminal"
        };
        let button = match (&self.command_to_copy, self.output) {
            (Some(command), false) => Some(copy_button(command, &i18n.get("terminal.copy"))),
            _ => None,
        };

        format!(
            "<div class=\"{}\">\n{}\n<div class=\"terminal-body\">{}</div>\n</div>",
            class_list(palette, &self.class),
            header(i18n, button),
            preformatted(&self.body)
        )
    }
}

impl TerminalSession {
    /// Commands joined by newlines, as placed on the clipboard
    pub fn clipboard_text(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.command.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self, i18n: &I18n) -> String {
        let button = copy_button(&self.clipboard_text(), &i18n.get("terminal.copy_all"));

        let mut body = String::new();
        for item in &self.commands {
            body.push_str(&format!(
                "<div class=\"terminal-line\">{}</div>",
                render_command(&item.command)
            ));
            if let Some(output) = item.output.as_deref().filter(|o| !o.is_empty()) {
                body.push_str(&format!(
                    "<div class=\"terminal-result\">{}</div>",
                    preformatted(output)
                ));
            }
        }

        format!(
            "<div class=\"{}\">\n{}\n<div class=\"terminal-body\">{}</div>\n</div>",
            class_list("terminal", &self.class),
            header(i18n, Some(button)),
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("cargo build --release"), ("cargo", "build --release"));
        assert_eq!(split_command("ls"), ("ls", ""));
        assert_eq!(split_command(""), ("", ""));
        assert_eq!(split_command("echo  two"), ("echo", " two"));
    }

    #[test]
    fn test_terminal_copy_button() {
        let i18n = I18n::new("en");
        let terminal = Terminal {
            body: "npm install".to_string(),
            command_to_copy: Some("npm install".to_string()),
            ..Default::default()
        };
        let html = terminal.render(&i18n);
        assert!(html.contains(r#"data-copy="npm install""#));
        assert!(html.contains("&gt;_ Terminal"));
        assert!(html.contains(r#"title="Copy command""#));
        assert!(!html.contains("terminal-output"));
    }

    #[test]
    fn test_output_terminal_has_no_copy_button() {
        let terminal = Terminal {
            body: "added 12 packages".to_string(),
            output: true,
            command_to_copy: Some("npm install".to_string()),
            class: "wide".to_string(),
        };
        let html = terminal.render(&I18n::new("en"));
        assert!(html.contains(r#"class="terminal terminal-output wide""#));
        assert!(!html.contains("data-copy"));
    }

    #[test]
    fn test_session_render() {
        let session = TerminalSession {
            commands: vec![
                CommandOutput {
                    command: "git status".to_string(),
                    output: Some("nothing to commit".to_string()),
                },
                CommandOutput {
                    command: "git push origin main".to_string(),
                    output: None,
                },
            ],
            class: String::new(),
        };
        assert_eq!(session.clipboard_text(), "git status\ngit push origin main");

        let html = session.render(&I18n::new("ko"));
        assert!(html.contains(r#"data-copy="git status&#10;git push origin main""#));
        assert!(html.contains(r#"<span class="terminal-command">git</span><span class="terminal-args"> push origin main</span>"#));
        assert!(html.contains(r#"<div class="terminal-result">nothing to commit</div>"#));
        assert_eq!(html.matches("terminal-result").count(), 1);
        assert!(html.contains("모든 명령어 복사"));
    }

    #[test]
    fn test_session_output_keeps_blank_lines() {
        let session = TerminalSession {
            commands: vec![
                CommandOutput {
                    command: "ls".to_string(),
                    output: Some("a\n\nb".to_string()),
                },
                CommandOutput {
                    command: "pwd".to_string(),
                    output: None,
                },
            ],
            class: String::new(),
        };
        let html = session.render(&I18n::new("en"));
        assert!(html.contains(r#"<div class="terminal-result">a&#10;&#10;b</div>"#));

        // Nothing but markup sits between the lines of the pre-wrap body
        let body_start = html.find(r#"<div class="terminal-body">"#).unwrap();
        let body_end = html.rfind("\n</div>").unwrap();
        assert!(!html[body_start..body_end].contains('\n'));
    }

    #[test]
    fn test_terminal_body_newlines_are_encoded() {
        let terminal = Terminal {
            body: "one\n\ntwo".to_string(),
            ..Default::default()
        };
        let html = terminal.render(&I18n::new("en"));
        assert!(html.contains(r#"<div class="terminal-body">one&#10;&#10;two</div>"#));
    }
}
