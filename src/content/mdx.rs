//! MDX support: ESM lines are dropped and widget tags become raw HTML
//!
//! Only block-level widget tags are recognized, i.e. tags that start a line.
//! Fenced and indented code is copied through untouched, so documentation
//! about the widgets can quote them freely.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::i18n::I18n;
use crate::widgets::{file_tree, parse_structure, CommandOutput, Terminal, TerminalSession, TreeError};

lazy_static! {
    // Four columns of indentation would make an indented code block
    static ref WIDGET_START: Regex =
        Regex::new(r"^ {0,3}<(ProjectExplorer|TerminalSession|Terminal)(?:[\s/>]|$)").unwrap();
    static ref ESM_LINE: Regex = Regex::new(
        r#"^(?:import\s+(?:[\w*{][^'"]*\bfrom\s*['"]|['"]|\{)|export\s+(?:const|let|var|function|default|async|\{|\*))"#
    )
    .unwrap();
    static ref FENCE_OPEN: Regex = Regex::new(r"^[ \t]{0,3}(`{3,}|~{3,})").unwrap();
    static ref TRAILING_COMMA: Regex = Regex::new(r",(\s*[\]}])").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MdxError {
    #[error("line {line}: <{tag}> is not terminated")]
    Unterminated { tag: String, line: usize },
    #[error("line {line}: bad attribute in <{tag}>: {reason}")]
    BadAttribute {
        tag: String,
        line: usize,
        reason: String,
    },
    #[error("line {line}: <{tag}> requires the `{name}` attribute")]
    MissingAttribute {
        tag: String,
        line: usize,
        name: &'static str,
    },
    #[error("line {line}: invalid commands in <TerminalSession>: {reason}")]
    InvalidCommands { line: usize, reason: String },
    #[error("line {line}: invalid structure in <ProjectExplorer>: {source}")]
    InvalidStructure {
        line: usize,
        #[source]
        source: TreeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrValue {
    /// Quoted string, template literal or string expression
    Text(String),
    /// Any other `{...}` expression, kept raw
    Expr(String),
    /// Attribute written without a value
    Flag,
}

#[derive(Debug)]
struct WidgetTag {
    name: String,
    attrs: Vec<(String, AttrValue)>,
    body: Option<String>,
    line: usize,
}

impl WidgetTag {
    fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn text(&self, name: &str) -> Option<String> {
        match self.attr(name)? {
            AttrValue::Text(s) | AttrValue::Expr(s) => Some(s.clone()),
            AttrValue::Flag => None,
        }
    }

    fn flag(&self, name: &str) -> bool {
        match self.attr(name) {
            Some(AttrValue::Flag) => true,
            Some(AttrValue::Text(s)) | Some(AttrValue::Expr(s)) => s.trim() != "false",
            None => false,
        }
    }

    fn required(&self, name: &'static str) -> Result<&AttrValue, MdxError> {
        self.attr(name).ok_or_else(|| MdxError::MissingAttribute {
            tag: self.name.clone(),
            line: self.line,
            name,
        })
    }
}

/// Expand widget tags and drop ESM statements from an MDX body
pub fn expand(source: &str, i18n: &I18n) -> Result<String, MdxError> {
    let mut out = String::with_capacity(source.len());
    let mut fence: Option<&str> = None;
    let mut esm_depth: Option<i64> = None;
    let mut line_no = 1;
    let mut pos = 0;

    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(source.len());
        let line = &source[pos..line_end];

        if let Some(marker) = fence {
            out.push_str(line);
            if closes_fence(line, marker) {
                fence = None;
            }
        } else if let Some(depth) = esm_depth {
            let depth = depth + brace_delta(line);
            esm_depth = (depth > 0).then_some(depth);
        } else if let Some(caps) = FENCE_OPEN.captures(line) {
            fence = caps.get(1).map(|m| m.as_str());
            out.push_str(line);
        } else if ESM_LINE.is_match(line) {
            let depth = brace_delta(line);
            esm_depth = (depth > 0).then_some(depth);
        } else if WIDGET_START.is_match(line) {
            let tag_start = pos + line.find('<').unwrap_or(0);
            let (tag, tag_end) = parse_tag(source, tag_start, line_no)?;
            let html = render_widget(&tag, i18n)?;

            if !out.is_empty() && !out.ends_with("\n\n") {
                out.push('\n');
            }
            out.push_str(&compact(&html));
            out.push_str("\n\n");

            // Resume after the tag; a blank remainder of its line and one
            // following blank line are already covered by the separator above
            let mut next = skip_blank_line(source, tag_end);
            if next != tag_end {
                next = skip_blank_line(source, next);
            }
            line_no += source[pos..next].matches('\n').count();
            pos = next;
            continue;
        } else {
            out.push_str(line);
        }

        if line.ends_with('\n') {
            line_no += 1;
        }
        pos = line_end;
    }

    Ok(out)
}

/// Offset past the line starting at `at` if it is blank, else `at`
fn skip_blank_line(source: &str, at: usize) -> usize {
    let line_end = source[at..]
        .find('\n')
        .map(|i| at + i + 1)
        .unwrap_or(source.len());
    if at < source.len() && source[at..line_end].trim().is_empty() {
        line_end
    } else {
        at
    }
}

fn closes_fence(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    let ch = marker.chars().next().unwrap_or('`');
    trimmed.len() >= marker.len() && trimmed.chars().all(|c| c == ch)
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Remove blank lines so the fragment stays a single markdown HTML block
fn compact(html: &str) -> String {
    html.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSX text rules: trim every line, drop empty ones, join with spaces
fn jsx_text(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_widget(tag: &WidgetTag, i18n: &I18n) -> Result<String, MdxError> {
    match tag.name.as_str() {
        "ProjectExplorer" => {
            let structure = match tag.required("structure")? {
                AttrValue::Text(s) | AttrValue::Expr(s) => s,
                AttrValue::Flag => {
                    return Err(MdxError::BadAttribute {
                        tag: tag.name.clone(),
                        line: tag.line,
                        reason: "`structure` needs a value".to_string(),
                    })
                }
            };
            let tree = parse_structure(structure).map_err(|source| MdxError::InvalidStructure {
                line: tag.line,
                source,
            })?;
            Ok(file_tree::render(&tree, tag.text("title").as_deref(), i18n))
        }
        "Terminal" => {
            let terminal = Terminal {
                body: tag.body.as_deref().map(jsx_text).unwrap_or_default(),
                output: tag.flag("output"),
                command_to_copy: tag.text("commandToCopy"),
                class: tag.text("className").unwrap_or_default(),
            };
            Ok(terminal.render(i18n))
        }
        "TerminalSession" => {
            let raw = match tag.required("commands")? {
                AttrValue::Expr(raw) => raw,
                _ => {
                    return Err(MdxError::BadAttribute {
                        tag: tag.name.clone(),
                        line: tag.line,
                        reason: "`commands` must be an array expression".to_string(),
                    })
                }
            };
            let session = TerminalSession {
                commands: parse_commands(raw, tag.line)?,
                class: tag.text("className").unwrap_or_default(),
            };
            Ok(session.render(i18n))
        }
        other => Err(MdxError::BadAttribute {
            tag: other.to_string(),
            line: tag.line,
            reason: "unknown widget".to_string(),
        }),
    }
}

/// Read a `[{ command: "...", output: "..." }]` literal as a YAML flow sequence
fn parse_commands(raw: &str, line: usize) -> Result<Vec<CommandOutput>, MdxError> {
    let cleaned = TRAILING_COMMA.replace_all(raw, "$1");
    let commands: Vec<CommandOutput> =
        serde_yaml::from_str(&cleaned).map_err(|e| MdxError::InvalidCommands {
            line,
            reason: e.to_string(),
        })?;

    if let Some(index) = commands.iter().position(|c| c.command.trim().is_empty()) {
        return Err(MdxError::InvalidCommands {
            line,
            reason: format!("entry {} has an empty `command`", index + 1),
        });
    }
    Ok(commands)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    tag: String,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn unterminated(&self) -> MdxError {
        MdxError::Unterminated {
            tag: self.tag.clone(),
            line: self.line,
        }
    }

    fn bad(&self, reason: impl Into<String>) -> MdxError {
        MdxError::BadAttribute {
            tag: self.tag.clone(),
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Read up to the closing `quote`; the opening one is already consumed
    fn quoted(&mut self, quote: char) -> Result<String, MdxError> {
        let mut value = String::new();
        loop {
            match self.bump().ok_or_else(|| self.unterminated())? {
                '\\' => match self.bump().ok_or_else(|| self.unterminated())? {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    escaped => value.push(escaped),
                },
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
    }

    /// Read a `{...}` expression body; the opening brace is already consumed
    fn expression(&mut self) -> Result<String, MdxError> {
        let start = self.pos;
        let mut depth = 1;
        loop {
            let at = self.pos;
            match self.bump().ok_or_else(|| self.unterminated())? {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.src[start..at].trim().to_string());
                    }
                }
                q @ ('"' | '\'' | '`') => {
                    self.quoted(q)?;
                }
                _ => {}
            }
        }
    }

    fn value(&mut self) -> Result<AttrValue, MdxError> {
        match self.bump().ok_or_else(|| self.unterminated())? {
            q @ ('"' | '\'') => Ok(AttrValue::Text(self.quoted(q)?)),
            '{' => {
                self.skip_whitespace();
                match self.peek() {
                    Some(q @ ('"' | '\'' | '`')) => {
                        self.bump();
                        let text = self.quoted(q)?;
                        self.skip_whitespace();
                        match self.bump() {
                            Some('}') => Ok(AttrValue::Text(text)),
                            Some(_) => Err(self.bad("expected `}` after string value")),
                            None => Err(self.unterminated()),
                        }
                    }
                    _ => Ok(AttrValue::Expr(self.expression()?)),
                }
            }
            other => Err(self.bad(format!("unexpected `{}` in attribute value", other))),
        }
    }
}

/// Parse a widget tag starting at `start` (the `<`); returns the tag and the
/// byte offset just past it, including any body and closing tag
fn parse_tag(src: &str, start: usize, line: usize) -> Result<(WidgetTag, usize), MdxError> {
    let mut scanner = Scanner {
        src,
        pos: start + 1,
        tag: String::new(),
        line,
    };
    let name = scanner.take_while(|c| c.is_ascii_alphanumeric()).to_string();
    scanner.tag = name.clone();

    let mut attrs = Vec::new();
    let self_closing = loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => return Err(scanner.unterminated()),
            Some('/') => {
                scanner.bump();
                match scanner.bump() {
                    Some('>') => break true,
                    Some(_) => return Err(scanner.bad("expected `>` after `/`")),
                    None => return Err(scanner.unterminated()),
                }
            }
            Some('>') => {
                scanner.bump();
                break false;
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let attr = scanner
                    .take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                    .to_string();
                scanner.skip_whitespace();
                let value = if scanner.peek() == Some('=') {
                    scanner.bump();
                    scanner.skip_whitespace();
                    scanner.value()?
                } else {
                    AttrValue::Flag
                };
                attrs.push((attr, value));
            }
            Some(other) => return Err(scanner.bad(format!("unexpected `{}`", other))),
        }
    };

    let (body, end) = if self_closing {
        (None, scanner.pos)
    } else {
        let closing = format!("</{}>", name);
        let offset = src[scanner.pos..]
            .find(&closing)
            .ok_or_else(|| scanner.unterminated())?;
        let body_end = scanner.pos + offset;
        (
            Some(src[scanner.pos..body_end].to_string()),
            body_end + closing.len(),
        )
    };

    Ok((
        WidgetTag {
            name,
            attrs,
            body,
            line,
        },
        end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> I18n {
        I18n::new("en")
    }

    #[test]
    fn test_plain_markdown_is_unchanged() {
        let source = "# Title\n\nSome *text* with <b>inline</b> html.\n";
        assert_eq!(expand(source, &en()).unwrap(), source);
    }

    #[test]
    fn test_esm_lines_are_dropped() {
        let source = "import Terminal from '../components/Terminal'\nimport {\n  TerminalSession,\n} from '../components/Terminal'\nexport const meta = { draft: true }\n\n# Hello\n\nimport this sentence stays.\n";
        let out = expand(source, &en()).unwrap();
        assert_eq!(out, "\n# Hello\n\nimport this sentence stays.\n");
    }

    #[test]
    fn test_project_explorer_expands() {
        let source = "Layout:\n\n<ProjectExplorer\n  title=\"Workspace\"\n  structure={`\nmy-app/\n  src/\n    main.rs\n  Cargo.toml\n`}\n/>\n\nDone.\n";
        let out = expand(source, &en()).unwrap();
        assert!(out.starts_with("Layout:\n\n<div class=\"project-explorer\">"));
        assert!(out.contains("Workspace"));
        assert!(out.contains(r#"<span class="node-name">main.rs</span>"#));
        assert!(out.ends_with("</div>\n\nDone.\n"));
    }

    #[test]
    fn test_terminal_with_body() {
        let source = "<Terminal commandToCopy=\"cargo new hello\">\n  cargo new hello\n</Terminal>\n";
        let out = expand(source, &en()).unwrap();
        assert!(out.contains(r#"data-copy="cargo new hello""#));
        assert!(out.contains(r#"<div class="terminal-body">cargo new hello</div>"#));
    }

    #[test]
    fn test_terminal_output_flag() {
        let source = "<Terminal output>\n  Created binary (application) `hello` package\n</Terminal>\n";
        let out = expand(source, &en()).unwrap();
        assert!(out.contains("terminal-output"));
        assert!(!out.contains("data-copy"));
    }

    #[test]
    fn test_terminal_session() {
        let source = r#"<TerminalSession commands={[
  { command: "go mod init example.com/hello", output: "go: creating new go.mod" },
  { command: "go run ." },
]} />
"#;
        let out = expand(source, &en()).unwrap();
        assert!(out.contains(r#"<span class="terminal-command">go</span><span class="terminal-args"> mod init example.com/hello</span>"#));
        assert!(out.contains("go: creating new go.mod"));
        assert!(out.contains(r#"data-copy="go mod init example.com/hello&#10;go run .""#));
    }

    #[test]
    fn test_widgets_inside_code_fences_are_kept() {
        let source = "```mdx\n<Terminal output>\nx\n</Terminal>\n```\n";
        assert_eq!(expand(source, &en()).unwrap(), source);
    }

    #[test]
    fn test_widget_html_has_no_blank_lines() {
        let source = "<Terminal>\n\n  a\n\n  b\n\n</Terminal>\n";
        let out = expand(source, &en()).unwrap();
        let widget = out.trim_end();
        assert!(!widget.lines().any(|l| l.trim().is_empty()));
        assert!(widget.contains("a b"));
    }

    #[test]
    fn test_unterminated_tag_is_error() {
        let source = "Intro\n\n<Terminal output>\nnever closed\n";
        assert_eq!(
            expand(source, &en()),
            Err(MdxError::Unterminated {
                tag: "Terminal".to_string(),
                line: 3
            })
        );
    }

    #[test]
    fn test_missing_structure_is_error() {
        let err = expand("<ProjectExplorer title=\"x\" />\n", &en()).unwrap_err();
        assert!(matches!(err, MdxError::MissingAttribute { name: "structure", .. }));
    }

    #[test]
    fn test_empty_structure_is_error() {
        let err = expand("<ProjectExplorer structure={`  `} />\n", &en()).unwrap_err();
        assert!(matches!(
            err,
            MdxError::InvalidStructure {
                source: TreeError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_commands_is_error() {
        let err = expand("<TerminalSession commands={[ { command: } ]} />\n", &en()).unwrap_err();
        assert!(matches!(err, MdxError::InvalidCommands { line: 1, .. }));
    }

    #[test]
    fn test_blank_command_is_error() {
        let source = "<TerminalSession commands={[\n  { command: \"ls\" },\n  { command: \"  \", output: \"x\" },\n]} />\n";
        let err = expand(source, &en()).unwrap_err();
        match err {
            MdxError::InvalidCommands { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("entry 2"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_session_output_blank_lines_survive() {
        let source = "<TerminalSession commands={[{ command: \"ls\", output: \"a\\n\\nb\" }]} />\n";
        let out = expand(source, &en()).unwrap();
        assert!(out.contains(r#"<div class="terminal-result">a&#10;&#10;b</div>"#));
    }

    #[test]
    fn test_indented_code_block_is_kept() {
        let source = "Example:\n\n    <Terminal>\n    ls\n    </Terminal>\n";
        assert_eq!(expand(source, &en()).unwrap(), source);

        let shallow = expand("   <Terminal>\nls\n</Terminal>\n", &en()).unwrap();
        assert!(shallow.contains(r#"<div class="terminal-body">ls</div>"#));
    }

    #[test]
    fn test_line_numbers_follow_expanded_widgets() {
        let source = "<Terminal>\nok\n</Terminal>\n\n<Terminal output>\n";
        let err = expand(source, &en()).unwrap_err();
        assert_eq!(
            err,
            MdxError::Unterminated {
                tag: "Terminal".to_string(),
                line: 5
            }
        );
    }
}
