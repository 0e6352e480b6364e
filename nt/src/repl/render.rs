//! Terminal rendering of markdown answers
//!
//! Line-oriented: headings, lists, quotes, rules and fenced code get styled;
//! inline `code` and **bold** spans are highlighted. Anything else passes
//! through unchanged.

use colored::Colorize;

const RULE_WIDTH: usize = 70;

/// Render markdown for the terminal
pub fn render_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut in_code = false;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            if in_code {
                let lang = trimmed.trim_start_matches('`').trim();
                if !lang.is_empty() {
                    out.push_str(&format!("{}\n", format!("[{}]", lang).dimmed()));
                }
            }
            continue;
        }

        if in_code {
            out.push_str(&format!("    {}\n", line.yellow()));
            continue;
        }

        out.push_str(&render_line(line, trimmed));
        out.push('\n');
    }

    out
}

fn render_line(line: &str, trimmed: &str) -> String {
    if let Some((level, title)) = heading(trimmed) {
        let title = render_inline(title);
        return match level {
            1 => title.bright_cyan().bold().underline().to_string(),
            2 => title.bright_cyan().bold().to_string(),
            _ => title.cyan().bold().to_string(),
        };
    }

    if is_rule(trimmed) {
        return "─".repeat(RULE_WIDTH).dimmed().to_string();
    }

    if let Some(quote) = trimmed.strip_prefix("> ") {
        return format!("{} {}", "│".dimmed(), render_inline(quote).italic());
    }

    let indent = &line[..line.len() - trimmed.len()];
    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return format!("{}{} {}", indent, "•".bright_green(), render_inline(item));
    }

    if let Some((number, item)) = numbered(trimmed) {
        return format!("{}{} {}", indent, format!("{}.", number).bright_green(), render_inline(item));
    }

    render_inline(line)
}

/// `## Title` -> (2, "Title")
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|title| (level, title.trim()))
}

fn is_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && (line.chars().all(|c| c == '-') || line.chars().all(|c| c == '*'))
}

/// `12. Item` -> ("12", "Item")
fn numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(|rest| (&line[..digits], rest))
}

/// Highlight `code` and **bold** spans
fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let next_code = rest.find('`');
        let next_bold = rest.find("**");

        match (next_code, next_bold) {
            (Some(c), b) if b.is_none_or(|b| c < b) => {
                let after = &rest[c + 1..];
                match after.find('`') {
                    Some(end) => {
                        out.push_str(&rest[..c]);
                        out.push_str(&after[..end].yellow().to_string());
                        rest = &after[end + 1..];
                    }
                    None => {
                        out.push_str(rest);
                        break;
                    }
                }
            }
            (_, Some(b)) => {
                let after = &rest[b + 2..];
                match after.find("**") {
                    Some(end) => {
                        out.push_str(&rest[..b]);
                        out.push_str(&after[..end].bold().to_string());
                        rest = &after[end + 2..];
                    }
                    None => {
                        out.push_str(rest);
                        break;
                    }
                }
            }
            _ => {
                out.push_str(rest);
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> String {
        colored::control::set_override(false);
        render_markdown(text)
    }

    #[test]
    fn test_headings_lose_hashes() {
        assert_eq!(plain("# Module 1\n### Part"), "Module 1\nPart\n");
        assert_eq!(plain("#hashtag"), "#hashtag\n");
    }

    #[test]
    fn test_lists_and_rules() {
        assert_eq!(plain("- one\n  * two\n3. three"), "• one\n  • two\n3. three\n");
        assert_eq!(plain("---"), format!("{}\n", "─".repeat(RULE_WIDTH)));
    }

    #[test]
    fn test_inline_spans() {
        assert_eq!(plain("run `cargo` **now**"), "run cargo now\n");
        assert_eq!(plain("unclosed `tick"), "unclosed `tick\n");
        assert_eq!(plain("2 ** 3"), "2 ** 3\n");
    }

    #[test]
    fn test_code_block_is_indented_verbatim() {
        let out = plain("```python\nprint('**hi**')\n```\nafter");
        assert_eq!(out, "[python]\n    print('**hi**')\nafter\n");
    }

    #[test]
    fn test_quote() {
        assert_eq!(plain("> tip"), "│ tip\n");
    }
}
