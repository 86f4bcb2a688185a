//! Strict grammar for the engine's Action / FINAL ANSWER directives

use regex::Regex;
use std::sync::OnceLock;

/// What the reasoning engine asked for this turn
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `Action: tool[arg1, arg2, ...]`, dispatch a tool
    Action {
        tool: String,
        raw_args: Vec<String>,
    },

    /// `FINAL ANSWER: payload`, terminate with an answer
    Finish { payload: String },

    /// Neither form recognized; treated as a Thought-only step
    Unparseable,
}

fn action_regex() -> &'static Regex {
    static ACTION_RE: OnceLock<Regex> = OnceLock::new();
    ACTION_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*Action:\s*([A-Za-z_][A-Za-z0-9_]*)\s*\[(.*)\]\s*$").unwrap()
    })
}

fn final_answer_regex() -> &'static Regex {
    static FINAL_RE: OnceLock<Regex> = OnceLock::new();
    FINAL_RE.get_or_init(|| Regex::new(r"(?m)^\s*FINAL ANSWER:\s*(.*?)\s*$").unwrap())
}

/// Parse one engine turn into a directive.
///
/// A `FINAL ANSWER:` marker always wins over an `Action:` line in the same
/// turn: once the engine declares a terminal answer the loop must not
/// dispatch further tools.
pub fn parse(text: &str) -> Directive {
    if let Some(captures) = final_answer_regex().captures(text) {
        let payload = captures[1].trim().to_string();
        if !payload.is_empty() {
            return Directive::Finish { payload };
        }
    }

    if let Some(captures) = action_regex().captures(text) {
        return Directive::Action {
            tool: captures[1].to_string(),
            raw_args: split_args(&captures[2]),
        };
    }

    Directive::Unparseable
}

/// Split a bracketed argument string on top-level commas.
///
/// Double-quoted segments may contain commas; surrounding quotes are
/// stripped from each argument.
fn split_args(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    args.push(current.trim().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_with_positional_args() {
        let directive = parse("Thought: multiply them.\nAction: calculator[7, 6, multiply]");
        assert_eq!(
            directive,
            Directive::Action {
                tool: "calculator".to_string(),
                raw_args: vec!["7".to_string(), "6".to_string(), "multiply".to_string()],
            }
        );
    }

    #[test]
    fn parses_action_with_no_args() {
        let directive = parse("Action: wiki_search[]");
        assert_eq!(
            directive,
            Directive::Action {
                tool: "wiki_search".to_string(),
                raw_args: Vec::new(),
            }
        );
    }

    #[test]
    fn quoted_argument_may_contain_commas() {
        let directive = parse(r#"Action: web_search["Paris, France population", wikipedia.org]"#);
        assert_eq!(
            directive,
            Directive::Action {
                tool: "web_search".to_string(),
                raw_args: vec![
                    "Paris, France population".to_string(),
                    "wikipedia.org".to_string()
                ],
            }
        );
    }

    #[test]
    fn parses_final_answer() {
        let directive = parse("Thought: I have it now.\nFINAL ANSWER: 42");
        assert_eq!(
            directive,
            Directive::Finish {
                payload: "42".to_string()
            }
        );
    }

    #[test]
    fn final_answer_wins_over_action() {
        let directive = parse("Action: calculator[1, 2, add]\nFINAL ANSWER: 3");
        assert!(matches!(directive, Directive::Finish { .. }));
    }

    #[test]
    fn empty_final_answer_is_unparseable() {
        assert_eq!(parse("FINAL ANSWER: "), Directive::Unparseable);
    }

    #[test]
    fn nonconforming_text_is_unparseable() {
        assert_eq!(parse("I think the answer might be 42?"), Directive::Unparseable);
        assert_eq!(parse("Action calculator(7, 6)"), Directive::Unparseable);
        assert_eq!(parse("action: calculator[7, 6, multiply]"), Directive::Unparseable);
    }

    #[test]
    fn action_must_close_its_bracket() {
        assert_eq!(parse("Action: calculator[7, 6, multiply"), Directive::Unparseable);
    }
}
