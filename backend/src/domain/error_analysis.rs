//! Error debugging prompt and labelled-section extraction.
//!
//! The debug prompt asks the model for up to five fenced sections. Each one is
//! independently optional in the reply; only `can_patch` is coerced, to a
//! boolean that defaults to `false`.

use serde::Serialize;

use super::fenced::{FencedBlocks, scan_sections};

/// Closed vocabulary of sections requested by the debug prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSection {
    /// What the error means.
    Explanation,
    /// Likely cause.
    Cause,
    /// Steps to fix.
    Solution,
    /// Replacement code for the named file.
    CodeFix,
    /// Whether the fix is safe to apply automatically.
    CanPatch,
}

impl AnalysisSection {
    /// Parse a fence label; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "explanation" => Some(Self::Explanation),
            "cause" => Some(Self::Cause),
            "solution" => Some(Self::Solution),
            "code_fix" => Some(Self::CodeFix),
            "can_patch" => Some(Self::CanPatch),
            _ => None,
        }
    }
}

/// Input for one debugging request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorReport {
    /// The pasted error message.
    pub message: String,
    /// Optional surrounding context.
    pub context: Option<String>,
    /// Optional path of the file that raised the error.
    pub file: Option<String>,
}

/// Build the debugging prompt for `report`.
///
/// `code_fix` and `can_patch` are only requested when a file is named.
pub fn build_debug_prompt(report: &ErrorReport) -> String {
    let mut prompt = String::from(
        "You are an expert WordPress and PHP developer. I need you to analyze this error message and provide a detailed explanation and solution.\n\n",
    );
    prompt.push_str(&format!("ERROR MESSAGE:\n{}\n\n", report.message.trim()));
    if let Some(context) = non_blank(report.context.as_deref()) {
        prompt.push_str(&format!("ADDITIONAL CONTEXT:\n{context}\n\n"));
    }
    let file = non_blank(report.file.as_deref());
    if let Some(file) = file {
        prompt.push_str(&format!("FILE PATH: {file}\n\n"));
    }

    prompt.push_str("Please provide your analysis in the following format:\n\n");
    prompt.push_str("```explanation\nA clear explanation of what the error means in plain English.\n```\n\n");
    prompt.push_str("```cause\nThe likely cause of the error.\n```\n\n");
    prompt.push_str("```solution\nStep-by-step instructions on how to fix the error.\n```\n\n");
    if file.is_some() {
        prompt.push_str("```code_fix\n// Provide the corrected code here if possible\n```\n\n");
        prompt.push_str(
            "```can_patch\ntrue or false depending on whether this can be safely patched automatically\n```\n\n",
        );
    }
    prompt.push_str("Be thorough in your explanation but use plain language that a developer with basic WordPress knowledge would understand. If you can provide a code fix, make sure it follows WordPress coding standards and best practices.");
    prompt
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sections extracted from one reply.
///
/// # Examples
/// ```
/// use devassist::domain::ErrorAnalysis;
///
/// let analysis = ErrorAnalysis::from_reply("```cause\nTypo\n```\n```can_patch\n TRUE \n```");
/// assert_eq!(analysis.cause.as_deref(), Some("Typo"));
/// assert!(analysis.explanation.is_none());
/// assert!(analysis.can_patch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorAnalysis {
    /// What the error means.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Likely cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Steps to fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    /// Replacement code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_fix: Option<String>,
    /// Safe to auto-patch; `false` unless the section says `true`.
    pub can_patch: bool,
    #[serde(skip)]
    found: usize,
}

impl ErrorAnalysis {
    /// Extract sections from a reply, last occurrence of a label winning.
    pub fn from_reply(reply: &str) -> Self {
        let mut sections = FencedBlocks::default();
        for (label, payload) in scan_sections(reply) {
            if let Some(section) = AnalysisSection::from_label(&label) {
                sections.insert(section, payload);
            }
        }
        let take = |section| sections.get(&section).cloned();
        Self {
            explanation: take(AnalysisSection::Explanation),
            cause: take(AnalysisSection::Cause),
            solution: take(AnalysisSection::Solution),
            code_fix: take(AnalysisSection::CodeFix),
            can_patch: sections
                .get(&AnalysisSection::CanPatch)
                .is_some_and(|payload| parse_can_patch(payload)),
            found: sections.len(),
        }
    }

    /// Number of recognised sections in the reply.
    pub fn section_count(&self) -> usize {
        self.found
    }

    /// Render the prose sections as minimal HTML.
    pub fn html(&self) -> AnalysisHtml {
        AnalysisHtml {
            explanation: self.explanation.as_deref().map(prose_to_html),
            cause: self.cause.as_deref().map(prose_to_html),
            solution: self.solution.as_deref().map(prose_to_html),
        }
    }
}

/// HTML renditions of the prose sections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisHtml {
    /// Rendered explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Rendered cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Rendered solution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// `true` only for a case-insensitive, trimmed `"true"`.
pub fn parse_can_patch(payload: &str) -> bool {
    payload.trim().eq_ignore_ascii_case("true")
}

/// Escape, then wrap paragraphs in `<p>`, single breaks in `<br>`, and
/// backtick spans in `<code>`.
fn prose_to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let paragraphs = format!("<p>{}</p>", escaped.replace("\n\n", "</p><p>"));
    let with_breaks = paragraphs.replace('\n', "<br>");
    wrap_code_spans(&with_breaks)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn wrap_code_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut parts = text.split('`');
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    let rest: Vec<&str> = parts.collect();
    let mut chunks = rest.chunks_exact(2);
    for pair in chunks.by_ref() {
        if let [code, after] = pair {
            out.push_str("<code>");
            out.push_str(code);
            out.push_str("</code>");
            out.push_str(after);
        }
    }
    if let [dangling] = chunks.remainder() {
        out.push('`');
        out.push_str(dangling);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FULL_REPLY: &str = "\
```explanation
PHP hit an undefined function.
```

```cause
The plugin calls `foo()` before it is loaded.
```

```solution
1. Load the file.
2. Retry.
```

```code_fix
<?php
require_once __DIR__ . '/foo.php';
```

```can_patch
true
```";

    #[rstest]
    fn extracts_all_five_sections() {
        let analysis = ErrorAnalysis::from_reply(FULL_REPLY);
        assert_eq!(analysis.explanation.as_deref(), Some("PHP hit an undefined function."));
        assert_eq!(
            analysis.cause.as_deref(),
            Some("The plugin calls `foo()` before it is loaded.")
        );
        assert_eq!(analysis.solution.as_deref(), Some("1. Load the file.\n2. Retry."));
        assert_eq!(
            analysis.code_fix.as_deref(),
            Some("<?php\nrequire_once __DIR__ . '/foo.php';")
        );
        assert!(analysis.can_patch);
        assert_eq!(analysis.section_count(), 5);
    }

    #[rstest]
    #[case("true", true)]
    #[case("  TRUE \n", true)]
    #[case("True", true)]
    #[case("false", false)]
    #[case("yes", false)]
    #[case("true, probably", false)]
    #[case("", false)]
    fn coerces_can_patch(#[case] payload: &str, #[case] expected: bool) {
        assert_eq!(parse_can_patch(payload), expected);
    }

    #[rstest]
    fn missing_sections_stay_absent() {
        let analysis = ErrorAnalysis::from_reply("```solution\nRestart.\n```");
        assert!(analysis.explanation.is_none());
        assert!(analysis.cause.is_none());
        assert!(analysis.code_fix.is_none());
        assert!(!analysis.can_patch);
        assert_eq!(analysis.section_count(), 1);
    }

    #[rstest]
    fn unknown_labels_are_ignored_and_duplicates_overwrite() {
        let reply = "```php\necho 1;\n```\n```cause\nfirst\n```\n```cause\nsecond\n```";
        let analysis = ErrorAnalysis::from_reply(reply);
        assert_eq!(analysis.cause.as_deref(), Some("second"));
        assert_eq!(analysis.section_count(), 1);
    }

    #[rstest]
    fn renders_prose_as_escaped_html() {
        let analysis = ErrorAnalysis {
            cause: Some("Call `foo<T>()` first.\nThen retry.\n\nDone & dusted.".to_owned()),
            ..ErrorAnalysis::default()
        };
        let html = analysis.html();
        assert_eq!(
            html.cause.as_deref(),
            Some("<p>Call <code>foo&lt;T&gt;()</code> first.<br>Then retry.</p><p>Done &amp; dusted.</p>")
        );
        assert!(html.explanation.is_none());
    }

    #[rstest]
    fn keeps_unbalanced_backticks_literal() {
        assert_eq!(wrap_code_spans("a `b` c `d"), "a <code>b</code> c `d");
    }

    #[rstest]
    fn requests_fix_sections_only_with_a_file() {
        let without = build_debug_prompt(&ErrorReport {
            message: "Fatal error".to_owned(),
            ..ErrorReport::default()
        });
        assert!(without.contains("ERROR MESSAGE:\nFatal error\n\n"));
        assert!(!without.contains("```code_fix"));
        assert!(!without.contains("FILE PATH"));

        let with = build_debug_prompt(&ErrorReport {
            message: "Fatal error".to_owned(),
            context: Some("after update".to_owned()),
            file: Some("/srv/site/functions.php".to_owned()),
        });
        assert!(with.contains("ADDITIONAL CONTEXT:\nafter update\n\n"));
        assert!(with.contains("FILE PATH: /srv/site/functions.php\n\n"));
        assert!(with.contains("```code_fix"));
        assert!(with.contains("```can_patch"));
    }
}
