//! Code block highlighting
//!
//! Highlighting emits class-based markup (`<span class="hljs-keyword ...">`)
//! rather than inline colors, so the look of a page is decided by a
//! stylesheet. [`theme_css`] produces that stylesheet for a syntect theme.

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Class naming used for highlighted tokens
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Fence tags with no bundled grammar of their own, mapped to the syntect
/// token of the closest bundled grammar. Looked up before syntect's own
/// extension and name matching.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("typescript", "js"),
    ("ts", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("mjs", "js"),
    ("dockerfile", "bash"),
    ("docker", "bash"),
    ("shell", "bash"),
    ("console", "bash"),
    ("shellsession", "bash"),
    ("zsh", "bash"),
    ("golang", "go"),
    ("graphql", "txt"),
    ("gql", "txt"),
    ("nginx", "txt"),
    ("ini", "txt"),
    ("toml", "txt"),
    ("plaintext", "txt"),
    ("text", "txt"),
];

/// Highlighting errors
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("failed to highlight {language} block: {source}")]
    Syntax {
        language: String,
        #[source]
        source: syntect::Error,
    },

    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),

    #[error("failed to build stylesheet: {0}")]
    Stylesheet(#[source] syntect::Error),
}

/// Output of a highlighting hook for one code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// Language the block was highlighted as
    pub language: String,
    /// Highlighted inner markup, already HTML-escaped
    pub html: String,
}

/// Per-code-block highlighting hook
///
/// `lang` is the tag written after the opening fence, if any. Implementations
/// pick a grammar for it (or a fallback) and report which one they used.
pub trait Highlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> Result<Highlighted, HighlightError>;
}

/// Highlighter backed by syntect's bundled grammars
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    fallback_language: String,
}

impl SyntectHighlighter {
    /// Create a highlighter falling back to `plaintext`
    pub fn new() -> Self {
        Self::with_fallback("plaintext")
    }

    /// Create a highlighter with a custom fallback language name
    pub fn with_fallback(fallback_language: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            fallback_language: fallback_language.to_string(),
        }
    }

    /// Whether `lang` names a grammar this highlighter knows
    pub fn recognizes(&self, lang: &str) -> bool {
        self.find_syntax(lang).is_some()
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        if lang.is_empty() {
            return None;
        }
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(lang))
            .map_or(lang, |(_, token)| *token);
        self.syntax_set.find_syntax_by_token(token)
    }

    fn resolve(&self, lang: Option<&str>) -> (String, &SyntaxReference) {
        match lang.and_then(|l| self.find_syntax(l).map(|s| (l, s))) {
            Some((lang, syntax)) => (lang.to_string(), syntax),
            None => (
                self.fallback_language.clone(),
                self.syntax_set.find_syntax_plain_text(),
            ),
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> Result<Highlighted, HighlightError> {
        let (language, syntax) = self.resolve(lang);

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|source| HighlightError::Syntax {
                    language: language.clone(),
                    source,
                })?;
        }

        Ok(Highlighted {
            language,
            html: generator.finalize(),
        })
    }
}

/// Build the stylesheet matching [`CLASS_STYLE`] for a bundled syntect theme
pub fn theme_css(theme_name: &str) -> Result<String, HighlightError> {
    let theme_set = ThemeSet::load_defaults();
    let theme = theme_set
        .themes
        .get(theme_name)
        .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;

    css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(HighlightError::Stylesheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_keeps_tag() {
        let highlighter = SyntectHighlighter::new();
        let out = highlighter
            .highlight("fmt.Println(\"hi\")\n", Some("go"))
            .unwrap();
        assert_eq!(out.language, "go");
        assert!(out.html.contains("hljs-string"));
    }

    #[test]
    fn test_unknown_or_missing_language_falls_back() {
        let highlighter = SyntectHighlighter::new();
        let unknown = highlighter
            .highlight("some text\n", Some("no-such-language"))
            .unwrap();
        assert_eq!(unknown.language, "plaintext");

        let missing = highlighter.highlight("some text\n", None).unwrap();
        assert_eq!(missing.language, "plaintext");

        let empty = highlighter.highlight("some text\n", Some("")).unwrap();
        assert_eq!(empty.language, "plaintext");
    }

    #[test]
    fn test_custom_fallback_name() {
        let highlighter = SyntectHighlighter::with_fallback("text");
        let out = highlighter.highlight("x\n", None).unwrap();
        assert_eq!(out.language, "text");
    }

    #[test]
    fn test_highlighted_markup_is_escaped() {
        let highlighter = SyntectHighlighter::new();
        let out = highlighter.highlight("<b>&</b>\n", None).unwrap();
        assert!(out.html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!out.html.contains("<b>"));
    }

    #[test]
    fn test_recognizes() {
        let highlighter = SyntectHighlighter::new();
        assert!(highlighter.recognizes("rust"));
        assert!(highlighter.recognizes("go"));
        assert!(highlighter.recognizes("yaml"));
        assert!(!highlighter.recognizes("no-such-language"));
    }

    #[test]
    fn test_aliased_languages_keep_tag_and_get_grammar() {
        let highlighter = SyntectHighlighter::new();

        let ts = highlighter
            .highlight("const x: number = 1;\n", Some("typescript"))
            .unwrap();
        assert_eq!(ts.language, "typescript");
        assert!(ts.html.contains("hljs-js"));

        let docker = highlighter
            .highlight("RUN npm install\n", Some("Dockerfile"))
            .unwrap();
        assert_eq!(docker.language, "Dockerfile");
        assert!(docker.html.contains("hljs-shell"));

        for tag in ["ts", "shell", "graphql", "zsh", "golang"] {
            assert!(highlighter.recognizes(tag), "{} should be recognized", tag);
        }
    }

    #[test]
    fn test_theme_css() {
        let css = theme_css("base16-ocean.dark").unwrap();
        assert!(css.contains(".hljs-"));
        assert!(matches!(
            theme_css("missing-theme"),
            Err(HighlightError::UnknownTheme(_))
        ));
    }
}
