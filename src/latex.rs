//! Pattern-based LaTeX stripping.
//!
//! The source is never parsed. Each stage is an ordered list of regexes applied
//! one after another, so nested environments of the same name end at the first
//! matching `\end`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Environments dropped wholesale, markers included.
pub const IGNORED_ENVIRONMENTS: &[&str] = &[
    "figure", "table", "equation", "align", "itemize", "enumerate",
    "thebibliography", "bibliography", "abstract", "quote", "verse",
];

/// Commands dropped together with a `{...}` or `[...]` argument when present.
pub const IGNORED_COMMANDS: &[&str] = &[
    "chapter", "section", "subsection", "subsubsection", "paragraph",
    "footnote", "footcite", "cite", "ref", "label", "caption",
    "includegraphics", "url", "href", "textbf", "textit", "emph",
    "underline", "textsuperscript", "textsubscript", "newline",
    "vspace", "hspace", "centering", "raggedright", "raggedleft",
    "makeatletter", "makeatother", "newcommand", "renewcommand",
    "usepackage", "documentclass", "begin", "end", "input", "include",
    "bibliographystyle", "bibliography", "graphicspath", "frontmatter",
    "mainmatter", "backmatter", "tableofcontents", "listoffigures",
    "listoftables", "makecover", "addcontentsline",
];

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|[^\\])%.*$").unwrap());

static ENVIRONMENT_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    IGNORED_ENVIRONMENTS
        .iter()
        .map(|env| {
            let env = regex::escape(env);
            Regex::new(&format!(r"(?s)\\begin\s*\{{{env}\}}.*?\\end\s*\{{{env}\}}")).unwrap()
        })
        .collect()
});
static ANY_ENVIRONMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\s*\{[^}]*\}.*?\\end\s*\{[^}]*\}").unwrap());

/// Per command: braced argument, bracketed argument, bare.
static COMMAND_RES: Lazy<Vec<[Regex; 3]>> = Lazy::new(|| {
    IGNORED_COMMANDS
        .iter()
        .map(|cmd| {
            let cmd = regex::escape(cmd);
            [
                Regex::new(&format!(r"\\{cmd}\s*\{{[^}}]*\}}")).unwrap(),
                Regex::new(&format!(r"\\{cmd}\s*\[[^\]]*\]")).unwrap(),
                Regex::new(&format!(r"\\{cmd}\b")).unwrap(),
            ]
        })
        .collect()
});
static ANY_COMMAND_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\\[a-zA-Z]+\s*\{[^}]*\}").unwrap(),
        Regex::new(r"\\[a-zA-Z]+\s*\[[^\]]*\]").unwrap(),
        Regex::new(r"\\[a-zA-Z]+\b").unwrap(),
    ]
});

static ESCAPED_BRACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[{}]").unwrap());
static ESCAPED_ACCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\\[~^"]"#).unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Delete everything from an unescaped `%` to end of line.
pub fn remove_comments(content: &str) -> String {
    COMMENT_RE.replace_all(content, "$1").into_owned()
}

pub fn remove_environments(content: &str) -> String {
    let mut out = content.to_string();
    for re in ENVIRONMENT_RES.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    ANY_ENVIRONMENT_RE.replace_all(&out, "").into_owned()
}

pub fn remove_commands(content: &str) -> String {
    let mut out = content.to_string();
    for patterns in COMMAND_RES.iter().chain(std::iter::once(&*ANY_COMMAND_RES)) {
        for re in patterns {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    out
}

/// Drop `\{` `\}`; turn `\~` `\^` `\"` into a space so neighbouring words stay apart.
pub fn remove_escapes(content: &str) -> String {
    let no_braces = ESCAPED_BRACE_RE.replace_all(content, "");
    ESCAPED_ACCENT_RE.replace_all(&no_braces, " ").into_owned()
}

pub fn normalize_whitespace(content: &str) -> String {
    WHITESPACE_RE.replace_all(content, " ").trim().to_string()
}

/// Full stripping chain: comments, environments, commands, escapes, whitespace.
pub fn strip_markup(content: &str) -> String {
    let out = remove_comments(content);
    let out = remove_environments(&out);
    let out = remove_commands(&out);
    let out = remove_escapes(&out);
    normalize_whitespace(&out)
}
