use thesis_tools::latex::{normalize_whitespace, remove_comments, remove_environments};
use thesis_tools::strip_markup;

#[test]
fn plain_prose_only_loses_extra_whitespace() {
    let prose = "Hello   world,\n  again here.";
    assert_eq!(strip_markup(prose), "Hello world, again here.");
    assert_eq!(strip_markup(&strip_markup(prose)), strip_markup(prose));
}

#[test]
fn table_block_is_removed_with_its_markers() {
    let tex = "Before \\begin{table}\n a & b \\\\\n c & d\n\\end{table} after";
    assert_eq!(strip_markup(tex), "Before after");
    assert_eq!(strip_markup("\\begin{table}anything\\end{table}"), "");
}

#[test]
fn unknown_environment_is_removed_by_catch_all() {
    assert_eq!(strip_markup("x \\begin{tikzpicture} draw \\end{tikzpicture} y"), "x y");
}

#[test]
fn nested_same_name_block_ends_at_first_end() {
    let tex = "a \\begin{itemize} \\begin{itemize} x \\end{itemize} y \\end{itemize} b";
    assert_eq!(remove_environments(tex), "a  y \\end{itemize} b");
    assert_eq!(strip_markup(tex), "a y b");
}

#[test]
fn comments_are_removed_but_escaped_percent_is_kept() {
    assert_eq!(remove_comments("text % comment\nmore"), "text \nmore");
    assert_eq!(strip_markup("text % comment\nmore"), "text more");
    assert_eq!(strip_markup("50\\% done % note"), "50\\% done");
}

#[test]
fn known_commands_are_removed_with_arguments() {
    let tex = "\\textbf{bold} text \\section{Intro} more \\newline end \\vspace[2em] fin";
    assert_eq!(strip_markup(tex), "text more end fin");
}

#[test]
fn unknown_commands_are_removed_by_catch_all() {
    assert_eq!(strip_markup("\\foo{bar} baz \\qux[opt] z \\zap w"), "baz z w");
}

#[test]
fn escaped_braces_and_accents_are_cleaned() {
    assert_eq!(strip_markup("a\\{b\\}c"), "abc");
    assert_eq!(strip_markup("na\\\"ive caf\\^e"), "na ive caf e");
}

#[test]
fn whitespace_is_collapsed_and_trimmed() {
    assert_eq!(normalize_whitespace("  a \n\n\t b  "), "a b");
    assert_eq!(strip_markup(""), "");
}
