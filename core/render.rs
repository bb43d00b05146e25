use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Path header, `---` delimiters, numbered body.
    #[default]
    Default,
    /// Indexed `<document>` blocks suitable for Claude.
    Xml,
    /// Fenced code blocks tagged with the file extension.
    Markdown,
}

/// Prepends 1-based line numbers, right-aligned to the width of the
/// largest line number in the content.
pub fn numbered(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the whole prompt document: tree header first, then one block
/// per file in the given order. `files` carry paths relative to the
/// project root the tree was built from.
pub fn render_document(files: &[(PathBuf, String)], tree: &str, format: OutputFormat) -> String {
    let mut out = String::new();
    out.push_str("Project Structure:\n```\n");
    out.push_str(tree);
    out.push_str("\n```\n\n");

    if format == OutputFormat::Xml {
        out.push_str("<documents>\n");
    }
    for (index, (path, content)) in files.iter().enumerate() {
        match format {
            OutputFormat::Default => default_block(&mut out, path, content),
            OutputFormat::Xml => xml_block(&mut out, path, content, index + 1),
            OutputFormat::Markdown => markdown_block(&mut out, path, content),
        }
        out.push('\n');
    }
    if format == OutputFormat::Xml {
        out.push_str("</documents>");
    }
    out
}

fn default_block(out: &mut String, path: &Path, content: &str) {
    let _ = write!(out, "{}\n---\n{}\n---\n", path.display(), numbered(content));
}

fn xml_block(out: &mut String, path: &Path, content: &str, index: usize) {
    let _ = write!(
        out,
        "<document index=\"{}\">\n<source>{}</source>\n<document_content>",
        index,
        path.display()
    );
    out.push_str(&escape_xml(&numbered(content)));
    out.push_str("</document_content>\n</document>");
}

fn markdown_block(out: &mut String, path: &Path, content: &str) {
    let lang = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    // Grow the fence until it cannot collide with the file's own content.
    let mut fence = "```".to_string();
    while content.contains(&fence) {
        fence.push('`');
    }
    let _ = write!(
        out,
        "{}\n{}{}\n{}\n{}\n",
        path.display(),
        fence,
        lang,
        numbered(content),
        fence
    );
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Default)]
struct TreeNode(BTreeMap<String, TreeNode>);

/// Renders the selected relative paths as a box-drawing directory tree
/// headed by `root_name`.
pub fn render_tree(rel_paths: &[PathBuf], root_name: &str) -> String {
    let mut root = TreeNode::default();
    for path in rel_paths {
        let mut node = &mut root;
        for comp in path.components() {
            if let Component::Normal(name) = comp {
                node = node.0.entry(name.to_string_lossy().into_owned()).or_default();
            }
        }
    }
    let mut out = format!("{}/\n", root_name);
    push_tree_lines(&root, "", &mut out);
    out
}

fn push_tree_lines(node: &TreeNode, prefix: &str, out: &mut String) {
    let count = node.0.len();
    for (i, (name, child)) in node.0.iter().enumerate() {
        let last = i + 1 == count;
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(name);
        out.push('\n');
        if !child.0.is_empty() {
            let extension = if last { "    " } else { "│   " };
            push_tree_lines(child, &format!("{prefix}{extension}"), out);
        }
    }
}
