//! # Destination Tree Printer
//!
//! File: cli/src/commands/blueprint/tree.rs
//!
//! Renders a set of `/`-separated relative paths as a directory tree:
//!
//! ```text
//! ./
//! ├── app
//! │   └── modules
//! │       └── foo-bar.js
//! └── tests
//!     └── unit
//!         └── foo-bar-test.js
//! ```
//!
//! Directories sort before files at each level, both alphabetically.
//!
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

const TEE: &str = "├── ";
const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const SPACER: &str = "    ";

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

impl Node {
    fn insert(&mut self, path: &str) {
        let mut node = self;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The tree for `paths` under a `root_label` line. Directory names are bold when `color`.
pub fn render_path_tree<'a>(root_label: &str, paths: impl IntoIterator<Item = &'a str>, color: bool) -> String {
    let mut root = Node::default();
    for path in paths {
        root.insert(path);
    }

    let mut out = String::new();
    let label = format!("{}/", root_label);
    let _ = writeln!(out, "{}", if color { label.bold().to_string() } else { label });
    walk(&root, &mut String::new(), color, &mut out);
    out
}

fn walk(node: &Node, prefix: &mut String, color: bool, out: &mut String) {
    let mut entries: Vec<(&String, &Node)> = node.children.iter().collect();
    entries.sort_by_key(|(name, child)| (!child.is_dir(), name.as_str()));

    let count = entries.len();
    for (index, (name, child)) in entries.into_iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { ELBOW } else { TEE };
        let shown = if color && child.is_dir() {
            name.bold().to_string()
        } else {
            name.clone()
        };
        let _ = writeln!(out, "{}{}{}", prefix, connector, shown);

        if child.is_dir() {
            let segment = if last { SPACER } else { PIPE };
            prefix.push_str(segment);
            walk(child, prefix, color, out);
            prefix.truncate(prefix.len() - segment.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_path_tree_layout() {
        let tree = render_path_tree(
            ".",
            ["tests/unit/foo-bar-test.js", "app/modules/foo-bar.js", "README.md"],
            false,
        );
        let expected = "\
./
├── app
│   └── modules
│       └── foo-bar.js
├── tests
│   └── unit
│       └── foo-bar-test.js
└── README.md
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_render_path_tree_empty() {
        assert_eq!(render_path_tree("out", std::iter::empty(), false), "out/\n");
    }
}
