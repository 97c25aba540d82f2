//! Import block normalization.
//!
//! Only parenthesized `import ( ... )` blocks whose every non-blank line is a
//! single import spec are rewritten. Anything else (standalone comments, raw
//! string paths, block comments) leaves the block as written.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Line;

static SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:(?P<name>[\p{L}_][\p{L}\p{N}_]*|\.)\s+)?"(?P<path>[^"\\\s]+)"\s*(?P<comment>//.*)?$"#)
        .expect("import spec regex must compile")
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportSpec {
    name: Option<String>,
    path: String,
    comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Std,
    ThirdParty,
    Local,
}

fn group_of(path: &str, local_prefixes: &[String]) -> Group {
    let is_local = local_prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .any(|p| path.starts_with(p.as_str()) || p.trim_end_matches('/') == path);
    if is_local {
        return Group::Local;
    }
    let first = path.split('/').next().unwrap_or_default();
    if first.contains('.') {
        Group::ThirdParty
    } else {
        Group::Std
    }
}

fn opens_block(line: &Line) -> bool {
    !line.verbatim && matches!(line.text.as_str(), "import (" | "import(")
}

fn closes_block(line: &Line) -> bool {
    !line.verbatim && line.text.trim() == ")"
}

fn parse_spec(line: &str) -> Option<ImportSpec> {
    let caps = SPEC_RE.captures(line)?;
    Some(ImportSpec {
        name: caps.name("name").map(|m| m.as_str().to_string()),
        path: caps["path"].to_string(),
        comment: caps.name("comment").map(|m| m.as_str().trim_end().to_string()),
    })
}

/// Parse the body of a block, or `None` if it holds anything but specs.
fn parse_block(body: &[Line]) -> Option<Vec<ImportSpec>> {
    let mut specs = Vec::new();
    for line in body {
        if line.verbatim {
            return None;
        }
        if line.is_blank() {
            continue;
        }
        specs.push(parse_spec(&line.text)?);
    }
    Some(specs)
}

fn render_block(specs: Vec<ImportSpec>, local_prefixes: &[String]) -> Vec<Line> {
    let mut seen = HashSet::new();
    let mut specs: Vec<(Group, ImportSpec)> = specs
        .into_iter()
        .filter(|s| seen.insert((s.name.clone(), s.path.clone())))
        .map(|s| (group_of(&s.path, local_prefixes), s))
        .collect();
    specs.sort_by(|(ga, a), (gb, b)| {
        ga.cmp(gb)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut out = Vec::with_capacity(specs.len() + 2);
    let mut previous: Option<Group> = None;
    for (group, spec) in specs {
        if previous.is_some_and(|g| g != group) {
            out.push(Line::code(""));
        }
        previous = Some(group);

        let mut text = String::from("\t");
        if let Some(name) = &spec.name {
            text.push_str(name);
            text.push(' ');
        }
        text.push('"');
        text.push_str(&spec.path);
        text.push('"');
        if let Some(comment) = &spec.comment {
            text.push(' ');
            text.push_str(comment);
        }
        out.push(Line::code(text));
    }
    out
}

/// Rewrite every eligible import block in `lines`.
pub(crate) fn sort_import_blocks(lines: &mut Vec<Line>, local_prefixes: &[String]) {
    let mut i = 0;
    while i < lines.len() {
        if !opens_block(&lines[i]) {
            i += 1;
            continue;
        }
        let Some(close) = lines[i + 1..]
            .iter()
            .position(closes_block)
            .map(|offset| i + 1 + offset)
        else {
            return;
        };

        match parse_block(&lines[i + 1..close]) {
            Some(specs) if !specs.is_empty() => {
                let body = render_block(specs, local_prefixes);
                let len = body.len();
                lines[i] = Line::code("import (");
                lines.splice(i + 1..close, body);
                i += len + 2;
            }
            _ => i = close + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<Line> {
        text.lines().map(Line::code).collect()
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn parse_spec_with_alias_and_comment() {
        let spec = parse_spec("\tpkgerr \"github.com/pkg/errors\" // wrapped").unwrap();
        assert_eq!(spec.name.as_deref(), Some("pkgerr"));
        assert_eq!(spec.path, "github.com/pkg/errors");
        assert_eq!(spec.comment.as_deref(), Some("// wrapped"));
    }

    #[test]
    fn parse_spec_blank_and_dot_imports() {
        assert_eq!(parse_spec("\t_ \"embed\"").unwrap().name.as_deref(), Some("_"));
        assert_eq!(parse_spec("\t. \"math\"").unwrap().name.as_deref(), Some("."));
        assert!(parse_spec("\t// comment").is_none());
        assert!(parse_spec("\t`fmt`").is_none());
    }

    #[test]
    fn groups_by_first_path_element() {
        let local = vec!["example.com/me/".to_string()];
        assert_eq!(group_of("net/http", &local), Group::Std);
        assert_eq!(group_of("golang.org/x/tools", &local), Group::ThirdParty);
        assert_eq!(group_of("example.com/me/pkg", &local), Group::Local);
        assert_eq!(group_of("example.com/me", &local), Group::Local);
    }

    #[test]
    fn duplicates_are_removed() {
        let mut l = lines("import (\n\t\"os\"\n\t\"os\"\n\tx \"os\"\n)");
        sort_import_blocks(&mut l, &[]);
        assert_eq!(texts(&l), vec!["import (", "\t\"os\"", "\tx \"os\"", ")"]);
    }

    #[test]
    fn block_with_standalone_comment_is_untouched() {
        let src = "import (\n\t\"os\"\n\t// keep me here\n\t\"fmt\"\n)";
        let mut l = lines(src);
        sort_import_blocks(&mut l, &[]);
        assert_eq!(texts(&l), src.lines().collect::<Vec<_>>());
    }

    #[test]
    fn every_block_is_processed() {
        let mut l = lines("import (\n\t\"os\"\n\t\"fmt\"\n)\nimport(\n\t\"b.io/x\"\n\t\"a.io/x\"\n)\nvar x = 1");
        sort_import_blocks(&mut l, &[]);
        assert_eq!(
            texts(&l),
            vec![
                "import (", "\t\"fmt\"", "\t\"os\"", ")", "import (", "\t\"a.io/x\"", "\t\"b.io/x\"",
                ")", "var x = 1"
            ]
        );
    }

    #[test]
    fn unclosed_block_is_left_alone() {
        let mut l = lines("import (\n\t\"os\"\n\t\"fmt\"");
        sort_import_blocks(&mut l, &[]);
        assert_eq!(texts(&l), vec!["import (", "\t\"os\"", "\t\"fmt\""]);
    }
}
