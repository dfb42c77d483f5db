//! Line diff between the original and modified buffers, shaped for the
//! two-pane view: one row per diff line, with the original on the left and
//! the rewrite on the right.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBySideRow {
    pub kind: RowKind,
    /// Original pane cell: line number and text. `None` for inserted lines.
    pub left: Option<(usize, String)>,
    /// Modified pane cell. `None` for deleted lines.
    pub right: Option<(usize, String)>,
}

pub fn side_by_side_rows(original: &str, modified: &str) -> Vec<SideBySideRow> {
    let old_lines = collect_lines(original);
    let new_lines = collect_lines(modified);
    let lcs = lcs_matrix(&old_lines, &new_lines);

    let mut rows = Vec::with_capacity(old_lines.len() + new_lines.len());
    let mut old_index = 0usize;
    let mut new_index = 0usize;

    while old_index < old_lines.len() && new_index < new_lines.len() {
        if old_lines[old_index] == new_lines[new_index] {
            rows.push(SideBySideRow {
                kind: RowKind::Equal,
                left: Some((old_index + 1, old_lines[old_index].to_string())),
                right: Some((new_index + 1, new_lines[new_index].to_string())),
            });
            old_index += 1;
            new_index += 1;
        } else if lcs[old_index + 1][new_index] >= lcs[old_index][new_index + 1] {
            rows.push(SideBySideRow {
                kind: RowKind::Delete,
                left: Some((old_index + 1, old_lines[old_index].to_string())),
                right: None,
            });
            old_index += 1;
        } else {
            rows.push(SideBySideRow {
                kind: RowKind::Insert,
                left: None,
                right: Some((new_index + 1, new_lines[new_index].to_string())),
            });
            new_index += 1;
        }
    }

    while old_index < old_lines.len() {
        rows.push(SideBySideRow {
            kind: RowKind::Delete,
            left: Some((old_index + 1, old_lines[old_index].to_string())),
            right: None,
        });
        old_index += 1;
    }

    while new_index < new_lines.len() {
        rows.push(SideBySideRow {
            kind: RowKind::Insert,
            left: None,
            right: Some((new_index + 1, new_lines[new_index].to_string())),
        });
        new_index += 1;
    }

    rows
}

fn collect_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.lines().collect()
    }
}

fn lcs_matrix(old_lines: &[&str], new_lines: &[&str]) -> Vec<Vec<usize>> {
    let mut lcs = vec![vec![0usize; new_lines.len() + 1]; old_lines.len() + 1];

    for old_index in (0..old_lines.len()).rev() {
        for new_index in (0..new_lines.len()).rev() {
            lcs[old_index][new_index] = if old_lines[old_index] == new_lines[new_index] {
                lcs[old_index + 1][new_index + 1] + 1
            } else {
                lcs[old_index + 1][new_index].max(lcs[old_index][new_index + 1])
            };
        }
    }

    lcs
}
