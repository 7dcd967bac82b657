/// Line-oriented diff of `expected` against `actual`: common lines are
/// prefixed with two spaces, removed lines with `- ` and added ones with `+ `.
#[must_use]
pub fn line_diff(expected: &str, actual: &str) -> String {
    let old: Vec<&str> = expected.lines().collect();
    let new: Vec<&str> = actual.lines().collect();
    let table = lcs_table(&old, &new);

    let mut out = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0usize, 0usize);
    while i < old.len() || j < new.len() {
        let old_line = old.get(i).copied();
        let new_line = new.get(j).copied();
        match (old_line, new_line) {
            (Some(left), Some(right)) if left == right => {
                out.push(format!("  {left}"));
                i = i.saturating_add(1);
                j = j.saturating_add(1);
            }
            (Some(left), Some(_)) if cell(&table, i.saturating_add(1), j) >= cell(&table, i, j.saturating_add(1)) => {
                out.push(format!("- {left}"));
                i = i.saturating_add(1);
            }
            (Some(_) | None, Some(right)) => {
                out.push(format!("+ {right}"));
                j = j.saturating_add(1);
            }
            (Some(left), None) => {
                out.push(format!("- {left}"));
                i = i.saturating_add(1);
            }
            (None, None) => break,
        }
    }
    out.join("\n")
}

/// `table[i][j]` holds the LCS length of `old[i..]` and `new[j..]`.
fn lcs_table(old: &[&str], new: &[&str]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; new.len().saturating_add(1)]; old.len().saturating_add(1)];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            let value = if old.get(i) == new.get(j) {
                cell(&table, i.saturating_add(1), j.saturating_add(1)).saturating_add(1)
            } else {
                cell(&table, i.saturating_add(1), j).max(cell(&table, i, j.saturating_add(1)))
            };
            if let Some(slot) = table.get_mut(i).and_then(|row| row.get_mut(j)) {
                *slot = value;
            }
        }
    }
    table
}

fn cell(table: &[Vec<usize>], i: usize, j: usize) -> usize {
    table
        .get(i)
        .and_then(|row| row.get(j))
        .copied()
        .unwrap_or(0)
}
