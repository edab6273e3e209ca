/// Returns the indices of lines that differ between two frames.
///
/// Lines are compared index-wise up to the longer frame; an index present in
/// only one frame counts as changed.
#[must_use]
pub fn diff_lines(previous: &str, next: &str) -> Vec<usize> {
    if previous == next {
        return Vec::new();
    }

    let previous: Vec<&str> = previous.split('\n').collect();
    let next: Vec<&str> = next.split('\n').collect();
    let len = previous.len().max(next.len());

    (0..len)
        .filter(|&idx| previous.get(idx) != next.get(idx))
        .collect()
}
