//! Label similarity for best-effort rename detection.
//!
//! Two labels are aligned by repeatedly taking their longest common block
//! and recursing on the pieces either side of it. The number of characters
//! inside matched blocks, divided by the longer label's length, is the
//! similarity score.

/// Scores at or below this value are never treated as renames.
pub const RENAME_THRESHOLD: f64 = 0.5;

/// Returns the similarity of two labels in `[0.0, 1.0]`.
#[must_use]
pub fn similarity(old: &str, new: &str) -> f64 {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    matching_characters(&a, &b) as f64 / longest as f64
}

/// Returns true if `new` looks like a relabelling of `old`: the labels
/// differ and their similarity is strictly above [`RENAME_THRESHOLD`].
#[must_use]
pub fn is_rename(old: &str, new: &str) -> bool {
    old != new && similarity(old, new) > RENAME_THRESHOLD
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_characters(&a[..i], &b[..j])
        + matching_characters(&a[i + len..], &b[j + len..])
}

/// Longest common block as `(start_in_a, start_in_b, len)`. Ties go to the
/// block starting earliest in `a`, then earliest in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }
    best
}
