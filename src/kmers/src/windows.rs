/// Placeholder residue. Windows containing it are excluded from tagging, as
/// they pollute coverage.
pub const PLACEHOLDER: char = 'X';

/// Number of contiguous windows of `window_size` (step 1) within a sequence
/// of `length` residues: `max(0, length - window_size + 1)`.
pub fn num_windows(length: usize, window_size: usize) -> usize {
    (length + 1).saturating_sub(window_size)
}

/// Every contiguous window of `window_size` residues, step 1, left to right.
pub fn windows(residues: &str, window_size: usize) -> impl Iterator<Item = &str> {
    (0..num_windows(residues.len(), window_size))
        .map(move |start| &residues[start..start + window_size])
}

/// Location tag uniquely naming one window occurrence: `{name}_{start}_{end}`
/// with a 0-based `start` and exclusive `end`.
pub fn location_tag(name: &str, start: usize, end: usize) -> String {
    format!("{name}_{start}_{end}")
}
