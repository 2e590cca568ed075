//! Functional groupings of amino acids by side-chain similarity, used for
//! single-substitution neighborhood expansion.
//!
//! Groups (head first): `{H, K, R}`, `{D, E}`, `{C, T, S, N, Q}`, `{F, Y, W}`
//! and `{A, V, M, L, I}`. Members are enumerated in a fixed cyclic order from
//! the group head, so the produced variants are stable across runs.

/// First representative of the residue's functional group, or `None` for
/// ungrouped residues.
pub fn group_head(residue: char) -> Option<char> {
    match residue {
        'H' | 'K' | 'R'             => Some('H'),
        'D' | 'E'                   => Some('D'),
        'C' | 'T' | 'S' | 'N' | 'Q' => Some('C'),
        'F' | 'Y' | 'W'             => Some('F'),
        'A' | 'V' | 'M' | 'L' | 'I' => Some('A'),
        _                           => None,
    }
}

/// Next member within the residue's functional group, or `None` at the end
/// of the chain.
pub fn group_successor(residue: char) -> Option<char> {
    match residue {
        'H' => Some('K'), 'K' => Some('R'),
        'D' => Some('E'),
        'C' => Some('T'), 'T' => Some('S'), 'S' => Some('N'), 'N' => Some('Q'),
        'F' => Some('Y'), 'Y' => Some('W'),
        'A' => Some('V'), 'V' => Some('M'), 'M' => Some('L'), 'L' => Some('I'),
        _   => None,
    }
}

/// Every member of the residue's functional group, head first.
pub fn group_members(residue: char) -> impl Iterator<Item = char> {
    std::iter::successors(group_head(residue), |&member| group_successor(member))
}

/// Every single-residue substitution of `window` under the functional-group
/// rule. One variant per (position, other group member); positions whose
/// residue is ungrouped contribute nothing.
pub fn permute_functional_groups(window: &str) -> Vec<String> {
    let mut permutations = Vec::new();
    for (position, residue) in window.char_indices() {
        for member in group_members(residue).filter(|&member| member != residue) {
            let mut variant = String::from(window);
            variant.replace_range(position..=position, &member.to_string());
            permutations.push(variant);
        }
    }
    permutations
}
