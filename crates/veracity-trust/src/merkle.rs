//! Merkle root over an ordered list of hashes

use veracity_domain::ContentHasher;

/// Compute the Merkle root of `leaves`
///
/// - empty input: `hash("")`
/// - one leaf: the leaf itself
/// - otherwise leaves are paired left to right, an odd last leaf is paired
///   with itself, each pair becomes `hash(left + right)`, and the level is
///   reduced until one hash remains
pub fn merkle_root<H: ContentHasher + ?Sized>(hasher: &H, leaves: &[String]) -> String {
    if leaves.is_empty() {
        return hasher.hash("");
    }

    let mut level: Vec<String> = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                hasher.hash(&format!("{}{}", left, right))
            })
            .collect();
    }

    level.swap_remove(0)
}
