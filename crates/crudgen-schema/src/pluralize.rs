//! Singular/plural name variations for fuzzy table matching.
//!
//! Heuristic only: irregular plurals ("Person"/"People") are expected to
//! miss, and the caller treats a resolution miss as recoverable. Callers
//! needing exact control use an explicit schema.table mapping directive.

/// Generate candidate singular/plural spellings of `name`.
///
/// The returned list is de-duplicated and in stable generation order so
/// resolver behavior and logs are deterministic.
pub fn variations(name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if name.ends_with('s') || name.ends_with('S') {
        // Plural-looking: generate singular candidates.
        push_unique(&mut out, name[..name.len() - 1].to_string());
        if has_suffix_ci(name, "es") {
            push_unique(&mut out, name[..name.len() - 2].to_string());
        }
        if has_suffix_ci(name, "ies") && name.len() > 3 {
            push_unique(&mut out, format!("{}y", &name[..name.len() - 3]));
        }
    } else {
        // Singular-looking: generate plural candidates.
        push_unique(&mut out, format!("{name}s"));
        if has_suffix_ci(name, "x")
            || has_suffix_ci(name, "z")
            || has_suffix_ci(name, "ch")
            || has_suffix_ci(name, "sh")
        {
            push_unique(&mut out, format!("{name}es"));
        }
        if has_suffix_ci(name, "y") && ends_with_consonant_y(name) {
            push_unique(&mut out, format!("{}ies", &name[..name.len() - 1]));
        }
    }

    out
}

fn ends_with_consonant_y(name: &str) -> bool {
    let mut chars = name.chars().rev();
    let Some(y) = chars.next() else {
        return false;
    };
    if y != 'y' && y != 'Y' {
        return false;
    }
    match chars.next() {
        Some(prev) => !matches!(
            prev.to_ascii_lowercase(),
            'a' | 'e' | 'i' | 'o' | 'u'
        ),
        None => false,
    }
}

fn has_suffix_ci(name: &str, suffix: &str) -> bool {
    let Some(start) = name.len().checked_sub(suffix.len()) else {
        return false;
    };
    // Multibyte tail: cannot end with an ASCII suffix.
    name.is_char_boundary(start) && name[start..].eq_ignore_ascii_case(suffix)
}

fn push_unique(out: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !out.contains(&candidate) {
        out.push(candidate);
    }
}
