// Storage capacity labels and ordering

/// Rank given to capacities missing from the table. Sorts after all known sizes.
pub const UNKNOWN_CAPACITY_RANK: u8 = 99;

const CAPACITY_RANKS: &[(&str, u8)] = &[
    ("128", 1),
    ("128GB", 1),
    ("256", 2),
    ("256GB", 2),
    ("512", 3),
    ("512GB", 3),
    ("1T", 4),
    ("1TB", 4),
    ("1024", 4),
    ("1024GB", 4),
    ("2T", 5),
    ("2TB", 5),
    ("2048", 5),
    ("2048GB", 5),
];

/// Display label: bare numbers get a `GB` suffix, blanks become `-`.
/// Anything else, including padded numbers, is shown as given.
pub fn format_capacity(capacity: &str) -> String {
    if capacity.trim().is_empty() {
        return "-".to_string();
    }
    if capacity.chars().all(|c| c.is_ascii_digit()) {
        return format!("{capacity}GB");
    }
    capacity.to_string()
}

/// Sort weight within one device line. Case and whitespace insensitive.
pub fn capacity_rank(capacity: &str) -> u8 {
    let key: String = capacity
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    CAPACITY_RANKS
        .iter()
        .find(|(label, _)| *label == key)
        .map_or(UNKNOWN_CAPACITY_RANK, |(_, rank)| *rank)
}

/// Products with a blank or unit-only capacity are placeholders in the feed.
pub fn is_valid_capacity(capacity: &str) -> bool {
    let trimmed = capacity.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("GB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numeric_capacity_with_suffix() {
        assert_eq!(format_capacity("256"), "256GB");
        assert_eq!(format_capacity("256GB"), "256GB");
        assert_eq!(format_capacity("1TB"), "1TB");
        assert_eq!(format_capacity(""), "-");
        assert_eq!(format_capacity("   "), "-");
    }

    #[test]
    fn padded_numbers_pass_through_unchanged() {
        assert_eq!(format_capacity(" 256"), " 256");
        assert_eq!(format_capacity("256 "), "256 ");
        assert_eq!(format_capacity("1 TB"), "1 TB");
    }

    #[test]
    fn ranks_are_monotonic_over_known_sizes() {
        let ordered = ["128GB", "256GB", "512GB", "1TB", "2TB", "3TB"];
        let ranks: Vec<u8> = ordered.iter().map(|c| capacity_rank(c)).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]), "ranks: {ranks:?}");
        assert_eq!(capacity_rank("3TB"), UNKNOWN_CAPACITY_RANK);
    }

    #[test]
    fn rank_ignores_case_and_whitespace() {
        assert_eq!(capacity_rank("1 tb"), 4);
        assert_eq!(capacity_rank(" 512 gb "), 3);
        assert_eq!(capacity_rank("1024"), 4);
        assert_eq!(capacity_rank("2048GB"), 5);
        assert_eq!(capacity_rank("128"), 1);
    }

    #[test]
    fn rejects_placeholder_capacities() {
        assert!(!is_valid_capacity(""));
        assert!(!is_valid_capacity("  "));
        assert!(!is_valid_capacity("GB"));
        assert!(!is_valid_capacity(" gb"));
        assert!(is_valid_capacity("256"));
        assert!(is_valid_capacity("1TB"));
    }
}
