//! Extra command-line argument handling.

use std::collections::BTreeMap;

/// Split an argument string on whitespace.
/// - `"--plugin eosio::net_api_plugin"` -> `["--plugin", "eosio::net_api_plugin"]`
/// - `""` -> `[]`
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

/// Arguments for one node: the global extras followed by the node's own,
/// so node-specific flags win when the binary keeps the last occurrence.
pub fn merge_args(
    global: Option<&str>,
    specific: &BTreeMap<i32, String>,
    index: i32,
) -> Vec<String> {
    let mut merged = global.map(split_args).unwrap_or_default();
    if let Some(own) = specific.get(&index) {
        merged.extend(split_args(own));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args() {
        assert_eq!(
            split_args("  --plugin   eosio::net_api_plugin "),
            vec!["--plugin".to_string(), "eosio::net_api_plugin".to_string()]
        );
        assert!(split_args("").is_empty());
    }

    #[test]
    fn test_merge_args_order() {
        let mut specific = BTreeMap::new();
        specific.insert(-100, "--bios-flag".to_string());
        specific.insert(2, "--max-clients 5".to_string());

        assert_eq!(
            merge_args(Some("--verbose"), &specific, 2),
            vec!["--verbose", "--max-clients", "5"]
        );
        assert_eq!(merge_args(None, &specific, -100), vec!["--bios-flag"]);
        assert!(merge_args(None, &specific, 0).is_empty());
    }
}
