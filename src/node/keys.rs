//! Signing credentials attached to node records.

use serde::{Deserialize, Serialize};

/// Well-known development public key.
pub const DEV_PUBLIC_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";
/// Private half of [`DEV_PUBLIC_KEY`].
pub const DEV_PRIVATE_KEY: &str = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3";

/// A public/private signing key pair as stored in topology files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    #[serde(rename = "pubkey")]
    pub public_key: String,
    #[serde(rename = "privkey")]
    pub private_key: String,
}

impl KeyPair {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        KeyPair {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// The development key pair.
    pub fn dev() -> Self {
        KeyPair::new(DEV_PUBLIC_KEY, DEV_PRIVATE_KEY)
    }
}

/// Supplies key pairs to producing nodes during binding.
///
/// Key generation itself lives outside this crate; implementations hand out
/// material that already exists.
pub trait KeySource {
    /// Key pair for the node called `node_name`.
    fn key_pair(&mut self, node_name: &str) -> KeyPair;
}

/// Gives every node the development key pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct DevKeys;

impl KeySource for DevKeys {
    fn key_pair(&mut self, _node_name: &str) -> KeyPair {
        KeyPair::dev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pair_field_names() {
        let json = serde_json::to_string(&KeyPair::new("PUB", "PRIV")).unwrap();
        assert_eq!(json, r#"{"pubkey":"PUB","privkey":"PRIV"}"#);
    }

    #[test]
    fn test_dev_keys_are_stable() {
        let mut keys = DevKeys;
        assert_eq!(keys.key_pair("bios"), keys.key_pair("node_07"));
        assert_eq!(keys.key_pair("bios").public_key, DEV_PUBLIC_KEY);
    }
}
