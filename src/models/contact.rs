use serde::{Deserialize, Serialize};

/// One phone entry of the contacts provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub number: String,
    #[serde(alias = "display_name")]
    pub name: String,
}
