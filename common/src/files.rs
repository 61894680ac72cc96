use serde::Deserialize;

/// Hash algorithms to compute when a caller attaches a source hash to Evidence
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hashes {
    #[serde(default)]
    pub md5: bool,
    #[serde(default)]
    pub sha1: bool,
    #[serde(default)]
    pub sha256: bool,
}
