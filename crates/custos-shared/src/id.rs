#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Copy, Hash,
)]
pub struct DbId(u64);

impl From<u64> for DbId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for DbId {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value >= 0 {
            Ok(Self(value as u64))
        } else {
            anyhow::bail!("Negative values not supported as Id's. Value: {value}");
        }
    }
}

impl From<DbId> for u64 {
    fn from(value: DbId) -> Self {
        value.0
    }
}

impl std::fmt::Display for DbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
