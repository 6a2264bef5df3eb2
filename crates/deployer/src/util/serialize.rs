use {
    crate::domain::eth,
    serde::{Deserialize, Deserializer, de},
    serde_with::DeserializeAs,
    std::borrow::Cow,
};

/// Deserialize decimal ether amounts (e.g. `"1.5"`) into base units.
#[derive(Debug)]
pub struct Ether;

impl<'de> DeserializeAs<'de, eth::U256> for Ether {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<eth::U256, D::Error> {
        let s = Cow::<str>::deserialize(deserializer)?;
        eth::parse_ether(&s).map_err(de::Error::custom)
    }
}
