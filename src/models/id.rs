/// Typed identifiers for network entities
///
/// Each entity kind gets its own newtype so a track id can never be passed
/// where a train id is expected. All of them serialize as plain integers.
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a train, stable for its lifetime in the store
    TrainId,
    "train "
);
entity_id!(
    /// Identifier of a track segment
    TrackId,
    "track "
);
entity_id!(
    /// Identifier of a station
    StationId,
    "station "
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        assert_eq!(TrainId(7).to_string(), "train 7");
        assert_eq!(TrackId(3).to_string(), "track 3");
        assert_eq!(StationId(12).to_string(), "station 12");
    }

    #[test]
    fn test_ids_serialize_as_integers() {
        let json = serde_json::to_string(&TrainId(42)).expect("serialize");
        assert_eq!(json, "42");
        let id: TrackId = serde_json::from_str("5").expect("deserialize");
        assert_eq!(id, TrackId(5));
    }
}
