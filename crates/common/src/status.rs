//! Status events sent by the host simulation.

use crate::error::LimoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happened to the limo a status message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Periodic tick, nothing happened
    Update,
    /// The limo has no path to follow
    NoPath,
    /// Reached a bus stop but nothing was dropped or picked up
    PassengerNoAction,
    /// Dropped the passenger at its destination
    PassengerDelivered,
    /// Dropped the passenger somewhere other than its destination
    PassengerAbandoned,
    /// The drop-off was refused because an enemy waits in the lobby
    PassengerRefused,
    /// Delivered one passenger and picked up the next at the same stop
    PassengerDeliveredAndPickedUp,
    /// Picked up a passenger
    PassengerPickedUp,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Update,
        Status::NoPath,
        Status::PassengerNoAction,
        Status::PassengerDelivered,
        Status::PassengerAbandoned,
        Status::PassengerRefused,
        Status::PassengerDeliveredAndPickedUp,
        Status::PassengerPickedUp,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Update => "UPDATE",
            Status::NoPath => "NO_PATH",
            Status::PassengerNoAction => "PASSENGER_NO_ACTION",
            Status::PassengerDelivered => "PASSENGER_DELIVERED",
            Status::PassengerAbandoned => "PASSENGER_ABANDONED",
            Status::PassengerRefused => "PASSENGER_REFUSED",
            Status::PassengerDeliveredAndPickedUp => "PASSENGER_DELIVERED_AND_PICKED_UP",
            Status::PassengerPickedUp => "PASSENGER_PICKED_UP",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = LimoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LimoError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "PASSENGER_TELEPORTED".parse::<Status>().unwrap_err();
        assert!(matches!(err, LimoError::UnknownStatus(ref s) if s == "PASSENGER_TELEPORTED"));
    }

    #[test]
    fn test_serde_matches_wire_names() {
        for status in Status::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
