//! Traffic sign classes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TrafficObjectError;

/// Closed set of object classes the decision layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignClass {
    GreenLight,
    RedLight,
    Person,
    /// Speed limit sign carrying its posted value
    SpeedLimit(u32),
    StopSign,
}

impl SignClass {
    /// Whether a close-by object of this class forces a full stop
    pub fn is_stopping(&self) -> bool {
        matches!(
            self,
            SignClass::RedLight | SignClass::Person | SignClass::StopSign
        )
    }

    /// Merge rank within a cycle; verdicts are applied in ascending order so
    /// that stopping classes always have the last word.
    pub fn precedence(&self) -> u8 {
        match self {
            SignClass::GreenLight => 0,
            SignClass::SpeedLimit(_) => 1,
            SignClass::Person | SignClass::RedLight | SignClass::StopSign => 2,
        }
    }
}

impl fmt::Display for SignClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignClass::GreenLight => write!(f, "Green Light"),
            SignClass::RedLight => write!(f, "Red Light"),
            SignClass::Person => write!(f, "Person"),
            SignClass::SpeedLimit(limit) => write!(f, "Speed Limit {}", limit),
            SignClass::StopSign => write!(f, "Stop"),
        }
    }
}

impl FromStr for SignClass {
    type Err = TrafficObjectError;

    /// Parse a label name, ignoring case, spaces, dashes and underscores.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "greenlight" | "greentrafficlight" => Ok(SignClass::GreenLight),
            "redlight" | "redtrafficlight" => Ok(SignClass::RedLight),
            "person" | "pedestrian" => Ok(SignClass::Person),
            "stop" | "stopsign" => Ok(SignClass::StopSign),
            _ => match key.strip_prefix("speedlimit") {
                Some(value) => match value.parse::<u32>() {
                    Ok(limit) if limit > 0 => Ok(SignClass::SpeedLimit(limit)),
                    _ => Err(TrafficObjectError::InvalidSpeedLimit(name.to_string())),
                },
                None => Err(TrafficObjectError::UnknownLabel(name.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_names() {
        assert_eq!("Green Light".parse::<SignClass>(), Ok(SignClass::GreenLight));
        assert_eq!("red_traffic_light".parse::<SignClass>(), Ok(SignClass::RedLight));
        assert_eq!("Pedestrian".parse::<SignClass>(), Ok(SignClass::Person));
        assert_eq!("Stop".parse::<SignClass>(), Ok(SignClass::StopSign));
        assert_eq!("Stop Sign".parse::<SignClass>(), Ok(SignClass::StopSign));
        assert_eq!("Speed Limit 25".parse::<SignClass>(), Ok(SignClass::SpeedLimit(25)));
        assert_eq!("speed-limit-40".parse::<SignClass>(), Ok(SignClass::SpeedLimit(40)));
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        assert!(matches!(
            "Yield".parse::<SignClass>(),
            Err(TrafficObjectError::UnknownLabel(_))
        ));
        assert!(matches!(
            "Speed Limit".parse::<SignClass>(),
            Err(TrafficObjectError::InvalidSpeedLimit(_))
        ));
        assert!(matches!(
            "Speed Limit 0".parse::<SignClass>(),
            Err(TrafficObjectError::InvalidSpeedLimit(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for class in [
            SignClass::GreenLight,
            SignClass::RedLight,
            SignClass::Person,
            SignClass::SpeedLimit(25),
            SignClass::StopSign,
        ] {
            assert_eq!(class.to_string().parse::<SignClass>(), Ok(class));
        }
    }

    #[test]
    fn test_stopping_classes_rank_last() {
        assert!(SignClass::GreenLight.precedence() < SignClass::SpeedLimit(40).precedence());
        assert!(SignClass::SpeedLimit(40).precedence() < SignClass::RedLight.precedence());
        assert!(SignClass::StopSign.is_stopping());
        assert!(!SignClass::SpeedLimit(25).is_stopping());
    }
}
