use serde::Deserialize;

pub const FLOOR_COUNT: u8 = 22;

/// Floors served by default in every interval of a fresh schedule
const DEFAULT_SERVICE_FLOORS: [u8; 13] = [1, 2, 3, 5, 8, 10, 12, 14, 15, 16, 18, 20, 22];

/// Formats a floor number as its label ("5F")
pub fn floor_label(floor: u8) -> String {
    format!("{floor}F")
}

/// Reads the leading number of a floor label ("12F" -> 12)
pub fn floor_number(label: &str) -> Option<u8> {
    let digits: String = label.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn all_floors() -> Vec<String> {
    (1..=FLOOR_COUNT).map(floor_label).collect()
}

pub fn default_service_floors() -> Vec<String> {
    DEFAULT_SERVICE_FLOORS.iter().copied().map(floor_label).collect()
}

/// Quick-select presets offered next to every floor picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorSelection {
    All,
    Even,
    Odd,
    #[serde(rename = "none")]
    Clear,
}

impl FloorSelection {
    pub fn floors(self) -> Vec<String> {
        (1..=FLOOR_COUNT)
            .filter(|floor| match self {
                Self::All => true,
                Self::Even => floor % 2 == 0,
                Self::Odd => floor % 2 == 1,
                Self::Clear => false,
            })
            .map(floor_label)
            .collect()
    }
}

/// Checks that every label names a floor of the building
pub fn unknown_floors(floors: &[String]) -> Vec<String> {
    floors
        .iter()
        .filter(|label| {
            !matches!(floor_number(label), Some(n) if (1..=FLOOR_COUNT).contains(&n) && **label == floor_label(n))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_select_splits_floors_by_parity() {
        assert_eq!(FloorSelection::All.floors().len(), 22);
        assert_eq!(FloorSelection::Even.floors()[0], "2F");
        assert_eq!(FloorSelection::Odd.floors().last().unwrap(), "21F");
        assert!(FloorSelection::Clear.floors().is_empty());
    }

    #[test]
    fn selection_names_match_the_ui() {
        let parsed: FloorSelection = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, FloorSelection::Clear);
        let parsed: FloorSelection = serde_json::from_str("\"even\"").unwrap();
        assert_eq!(parsed, FloorSelection::Even);
    }

    #[test]
    fn unknown_floors_flags_bad_labels() {
        let floors = vec!["1F".to_string(), "23F".to_string(), "lobby".to_string(), "05F".to_string()];
        assert_eq!(unknown_floors(&floors), vec!["23F", "lobby", "05F"]);
        assert!(unknown_floors(&default_service_floors()).is_empty());
    }
}
