use crate::error::Result;
use crate::store::{keys, JsonStore};

use super::types::{Direction, Elevator, ElevatorConfig, ElevatorStatus};

/// The four elevators of the modelled building with their demo states
pub fn default_elevators() -> Vec<Elevator> {
    let demo = [
        ("10", 1, ElevatorStatus::Idle, None),
        ("11", 5, ElevatorStatus::Moving, Some(Direction::Up)),
        ("12", 3, ElevatorStatus::Loading, None),
        ("13", 2, ElevatorStatus::Idle, None),
    ];
    demo.into_iter()
        .map(|(id, current_floor, status, direction)| Elevator {
            id: id.to_string(),
            name: format!("{id}号电梯"),
            current_floor,
            status,
            direction,
            config: None,
        })
        .collect()
}

/// Overlays saved configs on the fleet. A saved config also moves the car to its initial floor.
pub fn merge_saved_configs(elevators: Vec<Elevator>, configs: &[ElevatorConfig]) -> Vec<Elevator> {
    elevators
        .into_iter()
        .map(|elevator| match configs.iter().find(|c| c.id == elevator.id) {
            Some(config) => Elevator {
                current_floor: config.initial_floor,
                config: Some(config.clone()),
                ..elevator
            },
            None => elevator,
        })
        .collect()
}

pub fn load_fleet(store: &JsonStore) -> Vec<Elevator> {
    let configs: Vec<ElevatorConfig> = store.load_list(keys::ELEVATOR_CONFIGS);
    merge_saved_configs(default_elevators(), &configs)
}

pub fn find_config(store: &JsonStore, elevator_id: &str) -> Option<ElevatorConfig> {
    store
        .load_list::<ElevatorConfig>(keys::ELEVATOR_CONFIGS)
        .into_iter()
        .find(|c| c.id == elevator_id)
}

/// Replaces any saved config with the same id and appends the new one
pub fn upsert_config(store: &JsonStore, config: &ElevatorConfig) -> Result<()> {
    let mut configs: Vec<ElevatorConfig> = store.load_list(keys::ELEVATOR_CONFIGS);
    configs.retain(|c| c.id != config.id);
    configs.push(config.clone());
    store.save(keys::ELEVATOR_CONFIGS, &configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::draft::ScheduleDraft;
    use tempfile::TempDir;

    #[test]
    fn fleet_defaults_without_saved_configs() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let fleet = load_fleet(&store);
        assert_eq!(fleet.len(), 4);
        assert_eq!(fleet[1].name, "11号电梯");
        assert_eq!(fleet[1].direction, Some(Direction::Up));
        assert!(fleet.iter().all(|e| e.config.is_none()));
    }

    #[test]
    fn upsert_replaces_config_with_same_id() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let first = ScheduleDraft::default().into_config("12").unwrap();
        upsert_config(&store, &first).unwrap();
        let second = ScheduleDraft { initial_floor: 9, ..ScheduleDraft::default() }
            .into_config("12")
            .unwrap();
        upsert_config(&store, &second).unwrap();

        let saved: Vec<ElevatorConfig> = store.load_list(keys::ELEVATOR_CONFIGS);
        assert_eq!(saved.len(), 1);
        assert_eq!(find_config(&store, "12"), Some(second));

        let fleet = load_fleet(&store);
        let car = fleet.iter().find(|e| e.id == "12").unwrap();
        assert_eq!(car.current_floor, 9);
        assert_eq!(car.status, ElevatorStatus::Loading);
    }
}
