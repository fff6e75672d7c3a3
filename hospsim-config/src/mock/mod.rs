//! Placeholder statistics shown by the dashboards until a simulation engine
//! feeds them real numbers.

pub mod history;

use rand::Rng;
use serde::Serialize;

use crate::schedule::fleet::default_elevators;
use crate::schedule::slot_utils::half_hour_slots;

/// Tag colour for a utilization percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationColor {
    Red,
    Orange,
    Green,
}

pub fn utilization_color(utilization: f64) -> UtilizationColor {
    if utilization > 80.0 {
        UtilizationColor::Red
    } else if utilization > 60.0 {
        UtilizationColor::Orange
    } else {
        UtilizationColor::Green
    }
}

/// Utilization of one elevator or inspection station over a half hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationRecord {
    pub time: String,
    pub unit: String,
    pub utilization: f64,
    pub color: UtilizationColor,
}

/// One row per (slot, unit), jittered uniformly by `spread` around the unit's
/// base and clamped to 0..=100
fn utilization_detail<G: Rng + ?Sized>(
    rng: &mut G,
    slots: Vec<String>,
    units: &[(String, f64)],
    spread: f64,
) -> Vec<UtilizationRecord> {
    let mut records = Vec::with_capacity(slots.len() * units.len());
    for time in slots {
        for (unit, base) in units {
            let raw = base + rng.gen_range(-spread..=spread);
            let utilization = (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0;
            records.push(UtilizationRecord {
                time: time.clone(),
                unit: unit.clone(),
                utilization,
                color: utilization_color(utilization),
            });
        }
    }
    records
}

/// Elevators 10..13 from 06:00 to 23:00; elevator 10 runs hot
pub fn elevator_utilization<G: Rng + ?Sized>(rng: &mut G) -> Vec<UtilizationRecord> {
    let units: Vec<(String, f64)> = default_elevators()
        .into_iter()
        .map(|e| {
            let base = if e.id == "10" { 85.0 } else { 50.0 };
            (e.name, base)
        })
        .collect();
    utilization_detail(rng, half_hour_slots(6 * 60, 23 * 60), &units, 15.0)
}

/// Inspection stations 1..5 from 08:00 to 18:00; station 1 runs hot
pub fn inspection_utilization<G: Rng + ?Sized>(rng: &mut G) -> Vec<UtilizationRecord> {
    let units: Vec<(String, f64)> = (1..=5)
        .map(|n| (format!("{n}号工作站"), if n == 1 { 90.0 } else { 65.0 }))
        .collect();
    utilization_detail(rng, half_hour_slots(8 * 60, 18 * 60), &units, 10.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitUtilization {
    pub name: String,
    pub utilization: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorOverview {
    pub current_capacity: u32,
    pub waiting_count: u32,
    pub average_wait_time: String,
    pub utilization: Vec<UnitUtilization>,
}

pub fn elevator_overview() -> ElevatorOverview {
    let utilization = default_elevators()
        .into_iter()
        .zip([100, 65, 45, 75])
        .map(|(e, utilization)| UnitUtilization { name: e.name, utilization })
        .collect();
    ElevatorOverview {
        current_capacity: 220,
        waiting_count: 15,
        average_wait_time: "00:02:00".to_string(),
        utilization,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabOverview {
    pub total_patients: u32,
    pub waiting_patients: u32,
    pub avg_waiting_time: String,
    pub utilization: Vec<UnitUtilization>,
}

pub fn lab_overview() -> LabOverview {
    let utilization = [
        ("普通窗口1", 85),
        ("普通窗口2", 75),
        ("普通窗口3", 65),
        ("急诊窗口", 90),
        ("老年人窗口", 70),
    ]
    .into_iter()
    .map(|(name, utilization)| UnitUtilization { name: name.to_string(), utilization })
    .collect();
    LabOverview {
        total_patients: 124,
        waiting_patients: 26,
        avg_waiting_time: "00:23:45".to_string(),
        utilization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn colour_thresholds_are_exclusive() {
        assert_eq!(utilization_color(80.1), UtilizationColor::Red);
        assert_eq!(utilization_color(80.0), UtilizationColor::Orange);
        assert_eq!(utilization_color(60.0), UtilizationColor::Green);
    }

    #[test]
    fn elevator_detail_covers_the_operating_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = elevator_utilization(&mut rng);
        // 34 half hours x 4 elevators
        assert_eq!(records.len(), 136);
        assert_eq!(records[0].time, "06:00-06:30");
        assert_eq!(records[0].unit, "10号电梯");
        assert_eq!(records.last().unwrap().time, "22:30-23:00");

        for r in &records {
            assert!((0.0..=100.0).contains(&r.utilization));
            let base = if r.unit == "10号电梯" { 85.0 } else { 50.0 };
            assert!((r.utilization - base).abs() <= 15.05, "{r:?}");
        }
    }

    #[test]
    fn inspection_detail_stays_within_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        let records = inspection_utilization(&mut rng);
        assert_eq!(records.len(), 20 * 5);
        assert_eq!(records[4].unit, "5号工作站");
        assert!(records
            .iter()
            .filter(|r| r.unit == "1号工作站")
            .all(|r| r.utilization >= 80.0 && r.utilization <= 100.0));
    }

    #[test]
    fn overviews_are_static() {
        let elevators = elevator_overview();
        assert_eq!(elevators.current_capacity, 220);
        let values: Vec<u32> = elevators.utilization.iter().map(|u| u.utilization).collect();
        assert_eq!(values, vec![100, 65, 45, 75]);
        assert_eq!(elevators.utilization[3].name, "13号电梯");

        assert_eq!(lab_overview().utilization.len(), 5);
    }
}
