use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::flow::FlowRow;
use crate::schedule::types::{Direction, Elevator, ElevatorStatus};
use crate::schedule::LabelledRange;
use crate::templates::FlowTemplate;

/// Formats the floors served during a range, "-" when none
pub fn format_floors(floors: &[String]) -> String {
    if floors.is_empty() {
        "-".to_string()
    } else {
        floors.join(", ")
    }
}

/// Short status line shown under an elevator car, e.g. "5F - ↑"
pub fn elevator_status_text(elevator: &Elevator) -> String {
    let state = match (elevator.status, elevator.direction) {
        (ElevatorStatus::Idle, _) => "空闲",
        (ElevatorStatus::Moving, Some(Direction::Up)) => "↑",
        (ElevatorStatus::Moving, Some(Direction::Down)) => "↓",
        (ElevatorStatus::Moving, None) => "运行中",
        (ElevatorStatus::Loading, _) => "乘客上下",
    };
    format!("{}F - {}", elevator.current_floor, state)
}

/// Writes derived ranges to a file in the format: label: floors
pub fn write_ranges_to_file(
    name: &str,
    ranges: &[LabelledRange],
    path: &Path,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    // Write header with elevator name
    writeln!(file, "** {} **", name)?;
    for r in ranges {
        writeln!(file, "{}: {}", r.label, format_floors(&r.range.floors))?;
    }

    Ok(())
}

/// Prints derived ranges in a readable format
pub fn print_time_ranges(name: &str, ranges: &[LabelledRange]) {
    println!("\n=== {} ===", name);
    println!("Time ranges: {}", ranges.len());
    for (i, r) in ranges.iter().enumerate() {
        println!("  {}. {} -> {}", i + 1, r.label, format_floors(&r.range.floors));
    }
}

pub fn print_fleet(elevators: &[Elevator]) {
    for elevator in elevators {
        let configured = if elevator.config.is_some() { "" } else { " (未配置)" };
        println!("  {} [{}]{}", elevator.name, elevator_status_text(elevator), configured);
    }
}

pub fn print_templates<R: FlowRow>(templates: &[FlowTemplate<R>]) {
    println!("\n=== {} 模板 ===", R::SHEET_NAME);
    for t in templates {
        println!("  {:<20} {} ({} rows)", t.id, t.display_name(), t.data.len());
    }
}

/// Prints a flow table under its spreadsheet headers
pub fn print_rows<R: FlowRow>(rows: &[R]) {
    println!("{}", R::HEADERS.join("\t"));
    for row in rows {
        let cells: Vec<String> = row.to_cells().iter().map(ToString::to_string).collect();
        println!("{}", cells.join("\t"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fleet::default_elevators;
    use crate::schedule::{derive_time_ranges, label_ranges, Breakpoint};
    use tempfile::TempDir;

    #[test]
    fn status_text_for_demo_fleet() {
        let texts: Vec<String> = default_elevators().iter().map(elevator_status_text).collect();
        assert_eq!(texts, vec!["1F - 空闲", "5F - ↑", "3F - 乘客上下", "2F - 空闲"]);
    }

    #[test]
    fn writes_one_line_per_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("10.txt");
        let ranges = label_ranges(&derive_time_ranges(
            &[Breakpoint { time: "12:00".into(), floors: vec!["1F".into(), "3F".into()] }],
            &[],
        ));

        write_ranges_to_file("10号电梯", &ranges, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "** 10号电梯 **\n06:30 至 12:00: 1F, 3F\n12:00 至 次日 06:30: -\n");
    }
}
