use super::*;

#[test]
fn temporary_windows_are_numbered_after_fixed_ones() {
    let mut windows = Vec::new();
    let first = add_temporary_window(&mut windows).unwrap();
    let second = add_temporary_window(&mut windows).unwrap();

    assert_eq!(first.id, "check11");
    assert_eq!(first.name, "检验窗11");
    assert_eq!(second.id, "check12");
    assert_eq!((first.x, first.y), (None, None));
    assert!(first.active);
    assert_eq!(first.config, Some(WindowSettings::default()));
}

#[test]
fn numbering_continues_from_highest_after_deletion() {
    let mut windows = Vec::new();
    for _ in 0..3 {
        add_temporary_window(&mut windows).unwrap();
    }
    remove_temporary_window(&mut windows, "check12").unwrap();

    let next = add_temporary_window(&mut windows).unwrap();
    assert_eq!(next.id, "check14");
    let ids: Vec<&str> = windows.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["check11", "check13", "check14"]);
}

#[test]
fn at_most_five_temporary_windows() {
    let mut windows = Vec::new();
    for _ in 0..MAX_TEMPORARY_WINDOWS {
        add_temporary_window(&mut windows).unwrap();
    }
    let err = add_temporary_window(&mut windows).unwrap_err();
    assert_eq!(err.to_string(), "最多可添加5个临时窗口");
}

#[test]
fn exhausted_numbering_is_rejected() {
    let mut windows = vec![TemporaryWindow {
        id: format!("check{}", u32::MAX),
        name: "检验窗".into(),
        x: None,
        y: None,
        active: true,
        config: None,
    }];
    let err = add_temporary_window(&mut windows).unwrap_err();
    assert_eq!(err.to_string(), "临时窗口编号已用尽");
    assert_eq!(windows.len(), 1);
}

#[test]
fn positioning_and_removal_need_a_known_window() {
    let mut windows = Vec::new();
    add_temporary_window(&mut windows).unwrap();

    let placed = set_temporary_position(&mut windows, "check11", 12.5, 40.0).unwrap();
    assert!(placed.x.is_some() && placed.y.is_some());
    assert!(set_temporary_position(&mut windows, "check99", 0.0, 0.0).is_err());
    assert!(remove_temporary_window(&mut windows, "check99").is_err());
}

#[test]
fn fixed_windows_use_saved_settings() {
    let saved = vec![WindowConfig {
        id: "check3".into(),
        name: "检验窗3".into(),
        settings: WindowSettings {
            special_type_id: Some("vip".into()),
            process_time: 90,
            time_ranges: vec![],
        },
    }];

    let windows = fixed_windows(&saved);
    assert_eq!(windows.len(), 10);
    assert_eq!(windows[0].settings, WindowSettings::default());
    assert_eq!(windows[2].settings.process_time, 90);
    assert!(is_fixed_window("check10"));
    assert!(!is_fixed_window("check11"));
    assert!(!is_fixed_window("window1"));
}

#[test]
fn special_type_summary_groups_windows() {
    let mut windows = fixed_windows(&[]);
    windows[0].settings.special_type_id = Some("t1".into());
    windows[4].settings.special_type_id = Some("t1".into());
    let types = vec![
        SpecialWindowType { id: "t1".into(), name: "急诊专窗".into(), color: "#1890ff".into() },
        SpecialWindowType { id: "t2".into(), name: "VIP专窗".into(), color: "#1890ff".into() },
    ];

    let summary = summarize_special_types(&types, &windows);
    assert_eq!(summary[0].windows, vec!["检验窗1", "检验窗5"]);
    assert!(summary[1].windows.is_empty());
}

#[test]
fn window_config_flattens_settings_on_the_wire() {
    let json = serde_json::to_value(&fixed_windows(&[])[0]).unwrap();
    assert_eq!(json["id"], "check1");
    assert_eq!(json["processTime"], 200);
    assert_eq!(json["timeRanges"][0]["start"], "07:30");
    assert!(json.get("specialTypeId").is_none());
}
