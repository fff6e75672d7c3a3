use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::form::validate_special_type_name;

pub const MAX_SPECIAL_TYPES: usize = 5;
pub const SPECIAL_TYPE_COLOR: &str = "#1890ff";

/// Dedicated-window categories offered with one click
pub const PRESET_SPECIAL_TYPES: [&str; 5] = ["老年人专窗", "项目专窗", "急诊专窗", "VIP专窗", "慢病专窗"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialWindowType {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Adds a window type by name. Presets skip the free-text name rules.
pub fn add_special_type(
    types: &mut Vec<SpecialWindowType>,
    name: &str,
) -> Result<SpecialWindowType> {
    let name = name.trim();
    if !PRESET_SPECIAL_TYPES.contains(&name) {
        validate_special_type_name(name)?;
    }
    if types.len() >= MAX_SPECIAL_TYPES {
        return Err(ConfigError::validation("最多只能添加5个特殊窗口类型"));
    }
    if types.iter().any(|t| t.name == name) {
        return Err(ConfigError::validation("该窗口类型已存在"));
    }

    let mut stamp = chrono::Utc::now().timestamp_millis();
    while types.iter().any(|t| t.id == stamp.to_string()) {
        stamp += 1;
    }

    let added = SpecialWindowType {
        id: stamp.to_string(),
        name: name.to_string(),
        color: SPECIAL_TYPE_COLOR.to_string(),
    };
    types.push(added.clone());
    Ok(added)
}

pub fn remove_special_type(types: &mut Vec<SpecialWindowType>, id: &str) -> Result<()> {
    let before = types.len();
    types.retain(|t| t.id != id);
    if types.len() == before {
        return Err(ConfigError::not_found("special window type", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_presets_and_custom_names() {
        let mut types = Vec::new();
        let elderly = add_special_type(&mut types, "老年人专窗").unwrap();
        let custom = add_special_type(&mut types, " 儿科 ").unwrap();

        assert_eq!(custom.name, "儿科");
        assert_eq!(custom.color, SPECIAL_TYPE_COLOR);
        assert_ne!(elderly.id, custom.id);
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn rejects_duplicates_and_more_than_five() {
        let mut types = Vec::new();
        add_special_type(&mut types, "急诊专窗").unwrap();
        let err = add_special_type(&mut types, "急诊专窗").unwrap_err();
        assert_eq!(err.to_string(), "该窗口类型已存在");

        for name in ["a", "b", "c", "d"] {
            add_special_type(&mut types, name).unwrap();
        }
        let err = add_special_type(&mut types, "e").unwrap_err();
        assert_eq!(err.to_string(), "最多只能添加5个特殊窗口类型");
    }

    #[test]
    fn custom_names_follow_form_rules() {
        let mut types = Vec::new();
        assert!(add_special_type(&mut types, "").is_err());
        assert!(add_special_type(&mut types, "这个名字实在是太长了超过十个字").is_err());
        assert!(types.is_empty());
    }

    #[test]
    fn remove_reports_unknown_ids() {
        let mut types = Vec::new();
        let added = add_special_type(&mut types, "VIP专窗").unwrap();
        assert!(remove_special_type(&mut types, "nope").is_err());
        remove_special_type(&mut types, &added.id).unwrap();
        assert!(types.is_empty());
    }
}
