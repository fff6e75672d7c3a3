//! Named, reusable flow tables. Presets ship with the service and cannot be
//! removed; custom templates are persisted per flow kind.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::flow::FlowRow;
use crate::store::JsonStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTemplate<R> {
    pub id: String,
    pub name: String,
    #[serde(alias = "timeRanges")]
    pub data: Vec<R>,
    #[serde(default)]
    pub is_preset: bool,
}

impl<R> FlowTemplate<R> {
    pub fn preset(id: &str, name: &str, data: Vec<R>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            data,
            is_preset: true,
        }
    }

    /// Label shown in template pickers
    pub fn display_name(&self) -> String {
        if self.is_preset {
            format!("{}（预设）", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Preset and custom templates of one flow kind
pub struct TemplateLibrary<'a, R> {
    store: &'a JsonStore,
    _rows: PhantomData<R>,
}

impl<'a, R: FlowRow> TemplateLibrary<'a, R> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self {
            store,
            _rows: PhantomData,
        }
    }

    /// User-created templates, in creation order
    pub fn custom(&self) -> Vec<FlowTemplate<R>> {
        self.store
            .load_list::<FlowTemplate<R>>(R::TEMPLATE_KEY)
            .into_iter()
            .filter(|t| !t.is_preset)
            .collect()
    }

    /// Presets first, then custom templates
    pub fn list(&self) -> Vec<FlowTemplate<R>> {
        let mut all = R::presets();
        all.extend(self.custom());
        all
    }

    pub fn find(&self, id: &str) -> Option<FlowTemplate<R>> {
        self.list().into_iter().find(|t| t.id == id)
    }

    /// Data of a template, ready to load into the editor
    pub fn apply(&self, id: &str) -> Result<Vec<R>> {
        self.find(id)
            .map(|t| t.data)
            .ok_or_else(|| ConfigError::not_found("template", id))
    }

    pub fn save_custom(&self, name: &str, data: Vec<R>) -> Result<FlowTemplate<R>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::validation("请输入模板名称"));
        }
        R::validate(&data)?;

        let mut custom = self.custom();
        let template = FlowTemplate {
            id: self.next_id(&custom),
            name: name.to_string(),
            data,
            is_preset: false,
        };
        custom.push(template.clone());
        self.store.save(R::TEMPLATE_KEY, &custom)?;

        tracing::info!(id = %template.id, name = %template.name, "saved custom template");
        Ok(template)
    }

    /// Removes one custom template. Presets are refused.
    pub fn delete(&self, id: &str) -> Result<()> {
        if R::presets().iter().any(|t| t.id == id) {
            return Err(ConfigError::PresetTemplate { id: id.to_string() });
        }

        let mut custom = self.custom();
        let before = custom.len();
        custom.retain(|t| t.id != id);
        if custom.len() == before {
            return Err(ConfigError::not_found("template", id));
        }
        self.store.save(R::TEMPLATE_KEY, &custom)?;

        tracing::info!(id, "deleted custom template");
        Ok(())
    }

    /// Timestamp-based id, bumped until it collides with nothing
    fn next_id(&self, custom: &[FlowTemplate<R>]) -> String {
        let presets = R::presets();
        let taken = |id: &str| presets.iter().chain(custom).any(|t| t.id == id);

        let mut stamp = chrono::Utc::now().timestamp_millis();
        loop {
            let id = format!("{}{}", R::CUSTOM_ID_PREFIX, stamp);
            if !taken(&id) {
                return id;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
