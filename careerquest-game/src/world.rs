//! Presentation state carried alongside progression.
//!
//! Nothing here is validated against the career ladder; clients store map
//! progress and avatar position so it survives a save/load cycle.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    #[serde(default)]
    pub collected_items: Vec<String>,
    #[serde(default)]
    pub completed_regions: Vec<String>,
    #[serde(default)]
    pub current_region: Option<String>,
    #[serde(default)]
    pub position: Position,
}

/// Partial world update; `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldStateUpdate {
    #[serde(default)]
    pub collected_items: Option<Vec<String>>,
    #[serde(default)]
    pub completed_regions: Option<Vec<String>>,
    #[serde(default)]
    pub current_region: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|existing| existing == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

impl WorldState {
    /// Returns `true` when the item was newly collected.
    pub fn collect_item(&mut self, item_id: &str) -> bool {
        push_unique(&mut self.collected_items, item_id)
    }

    /// Returns `true` when the region was newly completed.
    pub fn complete_region(&mut self, region_id: &str) -> bool {
        push_unique(&mut self.completed_regions, region_id)
    }

    pub fn set_current_region(&mut self, region_id: impl Into<String>) {
        self.current_region = Some(region_id.into());
    }

    pub const fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Merge a batch update. Lists only ever grow; scalars are overwritten.
    pub fn apply(&mut self, update: WorldStateUpdate) {
        for item in update.collected_items.unwrap_or_default() {
            self.collect_item(&item);
        }
        for region in update.completed_regions.unwrap_or_default() {
            self.complete_region(&region);
        }
        if let Some(region) = update.current_region {
            self.current_region = Some(region);
        }
        if let Some(position) = update.position {
            self.position = position;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn has_item(&self, item_id: &str) -> bool {
        self.collected_items.iter().any(|item| item == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collectors_are_idempotent_and_ordered() {
        let mut world = WorldState::default();
        assert!(world.collect_item("coffee"));
        assert!(world.collect_item("laptop"));
        assert!(!world.collect_item("coffee"));
        assert_eq!(world.collected_items, vec!["coffee", "laptop"]);

        assert!(world.complete_region("garage"));
        assert!(!world.complete_region("garage"));
        assert_eq!(world.completed_regions.len(), 1);
        assert!(world.has_item("laptop"));
    }

    #[test]
    fn batch_update_merges_and_overwrites() {
        let mut world = WorldState::default();
        world.collect_item("coffee");
        world.apply(WorldStateUpdate {
            collected_items: Some(vec!["coffee".to_string(), "badge".to_string()]),
            completed_regions: None,
            current_region: Some("datacenter".to_string()),
            position: Some(Position::new(3.5, -1.0)),
        });
        assert_eq!(world.collected_items, vec!["coffee", "badge"]);
        assert_eq!(world.current_region.as_deref(), Some("datacenter"));
        assert_eq!(world.position, Position::new(3.5, -1.0));

        world.apply(WorldStateUpdate::default());
        assert_eq!(world.current_region.as_deref(), Some("datacenter"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut world = WorldState::default();
        world.collect_item("coffee");
        world.set_current_region("office");
        world.set_position(Position::new(1.0, 2.0));
        world.reset();
        assert_eq!(world, WorldState::default());
    }
}
