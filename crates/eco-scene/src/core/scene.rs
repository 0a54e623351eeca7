use std::collections::HashMap;

use crate::api::types::ElementId;
use crate::components::element::SceneElement;
use crate::components::layer::SceneLayer;

/// Flat element storage for one composed frame.
/// Small by construction (a few hundred elements at most).
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    elements: Vec<SceneElement>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            elements: Vec::with_capacity(256),
            next_id: 1,
        }
    }

    /// Add an element, assigning it the next id.
    pub fn spawn(&mut self, mut element: SceneElement) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        element.id = id;
        self.elements.push(element);
        id
    }

    /// Spawn copies of every element of another scene, re-numbered.
    pub fn extend_from(&mut self, other: &Scene) {
        for element in other.iter() {
            self.spawn(element.clone());
        }
    }

    /// Get a reference to an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Iterate over all elements in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneElement> {
        self.elements.iter()
    }

    /// Iterate over all elements mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneElement> {
        self.elements.iter_mut()
    }

    /// Elements sorted back-to-front by layer; spawn order is kept within a layer.
    pub fn draw_order(&self) -> Vec<&SceneElement> {
        let mut ordered: Vec<&SceneElement> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.layer);
        ordered
    }

    /// Find the first element with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.tag == tag)
    }

    /// Find all elements whose tag starts with `prefix` ("rain-", "tree/stage5/").
    pub fn find_all_by_prefix(&self, prefix: &str) -> Vec<&SceneElement> {
        self.elements.iter().filter(|e| e.tag.starts_with(prefix)).collect()
    }

    /// All elements on one layer.
    pub fn layer(&self, layer: SceneLayer) -> impl Iterator<Item = &SceneElement> {
        self.elements.iter().filter(move |e| e.layer == layer)
    }

    /// Whether anything is drawn on the layer.
    pub fn has_layer(&self, layer: SceneLayer) -> bool {
        self.layer(layer).next().is_some()
    }

    /// Number of elements in the scene.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove all elements and restart numbering.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.next_id = 1;
    }

    /// Stamp elements that were not in `previous` as appearing at `now`.
    /// Elements whose tag was already on screen keep their start time.
    pub fn carry_start_times(&mut self, previous: &Scene, now: f32) {
        let shown: HashMap<&str, f32> = previous
            .iter()
            .map(|e| (e.tag.as_str(), e.started_at))
            .collect();
        for element in &mut self.elements {
            element.started_at = shown.get(element.tag.as_str()).copied().unwrap_or(now);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
