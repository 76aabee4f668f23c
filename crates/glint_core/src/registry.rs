//! Material registry.
//!
//! Surfaces loaded with models (or declared in a scene file) are stored here
//! and referenced by index. The registry is an ordinary value owned by the
//! scene, so loaders receive it explicitly instead of reaching for a global.

use std::collections::HashMap;

use crate::surface::Surface;

/// Named surfaces addressed by a stable index.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    surfaces: Vec<Surface>,
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface under a name and return its index.
    ///
    /// Re-adding an existing name replaces the stored surface and keeps
    /// the original index.
    pub fn add(&mut self, name: impl Into<String>, surface: Surface) -> usize {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            self.surfaces[id] = surface;
            return id;
        }
        let id = self.surfaces.len();
        log::debug!("Registered material #{}: {}", id, name);
        self.surfaces.push(surface);
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        id
    }

    /// Index of a named surface, registering it from the built-in library
    /// (or the library fallback) on first use.
    pub fn resolve(&mut self, name: &str) -> usize {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        self.add(name, Surface::named(name))
    }

    /// Surface by index.
    pub fn get(&self, id: usize) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    /// Index of an already registered name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Name of a registered surface.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Drop every surface.
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.names.clear();
        self.by_name.clear();
    }
}
