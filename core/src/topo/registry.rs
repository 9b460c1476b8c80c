use std::collections::HashMap;
use super::{EntityId, Shape};
use crate::geometry::Aabb;
use serde::{Deserialize, Serialize};

/// Shapes and bounds of an imported model, as delivered by the import layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub shapes: Vec<Shape>,
    pub bounds: Aabb,
}

impl ModelSnapshot {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Session table of the loaded model's pickable shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRegistry {
    shapes: HashMap<EntityId, Shape>,
    bounds: Aabb,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self {
            shapes: HashMap::new(),
            bounds: Aabb::empty(),
        }
    }
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the registry contents with a freshly imported model.
    pub fn load(&mut self, snapshot: ModelSnapshot) {
        self.clear();
        self.bounds = snapshot.bounds;
        for shape in snapshot.shapes {
            self.register(shape);
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.bounds = Aabb::empty();
    }

    pub fn register(&mut self, shape: Shape) {
        self.shapes.insert(shape.id, shape);
    }

    pub fn resolve(&self, id: &EntityId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Axis-aligned bounds of the whole model.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}
