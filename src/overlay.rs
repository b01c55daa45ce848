//! Inflated overlays.

use serde::Serialize;

/// One overlay: an optional title and its layers in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay<L> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    layers: Vec<L>,
}

impl<L> Overlay<L> {
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            layers: Vec::new(),
        }
    }

    /// Builder-style append, mostly for tests and hosts assembling overlays by hand.
    pub fn with_layer(mut self, layer: L) -> Self {
        self.layers.push(layer);
        self
    }

    pub(crate) fn push(&mut self, layer: L) {
        self.layers.push(layer);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn layers(&self) -> &[L] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<L> {
        self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
