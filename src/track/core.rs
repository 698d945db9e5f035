use std::collections::BTreeMap;

use blake3::Hash;

use crate::gap::{MarginProperty, StyleTarget};

/// One slide's inline style state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideElement {
    styles: BTreeMap<MarginProperty, String>,
    writes: usize,
}

impl SlideElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current inline value, `None` when the property is unset or cleared.
    pub fn style(&self, property: MarginProperty) -> Option<&str> {
        self.styles.get(&property).map(String::as_str)
    }

    pub fn styles(&self) -> &BTreeMap<MarginProperty, String> {
        &self.styles
    }

    /// Total writes received, clears included.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Inline style attribute text, e.g. `margin-right: 10px;`.
    pub fn css_text(&self) -> String {
        self.styles
            .iter()
            .map(|(property, value)| format!("{}: {};", property.css_name(), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StyleTarget for SlideElement {
    fn set_style(&mut self, property: MarginProperty, value: &str) {
        self.writes += 1;
        if value.is_empty() {
            self.styles.remove(&property);
        } else {
            self.styles.insert(property, value.to_string());
        }
    }
}

/// Ordered slide list as built by the host. The gaps core only reads the order
/// and writes margins; slides are added or removed by whoever builds the track.
#[derive(Debug, Clone, Default)]
pub struct SlideTrack {
    slides: Vec<SlideElement>,
}

impl SlideTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slides(count: usize) -> Self {
        Self {
            slides: vec![SlideElement::new(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn push(&mut self, slide: SlideElement) {
        self.slides.push(slide);
    }

    pub fn slides(&self) -> &[SlideElement] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [SlideElement] {
        &mut self.slides
    }

    pub fn get(&self, idx: usize) -> Option<&SlideElement> {
        self.slides.get(idx)
    }

    /// Resize the track, appending fresh slides or dropping from the end.
    pub fn rebuild(&mut self, count: usize) {
        self.slides.resize_with(count, SlideElement::new);
    }

    pub fn total_writes(&self) -> usize {
        self.slides.iter().map(SlideElement::writes).sum()
    }

    /// Fingerprint of every slide's inline margins, in track order.
    pub fn style_digest(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for (idx, slide) in self.slides.iter().enumerate() {
            hasher.update(&(idx as u64).to_le_bytes());
            hasher.update(slide.css_text().as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}
