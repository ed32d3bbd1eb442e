use std::collections::BTreeMap;
use crate::slide::{Slide, SlideContent, SlideKey};

struct Mounted<R> {
    key: SlideKey,
    image_ref: Option<String>,      // What the resource was (or will be) loaded from
    resource: Option<R>,
}

impl<R> Mounted<R> {
    fn new(slide: &Slide, position: usize) -> Self {
        Self {
            key: slide.key(position),
            image_ref: image_ref(slide).map(str::to_string),
            resource: None,
        }
    }

    fn holds(&self, slide: &Slide, position: usize) -> bool {
        self.key == slide.key(position) && self.image_ref.as_deref() == image_ref(slide)
    }
}

fn image_ref(slide: &Slide) -> Option<&str> {
    match slide.content() {
        SlideContent::Image { image_ref } => Some(image_ref),
        _ => None,
    }
}

/// Per-slide surfaces owned by the view, keyed by slide position.
///
/// A slot is acquired when its slide mounts and dropped when the slide
/// unmounts, a different slide takes its position, or the slide at that
/// position now shows a different image. Resources arrive later (images load
/// asynchronously) and are only accepted for the slide identity and image
/// they were requested for.
pub struct SlideMounts<R> {
    nodes: BTreeMap<usize, Mounted<R>>,
}

impl<R> SlideMounts<R> {
    pub fn new() -> Self {
        Self { nodes: BTreeMap::new() }
    }

    /// Bring the mounts in line with `slides`. Returns the positions that were
    /// newly mounted and still need their resource.
    pub fn sync(&mut self, slides: &[Slide]) -> Vec<usize> {
        self.nodes.retain(|&position, node| {
            slides
                .get(position)
                .is_some_and(|slide| node.holds(slide, position))
        });

        let mut mounted = Vec::new();
        for (position, slide) in slides.iter().enumerate() {
            if !self.nodes.contains_key(&position) {
                self.nodes.insert(position, Mounted::new(slide, position));
                mounted.push(position);
            }
        }
        mounted
    }

    /// Store the image loaded from `image_ref` for a mounted slide. Returns
    /// false (and drops the resource) when the slot is gone, belongs to another
    /// slide, or now wants a different image.
    pub fn fill(&mut self, position: usize, key: &SlideKey, image_ref: &str, resource: R) -> bool {
        match self.nodes.get_mut(&position) {
            Some(node) if &node.key == key && node.image_ref.as_deref() == Some(image_ref) => {
                node.resource = Some(resource);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, position: usize) -> Option<&R> {
        self.nodes.get(&position).and_then(|node| node.resource.as_ref())
    }

    pub fn is_mounted(&self, position: usize) -> bool {
        self.nodes.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<R> Default for SlideMounts<R> {
    fn default() -> Self {
        Self::new()
    }
}
