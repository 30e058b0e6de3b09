use crate::bounding_box::BoundingBox;
use crate::view::View;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// A named group of views.
///
/// Once a stage is registered with a [`crate::BlockManager`], views are added and
/// removed through the manager so the layering index stays in step.
#[derive(Debug, Clone)]
pub struct Stage {
    name: SmolStr,
    views: FxHashMap<SmolStr, View>,
}

impl Stage {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Stage {
            name: name.into(),
            views: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts the view, returning the view it replaced under the same name.
    /// The view is re-homed to this stage.
    pub fn add_view(&mut self, mut view: View) -> Option<View> {
        view.set_stage(self.name.clone());
        self.views.insert(SmolStr::new(view.name()), view)
    }

    pub fn remove_view(&mut self, name: &str) -> Option<View> {
        self.views.remove(name)
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    pub(crate) fn view_mut(&mut self, name: &str) -> Option<&mut View> {
        self.views.get_mut(name)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    pub(crate) fn views_mut(&mut self) -> impl Iterator<Item = &mut View> {
        self.views.values_mut()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Union of every member view's bound, or `None` when no view has one.
    pub fn smallest_bound(&self) -> Option<BoundingBox> {
        self.views
            .values()
            .filter_map(|view| view.bound())
            .fold(None, |acc: Option<BoundingBox>, bound| {
                Some(match acc {
                    Some(current) => current.union(bound),
                    None => *bound,
                })
            })
    }
}
