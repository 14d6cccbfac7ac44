//! Capability shared by all containers in the crate.

/// Size inspection and bulk removal, implemented by every container so
/// callers can handle them uniformly (including as `dyn Container`).
pub trait Container {
    /// Number of elements currently stored.
    fn len(&self) -> usize;

    /// Drops every element.
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
