//! Scratch buffers reused across processing calls.

use crate::{
    algorithms::simplification::Simplifier,
    config::TraceConfig,
    mask::Mask,
    types::Point,
};

/// Bounded stack of mask indices. Stands in for recursion in the flood fill,
/// the spur eraser, and the tracer, which keeps its path here.
#[derive(Debug, Clone)]
pub struct WorkStack {
    items: Vec<usize>,
    capacity: usize,
}

impl WorkStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity), capacity }
    }

    #[inline]
    pub fn push(&mut self, i: usize) {
        debug_assert!(self.items.len() < self.capacity, "work stack overflow");
        self.items.push(i);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }
}

/// Limits derived from the workspace capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Cells in the largest padded grid; also the longest trace path
    pub max_cells: usize,
    /// Closed paths must be strictly shorter than this
    pub max_points: usize,
    /// Consecutive dead-end steps a trace may take through traced cells
    pub max_revisits: usize,
}

impl Limits {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        let max_cells = (max_width as usize)
            .saturating_add(2)
            .saturating_mul((max_height as usize).saturating_add(2));
        Self {
            max_cells,
            max_points: max_cells / 2,
            max_revisits: (max_width as usize).saturating_add(max_height as usize),
        }
    }
}

/// Everything a single processing call mutates. Allocated once at worst-case
/// size; nothing grows while a stroke is scanned.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub mask: Mask,
    pub stack: WorkStack,
    pub points: Vec<Point>,
    pub simplifier: Simplifier,
    pub limits: Limits,
}

impl Workspace {
    pub fn new(config: &TraceConfig) -> Self {
        let limits = Limits::new(config.max_width, config.max_height);
        Self {
            mask: Mask::with_capacity(config.max_width, config.max_height),
            stack: WorkStack::with_capacity(limits.max_cells),
            // one extra slot for the closing point
            points: Vec::with_capacity(limits.max_points + 1),
            simplifier: Simplifier::with_capacity(limits.max_points + 1),
            limits,
        }
    }

    /// Forget the previous call's scratch state. The mask is reset when the
    /// next image is loaded into it.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.points.clear();
    }
}
