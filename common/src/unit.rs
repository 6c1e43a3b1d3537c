//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type selecting all the entities of some kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct All;

/// Marker type describing an achievement unlocking.
#[derive(Clone, Copy, Debug)]
pub struct Unlocking;
