//! Domain definitions.

pub mod achievement;
pub mod goal;
pub mod notification;
pub mod property;
pub mod sale;

use serde::{Deserialize, Deserializer};

pub use self::{
    achievement::Achievement, goal::Goal, notification::Notification,
    property::Property, sale::Sale,
};

/// Deserializes an explicitly nullable field, so `null` becomes `Some(None)`
/// while a missing field (with `#[serde(default)]`) stays [`None`].
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
