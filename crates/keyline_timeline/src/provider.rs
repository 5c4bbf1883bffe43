// SPDX-License-Identifier: MIT OR Apache-2.0
//! Source of initial values for new tracks.

use crate::binding::{EntityId, PropertyKind};
use crate::value::KeyframeValue;

/// An animatable element supplied by the host.
///
/// The timeline seeds one track per offered property with the element's
/// current value at time 0.
pub trait ElementProvider {
    /// Entity owning the tracks
    fn owner(&self) -> EntityId;

    /// Current value of every property that should be animated
    fn initial_values(&self) -> Vec<(PropertyKind, KeyframeValue)>;
}
