// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena key for entity nodes.
//!
//! The hierarchy owns every node in a `slotmap::SlotMap`; parent and child
//! links are stored as keys, so nodes never own each other.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an entity node inside an [`EntityHierarchy`](crate::EntityHierarchy).
    pub struct EntityKey;
}
