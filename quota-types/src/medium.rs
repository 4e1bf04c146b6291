// SPDX-License-Identifier: GPL-3.0-only

//! Storage medium backing an ephemeral volume

use serde::{Deserialize, Serialize};

/// What backs an ephemeral volume directory.
///
/// Memory-backed volumes live on tmpfs with no persistent block
/// device, so they are never quota-constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMedium {
    /// Node-local disk storage
    #[default]
    Default,

    /// Memory-backed storage (tmpfs)
    Memory,
}
