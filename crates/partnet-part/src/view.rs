//! Network view handed to part and aspect callbacks
//!
//! Parts never see the whole network; they get the part sub-registry and
//! read access to the channel map.

use partnet_core::{ChannelId, NetworkId, PartId, PartPos};

/// Part-facing view of the network a part belongs to
pub trait PartNetworkView {
    fn network_id(&self) -> NetworkId;

    /// Register a part id. Returns false if the id is already registered.
    fn add_part(&mut self, id: PartId, pos: PartPos) -> bool;

    /// Unregister a part id. Returns false if it was not registered.
    fn remove_part(&mut self, id: PartId) -> bool;

    fn contains_part(&self, id: PartId) -> bool;

    fn part_pos(&self, id: PartId) -> Option<PartPos>;

    fn part_count(&self) -> usize;

    fn channel_id(&self, name: &str) -> Option<ChannelId>;

    fn channel_name(&self, id: ChannelId) -> Option<&str>;
}
