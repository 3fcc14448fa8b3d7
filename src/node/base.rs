//! Plain occupancy node

use std::io::{self, Read, Write};

use super::{ChildSlots, OctreeNode};

/// Node carrying occupancy only.
#[derive(Debug, Clone, Default)]
pub struct OccupancyNode {
    log_odds: f32,
    children: ChildSlots<OccupancyNode>,
}

impl OccupancyNode {
    /// Create a leaf with the given log-odds.
    pub fn new(log_odds: f32) -> Self {
        Self {
            log_odds,
            children: ChildSlots::new(),
        }
    }
}

impl PartialEq for OccupancyNode {
    fn eq(&self, other: &Self) -> bool {
        self.log_odds == other.log_odds
    }
}

impl OctreeNode for OccupancyNode {
    const TREE_TYPE: &'static str = "OccupancyOctree";

    fn log_odds(&self) -> f32 {
        self.log_odds
    }

    fn set_log_odds(&mut self, value: f32) {
        self.log_odds = value;
    }

    fn children(&self) -> &ChildSlots<Self> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut ChildSlots<Self> {
        &mut self.children
    }

    fn copy_attributes_from(&mut self, other: &Self) {
        self.log_odds = other.log_odds;
    }

    fn write_data<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.log_odds.to_ne_bytes())
    }

    fn read_data<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        self.log_odds = f32::from_ne_bytes(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_four_bytes() {
        let node = OccupancyNode::new(-0.4);
        let mut out = Vec::new();
        node.write_data(&mut out).unwrap();
        assert_eq!(out.len(), 4);

        let mut decoded = OccupancyNode::default();
        decoded.read_data(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, node);
    }
}
