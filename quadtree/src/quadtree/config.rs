#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of nodes and owner slots reserved up front.
    pub pool_size: usize,
    /// A leaf holding this many entities splits on the next insert (MAX_OBJECTS_PER_NODE).
    pub node_capacity: usize,
    /// Leaves at this depth never split and accept any number of entities.
    pub max_depth: usize,
    /// Interior nodes whose subtree drops to this many entities collapse back into a leaf.
    /// Clamped below `node_capacity`.
    pub merge_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_size: 256,
            node_capacity: 8,
            max_depth: 8,
            merge_threshold: 4,
        }
    }
}
