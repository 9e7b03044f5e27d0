/// Tuning of the collision pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Spatial index layout.
    pub index: quadtree::Config,
    /// Share of the penetration depth each dynamic body is pushed per tick
    /// when two dynamic bodies overlap.
    pub soft_correction_factor: f32,
    /// Distance a continuous mover may drift away from a compenetrable
    /// contact before the contact ends.
    pub sensor_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            index: quadtree::Config::default(),
            soft_correction_factor: 0.1,
            sensor_margin: 0.1,
        }
    }
}
