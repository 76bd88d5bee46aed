//! Configuration management for the sociogram analyzer

/// Default configuration for the sociogram analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum number of friends a respondent can nominate.
    /// Denominator basis for Connectedness and Reciprocity.
    pub nomination_cap: usize,

    /// Minimum in-degree for a node to count as a Star
    pub star_threshold: usize,

    /// Minimum reciprocal same-community neighbors for Clique membership
    pub clique_threshold: usize,

    /// Minimum distinct nominee communities for an Interconnector
    pub interconnector_threshold: usize,

    /// Hop limit for the Speed of Communication metric
    pub broadcast_radius: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            nomination_cap: 3,
            star_threshold: 4,
            clique_threshold: 2,
            interconnector_threshold: 3,
            broadcast_radius: 3,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with custom values
    pub fn new(
        nomination_cap: usize,
        star_threshold: usize,
        clique_threshold: usize,
        interconnector_threshold: usize,
        broadcast_radius: usize,
    ) -> Self {
        Self {
            nomination_cap,
            star_threshold,
            clique_threshold,
            interconnector_threshold,
            broadcast_radius,
        }
    }
}
