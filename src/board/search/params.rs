/// Tunable pruning and reduction parameters.
///
/// Depths are in plies; margins are in centipawns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    pub aspiration_delta: i32,
    pub aspiration_min_depth: i32,
    pub rfp_max_depth: i32,
    pub rfp_margin: i32,
    pub null_min_depth: i32,
    pub null_base_reduction: i32,
    pub null_depth_divisor: i32,
    pub futility_max_depth: i32,
    pub futility_base: i32,
    pub futility_margin: i32,
    pub lmr_min_depth: i32,
    /// Moves searched at full depth before reductions start.
    pub lmr_min_moves: usize,
    pub lmr_divisor: f64,
    pub iir_min_depth: i32,
    /// Extensions allowed along a single line.
    pub max_extensions: i32,
    pub qsearch_max_depth: i32,
    pub delta_margin: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_delta: 25,
            aspiration_min_depth: 4,
            rfp_max_depth: 7,
            rfp_margin: 80,
            null_min_depth: 3,
            null_base_reduction: 3,
            null_depth_divisor: 4,
            futility_max_depth: 6,
            futility_base: 80,
            futility_margin: 90,
            lmr_min_depth: 3,
            lmr_min_moves: 3,
            lmr_divisor: 2.25,
            iir_min_depth: 4,
            max_extensions: 16,
            qsearch_max_depth: 12,
            delta_margin: 200,
        }
    }
}
