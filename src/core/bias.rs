/// Continuity bias: per-category weights derived from the previous session.
///
/// Picks that match the previous session are favoured: a faction, bot or map
/// used last time is more likely to come up again than any single
/// alternative.
use crate::core::sampler::CandidatePool;

/// Weight for a candidate that held the same role last session, and for
/// one that did not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuityBias {
    pub repeat: f64,
    pub fresh: f64,
}

pub const PLAYER_BIAS: ContinuityBias = ContinuityBias {
    repeat: 0.28,
    fresh: 0.08,
};

pub const BOT_BIAS: ContinuityBias = ContinuityBias {
    repeat: 0.15,
    fresh: 0.10,
};

pub const MAP_BIAS: ContinuityBias = ContinuityBias {
    repeat: 0.34,
    fresh: 0.22,
};

/// Weight reserved for each hireling faction that was hired last session.
pub const HIRELING_REPEAT_WEIGHT: f64 = 0.15;

impl ContinuityBias {
    pub fn weight(&self, was_previous: bool) -> f64 {
        if was_previous {
            self.repeat
        } else {
            self.fresh
        }
    }
}

/// Build a pool over `eligible` (in order), weighting members of `previous`
/// with `bias.repeat` and everything else with `bias.fresh`.
pub fn continuity_pool<I>(
    eligible: impl IntoIterator<Item = I>,
    previous: &[I],
    bias: ContinuityBias,
) -> CandidatePool<I>
where
    I: Copy + PartialEq,
{
    eligible
        .into_iter()
        .map(|id| (id, bias.weight(previous.contains(&id))))
        .collect()
}

/// Hireling weights: each previously hired faction that is still eligible
/// gets [`HIRELING_REPEAT_WEIGHT`]; the remaining mass `1 - reserved` is
/// split evenly over the other eligible factions.
pub fn hireling_pool<I>(eligible: impl IntoIterator<Item = I>, previous: &[I]) -> CandidatePool<I>
where
    I: Copy + PartialEq,
{
    let eligible: Vec<I> = eligible.into_iter().collect();
    let repeats = eligible.iter().filter(|id| previous.contains(id)).count();
    let others = eligible.len() - repeats;

    let reserved = HIRELING_REPEAT_WEIGHT * repeats as f64;
    let share = if others > 0 {
        (1.0 - reserved) / others as f64
    } else {
        0.0
    };

    eligible
        .into_iter()
        .map(|id| {
            let weight = if previous.contains(&id) {
                HIRELING_REPEAT_WEIGHT
            } else {
                share
            };
            (id, weight)
        })
        .collect()
}

/// Equal weight `1 / n` for each of the `n` ids.
pub fn uniform_pool<I>(ids: impl IntoIterator<Item = I>) -> CandidatePool<I>
where
    I: Copy + PartialEq,
{
    let ids: Vec<I> = ids.into_iter().collect();
    let weight = 1.0 / ids.len().max(1) as f64;
    ids.into_iter().map(|id| (id, weight)).collect()
}
