//! Split operator and split-target selection.
//!
//! Splitting dissolves a community back into singletons. It is the escape hatch the
//! control loop uses when the greedy step stalls, never part of the greedy step itself.

use crate::coagulate_error::Result;
use crate::community::cluster::Community;
use crate::community::error::PartitionError;
use crate::community::objective;
use crate::community::partition::Partition;
use crate::graph::GraphStore;
use rand::Rng;

impl Partition {
    /// Dissolve the community at `index` into one singleton per member.
    ///
    /// Returns the number of communities created. Afterwards `count` has grown by
    /// `|nodes| - 1`; the new singletons occupy the last slots.
    pub fn split<G: GraphStore>(&mut self, index: usize, graph: &G) -> Result<usize> {
        let count = self.count();
        if index >= count {
            return Err(PartitionError::IndexOutOfRange { index, count }.into());
        }
        let singletons = self.communities[index]
            .nodes()
            .iter()
            .map(|&node| Community::singleton(node, graph))
            .collect::<Result<Vec<_>>>()?;

        let dissolved = self.communities.swap_remove(index);
        self.modularity -= dissolved.modularity();
        let mut density_sum =
            objective::density_sum(self.regularization, count, self.total_nodes()) - dissolved.density();

        let created = singletons.len();
        for c in singletons {
            self.modularity += c.modularity();
            density_sum += c.density();
            self.communities.push(c);
        }
        self.regularization =
            objective::regularization(density_sum, self.count(), self.total_nodes());
        Ok(created)
    }
}

/// Score used to rank split candidates; lower is weaker.
///
/// With `normalize` the score is divided by `log10(|nodes|)`, which favors dissolving
/// large weak communities over small weak ones. Singletons are never normalized.
pub fn split_score(community: &Community, normalize: bool) -> f64 {
    let score = community.modularity() + community.density();
    if normalize && community.len() > 1 {
        score / (community.len() as f64).log10()
    } else {
        score
    }
}

/// Pick the weakest multi-member community among a random sample of `sample_size`
/// of them (`0` samples all).
///
/// Returns `None` when every community is a singleton.
pub fn pick_split_target<R: Rng + ?Sized>(
    partition: &Partition,
    sample_size: usize,
    normalize: bool,
    rng: &mut R,
) -> Option<usize> {
    let eligible: Vec<usize> = partition
        .communities()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.len() > 1)
        .map(|(slot, _)| slot)
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let sampled: Vec<usize> = if sample_size == 0 || sample_size >= eligible.len() {
        eligible
    } else {
        rand::seq::index::sample(rng, eligible.len(), sample_size)
            .into_iter()
            .map(|i| eligible[i])
            .collect()
    };

    sampled
        .into_iter()
        .map(|slot| (slot, split_score(&partition.communities()[slot], normalize)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(slot, _)| slot)
}
