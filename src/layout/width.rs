use tracing::debug;

use super::{columns::LaneAssignment, normalize::NormalizedEvent};

/// Horizontal slot of an event: it takes `column_index`-th of `column_count` equal parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    pub column_index: usize,
    pub column_count: usize,
}

impl Share {
    /// Whether two slots take the same column or cover a common part of the row.
    fn collides(&self, other: &Share) -> bool {
        // Compares `index / count` fractions without leaving integers.
        self.column_index == other.column_index
            || (self.column_index * other.column_count < (other.column_index + 1) * self.column_count
                && other.column_index * self.column_count
                    < (self.column_index + 1) * other.column_count)
    }
}

/// Sizes every event by the events it directly overlaps with. The event's slot is its rank by lane
/// among them.
///
/// Two events that don't overlap each other but share a long neighbour are not reconciled, so
/// they may end up with different widths. When ranks of two overlapping events collide, their
/// whole cluster is laid out with [cluster_shares] instead.
pub fn local_shares(events: &[NormalizedEvent], assignment: &LaneAssignment) -> Vec<Share> {
    let placements = &assignment.placements;
    let mut shares = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let mut concurrent = events
                .iter()
                .enumerate()
                .filter(|(other_index, other)| {
                    // Overlapping events always end up in one cluster.
                    placements[*other_index].cluster == placements[index].cluster
                        && (*other_index == index || other.overlaps(event))
                })
                .map(|(other_index, _)| other_index)
                .collect::<Vec<_>>();
            concurrent.sort_by_key(|&other_index| (placements[other_index].lane, other_index));

            let column_index = concurrent
                .iter()
                .position(|&other_index| other_index == index)
                .unwrap_or_default();
            Share {
                column_index,
                column_count: concurrent.len(),
            }
        })
        .collect::<Vec<_>>();

    let colliding = colliding_clusters(events, assignment, &shares);
    for (share, placement) in shares.iter_mut().zip(placements) {
        if colliding[placement.cluster] {
            *share = cluster_share(assignment, placement.lane, placement.cluster);
        }
    }
    shares
}

/// Marks clusters that contain two overlapping events with colliding slots.
fn colliding_clusters(
    events: &[NormalizedEvent],
    assignment: &LaneAssignment,
    shares: &[Share],
) -> Vec<bool> {
    let placements = &assignment.placements;
    let mut colliding = vec![false; assignment.cluster_lanes.len()];
    for (index, event) in events.iter().enumerate() {
        let cluster = placements[index].cluster;
        if colliding[cluster] {
            continue;
        }
        let collision = events
            .iter()
            .enumerate()
            .skip(index + 1)
            .take_while(|(other_index, _)| placements[*other_index].cluster == cluster)
            .find(|(other_index, other)| {
                other.overlaps(event) && shares[index].collides(&shares[*other_index])
            });
        if let Some((_, other)) = collision {
            debug!(
                "Slots of {} and {} collide, falling back to the cluster grid",
                event.id, other.id
            );
            colliding[cluster] = true;
        }
    }
    colliding
}

fn cluster_share(assignment: &LaneAssignment, lane: usize, cluster: usize) -> Share {
    Share {
        column_index: lane,
        column_count: assignment.cluster_lanes[cluster],
    }
}

/// Sizes every event by the amount of lanes in its cluster, so all events of a cluster share one
/// grid and overlapping events never intersect.
pub fn cluster_shares(assignment: &LaneAssignment) -> Vec<Share> {
    assignment
        .placements
        .iter()
        .map(|placement| cluster_share(assignment, placement.lane, placement.cluster))
        .collect()
}
