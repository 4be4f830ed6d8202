use tracing::trace;

use super::normalize::NormalizedEvent;

/// Where the sweep put a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub lane: usize,
    pub cluster: usize,
}

#[derive(Debug, Default)]
pub struct LaneAssignment {
    /// One entry per event, in the same order as the events.
    pub placements: Vec<Placement>,
    /// Amount of lanes opened by each cluster.
    pub cluster_lanes: Vec<usize>,
}

/// Greedily packs events into lanes. Events have to be sorted by start.
///
/// Every lane remembers only the last event placed into it. Because events arrive in start order,
/// that event is the only one in the lane that can still overlap anything that comes after. When
/// an event starts after everything seen so far has ended, the cluster is closed and lanes are
/// reset, so unrelated parts of the day don't affect each other.
pub fn assign_lanes(events: &[NormalizedEvent]) -> LaneAssignment {
    let mut assignment = LaneAssignment::default();
    let mut lanes: Vec<usize> = vec![];
    let mut cluster_end: Option<i64> = None;

    for (index, event) in events.iter().enumerate() {
        if cluster_end.is_some_and(|end| event.start_minute >= end) {
            trace!(
                "Closing cluster {} with {} lanes before {}",
                assignment.cluster_lanes.len(),
                lanes.len(),
                event.id
            );
            assignment.cluster_lanes.push(lanes.len());
            lanes.clear();
        }

        let free_lane = lanes
            .iter()
            .position(|&last| !events[last].overlaps(event));
        let lane = match free_lane {
            Some(lane) => {
                lanes[lane] = index;
                lane
            }
            None => {
                lanes.push(index);
                lanes.len() - 1
            }
        };

        cluster_end = Some(match cluster_end {
            Some(end) if event.start_minute < end => end.max(event.end_minute),
            _ => event.end_minute,
        });

        assignment.placements.push(Placement {
            lane,
            cluster: assignment.cluster_lanes.len(),
        });
    }

    if !lanes.is_empty() {
        assignment.cluster_lanes.push(lanes.len());
    }

    assignment
}

#[cfg(test)]
mod tests {
    use crate::layout::normalize::NormalizedEvent;

    use super::{Placement, assign_lanes};

    fn event(id: &str, start_minute: i64, end_minute: i64) -> NormalizedEvent {
        NormalizedEvent {
            id: id.into(),
            label: id.into(),
            start_minute,
            end_minute,
            duration_minutes: end_minute - start_minute,
        }
    }

    fn lanes(events: &[NormalizedEvent]) -> Vec<usize> {
        assign_lanes(events)
            .placements
            .iter()
            .map(|v| v.lane)
            .collect()
    }

    #[test]
    fn test_empty() {
        let assignment = assign_lanes(&[]);
        assert!(assignment.placements.is_empty());
        assert!(assignment.cluster_lanes.is_empty());
    }

    #[test]
    fn test_back_to_back_resets_cluster() {
        let events = [event("a", 540, 600), event("b", 600, 660)];
        let assignment = assign_lanes(&events);
        assert_eq!(
            assignment.placements,
            vec![
                Placement {
                    lane: 0,
                    cluster: 0
                },
                Placement {
                    lane: 0,
                    cluster: 1
                }
            ]
        );
        assert_eq!(assignment.cluster_lanes, vec![1, 1]);
    }

    #[test]
    fn test_identical_events_get_own_lanes() {
        let events = [
            event("a", 480, 540),
            event("b", 480, 540),
            event("c", 480, 540),
        ];
        assert_eq!(lanes(&events), vec![0, 1, 2]);
        assert_eq!(assign_lanes(&events).cluster_lanes, vec![3]);
    }

    #[test]
    fn test_chain_reuses_first_lane() {
        let events = [
            event("a", 540, 600),
            event("b", 570, 630),
            event("c", 600, 660),
        ];
        let assignment = assign_lanes(&events);
        assert_eq!(lanes(&events), vec![0, 1, 0]);
        assert_eq!(assignment.cluster_lanes, vec![2]);
        assert!(assignment.placements.iter().all(|v| v.cluster == 0));
    }

    #[test]
    fn test_long_event_keeps_cluster_open() {
        // "a" spans the whole morning, everything else has to go next to it.
        let events = [
            event("a", 480, 720),
            event("b", 490, 520),
            event("c", 530, 560),
            event("d", 540, 600),
            event("e", 720, 780),
        ];
        let assignment = assign_lanes(&events);
        assert_eq!(lanes(&events), vec![0, 1, 1, 2, 0]);
        assert_eq!(assignment.cluster_lanes, vec![3, 1]);
        assert_eq!(assignment.placements[4].cluster, 1);
    }
}
