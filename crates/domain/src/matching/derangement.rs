use rand::{seq::SliceRandom, Rng};

/// Participants in giving order: every member gives a present to the
/// next member and the last member gives to the first one.
///
/// With at least two members nobody is their own receiver, everybody
/// gives exactly once and everybody receives exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftCycle<T> {
    members: Vec<T>,
}

impl<T> GiftCycle<T> {
    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn receiver_of(&self, giver_index: usize) -> &T {
        &self.members[(giver_index + 1) % self.members.len()]
    }

    /// (giver, receiver) pairs in cycle order
    pub fn pairs(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(move |(i, giver)| (giver, self.receiver_of(i)))
    }
}

/// Shuffles the participants uniformly and closes them into a single
/// `GiftCycle`.
///
/// Returns `None` when there are fewer than two participants, as nobody
/// can be matched then.
pub fn generate_cycle<T, R>(mut participants: Vec<T>, rng: &mut R) -> Option<GiftCycle<T>>
where
    R: Rng + ?Sized,
{
    if participants.len() < 2 {
        return None;
    }
    // Fisher-Yates
    participants.shuffle(rng);

    Some(GiftCycle {
        members: participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    #[test]
    fn refuses_to_match_less_than_two() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_cycle(Vec::<u32>::new(), &mut rng).is_none());
        assert!(generate_cycle(vec![1], &mut rng).is_none());
    }

    #[test]
    fn two_participants_give_to_each_other() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let cycle = generate_cycle(vec!["A", "B"], &mut rng).unwrap();
            let pairs = cycle.pairs().collect::<Vec<_>>();
            assert_eq!(pairs.len(), 2);
            assert!(pairs.contains(&(&"A", &"B")));
            assert!(pairs.contains(&(&"B", &"A")));
        }
    }

    #[test]
    fn nobody_is_assigned_to_themselves() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 2..=15 {
            for _ in 0..50 {
                let cycle = generate_cycle((0..n).collect::<Vec<_>>(), &mut rng).unwrap();
                for (giver, receiver) in cycle.pairs() {
                    assert_ne!(giver, receiver);
                }
            }
        }
    }

    #[test]
    fn everybody_gives_and_receives_exactly_once() {
        let mut rng = StdRng::seed_from_u64(4);
        for n in 2..=15 {
            let participants = (0..n).collect::<Vec<_>>();
            let cycle = generate_cycle(participants.clone(), &mut rng).unwrap();
            assert_eq!(cycle.len(), n);

            let givers = cycle.pairs().map(|(g, _)| *g).collect::<Vec<_>>();
            let receivers = cycle.pairs().map(|(_, r)| *r).collect::<Vec<_>>();
            for p in &participants {
                assert_eq!(givers.iter().filter(|g| *g == p).count(), 1);
                assert_eq!(receivers.iter().filter(|r| *r == p).count(), 1);
            }
        }
    }

    #[test]
    fn forms_a_single_cycle() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 9;
        let cycle = generate_cycle((0..n).collect::<Vec<_>>(), &mut rng).unwrap();
        let next = cycle.pairs().map(|(g, r)| (*g, *r)).collect::<HashMap<_, _>>();

        let start = cycle.members()[0];
        let mut visited = HashSet::new();
        let mut current = start;
        loop {
            assert!(visited.insert(current));
            current = next[&current];
            if current == start {
                break;
            }
        }
        assert_eq!(visited.len(), n);
    }

    /// Rotates the cycle so that member 0 is first, which gives every
    /// distinct cycle a single representation
    fn canonical(cycle: &GiftCycle<usize>) -> Vec<usize> {
        let members = cycle.members();
        let start = members.iter().position(|m| *m == 0).unwrap();
        members[start..]
            .iter()
            .chain(members[..start].iter())
            .copied()
            .collect()
    }

    #[test]
    fn cycles_are_uniformly_distributed() {
        let mut rng = StdRng::seed_from_u64(6);
        let trials = 6000;
        let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
        for _ in 0..trials {
            let cycle = generate_cycle(vec![0, 1, 2], &mut rng).unwrap();
            *counts.entry(canonical(&cycle)).or_default() += 1;
        }

        // (N-1)! distinct cycles for N = 3
        assert_eq!(counts.len(), 2);
        let expected = trials as f64 / counts.len() as f64;
        let chi_square: f64 = counts
            .values()
            .map(|observed| {
                let diff = *observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // One degree of freedom, p < 0.0005
        assert!(chi_square < 12.12, "chi square was {}", chi_square);
    }

    #[test]
    fn every_cycle_of_four_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let cycle = generate_cycle(vec![0, 1, 2, 3], &mut rng).unwrap();
            seen.insert(canonical(&cycle));
        }
        assert_eq!(seen.len(), 6);
    }
}
