use crate::cards::{Card, Rank};
use crate::evaluator::{Category, Evaluation, HandValue};

/// Everything the category detectors need to know about five cards,
/// computed once per combination.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Cards by rank, then suit, highest first.
    pub cards: [Card; 5],
    pub ranks: [Rank; 5],
    /// `(rank, count)` ordered by count and then rank, both descending.
    /// `AAKKQ` groups as `[(A, 2), (K, 2), (Q, 1)]`.
    pub groups: Vec<(Rank, u8)>,
    pub flush: bool,
    /// Top card of a straight; Five for the wheel.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut sorted = *cards;
        sorted.sort_by(|a, b| b.cmp(a));
        let ranks = sorted.map(Card::rank);

        let mut counts = [0u8; 15];
        for r in ranks {
            counts[r.value() as usize] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .filter_map(|&r| match counts[r.value() as usize] {
                0 => None,
                n => Some((r, n)),
            })
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let flush = sorted.iter().all(|c| c.suit() == sorted[0].suit());
        let straight_top = straight_top(&ranks);
        Self { cards: sorted, ranks, groups, flush, straight_top }
    }

    /// Rank held exactly `count` times, highest first.
    pub fn group_of(&self, count: u8) -> Option<Rank> {
        self.groups.iter().find(|g| g.1 == count).map(|g| g.0)
    }

    pub fn pairs(&self) -> Vec<Rank> {
        self.groups.iter().filter(|g| g.1 == 2).map(|g| g.0).collect()
    }

    pub fn kickers(&self) -> Vec<Rank> {
        self.groups.iter().filter(|g| g.1 == 1).map(|g| g.0).collect()
    }

    pub fn evaluation(&self, category: Category, tiebreak: &[Rank]) -> Evaluation {
        let mut padded = [Rank::Two; 5];
        for (slot, r) in padded.iter_mut().zip(tiebreak) {
            *slot = *r;
        }
        Evaluation { category, best_five: self.cards, value: HandValue::from_parts(category, &padded) }
    }
}

/// `ranks` must be sorted descending.
fn straight_top(ranks: &[Rank; 5]) -> Option<Rank> {
    if ranks.windows(2).all(|w| w[0].value() == w[1].value() + 1) {
        return Some(ranks[0]);
    }
    let wheel = [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two];
    (*ranks == wheel).then_some(Rank::Five)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn analyze(s: &str) -> HandAnalysis {
        let v = parse_cards(s).unwrap();
        HandAnalysis::new(&[v[0], v[1], v[2], v[3], v[4]])
    }

    #[test]
    fn groups_sort_by_count_then_rank() {
        let a = analyze("Kd 2c Ks 2h Qc");
        assert_eq!(a.groups, vec![(Rank::King, 2), (Rank::Two, 2), (Rank::Queen, 1)]);
        assert_eq!(a.pairs(), vec![Rank::King, Rank::Two]);
        assert_eq!(a.kickers(), vec![Rank::Queen]);
        assert_eq!(a.group_of(3), None);
    }

    #[test]
    fn cards_sort_descending() {
        let a = analyze("3s Ah 5d Kc 9s");
        assert_eq!(a.ranks, [Rank::Ace, Rank::King, Rank::Nine, Rank::Five, Rank::Three]);
        assert!(!a.flush);
        assert_eq!(a.straight_top, None);
    }

    #[test]
    fn wheel_tops_out_at_five() {
        assert_eq!(analyze("As 2h 3d 4c 5s").straight_top, Some(Rank::Five));
        assert_eq!(analyze("Ts Js Qs Ks As").straight_top, Some(Rank::Ace));
        assert!(analyze("Ts Js Qs Ks As").flush);
        assert_eq!(analyze("As Kh Qd Jc 9s").straight_top, None);
    }
}
