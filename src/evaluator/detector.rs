use super::analysis::HandAnalysis;
use crate::evaluator::{Category, Evaluation};

/// One hand category: recognizes it and builds the tiebreak ranking.
pub trait CategoryDetector {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation>;
}

pub struct StraightFlush;

impl CategoryDetector for StraightFlush {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let top = a.straight_top.filter(|_| a.flush)?;
        Some(a.evaluation(Category::StraightFlush, &[top]))
    }
}

pub struct FourOfAKind;

impl CategoryDetector for FourOfAKind {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let quad = a.group_of(4)?;
        Some(a.evaluation(Category::FourOfAKind, &[quad, *a.kickers().first()?]))
    }
}

pub struct FullHouse;

impl CategoryDetector for FullHouse {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let trips = a.group_of(3)?;
        let pair = a.group_of(2)?;
        Some(a.evaluation(Category::FullHouse, &[trips, pair]))
    }
}

pub struct Flush;

impl CategoryDetector for Flush {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        a.flush.then(|| a.evaluation(Category::Flush, &a.ranks))
    }
}

pub struct Straight;

impl CategoryDetector for Straight {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        Some(a.evaluation(Category::Straight, &[a.straight_top?]))
    }
}

pub struct ThreeOfAKind;

impl CategoryDetector for ThreeOfAKind {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let trips = a.group_of(3)?;
        let mut tiebreak = vec![trips];
        tiebreak.extend(a.kickers());
        Some(a.evaluation(Category::ThreeOfAKind, &tiebreak))
    }
}

pub struct TwoPair;

impl CategoryDetector for TwoPair {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let mut tiebreak = a.pairs();
        if tiebreak.len() != 2 {
            return None;
        }
        tiebreak.extend(a.kickers());
        Some(a.evaluation(Category::TwoPair, &tiebreak))
    }
}

pub struct OnePair;

impl CategoryDetector for OnePair {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        let pair = a.group_of(2)?;
        let mut tiebreak = vec![pair];
        tiebreak.extend(a.kickers());
        Some(a.evaluation(Category::Pair, &tiebreak))
    }
}

pub struct HighCard;

impl CategoryDetector for HighCard {
    fn detect(&self, a: &HandAnalysis) -> Option<Evaluation> {
        Some(a.evaluation(Category::HighCard, &a.ranks))
    }
}

/// Highest category first; `HighCard` always matches.
pub const DETECTORS: [&dyn CategoryDetector; 9] = [
    &StraightFlush,
    &FourOfAKind,
    &FullHouse,
    &Flush,
    &Straight,
    &ThreeOfAKind,
    &TwoPair,
    &OnePair,
    &HighCard,
];
