/// Lexicographic five-index combinations of `0..n`, i.e. C(n, 5) items.
///
/// Yields nothing when `n < 5`.
#[derive(Debug, Clone)]
pub struct ChooseFive {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl ChooseFive {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }
}

impl Iterator for ChooseFive {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices;

        // rightmost slot that still has room to move
        let mut i = 5;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - (5 - i) {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn counts_match_binomials() {
        assert_eq!(ChooseFive::new(4).count(), 0);
        assert_eq!(ChooseFive::new(5).count(), 1);
        assert_eq!(ChooseFive::new(6).count(), 6);
        assert_eq!(ChooseFive::new(7).count(), 21);
    }

    #[test]
    fn seven_choose_five_is_lexicographic_and_distinct() {
        let combos: Vec<[usize; 5]> = ChooseFive::new(7).collect();
        assert_eq!(combos.first(), Some(&[0, 1, 2, 3, 4]));
        assert_eq!(combos[1], [0, 1, 2, 3, 5]);
        assert_eq!(combos.last(), Some(&[2, 3, 4, 5, 6]));
        assert!(combos.windows(2).all(|w| w[0] < w[1]));
        let unique: HashSet<_> = combos.iter().collect();
        assert_eq!(unique.len(), 21);
        assert!(combos.iter().all(|c| c.iter().all(|&i| i < 7)));
    }

    #[test]
    fn exhausted_iterator_stays_empty() {
        let mut it = ChooseFive::new(5);
        assert_eq!(it.next(), Some([0, 1, 2, 3, 4]));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }
}
