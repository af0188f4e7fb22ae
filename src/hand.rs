use crate::cards::{parse_cards, Card, CardParseError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

pub const MAX_BOARD: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate card {0}")]
    Duplicate(Card),
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("hands use 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error(transparent)]
    CardParse(#[from] CardParseError),
}

/// Check that no card appears twice.
///
/// ```
/// use tabletop_engine::cards::parse_cards;
/// use tabletop_engine::hand::validate_distinct;
///
/// assert!(validate_distinct(&parse_cards("As Kd 2c").unwrap()).is_ok());
/// assert!(validate_distinct(&parse_cards("As Kd As").unwrap()).is_err());
/// ```
pub fn validate_distinct(cards: &[Card]) -> Result<(), HandError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(HandError::Duplicate(c));
        }
    }
    Ok(())
}

/// Shared community cards, revealed street by street.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > MAX_BOARD {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        validate_distinct(&cards)?;
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Reveal more cards; the board never grows past five.
    pub(crate) fn reveal<I>(&mut self, cards: I) -> Result<(), HandError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut next = self.cards.clone();
        next.extend(cards);
        *self = Board::try_new(next)?;
        Ok(())
    }
}

impl TryFrom<Vec<Card>> for Board {
    type Error = HandError;
    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Board::try_new(cards)
    }
}

impl From<Board> for Vec<Card> {
    fn from(board: Board) -> Self {
        board.cards
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_new(parse_cards(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn board_rejects_six_cards_and_duplicates() {
        let six = parse_cards("2c 3c 4c 5c 6c 7c").unwrap();
        assert_eq!(Board::try_new(six), Err(HandError::TooManyBoardCards(6)));

        let two = Card::new(Rank::Two, Suit::Clubs);
        assert_eq!(Board::try_new(vec![two, two]), Err(HandError::Duplicate(two)));
    }

    #[test]
    fn reveal_extends_until_five() {
        let mut board: Board = "2c, 3c 4c".parse().unwrap();
        board.reveal(parse_cards("5d").unwrap()).unwrap();
        assert_eq!(board.len(), 4);
        board.reveal(parse_cards("9h").unwrap()).unwrap();
        assert!(board.reveal(parse_cards("Th").unwrap()).is_err());
        assert_eq!(board.len(), 5);
    }

    #[test]
    fn parse_errors_surface() {
        assert!(matches!("2c Zz".parse::<Board>(), Err(HandError::CardParse(_))));
    }

    #[test]
    fn board_serializes_as_label_list() {
        let board: Board = "As 10h".parse().unwrap();
        assert_eq!(serde_json::to_string(&board).unwrap(), r#"["A♠","10♥"]"#);
    }
}
