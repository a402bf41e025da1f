use crate::model::Block;

/// Dimanches (7h) franchis entre l'instant `from` exclu et `to` inclus.
pub(super) fn boundaries_between(from: (i32, u8), to: (i32, u8)) -> Vec<i32> {
    let first = Block::week_index(from.0, from.1) + 1;
    let last = Block::week_index(to.0, to.1);
    (first..=last).map(Block::week_start_day).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_sunday_start_rolls_over_once() {
        assert_eq!(boundaries_between((6, 19), (7, 7)), vec![7]);
        assert!(Block::is_week_boundary(7, 7));
    }

    #[test]
    fn same_instant_or_same_week_does_not_roll() {
        assert!(boundaries_between((7, 7), (7, 7)).is_empty());
        assert!(boundaries_between((7, 7), (13, 23)).is_empty());
        // dimanche 6h est encore la semaine précédente
        assert!(boundaries_between((1, 7), (7, 6)).is_empty());
    }

    #[test]
    fn gap_over_several_weeks_rolls_each_boundary() {
        assert_eq!(boundaries_between((1, 7), (22, 10)), vec![7, 14, 21]);
    }
}
