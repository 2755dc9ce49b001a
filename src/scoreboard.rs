//! Ranked scoreboard rows
//!
//! Turns an already-sorted `(name, score)` list into numbered standings.
//! Equal scores share a rank and the next rank is skipped (1, 1, 3).

/// A single scoreboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing<'a> {
    /// 1-indexed rank
    pub rank: usize,
    pub name: &'a str,
    pub score: i64,
}

/// Rank rows sorted by score descending
pub fn standings<'a>(sorted: &[(&'a str, i64)]) -> Vec<Standing<'a>> {
    let mut rows: Vec<Standing<'a>> = Vec::with_capacity(sorted.len());
    for (i, &(name, score)) in sorted.iter().enumerate() {
        let rank = match rows.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => i + 1,
        };
        rows.push(Standing { rank, name, score });
    }
    rows
}

/// Everyone sharing the top score (empty if there are no rows)
pub fn leaders<'a, 'b>(rows: &'b [Standing<'a>]) -> &'b [Standing<'a>] {
    let count = rows.iter().take_while(|row| row.rank == 1).count();
    &rows[..count]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competition_ranking() {
        let rows = standings(&[("A", 5), ("B", 5), ("C", 2), ("D", 2), ("E", -1)]);
        let ranks: Vec<_> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [1, 1, 3, 3, 5]);
    }

    #[test]
    fn test_leaders() {
        let rows = standings(&[("A", 5), ("B", 5), ("C", 2)]);
        let names: Vec<_> = leaders(&rows).iter().map(|r| r.name).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(leaders(&standings(&[])).is_empty());
    }
}
