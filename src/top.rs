//! Select the top ngrams from a frequency table

use crate::{stats::FrequencyTable, Token};
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, VecDeque},
};

/// Contiguous slice of an ngram ranking
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RankWindow {
    /// Number of top-ranked ngrams to be skipped
    pub start: usize,

    /// Number of ngrams in the slice
    pub len: usize,
}
//
impl RankWindow {
    /// Ranks 791 to 800, a good place to look for idioms that are not mere
    /// language boilerplate
    pub const DEBUG_SLICE: Self = Self::new(790, 10);

    /// Slice of `len` ngrams, after skipping `start` top ngrams
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// The `len` top ngrams
    pub const fn top(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Rank of the first ngram past the end of the slice
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }
}

/// Ngram from a frequency ranking
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankedNgram<'table> {
    /// Zero-based position in the full ranking
    pub rank: usize,

    /// Ngram
    pub ngram: &'table [Token],

    /// Number of occurences
    pub count: usize,
}

/// Pick a slice of the ngram ranking
///
/// Ngrams are ranked by decreasing occurence count. Ties are broken by order
/// of first occurence, so that the ranking does not change from one run to the
/// next. The slice may be shorter than requested, or even empty, if the table
/// does not have enough distinct ngrams.
pub fn ranked(table: &FrequencyTable, window: RankWindow) -> Vec<RankedNgram<'_>> {
    let end = window.end();
    let ngrams_by_decreasing_count = if end >= table.len() {
        // If the whole ranking is needed, a stable sort is all it takes
        let mut sorted = table.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|&(_ngram, count)| Reverse(count));
        sorted
    } else {
        // Otherwise, only keep track of the top ngrams using a min-heap...
        let mut heap = BinaryHeap::with_capacity(end + 1);
        for (first_seen, (ngram, count)) in table.iter().enumerate() {
            heap.push((Reverse(RankKey { count, first_seen }), ngram));
            if heap.len() > end {
                heap.pop();
            }
        }

        // ...then collect them in order of decreasing popularity. This will
        // require an order reversal since we used a min-heap.
        let mut result = VecDeque::with_capacity(heap.len());
        while let Some((Reverse(key), ngram)) = heap.pop() {
            result.push_front((ngram, key.count));
        }
        result.into()
    };
    (ngrams_by_decreasing_count.into_iter().enumerate())
        .skip(window.start)
        .take(window.len)
        .map(|(rank, (ngram, count))| RankedNgram { rank, ngram, count })
        .collect()
}

/// Pick the `k` most frequent ngrams
pub fn top(table: &FrequencyTable, k: usize) -> Vec<RankedNgram<'_>> {
    ranked(table, RankWindow::top(k))
}

/// Ranking criterion for a frequency table entry
///
/// Greater keys come first in the ranking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct RankKey {
    /// Number of occurences
    count: usize,

    /// Position of the ngram in order of first occurence
    first_seen: usize,
}
//
impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.count.cmp(&other.count) {
            Ordering::Greater => return Ordering::Greater,
            Ordering::Less => return Ordering::Less,
            Ordering::Equal => {}
        }
        other.first_seen.cmp(&self.first_seen)
    }
}
//
impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ngram;

    fn table(ngrams: &[&str]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for ngram in ngrams {
            let ngram = ngram.split(' ').map(Token::from).collect::<Ngram>();
            table.add(&ngram);
        }
        table
    }

    fn render(ranked: &[RankedNgram]) -> Vec<(usize, String, usize)> {
        ranked
            .iter()
            .map(|entry| (entry.rank, entry.ngram.join(" "), entry.count))
            .collect()
    }

    #[test]
    fn most_frequent_ngrams_come_first() {
        let table = table(&["a b", "c d", "c d", "e f", "c d", "e f"]);
        assert_eq!(
            render(&top(&table, 2)),
            [(0, "c d".to_owned(), 3), (1, "e f".to_owned(), 2)]
        );
    }

    #[test]
    fn ties_keep_first_occurence_order() {
        let table = table(&["b", "a", "c", "a", "b", "d"]);
        let expected = [
            (0, "b".to_owned(), 2),
            (1, "a".to_owned(), 2),
            (2, "c".to_owned(), 1),
            (3, "d".to_owned(), 1),
        ];
        // Full sort path
        assert_eq!(render(&top(&table, 10)), expected);
        // Bounded heap path
        assert_eq!(render(&top(&table, 3)), expected[..3]);
        assert_eq!(render(&top(&table, 1)), expected[..1]);
    }

    #[test]
    fn heap_and_sort_paths_agree() {
        let ngrams = (0..200)
            .map(|i| format!("t{} t{}", (i * 7) % 13, (i * 3) % 5))
            .collect::<Vec<_>>();
        let table = table(&ngrams.iter().map(String::as_str).collect::<Vec<_>>());
        let full = render(&ranked(&table, RankWindow::top(table.len())));
        for start in 0..table.len() {
            for len in 0..4 {
                let window = RankWindow::new(start, len);
                let end = window.end().min(full.len());
                assert_eq!(render(&ranked(&table, window)), full[start..end]);
            }
        }
    }

    #[test]
    fn slices_past_the_end_are_truncated() {
        let table = table(&["a", "b", "a"]);
        assert_eq!(render(&ranked(&table, RankWindow::new(1, 5))), [(1, "b".to_owned(), 1)]);
        assert!(ranked(&table, RankWindow::DEBUG_SLICE).is_empty());
        assert!(ranked(&table, RankWindow::new(usize::MAX, usize::MAX)).is_empty());
        assert!(top(&table, 0).is_empty());
    }

    #[test]
    fn debug_slice_picks_ranks_791_to_800() {
        let ngrams = (0..1000).map(|i| format!("n{i}")).collect::<Vec<_>>();
        let mut table = FrequencyTable::new();
        for (i, ngram) in ngrams.iter().enumerate() {
            // Make earlier ngrams more frequent
            for _ in 0..(1000 - i) {
                table.add(&[Token::from(ngram.as_str())]);
            }
        }
        let slice = ranked(&table, RankWindow::DEBUG_SLICE);
        assert_eq!(slice.len(), 10);
        assert_eq!(slice[0].rank, 790);
        assert_eq!(slice[0].ngram.join(" "), "n790");
        assert_eq!(slice[9].ngram.join(" "), "n799");
        assert_eq!(slice[9].count, 201);
    }

    #[test]
    fn empty_table_has_empty_ranking() {
        assert!(top(&FrequencyTable::new(), 10).is_empty());
    }
}
