//! Ngram occurence statistics

use crate::{Ngram, Token};
use indexmap::{map::Entry, IndexMap};

/// Number of occurences of each distinct ngram
///
/// Ngrams are kept in order of first occurence, which is what ties between
/// equally frequent ngrams are broken by when ranking them. Counts can only
/// grow, and add up to the number of ngram windows that were accumulated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrequencyTable {
    /// Occurence count of each ngram, in order of first occurence
    counts: IndexMap<Ngram, usize>,

    /// Total number of accumulated windows
    total: usize,
}
//
impl FrequencyTable {
    /// Set up an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurence of an ngram
    pub fn add(&mut self, ngram: &[Token]) {
        if let Some(count) = self.counts.get_mut(ngram) {
            *count += 1;
        } else {
            self.counts.insert(ngram.into(), 1);
        }
        self.total += 1;
    }

    /// Record one occurence of each ngram from a sequence, return how many
    /// ngrams were recorded
    pub fn add_all<'ngram>(&mut self, ngrams: impl IntoIterator<Item = &'ngram [Token]>) -> usize {
        let initial_total = self.total;
        for ngram in ngrams {
            self.add(ngram);
        }
        self.total - initial_total
    }

    /// Merge statistics from another table into this one
    ///
    /// Ngrams that are new to this table are considered to have occured after
    /// all the ngrams that were already known.
    pub fn merge(&mut self, rhs: FrequencyTable) {
        for (ngram, count) in rhs.counts {
            match self.counts.entry(ngram) {
                Entry::Occupied(o) => *o.into_mut() += count,
                Entry::Vacant(v) => {
                    v.insert(count);
                }
            }
        }
        self.total += rhs.total;
    }

    /// Number of occurences of an ngram
    ///
    /// Ngrams are compared element by element, so permutations of a known
    /// ngram have a count of zero unless they were seen too.
    #[allow(dead_code)]
    pub fn count(&self, ngram: &[impl AsRef<str>]) -> usize {
        let key = ngram.iter().map(|token| token.as_ref().into()).collect::<Ngram>();
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Total number of windows that were accumulated
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct ngrams
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Truth that no ngram has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over ngrams and their counts, in order of first occurence
    pub fn iter(&self) -> impl Iterator<Item = (&[Token], usize)> + '_ {
        self.counts.iter().map(|(ngram, &count)| (&**ngram, count))
    }
}
