use rand::seq::index;
use rand::Rng;

use super::{AnnotatedEntry, Quotas};
use crate::storage::{Category, Entry};

/// Draw one day's practice set from a snapshot of the dictionary.
///
/// Words come first, then phrases. Each category is sampled uniformly
/// without replacement and capped at its quota; a category with fewer
/// entries than its quota contributes all of them, an empty one contributes
/// nothing.
pub fn select_daily<R: Rng + ?Sized>(
    entries: &[Entry],
    quotas: Quotas,
    rng: &mut R,
) -> Vec<AnnotatedEntry> {
    let (words, phrases): (Vec<&Entry>, Vec<&Entry>) = entries
        .iter()
        .partition(|entry| entry.category == Category::Word);

    let mut selected = sample(&words, quotas.words, rng);
    selected.extend(sample(&phrases, quotas.phrases, rng));

    selected
        .into_iter()
        .map(|entry| AnnotatedEntry::new(entry.clone()))
        .collect()
}

fn sample<'a, R: Rng + ?Sized>(pool: &[&'a Entry], quota: usize, rng: &mut R) -> Vec<&'a Entry> {
    let amount = pool.len().min(quota);
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i])
        .collect()
}
