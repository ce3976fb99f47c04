//! Progress indicator around an iterator.
//!
//! [`progress`] yields the wrapped iterator's items unchanged while advancing
//! a bar drawn on stderr. Without the `progress` feature nothing is drawn.

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Iterator adapter that advances a progress bar per item
pub struct Progress<I> {
    inner: I,
    position: u64,
    total: u64,
    #[cfg(feature = "progress")]
    bar: ProgressBar,
}

/// Wrap `iter`, expecting `total` items
pub fn progress<I: IntoIterator>(iter: I, total: u64) -> Progress<I::IntoIter> {
    Progress::new(iter.into_iter(), total, true)
}

impl<I: Iterator> Progress<I> {
    #[cfg(feature = "progress")]
    fn new(inner: I, total: u64, visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(total), target);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self {
            inner,
            position: 0,
            total,
            bar,
        }
    }

    #[cfg(not(feature = "progress"))]
    fn new(inner: I, total: u64, _visible: bool) -> Self {
        Self {
            inner,
            position: 0,
            total,
        }
    }

    /// Same adapter without drawing anything
    pub fn hidden(iter: impl IntoIterator<IntoIter = I>, total: u64) -> Self {
        Self::new(iter.into_iter(), total, false)
    }

    /// Show `message` next to the bar
    #[cfg(feature = "progress")]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.bar.set_message(message.into());
        self
    }

    /// Show `message` next to the bar
    #[cfg(not(feature = "progress"))]
    pub fn with_message(self, _message: impl Into<String>) -> Self {
        self
    }

    #[cfg(feature = "progress")]
    fn advance(&self, finished: bool) {
        if finished {
            self.bar.finish_and_clear();
        } else {
            self.bar.inc(1);
        }
    }

    #[cfg(not(feature = "progress"))]
    fn advance(&self, _finished: bool) {}

    /// Items yielded so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Expected number of items
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl<I> std::fmt::Debug for Progress<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("position", &self.position)
            .field("total", &self.total)
            .finish()
    }
}

impl<I: Iterator> Iterator for Progress<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        self.advance(item.is_none());
        if item.is_some() {
            self.position += 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yields_same_items() {
        let items: Vec<i32> = Progress::hidden(vec![3, 1, 2], 3).collect();
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_position_tracks_items() {
        let mut bar = Progress::hidden(0..5, 5).with_message("frobbing");
        assert_eq!(bar.next(), Some(0));
        assert_eq!(bar.next(), Some(1));
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.total(), 5);
        assert_eq!(bar.by_ref().count(), 3);
        assert_eq!(bar.position(), 5);
    }

    #[test]
    fn test_total_may_be_wrong() {
        let items: Vec<char> = Progress::hidden("ab".chars(), 10).collect();
        assert_eq!(items, vec!['a', 'b']);
    }
}
