use log::warn;

pub const BEAT_BUFFER_DEPTH: usize = 16;

/// Staging storage for one burst.
///
/// The cursor is a free integer: it moves forward while capturing and
/// backward while draining, and nothing stops it from leaving the array.
/// Accesses outside the array are dropped (writes) or read as zero, and
/// counted in `overruns`.
#[derive(Debug, Clone)]
pub struct BeatBuffer {
  words: [u32; BEAT_BUFFER_DEPTH],
  cursor: i32,
  overruns: u32,
}

impl BeatBuffer {
  pub fn new() -> Self {
    Self {
      words: [0; BEAT_BUFFER_DEPTH],
      cursor: 0,
      overruns: 0,
    }
  }

  pub fn cursor(&self) -> i32 {
    self.cursor
  }

  pub fn reset_cursor(&mut self) {
    self.cursor = 0;
  }

  pub fn advance(&mut self) {
    self.cursor += 1;
  }

  pub fn retreat(&mut self) {
    self.cursor -= 1;
  }

  fn slot(&self) -> Option<usize> {
    usize::try_from(self.cursor).ok().filter(|&idx| idx < BEAT_BUFFER_DEPTH)
  }

  /// Store a word at the cursor.
  pub fn capture(&mut self, word: u32) {
    match self.slot() {
      Some(idx) => self.words[idx] = word,
      None => {
        self.overruns += 1;
        warn!("beat buffer write out of range: cursor={} word={:#x}", self.cursor, word);
      },
    }
  }

  /// Read the word at the cursor.
  pub fn replay(&mut self) -> u32 {
    match self.slot() {
      Some(idx) => self.words[idx],
      None => {
        self.overruns += 1;
        warn!("beat buffer read out of range: cursor={}", self.cursor);
        0
      },
    }
  }

  pub fn overruns(&self) -> u32 {
    self.overruns
  }

  pub fn words(&self) -> &[u32] {
    &self.words
  }
}

impl Default for BeatBuffer {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fill_forward_drain_backward() {
    let mut buf = BeatBuffer::new();
    for word in [10, 20, 30] {
      buf.capture(word);
      buf.advance();
    }
    assert_eq!(buf.cursor(), 3);

    let mut drained = Vec::new();
    for _ in 0..3 {
      buf.retreat();
      drained.push(buf.replay());
    }
    assert_eq!(drained, vec![30, 20, 10]);
    assert_eq!(buf.cursor(), 0);
    assert_eq!(buf.overruns(), 0);
  }

  #[test]
  fn test_out_of_range_is_counted() {
    let mut buf = BeatBuffer::new();
    buf.capture(7);
    buf.retreat();
    assert_eq!(buf.replay(), 0);
    buf.capture(9);
    assert_eq!(buf.overruns(), 2);
    assert_eq!(buf.words()[0], 7);

    buf.reset_cursor();
    for _ in 0..BEAT_BUFFER_DEPTH {
      buf.advance();
    }
    buf.capture(1);
    assert_eq!(buf.overruns(), 3);
  }
}
