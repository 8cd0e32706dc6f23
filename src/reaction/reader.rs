use std::io::{self, BufRead};

use tracing::warn;

use crate::network::ReactionId;

/// Three consecutive non-blank lines of the reaction stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTriplet {
    /// Position of the triplet in the stream, counting from zero.
    pub ordinal: ReactionId,
    pub meta: String,
    pub equation: String,
    pub mapped: String,
}

/// Iterates over the reaction triplets of a text stream.
///
/// Blank lines are skipped. A trailing group of fewer than three lines ends
/// the stream with a warning.
pub struct TripletReader<R> {
    lines: io::Lines<R>,
    next_ordinal: ReactionId,
}

impl<R: BufRead> TripletReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            next_ordinal: 0,
        }
    }

    fn next_line(&mut self) -> Option<io::Result<String>> {
        loop {
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(Ok(line.trim().to_string())),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: BufRead> Iterator for TripletReader<R> {
    type Item = io::Result<RawTriplet>;

    fn next(&mut self) -> Option<Self::Item> {
        let meta = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        let mut rest = Vec::with_capacity(2);
        for _ in 0..2 {
            match self.next_line() {
                Some(Ok(line)) => rest.push(line),
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    warn!(
                        ordinal = self.next_ordinal,
                        lines = rest.len() + 1,
                        "incomplete trailing reaction record ignored"
                    );
                    return None;
                }
            }
        }
        let mapped = rest.pop().unwrap_or_default();
        let equation = rest.pop().unwrap_or_default();

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        Some(Ok(RawTriplet {
            ordinal,
            meta,
            equation,
            mapped,
        }))
    }
}
