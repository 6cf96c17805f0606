// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Generation tokens for "latest request wins" sequencing.
//!
//! Used for history restoration and image decoding: every new request
//! takes a fresh token, and a completion only applies if its token is
//! still the current one.

/// A request identifier handed out by [`Generation::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

/// Monotonically increasing request counter.
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Start a new request, superseding every earlier token.
    pub fn next(&mut self) -> Token {
        self.current += 1;
        Token(self.current)
    }

    /// Invalidate all outstanding tokens without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    /// Whether `token` belongs to the most recent request.
    pub fn is_current(&self, token: Token) -> bool {
        token.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_token_supersedes_older() {
        let mut generation = Generation::default();
        let first = generation.next();
        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_invalidate_drops_outstanding() {
        let mut generation = Generation::default();
        let token = generation.next();
        generation.invalidate();
        assert!(!generation.is_current(token));
    }
}
