//! Connection state machine and reconnect backoff (§4.5).
//!
//! `250 * 2^n` ms, capped at 5000 ms - an exponential-with-cap shape, whole
//! milliseconds throughout rather than a fractional multiplier.

/// Base reconnect delay, milliseconds.
const BASE_DELAY_MS: u64 = 250;
/// Reconnect delay cap, milliseconds.
const MAX_DELAY_MS: u64 = 5000;

/// Current phase of the connection lifecycle (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected; no reconnect currently scheduled.
    Closed,
    /// A reconnect attempt is in flight.
    Connecting,
    /// `hello` has been sent and the connection is live.
    Open,
    /// Closed, with a reconnect timer pending.
    Reconnecting,
}

/// Reconnect delay for the `n`th consecutive failed attempt (0-based),
/// exponential with base `250ms`, capped at `5000ms` (§4.5).
pub fn backoff_delay_ms(attempt: u32) -> u64 {
    BASE_DELAY_MS.saturating_mul(1u64 << attempt.min(20)).min(MAX_DELAY_MS)
}

/// Tracks connection phase and reconnect attempt count.
#[derive(Debug)]
pub struct ConnectionManager {
    state: ConnectionState,
    attempt: u32,
}

impl ConnectionManager {
    /// A manager starting in the `Closed` state.
    pub fn new() -> Self {
        ConnectionManager { state: ConnectionState::Closed, attempt: 0 }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the connection is currently open (master/input gating and
    /// resize-flush-on-connect both key off this).
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// A reconnect attempt has begun.
    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// The socket opened; `hello` should be sent and the backoff counter
    /// reset (§4.5: "On Open: send hello...; reset reconnect backoff").
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Open;
        self.attempt = 0;
    }

    /// The socket closed; returns the delay to wait before the next
    /// reconnect attempt, and advances the backoff counter (§4.5: "On
    /// Close: emit disconnect; schedule reconnect with exponential
    /// backoff").
    pub fn on_close(&mut self) -> u64 {
        self.state = ConnectionState::Reconnecting;
        let delay = backoff_delay_ms(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
