//! Strictly alternating request/response channel to the optimizer.
//!
//! # State machine
//!
//! ```text
//! AwaitingHandshake ──initialization──▶ Ready
//! Ready ──send outbound──▶ Exchanging
//! Exchanging ──travel_time_query / respond──▶ Exchanging
//! Exchanging ──assignment──▶ Ready
//! any ──finalize──▶ Closed
//! ```
//!
//! The channel also tracks whose turn it is.  A send is only legal after a
//! receive and vice versa; the peer speaks first.  A failed receive leaves
//! the turn with the peer, so `finalize` then closes without sending.

use fb_protocol::{
    decode, encode, AssignmentMessage, Message, Transport, TravelTimeResponse,
};

use crate::oracle::TravelTimeOracle;
use crate::{BridgeError, BridgeResult};

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// Waiting for the peer's `initialization`.
    AwaitingHandshake,
    /// Between exchanges.
    Ready,
    /// Outbound message sent, assignment not yet received.
    Exchanging,
    /// Finalized.  Terminal.
    Closed,
}

/// Which side may act next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Ours,
    Peer,
}

/// Result of one completed exchange.
#[derive(Debug)]
pub struct Exchange {
    pub assignment:       AssignmentMessage,
    pub queries_answered: usize,
}

// ── ExchangeChannel ───────────────────────────────────────────────────────────

pub struct ExchangeChannel<T: Transport> {
    transport: T,
    state:     ChannelState,
    turn:      Turn,
    exchanges: u64,
}

impl<T: Transport> ExchangeChannel<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, state: ChannelState::AwaitingHandshake, turn: Turn::Peer, exchanges: 0 }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Number of completed exchanges.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Block until the peer sends `initialization`.
    pub fn handshake(&mut self) -> BridgeResult<()> {
        if self.state != ChannelState::AwaitingHandshake {
            return Ok(());
        }
        log::info!("waiting for the optimizer to initialize");
        match self.recv()? {
            Message::Initialization => {
                self.state = ChannelState::Ready;
                log::info!("optimizer initialized");
                Ok(())
            }
            other => Err(BridgeError::UnexpectedMessage { expected: "initialization", found: other.tag() }),
        }
    }

    /// Send `outbound` and serve travel-time queries until the peer answers
    /// with an assignment.  Queries are answered at `query_time`.
    ///
    /// Performs the handshake first if it has not happened yet.
    pub fn exchange(
        &mut self,
        outbound:   &Message,
        oracle:     &TravelTimeOracle<'_>,
        query_time: f64,
    ) -> BridgeResult<Exchange> {
        match self.state {
            ChannelState::Closed => return Err(BridgeError::ChannelClosed),
            ChannelState::AwaitingHandshake => self.handshake()?,
            ChannelState::Ready | ChannelState::Exchanging => {}
        }

        self.send(outbound)?;
        self.state = ChannelState::Exchanging;
        log::debug!("sent {} at t={query_time}", outbound.tag());

        let mut queries_answered = 0;
        loop {
            match self.recv()? {
                Message::TravelTimeQuery(query) => {
                    let travel_times = oracle.query(&query.links, query_time)?;
                    log::debug!("answering travel-time query for {} links", travel_times.len());
                    self.send(&Message::TravelTimeResponse(TravelTimeResponse { travel_times }))?;
                    queries_answered += 1;
                }
                Message::Assignment(assignment) => {
                    self.state = ChannelState::Ready;
                    self.exchanges += 1;
                    log::debug!(
                        "received assignment for {} vehicles after {queries_answered} queries",
                        assignment.stops.len()
                    );
                    return Ok(Exchange { assignment, queries_answered });
                }
                other => {
                    return Err(BridgeError::UnexpectedMessage {
                        expected: "assignment or travel_time_query",
                        found:    other.tag(),
                    });
                }
            }
        }
    }

    /// Send `finalization` and close.  Only the first call has an effect.
    ///
    /// Nothing is sent if the handshake never happened or if it is the
    /// peer's turn to speak.
    pub fn finalize(&mut self) -> BridgeResult<()> {
        let previous = std::mem::replace(&mut self.state, ChannelState::Closed);
        match previous {
            ChannelState::Closed => Ok(()),
            ChannelState::AwaitingHandshake => {
                log::warn!("finalizing before the optimizer initialized; closing without finalization");
                Ok(())
            }
            ChannelState::Ready | ChannelState::Exchanging if self.turn == Turn::Peer => {
                log::warn!("finalizing while awaiting the optimizer; closing without finalization");
                Ok(())
            }
            ChannelState::Ready | ChannelState::Exchanging => {
                log::info!("sending finalization after {} exchanges", self.exchanges);
                self.send(&Message::Finalization)
            }
        }
    }

    // ── Alternation ───────────────────────────────────────────────────────

    fn send(&mut self, message: &Message) -> BridgeResult<()> {
        if self.turn != Turn::Ours {
            return Err(BridgeError::OutOfTurn("send"));
        }
        let bytes = encode(message)?;
        self.transport.send(&bytes)?;
        self.turn = Turn::Peer;
        Ok(())
    }

    fn recv(&mut self) -> BridgeResult<Message> {
        if self.turn != Turn::Peer {
            return Err(BridgeError::OutOfTurn("receive"));
        }
        let bytes = self.transport.recv()?;
        self.turn = Turn::Ours;
        Ok(decode(&bytes)?)
    }
}
