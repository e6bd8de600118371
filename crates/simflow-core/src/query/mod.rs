//! Query state machine: card input, persisted identifier, and fetch lifecycle.

mod machine;
mod state;

pub use machine::{
    Completion, FetchTicket, QueryError, QueryMachine, QueryOptions, EMPTY_IDENTIFIER_MESSAGE,
    REJECTED_FALLBACK_MESSAGE, TRANSPORT_ERROR_MESSAGE,
};
pub use state::{Phase, QueryState};
