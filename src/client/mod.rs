//! # The application client: facade, session actor, and round machinery.
//!
//! Three layers, outermost first:
//! - [`AppClient`] — the embedder-facing handle (lifecycle and forwarding);
//! - [`ClientEndpoint`](endpoint::ClientEndpoint) — the mailbox actor owning
//!   the registration/session state machine;
//! - [`RegistrationRound`](round::RegistrationRound) — cancellable handles
//!   for one batch of parallel registration attempts plus its retry timer.

mod endpoint;
mod handle;
mod round;

pub use handle::AppClient;
