//! Training loop for decision policies playing the external console game.
//!
//! This crate sequences games; it holds no board logic of its own. Every candidate in a
//! generation plays one game against a freshly launched game process, and the fitness the
//! session computes is recorded back onto the candidate.
//!
//! # How Training Works
//!
//! 1. **Proposal** - A [`CandidateSource`](source::CandidateSource) proposes the policies of
//!    the next generation, seeing the evaluated candidates of the previous one
//! 2. **Evaluation** - Each policy plays one game through a
//!    [`GameSession`](rowbot_remote::session::GameSession)
//! 3. **Fitness** - The session's final fitness is stored on the candidate; candidates whose
//!    games keep failing are left without a fitness
//! 4. **Elites** - Candidates whose fitness exceeds a fixed threshold are selected for
//!    persistence
//!
//! # Architecture
//!
//! ```text
//! CandidateSource
//!     ↓ proposes
//! LinearPolicy (one per candidate)
//!     ↓ plays through
//! GameSession + ProcessChannel (rowbot-remote)
//!     ↓ produces
//! Fitness
//!     ↓ summarized by
//! GenerationSummary / elites
//! ```
//!
//! Games run strictly one after another. Exactly one game process is alive at a time.
//!
//! # Current Limitations
//!
//! - **No evolution operators**: the bundled source only carries the best policies forward
//!   and refills the rest randomly. Mutation, crossover and speciation belong to an
//!   external optimizer plugged in through [`CandidateSource`](source::CandidateSource).
//! - **One game per candidate**: fitness is not averaged over several games, so a lucky
//!   game can promote a weak policy.

pub mod candidate;
pub mod policy;
pub mod source;
pub mod trainer;
pub mod weights;
