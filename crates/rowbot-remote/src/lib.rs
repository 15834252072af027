//! Remote control of the console four-in-a-row game.
//!
//! This crate drives the external game executable as a subprocess and turns its console
//! text into typed state:
//!
//! - [`channel`] - Line-oriented, prompt-delimited transport to the subprocess
//! - [`output_parser`] - Extracts board renderings from captured console text
//! - [`outcome`] - Classifies captured text into a [`GameOutcome`](outcome::GameOutcome)
//!   using a swappable phrase table
//! - [`config`] - Game setup, timeouts and retry bounds
//! - [`session`] - The interaction state machine playing one game for one decision function
//!
//! # Game Flow
//!
//! ```text
//! Init ──handshake──▶ Playing ──ColumnFull──▶ penalty (reward of last board - 1000)
//!                      │  ▲
//!                      └──┘ Ongoing
//!                      │
//!                      └──Win / Loss / Draw──▶ final read, reward of end-of-game board
//! ```
//!
//! Each turn the session parses the latest board, records its reward as the running
//! fitness, asks the decision function for a column and sends it. The subprocess is
//! terminated on every exit path.
//!
//! # Example
//!
//! ```rust,no_run
//! use rowbot_remote::{
//!     channel::ProcessChannel, config::GameConfig, observer::NoopObserver, session::GameSession,
//! };
//!
//! let config = GameConfig::default();
//! let channel = ProcessChannel::spawn(&config)?;
//! let session = GameSession::new(channel, &config);
//!
//! let mut fitness = 0;
//! let first_column = |_inputs: &[i8]| 1_usize;
//! let report = session.play(&first_column, &mut fitness, &mut NoopObserver)?;
//! println!("{} after {} turns, fitness {}", report.outcome, report.turns, fitness);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod channel;
pub mod config;
pub mod decision;
pub mod observer;
pub mod outcome;
pub mod output_parser;
pub mod session;
