//! matchmaking-core
//!
//! Pure matchmaking logic:
//! - queue entries and matches
//! - per-player status (queued / matched / none)
//! - the `MatchmakingQueue` engine (FIFO pairing, TTL eviction, acknowledgment)
//! - collaborator seams: clock, match id generator, queue observer
//! - request / response messages for transports

pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod game;
pub mod ids;
pub mod messages;
pub mod observer;
pub mod queue;
pub mod status;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AckPolicy, QueueConfig};
pub use entry::{PlayerId, QueueEntry, Timestamp};
pub use error::MatchmakingError;
pub use game::{Match, MatchId};
pub use ids::{MatchIdGenerator, SequentialMatchIds, UuidMatchIds};
pub use messages::{Request, Response};
pub use observer::{NoopObserver, QueueObserver};
pub use queue::MatchmakingQueue;
pub use status::PlayerStatus;
