//! # show-core
//!
//! Client-side core of the show site: the shopping cart, the cached query layer over
//! the remote backend, and the small pieces of UI state (auth, playback) that the
//! pages share.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────────┐   ┌────────────────┐   ┌─────────────────┐  │
//! │  │    Cart     │   │  QueryClient   │──▶│     Backend     │  │
//! │  │   (state)   │   │ (cache + keys) │   │   (Strategy)    │  │
//! │  └─────────────┘   └────────────────┘   └─────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Backend` trait lets the same cart and query code run against the HTTP
//! backend in the browser or the in-memory backend in tests.

pub mod auth;
pub mod backend;
pub mod cart;
pub mod draft;
pub mod error;
pub mod model;
pub mod playback;
pub mod query;
pub mod wire;

pub use auth::{IdentityProvider, LoginStatus};
pub use backend::{Backend, MemoryBackend};
pub use cart::{Cart, CartItem};
pub use error::{Result, ShowError};
pub use playback::{BackgroundMusic, EpisodePlayer, PreferenceStore};
pub use model::{
    BlobRef, Episode, Product, ShoppingItem, StripeConfiguration, StripeSessionStatus,
    UserProfile, UserRole, Video,
};
pub use query::{QueryClient, QueryKey, QueryState};
