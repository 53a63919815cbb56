//! UI Components

mod cart;
mod layout;
mod media;
mod music;
mod product;
mod profile;

pub use cart::ShoppingCart;
pub use layout::{Footer, Header, Navigation};
pub use media::{AudioPlayer, EpisodeCard, VideoCard, VideoPlayer};
pub use music::BackgroundMusicPlayer;
pub use product::ProductCard;
pub use profile::ProfileSetup;
