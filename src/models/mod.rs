pub mod posting;
pub mod skill;
pub mod network;

pub use posting::*;
pub use skill::*;
pub use network::*;
