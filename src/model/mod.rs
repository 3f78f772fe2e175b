pub mod fixture;
pub mod overrides;

pub use fixture::{Fixture, PlayerServer, Score, Status};
pub use overrides::{FixtureMeta, FixtureOverrides};
